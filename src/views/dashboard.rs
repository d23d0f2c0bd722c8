use crate::api::{Api, ApiError, NewProject, Project};
use crate::views::{SubmitOutcome, INVALID_DATE_MSG, REQUIRED_FIELDS_MSG};
use chrono::NaiveDate;

/// Project creation form. Fields are raw strings; presence is checked before
/// any parsing, mirroring the product's required-field behavior.
#[derive(Debug, Default)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
}

impl ProjectForm {
    fn missing_required(&self) -> bool {
        self.name.trim().is_empty()
            || self.start_date.trim().is_empty()
            || self.end_date.trim().is_empty()
    }

    fn payload(&self, creator_id: u64) -> Result<NewProject, &'static str> {
        let start_date: NaiveDate = self.start_date.trim().parse().map_err(|_| INVALID_DATE_MSG)?;
        let end_date: NaiveDate = self.end_date.trim().parse().map_err(|_| INVALID_DATE_MSG)?;
        Ok(NewProject {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            start_date,
            end_date,
            creator_id,
            collaborators: Vec::new(),
        })
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Project list plus creation form. The backend has no per-user listing, so
/// every project is fetched and filtered here.
#[derive(Debug, Default)]
pub struct DashboardView {
    pub projects: Vec<Project>,
    pub form: ProjectForm,
    pub selected: usize,
}

impl DashboardView {
    pub async fn refresh(&mut self, api: &Api, user_id: u64) -> Result<(), ApiError> {
        let all = api.list_projects().await?;
        self.projects = visible_to(all, user_id);
        if self.selected >= self.projects.len() {
            self.selected = self.projects.len().saturating_sub(1);
        }
        Ok(())
    }

    /// Validates locally, then creates the project and refetches the list.
    /// A rejection issues no network write.
    pub async fn submit(&mut self, api: &Api, user_id: u64) -> Result<SubmitOutcome, ApiError> {
        if self.form.missing_required() {
            return Ok(SubmitOutcome::Rejected(REQUIRED_FIELDS_MSG));
        }
        let payload = match self.form.payload(user_id) {
            Ok(payload) => payload,
            Err(msg) => return Ok(SubmitOutcome::Rejected(msg)),
        };

        api.create_project(&payload).await?;
        self.form.clear();
        self.refresh(api, user_id).await?;
        Ok(SubmitOutcome::Saved)
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.projects.get(self.selected)
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.projects.len() {
            self.selected += 1;
        }
    }
}

/// Projects where the user is creator or listed collaborator.
fn visible_to(projects: Vec<Project>, user_id: u64) -> Vec<Project> {
    projects.into_iter().filter(|p| p.is_visible_to(user_id)).collect()
}
