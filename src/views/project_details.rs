use crate::api::{Api, ApiError, Project, Task, TaskPayload, TaskStatus};
use crate::views::{Notice, SubmitOutcome, INVALID_DATE_MSG, REQUIRED_FIELDS_MSG};
use chrono::NaiveDate;

/// Status half of the task filter. `All` passes everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    pub fn cycle(&self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Only(TaskStatus::Todo),
            StatusFilter::Only(TaskStatus::Todo) => StatusFilter::Only(TaskStatus::InProgress),
            StatusFilter::Only(TaskStatus::InProgress) => StatusFilter::Only(TaskStatus::Done),
            StatusFilter::Only(TaskStatus::Done) => StatusFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "Todos",
            StatusFilter::Only(status) => status.label(),
        }
    }
}

/// Single form shared by creation and editing. `editing` holds the task being
/// edited; entering edit mode pre-fills every field from it.
#[derive(Debug)]
pub struct TaskForm {
    pub title: String,
    pub status: TaskStatus,
    pub due_date: String,
    pub image_url: String,
    pub editing: Option<Task>,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            status: TaskStatus::Todo,
            due_date: String::new(),
            image_url: String::new(),
            editing: None,
        }
    }
}

impl TaskForm {
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn begin_edit(&mut self, task: &Task) {
        self.title = task.title.clone();
        self.status = task.status;
        self.due_date = task.due_date.to_string();
        self.image_url = task.image_url.clone();
        self.editing = Some(task.clone());
    }

    /// Back to create mode, fields cleared, status back to the default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn missing_required(&self) -> bool {
        self.title.trim().is_empty()
            || self.due_date.trim().is_empty()
            || self.image_url.trim().is_empty()
    }

    /// In edit mode the original creator is preserved; otherwise the session
    /// user becomes the creator.
    fn payload(&self, project_id: u64, session_user_id: u64) -> Result<TaskPayload, &'static str> {
        let due_date: NaiveDate = self.due_date.trim().parse().map_err(|_| INVALID_DATE_MSG)?;
        let creator_id = self
            .editing
            .as_ref()
            .map(|t| t.creator_id)
            .unwrap_or(session_user_id);
        Ok(TaskPayload {
            title: self.title.trim().to_string(),
            status: self.status,
            due_date,
            image_url: self.image_url.trim().to_string(),
            project_id,
            creator_id,
        })
    }
}

/// One project with its task list, the create/edit form, and local filters.
#[derive(Debug)]
pub struct ProjectDetailsView {
    pub project_id: u64,
    pub project: Option<Project>,
    pub tasks: Vec<Task>,
    pub search: String,
    pub status_filter: StatusFilter,
    pub form: TaskForm,
    pub selected: usize,
    pub notice: Option<Notice>,
}

impl ProjectDetailsView {
    pub fn new(project_id: u64) -> Self {
        Self {
            project_id,
            project: None,
            tasks: Vec::new(),
            search: String::new(),
            status_filter: StatusFilter::All,
            form: TaskForm::default(),
            selected: 0,
            notice: None,
        }
    }

    /// Fetches the project and its tasks. Run on entry and again whenever the
    /// project id changes.
    pub async fn load(&mut self, api: &Api) -> Result<(), ApiError> {
        self.project = Some(api.get_project(self.project_id).await?);
        self.refresh_tasks(api).await
    }

    pub async fn refresh_tasks(&mut self, api: &Api) -> Result<(), ApiError> {
        self.tasks = api.tasks_for_project(self.project_id).await?;
        let shown = self.filtered().len();
        if self.selected >= shown {
            self.selected = shown.saturating_sub(1);
        }
        Ok(())
    }

    /// Case-insensitive substring match on title AND status equality,
    /// recomputed from the in-memory list on every call.
    pub fn filtered(&self) -> Vec<&Task> {
        let needle = self.search.to_lowercase();
        self.tasks
            .iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&needle) && self.status_filter.matches(t.status)
            })
            .collect()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.filtered().get(self.selected).copied()
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.filtered().len() {
            self.selected += 1;
        }
    }

    /// Edit/delete affordances render only for the task's creator or the
    /// project's creator. Advisory: the backend does not enforce it.
    pub fn can_edit_or_delete(&self, task: &Task, user_id: u64) -> bool {
        task.creator_id == user_id
            || self.project.as_ref().is_some_and(|p| p.is_creator(user_id))
    }

    pub fn can_manage_collaborators(&self, user_id: u64) -> bool {
        self.project.as_ref().is_some_and(|p| p.is_creator(user_id))
    }

    /// PUT in edit mode, POST otherwise; either way refetch, notify and drop
    /// back to create mode. A local rejection issues no network write.
    pub async fn submit(&mut self, api: &Api, user_id: u64) -> Result<SubmitOutcome, ApiError> {
        if self.form.missing_required() {
            return Ok(SubmitOutcome::Rejected(REQUIRED_FIELDS_MSG));
        }
        let payload = match self.form.payload(self.project_id, user_id) {
            Ok(payload) => payload,
            Err(msg) => return Ok(SubmitOutcome::Rejected(msg)),
        };

        let message = match &self.form.editing {
            Some(task) => {
                api.update_task(task.id, &payload).await?;
                "Tarefa atualizada com sucesso!"
            }
            None => {
                api.create_task(&payload).await?;
                "Tarefa criada com sucesso!"
            }
        };

        self.form.reset();
        self.refresh_tasks(api).await?;
        self.notice = Some(Notice::new(message));
        Ok(SubmitOutcome::Saved)
    }

    /// Deletion is confirmed by the caller before this is reached.
    pub async fn delete_task(&mut self, api: &Api, task_id: u64) -> Result<(), ApiError> {
        api.delete_task(task_id).await?;
        self.refresh_tasks(api).await?;
        self.notice = Some(Notice::new("Tarefa excluída."));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use std::path::PathBuf;

    fn unroutable_api() -> Api {
        let config = AppConfig::new(
            "http://127.0.0.1:9".to_string(),
            "http://127.0.0.1:9".to_string(),
            PathBuf::from("unused"),
        );
        Api::new(&config)
    }

    fn task(id: u64, title: &str, status: TaskStatus, creator_id: u64) -> Task {
        Task {
            id,
            title: title.to_string(),
            status,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            image_url: "http://x/y.png".to_string(),
            project_id: 1,
            creator_id,
        }
    }

    fn view_with_tasks(tasks: Vec<Task>) -> ProjectDetailsView {
        let mut view = ProjectDetailsView::new(1);
        view.project = Some(Project {
            id: 1,
            name: "Obra".to_string(),
            description: String::new(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            creator_id: 10,
            collaborators: vec![20],
        });
        view.tasks = tasks;
        view
    }

    #[test]
    fn filter_is_substring_and_status_intersection() {
        let mut view = view_with_tasks(vec![
            task(1, "Write report", TaskStatus::Todo, 10),
            task(2, "Review REPORT draft", TaskStatus::Done, 10),
            task(3, "Deploy site", TaskStatus::Todo, 10),
        ]);

        view.search = "repo".to_string();
        let ids: Vec<u64> = view.filtered().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);

        view.status_filter = StatusFilter::Only(TaskStatus::Todo);
        let ids: Vec<u64> = view.filtered().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);

        view.search.clear();
        view.status_filter = StatusFilter::All;
        assert_eq!(view.filtered().len(), 3);
    }

    #[test]
    fn status_filter_cycles_through_every_option() {
        let mut filter = StatusFilter::All;
        for _ in 0..4 {
            filter = filter.cycle();
        }
        assert_eq!(filter, StatusFilter::All);
    }

    #[test]
    fn begin_edit_prefills_and_reset_returns_to_create_mode() {
        let mut form = TaskForm::default();
        let t = task(5, "Pintar parede", TaskStatus::InProgress, 20);
        form.begin_edit(&t);

        assert!(form.is_editing());
        assert_eq!(form.title, "Pintar parede");
        assert_eq!(form.status, TaskStatus::InProgress);
        assert_eq!(form.due_date, "2024-01-01");

        form.reset();
        assert!(!form.is_editing());
        assert!(form.title.is_empty());
        assert_eq!(form.status, TaskStatus::Todo);
    }

    #[test]
    fn editing_preserves_the_original_creator() {
        let mut form = TaskForm::default();
        form.begin_edit(&task(5, "Pintar parede", TaskStatus::Todo, 20));

        // Session user 10 edits a task created by user 20.
        let payload = form.payload(1, 10).unwrap();
        assert_eq!(payload.creator_id, 20);
    }

    #[test]
    fn creating_assigns_the_session_user_as_creator() {
        let mut form = TaskForm::default();
        form.title = "Write report".to_string();
        form.due_date = "2024-01-01".to_string();
        form.image_url = "http://x/y.png".to_string();

        let payload = form.payload(1, 10).unwrap();
        assert_eq!(payload.creator_id, 10);
        assert_eq!(payload.project_id, 1);
        assert_eq!(payload.status, TaskStatus::Todo);
    }

    #[tokio::test]
    async fn blank_required_field_rejects_before_any_write() {
        let mut view = view_with_tasks(vec![]);
        view.form.title = "Write report".to_string();
        view.form.due_date = "2024-01-01".to_string();
        // image_url left blank

        let outcome = view.submit(&unroutable_api(), 10).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected(REQUIRED_FIELDS_MSG));
    }

    #[test]
    fn edit_and_delete_are_offered_to_task_or_project_creator_only() {
        let view = view_with_tasks(vec![task(1, "Tarefa", TaskStatus::Todo, 20)]);
        let t = &view.tasks[0];

        assert!(view.can_edit_or_delete(t, 20)); // task creator
        assert!(view.can_edit_or_delete(t, 10)); // project creator
        assert!(!view.can_edit_or_delete(t, 30)); // mere collaborator

        assert!(view.can_manage_collaborators(10));
        assert!(!view.can_manage_collaborators(20));
    }
}
