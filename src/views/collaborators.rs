use crate::api::{Api, ApiError, NewUser, Project, Suggestion, User};
use crate::views::Notice;

/// Every suggestion-derived account gets this placeholder password. Known
/// weakness carried over from the backend contract.
pub const DEFAULT_COLLABORATOR_PASSWORD: &str = "123456";

pub const ACCESS_DENIED_MSG: &str =
    "Acesso negado. Apenas o criador pode gerenciar colaboradores.";

/// Which of the two lists holds the selection cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollaboratorFocus {
    #[default]
    Collaborators,
    Suggestions,
}

/// Collaborator management for one project: current members resolved against
/// the full user list, plus suggestions from the random-identity service.
#[derive(Debug)]
pub struct CollaboratorsView {
    pub project_id: u64,
    pub project: Option<Project>,
    pub users: Vec<User>,
    pub suggestions: Vec<Suggestion>,
    pub focus: CollaboratorFocus,
    pub selected: usize,
    pub notice: Option<Notice>,
}

impl CollaboratorsView {
    pub fn new(project_id: u64) -> Self {
        Self {
            project_id,
            project: None,
            users: Vec::new(),
            suggestions: Vec::new(),
            focus: CollaboratorFocus::default(),
            selected: 0,
            notice: None,
        }
    }

    /// Fetches the project, the user directory, and the suggestions. Anyone
    /// but the project creator gets the access-denied rendering and no fetch
    /// beyond the project itself. An unreachable suggestion service only
    /// costs the suggestion list.
    pub async fn load(&mut self, api: &Api, user_id: u64) -> Result<(), ApiError> {
        self.project = Some(api.get_project(self.project_id).await?);
        if !self.can_manage(user_id) {
            return Ok(());
        }
        self.users = api.list_users().await?;
        match api.fetch_suggestions().await {
            Ok(suggestions) => self.suggestions = suggestions,
            Err(e) => {
                log::warn!("Failed to fetch suggestions: {}", e);
                self.suggestions.clear();
            }
        }
        Ok(())
    }

    /// Only the project creator may see or mutate this view.
    pub fn can_manage(&self, user_id: u64) -> bool {
        self.project.as_ref().is_some_and(|p| p.is_creator(user_id))
    }

    /// Collaborator ids resolved to display users; unknown ids are skipped.
    pub fn collaborator_list(&self) -> Vec<&User> {
        let Some(project) = &self.project else {
            return Vec::new();
        };
        self.users
            .iter()
            .filter(|u| project.collaborators.contains(&u.id))
            .collect()
    }

    /// Two sequential writes with no transaction: a user is created first,
    /// then the project is replaced with the id appended. If the second write
    /// fails the new user is left orphaned.
    pub async fn add_suggestion(&mut self, api: &Api, index: usize) -> Result<(), ApiError> {
        let (Some(project), Some(suggestion)) = (&self.project, self.suggestions.get(index)) else {
            return Ok(());
        };

        let created = api.create_user(&new_user_from(suggestion)).await?;
        let updated = project.clone().with_collaborator(created.id);
        api.update_project(&updated).await?;

        self.project = Some(api.get_project(self.project_id).await?);
        self.users = api.list_users().await?;
        self.notice = Some(Notice::new("Colaborador adicionado com sucesso!"));
        Ok(())
    }

    /// Removal is confirmed by the caller. Removing an id that is not in the
    /// list degenerates to a PUT of the unchanged project.
    pub async fn remove(&mut self, api: &Api, user_id: u64) -> Result<(), ApiError> {
        let Some(project) = &self.project else {
            return Ok(());
        };

        let updated = project.clone().without_collaborator(user_id);
        api.update_project(&updated).await?;
        self.project = Some(api.get_project(self.project_id).await?);
        self.clamp_selection();
        Ok(())
    }

    /// Keeps the cursor inside the focused list after it shrinks.
    fn clamp_selection(&mut self) {
        let len = match self.focus {
            CollaboratorFocus::Collaborators => self.collaborator_list().len(),
            CollaboratorFocus::Suggestions => self.suggestions.len(),
        };
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        let len = match self.focus {
            CollaboratorFocus::Collaborators => self.collaborator_list().len(),
            CollaboratorFocus::Suggestions => self.suggestions.len(),
        };
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            CollaboratorFocus::Collaborators => CollaboratorFocus::Suggestions,
            CollaboratorFocus::Suggestions => CollaboratorFocus::Collaborators,
        };
        self.selected = 0;
    }
}

fn new_user_from(suggestion: &Suggestion) -> NewUser {
    NewUser {
        name: suggestion.full_name(),
        email: suggestion.email.clone(),
        password: DEFAULT_COLLABORATOR_PASSWORD.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SuggestionName;
    use chrono::NaiveDate;

    fn view() -> CollaboratorsView {
        let mut view = CollaboratorsView::new(1);
        view.project = Some(Project {
            id: 1,
            name: "Obra".to_string(),
            description: String::new(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            creator_id: 10,
            collaborators: vec![2],
        });
        view.users = vec![
            User {
                id: 1,
                name: "Maria Souza".to_string(),
                email: "maria@x.com".to_string(),
                password: "123456".to_string(),
            },
            User {
                id: 2,
                name: "Ana Lima".to_string(),
                email: "ana@x.com".to_string(),
                password: "123456".to_string(),
            },
        ];
        view
    }

    #[test]
    fn only_the_project_creator_can_manage() {
        let view = view();
        assert!(view.can_manage(10));
        assert!(!view.can_manage(2));
        assert!(!view.can_manage(99));
    }

    #[test]
    fn collaborator_ids_resolve_to_display_users() {
        let view = view();
        let listed = view.collaborator_list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Ana Lima");
        assert_eq!(listed[0].email, "ana@x.com");
    }

    #[test]
    fn unknown_collaborator_ids_are_skipped() {
        let mut view = view();
        view.project.as_mut().unwrap().collaborators = vec![2, 777];
        assert_eq!(view.collaborator_list().len(), 1);
    }

    #[test]
    fn selection_is_clamped_when_the_list_shrinks() {
        let mut view = view(); // one resolvable collaborator
        view.selected = 3;
        view.clamp_selection();
        assert_eq!(view.selected, 0);

        view.toggle_focus(); // suggestions list is empty
        view.selected = 2;
        view.clamp_selection();
        assert_eq!(view.selected, 0);
    }

    /// Serves one canned JSON response on a local socket, then goes away, so
    /// any second request fails with a connection error.
    async fn serve_once(body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nConnection: close\r\nContent-Length: {}\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn non_creator_load_fetches_nothing_beyond_the_project() {
        use crate::config::AppConfig;
        use std::path::PathBuf;

        let body = r#"{
            "id": 1,
            "name": "Obra",
            "description": "",
            "start_date": "2024-01-01",
            "end_date": "2024-06-30",
            "creator_id": 10,
            "collaborators": [2]
        }"#;
        let base = serve_once(body).await;
        let api = Api::new(&AppConfig::new(base.clone(), base, PathBuf::from("unused")));

        // User 99 is not the creator: only the project fetch may go out. A
        // user or suggestion fetch would hit the now-gone server and error.
        let mut view = CollaboratorsView::new(1);
        view.load(&api, 99).await.unwrap();

        assert!(!view.can_manage(99));
        assert!(view.users.is_empty());
        assert!(view.suggestions.is_empty());
    }

    #[test]
    fn suggestions_become_users_with_the_placeholder_password() {
        let suggestion = Suggestion {
            name: SuggestionName {
                first: "Ana".to_string(),
                last: "Lima".to_string(),
            },
            email: "ana@x.com".to_string(),
        };
        let new_user = new_user_from(&suggestion);
        assert_eq!(new_user.name, "Ana Lima");
        assert_eq!(new_user.email, "ana@x.com");
        assert_eq!(new_user.password, DEFAULT_COLLABORATOR_PASSWORD);
    }
}
