use crate::api::{Api, ApiError, User};
use crate::views::REQUIRED_FIELDS_MSG;

pub const INVALID_CREDENTIALS_MSG: &str = "E-mail ou senha inválidos";

/// Login form. Credentials are matched against the full user list, in
/// plaintext, exactly as the backend stores them.
#[derive(Debug, Default)]
pub struct LoginView {
    pub email: String,
    pub password: String,
    pub error: Option<String>,
}

impl LoginView {
    /// `Ok(Some(user))` on a successful match; `Ok(None)` when validation or
    /// matching failed, with the message left in `self.error`.
    pub async fn submit(&mut self, api: &Api) -> Result<Option<User>, ApiError> {
        if self.email.trim().is_empty() || self.password.trim().is_empty() {
            self.error = Some(REQUIRED_FIELDS_MSG.to_string());
            return Ok(None);
        }

        let users = api.list_users().await?;
        match authenticate(users, &self.email, &self.password) {
            Some(user) => {
                self.error = None;
                Ok(Some(user))
            }
            None => {
                self.error = Some(INVALID_CREDENTIALS_MSG.to_string());
                Ok(None)
            }
        }
    }
}

fn authenticate(users: Vec<User>, email: &str, password: &str) -> Option<User> {
    users
        .into_iter()
        .find(|u| u.email == email && u.password == password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use std::path::PathBuf;

    fn users() -> Vec<User> {
        vec![
            User {
                id: 1,
                name: "Ana Lima".to_string(),
                email: "ana@x.com".to_string(),
                password: "123456".to_string(),
            },
            User {
                id: 2,
                name: "Bruno Dias".to_string(),
                email: "bruno@x.com".to_string(),
                password: "segredo".to_string(),
            },
        ]
    }

    #[test]
    fn matches_email_and_password_exactly() {
        assert_eq!(authenticate(users(), "bruno@x.com", "segredo").map(|u| u.id), Some(2));
        assert!(authenticate(users(), "bruno@x.com", "123456").is_none());
        assert!(authenticate(users(), "carla@x.com", "123456").is_none());
    }

    #[tokio::test]
    async fn blank_credentials_are_rejected_without_a_request() {
        // Unroutable base URL: any issued request would surface as Err.
        let config = AppConfig::new(
            "http://127.0.0.1:9".to_string(),
            "http://127.0.0.1:9".to_string(),
            PathBuf::from("unused"),
        );
        let api = Api::new(&config);
        let mut view = LoginView::default();
        view.email = "ana@x.com".to_string();

        let result = view.submit(&api).await.unwrap();
        assert!(result.is_none());
        assert_eq!(view.error.as_deref(), Some(REQUIRED_FIELDS_MSG));
    }
}
