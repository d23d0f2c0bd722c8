use crate::api::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Project(u64),
    Collaborators(u64),
}

impl Route {
    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

/// Guard evaluated on every navigation: guarded routes fall back to the login
/// view when no session is present. The session itself is never revalidated
/// against the server.
pub fn resolve(requested: Route, session: Option<&User>) -> Route {
    if requested.requires_session() && session.is_none() {
        return Route::Login;
    }
    requested
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password: "123456".to_string(),
        }
    }

    #[test]
    fn guarded_routes_redirect_without_session() {
        assert_eq!(resolve(Route::Dashboard, None), Route::Login);
        assert_eq!(resolve(Route::Project(3), None), Route::Login);
        assert_eq!(resolve(Route::Collaborators(3), None), Route::Login);
    }

    #[test]
    fn guarded_routes_pass_with_session() {
        let u = user();
        assert_eq!(resolve(Route::Dashboard, Some(&u)), Route::Dashboard);
        assert_eq!(resolve(Route::Collaborators(3), Some(&u)), Route::Collaborators(3));
    }

    #[test]
    fn login_is_always_reachable() {
        assert_eq!(resolve(Route::Login, None), Route::Login);
        let u = user();
        assert_eq!(resolve(Route::Login, Some(&u)), Route::Login);
    }
}
