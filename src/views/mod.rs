pub mod collaborators;
pub mod dashboard;
pub mod login;
pub mod project_details;

use std::time::{Duration, Instant};

pub const REQUIRED_FIELDS_MSG: &str = "Preencha os campos obrigatórios";
pub const INVALID_DATE_MSG: &str = "Data inválida (use AAAA-MM-DD)";

pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Transient feedback message that expires on its own, independent of any
/// rendering framework. Views hold an `Option<Notice>` and the event loop
/// drops it once expired.
#[derive(Debug, Clone)]
pub struct Notice {
    text: String,
    expires_at: Instant,
}

impl Notice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            expires_at: Instant::now() + NOTICE_TTL,
        }
    }

    #[cfg(test)]
    fn expiring_at(text: &str, expires_at: Instant) -> Self {
        Self {
            text: text.to_string(),
            expires_at,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Drops an expired notice in place. Called once per event-loop tick.
pub fn expire_notice(slot: &mut Option<Notice>) {
    if slot.as_ref().is_some_and(|n| n.is_expired()) {
        *slot = None;
    }
}

/// Result of a form submission that passed through local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    /// Rejected locally; no network write was issued.
    Rejected(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_notice_is_visible() {
        let n = Notice::new("Tarefa criada com sucesso!");
        assert!(!n.is_expired());
        assert_eq!(n.text(), "Tarefa criada com sucesso!");
    }

    #[test]
    fn expired_notice_is_dropped() {
        let mut slot = Some(Notice::expiring_at("antiga", Instant::now() - Duration::from_millis(1)));
        expire_notice(&mut slot);
        assert!(slot.is_none());

        let mut slot = Some(Notice::new("recente"));
        expire_notice(&mut slot);
        assert!(slot.is_some());
    }
}
