use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_SUGGESTIONS_URL: &str = "https://randomuser.me/api/?results=3";
pub const DEFAULT_SESSION_FILE: &str = ".painel_session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_url: String,
    pub suggestions_url: String,
    pub session_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let api_url = env::var("API_BASE_URL")
            .map_err(|_| anyhow::anyhow!("API_BASE_URL environment variable not found"))?;

        let suggestions_url =
            env::var("SUGGESTIONS_URL").unwrap_or_else(|_| DEFAULT_SUGGESTIONS_URL.to_string());

        let session_file = env::var("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE));

        Ok(Self {
            api_url,
            suggestions_url,
            session_file,
        })
    }

    pub fn new(api_url: String, suggestions_url: String, session_file: PathBuf) -> Self {
        Self {
            api_url,
            suggestions_url,
            session_file,
        }
    }
}
