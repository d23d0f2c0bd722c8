use crate::config::AppConfig;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// Thin JSON client over the REST backend. Cheap to clone; the underlying
/// connection pool is shared.
#[derive(Clone)]
pub struct Api {
    client: Arc<Client>,
    base_url: String,
    suggestions_url: String,
}

impl Api {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            suggestions_url: config.suggestions_url.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Request failed with status {}: {}", status, body);
            return Err(ApiError::Status { status, body });
        }
        Ok(response)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.url(path)).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn post_json<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn put_json<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.client.put(self.url(path)).json(body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    // ===== PROJECTS =====

    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_json("/projects").await
    }

    pub async fn get_project(&self, project_id: u64) -> Result<Project, ApiError> {
        self.get_json(&format!("/projects/{}", project_id)).await
    }

    pub async fn create_project(&self, project: &NewProject) -> Result<Project, ApiError> {
        self.post_json("/projects", project).await
    }

    /// Full-object replacement; the caller re-sends every field.
    pub async fn update_project(&self, project: &Project) -> Result<Project, ApiError> {
        self.put_json(&format!("/projects/{}", project.id), project).await
    }

    // ===== USERS =====

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json("/users").await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        self.post_json("/users", user).await
    }

    // ===== TASKS =====

    pub async fn tasks_for_project(&self, project_id: u64) -> Result<Vec<Task>, ApiError> {
        self.get_json(&format!("/tasks?project_id={}", project_id)).await
    }

    pub async fn create_task(&self, task: &TaskPayload) -> Result<Task, ApiError> {
        self.post_json("/tasks", task).await
    }

    /// Full-object replacement; the id stays the one in the path.
    pub async fn update_task(&self, task_id: u64, task: &TaskPayload) -> Result<Task, ApiError> {
        self.put_json(&format!("/tasks/{}", task_id), task).await
    }

    pub async fn delete_task(&self, task_id: u64) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/tasks/{}", task_id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    // ===== SUGGESTIONS =====

    /// Fetches collaborator suggestions from the external random-identity
    /// service. The URL is absolute and already carries the result count.
    pub async fn fetch_suggestions(&self) -> Result<Vec<Suggestion>, ApiError> {
        let response = self.client.get(&self.suggestions_url).send().await?;
        let page: SuggestionPage = Self::check(response).await?.json().await?;
        Ok(page.results)
    }
}

// Data models mirroring the backend schema

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub creator_id: u64,
    #[serde(default)]
    pub collaborators: Vec<u64>,
}

impl Project {
    pub fn is_creator(&self, user_id: u64) -> bool {
        self.creator_id == user_id
    }

    /// Creator or listed collaborator.
    pub fn is_visible_to(&self, user_id: u64) -> bool {
        self.creator_id == user_id || self.collaborators.contains(&user_id)
    }

    /// No duplicate check: retried adds can produce duplicate ids, matching
    /// the backend contract.
    pub fn with_collaborator(mut self, user_id: u64) -> Self {
        self.collaborators.push(user_id);
        self
    }

    /// Removing an absent id is a no-op.
    pub fn without_collaborator(mut self, user_id: u64) -> Self {
        self.collaborators.retain(|&id| id != user_id);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub status: TaskStatus,
    pub due_date: chrono::NaiveDate,
    pub image_url: String,
    pub project_id: u64,
    pub creator_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "todo")]
    Todo,
    #[serde(rename = "in_progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    /// Display label, matching the product's select options.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "A Fazer",
            TaskStatus::InProgress => "Em Progresso",
            TaskStatus::Done => "Concluída",
        }
    }
}

// Create payloads carry no id; the backend assigns it.

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub creator_id: u64,
    pub collaborators: Vec<u64>,
}

/// Body for both task creation and full-object task replacement.
#[derive(Debug, Clone, Serialize)]
pub struct TaskPayload {
    pub title: String,
    pub status: TaskStatus,
    pub due_date: chrono::NaiveDate,
    pub image_url: String,
    pub project_id: u64,
    pub creator_id: u64,
}

#[derive(Debug, Deserialize)]
struct SuggestionPage {
    results: Vec<Suggestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Suggestion {
    pub name: SuggestionName,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionName {
    pub first: String,
    pub last: String,
}

impl Suggestion {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.first, self.name.last)
    }
}
