use mindmap_shared::api::{
    AuthResponse, CreateProjectRequest, LoginRequest, ProjectSummary, RegisterRequest,
    RenameProjectRequest, SaveResponse,
};
use mindmap_shared::{MapError, MindmapDocument, MindmapSummary, VotingDocument};
use reqwest::{Client, StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    Unauthorized,
    #[error("Access forbidden")]
    Forbidden,
    #[error("Resource not found")]
    NotFound,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl From<MapError> for ApiError {
    fn from(err: MapError) -> Self {
        match err {
            MapError::Validation(msg) => ApiError::Validation(msg),
            MapError::NotFound => ApiError::NotFound,
            MapError::PermissionDenied => ApiError::Forbidden,
        }
    }
}

/// HTTP gateway to the mindmap server. Stateless; every method takes
/// `&self`, so a single client can be shared across tasks.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build URL for endpoint
    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Handle API response
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        match status {
            StatusCode::OK | StatusCode::CREATED => {
                response.json().await.map_err(ApiError::Network)
            }
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let text = response.text().await.unwrap_or_default();
                Err(ApiError::Validation(text))
            }
            StatusCode::CONFLICT => {
                let text = response.text().await.unwrap_or_default();
                Err(ApiError::Conflict(text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ApiError::Server(format!("{}: {}", status, text)))
            }
        }
    }

    // ============ Auth ============

    pub async fn register(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let req = RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(&req)
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let req = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&req)
            .send()
            .await?;
        self.handle_response(response).await
    }

    // ============ Projects ============

    pub async fn list_projects(&self) -> Result<Vec<ProjectSummary>, ApiError> {
        let response = self.client.get(self.url("/projects")).send().await?;
        self.handle_response(response).await
    }

    pub async fn create_project(&self, name: &str) -> Result<ProjectSummary, ApiError> {
        let req = CreateProjectRequest {
            name: name.to_string(),
        };
        let response = self
            .client
            .post(self.url("/projects"))
            .json(&req)
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn rename_project(
        &self,
        project_id: &str,
        new_name: &str,
    ) -> Result<ProjectSummary, ApiError> {
        let req = RenameProjectRequest {
            name: new_name.to_string(),
        };
        let response = self
            .client
            .put(self.url(&format!("/projects/{}", project_id)))
            .json(&req)
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/projects/{}", project_id)))
            .send()
            .await?;
        let _: SaveResponse = self.handle_response(response).await?;
        Ok(())
    }

    // ============ Mindmaps ============

    pub async fn list_mindmaps(&self, project_id: &str) -> Result<Vec<MindmapSummary>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/projects/{}/mindmaps", project_id)))
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn load_mindmap(
        &self,
        project_id: &str,
        mindmap_id: &str,
    ) -> Result<MindmapDocument, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/projects/{}/mindmaps/{}", project_id, mindmap_id)))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Full-document save. The server overwrites whatever is stored, so
    /// the caller must send the entire document every time.
    pub async fn save_mindmap(
        &self,
        project_id: &str,
        mindmap_id: &str,
        doc: &MindmapDocument,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/projects/{}/mindmaps/{}", project_id, mindmap_id)))
            .json(doc)
            .send()
            .await?;
        let _: SaveResponse = self.handle_response(response).await?;
        Ok(())
    }

    pub async fn delete_mindmap(&self, project_id: &str, mindmap_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/projects/{}/mindmaps/{}", project_id, mindmap_id)))
            .send()
            .await?;
        let _: SaveResponse = self.handle_response(response).await?;
        Ok(())
    }

    // ============ Voting ============

    pub async fn load_voting(&self, project_id: &str) -> Result<VotingDocument, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/projects/{}/onVoting.json", project_id)))
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn save_voting(
        &self,
        project_id: &str,
        doc: &VotingDocument,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/projects/{}/onVoting.json", project_id)))
            .json(doc)
            .send()
            .await?;
        let _: SaveResponse = self.handle_response(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:3001/");
        assert_eq!(client.url("/projects"), "http://localhost:3001/api/projects");
    }
}
