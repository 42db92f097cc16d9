//! Client for the remote user service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{UserId, UserRecord},
    error::RemoteError,
    protocol::{ErrorBody, RemoteUser, UserPayload},
};
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com/users";

#[async_trait]
pub trait UserService: Send + Sync {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, RemoteError>;
    async fn create_user(&self, user: &UserPayload) -> Result<(), RemoteError>;
    async fn update_user(&self, user: &UserPayload) -> Result<(), RemoteError>;
    async fn delete_user(&self, id: UserId) -> Result<(), RemoteError>;
}

pub struct HttpUserService {
    http: Client,
    base_url: String,
}

impl HttpUserService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RemoteError::Request(err.to_string()))?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn user_url(&self, id: UserId) -> String {
        format!("{}/{}", self.base_url, id.0)
    }
}

#[async_trait]
impl UserService for HttpUserService {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, RemoteError> {
        let response = self
            .http
            .get(&self.base_url)
            .send()
            .await
            .map_err(map_send_error)?;
        let users: Vec<RemoteUser> = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|err| RemoteError::Request(err.to_string()))?;
        debug!(count = users.len(), "fetched users");
        Ok(users.into_iter().map(UserRecord::from).collect())
    }

    async fn create_user(&self, user: &UserPayload) -> Result<(), RemoteError> {
        let response = self
            .http
            .post(&self.base_url)
            .json(user)
            .send()
            .await
            .map_err(map_send_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn update_user(&self, user: &UserPayload) -> Result<(), RemoteError> {
        let response = self
            .http
            .put(self.user_url(user.id))
            .json(user)
            .send()
            .await
            .map_err(map_send_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), RemoteError> {
        let response = self
            .http
            .delete(self.user_url(id))
            .send()
            .await
            .map_err(map_send_error)?;
        ensure_success(response).await?;
        Ok(())
    }
}

/// Turns a non-2xx response into [`RemoteError::Server`], keeping the
/// service's `message` when the body carries one.
async fn ensure_success(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.text().await {
        Ok(body) => serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.is_empty()),
        Err(_) => None,
    };
    warn!(status = status.as_u16(), ?message, "user service returned error status");
    Err(RemoteError::Server {
        status: status.as_u16(),
        message,
    })
}

/// Errors raised while sending. A request that never got built keeps its own
/// message; anything that failed on the wire counts as no response.
fn map_send_error(err: reqwest::Error) -> RemoteError {
    if err.is_builder() {
        RemoteError::Request(err.to_string())
    } else {
        warn!(error = %err, "user service unreachable");
        RemoteError::NoResponse
    }
}

#[cfg(test)]
#[path = "tests/remote_tests.rs"]
mod tests;
