use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{User, UserId},
    error::{ApiError, ApiException},
    protocol::{user_route, users_route, CreateUserRequest, UpdateUserRequest},
};
use tracing::debug;
use url::Url;

/// Remote collaborator that owns user records.
///
/// Calls are independent request/response exchanges; nothing orders two
/// concurrent calls against each other.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_all(&self) -> Result<Vec<User>>;
    async fn create_user(&self, name: &str, email: &str) -> Result<User>;
    async fn update_user(&self, id: UserId, name: &str, email: &str) -> Result<User>;
    async fn delete_user(&self, id: UserId) -> Result<()>;
}

pub struct HttpUserDirectory {
    http: Client,
    server_url: String,
}

impl HttpUserDirectory {
    pub fn new(server_url: &str) -> Result<Self> {
        let parsed = Url::parse(server_url.trim())
            .with_context(|| format!("invalid server url '{server_url}'"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("server url must use http or https, got '{}'", parsed.scheme());
        }
        if parsed.host_str().is_none() {
            bail!("server url '{server_url}' has no host");
        }

        Ok(Self {
            http: Client::new(),
            server_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.server_url)
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn get_all(&self) -> Result<Vec<User>> {
        let response = self.http.get(self.endpoint(users_route())).send().await?;
        decode(response).await
    }

    async fn create_user(&self, name: &str, email: &str) -> Result<User> {
        debug!("creating user");
        let response = self
            .http
            .post(self.endpoint(users_route()))
            .json(&CreateUserRequest {
                name: name.to_string(),
                email: email.to_string(),
            })
            .send()
            .await?;
        decode(response).await
    }

    async fn update_user(&self, id: UserId, name: &str, email: &str) -> Result<User> {
        debug!(user_id = id.0, "updating user");
        let response = self
            .http
            .put(self.endpoint(&user_route(id)))
            .json(&UpdateUserRequest {
                name: name.to_string(),
                email: email.to_string(),
            })
            .send()
            .await?;
        decode(response).await
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        debug!(user_id = id.0, "deleting user");
        let response = self
            .http
            .delete(self.endpoint(&user_route(id)))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = ensure_success(response).await?;
    Ok(response.json().await?)
}

/// Turns a non-2xx response into an error, preferring the server's
/// `ApiError` body when it has one.
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    match serde_json::from_slice::<ApiError>(&body) {
        Ok(api_error) => Err(anyhow::Error::new(ApiException::from(api_error))
            .context(format!("server responded with {status}"))),
        Err(_) => Err(anyhow!(
            "server responded with {status}: {}",
            String::from_utf8_lossy(&body)
        )),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
