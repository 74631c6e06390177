use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::Config;
use crate::models::{Poll, PollResults, TeamBranding, Video, Workout, WorkoutEntry};

mod error;
mod retry;

pub use error::ApiError;
pub use retry::RetryConfig;

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub position: Option<String>,
}

#[derive(Debug, Serialize)]
struct RefreshTokenRequest {
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct RefreshTokenResponse {
    access_token: String,
    refresh_token: String,
}

/// Workout as the server returns it; converted into the local mirror shape
#[derive(Debug, Deserialize)]
pub struct RemoteWorkout {
    pub id: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub entries: Vec<WorkoutEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RemoteWorkout {
    pub fn into_local(self) -> Workout {
        Workout {
            id: self.id,
            date: self.date,
            notes: self.notes,
            entries: self.entries,
            synced: true,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// API client for communicating with the TeamTrack backend
pub struct ApiClient {
    client: Client,
    base_url: String,
    config: Arc<Mutex<Config>>,
    retry_config: RetryConfig,
}

impl ApiClient {
    pub fn new(config: Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.api.timeout_seconds);
        let base_url = config.api.base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            config: Arc::new(Mutex::new(config)),
            retry_config: RetryConfig::default(),
        })
    }

    /// Connectivity probe; any healthy response counts as online
    pub async fn is_online(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let url = format!("{}/api/auth/login", self.base_url);
        let email = email.to_string();
        let password = password.to_string();

        tracing::debug!("Logging in as {email}");

        self.retry_config
            .execute(|| async {
                let request = LoginRequest {
                    email: email.clone(),
                    password: password.clone(),
                };

                let response = self
                    .client
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .context("Failed to send login request")?;

                let status = response.status();

                if status.is_success() {
                    let login_response: LoginResponse = response
                        .json()
                        .await
                        .context("Failed to parse login response")?;

                    {
                        let mut config = self.config.lock().unwrap();
                        config.set_tokens(
                            login_response.access_token.clone(),
                            login_response.refresh_token.clone(),
                        );
                        config.save()?;
                    }

                    tracing::info!("Logged in as {email}");
                    Ok(login_response)
                } else {
                    let error_text = response.text().await.unwrap_or_default();
                    Err(ApiError::from_status(status, error_text).into())
                }
            })
            .await
    }

    pub async fn logout(&self) -> Result<()> {
        let response = self.post_empty("/api/auth/logout").await?;

        // A dead token on the server side is fine; the local state is what
        // matters for logout.
        if !response.status().is_success() && response.status() != StatusCode::UNAUTHORIZED {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, error_text).into());
        }

        let mut config = self.config.lock().unwrap();
        config.clear_tokens();
        config.save()?;

        Ok(())
    }

    pub async fn whoami(&self) -> Result<UserInfo> {
        let response = self.get("/api/auth/me").await?;
        let status = response.status();

        if status.is_success() {
            Ok(response
                .json()
                .await
                .context("Failed to parse user info response")?)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, error_text).into())
        }
    }

    // Typed resource calls used by the sync engine

    pub async fn list_workouts(&self) -> Result<Vec<Workout>> {
        let remote: Vec<RemoteWorkout> = self.get_json("/api/workouts?limit=100").await?;
        Ok(remote.into_iter().map(RemoteWorkout::into_local).collect())
    }

    pub async fn create_workout(&self, payload: &serde_json::Value) -> Result<Workout> {
        let response = self.post("/api/workouts", payload).await?;
        let status = response.status();

        if status.is_success() {
            let remote: RemoteWorkout = response
                .json()
                .await
                .context("Failed to parse workout response")?;
            Ok(remote.into_local())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, error_text).into())
        }
    }

    pub async fn delete_workout(&self, id: &str) -> Result<()> {
        let response = self.delete(&format!("/api/workouts/{id}")).await?;
        let status = response.status();

        // Already gone server-side counts as done.
        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, error_text).into())
        }
    }

    pub async fn list_polls(&self) -> Result<Vec<Poll>> {
        self.get_json("/api/polls").await
    }

    pub async fn get_poll(&self, id: &str) -> Result<PollResults> {
        self.get_json(&format!("/api/polls/{id}")).await
    }

    pub async fn vote(&self, poll_id: &str, choice: &str) -> Result<()> {
        let payload = serde_json::json!({ "choice": choice });
        let response = self
            .post(&format!("/api/polls/{poll_id}/vote"), &payload)
            .await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, error_text).into())
        }
    }

    pub async fn list_videos(&self) -> Result<Vec<Video>> {
        self.get_json("/api/videos").await
    }

    pub async fn team_branding(&self) -> Result<TeamBranding> {
        let url = format!("{}/api/team-settings", self.base_url);

        // Branding is public; no bearer token needed.
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch team branding")?;
        let status = response.status();

        if status.is_success() {
            Ok(response
                .json()
                .await
                .context("Failed to parse team branding")?)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, error_text).into())
        }
    }

    // Authenticated request plumbing with automatic token refresh

    fn bearer_token(&self) -> Result<String> {
        let config = self.config.lock().unwrap();
        if !config.is_authenticated() {
            return Err(anyhow::anyhow!("Not logged in"));
        }
        Ok(config.auth.token.clone())
    }

    async fn try_refresh_token(&self) -> Result<String> {
        let refresh_token = {
            let config = self.config.lock().unwrap();
            if config.auth.refresh_token.is_empty() {
                return Err(anyhow::anyhow!("No refresh token available"));
            }
            config.auth.refresh_token.clone()
        };

        let url = format!("{}/api/auth/refresh", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RefreshTokenRequest { refresh_token })
            .send()
            .await
            .context("Failed to send refresh token request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, error_text).into());
        }

        let refresh_response: RefreshTokenResponse = response
            .json()
            .await
            .context("Failed to parse refresh response")?;

        {
            let mut config = self.config.lock().unwrap();
            config.set_tokens(
                refresh_response.access_token.clone(),
                refresh_response.refresh_token,
            );
            config.save()?;
        }

        tracing::debug!("Refreshed access token");
        Ok(refresh_response.access_token)
    }

    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let token = self.bearer_token()?;

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .context("Failed to send GET request")?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let new_token = self.try_refresh_token().await?;
            let response = self
                .client
                .get(&url)
                .bearer_auth(&new_token)
                .send()
                .await
                .context("Failed to retry GET request after token refresh")?;
            return Ok(response);
        }

        Ok(response)
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let token = self.bearer_token()?;

        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(body)
            .send()
            .await
            .context("Failed to send POST request")?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let new_token = self.try_refresh_token().await?;
            let response = self
                .client
                .post(&url)
                .bearer_auth(&new_token)
                .json(body)
                .send()
                .await
                .context("Failed to retry POST request after token refresh")?;
            return Ok(response);
        }

        Ok(response)
    }

    async fn post_empty(&self, path: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let token = self.bearer_token()?;

        self.client
            .post(&url)
            .bearer_auth(&token)
            .send()
            .await
            .context("Failed to send POST request")
    }

    pub async fn delete(&self, path: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let token = self.bearer_token()?;

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&token)
            .send()
            .await
            .context("Failed to send DELETE request")?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let new_token = self.try_refresh_token().await?;
            let response = self
                .client
                .delete(&url)
                .bearer_auth(&new_token)
                .send()
                .await
                .context("Failed to retry DELETE request after token refresh")?;
            return Ok(response);
        }

        Ok(response)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.get(path).await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await.context("Failed to parse response")?)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, error_text).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_client_creation() {
        let config = Config::default();
        let client = ApiClient::new(config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let mut config = Config::default();
        config.api.base_url = "http://localhost:3000/".to_string();

        let client = ApiClient::new(config).unwrap();
        assert_eq!(client.base_url, "http://localhost:3000");
    }
}
