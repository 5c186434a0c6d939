//! Client for the identity provider's email/password endpoints.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ClientError;

/// A signed-in session as returned by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds until the access token expires.
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub email: Option<String>,
}

/// Client for the identity provider REST endpoints.
pub struct AuthClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl AuthClient {
    /// Creates a new client for the given project URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::Api`] if `project_url` is not
    /// a valid URL.
    pub fn new(project_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("pulselens/0.1 (mention-tracking)")
            .build()?;

        let normalised = format!("{}/", project_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ClientError::Api(format!("invalid project URL '{project_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Signs in with email and password.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Auth`] with the provider's human-readable message if
    ///   the credentials are rejected.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if a success response does not match
    ///   the expected session shape.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let mut url = self
            .base_url
            .join("auth/v1/token")
            .map_err(|e| ClientError::Api(format!("invalid auth URL: {e}")))?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .client
            .post(url.clone())
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Auth(extract_auth_message(&body)));
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Signs out the session behind `access_token`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] on network failure or a non-2xx status.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), ClientError> {
        let url = self
            .base_url
            .join("auth/v1/logout")
            .map_err(|e| ClientError::Api(format!("invalid auth URL: {e}")))?;

        self.client
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// Pulls the human-readable message out of an auth error body.
///
/// The provider has used a few shapes over time (`error_description`, `msg`,
/// `error`); fall through them before giving up on the raw body.
fn extract_auth_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    if let Some(obj) = parsed {
        for key in ["error_description", "msg", "error", "message"] {
            if let Some(msg) = obj.get(key).and_then(Value::as_str) {
                return msg.to_string();
            }
        }
    }
    if body.is_empty() {
        "sign-in rejected".to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_auth_message_prefers_error_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(extract_auth_message(body), "Invalid login credentials");
    }

    #[test]
    fn extract_auth_message_falls_back_to_msg() {
        let body = r#"{"code":400,"msg":"Email not confirmed"}"#;
        assert_eq!(extract_auth_message(body), "Email not confirmed");
    }

    #[test]
    fn extract_auth_message_handles_non_json() {
        assert_eq!(extract_auth_message("gateway timeout"), "gateway timeout");
        assert_eq!(extract_auth_message(""), "sign-in rejected");
    }
}
