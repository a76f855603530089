use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::api::parse_json;
use super::{Credentials, TOKEN_URL};
use crate::Error;

/// How the token endpoint's http status is treated before its body is parsed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenStatusPolicy {
    /// Non 2xx responses are an [`Error::Auth`]
    #[default]
    Strict,
    /// The json body is returned whatever the status, error bodies included
    PassThrough,
}

/// Body of the token endpoint's response, passed through unexamined.
///
/// An error body from spotify fills `error` and `error_description` instead of
/// `access_token`. Fields not listed here are kept in `extra`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
    pub scope: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenResponse {
    pub fn access_token(&self) -> Result<AccessToken, Error> {
        match self.access_token.as_deref() {
            Some(token) if !token.is_empty() => Ok(AccessToken::new(token)),
            _ => Err(Error::MissingAccessToken(
                self.reason()
                    .unwrap_or("token response did not contain an access token")
                    .to_string(),
            )),
        }
    }

    fn reason(&self) -> Option<&str> {
        self.error_description
            .as_deref()
            .or(self.error.as_deref())
    }
}

/// Short lived bearer credential. Never cached, a new one is requested every poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Get the auth header for the token
    ///
    /// # Example
    ///
    /// `Bearer 1POdFZRZbvb...qqillRxMr2z`
    pub fn to_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

/// Exchanges the refresh token for an access token with the `refresh_token` grant
#[derive(Debug, Clone)]
pub struct TokenProvider {
    client: reqwest::Client,
    credentials: Credentials,
    url: String,
    policy: TokenStatusPolicy,
}

impl TokenProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_client(reqwest::Client::new(), credentials)
    }

    pub fn with_client(client: reqwest::Client, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
            url: TOKEN_URL.to_string(),
            policy: TokenStatusPolicy::default(),
        }
    }

    pub fn url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = url.into();
        self
    }

    pub fn policy(mut self, policy: TokenStatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Build the token request without sending it
    pub fn token_request(&self) -> Result<reqwest::Request, Error> {
        let body = serde_urlencoded::to_string([
            ("grant_type", "refresh_token"),
            ("refresh_token", self.credentials.refresh_token.as_str()),
        ])?;

        Ok(self
            .client
            .post(self.url.as_str())
            .header(AUTHORIZATION, format!("Basic {}", self.credentials.auth()))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .build()?)
    }

    /// Request a new access token. One POST, no retry.
    pub async fn acquire_access_token(&self) -> Result<TokenResponse, Error> {
        let request = self.token_request()?;
        log::debug!("requesting access token from {}", request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() && self.policy == TokenStatusPolicy::Strict {
            return Err(rejected(status, &body));
        }

        parse_json(&body)
    }

    /// Acquire a token for the bearer header.
    ///
    /// Under [`TokenStatusPolicy::PassThrough`] a response without `access_token`
    /// gives an empty token, leaving the rejection to the resource endpoint.
    pub async fn bearer(&self) -> Result<AccessToken, Error> {
        let token = self.acquire_access_token().await?;
        match (token.access_token(), self.policy) {
            (Err(Error::MissingAccessToken(reason)), TokenStatusPolicy::PassThrough) => {
                log::warn!("token response had no access token: {reason}");
                Ok(AccessToken::new(""))
            }
            (result, _) => result,
        }
    }
}

fn rejected(status: StatusCode, body: &[u8]) -> Error {
    let message = parse_json::<TokenResponse>(body)
        .ok()
        .and_then(|token| token.reason().map(str::to_string))
        .or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            (!text.is_empty()).then_some(text)
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("token request failed").to_string());

    Error::Auth {
        code: status.as_u16(),
        message,
    }
}
