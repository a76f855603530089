use base64::Engine;
use serde::Deserialize;

use crate::Error;

/// Spotify app credentials plus the long lived refresh token of the user
/// whose playback is shown.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub refresh_token: String,
}

impl Credentials {
    pub fn new(client_id: &str, client_secret: &str, refresh_token: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            refresh_token: refresh_token.to_string(),
        }
    }

    /// Read `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`, and `SPOTIFY_REFRESH_TOKEN`,
    /// loading a `.env` file first if one exists.
    ///
    /// Missing values are left empty. Spotify rejects them on the first poll.
    pub fn from_env() -> Result<Self, Error> {
        if let Err(err) = dotenvy::dotenv() {
            log::debug!("no .env file loaded: {err}");
        }

        let credentials: Credentials = envy::prefixed("SPOTIFY_").from_env()?;
        credentials.warn_missing();
        Ok(credentials)
    }

    pub fn from_vars<I: IntoIterator<Item = (String, String)>>(vars: I) -> Result<Self, Error> {
        let credentials: Credentials = envy::prefixed("SPOTIFY_").from_iter(vars)?;
        credentials.warn_missing();
        Ok(credentials)
    }

    /// Names of the variables that were not supplied
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("SPOTIFY_CLIENT_ID", &self.client_id),
            ("SPOTIFY_CLIENT_SECRET", &self.client_secret),
            ("SPOTIFY_REFRESH_TOKEN", &self.refresh_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    fn warn_missing(&self) {
        for name in self.missing() {
            log::warn!("{name} is not set, spotify requests will fail");
        }
    }

    /// Base64 of `client_id:client_secret` for the `Basic` authorization header
    pub fn auth(&self) -> String {
        let auth = format!("{}:{}", self.client_id, self.client_secret);
        base64::engine::general_purpose::STANDARD.encode(auth.as_bytes())
    }
}
