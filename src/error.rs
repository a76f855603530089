use std::fmt::{Display, Formatter};

use color_eyre::{Report, Section};
pub use color_eyre::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Network, DNS, or TLS failure while talking to spotify
    Transport(String),
    /// Response body was not json or did not have the expected shape
    Json(String),
    /// The token endpoint refused the refresh grant
    Auth { code: u16, message: String },
    /// Token response parsed but carried no access token
    MissingAccessToken(String),
    Config(String),
    Io(String),
}

impl Error {
    pub fn config<S: Display>(message: S) -> Self {
        Error::Config(message.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Transport(message) => write!(f, "{message}"),
            Error::Json(message) => write!(f, "{message}"),
            Error::Auth { code, message } => write!(f, "[{code}] {message}"),
            Error::MissingAccessToken(message) => write!(f, "{message}"),
            Error::Config(message) => write!(f, "invalid configuration: {message}"),
            Error::Io(message) => write!(f, "{message}"),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Transport(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Json(value.to_string())
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for Error {
    fn from(value: serde_path_to_error::Error<serde_json::Error>) -> Self {
        Error::Json(value.to_string())
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(value: serde_urlencoded::ser::Error) -> Self {
        Error::Transport(value.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(value: serde_yaml::Error) -> Self {
        Error::Config(value.to_string())
    }
}

impl From<envy::Error> for Error {
    fn from(value: envy::Error) -> Self {
        Error::Config(value.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value.to_string())
    }
}

impl From<Error> for Report {
    fn from(value: Error) -> Self {
        match value {
            Error::Transport(e) => Report::msg(e)
                .suggestion("Check the network connection and the configured spotify endpoints"),
            Error::Json(e) => Report::msg(e)
                .suggestion("Spotify responded with an unexpected body"),
            Error::Auth { code, message } => Report::msg(format!("{code}: {message}"))
                .suggestion("The refresh token or client credentials were rejected, generate a new refresh token"),
            Error::MissingAccessToken(e) => Report::msg(e)
                .suggestion("Check SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET, and SPOTIFY_REFRESH_TOKEN"),
            Error::Config(e) => Report::msg(format!("invalid configuration: {e}"))
                .suggestion("Fix or remove the config.yml file"),
            Error::Io(e) => Report::msg(e),
        }
    }
}
