use std::fmt::{Display, Formatter};

use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::Serialize;

use super::api::parse_json;
use super::api::response::CurrentlyPlaying;
use super::{Credentials, TokenProvider, NOW_PLAYING_URL};
use crate::config::Config;
use crate::Error;

/// Display ready state of the current track at the time of one poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackSnapshot {
    /// First (widest) album image
    pub album_image_url: String,
    /// Artist names joined with `", "`
    pub artist: String,
    pub is_playing: bool,
    /// `external_urls.spotify` of the track
    pub song_url: String,
    pub title: String,
    pub progress_ms: u64,
    pub duration_ms: u64,
}

impl TryFrom<CurrentlyPlaying> for TrackSnapshot {
    type Error = Unavailable;

    /// Both the cover and the track link are required; without them the body is [`Unavailable::Malformed`].
    fn try_from(playing: CurrentlyPlaying) -> Result<Self, Self::Error> {
        let track = &playing.item;
        let album_image_url = track
            .cover_url()
            .ok_or_else(|| malformed("item.album.images[0].url: missing"))?;
        let song_url = track
            .spotify_url()
            .ok_or_else(|| malformed("item.external_urls.spotify: missing"))?;

        Ok(Self {
            album_image_url: album_image_url.to_string(),
            artist: track.artist_names(),
            is_playing: playing.is_playing,
            song_url: song_url.to_string(),
            title: track.name.clone(),
            progress_ms: playing.progress_ms.unwrap_or(0),
            duration_ms: track.duration_ms,
        })
    }
}

fn malformed(message: &str) -> Unavailable {
    Unavailable::Malformed {
        message: message.to_string(),
    }
}

/// Why a poll produced no track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    /// 204 from the player endpoint
    NotPlaying,
    /// The player endpoint answered with a status above 400
    UpstreamFailure { status: u16 },
    /// No usable access token could be obtained
    Unauthorized { message: String },
    /// Network, DNS, or TLS failure on either request
    Transport { message: String },
    /// The player body was not the expected json shape
    Malformed { message: String },
}

impl Display for Unavailable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Unavailable::NotPlaying => write!(f, "Currently Not Playing"),
            Unavailable::UpstreamFailure { .. } => write!(f, "Unable to Fetch Song"),
            Unavailable::Unauthorized { message }
            | Unavailable::Transport { message }
            | Unavailable::Malformed { message } => write!(f, "{message}"),
        }
    }
}

impl From<Error> for Unavailable {
    fn from(value: Error) -> Self {
        match value {
            Error::Auth { .. } | Error::MissingAccessToken(_) => Unavailable::Unauthorized {
                message: value.to_string(),
            },
            Error::Json(message) => Unavailable::Malformed { message },
            Error::Transport(message) | Error::Io(message) => Unavailable::Transport { message },
            Error::Config(_) => Unavailable::Transport {
                message: value.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Track(TrackSnapshot),
    Unavailable(Unavailable),
}

impl FetchOutcome {
    pub fn track(&self) -> Option<&TrackSnapshot> {
        match self {
            FetchOutcome::Track(track) => Some(track),
            FetchOutcome::Unavailable(_) => None,
        }
    }

    pub fn unavailable(&self) -> Option<&Unavailable> {
        match self {
            FetchOutcome::Unavailable(reason) => Some(reason),
            FetchOutcome::Track(_) => None,
        }
    }
}

/// Statuses that end the poll before the body is read.
///
/// Anything at or below 400 other than 204 is parsed as a playback body.
pub fn classify(status: StatusCode) -> Option<Unavailable> {
    if status.as_u16() > 400 {
        Some(Unavailable::UpstreamFailure {
            status: status.as_u16(),
        })
    } else if status == StatusCode::NO_CONTENT {
        Some(Unavailable::NotPlaying)
    } else {
        None
    }
}

/// Fetches `/me/player/currently-playing` with a freshly acquired token
#[derive(Debug, Clone)]
pub struct NowPlayingFetcher {
    client: reqwest::Client,
    tokens: TokenProvider,
    url: String,
}

impl NowPlayingFetcher {
    pub fn new(tokens: TokenProvider) -> Self {
        Self {
            client: tokens.client().clone(),
            tokens,
            url: NOW_PLAYING_URL.to_string(),
        }
    }

    pub fn from_config(config: &Config, credentials: Credentials) -> Self {
        let tokens = TokenProvider::new(credentials)
            .url(config.token_url.as_str())
            .policy(config.token_status);
        Self::new(tokens).url(config.now_playing_url.as_str())
    }

    pub fn url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = url.into();
        self
    }

    /// Run one poll cycle. Failures are logged and returned as [`FetchOutcome::Unavailable`].
    pub async fn fetch_now_playing(&self) -> FetchOutcome {
        match self.try_fetch().await {
            Ok(track) => {
                log::trace!("now playing: {} - {}", track.title, track.artist);
                FetchOutcome::Track(track)
            }
            Err(Unavailable::NotPlaying) => {
                log::info!("currently not playing");
                FetchOutcome::Unavailable(Unavailable::NotPlaying)
            }
            Err(reason) => {
                log::error!("Error fetching currently playing song: {reason:?}");
                FetchOutcome::Unavailable(reason)
            }
        }
    }

    async fn try_fetch(&self) -> Result<TrackSnapshot, Unavailable> {
        let token = self.tokens.bearer().await?;

        let response = self
            .client
            .get(self.url.as_str())
            .header(AUTHORIZATION, token.to_header())
            .send()
            .await
            .map_err(Error::from)?;

        let status = response.status();
        log::debug!("{} responded with {status}", self.url);
        if let Some(reason) = classify(status) {
            return Err(reason);
        }

        let body = response.bytes().await.map_err(Error::from)?;
        let playing: CurrentlyPlaying = parse_json(&body)?;
        TrackSnapshot::try_from(playing)
    }
}
