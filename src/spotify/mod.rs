pub use auth::{AccessToken, TokenProvider, TokenResponse, TokenStatusPolicy};
pub use credentials::Credentials;
pub use now_playing::{FetchOutcome, NowPlayingFetcher, TrackSnapshot, Unavailable};

pub mod api;
pub mod auth;
mod credentials;
pub mod now_playing;

pub static TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub static NOW_PLAYING_URL: &str = "https://api.spotify.com/v1/me/player/currently-playing";
