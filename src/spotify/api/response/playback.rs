use std::collections::HashMap;

use serde::Deserialize;

use super::Image;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimplifiedArtist {
    pub name: String,
    pub id: Option<String>,
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Album {
    pub name: Option<String>,
    /// Cover art, widest first
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    pub album: Album,
    pub artists: Vec<SimplifiedArtist>,
    pub duration_ms: u64,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
    pub name: String,
}

/// Body of `GET /me/player/currently-playing`
///
/// `item` is required: spotify sends `null` for ads and for episodes unless they
/// are requested through `additional_types`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentlyPlaying {
    #[serde(default)]
    pub is_playing: bool,
    /// `null` for some contexts, e.g. a private session
    pub progress_ms: Option<u64>,
    pub timestamp: Option<i64>,
    pub currently_playing_type: Option<String>,
    pub item: Track,
}

impl Track {
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<&str>>()
            .join(", ")
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.album.images.first().map(|image| image.url.as_str())
    }

    pub fn spotify_url(&self) -> Option<&str> {
        self.external_urls.get("spotify").map(String::as_str)
    }
}
