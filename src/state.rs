use chrono::{DateTime, Local};

use crate::spotify::{FetchOutcome, TrackSnapshot, Unavailable};

/// What the widget currently shows
#[derive(Debug, Default, Clone, PartialEq)]
pub enum NowPlaying {
    /// No poll has finished yet
    #[default]
    Loading,
    Polled {
        outcome: FetchOutcome,
        /// When the outcome was received, used to advance progress between polls
        at: DateTime<Local>,
    },
}

impl NowPlaying {
    /// Replace the previous outcome. Returns true if what is shown changed.
    pub fn update(&mut self, outcome: FetchOutcome) -> bool {
        self.update_at(outcome, Local::now())
    }

    pub fn update_at(&mut self, outcome: FetchOutcome, at: DateTime<Local>) -> bool {
        let changed = self.outcome() != Some(&outcome);
        *self = NowPlaying::Polled { outcome, at };
        changed
    }

    pub fn outcome(&self) -> Option<&FetchOutcome> {
        match self {
            NowPlaying::Loading => None,
            NowPlaying::Polled { outcome, .. } => Some(outcome),
        }
    }

    pub fn track(&self) -> Option<&TrackSnapshot> {
        self.outcome().and_then(FetchOutcome::track)
    }

    pub fn unavailable(&self) -> Option<&Unavailable> {
        self.outcome().and_then(FetchOutcome::unavailable)
    }

    /// Elapsed playback in milliseconds at `now`.
    ///
    /// While playing, the time since the poll is added, capped at the track duration.
    pub fn progress_at(&self, now: DateTime<Local>) -> u64 {
        match self {
            NowPlaying::Polled {
                outcome: FetchOutcome::Track(track),
                at,
            } => {
                let mut progress = track.progress_ms;
                if track.is_playing {
                    progress = progress.saturating_add((now - *at).num_milliseconds().max(0) as u64);
                }
                progress.min(track.duration_ms)
            }
            _ => 0,
        }
    }
}
