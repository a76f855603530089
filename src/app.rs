use std::time::Duration;

use ratatui::Frame;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::action::Action;
use crate::config::Config;
use crate::event::EventHandler;
use crate::poller::{PollHandle, Poller};
use crate::spotify::{Credentials, FetchOutcome, NowPlayingFetcher};
use crate::state::NowPlaying;
use crate::tui;
use crate::ui;

pub struct App {
    /// App should quit on next event loop
    should_quit: bool,
    state: NowPlaying,
    /// Poll results, newest last
    outcomes: UnboundedReceiver<FetchOutcome>,
    poll: PollHandle,
}

impl App {
    /// Start polling right away so the first result is ready by the first draw.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn new(config: &Config, credentials: Credentials) -> Self {
        let fetcher = NowPlayingFetcher::from_config(config, credentials);
        let (tx, rx) = mpsc::unbounded_channel();
        let poll = Poller::new(fetcher, config.period())
            .overlap(config.overlap)
            .spawn(tx);

        Self {
            should_quit: false,
            state: NowPlaying::default(),
            outcomes: rx,
            poll,
        }
    }

    pub fn state(&self) -> &NowPlaying {
        &self.state
    }

    fn update(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Refresh => self.poll.refresh(),
            Action::OpenSong => {
                if let Some(url) = self.state.track().map(|t| t.song_url.as_str()) {
                    if let Err(e) = open::that(url) {
                        log::error!("failed to open {url}: {e}");
                    }
                }
            }
            Action::Render | Action::Tick | Action::None => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        ui::now_playing_ui(&self.state, frame);
    }

    pub async fn run(mut self) -> color_eyre::Result<()> {
        let mut terminal = tui::init()?;
        let mut events = EventHandler::new(Duration::from_millis(250), Duration::from_millis(100));

        let result = loop {
            tokio::select! {
                event = events.next() => {
                    let Some(event) = event else {
                        break Ok(());
                    };
                    match Action::from(event) {
                        Action::Render => {
                            if let Err(e) = terminal.draw(|frame| self.draw(frame)) {
                                break Err(e);
                            }
                        }
                        action => self.update(action),
                    }
                }
                Some(outcome) = self.outcomes.recv() => {
                    if self.state.update(outcome) {
                        log::debug!("now playing state changed");
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        self.poll.shutdown().await;
        tui::restore()?;
        Ok(result?)
    }
}
