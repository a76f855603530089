use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;

use nowify::app::App;
use nowify::config::Config;
use nowify::logging::{self, LogTarget};
use nowify::spotify::{Credentials, NowPlayingFetcher};
use nowify::{tui, ui};

/// Show the track currently playing on Spotify
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Poll once, print the result, and exit
    #[arg(long)]
    once: bool,
    /// Seconds between polls, overrides the config file
    #[arg(short, long)]
    interval: Option<u64>,
    /// Path to a config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.once {
        color_eyre::install()?;
        logging::init(LogTarget::Stderr)?;
    } else {
        tui::install_hooks()?;
        logging::init(LogTarget::File)?;
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(interval) = cli.interval {
        if interval == 0 {
            return Err(nowify::Error::config("interval must be at least 1 second").into());
        }
        config = config.interval(interval);
    }
    let credentials = Credentials::from_env()?;

    if cli.once {
        let outcome = NowPlayingFetcher::from_config(&config, credentials)
            .fetch_now_playing()
            .await;
        println!("{}", ui::plain(&outcome));
        return Ok(());
    }

    App::new(&config, credentials).run().await
}
