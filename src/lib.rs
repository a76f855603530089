pub mod action;
pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod poller;
pub mod spotify;
pub mod state;
pub mod tui;
pub mod ui;

pub use error::Error;
