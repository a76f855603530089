use chrono::{DateTime, Local};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};
use ratatui::Frame;

use crate::spotify::{FetchOutcome, TrackSnapshot, Unavailable};
use crate::state::NowPlaying;

const SPOTIFY_GREEN: Color = Color::Rgb(29, 185, 84);

/// `m:ss`, minutes are not wrapped into hours
pub fn format_duration(ms: u64) -> String {
    format!("{}:{:0>2}", ms / 60_000, (ms / 1000) % 60)
}

/// `1:05 / 3:05`
pub fn time_label(progress_ms: u64, duration_ms: u64) -> String {
    format!(
        "{} / {}",
        format_duration(progress_ms),
        format_duration(duration_ms)
    )
}

/// Single poll result as printed by `--once`
pub fn plain(outcome: &FetchOutcome) -> String {
    match outcome {
        FetchOutcome::Track(track) => {
            format!(
                "{} - {} ({}) [{}]\n{}",
                track.title,
                track.artist,
                time_label(track.progress_ms, track.duration_ms),
                if track.is_playing { "playing" } else { "paused" },
                track.song_url,
            )
        }
        FetchOutcome::Unavailable(reason) => reason.to_string(),
    }
}

pub fn now_playing_ui(state: &NowPlaying, frame: &mut Frame) {
    let area = centered_rect(frame.size(), 60, 8);
    frame.render_widget(
        NowPlayingCard {
            state,
            now: Local::now(),
        },
        area,
    );
}

fn centered_rect(r: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1])[1]
}

pub struct NowPlayingCard<'a> {
    pub state: &'a NowPlaying,
    pub now: DateTime<Local>,
}

impl Widget for NowPlayingCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Now Playing ");
        let inner = block.inner(area);
        block.render(area, buf);

        match self.state {
            NowPlaying::Loading => message(
                Span::styled("Loading...", Style::default().dark_gray()),
                inner,
                buf,
            ),
            NowPlaying::Polled {
                outcome: FetchOutcome::Unavailable(reason),
                ..
            } => {
                let style = match reason {
                    Unavailable::NotPlaying => Style::default().dark_gray(),
                    _ => Style::default().red(),
                };
                message(Span::styled(reason.to_string(), style), inner, buf);
            }
            NowPlaying::Polled {
                outcome: FetchOutcome::Track(track),
                ..
            } => {
                let progress = self.state.progress_at(self.now);
                render_track(track, progress, inner, buf);
            }
        }
    }
}

fn message(text: Span<'_>, area: Rect, buf: &mut Buffer) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Line::from(text))
        .alignment(Alignment::Center)
        .render(rows[1], buf);
}

fn render_track(track: &TrackSnapshot, progress: u64, area: Rect, buf: &mut Buffer) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(track.title.clone())
        .style(Style::default().bold())
        .render(rows[0], buf);
    Paragraph::new(track.artist.clone())
        .style(Style::default().italic().gray())
        .render(rows[1], buf);

    ProgressBar {
        current: progress,
        total: track.duration_ms,
    }
    .render(rows[2], buf);

    let status = if track.is_playing {
        Span::styled("▶ Playing", Style::default().fg(SPOTIFY_GREEN))
    } else {
        Span::styled("⏸ Paused", Style::default().dark_gray())
    };
    Paragraph::new(Line::from(status)).render(rows[3], buf);

    Paragraph::new(Line::from(vec![
        Span::styled("Open in Spotify [o]", Style::default().fg(SPOTIFY_GREEN)),
        "  ".into(),
        Span::styled(track.album_image_url.clone(), Style::default().dark_gray()),
    ]))
    .render(rows[4], buf);
}

/// `1:05 ───────┄┄┄┄┄ 3:05`
pub struct ProgressBar {
    pub current: u64,
    pub total: u64,
}

impl Widget for ProgressBar {
    fn render(mut self, area: Rect, buf: &mut Buffer) {
        if self.current > self.total {
            self.current = self.total;
        }

        let time_prog = format_duration(self.current);
        let time_dur = format_duration(self.total);
        // width - padding - time_progress - time_duration
        let rw = (area.width as usize)
            .saturating_sub(2 + time_prog.chars().count() + time_dur.chars().count());
        let progress = if self.total == 0 {
            0
        } else {
            (self.current as u128 * rw as u128 / self.total as u128) as usize
        };
        let remaining = rw - progress;

        Paragraph::new(Line::from(vec![
            time_prog.bold(),
            " ".into(),
            "─".repeat(progress).fg(SPOTIFY_GREEN).bold(),
            "┄".repeat(remaining).dark_gray(),
            " ".into(),
            time_dur.bold(),
        ]))
        .render(area, buf);
    }
}
