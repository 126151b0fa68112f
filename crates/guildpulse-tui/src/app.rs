//! Application core — event loop, refresh lifecycle, action dispatch.

use std::time::{Duration, Instant};

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use guildpulse_core::{Controller, Snapshot, Timestamped, filter_by_range, labels};

use crate::action::{Action, RangeChoice, Toast};
use crate::event::{Event, EventReader};
use crate::theme;
use crate::tui::Tui;

/// Auto-refresh period when enabled.
const AUTO_REFRESH_PERIOD: Duration = Duration::from_secs(30);

/// How long the status values stay highlighted after an update.
const STATUS_PULSE: Duration = Duration::from_millis(1200);

/// Top-level application state and event loop.
pub struct App {
    /// Whether the app should keep running.
    running: bool,
    /// Data facade — refresh tasks get clones of this.
    controller: Controller,
    /// Series as last successfully loaded. Replaced wholesale, never merged.
    snapshot: Snapshot,
    /// Current display window. Affects rendering only.
    range: RangeChoice,
    /// Auto-refresh timer token. `Some` while enabled; cancelling it stops
    /// the timer but not a load it already triggered.
    auto_refresh: Option<CancellationToken>,
    /// Busy flag for the load cycle — concurrent triggers are coalesced so
    /// at most one cycle is in flight at a time.
    refresh_in_flight: bool,
    /// When the status summary last changed, for the pulse highlight.
    status_updated_at: Option<Instant>,
    /// Visible error notices, oldest first.
    toasts: Vec<Toast>,
    /// Action sender — background tasks dispatch through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            controller,
            snapshot: Snapshot::default(),
            range: RangeChoice::default(),
            auto_refresh: None,
            refresh_in_flight: false,
            status_updated_at: None,
            toasts: Vec::new(),
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        // Kick off the initial load; charts render from whatever arrives
        // (possibly nothing) until then.
        self.action_tx.send(Action::Refresh)?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = Self::map_key(key) {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            // Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action);

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        if let Some(token) = self.auto_refresh.take() {
            token.cancel();
        }
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action.
    fn map_key(key: KeyEvent) -> Option<Action> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (KeyModifiers::NONE, KeyCode::Char('q')) => Some(Action::Quit),

            (KeyModifiers::NONE, KeyCode::Char('r')) => Some(Action::Refresh),
            (KeyModifiers::NONE, KeyCode::Char('a')) => Some(Action::ToggleAutoRefresh),

            (KeyModifiers::NONE, KeyCode::Char('t')) => Some(Action::CycleRange),
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='5')) => {
                RangeChoice::from_number(c as u8 - b'0').map(Action::SetRange)
            }

            _ => None,
        }
    }

    /// Process a single action — the only place app state changes.
    fn process_action(&mut self, action: &Action) {
        match action {
            Action::Quit => {
                self.running = false;
                if let Some(token) = self.auto_refresh.take() {
                    token.cancel();
                }
            }

            Action::Resize(..) | Action::Render => {}

            Action::Tick => {
                self.toasts.retain(|t| !t.expired());
            }

            Action::Refresh => {
                if self.begin_refresh() {
                    self.spawn_refresh();
                } else {
                    debug!("load cycle already in flight; trigger coalesced");
                }
            }

            Action::SeriesUpdated(snapshot) => {
                self.refresh_in_flight = false;
                self.snapshot = snapshot.clone();
                // Status summary only changes once both series have data.
                if !self.snapshot.is_incomplete() {
                    self.status_updated_at = Some(Instant::now());
                }
            }

            Action::LoadFailed(message) => {
                self.refresh_in_flight = false;
                // Stored series keep their last-known-good contents.
                self.toasts.push(Toast::new(format!(
                    "Failed to load feed data: {message}"
                )));
            }

            Action::SetRange(choice) => {
                self.range = *choice;
            }

            Action::CycleRange => {
                self.range = self.range.next();
            }

            Action::ToggleAutoRefresh => self.toggle_auto_refresh(),
        }
    }

    /// Claim the load-cycle busy flag. Returns `false` if a cycle is
    /// already running, in which case the trigger is dropped.
    fn begin_refresh(&mut self) -> bool {
        if self.refresh_in_flight {
            return false;
        }
        self.refresh_in_flight = true;
        true
    }

    /// Spawn the load task. Completion comes back as an action.
    fn spawn_refresh(&self) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match controller.refresh().await {
                Ok(snapshot) => {
                    let _ = tx.send(Action::SeriesUpdated(snapshot));
                }
                Err(e) => {
                    warn!(error = %e, "feed refresh failed");
                    let _ = tx.send(Action::LoadFailed(e.to_string()));
                }
            }
        });
    }

    /// Flip the auto-refresh state machine: Disabled ↔ Enabled.
    ///
    /// Enabling starts a 30s timer whose ticks trigger ordinary load cycles;
    /// disabling cancels the timer only — an in-flight load runs to
    /// completion and still lands.
    fn toggle_auto_refresh(&mut self) {
        if let Some(token) = self.auto_refresh.take() {
            token.cancel();
            info!("auto-refresh disabled");
            return;
        }

        let token = CancellationToken::new();
        let task_token = token.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(AUTO_REFRESH_PERIOD);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick completes immediately; consume it so the first
            // auto refresh fires one full period after enabling.
            interval.tick().await;
            loop {
                tokio::select! {
                    () = task_token.cancelled() => break,
                    _ = interval.tick() => {
                        if tx.send(Action::Refresh).is_err() {
                            break;
                        }
                    }
                }
            }
        });
        self.auto_refresh = Some(token);
        info!("auto-refresh enabled");
    }

    fn auto_refresh_enabled(&self) -> bool {
        self.auto_refresh.is_some()
    }

    /// Whether the status values are inside their post-update pulse window.
    fn status_pulsing(&self) -> bool {
        self.status_updated_at
            .is_some_and(|at| at.elapsed() < STATUS_PULSE)
    }

    // ── Rendering ─────────────────────────────────────────────────────

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Length(3), // status summary
            Constraint::Length(1), // range selector
            Constraint::Min(8),    // charts
            Constraint::Length(1), // footer
        ])
        .split(area);

        self.render_status(frame, layout[0]);
        self.render_range_selector(frame, layout[1]);

        let charts = Layout::vertical([
            Constraint::Percentage(50),
            Constraint::Percentage(50),
        ])
        .split(layout[2]);
        self.render_member_chart(frame, charts[0]);
        self.render_message_chart(frame, charts[1]);

        self.render_footer(frame, layout[3]);

        // Toasts render last so they sit on top of everything.
        self.render_toasts(frame, area);
    }

    /// Status summary: latest values from the raw (unfiltered) series.
    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Community Pulse ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let value_style = if self.status_pulsing() {
            theme::status_value_pulse()
        } else {
            theme::status_value()
        };

        // All four slots read the last stored sample — the range selector
        // never affects them.
        let (total, online, updated) = match self.snapshot.latest_member() {
            Some(m) => (
                m.total_members.to_string(),
                m.online_members.to_string(),
                labels::clock_label(m.timestamp),
            ),
            None => ("—".into(), "—".into(), "—".into()),
        };
        let recent = self
            .snapshot
            .latest_message()
            .map_or_else(|| "—".into(), |m| m.messages_last_10min.to_string());

        let line = Line::from(vec![
            Span::styled("  Members ", theme::status_caption()),
            Span::styled(total, value_style),
            Span::styled("   Online ", theme::status_caption()),
            Span::styled(online, value_style),
            Span::styled("   Msgs/10m ", theme::status_caption()),
            Span::styled(recent, value_style),
            Span::styled("   Updated ", theme::status_caption()),
            Span::styled(updated, value_style),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }

    /// One-line range selector with the active window highlighted.
    fn render_range_selector(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled("  Range: ", theme::key_hint())];
        for (i, choice) in RangeChoice::ALL.iter().enumerate() {
            let style = if *choice == self.range {
                theme::range_active()
            } else {
                theme::range_inactive()
            };
            spans.push(Span::styled(format!("{} {}", i + 1, choice.label()), style));
            spans.push(Span::raw("  "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Member history — Total and Online as two Braille line datasets.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn render_member_chart(&self, frame: &mut Frame, area: Rect) {
        let visible = filter_by_range(
            &self.snapshot.members,
            self.range.time_range(),
            Utc::now(),
        );

        let block = chart_block(" Members ");
        if visible.is_empty() {
            render_chart_placeholder(frame, area, block);
            return;
        }

        let total: Vec<(f64, f64)> = visible
            .iter()
            .map(|s| (s.timestamp.timestamp() as f64, s.total_members as f64))
            .collect();
        let online: Vec<(f64, f64)> = visible
            .iter()
            .map(|s| (s.timestamp.timestamp() as f64, s.online_members as f64))
            .collect();

        let y_min = online.iter().map(|&(_, y)| y).fold(f64::MAX, f64::min);
        let y_max = total.iter().map(|&(_, y)| y).fold(0.0_f64, f64::max);
        // Member counts hover far from zero; a padded window keeps the
        // line readable instead of pinning it to the top of the panel.
        let pad = ((y_max - y_min) * 0.1).max(1.0);

        let datasets = vec![
            Dataset::default()
                .name("Total")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme::EMBER_RED))
                .data(&total),
            Dataset::default()
                .name("Online")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme::SOFT_ROSE))
                .data(&online),
        ];

        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(time_axis(visible))
            .y_axis(
                Axis::default()
                    .bounds([(y_min - pad).max(0.0), y_max + pad])
                    .labels(y_axis_labels((y_min - pad).max(0.0), y_max + pad))
                    .style(theme::border_default()),
            );
        frame.render_widget(chart, area);
    }

    /// Message-rate history — one Braille line dataset, zero-based axis.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn render_message_chart(&self, frame: &mut Frame, area: Rect) {
        let visible = filter_by_range(
            &self.snapshot.messages,
            self.range.time_range(),
            Utc::now(),
        );

        let block = chart_block(" Messages (last 10 min) ");
        if visible.is_empty() {
            render_chart_placeholder(frame, area, block);
            return;
        }

        let data: Vec<(f64, f64)> = visible
            .iter()
            .map(|s| (s.timestamp.timestamp() as f64, s.messages_last_10min as f64))
            .collect();

        let y_max = data.iter().map(|&(_, y)| y).fold(0.0_f64, f64::max);
        let y_max = (y_max * 1.1).max(1.0);

        let dataset = Dataset::default()
            .name("Messages")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::MINT_GREEN))
            .data(&data);

        let chart = Chart::new(vec![dataset])
            .block(block)
            .x_axis(time_axis(visible))
            .y_axis(
                Axis::default()
                    .bounds([0.0, y_max])
                    .labels(y_axis_labels(0.0, y_max))
                    .style(theme::border_default()),
            );
        frame.render_widget(chart, area);
    }

    /// Footer: key hints, auto-refresh state, in-flight marker.
    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let auto_label = if self.auto_refresh_enabled() {
            Span::styled("on", Style::default().fg(theme::MINT_GREEN))
        } else {
            Span::styled("off", theme::key_hint())
        };

        let mut spans = vec![
            Span::styled("  r ", theme::key_hint_key()),
            Span::styled("refresh  ", theme::key_hint()),
            Span::styled("a ", theme::key_hint_key()),
            Span::styled("auto:", theme::key_hint()),
            auto_label,
            Span::styled("  1-5/t ", theme::key_hint_key()),
            Span::styled("range  ", theme::key_hint()),
            Span::styled("q ", theme::key_hint_key()),
            Span::styled("quit", theme::key_hint()),
        ];

        if self.refresh_in_flight {
            spans.push(Span::styled(
                "   refreshing…",
                Style::default().fg(theme::AMBER),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Stack error toasts in the bottom-right corner, newest at the bottom.
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    fn render_toasts(&self, frame: &mut Frame, area: Rect) {
        let height = 3u16;
        for (i, toast) in self.toasts.iter().rev().enumerate() {
            let width = (toast.message.len() as u16 + 6).clamp(24, 60);
            let x = area.width.saturating_sub(width + 1);
            let offset = height * (i as u16) + 2; // keep clear of the footer
            let Some(y) = area.height.checked_sub(height + offset) else {
                break;
            };
            let toast_area = Rect::new(area.x + x, area.y + y, width, height);

            frame.render_widget(
                Block::default().style(Style::default().bg(theme::BG_DARK)),
                toast_area,
            );

            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme::EMBER_RED));
            let inner = block.inner(toast_area);
            frame.render_widget(block, toast_area);

            let line = Line::from(vec![
                Span::styled(" ✗ ", Style::default().fg(theme::EMBER_RED)),
                Span::styled(&toast.message, Style::default().fg(theme::DIM_WHITE)),
            ]);
            frame.render_widget(Paragraph::new(line), inner);
        }
    }
}

/// Bordered block shared by both chart panels.
fn chart_block(title: &'static str) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default())
}

fn render_chart_placeholder(frame: &mut Frame, area: Rect, block: Block<'_>) {
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new("  No data yet").style(theme::key_hint()),
        inner,
    );
}

/// X axis spanning the visible samples, labelled "Mon D, HH:MM" at the ends.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn time_axis<T: Timestamped>(visible: &[T]) -> Axis<'static> {
    let first = visible.first().map_or(0.0, |s| s.timestamp().timestamp() as f64);
    let last = visible.last().map_or(1.0, |s| s.timestamp().timestamp() as f64);

    let axis_labels: Vec<Span> = [visible.first(), visible.last()]
        .into_iter()
        .flatten()
        .map(|s| Span::styled(labels::axis_label(s.timestamp()), theme::key_hint()))
        .collect();

    Axis::default()
        .bounds([first, last.max(first + 1.0)])
        .labels(axis_labels)
        .style(theme::border_default())
}

fn y_axis_labels(min: f64, max: f64) -> Vec<Span<'static>> {
    [min, (min + max) / 2.0, max]
        .into_iter()
        .map(|v| Span::styled(format!("{v:.0}"), theme::key_hint()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use guildpulse_api::{FeedClient, FeedConfig, MemberSample, MessageSample};
    use guildpulse_core::Controller;

    use super::*;

    fn test_app() -> App {
        // Unroutable feed target: tests never actually fetch.
        let config = FeedConfig::new(
            "http://127.0.0.1:9/members.json",
            "http://127.0.0.1:9/messages.json",
            Duration::from_secs(1),
        )
        .expect("valid config");
        App::new(Controller::new(
            FeedClient::new(config).expect("client builds"),
        ))
    }

    fn snapshot_with_data() -> Snapshot {
        let ts = "2024-01-01T00:00:00Z".parse().expect("valid timestamp");
        Snapshot {
            members: Arc::new(vec![MemberSample {
                timestamp: ts,
                total_members: 12,
                online_members: 3,
            }]),
            messages: Arc::new(vec![MessageSample {
                timestamp: ts,
                messages_last_10min: 7,
            }]),
        }
    }

    #[test]
    fn range_cycle_visits_every_choice_and_wraps() {
        let mut choice = RangeChoice::default();
        let mut seen = Vec::new();
        for _ in 0..RangeChoice::ALL.len() {
            choice = choice.next();
            seen.push(choice);
        }
        assert_eq!(choice, RangeChoice::default(), "cycle should wrap");
        for expected in RangeChoice::ALL {
            assert!(seen.contains(&expected), "{expected:?} never visited");
        }
    }

    #[test]
    fn busy_flag_coalesces_concurrent_triggers() {
        let mut app = test_app();

        assert!(app.begin_refresh(), "first trigger starts a cycle");
        assert!(!app.begin_refresh(), "second trigger is coalesced");

        app.process_action(&Action::SeriesUpdated(Snapshot::default()));
        assert!(app.begin_refresh(), "flag clears after completion");

        app.process_action(&Action::LoadFailed("boom".into()));
        assert!(app.begin_refresh(), "flag clears after failure too");
    }

    #[test]
    fn load_failure_stacks_toasts_and_keeps_series() {
        let mut app = test_app();
        app.process_action(&Action::SeriesUpdated(snapshot_with_data()));

        app.process_action(&Action::LoadFailed("HTTP 500".into()));
        app.process_action(&Action::LoadFailed("timed out".into()));

        assert_eq!(app.toasts.len(), 2, "toasts stack, not replace");
        assert_eq!(
            app.snapshot.latest_member().map(|m| m.total_members),
            Some(12),
            "failure leaves last-known-good series in place"
        );
    }

    #[test]
    fn expired_toasts_are_dropped_on_tick() {
        let mut app = test_app();
        app.toasts.push(Toast {
            message: "old".into(),
            created: Instant::now() - Duration::from_secs(6),
        });
        app.toasts.push(Toast::new("fresh"));

        app.process_action(&Action::Tick);

        assert_eq!(app.toasts.len(), 1);
        assert_eq!(app.toasts[0].message, "fresh");
    }

    #[tokio::test]
    async fn toggling_auto_refresh_twice_leaks_no_timer() {
        let mut app = test_app();
        assert!(!app.auto_refresh_enabled());

        app.process_action(&Action::ToggleAutoRefresh);
        let token = app.auto_refresh.clone().expect("timer running");
        assert!(!token.is_cancelled());

        app.process_action(&Action::ToggleAutoRefresh);
        assert!(!app.auto_refresh_enabled());
        assert!(token.is_cancelled(), "disable must cancel the timer task");
    }

    #[test]
    fn status_summary_ignores_range_selection() {
        let mut app = test_app();
        app.process_action(&Action::SeriesUpdated(snapshot_with_data()));

        // A narrow window excludes the (old) sample from the charts, but the
        // status summary still reads the raw series.
        app.process_action(&Action::SetRange(RangeChoice::LastHour));
        assert_eq!(
            app.snapshot.latest_member().map(|m| m.total_members),
            Some(12)
        );
        assert_eq!(
            app.snapshot.latest_message().map(|m| m.messages_last_10min),
            Some(7)
        );
    }

    #[test]
    fn status_pulse_starts_only_when_both_series_have_data() {
        let mut app = test_app();

        app.process_action(&Action::SeriesUpdated(Snapshot::default()));
        assert!(app.status_updated_at.is_none(), "empty load should not pulse");

        app.process_action(&Action::SeriesUpdated(snapshot_with_data()));
        assert!(app.status_pulsing());
    }
}
