//! Transient notifications ("toasts").
//!
//! Views publish through a cloneable [`Notifier`]; the shell owns the single
//! [`Toasts`] subscriber, which renders them top-right and expires them.

use crate::tui::Frame;
use ratatui::{
    layout::Position,
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(3);

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;
const MAX_VISIBLE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

/// Publishing half of the notification channel.
#[derive(Clone)]
pub struct Notifier {
    tx: Sender<Notification>,
}

impl Notifier {
    pub fn success(&self, message: impl Into<String>) {
        self.publish(Level::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(Level::Error, message.into());
    }

    fn publish(&self, level: Level, message: String) {
        tracing::info!(?level, %message, "notification");
        // The receiver only goes away during shutdown.
        let _ = self.tx.send(Notification { level, message });
    }
}

/// Creates a connected notifier/surface pair.
pub fn channel() -> (Notifier, Toasts) {
    let (tx, rx) = mpsc::channel();
    (
        Notifier { tx },
        Toasts {
            rx,
            active: Vec::new(),
            ttl: TOAST_TTL,
        },
    )
}

struct Toast {
    notification: Notification,
    shown_at: Instant,
}

/// Subscribing half: the toast stack drawn over every view.
pub struct Toasts {
    rx: Receiver<Notification>,
    active: Vec<Toast>,
    ttl: Duration,
}

impl Toasts {
    /// Picks up newly published notifications and drops expired ones.
    pub fn pump(&mut self) {
        self.pump_at(Instant::now());
    }

    pub fn pump_at(&mut self, now: Instant) {
        while let Ok(notification) = self.rx.try_recv() {
            self.active.push(Toast {
                notification,
                shown_at: now,
            });
        }
        // Only the newest toasts fit on screen.
        let overflow = self.active.len().saturating_sub(MAX_VISIBLE);
        self.active.drain(..overflow);
        let ttl = self.ttl;
        self.active
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < ttl);
    }

    /// Notifications currently on screen, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.active.iter().map(|toast| &toast.notification)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Removes the most recent toast. Returns `false` if there was none.
    pub fn dismiss_newest(&mut self) -> bool {
        self.active.pop().is_some()
    }

    /// Removes the toast under the terminal cell (`column`, `row`), if any.
    pub fn dismiss_at(&mut self, area: Rect, column: u16, row: u16) -> bool {
        let position = Position::new(column, row);
        let hit = self
            .slots(area)
            .into_iter()
            .position(|slot| slot.contains(position));
        match hit {
            Some(index) => {
                self.active.remove(index);
                true
            }
            None => false,
        }
    }

    /// Screen rectangles of the visible toasts, stacked downward from the top-right.
    fn slots(&self, area: Rect) -> Vec<Rect> {
        let width = TOAST_WIDTH.min(area.width);
        let x = area.x + area.width.saturating_sub(width + 1);
        self.active
            .iter()
            .take(MAX_VISIBLE)
            .enumerate()
            .map_while(|(i, _)| {
                let y = area.y + 1 + i as u16 * TOAST_HEIGHT;
                (y + TOAST_HEIGHT <= area.bottom()).then(|| Rect::new(x, y, width, TOAST_HEIGHT))
            })
            .collect()
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        for (toast, slot) in self.active.iter().zip(self.slots(area)) {
            let (accent, icon) = match toast.notification.level {
                Level::Success => (Color::Rgb(140, 219, 140), "✓"),
                Level::Error => (Color::Rgb(255, 100, 100), "✗"),
            };
            frame.render_widget(Clear, slot);
            let body = Paragraph::new(format!("{} {}", icon, toast.notification.message))
                .style(Style::default().fg(Color::Rgb(230, 230, 250)))
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(accent))
                        .style(Style::default().bg(Color::Rgb(30, 30, 46))),
                );
            frame.render_widget(body, slot);
        }
    }
}
