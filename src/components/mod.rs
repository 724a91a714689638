use crate::api::Requests;
use crate::notify::Notifier;
use crate::routes::Route;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use std::collections::BTreeMap;

pub mod clinical_data;
pub mod home;
pub mod list;
pub mod navbar;
pub mod pagination;
pub mod patients;
pub mod widgets;

/// A full-screen view below the navbar.
///
/// Input handlers return the route to navigate to, if any. Requests are
/// started and polled from [`Component::update`], which the shell calls once
/// per frame after drawing.
pub trait Component {
    fn handle_input(&mut self, event: KeyEvent) -> Result<Option<Route>>;
    fn update(&mut self) -> Result<Option<Route>> {
        Ok(None)
    }
    fn render(&self, frame: &mut Frame, area: Rect);
}

/// Collaborators handed to every view.
#[derive(Clone)]
pub struct ViewContext {
    pub requests: Requests,
    pub notifier: Notifier,
}

/// Whether a form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }

    /// Verb used in result messages ("Failed to update patient").
    pub fn verb(&self) -> &'static str {
        match self {
            FormMode::Create => "create",
            FormMode::Edit(_) => "update",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            FormMode::Create => "created",
            FormMode::Edit(_) => "updated",
        }
    }
}

/// Validation result: one message per offending field.
pub type FieldErrors<F> = BTreeMap<F, String>;

#[cfg(test)]
pub(crate) mod testing {
    use super::ViewContext;
    use crate::api::fake::FakeApi;
    use crate::api::Requests;
    use crate::notify::{self, Notification, Toasts};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::Arc;

    /// A context whose requests finish synchronously against `api`.
    pub fn context(api: FakeApi) -> (ViewContext, Arc<FakeApi>, Toasts) {
        let api = Arc::new(api);
        let (notifier, toasts) = notify::channel();
        let ctx = ViewContext {
            requests: Requests::inline(api.clone()),
            notifier,
        };
        (ctx, api, toasts)
    }

    /// Everything published since the last call.
    pub fn drain(toasts: &mut Toasts) -> Vec<Notification> {
        toasts.pump();
        let drained = toasts.visible().cloned().collect();
        while toasts.dismiss_newest() {}
        drained
    }

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn type_text(component: &mut dyn super::Component, text: &str) {
        for c in text.chars() {
            component.handle_input(key(KeyCode::Char(c))).unwrap();
        }
    }
}
