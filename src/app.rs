//! The application shell.
//!
//! Owns the current route and its view, the navbar and the toast stack, and
//! drives the draw/update/input loop.

use crate::api::Requests;
use crate::components::clinical_data::{ClinicalDataForm, ClinicalDataList};
use crate::components::home::Home;
use crate::components::patients::{PatientForm, PatientList};
use crate::components::{navbar, Component, FormMode, ViewContext};
use crate::notify::{self, Toasts};
use crate::routes::Route;
use crate::tui::{Event, Frame, Tui};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::prelude::*;

pub struct App {
    ctx: ViewContext,
    route: Route,
    view: Box<dyn Component>,
    toasts: Toasts,
    /// Set once Ctrl+Q is pressed.
    pub should_quit: bool,
    /// Terminal size at the last draw, used to hit-test mouse clicks on toasts.
    last_area: Rect,
}

impl App {
    pub fn new(requests: Requests, start: Route) -> Self {
        let (notifier, toasts) = notify::channel();
        let ctx = ViewContext { requests, notifier };
        tracing::info!(route = %start, "starting");
        Self {
            view: build_view(&ctx, start),
            ctx,
            route: start,
            toasts,
            should_quit: false,
            last_area: Rect::default(),
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Replaces the current view with a fresh instance for `route`.
    pub fn navigate(&mut self, route: Route) {
        tracing::info!(from = %self.route, to = %route, "navigate");
        self.route = route;
        self.view = build_view(&self.ctx, route);
    }

    /// Runs the main loop until the user quits.
    pub fn run(&mut self, tui: &mut Tui) -> Result<()> {
        while !self.should_quit {
            self.toasts.pump();
            tui.draw(|frame| self.draw(frame))?;

            // Starts scheduled requests and collects finished ones.
            if let Some(route) = self.view.update()? {
                self.navigate(route);
                continue;
            }

            let event = tui.next_event()?;
            self.handle_event(event)?;
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        self.last_area = frame.area();
        self.render(frame);
    }

    fn render(&self, frame: &mut Frame) {
        let [nav, body] =
            Layout::vertical([Constraint::Length(navbar::HEIGHT), Constraint::Min(0)])
                .areas(frame.area());
        navbar::render(frame, nav, self.route);
        self.view.render(frame, body);
        self.toasts.render(frame);
    }

    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.handle_key(key)?,
            Event::Mouse(mouse) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    self.toasts
                        .dismiss_at(self.last_area, mouse.column, mouse.row);
                }
            }
            Event::Resize | Event::Tick => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return Ok(());
                }
                KeyCode::Char('x') => {
                    self.toasts.dismiss_newest();
                    return Ok(());
                }
                _ => {}
            }
        }

        if let Some(route) = navbar::route_for_key(key.code) {
            self.navigate(route);
            return Ok(());
        }

        if let Some(route) = self.view.handle_input(key)? {
            self.navigate(route);
        }
        Ok(())
    }
}

fn build_view(ctx: &ViewContext, route: Route) -> Box<dyn Component> {
    let ctx = ctx.clone();
    match route {
        Route::Home => Box::new(Home::new()),
        Route::Patients => Box::new(PatientList::new(ctx)),
        Route::NewPatient => Box::new(PatientForm::new(ctx, FormMode::Create)),
        Route::EditPatient(id) => Box::new(PatientForm::new(ctx, FormMode::Edit(id))),
        Route::ClinicalData => Box::new(ClinicalDataList::new(ctx)),
        Route::NewClinicalData => Box::new(ClinicalDataForm::new(ctx, FormMode::Create)),
        Route::EditClinicalData(id) => {
            Box::new(ClinicalDataForm::new(ctx, FormMode::Edit(id)))
        }
    }
}
