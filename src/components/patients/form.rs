//! Create/edit form for a single patient.

use crate::api::worker::take_finished;
use crate::api::{ApiResult, InFlight};
use crate::components::widgets::{self, button_style, button_text, render_header, render_input};
use crate::components::{Component, FieldErrors, FormMode, ViewContext};
use crate::models::{Patient, PatientPayload};
use crate::routes::Route;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Flex, prelude::*, widgets::*};

const MAX_NAME_LENGTH: usize = 100;
const MIN_AGE: u32 = 1;
const MAX_AGE: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PatientField {
    FirstName,
    LastName,
    Age,
}

/// Raw form contents, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientInput {
    pub first_name: String,
    pub last_name: String,
    /// Digits only; empty when nothing has been entered.
    pub age: String,
}

impl PatientInput {
    /// The request body, once [`validate`] has passed.
    fn to_payload(&self) -> Option<PatientPayload> {
        Some(PatientPayload {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            age: self.age.parse().ok()?,
        })
    }
}

fn validate_name(value: &str, label: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some(format!("{label} is required"))
    } else if value.chars().count() > MAX_NAME_LENGTH {
        Some(format!("{label} must not exceed {MAX_NAME_LENGTH} characters"))
    } else {
        None
    }
}

/// Checks the form before anything is sent.
pub fn validate(input: &PatientInput) -> FieldErrors<PatientField> {
    let mut errors = FieldErrors::new();
    if let Some(error) = validate_name(&input.first_name, "First name") {
        errors.insert(PatientField::FirstName, error);
    }
    if let Some(error) = validate_name(&input.last_name, "Last name") {
        errors.insert(PatientField::LastName, error);
    }
    if input.age.is_empty() {
        errors.insert(PatientField::Age, "Age is required".to_string());
    } else {
        // Anything too long for u32 is out of range as well.
        let in_range = input
            .age
            .parse::<u32>()
            .is_ok_and(|age| (MIN_AGE..=MAX_AGE).contains(&age));
        if !in_range {
            errors.insert(
                PatientField::Age,
                format!("Age must be between {MIN_AGE} and {MAX_AGE}"),
            );
        }
    }
    errors
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Field(PatientField),
    Submit,
    Cancel,
}

const FOCUS_ORDER: [Focus; 5] = [
    Focus::Field(PatientField::FirstName),
    Focus::Field(PatientField::LastName),
    Focus::Field(PatientField::Age),
    Focus::Submit,
    Focus::Cancel,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Fetch(i64),
    Submit,
}

pub struct PatientForm {
    ctx: ViewContext,
    mode: FormMode,
    input: PatientInput,
    errors: FieldErrors<PatientField>,
    focus: Focus,
    /// Set from the moment a request is scheduled until its result is handled.
    loading: bool,
    pending: Option<Pending>,
    fetch_request: Option<InFlight<Patient>>,
    submit_request: Option<InFlight<()>>,
}

impl PatientForm {
    pub fn new(ctx: ViewContext, mode: FormMode) -> Self {
        let pending = match mode {
            FormMode::Edit(id) => Some(Pending::Fetch(id)),
            FormMode::Create => None,
        };
        Self {
            ctx,
            mode,
            input: PatientInput::default(),
            errors: FieldErrors::new(),
            focus: FOCUS_ORDER[0],
            loading: pending.is_some(),
            pending,
            fetch_request: None,
            submit_request: None,
        }
    }

    pub fn input(&self) -> &PatientInput {
        &self.input
    }

    pub fn errors(&self) -> &FieldErrors<PatientField> {
        &self.errors
    }

    fn field_mut(&mut self, field: PatientField) -> &mut String {
        match field {
            PatientField::FirstName => &mut self.input.first_name,
            PatientField::LastName => &mut self.input.last_name,
            PatientField::Age => &mut self.input.age,
        }
    }

    fn edit_field(&mut self, field: PatientField, edit: impl FnOnce(&mut String)) {
        let value = self.field_mut(field);
        let before = value.clone();
        edit(value);
        if *value != before {
            self.errors.remove(&field);
        }
    }

    fn move_focus(&mut self, step: isize) {
        let len = FOCUS_ORDER.len() as isize;
        let current = FOCUS_ORDER
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0) as isize;
        self.focus = FOCUS_ORDER[(current + step).rem_euclid(len) as usize];
    }

    fn start(&mut self, pending: Pending) {
        match pending {
            Pending::Fetch(id) => {
                self.fetch_request = Some(self.ctx.requests.start(move |api| api.get_patient(id)));
            }
            Pending::Submit => {
                let Some(payload) = self.input.to_payload() else {
                    self.loading = false;
                    return;
                };
                let mode = self.mode;
                self.submit_request = Some(self.ctx.requests.start(move |api| match mode {
                    FormMode::Edit(id) => api.update_patient(id, &payload),
                    FormMode::Create => api.create_patient(&payload),
                }));
            }
        }
    }

    fn finish_fetch(&mut self, result: ApiResult<Patient>) -> Option<Route> {
        self.loading = false;
        match result {
            Ok(patient) => {
                self.input = PatientInput {
                    first_name: patient.first_name,
                    last_name: patient.last_name,
                    age: patient.age.to_string(),
                };
                None
            }
            Err(e) => {
                self.ctx
                    .notifier
                    .error(format!("Failed to fetch patient: {}", e.user_message()));
                Some(Route::Patients)
            }
        }
    }

    /// Validates and, if clean, schedules the request for the next update.
    fn request_submit(&mut self) {
        self.errors = validate(&self.input);
        if !self.errors.is_empty() {
            self.ctx.notifier.error("Please fix the validation errors");
            return;
        }
        self.loading = true;
        self.pending = Some(Pending::Submit);
    }

    fn finish_submit(&mut self, result: ApiResult<()>) -> Option<Route> {
        self.loading = false;
        match result {
            Ok(_) => {
                self.ctx.notifier.success(format!(
                    "Patient {} successfully!",
                    self.mode.past_tense()
                ));
                Some(Route::Patients)
            }
            Err(e) => {
                self.ctx.notifier.error(format!(
                    "Failed to {} patient: {}",
                    self.mode.verb(),
                    e.user_message()
                ));
                None
            }
        }
    }
}

impl Component for PatientForm {
    fn handle_input(&mut self, key: KeyEvent) -> Result<Option<Route>> {
        if self.loading {
            return Ok(None);
        }
        match key.code {
            KeyCode::Esc => return Ok(Some(Route::Patients)),
            KeyCode::Tab | KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(-1),
            KeyCode::Enter => match self.focus {
                Focus::Cancel => return Ok(Some(Route::Patients)),
                Focus::Field(_) | Focus::Submit => self.request_submit(),
            },
            KeyCode::Char(c) => {
                if let Focus::Field(field) = self.focus {
                    if field != PatientField::Age || c.is_ascii_digit() {
                        self.edit_field(field, |value| value.push(c));
                    }
                }
            }
            KeyCode::Backspace => {
                if let Focus::Field(field) = self.focus {
                    self.edit_field(field, |value| {
                        value.pop();
                    });
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self) -> Result<Option<Route>> {
        if let Some(pending) = self.pending.take() {
            self.start(pending);
        }
        if let Some(result) = take_finished(&mut self.fetch_request) {
            return Ok(self.finish_fetch(result));
        }
        if let Some(result) = take_finished(&mut self.submit_request) {
            return Ok(self.finish_submit(result));
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = if self.mode.is_edit() {
            "🏥 EDIT PATIENT"
        } else {
            "🏥 ADD NEW PATIENT"
        };
        let body = render_header(frame, area, title);

        let [form_area] = Layout::horizontal([Constraint::Max(70)])
            .flex(Flex::Center)
            .areas(body);
        let form_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(widgets::BORDER))
            .style(Style::default().bg(widgets::PANEL));
        let inner = form_block.inner(form_area);
        frame.render_widget(form_block, form_area);

        let [first, last, age, _, submit, cancel, _, help] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .margin(1)
        .areas(inner);

        let fields = [
            (first, PatientField::FirstName, "First Name *", &self.input.first_name),
            (last, PatientField::LastName, "Last Name *", &self.input.last_name),
            (age, PatientField::Age, "Age *", &self.input.age),
        ];
        for (slot, field, label, value) in fields {
            render_input(
                frame,
                slot,
                label,
                value,
                self.focus == Focus::Field(field),
                self.errors.get(&field).map(String::as_str),
            );
        }

        let submit_label = if self.submit_request.is_some()
            || self.pending == Some(Pending::Submit)
        {
            "Saving..."
        } else if self.loading {
            "Loading..."
        } else if self.mode.is_edit() {
            "Update Patient"
        } else {
            "Create Patient"
        };
        let submit_focused = self.focus == Focus::Submit;
        frame.render_widget(
            Paragraph::new(button_text(submit_label, submit_focused))
                .style(button_style(submit_focused, widgets::SUCCESS))
                .alignment(Alignment::Center),
            submit,
        );
        let cancel_focused = self.focus == Focus::Cancel;
        frame.render_widget(
            Paragraph::new(button_text("Cancel", cancel_focused))
                .style(button_style(cancel_focused, widgets::LINK))
                .alignment(Alignment::Center),
            cancel,
        );

        frame.render_widget(
            Paragraph::new("Tab/↑↓: Switch Field | Enter: Submit | Esc: Cancel")
                .style(Style::default().fg(widgets::MUTED))
                .alignment(Alignment::Center),
            help,
        );
    }
}
