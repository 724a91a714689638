//! Create/edit form for a clinical measurement.
//!
//! Creation links the record to a patient picked from the live patient list.
//! Editing only touches name and value; the backend never reports which
//! patient a record belongs to, so the selector is hidden in edit mode.

use crate::api::worker::take_finished;
use crate::api::{ApiResult, InFlight};
use crate::components::widgets::{self, button_style, button_text, render_header, render_input};
use crate::components::{Component, FieldErrors, FormMode, ViewContext};
use crate::models::{ClinicalData, ClinicalDataPayload, NewClinicalData, Patient};
use crate::routes::Route;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Flex, prelude::*, widgets::*};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClinicalDataField {
    Patient,
    ComponentName,
    ComponentValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClinicalDataInput {
    pub component_name: String,
    pub component_value: String,
    pub patient_id: Option<i64>,
}

/// Checks the form before anything is sent. The patient is only required when creating.
pub fn validate(input: &ClinicalDataInput, mode: FormMode) -> FieldErrors<ClinicalDataField> {
    let mut errors = FieldErrors::new();
    if input.component_name.trim().is_empty() {
        errors.insert(
            ClinicalDataField::ComponentName,
            "Component name is required".to_string(),
        );
    }
    if input.component_value.trim().is_empty() {
        errors.insert(
            ClinicalDataField::ComponentValue,
            "Component value is required".to_string(),
        );
    }
    if !mode.is_edit() && input.patient_id.is_none() {
        errors.insert(
            ClinicalDataField::Patient,
            "Patient selection is required".to_string(),
        );
    }
    errors
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Field(ClinicalDataField),
    Submit,
    Cancel,
}

const CREATE_FOCUS: &[Focus] = &[
    Focus::Field(ClinicalDataField::Patient),
    Focus::Field(ClinicalDataField::ComponentName),
    Focus::Field(ClinicalDataField::ComponentValue),
    Focus::Submit,
    Focus::Cancel,
];

const EDIT_FOCUS: &[Focus] = &[
    Focus::Field(ClinicalDataField::ComponentName),
    Focus::Field(ClinicalDataField::ComponentValue),
    Focus::Submit,
    Focus::Cancel,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Mount,
    Submit,
}

pub struct ClinicalDataForm {
    ctx: ViewContext,
    mode: FormMode,
    input: ClinicalDataInput,
    patients: Vec<Patient>,
    errors: FieldErrors<ClinicalDataField>,
    focus: Focus,
    loading: bool,
    pending: Option<Pending>,
    patients_request: Option<InFlight<Vec<Patient>>>,
    record_request: Option<InFlight<ClinicalData>>,
    submit_request: Option<InFlight<()>>,
}

impl ClinicalDataForm {
    pub fn new(ctx: ViewContext, mode: FormMode) -> Self {
        let focus_order = Self::focus_order_for(mode);
        Self {
            ctx,
            mode,
            input: ClinicalDataInput::default(),
            patients: Vec::new(),
            errors: FieldErrors::new(),
            focus: focus_order[0],
            loading: true,
            pending: Some(Pending::Mount),
            patients_request: None,
            record_request: None,
            submit_request: None,
        }
    }

    fn focus_order_for(mode: FormMode) -> &'static [Focus] {
        match mode {
            FormMode::Create => CREATE_FOCUS,
            FormMode::Edit(_) => EDIT_FOCUS,
        }
    }

    pub fn input(&self) -> &ClinicalDataInput {
        &self.input
    }

    pub fn errors(&self) -> &FieldErrors<ClinicalDataField> {
        &self.errors
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    fn move_focus(&mut self, step: isize) {
        let order = Self::focus_order_for(self.mode);
        let len = order.len() as isize;
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0) as isize;
        self.focus = order[(current + step).rem_euclid(len) as usize];
    }

    fn edit_text(&mut self, field: ClinicalDataField, edit: impl FnOnce(&mut String)) {
        let value = match field {
            ClinicalDataField::ComponentName => &mut self.input.component_name,
            ClinicalDataField::ComponentValue => &mut self.input.component_value,
            ClinicalDataField::Patient => return,
        };
        let before = value.clone();
        edit(value);
        if *value != before {
            self.errors.remove(&field);
        }
    }

    /// Steps through "no selection" followed by every fetched patient.
    fn cycle_patient(&mut self, step: isize) {
        if self.patients.is_empty() {
            return;
        }
        let slots = self.patients.len() as isize + 1;
        let current = self
            .input
            .patient_id
            .and_then(|id| self.patients.iter().position(|p| p.id == id))
            .map_or(0, |i| i as isize + 1);
        let next = (current + step).rem_euclid(slots);
        let patient_id = (next > 0).then(|| self.patients[next as usize - 1].id);
        if patient_id != self.input.patient_id {
            self.input.patient_id = patient_id;
            self.errors.remove(&ClinicalDataField::Patient);
        }
    }

    fn selected_patient(&self) -> Option<&Patient> {
        let id = self.input.patient_id?;
        self.patients.iter().find(|p| p.id == id)
    }

    fn start(&mut self, pending: Pending) {
        match pending {
            Pending::Mount => {
                self.patients_request = Some(self.ctx.requests.start(|api| api.list_patients()));
                if let FormMode::Edit(id) = self.mode {
                    self.record_request =
                        Some(self.ctx.requests.start(move |api| api.get_clinical_data(id)));
                }
            }
            Pending::Submit => {
                let name = self.input.component_name.clone();
                let value = self.input.component_value.clone();
                let request = match (self.mode, self.input.patient_id) {
                    (FormMode::Edit(id), _) => {
                        let payload = ClinicalDataPayload {
                            component_name: name,
                            component_value: value,
                        };
                        self.ctx
                            .requests
                            .start(move |api| api.update_clinical_data(id, &payload))
                    }
                    (FormMode::Create, Some(patient_id)) => {
                        let payload = NewClinicalData {
                            component_name: name,
                            component_value: value,
                            patient_id,
                        };
                        self.ctx
                            .requests
                            .start(move |api| api.create_clinical_data_for_patient(&payload))
                    }
                    (FormMode::Create, None) => {
                        self.loading = false;
                        return;
                    }
                };
                self.submit_request = Some(request);
            }
        }
    }

    fn finish_patients(&mut self, result: ApiResult<Vec<Patient>>) {
        match result {
            Ok(patients) => self.patients = patients,
            Err(e) => self
                .ctx
                .notifier
                .error(format!("Failed to fetch patients: {}", e.user_message())),
        }
    }

    fn finish_record(&mut self, result: ApiResult<ClinicalData>) -> Option<Route> {
        match result {
            Ok(record) => {
                self.input = ClinicalDataInput {
                    component_name: record.component_name,
                    component_value: record.component_value,
                    patient_id: None,
                };
                None
            }
            Err(e) => {
                self.ctx.notifier.error(format!(
                    "Failed to fetch clinical data: {}",
                    e.user_message()
                ));
                Some(Route::ClinicalData)
            }
        }
    }

    fn request_submit(&mut self) {
        self.errors = validate(&self.input, self.mode);
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
                    "Clinical data {} successfully!",
                    self.mode.past_tense()
                ));
                Some(Route::ClinicalData)
            }
            Err(e) => {
                self.ctx.notifier.error(format!(
                    "Failed to {} clinical data: {}",
                    self.mode.verb(),
                    e.user_message()
                ));
                None
            }
        }
    }

    fn render_patient_selector(&self, frame: &mut Frame, area: Rect) {
        let [field, message] =
            Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(area);
        let focused = self.focus == Focus::Field(ClinicalDataField::Patient);
        let error = self.errors.get(&ClinicalDataField::Patient);
        let label = self
            .selected_patient()
            .map(Patient::display_label)
            .unwrap_or_else(|| "-- Select a patient --".to_string());
        let border = if error.is_some() {
            widgets::DANGER
        } else if focused {
            widgets::FOCUS
        } else {
            widgets::BORDER_IDLE
        };
        frame.render_widget(
            Paragraph::new(format!("◄ {label} ►"))
                .style(Style::default().fg(widgets::TEXT).bg(widgets::INPUT))
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .title(" Select Patient * ")
                        .border_style(Style::default().fg(border))
                        .style(Style::default().bg(widgets::INPUT)),
                ),
            field,
        );
        if let Some(error) = error {
            frame.render_widget(
                Paragraph::new(error.as_str()).style(Style::default().fg(widgets::DANGER)),
                message,
            );
        }
    }
}

impl Component for ClinicalDataForm {
    fn handle_input(&mut self, key: KeyEvent) -> Result<Option<Route>> {
        if self.loading {
            return Ok(None);
        }
        match key.code {
            KeyCode::Esc => return Ok(Some(Route::ClinicalData)),
            KeyCode::Tab | KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(-1),
            KeyCode::Left if self.focus == Focus::Field(ClinicalDataField::Patient) => {
                self.cycle_patient(-1)
            }
            KeyCode::Right if self.focus == Focus::Field(ClinicalDataField::Patient) => {
                self.cycle_patient(1)
            }
            KeyCode::Enter => match self.focus {
                Focus::Cancel => return Ok(Some(Route::ClinicalData)),
                Focus::Field(_) | Focus::Submit => self.request_submit(),
            },
            KeyCode::Char(c) => {
                if let Focus::Field(field) = self.focus {
                    self.edit_text(field, |value| value.push(c));
                }
            }
            KeyCode::Backspace => {
                if let Focus::Field(field) = self.focus {
                    self.edit_text(field, |value| {
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
        if let Some(result) = take_finished(&mut self.patients_request) {
            self.finish_patients(result);
        }
        if let Some(result) = take_finished(&mut self.record_request) {
            if let Some(route) = self.finish_record(result) {
                return Ok(Some(route));
            }
        }
        if let Some(result) = take_finished(&mut self.submit_request) {
            return Ok(self.finish_submit(result));
        }
        if self.pending.is_none()
            && self.patients_request.is_none()
            && self.record_request.is_none()
            && self.submit_request.is_none()
        {
            self.loading = false;
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = if self.mode.is_edit() {
            "🩺 EDIT CLINICAL DATA"
        } else {
            "🩺 ADD NEW CLINICAL DATA"
        };
        let body = render_header(frame, area, title);

        let [form_area] = Layout::horizontal([Constraint::Max(72)])
            .flex(Flex::Center)
            .areas(body);
        let form_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(widgets::BORDER))
            .style(Style::default().bg(widgets::PANEL));
        let inner = form_block.inner(form_area);
        frame.render_widget(form_block, form_area);

        let selector_height = if self.mode.is_edit() { 0 } else { 4 };
        let [selector, name, value, _, submit, cancel, _, help] = Layout::vertical([
            Constraint::Length(selector_height),
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

        if !self.mode.is_edit() {
            self.render_patient_selector(frame, selector);
        }

        render_input(
            frame,
            name,
            "Component Name *  (e.g. Blood Pressure, Heart Rate)",
            &self.input.component_name,
            self.focus == Focus::Field(ClinicalDataField::ComponentName),
            self.errors
                .get(&ClinicalDataField::ComponentName)
                .map(String::as_str),
        );
        render_input(
            frame,
            value,
            "Component Value *  (e.g. 120/80, 72 bpm)",
            &self.input.component_value,
            self.focus == Focus::Field(ClinicalDataField::ComponentValue),
            self.errors
                .get(&ClinicalDataField::ComponentValue)
                .map(String::as_str),
        );

        let submit_label = if self.submit_request.is_some()
            || self.pending == Some(Pending::Submit)
        {
            "Saving..."
        } else if self.loading {
            "Loading..."
        } else if self.mode.is_edit() {
            "Update Clinical Data"
        } else {
            "Create Clinical Data"
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

        let help_text = if self.mode.is_edit() {
            "Tab/↑↓: Switch Field | Enter: Submit | Esc: Cancel"
        } else {
            "Tab/↑↓: Switch Field | ←→: Choose Patient | Enter: Submit | Esc: Cancel"
        };
        frame.render_widget(
            Paragraph::new(help_text)
                .style(Style::default().fg(widgets::MUTED))
                .alignment(Alignment::Center),
            help,
        );
    }
}
