//! Patient list view.

use crate::api::{ApiResult, ClinicalsApi};
use crate::components::list::{ListResource, ListView};
use crate::models::Patient;
use crate::routes::Route;
use ratatui::layout::Constraint;

pub type PatientList = ListView<Patient>;

impl ListResource for Patient {
    const TITLE: &'static str = "🏥 PATIENT MANAGEMENT";
    const PLURAL: &'static str = "patients";
    const SINGULAR: &'static str = "patient";
    const LOADED_MESSAGE: &'static str = "Patients loaded successfully!";
    const DELETED_MESSAGE: &'static str = "Patient deleted successfully!";
    const CONFIRM_MESSAGE: &'static str = "Are you sure you want to delete this patient?";
    const SEARCH_PLACEHOLDER: &'static str = "Search by name or age...";
    const ADD_LABEL: &'static str = "Add New Patient";
    const HEADERS: &'static [&'static str] = &["ID", "First Name", "Last Name", "Age"];
    const WIDTHS: &'static [Constraint] = &[
        Constraint::Percentage(8),
        Constraint::Percentage(27),
        Constraint::Percentage(27),
        Constraint::Percentage(10),
        Constraint::Percentage(28),
    ];
    const NEW_ROUTE: Route = Route::NewPatient;

    fn id(&self) -> i64 {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.age.to_string(),
        ]
    }

    fn edit_route(id: i64) -> Route {
        Route::EditPatient(id)
    }

    fn fetch_all(api: &dyn ClinicalsApi) -> ApiResult<Vec<Self>> {
        api.list_patients()
    }

    fn delete(api: &dyn ClinicalsApi, id: i64) -> ApiResult<()> {
        api.delete_patient(id)
    }
}
