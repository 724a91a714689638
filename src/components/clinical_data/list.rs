//! Clinical data list view.

use crate::api::{ApiResult, ClinicalsApi};
use crate::components::list::{ListResource, ListView};
use crate::models::ClinicalData;
use crate::routes::Route;
use ratatui::layout::Constraint;

pub type ClinicalDataList = ListView<ClinicalData>;

impl ListResource for ClinicalData {
    const TITLE: &'static str = "🩺 CLINICAL DATA MANAGEMENT";
    const PLURAL: &'static str = "clinical data";
    const SINGULAR: &'static str = "clinical data";
    const LOADED_MESSAGE: &'static str = "Clinical data loaded successfully!";
    const DELETED_MESSAGE: &'static str = "Clinical data deleted successfully!";
    const CONFIRM_MESSAGE: &'static str =
        "Are you sure you want to delete this clinical data record?";
    const SEARCH_PLACEHOLDER: &'static str = "Search by component name or value...";
    const ADD_LABEL: &'static str = "Add New Clinical Data";
    const HEADERS: &'static [&'static str] = &[
        "ID",
        "Component Name",
        "Component Value",
        "Measured Date & Time",
    ];
    const WIDTHS: &'static [Constraint] = &[
        Constraint::Percentage(8),
        Constraint::Percentage(24),
        Constraint::Percentage(20),
        Constraint::Percentage(22),
        Constraint::Percentage(26),
    ];
    const NEW_ROUTE: Route = Route::NewClinicalData;

    fn id(&self) -> i64 {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.component_name.clone(),
            self.component_value.clone(),
            self.measured_display(),
        ]
    }

    fn edit_route(id: i64) -> Route {
        Route::EditClinicalData(id)
    }

    fn fetch_all(api: &dyn ClinicalsApi) -> ApiResult<Vec<Self>> {
        api.list_clinical_data()
    }

    fn delete(api: &dyn ClinicalsApi, id: i64) -> ApiResult<()> {
        api.delete_clinical_data(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{Call, FakeApi};
    use crate::components::testing::{context, drain, key, type_text};
    use crate::components::Component;
    use crate::models::MeasuredAt;
    use crate::notify::Level;
    use crossterm::event::KeyCode;

    fn record(id: i64, name: &str, value: &str) -> ClinicalData {
        ClinicalData {
            id,
            component_name: name.to_string(),
            component_value: value.to_string(),
            measured_date_time: Some(MeasuredAt::Text("2024-03-05T14:07:09".to_string())),
        }
    }

    fn sample() -> Vec<ClinicalData> {
        vec![
            record(1, "Heart Rate", "72 bpm"),
            record(2, "Blood Pressure", "120/80"),
            record(13, "Temperature", "98.6F"),
        ]
    }

    #[test]
    fn rows_show_the_formatted_timestamp() {
        assert_eq!(record(1, "bp", "1").cells()[3], "2024-03-05 14:07:09");
    }

    #[test]
    fn search_matches_name_value_and_id() {
        let (ctx, _api, _toasts) = context(FakeApi::with_clinical_data(sample()));
        let mut view = ClinicalDataList::new(ctx);
        view.update().unwrap();

        view.handle_input(key(KeyCode::Tab)).unwrap();
        type_text(&mut view, "HEART");
        let ids: Vec<i64> = view.rows().filtered().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1]);

        for _ in 0..5 {
            view.handle_input(key(KeyCode::Backspace)).unwrap();
        }
        type_text(&mut view, "1");
        let ids: Vec<i64> = view.rows().filtered().iter().map(|d| d.id).collect();
        // id 1, "120/80" and id 13.
        assert_eq!(ids, vec![1, 2, 13]);
    }

    #[test]
    fn failed_fetch_mentions_clinical_data() {
        let api = FakeApi::new();
        api.fail("list_clinical_data", 500, None);
        let (ctx, _api, mut toasts) = context(api);
        let mut view = ClinicalDataList::new(ctx);
        view.update().unwrap();

        let notes = drain(&mut toasts);
        assert_eq!(notes[0].level, Level::Error);
        assert_eq!(
            notes[0].message,
            "Failed to fetch clinical data: Request failed with status code 500"
        );
    }

    #[test]
    fn delete_uses_the_clinical_data_endpoint() {
        let (ctx, api, mut toasts) = context(FakeApi::with_clinical_data(sample()));
        let mut view = ClinicalDataList::new(ctx);
        view.update().unwrap();
        api.clear_calls();
        drain(&mut toasts);

        view.handle_input(key(KeyCode::Down)).unwrap();
        view.handle_input(key(KeyCode::Delete)).unwrap();
        view.handle_input(key(KeyCode::Char('y'))).unwrap();
        view.update().unwrap();
        view.update().unwrap();

        assert_eq!(
            api.calls(),
            vec![Call::DeleteClinicalData(2), Call::ListClinicalData]
        );
        assert_eq!(
            drain(&mut toasts)[0].message,
            "Clinical data deleted successfully!"
        );
    }

    #[test]
    fn edit_route_targets_clinical_data() {
        let (ctx, _api, _toasts) = context(FakeApi::with_clinical_data(sample()));
        let mut view = ClinicalDataList::new(ctx);
        view.update().unwrap();
        assert_eq!(
            view.handle_input(key(KeyCode::Char('e'))).unwrap(),
            Some(Route::EditClinicalData(1))
        );
    }
}
