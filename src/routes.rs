//! Navigation targets and their path form.

use std::fmt;

/// Every screen the console can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,
    /// `/patients`
    Patients,
    /// `/patients/new`
    NewPatient,
    /// `/patients/edit/{id}`
    EditPatient(i64),
    /// `/clinical-data`
    ClinicalData,
    /// `/clinical-data/new`
    NewClinicalData,
    /// `/clinical-data/edit/{id}`
    EditClinicalData(i64),
}

impl Route {
    /// Matches a path against the seven known routes.
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();
        if !path.trim().starts_with('/') {
            return None;
        }
        match segments.as_slice() {
            [] => Some(Route::Home),
            ["patients"] => Some(Route::Patients),
            ["patients", "new"] => Some(Route::NewPatient),
            ["patients", "edit", id] => id.parse().ok().map(Route::EditPatient),
            ["clinical-data"] => Some(Route::ClinicalData),
            ["clinical-data", "new"] => Some(Route::NewClinicalData),
            ["clinical-data", "edit", id] => id.parse().ok().map(Route::EditClinicalData),
            _ => None,
        }
    }

    /// The path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Patients => "/patients".to_string(),
            Route::NewPatient => "/patients/new".to_string(),
            Route::EditPatient(id) => format!("/patients/edit/{id}"),
            Route::ClinicalData => "/clinical-data".to_string(),
            Route::NewClinicalData => "/clinical-data/new".to_string(),
            Route::EditClinicalData(id) => format!("/clinical-data/edit/{id}"),
        }
    }

    /// The navbar section this route belongs to.
    pub fn section(&self) -> Section {
        match self {
            Route::Home => Section::Home,
            Route::Patients | Route::NewPatient | Route::EditPatient(_) => Section::Patients,
            Route::ClinicalData | Route::NewClinicalData | Route::EditClinicalData(_) => {
                Section::ClinicalData
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    Patients,
    ClinicalData,
}
