//! Client for the patient services REST API.
//!
//! Views talk to the backend only through the [`ClinicalsApi`] trait so that
//! they can be driven by an in-memory fake in tests. [`HttpApi`] is the real
//! implementation.

pub mod error;
#[cfg(test)]
pub mod fake;
pub mod http;
pub mod worker;

pub use error::{ApiError, ApiResult};
pub use http::HttpApi;
pub use worker::{InFlight, Requests, SharedApi};

use crate::models::{ClinicalData, ClinicalDataPayload, NewClinicalData, Patient, PatientPayload};

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/patientservices/api";

/// Typed operations on the `patients` and `clinicaldata` resources.
///
/// Every call is a single request/response without retries. Creates and
/// updates only report success; the views reload what they show.
pub trait ClinicalsApi {
    fn list_patients(&self) -> ApiResult<Vec<Patient>>;
    fn get_patient(&self, id: i64) -> ApiResult<Patient>;
    fn create_patient(&self, payload: &PatientPayload) -> ApiResult<()>;
    fn update_patient(&self, id: i64, payload: &PatientPayload) -> ApiResult<()>;
    fn delete_patient(&self, id: i64) -> ApiResult<()>;

    fn list_clinical_data(&self) -> ApiResult<Vec<ClinicalData>>;
    fn get_clinical_data(&self, id: i64) -> ApiResult<ClinicalData>;
    /// `POST /clinicaldata`. Cannot link a patient; the forms use
    /// [`ClinicalsApi::create_clinical_data_for_patient`] instead.
    fn create_clinical_data(&self, payload: &ClinicalDataPayload) -> ApiResult<()>;
    /// Updates name and value only. The patient link is never re-sent.
    fn update_clinical_data(&self, id: i64, payload: &ClinicalDataPayload) -> ApiResult<()>;
    fn delete_clinical_data(&self, id: i64) -> ApiResult<()>;
    /// `POST /clinicaldata/save`, creating a measurement for `payload.patient_id`.
    fn create_clinical_data_for_patient(&self, payload: &NewClinicalData) -> ApiResult<()>;
}
