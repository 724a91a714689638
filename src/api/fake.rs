//! In-memory [`ClinicalsApi`] that records every call, for view tests.

use super::{ApiError, ApiResult, ClinicalsApi};
use crate::models::{ClinicalData, ClinicalDataPayload, NewClinicalData, Patient, PatientPayload};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// One recorded request, with the exact payload that would have been sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListPatients,
    GetPatient(i64),
    CreatePatient(PatientPayload),
    UpdatePatient(i64, PatientPayload),
    DeletePatient(i64),
    ListClinicalData,
    GetClinicalData(i64),
    CreateClinicalData(ClinicalDataPayload),
    UpdateClinicalData(i64, ClinicalDataPayload),
    DeleteClinicalData(i64),
    CreateClinicalDataForPatient(NewClinicalData),
}

impl Call {
    fn operation(&self) -> &'static str {
        match self {
            Call::ListPatients => "list_patients",
            Call::GetPatient(_) => "get_patient",
            Call::CreatePatient(_) => "create_patient",
            Call::UpdatePatient(..) => "update_patient",
            Call::DeletePatient(_) => "delete_patient",
            Call::ListClinicalData => "list_clinical_data",
            Call::GetClinicalData(_) => "get_clinical_data",
            Call::CreateClinicalData(_) => "create_clinical_data",
            Call::UpdateClinicalData(..) => "update_clinical_data",
            Call::DeleteClinicalData(_) => "delete_clinical_data",
            Call::CreateClinicalDataForPatient(_) => "create_clinical_data_for_patient",
        }
    }
}

#[derive(Default)]
pub struct FakeApi {
    pub patients: Mutex<Vec<Patient>>,
    pub clinical_data: Mutex<Vec<ClinicalData>>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<&'static str, (u16, Option<String>)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patients(patients: Vec<Patient>) -> Self {
        let api = Self::new();
        *api.patients.lock().unwrap() = patients;
        api
    }

    pub fn with_clinical_data(records: Vec<ClinicalData>) -> Self {
        let api = Self::new();
        *api.clinical_data.lock().unwrap() = records;
        api
    }

    /// Makes every later call to `operation` fail with `status`.
    pub fn fail(&self, operation: &'static str, status: u16, message: Option<&str>) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation, (status, message.map(str::to_string)));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) -> ApiResult<()> {
        let operation = call.operation();
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(operation) {
            Some((status, message)) => Err(ApiError::Server {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::Server {
            status: 404,
            message: Some("Not found".to_string()),
        }
    }

    fn patients(&self) -> MutexGuard<'_, Vec<Patient>> {
        self.patients.lock().unwrap()
    }

    fn records(&self) -> MutexGuard<'_, Vec<ClinicalData>> {
        self.clinical_data.lock().unwrap()
    }

    fn next_patient_id(&self) -> i64 {
        self.patients().iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    fn insert_record(&self, name: &str, value: &str) {
        let mut records = self.records();
        let id = records.iter().map(|d| d.id).max().unwrap_or(0) + 1;
        records.push(ClinicalData {
            id,
            component_name: name.to_string(),
            component_value: value.to_string(),
            measured_date_time: None,
        });
    }
}

impl ClinicalsApi for FakeApi {
    fn list_patients(&self) -> ApiResult<Vec<Patient>> {
        self.record(Call::ListPatients)?;
        Ok(self.patients().clone())
    }

    fn get_patient(&self, id: i64) -> ApiResult<Patient> {
        self.record(Call::GetPatient(id))?;
        self.patients()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    fn create_patient(&self, payload: &PatientPayload) -> ApiResult<()> {
        self.record(Call::CreatePatient(payload.clone()))?;
        let patient = Patient {
            id: self.next_patient_id(),
            first_name: payload.first_name.clone(),
            last_name: payload.last_name.clone(),
            age: payload.age,
        };
        self.patients().push(patient);
        Ok(())
    }

    fn update_patient(&self, id: i64, payload: &PatientPayload) -> ApiResult<()> {
        self.record(Call::UpdatePatient(id, payload.clone()))?;
        let mut patients = self.patients();
        let patient = patients
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(Self::not_found)?;
        patient.first_name = payload.first_name.clone();
        patient.last_name = payload.last_name.clone();
        patient.age = payload.age;
        Ok(())
    }

    fn delete_patient(&self, id: i64) -> ApiResult<()> {
        self.record(Call::DeletePatient(id))?;
        self.patients().retain(|p| p.id != id);
        Ok(())
    }

    fn list_clinical_data(&self) -> ApiResult<Vec<ClinicalData>> {
        self.record(Call::ListClinicalData)?;
        Ok(self.records().clone())
    }

    fn get_clinical_data(&self, id: i64) -> ApiResult<ClinicalData> {
        self.record(Call::GetClinicalData(id))?;
        self.records()
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    fn create_clinical_data(&self, payload: &ClinicalDataPayload) -> ApiResult<()> {
        self.record(Call::CreateClinicalData(payload.clone()))?;
        self.insert_record(&payload.component_name, &payload.component_value);
        Ok(())
    }

    fn update_clinical_data(&self, id: i64, payload: &ClinicalDataPayload) -> ApiResult<()> {
        self.record(Call::UpdateClinicalData(id, payload.clone()))?;
        let mut records = self.records();
        let record = records
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(Self::not_found)?;
        record.component_name = payload.component_name.clone();
        record.component_value = payload.component_value.clone();
        Ok(())
    }

    fn delete_clinical_data(&self, id: i64) -> ApiResult<()> {
        self.record(Call::DeleteClinicalData(id))?;
        self.records().retain(|d| d.id != id);
        Ok(())
    }

    fn create_clinical_data_for_patient(&self, payload: &NewClinicalData) -> ApiResult<()> {
        self.record(Call::CreateClinicalDataForPatient(payload.clone()))?;
        self.insert_record(&payload.component_name, &payload.component_value);
        Ok(())
    }
}
