//! reqwest implementation of [`ClinicalsApi`].

use super::error::{server_message, ApiError, ApiResult};
use super::ClinicalsApi;
use crate::models::{ClinicalData, ClinicalDataPayload, NewClinicalData, Patient, PatientPayload};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const PATIENTS: &str = "patients";
const CLINICAL_DATA: &str = "clinicaldata";

/// Blocking HTTP client bound to one base URL.
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// Creates a client for `base_url`, e.g. `http://localhost:8080/patientservices/api`.
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(headers).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Sends the request and turns non-2xx answers into [`ApiError::Server`].
    fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending request");

        let response = self.client.execute(request).map_err(|e| {
            warn!(%method, %url, error = %e, "request failed");
            ApiError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let message = server_message(&body);
        warn!(%method, %url, status = status.as_u16(), ?message, "server rejected request");
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(request)?;
        Ok(response.json()?)
    }

    /// Sends a mutation. Any 2xx counts as success, whatever the body holds.
    fn execute(&self, request: RequestBuilder) -> ApiResult<()> {
        self.send(request)?;
        Ok(())
    }
}

impl ClinicalsApi for HttpApi {
    fn list_patients(&self) -> ApiResult<Vec<Patient>> {
        self.fetch(self.client.get(self.url(PATIENTS)))
    }

    fn get_patient(&self, id: i64) -> ApiResult<Patient> {
        self.fetch(self.client.get(self.url(&format!("{PATIENTS}/{id}"))))
    }

    fn create_patient(&self, payload: &PatientPayload) -> ApiResult<()> {
        self.execute(self.client.post(self.url(PATIENTS)).json(payload))
    }

    fn update_patient(&self, id: i64, payload: &PatientPayload) -> ApiResult<()> {
        self.execute(
            self.client
                .put(self.url(&format!("{PATIENTS}/{id}")))
                .json(payload),
        )
    }

    fn delete_patient(&self, id: i64) -> ApiResult<()> {
        self.execute(self.client.delete(self.url(&format!("{PATIENTS}/{id}"))))
    }

    fn list_clinical_data(&self) -> ApiResult<Vec<ClinicalData>> {
        self.fetch(self.client.get(self.url(CLINICAL_DATA)))
    }

    fn get_clinical_data(&self, id: i64) -> ApiResult<ClinicalData> {
        self.fetch(self.client.get(self.url(&format!("{CLINICAL_DATA}/{id}"))))
    }

    fn create_clinical_data(&self, payload: &ClinicalDataPayload) -> ApiResult<()> {
        self.execute(self.client.post(self.url(CLINICAL_DATA)).json(payload))
    }

    fn update_clinical_data(&self, id: i64, payload: &ClinicalDataPayload) -> ApiResult<()> {
        self.execute(
            self.client
                .put(self.url(&format!("{CLINICAL_DATA}/{id}")))
                .json(payload),
        )
    }

    fn delete_clinical_data(&self, id: i64) -> ApiResult<()> {
        self.execute(self.client.delete(self.url(&format!("{CLINICAL_DATA}/{id}"))))
    }

    fn create_clinical_data_for_patient(&self, payload: &NewClinicalData) -> ApiResult<()> {
        self.execute(
            self.client
                .post(self.url(&format!("{CLINICAL_DATA}/save")))
                .json(payload),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// What the loopback server saw.
    struct Received {
        request_line: String,
        content_type: Option<String>,
        body: String,
    }

    impl Received {
        fn json(&self) -> Value {
            serde_json::from_str(&self.body).unwrap()
        }
    }

    /// Answers exactly one request with `status` and `reply`, returning the API
    /// bound to it and a handle yielding the captured request.
    fn serve_once(status: &'static str, reply: impl Into<String>) -> (HttpApi, JoinHandle<Received>) {
        let reply = reply.into();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!(
            "http://{}/patientservices/api",
            listener.local_addr().unwrap()
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();

            let mut content_length = 0;
            let mut content_type = None;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    match name.trim().to_ascii_lowercase().as_str() {
                        "content-length" => content_length = value.trim().parse().unwrap(),
                        "content-type" => content_type = Some(value.trim().to_string()),
                        _ => {}
                    }
                }
            }
            let mut body = vec![0; content_length];
            reader.read_exact(&mut body).unwrap();

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
                reply.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();

            Received {
                request_line: request_line.trim_end().to_string(),
                content_type,
                body: String::from_utf8(body).unwrap(),
            }
        });

        (HttpApi::new(base_url).unwrap(), handle)
    }

    fn patient_payload() -> PatientPayload {
        PatientPayload {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            age: 34,
        }
    }

    fn clinical_payload() -> ClinicalDataPayload {
        ClinicalDataPayload {
            component_name: "Heart Rate".to_string(),
            component_value: "72".to_string(),
        }
    }

    const ANN: &str = r#"{"id":3,"firstName":"Ann","lastName":"Lee","age":34}"#;
    const PULSE: &str = r#"{"id":4,"componentName":"Heart Rate","componentValue":"72","measuredDateTime":"2024-03-05T14:07:09"}"#;

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let api = HttpApi::new("http://localhost:8080/patientservices/api/").unwrap();
        assert_eq!(api.base_url(), "http://localhost:8080/patientservices/api");
        assert_eq!(
            api.url("clinicaldata/save"),
            "http://localhost:8080/patientservices/api/clinicaldata/save"
        );
    }

    #[test]
    fn unreachable_server_is_a_transport_error() {
        // Port 9 (discard) is closed on any sane test machine.
        let api = HttpApi::new("http://127.0.0.1:9/patientservices/api").unwrap();
        let err = api.list_patients().unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(!err.user_message().is_empty());
    }

    #[test]
    fn list_patients_gets_the_collection() {
        let (api, server) = serve_once("200 OK", "[]");
        assert!(api.list_patients().unwrap().is_empty());
        let received = server.join().unwrap();
        assert_eq!(
            received.request_line,
            "GET /patientservices/api/patients HTTP/1.1"
        );
        assert!(received.body.is_empty());
    }

    #[test]
    fn get_patient_decodes_the_entity() {
        let (api, server) = serve_once("200 OK", ANN);
        let patient = api.get_patient(3).unwrap();
        assert_eq!(patient.first_name, "Ann");
        assert_eq!(patient.age, 34);
        assert_eq!(
            server.join().unwrap().request_line,
            "GET /patientservices/api/patients/3 HTTP/1.1"
        );
    }

    #[test]
    fn create_patient_posts_json() {
        let (api, server) = serve_once("201 Created", ANN);
        api.create_patient(&patient_payload()).unwrap();
        let received = server.join().unwrap();
        assert_eq!(
            received.request_line,
            "POST /patientservices/api/patients HTTP/1.1"
        );
        assert_eq!(received.content_type.as_deref(), Some("application/json"));
        assert_eq!(
            received.json(),
            json!({"firstName": "Ann", "lastName": "Lee", "age": 34})
        );
    }

    #[test]
    fn update_patient_puts_json() {
        let (api, server) = serve_once("200 OK", ANN);
        api.update_patient(3, &patient_payload()).unwrap();
        let received = server.join().unwrap();
        assert_eq!(
            received.request_line,
            "PUT /patientservices/api/patients/3 HTTP/1.1"
        );
        assert_eq!(
            received.json(),
            json!({"firstName": "Ann", "lastName": "Lee", "age": 34})
        );
    }

    #[test]
    fn update_with_empty_success_body_is_not_an_error() {
        let (api, server) = serve_once("200 OK", "");
        assert!(api.update_patient(1, &patient_payload()).is_ok());
        assert_eq!(
            server.join().unwrap().request_line,
            "PUT /patientservices/api/patients/1 HTTP/1.1"
        );
    }

    #[test]
    fn create_with_non_entity_success_body_is_not_an_error() {
        let (api, server) = serve_once("200 OK", "\"saved\"");
        let payload = NewClinicalData {
            component_name: "Heart Rate".to_string(),
            component_value: "72".to_string(),
            patient_id: 9,
        };
        assert!(api.create_clinical_data_for_patient(&payload).is_ok());
        server.join().unwrap();
    }

    #[test]
    fn delete_patient_sends_delete() {
        let (api, server) = serve_once("204 No Content", "");
        api.delete_patient(3).unwrap();
        assert_eq!(
            server.join().unwrap().request_line,
            "DELETE /patientservices/api/patients/3 HTTP/1.1"
        );
    }

    #[test]
    fn list_clinical_data_gets_the_collection() {
        let (api, server) = serve_once("200 OK", format!("[{PULSE}]"));
        let records = api.list_clinical_data().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].measured_display(), "2024-03-05 14:07:09");
        assert_eq!(
            server.join().unwrap().request_line,
            "GET /patientservices/api/clinicaldata HTTP/1.1"
        );
    }

    #[test]
    fn get_clinical_data_decodes_the_entity() {
        let (api, server) = serve_once("200 OK", PULSE);
        assert_eq!(api.get_clinical_data(4).unwrap().component_name, "Heart Rate");
        assert_eq!(
            server.join().unwrap().request_line,
            "GET /patientservices/api/clinicaldata/4 HTTP/1.1"
        );
    }

    #[test]
    fn generic_create_posts_to_the_collection() {
        let (api, server) = serve_once("201 Created", PULSE);
        api.create_clinical_data(&clinical_payload()).unwrap();
        let received = server.join().unwrap();
        assert_eq!(
            received.request_line,
            "POST /patientservices/api/clinicaldata HTTP/1.1"
        );
        assert_eq!(
            received.json(),
            json!({"componentName": "Heart Rate", "componentValue": "72"})
        );
    }

    #[test]
    fn create_for_patient_posts_to_save_with_patient_id() {
        let (api, server) = serve_once("200 OK", PULSE);
        let payload = NewClinicalData {
            component_name: "Heart Rate".to_string(),
            component_value: "72".to_string(),
            patient_id: 9,
        };
        api.create_clinical_data_for_patient(&payload).unwrap();
        let received = server.join().unwrap();
        assert_eq!(
            received.request_line,
            "POST /patientservices/api/clinicaldata/save HTTP/1.1"
        );
        assert_eq!(
            received.json(),
            json!({"componentName": "Heart Rate", "componentValue": "72", "patientId": 9})
        );
    }

    #[test]
    fn update_clinical_data_omits_patient() {
        let (api, server) = serve_once("200 OK", PULSE);
        api.update_clinical_data(4, &clinical_payload()).unwrap();
        let received = server.join().unwrap();
        assert_eq!(
            received.request_line,
            "PUT /patientservices/api/clinicaldata/4 HTTP/1.1"
        );
        assert_eq!(
            received.json(),
            json!({"componentName": "Heart Rate", "componentValue": "72"})
        );
    }

    #[test]
    fn delete_clinical_data_sends_delete() {
        let (api, server) = serve_once("200 OK", "");
        api.delete_clinical_data(4).unwrap();
        assert_eq!(
            server.join().unwrap().request_line,
            "DELETE /patientservices/api/clinicaldata/4 HTTP/1.1"
        );
    }

    #[test]
    fn server_message_is_surfaced_from_error_body() {
        let (api, server) = serve_once("404 Not Found", r#"{"message":"Patient not found with id 9"}"#);
        let payload = NewClinicalData {
            component_name: "Heart Rate".to_string(),
            component_value: "72".to_string(),
            patient_id: 9,
        };
        let err = api.create_clinical_data_for_patient(&payload).unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 404, .. }));
        assert_eq!(err.user_message(), "Patient not found with id 9");
        server.join().unwrap();
    }

    #[test]
    fn error_without_message_falls_back_to_status_text() {
        let (api, server) = serve_once("500 Internal Server Error", "oops");
        let err = api.list_clinical_data().unwrap_err();
        assert_eq!(err.user_message(), "Request failed with status code 500");
        server.join().unwrap();
    }
}
