use crate::api::api_error::ApiError;
use crate::api::models::*;
use crate::errors::FieldError;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("barangay-portal/", env!("CARGO_PKG_VERSION"));

/// Blocking client for the barangay backend REST API.
///
/// The backend is the single source of truth: this client only lists
/// collections and relays mutations. The caller's session cookie is
/// forwarded on every request; a 401 from any endpoint surfaces as
/// `ApiError::Unauthorized` and is handled process-wide.
pub struct BackendClient {
    client: Client,
    base: Url,
}

impl BackendClient {
    pub fn new(base: Url) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!("{}/{}", self.base.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| ApiError::Network(format!("bad endpoint {path}: {e}")))
    }

    fn send(&self, req: RequestBuilder, session: &str) -> Result<Response, ApiError> {
        req.header("Cookie", format!("session={session}"))
            .header("Accept", "application/json")
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    /// Map a non-success status onto the error taxonomy. `subject` names
    /// what was being acted on, for the not-found toast.
    fn check_status(resp: Response, subject: &str) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().unwrap_or_else(|_| "(no body)".to_string());
        match status.as_u16() {
            401 => Err(ApiError::Unauthorized),
            403 => Err(ApiError::NotFound(format!("{subject} (no permission)"))),
            404 => Err(ApiError::NotFound(subject.to_string())),
            400 | 422 => Err(ApiError::Validation(parse_field_errors(&body))),
            code => Err(ApiError::Backend { status: code, body }),
        }
    }

    /// GET a collection. Accepts either a bare JSON array or an envelope
    /// (`data` / `results` / `records`); malformed rows are skipped with a
    /// log line rather than failing the whole list.
    fn get_collection<T: DeserializeOwned>(
        &self,
        path: &str,
        session: &str,
    ) -> Result<Vec<T>, ApiError> {
        let url = self.endpoint(path)?;
        let resp = self.send(self.client.get(url), session)?;
        let resp = Self::check_status(resp, path)?;

        let value: Value = resp
            .json()
            .map_err(|e| ApiError::UnexpectedShape(format!("{path}: {e}")))?;
        parse_collection(value, path)
    }

    fn post_json<B: Serialize>(&self, path: &str, session: &str, body: &B, subject: &str) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        let resp = self.send(self.client.post(url).json(body), session)?;
        Self::check_status(resp, subject).map(|_| ())
    }

    fn patch_json<B: Serialize>(&self, path: &str, session: &str, body: &B, subject: &str) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        let resp = self.send(self.client.patch(url).json(body), session)?;
        Self::check_status(resp, subject).map(|_| ())
    }

    fn delete(&self, path: &str, session: &str, subject: &str) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        let resp = self.send(self.client.delete(url), session)?;
        Self::check_status(resp, subject).map(|_| ())
    }

    // ----- Blotter records -----

    pub fn list_blotters(&self, session: &str) -> Result<Vec<BlotterRecord>, ApiError> {
        self.get_collection("blotters", session)
    }

    pub fn create_blotter(&self, session: &str, payload: &NewBlotter) -> Result<(), ApiError> {
        self.post_json("blotters", session, payload, "new blotter record")
    }

    pub fn update_blotter(
        &self,
        session: &str,
        id: i64,
        payload: &NewBlotter,
    ) -> Result<(), ApiError> {
        self.patch_json(
            &format!("blotters/{id}"),
            session,
            payload,
            &format!("blotter record #{id}"),
        )
    }

    /// Status-only update. The portal sends the *request*; transition
    /// legality is the backend's call.
    pub fn update_blotter_status(
        &self,
        session: &str,
        id: i64,
        status: BlotterStatus,
    ) -> Result<(), ApiError> {
        self.patch_json(
            &format!("blotters/{id}/status"),
            session,
            &serde_json::json!({ "status": status.as_str() }),
            &format!("blotter record #{id}"),
        )
    }

    pub fn delete_blotter(&self, session: &str, id: i64) -> Result<(), ApiError> {
        self.delete(
            &format!("blotters/{id}"),
            session,
            &format!("blotter record #{id}"),
        )
    }

    // ----- Appointments (blotter requests) -----

    pub fn list_appointments(&self, session: &str) -> Result<Vec<Appointment>, ApiError> {
        self.get_collection("appointments", session)
    }

    pub fn create_appointment(
        &self,
        session: &str,
        payload: &NewAppointment,
    ) -> Result<(), ApiError> {
        self.post_json("appointments", session, payload, "new appointment")
    }

    pub fn update_appointment_status(
        &self,
        session: &str,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<(), ApiError> {
        self.patch_json(
            &format!("appointments/{id}/status"),
            session,
            &serde_json::json!({ "status": status.as_str() }),
            &format!("appointment #{id}"),
        )
    }

    pub fn delete_appointment(&self, session: &str, id: i64) -> Result<(), ApiError> {
        self.delete(
            &format!("appointments/{id}"),
            session,
            &format!("appointment #{id}"),
        )
    }

    // ----- Announcements -----

    pub fn list_announcements(&self, session: &str) -> Result<Vec<Announcement>, ApiError> {
        self.get_collection("announcements", session)
    }

    pub fn create_announcement(
        &self,
        session: &str,
        payload: &NewAnnouncement,
    ) -> Result<(), ApiError> {
        self.post_json("announcements", session, payload, "new announcement")
    }

    pub fn update_announcement(
        &self,
        session: &str,
        id: i64,
        payload: &NewAnnouncement,
    ) -> Result<(), ApiError> {
        self.patch_json(
            &format!("announcements/{id}"),
            session,
            payload,
            &format!("announcement #{id}"),
        )
    }

    pub fn delete_announcement(&self, session: &str, id: i64) -> Result<(), ApiError> {
        self.delete(
            &format!("announcements/{id}"),
            session,
            &format!("announcement #{id}"),
        )
    }

    // ----- Programs & beneficiaries -----

    pub fn list_programs(&self, session: &str) -> Result<Vec<Program>, ApiError> {
        self.get_collection("programs", session)
    }

    pub fn create_program(&self, session: &str, payload: &NewProgram) -> Result<(), ApiError> {
        self.post_json("programs", session, payload, "new program")
    }

    pub fn update_program_status(
        &self,
        session: &str,
        id: i64,
        status: ProgramStatus,
    ) -> Result<(), ApiError> {
        self.patch_json(
            &format!("programs/{id}/status"),
            session,
            &serde_json::json!({ "status": status.as_str() }),
            &format!("program #{id}"),
        )
    }

    pub fn list_beneficiaries(
        &self,
        session: &str,
        program_id: i64,
    ) -> Result<Vec<Beneficiary>, ApiError> {
        self.get_collection(&format!("programs/{program_id}/beneficiaries"), session)
    }

    pub fn create_beneficiary(
        &self,
        session: &str,
        payload: &NewBeneficiary,
    ) -> Result<(), ApiError> {
        self.post_json(
            &format!("programs/{}/beneficiaries", payload.program_id),
            session,
            payload,
            "new beneficiary",
        )
    }

    pub fn remove_beneficiary(
        &self,
        session: &str,
        program_id: i64,
        id: i64,
    ) -> Result<(), ApiError> {
        self.delete(
            &format!("programs/{program_id}/beneficiaries/{id}"),
            session,
            &format!("beneficiary #{id}"),
        )
    }
}

/// Unwrap a collection response. Rows that fail to deserialize are logged
/// and skipped: one bad legacy row must not blank the whole screen.
fn parse_collection<T: DeserializeOwned>(value: Value, path: &str) -> Result<Vec<T>, ApiError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let inner = ["data", "results", "records"]
                .iter()
                .find_map(|k| map.remove(*k));
            match inner {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(ApiError::UnexpectedShape(format!(
                        "{path}: expected an array or a collection envelope"
                    )))
                }
            }
        }
        _ => {
            return Err(ApiError::UnexpectedShape(format!(
                "{path}: expected an array or a collection envelope"
            )))
        }
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value(item) {
            Ok(parsed) => out.push(parsed),
            Err(e) => eprintln!("Skipping malformed row from {path}: {e}"),
        }
    }
    Ok(out)
}

/// Pull field-level messages out of a validation response. Understands
/// both `{"errors": {"field": ["msg", ...]}}` and
/// `{"errors": [{"field": ..., "message": ...}]}`; anything else becomes
/// a single form-wide message.
fn parse_field_errors(body: &str) -> Vec<FieldError> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return vec![FieldError {
            field: "form".to_string(),
            message: if body.is_empty() {
                "request rejected".to_string()
            } else {
                body.to_string()
            },
        }];
    };

    let errors = value.get("errors").unwrap_or(&value);
    let mut out = Vec::new();

    match errors {
        Value::Object(map) => {
            for (field, messages) in map {
                match messages {
                    Value::Array(msgs) => {
                        for m in msgs {
                            if let Some(text) = m.as_str() {
                                out.push(FieldError {
                                    field: field.clone(),
                                    message: text.to_string(),
                                });
                            }
                        }
                    }
                    Value::String(text) => out.push(FieldError {
                        field: field.clone(),
                        message: text.clone(),
                    }),
                    _ => {}
                }
            }
        }
        Value::Array(entries) => {
            for entry in entries {
                let field = entry
                    .get("field")
                    .and_then(Value::as_str)
                    .unwrap_or("form");
                let message = entry
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("invalid value");
                out.push(FieldError {
                    field: field.to_string(),
                    message: message.to_string(),
                });
            }
        }
        _ => {}
    }

    if out.is_empty() {
        out.push(FieldError {
            field: "form".to_string(),
            message: "request rejected by the backend".to_string(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::BlotterRecord;

    #[test]
    fn collection_accepts_bare_arrays_and_envelopes() {
        let bare = serde_json::json!([{"id": 1}, {"id": 2}]);
        let rows: Vec<BlotterRecord> = parse_collection(bare, "blotters").unwrap();
        assert_eq!(rows.len(), 2);

        let envelope = serde_json::json!({"data": [{"id": 3}]});
        let rows: Vec<BlotterRecord> = parse_collection(envelope, "blotters").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 3);
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let mixed = serde_json::json!([{"id": 1}, {"no_id_at_all": true}, {"id": 2}]);
        let rows: Vec<BlotterRecord> = parse_collection(mixed, "blotters").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn scalar_response_is_an_unexpected_shape() {
        let err = parse_collection::<BlotterRecord>(serde_json::json!(42), "blotters");
        assert!(matches!(err, Err(ApiError::UnexpectedShape(_))));
    }

    #[test]
    fn field_errors_parse_both_common_shapes() {
        let map_shape = r#"{"errors": {"complainant_name": ["is required"]}}"#;
        let errs = parse_field_errors(map_shape);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].field, "complainant_name");

        let list_shape = r#"{"errors": [{"field": "incident_date", "message": "must be a date"}]}"#;
        let errs = parse_field_errors(list_shape);
        assert_eq!(errs[0].field, "incident_date");

        let garbage = parse_field_errors("<html>oops</html>");
        assert_eq!(garbage[0].field, "form");
    }
}
