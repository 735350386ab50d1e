//! Appointments API (`note/v1/provider/patients`).
//!
//! Every scenario starts here: creating an ambient appointment yields the
//! note id that recording and transcript flows hang off.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::JsonResponse;
use crate::helpers::{formatted_date, random_alphanumeric};
use crate::settings::HarnessSettings;
use crate::transport::{ApiRequest, Transport, TransportError};

const PATIENTS_PATH: &str = "note/v1/provider/patients";
const INTERNAL_STATUS_PATH: &str = "note/v1/open/internal/provider/patients";

/// Visit dates default to three days out so notes never collide with today's
/// schedule.
const DEFAULT_VISIT_OFFSET_DAYS: i64 = 3;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbientAppointment {
    pub patient_name: String,
    pub visit_date: String,
}

impl Default for AmbientAppointment {
    fn default() -> Self {
        Self {
            patient_name: format!("Test Patient {}", random_alphanumeric(6)),
            visit_date: formatted_date(DEFAULT_VISIT_OFFSET_DAYS, "%Y-%m-%d"),
        }
    }
}

pub struct AppointmentsApi {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl AppointmentsApi {
    pub fn new(transport: Arc<dyn Transport>, settings: &HarnessSettings) -> Self {
        Self {
            transport,
            base_url: settings.appointments_base_url.clone(),
        }
    }

    /// POST a new patient note. `None` sends a generated [`AmbientAppointment`].
    pub async fn create_ambient_appointment(
        &self,
        payload: Option<Value>,
        token: &str,
    ) -> Result<JsonResponse, TransportError> {
        let request = ApiRequest::post(&self.base_url, PATIENTS_PATH).bearer(token);
        let request = match payload {
            Some(body) => request.json(&body),
            None => request.json(&AmbientAppointment::default()),
        };
        let response = self.transport.send(request).await?;
        Ok(JsonResponse::lenient(&response))
    }

    pub async fn get_notes_by_visit_date(
        &self,
        visit_date: &str,
        token: &str,
    ) -> Result<JsonResponse, TransportError> {
        let request = ApiRequest::get(&self.base_url, PATIENTS_PATH)
            .query(&[("visitDate", visit_date)])
            .bearer(token);
        let response = self.transport.send(request).await?;
        Ok(JsonResponse::lenient(&response))
    }

    /// PATCH a note with the given fields.
    pub async fn update_note(
        &self,
        note_id: &str,
        payload: &Value,
        token: &str,
    ) -> Result<JsonResponse, TransportError> {
        let request = ApiRequest::patch(&self.base_url, &format!("{}/{}", PATIENTS_PATH, note_id))
            .bearer(token)
            .json(payload);
        let response = self.transport.send(request).await?;
        Ok(JsonResponse::lenient(&response))
    }

    /// PATCH the note status through the internal endpoint.
    pub async fn update_note_status_internal(
        &self,
        note_id: &str,
        note_status: &str,
        token: &str,
    ) -> Result<JsonResponse, TransportError> {
        let request = ApiRequest::patch(&self.base_url, INTERNAL_STATUS_PATH)
            .query(&[("noteId", note_id), ("noteStatus", note_status)])
            .bearer(token);
        let response = self.transport.send(request).await?;
        Ok(JsonResponse::lenient(&response))
    }

    pub async fn delete_appointment_note(
        &self,
        note_id: &str,
        token: &str,
    ) -> Result<JsonResponse, TransportError> {
        let request =
            ApiRequest::delete(&self.base_url, &format!("{}/{}", PATIENTS_PATH, note_id))
                .bearer(token);
        let response = self.transport.send(request).await?;
        Ok(JsonResponse::lenient(&response))
    }
}
