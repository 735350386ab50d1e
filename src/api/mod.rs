//! Clients for the platform's HTTP APIs
//!
//! One client per service. Each holds the shared transport and its service's
//! base URL, and every call takes the bearer token explicitly so scenarios can
//! exercise missing, expired and malformed tokens.

pub mod appointments;
pub mod audio_continuity;
pub mod recording;
pub mod templates;
pub mod transcript;

pub use appointments::AppointmentsApi;
pub use audio_continuity::{AudioContinuityApi, AudioLookup};
pub use recording::RecordingApi;
pub use templates::TemplatesApi;
pub use transcript::TranscriptApi;

use serde_json::Value;
use std::fmt;

use crate::transport::{ApiResponse, TransportError};

/// Identifier a submission hands to the poller. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CorrelationHandle {
    /// Stream id returned synchronously by an upload
    Stream(String),
    /// A recording process, addressed by the note it belongs to
    Recording { doctor_id: String, note_id: String },
}

impl CorrelationHandle {
    /// The value status endpoints are queried with.
    pub fn correlation_id(&self) -> &str {
        match self {
            CorrelationHandle::Stream(stream_id) => stream_id,
            CorrelationHandle::Recording { note_id, .. } => note_id,
        }
    }
}

impl fmt::Display for CorrelationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationHandle::Stream(stream_id) => write!(f, "stream {}", stream_id),
            CorrelationHandle::Recording { doctor_id, note_id } => {
                write!(f, "recording {}/{}", doctor_id, note_id)
            }
        }
    }
}

/// Status code with the parsed body, for endpoints scenarios assert on
/// directly.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonResponse {
    pub status_code: u16,
    pub body: Value,
}

impl JsonResponse {
    /// Parse strictly: a non-blank body that is not JSON is an error. A blank
    /// body becomes `Null`.
    pub(crate) fn strict(response: &ApiResponse) -> Result<Self, TransportError> {
        let body = if response.is_blank() {
            Value::Null
        } else {
            response.json()?
        };
        Ok(Self {
            status_code: response.status,
            body,
        })
    }

    /// Parse leniently: non-JSON bodies become `{"error": <text>}`.
    pub(crate) fn lenient(response: &ApiResponse) -> Self {
        Self {
            status_code: response.status,
            body: response.json_or_error_text(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }

    /// String or numeric field of the body as a string.
    pub fn field(&self, name: &str) -> Option<String> {
        match self.body.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recording_handle_polls_by_note_id() {
        let handle = CorrelationHandle::Recording {
            doctor_id: "12".to_string(),
            note_id: "n-9".to_string(),
        };
        assert_eq!(handle.correlation_id(), "n-9");
        assert_eq!(handle.to_string(), "recording 12/n-9");
    }

    #[test]
    fn strict_parse_rejects_non_json_but_accepts_blank() {
        assert!(JsonResponse::strict(&ApiResponse::new(500, "oops")).is_err());
        let blank = JsonResponse::strict(&ApiResponse::new(204, "  ")).unwrap();
        assert_eq!(blank.body, Value::Null);
    }

    #[test]
    fn field_reads_numbers_as_strings() {
        let response = JsonResponse {
            status_code: 200,
            body: json!({ "noteId": 981, "patientName": "Test Patient" }),
        };
        assert_eq!(response.field("noteId").as_deref(), Some("981"));
        assert_eq!(response.field("patientName").as_deref(), Some("Test Patient"));
        assert_eq!(response.field("missing"), None);
    }
}
