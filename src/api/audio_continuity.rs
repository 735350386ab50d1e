//! Audio-continuity API: audio metadata attached to notes.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::JsonResponse;
use crate::settings::HarnessSettings;
use crate::transport::{ApiRequest, Transport, TransportError};

const AUDIO_PATH: &str = "audio";
const AUDIOS_PATH: &str = "audios";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioMetadata {
    pub note_id: String,
    pub recording_id: String,
}

/// Ways to look up stored audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioLookup {
    UniqueId(String),
    NoteId(String),
    ProviderId(String),
    RecordingId(String),
    ProviderEmail(String),
}

impl AudioLookup {
    /// Path under the service base. All id lookups share `audios/{id}`;
    /// only email has its own route.
    fn path(&self) -> String {
        match self {
            AudioLookup::UniqueId(id)
            | AudioLookup::NoteId(id)
            | AudioLookup::ProviderId(id)
            | AudioLookup::RecordingId(id) => format!("{}/{}", AUDIOS_PATH, id),
            AudioLookup::ProviderEmail(email) => format!("{}/email/{}", AUDIOS_PATH, email),
        }
    }
}

pub struct AudioContinuityApi {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl AudioContinuityApi {
    pub fn new(transport: Arc<dyn Transport>, settings: &HarnessSettings) -> Self {
        Self {
            transport,
            base_url: settings.audio_continuity_base_url.clone(),
        }
    }

    /// POST `audio`. `None` sends the note/recording pair.
    pub async fn post_audio(
        &self,
        note_id: &str,
        recording_id: &str,
        payload: Option<Value>,
        token: &str,
    ) -> Result<JsonResponse, TransportError> {
        let request = ApiRequest::post(&self.base_url, AUDIO_PATH).bearer(token);
        let request = match payload {
            Some(body) => request.json(&body),
            None => request.json(&AudioMetadata {
                note_id: note_id.to_string(),
                recording_id: recording_id.to_string(),
            }),
        };
        let response = self.transport.send(request).await?;
        Ok(JsonResponse::lenient(&response))
    }

    /// PUT `audio`. The payload's `recordingId` is set to `recording_id`
    /// unless `recording_id` is `None`, which sends the payload untouched
    /// (negative cases omit it on purpose).
    pub async fn put_audio(
        &self,
        recording_id: Option<&str>,
        mut payload: Value,
        token: &str,
    ) -> Result<JsonResponse, TransportError> {
        if let (Some(id), Some(fields)) = (recording_id, payload.as_object_mut()) {
            fields.insert("recordingId".to_string(), Value::String(id.to_string()));
        }
        let request = ApiRequest::put(&self.base_url, AUDIO_PATH)
            .bearer(token)
            .json(&payload);
        let response = self.transport.send(request).await?;
        Ok(JsonResponse::lenient(&response))
    }

    pub async fn get_audios(
        &self,
        lookup: &AudioLookup,
        token: &str,
    ) -> Result<JsonResponse, TransportError> {
        let request = ApiRequest::get(&self.base_url, &lookup.path()).bearer(token);
        let response = self.transport.send(request).await?;
        Ok(JsonResponse::lenient(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_paths() {
        assert_eq!(AudioLookup::NoteId("n1".into()).path(), "audios/n1");
        assert_eq!(AudioLookup::RecordingId("r1".into()).path(), "audios/r1");
        assert_eq!(
            AudioLookup::ProviderEmail("a@b.c".into()).path(),
            "audios/email/a@b.c"
        );
    }
}
