//! Transcript API (`transcript`, `transcript/get_notelist`, `audio/upload`).

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::{CorrelationHandle, JsonResponse};
use crate::error::FlowError;
use crate::settings::HarnessSettings;
use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};

const TRANSCRIPT_PATH: &str = "transcript";
const NOTE_LIST_PATH: &str = "transcript/get_notelist";
const UPLOAD_PATH: &str = "audio/upload";
const TRANSCRIPT_VERSION: &str = "2";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadAudioRequest<'a> {
    note_id: &'a str,
    file_path: &'a str,
}

pub struct TranscriptApi {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl TranscriptApi {
    pub fn new(transport: Arc<dyn Transport>, settings: &HarnessSettings) -> Self {
        Self {
            transport,
            base_url: settings.transcript_base_url.clone(),
        }
    }

    /// GET `transcript?version=2&streamId={stream_id}`.
    pub async fn get_transcript(
        &self,
        stream_id: &str,
        token: &str,
    ) -> Result<ApiResponse, TransportError> {
        let request = ApiRequest::get(&self.base_url, TRANSCRIPT_PATH)
            .query(&[("version", TRANSCRIPT_VERSION), ("streamId", stream_id)])
            .bearer(token);
        self.transport.send(request).await
    }

    /// POST `transcript/get_notelist` with a JSON array of note ids.
    pub async fn get_note_list(
        &self,
        note_ids: &[String],
        token: &str,
    ) -> Result<JsonResponse, TransportError> {
        let request = ApiRequest::post(&self.base_url, NOTE_LIST_PATH)
            .bearer(token)
            .json(&note_ids);
        let response = self.transport.send(request).await?;
        Ok(JsonResponse::lenient(&response))
    }

    /// POST `audio/upload` and return the stream id it assigns.
    ///
    /// Unlike recording creation, the upload must hand the stream id back in
    /// the same response; a missing, null or blank id fails the submission.
    pub async fn upload_audio(
        &self,
        note_id: &str,
        file_path: &str,
        token: &str,
    ) -> Result<CorrelationHandle, FlowError> {
        let request = ApiRequest::post(&self.base_url, UPLOAD_PATH)
            .bearer(token)
            .json(&UploadAudioRequest { note_id, file_path });
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(FlowError::Submission {
                status_code: response.status,
                body: response.json_or_error_text(),
            });
        }

        let body = response.json()?;
        match body.get("streamId").and_then(Value::as_str) {
            Some(stream_id) if !stream_id.trim().is_empty() => {
                log::info!("Uploaded audio for note {}: stream {}", note_id, stream_id);
                Ok(CorrelationHandle::Stream(stream_id.to_string()))
            }
            _ => Err(FlowError::MissingCorrelationId {
                field: "streamId".to_string(),
                body,
            }),
        }
    }
}
