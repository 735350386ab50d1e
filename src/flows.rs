//! Flow orchestration: submit asynchronous work, then poll it to completion.
//!
//! Two flows, two poll strategies over the same loop:
//!
//! - Recording → stream id: create a recording process, then re-read the same
//!   resource until its first container carries a stream id (field presence).
//! - Transcript completion: ask the transcript endpoint for the stream until
//!   its status is COMPLETED (status enum).
//!
//! Every call blocks until its poll finishes; worst case is
//! `max_attempts × interval`.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{CorrelationHandle, JsonResponse, RecordingApi, TranscriptApi};
use crate::error::FlowError;
use crate::polling::{poll, PollOutcome, PollRequest, PollStrategy, StatusQuery};
use crate::settings::{HarnessSettings, PollSettings};
use crate::transport::{ApiResponse, Transport, TransportError};

/// Where a recording process exposes its stream id.
pub const STREAM_ID_POINTER: &str = "/recordingProcessContainers/0/streamId";

pub const STATUS_COMPLETED: &str = "COMPLETED";
pub const STATUS_PROCESSING: &str = "PROCESSING";

/// Recording-process status lookups by note id.
struct RecordingProcessQuery<'a> {
    api: &'a RecordingApi,
    token: &'a str,
}

#[async_trait]
impl<'a> StatusQuery for RecordingProcessQuery<'a> {
    async fn query(&self, note_id: &str) -> Result<ApiResponse, TransportError> {
        self.api.get_recording_process(note_id, self.token).await
    }
}

/// Transcript status lookups by stream id.
struct TranscriptQuery<'a> {
    api: &'a TranscriptApi,
    token: &'a str,
}

#[async_trait]
impl<'a> StatusQuery for TranscriptQuery<'a> {
    async fn query(&self, stream_id: &str) -> Result<ApiResponse, TransportError> {
        self.api.get_transcript(stream_id, self.token).await
    }
}

fn completion_strategy() -> PollStrategy {
    PollStrategy::status_enum(&[STATUS_COMPLETED], &[STATUS_PROCESSING])
}

/// Map a status-enum poll to the flow taxonomy.
fn converged_body(outcome: PollOutcome) -> Result<Value, FlowError> {
    match outcome {
        PollOutcome::Success(body) => Ok(body),
        PollOutcome::Failed { status, body, .. } => {
            Err(FlowError::UnexpectedStatus { status, body })
        }
        PollOutcome::Exhausted {
            attempts,
            last_status,
        } => Err(FlowError::PollExhausted {
            attempts,
            last_status,
        }),
        PollOutcome::TransportError(e) => Err(FlowError::Transport(e)),
    }
}

pub struct Flows {
    recording: RecordingApi,
    transcript: TranscriptApi,
    polling: PollSettings,
}

impl Flows {
    pub fn new(transport: Arc<dyn Transport>, settings: &HarnessSettings) -> Self {
        Self {
            recording: RecordingApi::new(transport.clone(), settings),
            transcript: TranscriptApi::new(transport, settings),
            polling: settings.polling.clone(),
        }
    }

    pub fn recording(&self) -> &RecordingApi {
        &self.recording
    }

    pub fn transcript(&self) -> &TranscriptApi {
        &self.transcript
    }

    pub async fn create_recording_process(
        &self,
        doctor_id: &str,
        note_id: &str,
        token: &str,
    ) -> Result<JsonResponse, FlowError> {
        Ok(self
            .recording
            .create_recording_process(doctor_id, note_id, token)
            .await?)
    }

    pub async fn get_recording_process(
        &self,
        note_id: &str,
        token: &str,
    ) -> Result<ApiResponse, FlowError> {
        Ok(self.recording.get_recording_process(note_id, token).await?)
    }

    pub async fn get_transcript(
        &self,
        stream_id: &str,
        token: &str,
    ) -> Result<ApiResponse, FlowError> {
        Ok(self.transcript.get_transcript(stream_id, token).await?)
    }

    /// Create a recording process and hand back its handle. The stream id is
    /// not known yet; anything but a 200 fails the submission.
    pub async fn submit_recording(
        &self,
        doctor_id: &str,
        note_id: &str,
        token: &str,
    ) -> Result<CorrelationHandle, FlowError> {
        let response = self.create_recording_process(doctor_id, note_id, token).await?;
        if !response.is_ok() {
            log::warn!(
                "Failed to create recording process for note {}: {}",
                note_id,
                response.status_code
            );
            return Err(FlowError::Submission {
                status_code: response.status_code,
                body: response.body,
            });
        }
        Ok(CorrelationHandle::Recording {
            doctor_id: doctor_id.to_string(),
            note_id: note_id.to_string(),
        })
    }

    /// Create a recording process, then poll it until the first container's
    /// stream id is non-blank.
    pub async fn poll_recording_for_stream_id(
        &self,
        doctor_id: &str,
        note_id: &str,
        token: &str,
        max_attempts: u32,
        interval: Duration,
    ) -> Result<String, FlowError> {
        // Built before submitting so a bad config leaves nothing behind.
        let request = PollRequest::new(
            note_id,
            PollStrategy::field_presence(STREAM_ID_POINTER),
            max_attempts,
            interval,
        )?;

        let handle = self.submit_recording(doctor_id, note_id, token).await?;
        let query = RecordingProcessQuery {
            api: &self.recording,
            token,
        };

        match poll(&request, &query).await {
            PollOutcome::Success(Value::String(stream_id)) => {
                log::info!("Stream ID found for {}: {}", handle, stream_id);
                Ok(stream_id)
            }
            // Numeric ids are the only other value the strategy accepts
            PollOutcome::Success(numeric) => Ok(numeric.to_string()),
            PollOutcome::Exhausted { attempts, .. } => {
                log::warn!(
                    "Stream ID for {} not available after {} attempts",
                    handle,
                    attempts
                );
                Err(FlowError::StreamIdTimeout { attempts })
            }
            PollOutcome::Failed { status, body, .. } => {
                Err(FlowError::UnexpectedStatus { status, body })
            }
            PollOutcome::TransportError(e) => Err(FlowError::Transport(e)),
        }
    }

    /// Poll the transcript for `stream_id` until COMPLETED. Any status other
    /// than COMPLETED or PROCESSING fails immediately.
    pub async fn poll_transcript_status(
        &self,
        stream_id: &str,
        token: &str,
        max_attempts: u32,
        interval: Duration,
    ) -> Result<Value, FlowError> {
        let request = PollRequest::new(stream_id, completion_strategy(), max_attempts, interval)?;
        let query = TranscriptQuery {
            api: &self.transcript,
            token,
        };
        let body = converged_body(poll(&request, &query).await)?;
        log::info!("Transcript for stream {} completed", stream_id);
        Ok(body)
    }

    /// Poll the recording process for `note_id` until COMPLETED.
    pub async fn poll_recording_status(
        &self,
        note_id: &str,
        token: &str,
        max_attempts: u32,
        interval: Duration,
    ) -> Result<Value, FlowError> {
        let request = PollRequest::new(note_id, completion_strategy(), max_attempts, interval)?;
        let query = RecordingProcessQuery {
            api: &self.recording,
            token,
        };
        let body = converged_body(poll(&request, &query).await)?;
        log::info!("Recording process for note {} completed", note_id);
        Ok(body)
    }

    /// Wait for an already submitted recording process to reach COMPLETED,
    /// with the configured attempt count.
    pub async fn recording_completion_for_note(
        &self,
        note_id: &str,
        token: &str,
    ) -> Result<Value, FlowError> {
        self.poll_recording_status(
            note_id,
            token,
            self.polling.recording_max_attempts,
            self.polling.interval(),
        )
        .await
    }

    /// Full transcript flow with the configured attempt counts: record, wait
    /// for the stream id, wait for the transcript.
    pub async fn transcript_for_note(
        &self,
        doctor_id: &str,
        note_id: &str,
        token: &str,
    ) -> Result<Value, FlowError> {
        let interval = self.polling.interval();
        let stream_id = self
            .poll_recording_for_stream_id(
                doctor_id,
                note_id,
                token,
                self.polling.stream_id_max_attempts,
                interval,
            )
            .await?;
        self.poll_transcript_status(
            &stream_id,
            token,
            self.polling.transcript_max_attempts,
            interval,
        )
        .await
    }
}
