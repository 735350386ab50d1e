pub mod api;
pub mod auth;
pub mod error;
pub mod flows;
pub mod helpers;
pub mod polling;
pub mod settings;
pub mod transport;

use serde_json::Value;
use std::sync::Arc;

use api::AppointmentsApi;
use auth::AuthError;
use error::FlowError;
use flows::Flows;
use settings::{HarnessSettings, SettingsError};
use transport::{HttpTransport, Transport, TransportError};

/// Failures of the end-to-end smoke run.
#[derive(Debug, thiserror::Error)]
pub enum SmokeError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Appointment was not created (status {status_code}): {body}")]
    Appointment { status_code: u16, body: Value },
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error("Failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Log in, create an appointment, record it and wait for its transcript.
/// Returns the completed transcript body.
pub async fn smoke_run(
    transport: Arc<dyn Transport>,
    settings: &HarnessSettings,
) -> Result<Value, SmokeError> {
    let token = auth::fetch_configured_token(transport.as_ref(), settings).await?;
    let doctor_id = auth::provider_id(&token)?;

    let appointments = AppointmentsApi::new(transport.clone(), settings);
    let appointment = appointments.create_ambient_appointment(None, &token).await?;
    let note_id = match appointment.field("noteId") {
        Some(note_id) if appointment.is_ok() => note_id,
        _ => {
            return Err(SmokeError::Appointment {
                status_code: appointment.status_code,
                body: appointment.body,
            })
        }
    };
    log::info!("Created note {} for provider {}", note_id, doctor_id);

    let flows = Flows::new(transport, settings);
    Ok(flows.transcript_for_note(&doctor_id, &note_id, &token).await?)
}

/// Entry point for the `scribe-harness` binary.
pub fn run() -> Result<(), SmokeError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let settings = HarnessSettings::from_env()?;
    log::info!(
        "Running transcript smoke flow against {}",
        settings.transcript_base_url
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let transport: Arc<dyn Transport> =
            Arc::new(HttpTransport::new(settings.request_timeout())?);
        let transcript = smoke_run(transport, &settings).await?;
        log::info!(
            "Transcript completed: {}",
            serde_json::to_string_pretty(&transcript).unwrap_or_default()
        );
        Ok::<(), SmokeError>(())
    })
}
