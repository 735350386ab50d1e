use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default settings file, looked up in the working directory.
pub const SETTINGS_FILE_NAME: &str = "harness.json";

const SETTINGS_PATH_ENV: &str = "HARNESS_SETTINGS";
const USERNAME_ENV: &str = "HARNESS_USERNAME";
const PASSWORD_ENV: &str = "HARNESS_PASSWORD";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse settings {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Base URLs, credentials and polling defaults for one target environment.
///
/// Passed explicitly to every API client; nothing reads configuration from a
/// global.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessSettings {
    pub auth_base_url: String,
    /// Path of the login endpoint under `auth_base_url`.
    pub auth_path: String,
    pub appointments_base_url: String,
    pub recording_api_base_url: String,
    pub transcript_base_url: String,
    pub audio_continuity_base_url: String,
    pub template_base_url: String,

    /// Provider account used by scenarios. Usually supplied via environment.
    pub username: Option<String>,
    pub password: Option<String>,

    /// Per-request timeout on the HTTP client.
    pub request_timeout_secs: u64,

    pub polling: PollSettings,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            auth_base_url: "http://localhost:8080".to_string(),
            auth_path: "auth/login".to_string(),
            appointments_base_url: "http://localhost:8080".to_string(),
            recording_api_base_url: "http://localhost:8080".to_string(),
            transcript_base_url: "http://localhost:8080".to_string(),
            audio_continuity_base_url: "http://localhost:8080/audiocontinuity/v1".to_string(),
            template_base_url: "http://localhost:8080/textexpander/v1/athelas".to_string(),
            username: None,
            password: None,
            request_timeout_secs: 60,
            polling: PollSettings::default(),
        }
    }
}

/// Retry bounds for the polling flows. Intervals are fixed; there is no
/// backoff and no jitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    /// Attempts spent waiting for a recording's stream id to appear.
    pub stream_id_max_attempts: u32,
    /// Attempts spent waiting for a transcript to reach COMPLETED.
    pub transcript_max_attempts: u32,
    /// Attempts spent waiting for a recording process to reach COMPLETED.
    pub recording_max_attempts: u32,
    pub interval_secs: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            stream_id_max_attempts: 15,
            transcript_max_attempts: 10,
            recording_max_attempts: 10,
            interval_secs: 5,
        }
    }
}

impl PollSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl HarnessSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Whether provider credentials are available (live scenarios need them).
    pub fn has_credentials(&self) -> bool {
        matches!(
            (&self.username, &self.password),
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty()
        )
    }

    /// Load settings from `HARNESS_SETTINGS` (or `harness.json`), then apply
    /// credential overrides from the environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        let path = std::env::var(SETTINGS_PATH_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE_NAME));

        let mut settings = load_settings(&path)?;
        settings.apply_env_overrides();
        Ok(settings)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(username) = non_empty_env(USERNAME_ENV) {
            self.username = Some(username);
        }
        if let Some(password) = non_empty_env(PASSWORD_ENV) {
            self.password = Some(password);
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Read settings from a JSON file. A missing file yields defaults; a file that
/// exists but cannot be read or parsed is an error, since silently running
/// against localhost would hide a broken environment.
pub fn load_settings(path: &Path) -> Result<HarnessSettings, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            serde_json::from_str::<HarnessSettings>(&contents).map_err(|source| {
                SettingsError::Parse {
                    path: path.to_path_buf(),
                    source,
                }
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("Settings: {:?} not found, using defaults", path);
            Ok(HarnessSettings::default())
        }
        Err(source) => Err(SettingsError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_file_yields_defaults() {
        let settings = load_settings(Path::new("/tmp/no_such_harness_settings_12345.json"))
            .expect("missing file should not be an error");
        assert_eq!(settings.polling.stream_id_max_attempts, 15);
        assert_eq!(settings.polling.transcript_max_attempts, 10);
        assert_eq!(settings.polling.interval(), Duration::from_secs(5));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        write!(
            file,
            concat!(
                r#"{{ "transcript_base_url": "https://qa.example/transcript", "#,
                r#""polling": {{ "interval_secs": 1 }} }}"#
            )
        )
        .expect("Failed to write settings");

        let settings = load_settings(file.path()).expect("settings should parse");
        assert_eq!(settings.transcript_base_url, "https://qa.example/transcript");
        assert_eq!(settings.polling.interval_secs, 1);
        assert_eq!(settings.polling.stream_id_max_attempts, 15);
        assert_eq!(settings.auth_path, "auth/login");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(b"{ not json").expect("Failed to write settings");

        let err = load_settings(file.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn credentials_require_both_fields() {
        let mut settings = HarnessSettings::default();
        assert!(!settings.has_credentials());
        settings.username = Some("provider@example.com".to_string());
        assert!(!settings.has_credentials());
        settings.password = Some("secret".to_string());
        assert!(settings.has_credentials());
    }
}
