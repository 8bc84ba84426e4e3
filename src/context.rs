//! Service context that bundles the port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::http::HttpImageService;
use crate::adapters::live::terminal::TerminalNotifier;
use crate::adapters::recording::image_service::{RecordingImageService, PORT};
use crate::adapters::replaying::image_service::ReplayingImageService;
use crate::cassette::loader::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::ClientError;
use crate::params::BaseOrigin;
use crate::ports::{ImageService, Notifier};

/// Environment variable naming a cassette to replay.
pub const REPLAY_ENV: &str = "TXT2IMG_REPLAY";

/// Environment variable switching on recording (`1` or `true`).
pub const RECORD_ENV: &str = "TXT2IMG_REC";

/// Bundles the port trait objects the controller needs.
pub struct ServiceContext {
    /// Image service port.
    pub service: Box<dyn ImageService>,
    /// User alert port.
    pub notifier: Box<dyn Notifier>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette to disk.
    ///
    /// Call this after the context's service has been dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is still alive or the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        tracing::debug!(interactions = recorder.interaction_count(), "writing cassette");
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Create a context talking to the live service.
    #[must_use]
    pub fn live(origin: &BaseOrigin) -> Self {
        Self {
            service: Box::new(HttpImageService::new(origin.clone())),
            notifier: Box::new(TerminalNotifier),
        }
    }

    /// Create a recording context that wraps the live service with a recorder.
    #[must_use]
    pub fn recording(origin: &BaseOrigin) -> (Self, RecordingSession) {
        let live_ctx = Self::live(origin);

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".txt2img/cassettes")
            .join(&timestamp)
            .join(format!("{PORT}.cassette.yaml"));

        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-{PORT}"),
            get_commit_hash(),
        )));

        let service = RecordingImageService::new(live_ctx.service, Arc::clone(&recorder));
        let ctx = Self { service: Box::new(service), notifier: live_ctx.notifier };

        (ctx, RecordingSession { recorder })
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, ClientError> {
        let replayer = load_cassette(path)
            .map_err(|e| ClientError::Config(format!("Failed to load cassette: {e}")))?;
        Ok(Self {
            service: Box::new(ReplayingImageService::new(Arc::new(Mutex::new(replayer)))),
            notifier: Box::new(TerminalNotifier),
        })
    }

    /// Pick live, recording or replaying mode from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a replay cassette cannot be loaded.
    pub fn from_env(origin: &BaseOrigin) -> Result<(Self, Option<RecordingSession>), ClientError> {
        if let Ok(cassette_path) = std::env::var(REPLAY_ENV) {
            tracing::info!(cassette = %cassette_path, "replaying from cassette");
            return Ok((Self::replaying(Path::new(&cassette_path))?, None));
        }
        if std::env::var(RECORD_ENV).is_ok_and(|v| v == "true" || v == "1") {
            tracing::info!("recording mode enabled");
            let (ctx, session) = Self::recording(origin);
            return Ok((ctx, Some(session)));
        }
        Ok((Self::live(origin), None))
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
