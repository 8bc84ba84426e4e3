//! Scripted in-memory adapters for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::error::ClientError;
use crate::ports::image_service::{
    FetchFuture, FetchedImage, GenerateFuture, GenerateRequest, GenerateResponse, ImageService,
};
use crate::ports::Notifier;
use crate::state::FormState;

/// One scripted answer to a `generate` call.
pub enum Scripted {
    /// Answer with this relative URL.
    Url(&'static str),
    /// Fail with a service error.
    Fail,
    /// Never answer.
    Hang,
}

/// Shared view into what a [`ScriptedService`] saw.
#[derive(Clone, Default)]
pub struct ServiceProbe {
    /// Every request received, in order.
    pub requests: Arc<Mutex<Vec<GenerateRequest>>>,
    /// Form snapshot observed at the moment each request arrived.
    pub observed: Arc<Mutex<Vec<FormState>>>,
    /// Set this to let the service observe the controller's state.
    pub watcher: Arc<Mutex<Option<watch::Receiver<FormState>>>>,
    /// URLs passed to `fetch`.
    pub fetched: Arc<Mutex<Vec<String>>>,
}

impl ServiceProbe {
    /// Number of requests received.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The most recent request.
    pub fn last_request(&self) -> GenerateRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request received")
    }
}

/// Image service answering from a script.
pub struct ScriptedService {
    script: Mutex<VecDeque<Scripted>>,
    probe: ServiceProbe,
}

impl ScriptedService {
    /// Create a service and the probe to inspect it with.
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> (Self, ServiceProbe) {
        let probe = ServiceProbe::default();
        let service =
            Self { script: Mutex::new(script.into_iter().collect()), probe: probe.clone() };
        (service, probe)
    }
}

impl ImageService for ScriptedService {
    fn generate(&self, request: &GenerateRequest) -> GenerateFuture<'_> {
        self.probe.requests.lock().unwrap().push(request.clone());
        if let Some(rx) = self.probe.watcher.lock().unwrap().as_ref() {
            self.probe.observed.lock().unwrap().push(rx.borrow().clone());
        }
        let next = self.script.lock().unwrap().pop_front().unwrap_or(Scripted::Fail);
        Box::pin(async move {
            match next {
                Scripted::Url(url) => Ok(GenerateResponse { url: url.to_string() }),
                Scripted::Fail => Err(ClientError::Api {
                    status: 500,
                    message: "Internal Server Error".into(),
                }),
                Scripted::Hang => std::future::pending().await,
            }
        })
    }

    fn fetch(&self, url: &str) -> FetchFuture<'_> {
        self.probe.fetched.lock().unwrap().push(url.to_string());
        Box::pin(async move {
            Ok(FetchedImage {
                data: vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
                content_type: Some("image/png".into()),
            })
        })
    }
}

/// Notifier that remembers every alert.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    /// Alerts shown so far.
    pub alerts: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    /// Number of alerts shown.
    pub fn count(&self) -> usize {
        self.alerts.lock().unwrap().len()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}
