//! The prompt form controller.
//!
//! Owns the form state, applies edits through [`reduce`], and runs one
//! generation request at a time against an [`ImageService`]. Every state
//! transition is published on a `watch` channel for renderers.

use tokio::sync::watch;

use crate::error::ClientError;
use crate::params::BaseOrigin;
use crate::ports::{FetchedImage, GenerateRequest, ImageService, Notifier};
use crate::state::{reduce, Action, FormState};

/// Alert shown for every failed generation, whatever the cause.
pub const GENERATION_FAILED_ALERT: &str = "Error generating image";

/// How a generation attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The image is displayed at this URL.
    Generated {
        /// Fully qualified image URL.
        image_url: String,
    },
    /// The request failed; the user has been alerted.
    Failed,
}

/// Current state plus the channel it is published on.
struct Store {
    state: FormState,
    tx: watch::Sender<FormState>,
}

impl Store {
    fn dispatch(&mut self, action: Action) {
        self.state = reduce(&self.state, action);
        self.tx.send_replace(self.state.clone());
    }
}

/// Marks the form as loading for as long as it is alive.
///
/// Dropping the guard settles the form, so the loading flag is released on
/// every exit path, including panics and a dropped generate future.
struct InFlight<'a> {
    store: &'a mut Store,
}

impl<'a> InFlight<'a> {
    fn begin(store: &'a mut Store) -> Self {
        store.dispatch(Action::GenerationStarted);
        Self { store }
    }

    fn state(&self) -> &FormState {
        &self.store.state
    }

    fn dispatch(&mut self, action: Action) {
        self.store.dispatch(action);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.store.dispatch(Action::Settled);
    }
}

/// Drives the prompt form against an image service.
pub struct FormController {
    store: Store,
    service: Box<dyn ImageService>,
    notifier: Box<dyn Notifier>,
    origin: BaseOrigin,
}

impl FormController {
    /// Create a controller starting from `initial`.
    #[must_use]
    pub fn new(
        initial: FormState,
        service: Box<dyn ImageService>,
        notifier: Box<dyn Notifier>,
        origin: BaseOrigin,
    ) -> Self {
        let (tx, _rx) = watch::channel(initial.clone());
        Self { store: Store { state: initial, tx }, service, notifier, origin }
    }

    /// Current form snapshot.
    #[must_use]
    pub fn state(&self) -> &FormState {
        &self.store.state
    }

    /// Receive every subsequent state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.store.tx.subscribe()
    }

    /// Replace the prompt text.
    pub fn update_prompt(&mut self, text: impl Into<String>) {
        self.store.dispatch(Action::SetPrompt(text.into()));
    }

    /// Replace the raw steps text.
    pub fn update_steps(&mut self, raw: impl Into<String>) {
        self.store.dispatch(Action::SetSteps(raw.into()));
    }

    /// Replace the raw scale text.
    pub fn update_scale(&mut self, raw: impl Into<String>) {
        self.store.dispatch(Action::SetScale(raw.into()));
    }

    /// Submit the form.
    ///
    /// Sets loading and clears the image, sends one request built from the
    /// current fields, then shows the returned image or alerts the user.
    /// Failures are logged and never returned as errors.
    pub async fn generate(&mut self) -> Outcome {
        let Self { store, service, notifier, origin } = self;
        let mut in_flight = InFlight::begin(store);

        let request = GenerateRequest::from_form(in_flight.state());
        if request.has_nan() {
            tracing::warn!(
                steps = %in_flight.state().steps,
                scale = %in_flight.state().scale,
                "non-numeric parameter forwarded as null"
            );
        }
        tracing::info!(
            prompt = %request.prompt,
            steps = request.steps,
            scale = request.scale,
            "requesting image"
        );

        match service.generate(&request).await {
            Ok(response) => {
                let image_url = origin.join(&response.url);
                tracing::info!(%image_url, "image ready");
                in_flight.dispatch(Action::ImageReady(image_url.clone()));
                Outcome::Generated { image_url }
            }
            Err(e) => {
                tracing::error!(error = %e, "image generation request failed");
                notifier.alert(GENERATION_FAILED_ALERT);
                in_flight.dispatch(Action::GenerationFailed);
                Outcome::Failed
            }
        }
    }

    /// Download the displayed image, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails.
    pub async fn fetch_image(&self) -> Result<Option<FetchedImage>, ClientError> {
        let state = self.state();
        if !state.has_image() {
            return Ok(None);
        }
        self.service.fetch(&state.image_url).await.map(Some)
    }
}
