//! Form state snapshot and the reducer that advances it.

use crate::params::{DEFAULT_SCALE, DEFAULT_STEPS};

/// Immutable snapshot of the prompt form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    /// Prompt text, verbatim.
    pub prompt: String,
    /// Steps field as entered.
    pub steps: String,
    /// Scale field as entered.
    pub scale: String,
    /// True while a generation call is in flight.
    pub loading: bool,
    /// Fully qualified image location, or empty when nothing is displayed.
    pub image_url: String,
}

impl FormState {
    /// A form with the given field contents, idle and showing no image.
    #[must_use]
    pub fn new(
        prompt: impl Into<String>,
        steps: impl Into<String>,
        scale: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            steps: steps.into(),
            scale: scale.into(),
            loading: false,
            image_url: String::new(),
        }
    }

    /// Whether an image is displayed.
    #[must_use]
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new("", DEFAULT_STEPS, DEFAULT_SCALE)
    }
}

/// Everything that can happen to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The prompt field was edited.
    SetPrompt(String),
    /// The steps field was edited.
    SetSteps(String),
    /// The scale field was edited.
    SetScale(String),
    /// A generation call is about to be issued.
    GenerationStarted,
    /// The service returned an image; carries the fully qualified URL.
    ImageReady(String),
    /// The generation call failed.
    GenerationFailed,
    /// The generation call is over, whatever its outcome.
    Settled,
}

/// Apply `action` to `state`, returning the next snapshot.
#[must_use]
pub fn reduce(state: &FormState, action: Action) -> FormState {
    let mut next = state.clone();
    match action {
        Action::SetPrompt(text) => next.prompt = text,
        Action::SetSteps(raw) => next.steps = raw,
        Action::SetScale(raw) => next.scale = raw,
        Action::GenerationStarted => {
            next.loading = true;
            next.image_url.clear();
        }
        Action::ImageReady(url) => next.image_url = url,
        Action::GenerationFailed => next.image_url.clear(),
        Action::Settled => next.loading = false,
    }
    next
}
