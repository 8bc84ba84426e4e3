//! Text rendering of the prompt form.

use std::fmt;

use crate::state::FormState;

/// Form heading.
pub const TITLE: &str = "Custom Text-to-Image Generator";

/// Submit caption while idle.
pub const IDLE_CAPTION: &str = "Generate";

/// Submit caption while a request is in flight.
pub const BUSY_CAPTION: &str = "Generating...";

/// What the form shows for a given state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View<'a> {
    /// Prompt field contents.
    pub prompt: &'a str,
    /// Steps field contents.
    pub steps: &'a str,
    /// Scale field contents.
    pub scale: &'a str,
    /// Submit caption.
    pub caption: &'static str,
    /// Whether submit is disabled.
    pub submit_disabled: bool,
    /// Image source, only when one is displayed.
    pub image: Option<&'a str>,
}

/// Derive the view for a state.
#[must_use]
pub fn render(state: &FormState) -> View<'_> {
    View {
        prompt: &state.prompt,
        steps: &state.steps,
        scale: &state.scale,
        caption: if state.loading { BUSY_CAPTION } else { IDLE_CAPTION },
        submit_disabled: state.loading,
        image: state.has_image().then_some(state.image_url.as_str()),
    }
}

impl fmt::Display for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE}")?;
        writeln!(f, "  Prompt: {}", self.prompt)?;
        writeln!(f, "  Steps:  {}", self.steps)?;
        writeln!(f, "  Scale:  {}", self.scale)?;
        if self.submit_disabled {
            write!(f, "  [ {} ] (disabled)", self.caption)?;
        } else {
            write!(f, "  [ {} ]", self.caption)?;
        }
        if let Some(image) = self.image {
            write!(f, "\n  Image:  {image}")?;
        }
        Ok(())
    }
}
