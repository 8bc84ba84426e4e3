//! Line-driven form session.
//!
//! Each input line is one command: edit a field, submit, show the form, or
//! save the displayed image.

use std::io::{BufRead, Write};

use crate::controller::{FormController, Outcome};
use crate::error::ClientError;
use crate::output::{resolve_output_path, save_image};
use crate::render::render;

const HELP: &str = "\
Commands:
  prompt <text>   set the prompt (may be empty)
  steps <value>   set inference steps
  scale <value>   set guidance scale
  generate        submit the form
  show            print the form
  save [path]     download the displayed image
  help            print this help
  quit            leave";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set the prompt.
    Prompt(String),
    /// Set the steps text.
    Steps(String),
    /// Set the scale text.
    Scale(String),
    /// Submit.
    Generate,
    /// Print the form.
    Show,
    /// Download the image, optionally to an explicit path.
    Save(Option<String>),
    /// Print help.
    Help,
    /// End the session.
    Quit,
    /// Blank line.
    Nothing,
    /// Anything else.
    Unknown(String),
}

impl Command {
    /// Parse one line. Field values keep everything after the first space.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let (word, rest) = match line.trim_start().split_once(' ') {
            Some((word, rest)) => (word, Some(rest)),
            None => (line.trim(), None),
        };
        let rest_owned = || rest.unwrap_or("").to_string();

        match word {
            "" => Self::Nothing,
            "prompt" => Self::Prompt(rest_owned()),
            "steps" => Self::Steps(rest_owned()),
            "scale" => Self::Scale(rest_owned()),
            "generate" | "g" => Self::Generate,
            "show" => Self::Show,
            "save" => Self::Save(rest.map(str::trim).filter(|p| !p.is_empty()).map(str::to_string)),
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Run commands from `input` until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails. Failed
/// generations and downloads are reported and the session carries on.
pub async fn run_session<R: BufRead, W: Write>(
    controller: &mut FormController,
    input: R,
    out: &mut W,
) -> Result<(), ClientError> {
    writeln!(out, "{}", render(controller.state()))?;
    writeln!(out, "Type 'help' for commands.")?;

    for line in input.lines() {
        match Command::parse(&line?) {
            Command::Prompt(text) => controller.update_prompt(text),
            Command::Steps(raw) => controller.update_steps(raw),
            Command::Scale(raw) => controller.update_scale(raw),
            Command::Generate => {
                if let Outcome::Generated { .. } = generate(controller, out).await? {
                    writeln!(out, "{}", render(controller.state()))?;
                }
            }
            Command::Show => writeln!(out, "{}", render(controller.state()))?,
            Command::Save(path) => save(controller, path.as_deref(), out).await?,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => break,
            Command::Nothing => {}
            Command::Unknown(word) => writeln!(out, "Unknown command '{word}'. {HELP}")?,
        }
    }
    Ok(())
}

/// Submit, rendering the busy form once if the call does not finish at once.
async fn generate<W: Write>(
    controller: &mut FormController,
    out: &mut W,
) -> Result<Outcome, ClientError> {
    let mut rx = controller.subscribe();
    let generate = controller.generate();
    tokio::pin!(generate);

    let mut announced = false;
    loop {
        tokio::select! {
            biased;
            Ok(()) = rx.changed(), if !announced => {
                let snapshot = rx.borrow_and_update().clone();
                if snapshot.loading {
                    writeln!(out, "{}", render(&snapshot))?;
                    out.flush()?;
                    announced = true;
                }
            }
            outcome = &mut generate => return Ok(outcome),
        }
    }
}

async fn save<W: Write>(
    controller: &FormController,
    path: Option<&str>,
    out: &mut W,
) -> Result<(), ClientError> {
    let image = match controller.fetch_image().await {
        Ok(Some(image)) => image,
        Ok(None) => {
            writeln!(out, "No image to save.")?;
            return Ok(());
        }
        Err(e) => {
            tracing::error!(error = %e, "image download failed");
            writeln!(out, "Download failed: {e}")?;
            return Ok(());
        }
    };
    let state = controller.state();
    let target = resolve_output_path(path, &state.prompt, &state.steps, &state.scale, &image);
    match save_image(&image.data, &target) {
        Ok(()) => writeln!(out, "Saved: {}", target.display())?,
        Err(e) => writeln!(out, "Save failed: {e}")?,
    }
    Ok(())
}
