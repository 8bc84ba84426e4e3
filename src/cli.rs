//! CLI argument parsing with clap.

use clap::Parser;

/// Text-to-image form client for a self-hosted diffusion service.
#[derive(Parser, Debug)]
#[command(name = "txt2img", version, about)]
pub struct Cli {
    /// Text prompt describing the desired image. May be empty ("").
    #[arg(conflicts_with = "prompt_file")]
    pub prompt: Option<String>,

    /// Path to a file containing the prompt text.
    #[arg(short = 'p', long, conflicts_with = "prompt")]
    pub prompt_file: Option<String>,

    /// Inference steps, sent as entered after numeric coercion [default: 50].
    #[arg(long, allow_hyphen_values = true)]
    pub steps: Option<String>,

    /// Guidance scale, sent as entered after numeric coercion [default: 7.5].
    #[arg(long, allow_hyphen_values = true)]
    pub scale: Option<String>,

    /// Base URL of the image service [default: http://localhost:8000].
    #[arg(long)]
    pub base_url: Option<String>,

    /// Download the generated image to this path.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Download the generated image, naming it after the prompt.
    #[arg(short, long, conflicts_with = "output")]
    pub save: bool,

    /// Edit the form and generate interactively.
    #[arg(short, long)]
    pub interactive: bool,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the prompt from either the positional argument or the file flag.
    ///
    /// Returns `Ok(None)` when neither was given.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt file cannot be read.
    pub fn prompt_text(&self) -> Result<Option<String>, std::io::Error> {
        if let Some(ref text) = self.prompt {
            Ok(Some(text.clone()))
        } else if let Some(ref path) = self.prompt_file {
            std::fs::read_to_string(path).map(|s| Some(s.trim_end_matches(['\r', '\n']).to_string()))
        } else {
            Ok(None)
        }
    }

    /// Whether the image should be downloaded after a successful generation.
    #[must_use]
    pub fn wants_download(&self) -> bool {
        self.save || self.output.is_some()
    }
}
