//! txt2img - text-to-image form client for a self-hosted diffusion service.

mod adapters;
mod cassette;
mod cli;
mod config;
mod context;
mod controller;
mod error;
mod interactive;
mod output;
mod params;
mod ports;
mod render;
mod state;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::controller::{FormController, Outcome};
use crate::error::ClientError;
use crate::output::{resolve_output_path, save_image};
use crate::params::BaseOrigin;
use crate::render::render;
use crate::state::FormState;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "txt2img=debug" } else { "txt2img=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode, ClientError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(ClientError::Config)?;

    let origin = BaseOrigin::parse(&config.base_url(cli.base_url.as_deref()))
        .map_err(ClientError::InvalidArgument)?;

    let prompt = cli.prompt_text()?;
    if prompt.is_none() && !cli.interactive {
        return Err(ClientError::InvalidArgument(
            "Provide a prompt string (\"\" for an empty one), use -p/--prompt-file, or -i"
                .to_string(),
        ));
    }

    let initial = FormState::new(
        prompt.unwrap_or_default(),
        cli.steps.clone().unwrap_or_else(|| config.defaults.steps_text()),
        cli.scale.clone().unwrap_or_else(|| config.defaults.scale_text()),
    );
    tracing::debug!(
        origin = origin.as_str(),
        config = %config_path.display(),
        "starting"
    );

    let (ctx, recording_session) = ServiceContext::from_env(&origin)?;
    let mut controller = FormController::new(initial, ctx.service, ctx.notifier, origin);

    let code = if cli.interactive {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        interactive::run_session(&mut controller, stdin.lock(), &mut stdout).await?;
        ExitCode::SUCCESS
    } else {
        one_shot(&mut controller, &cli).await?
    };

    // The recorder is shared with the controller's service.
    drop(controller);
    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    Ok(code)
}

/// Submit the form once, print it, and download the image if asked.
async fn one_shot(controller: &mut FormController, cli: &Cli) -> Result<ExitCode, ClientError> {
    let outcome = controller.generate().await;
    println!("{}", render(controller.state()));

    if outcome == Outcome::Failed {
        return Ok(ExitCode::FAILURE);
    }

    if cli.wants_download() {
        if let Some(image) = controller.fetch_image().await? {
            let state = controller.state();
            let path = resolve_output_path(
                cli.output.as_deref(),
                &state.prompt,
                &state.steps,
                &state.scale,
                &image,
            );
            save_image(&image.data, &path)?;
            eprintln!("Saved: {}", path.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}
