#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod view;

use std::io::Write;

use args::Args;
use clap::Parser;
use promptpix_config::Config;
use promptpix_controller::{Controller, Snapshot, SubmitError};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Initialize logging
    promptpix_telemetry::init(config.telemetry.as_ref(), "info")?;

    tracing::info!(
        config_path = %args.config.display(),
        endpoint = %config.imagegen.endpoint,
        "starting promptpix"
    );

    let controller = Controller::from_config(&config.imagegen)?;

    match args.one_shot_prompt() {
        Some(prompt) => one_shot(&controller, &prompt).await,
        None => interactive(&controller).await,
    }
}

/// Generate a single image and exit, failing the process on error
async fn one_shot(controller: &Controller, prompt: &str) -> anyhow::Result<()> {
    let Some(snapshot) = generate(controller, prompt).await? else {
        anyhow::bail!("no image generated");
    };

    println!("{}", view::render(&snapshot));

    match snapshot.failure() {
        Some(failure) => Err(anyhow::anyhow!("image generation failed: {}", failure.error)),
        None => Ok(()),
    }
}

/// Read keywords line by line until end of input or Ctrl-C
async fn interactive(controller: &Controller) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{}: ", view::KEYWORDS_LABEL);
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            () = shutdown_signal() => None,
        };

        let Some(line) = line else {
            break;
        };

        if let Some(snapshot) = generate(controller, &line).await? {
            println!("{}", view::render(&snapshot));
        }
    }

    tracing::info!("promptpix stopped");
    Ok(())
}

/// Submit a prompt and wait for it to settle
///
/// Returns `None` when the prompt was empty or the request was cancelled
/// with Ctrl-C.
async fn generate(controller: &Controller, prompt: &str) -> anyhow::Result<Option<Snapshot>> {
    match controller.submit(prompt) {
        Ok(_) => {}
        Err(SubmitError::EmptyPrompt) => {
            println!("Enter keywords to generate an image");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    }

    println!("{}", view::render(&controller.snapshot()));

    tokio::select! {
        snapshot = controller.settled() => Ok(Some(snapshot)),
        () = shutdown_signal() => {
            controller.cancel();
            println!("Cancelled");
            Ok(None)
        }
    }
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::debug!("shutdown signal received");
}
