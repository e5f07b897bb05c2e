use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use client_core::{
    DemoHistory, DisplayEvent, HttpClassifier, ResultDisplay, SubmissionController, UiState,
    UploadRequest,
};
use futures::future::join_all;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod output;

use config::load_settings;
use output::{format_history, format_state, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "cellscan", about = "Classify blood smear images against a remote model")]
struct Args {
    /// TOML settings file (defaults to ./cellscan.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    predict_path: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit images in order; only the last one selected is displayed.
    Classify {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List demo records, optionally rendering one of them.
    History {
        #[arg(long)]
        count: Option<usize>,
        #[arg(long)]
        select: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(predict_path) = args.predict_path {
        settings.predict_path = predict_path;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let endpoint = settings.endpoint()?;
    info!(%endpoint, "cellscan: classification endpoint");

    let display = Arc::new(ResultDisplay::new());
    let controller = SubmissionController::new(
        Arc::new(HttpClassifier::new(endpoint)),
        display.clone(),
    );
    let mut events = display.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                DisplayEvent::Pending { seq } => debug!(seq = seq.0, "display: processing"),
                DisplayEvent::Updated { seq, fragment } => {
                    debug!(seq = seq.0, failure = fragment.is_failure(), "display: updated")
                }
                DisplayEvent::Superseded { seq } => {
                    info!(seq = seq.0, "display: result superseded by a newer selection")
                }
            }
        }
    });

    match args.command {
        Command::Classify { files } => {
            let mut uploads = Vec::with_capacity(files.len());
            for path in &files {
                uploads.push(UploadRequest::from_path(path).await?);
            }
            join_all(
                uploads
                    .into_iter()
                    .map(|upload| controller.on_files_selected(vec![upload])),
            )
            .await;

            let state = display.snapshot().await;
            println!("{}", format_state(&state, args.format)?);
            Ok(match state {
                UiState::Errored { .. } => ExitCode::FAILURE,
                _ => ExitCode::SUCCESS,
            })
        }
        Command::History { count, select } => {
            let count = count.unwrap_or(settings.history_size);
            let history = DemoHistory::generate(count, &mut rand::rng());
            println!("{}", format_history(history.entries(), args.format)?);

            if let Some(index) = select {
                let entry = history
                    .get(index)
                    .ok_or_else(|| anyhow!("no history entry at index {index} (have {count})"))?;
                controller.select_history(entry).await;
                println!();
                println!("{}", format_state(&display.snapshot().await, args.format)?);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
