//! CLI handler for the one-shot record-and-analyze flow.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::analysis;
use crate::capture::{AudioSource, MicAudioSource, RecordingSession};
use crate::cli::analyze::format_output;
use crate::cli::RecordCliArgs;
use crate::config::Config;

/// Handle the record CLI command: record until Enter, then analyze.
pub async fn handle_record_command(args: RecordCliArgs) -> Result<()> {
    let config = Config::load()?;
    let provider = analysis::from_config(&config.notes)?;

    let mut mic = MicAudioSource::new(config.capture.sample_rate)?;
    mic.start()?;
    let session = RecordingSession::new();

    eprintln!("Recording... press Enter to stop.");
    wait_for_enter().await?;

    let samples = mic.stop()?;
    let elapsed = session.elapsed_seconds();
    let capture = session.into_capture(&samples, mic.sample_rate())?;
    eprintln!(
        "Recorded {} ({}s, {} bytes)",
        capture.name,
        elapsed,
        capture.size_bytes()
    );

    let pb = if args.no_progress {
        None
    } else {
        let pb = create_spinner();
        pb.set_message("Analyzing recording...");
        Some(pb)
    };

    let result = provider.generate(&capture).await;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let notes = result?;
    let output_text = format_output(&notes, &args.format);

    if let Some(output_path) = &args.output {
        std::fs::write(output_path, &output_text).context("Failed to write output file")?;
        eprintln!("Meeting notes saved to: {}", output_path.display());
    } else {
        println!("{}", output_text);
    }

    Ok(())
}

async fn wait_for_enter() -> Result<()> {
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read from stdin")?;
    Ok(())
}

fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
