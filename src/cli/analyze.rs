//! CLI handler for analyzing audio/video files.
//!
//! One-shot flow: load the file, submit it to the notes service, render
//! the result.

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::analysis::{self, MeetingNotes};
use crate::capture::MediaCapture;
use crate::cli::{AnalyzeCliArgs, OutputFormat};
use crate::config::Config;
use crate::render::{render_json, render_text};

/// Handle the analyze CLI command.
pub async fn handle_analyze_command(args: AnalyzeCliArgs) -> Result<()> {
    if !args.file.exists() {
        bail!("File not found: {}", args.file.display());
    }

    let config = Config::load()?;
    let mut notes_config = config.notes.clone();
    if args.model.is_some() {
        notes_config.model = args.model.clone();
    }

    let provider = analysis::from_config(&notes_config)?;
    let capture = MediaCapture::from_path(&args.file).await?;

    let pb = if args.no_progress {
        None
    } else {
        let pb = create_spinner();
        pb.set_message(format!("Analyzing {}...", capture.name));
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

/// Format the notes according to the requested format.
pub fn format_output(notes: &MeetingNotes, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(notes),
        OutputFormat::Json => render_json(notes),
    }
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

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_notes() -> MeetingNotes {
        MeetingNotes {
            summary: "Short sync.".to_string(),
            action_items: vec![],
            discussion_points: vec![],
            transcription: vec![],
        }
    }

    #[test]
    fn test_format_output_text() {
        let text = format_output(&sample_notes(), &OutputFormat::Text);
        assert!(text.contains("Short sync."));
        assert!(text.contains("Meeting Notes"));
    }

    #[test]
    fn test_format_output_json() {
        let json = format_output(&sample_notes(), &OutputFormat::Json);
        assert!(json.contains("\"summary\""));
        assert!(json.contains("Short sync."));
    }
}
