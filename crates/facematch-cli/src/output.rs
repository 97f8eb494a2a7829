use std::error::Error;
use std::io::{self, Write};

use facematch_core::runner::{ComparisonOutcome, DetectionOutcome};
use serde::Serialize;
use serde_json::json;

use crate::cli::OutputMode;
use crate::errors::{AppError, AppResult};

/// Echoes a step confirmation as it happens. JSON mode keeps stdout for the
/// final object only.
pub fn print_progress(line: &str, mode: OutputMode) {
    if mode == OutputMode::Human {
        println!("{line}");
    }
}

pub fn render_comparison(outcome: &ComparisonOutcome, mode: OutputMode) -> AppResult<()> {
    match mode {
        OutputMode::Human => {
            for line in comparison_lines(outcome) {
                println!("{line}");
            }
        }
        OutputMode::Json => write_json(&outcome.summary)?,
    }
    Ok(())
}

pub fn render_detection(outcome: &DetectionOutcome, mode: OutputMode) -> AppResult<()> {
    match mode {
        OutputMode::Human => {
            println!(
                "Faces detected in {}: {}",
                outcome.summary.image_path, outcome.summary.num_faces
            );
        }
        OutputMode::Json => write_json(&outcome.summary)?,
    }
    Ok(())
}

pub fn comparison_lines(outcome: &ComparisonOutcome) -> Vec<String> {
    vec![
        "Faces Matched!".to_string(),
        format!(
            "Similarity Between Faces: {:.2}%",
            outcome.summary.similarity
        ),
    ]
}

fn write_json<T: Serialize>(payload: &T) -> AppResult<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let payload = serde_json::to_string(payload)?;
    handle.write_all(payload.as_bytes())?;
    handle.write_all(b"\n")?;
    Ok(())
}

pub fn render_error(err: &AppError, mode: OutputMode) {
    match mode {
        OutputMode::Human => {
            eprintln!("error: {}", err.human_message());
            if let Some(source) = err.source() {
                eprintln!("cause: {source}");
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "success": false,
                "error": err.human_message(),
                "cause": err.source().map(|source| source.to_string()),
            });
            println!("{payload}");
        }
    }
}
