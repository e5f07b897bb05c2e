//! Writes display state and demo records in the format picked on the CLI.

use anyhow::Result;
use clap::ValueEnum;
use client_core::{format_confidence, HistoryEntry, UiState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
    Json,
}

pub fn format_state(state: &UiState, format: OutputFormat) -> Result<String> {
    let Some(fragment) = state.fragment() else {
        return Ok(state.to_string());
    };
    Ok(match format {
        OutputFormat::Text => fragment.to_string(),
        OutputFormat::Html => fragment.to_html(),
        OutputFormat::Json => serde_json::to_string_pretty(fragment)?,
    })
}

pub fn format_history(entries: &[HistoryEntry], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(entries)?);
    }
    let lines: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let confidence = format_confidence(f64::from(entry.confidence) / 100.0);
            match format {
                OutputFormat::Html => format!(
                    "<li data-index=\"{index}\" data-id=\"{}\">{} {} {confidence}</li>",
                    entry.id, entry.id, entry.label
                ),
                _ => format!("[{index}] {}  {:<11} {confidence}", entry.id, entry.label),
            }
        })
        .collect();
    Ok(lines.join("\n"))
}
