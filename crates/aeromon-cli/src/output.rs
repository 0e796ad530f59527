//! Output formatting: table, JSON, plain.
//!
//! Table uses `tabled`, JSON serializes the same rows via serde, plain
//! emits one `key value` pair per line for scripting.

use std::io::{self, IsTerminal};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// One rendered sensor line.
#[derive(Debug, Serialize, Tabled)]
pub struct SensorRow {
    #[tabled(rename = "SENSOR")]
    pub name: String,
    #[tabled(rename = "VALUE")]
    pub value: String,
    #[tabled(rename = "UNIT")]
    pub unit: String,
    #[tabled(rename = "AVAILABLE")]
    pub available: String,
    #[serde(skip)]
    #[tabled(skip)]
    pub key: String,
}

/// Availability marker, colored when stdout is a terminal.
pub fn availability(available: bool) -> String {
    let tty = io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err();
    match (available, tty) {
        (true, true) => format!("{}", "yes".green()),
        (false, true) => format!("{}", "no".red()),
        (true, false) => "yes".to_owned(),
        (false, false) => "no".to_owned(),
    }
}

/// Render sensor rows in the chosen format.
pub fn render_rows(format: &OutputFormat, rows: &[SensorRow]) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            Ok(table.to_string())
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(rows).map_err(|e| CliError::Unknown(e.to_string()))
        }
        OutputFormat::Plain => Ok(rows
            .iter()
            .map(|row| format!("{} {}", row.key, row.value))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}
