//! Output formatting for the CLI.

use crate::error::Result;
use colored::*;
use stocktake_capture::Capture;
use stocktake_domain::{InventoryRecord, WorkflowStatus};
use stocktake_sheet::encoding::json_document;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Table format
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a captured record.
    pub fn format_capture(&self, capture: &Capture) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_capture_json(capture),
            OutputFormat::Table => Ok(self.format_record_table(&capture.record)),
        }
    }

    /// Format a capture as JSON, using the field names sent to the sheet.
    fn format_capture_json(&self, capture: &Capture) -> Result<String> {
        let mut document = json_document(&capture.record);
        document["submission"] = serde_json::Value::String(capture.id.to_string());
        document["delivery"] = serde_json::Value::String(capture.delivery.as_str().to_string());
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Format a record as a table.
    pub fn format_record_table(&self, record: &InventoryRecord) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Item", "Category", "Quantity", "Location"]);
        builder.push_record([
            record.item_name.clone(),
            record.category.clone(),
            record.quantity_text(),
            record.location.clone(),
        ]);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a workflow status line.
    pub fn status(&self, status: &WorkflowStatus) -> String {
        match status {
            WorkflowStatus::Idle => status.to_string(),
            WorkflowStatus::Extracting | WorkflowStatus::Persisting => {
                self.colorize(&format!("… {}", status), "cyan")
            }
            WorkflowStatus::Success(_) => self.colorize(&format!("✓ {}", status), "green"),
            WorkflowStatus::Error(_) => self.colorize(&format!("✗ {}", status), "red"),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format raw completion text for the debug view.
    pub fn completion(&self, text: &str) -> String {
        let body = format!("--- AI response ---\n{}\n-------------------", text);
        self.colorize(&body, "magenta")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}
