//! Rendering of a [`DiffReport`] for downstream tooling or a terminal.

use clap::ValueEnum;

use crate::delta::{DiffReport, ManifestDetails};
use crate::error::{DeltaError, Result};

/// Output encoding for the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML document.
    Yaml,
    /// Human-readable summary.
    Text,
}

/// Render a report in the requested format.
///
/// # Errors
///
/// Returns [`DeltaError::Collaborator`] if serialization fails.
pub fn render(report: &DiffReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| DeltaError::collaborator("emit report", e)),
        ReportFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| DeltaError::collaborator("emit report", e))
        }
        ReportFormat::Text => Ok(format_text(report)),
    }
}

/// Format a report for human-readable display.
#[must_use]
pub fn format_text(report: &DiffReport) -> String {
    let mut lines = vec![format!("Component: {}", report.component_name)];
    if report.uses_source_dir {
        lines.push("Layout: src/".to_string());
    }

    if report.is_unchanged() {
        lines.push("No changes since reference point.".to_string());
        return lines.join("\n");
    }

    if !report.added.is_empty() {
        lines.push("Added:".to_string());
        for path in &report.added {
            lines.push(format!("  + {path}"));
        }
    }
    if !report.modified.is_empty() {
        lines.push("Modified:".to_string());
        for path in &report.modified {
            lines.push(format!("  ~ {path}"));
        }
    }
    if !report.removed.is_empty() {
        lines.push("Removed:".to_string());
        for path in &report.removed {
            lines.push(format!("  - {path}"));
        }
    }

    if report.manifest_changed {
        let detail = match &report.manifest_details {
            Some(ManifestDetails::Unparseable) => "unparseable".to_string(),
            Some(details) => format!("{} declared dependencies", details.dependency_count()),
            None => "no details".to_string(),
        };
        lines.push(format!("Project manifest changed ({detail})"));
    }

    lines.join("\n")
}
