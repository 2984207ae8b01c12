#![warn(missing_docs)]
//! FillBench Report - Reporting Data
//!
//! Report structures shared by the human and JSON outputs, and JSON
//! generation.

mod json;
mod report;

pub use json::generate_json_report;
pub use report::{
    Report, ReportConfig, ReportMeta, ReportSummary, StrategyMetrics, StrategyReport,
    StrategyStatus, SystemInfo, format_secs,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text lines, streamed as strategies finish
    #[default]
    Human,
    /// JSON with full schema, written once at the end
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
