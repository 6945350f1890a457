//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use plateau_controller::{Report, Termination};
use plateau_domain::{Delta, Document, SelectionStrategy, StrategyKind};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

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

    /// Format a run report.
    pub fn format_report(&self, report: &Report) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => Ok(self.format_report_table(report)),
        }
    }

    fn format_report_table(&self, report: &Report) -> String {
        let mut lines = Vec::new();

        if report.iterations.is_empty() {
            lines.push(self.warning("No documents could be processed."));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["Iteration", "Documents", "Terms", "Delta", "Delta of Delta"]);

            // deltas[k] compares iterations k+1 and k+2, delta_of_deltas[k] ends at k+3
            for (i, iteration) in report.iterations.iter().enumerate() {
                let delta = i
                    .checked_sub(1)
                    .and_then(|k| report.deltas.get(k))
                    .map(|d| format!("{:.6}", d.magnitude))
                    .unwrap_or_else(|| "-".to_string());
                let dd = i
                    .checked_sub(2)
                    .and_then(|k| report.delta_of_deltas.get(k))
                    .map(|d| format!("{:.6}", d.magnitude))
                    .unwrap_or_else(|| "-".to_string());
                builder.push_record([
                    iteration.iteration.to_string(),
                    iteration.documents_in_corpus.to_string(),
                    iteration.term_count.to_string(),
                    delta,
                    dd,
                ]);
            }

            let mut table = builder.build();
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()));
            lines.push(table.to_string());
        }

        for skipped in &report.skipped {
            lines.push(self.warning(&format!(
                "Skipped {} ({}): {}",
                skipped.id,
                skipped.path.display(),
                skipped.reason
            )));
        }

        let outcome = match (report.termination, report.converged_at) {
            (Termination::Converged, Some(at)) => self.success(&format!(
                "Converged at iteration {} (threshold {})",
                at, report.threshold
            )),
            (Termination::Converged, None) => self.success("Converged"),
            (Termination::Exhausted, _) => self.info(&format!(
                "Not converged after {} iteration(s): documents exhausted",
                report.iteration_count()
            )),
            (Termination::Aborted, _) | (Termination::Cancelled, _) => {
                self.error(&format!("Run stopped: {:?}", report.termination))
            }
        };
        lines.push(outcome);
        lines.join("\n")
    }

    /// Format deltas.
    pub fn format_deltas(&self, deltas: &[Delta]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(deltas)?),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Strategy", "Comparison", "Magnitude"]);
                for delta in deltas {
                    builder.push_record([
                        delta.strategy.to_string(),
                        delta.comparison.clone(),
                        format!("{:.6}", delta.magnitude),
                    ]);
                }
                let mut table = builder.build();
                table.with(Style::rounded());
                Ok(table.to_string())
            }
        }
    }

    /// Format selected documents.
    pub fn format_documents(&self, documents: &[Document]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(documents)?),
            OutputFormat::Table => {
                if documents.is_empty() {
                    return Ok(self.colorize("No documents selected.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["#", "ID", "Significance", "Path"]);
                for (i, doc) in documents.iter().enumerate() {
                    builder.push_record([
                        (i + 1).to_string(),
                        doc.id.clone(),
                        format!("{:.4}", doc.significance),
                        doc.path.display().to_string(),
                    ]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format the strategy listing.
    pub fn format_strategies(&self) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "diff": StrategyKind::ALL
                        .iter()
                        .map(|k| serde_json::json!({"name": k.as_str(), "description": k.description()}))
                        .collect::<Vec<_>>(),
                    "selection": SelectionStrategy::ALL
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>(),
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Diff strategy", "Description"]);
                for kind in StrategyKind::ALL {
                    builder.push_record([kind.as_str(), kind.description()]);
                }
                let mut table = builder.build();
                table.with(Style::rounded());

                let selection: Vec<&str> = SelectionStrategy::ALL.iter().map(|s| s.as_str()).collect();
                Ok(format!(
                    "{}\n{} {}",
                    table,
                    self.colorize("Selection strategies:", "cyan"),
                    selection.join(", ")
                ))
            }
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
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plateau_domain::{DeltaDetails, TermWeightDetails};

    fn delta(comparison: &str, magnitude: f64) -> Delta {
        Delta {
            comparison: comparison.to_string(),
            strategy: StrategyKind::TermWeight,
            magnitude,
            details: DeltaDetails::TermWeight(TermWeightDetails::default()),
        }
    }

    #[test]
    fn test_deltas_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_deltas(&[delta("1 -> 2", 0.25)]).unwrap();
        assert!(output.contains("term_weight"));
        assert!(output.contains("0.250000"));
    }

    #[test]
    fn test_deltas_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_deltas(&[delta("1 -> 2", 0.25)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["comparison"], "1 -> 2");
    }

    #[test]
    fn test_empty_documents() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_documents(&[]).unwrap();
        assert!(output.contains("No documents selected"));
    }

    #[test]
    fn test_documents_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let docs = vec![Document::new("critique", "/w/critique.txt").with_significance(0.9)];
        let output = formatter.format_documents(&docs).unwrap();
        assert!(output.contains("critique"));
        assert!(output.contains("0.9000"));
    }

    #[test]
    fn test_strategies_listing() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_strategies().unwrap();
        for kind in StrategyKind::ALL {
            assert!(output.contains(kind.as_str()));
        }
        assert!(output.contains("by_secondary_metric"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
