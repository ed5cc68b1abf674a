//! Result writers for the reporting boundary.
//!
//! The engine hands plain aggregates to whatever renders them; these writers
//! cover the three formats the CLI speaks. JSON is the machine boundary,
//! markdown is for pasted reports, terminal for interactive runs.

use colored::Colorize;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::analysis::validation::ValidationReport;
use crate::core::{ComparisonResult, ConcurrentDelayGroup, ForensicWindow, GraphAnomaly};
use crate::forensic::windows::window_summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

/// CPM run digest for reporting
#[derive(Debug, Clone, Serialize)]
pub struct CpmSummary {
    pub project_id: String,
    pub processed: usize,
    pub critical_activities: Vec<String>,
    pub anomalies: Vec<GraphAnomaly>,
}

pub trait OutputWriter {
    fn write_comparison(&mut self, result: &ComparisonResult) -> anyhow::Result<()>;
    fn write_windows(
        &mut self,
        windows: &[ForensicWindow],
        groups: &[ConcurrentDelayGroup],
    ) -> anyhow::Result<()>;
    fn write_validation(&mut self, report: &ValidationReport) -> anyhow::Result<()>;
    fn write_cpm(&mut self, summary: &CpmSummary) -> anyhow::Result<()>;
}

pub fn create_writer(
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    Ok(match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    })
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn emit<T: Serialize>(&mut self, value: &T) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_comparison(&mut self, result: &ComparisonResult) -> anyhow::Result<()> {
        self.emit(result)
    }

    fn write_windows(
        &mut self,
        windows: &[ForensicWindow],
        groups: &[ConcurrentDelayGroup],
    ) -> anyhow::Result<()> {
        self.emit(&serde_json::json!({
            "windows": windows,
            "summary": window_summary(windows),
            "concurrent_groups": groups,
        }))
    }

    fn write_validation(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        self.emit(report)
    }

    fn write_cpm(&mut self, summary: &CpmSummary) -> anyhow::Result<()> {
        self.emit(summary)
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_comparison(&mut self, result: &ComparisonResult) -> anyhow::Result<()> {
        writeln!(self.writer, "# Schedule Comparison Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Baseline `{}` vs current `{}`",
            result.baseline_project, result.current_project
        )?;
        writeln!(self.writer)?;
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(
            self.writer,
            "| Overall project delay (days) | {:.1} |",
            result.overall_delay
        )?;
        writeln!(self.writer, "| SPI | {:.2} |", result.spi)?;
        writeln!(
            self.writer,
            "| Completion variance (pct pts) | {:.1} |",
            result.completion_variance
        )?;
        writeln!(
            self.writer,
            "| Delayed activities | {} |",
            result.delayed_activities.len()
        )?;
        writeln!(
            self.writer,
            "| Accelerated activities | {} |",
            result.accelerated_activities.len()
        )?;
        writeln!(
            self.writer,
            "| Became critical | {} |",
            result.new_critical_activities.len()
        )?;
        writeln!(
            self.writer,
            "| Left critical path | {} |",
            result.removed_critical_activities.len()
        )?;
        writeln!(
            self.writer,
            "| Added / deleted activities | {} / {} |",
            result.added_activities.len(),
            result.deleted_activities.len()
        )?;
        writeln!(self.writer)?;

        if !result.delay_events.is_empty() {
            writeln!(self.writer, "## Delay Events")?;
            writeln!(self.writer)?;
            writeln!(self.writer, "| Activity | Delay (days) | Impact | Concurrent |")?;
            writeln!(self.writer, "|----------|--------------|--------|------------|")?;
            for event in &result.delay_events {
                writeln!(
                    self.writer,
                    "| {} | {:.1} | {:.1} | {} |",
                    event.activity_id,
                    event.delay_days,
                    event.impact_on_project,
                    if event.is_concurrent { "yes" } else { "no" }
                )?;
            }
            writeln!(self.writer)?;
        }

        if !result.float_changes.is_empty() {
            writeln!(self.writer, "## Float Changes")?;
            writeln!(self.writer)?;
            writeln!(self.writer, "| Activity | Change (days) |")?;
            writeln!(self.writer, "|----------|---------------|")?;
            for (id, change) in &result.float_changes {
                writeln!(self.writer, "| {id} | {change:.1} |")?;
            }
            writeln!(self.writer)?;
        }

        if !result.milestone_delays.is_empty() {
            writeln!(self.writer, "## Milestone Delays")?;
            writeln!(self.writer)?;
            writeln!(self.writer, "| Milestone | Delay (days) |")?;
            writeln!(self.writer, "|-----------|--------------|")?;
            for (id, delay) in &result.milestone_delays {
                writeln!(self.writer, "| {id} | {delay:.1} |")?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_windows(
        &mut self,
        windows: &[ForensicWindow],
        groups: &[ConcurrentDelayGroup],
    ) -> anyhow::Result<()> {
        writeln!(self.writer, "# Forensic Window Analysis")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Window | Start | End | Delays | Critical | Delay Days | New Critical | Left Critical |"
        )?;
        writeln!(
            self.writer,
            "|--------|-------|-----|--------|----------|------------|--------------|---------------|"
        )?;
        for row in window_summary(windows) {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} | {:.1} | {} | {} |",
                row.window_id,
                row.start_date,
                row.end_date,
                row.total_delays,
                row.critical_delays,
                row.total_delay_days,
                row.new_critical,
                row.removed_critical
            )?;
        }
        writeln!(self.writer)?;
        if !groups.is_empty() {
            writeln!(self.writer, "## Concurrent Delay Groups")?;
            writeln!(self.writer)?;
            for group in groups {
                let ids: Vec<&str> = group
                    .delays
                    .iter()
                    .map(|d| d.activity_id.as_str())
                    .collect();
                writeln!(
                    self.writer,
                    "- {}: {} (total impact {:.1} days)",
                    group.window_id,
                    ids.join(", "),
                    group.total_impact
                )?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_validation(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Schedule Validation Report")?;
        writeln!(self.writer)?;
        if report.is_clean() {
            writeln!(self.writer, "No data-quality issues found.")?;
            return Ok(());
        }
        writeln!(self.writer, "| Activity | Category | Issue |")?;
        writeln!(self.writer, "|----------|----------|-------|")?;
        for issue in &report.issues {
            writeln!(
                self.writer,
                "| {} | {} | {} |",
                issue.activity_id,
                issue.category.display_name(),
                issue.message
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_cpm(&mut self, summary: &CpmSummary) -> anyhow::Result<()> {
        writeln!(self.writer, "# CPM Analysis: {}", summary.project_id)?;
        writeln!(self.writer)?;
        writeln!(self.writer, "Processed activities: {}", summary.processed)?;
        writeln!(self.writer)?;
        writeln!(self.writer, "## Critical Path")?;
        writeln!(self.writer)?;
        for id in &summary.critical_activities {
            writeln!(self.writer, "- {id}")?;
        }
        writeln!(self.writer)?;
        if !summary.anomalies.is_empty() {
            writeln!(self.writer, "## Graph Anomalies")?;
            writeln!(self.writer)?;
            for anomaly in &summary.anomalies {
                writeln!(self.writer, "- {anomaly}")?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_comparison(&mut self, result: &ComparisonResult) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Schedule Comparison".bold())?;
        let delay_line = format!("Overall delay: {:.1} days", result.overall_delay);
        if result.overall_delay > 0.0 {
            writeln!(self.writer, "  {}", delay_line.red())?;
        } else {
            writeln!(self.writer, "  {}", delay_line.green())?;
        }
        let spi_line = format!("SPI: {:.2}", result.spi);
        if result.spi < 1.0 {
            writeln!(self.writer, "  {}", spi_line.yellow())?;
        } else {
            writeln!(self.writer, "  {}", spi_line.green())?;
        }
        writeln!(
            self.writer,
            "  Delayed: {}  Accelerated: {}  Newly critical: {}",
            result.delayed_activities.len().to_string().red(),
            result.accelerated_activities.len().to_string().green(),
            result.new_critical_activities.len()
        )?;
        let concurrent = result
            .delay_events
            .iter()
            .filter(|e| e.is_concurrent)
            .count();
        writeln!(
            self.writer,
            "  Delay events: {} ({} concurrent)",
            result.delay_events.len(),
            concurrent
        )?;
        Ok(())
    }

    fn write_windows(
        &mut self,
        windows: &[ForensicWindow],
        groups: &[ConcurrentDelayGroup],
    ) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Forensic Windows".bold())?;
        for row in window_summary(windows) {
            let line = format!(
                "{}  {} .. {}  delays={} critical={} delay_days={:.1}",
                row.window_id,
                row.start_date,
                row.end_date,
                row.total_delays,
                row.critical_delays,
                row.total_delay_days
            );
            if row.critical_delays > 0 {
                writeln!(self.writer, "  {}", line.red())?;
            } else {
                writeln!(self.writer, "  {line}")?;
            }
        }
        writeln!(self.writer, "  Concurrent groups: {}", groups.len())?;
        Ok(())
    }

    fn write_validation(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Schedule Validation".bold())?;
        if report.is_clean() {
            writeln!(self.writer, "  {}", "no issues".green())?;
            return Ok(());
        }
        for issue in &report.issues {
            writeln!(
                self.writer,
                "  {} [{}] {}",
                issue.activity_id.yellow(),
                issue.category.display_name(),
                issue.message
            )?;
        }
        Ok(())
    }

    fn write_cpm(&mut self, summary: &CpmSummary) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{} {}",
            "CPM Analysis".bold(),
            summary.project_id
        )?;
        writeln!(
            self.writer,
            "  {} activities processed, {} critical",
            summary.processed,
            summary.critical_activities.len().to_string().red()
        )?;
        for anomaly in &summary.anomalies {
            writeln!(self.writer, "  {} {}", "anomaly:".red().bold(), anomaly)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::validation::{IssueCategory, ValidationIssue};

    #[test]
    fn json_writer_emits_valid_validation_json() {
        let report = ValidationReport {
            issues: vec![ValidationIssue {
                activity_id: "A".to_string(),
                category: IssueCategory::MissingDates,
                message: "completed activity missing actual finish".to_string(),
            }],
        };
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer).write_validation(&report).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed["issues"][0]["activity_id"], "A");
    }

    #[test]
    fn markdown_writer_handles_clean_report() {
        let mut buffer = Vec::new();
        MarkdownWriter::new(&mut buffer)
            .write_validation(&ValidationReport::default())
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("No data-quality issues"));
    }
}
