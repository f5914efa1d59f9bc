//! Output formatting for extraction reports.

use grabber_core::models::config::OutputConfig;
use grabber_core::ExtractionReport;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// The explicit `--format`, else the configured `output.default_format`.
pub fn resolve_format(
    explicit: Option<OutputFormat>,
    config: &OutputConfig,
) -> anyhow::Result<OutputFormat> {
    match explicit {
        Some(format) => Ok(format),
        None => <OutputFormat as clap::ValueEnum>::from_str(&config.default_format, true)
            .map_err(|_| {
                anyhow::anyhow!(
                    "Invalid output.default_format {:?} (expected json, csv or text)",
                    config.default_format
                )
            }),
    }
}

pub fn format_report(
    report: &ExtractionReport,
    format: OutputFormat,
    config: &OutputConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if config.pretty_json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Json => Ok(serde_json::to_string(report)?),
        OutputFormat::Csv => format_csv(report),
        OutputFormat::Text => Ok(format_text(report, &config.unknown_marker)),
    }
}

/// One header row of field names, one row of values. Unknown is an empty cell.
fn format_csv(report: &ExtractionReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(report.record.field_names())?;
    wtr.write_record(
        report
            .record
            .iter()
            .map(|(_, value)| value.as_str().unwrap_or_default()),
    )?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(report: &ExtractionReport, unknown_marker: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", report.path.display()));
    for (key, value) in &report.metadata {
        output.push_str(&format!("  {}: {}\n", key, value));
    }
    output.push('\n');

    let width = report
        .record
        .field_names()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0);

    output.push_str("Fields:\n");
    for (name, value) in report.record.iter() {
        let value = value.as_str().unwrap_or(unknown_marker);
        output.push_str(&format!("  {:<width$}  {}\n", name, value, width = width));
    }

    if !report.warnings.is_empty() {
        output.push_str("\nWarnings:\n");
        for warning in &report.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}
