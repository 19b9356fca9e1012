//! Rendering of report results.
//!
//! Supports pretty JSON, aligned text tables, and one CSV file per report.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::queries::types::Report;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Title followed by the rows as pretty-printed JSON.
    #[default]
    Json,
    /// Title followed by an aligned text table.
    Table,
    /// One CSV file per report in the output directory.
    Csv,
}

/// Renders a report's rows as pretty-printed JSON.
pub fn render_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(&report.rows)?)
}

/// Renders a report's rows as a left-aligned text table.
pub fn render_table(report: &Report) -> String {
    let Some(first) = report.rows.first() else {
        return "(no rows)\n".to_string();
    };

    let headers: Vec<&str> = first.names().collect();
    let cells: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|row| row.values().map(|v| v.to_string()).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = table_line(headers.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("{}\n", rule.join("-+-")));
    for row in &cells {
        out.push_str(&table_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn table_line<'a>(values: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = values
        .zip(widths)
        .map(|(v, &w)| format!("{v:<w$}"))
        .collect();
    format!("{}\n", padded.join(" | ").trim_end())
}

/// `"1. Top 5 Popular Routes"` becomes `"top_5_popular_routes"`.
fn slug(title: &str) -> String {
    let body = title.split_once(". ").map(|(_, rest)| rest).unwrap_or(title);
    let mut slug = String::new();
    for c in body.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_end_matches('_').to_string()
}

/// Writes one report to `dir/NN_<slug>.csv`, replacing any previous file.
///
/// Reports without rows produce an empty file.
pub fn write_csv(dir: &Path, index: usize, report: &Report) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(format!("{:02}_{}.csv", index + 1, slug(report.title)));

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;

    if let Some(first) = report.rows.first() {
        writer.write_record(first.names())?;
    }
    for row in &report.rows {
        writer.write_record(row.values().map(|v| v.to_string()))?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = report.rows.len(), "Wrote report CSV");
    Ok(path)
}

/// Writes every report in the chosen format.
///
/// JSON and table output go to `out`; CSV output goes to files under
/// `output_dir` and only the written paths are listed on `out`.
pub fn render_all<W: Write>(
    out: &mut W,
    reports: &[Report],
    format: OutputFormat,
    output_dir: &Path,
) -> Result<()> {
    for (index, report) in reports.iter().enumerate() {
        if format == OutputFormat::Csv {
            match &report.error {
                Some(err) => writeln!(out, "{}: (report failed: {err})", report.title)?,
                None => {
                    let path = write_csv(output_dir, index, report)?;
                    writeln!(out, "{}: {}", report.title, path.display())?;
                }
            }
            continue;
        }

        writeln!(out, "{}", report.title)?;
        if let Some(err) = &report.error {
            writeln!(out, "(report failed: {err})")?;
        } else {
            match format {
                OutputFormat::Table => write!(out, "{}", render_table(report))?,
                _ => writeln!(out, "{}", render_json(report)?)?,
            }
        }
        writeln!(out)?;
    }

    info!(reports = reports.len(), ?format, "Reports rendered");
    Ok(())
}
