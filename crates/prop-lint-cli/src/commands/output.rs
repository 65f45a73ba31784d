//! Shared output formatting for check results.

use anyhow::Result;
use prop_lint_core::{MarkerName, Severity};

use super::check::CheckReport;
use crate::OutputFormat;

/// Print a check report in the specified format.
pub fn print(report: &CheckReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
    }
    Ok(())
}

fn print_text(report: &CheckReport) {
    let (errors, warnings, infos) = report.count_by_severity();

    for checked in &report.types {
        println!("{} ({})", checked.target, checked.file.display());

        for property in &checked.extraction.properties {
            let category = property
                .category
                .as_ref()
                .map_or("(none)", MarkerName::as_str);
            println!("  {}: {category}", property.name);
        }

        for diagnostic in &checked.extraction.diagnostics {
            let severity_indicator = match diagnostic.severity {
                Severity::Error => "\x1b[31merror\x1b[0m",
                Severity::Warning => "\x1b[33mwarning\x1b[0m",
                Severity::Info => "\x1b[34minfo\x1b[0m",
            };
            println!(
                "  {severity_indicator} [{}]: {}",
                diagnostic.kind.code(),
                diagnostic.message
            );
        }

        println!();
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} type(s)\x1b[0m",
        summary_color,
        errors,
        warnings,
        infos,
        report.types.len()
    );

    if report.files_skipped > 0 {
        println!(
            "\x1b[31mSkipped {} file(s) with malformed descriptions\x1b[0m",
            report.files_skipped
        );
    }
}

fn print_json(report: &CheckReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &CheckReport) {
    for checked in &report.types {
        for diagnostic in &checked.extraction.diagnostics {
            println!(
                "{}:{}: {} [{}] {}",
                checked.file.display(),
                checked.target,
                diagnostic.severity,
                diagnostic.kind.code(),
                diagnostic.message,
            );
        }
    }
}
