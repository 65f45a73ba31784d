//! Check command implementation.

use anyhow::{bail, Context, Result};
use prop_lint_core::description::TypeDescription;
use prop_lint_core::{Extraction, Extractor, LoadedConfig, Severity};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::OutputFormat;

/// One checked type description.
#[derive(Debug, Serialize)]
pub struct CheckedType {
    /// Source file of the description.
    pub file: PathBuf,
    /// Target type name.
    pub target: String,
    /// Resolved properties and diagnostics.
    #[serde(flatten)]
    pub extraction: Extraction,
}

/// Aggregated result of one check run.
#[derive(Debug, Default, Serialize)]
pub struct CheckReport {
    /// Every successfully checked type.
    pub types: Vec<CheckedType>,
    /// Files that could not be read, parsed, or walked.
    pub files_skipped: usize,
}

impl CheckReport {
    /// Counts diagnostics by severity: `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for checked in &self.types {
            let (e, w, i) = checked.extraction.count_by_severity();
            counts.0 += e;
            counts.1 += w;
            counts.2 += i;
        }
        counts
    }

    /// Checks if any diagnostic meets or exceeds the given severity.
    #[must_use]
    pub fn has_diagnostics_at(&self, severity: Severity) -> bool {
        self.types
            .iter()
            .any(|c| c.extraction.has_diagnostics_at(severity))
    }
}

/// Runs the check command.
pub fn run(path: &Path, format: OutputFormat, explicit_config: Option<&Path>) -> Result<()> {
    let project_dir = if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    } else {
        path
    };

    let source = crate::config_resolver::resolve(project_dir, explicit_config);
    let Some(config_path) = source.path() else {
        bail!(
            "no prop-lint.toml found for {} (run `prop-lint init` to create one)",
            path.display()
        );
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", config_path.display());
    }

    let LoadedConfig { markers, fail_on } = match LoadedConfig::from_file(config_path) {
        Ok(loaded) => loaded,
        Err(error) => {
            eprintln!("{:?}", miette::Report::new(error));
            bail!("failed to load config: {}", config_path.display());
        }
    };
    let extractor = Extractor::new(markers);

    let files = discover_files(path)?;
    if files.is_empty() {
        tracing::warn!("No type descriptions found under {}", path.display());
    }
    tracing::info!(
        "Checking {} description(s) against {} categories",
        files.len(),
        extractor.config().primary().len()
    );

    let mut report = CheckReport::default();
    for file in files {
        match check_file(&extractor, &file) {
            Ok(checked) => report.types.push(checked),
            Err(error) => {
                tracing::warn!("Skipping {}: {error:#}", file.display());
                report.files_skipped += 1;
            }
        }
    }

    super::output::print(&report, format)?;

    // Malformed descriptions mean the report is incomplete; that is worse
    // than failing diagnostics.
    if report.files_skipped > 0 {
        std::process::exit(2);
    }
    if report.has_diagnostics_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

fn check_file(extractor: &Extractor, file: &Path) -> Result<CheckedType> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let description: TypeDescription = serde_json::from_str(&content)
        .with_context(|| format!("invalid type description in {}", file.display()))?;
    let extraction = extractor
        .extract(&description)
        .with_context(|| format!("malformed hierarchy in {}", file.display()))?;
    Ok(CheckedType {
        file: file.to_path_buf(),
        target: description.target,
        extraction,
    })
}

/// A single file is taken as-is; a directory is scanned recursively for
/// `*.json` descriptions in stable name order.
fn discover_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(path).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", path.display()))?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "json")
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn extractor() -> Extractor {
        Extractor::builder()
            .domain_label("property type annotation")
            .category("Input")
            .build()
            .unwrap()
    }

    #[test]
    fn check_file_reads_and_extracts() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("task.json");
        fs::write(
            &file,
            r#"{
              "target": "Task",
              "types": [
                {
                  "name": "Task",
                  "kind": "class",
                  "methods": [
                    { "name": "getFile", "returns": "other",
                      "markers": [ { "name": "Input" } ] }
                  ]
                }
              ]
            }"#,
        )
        .unwrap();

        let checked = check_file(&extractor(), &file).unwrap();
        assert_eq!(checked.target, "Task");
        assert_eq!(checked.extraction.properties.len(), 1);
        assert!(!checked.extraction.has_diagnostics());
    }

    #[test]
    fn check_file_rejects_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("broken.json");
        fs::write(&file, "{").unwrap();

        assert!(check_file(&extractor(), &file).is_err());
    }

    #[test]
    fn discover_files_finds_json_recursively() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("b.json"), "{}").unwrap();
        fs::write(tmp.path().join("a.json"), "{}").unwrap();
        fs::write(tmp.path().join("notes.txt"), "").unwrap();
        fs::write(tmp.path().join("nested/c.json"), "{}").unwrap();

        let files = discover_files(tmp.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .filter_map(|f| f.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        assert_eq!(names, ["a.json", "b.json", "c.json"]);
    }

    #[test]
    fn discover_files_accepts_single_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("only.json");
        fs::write(&file, "{}").unwrap();

        let files = discover_files(&file).unwrap();
        assert_eq!(files, vec![file]);
    }
}
