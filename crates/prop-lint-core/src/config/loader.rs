//! DTO → Domain model conversion with validation.

use std::path::PathBuf;

use crate::types::Severity;

use super::dto::{ConfigDto, OverrideDto};
use super::model::{ConfigError, MarkerConfig, MarkerName};

/// Errors during configuration loading.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum LoadError {
    /// IO error reading the config file.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in the config file.
    #[error("failed to parse config: {message}")]
    #[diagnostic(help("run `prop-lint init` to generate a starter prop-lint.toml"))]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "primary[2]").
        context: String,
        /// The underlying model error.
        source: ConfigError,
    },

    /// Unknown severity string.
    #[error("{context}: unknown severity `{value}`, expected: error, warning, info")]
    UnknownSeverity {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Cross-reference errors from aggregate root construction.
    #[error("configuration validation errors:\n{}", format_errors(.0))]
    #[diagnostic(help(
        "categories referenced by override entries must be listed under `primary`, \
         and no marker may appear in more than one of primary/supporting/unsupported"
    ))]
    CrossRef(Vec<ConfigError>),
}

fn format_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A fully loaded configuration: the validated engine config plus the
/// presentation options that ride along in the same file.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Validated marker configuration for the extraction engine.
    pub markers: MarkerConfig,
    /// Severity threshold for a failing exit code.
    pub fail_on: Severity,
}

impl LoadedConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &std::path::Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or fails validation.
    pub fn parse(content: &str) -> Result<Self, LoadError> {
        let dto: ConfigDto = toml::from_str(content).map_err(|e| LoadError::Parse {
            message: e.to_string(),
        })?;
        load(dto)
    }
}

/// Converts a [`ConfigDto`] to a validated [`LoadedConfig`].
///
/// # Errors
///
/// Returns the first field-level error encountered, or all cross-reference
/// errors from aggregate validation.
pub fn load(dto: ConfigDto) -> Result<LoadedConfig, LoadError> {
    let primary = convert_names(&dto.primary, "primary")?;
    let supporting = convert_names(&dto.supporting, "supporting")?;
    let unsupported = convert_names(&dto.unsupported, "unsupported")?;

    let mut overrides = Vec::new();
    for (i, entry) in dto.overrides.iter().enumerate() {
        overrides.extend(convert_override(entry, i)?);
    }

    let fail_on = match dto.fail_on.as_deref() {
        None => Severity::Warning,
        Some(value) => parse_severity(value, "fail-on")?,
    };

    let markers = MarkerConfig::new(
        dto.domain_label.unwrap_or_default(),
        primary,
        supporting,
        unsupported,
        overrides,
        dto.ignored_roots.classes,
        dto.ignored_roots.interfaces,
    )
    .map_err(LoadError::CrossRef)?;

    Ok(LoadedConfig { markers, fail_on })
}

fn convert_names(raw: &[String], field: &str) -> Result<Vec<MarkerName>, LoadError> {
    raw.iter()
        .enumerate()
        .map(|(i, name)| {
            MarkerName::new(name).map_err(|e| LoadError::Validation {
                context: format!("{field}[{i}]"),
                source: e,
            })
        })
        .collect()
}

fn convert_override(
    dto: &OverrideDto,
    index: usize,
) -> Result<Vec<(MarkerName, MarkerName)>, LoadError> {
    let ctx = format!("override[{index}]");
    let base = MarkerName::new(&dto.base).map_err(|e| LoadError::Validation {
        context: format!("{ctx}.base"),
        source: e,
    })?;

    dto.narrower
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let narrower = MarkerName::new(name).map_err(|e| LoadError::Validation {
                context: format!("{ctx}.narrower[{i}]"),
                source: e,
            })?;
            Ok((base.clone(), narrower))
        })
        .collect()
}

fn parse_severity(value: &str, context: &str) -> Result<Severity, LoadError> {
    match value {
        "error" => Ok(Severity::Error),
        "warning" => Ok(Severity::Warning),
        "info" => Ok(Severity::Info),
        _ => Err(LoadError::UnknownSeverity {
            context: context.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_and_load(toml_str: &str) -> Result<LoadedConfig, LoadError> {
        LoadedConfig::parse(toml_str)
    }

    // -- Happy path --

    #[test]
    fn load_minimal_config() {
        let loaded = parse_and_load(
            r#"
domain-label = "property marker"
primary = ["Input"]
"#,
        )
        .unwrap();
        assert_eq!(loaded.markers.primary().len(), 1);
        assert_eq!(loaded.fail_on, Severity::Warning);
    }

    #[test]
    fn load_full_config() {
        let loaded = parse_and_load(
            r#"
domain-label = "task property annotation"
primary = ["Input", "InputFile", "OutputFile"]
supporting = ["Hint"]
unsupported = ["Unmanaged"]
fail-on = "error"

[[override]]
base = "Input"
narrower = ["InputFile"]

[ignored-roots]
classes = ["Object"]
interfaces = ["DynamicObject"]
"#,
        )
        .unwrap();

        let markers = &loaded.markers;
        assert_eq!(markers.primary().len(), 3);
        assert!(markers.narrows(
            &MarkerName::new("Input").unwrap(),
            &MarkerName::new("InputFile").unwrap()
        ));
        assert!(markers.is_ignored_class_root("Object"));
        assert_eq!(loaded.fail_on, Severity::Error);
    }

    // -- Error cases --

    #[test]
    fn load_rejects_invalid_toml() {
        let result = parse_and_load("primary = [");
        assert!(matches!(result, Err(LoadError::Parse { .. })));
    }

    #[test]
    fn load_rejects_invalid_marker_name() {
        let result = parse_and_load(
            r#"
domain-label = "marker"
primary = ["not a name"]
"#,
        );
        match result {
            Err(LoadError::Validation { context, .. }) => assert_eq!(context, "primary[0]"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn load_rejects_unknown_severity() {
        let result = parse_and_load(
            r#"
domain-label = "marker"
primary = ["Input"]
fail-on = "critical"
"#,
        );
        assert!(matches!(result, Err(LoadError::UnknownSeverity { .. })));
    }

    #[test]
    fn load_rejects_override_outside_primary() {
        let result = parse_and_load(
            r#"
domain-label = "marker"
primary = ["Input"]

[[override]]
base = "Input"
narrower = ["Elsewhere"]
"#,
        );
        match result {
            Err(LoadError::CrossRef(errors)) => {
                assert!(matches!(
                    &errors[0],
                    ConfigError::UnknownOverrideCategory { .. }
                ));
            }
            other => panic!("expected cross-ref error, got {other:?}"),
        }
    }

    #[test]
    fn load_rejects_missing_domain_label() {
        let result = parse_and_load(r#"primary = ["Input"]"#);
        assert!(matches!(result, Err(LoadError::CrossRef(_))));
    }
}
