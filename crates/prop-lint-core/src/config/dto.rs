//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::Deserialize;

/// Raw TOML representation of a marker configuration.
///
/// ```toml
/// domain-label = "task property annotation"
/// primary = ["Input", "InputFile", "OutputFile"]
/// supporting = ["Hint"]
/// unsupported = ["Unmanaged"]
///
/// [[override]]
/// base = "Input"
/// narrower = ["InputFile"]
///
/// [ignored-roots]
/// classes = ["Object"]
/// interfaces = ["DynamicObject"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigDto {
    /// Label naming the marker domain in diagnostics.
    #[serde(rename = "domain-label", default)]
    pub domain_label: Option<String>,

    /// Primary categories, in precedence order.
    #[serde(default)]
    pub primary: Vec<String>,

    /// Supporting markers (auxiliary metadata only).
    #[serde(default)]
    pub supporting: Vec<String>,

    /// Known-but-unsupported markers.
    #[serde(default)]
    pub unsupported: Vec<String>,

    /// Category override (narrowing) entries.
    #[serde(rename = "override", default)]
    pub overrides: Vec<OverrideDto>,

    /// Root types excluded from candidacy.
    #[serde(rename = "ignored-roots", default)]
    pub ignored_roots: IgnoredRootsDto,

    /// Severity threshold for a failing exit code (default: "warning").
    #[serde(rename = "fail-on", default)]
    pub fail_on: Option<String>,
}

/// TOML representation of one override (narrowing) entry.
#[derive(Debug, Clone, Deserialize)]
pub struct OverrideDto {
    /// The base category being narrowed.
    pub base: String,
    /// The categories that narrow it.
    #[serde(default)]
    pub narrower: Vec<String>,
}

/// TOML representation of the ignored root-type sets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IgnoredRootsDto {
    /// Class-hierarchy roots whose members are never candidates.
    #[serde(default)]
    pub classes: Vec<String>,
    /// Interface roots whose members are never candidates.
    #[serde(default)]
    pub interfaces: Vec<String>,
}
