//! Core types for resolved properties and diagnostics.

use serde::{Deserialize, Serialize};

use crate::config::MarkerName;
use crate::description::MarkerUse;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail a check.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Structured payload of a diagnostic, one variant per check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Two or more unrelated primary categories found on one property.
    ConflictingMarkers {
        /// Every conflicting category, in configured order.
        categories: Vec<MarkerName>,
    },
    /// Getter and field both declare the same primary marker.
    DuplicateDeclaration {
        /// The doubly-declared marker.
        marker: MarkerName,
    },
    /// A private declaration carries a primary marker.
    PrivateAnnotated {
        /// The marker on the private declaration.
        marker: MarkerName,
    },
    /// A non-private accessor has no recognized marker anywhere in its chain.
    NotAnnotated,
    /// A known-but-unsupported marker is present.
    UnsupportedMarker {
        /// The unsupported marker.
        marker: MarkerName,
    },
}

impl DiagnosticKind {
    /// Catalog of all diagnostic kinds: `(code, name, description)`.
    pub const CATALOG: &'static [(&'static str, &'static str, &'static str)] = &[
        (
            "PL001",
            "conflicting-markers",
            "Two or more unrelated primary markers on one property",
        ),
        (
            "PL002",
            "duplicate-declaration",
            "Getter and field both declare the same primary marker",
        ),
        (
            "PL003",
            "private-annotated",
            "A private declaration carries a primary marker",
        ),
        (
            "PL004",
            "not-annotated",
            "A non-private accessor has no recognized marker in its chain",
        ),
        (
            "PL005",
            "unsupported-marker",
            "A known-but-unsupported marker is present",
        ),
    ];

    /// Returns the stable code of this kind (e.g., "PL001").
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConflictingMarkers { .. } => "PL001",
            Self::DuplicateDeclaration { .. } => "PL002",
            Self::PrivateAnnotated { .. } => "PL003",
            Self::NotAnnotated => "PL004",
            Self::UnsupportedMarker { .. } => "PL005",
        }
    }

    /// Returns the kebab-case name of this kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConflictingMarkers { .. } => "conflicting-markers",
            Self::DuplicateDeclaration { .. } => "duplicate-declaration",
            Self::PrivateAnnotated { .. } => "private-annotated",
            Self::NotAnnotated => "not-annotated",
            Self::UnsupportedMarker { .. } => "unsupported-marker",
        }
    }
}

/// A non-fatal finding about one property.
///
/// The structured data lives in [`DiagnosticKind`]; the message is rendered
/// once, deterministically, when the diagnostic is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Name of the property the finding is about.
    pub property: String,
    /// Severity of this finding.
    pub severity: Severity,
    /// Structured payload.
    #[serde(flatten)]
    pub kind: DiagnosticKind,
    /// Rendered, human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Builds a conflicting-markers diagnostic.
    ///
    /// `categories` must already be in configured order.
    #[must_use]
    pub fn conflicting(property: impl Into<String>, categories: Vec<MarkerName>) -> Self {
        let property = property.into();
        let listed = categories
            .iter()
            .map(MarkerName::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let message = format!("Property '{property}' has conflicting markers declared: {listed}.");
        Self {
            property,
            severity: Severity::Warning,
            kind: DiagnosticKind::ConflictingMarkers { categories },
            message,
        }
    }

    /// Builds a duplicate-declaration diagnostic.
    #[must_use]
    pub fn duplicate(property: impl Into<String>, marker: MarkerName) -> Self {
        let property = property.into();
        let message = format!(
            "Property '{property}' has both a getter and a field declared with marker {marker}."
        );
        Self {
            property,
            severity: Severity::Warning,
            kind: DiagnosticKind::DuplicateDeclaration { marker },
            message,
        }
    }

    /// Builds a private-annotated diagnostic.
    #[must_use]
    pub fn private_annotated(property: impl Into<String>, marker: MarkerName) -> Self {
        let property = property.into();
        let message = format!("Property '{property}' is private and annotated with marker {marker}.");
        Self {
            property,
            severity: Severity::Warning,
            kind: DiagnosticKind::PrivateAnnotated { marker },
            message,
        }
    }

    /// Builds a not-annotated diagnostic using the configured domain label.
    #[must_use]
    pub fn not_annotated(property: impl Into<String>, domain_label: &str) -> Self {
        let property = property.into();
        let message = format!("Property '{property}' is not annotated with a {domain_label}.");
        Self {
            property,
            severity: Severity::Warning,
            kind: DiagnosticKind::NotAnnotated,
            message,
        }
    }

    /// Builds an unsupported-marker diagnostic.
    #[must_use]
    pub fn unsupported(property: impl Into<String>, marker: MarkerName) -> Self {
        let property = property.into();
        let message =
            format!("Property '{property}' is annotated with unsupported marker {marker}.");
        Self {
            property,
            severity: Severity::Warning,
            kind: DiagnosticKind::UnsupportedMarker { marker },
            message,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.severity,
            self.kind.code(),
            self.message
        )
    }
}

/// Final metadata for one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedProperty {
    /// Property name, unique within one extraction.
    pub name: String,
    /// The winning category, or `None` when no primary marker resolved.
    pub category: Option<MarkerName>,
    /// Supporting markers contributing to this property, most-derived first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supporting: Vec<MarkerUse>,
}

/// Result of one extraction call: resolved properties plus diagnostics,
/// both ordered by property name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// Name-unique resolved properties.
    pub properties: Vec<ResolvedProperty>,
    /// Diagnostics, ordered by property name (stable within one property).
    pub diagnostics: Vec<Diagnostic>,
}

impl Extraction {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a resolved property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&ResolvedProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Returns true if any diagnostic was emitted.
    #[must_use]
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Checks if any diagnostic meets or exceeds the given severity.
    #[must_use]
    pub fn has_diagnostics_at(&self, severity: Severity) -> bool {
        self.diagnostics.iter().any(|d| d.severity >= severity)
    }

    /// Counts diagnostics by severity: `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for d in &self.diagnostics {
            match d.severity {
                Severity::Error => counts.0 += 1,
                Severity::Warning => counts.1 += 1,
                Severity::Info => counts.2 += 1,
            }
        }
        counts
    }

    /// Formats a human-readable multi-line report.
    ///
    /// Suitable for `panic!()` messages in test integration and log output.
    #[must_use]
    pub fn format_report(&self) -> String {
        use std::fmt::Write;

        let mut report = String::new();
        for property in &self.properties {
            let category = property
                .category
                .as_ref()
                .map_or("(none)", MarkerName::as_str);
            let _ = writeln!(report, "{}: {category}", property.name);
        }
        for diagnostic in &self.diagnostics {
            let _ = writeln!(report, "{diagnostic}");
        }

        let (errors, warnings, infos) = self.count_by_severity();
        let _ = writeln!(
            report,
            "Resolved {} propert{}, {} error(s), {} warning(s), {} info(s)",
            self.properties.len(),
            if self.properties.len() == 1 { "y" } else { "ies" },
            errors,
            warnings,
            infos
        );
        report
    }
}
