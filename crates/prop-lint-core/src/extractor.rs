//! The extraction engine: validated configuration plus pipeline orchestration.

use tracing::{debug, trace};

use crate::aggregate;
use crate::config::{ConfigError, MarkerClass, MarkerConfig, MarkerName};
use crate::description::TypeDescription;
use crate::diagnostics;
use crate::hierarchy;
use crate::resolve;
use crate::types::{Extraction, ResolvedProperty};

/// Structural errors in a type description.
///
/// These indicate that the upstream introspection collaborator violated its
/// contract; they abort the affected call only and are distinct from the
/// per-property diagnostics, which are data.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The inheritance graph contains a cycle.
    #[error("cyclic inheritance detected at type `{type_name}`")]
    CyclicHierarchy {
        /// The type at which the cycle was found.
        type_name: String,
    },

    /// A referenced type has no declaration in the description.
    #[error("type `{referenced}` ({context}) is not present in the description")]
    UnknownType {
        /// The missing type.
        referenced: String,
        /// Where it was referenced from.
        context: String,
    },

    /// A method claims an override, but no ancestor declares that member.
    #[error("method `{method}` on `{type_name}` declares an override, but no ancestor declares that member")]
    MissingOverrideTarget {
        /// The type declaring the claim.
        type_name: String,
        /// The method name.
        method: String,
    },
}

/// The property-metadata extraction engine.
///
/// Holds only the immutable, validated marker configuration; [`extract`]
/// takes `&self` and keeps no state between calls, so one engine can serve
/// any number of threads concurrently.
///
/// [`extract`]: Extractor::extract
#[derive(Debug, Clone)]
pub struct Extractor {
    config: MarkerConfig,
}

impl Extractor {
    /// Creates a new builder for configuring an extractor.
    #[must_use]
    pub fn builder() -> ExtractorBuilder {
        ExtractorBuilder::new()
    }

    /// Creates an extractor from an already validated configuration.
    #[must_use]
    pub fn new(config: MarkerConfig) -> Self {
        Self { config }
    }

    /// Returns the marker configuration.
    #[must_use]
    pub fn config(&self) -> &MarkerConfig {
        &self.config
    }

    /// Extracts property metadata and diagnostics for one type description.
    ///
    /// Both output collections are ordered by property name; repeated calls
    /// on the same input yield identical results.
    ///
    /// # Errors
    ///
    /// Returns an error only for a structurally malformed description
    /// (cyclic inheritance, dangling type references, unbacked override
    /// claims) — never for what the inspected type declares.
    pub fn extract(&self, description: &TypeDescription) -> Result<Extraction, ExtractError> {
        debug!(type_name = %description.target, "extracting property metadata");

        let chain = hierarchy::linearize(description, &self.config)?;
        let sites = hierarchy::collect_sites(&chain);
        trace!(
            types = chain.len(),
            sites = sites.len(),
            "hierarchy walked"
        );
        let records = aggregate::build_records(&chain, sites, &self.config)?;

        // Records are in name order, so both collections come out ordered.
        let mut extraction = Extraction::new();
        for record in &records {
            let resolution = resolve::resolve_category(record, &self.config);
            extraction
                .diagnostics
                .extend(diagnostics::build_diagnostics(record, &resolution, &self.config));

            if record.has_recognized_markers() {
                let supporting = record
                    .all_markers()
                    .filter(|m| self.config.classify(&m.name) == Some(MarkerClass::Supporting))
                    .cloned()
                    .collect();
                extraction.properties.push(ResolvedProperty {
                    name: record.name.clone(),
                    category: resolution.category,
                    supporting,
                });
            }
        }

        debug!(
            properties = extraction.properties.len(),
            diagnostics = extraction.diagnostics.len(),
            "extraction complete"
        );
        Ok(extraction)
    }
}

/// Builder for configuring an [`Extractor`].
///
/// Collects raw marker names and validates everything at once in
/// [`build`](ExtractorBuilder::build).
#[derive(Debug, Default)]
pub struct ExtractorBuilder {
    domain_label: Option<String>,
    primary: Vec<String>,
    supporting: Vec<String>,
    unsupported: Vec<String>,
    overrides: Vec<(String, String)>,
    ignored_class_roots: Vec<String>,
    ignored_interface_roots: Vec<String>,
}

impl ExtractorBuilder {
    /// Creates a new builder with no markers registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the label naming the marker domain in diagnostics.
    #[must_use]
    pub fn domain_label(mut self, label: impl Into<String>) -> Self {
        self.domain_label = Some(label.into());
        self
    }

    /// Registers a primary category. Order of registration is the
    /// precedence order used for conflict listing and tie-breaks.
    #[must_use]
    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.primary.push(name.into());
        self
    }

    /// Registers several primary categories at once.
    #[must_use]
    pub fn categories<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary.extend(names.into_iter().map(Into::into));
        self
    }

    /// Registers a supporting marker.
    #[must_use]
    pub fn supporting(mut self, name: impl Into<String>) -> Self {
        self.supporting.push(name.into());
        self
    }

    /// Registers a known-but-unsupported marker.
    #[must_use]
    pub fn unsupported(mut self, name: impl Into<String>) -> Self {
        self.unsupported.push(name.into());
        self
    }

    /// Declares that `narrower` is an override of `base`.
    #[must_use]
    pub fn narrows(mut self, base: impl Into<String>, narrower: impl Into<String>) -> Self {
        self.overrides.push((base.into(), narrower.into()));
        self
    }

    /// Excludes a class-hierarchy root type from candidacy.
    #[must_use]
    pub fn ignore_class_root(mut self, type_name: impl Into<String>) -> Self {
        self.ignored_class_roots.push(type_name.into());
        self
    }

    /// Excludes an interface root type from candidacy.
    #[must_use]
    pub fn ignore_interface_root(mut self, type_name: impl Into<String>) -> Self {
        self.ignored_interface_roots.push(type_name.into());
        self
    }

    /// Validates the collected configuration and builds the extractor.
    ///
    /// # Errors
    ///
    /// Returns every violation found, never just the first one.
    pub fn build(self) -> Result<Extractor, Vec<ConfigError>> {
        let mut errors = Vec::new();

        let primary = convert_names(self.primary, &mut errors);
        let supporting = convert_names(self.supporting, &mut errors);
        let unsupported = convert_names(self.unsupported, &mut errors);

        let mut overrides = Vec::new();
        for (base, narrower) in self.overrides {
            let base = push_err(MarkerName::new(&base), &mut errors);
            let narrower = push_err(MarkerName::new(&narrower), &mut errors);
            if let (Some(base), Some(narrower)) = (base, narrower) {
                overrides.push((base, narrower));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        MarkerConfig::new(
            self.domain_label.unwrap_or_default(),
            primary,
            supporting,
            unsupported,
            overrides,
            self.ignored_class_roots,
            self.ignored_interface_roots,
        )
        .map(Extractor::new)
    }
}

fn convert_names(raw: Vec<String>, errors: &mut Vec<ConfigError>) -> Vec<MarkerName> {
    raw.iter()
        .filter_map(|name| push_err(MarkerName::new(name), errors))
        .collect()
}

fn push_err<T>(result: Result<T, ConfigError>, errors: &mut Vec<ConfigError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            errors.push(error);
            None
        }
    }
}
