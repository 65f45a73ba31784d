//! Pure domain model for the marker configuration.
//!
//! This module contains no serde, no I/O dependencies.
//! All invariants are enforced at construction time via validated newtypes
//! and aggregate-root cross-checks.

use std::collections::{HashMap, HashSet};
use std::fmt;

// ────────────────────────────────────────────
// Newtypes with validation
// ────────────────────────────────────────────

/// A validated marker name (non-empty, `[A-Za-z][A-Za-z0-9_]*`).
///
/// Markers are opaque identifiers compared by identity; whether a marker is
/// a category, a supporting marker, or known-but-unsupported is decided
/// entirely by the [`MarkerConfig`] it is registered in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerName(String);

impl MarkerName {
    /// Creates a new marker name.
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty or is not a plain identifier.
    pub fn new(name: &str) -> Result<Self, ConfigError> {
        let mut chars = name.chars();
        match chars.next() {
            None => return Err(ConfigError::EmptyMarkerName),
            Some(c) if !c.is_ascii_alphabetic() => {
                return Err(ConfigError::InvalidMarkerName {
                    name: name.to_string(),
                })
            }
            Some(_) => {}
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ConfigError::InvalidMarkerName {
                name: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for MarkerName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for MarkerName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

// ────────────────────────────────────────────
// Marker classification
// ────────────────────────────────────────────

/// How a configured marker participates in resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerClass {
    /// Determines the property's category.
    Primary,
    /// Carries auxiliary metadata; never determines a category.
    Supporting,
    /// Recognized as in-domain but mapped to no category.
    Unsupported,
}

// ────────────────────────────────────────────
// Aggregate root
// ────────────────────────────────────────────

/// Validated, immutable marker configuration.
///
/// The order of the primary category list is significant: conflict
/// diagnostics list categories in this order, and the first-listed category
/// among a conflicting set becomes the nominal winner.
///
/// All cross-references are verified at construction time.
#[derive(Debug, Clone)]
pub struct MarkerConfig {
    domain_label: String,
    primary: Vec<MarkerName>,
    supporting: HashSet<MarkerName>,
    unsupported: HashSet<MarkerName>,
    overrides: HashMap<MarkerName, Vec<MarkerName>>,
    ignored_class_roots: HashSet<String>,
    ignored_interface_roots: HashSet<String>,
}

impl MarkerConfig {
    /// Creates a new marker configuration with full validation.
    ///
    /// # Errors
    ///
    /// Returns every violation found: an empty domain label, duplicate
    /// categories, a marker registered in more than one class, or an
    /// override entry whose base or narrower side is not a primary category.
    pub fn new(
        domain_label: String,
        primary: Vec<MarkerName>,
        supporting: Vec<MarkerName>,
        unsupported: Vec<MarkerName>,
        overrides: Vec<(MarkerName, MarkerName)>,
        ignored_class_roots: Vec<String>,
        ignored_interface_roots: Vec<String>,
    ) -> Result<Self, Vec<ConfigError>> {
        let mut errors = Vec::new();

        if domain_label.trim().is_empty() {
            errors.push(ConfigError::EmptyDomainLabel);
        }

        let mut primary_set = HashSet::new();
        for name in &primary {
            if !primary_set.insert(name.clone()) {
                errors.push(ConfigError::DuplicateCategory { name: name.clone() });
            }
        }

        let supporting_set: HashSet<MarkerName> = supporting.into_iter().collect();
        let unsupported_set: HashSet<MarkerName> = unsupported.into_iter().collect();

        for name in supporting_set.intersection(&primary_set) {
            errors.push(ConfigError::OverlappingClasses {
                name: name.clone(),
                first: MarkerClass::Primary,
                second: MarkerClass::Supporting,
            });
        }
        for name in unsupported_set.intersection(&primary_set) {
            errors.push(ConfigError::OverlappingClasses {
                name: name.clone(),
                first: MarkerClass::Primary,
                second: MarkerClass::Unsupported,
            });
        }
        for name in unsupported_set.intersection(&supporting_set) {
            errors.push(ConfigError::OverlappingClasses {
                name: name.clone(),
                first: MarkerClass::Supporting,
                second: MarkerClass::Unsupported,
            });
        }

        let mut override_map: HashMap<MarkerName, Vec<MarkerName>> = HashMap::new();
        for (base, narrower) in overrides {
            if !primary_set.contains(&base) {
                errors.push(ConfigError::UnknownOverrideCategory {
                    name: base.clone(),
                    side: "base",
                });
            }
            if !primary_set.contains(&narrower) {
                errors.push(ConfigError::UnknownOverrideCategory {
                    name: narrower.clone(),
                    side: "narrower",
                });
            }
            if base == narrower {
                errors.push(ConfigError::SelfOverride { name: base.clone() });
                continue;
            }
            let targets = override_map.entry(base).or_default();
            if !targets.contains(&narrower) {
                targets.push(narrower);
            }
        }

        if errors.is_empty() {
            Ok(Self {
                domain_label,
                primary,
                supporting: supporting_set,
                unsupported: unsupported_set,
                overrides: override_map,
                ignored_class_roots: ignored_class_roots.into_iter().collect(),
                ignored_interface_roots: ignored_interface_roots.into_iter().collect(),
            })
        } else {
            Err(errors)
        }
    }

    /// Returns the label naming the marker domain in diagnostics.
    #[must_use]
    pub fn domain_label(&self) -> &str {
        &self.domain_label
    }

    /// Returns the primary categories in declaration order.
    #[must_use]
    pub fn primary(&self) -> &[MarkerName] {
        &self.primary
    }

    /// Classifies a marker name, or returns `None` for an unrecognized one.
    #[must_use]
    pub fn classify(&self, name: &MarkerName) -> Option<MarkerClass> {
        if self.primary.contains(name) {
            Some(MarkerClass::Primary)
        } else if self.supporting.contains(name) {
            Some(MarkerClass::Supporting)
        } else if self.unsupported.contains(name) {
            Some(MarkerClass::Unsupported)
        } else {
            None
        }
    }

    /// Tests whether a marker is in the relevant set (primary or supporting).
    #[must_use]
    pub fn is_relevant(&self, name: &MarkerName) -> bool {
        matches!(
            self.classify(name),
            Some(MarkerClass::Primary | MarkerClass::Supporting)
        )
    }

    /// Returns the position of a category in the declared ordering.
    #[must_use]
    pub fn category_rank(&self, name: &MarkerName) -> Option<usize> {
        self.primary.iter().position(|c| c == name)
    }

    /// Tests whether `narrower` is a configured override of `base`.
    #[must_use]
    pub fn narrows(&self, base: &MarkerName, narrower: &MarkerName) -> bool {
        self.overrides
            .get(base)
            .is_some_and(|targets| targets.contains(narrower))
    }

    /// Tests whether a type name is an ignored class-hierarchy root.
    #[must_use]
    pub fn is_ignored_class_root(&self, type_name: &str) -> bool {
        self.ignored_class_roots.contains(type_name)
    }

    /// Tests whether a type name is an ignored interface root.
    #[must_use]
    pub fn is_ignored_interface_root(&self, type_name: &str) -> bool {
        self.ignored_interface_roots.contains(type_name)
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Errors in marker-configuration construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Marker name is empty.
    #[error("marker name must not be empty")]
    EmptyMarkerName,

    /// Marker name is not a plain identifier.
    #[error("invalid marker name `{name}`: must be [A-Za-z][A-Za-z0-9_]*")]
    InvalidMarkerName {
        /// The invalid name.
        name: String,
    },

    /// The domain label is empty.
    #[error("domain label must not be empty")]
    EmptyDomainLabel,

    /// A category is listed more than once.
    #[error("category `{name}` is declared more than once")]
    DuplicateCategory {
        /// The repeated category.
        name: MarkerName,
    },

    /// A marker is registered in two classes at once.
    #[error("marker `{name}` is registered as both {first:?} and {second:?}")]
    OverlappingClasses {
        /// The doubly-registered marker.
        name: MarkerName,
        /// The first class it was registered in.
        first: MarkerClass,
        /// The second class it was registered in.
        second: MarkerClass,
    },

    /// An override entry references a category outside the primary set.
    #[error("override {side} `{name}` is not a primary category")]
    UnknownOverrideCategory {
        /// The unregistered category.
        name: MarkerName,
        /// Which side of the override entry referenced it.
        side: &'static str,
    },

    /// An override entry maps a category to itself.
    #[error("category `{name}` cannot override itself")]
    SelfOverride {
        /// The self-referencing category.
        name: MarkerName,
    },
}

// ────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────
