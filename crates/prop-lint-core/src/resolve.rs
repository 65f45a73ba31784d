//! Phase 3: category resolution.
//!
//! Picks the single winning category for each property record, honoring the
//! override (narrowing) map. When two or more unrelated categories remain,
//! the property still resolves — to the first survivor in configured
//! category order — and the conflict is reported alongside.

use crate::aggregate::PropertyRecord;
use crate::config::{MarkerClass, MarkerConfig, MarkerName};

/// Outcome of category resolution for one property.
#[derive(Debug, Clone)]
pub(crate) struct Resolution {
    /// The winning category, if any primary marker was found.
    pub category: Option<MarkerName>,
    /// Surviving conflicting categories, in configured order, when two or
    /// more unrelated categories remain after override reduction.
    pub conflict: Option<Vec<MarkerName>>,
}

pub(crate) fn resolve_category(record: &PropertyRecord, config: &MarkerConfig) -> Resolution {
    let mut found: Vec<MarkerName> = Vec::new();
    for marker in record.all_markers() {
        if config.classify(&marker.name) == Some(MarkerClass::Primary)
            && !found.contains(&marker.name)
        {
            found.push(marker.name.clone());
        }
    }

    if found.is_empty() {
        return Resolution {
            category: None,
            conflict: None,
        };
    }

    // Narrowing: a base category loses to any present override of it.
    let mut survivors: Vec<MarkerName> = found
        .iter()
        .filter(|base| {
            !found
                .iter()
                .any(|other| *other != **base && config.narrows(base, other))
        })
        .cloned()
        .collect();
    if survivors.is_empty() {
        survivors = found;
    }

    survivors.sort_by_key(|category| config.category_rank(category).unwrap_or(usize::MAX));

    let category = survivors.first().cloned();
    let conflict = if survivors.len() > 1 {
        Some(survivors)
    } else {
        None
    };
    Resolution { category, conflict }
}
