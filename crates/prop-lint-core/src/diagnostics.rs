//! Phase 4: diagnostics.
//!
//! Evaluates the per-property validation rules independently of category
//! resolution. Every finding is data, never a call-aborting failure; a
//! property can produce metadata and diagnostics at the same time.

use crate::aggregate::{PropertyRecord, SiteView};
use crate::config::{MarkerClass, MarkerConfig, MarkerName};
use crate::hierarchy::SiteKind;
use crate::resolve::Resolution;
use crate::types::Diagnostic;

/// Builds every diagnostic for one property record.
///
/// Within one property the emission order is fixed: conflict, duplicate,
/// private-annotated, not-annotated, unsupported-marker.
pub(crate) fn build_diagnostics(
    record: &PropertyRecord,
    resolution: &Resolution,
    config: &MarkerConfig,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let property = record.name.as_str();

    if let Some(categories) = &resolution.conflict {
        diagnostics.push(Diagnostic::conflicting(property, categories.clone()));
    }

    for marker in duplicate_markers(record, config) {
        diagnostics.push(Diagnostic::duplicate(property, marker));
    }

    if let Some(marker) = private_annotated_marker(record, config) {
        diagnostics.push(Diagnostic::private_annotated(property, marker));
    }

    if is_unannotated(record) {
        diagnostics.push(Diagnostic::not_annotated(property, config.domain_label()));
    }

    for marker in unsupported_markers(record, config) {
        diagnostics.push(Diagnostic::unsupported(property, marker));
    }

    diagnostics
}

/// Primary markers declared literally on both the getter and the field.
///
/// Markers that merely stand in an override relation do not count, and
/// supporting or unsupported markers never trigger the rule.
fn duplicate_markers(record: &PropertyRecord, config: &MarkerConfig) -> Vec<MarkerName> {
    let (Some(getter), Some(field)) = (&record.getter, &record.field) else {
        return Vec::new();
    };
    let mut duplicated: Vec<MarkerName> = getter
        .markers
        .iter()
        .filter(|m| config.classify(&m.name) == Some(MarkerClass::Primary))
        .filter(|m| field.markers.iter().any(|f| f.name == m.name))
        .map(|m| m.name.clone())
        .collect();
    duplicated.sort_by_key(|m| config.category_rank(m).unwrap_or(usize::MAX));
    duplicated.dedup();
    duplicated
}

/// The first configured primary marker on a private most-derived site.
fn private_annotated_marker(
    record: &PropertyRecord,
    config: &MarkerConfig,
) -> Option<MarkerName> {
    let (site, _) = record.most_derived()?;
    if !site.visibility.is_private() {
        return None;
    }
    primary_markers(site, config).min_by_key(|m| config.category_rank(m).unwrap_or(usize::MAX))
}

/// A non-private accessor with no recognized marker anywhere in its chain.
fn is_unannotated(record: &PropertyRecord) -> bool {
    match record.most_derived() {
        Some((site, SiteKind::Getter)) => {
            !site.visibility.is_private() && !record.has_recognized_markers()
        }
        _ => false,
    }
}

/// Distinct known-but-unsupported markers on any surviving site,
/// accessor side first.
fn unsupported_markers(record: &PropertyRecord, config: &MarkerConfig) -> Vec<MarkerName> {
    let mut found: Vec<MarkerName> = Vec::new();
    for marker in record.all_markers() {
        if config.classify(&marker.name) == Some(MarkerClass::Unsupported)
            && !found.contains(&marker.name)
        {
            found.push(marker.name.clone());
        }
    }
    found
}

fn primary_markers<'a>(
    site: &'a SiteView,
    config: &'a MarkerConfig,
) -> impl Iterator<Item = MarkerName> + 'a {
    site.markers
        .iter()
        .filter(|m| config.classify(&m.name) == Some(MarkerClass::Primary))
        .map(|m| m.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::{MarkerUse, Visibility};
    use crate::resolve::resolve_category;
    use crate::types::DiagnosticKind;

    fn config() -> MarkerConfig {
        MarkerConfig::new(
            "task property annotation".to_string(),
            vec![name("Input"), name("InputFile"), name("OutputFile")],
            vec![name("Hint")],
            vec![name("Unmanaged")],
            vec![(name("Input"), name("InputFile"))],
            vec![],
            vec![],
        )
        .unwrap()
    }

    fn name(s: &str) -> MarkerName {
        MarkerName::new(s).unwrap()
    }

    fn site(markers: &[&str], visibility: Visibility, depth: usize) -> SiteView {
        SiteView {
            owner: "T".to_string(),
            depth,
            visibility,
            markers: markers.iter().map(|m| MarkerUse::new(name(m))).collect(),
        }
    }

    fn diagnostics_for(record: &PropertyRecord) -> Vec<Diagnostic> {
        let cfg = config();
        let resolution = resolve_category(record, &cfg);
        build_diagnostics(record, &resolution, &cfg)
    }

    fn kinds(diagnostics: &[Diagnostic]) -> Vec<&'static str> {
        diagnostics.iter().map(|d| d.kind.name()).collect()
    }

    // -- Duplicate declarations --

    #[test]
    fn same_literal_marker_on_getter_and_field_is_duplicate() {
        let record = PropertyRecord {
            name: "file".to_string(),
            getter: Some(site(&["Input"], Visibility::Public, 0)),
            field: Some(site(&["Input"], Visibility::Public, 0)),
        };
        let diagnostics = diagnostics_for(&record);
        assert_eq!(kinds(&diagnostics), ["duplicate-declaration"]);
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::DuplicateDeclaration { marker: name("Input") }
        );
    }

    #[test]
    fn override_pair_on_getter_and_field_is_not_duplicate() {
        let record = PropertyRecord {
            name: "file".to_string(),
            getter: Some(site(&["InputFile"], Visibility::Public, 0)),
            field: Some(site(&["Input"], Visibility::Public, 0)),
        };
        assert!(diagnostics_for(&record).is_empty());
    }

    #[test]
    fn supporting_marker_on_both_sites_is_not_duplicate() {
        let record = PropertyRecord {
            name: "file".to_string(),
            getter: Some(site(&["Input", "Hint"], Visibility::Public, 0)),
            field: Some(site(&["Hint"], Visibility::Public, 0)),
        };
        assert!(diagnostics_for(&record).is_empty());
    }

    // -- Private and annotated --

    #[test]
    fn private_getter_with_primary_marker_flagged() {
        let record = PropertyRecord {
            name: "file".to_string(),
            getter: Some(site(&["Input"], Visibility::Private, 0)),
            field: None,
        };
        let diagnostics = diagnostics_for(&record);
        assert_eq!(kinds(&diagnostics), ["private-annotated"]);
        assert_eq!(
            diagnostics[0].message,
            "Property 'file' is private and annotated with marker Input."
        );
    }

    #[test]
    fn private_getter_without_primary_marker_not_flagged() {
        let record = PropertyRecord {
            name: "file".to_string(),
            getter: Some(site(&["Hint"], Visibility::Private, 0)),
            field: None,
        };
        assert!(diagnostics_for(&record).is_empty());
    }

    #[test]
    fn privacy_of_deeper_site_does_not_count() {
        // most-derived site is the public field; the private getter is deeper
        let record = PropertyRecord {
            name: "file".to_string(),
            getter: Some(site(&["Input"], Visibility::Private, 1)),
            field: Some(site(&[], Visibility::Public, 0)),
        };
        assert!(diagnostics_for(&record).is_empty());
    }

    // -- Unannotated --

    #[test]
    fn bare_public_accessor_is_unannotated() {
        let record = PropertyRecord {
            name: "file".to_string(),
            getter: Some(site(&[], Visibility::Public, 0)),
            field: None,
        };
        let diagnostics = diagnostics_for(&record);
        assert_eq!(kinds(&diagnostics), ["not-annotated"]);
        assert_eq!(
            diagnostics[0].message,
            "Property 'file' is not annotated with a task property annotation."
        );
    }

    #[test]
    fn bare_private_accessor_is_not_flagged() {
        let record = PropertyRecord {
            name: "file".to_string(),
            getter: Some(site(&[], Visibility::Private, 0)),
            field: None,
        };
        assert!(diagnostics_for(&record).is_empty());
    }

    #[test]
    fn bare_field_is_not_flagged() {
        let record = PropertyRecord {
            name: "file".to_string(),
            getter: None,
            field: Some(site(&[], Visibility::Public, 0)),
        };
        assert!(diagnostics_for(&record).is_empty());
    }

    #[test]
    fn supporting_marker_suppresses_unannotated() {
        let record = PropertyRecord {
            name: "file".to_string(),
            getter: Some(site(&["Hint"], Visibility::Public, 0)),
            field: None,
        };
        assert!(diagnostics_for(&record).is_empty());
    }

    // -- Unsupported markers --

    #[test]
    fn unsupported_marker_always_reported() {
        let record = PropertyRecord {
            name: "file".to_string(),
            getter: Some(site(&["Input", "Unmanaged"], Visibility::Public, 0)),
            field: None,
        };
        let diagnostics = diagnostics_for(&record);
        assert_eq!(kinds(&diagnostics), ["unsupported-marker"]);
    }

    // -- Combinations --

    #[test]
    fn duplicate_and_private_reported_independently() {
        let record = PropertyRecord {
            name: "file".to_string(),
            getter: Some(site(&["Input"], Visibility::Private, 0)),
            field: Some(site(&["Input"], Visibility::Public, 1)),
        };
        let diagnostics = diagnostics_for(&record);
        assert_eq!(kinds(&diagnostics), ["duplicate-declaration", "private-annotated"]);
    }

    #[test]
    fn conflict_comes_first_in_emission_order() {
        let record = PropertyRecord {
            name: "file".to_string(),
            getter: Some(site(&["Input", "OutputFile", "Unmanaged"], Visibility::Public, 0)),
            field: None,
        };
        let diagnostics = diagnostics_for(&record);
        assert_eq!(kinds(&diagnostics), ["conflicting-markers", "unsupported-marker"]);
    }
}
