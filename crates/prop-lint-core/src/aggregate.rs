//! Phase 2: declaration aggregation.
//!
//! Groups candidate declaration sites by property name and applies the
//! shadowing rule: among accessor sites the most-derived override wins, and
//! an override that declares no recognized markers of its own inherits the
//! first ancestor declaration's markers wholesale. Marker sets are never
//! merged across override levels.

use std::collections::BTreeMap;

use crate::config::MarkerConfig;
use crate::description::{MarkerUse, TypeDecl, Visibility};
use crate::extractor::ExtractError;
use crate::hierarchy::{DeclSite, SiteKind};

/// A surviving declaration site inside a property record.
#[derive(Debug, Clone)]
pub(crate) struct SiteView {
    pub owner: String,
    pub depth: usize,
    pub visibility: Visibility,
    /// Recognized markers only (primary, supporting, or known-unsupported);
    /// for accessors this is the post-shadowing, possibly inherited set.
    pub markers: Vec<MarkerUse>,
}

/// Merged view of all declaration sites sharing one property name.
#[derive(Debug, Clone)]
pub(crate) struct PropertyRecord {
    pub name: String,
    /// Post-shadowing accessor view; visibility and owner always belong to
    /// the most-derived accessor site, even when markers were inherited.
    pub getter: Option<SiteView>,
    /// Most-derived field site; deeper field sites never form a chain.
    pub field: Option<SiteView>,
}

impl PropertyRecord {
    /// The most-derived site of this property; getters win ties.
    pub(crate) fn most_derived(&self) -> Option<(&SiteView, SiteKind)> {
        match (&self.getter, &self.field) {
            (Some(getter), Some(field)) => {
                if field.depth < getter.depth {
                    Some((field, SiteKind::Field))
                } else {
                    Some((getter, SiteKind::Getter))
                }
            }
            (Some(getter), None) => Some((getter, SiteKind::Getter)),
            (None, Some(field)) => Some((field, SiteKind::Field)),
            (None, None) => None,
        }
    }

    /// All recognized markers contributing to this property, accessor side
    /// first.
    pub(crate) fn all_markers(&self) -> impl Iterator<Item = &MarkerUse> {
        self.getter
            .iter()
            .flat_map(|s| s.markers.iter())
            .chain(self.field.iter().flat_map(|s| s.markers.iter()))
    }

    /// Whether any recognized marker contributes to this property.
    pub(crate) fn has_recognized_markers(&self) -> bool {
        self.all_markers().next().is_some()
    }
}

/// Builds one property record per name from the collected sites.
///
/// Records come out ordered by property name. Fails only when a declaration
/// site claims an override relationship that the chain cannot back up.
pub(crate) fn build_records(
    chain: &[&TypeDecl],
    sites: Vec<DeclSite<'_>>,
    config: &MarkerConfig,
) -> Result<Vec<PropertyRecord>, ExtractError> {
    let mut grouped: BTreeMap<String, Vec<DeclSite<'_>>> = BTreeMap::new();
    for site in sites {
        grouped.entry(site.property.clone()).or_default().push(site);
    }

    let mut records = Vec::with_capacity(grouped.len());
    for (name, sites) in grouped {
        records.push(build_record(chain, name, &sites, config)?);
    }
    Ok(records)
}

fn build_record(
    chain: &[&TypeDecl],
    name: String,
    sites: &[DeclSite<'_>],
    config: &MarkerConfig,
) -> Result<PropertyRecord, ExtractError> {
    // Site collection walks the chain in depth order, so each per-kind
    // subsequence is already most-derived first.
    let getters: Vec<&DeclSite<'_>> = sites.iter().filter(|s| s.kind == SiteKind::Getter).collect();
    let fields: Vec<&DeclSite<'_>> = sites.iter().filter(|s| s.kind == SiteKind::Field).collect();

    for getter in &getters {
        verify_override_claim(chain, getter)?;
    }

    let getter = getters.first().map(|primary| {
        let markers = getters
            .iter()
            .map(|site| recognized(site.markers, config))
            .find(|markers| !markers.is_empty())
            .unwrap_or_default();
        SiteView {
            owner: primary.owner.to_string(),
            depth: primary.depth,
            visibility: primary.visibility,
            markers,
        }
    });

    let field = fields.first().map(|site| SiteView {
        owner: site.owner.to_string(),
        depth: site.depth,
        visibility: site.visibility,
        markers: recognized(site.markers, config),
    });

    Ok(PropertyRecord { name, getter, field })
}

/// A declared override must have a same-named method on another
/// contributing type.
///
/// Interface linearization is encounter-ordered, not strictly ancestral
/// (a diamond can place a super-interface before its extender), so the
/// claim is checked against every contributing type except the declaring
/// one.
fn verify_override_claim(chain: &[&TypeDecl], site: &DeclSite<'_>) -> Result<(), ExtractError> {
    if !site.declared_override {
        return Ok(());
    }
    let Some(method_name) = site.method_name else {
        return Ok(());
    };
    let found = chain
        .iter()
        .enumerate()
        .filter(|(depth, _)| *depth != site.depth)
        .any(|(_, decl)| decl.methods.iter().any(|m| m.name == method_name));
    if found {
        Ok(())
    } else {
        Err(ExtractError::MissingOverrideTarget {
            type_name: site.owner.to_string(),
            method: method_name.to_string(),
        })
    }
}

fn recognized(markers: &[MarkerUse], config: &MarkerConfig) -> Vec<MarkerUse> {
    markers
        .iter()
        .filter(|m| config.classify(&m.name).is_some())
        .cloned()
        .collect()
}
