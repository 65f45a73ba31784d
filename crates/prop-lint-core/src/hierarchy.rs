//! Phase 1: hierarchy walking.
//!
//! Linearizes a type's contributing ancestor chain (the type itself, then
//! superclasses nearest to farthest, then interfaces reachable from any
//! class in the chain, transitively) and yields every candidate declaration
//! site found on it. Ignored root types are cut off before their members
//! can become candidates.

use std::collections::HashSet;

use crate::config::MarkerConfig;
use crate::description::{
    MarkerUse, MethodDecl, ReturnKind, TypeDecl, TypeDescription, Visibility,
};
use crate::extractor::ExtractError;

/// Kind of a candidate declaration site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SiteKind {
    /// A non-static field.
    Field,
    /// A recognized accessor method.
    Getter,
}

/// One candidate declaration site on the contributing chain.
#[derive(Debug, Clone)]
pub(crate) struct DeclSite<'a> {
    /// Derived property name.
    pub property: String,
    /// Name of the declaring type.
    pub owner: &'a str,
    /// Distance from the target type (0 = target).
    pub depth: usize,
    pub kind: SiteKind,
    pub visibility: Visibility,
    /// Raw markers as declared; classification happens during aggregation.
    pub markers: &'a [MarkerUse],
    /// Raw method name, for override-claim validation.
    pub method_name: Option<&'a str>,
    pub declared_override: bool,
}

/// Produces the ordered list of contributing types for the target.
///
/// Classes come first (most-derived to root), then interfaces in encounter
/// order. Types named in either ignored-root set are excluded together with
/// everything above them.
pub(crate) fn linearize<'a>(
    description: &'a TypeDescription,
    config: &MarkerConfig,
) -> Result<Vec<&'a TypeDecl>, ExtractError> {
    let mut chain: Vec<&'a TypeDecl> = Vec::new();
    let mut seen_classes: HashSet<&'a str> = HashSet::new();

    let mut next: Option<(String, String)> = Some((
        description.target.clone(),
        "extraction target".to_string(),
    ));
    while let Some((name, context)) = next {
        if config.is_ignored_class_root(&name) {
            break;
        }
        let decl = description
            .decl(&name)
            .ok_or_else(|| ExtractError::UnknownType {
                referenced: name.clone(),
                context,
            })?;
        if !seen_classes.insert(&decl.name) {
            return Err(ExtractError::CyclicHierarchy { type_name: name });
        }
        chain.push(decl);
        next = decl
            .superclass
            .clone()
            .map(|s| (s, format!("superclass of `{}`", decl.name)));
    }

    let classes = chain.clone();
    let mut visited: HashSet<&'a str> = HashSet::new();
    let mut stack: Vec<&'a str> = Vec::new();
    for class in classes {
        for interface in &class.interfaces {
            visit_interface(
                description,
                config,
                interface,
                &class.name,
                &mut chain,
                &mut visited,
                &mut stack,
            )?;
        }
    }

    Ok(chain)
}

/// Depth-first, pre-order walk over transitively extended interfaces.
///
/// Diamonds are deduplicated silently; a cycle among interfaces is a
/// contract violation by the introspection side.
fn visit_interface<'a>(
    description: &'a TypeDescription,
    config: &MarkerConfig,
    name: &str,
    owner: &str,
    chain: &mut Vec<&'a TypeDecl>,
    visited: &mut HashSet<&'a str>,
    stack: &mut Vec<&'a str>,
) -> Result<(), ExtractError> {
    if config.is_ignored_interface_root(name) {
        return Ok(());
    }
    if stack.iter().any(|entered| *entered == name) {
        return Err(ExtractError::CyclicHierarchy {
            type_name: name.to_string(),
        });
    }
    if visited.contains(name) {
        return Ok(());
    }
    let decl = description
        .decl(name)
        .ok_or_else(|| ExtractError::UnknownType {
            referenced: name.to_string(),
            context: format!("interface of `{owner}`"),
        })?;
    visited.insert(&decl.name);
    stack.push(&decl.name);
    chain.push(decl);
    for extended in &decl.interfaces {
        visit_interface(description, config, extended, &decl.name, chain, visited, stack)?;
    }
    stack.pop();
    Ok(())
}

/// Collects every candidate declaration site on the linearized chain.
///
/// Non-candidates (static members, non-accessor methods) are skipped
/// silently; a type with no declared members simply yields nothing.
pub(crate) fn collect_sites<'a>(chain: &[&'a TypeDecl]) -> Vec<DeclSite<'a>> {
    let mut sites = Vec::new();

    for (depth, decl) in chain.iter().enumerate() {
        for field in &decl.fields {
            if field.is_static {
                continue;
            }
            sites.push(DeclSite {
                property: field.name.clone(),
                owner: &decl.name,
                depth,
                kind: SiteKind::Field,
                visibility: field.visibility,
                markers: &field.markers,
                method_name: None,
                declared_override: false,
            });
        }
        for method in &decl.methods {
            let Some(property) = accessor_property(method) else {
                continue;
            };
            sites.push(DeclSite {
                property,
                owner: &decl.name,
                depth,
                kind: SiteKind::Getter,
                visibility: method.visibility,
                markers: &method.markers,
                method_name: Some(&method.name),
                declared_override: method.declared_override,
            });
        }
    }

    sites
}

/// Derives the property name a method is an accessor for, if any.
///
/// A method counts as an accessor when it is non-static, takes no
/// parameters, returns a value, and is named `get<X>` (any return kind) or
/// `is<X>` (boolean return only). `<X>` must start uppercase; it is returned
/// with its first character lowercased.
fn accessor_property(method: &MethodDecl) -> Option<String> {
    if method.is_static || method.param_count != 0 || method.returns == ReturnKind::Void {
        return None;
    }
    let rest = if let Some(rest) = method.name.strip_prefix("get") {
        rest
    } else if let Some(rest) = method.name.strip_prefix("is") {
        if method.returns != ReturnKind::Boolean {
            return None;
        }
        rest
    } else {
        return None;
    };

    let mut chars = rest.chars();
    let first = chars.next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    Some(format!("{}{}", first.to_ascii_lowercase(), chars.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MarkerConfig, MarkerName};
    use crate::description::{FieldDecl, TypeDescription};

    fn config() -> MarkerConfig {
        MarkerConfig::new(
            "marker".to_string(),
            vec![MarkerName::new("Input").unwrap()],
            vec![],
            vec![],
            vec![],
            vec!["Object".to_string()],
            vec!["DynamicObject".to_string()],
        )
        .unwrap()
    }

    fn names(chain: &[&TypeDecl]) -> Vec<String> {
        chain.iter().map(|t| t.name.clone()).collect()
    }

    // -- Linearization --

    #[test]
    fn classes_before_interfaces_most_derived_first() {
        let desc = TypeDescription::new("Child")
            .ty(TypeDecl::class("Child").extends("Parent").implements("Late"))
            .ty(TypeDecl::class("Parent").implements("Early"))
            .ty(TypeDecl::interface("Early"))
            .ty(TypeDecl::interface("Late").implements("Base"))
            .ty(TypeDecl::interface("Base"));

        let chain = linearize(&desc, &config()).unwrap();
        assert_eq!(names(&chain), ["Child", "Parent", "Late", "Base", "Early"]);
    }

    #[test]
    fn ignored_class_root_cuts_off_chain() {
        let desc = TypeDescription::new("Child")
            .ty(TypeDecl::class("Child").extends("Object"));

        let chain = linearize(&desc, &config()).unwrap();
        assert_eq!(names(&chain), ["Child"]);
    }

    #[test]
    fn ignored_interface_root_is_skipped() {
        let desc = TypeDescription::new("Child")
            .ty(TypeDecl::class("Child").implements("DynamicObject"));

        let chain = linearize(&desc, &config()).unwrap();
        assert_eq!(names(&chain), ["Child"]);
    }

    #[test]
    fn interface_diamond_deduplicated() {
        let desc = TypeDescription::new("Child")
            .ty(TypeDecl::class("Child").implements("A").implements("B"))
            .ty(TypeDecl::interface("A").implements("Shared"))
            .ty(TypeDecl::interface("B").implements("Shared"))
            .ty(TypeDecl::interface("Shared"));

        let chain = linearize(&desc, &config()).unwrap();
        assert_eq!(names(&chain), ["Child", "A", "Shared", "B"]);
    }

    #[test]
    fn cyclic_superclass_chain_detected() {
        let desc = TypeDescription::new("A")
            .ty(TypeDecl::class("A").extends("B"))
            .ty(TypeDecl::class("B").extends("A"));

        let err = linearize(&desc, &config()).unwrap_err();
        assert!(matches!(err, ExtractError::CyclicHierarchy { .. }));
    }

    #[test]
    fn cyclic_interface_chain_detected() {
        let desc = TypeDescription::new("T")
            .ty(TypeDecl::class("T").implements("A"))
            .ty(TypeDecl::interface("A").implements("B"))
            .ty(TypeDecl::interface("B").implements("A"));

        let err = linearize(&desc, &config()).unwrap_err();
        assert!(matches!(err, ExtractError::CyclicHierarchy { .. }));
    }

    #[test]
    fn dangling_superclass_reference_detected() {
        let desc =
            TypeDescription::new("Child").ty(TypeDecl::class("Child").extends("Missing"));

        let err = linearize(&desc, &config()).unwrap_err();
        match err {
            ExtractError::UnknownType { referenced, .. } => assert_eq!(referenced, "Missing"),
            other => panic!("expected unknown type, got {other:?}"),
        }
    }

    #[test]
    fn missing_target_detected() {
        let desc = TypeDescription::new("Ghost");
        let err = linearize(&desc, &config()).unwrap_err();
        assert!(matches!(err, ExtractError::UnknownType { .. }));
    }

    // -- Accessor recognition --

    fn property_of(method: MethodDecl) -> Option<String> {
        accessor_property(&method)
    }

    #[test]
    fn get_accessor_recognized() {
        assert_eq!(
            property_of(MethodDecl::getter("getFile")),
            Some("file".to_string())
        );
        assert_eq!(
            property_of(MethodDecl::getter("getOutputFile")),
            Some("outputFile".to_string())
        );
    }

    #[test]
    fn is_accessor_requires_boolean_return() {
        assert_eq!(
            property_of(MethodDecl::new("isEnabled", ReturnKind::Boolean)),
            Some("enabled".to_string())
        );
        assert_eq!(property_of(MethodDecl::new("isEnabled", ReturnKind::Other)), None);
    }

    #[test]
    fn non_accessors_skipped() {
        assert_eq!(property_of(MethodDecl::new("getFile", ReturnKind::Void)), None);
        assert_eq!(property_of(MethodDecl::getter("getFile").params(1)), None);
        assert_eq!(property_of(MethodDecl::getter("getFile").statik()), None);
        assert_eq!(property_of(MethodDecl::getter("execute")), None);
        // no property part, or lowercase after the prefix
        assert_eq!(property_of(MethodDecl::getter("get")), None);
        assert_eq!(property_of(MethodDecl::getter("getting")), None);
        assert_eq!(property_of(MethodDecl::new("issue", ReturnKind::Boolean)), None);
    }

    // -- Site collection --

    #[test]
    fn collects_fields_and_getters_with_depth() {
        let desc = TypeDescription::new("Child")
            .ty(TypeDecl::class("Child")
                .extends("Parent")
                .field(FieldDecl::new("file"))
                .field(FieldDecl::new("cache").statik()))
            .ty(TypeDecl::class("Parent").method(MethodDecl::getter("getFile")));

        let chain = linearize(&desc, &config()).unwrap();
        let sites = collect_sites(&chain);

        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].property, "file");
        assert_eq!(sites[0].kind, SiteKind::Field);
        assert_eq!(sites[0].depth, 0);
        assert_eq!(sites[1].property, "file");
        assert_eq!(sites[1].kind, SiteKind::Getter);
        assert_eq!(sites[1].depth, 1);
        assert_eq!(sites[1].owner, "Parent");
    }

    #[test]
    fn empty_type_yields_no_sites() {
        let desc = TypeDescription::new("Empty").ty(TypeDecl::class("Empty"));
        let chain = linearize(&desc, &config()).unwrap();
        assert!(collect_sites(&chain).is_empty());
    }
}
