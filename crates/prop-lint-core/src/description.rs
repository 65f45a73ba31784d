//! Pre-materialized type descriptions consumed by the extraction engine.
//!
//! The engine never performs live introspection: the caller (an external
//! introspection facility, or a JSON file via the CLI) supplies the full
//! contributing hierarchy of one target type as plain data. Fixtures for
//! tests are built through the fluent constructors on these types.

use serde::Deserialize;

use crate::config::MarkerName;

/// Kind of a described type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// A concrete or abstract class.
    Class,
    /// An interface.
    Interface,
}

/// Declared visibility of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible everywhere.
    Public,
    /// Visible to the type and its subtypes.
    Protected,
    /// Visible to the declaring type only.
    Private,
}

impl Visibility {
    /// Returns `true` for [`Visibility::Private`].
    #[must_use]
    pub fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Public
    }
}

/// Return kind of a described method, as far as accessor recognition cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnKind {
    /// No value returned; never an accessor.
    Void,
    /// A boolean-like value; enables the `is` accessor convention.
    Boolean,
    /// Any other returned value.
    Other,
}

/// One marker attached to a declaration, optionally carrying a payload.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct MarkerUse {
    /// The marker's name.
    pub name: MarkerName,
    /// Optional payload (supporting markers use this as a named hint).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl MarkerUse {
    /// Creates a marker occurrence without a payload.
    #[must_use]
    pub fn new(name: MarkerName) -> Self {
        Self { name, value: None }
    }

    /// Sets the payload.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// A field declaration on one described type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldDecl {
    /// Field name; doubles as the property name.
    pub name: String,
    /// Declared visibility.
    #[serde(default)]
    pub visibility: Visibility,
    /// Static fields are never property candidates.
    #[serde(default)]
    pub is_static: bool,
    /// Raw, unfiltered markers attached to the field.
    #[serde(default)]
    pub markers: Vec<MarkerUse>,
}

impl FieldDecl {
    /// Creates a public, non-static field with no markers.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            markers: Vec::new(),
        }
    }

    /// Sets the visibility.
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Marks the field as static.
    #[must_use]
    pub fn statik(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Attaches a marker.
    #[must_use]
    pub fn marker(mut self, marker: MarkerUse) -> Self {
        self.markers.push(marker);
        self
    }
}

/// A method declaration on one described type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MethodDecl {
    /// Raw method name (e.g., `getFile`, `isEnabled`).
    pub name: String,
    /// Declared visibility.
    #[serde(default)]
    pub visibility: Visibility,
    /// Static methods are never property candidates.
    #[serde(default)]
    pub is_static: bool,
    /// Number of declared parameters.
    #[serde(default)]
    pub param_count: usize,
    /// Return kind, for accessor recognition.
    pub returns: ReturnKind,
    /// Whether this declaration claims to override an ancestor member.
    #[serde(default)]
    pub declared_override: bool,
    /// Raw, unfiltered markers attached to the method.
    #[serde(default)]
    pub markers: Vec<MarkerUse>,
}

impl MethodDecl {
    /// Creates a public, zero-argument method.
    #[must_use]
    pub fn new(name: impl Into<String>, returns: ReturnKind) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            param_count: 0,
            returns,
            declared_override: false,
            markers: Vec::new(),
        }
    }

    /// Creates a public `get`-style accessor.
    #[must_use]
    pub fn getter(name: impl Into<String>) -> Self {
        Self::new(name, ReturnKind::Other)
    }

    /// Sets the visibility.
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Marks the method as static.
    #[must_use]
    pub fn statik(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Sets the parameter count.
    #[must_use]
    pub fn params(mut self, count: usize) -> Self {
        self.param_count = count;
        self
    }

    /// Marks the method as overriding an ancestor member.
    #[must_use]
    pub fn overriding(mut self) -> Self {
        self.declared_override = true;
        self
    }

    /// Attaches a marker.
    #[must_use]
    pub fn marker(mut self, marker: MarkerUse) -> Self {
        self.markers.push(marker);
        self
    }
}

/// One type in the contributing hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeDecl {
    /// Type name, unique within one description.
    pub name: String,
    /// Class or interface.
    pub kind: TypeKind,
    /// Direct superclass, if any.
    #[serde(default)]
    pub superclass: Option<String>,
    /// Directly implemented (classes) or extended (interfaces) interfaces.
    #[serde(default)]
    pub interfaces: Vec<String>,
    /// Declared fields.
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    /// Declared methods.
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl TypeDecl {
    /// Creates a class declaration with no members.
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::empty(name, TypeKind::Class)
    }

    /// Creates an interface declaration with no members.
    #[must_use]
    pub fn interface(name: impl Into<String>) -> Self {
        Self::empty(name, TypeKind::Interface)
    }

    fn empty(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Sets the direct superclass.
    #[must_use]
    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Adds an implemented or extended interface.
    #[must_use]
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Adds a field declaration.
    #[must_use]
    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a method declaration.
    #[must_use]
    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }
}

/// The per-call input: one target type plus every type its hierarchy
/// reaches, fully materialized by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeDescription {
    /// Name of the type whose properties are being extracted.
    pub target: String,
    /// All contributing type declarations, target included.
    pub types: Vec<TypeDecl>,
}

impl TypeDescription {
    /// Creates a description with an empty type list.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            types: Vec::new(),
        }
    }

    /// Adds a type declaration.
    #[must_use]
    pub fn ty(mut self, decl: TypeDecl) -> Self {
        self.types.push(decl);
        self
    }

    /// Looks up a type declaration by name.
    #[must_use]
    pub fn decl(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarkerName;

    #[test]
    fn builders_compose() {
        let desc = TypeDescription::new("Task")
            .ty(TypeDecl::class("Task")
                .extends("BaseTask")
                .implements("Describable")
                .field(FieldDecl::new("file").visibility(Visibility::Private))
                .method(
                    MethodDecl::getter("getFile")
                        .overriding()
                        .marker(MarkerUse::new(MarkerName::new("Input").unwrap())),
                ))
            .ty(TypeDecl::interface("Describable"));

        let task = desc.decl("Task").unwrap();
        assert_eq!(task.superclass.as_deref(), Some("BaseTask"));
        assert_eq!(task.fields[0].visibility, Visibility::Private);
        assert!(task.methods[0].declared_override);
        assert!(desc.decl("Missing").is_none());
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"
        {
          "target": "Task",
          "types": [
            {
              "name": "Task",
              "kind": "class",
              "superclass": "BaseTask",
              "fields": [
                { "name": "file", "visibility": "private",
                  "markers": [ { "name": "Input", "value": "hint" } ] }
              ],
              "methods": [
                { "name": "getFile", "returns": "other", "declared_override": true }
              ]
            }
          ]
        }"#;
        let desc: TypeDescription = serde_json::from_str(json).unwrap();
        let task = desc.decl("Task").unwrap();
        assert_eq!(task.kind, TypeKind::Class);
        assert_eq!(task.fields[0].markers[0].value.as_deref(), Some("hint"));
        assert_eq!(task.methods[0].returns, ReturnKind::Other);
        assert_eq!(task.methods[0].param_count, 0);
    }

    #[test]
    fn rejects_invalid_marker_name_in_json() {
        let json = r#"
        {
          "target": "Task",
          "types": [
            {
              "name": "Task",
              "kind": "class",
              "fields": [ { "name": "file", "markers": [ { "name": "no good" } ] } ]
            }
          ]
        }"#;
        assert!(serde_json::from_str::<TypeDescription>(json).is_err());
    }
}
