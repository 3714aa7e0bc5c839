//! Structural model of parsed Java source files.
//!
//! These types describe existing classes found in the project tree: the
//! triggering entity, shared base types, and artifacts written by earlier
//! stages.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::codegen::utils::unquote;

/// Kind of a top-level Java type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
}

/// An annotation as written in source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Name as written (`Table` or `javax.persistence.Table`)
    pub name: String,
    /// Raw text between the parentheses, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
    /// Attribute map; a lone positional argument is stored under `value`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
}

impl Annotation {
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    /// Raw attribute text (`"customer"`, `{"/a", "/b"}`, `EnumType.ORDINAL`)
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Attribute as a plain string: quotes stripped, first element of an array
    pub fn string_value(&self, key: &str) -> Option<String> {
        let raw = self.attribute(key)?.trim();
        let first = raw
            .strip_prefix('{')
            .and_then(|inner| inner.strip_suffix('}'))
            .map(|inner| inner.split(',').next().unwrap_or_default())
            .unwrap_or(raw);
        Some(unquote(first))
    }

    /// Source text of the annotation (`@Column(name = "x")`)
    pub fn source(&self) -> String {
        match &self.arguments {
            Some(args) => format!("@{}({})", self.name, args.trim()),
            None => format!("@{}", self.name),
        }
    }
}

/// A field declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    /// Declared type text (`Long`, `List<String>`, `int[]`)
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub is_static: bool,
}

impl FieldInfo {
    pub fn has_annotation(&self, simple: &str) -> bool {
        self.annotations.iter().any(|a| a.simple_name() == simple)
    }
}

/// A parsed Java type, top-level or nested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    /// Declared package, empty for the default package
    #[serde(default)]
    pub package: String,
    /// Enclosing type names of a nested type (`Outer` or `Outer.Inner`)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub enclosing: String,
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldInfo>,
    /// Names of declared methods, constructors excluded
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_constants: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<ClassInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    pub path: PathBuf,
}

impl ClassInfo {
    /// Fully qualified name (`com.example.dto.CustomerDTO`, `com.example.Order.Kind`)
    pub fn qualified_name(&self) -> String {
        qualify(&self.package, &self.nested_name())
    }

    /// Name as written outside the declaring top-level type (`Order.Kind`)
    pub fn nested_name(&self) -> String {
        qualify(&self.enclosing, &self.name)
    }

    pub fn is_nested(&self) -> bool {
        !self.enclosing.is_empty()
    }

    /// Qualified name of the top-level type whose file declares this one
    pub fn top_level_name(&self) -> String {
        match self.enclosing.split('.').next().filter(|outer| !outer.is_empty()) {
            Some(outer) => qualify(&self.package, outer),
            None => self.qualified_name(),
        }
    }

    /// Every nested type declaration, outer before inner
    pub fn nested_types(&self) -> Vec<&ClassInfo> {
        let mut all = Vec::new();
        for nested in &self.nested {
            all.push(nested);
            all.extend(nested.nested_types());
        }
        all
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    /// Direct supertypes as written, extends first
    pub fn supertypes(&self) -> impl Iterator<Item = &str> {
        self.extends.iter().chain(self.implements.iter()).map(String::as_str)
    }

    /// Non-static fields in declaration order
    pub fn instance_fields(&self) -> impl Iterator<Item = &FieldInfo> {
        self.fields.iter().filter(|f| !f.is_static)
    }

    pub fn declares_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m == name)
    }

    /// First type-level annotation with the given simple name
    pub fn annotation(&self, simple: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.simple_name() == simple)
    }

    /// Qualified name a written type name refers to through an explicit import
    pub fn explicit_import(&self, written: &str) -> Option<&str> {
        let simple = raw_type_name(written);
        self.imports
            .iter()
            .map(String::as_str)
            .find(|import| !import.ends_with(".*") && simple_name(import) == simple)
    }

    /// Packages imported with a wildcard (`javax.persistence.*` -> `javax.persistence`)
    pub fn wildcard_packages(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().filter_map(|i| i.strip_suffix(".*"))
    }

    /// Check whether a name written in this file refers to `qualified`
    pub fn resolves_to(&self, written: &str, qualified: &str) -> bool {
        if written.contains('.') {
            return written == qualified;
        }
        if simple_name(qualified) != written {
            return false;
        }
        let package = package_of(qualified);
        self.explicit_import(written) == Some(qualified)
            || (self.explicit_import(written).is_none()
                && (self.wildcard_packages().any(|p| p == package) || self.package == package))
    }

    /// Check whether any type-level annotation resolves to one of `qualified`
    pub fn has_annotation_resolving_to(&self, qualified: &[String]) -> bool {
        self.annotations
            .iter()
            .any(|a| qualified.iter().any(|q| self.resolves_to(&a.name, q)))
    }

    /// First type-level annotation resolving to one of `qualified`
    pub fn annotation_resolving_to(&self, qualified: &[String]) -> Option<&Annotation> {
        self.annotations
            .iter()
            .find(|a| qualified.iter().any(|q| self.resolves_to(&a.name, q)))
    }
}

/// Join a package and a simple name
pub fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}

/// Last segment of a dotted name
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// Everything before the last dot, empty when there is none
pub fn package_of(qualified: &str) -> &str {
    qualified.rsplit_once('.').map(|(pkg, _)| pkg).unwrap_or("")
}

/// Strip type arguments and array dimensions (`List<Foo>[]` -> `List`)
pub fn raw_type_name(ty: &str) -> &str {
    let end = ty.find(|c| c == '<' || c == '[').unwrap_or(ty.len());
    ty[..end].trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_with_imports(package: &str, imports: &[&str]) -> ClassInfo {
        ClassInfo {
            name: "CustomerEntity".to_string(),
            package: package.to_string(),
            enclosing: String::new(),
            kind: TypeKind::Class,
            type_params: vec![],
            annotations: vec![],
            extends: vec![],
            implements: vec![],
            fields: vec![],
            methods: vec![],
            enum_constants: vec![],
            nested: vec![],
            imports: imports.iter().map(|s| s.to_string()).collect(),
            path: PathBuf::from("CustomerEntity.java"),
        }
    }

    #[test]
    fn test_raw_type_name() {
        assert_eq!(raw_type_name("List<CustomerDTO>"), "List");
        assert_eq!(raw_type_name("int[]"), "int");
        assert_eq!(raw_type_name("com.example.Foo<T>"), "com.example.Foo");
        assert_eq!(raw_type_name("Long"), "Long");
    }

    #[test]
    fn test_resolves_to_explicit_and_wildcard_imports() {
        let explicit = class_with_imports("com.example", &["javax.persistence.Entity"]);
        assert!(explicit.resolves_to("Entity", "javax.persistence.Entity"));
        assert!(!explicit.resolves_to("Entity", "jakarta.persistence.Entity"));

        let wildcard = class_with_imports("com.example", &["jakarta.persistence.*"]);
        assert!(wildcard.resolves_to("Entity", "jakarta.persistence.Entity"));

        let none = class_with_imports("com.example", &[]);
        assert!(!none.resolves_to("Entity", "javax.persistence.Entity"));
        assert!(none.resolves_to("javax.persistence.Entity", "javax.persistence.Entity"));
    }

    #[test]
    fn test_explicit_import_shadows_wildcard() {
        let class = class_with_imports(
            "com.example",
            &["javax.persistence.*", "com.example.custom.Table"],
        );
        assert!(!class.resolves_to("Table", "javax.persistence.Table"));
        assert!(class.resolves_to("Table", "com.example.custom.Table"));
    }

    #[test]
    fn test_nested_type_names() {
        let mut inner = class_with_imports("com.example", &[]);
        inner.name = "Kind".to_string();
        inner.enclosing = "OrderEntity.Line".to_string();

        assert!(inner.is_nested());
        assert_eq!(inner.nested_name(), "OrderEntity.Line.Kind");
        assert_eq!(inner.qualified_name(), "com.example.OrderEntity.Line.Kind");
        assert_eq!(inner.top_level_name(), "com.example.OrderEntity");

        let outer = class_with_imports("com.example", &[]);
        assert!(!outer.is_nested());
        assert_eq!(outer.top_level_name(), "com.example.CustomerEntity");
    }

    #[test]
    fn test_annotation_string_value() {
        let mut attributes = IndexMap::new();
        attributes.insert("value".to_string(), "{\"/api/orders\", \"/orders\"}".to_string());
        attributes.insert("name".to_string(), "\"customer\"".to_string());
        let annotation = Annotation {
            name: "RequestMapping".to_string(),
            arguments: Some("...".to_string()),
            attributes,
        };
        assert_eq!(annotation.string_value("value").as_deref(), Some("/api/orders"));
        assert_eq!(annotation.string_value("name").as_deref(), Some("customer"));
        assert_eq!(annotation.string_value("path"), None);
    }
}
