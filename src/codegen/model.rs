//! Structural model of a generated Java type.
//!
//! Synthesizers build a `JavaType` describing an artifact's shape; the
//! renderer turns it into source text. Tests assert on the model.

use std::collections::BTreeSet;

use crate::codegen::utils::capitalize;

/// Declaration kind of a generated type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JavaKind {
    Class,
    Interface,
}

/// A generated top-level type
#[derive(Debug, Clone, PartialEq)]
pub struct JavaType {
    pub package: String,
    /// Qualified names to import; filtered and sorted at render time
    pub imports: BTreeSet<String>,
    /// Annotation source lines (`@Service`)
    pub annotations: Vec<String>,
    pub kind: JavaKind,
    pub name: String,
    pub type_params: Vec<String>,
    pub extends: Vec<String>,
    pub implements: Vec<String>,
    pub fields: Vec<JavaField>,
    pub methods: Vec<JavaMethod>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JavaField {
    pub annotations: Vec<String>,
    pub ty: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub annotations: Vec<String>,
    pub ty: String,
    pub name: String,
}

impl Param {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Param {
            annotations: Vec::new(),
            ty: ty.into(),
            name: name.into(),
        }
    }

    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }
}

/// A method; `body` is `None` for interface declarations
#[derive(Debug, Clone, PartialEq)]
pub struct JavaMethod {
    pub annotations: Vec<String>,
    pub return_type: String,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Option<Vec<String>>,
}

impl JavaMethod {
    /// Abstract interface method
    pub fn declaration(return_type: impl Into<String>, name: impl Into<String>, params: Vec<Param>) -> Self {
        JavaMethod {
            annotations: Vec::new(),
            return_type: return_type.into(),
            name: name.into(),
            params,
            body: None,
        }
    }

    /// Public method with a body, one statement per line
    pub fn implementation(
        return_type: impl Into<String>,
        name: impl Into<String>,
        params: Vec<Param>,
        body: Vec<String>,
    ) -> Self {
        JavaMethod {
            body: Some(body),
            ..Self::declaration(return_type, name, params)
        }
    }

    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// Signature as it appears in source (`List<CustomerDTO> query(CustomerQuery query)`)
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| {
                let mut parts = p.annotations.clone();
                parts.push(format!("{} {}", p.ty, p.name));
                parts.join(" ")
            })
            .collect();
        format!("{} {}({})", self.return_type, self.name, params.join(", "))
    }
}

impl JavaType {
    fn new(kind: JavaKind, package: &str, name: &str) -> Self {
        JavaType {
            package: package.to_string(),
            imports: BTreeSet::new(),
            annotations: Vec::new(),
            kind,
            name: name.to_string(),
            type_params: Vec::new(),
            extends: Vec::new(),
            implements: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn class(package: &str, name: &str) -> Self {
        Self::new(JavaKind::Class, package, name)
    }

    pub fn interface(package: &str, name: &str) -> Self {
        Self::new(JavaKind::Interface, package, name)
    }

    pub fn import(&mut self, qualified: impl Into<String>) -> &mut Self {
        self.imports.insert(qualified.into());
        self
    }

    pub fn annotate(&mut self, annotation: impl Into<String>) -> &mut Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn field(&mut self, field: JavaField) -> &mut Self {
        self.fields.push(field);
        self
    }

    pub fn method(&mut self, method: JavaMethod) -> &mut Self {
        self.methods.push(method);
        self
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|m| m.name.as_str())
    }

    pub fn find_method(&self, name: &str) -> Option<&JavaMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Append a getter and a setter for every field
    pub fn add_accessors(&mut self) {
        let accessors: Vec<JavaMethod> = self
            .fields
            .iter()
            .flat_map(|field| {
                let property = capitalize(&field.name);
                let getter_prefix = if field.ty == "boolean" { "is" } else { "get" };
                [
                    JavaMethod::implementation(
                        field.ty.clone(),
                        format!("{}{}", getter_prefix, property),
                        Vec::new(),
                        vec![format!("return {};", field.name)],
                    ),
                    JavaMethod::implementation(
                        "void",
                        format!("set{}", property),
                        vec![Param::new(field.ty.clone(), field.name.clone())],
                        vec![format!("this.{0} = {0};", field.name)],
                    ),
                ]
            })
            .collect();
        self.methods.extend(accessors);
    }
}

impl JavaField {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        JavaField {
            annotations: Vec::new(),
            ty: ty.into(),
            name: name.into(),
        }
    }

    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }
}
