//! Entity descriptor: the structural snapshot of the class that triggers
//! generation.

use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::codegen::utils::strip_suffix_once;
use crate::config::GeneratorConfig;
use crate::java::{qualify, Annotation, ClassInfo, FieldInfo};
use crate::project::Project;

/// Simple names of the annotations declared in the persistence packages that
/// a wildcard import may bring into scope
const PERSISTENCE_ANNOTATIONS: &[&str] = &[
    "Access", "AssociationOverride", "AssociationOverrides", "AttributeOverride",
    "AttributeOverrides", "Basic", "Cacheable", "CollectionTable", "Column",
    "Convert", "Converts", "DiscriminatorColumn", "DiscriminatorValue",
    "ElementCollection", "Embeddable", "Embedded", "EmbeddedId", "Entity",
    "EntityListeners", "Enumerated", "GeneratedValue", "Id", "IdClass", "Index",
    "Inheritance", "JoinColumn", "JoinColumns", "JoinTable", "Lob", "ManyToMany",
    "ManyToOne", "MapKey", "MapKeyColumn", "MappedSuperclass", "MapsId",
    "NamedQuery", "NamedQueries", "OneToMany", "OneToOne", "OrderBy", "OrderColumn",
    "PrimaryKeyJoinColumn", "SequenceGenerator", "Table", "TableGenerator",
    "Temporal", "Transient", "UniqueConstraint", "Version",
];

/// Everything generation needs to know about the triggering entity
#[derive(Debug, Clone, Serialize)]
pub struct EntityDescriptor {
    /// Entity class name (`CustomerEntity`)
    pub class_name: String,
    /// Name used for generated artifacts (`Customer`)
    pub name: String,
    pub package: String,
    pub path: PathBuf,
    pub table_name: String,
    pub supertypes: Vec<String>,
    /// Fields declared on the entity itself, static fields excluded
    pub fields: Vec<FieldInfo>,
    /// Fields declared on project supertypes, farthest ancestor first
    pub inherited_fields: Vec<FieldInfo>,
    /// Imports of the entity followed by those of its project supertypes
    pub imports: Vec<String>,
    pub uses_lombok: bool,
    /// Marker comes from `jakarta.persistence` rather than `javax.persistence`
    pub jakarta: bool,
    #[serde(skip)]
    pub class: ClassInfo,
}

impl EntityDescriptor {
    /// Check whether a class carries a persistence entity marker
    pub fn is_entity(class: &ClassInfo, config: &GeneratorConfig) -> bool {
        class.has_annotation_resolving_to(&config.entity_annotations)
    }

    /// Capture the descriptor of an entity class.
    ///
    /// Returns `None` for classes without the entity marker. Supertype fields
    /// are only collected when a project is available to resolve them.
    pub fn capture(
        class: &ClassInfo,
        project: Option<&Project>,
        config: &GeneratorConfig,
    ) -> Option<Self> {
        if !Self::is_entity(class, config) {
            return None;
        }

        let table_name = class
            .annotation_resolving_to(&config.table_annotations)
            .and_then(|a| a.string_value("name"))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| config.table_placeholder.clone());

        let mut inherited_fields = Vec::new();
        let mut imports = class.imports.clone();
        if let Some(project) = project {
            for ancestor in ancestors(class, project).iter().rev() {
                inherited_fields.extend(ancestor.instance_fields().cloned());
                for import in &ancestor.imports {
                    if !imports.contains(import) {
                        imports.push(import.clone());
                    }
                }
            }
        }

        let uses_lombok = class.has_annotation_resolving_to(&["lombok.Data".to_string()])
            || (class.has_annotation_resolving_to(&["lombok.Getter".to_string()])
                && class.has_annotation_resolving_to(&["lombok.Setter".to_string()]));

        Some(EntityDescriptor {
            class_name: class.name.clone(),
            name: strip_suffix_once(&class.name, &config.entity_suffix).to_string(),
            package: class.package.clone(),
            path: class.path.clone(),
            table_name,
            supertypes: class.supertypes().map(str::to_string).collect(),
            fields: class.instance_fields().cloned().collect(),
            inherited_fields,
            imports,
            uses_lombok,
            jakarta: class.has_annotation_resolving_to(&["jakarta.persistence.Entity".to_string()]),
            class: class.clone(),
        })
    }

    /// Qualified name of the entity class
    pub fn qualified_name(&self) -> String {
        qualify(&self.package, &self.class_name)
    }

    /// Namespace of the platform annotations generated code uses (`javax` or `jakarta`)
    pub fn platform_namespace(&self) -> &'static str {
        if self.jakarta {
            "jakarta"
        } else {
            "javax"
        }
    }

    /// Inherited fields followed by declared fields
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldInfo> {
        self.inherited_fields.iter().chain(self.fields.iter())
    }

    /// Qualified name an annotation on the entity or its supertypes refers to.
    ///
    /// Wildcard imports only resolve names known to live in a persistence
    /// package; unresolved names return `None`.
    pub fn annotation_qualified_name(&self, annotation: &Annotation, config: &GeneratorConfig) -> Option<String> {
        let written = annotation.name.as_str();
        if written.contains('.') {
            return Some(written.to_string());
        }
        if let Some(import) = self
            .imports
            .iter()
            .find(|i| !i.ends_with(".*") && crate::java::simple_name(i) == written)
        {
            return Some(import.clone());
        }
        if PERSISTENCE_ANNOTATIONS.contains(&written) {
            return self
                .imports
                .iter()
                .filter_map(|i| i.strip_suffix(".*"))
                .find(|pkg| config.persistence_packages.iter().any(|p| p == pkg))
                .map(|pkg| qualify(pkg, written));
        }
        None
    }

    /// Check whether an annotation belongs to a persistence package
    pub fn is_persistence_annotation(&self, annotation: &Annotation, config: &GeneratorConfig) -> bool {
        self.annotation_qualified_name(annotation, config)
            .map_or(false, |q| config.is_persistence_annotation(&q))
    }
}

/// Project supertypes along the `extends` chain, nearest first
fn ancestors<'p>(class: &ClassInfo, project: &'p Project) -> Vec<&'p ClassInfo> {
    let mut chain: Vec<&ClassInfo> = Vec::new();
    let mut visited = HashSet::new();
    visited.insert(class.qualified_name());

    let mut current = class.extends.first().and_then(|parent| project.resolve_type(class, parent));
    while let Some(parent) = current {
        if !visited.insert(parent.qualified_name()) {
            break;
        }
        chain.push(parent);
        current = parent.extends.first().and_then(|next| project.resolve_type(parent, next));
    }
    chain
}
