use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::codegen::model::{JavaField, JavaType};
use crate::config::GeneratorConfig;
use crate::entity::EntityDescriptor;
use crate::java::{qualify, simple_name, ClassInfo, FieldInfo};
use crate::project::ClassIndex;

use super::{artifact_name, DTO_SUFFIX};

static TYPE_IDENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*").expect("valid identifier regex")
});

#[derive(Debug, Clone, Default)]
pub struct DtoOptions<'a> {
    /// Qualified name of the DTO base type to extend, when the entity extends
    /// the base entity and the project declares one
    pub base_dto: Option<&'a str>,
}

/// Transfer object mirroring the entity's fields.
///
/// Persistence annotations are dropped, all others are kept as written.
/// Inherited entity fields are copied unless the DTO extends the base DTO,
/// which is expected to carry them.
pub fn dto(
    package: &str,
    entity: &EntityDescriptor,
    options: &DtoOptions,
    classes: &ClassIndex,
    config: &GeneratorConfig,
) -> JavaType {
    let mut ty = JavaType::class(package, &artifact_name(&entity.name, DTO_SUFFIX));

    if let Some(base) = options.base_dto {
        ty.import(base);
        ty.extends.push(simple_name(base).to_string());
    }

    let fields: Vec<&FieldInfo> = if options.base_dto.is_some() {
        entity.fields.iter().collect()
    } else {
        entity.all_fields().collect()
    };

    for field in fields {
        // Types nested in the entity are written through their outer type
        let mut outer_imports = Vec::new();
        let field_ty = TYPE_IDENT_RE
            .replace_all(&field.ty, |caps: &Captures| match entity_member_type(&caps[0], entity, classes) {
                Some(nested) => {
                    outer_imports.push(nested.top_level_name());
                    nested.nested_name()
                }
                None => caps[0].to_string(),
            })
            .into_owned();

        let mut copy = JavaField::new(field_ty, field.name.clone());
        for annotation in &field.annotations {
            if entity.is_persistence_annotation(annotation, config) {
                continue;
            }
            copy.annotations.push(annotation.source());
            add_import_for(&mut ty, &annotation.name, entity, classes);
        }
        for import in outer_imports {
            ty.import(import);
        }
        for ident in TYPE_IDENT_RE.find_iter(&field.ty) {
            if entity_member_type(ident.as_str(), entity, classes).is_none() {
                add_import_for(&mut ty, ident.as_str(), entity, classes);
            }
        }
        ty.field(copy);
    }

    for wildcard in entity.imports.iter().filter(|i| i.ends_with(".*")) {
        let package = wildcard.trim_end_matches(".*");
        if !config.persistence_packages.iter().any(|p| p == package) {
            ty.import(wildcard.clone());
        }
    }

    if entity.uses_lombok {
        ty.import("lombok.Data").annotate("@Data");
    } else {
        ty.add_accessors();
    }

    ty
}

/// Type nested in the entity that a simple name written in it refers to
fn entity_member_type<'c>(
    written: &str,
    entity: &'c EntityDescriptor,
    classes: &'c ClassIndex,
) -> Option<&'c ClassInfo> {
    if written.contains('.') {
        return None;
    }
    entity
        .class
        .nested
        .iter()
        .find(|nested| nested.name == written)
        .or_else(|| classes.get(&qualify(&entity.qualified_name(), written)))
}

/// Import the class a name written in the entity refers to, if it can be
/// determined from the entity's imports or the project
fn add_import_for(ty: &mut JavaType, written: &str, entity: &EntityDescriptor, classes: &ClassIndex) {
    if written.contains('.') {
        return;
    }
    if let Some(import) = entity
        .imports
        .iter()
        .find(|i| !i.ends_with(".*") && simple_name(i) == written)
    {
        ty.import(import.clone());
        return;
    }
    let same_package = qualify(&entity.package, written);
    if classes.get(&same_package).is_some() {
        ty.import(same_package);
    } else if let Some(class) = classes.find(written) {
        ty.import(class.qualified_name());
    }
}
