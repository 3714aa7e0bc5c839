use crate::codegen::model::{JavaMethod, JavaType, Param};
use crate::entity::EntityDescriptor;
use crate::java::ClassInfo;

use super::{artifact_name, MAPPER_SUFFIX};

/// Shared generic mapper: single and list conversions in both directions
pub fn entity_mapper(package: &str, name: &str) -> JavaType {
    let mut ty = JavaType::interface(package, name);
    ty.import("java.util.List");
    ty.type_params = vec!["D".to_string(), "E".to_string()];
    ty.method(JavaMethod::declaration("E", "toEntity", vec![Param::new("D", "dto")]))
        .method(JavaMethod::declaration("D", "toDto", vec![Param::new("E", "entity")]))
        .method(JavaMethod::declaration("List<E>", "toEntity", vec![Param::new("List<D>", "dtoList")]))
        .method(JavaMethod::declaration("List<D>", "toDto", vec![Param::new("List<E>", "entityList")]));
    ty
}

/// MapStruct mapper between the DTO and the entity
pub fn mapper(package: &str, entity: &EntityDescriptor, dto: &ClassInfo, base: &ClassInfo) -> JavaType {
    let mut ty = JavaType::interface(package, &artifact_name(&entity.name, MAPPER_SUFFIX));
    ty.import("org.mapstruct.Mapper")
        .import(entity.qualified_name())
        .import(dto.qualified_name())
        .import(base.qualified_name())
        .annotate("@Mapper(componentModel = \"spring\")");
    ty.extends.push(format!("{}<{}, {}>", base.name, dto.name, entity.class_name));
    ty
}
