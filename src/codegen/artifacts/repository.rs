use crate::codegen::model::JavaType;
use crate::entity::EntityDescriptor;
use crate::java::ClassInfo;

use super::{artifact_name, REPOSITORY_SUFFIX};

/// Shared repository interface every generated repository extends
pub fn base_repository(package: &str, name: &str) -> JavaType {
    let mut ty = JavaType::interface(package, name);
    ty.import("org.springframework.data.jpa.repository.JpaRepository")
        .import("org.springframework.data.jpa.repository.JpaSpecificationExecutor")
        .import("org.springframework.data.repository.NoRepositoryBean")
        .annotate("@NoRepositoryBean");
    ty.type_params.push("E".to_string());
    ty.extends.push("JpaRepository<E, Long>".to_string());
    ty.extends.push("JpaSpecificationExecutor<E>".to_string());
    ty
}

/// `<Entity>Repository extends BaseRepository<EntityClass>`
pub fn repository(package: &str, entity: &EntityDescriptor, base: &ClassInfo) -> JavaType {
    let mut ty = JavaType::interface(package, &artifact_name(&entity.name, REPOSITORY_SUFFIX));
    ty.import(base.qualified_name()).import(entity.qualified_name());
    ty.extends.push(format!("{}<{}>", base.name, entity.class_name));
    ty
}
