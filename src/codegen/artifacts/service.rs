use crate::codegen::model::{JavaField, JavaMethod, JavaType, Param};
use crate::codegen::utils::uncapitalize;
use crate::error::Result;
use crate::pipeline::GenerationContext;

use super::{artifact_name, SERVICE_IMPL_SUFFIX, SERVICE_SUFFIX};

const READ_ONLY: &str = "@Transactional(readOnly = true)";
const READ_WRITE: &str = "@Transactional";

/// Service interface with the seven standard operations
pub fn service(package: &str, ctx: &GenerationContext) -> Result<JavaType> {
    let dto = ctx.dto()?;
    let query = ctx.query()?;

    let mut ty = JavaType::interface(package, &artifact_name(&ctx.entity.name, SERVICE_SUFFIX));
    ty.import("java.util.List")
        .import("java.util.Optional")
        .import("com.github.pagehelper.PageInfo")
        .import(dto.qualified_name())
        .import(query.qualified_name());

    for (return_type, name, params) in operations(&dto.name, &query.name) {
        ty.method(JavaMethod::declaration(return_type, name, params));
    }
    Ok(ty)
}

/// Signatures shared by the interface and its implementation
fn operations(dto: &str, query: &str) -> Vec<(String, &'static str, Vec<Param>)> {
    vec![
        ("void".to_string(), "save", vec![Param::new(dto, "dto")]),
        ("void".to_string(), "save", vec![Param::new(format!("List<{}>", dto), "dtos")]),
        ("void".to_string(), "delete", vec![Param::new("Long", "id")]),
        (format!("Optional<{}>", dto), "findOne", vec![Param::new("Long", "id")]),
        (format!("List<{}>", dto), "findAll", vec![]),
        (format!("List<{}>", dto), "query", vec![Param::new(query, "query")]),
        (format!("PageInfo<{}>", dto), "pageQuery", vec![Param::new(query, "query")]),
    ]
}

/// Service implementation delegating to the repository, mapper and DAO.
///
/// `save_all` names the repository method used for bulk saves (`saveAll`
/// when the repository exposes it, `save` otherwise).
pub fn service_impl(package: &str, ctx: &GenerationContext, save_all: &str) -> Result<JavaType> {
    let service = ctx.service()?;
    let repository = ctx.repository()?;
    let mapper = ctx.mapper()?;
    let dao = ctx.dao()?;
    let dto = ctx.dto()?;
    let query = ctx.query()?;
    let dao_field = uncapitalize(&dao.name);

    let mut ty = JavaType::class(package, &artifact_name(&ctx.entity.name, SERVICE_IMPL_SUFFIX));
    ty.import(format!("{}.annotation.Resource", ctx.entity.platform_namespace()))
        .import("org.springframework.stereotype.Service")
        .import("org.springframework.transaction.annotation.Transactional")
        .import("java.util.List")
        .import("java.util.Optional")
        .import("com.github.pagehelper.PageHelper")
        .import("com.github.pagehelper.PageInfo")
        .import(service.qualified_name())
        .import(repository.qualified_name())
        .import(mapper.qualified_name())
        .import(dao.qualified_name())
        .import(dto.qualified_name())
        .import(query.qualified_name())
        .annotate("@Service");
    ty.implements.push(service.name.clone());

    ty.field(JavaField::new(mapper.name.clone(), "mapper").annotated("@Resource"))
        .field(JavaField::new(repository.name.clone(), "repository").annotated("@Resource"))
        .field(JavaField::new(dao.name.clone(), dao_field.clone()).annotated("@Resource"));

    let bodies: Vec<(&str, Vec<String>)> = vec![
        (READ_WRITE, vec!["repository.save(mapper.toEntity(dto));".to_string()]),
        (READ_WRITE, vec![format!("repository.{}(mapper.toEntity(dtos));", save_all)]),
        (READ_WRITE, vec!["repository.deleteById(id);".to_string()]),
        (READ_ONLY, vec!["return repository.findById(id).map(entity -> mapper.toDto(entity));".to_string()]),
        (READ_ONLY, vec!["return mapper.toDto(repository.findAll());".to_string()]),
        (READ_ONLY, vec![format!("return {}.query(query);", dao_field)]),
        (
            READ_ONLY,
            vec![
                "if (null != query.getSize() && null != query.getPage()) {".to_string(),
                "PageHelper.startPage(query.getPage(), query.getSize());".to_string(),
                "}".to_string(),
                format!("return new PageInfo<>({}.query(query));", dao_field),
            ],
        ),
    ];

    for ((return_type, name, params), (transaction, body)) in
        operations(&dto.name, &query.name).into_iter().zip(bodies)
    {
        ty.method(
            JavaMethod::implementation(return_type, name, params, body)
                .annotated("@Override")
                .annotated(transaction),
        );
    }
    Ok(ty)
}
