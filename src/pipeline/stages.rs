//! The eight generation stages, in dependency order.

use crate::codegen::artifacts::{self, ControllerOptions, DtoOptions};
use crate::codegen::MappingDocument;
use crate::conventions::{entity_extends_base_entity, infer_route_prefix};
use crate::error::Result;
use crate::pipeline::context::GenerationContext;
use crate::pipeline::report::ArtifactKind;
use crate::pipeline::session::Session;
use crate::pipeline::Stage;

pub const STAGES: &[Stage] = &[
    Stage { name: "repository", run: repository_stage },
    Stage { name: "dto", run: dto_stage },
    Stage { name: "mapper", run: mapper_stage },
    Stage { name: "query", run: query_stage },
    Stage { name: "dao", run: dao_stage },
    Stage { name: "service", run: service_stage },
    Stage { name: "service_impl", run: service_impl_stage },
    Stage { name: "controller", run: controller_stage },
];

/// Repository next to the entity's package, plus the shared base repository
fn repository_stage(session: &mut Session, ctx: GenerationContext) -> Result<GenerationContext> {
    let container = session.container().to_path_buf();
    let parent = session.bounded_parent(&container).unwrap_or(container);
    let dir = session.locate_dir("repository", &parent)?;

    let base_name = session.config().bases.base_repository.as_str();
    let base = session.find_or_create_shared(ArtifactKind::BaseRepository, base_name, &dir, |package| {
        artifacts::base_repository(package, base_name)
    })?;

    let package = session.package_of(&dir);
    let repository = session.create_or_reuse(
        ArtifactKind::Repository,
        &dir,
        &artifacts::repository(&package, &ctx.entity, &base),
    )?;
    Ok(ctx.with_repository(repository))
}

/// DTO under the service directory, extending the base DTO when both the
/// base exists and the entity extends the base entity
fn dto_stage(session: &mut Session, ctx: GenerationContext) -> Result<GenerationContext> {
    let dir = session.locate_dir("dto", ctx.service_dir())?;
    let config = session.config();

    let extends_base = session.conventions().has_base_dto_type()
        && entity_extends_base_entity(&ctx.entity, session.project(), config);
    let base_dto = if extends_base {
        session.conventions().base_dto.clone()
    } else {
        None
    };
    tracing::debug!("DTO base type: {:?}", base_dto);

    let package = session.package_of(&dir);
    let ty = artifacts::dto(
        &package,
        &ctx.entity,
        &DtoOptions { base_dto: base_dto.as_deref() },
        session.project().classes(),
        config,
    );
    let dto = session.create_or_reuse(ArtifactKind::Dto, &dir, &ty)?;
    Ok(ctx.with_dto(dto))
}

/// MapStruct mapper plus the shared `EntityMapper`
fn mapper_stage(session: &mut Session, ctx: GenerationContext) -> Result<GenerationContext> {
    let dir = session.locate_dir("mapper", ctx.service_dir())?;

    let base_name = session.config().bases.entity_mapper.as_str();
    let base = session.find_or_create_shared(ArtifactKind::EntityMapper, base_name, &dir, |package| {
        artifacts::entity_mapper(package, base_name)
    })?;

    let package = session.package_of(&dir);
    let ty = artifacts::mapper(&package, &ctx.entity, ctx.dto()?, &base);
    let mapper = session.create_or_reuse(ArtifactKind::Mapper, &dir, &ty)?;
    Ok(ctx.with_mapper(mapper))
}

fn query_stage(session: &mut Session, ctx: GenerationContext) -> Result<GenerationContext> {
    let dir = session.locate_dir("query", ctx.service_dir())?;
    let package = session.package_of(&dir);
    let query = session.create_or_reuse(ArtifactKind::Query, &dir, &artifacts::query(&package, &ctx.entity))?;
    Ok(ctx.with_query(query))
}

/// DAO interface and its mapping file. The mapping file is only written when
/// absent.
fn dao_stage(session: &mut Session, ctx: GenerationContext) -> Result<GenerationContext> {
    let container = session.container().to_path_buf();
    let dir = match session.find_dir("dao") {
        Some(dir) => dir,
        None => match session.bounded_parent(&container) {
            Some(parent) => session.get_or_create_subdirectory(&parent, "dao")?,
            None => container,
        },
    };

    let package = session.package_of(&dir);
    let dao = session.create_or_reuse(ArtifactKind::Dao, &dir, &artifacts::dao(&package, &ctx)?)?;
    let ctx = ctx.with_dao(dao);

    let config = session.config();
    let mappers = session.mappers_dir()?;
    let path = mappers.join(format!("{}.xml", ctx.dao()?.name));
    session.write_mapping_file(&path, |project| MappingDocument::build(&ctx, project, config))?;

    Ok(ctx.with_mapping_file(path))
}

fn service_stage(session: &mut Session, ctx: GenerationContext) -> Result<GenerationContext> {
    let dir = ctx.service_dir().to_path_buf();
    let package = session.package_of(&dir);
    let service = session.create_or_reuse(ArtifactKind::Service, &dir, &artifacts::service(&package, &ctx)?)?;
    Ok(ctx.with_service(service))
}

/// Service implementation in `service/impl`
fn service_impl_stage(session: &mut Session, ctx: GenerationContext) -> Result<GenerationContext> {
    let dir = session.get_or_create_subdirectory(ctx.service_dir(), "impl")?;

    let save_all = if session
        .project()
        .exposes_method(ctx.repository()?, "saveAll", session.config())
    {
        "saveAll"
    } else {
        "save"
    };
    tracing::debug!("Bulk save delegates to repository.{}", save_all);

    let package = session.package_of(&dir);
    let ty = artifacts::service_impl(&package, &ctx, save_all)?;
    let service_impl = session.create_or_reuse(ArtifactKind::ServiceImpl, &dir, &ty)?;
    Ok(ctx.with_service_impl(service_impl))
}

fn controller_stage(session: &mut Session, ctx: GenerationContext) -> Result<GenerationContext> {
    let dir = session.resolve_controller_dir(ctx.service_dir())?;
    let prefix = infer_route_prefix(&dir, session.config());
    let conventions = session.conventions().clone();

    let options = ControllerOptions {
        prefix: &prefix,
        base: conventions.controller_base.as_ref(),
        api_docs: conventions.api_docs,
    };
    let package = session.package_of(&dir);
    let ty = artifacts::controller(&package, &ctx, &options)?;
    let controller = session.create_or_reuse(ArtifactKind::Controller, &dir, &ty)?;
    Ok(ctx.with_controller(controller))
}
