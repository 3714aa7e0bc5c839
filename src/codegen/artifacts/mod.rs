//! Artifact synthesizers for the layered Spring stack.
//!
//! Each synthesizer builds the `JavaType` for one artifact kind from the
//! entity descriptor and the artifacts produced by earlier stages. They
//! decide shape only; placement and writing happen in the pipeline.

mod controller;
mod dao;
mod dto;
mod mapper;
mod query;
mod repository;
mod service;

pub use controller::{controller, ControllerOptions};
pub use dao::dao;
pub use dto::{dto, DtoOptions};
pub use mapper::{entity_mapper, mapper};
pub use query::query;
pub use repository::{base_repository, repository};
pub use service::{service, service_impl};

pub const REPOSITORY_SUFFIX: &str = "Repository";
pub const DTO_SUFFIX: &str = "DTO";
pub const MAPPER_SUFFIX: &str = "Mapper";
pub const QUERY_SUFFIX: &str = "Query";
pub const DAO_SUFFIX: &str = "Dao";
pub const SERVICE_SUFFIX: &str = "Service";
pub const SERVICE_IMPL_SUFFIX: &str = "ServiceImpl";

/// Generated class name for an entity (`Customer` + `Dao` -> `CustomerDao`)
pub fn artifact_name(entity_name: &str, suffix: &str) -> String {
    format!("{}{}", entity_name, suffix)
}
