//! Shared state threaded through the generation stages.

use std::path::{Path, PathBuf};

use crate::entity::EntityDescriptor;
use crate::error::{GenerateError, Result};
use crate::java::ClassInfo;

/// Accumulates the artifacts produced so far in one run.
///
/// Artifact slots are filled by the stage that produces them. Reading a slot
/// before its stage has run is a `MissingArtifact` error.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub entity: EntityDescriptor,
    service_dir: PathBuf,
    repository: Option<ClassInfo>,
    dto: Option<ClassInfo>,
    mapper: Option<ClassInfo>,
    query: Option<ClassInfo>,
    dao: Option<ClassInfo>,
    mapping_file: Option<PathBuf>,
    service: Option<ClassInfo>,
    service_impl: Option<ClassInfo>,
    controller: Option<ClassInfo>,
}

fn require<'a, T>(slot: &'a Option<T>, artifact: &'static str) -> Result<&'a T> {
    slot.as_ref().ok_or(GenerateError::MissingArtifact { artifact })
}

impl GenerationContext {
    pub fn new(entity: EntityDescriptor, service_dir: PathBuf) -> Self {
        GenerationContext {
            entity,
            service_dir,
            repository: None,
            dto: None,
            mapper: None,
            query: None,
            dao: None,
            mapping_file: None,
            service: None,
            service_impl: None,
            controller: None,
        }
    }

    /// Directory holding the service interface; dto, mapper and query
    /// directories are created below it when absent
    pub fn service_dir(&self) -> &Path {
        &self.service_dir
    }

    pub fn repository(&self) -> Result<&ClassInfo> {
        require(&self.repository, "repository")
    }

    pub fn dto(&self) -> Result<&ClassInfo> {
        require(&self.dto, "dto")
    }

    pub fn mapper(&self) -> Result<&ClassInfo> {
        require(&self.mapper, "mapper")
    }

    pub fn query(&self) -> Result<&ClassInfo> {
        require(&self.query, "query")
    }

    pub fn dao(&self) -> Result<&ClassInfo> {
        require(&self.dao, "dao")
    }

    pub fn mapping_file(&self) -> Result<&PathBuf> {
        require(&self.mapping_file, "mapping file")
    }

    pub fn service(&self) -> Result<&ClassInfo> {
        require(&self.service, "service")
    }

    pub fn service_impl(&self) -> Result<&ClassInfo> {
        require(&self.service_impl, "service implementation")
    }

    pub fn controller(&self) -> Result<&ClassInfo> {
        require(&self.controller, "controller")
    }

    pub fn with_repository(mut self, class: ClassInfo) -> Self {
        self.repository = Some(class);
        self
    }

    pub fn with_dto(mut self, class: ClassInfo) -> Self {
        self.dto = Some(class);
        self
    }

    pub fn with_mapper(mut self, class: ClassInfo) -> Self {
        self.mapper = Some(class);
        self
    }

    pub fn with_query(mut self, class: ClassInfo) -> Self {
        self.query = Some(class);
        self
    }

    pub fn with_dao(mut self, class: ClassInfo) -> Self {
        self.dao = Some(class);
        self
    }

    pub fn with_mapping_file(mut self, path: PathBuf) -> Self {
        self.mapping_file = Some(path);
        self
    }

    pub fn with_service(mut self, class: ClassInfo) -> Self {
        self.service = Some(class);
        self
    }

    pub fn with_service_impl(mut self, class: ClassInfo) -> Self {
        self.service_impl = Some(class);
        self
    }

    pub fn with_controller(mut self, class: ClassInfo) -> Self {
        self.controller = Some(class);
        self
    }
}
