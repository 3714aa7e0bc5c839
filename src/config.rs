//! Generator conventions.
//!
//! There is no configuration file: every run discovers its state from the
//! project tree. `GeneratorConfig` names what the generator looks for in that
//! tree (marker annotations, shared base types, directory names) and what it
//! knows about the libraries generated code builds on.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Conventions applied during one generation run
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratorConfig {
    /// Name of the directory that marks the top of the source tree
    #[serde(default = "default_source_root_marker")]
    pub source_root_marker: String,

    /// Annotations that mark a class as persistence-mapped
    #[serde(default = "default_entity_annotations")]
    pub entity_annotations: Vec<String>,

    /// Annotations carrying the mapped table name
    #[serde(default = "default_table_annotations")]
    pub table_annotations: Vec<String>,

    /// Packages whose annotations are stripped when copying fields to the DTO
    #[serde(default = "default_persistence_packages")]
    pub persistence_packages: Vec<String>,

    /// Suffix removed from the entity class name to form the entity name
    #[serde(default = "default_entity_suffix")]
    pub entity_suffix: String,

    /// Table name used when the entity has no table annotation
    #[serde(default = "default_table_placeholder")]
    pub table_placeholder: String,

    #[serde(default)]
    pub bases: BaseTypes,

    #[serde(default)]
    pub routes: RouteConventions,

    /// Methods exposed by library repository interfaces, flattened over their
    /// own supertypes
    #[serde(default = "default_library_methods")]
    pub library_methods: IndexMap<String, Vec<String>>,
}

/// Names of the shared base types the generator looks up or creates
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BaseTypes {
    pub base_dto: String,
    pub base_entity: String,
    pub base_repository: String,
    pub entity_mapper: String,
    /// Controller base candidates in priority order
    pub controller_bases: Vec<ControllerBase>,
}

/// A controller base class and the class-name suffix it implies
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ControllerBase {
    pub class: String,
    pub suffix: String,
}

/// Routing and API documentation conventions for controllers
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConventions {
    /// Prefix an existing route must start with to keep the API prefix
    pub api_prefix: String,
    /// Qualified name of the routing annotation on existing controllers
    pub request_mapping: String,
    /// Qualified name of the API documentation annotation
    pub api_doc_annotation: String,
    /// Build-file markers proving the API documentation library is present
    pub api_doc_markers: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            source_root_marker: default_source_root_marker(),
            entity_annotations: default_entity_annotations(),
            table_annotations: default_table_annotations(),
            persistence_packages: default_persistence_packages(),
            entity_suffix: default_entity_suffix(),
            table_placeholder: default_table_placeholder(),
            bases: BaseTypes::default(),
            routes: RouteConventions::default(),
            library_methods: default_library_methods(),
        }
    }
}

impl Default for BaseTypes {
    fn default() -> Self {
        BaseTypes {
            base_dto: "AbstractBaseDTO".to_string(),
            base_entity: "AbstractBaseEntity".to_string(),
            base_repository: "BaseRepository".to_string(),
            entity_mapper: "EntityMapper".to_string(),
            controller_bases: vec![
                ControllerBase {
                    class: "BaseController".to_string(),
                    suffix: "Controller".to_string(),
                },
                ControllerBase {
                    class: "BaseResource".to_string(),
                    suffix: "Resource".to_string(),
                },
            ],
        }
    }
}

impl Default for RouteConventions {
    fn default() -> Self {
        RouteConventions {
            api_prefix: "/api".to_string(),
            request_mapping: "org.springframework.web.bind.annotation.RequestMapping".to_string(),
            api_doc_annotation: "io.swagger.annotations.Api".to_string(),
            api_doc_markers: vec![
                "swagger-annotations".to_string(),
                "springfox-swagger".to_string(),
                "io.swagger".to_string(),
            ],
        }
    }
}

impl GeneratorConfig {
    /// Check whether a qualified annotation name belongs to a persistence package
    pub fn is_persistence_annotation(&self, qualified: &str) -> bool {
        self.persistence_packages
            .iter()
            .any(|pkg| qualified.starts_with(&format!("{}.", pkg)))
    }

    /// Methods a library supertype is known to expose, if it is known at all
    pub fn library_methods(&self, type_name: &str) -> Option<&[String]> {
        self.library_methods.get(type_name).map(Vec::as_slice)
    }
}

fn default_source_root_marker() -> String {
    "src".to_string()
}

fn default_entity_annotations() -> Vec<String> {
    vec![
        "javax.persistence.Entity".to_string(),
        "jakarta.persistence.Entity".to_string(),
    ]
}

fn default_table_annotations() -> Vec<String> {
    vec![
        "javax.persistence.Table".to_string(),
        "jakarta.persistence.Table".to_string(),
    ]
}

fn default_persistence_packages() -> Vec<String> {
    vec![
        "javax.persistence".to_string(),
        "jakarta.persistence".to_string(),
        "org.hibernate.annotations".to_string(),
    ]
}

fn default_entity_suffix() -> String {
    "Entity".to_string()
}

fn default_table_placeholder() -> String {
    "tableName".to_string()
}

fn default_library_methods() -> IndexMap<String, Vec<String>> {
    let crud = [
        "save", "saveAll", "findById", "existsById", "findAll", "findAllById",
        "count", "deleteById", "delete", "deleteAllById", "deleteAll",
    ];
    let jpa_extra = [
        "flush", "saveAndFlush", "saveAllAndFlush", "deleteInBatch",
        "deleteAllInBatch", "getOne", "getById", "getReferenceById",
    ];
    let specification = ["findOne", "findAll", "count", "exists", "delete", "findBy"];

    let to_vec = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    let mut methods = IndexMap::new();
    methods.insert("CrudRepository".to_string(), to_vec(&crud));
    methods.insert(
        "PagingAndSortingRepository".to_string(),
        to_vec(&["findAll"]),
    );
    methods.insert(
        "JpaRepository".to_string(),
        crud.iter().chain(jpa_extra.iter()).map(|s| s.to_string()).collect(),
    );
    methods.insert("JpaSpecificationExecutor".to_string(), to_vec(&specification));
    methods
}
