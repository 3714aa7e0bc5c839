//! # Layercake: layered Spring boilerplate from JPA entities
//!
//! Given a persistence-mapped entity class, layercake generates the rest of
//! the stack around it: repository, DTO, MapStruct mapper, query object,
//! MyBatis DAO with its mapping file, service interface and implementation,
//! and a REST controller.
//!
//! ## Features
//!
//! - **Convention discovery**: shared base types, directory layout and the
//!   routing prefix are read from the existing project tree on every run
//! - **Idempotent by presence**: existing classes are reused, existing
//!   mapping files are never overwritten
//! - **Structural models**: artifacts are built as `JavaType` /
//!   `MappingDocument` values and rendered by pure functions
//!
//! ## Example
//!
//! ```rust,no_run
//! use layercake::{generate, GeneratorConfig, Outcome};
//! use std::path::Path;
//!
//! let config = GeneratorConfig::default();
//! let entity = Path::new("src/main/java/com/shop/domain/entity/CustomerEntity.java");
//! match generate(entity, &config, None).expect("generation failed") {
//!     Outcome::Generated(report) => println!("{} artifacts", report.artifacts.len()),
//!     Outcome::Skipped { reason, .. } => println!("skipped: {}", reason),
//! }
//! ```

pub mod codegen;
pub mod config;
pub mod conventions;
pub mod entity;
pub mod error;
pub mod java;
pub mod pipeline;
pub mod project;

pub use config::GeneratorConfig;
pub use conventions::Conventions;
pub use entity::EntityDescriptor;
pub use error::{GenerateError, Result};
pub use pipeline::{generate, ArtifactKind, ArtifactStatus, GenerationReport, Outcome};
pub use project::{DirectoryIndex, Project};
