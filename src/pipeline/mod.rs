//! Generation pipeline.
//!
//! A run captures the entity, opens a [`Session`] over its project and then
//! drives the stages in order: repository, dto, mapper, query, dao (with its
//! mapping file), service, service implementation, controller. Each stage
//! takes the shared [`GenerationContext`] and returns it enriched. A failing
//! stage aborts the run; artifacts written by earlier stages stay on disk.

pub mod context;
pub mod report;
pub mod session;
mod stages;

pub use context::GenerationContext;
pub use report::{ArtifactKind, ArtifactRecord, ArtifactStatus, GenerationReport, Outcome};
pub use session::Session;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::entity::EntityDescriptor;
use crate::error::{GenerateError, Result};
use crate::java::parse_java_file;
use crate::project::Project;

/// Signature every stage implements
pub type StageFn = fn(&mut Session, GenerationContext) -> Result<GenerationContext>;

/// A named step of the pipeline
#[derive(Clone, Copy)]
pub struct Stage {
    pub name: &'static str,
    pub run: StageFn,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage").field("name", &self.name).finish()
    }
}

/// Ordered list of stages
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// The full eight-stage chain
    pub fn standard() -> Self {
        Pipeline {
            stages: stages::STAGES.to_vec(),
        }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name).collect()
    }

    /// Run every stage in order, stopping at the first failure
    pub fn run(&self, session: &mut Session, mut ctx: GenerationContext) -> Result<GenerationContext> {
        for stage in &self.stages {
            tracing::info!("▶ Stage {}", stage.name);
            ctx = (stage.run)(session, ctx).map_err(|source| {
                tracing::error!(
                    "Stage '{}' failed after writing {} artifact(s): {}",
                    stage.name,
                    session.report().artifacts.len(),
                    source
                );
                for artifact in &session.report().artifacts {
                    tracing::info!("  left in place: {} {}", artifact.kind, artifact.path.display());
                }
                GenerateError::Stage {
                    stage: stage.name,
                    source: Box::new(source),
                }
            })?;
        }
        Ok(ctx)
    }
}

/// Generate the layered stack for the entity declared in `entity_path`.
///
/// Classes without a persistence entity marker yield `Outcome::Skipped`
/// without touching the project. `project_root` overrides project root
/// discovery.
pub fn generate(entity_path: &Path, config: &GeneratorConfig, project_root: Option<&Path>) -> Result<Outcome> {
    let entity_path = fs::canonicalize(entity_path).map_err(|e| GenerateError::io(entity_path, e))?;
    let project_root = project_root.map(canonical_or_given);

    let class = parse_java_file(&entity_path)?;
    if !EntityDescriptor::is_entity(&class, config) {
        tracing::info!("{} is not a persistence entity, nothing to generate", class.name);
        return Ok(Outcome::Skipped {
            class_name: class.name,
            reason: "missing persistence entity annotation".to_string(),
        });
    }

    let project = Project::discover(&class, project_root.as_deref(), config)?;
    let Some(entity) = EntityDescriptor::capture(&class, Some(&project), config) else {
        return Ok(Outcome::Skipped {
            class_name: class.name,
            reason: "missing persistence entity annotation".to_string(),
        });
    };
    tracing::info!("Generating layers for {} ({} fields)", entity.class_name, entity.all_fields().count());

    let mut session = Session::open(&entity, project, config)?;
    let service_dir = session.resolve_service_dir()?;
    Pipeline::standard().run(&mut session, GenerationContext::new(entity, service_dir))?;

    Ok(Outcome::Generated(session.into_report()))
}

fn canonical_or_given(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
