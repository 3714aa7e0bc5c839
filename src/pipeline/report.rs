//! Per-run journal of written artifacts.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Kinds of artifacts a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    BaseRepository,
    Repository,
    Dto,
    EntityMapper,
    Mapper,
    Query,
    Dao,
    MappingFile,
    Service,
    ServiceImpl,
    Controller,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::BaseRepository => "base repository",
            ArtifactKind::Repository => "repository",
            ArtifactKind::Dto => "dto",
            ArtifactKind::EntityMapper => "entity mapper",
            ArtifactKind::Mapper => "mapper",
            ArtifactKind::Query => "query",
            ArtifactKind::Dao => "dao",
            ArtifactKind::MappingFile => "mapping file",
            ArtifactKind::Service => "service",
            ArtifactKind::ServiceImpl => "service implementation",
            ArtifactKind::Controller => "controller",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    /// Written by this run
    Created,
    /// Already present; passed on untouched
    Reused,
    /// Already present; deliberately not written
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactRecord {
    pub kind: ArtifactKind,
    pub name: String,
    pub path: PathBuf,
    pub status: ArtifactStatus,
}

/// What one generation run did to the project tree
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    pub entity: String,
    pub artifacts: Vec<ArtifactRecord>,
    pub created_dirs: Vec<PathBuf>,
}

impl GenerationReport {
    pub fn new(entity: impl Into<String>) -> Self {
        GenerationReport {
            entity: entity.into(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, kind: ArtifactKind, name: &str, path: &Path, status: ArtifactStatus) {
        self.artifacts.push(ArtifactRecord {
            kind,
            name: name.to_string(),
            path: path.to_path_buf(),
            status,
        });
    }

    pub fn record_dir(&mut self, path: &Path) {
        self.created_dirs.push(path.to_path_buf());
    }

    /// First record of a kind
    pub fn artifact(&self, kind: ArtifactKind) -> Option<&ArtifactRecord> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }

    pub fn count(&self, status: ArtifactStatus) -> usize {
        self.artifacts.iter().filter(|a| a.status == status).count()
    }
}

/// Result of a generation request
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Generated(GenerationReport),
    /// The class is not a persistence entity; nothing was touched
    Skipped { class_name: String, reason: String },
}
