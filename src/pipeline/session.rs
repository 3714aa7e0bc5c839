//! Run-scoped services shared by all stages: the project, the directory
//! index, the resolved conventions and the run journal.

use std::fs;
use std::path::{Path, PathBuf};

use crate::codegen::{fs_utils, render_mapping, render_to_string, JavaType, MappingDocument};
use crate::config::GeneratorConfig;
use crate::conventions::Conventions;
use crate::entity::EntityDescriptor;
use crate::error::{GenerateError, Result};
use crate::java::{parse_java, parse_java_file, ClassInfo};
use crate::pipeline::report::{ArtifactKind, ArtifactStatus, GenerationReport};
use crate::project::{DirectoryIndex, Project};

pub struct Session<'a> {
    config: &'a GeneratorConfig,
    project: Project,
    dirs: DirectoryIndex,
    conventions: Conventions,
    /// Directory holding the entity source file
    container: PathBuf,
    report: GenerationReport,
}

impl<'a> Session<'a> {
    /// Index directories and detect conventions for one run
    pub fn open(entity: &EntityDescriptor, project: Project, config: &'a GeneratorConfig) -> Result<Self> {
        let container = entity
            .path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| GenerateError::ProjectLayout(format!("{} has no parent directory", entity.path.display())))?;

        let dirs = DirectoryIndex::build(&container, &config.source_root_marker, project.root());
        let conventions = Conventions::detect(&project, config);

        Ok(Session {
            config,
            project,
            dirs,
            conventions,
            container,
            report: GenerationReport::new(entity.class_name.clone()),
        })
    }

    pub fn config(&self) -> &'a GeneratorConfig {
        self.config
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    pub fn container(&self) -> &Path {
        &self.container
    }

    pub fn report(&self) -> &GenerationReport {
        &self.report
    }

    pub fn into_report(self) -> GenerationReport {
        self.report
    }

    pub fn package_of(&self, dir: &Path) -> String {
        self.project.package_of(dir)
    }

    /// Indexed directory with the given name inside the Java source root
    pub fn find_dir(&self, name: &str) -> Option<PathBuf> {
        self.dirs
            .find(name)
            .filter(|dir| dir.starts_with(self.project.source_root()))
            .map(Path::to_path_buf)
    }

    /// Parent of `dir` when it is still inside the Java source root
    pub fn bounded_parent(&self, dir: &Path) -> Option<PathBuf> {
        dir.parent()
            .filter(|parent| parent.starts_with(self.project.source_root()))
            .map(Path::to_path_buf)
    }

    pub fn get_or_create_subdirectory(&mut self, parent: &Path, name: &str) -> Result<PathBuf> {
        let dir = parent.join(name);
        if !dir.is_dir() {
            fs::create_dir_all(&dir).map_err(|e| GenerateError::io(&dir, e))?;
            tracing::debug!("Created directory {}", dir.display());
            self.report.record_dir(&dir);
        }
        self.dirs.insert(&dir);
        Ok(dir)
    }

    /// Indexed directory `name`, else `fallback_parent/name` (created)
    pub fn locate_dir(&mut self, name: &str, fallback_parent: &Path) -> Result<PathBuf> {
        match self.find_dir(name) {
            Some(dir) => Ok(dir),
            None => self.get_or_create_subdirectory(fallback_parent, name),
        }
    }

    /// Service directory: an existing `service` package, else a new one up to
    /// two levels above the entity's directory
    pub fn resolve_service_dir(&mut self) -> Result<PathBuf> {
        if let Some(dir) = self.find_dir("service") {
            return Ok(dir);
        }
        let container = self.container.clone();
        let base = match self.bounded_parent(&container) {
            None => container,
            Some(parent) => self.bounded_parent(&parent).unwrap_or(parent),
        };
        self.get_or_create_subdirectory(&base, "service")
    }

    /// Controller directory next to the service directory: `controller`,
    /// else `web/rest` or `web`, else any indexed `controller`, else a new
    /// `controller`
    pub fn resolve_controller_dir(&mut self, service_dir: &Path) -> Result<PathBuf> {
        let parent = self
            .bounded_parent(service_dir)
            .unwrap_or_else(|| service_dir.to_path_buf());

        let controller = parent.join("controller");
        if controller.is_dir() {
            return Ok(controller);
        }
        let web = parent.join("web");
        if web.is_dir() {
            let rest = web.join("rest");
            return Ok(if rest.is_dir() { rest } else { web });
        }
        if let Some(dir) = self.find_dir("controller") {
            return Ok(dir);
        }
        self.get_or_create_subdirectory(&parent, "controller")
    }

    /// `mappers` under the resources root; the resources root itself if the
    /// directory cannot be created
    pub fn mappers_dir(&mut self) -> Result<PathBuf> {
        let resources = self.project.resources_root().to_path_buf();
        let mappers = resources.join("mappers");
        if mappers.is_dir() {
            return Ok(mappers);
        }
        match fs::create_dir_all(&mappers) {
            Ok(()) => {
                self.report.record_dir(&mappers);
                Ok(mappers)
            }
            Err(e) => {
                tracing::warn!(
                    "Cannot create {} ({}), writing mapping files to {}",
                    mappers.display(),
                    e,
                    resources.display()
                );
                fs::create_dir_all(&resources).map_err(|e| GenerateError::io(&resources, e))?;
                Ok(resources)
            }
        }
    }

    /// Project class with the given name, if any
    pub fn find_class(&self, name: &str) -> Option<ClassInfo> {
        self.project.find_class(name).cloned()
    }

    /// Write `ty` into `dir` unless a file of that name exists, in which
    /// case the existing class is parsed and passed on untouched
    pub fn create_or_reuse(&mut self, kind: ArtifactKind, dir: &Path, ty: &JavaType) -> Result<ClassInfo> {
        let path = dir.join(format!("{}.java", ty.name));

        if path.exists() {
            let class = parse_java_file(&path)?;
            tracing::info!("Reusing existing {} {}", kind, path.display());
            self.report.record(kind, &class.name, &path, ArtifactStatus::Reused);
            self.project.register(class.clone());
            return Ok(class);
        }

        let source = render_to_string(ty).map_err(|e| GenerateError::io(&path, e))?;
        fs_utils::write_file(&path, &source).map_err(|e| GenerateError::io(&path, e))?;
        let class = parse_java(&source, &path)?;

        tracing::info!("Created {} {}", kind, path.display());
        self.report.record(kind, &class.name, &path, ArtifactStatus::Created);
        self.project.register(class.clone());
        Ok(class)
    }

    /// Reuse a shared base type found anywhere in the project, or create it
    /// in `dir` with `build(package)`
    pub fn find_or_create_shared<F>(&mut self, kind: ArtifactKind, name: &str, dir: &Path, build: F) -> Result<ClassInfo>
    where
        F: FnOnce(&str) -> JavaType,
    {
        if let Some(existing) = self.find_class(name) {
            tracing::debug!("Using existing {} {}", kind, existing.qualified_name());
            self.report.record(kind, &existing.name, &existing.path, ArtifactStatus::Reused);
            return Ok(existing);
        }
        let package = self.package_of(dir);
        self.create_or_reuse(kind, dir, &build(&package))
    }

    /// Write the mapping file at `path` unless one already exists.
    ///
    /// `build` is only invoked when the file is actually written.
    pub fn write_mapping_file<F>(&mut self, path: &Path, build: F) -> Result<bool>
    where
        F: FnOnce(&Project) -> Result<MappingDocument>,
    {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if path.exists() {
            tracing::info!("Mapping file {} exists, leaving it untouched", path.display());
            self.report.record(ArtifactKind::MappingFile, &name, path, ArtifactStatus::Skipped);
            return Ok(false);
        }

        let doc = build(&self.project)?;
        let mut buffer = Vec::new();
        render_mapping(&mut buffer, &doc).map_err(|e| GenerateError::io(path, e))?;
        if !fs_utils::write_new_file(path, &buffer).map_err(|e| GenerateError::io(path, e))? {
            self.report.record(ArtifactKind::MappingFile, &name, path, ArtifactStatus::Skipped);
            return Ok(false);
        }

        tracing::info!("Created {} {}", ArtifactKind::MappingFile, path.display());
        self.report.record(ArtifactKind::MappingFile, &name, path, ArtifactStatus::Created);
        Ok(true)
    }
}
