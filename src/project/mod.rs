//! Filesystem-backed view of a Java project.
//!
//! Provides what generation needs from the surrounding project: where the
//! source and resource roots are, which package a directory maps to, and an
//! index of every class declared in the tree.

pub mod dir_index;

pub use dir_index::DirectoryIndex;

use indexmap::IndexMap;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::config::GeneratorConfig;
use crate::error::{GenerateError, Result};
use crate::java::{package_of, parse_java_file, qualify, raw_type_name, ClassInfo};

/// Files whose presence marks a build root
const BUILD_FILES: &[&str] = &["pom.xml", "build.gradle", "build.gradle.kts", "settings.gradle"];

/// Directories never scanned for sources
const SKIPPED_DIRS: &[&str] = &["target", "build", "out", "node_modules"];

/// Project classes keyed by qualified name, with a simple-name lookup
#[derive(Debug, Clone, Default)]
pub struct ClassIndex {
    by_qualified: IndexMap<String, ClassInfo>,
    by_simple: IndexMap<String, Vec<String>>,
}

impl ClassIndex {
    /// Add or replace a class. Nested types are reachable by qualified name
    /// only (`com.shop.OrderEntity.Kind`).
    pub fn register(&mut self, class: ClassInfo) {
        for nested in class.nested_types() {
            self.by_qualified.insert(nested.qualified_name(), nested.clone());
        }
        let qualified = class.qualified_name();
        let names = self.by_simple.entry(class.name.clone()).or_default();
        if !names.contains(&qualified) {
            names.push(qualified.clone());
        }
        self.by_qualified.insert(qualified, class);
    }

    /// Find a class by qualified name, or by simple name (first registered wins)
    pub fn find(&self, name: &str) -> Option<&ClassInfo> {
        if name.contains('.') {
            return self.by_qualified.get(name);
        }
        self.by_simple
            .get(name)
            .and_then(|names| names.first())
            .and_then(|qualified| self.by_qualified.get(qualified))
    }

    pub fn get(&self, qualified: &str) -> Option<&ClassInfo> {
        self.by_qualified.get(qualified)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassInfo> {
        self.by_qualified.values()
    }

    pub fn len(&self) -> usize {
        self.by_qualified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_qualified.is_empty()
    }
}

/// The project an entity belongs to
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    source_root: PathBuf,
    resources_root: PathBuf,
    classes: ClassIndex,
}

impl Project {
    /// Discover the project around a parsed entity class.
    ///
    /// The Java source root is the entity's directory with one ancestor
    /// stripped per package segment. The project root is `root_override`, or
    /// the nearest ancestor holding a build file, or the parent of the
    /// nearest `src` directory.
    pub fn discover(
        entity: &ClassInfo,
        root_override: Option<&Path>,
        config: &GeneratorConfig,
    ) -> Result<Self> {
        let entity_dir = entity
            .path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                GenerateError::ProjectLayout(format!("{} has no parent directory", entity.path.display()))
            })?;

        let source_root = source_root_for(&entity_dir, &entity.package).ok_or_else(|| {
            GenerateError::ProjectLayout(format!(
                "directory {} does not match package '{}'",
                entity_dir.display(),
                entity.package
            ))
        })?;

        let root = match root_override {
            Some(root) => root.to_path_buf(),
            None => find_build_root(&source_root)
                .or_else(|| parent_of_marker(&source_root, &config.source_root_marker))
                .unwrap_or_else(|| source_root.clone()),
        };

        let resources_root = source_root
            .parent()
            .map(|p| p.join("resources"))
            .unwrap_or_else(|| root.join("resources"));

        let mut project = Project {
            root,
            source_root,
            resources_root,
            classes: ClassIndex::default(),
        };
        project.index_classes();

        tracing::info!(
            "Project root {} ({} classes indexed)",
            project.root.display(),
            project.classes.len()
        );
        tracing::debug!("Java source root {}", project.source_root.display());

        Ok(project)
    }

    fn index_classes(&mut self) {
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e));

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "java") {
                continue;
            }
            match parse_java_file(path) {
                Ok(class) => self.classes.register(class),
                Err(e) => tracing::debug!("Skipping unparsable source: {}", e),
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn resources_root(&self) -> &Path {
        &self.resources_root
    }

    pub fn classes(&self) -> &ClassIndex {
        &self.classes
    }

    /// Record a class written during the run
    pub fn register(&mut self, class: ClassInfo) {
        self.classes.register(class);
    }

    /// Package name a directory maps to
    pub fn package_of(&self, dir: &Path) -> String {
        if let Ok(relative) = dir.strip_prefix(&self.source_root) {
            return path_to_package(relative);
        }
        // Outside the entity's source root: fall back to the nearest `java` ancestor
        dir.ancestors()
            .find(|a| a.file_name().map_or(false, |n| n == "java"))
            .and_then(|java| dir.strip_prefix(java).ok())
            .map(path_to_package)
            .unwrap_or_default()
    }

    /// Find a project class by simple or qualified name
    pub fn find_class(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.find(name)
    }

    /// Resolve a type name as written in `from` to a project class
    pub fn resolve_type(&self, from: &ClassInfo, written: &str) -> Option<&ClassInfo> {
        let raw = raw_type_name(written);
        if let Some((head, rest)) = raw.split_once('.') {
            // Fully qualified, or a nested type reached through its outer type
            return self.classes.get(raw).or_else(|| {
                self.resolve_type(from, head)
                    .and_then(|outer| self.classes.get(&qualify(&outer.qualified_name(), rest)))
            });
        }
        if let Some(member) = self.member_type(from, raw) {
            return Some(member);
        }
        if let Some(import) = from.explicit_import(raw) {
            return self.classes.get(import);
        }
        if let Some(class) = self.classes.get(&qualify(&from.package, raw)) {
            return Some(class);
        }
        from.wildcard_packages()
            .find_map(|pkg| self.classes.get(&qualify(pkg, raw)))
            .or_else(|| self.classes.find(raw))
    }

    /// Nested type `name` declared in `from` or one of its enclosing types
    fn member_type(&self, from: &ClassInfo, name: &str) -> Option<&ClassInfo> {
        let mut scope = from.qualified_name();
        while scope.len() > from.package.len() {
            if let Some(class) = self.classes.get(&qualify(&scope, name)) {
                return Some(class);
            }
            scope = package_of(&scope).to_string();
        }
        None
    }

    /// Check whether `class` exposes `method` through its own declarations,
    /// its project supertypes, or known library supertypes
    pub fn exposes_method(&self, class: &ClassInfo, method: &str, config: &GeneratorConfig) -> bool {
        let mut visited = HashSet::new();
        self.exposes_method_inner(class, method, config, &mut visited)
    }

    fn exposes_method_inner(
        &self,
        class: &ClassInfo,
        method: &str,
        config: &GeneratorConfig,
        visited: &mut HashSet<String>,
    ) -> bool {
        if !visited.insert(class.qualified_name()) {
            return false;
        }
        if class.declares_method(method) {
            return true;
        }
        class.supertypes().any(|written| match self.resolve_type(class, written) {
            Some(parent) => self.exposes_method_inner(parent, method, config, visited),
            None => {
                let simple = crate::java::simple_name(raw_type_name(written));
                config
                    .library_methods(simple)
                    .map_or(false, |methods| methods.iter().any(|m| m == method))
            }
        })
    }

    /// Check whether a library type is available to the project.
    ///
    /// A type counts as present when it is declared in the project, when any
    /// project source imports it or its package, or when a build file
    /// mentions one of `markers`.
    pub fn has_library_type(&self, qualified: &str, markers: &[String]) -> bool {
        if self.classes.get(qualified).is_some() {
            tracing::debug!("{} declared in project", qualified);
            return true;
        }

        let package = package_of(qualified);
        let wildcard = format!("{}.*", package);
        let imported = self.classes.iter().any(|c| {
            c.imports
                .iter()
                .any(|i| i == qualified || *i == wildcard || package_of(i) == package)
        });
        if imported {
            tracing::debug!("{} package imported by project sources", qualified);
            return true;
        }

        BUILD_FILES.iter().any(|file| {
            fs::read_to_string(self.root.join(file))
                .map(|content| markers.iter().any(|m| content.contains(m.as_str())))
                .unwrap_or(false)
        })
    }
}

/// Strip one trailing directory per package segment, checking names match
fn source_root_for(dir: &Path, package: &str) -> Option<PathBuf> {
    if package.is_empty() {
        return Some(dir.to_path_buf());
    }
    let mut current = dir;
    for segment in package.rsplit('.') {
        if current.file_name().map_or(true, |n| n != segment) {
            return fallback_java_root(dir);
        }
        current = current.parent()?;
    }
    Some(current.to_path_buf())
}

fn fallback_java_root(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .find(|a| a.file_name().map_or(false, |n| n == "java"))
        .map(Path::to_path_buf)
}

fn find_build_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| BUILD_FILES.iter().any(|f| dir.join(f).is_file()))
        .map(Path::to_path_buf)
}

fn parent_of_marker(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.file_name().map_or(false, |n| n == marker))
        .and_then(Path::parent)
        .map(Path::to_path_buf)
}

fn path_to_package(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    entry.file_type().is_dir() && (name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::java::parse_java;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn project_with_entity(root: &Path) -> (Project, ClassInfo) {
        write(root, "pom.xml", "<project><artifactId>io.swagger</artifactId></project>");
        let path = write(
            root,
            "src/main/java/com/shop/domain/entity/OrderEntity.java",
            "package com.shop.domain.entity;\n@Entity\npublic class OrderEntity { private Long id; }\n",
        );
        write(
            root,
            "src/main/java/com/shop/repository/BaseRepository.java",
            "package com.shop.repository;\nimport org.springframework.data.jpa.repository.JpaRepository;\n\
             public interface BaseRepository<E> extends JpaRepository<E, Long> {}\n",
        );
        write(root, "target/classes/Ignored.java", "package x;\npublic class Ignored {}\n");
        let entity = parse_java_file(&path).unwrap();
        let project = Project::discover(&entity, None, &GeneratorConfig::default()).unwrap();
        (project, entity)
    }

    #[test]
    fn test_discover_maven_layout() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let (project, _) = project_with_entity(root);

        assert_eq!(project.root(), root);
        assert_eq!(project.source_root(), root.join("src/main/java"));
        assert_eq!(project.resources_root(), root.join("src/main/resources"));
        assert_eq!(project.classes().len(), 2);
        assert!(project.find_class("Ignored").is_none());
    }

    #[test]
    fn test_discover_rejects_mismatched_package() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(temp_dir.path(), "sources/Foo.java", "package com.other;\npublic class Foo {}\n");
        let entity = parse_java_file(&path).unwrap();

        let err = Project::discover(&entity, None, &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(err, GenerateError::ProjectLayout(_)));
    }

    #[test]
    fn test_package_of_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let (project, _) = project_with_entity(root);

        assert_eq!(project.package_of(&root.join("src/main/java/com/shop/service/impl")), "com.shop.service.impl");
        assert_eq!(project.package_of(&root.join("src/main/java")), "");
    }

    #[test]
    fn test_exposes_method_through_project_and_library_supertypes() {
        let temp_dir = TempDir::new().unwrap();
        let (project, _) = project_with_entity(temp_dir.path());
        let config = GeneratorConfig::default();

        let repo = parse_java(
            "package com.shop.repository;\npublic interface OrderRepository extends BaseRepository<OrderEntity> {}\n",
            Path::new("OrderRepository.java"),
        )
        .unwrap();
        assert!(project.exposes_method(&repo, "saveAll", &config));

        let plain = parse_java(
            "package com.shop.repository;\npublic interface LegacyRepository extends PagingAndSortingRepository<OrderEntity, Long> {}\n",
            Path::new("LegacyRepository.java"),
        )
        .unwrap();
        assert!(!project.exposes_method(&plain, "saveAll", &config));
    }

    #[test]
    fn test_has_library_type_from_build_file_marker() {
        let temp_dir = TempDir::new().unwrap();
        let (project, _) = project_with_entity(temp_dir.path());

        let markers = vec!["io.swagger".to_string()];
        assert!(project.has_library_type("io.swagger.annotations.Api", &markers));
        assert!(project.has_library_type("org.springframework.data.jpa.repository.JpaRepository", &[]));
        assert!(!project.has_library_type("com.missing.Thing", &[]));
    }

    #[test]
    fn test_class_index_find_by_simple_and_qualified_name() {
        let mut index = ClassIndex::default();
        let class = parse_java("package a.b;\npublic class Foo {}\n", Path::new("Foo.java")).unwrap();
        index.register(class.clone());
        index.register(class);

        assert_eq!(index.len(), 1);
        assert!(index.find("Foo").is_some());
        assert!(index.find("a.b.Foo").is_some());
        assert!(index.find("c.Foo").is_none());
    }

    #[test]
    fn test_resolve_nested_types() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "pom.xml", "<project/>");
        let path = write(
            root,
            "src/main/java/com/shop/domain/entity/OrderEntity.java",
            "package com.shop.domain.entity;
@Entity
public class OrderEntity {
                 private Long id;
    private Kind kind;
                 public enum Kind { A, B }
                 public static class Line { private Kind kind; }
}
",
        );
        write(
            root,
            "src/main/java/com/shop/domain/enums/Kind.java",
            "package com.shop.domain.enums;
public enum Kind { OTHER }
",
        );
        let entity = parse_java_file(&path).unwrap();
        let project = Project::discover(&entity, None, &GeneratorConfig::default()).unwrap();

        let kind = project.resolve_type(&entity, "Kind").unwrap();
        assert_eq!(kind.qualified_name(), "com.shop.domain.entity.OrderEntity.Kind");
        assert!(kind.is_enum());

        let line = project.classes().get("com.shop.domain.entity.OrderEntity.Line").unwrap();
        assert_eq!(
            project.resolve_type(line, "Kind").unwrap().qualified_name(),
            "com.shop.domain.entity.OrderEntity.Kind"
        );

        let dto = parse_java(
            "package com.shop.service.dto;
import com.shop.domain.entity.OrderEntity;
             public class OrderDTO { private OrderEntity.Kind kind; }
",
            Path::new("OrderDTO.java"),
        )
        .unwrap();
        assert_eq!(
            project.resolve_type(&dto, "OrderEntity.Kind").unwrap().qualified_name(),
            "com.shop.domain.entity.OrderEntity.Kind"
        );

        // Nested types are not reachable by bare simple name from unrelated classes
        assert_eq!(project.find_class("Kind").unwrap().qualified_name(), "com.shop.domain.enums.Kind");
    }
}
