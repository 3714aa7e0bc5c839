//! Project convention checks.
//!
//! Each check answers one question about the project (is there a shared DTO
//! base, which controller base applies, is the API documentation library on
//! the classpath) and is resolved once per run.

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::config::{ControllerBase, GeneratorConfig};
use crate::entity::EntityDescriptor;
use crate::java::{parse_java_file, raw_type_name, simple_name};
use crate::project::Project;

/// Controller base class chosen for generated controllers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerBaseChoice {
    /// Simple name of the base class
    pub class: String,
    pub qualified_name: String,
    /// Suffix appended to the entity name (`Controller` or `Resource`)
    pub suffix: String,
}

/// Convention flags resolved at the start of a run
#[derive(Debug, Clone, Serialize)]
pub struct Conventions {
    /// Qualified name of the shared DTO base type, if the project has one
    pub base_dto: Option<String>,
    pub controller_base: Option<ControllerBaseChoice>,
    /// Whether the API documentation annotations are available
    pub api_docs: bool,
}

impl Conventions {
    pub fn detect(project: &Project, config: &GeneratorConfig) -> Self {
        let base_dto = project
            .find_class(&config.bases.base_dto)
            .map(|c| c.qualified_name());
        let controller_base = choose_controller_base(&config.bases.controller_bases, |name| {
            project.find_class(name).map(|c| c.qualified_name())
        });
        let api_docs =
            project.has_library_type(&config.routes.api_doc_annotation, &config.routes.api_doc_markers);

        tracing::debug!(
            "Conventions: base DTO {:?}, controller base {:?}, API docs {}",
            base_dto,
            controller_base.as_ref().map(|b| &b.class),
            api_docs
        );

        Conventions {
            base_dto,
            controller_base,
            api_docs,
        }
    }

    pub fn has_base_dto_type(&self) -> bool {
        self.base_dto.is_some()
    }

    /// Suffix for the generated controller class name
    pub fn controller_suffix(&self) -> &str {
        self.controller_base
            .as_ref()
            .map_or("Controller", |b| b.suffix.as_str())
    }
}

/// Evaluate controller base candidates in priority order, returning the first hit.
///
/// `lookup` maps a class name to its qualified name when the class exists.
pub fn choose_controller_base<F>(candidates: &[ControllerBase], lookup: F) -> Option<ControllerBaseChoice>
where
    F: Fn(&str) -> Option<String>,
{
    candidates.iter().find_map(|candidate| {
        lookup(&candidate.class).map(|qualified_name| ControllerBaseChoice {
            class: candidate.class.clone(),
            qualified_name,
            suffix: candidate.suffix.clone(),
        })
    })
}

/// Check whether the entity extends the shared base entity, directly or
/// through project supertypes.
///
/// Any superclass whose simple name contains the base entity name counts
/// (`AbstractBaseEntityWithAudit` does).
pub fn entity_extends_base_entity(entity: &EntityDescriptor, project: &Project, config: &GeneratorConfig) -> bool {
    let target = config.bases.base_entity.as_str();
    let mut current = Some(&entity.class);
    let mut depth = 0;
    while let Some(class) = current {
        let Some(parent) = class.extends.first() else { return false };
        if simple_name(raw_type_name(parent)).contains(target) {
            return true;
        }
        depth += 1;
        if depth > 32 {
            return false;
        }
        current = project.resolve_type(class, parent);
    }
    false
}

/// Route prefix for a new controller in `controller_dir`.
///
/// Defaults to the API prefix (`/api/`). If any existing controller in the
/// directory maps a route outside the API prefix, the root prefix `/` is
/// used instead.
pub fn infer_route_prefix(controller_dir: &Path, config: &GeneratorConfig) -> String {
    let api_prefix = config.routes.api_prefix.trim_end_matches('/');
    let mapping = [config.routes.request_mapping.clone()];

    let mut entries: Vec<_> = match fs::read_dir(controller_dir) {
        Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(_) => Vec::new(),
    };
    entries.sort();

    for path in entries {
        if path.extension().map_or(true, |ext| ext != "java") {
            continue;
        }
        let Ok(class) = parse_java_file(&path) else { continue };
        let route = class
            .annotation_resolving_to(&mapping)
            .and_then(|a| a.string_value("value").or_else(|| a.string_value("path")));
        if let Some(route) = route {
            if !route.starts_with(api_prefix) {
                tracing::debug!(
                    "{} maps '{}' outside {}, using root prefix",
                    path.display(),
                    route,
                    api_prefix
                );
                return "/".to_string();
            }
        }
    }

    format!("{}/", api_prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn candidates() -> Vec<ControllerBase> {
        GeneratorConfig::default().bases.controller_bases
    }

    #[test]
    fn test_controller_base_first_candidate_wins() {
        let choice = choose_controller_base(&candidates(), |name| Some(format!("com.x.{}", name))).unwrap();
        assert_eq!(choice.class, "BaseController");
        assert_eq!(choice.suffix, "Controller");
    }

    #[test]
    fn test_controller_base_falls_back_to_second_candidate() {
        let choice = choose_controller_base(&candidates(), |name| {
            (name == "BaseResource").then(|| "com.x.BaseResource".to_string())
        })
        .unwrap();
        assert_eq!(choice.suffix, "Resource");
        assert_eq!(choice.qualified_name, "com.x.BaseResource");
    }

    #[test]
    fn test_no_controller_base_defaults_suffix() {
        let conventions = Conventions {
            base_dto: None,
            controller_base: choose_controller_base(&candidates(), |_| None),
            api_docs: false,
        };
        assert!(conventions.controller_base.is_none());
        assert_eq!(conventions.controller_suffix(), "Controller");
        assert!(!conventions.has_base_dto_type());
    }

    fn write_controller(dir: &Path, name: &str, route: &str) {
        fs::write(
            dir.join(format!("{}.java", name)),
            format!(
                "package com.x.controller;\n\
                 import org.springframework.web.bind.annotation.RequestMapping;\n\
                 @RequestMapping(\"{}\")\npublic class {} {{ }}\n",
                route, name
            ),
        )
        .unwrap();
    }

    #[test]
    fn test_route_prefix_defaults_to_api() {
        let temp_dir = TempDir::new().unwrap();
        let config = GeneratorConfig::default();
        assert_eq!(infer_route_prefix(temp_dir.path(), &config), "/api/");
        assert_eq!(infer_route_prefix(&temp_dir.path().join("missing"), &config), "/api/");

        write_controller(temp_dir.path(), "OrderController", "/api/order");
        assert_eq!(infer_route_prefix(temp_dir.path(), &config), "/api/");
    }

    #[test]
    fn test_route_prefix_switches_to_root() {
        let temp_dir = TempDir::new().unwrap();
        write_controller(temp_dir.path(), "AController", "/api/a");
        write_controller(temp_dir.path(), "BController", "/b");

        assert_eq!(infer_route_prefix(temp_dir.path(), &GeneratorConfig::default()), "/");
    }

    fn write_source(root: &Path, relative: &str, content: &str) -> std::path::PathBuf {
        let path = root.join("src/main/java").join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_entity_extends_base_entity() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let config = GeneratorConfig::default();
        fs::write(root.join("pom.xml"), "<project/>").unwrap();

        write_source(
            root,
            "com/shop/domain/entity/AuditedEntity.java",
            "package com.shop.domain.entity;
import com.shop.common.AbstractBaseEntity;
             public abstract class AuditedEntity extends AbstractBaseEntity { private String createdBy; }
",
        );
        let order = write_source(
            root,
            "com/shop/domain/entity/OrderEntity.java",
            "package com.shop.domain.entity;
import javax.persistence.Entity;
             @Entity
public class OrderEntity extends AuditedEntity { private Long id; }
",
        );
        let log = write_source(
            root,
            "com/shop/domain/entity/LogEntity.java",
            "package com.shop.domain.entity;
import javax.persistence.Entity;
             @Entity
public class LogEntity extends AbstractBaseEntityWithAudit { private Long id; }
",
        );
        let tag = write_source(
            root,
            "com/shop/domain/entity/TagEntity.java",
            "package com.shop.domain.entity;
import javax.persistence.Entity;
             @Entity
public class TagEntity extends Labelled { private Long id; }
",
        );

        let order_class = parse_java_file(&order).unwrap();
        let project = Project::discover(&order_class, None, &config).unwrap();
        let capture = |path: &Path| {
            EntityDescriptor::capture(&parse_java_file(path).unwrap(), Some(&project), &config).unwrap()
        };

        assert!(entity_extends_base_entity(&capture(&order), &project, &config));
        assert!(entity_extends_base_entity(&capture(&log), &project, &config));
        assert!(!entity_extends_base_entity(&capture(&tag), &project, &config));
    }
}
