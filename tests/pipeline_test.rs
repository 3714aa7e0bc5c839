//! End-to-end generation against temporary Maven-style projects

use std::fs;
use std::path::{Path, PathBuf};

use layercake::{generate, ArtifactKind, ArtifactStatus, GenerateError, GenerationReport, GeneratorConfig, Outcome};
use tempfile::TempDir;

const CUSTOMER_ENTITY: &str = r#"package com.shop.domain.entity;

import javax.persistence.*;
import com.shop.domain.enums.CustomerStatus;

@Entity
@Table(name = "customer")
public class CustomerEntity {
    @Id
    @GeneratedValue(strategy = GenerationType.IDENTITY)
    private Long id;

    @Column(name = "full_name")
    private String fullName;

    @Enumerated(EnumType.ORDINAL)
    private CustomerStatus status;

    @Transient
    private String displayLabel;
}
"#;

const CUSTOMER_STATUS: &str = r#"package com.shop.domain.enums;

public enum CustomerStatus {
    ACTIVE,
    BLOCKED
}
"#;

struct Fixture {
    _dir: TempDir,
    root: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        fs::write(root.join("pom.xml"), "<project><artifactId>shop</artifactId></project>\n").unwrap();
        Fixture { _dir: dir, root }
    }

    fn java_root(&self) -> PathBuf {
        self.root.join("src/main/java")
    }

    fn write_source(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.java_root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn customer_project() -> (Self, PathBuf) {
        let fixture = Fixture::new();
        fixture.write_source("com/shop/domain/enums/CustomerStatus.java", CUSTOMER_STATUS);
        let entity = fixture.write_source("com/shop/domain/entity/CustomerEntity.java", CUSTOMER_ENTITY);
        (fixture, entity)
    }

    fn mkdir(&self, relative: &str) {
        fs::create_dir_all(self.java_root().join(relative)).unwrap();
    }

    fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.java_root().join(relative)).unwrap()
    }
}

fn run(entity: &Path) -> GenerationReport {
    match generate(entity, &GeneratorConfig::default(), None).unwrap() {
        Outcome::Generated(report) => report,
        Outcome::Skipped { reason, .. } => panic!("unexpected skip: {}", reason),
    }
}

#[test]
fn test_generates_full_stack_in_conventional_layout() {
    let (fixture, entity) = Fixture::customer_project();
    let report = run(&entity);

    let expected = [
        "com/shop/domain/repository/BaseRepository.java",
        "com/shop/domain/repository/CustomerRepository.java",
        "com/shop/service/dto/CustomerDTO.java",
        "com/shop/service/mapper/EntityMapper.java",
        "com/shop/service/mapper/CustomerMapper.java",
        "com/shop/service/query/CustomerQuery.java",
        "com/shop/domain/dao/CustomerDao.java",
        "com/shop/service/CustomerService.java",
        "com/shop/service/impl/CustomerServiceImpl.java",
        "com/shop/controller/CustomerController.java",
    ];
    for relative in expected {
        assert!(fixture.java_root().join(relative).is_file(), "missing {}", relative);
    }
    assert_eq!(report.count(ArtifactStatus::Created), expected.len() + 1);
    assert_eq!(report.count(ArtifactStatus::Reused), 0);

    let mapping = fixture.root.join("src/main/resources/mappers/CustomerDao.xml");
    assert_eq!(report.artifact(ArtifactKind::MappingFile).unwrap().path, mapping);
    let xml = fs::read_to_string(&mapping).unwrap();
    assert!(xml.contains("<mapper namespace=\"com.shop.domain.dao.CustomerDao\">"));
    assert!(xml.contains("from customer t1"));
    assert!(xml.contains("insert into customer(id,full_name,status) values"));
    assert!(xml.contains(
        "<result property=\"status\" column=\"status\" typeHandler=\"org.apache.ibatis.type.EnumOrdinalTypeHandler\"/>"
    ));
    assert!(!xml.contains("display_label"));

    let dto = fixture.read("com/shop/service/dto/CustomerDTO.java");
    assert!(dto.contains("package com.shop.service.dto;"));
    assert!(dto.contains("private String fullName;"));
    assert!(!dto.contains("@Column"));

    let service_impl = fixture.read("com/shop/service/impl/CustomerServiceImpl.java");
    assert!(service_impl.contains("repository.saveAll(mapper.toEntity(dtos));"));

    let controller = fixture.read("com/shop/controller/CustomerController.java");
    assert!(controller.contains("@RequestMapping(\"/api/customer\")"));

    assert!(report.created_dirs.contains(&fixture.java_root().join("com/shop/service")));
}

#[test]
fn test_second_run_reuses_everything() {
    let (fixture, entity) = Fixture::customer_project();
    run(&entity);

    let mapping = fixture.root.join("src/main/resources/mappers/CustomerDao.xml");
    fs::write(&mapping, "<!-- hand edited -->\n").unwrap();
    let dto_path = fixture.java_root().join("com/shop/service/dto/CustomerDTO.java");
    let dto_before = fs::read_to_string(&dto_path).unwrap();

    let report = run(&entity);
    assert_eq!(report.count(ArtifactStatus::Created), 0);
    assert_eq!(report.artifact(ArtifactKind::MappingFile).unwrap().status, ArtifactStatus::Skipped);
    assert!(report
        .artifacts
        .iter()
        .filter(|a| a.kind != ArtifactKind::MappingFile)
        .all(|a| a.status == ArtifactStatus::Reused));
    assert!(report.created_dirs.is_empty());

    assert_eq!(fs::read_to_string(&mapping).unwrap(), "<!-- hand edited -->\n");
    assert_eq!(fs::read_to_string(&dto_path).unwrap(), dto_before);
}

#[test]
fn test_bulk_save_falls_back_without_save_all() {
    let (fixture, entity) = Fixture::customer_project();
    fixture.write_source(
        "com/shop/domain/repository/CustomerRepository.java",
        r#"package com.shop.domain.repository;

import com.shop.domain.entity.CustomerEntity;
import org.springframework.data.repository.PagingAndSortingRepository;

public interface CustomerRepository extends PagingAndSortingRepository<CustomerEntity, Long> {
}
"#,
    );

    let report = run(&entity);
    assert_eq!(report.artifact(ArtifactKind::Repository).unwrap().status, ArtifactStatus::Reused);

    let service_impl = fixture.read("com/shop/service/impl/CustomerServiceImpl.java");
    assert!(service_impl.contains("repository.save(mapper.toEntity(dtos));"));
    assert!(!service_impl.contains("saveAll"));
}

#[test]
fn test_route_prefix_follows_existing_controllers() {
    let fixture = Fixture::new();
    let entity = fixture.write_source(
        "com/shop/domain/entity/OrderItemEntity.java",
        r#"package com.shop.domain.entity;

import javax.persistence.Entity;
import javax.persistence.Id;

@Entity
public class OrderItemEntity {
    @Id
    private Long id;
    private Integer quantity;
}
"#,
    );
    fixture.write_source(
        "com/shop/controller/HealthController.java",
        r#"package com.shop.controller;

import org.springframework.web.bind.annotation.RequestMapping;
import org.springframework.web.bind.annotation.RestController;

@RestController
@RequestMapping("/health")
public class HealthController {
}
"#,
    );

    run(&entity);
    let controller = fixture.read("com/shop/controller/OrderItemController.java");
    assert!(controller.contains("@RequestMapping(\"/order-item\")"));
}

#[test]
fn test_api_prefix_for_new_controller_directory() {
    let fixture = Fixture::new();
    let entity = fixture.write_source(
        "com/shop/domain/entity/OrderItemEntity.java",
        r#"package com.shop.domain.entity;

import javax.persistence.Entity;
import javax.persistence.Id;

@Entity
public class OrderItemEntity {
    @Id
    private Long id;
}
"#,
    );

    run(&entity);
    let controller = fixture.read("com/shop/controller/OrderItemController.java");
    assert!(controller.contains("@RequestMapping(\"/api/order-item\")"));
}

#[test]
fn test_non_entity_is_skipped_without_writing() {
    let fixture = Fixture::new();
    let path = fixture.write_source(
        "com/shop/util/Money.java",
        "package com.shop.util;\n\npublic class Money {\n    private long cents;\n}\n",
    );

    let outcome = generate(&path, &GeneratorConfig::default(), None).unwrap();
    match outcome {
        Outcome::Skipped { class_name, .. } => assert_eq!(class_name, "Money"),
        Outcome::Generated(_) => panic!("non-entity must not generate"),
    }
    assert!(!fixture.java_root().join("com/shop/service").exists());
    assert!(!fixture.root.join("src/main/resources").exists());
}

#[test]
fn test_fieldless_entity_fails_at_dao_stage() {
    let fixture = Fixture::new();
    let entity = fixture.write_source(
        "com/shop/domain/entity/MarkerEntity.java",
        "package com.shop.domain.entity;\n\nimport javax.persistence.Entity;\n\n@Entity\npublic class MarkerEntity {\n}\n",
    );

    let err = generate(&entity, &GeneratorConfig::default(), None).unwrap_err();
    match err {
        GenerateError::Stage { stage, source } => {
            assert_eq!(stage, "dao");
            assert!(matches!(*source, GenerateError::EmptyEntity { .. }));
        }
        other => panic!("unexpected error: {}", other),
    }

    // Earlier stages keep their output
    assert!(fixture.java_root().join("com/shop/domain/repository/MarkerRepository.java").is_file());
    assert!(fixture.java_root().join("com/shop/service/query/MarkerQuery.java").is_file());
    assert!(!fixture.root.join("src/main/resources/mappers/MarkerDao.xml").exists());
    assert!(!fixture.java_root().join("com/shop/service/MarkerService.java").exists());
}

#[test]
fn test_explicit_project_root_override() {
    let (fixture, entity) = Fixture::customer_project();
    let outcome = generate(&entity, &GeneratorConfig::default(), Some(&fixture.root)).unwrap();
    assert!(matches!(outcome, Outcome::Generated(_)));
    assert!(fixture.root.join("src/main/resources/mappers/CustomerDao.xml").is_file());
}

#[test]
fn test_controller_prefers_web_rest_directory() {
    let (fixture, entity) = Fixture::customer_project();
    fixture.mkdir("com/shop/web/rest");

    let report = run(&entity);
    let controller = fixture.java_root().join("com/shop/web/rest/CustomerController.java");
    assert_eq!(report.artifact(ArtifactKind::Controller).unwrap().path, controller);
    assert!(fixture.read("com/shop/web/rest/CustomerController.java").contains("package com.shop.web.rest;"));
    assert!(!fixture.java_root().join("com/shop/controller").exists());
}

#[test]
fn test_controller_uses_web_directory_without_rest() {
    let (fixture, entity) = Fixture::customer_project();
    fixture.mkdir("com/shop/web");

    run(&entity);
    assert!(fixture.java_root().join("com/shop/web/CustomerController.java").is_file());
    assert!(!fixture.java_root().join("com/shop/controller").exists());
}

#[test]
fn test_controller_falls_back_to_indexed_controller_directory() {
    let (fixture, entity) = Fixture::customer_project();
    fixture.mkdir("com/shop/admin/controller");

    run(&entity);
    assert!(fixture.java_root().join("com/shop/admin/controller/CustomerController.java").is_file());
    assert!(!fixture.java_root().join("com/shop/controller").exists());
}

#[test]
fn test_existing_service_directory_is_reused() {
    let (fixture, entity) = Fixture::customer_project();
    fixture.mkdir("com/shop/app/service");

    let report = run(&entity);
    assert!(fixture.java_root().join("com/shop/app/service/CustomerService.java").is_file());
    assert!(fixture.read("com/shop/app/service/dto/CustomerDTO.java").contains("package com.shop.app.service.dto;"));
    assert!(fixture.java_root().join("com/shop/app/service/impl/CustomerServiceImpl.java").is_file());
    assert!(fixture.java_root().join("com/shop/app/controller/CustomerController.java").is_file());
    assert!(!report.created_dirs.contains(&fixture.java_root().join("com/shop/service")));
}

#[test]
fn test_service_directory_stays_inside_source_root() {
    let fixture = Fixture::new();
    let entity = fixture.write_source(
        "shop/ItemEntity.java",
        r#"package shop;

import javax.persistence.Entity;

@Entity
public class ItemEntity {
    private Long id;
}
"#,
    );

    run(&entity);
    assert!(fixture.read("service/ItemService.java").contains("package service;"));
    assert!(fixture.java_root().join("repository/ItemRepository.java").is_file());
    assert!(fixture.java_root().join("controller/ItemController.java").is_file());
    assert!(!fixture.root.join("src/main/service").exists());
}

#[test]
fn test_mapping_file_falls_back_to_resources_root() {
    let (fixture, entity) = Fixture::customer_project();
    let resources = fixture.root.join("src/main/resources");
    fs::create_dir_all(&resources).unwrap();
    // A plain file where the mappers directory would go
    fs::write(resources.join("mappers"), "").unwrap();

    let report = run(&entity);
    let mapping = resources.join("CustomerDao.xml");
    assert_eq!(report.artifact(ArtifactKind::MappingFile).unwrap().path, mapping);
    assert_eq!(report.artifact(ArtifactKind::MappingFile).unwrap().status, ArtifactStatus::Created);
    assert!(fs::read_to_string(&mapping).unwrap().contains("from customer t1"));
}

const ABSTRACT_BASE_DTO: &str = r#"package com.shop.common;

public abstract class AbstractBaseDTO {
    private Long version;
}
"#;

const ABSTRACT_BASE_ENTITY: &str = r#"package com.shop.common;

import javax.persistence.MappedSuperclass;

@MappedSuperclass
public abstract class AbstractBaseEntity {
    private Long version;
}
"#;

fn project_with_base_types(entity_source: &str) -> (Fixture, PathBuf) {
    let fixture = Fixture::new();
    fixture.write_source("com/shop/common/AbstractBaseDTO.java", ABSTRACT_BASE_DTO);
    fixture.write_source("com/shop/common/AbstractBaseEntity.java", ABSTRACT_BASE_ENTITY);
    let entity = fixture.write_source("com/shop/domain/entity/InvoiceEntity.java", entity_source);
    (fixture, entity)
}

#[test]
fn test_dto_extends_base_dto_when_entity_extends_base_entity() {
    let (fixture, entity) = project_with_base_types(
        r#"package com.shop.domain.entity;

import javax.persistence.Entity;
import com.shop.common.AbstractBaseEntity;

@Entity
public class InvoiceEntity extends AbstractBaseEntity {
    private String number;
}
"#,
    );

    run(&entity);
    let dto = fixture.read("com/shop/service/dto/InvoiceDTO.java");
    assert!(dto.contains("public class InvoiceDTO extends AbstractBaseDTO {"));
    assert!(dto.contains("import com.shop.common.AbstractBaseDTO;"));
    assert!(dto.contains("private String number;"));
    assert!(!dto.contains("private Long version;"));

    let xml = fs::read_to_string(fixture.root.join("src/main/resources/mappers/InvoiceDao.xml")).unwrap();
    assert!(xml.contains("<result property=\"version\" column=\"version\"/>"));
}

#[test]
fn test_dto_skips_base_dto_when_entity_has_no_base_entity() {
    let (fixture, entity) = project_with_base_types(
        r#"package com.shop.domain.entity;

import javax.persistence.Entity;

@Entity
public class InvoiceEntity {
    private String number;
}
"#,
    );

    run(&entity);
    let dto = fixture.read("com/shop/service/dto/InvoiceDTO.java");
    assert!(dto.contains("public class InvoiceDTO {"));
    assert!(!dto.contains("AbstractBaseDTO"));
}

#[test]
fn test_enum_nested_in_entity_maps_with_type_handler() {
    let fixture = Fixture::new();
    let entity = fixture.write_source(
        "com/shop/domain/entity/OrderEntity.java",
        r#"package com.shop.domain.entity;

import javax.persistence.*;

@Entity
@Table(name = "orders")
public class OrderEntity {
    @Id
    private Long id;

    @Enumerated(EnumType.ORDINAL)
    private Kind kind;

    public enum Kind {
        RETAIL,
        WHOLESALE
    }
}
"#,
    );

    run(&entity);
    let xml = fs::read_to_string(fixture.root.join("src/main/resources/mappers/OrderDao.xml")).unwrap();
    assert!(xml.contains(
        "<result property=\"kind\" column=\"kind\" typeHandler=\"org.apache.ibatis.type.EnumOrdinalTypeHandler\"/>"
    ));
    assert!(xml.contains("<result property=\"id\" column=\"id\"/>"));

    let dto = fixture.read("com/shop/service/dto/OrderDTO.java");
    assert!(dto.contains("import com.shop.domain.entity.OrderEntity;"));
    assert!(dto.contains("private OrderEntity.Kind kind;"));
}
