//! MyBatis mapping file model and rendering.
//!
//! One mapping document per entity binds the DAO's `query` and `batchAdd`
//! methods to SQL over the entity's table.

use std::io::{self, Write};

use crate::codegen::utils::to_snake_column;
use crate::config::GeneratorConfig;
use crate::error::{GenerateError, Result};
use crate::pipeline::GenerationContext;
use crate::project::Project;

pub const ENUM_TYPE_HANDLER: &str = "org.apache.ibatis.type.EnumOrdinalTypeHandler";
pub const TABLE_ALIAS: &str = "t1";

/// One `<result>` entry of the result map
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEntry {
    pub property: String,
    pub column: String,
    pub type_handler: Option<String>,
}

/// Structural model of a DAO mapping file
#[derive(Debug, Clone, PartialEq)]
pub struct MappingDocument {
    /// Qualified DAO name
    pub namespace: String,
    /// Qualified DTO name
    pub result_type: String,
    /// Qualified query object name
    pub query_type: String,
    pub table: String,
    pub results: Vec<ResultEntry>,
}

impl MappingDocument {
    /// Build the mapping for the entity in `ctx`.
    ///
    /// Every entity field except persistence `@Transient` ones maps to a
    /// snake_case column. Fields whose type resolves to a project enum get
    /// the ordinal enum type handler.
    pub fn build(ctx: &GenerationContext, project: &Project, config: &GeneratorConfig) -> Result<Self> {
        let entity = &ctx.entity;
        let dao = ctx.dao()?;
        let dto = ctx.dto()?;
        let query = ctx.query()?;

        let results: Vec<ResultEntry> = entity
            .all_fields()
            .filter(|field| {
                !field.annotations.iter().any(|a| {
                    a.simple_name() == "Transient" && entity.is_persistence_annotation(a, config)
                })
            })
            .map(|field| {
                let is_enum = project
                    .resolve_type(&entity.class, &field.ty)
                    .map_or(false, |class| class.is_enum());
                ResultEntry {
                    property: field.name.clone(),
                    column: to_snake_column(&field.name),
                    type_handler: is_enum.then(|| ENUM_TYPE_HANDLER.to_string()),
                }
            })
            .collect();

        if results.is_empty() {
            return Err(GenerateError::EmptyEntity {
                entity: entity.class_name.clone(),
            });
        }

        Ok(MappingDocument {
            namespace: dao.qualified_name(),
            result_type: dto.qualified_name(),
            query_type: query.qualified_name(),
            table: entity.table_name.clone(),
            results,
        })
    }

    /// Column names in field order
    pub fn columns(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.column.as_str()).collect()
    }

    /// `t1.id,t1.full_name,...`
    pub fn select_list(&self) -> String {
        self.results
            .iter()
            .map(|r| format!("{}.{}", TABLE_ALIAS, r.column))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// `#{item.id},#{item.fullName},...`
    pub fn insert_values(&self) -> String {
        self.results
            .iter()
            .map(|r| format!("#{{item.{}}}", r.property))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Render a mapping document as MyBatis 3 mapper XML
pub fn render_mapping<W: Write>(writer: &mut W, doc: &MappingDocument) -> io::Result<()> {
    writeln!(writer, "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>")?;
    writeln!(writer, "<!DOCTYPE mapper")?;
    writeln!(writer, "        PUBLIC \"-//mybatis.org//DTD Mapper 3.0//EN\"")?;
    writeln!(writer, "        \"http://mybatis.org/dtd/mybatis-3-mapper.dtd\">")?;
    writeln!(writer, "<mapper namespace=\"{}\">", doc.namespace)?;

    writeln!(writer, "    <resultMap id=\"resultMap\" type=\"{}\">", doc.result_type)?;
    for result in &doc.results {
        write!(writer, "        <result property=\"{}\" column=\"{}\"", result.property, result.column)?;
        if let Some(handler) = &result.type_handler {
            write!(writer, " typeHandler=\"{}\"", handler)?;
        }
        writeln!(writer, "/>")?;
    }
    writeln!(writer, "    </resultMap>")?;

    writeln!(writer, "    <sql id=\"columns\">")?;
    writeln!(writer, "        select {}", doc.select_list())?;
    writeln!(writer, "        from {} {}", doc.table, TABLE_ALIAS)?;
    writeln!(writer, "    </sql>")?;

    writeln!(
        writer,
        "    <select id=\"query\" parameterType=\"{}\" resultMap=\"resultMap\">",
        doc.query_type
    )?;
    writeln!(writer, "        <include refid=\"columns\"/>")?;
    writeln!(writer, "    </select>")?;

    writeln!(writer, "    <insert id=\"batchAdd\" parameterType=\"{}\">", doc.result_type)?;
    writeln!(writer, "        insert into {}({}) values", doc.table, doc.columns().join(","))?;
    writeln!(writer, "        <foreach collection=\"list\" item=\"item\" separator=\",\">")?;
    writeln!(writer, "            ({})", doc.insert_values())?;
    writeln!(writer, "        </foreach>")?;
    writeln!(writer, "    </insert>")?;

    writeln!(writer, "</mapper>")?;
    Ok(())
}
