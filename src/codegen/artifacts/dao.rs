use crate::codegen::model::{JavaMethod, JavaType, Param};
use crate::error::Result;
use crate::pipeline::GenerationContext;

use super::{artifact_name, DAO_SUFFIX};

/// MyBatis data-access interface backed by the generated mapping file
pub fn dao(package: &str, ctx: &GenerationContext) -> Result<JavaType> {
    let dto = ctx.dto()?;
    let query = ctx.query()?;

    let mut ty = JavaType::interface(package, &artifact_name(&ctx.entity.name, DAO_SUFFIX));
    ty.import("java.util.List")
        .import("org.apache.ibatis.annotations.Mapper")
        .import("org.apache.ibatis.annotations.Param")
        .import(dto.qualified_name())
        .import(query.qualified_name())
        .annotate("@Mapper");
    ty.method(JavaMethod::declaration(
        format!("List<{}>", dto.name),
        "query",
        vec![Param::new(query.name.clone(), "query")],
    ))
    .method(JavaMethod::declaration(
        "void",
        "batchAdd",
        vec![Param::new(format!("List<{}>", dto.name), "dataList").annotated("@Param(\"list\")")],
    ));
    Ok(ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::artifacts::fixtures;
    use crate::error::GenerateError;

    #[test]
    fn test_dao_declares_query_and_batch_add() {
        let ty = dao("com.shop.dao", &fixtures::full_context()).unwrap();
        assert_eq!(ty.name, "CustomerDao");
        let signatures: Vec<_> = ty.methods.iter().map(JavaMethod::signature).collect();
        assert_eq!(
            signatures,
            vec![
                "List<CustomerDTO> query(CustomerQuery query)",
                "void batchAdd(@Param(\"list\") List<CustomerDTO> dataList)",
            ]
        );
    }

    #[test]
    fn test_dao_requires_query_artifact() {
        let ctx = GenerationContext::new(fixtures::customer(), "service".into())
            .with_dto(fixtures::class("package a;\npublic class CustomerDTO {}\n"));
        let err = dao("com.shop.dao", &ctx).unwrap_err();
        assert!(matches!(err, GenerateError::MissingArtifact { artifact: "query" }));
    }
}
