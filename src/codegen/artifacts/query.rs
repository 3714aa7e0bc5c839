use crate::codegen::model::{JavaField, JavaType};
use crate::entity::EntityDescriptor;

use super::{artifact_name, QUERY_SUFFIX};

/// Paging query object with accessors
pub fn query(package: &str, entity: &EntityDescriptor) -> JavaType {
    let mut ty = JavaType::class(package, &artifact_name(&entity.name, QUERY_SUFFIX));
    ty.field(JavaField::new("Integer", "page"))
        .field(JavaField::new("Integer", "size"));
    ty.add_accessors();
    ty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::artifacts::fixtures;

    #[test]
    fn test_query_has_paging_fields_and_accessors() {
        let ty = query("com.shop.service.query", &fixtures::customer());
        assert_eq!(ty.name, "CustomerQuery");
        let fields: Vec<_> = ty.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["page", "size"]);
        let methods: Vec<_> = ty.method_names().collect();
        assert_eq!(methods, vec!["getPage", "setPage", "getSize", "setSize"]);
    }
}
