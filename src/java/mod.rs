//! Java source model and scanner.

pub mod parser;
pub mod types;

pub use parser::{parse_java, parse_java_file};
pub use types::{
    package_of, qualify, raw_type_name, simple_name, Annotation, ClassInfo, FieldInfo, TypeKind,
};
