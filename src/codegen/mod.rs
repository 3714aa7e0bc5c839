//! Code generation for the layered Spring stack.
//!
//! Artifact shapes are built as structural models (`JavaType`,
//! `MappingDocument`) and turned into text by pure renderers.

pub mod artifacts;
pub mod fs_utils;
pub mod mapping;
pub mod model;
pub mod render;
pub mod utils;

pub use mapping::{render_mapping, MappingDocument, ResultEntry};
pub use model::{JavaField, JavaKind, JavaMethod, JavaType, Param};
pub use render::{render_java, render_to_string};
