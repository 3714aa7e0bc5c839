//! Identifier casing helpers for generated routes, columns and members.

use convert_case::{Case, Casing};

/// Convert an identifier to kebab-case (`OrderItem` -> `order-item`)
pub fn to_kebab_case(s: &str) -> String {
    s.to_case(Case::Kebab)
}

/// Convert a field name to its persisted column name (`firstName` -> `first_name`)
pub fn to_snake_column(s: &str) -> String {
    s.to_case(Case::Snake)
}

/// Lower-case the first character (`CustomerDao` -> `customerDao`)
pub fn uncapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Upper-case the first character (`fullName` -> `FullName`)
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strip one trailing suffix, keeping the name intact when nothing would remain
pub fn strip_suffix_once<'a>(name: &'a str, suffix: &str) -> &'a str {
    match name.strip_suffix(suffix) {
        Some(stem) if !stem.is_empty() && !suffix.is_empty() => stem,
        _ => name,
    }
}

/// Strip quotes from an annotation literal (`"customer"` -> `customer`)
pub fn unquote(s: &str) -> String {
    s.replace('"', "").trim().to_string()
}
