//! Lightweight Java source scanner.
//!
//! Extracts the structural outline of a top-level type and the types nested
//! in it: package, imports, annotations, supertypes, fields, method names and
//! enum constants. Method bodies and initializers are skipped, never
//! interpreted.
//!
//! Scanning works on two byte-aligned copies of the source: `clean` has
//! comments blanked out, `masked` additionally blanks string and character
//! literal contents so structural characters inside literals are invisible.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::error::{GenerateError, Result};
use crate::java::types::{Annotation, ClassInfo, FieldInfo, TypeKind};

static PACKAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*package\s+([\w.]+)\s*;").expect("valid package regex"));

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*import\s+(static\s+)?([\w.]+(?:\.\*)?)\s*;").expect("valid import regex")
});

static TYPE_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(@interface|\bclass|\binterface|\benum|\brecord)\s+([A-Za-z_$][\w$]*)")
        .expect("valid type declaration regex")
});

static NESTED_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|\s)(class|interface|enum|record|@interface)\s").expect("valid nested type regex")
});

static SUPERTYPE_KEYWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(extends|implements|permits)\b").expect("valid keyword regex"));

static TRAILING_IDENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z_$][\w$]*)\s*((?:\[\s*\]\s*)*)$").expect("valid identifier regex")
});

static LEADING_IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z_$][\w$]*)").expect("valid identifier regex"));

const MODIFIERS: &[&str] = &[
    "public", "protected", "private", "static", "final", "transient", "volatile",
    "abstract", "default", "synchronized", "native", "strictfp", "sealed", "non-sealed",
];

/// Read and parse a Java source file
pub fn parse_java_file(path: &Path) -> Result<ClassInfo> {
    let source = fs::read_to_string(path).map_err(|e| GenerateError::io(path, e))?;
    parse_java(&source, path)
}

/// Parse the top-level type declared in `source`, nested types included
pub fn parse_java(source: &str, path: &Path) -> Result<ClassInfo> {
    let (clean, masked) = blank_source(source, path)?;

    let package = PACKAGE_RE
        .captures(&masked)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let imports: Vec<String> = IMPORT_RE
        .captures_iter(&masked)
        .filter(|c| c.get(1).is_none())
        .filter_map(|c| c.get(2).map(|m| m.as_str().to_string()))
        .collect();

    let decl = TYPE_DECL_RE
        .captures_iter(&masked)
        .find(|c| c.get(0).map_or(false, |m| brace_depth(&masked[..m.start()]) == 0))
        .ok_or_else(|| GenerateError::parse(path, "no top-level type declaration found"))?;
    let (keyword, name) = match (decl.get(1), decl.get(2)) {
        (Some(keyword), Some(name)) => (keyword, name),
        _ => return Err(GenerateError::parse(path, "malformed type declaration")),
    };

    let file = Source {
        clean: &clean,
        masked: &masked,
        path,
        package: &package,
        imports: &imports,
    };

    // Type annotations sit between the last import/package statement and the keyword
    let annotations_start = masked[..keyword.start()].rfind(';').map_or(0, |i| i + 1);
    file.declaration(
        Declaration {
            annotations_start,
            keyword_start: keyword.start(),
            keyword: keyword.as_str(),
            name_start: name.start(),
            name_end: name.end(),
        },
        "",
    )
}

/// Byte-aligned views of one file shared by every declaration in it
struct Source<'s> {
    clean: &'s str,
    masked: &'s str,
    path: &'s Path,
    package: &'s str,
    imports: &'s [String],
}

/// Absolute offsets of a type declaration's annotations, keyword and name
struct Declaration<'k> {
    annotations_start: usize,
    keyword_start: usize,
    keyword: &'k str,
    name_start: usize,
    name_end: usize,
}

impl Source<'_> {
    fn declaration(&self, decl: Declaration, enclosing: &str) -> Result<ClassInfo> {
        let (clean, masked) = (self.clean, self.masked);

        let kind = match decl.keyword {
            "@interface" => TypeKind::Annotation,
            "interface" => TypeKind::Interface,
            "enum" => TypeKind::Enum,
            "record" => TypeKind::Record,
            _ => TypeKind::Class,
        };

        let (annotations, _, _) = take_annotations(
            &clean[decl.annotations_start..decl.keyword_start],
            &masked[decl.annotations_start..decl.keyword_start],
        );

        let body_open = masked[decl.name_end..]
            .find('{')
            .map(|i| i + decl.name_end)
            .ok_or_else(|| GenerateError::parse(self.path, "type declaration has no body"))?;
        let body_close = matching_close(masked.as_bytes(), body_open, b'{', b'}')
            .ok_or_else(|| GenerateError::parse(self.path, "unbalanced braces in type body"))?;

        let header = Header::parse(&clean[decl.name_end..body_open], &masked[decl.name_end..body_open]);

        let mut class = ClassInfo {
            name: clean[decl.name_start..decl.name_end].to_string(),
            package: self.package.to_string(),
            enclosing: enclosing.to_string(),
            kind,
            type_params: header.type_params,
            annotations,
            extends: header.extends,
            implements: header.implements,
            fields: Vec::new(),
            methods: Vec::new(),
            enum_constants: Vec::new(),
            nested: Vec::new(),
            imports: self.imports.to_vec(),
            path: self.path.to_path_buf(),
        };

        let mut members_start = body_open + 1;
        if kind == TypeKind::Enum {
            let constants_end = find_top_level(masked.as_bytes(), members_start, body_close, b';')
                .unwrap_or(body_close);
            class.enum_constants = parse_enum_constants(
                &clean[members_start..constants_end],
                &masked[members_start..constants_end],
            );
            members_start = (constants_end + 1).min(body_close);
        }

        let scope = class.nested_name();
        for member in scan_members(masked.as_bytes(), members_start, body_close) {
            if member.has_body {
                if let Some(nested) = self.nested_declaration(&member)? {
                    class.nested.push(self.declaration(nested, &scope)?);
                    continue;
                }
            }
            classify_member(&mut class, &clean[member.start..member.end], &masked[member.start..member.end]);
        }

        Ok(class)
    }

    /// Type declaration opening a member body, if the member is a nested type
    fn nested_declaration(&self, member: &Member) -> Result<Option<Declaration<'_>>> {
        let header = &self.masked[member.start..member.end];
        let (_, _, rest) = take_annotations(&self.clean[member.start..member.end], header);
        let before_paren = &rest[..rest.find('(').unwrap_or(rest.len())];
        if !NESTED_TYPE_RE.is_match(before_paren) {
            return Ok(None);
        }

        // Skip keyword-like text inside annotation arguments
        let caps = TYPE_DECL_RE
            .captures_iter(header)
            .find(|c| c.get(0).map_or(false, |m| paren_depth(&header[..m.start()]) == 0))
            .ok_or_else(|| GenerateError::parse(self.path, "malformed nested type declaration"))?;
        let (Some(keyword), Some(name)) = (caps.get(1), caps.get(2)) else {
            return Err(GenerateError::parse(self.path, "malformed nested type declaration"));
        };
        Ok(Some(Declaration {
            annotations_start: member.start,
            keyword_start: member.start + keyword.start(),
            keyword: keyword.as_str(),
            name_start: member.start + name.start(),
            name_end: member.start + name.end(),
        }))
    }
}

/// Produce the comment-blanked and literal-masked copies of `source`
fn blank_source(source: &str, path: &Path) -> Result<(String, String)> {
    #[derive(PartialEq)]
    enum State {
        Code,
        LineComment,
        BlockComment,
        Str,
        TextBlock,
        Char,
    }

    let bytes = source.as_bytes();
    let mut clean = bytes.to_vec();
    let mut masked = bytes.to_vec();
    let mut state = State::Code;
    let at = |i: usize| bytes.get(i).copied().unwrap_or(0);
    let blank = |buf: &mut Vec<u8>, i: usize| {
        if i < buf.len() && buf[i] != b'\n' {
            buf[i] = b' ';
        }
    };

    let mut i = 0;
    while i < bytes.len() {
        match state {
            State::Code => {
                if at(i) == b'/' && at(i + 1) == b'/' {
                    state = State::LineComment;
                    continue;
                } else if at(i) == b'/' && at(i + 1) == b'*' {
                    for j in i..i + 2 {
                        blank(&mut clean, j);
                        blank(&mut masked, j);
                    }
                    state = State::BlockComment;
                    i += 2;
                    continue;
                } else if at(i) == b'"' && at(i + 1) == b'"' && at(i + 2) == b'"' {
                    state = State::TextBlock;
                    i += 3;
                    continue;
                } else if at(i) == b'"' {
                    state = State::Str;
                } else if at(i) == b'\'' {
                    state = State::Char;
                }
                i += 1;
            }
            State::LineComment => {
                if at(i) == b'\n' {
                    state = State::Code;
                } else {
                    blank(&mut clean, i);
                    blank(&mut masked, i);
                }
                i += 1;
            }
            State::BlockComment => {
                if at(i) == b'*' && at(i + 1) == b'/' {
                    for j in i..i + 2 {
                        blank(&mut clean, j);
                        blank(&mut masked, j);
                    }
                    state = State::Code;
                    i += 2;
                } else {
                    blank(&mut clean, i);
                    blank(&mut masked, i);
                    i += 1;
                }
            }
            State::Str | State::Char => {
                let quote = if state == State::Str { b'"' } else { b'\'' };
                if at(i) == b'\\' {
                    blank(&mut masked, i);
                    blank(&mut masked, i + 1);
                    i += 2;
                } else if at(i) == quote || at(i) == b'\n' {
                    state = State::Code;
                    i += 1;
                } else {
                    blank(&mut masked, i);
                    i += 1;
                }
            }
            State::TextBlock => {
                if at(i) == b'"' && at(i + 1) == b'"' && at(i + 2) == b'"' {
                    state = State::Code;
                    i += 3;
                } else {
                    blank(&mut masked, i);
                    i += 1;
                }
            }
        }
    }

    let to_string = |buf: Vec<u8>| {
        String::from_utf8(buf).map_err(|e| GenerateError::parse(path, e.to_string()))
    };
    Ok((to_string(clean)?, to_string(masked)?))
}

fn brace_depth(masked: &str) -> i32 {
    masked.bytes().fold(0, |depth, b| match b {
        b'{' => depth + 1,
        b'}' => depth - 1,
        _ => depth,
    })
}

fn paren_depth(masked: &str) -> i32 {
    masked.bytes().fold(0, |depth, b| match b {
        b'(' => depth + 1,
        b')' => depth - 1,
        _ => depth,
    })
}

/// Index of the bracket closing the one at `open`
fn matching_close(bytes: &[u8], open: usize, open_ch: u8, close_ch: u8) -> Option<usize> {
    let mut depth = 0i32;
    for (offset, &b) in bytes[open..].iter().enumerate() {
        if b == open_ch {
            depth += 1;
        } else if b == close_ch {
            depth -= 1;
            if depth == 0 {
                return Some(open + offset);
            }
        }
    }
    None
}

/// First `target` byte in `[from, to)` outside any brackets
fn find_top_level(bytes: &[u8], from: usize, to: usize, target: u8) -> Option<usize> {
    let mut depth = 0i32;
    for (i, &b) in bytes.iter().enumerate().take(to).skip(from) {
        match b {
            b'(' | b'{' | b'[' => depth += 1,
            b')' | b'}' | b']' => depth -= 1,
            _ if b == target && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Split ranges of `masked` on top-level `sep`, ignoring separators nested in
/// `<>`, `()`, `{}` or `[]`
fn split_top_level(masked: &str, sep: u8) -> Vec<(usize, usize)> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, b) in masked.bytes().enumerate() {
        match b {
            b'<' | b'(' | b'{' | b'[' => depth += 1,
            b'>' | b')' | b'}' | b']' => depth -= 1,
            _ if b == sep && depth == 0 => {
                parts.push((start, i));
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push((start, masked.len()));
    parts
}

/// Remove annotations from a declaration fragment.
///
/// Returns the annotations plus the remaining clean and masked text.
fn take_annotations(clean: &str, masked: &str) -> (Vec<Annotation>, String, String) {
    let bytes = masked.as_bytes();
    let mut annotations = Vec::new();
    let mut rest_clean = String::new();
    let mut rest_masked = String::new();
    let mut i = 0;
    let mut copied_from = 0;

    while i < bytes.len() {
        let is_annotation = bytes[i] == b'@'
            && bytes.get(i + 1).map_or(false, |b| b.is_ascii_alphabetic() || *b == b'_')
            && !masked[i..].starts_with("@interface");
        if !is_annotation {
            i += 1;
            continue;
        }

        rest_clean.push_str(&clean[copied_from..i]);
        rest_masked.push_str(&masked[copied_from..i]);

        let name_start = i + 1;
        let mut j = name_start;
        while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || matches!(bytes[j], b'_' | b'$' | b'.')) {
            j += 1;
        }
        let name = clean[name_start..j].to_string();

        let mut k = j;
        while k < bytes.len() && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        let (arguments, attributes, end) = if bytes.get(k) == Some(&b'(') {
            match matching_close(bytes, k, b'(', b')') {
                Some(close) => {
                    let args_clean = &clean[k + 1..close];
                    let args_masked = &masked[k + 1..close];
                    (
                        Some(args_clean.trim().to_string()),
                        parse_attributes(args_clean, args_masked),
                        close + 1,
                    )
                }
                None => (None, IndexMap::new(), j),
            }
        } else {
            (None, IndexMap::new(), j)
        };

        annotations.push(Annotation { name, arguments, attributes });
        i = end;
        copied_from = end;
    }

    rest_clean.push_str(&clean[copied_from..]);
    rest_masked.push_str(&masked[copied_from..]);
    (annotations, rest_clean, rest_masked)
}

fn parse_attributes(clean: &str, masked: &str) -> IndexMap<String, String> {
    let mut attributes = IndexMap::new();
    if masked.trim().is_empty() {
        return attributes;
    }
    for (start, end) in split_top_level(masked, b',') {
        let part_masked = &masked[start..end];
        let part_clean = &clean[start..end];
        match find_top_level(part_masked.as_bytes(), 0, part_masked.len(), b'=') {
            Some(eq) => {
                attributes.insert(
                    part_clean[..eq].trim().to_string(),
                    part_clean[eq + 1..].trim().to_string(),
                );
            }
            None if !part_clean.trim().is_empty() => {
                attributes.insert("value".to_string(), part_clean.trim().to_string());
            }
            None => {}
        }
    }
    attributes
}

/// Type parameters and supertypes following the type name
struct Header {
    type_params: Vec<String>,
    extends: Vec<String>,
    implements: Vec<String>,
}

impl Header {
    fn parse(clean: &str, masked: &str) -> Self {
        let mut header = Header {
            type_params: Vec::new(),
            extends: Vec::new(),
            implements: Vec::new(),
        };

        let mut rest_start = 0;
        let trimmed = masked.trim_start();
        if trimmed.starts_with('<') {
            let open = masked.len() - trimmed.len();
            if let Some(close) = matching_close(masked.as_bytes(), open, b'<', b'>') {
                header.type_params = split_list(&clean[open + 1..close], &masked[open + 1..close]);
                rest_start = close + 1;
            }
        }

        let keywords: Vec<_> = SUPERTYPE_KEYWORD_RE
            .captures_iter(&masked[rest_start..])
            .filter_map(|c| c.get(1))
            .map(|m| (m.as_str().to_string(), rest_start + m.start(), rest_start + m.end()))
            .collect();

        for (idx, (keyword, _, list_start)) in keywords.iter().enumerate() {
            let list_end = keywords.get(idx + 1).map_or(masked.len(), |next| next.1);
            let items = split_list(&clean[*list_start..list_end], &masked[*list_start..list_end]);
            match keyword.as_str() {
                "extends" => header.extends = items,
                "implements" => header.implements = items,
                _ => {}
            }
        }

        header
    }
}

/// Comma-separated list with whitespace normalised per item
fn split_list(clean: &str, masked: &str) -> Vec<String> {
    split_top_level(masked, b',')
        .into_iter()
        .map(|(start, end)| normalize_ws(&clean[start..end]))
        .filter(|item| !item.is_empty())
        .collect()
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_enum_constants(clean: &str, masked: &str) -> Vec<String> {
    split_top_level(masked, b',')
        .into_iter()
        .filter_map(|(start, end)| {
            let (_, rest, _) = take_annotations(&clean[start..end], &masked[start..end]);
            LEADING_IDENT_RE
                .captures(&rest)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        })
        .collect()
}

/// Byte range of one member declaration header within the type body
struct Member {
    start: usize,
    end: usize,
    /// Header ends at the opening brace of a body
    has_body: bool,
}

/// Split a type body into member headers.
///
/// Fields and abstract methods end at `;`; methods, nested types and
/// initializer blocks end at their closing brace. Braces that follow an `=`
/// belong to an initializer expression and do not end the member.
fn scan_members(masked: &[u8], from: usize, to: usize) -> Vec<Member> {
    let mut members = Vec::new();
    let mut start = from;
    let mut paren = 0i32;
    let mut in_initializer = false;
    let mut i = from;

    while i < to {
        match masked[i] {
            b'(' => paren += 1,
            b')' => paren -= 1,
            b'=' if paren == 0 => in_initializer = true,
            b';' if paren == 0 => {
                members.push(Member { start, end: i, has_body: false });
                start = i + 1;
                in_initializer = false;
            }
            b'{' if paren == 0 => {
                let close = matching_close(masked, i, b'{', b'}').unwrap_or(to).min(to);
                if !in_initializer {
                    members.push(Member { start, end: i, has_body: true });
                    start = close + 1;
                }
                i = close;
            }
            _ => {}
        }
        i += 1;
    }

    members
}

fn classify_member(class: &mut ClassInfo, clean: &str, masked: &str) {
    let (annotations, rest_clean, rest_masked) = take_annotations(clean, masked);
    let trimmed = rest_masked.trim();
    if trimmed.is_empty() || trimmed == "static" {
        return;
    }

    let paren = rest_masked.find('(');
    let assign = find_top_level(rest_masked.as_bytes(), 0, rest_masked.len(), b'=');
    let before_paren = &rest_masked[..paren.unwrap_or(rest_masked.len())];
    if NESTED_TYPE_RE.is_match(before_paren) {
        return;
    }

    if let Some(p) = paren {
        if assign.map_or(true, |eq| p < eq) {
            if let Some(name) = TRAILING_IDENT_RE
                .captures(rest_clean[..p].trim_end())
                .and_then(|c| c.get(1))
            {
                if name.as_str() != class.name {
                    class.methods.push(name.as_str().to_string());
                }
            }
            return;
        }
    }

    let mut declared_type: Option<String> = None;
    let mut is_static = false;
    for (start, end) in split_top_level(&rest_masked, b',') {
        let part_masked = &rest_masked[start..end];
        let lhs_end = find_top_level(part_masked.as_bytes(), 0, part_masked.len(), b'=')
            .unwrap_or(part_masked.len());
        let mut lhs = normalize_ws(&rest_clean[start..start + lhs_end]);

        if declared_type.is_none() {
            loop {
                let Some(word) = lhs.split_whitespace().next().map(str::to_string) else { break };
                if !MODIFIERS.contains(&word.as_str()) {
                    break;
                }
                is_static |= word == "static";
                lhs = lhs[word.len()..].trim_start().to_string();
            }
        }

        let Some(caps) = TRAILING_IDENT_RE.captures(&lhs) else { continue };
        let (Some(name), dims) = (caps.get(1), caps.get(2)) else { continue };
        let dims: String = dims.map(|d| d.as_str().split_whitespace().collect()).unwrap_or_default();

        let ty = match &declared_type {
            Some(ty) => format!("{}{}", ty, dims),
            None => {
                let base = lhs[..name.start()].trim().to_string();
                if base.is_empty() {
                    return;
                }
                declared_type = Some(base.clone());
                format!("{}{}", base, dims)
            }
        };

        class.fields.push(FieldInfo {
            name: name.as_str().to_string(),
            ty,
            annotations: annotations.clone(),
            is_static,
        });
    }
}
