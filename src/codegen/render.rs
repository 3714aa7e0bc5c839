//! Java source rendering.

use std::io::{self, Write};

use crate::codegen::model::{JavaKind, JavaMethod, JavaType};
use crate::java::package_of;

const INDENT: &str = "    ";

/// Imports that survive rendering: `java.lang`, same-package and
/// default-package names are dropped
pub fn effective_imports(ty: &JavaType) -> Vec<&str> {
    ty.imports
        .iter()
        .map(String::as_str)
        .filter(|import| {
            let package = package_of(import);
            !package.is_empty() && package != "java.lang" && package != ty.package
        })
        .collect()
}

/// Render a generated type as Java source
pub fn render_java<W: Write>(writer: &mut W, ty: &JavaType) -> io::Result<()> {
    if !ty.package.is_empty() {
        writeln!(writer, "package {};", ty.package)?;
        writeln!(writer)?;
    }

    let imports = effective_imports(ty);
    if !imports.is_empty() {
        for import in &imports {
            writeln!(writer, "import {};", import)?;
        }
        writeln!(writer)?;
    }

    for annotation in &ty.annotations {
        writeln!(writer, "{}", annotation)?;
    }

    let keyword = match ty.kind {
        JavaKind::Class => "class",
        JavaKind::Interface => "interface",
    };
    write!(writer, "public {} {}", keyword, ty.name)?;
    if !ty.type_params.is_empty() {
        write!(writer, "<{}>", ty.type_params.join(", "))?;
    }
    if !ty.extends.is_empty() {
        write!(writer, " extends {}", ty.extends.join(", "))?;
    }
    if !ty.implements.is_empty() {
        write!(writer, " implements {}", ty.implements.join(", "))?;
    }
    writeln!(writer, " {{")?;

    for field in &ty.fields {
        writeln!(writer)?;
        for annotation in &field.annotations {
            writeln!(writer, "{}{}", INDENT, annotation)?;
        }
        writeln!(writer, "{}private {} {};", INDENT, field.ty, field.name)?;
    }

    for method in &ty.methods {
        writeln!(writer)?;
        render_method(writer, ty.kind, method)?;
    }

    writeln!(writer, "}}")?;
    Ok(())
}

fn render_method<W: Write>(writer: &mut W, kind: JavaKind, method: &JavaMethod) -> io::Result<()> {
    for annotation in &method.annotations {
        writeln!(writer, "{}{}", INDENT, annotation)?;
    }

    match &method.body {
        None => writeln!(writer, "{}{};", INDENT, method.signature()),
        Some(body) => {
            let modifier = match kind {
                JavaKind::Class => "public ",
                JavaKind::Interface => "default ",
            };
            writeln!(writer, "{}{}{} {{", INDENT, modifier, method.signature())?;
            let mut depth = 2;
            for line in body {
                if line.starts_with('}') {
                    depth -= 1;
                }
                writeln!(writer, "{}{}", INDENT.repeat(depth), line)?;
                if line.ends_with('{') {
                    depth += 1;
                }
            }
            writeln!(writer, "{}}}", INDENT)
        }
    }
}

/// Render into an owned string
pub fn render_to_string(ty: &JavaType) -> io::Result<String> {
    let mut buffer = Vec::new();
    render_java(&mut buffer, ty)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
