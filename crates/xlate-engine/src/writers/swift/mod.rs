//! Swift backend: one artifact per unit, members in source order, with
//! declarations rewritten from `T name` to `name: T`.

pub mod decl;
pub mod expr;
pub mod stmt;

use crate::context::UnitContext;
use crate::error::Result;
use crate::resolve::RenderedType;
use crate::unit::Frame;
use crate::writers::common;
use smol_str::SmolStr;
use xlate_ast::{AccessLevel, PrimitiveKind, TypeNode, TypeNodeKind, VarFragment};

pub(crate) fn frame(imports: &[SmolStr]) -> Frame {
    let mut preamble = String::new();
    for import in imports {
        preamble.push_str(&format!("import {import}\n"));
    }
    if !preamble.is_empty() {
        preamble.push('\n');
    }
    Frame {
        preamble,
        postamble: String::new(),
    }
}

/// Swift has no protected or package level; both stay at the implicit
/// `internal` default.
pub(crate) fn access_keyword(access: AccessLevel) -> &'static str {
    match access {
        AccessLevel::Public => "public ",
        AccessLevel::Private => "private ",
        AccessLevel::Protected | AccessLevel::PackagePrivate => "",
    }
}

/// Zero value for a primitive, used where the source relies on implicit
/// initialization.
pub(crate) fn zero_value(ty: &TypeNode) -> Option<&'static str> {
    match ty.kind {
        TypeNodeKind::Primitive(PrimitiveKind::Boolean) => Some("false"),
        TypeNodeKind::Primitive(PrimitiveKind::Void) => None,
        TypeNodeKind::Primitive(_) => Some("0"),
        _ => None,
    }
}

/// Drop a statement terminator.
pub(crate) fn drop_semicolon(ctx: &mut UnitContext<'_>) -> Result<()> {
    ctx.skip_space()?;
    ctx.match_token(";")
}

/// `name: T` for each declarator of a variable declaration, with the
/// source's leading type already consumed. `implicit_default` supplies the
/// initial value of declarators that have none.
pub(crate) fn declarators(
    ctx: &mut UnitContext<'_>,
    fragments: &[VarFragment],
    rendered: &RenderedType,
    implicit_default: Option<&str>,
) -> Result<()> {
    for (i, fragment) in fragments.iter().enumerate() {
        if i > 0 {
            ctx.copy_space()?;
            ctx.match_and_write(",")?;
        }
        ctx.copy_space()?;
        common::check_dimensions(fragment)?;
        ctx.match_and_write(&fragment.name.name)?;
        ctx.write(&format!(": {}", rendered.text));
        match &fragment.init {
            Some(init) => common::initializer(ctx, init)?,
            None => {
                if let Some(default) = implicit_default {
                    ctx.write(default);
                }
            }
        }
    }
    Ok(())
}
