//! Out-of-line definitions for the C++ source file.

use super::template_line;
use crate::context::UnitContext;
use crate::dispatch::write_expr;
use crate::error::Result;
use crate::writers::common;
use xlate_ast::{FieldDecl, Member, MethodDecl, StmtKind, TypeDecl};
use xlate_config::DeclarationSite;

/// Member function and static field definitions of `decl` and its nested
/// types. Generic types are skipped; their header defines them inline.
pub fn write_definitions(ctx: &mut UnitContext<'_>, decl: &TypeDecl) -> Result<()> {
    ctx.enter_type(decl);
    let result = definitions(ctx, decl);
    ctx.exit_type();
    result
}

fn definitions(ctx: &mut UnitContext<'_>, decl: &TypeDecl) -> Result<()> {
    if super::header::defined_inline(ctx) {
        return Ok(());
    }
    let qualifier = ctx
        .scope_names()
        .iter()
        .map(|name| name.as_str())
        .collect::<Vec<_>>()
        .join("::");
    let base_init = match &decl.superclass {
        Some(superclass) => Some(ctx.types.render_name(superclass)?),
        None => None,
    };

    for method in decl.methods().filter(|m| m.body.is_some()) {
        method_definition(ctx, method, &qualifier, base_init.as_deref())?;
    }
    for field in decl.fields().filter(|f| f.modifiers.is_static()) {
        static_field_definitions(ctx, field, &qualifier)?;
    }
    for member in &decl.members {
        if let Member::Type(nested) = member {
            write_definitions(ctx, nested)?;
        }
    }
    Ok(())
}

fn method_definition(
    ctx: &mut UnitContext<'_>,
    method: &MethodDecl,
    qualifier: &str,
    base_init: Option<&str>,
) -> Result<()> {
    ctx.write("\n");
    if let Some(doc) = ctx.cursor.leading_doc_comment(method.span.start) {
        let column = ctx.cursor.column_at(doc.start);
        ctx.seek(doc.start);
        ctx.with_reindent(column, 0, |ctx| ctx.copy_to(doc.end))?;
        ctx.write("\n");
    }
    if !method.type_params.is_empty() {
        ctx.write(&template_line(&method.type_params));
        ctx.write("\n");
    }
    if let Some(return_type) = &method.return_type {
        let rendered = ctx.types.resolve(return_type, DeclarationSite::ReturnType)?;
        ctx.write(&rendered.text);
        ctx.write(" ");
    }
    ctx.write(&format!("{qualifier}::{}", method.name.name));

    ctx.seek(method.name.span.end);
    ctx.skip_space()?;
    common::params(ctx, &method.params, "")?;
    common::skip_throws(ctx, &method.throws)?;
    definition_body(ctx, method, base_init, 0)?;
    ctx.write("\n");
    Ok(())
}

/// ` : Base(args) { ... }` with the body re-indented so the method's own
/// column lands on `column`. A leading `super(...)`/`this(...)` moves into
/// the initializer list.
pub(crate) fn definition_body(
    ctx: &mut UnitContext<'_>,
    method: &MethodDecl,
    base_init: Option<&str>,
    column: usize,
) -> Result<()> {
    let Some(body) = &method.body else {
        return Ok(());
    };
    if let Some(call) = common::constructor_call(Some(body)) {
        match &call.kind {
            StmtKind::SuperConstructorCall { args } => {
                if let Some(base) = base_init {
                    ctx.write(&format!(" : {base}"));
                    common::replay_constructor_args(ctx, call, "super", args)?;
                }
            }
            StmtKind::ThisConstructorCall { args } => {
                ctx.write(&format!(" : {}", method.name.name));
                common::replay_constructor_args(ctx, call, "this", args)?;
            }
            _ => {}
        }
    }

    ctx.write(" ");
    ctx.seek(body.span.start);
    let source_column = ctx.cursor.column_at(method.span.start);
    ctx.with_reindent(source_column, column, |ctx| common::block(ctx, body, true))
}

/// `T Foo::name = init;` for every declarator of a static field.
fn static_field_definitions(ctx: &mut UnitContext<'_>, field: &FieldDecl, qualifier: &str) -> Result<()> {
    let forced = common::field_reference_kind(ctx, field);
    let rendered = ctx.types.resolve_as(&field.ty, DeclarationSite::Field, forced)?;
    for fragment in &field.fragments {
        ctx.write(&format!("\n{} {qualifier}::{}", rendered.text, fragment.name.name));
        if let Some(init) = &fragment.init {
            ctx.write(" = ");
            ctx.seek(init.span.start);
            write_expr(ctx, init)?;
        }
        ctx.write(";\n");
    }
    Ok(())
}
