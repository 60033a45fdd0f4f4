//! Class declarations for the C++ header.
//!
//! The header is synthesized around the cursor rather than copied in source
//! order: members are regrouped by the policy's buckets, method bodies are
//! dropped (except in generic classes, which must be defined inline), and
//! only parameter lists and initializers are replayed from source.

use super::{overridability_keywords, template_line};
use crate::classify::classify;
use crate::context::UnitContext;
use crate::dispatch::write_expr;
use crate::error::{Result, TranslateError};
use crate::reshape::{access_label, declaration_kind, reshape};
use crate::writers::common;
use xlate_ast::{FieldDecl, Member, MethodDecl, TypeDecl};
use xlate_config::{DeclarationKind, DeclarationSite, GroupingBucket};

pub fn write_class(ctx: &mut UnitContext<'_>, decl: &TypeDecl, depth: usize) -> Result<()> {
    ctx.enter_type(decl);
    let result = class(ctx, decl, depth);
    ctx.exit_type();
    result
}

fn class(ctx: &mut UnitContext<'_>, decl: &TypeDecl, depth: usize) -> Result<()> {
    if decl.is_generic() {
        ctx.write(&template_line(&decl.type_params));
        ctx.newline(depth);
    }
    let super_alias = superclass_name(ctx, decl)?;
    let base_init = decl.superclass.is_some().then(|| super_alias.clone());
    let bases = base_clause(ctx, decl)?;
    ctx.write(&format!("class {}{} {{", decl.name.name, bases));

    let groups = reshape(&decl.members, ctx.policy.grouping(), true);
    let mut wrote_group = false;
    for group in &groups {
        let Some(bucket) = group.bucket else {
            // Members no bucket claims keep their own access labels.
            for member in &group.members {
                let access = member.access().fold_package();
                start_group(ctx, depth, GroupingBucket::new(declaration_kind(member), access), &mut wrote_group);
                write_member(ctx, member, base_init.as_deref(), depth + 1)?;
            }
            continue;
        };
        let alias_here = bucket.kind == DeclarationKind::TypeAlias
            && bucket.access == xlate_ast::AccessLevel::Public
            && !decl.is_interface();
        if group.members.is_empty() && !alias_here {
            continue;
        }
        start_group(ctx, depth, bucket, &mut wrote_group);
        if alias_here {
            ctx.newline(depth + 1);
            ctx.write(&format!("typedef {super_alias} super;"));
        }
        for member in &group.members {
            write_member(ctx, member, base_init.as_deref(), depth + 1)?;
        }
    }

    ctx.newline(depth);
    ctx.write("};");
    Ok(())
}

fn start_group(ctx: &mut UnitContext<'_>, depth: usize, bucket: GroupingBucket, wrote_group: &mut bool) {
    if *wrote_group {
        ctx.write("\n");
    }
    *wrote_group = true;
    let comment = match bucket.kind {
        DeclarationKind::Method => "",
        DeclarationKind::TypeAlias => " // Typedefs",
        DeclarationKind::Field => " // Data",
        DeclarationKind::NestedType => " // Nested class(es)",
    };
    ctx.newline(depth);
    ctx.write(&format!("{}:{}", access_label(bucket.access), comment));
}

fn superclass_name(ctx: &mut UnitContext<'_>, decl: &TypeDecl) -> Result<String> {
    match &decl.superclass {
        Some(superclass) => ctx.types.render_name(superclass),
        None => Ok(ctx.policy.object_type.to_string()),
    }
}

/// ` : public Base, public Iface`, deriving from the root object type when
/// nothing is declared.
fn base_clause(ctx: &mut UnitContext<'_>, decl: &TypeDecl) -> Result<String> {
    let mut bases = Vec::new();
    for ty in decl.superclass.iter().chain(&decl.interfaces) {
        bases.push(format!("public {}", ctx.types.render_name(ty)?));
    }
    if bases.is_empty() {
        bases.push(format!("public {}", ctx.policy.object_type));
    }
    Ok(format!(" : {}", bases.join(", ")))
}

/// One member declaration on its own line; `base_init` names the base class
/// for constructor initializer lists.
pub fn write_member(ctx: &mut UnitContext<'_>, member: &Member, base_init: Option<&str>, depth: usize) -> Result<()> {
    match member {
        Member::Method(method) => method_declaration(ctx, method, base_init, depth),
        Member::Field(field) => field_declaration(ctx, field, depth),
        Member::Type(nested) => {
            member_line(ctx, nested.span.start, false, depth)?;
            write_class(ctx, nested, depth)?;
            trailing_comment(ctx, nested.span.end);
            Ok(())
        }
    }
}

/// Start a member on a new line, after the comments above it in source.
/// With `doc_in_source` a doc comment is left for the source artifact.
fn member_line(ctx: &mut UnitContext<'_>, start: u32, doc_in_source: bool, depth: usize) -> Result<()> {
    ctx.newline(depth);
    let Some(from) = ctx.cursor.leading_comments_start(start) else {
        return Ok(());
    };
    let until = match ctx.cursor.leading_doc_comment(start) {
        Some(doc) if doc_in_source => doc.start,
        _ => start,
    };
    if from >= until {
        return Ok(());
    }
    let column = ctx.cursor.column_at(from);
    let target = depth * ctx.policy.indent_width;
    ctx.seek(from);
    ctx.with_reindent(column, target, |ctx| ctx.copy_to(until))
}

/// Copy a comment that follows `end` on the same source line.
fn trailing_comment(ctx: &mut UnitContext<'_>, end: u32) {
    if let Some(comment) = ctx.cursor.trailing_comment(end) {
        let text = ctx.source(comment);
        ctx.write(text);
    }
}

/// Whether member functions of the current type must be defined in the header.
pub(crate) fn defined_inline(ctx: &UnitContext<'_>) -> bool {
    ctx.scopes().iter().any(|scope| !scope.type_params.is_empty())
}

fn method_declaration(
    ctx: &mut UnitContext<'_>,
    method: &MethodDecl,
    base_init: Option<&str>,
    depth: usize,
) -> Result<()> {
    let inline = defined_inline(ctx) && method.body.is_some();
    member_line(ctx, method.span.start, !inline && method.body.is_some(), depth)?;
    if !method.type_params.is_empty() {
        ctx.write(&template_line(&method.type_params));
        ctx.write(" ");
    }
    let (keyword, suffix) = overridability_keywords(classify(ctx.bindings(), method));
    ctx.write(keyword);
    if let Some(return_type) = &method.return_type {
        let rendered = ctx.types.resolve(return_type, DeclarationSite::ReturnType)?;
        ctx.write(&rendered.text);
        ctx.write(" ");
    }
    ctx.write(&method.name.name);

    ctx.seek(method.name.span.end);
    ctx.skip_space()?;
    common::params(ctx, &method.params, "")?;
    ctx.write(suffix);

    if inline {
        common::skip_throws(ctx, &method.throws)?;
        let column = depth * ctx.policy.indent_width;
        super::source::definition_body(ctx, method, base_init, column)?;
    } else {
        ctx.write(";");
    }
    trailing_comment(ctx, method.span.end);
    Ok(())
}

fn field_declaration(ctx: &mut UnitContext<'_>, field: &FieldDecl, depth: usize) -> Result<()> {
    let is_static = field.modifiers.is_static();
    let forced = common::field_reference_kind(ctx, field);
    let rendered = ctx.types.resolve_as(&field.ty, DeclarationSite::Field, forced)?;
    for (i, fragment) in field.fragments.iter().enumerate() {
        common::check_dimensions(fragment)?;
        if i == 0 {
            member_line(ctx, field.span.start, false, depth)?;
        } else {
            ctx.newline(depth);
        }
        if is_static {
            ctx.write("static ");
        }
        ctx.write(&format!("{} {}", rendered.text, fragment.name.name));
        match &fragment.init {
            // Static initializers are emitted with the out-of-line definition.
            Some(init) if is_static && defined_inline(ctx) => {
                return Err(TranslateError::unsupported(
                    "static field initializer in a generic class",
                    init.span,
                ));
            }
            Some(init) if !is_static => {
                ctx.write(" = ");
                ctx.seek(init.span.start);
                write_expr(ctx, init)?;
            }
            _ => {}
        }
        ctx.write(";");
    }
    trailing_comment(ctx, field.span.end);
    Ok(())
}
