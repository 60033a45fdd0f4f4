//! C# type and member declarations, written in source order.

use super::{access_keyword, overridability_keyword, root_method_name};
use crate::classify::classify;
use crate::context::UnitContext;
use crate::error::{Result, TranslateError};
use crate::writers::common;
use smol_str::SmolStr;
use xlate_ast::{
    BoundKind, FieldDecl, Member, MethodDecl, StmtKind, TypeDecl, TypeNode, TypeNodeKind, TypeParam,
};
use xlate_common::Span;
use xlate_config::DeclarationSite;

pub fn write_type_decl(ctx: &mut UnitContext<'_>, decl: &TypeDecl) -> Result<()> {
    ctx.enter_type(decl);
    let result = type_decl(ctx, decl);
    ctx.exit_type();
    result
}

fn type_decl(ctx: &mut UnitContext<'_>, decl: &TypeDecl) -> Result<()> {
    ctx.skip_modifiers(&decl.modifiers)?;
    ctx.write(access_keyword(decl.modifiers.access()));
    ctx.write(" ");
    if !decl.is_interface() {
        if decl.modifiers.is_final() {
            ctx.write("sealed ");
        }
        if decl.modifiers.is_abstract() {
            ctx.write("abstract ");
        }
    }
    ctx.match_and_write(if decl.is_interface() { "interface" } else { "class" })?;
    ctx.copy_space()?;
    ctx.match_and_write(&decl.name.name)?;

    let mut constraints = Vec::new();
    if decl.is_generic() {
        ctx.copy_space()?;
        constraints = type_params(ctx, &decl.type_params)?;
    }
    common::supertypes(ctx, decl)?;
    write_constraints(ctx, &constraints);

    ctx.copy_space()?;
    ctx.match_and_write("{")?;
    for member in &decl.members {
        ctx.copy_space()?;
        write_member(ctx, member)?;
    }
    ctx.copy_space()?;
    ctx.match_and_write("}")
}

/// `<T, U>` in place of `<T extends B, U>`, returning `T : B` constraints.
fn type_params(ctx: &mut UnitContext<'_>, params: &[TypeParam]) -> Result<Vec<String>> {
    ctx.match_and_write("<")?;
    let mut constraints = Vec::new();
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            ctx.copy_space()?;
            ctx.match_and_write(",")?;
        }
        ctx.copy_space()?;
        ctx.match_and_write(&param.name.name)?;
        if let Some(constraint) = constraint(ctx, param)? {
            constraints.push(constraint);
            ctx.skip_to(param.span.end)?;
        }
    }
    ctx.copy_space()?;
    ctx.match_and_write(">")?;
    Ok(constraints)
}

fn constraint(ctx: &mut UnitContext<'_>, param: &TypeParam) -> Result<Option<String>> {
    if param.bounds.is_empty() {
        return Ok(None);
    }
    let mut bounds = Vec::with_capacity(param.bounds.len());
    for bound in &param.bounds {
        bounds.push(ctx.types.render_name(bound)?);
    }
    Ok(Some(format!("{} : {}", param.name.name, bounds.join(", "))))
}

fn write_constraints(ctx: &mut UnitContext<'_>, constraints: &[String]) {
    for constraint in constraints {
        ctx.write(&format!(" where {constraint}"));
    }
}

pub fn write_member(ctx: &mut UnitContext<'_>, member: &Member) -> Result<()> {
    match member {
        Member::Field(field) => field_decl(ctx, field),
        Member::Method(method) => method_decl(ctx, method),
        Member::Type(nested) => write_type_decl(ctx, nested),
    }
}

fn field_decl(ctx: &mut UnitContext<'_>, field: &FieldDecl) -> Result<()> {
    if ctx.in_interface() {
        return Err(TranslateError::unsupported("field declared in an interface", field.span));
    }
    ctx.skip_modifiers(&field.modifiers)?;
    ctx.write(access_keyword(field.modifiers.access()));
    ctx.write(" ");
    if field.modifiers.is_static() {
        ctx.write("static ");
    }
    if field.modifiers.is_final() {
        ctx.write("readonly ");
    }
    let forced = common::field_reference_kind(ctx, field);
    ctx.write_type_as(&field.ty, DeclarationSite::Field, forced)?;
    common::fragments(ctx, &field.fragments)?;
    common::end_statement(ctx)
}

fn method_decl(ctx: &mut UnitContext<'_>, method: &MethodDecl) -> Result<()> {
    let wildcards = wildcard_params(method)?;
    ctx.types.set_wildcard_names(
        wildcards
            .iter()
            .map(|w| (w.span, w.name.clone()))
            .collect(),
    );
    let result = method_signature_and_body(ctx, method, &wildcards);
    ctx.types.clear_wildcard_names();
    result
}

/// A wildcard in a parameter type, turned into a method type parameter.
struct WildcardParam {
    span: Span,
    name: SmolStr,
    bound: Option<TypeNode>,
}

fn wildcard_params(method: &MethodDecl) -> Result<Vec<WildcardParam>> {
    let mut found = Vec::new();
    for param in &method.params {
        for wildcard in param.ty.wildcards() {
            if method.is_constructor() {
                return Err(TranslateError::unsupported(
                    "generic wildcard in a constructor parameter",
                    wildcard.span,
                ));
            }
            let TypeNodeKind::Wildcard { bound } = &wildcard.kind else {
                continue;
            };
            let bound = match bound {
                Some(b) if b.kind == BoundKind::Lower => {
                    return Err(TranslateError::unsupported(
                        "generic wildcard with a lower bound (`? super T`)",
                        wildcard.span,
                    ));
                }
                Some(b) => Some((*b.ty).clone()),
                None => None,
            };
            found.push(WildcardParam {
                span: wildcard.span,
                name: SmolStr::new(format!("TWildcard{}", found.len() + 1)),
                bound,
            });
        }
    }
    Ok(found)
}

fn is_finalizer(method: &MethodDecl) -> bool {
    method.is_nullary("finalize")
        && method
            .return_type
            .as_ref()
            .is_some_and(|t| t.is_void())
}

fn method_signature_and_body(
    ctx: &mut UnitContext<'_>,
    method: &MethodDecl,
    wildcards: &[WildcardParam],
) -> Result<()> {
    let in_interface = ctx.in_interface();
    let finalizer = is_finalizer(method);
    ctx.skip_modifiers(&method.modifiers)?;
    if !in_interface && !finalizer {
        ctx.write(access_keyword(method.modifiers.access()));
        ctx.write(" ");
    }
    let mut overrides = false;
    if !in_interface && !method.is_constructor() && !finalizer {
        let overridability = classify(ctx.bindings(), method);
        overrides = overridability.overrides();
        ctx.write(overridability_keyword(overridability));
    }

    // Method type parameters move from before the return type to after the name.
    let mut generics: Vec<String> = method.type_params.iter().map(|p| p.name.name.to_string()).collect();
    let mut constraints = Vec::new();
    if let Some(last) = method.type_params.last() {
        for param in &method.type_params {
            if let Some(constraint) = constraint(ctx, param)? {
                constraints.push(constraint);
            }
        }
        ctx.match_token("<")?;
        ctx.skip_to(last.span.end)?;
        ctx.skip_space()?;
        ctx.match_token(">")?;
        ctx.skip_space()?;
    }
    for wildcard in wildcards {
        generics.push(wildcard.name.to_string());
        if let Some(bound) = &wildcard.bound {
            let bound = ctx.types.render_name(bound)?;
            constraints.push(format!("{} : {}", wildcard.name, bound));
        }
    }

    match &method.return_type {
        Some(return_type) if finalizer => {
            ctx.skip_to(return_type.span.end)?;
            ctx.skip_space()?;
            let class_name = ctx
                .current_type()
                .map(|scope| scope.name.to_string())
                .unwrap_or_default();
            ctx.match_and_write_as("finalize", &format!("~{class_name}"))?;
        }
        Some(return_type) => {
            ctx.write_type(return_type, DeclarationSite::ReturnType)?;
            ctx.copy_space()?;
            match root_method_name(ctx, &method.name.name, method.params.len(), method.binding) {
                Some(renamed) => ctx.match_and_write_as(&method.name.name, renamed)?,
                None => ctx.match_and_write(&method.name.name)?,
            }
        }
        None => ctx.match_and_write(&method.name.name)?,
    }
    if !generics.is_empty() {
        ctx.write(&format!("<{}>", generics.join(", ")));
    }

    ctx.copy_space()?;
    common::params(ctx, &method.params, "params ")?;
    let thrown = common::skip_throws(ctx, &method.throws)?;
    if !thrown.is_empty() {
        ctx.write(&format!(" /* throws {} */", thrown.join(", ")));
    }
    // Overrides inherit the constraints of the method they override.
    if !overrides {
        write_constraints(ctx, &constraints);
    }

    let Some(body) = &method.body else {
        ctx.copy_space()?;
        return ctx.match_and_write(";");
    };
    if let Some(call) = common::constructor_call(Some(body)) {
        match &call.kind {
            StmtKind::SuperConstructorCall { args } => {
                ctx.write(" : base");
                common::replay_constructor_args(ctx, call, "super", args)?;
            }
            StmtKind::ThisConstructorCall { args } => {
                ctx.write(" : this");
                common::replay_constructor_args(ctx, call, "this", args)?;
            }
            _ => {}
        }
    }
    ctx.copy_space()?;
    common::block(ctx, body, true)
}
