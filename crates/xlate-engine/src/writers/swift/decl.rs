//! Swift type and member declarations.

use super::{access_keyword, declarators, drop_semicolon, zero_value};
use crate::classify::{classify, Overridability};
use crate::context::UnitContext;
use crate::error::{Result, TranslateError};
use crate::writers::common;
use xlate_ast::{FieldDecl, Member, MethodDecl, Param, StmtKind, TypeDecl, TypeParam};
use xlate_config::{DeclarationSite, ReferenceKind};

pub fn write_type_decl(ctx: &mut UnitContext<'_>, decl: &TypeDecl) -> Result<()> {
    ctx.enter_type(decl);
    let result = type_decl(ctx, decl);
    ctx.exit_type();
    result
}

fn type_decl(ctx: &mut UnitContext<'_>, decl: &TypeDecl) -> Result<()> {
    if decl.is_interface() && decl.is_generic() {
        return Err(TranslateError::unsupported(
            "generic interface; protocols take associated types instead of parameters",
            decl.span,
        ));
    }
    ctx.skip_modifiers(&decl.modifiers)?;
    ctx.write(access_keyword(decl.modifiers.access()));
    if decl.is_interface() {
        ctx.match_and_write_as("interface", "protocol")?;
    } else {
        if decl.modifiers.is_final() {
            ctx.write("final ");
        }
        ctx.match_and_write("class")?;
    }
    ctx.copy_space()?;
    ctx.match_and_write(&decl.name.name)?;
    if decl.is_generic() {
        ctx.copy_space()?;
        type_params(ctx, &decl.type_params)?;
    }
    common::supertypes(ctx, decl)?;

    ctx.copy_space()?;
    ctx.match_and_write("{")?;
    for member in &decl.members {
        ctx.copy_space()?;
        write_member(ctx, member)?;
    }
    ctx.copy_space()?;
    ctx.match_and_write("}")
}

/// `<T: Bound, U>` in place of `<T extends Bound, U>`.
fn type_params(ctx: &mut UnitContext<'_>, params: &[TypeParam]) -> Result<()> {
    ctx.match_and_write("<")?;
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            ctx.copy_space()?;
            ctx.match_and_write(",")?;
        }
        ctx.copy_space()?;
        ctx.match_and_write(&param.name.name)?;
        if !param.bounds.is_empty() {
            let bounds = bounds(ctx, param)?;
            ctx.write(&format!(": {bounds}"));
            ctx.skip_to(param.span.end)?;
        }
    }
    ctx.copy_space()?;
    ctx.match_and_write(">")
}

fn bounds(ctx: &mut UnitContext<'_>, param: &TypeParam) -> Result<String> {
    let mut rendered = Vec::with_capacity(param.bounds.len());
    for bound in &param.bounds {
        rendered.push(ctx.types.render_name(bound)?);
    }
    Ok(rendered.join(" & "))
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
    let is_static = field.modifiers.is_static();
    let forced = common::field_reference_kind(ctx, field);
    let mut rendered = ctx.types.resolve_as(&field.ty, DeclarationSite::Field, forced)?;
    let weak = rendered.kind == ReferenceKind::WeakBackReference;
    let constant = field.modifiers.is_final() && !weak;

    ctx.skip_modifiers(&field.modifiers)?;
    ctx.write(access_keyword(field.modifiers.access()));
    if is_static {
        ctx.write("static ");
    }
    if let Some(prefix) = rendered.decl_prefix {
        ctx.write(prefix);
        ctx.write(" ");
    }
    ctx.write(if constant { "let" } else { "var" });
    ctx.skip_to(field.ty.span.end)?;

    // Uninitialized instance constants are assigned by an initializer.
    let implicit_default = match zero_value(&field.ty) {
        _ if constant && !is_static => None,
        Some(zero) => Some(format!(" = {zero}")),
        None => {
            if !weak {
                rendered.text.push('!');
            }
            None
        }
    };
    declarators(ctx, &field.fragments, &rendered, implicit_default.as_deref())?;
    drop_semicolon(ctx)
}

fn method_decl(ctx: &mut UnitContext<'_>, method: &MethodDecl) -> Result<()> {
    let in_protocol = ctx.in_interface();
    let class = classify(ctx.bindings(), method);
    ctx.skip_modifiers(&method.modifiers)?;
    if !in_protocol {
        ctx.write(access_keyword(method.modifiers.access()));
        ctx.write(member_keywords(class, method.modifiers.is_final()));
    } else if method.modifiers.is_static() {
        ctx.write("static ");
    }

    let mut generics = Vec::new();
    if let Some(last) = method.type_params.last() {
        for param in &method.type_params {
            if param.bounds.is_empty() {
                generics.push(param.name.name.to_string());
            } else {
                generics.push(format!("{}: {}", param.name.name, bounds(ctx, param)?));
            }
        }
        ctx.match_token("<")?;
        ctx.skip_to(last.span.end)?;
        ctx.skip_space()?;
        ctx.match_token(">")?;
        ctx.skip_space()?;
    }

    let mut returns = None;
    if let Some(return_type) = &method.return_type {
        if !return_type.is_void() {
            returns = Some(ctx.types.resolve(return_type, DeclarationSite::ReturnType)?.text);
        }
        ctx.skip_to(return_type.span.end)?;
        ctx.skip_space()?;
        ctx.write("func ");
        ctx.match_and_write(&method.name.name)?;
    } else {
        let delegates = common::constructor_call(method.body.as_ref())
            .is_some_and(|call| matches!(call.kind, StmtKind::ThisConstructorCall { .. }));
        if delegates {
            ctx.write("convenience ");
        }
        ctx.match_and_write_as(&method.name.name, "init")?;
    }
    if !generics.is_empty() {
        ctx.write(&format!("<{}>", generics.join(", ")));
    }

    ctx.copy_space()?;
    params(ctx, &method.params)?;
    if !common::skip_throws(ctx, &method.throws)?.is_empty() {
        ctx.write(" throws");
    }
    if let Some(returns) = returns {
        ctx.write(&format!(" -> {returns}"));
    }

    match &method.body {
        Some(body) => {
            ctx.copy_space()?;
            common::block(ctx, body, false)
        }
        None => {
            drop_semicolon(ctx)?;
            if !in_protocol {
                ctx.write(" { fatalError(\"abstract method\") }");
            }
            Ok(())
        }
    }
}

fn member_keywords(class: Overridability, is_final: bool) -> &'static str {
    match class {
        Overridability::Static => "static ",
        Overridability::Overriding | Overridability::AbstractOverriding => "override ",
        Overridability::SealedOverriding => "override final ",
        Overridability::NonVirtual if is_final => "final ",
        Overridability::NonVirtual
        | Overridability::Introducing
        | Overridability::Abstract
        | Overridability::VirtualByDefault => "",
    }
}

/// `(_ a: Int32, _ rest: T...)`; call sites pass arguments positionally.
fn params(ctx: &mut UnitContext<'_>, params: &[Param]) -> Result<()> {
    ctx.match_and_write("(")?;
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            ctx.copy_space()?;
            ctx.match_and_write(",")?;
        }
        ctx.copy_space()?;
        ctx.skip_modifiers(&param.modifiers)?;
        let rendered = ctx.types.resolve(&param.ty, DeclarationSite::Parameter)?;
        ctx.skip_to(param.ty.span.end)?;
        ctx.skip_space()?;
        let variadic = if param.is_varargs {
            ctx.match_token("...")?;
            ctx.skip_space()?;
            "..."
        } else {
            ""
        };
        ctx.write("_ ");
        ctx.match_and_write(&param.name.name)?;
        ctx.write(&format!(": {}{}", rendered.text, variadic));
    }
    ctx.copy_space()?;
    ctx.match_and_write(")")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_keywords() {
        assert_eq!(member_keywords(Overridability::SealedOverriding, true), "override final ");
        assert_eq!(member_keywords(Overridability::NonVirtual, true), "final ");
        assert_eq!(member_keywords(Overridability::NonVirtual, false), "");
        assert_eq!(member_keywords(Overridability::VirtualByDefault, false), "");
    }
}
