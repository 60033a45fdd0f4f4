//! C++ expression rules.

use crate::context::UnitContext;
use crate::error::{Result, TranslateError};
use crate::writers::common;
use xlate_ast::{Expr, ExprKind, ExprType, Ident, LiteralKind, NameBinding, NewArray, NewObject, TypeNode};
use xlate_common::Span;
use xlate_config::DeclarationSite;

pub fn write_expr(ctx: &mut UnitContext<'_>, expr: &Expr) -> Result<()> {
    match &expr.kind {
        ExprKind::Literal(literal) => write_literal(ctx, expr.span, literal.kind),
        ExprKind::Name { ident, binding } => common::name(ctx, ident, *binding),
        ExprKind::FieldAccess { target, name } => field_access(ctx, target, name),
        ExprKind::This => ctx.match_and_write("this"),
        ExprKind::Infix {
            op,
            left,
            right,
            extended,
        } => common::infix(ctx, *op, left, right, extended),
        ExprKind::Prefix { op, operand } => common::prefix(ctx, *op, operand),
        ExprKind::Postfix { op, operand } => common::postfix(ctx, *op, operand),
        ExprKind::Assign { op, lhs, rhs } => common::assign(ctx, *op, lhs, rhs, expr.span),
        ExprKind::Call {
            receiver,
            name,
            args,
            ..
        } => {
            if let Some(receiver) = receiver {
                common::qualifier(ctx, receiver, member_separator(receiver))?;
            }
            ctx.match_and_write(&name.name)?;
            common::args(ctx, args)
        }
        ExprKind::SuperCall { name, args, .. } => {
            ctx.match_and_write("super")?;
            ctx.copy_space()?;
            ctx.match_and_write_as(".", "::")?;
            ctx.copy_space()?;
            ctx.match_and_write(&name.name)?;
            common::args(ctx, args)
        }
        ExprKind::New(new) => new_object(ctx, new, expr.span),
        ExprKind::NewArray(array) => new_array(ctx, array, expr.span),
        ExprKind::ArrayInit(init) => Err(TranslateError::unsupported(
            "array initializer list",
            init.span,
        )),
        ExprKind::Index { array, index } => common::index(ctx, array, index, true),
        ExprKind::Cast { ty, expr: inner } => cast(ctx, ty, inner),
        ExprKind::Conditional {
            cond,
            then_expr,
            else_expr,
        } => common::conditional(ctx, cond, then_expr, else_expr),
        ExprKind::Paren(inner) => common::paren(ctx, inner),
        ExprKind::InstanceOf { expr: inner, ty } => instance_of(ctx, inner, ty),
    }
}

fn write_literal(ctx: &mut UnitContext<'_>, span: Span, kind: LiteralKind) -> Result<()> {
    let text = ctx.source(span);
    let rendered = match kind {
        LiteralKind::String | LiteralKind::Char => format!("u{text}"),
        LiteralKind::Null => "nullptr".to_string(),
        LiteralKind::Long => format!("{}LL", text.trim_end_matches(['l', 'L'])),
        _ => return ctx.copy_to(span.end),
    };
    ctx.replace_span(span, &rendered)
}

/// `::` after a type or package qualifier, `->` after anything else: every
/// other expression with members is a reference.
fn member_separator(target: &Expr) -> &'static str {
    if is_static_qualifier(target) {
        "::"
    } else {
        "->"
    }
}

fn is_static_qualifier(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Name {
            binding: NameBinding::Type(_) | NameBinding::Package,
            ..
        } => true,
        ExprKind::FieldAccess { target, .. } => {
            expr.ty.is_none() && is_static_qualifier(target)
        }
        _ => false,
    }
}

fn field_access(ctx: &mut UnitContext<'_>, target: &Expr, name: &Ident) -> Result<()> {
    common::qualifier(ctx, target, member_separator(target))?;
    if target.ty == Some(ExprType::Array) && name.as_str() == "length" {
        return ctx.match_and_write_as("length", "length()");
    }
    ctx.match_and_write(&name.name)
}

fn new_object(ctx: &mut UnitContext<'_>, new: &NewObject, span: Span) -> Result<()> {
    if new.outer.is_some() {
        return Err(TranslateError::unsupported(
            "inner class instantiation through an enclosing instance (`outer.new T()`)",
            span,
        ));
    }
    if let Some(body) = &new.body {
        return Err(TranslateError::unsupported("anonymous class", body.span));
    }
    ctx.match_token("new")?;
    ctx.skip_space()?;
    let name = ctx.types.render_name(&new.ty)?;
    ctx.replace_span(new.ty.span, &format!("std::make_shared<{name}>"))?;
    common::args(ctx, &new.args)
}

/// `new T[n]` becomes `std::make_shared<Array<T>>(n)`.
fn new_array(ctx: &mut UnitContext<'_>, array: &NewArray, span: Span) -> Result<()> {
    let (element, length) = common::single_dimension(array, span)?;
    let element_type = ctx.types.resolve(element, DeclarationSite::ArrayElement)?.text;
    let create = format!("std::make_shared<{}<{}>>(", ctx.policy.array_type, element_type);

    ctx.match_token("new")?;
    ctx.skip_space()?;
    ctx.skip_to(element.span.end)?;
    ctx.skip_space()?;
    ctx.match_token("[")?;
    ctx.write(&create);
    ctx.skip_space()?;
    write_expr(ctx, length)?;
    ctx.skip_space()?;
    ctx.match_and_write_as("]", ")")
}

fn cast(ctx: &mut UnitContext<'_>, ty: &TypeNode, inner: &Expr) -> Result<()> {
    let (function, target) = if ty.is_primitive() {
        let target = ctx.types.resolve(ty, DeclarationSite::LocalVariable)?.text;
        ("static_cast", target)
    } else {
        ("std::static_pointer_cast", ctx.types.render_name(ty)?)
    };
    ctx.match_token("(")?;
    ctx.skip_space()?;
    ctx.skip_to(ty.span.end)?;
    ctx.skip_space()?;
    ctx.match_token(")")?;
    ctx.skip_space()?;
    ctx.write(&format!("{function}<{target}>("));
    write_expr(ctx, inner)?;
    ctx.write(")");
    Ok(())
}

fn instance_of(ctx: &mut UnitContext<'_>, inner: &Expr, ty: &TypeNode) -> Result<()> {
    let target = ctx.types.render_name(ty)?;
    ctx.write(&format!("(std::dynamic_pointer_cast<{target}>("));
    write_expr(ctx, inner)?;
    ctx.skip_space()?;
    ctx.match_token("instanceof")?;
    ctx.skip_space()?;
    ctx.skip_to(ty.span.end)?;
    ctx.write(") != nullptr)");
    Ok(())
}
