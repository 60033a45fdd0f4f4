//! C# expression rules.

use super::root_method_name;
use crate::context::UnitContext;
use crate::error::{Result, TranslateError};
use crate::writers::common;
use xlate_ast::{AnonymousClass, Expr, ExprKind, ExprType, NewArray, NewObject};
use xlate_common::Span;
use xlate_config::DeclarationSite;

pub fn write_expr(ctx: &mut UnitContext<'_>, expr: &Expr) -> Result<()> {
    match &expr.kind {
        ExprKind::Literal(_) => ctx.copy_to(expr.span.end),
        ExprKind::Name { ident, binding } => common::name(ctx, ident, *binding),
        ExprKind::FieldAccess { target, name } => {
            common::qualifier(ctx, target, ".")?;
            if target.ty == Some(ExprType::Array) && name.as_str() == "length" {
                ctx.match_and_write_as("length", "Length")
            } else {
                ctx.match_and_write(&name.name)
            }
        }
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
            binding,
        } => {
            if let Some(receiver) = receiver {
                common::qualifier(ctx, receiver, ".")?;
            }
            match root_method_name(ctx, &name.name, args.len(), *binding) {
                Some(renamed) => ctx.match_and_write_as(&name.name, renamed)?,
                None => ctx.match_and_write(&name.name)?,
            }
            common::args(ctx, args)
        }
        ExprKind::SuperCall {
            name,
            args,
            binding,
        } => {
            ctx.match_and_write_as("super", "base")?;
            ctx.copy_space()?;
            ctx.match_and_write(".")?;
            ctx.copy_space()?;
            match root_method_name(ctx, &name.name, args.len(), *binding) {
                Some(renamed) => ctx.match_and_write_as(&name.name, renamed)?,
                None => ctx.match_and_write(&name.name)?,
            }
            common::args(ctx, args)
        }
        ExprKind::New(new) => new_object(ctx, new, expr.span),
        ExprKind::NewArray(array) => new_array(ctx, array, expr.span),
        ExprKind::ArrayInit(init) => Err(TranslateError::unsupported(
            "array initializer list",
            init.span,
        )),
        ExprKind::Index { array, index } => common::index(ctx, array, index, false),
        ExprKind::Cast { ty, expr: inner } => {
            ctx.match_and_write("(")?;
            ctx.copy_space()?;
            ctx.write_type(ty, DeclarationSite::LocalVariable)?;
            ctx.copy_space()?;
            ctx.match_and_write(")")?;
            ctx.copy_space()?;
            write_expr(ctx, inner)
        }
        ExprKind::Conditional {
            cond,
            then_expr,
            else_expr,
        } => common::conditional(ctx, cond, then_expr, else_expr),
        ExprKind::Paren(inner) => common::paren(ctx, inner),
        ExprKind::InstanceOf { expr: inner, ty } => {
            write_expr(ctx, inner)?;
            ctx.copy_space()?;
            ctx.match_and_write_as("instanceof", "is")?;
            ctx.copy_space()?;
            ctx.write_type_name(ty)?;
            Ok(())
        }
    }
}

fn new_object(ctx: &mut UnitContext<'_>, new: &NewObject, span: Span) -> Result<()> {
    if new.outer.is_some() {
        return Err(TranslateError::unsupported(
            "inner class instantiation through an enclosing instance (`outer.new T()`)",
            span,
        ));
    }
    if let Some(body) = &new.body {
        return lambda(ctx, new, body);
    }
    ctx.match_and_write("new")?;
    ctx.copy_space()?;
    ctx.write_type_name(&new.ty)?;
    common::args(ctx, &new.args)
}

/// `new Iface() { R m(A a) { ... } }` becomes `(a) => { ... }`.
fn lambda(ctx: &mut UnitContext<'_>, new: &NewObject, anonymous: &AnonymousClass) -> Result<()> {
    let method = common::functional_method(ctx, new, anonymous)?;
    let Some(body) = &method.body else {
        return Err(TranslateError::Internal("functional method without a body".to_string()));
    };
    let params: Vec<&str> = method.params.iter().map(|p| p.name.as_str()).collect();
    ctx.skip_to(body.span.start)?;
    ctx.write(&format!("({}) => ", params.join(", ")));
    common::block(ctx, body, false)?;
    ctx.skip_to(anonymous.span.end)
}

fn new_array(ctx: &mut UnitContext<'_>, array: &NewArray, span: Span) -> Result<()> {
    let (element, length) = common::single_dimension(array, span)?;
    ctx.match_and_write("new")?;
    ctx.copy_space()?;
    ctx.write_type(element, DeclarationSite::ArrayElement)?;
    ctx.copy_space()?;
    ctx.match_and_write("[")?;
    ctx.copy_space()?;
    write_expr(ctx, length)?;
    ctx.copy_space()?;
    ctx.match_and_write("]")
}
