//! Swift expression rules.

use super::zero_value;
use crate::context::UnitContext;
use crate::dispatch::write_stmt;
use crate::error::{Result, TranslateError};
use crate::writers::common;
use xlate_ast::{
    AnonymousClass, ArrayInit, Expr, ExprKind, ExprType, LiteralKind, NewArray, NewObject, PrefixOp, TypeNode,
};
use xlate_common::Span;
use xlate_config::DeclarationSite;

pub fn write_expr(ctx: &mut UnitContext<'_>, expr: &Expr) -> Result<()> {
    match &expr.kind {
        ExprKind::Literal(literal) => self::literal(ctx, literal.kind, expr.span),
        ExprKind::Name { ident, binding } => common::name(ctx, ident, *binding),
        ExprKind::FieldAccess { target, name } => {
            common::qualifier(ctx, target, ".")?;
            if target.ty == Some(ExprType::Array) && name.as_str() == "length" {
                ctx.match_and_write_as("length", "count")
            } else {
                ctx.match_and_write(&name.name)
            }
        }
        ExprKind::This => ctx.match_and_write_as("this", "self"),
        ExprKind::Infix {
            op,
            left,
            right,
            extended,
        } => common::infix(ctx, *op, left, right, extended),
        ExprKind::Prefix {
            op: PrefixOp::Increment | PrefixOp::Decrement,
            ..
        }
        | ExprKind::Postfix { .. } => Err(TranslateError::unsupported(
            "increment or decrement used as a value",
            expr.span,
        )),
        ExprKind::Prefix { op, operand } => common::prefix(ctx, *op, operand),
        ExprKind::Assign { op, lhs, rhs } => common::assign(ctx, *op, lhs, rhs, expr.span),
        ExprKind::Call {
            receiver, name, args, ..
        } => {
            if let Some(receiver) = receiver {
                common::qualifier(ctx, receiver, ".")?;
            }
            ctx.match_and_write(&name.name)?;
            common::args(ctx, args)
        }
        ExprKind::SuperCall { name, args, .. } => {
            ctx.match_and_write("super")?;
            ctx.copy_space()?;
            ctx.match_and_write(".")?;
            ctx.copy_space()?;
            ctx.match_and_write(&name.name)?;
            common::args(ctx, args)
        }
        ExprKind::New(new) => new_object(ctx, new, expr.span),
        ExprKind::NewArray(array) => new_array(ctx, array, expr.span),
        ExprKind::ArrayInit(init) => array_literal(ctx, init),
        ExprKind::Index { array, index } => {
            write_expr(ctx, array)?;
            ctx.copy_space()?;
            ctx.match_and_write("[")?;
            ctx.copy_space()?;
            ctx.write("Int(");
            write_expr(ctx, index)?;
            ctx.write(")");
            ctx.copy_space()?;
            ctx.match_and_write("]")
        }
        ExprKind::Cast { ty, expr: inner } => cast(ctx, ty, inner),
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

fn literal(ctx: &mut UnitContext<'_>, kind: LiteralKind, span: Span) -> Result<()> {
    let text = ctx.source(span);
    match kind {
        LiteralKind::Null => ctx.match_and_write_as("null", "nil"),
        LiteralKind::Char => {
            let code = char_code(text)
                .ok_or_else(|| TranslateError::unsupported("unrecognized character literal", span))?;
            ctx.replace_span(span, &code.to_string())
        }
        LiteralKind::Long | LiteralKind::Float | LiteralKind::Double => {
            let trimmed = strip_numeric_suffix(text, kind);
            ctx.replace_span(span, trimmed)
        }
        LiteralKind::String if text.contains("\\u") => {
            let converted = unicode_escapes(text);
            ctx.replace_span(span, &converted)
        }
        _ => ctx.copy_to(span.end),
    }
}

/// Swift has no character literals of the source's kind; chars are `UInt16`
/// code units, written as numbers.
fn char_code(text: &str) -> Option<u32> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let Some(escape) = inner.strip_prefix('\\') else {
        let mut chars = inner.chars();
        let c = chars.next()?;
        return chars.next().is_none().then_some(c as u32);
    };
    match escape {
        "n" => Some(10),
        "t" => Some(9),
        "r" => Some(13),
        "b" => Some(8),
        "f" => Some(12),
        "0" => Some(0),
        "'" => Some(39),
        "\"" => Some(34),
        "\\" => Some(92),
        _ => {
            let hex = escape.trim_start_matches('u');
            if hex.len() == escape.len() {
                return u32::from_str_radix(escape, 8).ok();
            }
            u32::from_str_radix(hex, 16).ok()
        }
    }
}

fn strip_numeric_suffix(text: &str, kind: LiteralKind) -> &str {
    let suffixes: &[char] = match kind {
        LiteralKind::Long => &['L', 'l'],
        LiteralKind::Float => &['F', 'f'],
        LiteralKind::Double => &['D', 'd'],
        _ => &[],
    };
    // Hex literals may legitimately end in `d`/`f`.
    if text.starts_with("0x") || text.starts_with("0X") {
        return text.strip_suffix(['L', 'l']).unwrap_or(text);
    }
    text.strip_suffix(suffixes).unwrap_or(text)
}

/// `\u0041` becomes `\u{0041}`.
fn unicode_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut rest = text;
    while let Some(pos) = rest.find("\\u") {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let digits = after.bytes().take_while(u8::is_ascii_hexdigit).count().min(4);
        if digits == 4 {
            out.push_str(&format!("\\u{{{}}}", &after[..4]));
            rest = &after[4..];
        } else {
            out.push_str("\\u");
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

fn new_object(ctx: &mut UnitContext<'_>, new: &NewObject, span: Span) -> Result<()> {
    if new.outer.is_some() {
        return Err(TranslateError::unsupported(
            "inner class instantiation through an enclosing instance (`outer.new T()`)",
            span,
        ));
    }
    if let Some(body) = &new.body {
        return closure(ctx, new, body);
    }
    ctx.match_token("new")?;
    ctx.skip_space()?;
    ctx.write_type_name(&new.ty)?;
    common::args(ctx, &new.args)
}

/// `{ (a: T) -> R in ... }` for an anonymous implementation of a
/// single-method interface.
fn closure(ctx: &mut UnitContext<'_>, new: &NewObject, anonymous: &AnonymousClass) -> Result<()> {
    let method = common::functional_method(ctx, new, anonymous)?;
    let Some(body) = &method.body else {
        return Err(TranslateError::Internal("functional method without a body".to_string()));
    };
    let mut params = Vec::with_capacity(method.params.len());
    for param in &method.params {
        let ty = ctx.types.resolve(&param.ty, DeclarationSite::Parameter)?;
        params.push(format!("{}: {}", param.name.name, ty.text));
    }
    let returns = match &method.return_type {
        Some(ty) if !ty.is_void() => {
            let ty = ctx.types.resolve(ty, DeclarationSite::ReturnType)?;
            format!(" -> {}", ty.text)
        }
        _ => String::new(),
    };

    ctx.skip_to(body.span.start)?;
    ctx.match_token("{")?;
    ctx.write(&format!("{{ ({}){} in", params.join(", "), returns));
    for stmt in &body.statements {
        ctx.copy_space()?;
        write_stmt(ctx, stmt)?;
    }
    ctx.copy_space()?;
    ctx.match_and_write("}")?;
    ctx.skip_to(anonymous.span.end)
}

/// `[T](repeating: 0, count: Int(n))` for a primitive element type.
fn new_array(ctx: &mut UnitContext<'_>, array: &NewArray, span: Span) -> Result<()> {
    if let Some(init) = &array.initializer {
        ctx.skip_to(init.span.start)?;
        return array_literal(ctx, init);
    }
    let (element, length) = common::single_dimension(array, span)?;
    let Some(zero) = zero_value(element) else {
        return Err(TranslateError::unsupported(
            "array creation of a reference element type without an initializer",
            span,
        ));
    };
    let element_type = ctx.types.resolve(element, DeclarationSite::ArrayElement)?;
    ctx.match_token("new")?;
    ctx.skip_space()?;
    ctx.skip_to(element.span.end)?;
    ctx.skip_space()?;
    ctx.match_token("[")?;
    ctx.skip_space()?;
    ctx.write(&format!("[{}](repeating: {zero}, count: Int(", element_type.text));
    write_expr(ctx, length)?;
    ctx.skip_space()?;
    ctx.match_token("]")?;
    ctx.write("))");
    Ok(())
}

/// `[a, b]` in place of `{a, b}`.
fn array_literal(ctx: &mut UnitContext<'_>, init: &ArrayInit) -> Result<()> {
    ctx.match_and_write_as("{", "[")?;
    common::list(ctx, &init.elements)?;
    ctx.copy_space()?;
    if ctx.looking_at(",") {
        ctx.match_and_write(",")?;
        ctx.copy_space()?;
    }
    ctx.match_and_write_as("}", "]")
}

/// `Int32(x)` for primitive conversions, `(x as! T)` for downcasts.
fn cast(ctx: &mut UnitContext<'_>, ty: &TypeNode, inner: &Expr) -> Result<()> {
    let target = if ty.is_primitive() {
        ctx.types.resolve(ty, DeclarationSite::LocalVariable)?.text
    } else {
        ctx.types.render_name(ty)?
    };
    ctx.match_token("(")?;
    ctx.skip_space()?;
    ctx.skip_to(ty.span.end)?;
    ctx.skip_space()?;
    ctx.match_token(")")?;
    ctx.skip_space()?;
    if ty.is_primitive() {
        ctx.write(&format!("{target}("));
        write_expr(ctx, inner)?;
        ctx.write(")");
    } else {
        ctx.write("(");
        write_expr(ctx, inner)?;
        ctx.write(&format!(" as! {target})"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_codes() {
        assert_eq!(char_code("'a'"), Some(97));
        assert_eq!(char_code("'\\n'"), Some(10));
        assert_eq!(char_code("'\\u0041'"), Some(65));
        assert_eq!(char_code("'\\''"), Some(39));
        assert_eq!(char_code("'ab'"), None);
    }

    #[test]
    fn test_numeric_suffixes_stripped() {
        assert_eq!(strip_numeric_suffix("10L", LiteralKind::Long), "10");
        assert_eq!(strip_numeric_suffix("1.5f", LiteralKind::Float), "1.5");
        assert_eq!(strip_numeric_suffix("0xFFL", LiteralKind::Long), "0xFF");
        assert_eq!(strip_numeric_suffix("0x1F", LiteralKind::Long), "0x1F");
    }

    #[test]
    fn test_unicode_escapes_braced() {
        assert_eq!(unicode_escapes("\"\\u0041b\""), "\"\\u{0041}b\"");
        assert_eq!(unicode_escapes("\"plain\""), "\"plain\"");
    }
}
