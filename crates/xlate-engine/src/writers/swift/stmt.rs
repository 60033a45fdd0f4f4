//! Swift statement rules. Terminators are dropped and every body is braced.

use super::{declarators, drop_semicolon};
use crate::context::UnitContext;
use crate::dispatch::{write_expr, write_stmt as dispatch_stmt};
use crate::error::{Result, TranslateError};
use crate::writers::common;
use xlate_ast::{
    Block, CatchClause, Expr, ExprKind, LocalVar, Param, PostfixOp, PrefixOp, Stmt, StmtKind, SwitchGroup,
};
use xlate_config::DeclarationSite;

pub fn write_stmt(ctx: &mut UnitContext<'_>, stmt: &Stmt) -> Result<()> {
    match &stmt.kind {
        StmtKind::Block(block) => common::block(ctx, block, false),
        StmtKind::Local(local) => {
            local_decl(ctx, local)?;
            drop_semicolon(ctx)
        }
        StmtKind::Expr(expr) => {
            expr_stmt(ctx, expr)?;
            drop_semicolon(ctx)
        }
        StmtKind::If {
            cond,
            then_stmt,
            else_stmt,
        } => {
            ctx.match_and_write("if")?;
            common::paren_condition(ctx, cond)?;
            ctx.copy_space()?;
            braced(ctx, then_stmt)?;
            if let Some(else_stmt) = else_stmt {
                ctx.copy_space()?;
                ctx.match_and_write("else")?;
                ctx.copy_space()?;
                if matches!(else_stmt.kind, StmtKind::If { .. }) {
                    dispatch_stmt(ctx, else_stmt)?;
                } else {
                    braced(ctx, else_stmt)?;
                }
            }
            Ok(())
        }
        StmtKind::While { cond, body } => {
            ctx.match_and_write("while")?;
            common::paren_condition(ctx, cond)?;
            ctx.copy_space()?;
            braced(ctx, body)
        }
        StmtKind::DoWhile { body, cond } => {
            ctx.match_and_write_as("do", "repeat")?;
            ctx.copy_space()?;
            braced(ctx, body)?;
            ctx.copy_space()?;
            ctx.match_and_write("while")?;
            common::paren_condition(ctx, cond)?;
            drop_semicolon(ctx)
        }
        StmtKind::For { .. } => Err(TranslateError::unsupported(
            "C-style `for` loop; rewrite it as `while` or an enhanced `for`",
            stmt.span,
        )),
        StmtKind::ForEach { var, iterable, body } => for_in(ctx, var, iterable, body),
        StmtKind::Return(value) => {
            ctx.match_and_write("return")?;
            if let Some(value) = value {
                ctx.copy_space()?;
                write_expr(ctx, value)?;
            }
            drop_semicolon(ctx)
        }
        StmtKind::Break => {
            ctx.match_and_write("break")?;
            drop_semicolon(ctx)
        }
        StmtKind::Continue => {
            ctx.match_and_write("continue")?;
            drop_semicolon(ctx)
        }
        StmtKind::Throw(value) => {
            ctx.match_and_write("throw")?;
            ctx.copy_space()?;
            write_expr(ctx, value)?;
            drop_semicolon(ctx)
        }
        StmtKind::Empty => ctx.match_token(";"),
        StmtKind::Try {
            body,
            catches,
            finally,
        } => {
            if let Some(finally) = finally {
                return Err(TranslateError::unsupported("`finally` block", finally.span));
            }
            do_catch(ctx, body, catches)
        }
        StmtKind::Switch { selector, groups } => switch(ctx, selector, groups),
        StmtKind::Synchronized { .. } => Err(TranslateError::unsupported("`synchronized` block", stmt.span)),
        StmtKind::SuperConstructorCall { args } => {
            ctx.match_and_write("super")?;
            ctx.write(".init");
            ctx.skip_space()?;
            common::args(ctx, args)?;
            drop_semicolon(ctx)
        }
        StmtKind::ThisConstructorCall { args } => {
            ctx.match_and_write_as("this", "self")?;
            ctx.write(".init");
            ctx.skip_space()?;
            common::args(ctx, args)?;
            drop_semicolon(ctx)
        }
    }
}

/// A body that may be a single statement in the source, wrapped in braces.
fn braced(ctx: &mut UnitContext<'_>, stmt: &Stmt) -> Result<()> {
    if matches!(stmt.kind, StmtKind::Block(_)) {
        return dispatch_stmt(ctx, stmt);
    }
    ctx.write("{ ");
    dispatch_stmt(ctx, stmt)?;
    ctx.write(" }");
    Ok(())
}

/// `var x: T = init`, or `let` for final locals.
fn local_decl(ctx: &mut UnitContext<'_>, local: &LocalVar) -> Result<()> {
    let rendered = ctx.types.resolve(&local.ty, DeclarationSite::LocalVariable)?;
    ctx.skip_modifiers(&local.modifiers)?;
    ctx.write(if local.modifiers.is_final() { "let" } else { "var" });
    ctx.skip_to(local.ty.span.end)?;
    declarators(ctx, &local.fragments, &rendered, None)
}

/// `x += 1` for a standalone increment; Swift has no `++`.
fn expr_stmt(ctx: &mut UnitContext<'_>, expr: &Expr) -> Result<()> {
    let step = |increment: bool| if increment { " += 1" } else { " -= 1" };
    match &expr.kind {
        ExprKind::Postfix { op, operand } => {
            write_expr(ctx, operand)?;
            ctx.skip_space()?;
            ctx.match_token(op.token())?;
            ctx.write(step(*op == PostfixOp::Increment));
            Ok(())
        }
        ExprKind::Prefix { op, operand } if matches!(op, PrefixOp::Increment | PrefixOp::Decrement) => {
            ctx.match_token(op.token())?;
            ctx.skip_space()?;
            write_expr(ctx, operand)?;
            ctx.write(step(*op == PrefixOp::Increment));
            Ok(())
        }
        _ => write_expr(ctx, expr),
    }
}

/// `for x in items` in place of `for (T x : items)`.
fn for_in(ctx: &mut UnitContext<'_>, var: &Param, iterable: &Expr, body: &Stmt) -> Result<()> {
    ctx.match_and_write("for")?;
    ctx.copy_space()?;
    ctx.match_token("(")?;
    ctx.skip_space()?;
    ctx.skip_modifiers(&var.modifiers)?;
    ctx.skip_to(var.ty.span.end)?;
    ctx.skip_space()?;
    ctx.match_and_write(&var.name.name)?;
    ctx.skip_space()?;
    ctx.match_token(":")?;
    ctx.skip_space()?;
    ctx.write(" in ");
    write_expr(ctx, iterable)?;
    ctx.skip_space()?;
    ctx.match_token(")")?;
    ctx.copy_space()?;
    braced(ctx, body)
}

/// `do { } catch let e as E { }`
fn do_catch(ctx: &mut UnitContext<'_>, body: &Block, catches: &[CatchClause]) -> Result<()> {
    ctx.match_and_write_as("try", "do")?;
    ctx.copy_space()?;
    common::block(ctx, body, false)?;
    for clause in catches {
        ctx.copy_space()?;
        ctx.match_and_write("catch")?;
        ctx.copy_space()?;
        ctx.match_token("(")?;
        ctx.skip_space()?;
        ctx.skip_modifiers(&clause.param.modifiers)?;
        let ty = ctx.types.render_name(&clause.param.ty)?;
        ctx.skip_to(clause.param.ty.span.end)?;
        ctx.skip_space()?;
        ctx.write("let ");
        ctx.match_and_write(&clause.param.name.name)?;
        ctx.write(&format!(" as {ty}"));
        ctx.skip_space()?;
        ctx.match_token(")")?;
        ctx.copy_space()?;
        common::block(ctx, &clause.body, false)?;
    }
    Ok(())
}

/// Swift cases never fall through and may not be empty: labels of one group
/// are merged, a trailing `break` is dropped, and an empty last case gets one.
fn switch(ctx: &mut UnitContext<'_>, selector: &Expr, groups: &[SwitchGroup]) -> Result<()> {
    common::switch_head(ctx, selector)?;
    for (i, group) in groups.iter().enumerate() {
        let last = i + 1 == groups.len();
        let span = group.labels.first().map(|l| l.span).unwrap_or(selector.span);
        if !last && (group.falls_through() || group.statements.is_empty()) {
            return Err(TranslateError::unsupported(
                "switch case that falls through into the next case",
                span,
            ));
        }
        let has_default = group.labels.iter().any(|l| l.value.is_none());
        if has_default && group.labels.len() > 1 {
            return Err(TranslateError::unsupported("`default` label sharing a case with other labels", span));
        }
        labels(ctx, group)?;
        statements(ctx, group)?;
    }
    ctx.copy_space()?;
    ctx.match_and_write("}")
}

fn labels(ctx: &mut UnitContext<'_>, group: &SwitchGroup) -> Result<()> {
    for (i, label) in group.labels.iter().enumerate() {
        match &label.value {
            Some(value) if i == 0 => {
                ctx.copy_space()?;
                ctx.match_and_write("case")?;
                ctx.copy_space()?;
                write_expr(ctx, value)?;
            }
            Some(value) => {
                ctx.skip_space()?;
                ctx.match_token("case")?;
                ctx.skip_space()?;
                ctx.write(", ");
                write_expr(ctx, value)?;
            }
            None => {
                ctx.copy_space()?;
                ctx.match_and_write("default")?;
            }
        }
        ctx.skip_space()?;
        ctx.match_token(":")?;
    }
    ctx.write(":");
    Ok(())
}

fn statements(ctx: &mut UnitContext<'_>, group: &SwitchGroup) -> Result<()> {
    let Some((tail, body)) = group.statements.split_last() else {
        ctx.write(" break");
        return Ok(());
    };
    for stmt in body {
        ctx.copy_space()?;
        dispatch_stmt(ctx, stmt)?;
    }
    if matches!(tail.kind, StmtKind::Break) && !body.is_empty() {
        ctx.skip_space()?;
        ctx.skip_to(tail.span.end)?;
    } else {
        ctx.copy_space()?;
        dispatch_stmt(ctx, tail)?;
    }
    Ok(())
}

