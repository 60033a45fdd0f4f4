//! C++ statement rules.

use crate::context::UnitContext;
use crate::error::{Result, TranslateError};
use crate::writers::common;
use xlate_ast::{Stmt, StmtKind};
use xlate_config::DeclarationSite;

pub fn write_stmt(ctx: &mut UnitContext<'_>, stmt: &Stmt) -> Result<()> {
    match &stmt.kind {
        StmtKind::Block(block) => common::block(ctx, block, false),
        StmtKind::Local(local) => {
            common::local_var(ctx, local)?;
            common::end_statement(ctx)
        }
        StmtKind::Expr(expr) => common::expr_stmt(ctx, expr),
        StmtKind::If {
            cond,
            then_stmt,
            else_stmt,
        } => common::if_stmt(ctx, cond, then_stmt, else_stmt.as_deref()),
        StmtKind::While { cond, body } => common::while_stmt(ctx, cond, body),
        StmtKind::DoWhile { body, cond } => common::do_while(ctx, body, cond),
        StmtKind::For {
            init,
            cond,
            updates,
            body,
        } => common::for_stmt(ctx, init.as_ref(), cond.as_ref(), updates, body),
        // Arrays and collections are held by pointer; iterate the pointee.
        StmtKind::ForEach { var, iterable, body } => common::for_each(
            ctx,
            "for",
            var,
            DeclarationSite::ArrayElement,
            ":",
            "*",
            iterable,
            body,
        ),
        StmtKind::Return(value) => common::return_stmt(ctx, value.as_ref()),
        StmtKind::Break => common::jump(ctx, "break"),
        StmtKind::Continue => common::jump(ctx, "continue"),
        StmtKind::Throw(value) => common::throw_stmt(ctx, value),
        StmtKind::Empty => ctx.match_and_write(";"),
        StmtKind::Try {
            body,
            catches,
            finally,
        } => {
            if let Some(finally) = finally {
                return Err(TranslateError::unsupported("`finally` block", finally.span));
            }
            common::try_catches(ctx, body, catches)
        }
        StmtKind::Switch { selector, groups } => {
            common::switch_head(ctx, selector)?;
            for group in groups {
                common::switch_group(ctx, group)?;
            }
            ctx.copy_space()?;
            ctx.match_and_write("}")
        }
        StmtKind::Synchronized { .. } => Err(TranslateError::unsupported(
            "`synchronized` block",
            stmt.span,
        )),
        StmtKind::SuperConstructorCall { .. } | StmtKind::ThisConstructorCall { .. } => {
            Err(common::misplaced_constructor_call(stmt))
        }
    }
}
