//! C# statement rules.

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
        StmtKind::ForEach { var, iterable, body } => common::for_each(
            ctx,
            "foreach",
            var,
            DeclarationSite::LocalVariable,
            "in",
            "",
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
            common::try_catches(ctx, body, catches)?;
            if let Some(finally) = finally {
                ctx.copy_space()?;
                ctx.match_and_write("finally")?;
                ctx.copy_space()?;
                common::block(ctx, finally, false)?;
            }
            Ok(())
        }
        StmtKind::Switch { selector, groups } => {
            common::switch_head(ctx, selector)?;
            for (i, group) in groups.iter().enumerate() {
                let last = i + 1 == groups.len();
                if group.falls_through() && !last {
                    let span = group.labels.first().map(|l| l.span).unwrap_or(stmt.span);
                    return Err(TranslateError::unsupported(
                        "switch case that falls through into the next case",
                        span,
                    ));
                }
                common::switch_group(ctx, group)?;
                // C# requires every section to end in a jump, the last one included.
                if group.falls_through() || (last && group.statements.is_empty()) {
                    ctx.write(" break;");
                }
            }
            ctx.copy_space()?;
            ctx.match_and_write("}")
        }
        StmtKind::Synchronized { lock, body } => {
            ctx.match_and_write_as("synchronized", "lock")?;
            common::paren_condition(ctx, lock)?;
            ctx.copy_space()?;
            common::block(ctx, body, false)
        }
        StmtKind::SuperConstructorCall { .. } | StmtKind::ThisConstructorCall { .. } => {
            Err(common::misplaced_constructor_call(stmt))
        }
    }
}
