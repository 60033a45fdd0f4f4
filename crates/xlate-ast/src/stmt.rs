use crate::expr::{Expr, Ident};
use crate::item::Param;
use crate::modifiers::Modifiers;
use crate::types::TypeNode;
use serde::{Deserialize, Serialize};
use xlate_common::Span;

/// `{ statements }`; the span includes both braces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// One declarator of a variable or field declaration: `name[] = init`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarFragment {
    pub name: Ident,
    /// Trailing `[]` pairs after the name.
    #[serde(default)]
    pub extra_dimensions: u32,
    #[serde(default)]
    pub init: Option<Expr>,
    pub span: Span,
}

/// `final T a = 1, b;` without the trailing semicolon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalVar {
    #[serde(default)]
    pub modifiers: Modifiers,
    pub ty: TypeNode,
    pub fragments: Vec<VarFragment>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForInit {
    Local(LocalVar),
    Exprs(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    pub param: Param,
    pub body: Block,
    pub span: Span,
}

/// `case expr:` or `default:`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchLabel {
    #[serde(default)]
    pub value: Option<Expr>,
    pub span: Span,
}

/// Consecutive labels followed by the statements they share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchGroup {
    pub labels: Vec<SwitchLabel>,
    #[serde(default)]
    pub statements: Vec<Stmt>,
}

/// A statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    Block(Block),
    Local(LocalVar),
    /// Expression statement; the span includes the semicolon.
    Expr(Expr),
    If {
        cond: Expr,
        then_stmt: Box<Stmt>,
        #[serde(default)]
        else_stmt: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
    },
    For {
        #[serde(default)]
        init: Option<ForInit>,
        #[serde(default)]
        cond: Option<Expr>,
        #[serde(default)]
        updates: Vec<Expr>,
        body: Box<Stmt>,
    },
    /// `for (T x : iterable) body`
    ForEach {
        var: Param,
        iterable: Expr,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
    Break,
    Continue,
    Throw(Expr),
    Empty,
    Try {
        body: Block,
        #[serde(default)]
        catches: Vec<CatchClause>,
        #[serde(default)]
        finally: Option<Block>,
    },
    Switch {
        selector: Expr,
        groups: Vec<SwitchGroup>,
    },
    Synchronized {
        lock: Expr,
        body: Block,
    },
    /// `super(args);` as the first statement of a constructor.
    SuperConstructorCall { args: Vec<Expr> },
    /// `this(args);` as the first statement of a constructor.
    ThisConstructorCall { args: Vec<Expr> },
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_constructor_call(&self) -> bool {
        matches!(
            self.kind,
            StmtKind::SuperConstructorCall { .. } | StmtKind::ThisConstructorCall { .. }
        )
    }

    /// Whether control can never reach the statement following this one.
    pub fn ends_abruptly(&self) -> bool {
        match &self.kind {
            StmtKind::Return(_) | StmtKind::Break | StmtKind::Continue | StmtKind::Throw(_) => true,
            StmtKind::Block(block) => block.statements.last().is_some_and(Stmt::ends_abruptly),
            StmtKind::If {
                then_stmt,
                else_stmt: Some(else_stmt),
                ..
            } => then_stmt.ends_abruptly() && else_stmt.ends_abruptly(),
            _ => false,
        }
    }
}

impl Block {
    pub fn new(statements: Vec<Stmt>, span: Span) -> Self {
        Self { statements, span }
    }
}

impl SwitchGroup {
    /// A non-empty group whose last statement lets control run into the next group.
    pub fn falls_through(&self) -> bool {
        self.statements
            .last()
            .is_some_and(|last| !last.ends_abruptly())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(kind: StmtKind) -> Stmt {
        Stmt::new(kind, Span::default())
    }

    #[test]
    fn test_ends_abruptly_through_blocks_and_ifs() {
        let ret = stmt(StmtKind::Return(None));
        let block = stmt(StmtKind::Block(Block::new(vec![stmt(StmtKind::Empty), ret.clone()], Span::default())));
        assert!(block.ends_abruptly());

        let cond = crate::expr::Expr::new(
            crate::expr::ExprKind::Literal(crate::expr::Literal {
                kind: crate::expr::LiteralKind::Boolean,
            }),
            Span::default(),
        );
        let half = stmt(StmtKind::If {
            cond: cond.clone(),
            then_stmt: Box::new(ret.clone()),
            else_stmt: None,
        });
        assert!(!half.ends_abruptly());

        let both = stmt(StmtKind::If {
            cond,
            then_stmt: Box::new(ret.clone()),
            else_stmt: Some(Box::new(stmt(StmtKind::Break))),
        });
        assert!(both.ends_abruptly());
    }

    #[test]
    fn test_empty_group_does_not_fall_through() {
        let group = SwitchGroup {
            labels: vec![],
            statements: vec![],
        };
        assert!(!group.falls_through());

        let group = SwitchGroup {
            labels: vec![],
            statements: vec![stmt(StmtKind::Empty)],
        };
        assert!(group.falls_through());
    }
}
