use crate::bindings::{MethodId, TypeId};
use crate::item::Member;
use crate::types::{PrimitiveKind, TypeNode};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use xlate_common::Span;

/// An identifier with its source span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    pub name: SmolStr,
    pub span: Span,
}

impl Ident {
    pub fn new(name: &str, span: Span) -> Self {
        Self {
            name: SmolStr::new(name),
            span,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfixOp {
    // Arithmetic
    Times,
    Divide,
    Remainder,
    Plus,
    Minus,
    // Shifts
    LeftShift,
    RightShiftSigned,
    RightShiftUnsigned,
    // Comparison
    Less,
    Greater,
    LessEquals,
    GreaterEquals,
    Equals,
    NotEquals,
    // Bitwise
    Xor,
    And,
    Or,
    // Logical
    ConditionalAnd,
    ConditionalOr,
}

impl InfixOp {
    /// The operator token as written in source.
    pub fn token(self) -> &'static str {
        match self {
            InfixOp::Times => "*",
            InfixOp::Divide => "/",
            InfixOp::Remainder => "%",
            InfixOp::Plus => "+",
            InfixOp::Minus => "-",
            InfixOp::LeftShift => "<<",
            InfixOp::RightShiftSigned => ">>",
            InfixOp::RightShiftUnsigned => ">>>",
            InfixOp::Less => "<",
            InfixOp::Greater => ">",
            InfixOp::LessEquals => "<=",
            InfixOp::GreaterEquals => ">=",
            InfixOp::Equals => "==",
            InfixOp::NotEquals => "!=",
            InfixOp::Xor => "^",
            InfixOp::And => "&",
            InfixOp::Or => "|",
            InfixOp::ConditionalAnd => "&&",
            InfixOp::ConditionalOr => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixOp {
    Increment,
    Decrement,
    Plus,
    Minus,
    Complement,
    Not,
}

impl PrefixOp {
    pub fn token(self) -> &'static str {
        match self {
            PrefixOp::Increment => "++",
            PrefixOp::Decrement => "--",
            PrefixOp::Plus => "+",
            PrefixOp::Minus => "-",
            PrefixOp::Complement => "~",
            PrefixOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostfixOp {
    Increment,
    Decrement,
}

impl PostfixOp {
    pub fn token(self) -> &'static str {
        match self {
            PostfixOp::Increment => "++",
            PostfixOp::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignOp {
    Assign,
    Plus,
    Minus,
    Times,
    Divide,
    Remainder,
    And,
    Or,
    Xor,
    LeftShift,
    RightShiftSigned,
    RightShiftUnsigned,
}

impl AssignOp {
    pub fn token(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Plus => "+=",
            AssignOp::Minus => "-=",
            AssignOp::Times => "*=",
            AssignOp::Divide => "/=",
            AssignOp::Remainder => "%=",
            AssignOp::And => "&=",
            AssignOp::Or => "|=",
            AssignOp::Xor => "^=",
            AssignOp::LeftShift => "<<=",
            AssignOp::RightShiftSigned => ">>=",
            AssignOp::RightShiftUnsigned => ">>>=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralKind {
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    Boolean,
    Null,
}

/// A literal; its spelling is the source text under the expression's span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub kind: LiteralKind,
}

/// What a simple name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameBinding {
    Local,
    Field { is_static: bool },
    Type(TypeId),
    Package,
    #[default]
    Unresolved,
}

/// Resolved category of an expression's static type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprType {
    Primitive(PrimitiveKind),
    Reference {
        #[serde(default)]
        binding: Option<TypeId>,
    },
    Array,
    Null,
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    #[serde(default)]
    pub ty: Option<ExprType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymousClass {
    pub members: Vec<Member>,
    /// From the opening to the closing brace.
    pub span: Span,
}

/// `{ a, b, c }` array initializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayInit {
    pub elements: Vec<Expr>,
    pub span: Span,
}

/// `new T(args)`, optionally with an enclosing instance or an anonymous body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewObject {
    #[serde(default)]
    pub outer: Option<Box<Expr>>,
    pub ty: TypeNode,
    #[serde(default)]
    pub args: Vec<Expr>,
    #[serde(default)]
    pub body: Option<AnonymousClass>,
}

/// `new T[n]` / `new T[] { ... }`; `ty` is the array type as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArray {
    pub ty: TypeNode,
    #[serde(default)]
    pub dimensions: Vec<Expr>,
    #[serde(default)]
    pub initializer: Option<ArrayInit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Literal(Literal),

    /// A simple name: local, field, or type.
    Name {
        ident: Ident,
        #[serde(default)]
        binding: NameBinding,
    },

    /// `target.name`, for both qualified names and field access.
    FieldAccess { target: Box<Expr>, name: Ident },

    This,

    /// `left op right op extended...`
    Infix {
        op: InfixOp,
        left: Box<Expr>,
        right: Box<Expr>,
        #[serde(default)]
        extended: Vec<Expr>,
    },

    Prefix { op: PrefixOp, operand: Box<Expr> },

    Postfix { op: PostfixOp, operand: Box<Expr> },

    Assign {
        op: AssignOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// `receiver.name(args)` or `name(args)`.
    Call {
        #[serde(default)]
        receiver: Option<Box<Expr>>,
        name: Ident,
        #[serde(default)]
        args: Vec<Expr>,
        #[serde(default)]
        binding: Option<MethodId>,
    },

    /// `super.name(args)`.
    SuperCall {
        name: Ident,
        #[serde(default)]
        args: Vec<Expr>,
        #[serde(default)]
        binding: Option<MethodId>,
    },

    New(NewObject),

    NewArray(NewArray),

    /// A bare `{ ... }` initializer in a declaration.
    ArrayInit(ArrayInit),

    Index { array: Box<Expr>, index: Box<Expr> },

    Cast { ty: TypeNode, expr: Box<Expr> },

    Conditional {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },

    Paren(Box<Expr>),

    InstanceOf { expr: Box<Expr>, ty: TypeNode },
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span, ty: None }
    }

    pub fn with_type(mut self, ty: ExprType) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn is_reference(&self) -> bool {
        matches!(
            self.ty,
            Some(ExprType::Reference { .. }) | Some(ExprType::Array)
        )
    }

    /// The type this expression names, when it is a bare type name used as a qualifier.
    pub fn names_type(&self) -> Option<TypeId> {
        match &self.kind {
            ExprKind::Name {
                binding: NameBinding::Type(id),
                ..
            } => Some(*id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_tokens() {
        assert_eq!(InfixOp::RightShiftUnsigned.token(), ">>>");
        assert_eq!(AssignOp::RightShiftUnsigned.token(), ">>>=");
        assert_eq!(PrefixOp::Complement.token(), "~");
        assert_eq!(PostfixOp::Decrement.token(), "--");
    }

    #[test]
    fn test_names_type_only_for_type_bindings() {
        let ty = Expr::new(
            ExprKind::Name {
                ident: Ident::new("Math", Span::new(0, 4)),
                binding: NameBinding::Type(TypeId(3)),
            },
            Span::new(0, 4),
        );
        let local = Expr::new(
            ExprKind::Name {
                ident: Ident::new("math", Span::new(0, 4)),
                binding: NameBinding::Local,
            },
            Span::new(0, 4),
        );
        assert_eq!(ty.names_type(), Some(TypeId(3)));
        assert_eq!(local.names_type(), None);
    }
}
