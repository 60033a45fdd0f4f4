use crate::bindings::TypeId;
use crate::expr::Ident;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use xlate_common::Span;

/// Built-in value types of the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    Void,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 9] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Short,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Char,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::Void,
    ];

    /// The keyword as written in source.
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Void => "void",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.keyword() == keyword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundKind {
    /// `? extends T`
    Upper,
    /// `? super T`
    Lower,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WildcardBound {
    pub kind: BoundKind,
    pub ty: Box<TypeNode>,
}

/// A type as written at a usage site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeNode {
    pub kind: TypeNodeKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeNodeKind {
    Primitive(PrimitiveKind),
    /// A class or interface name, possibly qualified in source.
    Named {
        name: SmolStr,
        #[serde(default)]
        binding: Option<TypeId>,
    },
    /// A reference to a generic type parameter in scope.
    Variable { name: SmolStr },
    Parameterized {
        base: Box<TypeNode>,
        args: Vec<TypeNode>,
    },
    Array {
        element: Box<TypeNode>,
        dimensions: u32,
    },
    Wildcard {
        #[serde(default)]
        bound: Option<WildcardBound>,
    },
}

impl TypeNode {
    pub fn new(kind: TypeNodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeNodeKind::Primitive(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeNodeKind::Primitive(PrimitiveKind::Void))
    }

    /// Binding of the named type at the root of this usage, if any.
    pub fn binding(&self) -> Option<TypeId> {
        match &self.kind {
            TypeNodeKind::Named { binding, .. } => *binding,
            TypeNodeKind::Parameterized { base, .. } => base.binding(),
            _ => None,
        }
    }

    /// Visit every wildcard nested anywhere in this usage, outermost first.
    pub fn wildcards(&self) -> Vec<&TypeNode> {
        let mut found = Vec::new();
        self.collect_wildcards(&mut found);
        found
    }

    fn collect_wildcards<'a>(&'a self, found: &mut Vec<&'a TypeNode>) {
        match &self.kind {
            TypeNodeKind::Wildcard { .. } => found.push(self),
            TypeNodeKind::Parameterized { base, args } => {
                base.collect_wildcards(found);
                for arg in args {
                    arg.collect_wildcards(found);
                }
            }
            TypeNodeKind::Array { element, .. } => element.collect_wildcards(found),
            _ => {}
        }
    }
}

/// A generic type parameter declaration, `T extends Bound`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeParam {
    pub name: Ident,
    #[serde(default)]
    pub bounds: Vec<TypeNode>,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, start: u32) -> TypeNode {
        TypeNode::new(
            TypeNodeKind::Named {
                name: name.into(),
                binding: None,
            },
            Span::new(start, start + name.len() as u32),
        )
    }

    #[test]
    fn test_wildcards_found_in_nested_arguments() {
        // Map<String, List<? extends Item>>
        let inner_wildcard = TypeNode::new(
            TypeNodeKind::Wildcard {
                bound: Some(WildcardBound {
                    kind: BoundKind::Upper,
                    ty: Box::new(named("Item", 29)),
                }),
            },
            Span::new(19, 33),
        );
        let list = TypeNode::new(
            TypeNodeKind::Parameterized {
                base: Box::new(named("List", 14)),
                args: vec![inner_wildcard],
            },
            Span::new(14, 34),
        );
        let map = TypeNode::new(
            TypeNodeKind::Parameterized {
                base: Box::new(named("Map", 0)),
                args: vec![named("String", 4), list],
            },
            Span::new(0, 35),
        );

        let wildcards = map.wildcards();
        assert_eq!(wildcards.len(), 1);
        assert_eq!(wildcards[0].span, Span::new(19, 33));
    }

    #[test]
    fn test_primitive_keywords_round_trip() {
        for p in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::from_keyword(p.keyword()), Some(p));
        }
    }
}
