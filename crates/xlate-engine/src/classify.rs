//! Overridability classification.
//!
//! Decides, from resolved bindings alone, how a method relates to methods
//! declared by its superclasses. Interfaces are not walked: implementing an
//! interface method and overriding a superclass method are annotated
//! differently by every backend.

use rustc_hash::FxHashSet;
use xlate_ast::{AccessLevel, Bindings, MethodDecl, MethodId, MethodInfo, ModifierKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overridability {
    /// No resolved binding; nothing is known about inherited members.
    Introducing,
    /// Overrides a superclass method.
    Overriding,
    /// Overrides a superclass method and forbids further overriding.
    SealedOverriding,
    /// Body-less, overriding nothing.
    Abstract,
    /// Body-less and overriding a superclass method.
    AbstractOverriding,
    Static,
    /// Overridable by default in the source; must be made explicit.
    VirtualByDefault,
    NonVirtual,
}

impl Overridability {
    pub fn overrides(self) -> bool {
        matches!(
            self,
            Overridability::Overriding | Overridability::SealedOverriding | Overridability::AbstractOverriding
        )
    }

    pub fn is_abstract(self) -> bool {
        matches!(self, Overridability::Abstract | Overridability::AbstractOverriding)
    }
}

/// Classify a method declaration.
pub fn classify(bindings: &Bindings, method: &MethodDecl) -> Overridability {
    let Some(info) = method.binding.and_then(|id| bindings.method(id)) else {
        return Overridability::Introducing;
    };
    if method.is_constructor() || info.is_constructor {
        return Overridability::Introducing;
    }

    let has_body = method.body.is_some();
    let is_final = method.modifiers.is_final() || info.is_final;

    if find_overridden(bindings, info).is_some() {
        return if is_final {
            Overridability::SealedOverriding
        } else if !has_body {
            Overridability::AbstractOverriding
        } else {
            Overridability::Overriding
        };
    }

    if !has_body {
        return Overridability::Abstract;
    }
    if method.modifiers.is_static() || info.is_static {
        return Overridability::Static;
    }

    let type_is_final = bindings
        .type_info(info.declaring_type)
        .is_some_and(|t| t.is_final);
    let is_private = method.modifiers.has(&ModifierKind::Private) || info.access == AccessLevel::Private;
    if !type_is_final && !is_final && !is_private {
        Overridability::VirtualByDefault
    } else {
        Overridability::NonVirtual
    }
}

/// First superclass method (walking upwards) that `method` overrides.
pub fn find_overridden(bindings: &Bindings, method: &MethodInfo) -> Option<MethodId> {
    let mut visited = FxHashSet::default();
    visited.insert(method.declaring_type);

    let mut ancestor = bindings.superclass(method.declaring_type);
    while let Some(current) = ancestor {
        if !visited.insert(current) {
            tracing::warn!(
                method = %method.name,
                ty = current.0,
                "cycle in superclass chain; stopping override search"
            );
            return None;
        }
        for (id, candidate) in bindings.declared_methods(current) {
            if overrides(bindings, method, candidate) {
                return Some(id);
            }
        }
        ancestor = bindings.superclass(current);
    }
    None
}

/// Whether `method` overrides `candidate`, which is declared in one of its superclasses.
fn overrides(bindings: &Bindings, method: &MethodInfo, candidate: &MethodInfo) -> bool {
    if method.name != candidate.name || method.parameter_types != candidate.parameter_types {
        return false;
    }
    if method.is_static || candidate.is_static || candidate.is_constructor {
        return false;
    }
    match candidate.access {
        AccessLevel::Private => false,
        AccessLevel::PackagePrivate => {
            let package = |id| bindings.type_name(id).map(|n| &n.package);
            package(method.declaring_type) == package(candidate.declaring_type)
        }
        AccessLevel::Public | AccessLevel::Protected => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use xlate_ast::{
        Block, Ident, Modifier, Modifiers, PrimitiveKind, TypeId, TypeInfo, TypeName, TypeNode, TypeNodeKind,
    };
    use xlate_common::Span;

    fn method(binding: Option<MethodId>, modifiers: &[ModifierKind], has_body: bool) -> MethodDecl {
        MethodDecl {
            modifiers: Modifiers::new(
                modifiers
                    .iter()
                    .map(|kind| Modifier {
                        kind: kind.clone(),
                        span: Span::default(),
                    })
                    .collect(),
            ),
            type_params: Vec::new(),
            return_type: Some(TypeNode::new(TypeNodeKind::Primitive(PrimitiveKind::Void), Span::default())),
            name: Ident::new("run", Span::default()),
            params: Vec::new(),
            throws: Vec::new(),
            body: has_body.then(|| Block::new(Vec::new(), Span::default())),
            binding,
            span: Span::default(),
        }
    }

    struct Hierarchy {
        bindings: Bindings,
        base: TypeId,
        derived: TypeId,
    }

    fn hierarchy() -> Hierarchy {
        let mut bindings = Bindings::new();
        let base = bindings.add_type(TypeInfo::class(TypeName::parse("p.Base")));
        let mid = bindings.add_type(TypeInfo {
            superclass: Some(base),
            ..TypeInfo::class(TypeName::parse("p.Mid"))
        });
        let derived = bindings.add_type(TypeInfo {
            superclass: Some(mid),
            ..TypeInfo::class(TypeName::parse("p.Derived"))
        });
        bindings.add_method(MethodInfo::new("run", base, &["int"]));
        Hierarchy { bindings, base, derived }
    }

    #[test]
    fn test_override_found_two_levels_up() {
        let mut h = hierarchy();
        let id = h.bindings.add_method(MethodInfo::new("run", h.derived, &["int"]));
        let found = find_overridden(&h.bindings, h.bindings.method(id).unwrap()).unwrap();
        assert_eq!(h.bindings.method(found).unwrap().declaring_type, h.base);
        assert_eq!(classify(&h.bindings, &method(Some(id), &[], true)), Overridability::Overriding);
        assert_eq!(
            classify(&h.bindings, &method(Some(id), &[ModifierKind::Final], true)),
            Overridability::SealedOverriding
        );
        assert_eq!(
            classify(&h.bindings, &method(Some(id), &[ModifierKind::Abstract], false)),
            Overridability::AbstractOverriding
        );
    }

    #[test]
    fn test_no_match_classifications() {
        let mut h = hierarchy();
        let other = h.bindings.add_method(MethodInfo::new("run", h.derived, &["long"]));
        assert_eq!(
            classify(&h.bindings, &method(Some(other), &[], true)),
            Overridability::VirtualByDefault
        );
        assert_eq!(
            classify(&h.bindings, &method(Some(other), &[ModifierKind::Abstract], false)),
            Overridability::Abstract
        );
        assert_eq!(
            classify(&h.bindings, &method(Some(other), &[ModifierKind::Private], true)),
            Overridability::NonVirtual
        );
        assert_eq!(
            classify(&h.bindings, &method(Some(other), &[ModifierKind::Final], true)),
            Overridability::NonVirtual
        );

        let stat = h
            .bindings
            .add_method(MethodInfo::new("run", h.derived, &["int"]).static_());
        assert_eq!(
            classify(&h.bindings, &method(Some(stat), &[ModifierKind::Static], true)),
            Overridability::Static
        );

        assert_eq!(classify(&h.bindings, &method(None, &[], true)), Overridability::Introducing);
    }

    #[test]
    fn test_final_type_makes_methods_non_virtual() {
        let mut h = hierarchy();
        h.bindings.type_info_mut(h.derived).unwrap().is_final = true;
        let id = h.bindings.add_method(MethodInfo::new("stop", h.derived, &[]));
        assert_eq!(classify(&h.bindings, &method(Some(id), &[], true)), Overridability::NonVirtual);
    }

    #[test]
    fn test_private_and_foreign_package_private_are_not_overridden() {
        let mut bindings = Bindings::new();
        let base = bindings.add_type(TypeInfo::class(TypeName::parse("a.Base")));
        let derived = bindings.add_type(TypeInfo {
            superclass: Some(base),
            ..TypeInfo::class(TypeName::parse("b.Derived"))
        });
        bindings.add_method(MethodInfo::new("hidden", base, &[]).with_access(AccessLevel::Private));
        bindings.add_method(MethodInfo::new("local", base, &[]).with_access(AccessLevel::PackagePrivate));
        let hidden = bindings.add_method(MethodInfo::new("hidden", derived, &[]));
        let local = bindings.add_method(MethodInfo::new("local", derived, &[]));

        assert_eq!(classify(&bindings, &method(Some(hidden), &[], true)), Overridability::VirtualByDefault);
        assert_eq!(classify(&bindings, &method(Some(local), &[], true)), Overridability::VirtualByDefault);
    }

    #[test]
    fn test_interfaces_are_not_walked() {
        let mut bindings = Bindings::new();
        let iface = bindings.add_type(TypeInfo::interface(TypeName::parse("p.Runnable")));
        let class = bindings.add_type(TypeInfo {
            interfaces: vec![iface],
            ..TypeInfo::class(TypeName::parse("p.Task"))
        });
        bindings.add_method(MethodInfo::new("run", iface, &[]).abstract_());
        let run = bindings.add_method(MethodInfo::new("run", class, &[]));
        assert_eq!(classify(&bindings, &method(Some(run), &[], true)), Overridability::VirtualByDefault);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut bindings = Bindings::new();
        let a = bindings.add_type(TypeInfo::class(TypeName::parse("p.A")));
        let b = bindings.add_type(TypeInfo {
            superclass: Some(a),
            ..TypeInfo::class(TypeName::parse("p.B"))
        });
        bindings.type_info_mut(a).unwrap().superclass = Some(b);
        let run = bindings.add_method(MethodInfo::new("run", b, &[]));
        assert_eq!(classify(&bindings, &method(Some(run), &[], true)), Overridability::VirtualByDefault);
    }

    proptest! {
        #[test]
        fn prop_classify_terminates_and_roots_never_override(
            parents in proptest::collection::vec(proptest::option::of(0usize..8), 1..8),
            method_on in 0usize..8,
            names in proptest::collection::vec(0u8..3, 1..12),
        ) {
            let mut bindings = Bindings::new();
            let count = parents.len();
            let ids: Vec<TypeId> = (0..count)
                .map(|i| bindings.add_type(TypeInfo::class(TypeName::new(&["p"], &[format!("T{i}").as_str()]))))
                .collect();
            for (i, parent) in parents.iter().enumerate() {
                bindings.type_info_mut(ids[i]).unwrap().superclass = parent.map(|p| ids[p % count]);
            }
            for (i, name) in names.iter().enumerate() {
                bindings.add_method(MethodInfo::new(&format!("m{name}"), ids[i % count], &[]));
            }
            let owner = ids[method_on % count];
            let id = bindings.add_method(MethodInfo::new("m0", owner, &[]));

            let result = classify(&bindings, &method(Some(id), &[], true));
            if bindings.superclass(owner).is_none() {
                prop_assert!(!result.overrides());
            }
        }
    }
}
