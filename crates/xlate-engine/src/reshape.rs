//! Structural reshaping of type bodies.
//!
//! A stable partition of the member list into the backend's
//! `(declaration kind, access level)` buckets. Members are only reordered;
//! anything no bucket accepts is kept, in source order, in a trailing group.

use xlate_ast::{AccessLevel, Member};
use xlate_config::{DeclarationKind, GroupingBucket};

/// Members sharing one bucket, in source order.
#[derive(Debug, Clone)]
pub struct MemberGroup<'m> {
    /// `None` for members no bucket accepted.
    pub bucket: Option<GroupingBucket>,
    pub members: Vec<&'m Member>,
}

pub fn declaration_kind(member: &Member) -> DeclarationKind {
    match member {
        Member::Field(_) => DeclarationKind::Field,
        Member::Method(_) => DeclarationKind::Method,
        Member::Type(_) => DeclarationKind::NestedType,
    }
}

/// Partition `members` by `grouping`.
///
/// Every bucket yields a group, even when empty, so callers can place
/// synthesized declarations. With `fold_package`, package-private members
/// land in the public buckets. An empty grouping keeps source order.
pub fn reshape<'m>(members: &'m [Member], grouping: &[GroupingBucket], fold_package: bool) -> Vec<MemberGroup<'m>> {
    if grouping.is_empty() {
        return vec![MemberGroup {
            bucket: None,
            members: members.iter().collect(),
        }];
    }

    let mut groups: Vec<MemberGroup<'m>> = grouping
        .iter()
        .map(|bucket| MemberGroup {
            bucket: Some(*bucket),
            members: Vec::new(),
        })
        .collect();
    let mut unplaced = Vec::new();

    for member in members {
        let access = if fold_package {
            member.access().fold_package()
        } else {
            member.access()
        };
        let key = GroupingBucket::new(declaration_kind(member), access);
        match groups.iter_mut().find(|g| g.bucket == Some(key)) {
            Some(group) => group.members.push(member),
            None => unplaced.push(member),
        }
    }

    for group in &groups {
        if let Some(bucket) = group.bucket {
            tracing::trace!(kind = ?bucket.kind, access = ?bucket.access, size = group.members.len(), "bucket");
        }
    }
    if !unplaced.is_empty() {
        groups.push(MemberGroup {
            bucket: None,
            members: unplaced,
        });
    }
    groups
}

/// Access keyword for a bucket label.
pub fn access_label(access: AccessLevel) -> &'static str {
    match access {
        AccessLevel::Public | AccessLevel::PackagePrivate => "public",
        AccessLevel::Protected => "protected",
        AccessLevel::Private => "private",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use xlate_ast::{
        FieldDecl, Ident, MethodDecl, Modifier, ModifierKind, Modifiers, PrimitiveKind, TypeNode, TypeNodeKind,
    };
    use xlate_common::Span;
    use xlate_config::BackendPolicy;

    fn modifiers(access: AccessLevel) -> Modifiers {
        let kind = match access {
            AccessLevel::Public => ModifierKind::Public,
            AccessLevel::Protected => ModifierKind::Protected,
            AccessLevel::Private => ModifierKind::Private,
            AccessLevel::PackagePrivate => return Modifiers::default(),
        };
        Modifiers::new(vec![Modifier {
            kind,
            span: Span::default(),
        }])
    }

    fn int() -> TypeNode {
        TypeNode::new(TypeNodeKind::Primitive(PrimitiveKind::Int), Span::default())
    }

    /// Members are told apart by their span start.
    fn member(is_field: bool, access: AccessLevel, id: u32) -> Member {
        let span = Span::new(id, id + 1);
        if is_field {
            Member::Field(FieldDecl {
                modifiers: modifiers(access),
                ty: int(),
                fragments: Vec::new(),
                span,
            })
        } else {
            Member::Method(MethodDecl {
                modifiers: modifiers(access),
                type_params: Vec::new(),
                return_type: Some(int()),
                name: Ident::new("m", span),
                params: Vec::new(),
                throws: Vec::new(),
                body: None,
                binding: None,
                span,
            })
        }
    }

    fn ids(group: &MemberGroup<'_>) -> Vec<u32> {
        group.members.iter().map(|m| m.span().start).collect()
    }

    #[test]
    fn test_private_field_follows_public_and_protected() {
        let members = vec![
            member(true, AccessLevel::Private, 0),
            member(false, AccessLevel::Public, 1),
            member(true, AccessLevel::Public, 2),
            member(true, AccessLevel::Protected, 3),
            member(false, AccessLevel::PackagePrivate, 4),
        ];
        let groups = reshape(&members, BackendPolicy::cpp().grouping(), true);

        let order: Vec<u32> = groups.iter().flat_map(ids).collect();
        assert_eq!(order, vec![1, 4, 2, 3, 0]);
        assert_eq!(groups.len(), 12);
        assert_eq!(groups[3].bucket.unwrap().kind, DeclarationKind::TypeAlias);
        assert!(groups[3].members.is_empty());
    }

    #[test]
    fn test_unfolded_package_private_is_kept_at_end() {
        let members = vec![
            member(false, AccessLevel::PackagePrivate, 0),
            member(false, AccessLevel::Public, 1),
        ];
        let groups = reshape(&members, BackendPolicy::cpp().grouping(), false);
        let last = groups.last().unwrap();
        assert!(last.bucket.is_none());
        assert_eq!(ids(last), vec![0]);
    }

    #[test]
    fn test_empty_grouping_keeps_source_order() {
        let members = vec![
            member(true, AccessLevel::Private, 0),
            member(false, AccessLevel::Public, 1),
        ];
        let groups = reshape(&members, &[], true);
        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0]), vec![0, 1]);
    }

    fn access_strategy() -> impl Strategy<Value = AccessLevel> {
        prop_oneof![
            Just(AccessLevel::Public),
            Just(AccessLevel::Protected),
            Just(AccessLevel::PackagePrivate),
            Just(AccessLevel::Private),
        ]
    }

    proptest! {
        #[test]
        fn prop_reshape_preserves_membership(
            shape in proptest::collection::vec((any::<bool>(), access_strategy()), 0..40),
            fold in any::<bool>(),
        ) {
            let members: Vec<Member> = shape
                .iter()
                .enumerate()
                .map(|(i, (is_field, access))| member(*is_field, *access, i as u32))
                .collect();
            let groups = reshape(&members, BackendPolicy::cpp().grouping(), fold);

            let mut seen: Vec<u32> = groups.iter().flat_map(ids).collect();
            seen.sort_unstable();
            let expected: Vec<u32> = (0..members.len() as u32).collect();
            prop_assert_eq!(seen, expected);

            for group in &groups {
                let order = ids(group);
                prop_assert!(order.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}
