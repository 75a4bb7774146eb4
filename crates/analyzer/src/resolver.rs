//! Effective permission resolution over the distributor hierarchy.
//!
//! Both entry points fold every visited distributor's own rules into one
//! [`EffectivePermissions`] using the dominance merge: the first kind seen
//! for a region is recorded, an exclude overwrites an include, and an
//! include never downgrades an exclude. Nothing is cached between calls.

use crate::graph::{Direction, Hierarchy};
use territory_core::error::TerritoryResult;
use territory_core::EffectivePermissions;

/// Resolves `name` together with every distributor linked beneath it.
///
/// Visits `name` first, then its children depth-first in link order. A
/// distributor reachable along two paths is visited once; the merge is
/// monotone, so a second visit could not change the result anyway.
pub fn gather_effective_permissions(
    hierarchy: &Hierarchy,
    name: &str,
) -> TerritoryResult<EffectivePermissions> {
    resolve(hierarchy, name, Direction::Children)
}

/// Resolves `name` together with every distributor it was linked beneath.
pub fn gather_inherited_permissions(
    hierarchy: &Hierarchy,
    name: &str,
) -> TerritoryResult<EffectivePermissions> {
    resolve(hierarchy, name, Direction::Parents)
}

fn resolve(
    hierarchy: &Hierarchy,
    name: &str,
    direction: Direction,
) -> TerritoryResult<EffectivePermissions> {
    let nodes = hierarchy.walk(name, direction)?;

    let mut effective = EffectivePermissions::new();
    for node in &nodes {
        effective.merge_distributor(node);
    }

    tracing::debug!(
        distributor = name,
        ?direction,
        visited = nodes.len(),
        regions = effective.len(),
        "resolved permissions"
    );
    Ok(effective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use territory_core::{PermissionKind, TerritoryError};

    #[test]
    fn lone_distributor_without_rules_is_empty() {
        let mut h = Hierarchy::new();
        h.create_distributor("acme").unwrap();
        assert!(gather_effective_permissions(&h, "acme")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn unknown_distributor_is_not_found() {
        let h = Hierarchy::new();
        assert!(matches!(
            gather_effective_permissions(&h, "ghost"),
            Err(TerritoryError::NotFound(_))
        ));
    }

    #[test]
    fn same_node_exclude_wins_both_orders() {
        let mut h = Hierarchy::new();
        h.create_distributor("first").unwrap();
        h.create_distributor("second").unwrap();
        h.add_permissions("first", PermissionKind::Include, ["A"])
            .unwrap();
        h.add_permissions("first", PermissionKind::Exclude, ["A"])
            .unwrap();
        h.add_permissions("second", PermissionKind::Exclude, ["A"])
            .unwrap();
        h.add_permissions("second", PermissionKind::Include, ["A"])
            .unwrap();

        for name in ["first", "second"] {
            let e = gather_effective_permissions(&h, name).unwrap();
            assert_eq!(e.kind_of("A"), Some(PermissionKind::Exclude), "{name}");
            assert_eq!(e.len(), 1);
        }
    }

    #[test]
    fn child_exclude_overrides_parent_include() {
        let mut h = Hierarchy::new();
        h.create_distributor("parent").unwrap();
        h.create_distributor("child").unwrap();
        h.add_permissions("parent", PermissionKind::Include, ["A", "B"])
            .unwrap();
        h.add_permissions("child", PermissionKind::Exclude, ["B"])
            .unwrap();
        h.link_distributors("parent", "child").unwrap();

        let e = gather_effective_permissions(&h, "parent").unwrap();
        assert!(e.is_included("A"));
        assert!(e.is_excluded("B"));
    }
}
