//! Distributor registry and link validation.

use std::collections::{HashMap, HashSet};
use territory_core::error::{TerritoryError, TerritoryResult};
use territory_core::{Distributor, PermissionKind};

/// Which recorded links a walk follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Distributors linked beneath the start, recursively.
    Children,
    /// Distributors the start was linked beneath, recursively.
    Parents,
}

/// Owns every distributor, keyed by name.
///
/// Links are stored as names on both ends: `parent.children` and
/// `child.parents`. Only `&Distributor` is ever handed out, so links and the
/// no-cycle invariant can only change through [`Hierarchy::link_distributors`].
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    distributors: HashMap<String, Distributor>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an empty distributor under exactly `name`; lookups use the
    /// same string, so no trimming happens here.
    ///
    /// Fails with `AlreadyExists` instead of replacing an existing entry,
    /// since other distributors may already hold links to it.
    pub fn create_distributor(&mut self, name: &str) -> TerritoryResult<&Distributor> {
        if name.trim().is_empty() {
            return Err(TerritoryError::InvalidInput(
                "distributor name must not be empty".into(),
            ));
        }
        if self.distributors.contains_key(name) {
            return Err(TerritoryError::AlreadyExists(name.to_string()));
        }

        tracing::debug!(distributor = name, "created distributor");
        Ok(self
            .distributors
            .entry(name.to_string())
            .or_insert_with(|| Distributor::new(name)))
    }

    pub fn get(&self, name: &str) -> TerritoryResult<&Distributor> {
        self.distributors
            .get(name)
            .ok_or_else(|| TerritoryError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.distributors.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.distributors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.distributors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distributors.is_empty()
    }

    /// Appends one `(kind, region)` rule per region to `name`.
    ///
    /// Regions are trimmed but not checked against any reference data.
    /// Returns the number of rules added.
    pub fn add_permissions<I, S>(
        &mut self,
        name: &str,
        kind: PermissionKind,
        regions: I,
    ) -> TerritoryResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let distributor = self
            .distributors
            .get_mut(name)
            .ok_or_else(|| TerritoryError::NotFound(name.to_string()))?;
        let added = distributor.add_rules(kind, regions);
        tracing::debug!(distributor = name, %kind, added, "added permissions");
        Ok(added)
    }

    /// Like [`Hierarchy::add_permissions`], parsing `kind` from text first.
    /// An unknown kind is rejected before anything is looked up or mutated.
    pub fn add_permissions_str<I, S>(
        &mut self,
        name: &str,
        kind: &str,
        regions: I,
    ) -> TerritoryResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let kind: PermissionKind = kind.parse()?;
        self.add_permissions(name, kind, regions)
    }

    /// Links `child` beneath `parent`.
    ///
    /// Checked in order, with no mutation on failure:
    ///   1. both names exist (`NotFound`, parent first);
    ///   2. the link does not close a cycle (`CycleDetected`);
    ///   3. no include rule of the child targets a region the parent's own
    ///      rules exclude (`Conflict`, first offending rule).
    pub fn link_distributors(&mut self, parent: &str, child: &str) -> TerritoryResult<()> {
        let parent_node = self.get(parent)?;
        let child_node = self.get(child)?;

        if self.reaches(child, parent) {
            tracing::warn!(parent, child, "link rejected: cycle");
            return Err(TerritoryError::CycleDetected {
                parent: parent.to_string(),
                child: child.to_string(),
            });
        }

        if let Some(rule) = child_node
            .includes()
            .find(|rule| parent_node.excludes(&rule.region))
        {
            tracing::warn!(parent, child, region = %rule.region, "link rejected: excluded region");
            return Err(TerritoryError::Conflict {
                parent: parent.to_string(),
                child: child.to_string(),
                region: rule.region.clone(),
            });
        }

        // Both lookups succeeded above; the map cannot have changed since.
        if let Some(p) = self.distributors.get_mut(parent) {
            p.children.push(child.to_string());
        }
        if let Some(c) = self.distributors.get_mut(child) {
            c.parents.push(parent.to_string());
        }

        tracing::info!(parent, child, "linked distributors");
        Ok(())
    }

    /// Pre-order depth-first walk from `start`, following `direction`,
    /// visiting each distributor once. `start` is always first.
    pub fn walk(&self, start: &str, direction: Direction) -> TerritoryResult<Vec<&Distributor>> {
        let root = self.get(start)?;

        let mut order = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            if !seen.insert(node.name.as_str()) {
                continue;
            }
            order.push(node);

            let next = match direction {
                Direction::Children => &node.children[..],
                Direction::Parents => &node.parents[..],
            };
            // Reverse so the first link is popped first.
            stack.extend(
                next.iter()
                    .rev()
                    .filter_map(|name| self.distributors.get(name.as_str())),
            );
        }

        Ok(order)
    }

    /// Names linked beneath `name`, recursively, excluding `name` itself.
    pub fn descendants(&self, name: &str) -> TerritoryResult<Vec<&str>> {
        Ok(self
            .walk(name, Direction::Children)?
            .into_iter()
            .skip(1)
            .map(|d| d.name.as_str())
            .collect())
    }

    /// Names `name` was linked beneath, recursively, excluding `name` itself.
    pub fn ancestors(&self, name: &str) -> TerritoryResult<Vec<&str>> {
        Ok(self
            .walk(name, Direction::Parents)?
            .into_iter()
            .skip(1)
            .map(|d| d.name.as_str())
            .collect())
    }

    /// True if `to` is `from` or lies beneath it.
    fn reaches(&self, from: &str, to: &str) -> bool {
        self.walk(from, Direction::Children)
            .map(|nodes| nodes.iter().any(|d| d.name == to))
            .unwrap_or(false)
    }
}
