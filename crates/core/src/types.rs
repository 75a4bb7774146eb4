//! Domain types for the Territory permission hierarchy.

use crate::error::TerritoryError;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Grant (`Include`) or revoke (`Exclude`) access to a region.
///
/// Ordered `Include(0) < Exclude(1)`: the resolved kind for a region is the
/// maximum of every kind seen for it, so an exclude always dominates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionKind {
    Include = 0,
    Exclude = 1,
}

impl PartialOrd for PermissionKind {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PermissionKind {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

impl PermissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionKind::Include => "INCLUDE",
            PermissionKind::Exclude => "EXCLUDE",
        }
    }
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionKind {
    type Err = TerritoryError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("include") {
            Ok(PermissionKind::Include)
        } else if trimmed.eq_ignore_ascii_case("exclude") {
            Ok(PermissionKind::Exclude)
        } else {
            Err(TerritoryError::InvalidInput(format!(
                "unknown permission type '{trimmed}', expected include or exclude"
            )))
        }
    }
}

/// A single `(kind, region)` statement owned by one distributor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionRule {
    pub kind: PermissionKind,
    pub region: String,
}

impl PermissionRule {
    pub fn new(kind: PermissionKind, region: impl Into<String>) -> Self {
        Self {
            kind,
            region: region.into(),
        }
    }

    pub fn include(region: impl Into<String>) -> Self {
        Self::new(PermissionKind::Include, region)
    }

    pub fn exclude(region: impl Into<String>) -> Self {
        Self::new(PermissionKind::Exclude, region)
    }
}

// ---------------------------------------------------------------------------
// Distributor
// ---------------------------------------------------------------------------

/// A named node in the hierarchy.
///
/// `rules` keeps insertion order (display only) and allows duplicates.
/// `children` and `parents` hold names, not ownership: every distributor is
/// owned by the registry and links are resolved through it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Distributor {
    pub name: String,
    pub rules: SmallVec<[PermissionRule; 8]>,
    /// Distributors linked beneath this one, in link order.
    pub children: SmallVec<[String; 4]>,
    /// Distributors this one was linked beneath. Lookup-only.
    pub parents: SmallVec<[String; 2]>,
}

impl Distributor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends one rule per region, trimming surrounding whitespace.
    pub fn add_rules<I, S>(&mut self, kind: PermissionKind, regions: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.rules.len();
        self.rules.extend(
            regions
                .into_iter()
                .map(|r| PermissionRule::new(kind, r.as_ref().trim())),
        );
        self.rules.len() - before
    }

    /// True if this distributor's own rules exclude `region`.
    pub fn excludes(&self, region: &str) -> bool {
        self.rules
            .iter()
            .any(|r| r.kind == PermissionKind::Exclude && r.region == region)
    }

    /// Own include rules, in insertion order.
    pub fn includes(&self) -> impl Iterator<Item = &PermissionRule> {
        self.rules
            .iter()
            .filter(|r| r.kind == PermissionKind::Include)
    }
}

// ---------------------------------------------------------------------------
// Effective permissions
// ---------------------------------------------------------------------------

/// Resolved region -> kind mapping, at most one entry per region.
///
/// Equality ignores iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivePermissions {
    pub resolved: HashMap<String, PermissionKind>,
}

impl EffectivePermissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one rule in. Absent regions take the rule's kind; an exclude
    /// overwrites an include; nothing downgrades an exclude.
    pub fn merge_rule(&mut self, rule: &PermissionRule) {
        match self.resolved.get_mut(&rule.region) {
            Some(kind) => {
                if rule.kind > *kind {
                    *kind = rule.kind;
                }
            }
            None => {
                self.resolved.insert(rule.region.clone(), rule.kind);
            }
        }
    }

    pub fn merge_distributor(&mut self, distributor: &Distributor) {
        for rule in &distributor.rules {
            self.merge_rule(rule);
        }
    }

    pub fn kind_of(&self, region: &str) -> Option<PermissionKind> {
        self.resolved.get(region).copied()
    }

    pub fn is_included(&self, region: &str) -> bool {
        self.kind_of(region) == Some(PermissionKind::Include)
    }

    pub fn is_excluded(&self, region: &str) -> bool {
        self.kind_of(region) == Some(PermissionKind::Exclude)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, PermissionKind)> {
        self.resolved.iter().map(|(r, k)| (r.as_str(), *k))
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// Rules sorted by region, for stable display.
    pub fn to_sorted_rules(&self) -> Vec<PermissionRule> {
        let mut rules: Vec<PermissionRule> = self
            .resolved
            .iter()
            .map(|(region, kind)| PermissionRule::new(*kind, region.clone()))
            .collect();
        rules.sort_by(|a, b| a.region.cmp(&b.region));
        rules
    }
}
