//! Permission actions, as declared on a function via `ward(action(p))`
//! attributes (§3, §4.3).

use std::fmt;

use indexmap::IndexSet;

use crate::ident::PermName;

/// A single declared action on a permission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionAction {
    /// Callee transitively requires `p`.
    Need(PermName),
    /// Callee directly exercises `p` (intrinsic use).
    Use(PermName),
    /// Post-state has `p`; pre-state must lack `p`.
    Grant(PermName),
    /// Pre-state has `p`; post-state lacks `p`.
    Revoke(PermName),
    /// Callee forbids `p` in the pre-state.
    Deny(PermName),
    /// Callee opts out of an implicit `p`.
    Waive(PermName),
}

impl PermissionAction {
    pub fn permission(&self) -> &PermName {
        match self {
            PermissionAction::Need(p)
            | PermissionAction::Use(p)
            | PermissionAction::Grant(p)
            | PermissionAction::Revoke(p)
            | PermissionAction::Deny(p)
            | PermissionAction::Waive(p) => p,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PermissionAction::Need(_) => "need",
            PermissionAction::Use(_) => "use",
            PermissionAction::Grant(_) => "grant",
            PermissionAction::Revoke(_) => "revoke",
            PermissionAction::Deny(_) => "deny",
            PermissionAction::Waive(_) => "waive",
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.permission())
    }
}

/// A set of actions on a single function. Duplicates collapse; ordering of
/// insertion is preserved for deterministic diagnostics but does not affect
/// equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionActionSet {
    actions: IndexSet<PermissionAction>,
}

impl PermissionActionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, action: PermissionAction) {
        self.actions.insert(action);
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PermissionAction> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn contains(&self, action: &PermissionAction) -> bool {
        self.actions.contains(action)
    }

    pub fn waives(&self, name: &PermName) -> bool {
        self.actions.iter().any(|a| matches!(a, PermissionAction::Waive(p) if p == name))
    }

    /// Union of two action sets, collapsing duplicates (§3 merge rule for
    /// two name-map / call-map entries sharing an identifier).
    pub fn union(&self, other: &Self) -> Self {
        let mut out = self.actions.clone();
        out.extend(other.actions.iter().cloned());
        Self { actions: out }
    }

    pub fn extend(&mut self, other: &Self) {
        self.actions.extend(other.actions.iter().cloned());
    }
}

impl FromIterator<PermissionAction> for PermissionActionSet {
    fn from_iter<T: IntoIterator<Item = PermissionAction>>(iter: T) -> Self {
        Self { actions: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pn(s: &str) -> PermName {
        PermName::new(s)
    }

    #[test]
    fn duplicates_collapse() {
        let mut set = PermissionActionSet::new();
        set.insert(PermissionAction::Need(pn("lock")));
        set.insert(PermissionAction::Need(pn("lock")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn union_collapses_across_sets() {
        let mut a = PermissionActionSet::new();
        a.insert(PermissionAction::Grant(pn("lock")));
        let mut b = PermissionActionSet::new();
        b.insert(PermissionAction::Grant(pn("lock")));
        b.insert(PermissionAction::Need(pn("gc_safe")));
        let unioned = a.union(&b);
        assert_eq!(unioned.len(), 2);
    }

    #[test]
    fn waives_detects_waiver() {
        let mut set = PermissionActionSet::new();
        set.insert(PermissionAction::Waive(pn("gc_safe")));
        assert!(set.waives(&pn("gc_safe")));
        assert!(!set.waives(&pn("lock")));
    }
}
