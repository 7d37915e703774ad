//! A mapping from permission name to [`PermissionPresence`], with lattice
//! structure derived pointwise. Absent keys read as bottom.

use std::fmt;

use indexmap::IndexMap;

use super::lattice::PermissionPresence;
use crate::ident::PermName;

/// `PermissionName -> PermissionPresence`. Not a free semigroup: the only
/// meaningful way to combine two of these is [`PermissionPresenceSet::join`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionPresenceSet {
    entries: IndexMap<PermName, PermissionPresence>,
}

impl PermissionPresenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(|p| p.is_bottom())
    }

    /// Absent keys read as bottom.
    pub fn get(&self, name: &PermName) -> PermissionPresence {
        self.entries.get(name).copied().unwrap_or(PermissionPresence::BOTTOM)
    }

    /// Overwrite the presence at `name` (used by transfer functions, not by
    /// joins — joins go through [`Self::join`]).
    pub fn set(&mut self, name: PermName, presence: PermissionPresence) {
        if presence.is_bottom() {
            self.entries.shift_remove(&name);
        } else {
            self.entries.insert(name, presence);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PermName, &PermissionPresence)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &PermName> {
        self.entries.keys()
    }

    /// Pointwise join. Keys present in only one side are lifted by joining
    /// with bottom (i.e. copied across), which is how a conflict between
    /// `CapHas` on one side and absence (bottom) on the other would *not*
    /// arise — conflicts only appear when both sides name the same key with
    /// incompatible capabilities.
    pub fn join(&self, other: &Self) -> Self {
        let mut out = self.entries.clone();
        for (name, presence) in other.entries.iter() {
            let merged = out.get(name).copied().unwrap_or(PermissionPresence::BOTTOM).join(*presence);
            out.insert(name.clone(), merged);
        }
        Self { entries: out }
    }

    pub fn leq(&self, other: &Self) -> bool {
        &self.join(other) == other
    }
}

impl fmt::Display for PermissionPresenceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, presence)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {presence}")?;
        }
        write!(f, "}}")
    }
}
