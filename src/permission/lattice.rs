//! The two small lattices permission inference runs over, and their product.
//!
//! `Usage` is a two-element chain. `Capability` is the diamond
//! `CapUnknown ⊑ {CapHas, CapLacks} ⊑ CapConflict`. `PermissionPresence` is
//! their product, with join/meet applied pointwise.

use std::cmp::Ordering;
use std::fmt;

/// Whether a permission is known to have been exercised at a program point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Usage {
    #[default]
    UsageUnknown,
    Uses,
}

impl Usage {
    pub fn join(self, other: Self) -> Self {
        match (self, other) {
            (Usage::Uses, _) | (_, Usage::Uses) => Usage::Uses,
            _ => Usage::UsageUnknown,
        }
    }

    pub fn meet(self, other: Self) -> Self {
        match (self, other) {
            (Usage::UsageUnknown, _) | (_, Usage::UsageUnknown) => Usage::UsageUnknown,
            _ => Usage::Uses,
        }
    }

    pub fn leq(self, other: Self) -> bool {
        self.join(other) == other
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Usage::UsageUnknown => write!(f, "unknown"),
            Usage::Uses => write!(f, "uses"),
        }
    }
}

/// What is known about whether a permission is held.
///
/// `CapUnknown` is bottom, `CapConflict` is top; `CapHas` and `CapLacks` are
/// incomparable elements in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Capability {
    #[default]
    CapUnknown,
    CapHas,
    CapLacks,
    CapConflict,
}

impl Capability {
    pub fn join(self, other: Self) -> Self {
        use Capability::*;
        match (self, other) {
            (CapUnknown, x) | (x, CapUnknown) => x,
            (CapConflict, _) | (_, CapConflict) => CapConflict,
            (a, b) if a == b => a,
            _ => CapConflict,
        }
    }

    pub fn meet(self, other: Self) -> Self {
        use Capability::*;
        match (self, other) {
            (CapConflict, x) | (x, CapConflict) => x,
            (CapUnknown, _) | (_, CapUnknown) => CapUnknown,
            (a, b) if a == b => a,
            _ => CapUnknown,
        }
    }

    pub fn leq(self, other: Self) -> bool {
        self.join(other) == other
    }

    /// `⊒ CapHas` — `CapHas` or `CapConflict`.
    pub fn at_least_has(self) -> bool {
        matches!(self, Capability::CapHas | Capability::CapConflict)
    }

    /// `⊑ CapLacks` — `CapUnknown` or `CapLacks` (i.e. not known to have it).
    pub fn at_most_lacks(self) -> bool {
        matches!(self, Capability::CapUnknown | Capability::CapLacks)
    }

    /// `⊒ CapLacks` — `CapLacks` or `CapConflict`.
    pub fn at_least_lacks(self) -> bool {
        matches!(self, Capability::CapLacks | Capability::CapConflict)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::CapUnknown => write!(f, "unknown"),
            Capability::CapHas => write!(f, "has"),
            Capability::CapLacks => write!(f, "lacks"),
            Capability::CapConflict => write!(f, "conflict"),
        }
    }
}

/// The product lattice `Usage × Capability`, keyed by a single permission.
///
/// Invariant: `presence == PermissionPresence::default()` (bottom) iff both
/// components are bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PermissionPresence {
    pub usage: Usage,
    pub capability: Capability,
}

impl PermissionPresence {
    pub const BOTTOM: PermissionPresence = PermissionPresence {
        usage: Usage::UsageUnknown,
        capability: Capability::CapUnknown,
    };

    pub fn new(usage: Usage, capability: Capability) -> Self {
        Self { usage, capability }
    }

    pub fn has(capability: Capability) -> Self {
        Self { usage: Usage::UsageUnknown, capability }
    }

    pub fn is_bottom(self) -> bool {
        self == Self::BOTTOM
    }

    pub fn join(self, other: Self) -> Self {
        Self {
            usage: self.usage.join(other.usage),
            capability: self.capability.join(other.capability),
        }
    }

    pub fn meet(self, other: Self) -> Self {
        Self {
            usage: self.usage.meet(other.usage),
            capability: self.capability.meet(other.capability),
        }
    }

    pub fn leq(self, other: Self) -> bool {
        self.join(other) == other
    }
}

impl PartialOrd for PermissionPresence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else if self.leq(*other) {
            Some(Ordering::Less)
        } else if other.leq(*self) {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

impl fmt::Display for PermissionPresence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.usage, self.capability)
    }
}
