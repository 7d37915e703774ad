//! The permission lattice: actions declared on functions, the two small
//! lattices inference runs over, and maps of permission name to lattice
//! value.

pub mod action;
pub mod lattice;
pub mod presence_set;

pub use action::{PermissionAction, PermissionActionSet};
pub use lattice::{Capability, PermissionPresence, Usage};
pub use presence_set::PermissionPresenceSet;
