//! Per-action transfer function table (`spec.md` §4.4).
//!
//! Given an incoming [`PermissionPresenceSet`] and a callee's declared
//! [`PermissionAction`], produce the post-state, or a [`TransferViolation`]
//! when the action's precondition fails. `Need`/`Deny` don't know their
//! own action's text for the diagnostic — the caller (the inference
//! engine) attaches the callee name and call-site position.

use crate::permission::action::PermissionAction;
use crate::permission::lattice::{Capability, PermissionPresence, Usage};
use crate::permission::presence_set::PermissionPresenceSet;

/// A failed transfer-function precondition, naming the permission and the
/// action kind that failed so the engine can build `Reason::BecauseCall`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferViolation {
    pub permission: String,
    pub action: &'static str,
}

/// Apply a single callee action's transfer function to `state`, returning
/// the updated state or the violation that occurred.
pub fn apply(state: &PermissionPresenceSet, action: &PermissionAction) -> Result<PermissionPresenceSet, TransferViolation> {
    let mut next = state.clone();
    let perm = action.permission().clone();
    let current = state.get(&perm);

    match action {
        PermissionAction::Need(_) => {
            if !current.capability.at_least_has() {
                return Err(violation(&perm, "need"));
            }
        }
        PermissionAction::Use(_) => {
            if !current.capability.at_least_has() {
                return Err(violation(&perm, "use"));
            }
            next.set(perm, PermissionPresence::new(Usage::Uses, current.capability));
        }
        PermissionAction::Grant(_) => {
            if !current.capability.at_most_lacks() {
                return Err(violation(&perm, "grant"));
            }
            next.set(perm, PermissionPresence::new(current.usage, Capability::CapHas));
        }
        PermissionAction::Revoke(_) => {
            if !current.capability.at_least_has() {
                return Err(violation(&perm, "revoke"));
            }
            next.set(perm, PermissionPresence::new(current.usage, Capability::CapLacks));
        }
        PermissionAction::Deny(_) => {
            if !current.capability.at_most_lacks() {
                return Err(violation(&perm, "deny"));
            }
        }
        PermissionAction::Waive(_) => {}
    }
    Ok(next)
}

fn violation(perm: &crate::ident::PermName, action: &'static str) -> TransferViolation {
    TransferViolation { permission: perm.to_string(), action }
}
