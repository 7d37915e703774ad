//! Enforcement selection and mismatch reporting (`spec.md` §4.5).
//!
//! A function is *enforced* when any `EnforcePath`/`EnforceFunction`/
//! `EnforcePathFunction` rule matches its path and name; an enforced
//! function's inferred action set must equal its declared one. The
//! inferred set is the declared set widened by (a) the net capability/usage
//! change the function's own call sequence produced — a function whose
//! body nets a permission from unknown/`lacks` up to `has` behaves like
//! `grant` to its own callers, and symmetrically for `revoke`/`use` — and
//! (b) a propagated precondition for every call-site violation the body
//! hit, so an unsatisfied `need` surfaces as the function itself
//! transitively needing the permission.

use indexmap::IndexSet;

use crate::ast::types::Position;
use crate::config::Config;
use crate::diagnostics::entry::{DiagnosticEntry, Reason};
use crate::ident::PermName;
use crate::inference::engine::CallSiteError;
use crate::permission::action::{PermissionAction, PermissionActionSet};
use crate::permission::lattice::{Capability, Usage};
use crate::permission::presence_set::PermissionPresenceSet;

/// Derive the action set a function's *behavior* amounts to (§4.4), from
/// its declared actions, its pre/post permission state, and the call-site
/// violations its own analysis hit.
pub fn infer_actions(
    declared: &PermissionActionSet,
    initial: &PermissionPresenceSet,
    final_state: &PermissionPresenceSet,
    call_errors: &[CallSiteError],
) -> PermissionActionSet {
    let mut inferred = declared.clone();

    let mut touched: IndexSet<PermName> = IndexSet::new();
    touched.extend(initial.keys().cloned());
    touched.extend(final_state.keys().cloned());

    for perm in touched {
        let before = initial.get(&perm);
        let after = final_state.get(&perm);
        if after.capability == Capability::CapHas && before.capability != Capability::CapHas {
            inferred.insert(PermissionAction::Grant(perm.clone()));
        } else if after.capability == Capability::CapLacks && before.capability == Capability::CapHas {
            inferred.insert(PermissionAction::Revoke(perm.clone()));
        }
        if after.usage == Usage::Uses && before.usage != Usage::Uses {
            inferred.insert(PermissionAction::Use(perm));
        }
    }

    for err in call_errors {
        let perm = PermName::new(&err.violation.permission);
        match err.violation.action {
            "need" | "use" | "revoke" => inferred.insert(PermissionAction::Need(perm)),
            "grant" | "deny" => inferred.insert(PermissionAction::Deny(perm)),
            _ => {}
        }
    }

    inferred
}

/// If `path`/`name` is enforced and `inferred != declared`, produce a
/// mismatch diagnostic naming the missing and extra actions.
pub fn check_enforcement(
    config: &Config,
    path: &str,
    name: &str,
    position: &Position,
    declared: &PermissionActionSet,
    inferred: &PermissionActionSet,
) -> Option<DiagnosticEntry> {
    if !config.is_enforced(path, name) {
        return None;
    }
    let missing: Vec<String> = inferred.iter().filter(|a| !declared.contains(a)).map(|a| a.to_string()).collect();
    let extra: Vec<String> = declared.iter().filter(|a| !inferred.contains(a)).map(|a| a.to_string()).collect();
    if missing.is_empty() && extra.is_empty() {
        return None;
    }
    let text = format!(
        "'{name}' is enforced but its inferred actions differ from its declared ones (missing: [{}], extra: [{}])",
        missing.join(", "),
        extra.join(", ")
    );
    Some(DiagnosticEntry::error(position.clone(), text, Reason::EnforcementMismatch { missing, extra }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Enforcement;
    use crate::inference::transfer::TransferViolation;
    use crate::permission::action::PermissionAction;
    use crate::permission::lattice::PermissionPresence;

    fn pn(s: &str) -> PermName {
        PermName::new(s)
    }

    #[test]
    fn unenforced_function_is_never_flagged() {
        let config = Config::new();
        let declared = PermissionActionSet::new();
        let inferred = {
            let mut s = PermissionActionSet::new();
            s.insert(PermissionAction::Need(pn("lock")));
            s
        };
        assert!(check_enforcement(&config, "a.c", "f", &Position::default(), &declared, &inferred).is_none());
    }

    #[test]
    fn enforced_mismatch_is_flagged() {
        let mut config = Config::new();
        config.enforcements.push(Enforcement::EnforceFunction("f".into()));
        let declared = PermissionActionSet::new();
        let mut inferred = PermissionActionSet::new();
        inferred.insert(PermissionAction::Need(pn("lock")));
        let diag = check_enforcement(&config, "a.c", "f", &Position::default(), &declared, &inferred).unwrap();
        assert!(diag.text.contains("need(lock)"));
    }

    #[test]
    fn infer_actions_widens_on_need_violations() {
        let declared = PermissionActionSet::new();
        let errors = vec![CallSiteError {
            callee: "take_lock".into(),
            violation: TransferViolation { permission: "lock".into(), action: "need" },
        }];
        let empty = PermissionPresenceSet::new();
        let inferred = infer_actions(&declared, &empty, &empty, &errors);
        assert!(inferred.contains(&PermissionAction::Need(pn("lock"))));
    }

    #[test]
    fn infer_actions_widens_on_net_grant() {
        let declared = PermissionActionSet::new();
        let mut initial = PermissionPresenceSet::new();
        initial.set(pn("lock"), PermissionPresence::has(Capability::CapLacks));
        let mut final_state = PermissionPresenceSet::new();
        final_state.set(pn("lock"), PermissionPresence::has(Capability::CapHas));
        let inferred = infer_actions(&declared, &initial, &final_state, &[]);
        assert!(inferred.contains(&PermissionAction::Grant(pn("lock"))));
    }
}
