//! Per-function permission inference (`spec.md` §4.4).
//!
//! Computes a function's pre/post states over its lowered call sequence,
//! using each direct callee's action set (from the call map passed in) as
//! the transfer-function driver at every call site. Both arms of a
//! `Choice` are always walked, and their resulting states are joined,
//! matching §4.4's composition rules.
//!
//! This module analyzes one function at a time and is agnostic to whether
//! the `CallMap` it's given carries raw declared actions or a round's
//! current effective actions — [`super::summary::infer_program`] is what
//! drives repeated calls here to a whole-program fixed point.

use indexmap::IndexSet;

use crate::callmap::{CallMap, CallMapEntry};
use crate::callseq::{CallSequence, CallTree};
use crate::config::Config;
use crate::ident::PermName;
use crate::permission::action::PermissionAction;
use crate::permission::lattice::{Capability, PermissionPresence, Usage};
use crate::permission::presence_set::PermissionPresenceSet;

use super::transfer::{self, TransferViolation};

/// A transfer-function precondition that failed at a specific call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSiteError {
    pub callee: String,
    pub violation: TransferViolation,
}

#[derive(Debug, Clone)]
pub struct FunctionAnalysis {
    pub final_state: PermissionPresenceSet,
    pub call_errors: Vec<CallSiteError>,
    pub conflicts: IndexSet<PermName>,
}

/// Build a function's entry pre-state from its own declared actions (§4.4
/// "Initial state"), plus implicit permissions from config it doesn't
/// waive, plus a baseline `CapLacks` for any permission a direct callee
/// mentions that this function itself says nothing about — without this,
/// an unconditional branch that sometimes calls a granting function and
/// sometimes does nothing could never produce the `CapConflict` §8's
/// "branch conflict" scenario requires, since an untouched key reads as
/// bottom and bottom is the join identity.
pub fn initial_state(entry: &CallMapEntry, call_map: &CallMap, config: &Config) -> PermissionPresenceSet {
    let mut state = PermissionPresenceSet::new();
    let mut touched: IndexSet<PermName> = IndexSet::new();

    for action in entry.actions.iter() {
        let perm = action.permission().clone();
        touched.insert(perm.clone());
        match action {
            PermissionAction::Need(_) => state.set(perm, PermissionPresence::has(Capability::CapHas)),
            PermissionAction::Use(_) => {
                // `use` only asserts that the permission is exercised here,
                // not that it is already held: a function can declare
                // `use(p)` and still acquire `p` itself via a callee later
                // in its own body (see the recursive-lock restriction
                // scenario), so the capability this function starts with is
                // whatever it already was, not a forced `CapHas`.
                let current = state.get(&perm);
                state.set(perm, PermissionPresence::new(Usage::Uses, current.capability));
            }
            PermissionAction::Grant(_) => state.set(perm, PermissionPresence::has(Capability::CapLacks)),
            PermissionAction::Revoke(_) => state.set(perm, PermissionPresence::has(Capability::CapHas)),
            PermissionAction::Deny(_) => state.set(perm, PermissionPresence::has(Capability::CapLacks)),
            PermissionAction::Waive(_) => {}
        }
    }

    for name in config.implicit_permissions() {
        if !entry.actions.waives(name) && !touched.contains(name) {
            state.set(name.clone(), PermissionPresence::has(Capability::CapHas));
            touched.insert(name.clone());
        }
    }

    for perm in directly_mentioned_permissions(&entry.calls, call_map) {
        if !touched.contains(&perm) {
            state.set(perm, PermissionPresence::has(Capability::CapLacks));
        }
    }

    state
}

fn directly_mentioned_permissions(calls: &CallSequence, call_map: &CallMap) -> IndexSet<PermName> {
    let mut out = IndexSet::new();
    collect_tree(calls, call_map, &mut out);
    out
}

fn collect_tree(seq: &CallSequence, call_map: &CallMap, out: &mut IndexSet<PermName>) {
    for tree in seq.iter() {
        match tree {
            CallTree::Call(name) => {
                if let Some(entry) = call_map.get(name) {
                    for action in entry.actions.iter() {
                        out.insert(action.permission().clone());
                    }
                }
            }
            CallTree::Choice(a, b) => {
                collect_tree(a, call_map, out);
                collect_tree(b, call_map, out);
            }
        }
    }
}

/// Run the inference over a single function's call sequence from `entry_state`.
pub fn analyze(entry_state: PermissionPresenceSet, calls: &CallSequence, call_map: &CallMap) -> FunctionAnalysis {
    let mut errors = Vec::new();
    let mut conflicts = IndexSet::new();
    let final_state = walk_seq(calls, call_map, entry_state, &mut errors, &mut conflicts);
    FunctionAnalysis { final_state, call_errors: errors, conflicts }
}

fn walk_seq(
    seq: &CallSequence,
    call_map: &CallMap,
    mut state: PermissionPresenceSet,
    errors: &mut Vec<CallSiteError>,
    conflicts: &mut IndexSet<PermName>,
) -> PermissionPresenceSet {
    for tree in seq.iter() {
        state = walk_tree(tree, call_map, state, errors, conflicts);
    }
    state
}

fn walk_tree(
    tree: &CallTree,
    call_map: &CallMap,
    state: PermissionPresenceSet,
    errors: &mut Vec<CallSiteError>,
    conflicts: &mut IndexSet<PermName>,
) -> PermissionPresenceSet {
    match tree {
        CallTree::Call(name) => {
            let mut s = state;
            if let Some(entry) = call_map.get(name) {
                for action in entry.actions.iter() {
                    match transfer::apply(&s, action) {
                        Ok(next) => s = next,
                        Err(violation) => errors.push(CallSiteError { callee: name.clone(), violation }),
                    }
                }
            }
            s
        }
        CallTree::Choice(a, b) => {
            let s_true = walk_seq(a, call_map, state.clone(), errors, conflicts);
            let s_false = walk_seq(b, call_map, state, errors, conflicts);
            let joined = s_true.join(&s_false);
            for name in joined.keys() {
                let already_conflicting = s_true.get(name).capability == Capability::CapConflict
                    || s_false.get(name).capability == Capability::CapConflict;
                if !already_conflicting && joined.get(name).capability == Capability::CapConflict {
                    conflicts.insert(name.clone());
                }
            }
            joined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::FunctionBuilder;
    use crate::callmap::build_call_map;
    use crate::namemap::build_name_map;
    use crate::statics::concatenate_translation_units;

    fn build(decls: Vec<crate::ast::types::Declaration>) -> (CallMap, Config) {
        let flat = concatenate_translation_units(&[crate::ast::types::TranslationUnit { path: "t.c".into(), declarations: decls }]);
        let (names, _) = build_name_map(&flat).unwrap();
        let (calls, _) = build_call_map(&names);
        (calls, Config::new())
    }

    #[test]
    fn basic_need_satisfied() {
        let (calls, config) = build(vec![
            FunctionBuilder::new("take_lock", 1).grants("lock").build(),
            FunctionBuilder::new("do_work", 2).needs("lock").build(),
            FunctionBuilder::new("main", 3).calling(&["take_lock", "do_work"]).build(),
        ]);
        let main = calls.get("main").unwrap();
        let state = initial_state(main, &calls, &config);
        let result = analyze(state, &main.calls, &calls);
        assert!(result.call_errors.is_empty());
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn need_unsatisfied_reports_call_error() {
        let (calls, config) = build(vec![
            FunctionBuilder::new("do_work", 1).needs("lock").build(),
            FunctionBuilder::new("main", 2).calling(&["do_work"]).build(),
        ]);
        let main = calls.get("main").unwrap();
        let state = initial_state(main, &calls, &config);
        let result = analyze(state, &main.calls, &calls);
        assert_eq!(result.call_errors.len(), 1);
        assert_eq!(result.call_errors[0].violation.action, "need");
    }

    #[test]
    fn branch_conflict_is_detected() {
        use crate::ast::builder::if_stmt;
        let branch = FunctionBuilder::new("main", 1)
            .body(crate::ast::types::FunctionBody {
                statements: vec![
                    if_stmt(vec![crate::ast::builder::call_stmt("take_lock")], vec![]),
                    crate::ast::builder::call_stmt("do_work"),
                ],
            })
            .build();
        let (calls, config) = build(vec![
            FunctionBuilder::new("take_lock", 2).grants("lock").build(),
            FunctionBuilder::new("do_work", 3).needs("lock").build(),
            branch,
        ]);
        let main = calls.get("main").unwrap();
        let state = initial_state(main, &calls, &config);
        let result = analyze(state, &main.calls, &calls);
        assert!(result.conflicts.contains(&PermName::new("lock")));
    }

    #[test]
    fn implicit_permission_waived_produces_no_error() {
        let (calls, mut config) = build(vec![
            FunctionBuilder::new("f", 1).calling(&["g"]).build(),
            FunctionBuilder::new("g", 2).waives("gc_safe").build(),
        ]);
        config.declarations.insert(
            PermName::new("gc_safe"),
            crate::config::Declaration { implicit: true, description: None, restrictions: vec![] },
        );
        let f = calls.get("f").unwrap();
        let state = initial_state(f, &calls, &config);
        assert_eq!(state.get(&PermName::new("gc_safe")).capability, Capability::CapHas);
        let result = analyze(state, &f.calls, &calls);
        assert!(result.call_errors.is_empty());
    }
}
