//! Whole-program fixed-point propagation of each function's *effective*
//! action set to its callers (`spec.md` §4.4 "Whole-program fixed point").
//!
//! Analyzing a function in isolation against only its direct callees'
//! *declared* actions misses permissions threaded through an un-annotated
//! wrapper: if `wrap` merely calls `take_lock` (`grant(lock)`) and declares
//! nothing itself, a caller of `wrap` never sees the grant. This module
//! runs [`engine::analyze`] over the whole call map round after round, each
//! round re-analyzing every function against the *previous* round's
//! inferred action sets for every other function, until a round changes
//! nothing. A function can only gain one of six action kinds per
//! permission, so the sets are bounded and the round-robin terminates, per
//! `spec.md` §9.

use indexmap::IndexMap;

use crate::callmap::{CallMap, CallMapEntry};
use crate::config::Config;
use crate::permission::action::PermissionActionSet;

use super::engine::{self, FunctionAnalysis};
use super::enforcement;

/// The whole-program result: every function's final analysis against the
/// converged view, plus the converged effective action set per function
/// (compared against what was actually declared at enforcement points).
pub struct ProgramAnalysis {
    pub analyses: IndexMap<String, FunctionAnalysis>,
    pub effective: IndexMap<String, PermissionActionSet>,
}

/// Run the round-robin fixed point described above.
pub fn infer_program(calls: &CallMap, config: &Config) -> ProgramAnalysis {
    let mut effective: IndexMap<String, PermissionActionSet> =
        calls.iter().map(|(name, entry)| (name.clone(), entry.actions.clone())).collect();

    // Bounded by the number of functions: a chain of un-annotated wrappers
    // can propagate at most one more hop per round.
    let max_rounds = calls.len() + 1;
    for _ in 0..max_rounds {
        let view = view_with_effective_actions(calls, &effective);
        let mut changed = false;
        for (name, entry) in calls.iter() {
            let state = engine::initial_state(entry, &view, config);
            let result = engine::analyze(state.clone(), &entry.calls, &view);
            let derived = enforcement::infer_actions(&entry.actions, &state, &result.final_state, &result.call_errors);
            let current = effective.get(name).cloned().unwrap_or_default();
            let widened = current.union(&derived);
            if widened != current {
                changed = true;
                effective.insert(name.clone(), widened);
            }
        }
        if !changed {
            break;
        }
    }

    let view = view_with_effective_actions(calls, &effective);
    let analyses = calls
        .iter()
        .map(|(name, entry)| {
            let state = engine::initial_state(entry, &view, config);
            let result = engine::analyze(state, &entry.calls, &view);
            (name.clone(), result)
        })
        .collect();

    ProgramAnalysis { analyses, effective }
}

/// A view of `calls` where every entry's declared actions are replaced by
/// its current round's effective actions, so callee lookups during
/// analysis see inferred behavior, not just what was literally declared.
fn view_with_effective_actions(calls: &CallMap, effective: &IndexMap<String, PermissionActionSet>) -> CallMap {
    let entries = calls
        .iter()
        .map(|(name, entry)| {
            let actions = effective.get(name).cloned().unwrap_or_else(|| entry.actions.clone());
            (name.clone(), CallMapEntry { position: entry.position.clone(), calls: entry.calls.clone(), actions })
        })
        .collect();
    CallMap::from_entries(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::FunctionBuilder;
    use crate::callmap::build_call_map;
    use crate::namemap::build_name_map;
    use crate::permission::action::PermissionAction;
    use crate::permission::lattice::Capability;
    use crate::statics::concatenate_translation_units;

    fn build(decls: Vec<crate::ast::types::Declaration>) -> (CallMap, Config) {
        let flat = concatenate_translation_units(&[crate::ast::types::TranslationUnit { path: "t.c".into(), declarations: decls }]);
        let (names, _) = build_name_map(&flat).unwrap();
        let (calls, _) = build_call_map(&names);
        (calls, Config::new())
    }

    #[test]
    fn un_annotated_wrapper_propagates_its_callees_grant() {
        let (calls, config) = build(vec![
            FunctionBuilder::new("take_lock", 1).grants("lock").build(),
            FunctionBuilder::new("wrap", 2).calling(&["take_lock"]).build(),
            FunctionBuilder::new("main", 3).calling(&["wrap"]).build(),
        ]);
        let program = infer_program(&calls, &config);
        let wrap_effective = program.effective.get("wrap").unwrap();
        assert!(wrap_effective.contains(&PermissionAction::Grant(crate::ident::PermName::new("lock"))));
    }

    #[test]
    fn single_hop_scenarios_converge_in_one_round() {
        let (calls, config) = build(vec![
            FunctionBuilder::new("take_lock", 1).grants("lock").build(),
            FunctionBuilder::new("do_work", 2).needs("lock").build(),
            FunctionBuilder::new("main", 3).calling(&["take_lock", "do_work"]).build(),
        ]);
        let program = infer_program(&calls, &config);
        let main_analysis = program.analyses.get("main").unwrap();
        assert!(main_analysis.call_errors.is_empty());
        assert_eq!(main_analysis.final_state.get(&crate::ident::PermName::new("lock")).capability, Capability::CapHas);
    }
}
