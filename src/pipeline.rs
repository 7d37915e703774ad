//! Orchestrates the eight pipeline stages of `spec.md` §2: AST ingest and
//! static-name disambiguation, name-map and call-map construction, per-
//! function permission inference, conflict/restriction/enforcement
//! checking, and the diagnostics sink.

use crate::ast::types::TranslationUnit;
use crate::callmap::{build_call_map, CallMap};
use crate::config::Config;
use crate::diagnostics::entry::{DiagnosticEntry, Reason};
use crate::diagnostics::sink::{run_with_sink, DiagnosticsSink, Summary};
use crate::errors::SetupError;
use crate::inference::{enforcement, restriction, summary};
use crate::namemap::build_name_map;
use crate::statics::concatenate_translation_units;

/// Stages 1-5: ingest, static-name disambiguation, name-map and call-map
/// construction. Fatal ([`SetupError`]) failures surface here, before any
/// diagnostics-channel thread exists.
pub fn build_call_map_from_units(units: &[TranslationUnit]) -> Result<(CallMap, Vec<DiagnosticEntry>), SetupError> {
    if units.is_empty() {
        return Err(SetupError::NoTranslationUnits);
    }
    let flat = concatenate_translation_units(units);
    let (names, name_warnings) = build_name_map(&flat)?;
    let (calls, call_warnings) = build_call_map(&names);
    Ok((calls, name_warnings.into_iter().chain(call_warnings).collect()))
}

/// Stages 6-8: per-function inference, conflict/restriction/enforcement
/// checking, and diagnostics drain. Takes a [`CallMap`] directly so a
/// call-graph dump loaded via `--callmap` can skip stages 1-5 entirely.
pub fn analyze(calls: CallMap, config: Config, structural_warnings: Vec<DiagnosticEntry>) -> (Vec<DiagnosticEntry>, Summary) {
    run_with_sink(move |sink: DiagnosticsSink| {
        for warning in structural_warnings {
            sink.emit(warning);
        }
        analyze_call_map(&calls, &config, &sink);
    })
}

/// The full pipeline, ingest through diagnostics drain.
pub fn run_pipeline(units: &[TranslationUnit], config: Config) -> Result<(Vec<DiagnosticEntry>, Summary), SetupError> {
    let (calls, warnings) = build_call_map_from_units(units)?;
    Ok(analyze(calls, config, warnings))
}

fn analyze_call_map(calls: &CallMap, config: &Config, sink: &DiagnosticsSink) {
    let program = summary::infer_program(calls, config);

    for (name, entry) in calls.iter() {
        sink.emit(DiagnosticEntry::note(entry.position.clone(), format!("checking '{name}'")));

        let path = entry.position.path.clone();
        let result = program.analyses.get(name).expect("every call-map entry has a converged analysis");

        for call_error in &result.call_errors {
            sink.emit(DiagnosticEntry::error(
                entry.position.clone(),
                format!(
                    "'{name}' calls '{}' without satisfying its precondition: requires {} permission '{}'",
                    call_error.callee, call_error.violation.action, call_error.violation.permission
                ),
                Reason::BecauseCall {
                    callee: call_error.callee.clone(),
                    action: call_error.violation.action.to_string(),
                },
            ));
        }

        for permission in &result.conflicts {
            sink.emit(DiagnosticEntry::error(
                entry.position.clone(),
                format!("'{name}' reaches conflicting capabilities for permission '{permission}'"),
                Reason::Conflict { permission: permission.to_string() },
            ));
        }

        for diagnostic in restriction::check_restrictions(config, &entry.position, &result.final_state) {
            sink.emit(diagnostic);
        }

        let inferred = program.effective.get(name).cloned().unwrap_or_else(|| entry.actions.clone());
        if let Some(diagnostic) =
            enforcement::check_enforcement(config, &path, name, &entry.position, &entry.actions, &inferred)
        {
            sink.emit(diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::{call_stmt, if_stmt, FunctionBuilder, TranslationUnitBuilder};
    use crate::ast::types::FunctionBody;
    use crate::config::{parse_config, Enforcement};
    use crate::diagnostics::entry::Severity;
    use crate::inference::engine;

    fn tu(decls: Vec<crate::ast::types::Declaration>) -> TranslationUnit {
        TranslationUnit { path: "t.c".into(), declarations: decls }
    }

    #[test]
    fn scenario_1_basic_need_satisfied() {
        let units = vec![tu(vec![
            FunctionBuilder::new("take_lock", 1).grants("lock").build(),
            FunctionBuilder::new("do_work", 2).needs("lock").build(),
            FunctionBuilder::new("main", 3).calling(&["take_lock", "do_work"]).build(),
        ])];
        let (entries, summary) = run_pipeline(&units, Config::new()).unwrap();
        assert_eq!(summary.errors, 0);
        assert!(!entries.iter().any(|e| e.severity == Severity::Error));
    }

    #[test]
    fn scenario_2_need_unsatisfied() {
        let units = vec![tu(vec![
            FunctionBuilder::new("take_lock", 1).grants("lock").build(),
            FunctionBuilder::new("do_work", 2).needs("lock").build(),
            FunctionBuilder::new("main", 3).calling(&["do_work"]).build(),
        ])];
        let (entries, summary) = run_pipeline(&units, Config::new()).unwrap();
        assert!(summary.is_failure());
        assert!(entries.iter().any(|e| e.severity == Severity::Error && e.text.contains("need permission 'lock'")));
    }

    #[test]
    fn scenario_3_branch_conflict() {
        let branch = FunctionBuilder::new("main", 1)
            .body(FunctionBody {
                statements: vec![if_stmt(vec![call_stmt("take_lock")], vec![]), call_stmt("do_work")],
            })
            .build();
        let units = vec![tu(vec![
            FunctionBuilder::new("take_lock", 2).grants("lock").build(),
            FunctionBuilder::new("do_work", 3).needs("lock").build(),
            branch,
        ])];
        let (entries, summary) = run_pipeline(&units, Config::new()).unwrap();
        assert!(summary.is_failure());
        assert!(entries
            .iter()
            .any(|e| e.severity == Severity::Error && matches!(&e.reason, Reason::Conflict { permission } if permission == "lock")));
    }

    #[test]
    fn scenario_4_recursive_lock_restriction() {
        let config = parse_config("ward.cfg", r#"lock -> !lock "cannot take the lock recursively";"#).unwrap();
        let units = vec![tu(vec![
            FunctionBuilder::new("take_lock", 1).grants("lock").build(),
            FunctionBuilder::new("recursive_take", 2).uses("lock").calling(&["take_lock"]).build(),
        ])];
        let (entries, summary) = run_pipeline(&units, config).unwrap();
        assert!(summary.is_failure());
        assert_eq!(summary.errors, 1, "using a permission a callee then grants should raise exactly one error");
        assert!(entries
            .iter()
            .any(|e| e.severity == Severity::Error && e.text.contains("cannot take the lock recursively")));
    }

    #[test]
    fn scenario_5_implicit_with_waiver() {
        let mut config = Config::new();
        config.merge(parse_config("ward.cfg", "implicit gc_safe;").unwrap());
        let units = vec![tu(vec![
            FunctionBuilder::new("g", 1).waives("gc_safe").build(),
            FunctionBuilder::new("f", 2).calling(&["g"]).build(),
        ])];
        let (entries, summary) = run_pipeline(&units, config).unwrap();
        assert_eq!(summary.errors, 0);
        assert!(!entries.iter().any(|e| e.severity == Severity::Error));

        let (calls, _) = build_call_map_from_units(&units).unwrap();
        let gc_safe = crate::ident::PermName::new("gc_safe");
        let f = calls.get("f").unwrap();
        let g = calls.get("g").unwrap();
        let f_state = engine::initial_state(f, &calls, &config);
        let g_state = engine::initial_state(g, &calls, &config);
        assert_eq!(f_state.get(&gc_safe).capability, crate::permission::lattice::Capability::CapHas);
        assert!(g_state.get(&gc_safe).capability != crate::permission::lattice::Capability::CapHas);
    }

    #[test]
    fn scenario_6_static_collision_does_not_raise_fatal_error() {
        let a = TranslationUnitBuilder::new("a.c")
            .declare(FunctionBuilder::new("init", 1).static_local().calling(&["helper_a"]).build())
            .build();
        let b = TranslationUnitBuilder::new("b.c")
            .declare(FunctionBuilder::new("init", 1).static_local().calling(&["helper_b"]).build())
            .build();
        let (calls, _) = build_call_map_from_units(&[a, b]).unwrap();
        assert!(calls.get("a.c`init").is_some());
        assert!(calls.get("b.c`init").is_some());
        assert_ne!(calls.get("a.c`init").unwrap().calls, calls.get("b.c`init").unwrap().calls);
    }

    #[test]
    fn enforcement_mismatch_is_reported_when_enforced() {
        let mut config = Config::new();
        config.enforcements.push(Enforcement::EnforceFunction("do_work".into()));
        let units = vec![tu(vec![
            FunctionBuilder::new("take_lock", 1).grants("lock").build(),
            FunctionBuilder::new("do_work", 2).calling(&["take_lock"]).build(),
        ])];
        let (entries, summary) = run_pipeline(&units, config).unwrap();
        assert!(summary.is_failure());
        assert!(entries.iter().any(|e| matches!(e.reason, Reason::EnforcementMismatch { .. })));
    }

    #[test]
    fn empty_input_is_a_setup_error() {
        assert!(matches!(run_pipeline(&[], Config::new()), Err(SetupError::NoTranslationUnits)));
    }
}
