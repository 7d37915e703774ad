//! Restriction evaluation (`spec.md` §4.4's reporting step, §3).
//!
//! A restriction `R(p, e)` reads `uses(p) ⟹ e`: whenever a function's
//! inferred state has `Uses(p)`, its expression `e` must evaluate true
//! against that same state, or the restriction's description is reported.

use crate::ast::types::Position;
use crate::config::{Config, Expression};
use crate::diagnostics::entry::{DiagnosticEntry, Reason};
use crate::permission::lattice::Usage;
use crate::permission::presence_set::PermissionPresenceSet;

/// `Context(p, presence)` holds iff the state at `p` is `⊒ presence`.
pub fn eval(expr: &Expression, state: &PermissionPresenceSet) -> bool {
    match expr {
        Expression::Context(name, presence) => presence.leq(state.get(name)),
        Expression::And(a, b) => eval(a, state) && eval(b, state),
        Expression::Or(a, b) => eval(a, state) || eval(b, state),
        Expression::Not(a) => !eval(a, state),
    }
}

/// Check every config-declared restriction against a function's final
/// inferred state, emitting an `Error` per violated restriction.
pub fn check_restrictions(config: &Config, position: &Position, state: &PermissionPresenceSet) -> Vec<DiagnosticEntry> {
    let mut out = Vec::new();
    for (perm_name, decl) in &config.declarations {
        if state.get(perm_name).usage != Usage::Uses {
            continue;
        }
        for restriction in &decl.restrictions {
            if eval(&restriction.expression, state) {
                continue;
            }
            let text = match &restriction.description {
                Some(desc) => format!("restriction on '{perm_name}' violated: {desc}"),
                None => format!("restriction on '{perm_name}' violated"),
            };
            out.push(DiagnosticEntry::error(
                position.clone(),
                text,
                Reason::RestrictionViolation { permission: perm_name.to_string(), description: restriction.description.clone() },
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Declaration, Restriction};
    use crate::ident::PermName;
    use crate::permission::lattice::{Capability, PermissionPresence};

    fn pn(s: &str) -> PermName {
        PermName::new(s)
    }

    #[test]
    fn restriction_holds_when_expression_is_true() {
        let mut config = Config::new();
        config.declarations.insert(
            pn("lock"),
            Declaration {
                implicit: false,
                description: None,
                restrictions: vec![Restriction {
                    name: pn("lock"),
                    expression: Expression::Not(Box::new(Expression::Context(pn("lock"), PermissionPresence::has(Capability::CapHas)))),
                    description: Some("cannot take the lock recursively".into()),
                }],
            },
        );
        let mut state = PermissionPresenceSet::new();
        state.set(pn("lock"), PermissionPresence::new(Usage::Uses, Capability::CapLacks));
        let diags = check_restrictions(&config, &Position::default(), &state);
        assert!(diags.is_empty());
    }

    #[test]
    fn restriction_violation_reports_description() {
        let mut config = Config::new();
        config.declarations.insert(
            pn("lock"),
            Declaration {
                implicit: false,
                description: None,
                restrictions: vec![Restriction {
                    name: pn("lock"),
                    expression: Expression::Not(Box::new(Expression::Context(pn("lock"), PermissionPresence::has(Capability::CapHas)))),
                    description: Some("cannot take the lock recursively".into()),
                }],
            },
        );
        let mut state = PermissionPresenceSet::new();
        state.set(pn("lock"), PermissionPresence::new(Usage::Uses, Capability::CapHas));
        let diags = check_restrictions(&config, &Position::default(), &state);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].text.contains("cannot take the lock recursively"));
    }

    #[test]
    fn restriction_skipped_when_permission_not_used() {
        let mut config = Config::new();
        config.declarations.insert(
            pn("lock"),
            Declaration {
                implicit: false,
                description: None,
                restrictions: vec![Restriction {
                    name: pn("lock"),
                    expression: Expression::Context(pn("lock"), PermissionPresence::has(Capability::CapHas)),
                    description: None,
                }],
            },
        );
        let state = PermissionPresenceSet::new();
        let diags = check_restrictions(&config, &Position::default(), &state);
        assert!(diags.is_empty());
    }
}
