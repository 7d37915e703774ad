//! Extraction of `ward(action(p))` attribute expressions from a
//! declaration's raw attribute texts (`spec.md` §4.3, §9).
//!
//! The grammar is deliberately small: `ward` `(` action `(` ident `)` `)`,
//! whitespace-insensitive. Anything else — unknown action, missing
//! parens, extra tokens, multiple permissions — is not an error; it is
//! silently skipped by the source, but a caller wants to know something
//! was skipped, so this module reports it as a [`Warning`](DiagnosticEntry)
//! (§9's "emit `Warning` for any other shape, and continue").

use crate::ast::types::Position;
use crate::diagnostics::entry::DiagnosticEntry;
use crate::ident::PermName;
use crate::permission::action::{PermissionAction, PermissionActionSet};

/// Parse every `ward(...)` attribute text on a declaration into a
/// [`PermissionActionSet`], collecting a warning for each text that does
/// not match the `ward(action(ident))` shape.
pub fn extract_actions(attributes: &[String], at: &Position) -> (PermissionActionSet, Vec<DiagnosticEntry>) {
    let mut actions = PermissionActionSet::new();
    let mut warnings = Vec::new();
    for raw in attributes {
        match parse_one(raw) {
            Some(action) => actions.insert(action),
            None => warnings.push(DiagnosticEntry::warning(
                at.clone(),
                format!("malformed or unrecognized attribute: '{raw}'"),
            )),
        }
    }
    (actions, warnings)
}

/// Parse a single raw attribute text, e.g. `"ward(need(lock))"`.
/// Returns `None` for anything not matching `ward(action(ident))` exactly,
/// including an unknown action name.
fn parse_one(raw: &str) -> Option<PermissionAction> {
    let text = raw.trim();
    let inner = strip_wrap(text, "ward")?;
    let (action_name, perm_text) = split_call(inner)?;
    let perm = strip_wrap(perm_text, "")?;
    if perm.is_empty() || !is_ident(perm) {
        return None;
    }
    let name = PermName::new(perm);
    match action_name.trim() {
        "need" => Some(PermissionAction::Need(name)),
        "use" => Some(PermissionAction::Use(name)),
        "grant" => Some(PermissionAction::Grant(name)),
        "revoke" => Some(PermissionAction::Revoke(name)),
        "deny" => Some(PermissionAction::Deny(name)),
        "waive" => Some(PermissionAction::Waive(name)),
        _ => None,
    }
}

/// `name(...)` -> the text between the outermost parens, provided the
/// prefix matches `name` exactly (or any prefix, when `name` is empty —
/// used to strip the inner `action(...)` wrapper generically).
fn strip_wrap<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let rest = if name.is_empty() {
        text
    } else {
        text.strip_prefix(name)?
    };
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('(')?;
    let rest = rest.strip_suffix(')')?;
    Some(rest.trim())
}

/// `action(perm)` -> `("action", "perm")`, splitting on the first `(` and
/// requiring the remainder to end with a single matching `)`.
fn split_call(text: &str) -> Option<(&str, &str)> {
    let open = text.find('(')?;
    if !text.ends_with(')') {
        return None;
    }
    let name = &text[..open];
    let args = &text[open..];
    Some((name, args))
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
