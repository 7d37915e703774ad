//! Call map construction (`spec.md` §2 step 5, §3).
//!
//! `NameMap -> CallMap`: every name-map entry's optional AST body is
//! replaced by its lowered [`CallSequence`] (empty for declarations with no
//! body). The merge rule described in §3 for two call maps sharing an
//! identifier is already enforced one step earlier, in
//! [`crate::namemap::build_name_map`], since [`crate::ast::types::FunctionBody`]
//! is directly comparable before lowering.

use indexmap::IndexMap;

use crate::ast::types::Position;
use crate::callseq::{lower_function, CallSequence};
use crate::diagnostics::entry::DiagnosticEntry;
use crate::namemap::NameMap;
use crate::permission::action::PermissionActionSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallMapEntry {
    pub position: Position,
    pub calls: CallSequence,
    pub actions: PermissionActionSet,
}

#[derive(Debug, Clone, Default)]
pub struct CallMap {
    entries: IndexMap<String, CallMapEntry>,
}

impl CallMap {
    pub fn from_entries(entries: IndexMap<String, CallMapEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&CallMapEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CallMapEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lower every name-map entry's body into a [`CallSequence`], producing the
/// whole-program [`CallMap`] plus any structural warnings raised while
/// lowering (indirect calls, nested function definitions).
pub fn build_call_map(names: &NameMap) -> (CallMap, Vec<DiagnosticEntry>) {
    let mut entries = IndexMap::new();
    let mut warnings = Vec::new();
    for (name, entry) in names.iter() {
        let calls = match &entry.body {
            Some(body) => {
                let (seq, mut body_warnings) = lower_function(body, &entry.position);
                warnings.append(&mut body_warnings);
                seq
            }
            None => CallSequence::empty(),
        };
        entries.insert(
            name.clone(),
            CallMapEntry { position: entry.position.clone(), calls, actions: entry.actions.clone() },
        );
    }
    (CallMap { entries }, warnings)
}
