//! JSON ingest format for translation units (§4.7 of `SPEC_FULL.md`).
//!
//! `ast::types` already derives `Serialize`/`Deserialize` directly, so this
//! module is a thin, documented front door: a real C-frontend adapter would
//! emit exactly this shape instead of Ward hand-rolling one.

use std::path::Path;

use crate::ast::types::TranslationUnit;
use crate::errors::SetupError;

/// Parse a translation unit from its JSON ingest form.
pub fn parse_translation_unit(text: &str) -> Result<TranslationUnit, SetupError> {
    serde_json::from_str(text).map_err(|e| SetupError::TranslationUnitParse { message: e.to_string() })
}

/// Read and parse a translation unit from a `.json` file on disk.
pub fn load_translation_unit(path: &Path) -> Result<TranslationUnit, SetupError> {
    let text = std::fs::read_to_string(path).map_err(|e| SetupError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_translation_unit(&text)
}
