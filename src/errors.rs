//! Fatal setup errors (`spec.md` §7): config parse failure, translation-unit
//! ingest failure, duplicate non-equal definitions, "no translation units",
//! and call-graph dump parse failure. These terminate the process before or
//! during pipeline construction; they never flow through the diagnostics
//! channel (§4.6's `DiagnosticEntry` is for analysis-level output only).

use thiserror::Error;

use crate::ast::types::Position;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("{path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to parse translation unit: {message}")]
    TranslationUnitParse { message: String },

    #[error("{position}: config error: {message}")]
    Config { position: Position, message: String },

    #[error("multiple definitions of '{name}' with differing bodies")]
    MultipleDefinitions { name: String },

    #[error("no translation units given")]
    NoTranslationUnits,

    #[error("failed to parse call map: {message}")]
    CallMapUnitParseError { message: String },

    #[error("{path}: C parsing is not implemented; preprocess externally and pass JSON AST input instead")]
    CParsingUnavailable { path: String },
}

impl SetupError {
    /// Exit code `main` uses for this class of error (§6: "parse/config
    /// errors exit with a distinct non-zero code").
    pub const EXIT_CODE: i32 = 2;
}
