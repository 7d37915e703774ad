//! Command-line surface (`spec.md` §6).

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::diagnostics::OutputMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputModeArg {
    Compiler,
    Html,
}

impl From<OutputModeArg> for OutputMode {
    fn from(arg: OutputModeArg) -> Self {
        match arg {
            OutputModeArg::Compiler => OutputMode::CompilerOutput,
            OutputModeArg::Html => OutputMode::HtmlOutput,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    Analysis,
    Graph,
}

/// Static permission checker for C programs.
#[derive(Debug, Parser)]
#[command(name = "ward", version, about)]
pub struct Cli {
    /// Translation-unit input paths (`.json` AST dumps, or `.c` sources
    /// routed through `--preprocessor`).
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Config file(s), merged in order.
    #[arg(long = "config")]
    pub config: Vec<PathBuf>,

    /// Preprocessor executable for `.c` inputs.
    #[arg(long, default_value = "gcc")]
    pub preprocessor: String,

    /// Flags passed through to the preprocessor, e.g. `-PI/usr/include`.
    #[arg(short = 'P')]
    pub preprocessor_flags: Vec<String>,

    /// Output format.
    #[arg(long, value_enum, default_value = "compiler")]
    pub mode: OutputModeArg,

    /// Run the analysis pipeline, or dump the call graph and exit.
    #[arg(long, value_enum, default_value = "analysis")]
    pub action: Action,

    /// With `--action graph`, write the dump to this path instead of
    /// stdout. With `--action analysis`, load a call map straight from a
    /// dump at this path instead and skip AST ingest entirely.
    #[arg(long)]
    pub callmap: Option<PathBuf>,

    /// Increase log verbosity (stacks); also controlled by `RUST_LOG`.
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
