use std::path::Path;
use std::process::ExitCode;

use clap::Parser as _;
use tracing_subscriber::EnvFilter;

use ward::ast::serde_ast::load_translation_unit;
use ward::ast::types::TranslationUnit;
use ward::callmap::CallMap;
use ward::callmap_dump::{dump_call_map, parse_call_map};
use ward::cli::{Action, Cli};
use ward::config::{parse_config, Config};
use ward::diagnostics::OutputMode;
use ward::errors::SetupError;
use ward::pipeline;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("ward: {err}");
            ExitCode::from(SetupError::EXIT_CODE as u8)
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(cli: &Cli) -> Result<ExitCode, SetupError> {
    let config = load_config(cli)?;

    if cli.action == Action::Graph {
        let units = load_units(cli)?;
        let (calls, _) = pipeline::build_call_map_from_units(&units)?;
        return write_dump(cli, &calls);
    }

    let (entries, summary) = match &cli.callmap {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading call map, skipping AST ingest");
            let calls = load_call_map(path)?;
            pipeline::analyze(calls, config, Vec::new())
        }
        None => {
            let units = load_units(cli)?;
            pipeline::run_pipeline(&units, config)?
        }
    };

    let mode: OutputMode = cli.mode.into();
    println!("{}", mode.render(&entries, summary));
    Ok(if summary.is_failure() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn load_config(cli: &Cli) -> Result<Config, SetupError> {
    let mut config = Config::new();
    for path in &cli.config {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SetupError::Io { path: path.display().to_string(), message: e.to_string() })?;
        config.merge(parse_config(&path.display().to_string(), &text)?);
    }
    Ok(config)
}

fn load_units(cli: &Cli) -> Result<Vec<TranslationUnit>, SetupError> {
    cli.inputs.iter().map(|path| load_unit(path, &cli.preprocessor)).collect()
}

fn load_unit(path: &Path, preprocessor: &str) -> Result<TranslationUnit, SetupError> {
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        return load_translation_unit(path);
    }
    tracing::info!(preprocessor, path = %path.display(), "would preprocess translation unit");
    Err(SetupError::CParsingUnavailable { path: path.display().to_string() })
}

fn load_call_map(path: &Path) -> Result<CallMap, SetupError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| SetupError::Io { path: path.display().to_string(), message: e.to_string() })?;
    parse_call_map(&text)
}

fn write_dump(cli: &Cli, calls: &CallMap) -> Result<ExitCode, SetupError> {
    let text = dump_call_map(calls);
    match &cli.callmap {
        Some(path) => std::fs::write(path, text)
            .map_err(|e| SetupError::Io { path: path.display().to_string(), message: e.to_string() })?,
        None => println!("{text}"),
    }
    Ok(ExitCode::SUCCESS)
}
