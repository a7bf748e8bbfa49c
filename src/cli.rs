// MacroText
// Copyright (c) 2025 Harlen Batagelo
// https://github.com/hbatagelo/macrotext
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command-line interface.
//!
//! Parses command-line arguments into a [`CliConfig`], loads the macro
//! catalogs and the ambient context it names, and runs the requested
//! mode: expand text, check a catalog, or list macro names.

use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use clap::{Arg, ArgAction, ArgMatches, Command};
use function_name::named;
use log::LevelFilter;
use owo_colors::OwoColorize;
use thiserror::Error;

use macrotext::{
    catalog::default_catalog_path,
    context::{self, ContextError},
    *,
};

/// Errors that may occur while loading inputs or expanding text.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    #[error("{0}")]
    Eval(#[from] EvalError),

    #[error("{0} macro(s) failed to compile")]
    Check(usize),

    #[error("Logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Expr(String),
    File(PathBuf),
    Stdin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Expand,
    Check,
    List,
}

/// Result of command-line parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    pub input: Input,
    pub mode: Mode,

    /// Catalogs merged after the builtins, in command-line order.
    pub catalogs: Vec<PathBuf>,

    /// Loads the catalog bundled with the binary.
    pub builtins: bool,

    pub context_file: Option<PathBuf>,

    /// `KEY=VALUE` entries applied after the context file.
    pub assignments: Vec<String>,

    pub log_level: LevelFilter,
}

pub fn command() -> Command {
    Command::new(APP_NAME)
        .author(APP_AUTHOR)
        .version(APP_SEMVER)
        .about(APP_ABOUT)
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("Text file to expand; '-' or none reads standard input")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("expr")
                .short('e')
                .long("expr")
                .value_name("TEXT")
                .help("Expand TEXT instead of reading a file")
                .conflicts_with("file"),
        )
        .arg(
            Arg::new("catalog")
                .short('c')
                .long("catalog")
                .value_name("PATH")
                .help("Macro catalog in TOML or JSON format (repeatable)")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("no-builtins")
                .long("no-builtins")
                .help("Do not load the bundled macros")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("context")
                .short('C')
                .long("context")
                .value_name("PATH")
                .help("JSON object used as the ambient context")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("set")
                .short('s')
                .long("set")
                .value_name("KEY=VALUE")
                .help("Set a context entry (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Compile every macro of the catalogs and report failures")
                .action(ArgAction::SetTrue)
                .conflicts_with("list"),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("Print the names of the registered macros")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log evaluation details")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Log errors only")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
        .after_help("Without --catalog, the user catalog is loaded from the data directory when present")
}

/// Parses the process arguments, exiting with usage on error.
pub fn parse_args() -> CliConfig {
    config_from_matches(&command().get_matches())
}

#[cfg(test)]
pub fn parse_from<I, T>(args: I) -> Result<CliConfig, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Ok(config_from_matches(&command().try_get_matches_from(args)?))
}

fn config_from_matches(matches: &ArgMatches) -> CliConfig {
    let input = match (
        matches.get_one::<String>("expr"),
        matches.get_one::<PathBuf>("file"),
    ) {
        (Some(text), _) => Input::Expr(text.clone()),
        (None, Some(path)) if path != Path::new("-") => Input::File(path.clone()),
        _ => Input::Stdin,
    };

    let mode = if matches.get_flag("check") {
        Mode::Check
    } else if matches.get_flag("list") {
        Mode::List
    } else {
        Mode::Expand
    };

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else if matches.get_flag("quiet") {
        LevelFilter::Error
    } else if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    CliConfig {
        input,
        mode,
        catalogs: matches
            .get_many::<PathBuf>("catalog")
            .map(|paths| paths.cloned().collect())
            .unwrap_or_default(),
        builtins: !matches.get_flag("no-builtins"),
        context_file: matches.get_one::<PathBuf>("context").cloned(),
        assignments: matches
            .get_many::<String>("set")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        log_level,
    }
}

pub fn init_logger(level: LevelFilter) -> Result<(), CliError> {
    simple_logger::SimpleLogger::new().with_level(level).init()?;
    Ok(())
}

#[named]
pub fn run(config: &CliConfig) -> Result<(), CliError> {
    log::debug!("{} {:?}", function_name!().white().bold(), config.mode);

    let catalog = load_catalog(config)?;
    match config.mode {
        Mode::List => {
            let mut stdout = io::stdout().lock();
            for name in catalog.registry().names() {
                writeln!(stdout, "{name}")?;
            }
        }
        Mode::Check => check(&catalog)?,
        Mode::Expand => {
            let context = load_context(config)?;
            let text = read_input(&config.input)?;
            let output = expand(&catalog, &context, &text)?;
            io::stdout().write_all(output.as_bytes())?;
        }
    }
    Ok(())
}

pub fn expand(catalog: &Catalog, context: &Context, text: &str) -> Result<String, EvalError> {
    let settings = catalog.settings();
    Evaluator::new(catalog.registry(), ScriptCalculator::new(&settings))
        .with_settings(settings)
        .evaluate(text, context)
}

/// Compiles every macro and prints one line per definition.
fn check(catalog: &Catalog) -> Result<(), CliError> {
    let registry = catalog.registry();
    let calculator = ScriptCalculator::new(&catalog.settings());
    let mut stdout = io::stdout().lock();
    let mut failures = 0;

    for name in registry.names() {
        let Some(definition) = registry.get(name) else {
            continue;
        };
        match calculator.compile(definition) {
            Ok(_) => writeln!(stdout, "{} {name}", "ok".green())?,
            Err(err) => {
                failures += 1;
                writeln!(stdout, "{} {name}: {err}", "FAILED".red().bold())?;
            }
        }
    }

    if failures > 0 {
        return Err(CliError::Check(failures));
    }
    Ok(())
}

fn load_catalog(config: &CliConfig) -> Result<Catalog, CliError> {
    let mut catalog = if config.builtins {
        Catalog::builtin()?
    } else {
        Catalog::default()
    };

    if config.catalogs.is_empty() {
        let path = default_catalog_path();
        if path.exists() {
            catalog.merge(Catalog::from_file(&path)?);
        }
    }

    for path in &config.catalogs {
        catalog.merge(Catalog::from_file(path)?);
    }
    Ok(catalog)
}

fn load_context(config: &CliConfig) -> Result<Context, CliError> {
    let mut context = match &config.context_file {
        Some(path) => context::from_json_file(path)?,
        None => Context::new(),
    };
    for assignment in &config.assignments {
        let (key, value) = context::parse_assignment(assignment)?;
        context.insert(key, value);
    }
    Ok(context)
}

fn read_input(input: &Input) -> io::Result<String> {
    match input {
        Input::Expr(text) => Ok(text.clone()),
        Input::File(path) => fs::read_to_string(path),
        Input::Stdin => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
