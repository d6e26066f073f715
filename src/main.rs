//! Markedly CLI
//!
//! Usage:
//!   markedly [OPTIONS] [FILE]
//!
//! Options:
//!   --schema <FILE>      Component schema (TOML format); built-in schema otherwise
//!   --style <FILE>       Stylesheet supplying default attribute values
//!   --max-depth <N>      Maximum declaration nesting depth
//!   --dump               Print the validated tree
//!   --format             Print the document in canonical form
//!   --print-schema       Print the component schema and exit
//!   --log-level <LEVEL>  Log level (off, error, warn, info, debug, trace)
//!   -h, --help           Print help

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use clap::Parser;
use log::{debug, LevelFilter};

use markedly::parser::DEFAULT_MAX_DEPTH;
use markedly::{parse_with_config, CheckError, ComponentRegistry, ParseConfig, Stylesheet, Validator};

#[derive(Parser, Debug)]
#[command(name = "markedly")]
#[command(about = "Parse and validate Markedly UI declarations")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Component schema file (TOML format)
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Stylesheet supplying default attribute values
    #[arg(long)]
    style: Option<PathBuf>,

    /// Maximum declaration nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Print the validated tree
    #[arg(long)]
    dump: bool,

    /// Print the document in canonical form
    #[arg(long)]
    format: bool,

    /// Print the component schema and exit
    #[arg(long)]
    print_schema: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            cli.log_level
        );
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    debug!(cli:?; "Parsed command line");

    // Load schema
    let registry = match &cli.schema {
        Some(path) => match ComponentRegistry::from_file(path) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Error loading schema '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => ComponentRegistry::builtin(),
    };

    if cli.print_schema {
        print_schema(&registry);
        return;
    }

    // Load stylesheet
    let stylesheet = cli.style.as_ref().map(|path| {
        let source = read_file(path);
        Stylesheet::from_str(&source, &registry)
            .unwrap_or_else(|e| fail(&e, &source, &path.display().to_string()))
    });

    // Read input
    let (source, filename) = match &cli.input {
        Some(path) => (read_file(path), path.display().to_string()),
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading from stdin: {}", e);
                process::exit(1);
            }
            (buffer, "<stdin>".to_string())
        }
    };

    let parse_config = ParseConfig::new().with_max_depth(cli.max_depth);
    let doc = parse_with_config(&source, &parse_config)
        .unwrap_or_else(|errors| fail(&CheckError::Parse(errors), &source, &filename));

    let mut validator = Validator::new(&registry);
    if let Some(stylesheet) = &stylesheet {
        validator = validator.with_stylesheet(stylesheet);
    }
    let validated = validator
        .validate_document(&doc)
        .unwrap_or_else(|errors| fail(&CheckError::Validation(errors), &source, &filename));

    if cli.format {
        print!("{}", doc);
    }
    if cli.dump {
        print!("{}", validated);
    }
}

fn fail(err: &CheckError, source: &str, filename: &str) -> ! {
    eprint!("{}", err.format(source, filename));
    eprintln!("{} error(s) in {}", err.len(), filename);
    process::exit(1);
}

fn read_file(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn print_schema(registry: &ComponentRegistry) {
    for kind in registry.kinds() {
        let Some(schema) = registry.get(kind) else {
            continue;
        };
        if schema.description().is_empty() {
            println!("{}", kind);
        } else {
            println!("{} - {}", kind, schema.description());
        }
        for attr in schema.attributes() {
            let mut line = format!("    {}: {}", attr.name, attr.attribute_type);
            if let Some(default) = &attr.default {
                line.push_str(&format!(" = {}", default));
            }
            if attr.required {
                line.push_str(" (required)");
            }
            if let Some(set) = schema.origin(&attr.name) {
                line.push_str(&format!(" [{}]", set));
            }
            println!("{}", line);
        }
    }
}
