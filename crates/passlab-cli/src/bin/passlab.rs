//! passlab CLI - build and inspect compiler pass pipelines
//!
//! Usage:
//!   passlab                          # Interactive session on a demo program
//!   passlab <file> -p cse,dce        # Apply passes and print the result
//!   passlab <file> --condense --format json
//!   passlab --list-passes

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use passlab_cli::render::render_pass_list;
use passlab_cli::{render_result, Repl, Report, DEMO_PROGRAM};
use passlab_core::{CurrentResult, PipelineState, SessionConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "passlab")]
#[command(version)]
#[command(about = "passlab - interactive compiler pass pipeline explorer")]
#[command(
    long_about = "Apply passes to an IR program one at a time and see which passes would change it"
)]
struct Cli {
    /// Input IR file (reads stdin when omitted and stdin is not a terminal)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Comma-separated passes to apply, in order
    #[arg(short = 'p', long = "passes", value_name = "PASSES", value_delimiter = ',')]
    passes: Vec<String>,

    /// Only list passes that change the program
    #[arg(long)]
    condense: bool,

    /// Configuration file (defaults to ./passlab.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format for one-shot mode
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// List the pass catalog and exit
    #[arg(long)]
    list_passes: bool,

    /// Start an interactive session
    #[arg(short, long)]
    interactive: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let mut config = match SessionConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };
    init_tracing(&config.log_filter);
    install_panic_hook();

    config.condense |= cli.condense;
    let passes: Vec<String> = cli
        .passes
        .iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    if !passes.is_empty() {
        config.initial_passes = passes;
    }

    let mut state = match PipelineState::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if cli.list_passes {
        print!("{}", render_pass_list(state.catalog().as_slice()));
        return;
    }

    let interactive = cli.interactive || (cli.file.is_none() && io::stdin().is_terminal());

    let source = match &cli.file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None if interactive => DEMO_PROGRAM.to_string(),
        None => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                eprintln!("Error reading stdin: {}", e);
                process::exit(1);
            }
            buf
        }
    };
    state.set_source(source);

    if interactive {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut repl = Repl::new(state, config.tool_name, stdin.lock(), stdout.lock());
        if let Err(e) = repl.run() {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
        return;
    }

    match cli.format {
        Format::Text => {
            let text = render_result(state.current());
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
        }
        Format::Json => {
            match serde_json::to_string_pretty(&Report::from_state(&state, &config.tool_name)) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing to JSON: {}", e);
                    process::exit(1);
                }
            }
        }
    }

    if matches!(state.current(), CurrentResult::Failure(_)) {
        process::exit(1);
    }
}

/// Logs go to stderr. `PASSLAB_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_env("PASSLAB_LOG")
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Pass panics are caught and reported as failures; log them instead of
/// letting the default hook print to stderr.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        tracing::warn!("{}", info);
    }));
}
