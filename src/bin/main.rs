//! PPL Services CLI - run the language worker or inspect queries
//!
//! Usage:
//!   ppl-services worker --language ppl [--address <url>]
//!   ppl-services tokenize "<query>"
//!   ppl-services validate "<query>" [--remote]
//!
//! Examples:
//!   ppl-services tokenize "source=logs | head 5"
//!   ppl-services validate "source=logs | invalid_command"
//!   ppl-services validate --remote "source=logs | head 5"

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use ppl_services::analyzer::PplAnalyzer;
use ppl_services::config::{Settings, WorkerSettings};
use ppl_services::markers::{to_markers, DocLinkRegistry};
use ppl_services::worker::{run_worker, WorkerLabel, WorkerProxy};

#[derive(Parser)]
#[command(name = "ppl-services")]
#[command(about = "Worker-backed editor language services for PPL")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the language worker loop on stdio (spawned by the proxy)
    Worker {
        /// Language this worker serves
        #[arg(long, default_value = "ppl")]
        language: String,

        /// Build-versioned worker address, for logging only
        #[arg(long)]
        address: Option<String>,
    },

    /// Tokenize a query and print the token stream
    Tokenize {
        /// The PPL query text
        query: String,
    },

    /// Validate a query and print its diagnostics
    Validate {
        /// The PPL query text
        query: String,

        /// Round-trip through a spawned worker instead of validating locally
        #[arg(long)]
        remote: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load_or_default(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Worker { language, address } => cmd_worker(&language, address.as_deref()).await,
        Commands::Tokenize { query } => cmd_tokenize(&query),
        Commands::Validate { query, remote } => cmd_validate(&query, remote, settings).await,
    }
}

async fn cmd_worker(language: &str, address: Option<&str>) -> ExitCode {
    match WorkerLabel::parse(language) {
        Some(WorkerLabel::Ppl) => {}
        Some(label) => {
            eprintln!("error: no analyzer registered for language: {}", label);
            return ExitCode::FAILURE;
        }
        None => {
            eprintln!("error: no worker available for language: {}", language);
            return ExitCode::FAILURE;
        }
    }

    if let Some(address) = address {
        eprintln!("[worker] serving ppl at {}", address);
    }

    match run_worker().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[worker] fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_tokenize(query: &str) -> ExitCode {
    let analyzer = PplAnalyzer::new();
    match analyzer.tokenize(query) {
        Ok(tokens) => {
            for token in tokens {
                println!(
                    "{:<18} {:>3}..{:<3}  line {} col {}  {:?}",
                    token.token_type,
                    token.start_index,
                    token.stop_index,
                    token.line,
                    token.column,
                    token.value
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn cmd_validate(query: &str, remote: bool, settings: Settings) -> ExitCode {
    let result = if remote {
        // exercise the full worker stack: spawn, validate, stop
        let mut worker_settings = settings.worker;
        if worker_settings.build_version.is_none() {
            // a standalone CLI session uses the crate version as its build id
            worker_settings = WorkerSettings {
                build_version: Some(env!("CARGO_PKG_VERSION").to_string()),
                ..worker_settings
            };
        }

        let proxy = WorkerProxy::ppl(worker_settings);
        if let Err(e) = proxy.setup().await {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
        let outcome = proxy.validate(query).await;
        proxy.stop().await;
        match outcome {
            Ok(result) => result,
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        PplAnalyzer::new().validate(query)
    };

    if result.is_valid {
        println!("OK");
        return ExitCode::SUCCESS;
    }

    let links = DocLinkRegistry::new();
    for marker in to_markers(&result.errors, &links) {
        println!(
            "error at {}:{}-{}:{}: {}",
            marker.start_line_number,
            marker.start_column,
            marker.end_line_number,
            marker.end_column,
            marker.message
        );
    }
    ExitCode::FAILURE
}
