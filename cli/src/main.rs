#![deny(missing_docs)]

//! # OpenAPI Sync Verifier
//!
//! CI check that the OpenAPI contract and the API definition embedded in the
//! deployment template describe the same routes, methods, security and
//! gateway integrations.
//!
//! Exit status is `0` when the documents agree and `1` on any finding or
//! fatal error.

use clap::Parser;
use oas_sync_core::{verify, AppResult, SyncConfig, SyncReport};
use oas_sync_core::{DEFAULT_API_RESOURCE, DEFAULT_CONTRACT_PATH, DEFAULT_TEMPLATE_PATH};
use std::path::PathBuf;
use std::process::ExitCode;

mod logging;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Verify that the OpenAPI contract and the deployment template are in sync"
)]
struct Cli {
    /// Repository root the document paths are resolved against (the working
    /// directory unless given).
    #[clap(long, default_value = ".")]
    repo_root: PathBuf,

    /// Path of the OpenAPI contract document.
    #[clap(long, default_value = DEFAULT_CONTRACT_PATH)]
    contract: PathBuf,

    /// Path of the deployment template embedding the API definition.
    #[clap(long, default_value = DEFAULT_TEMPLATE_PATH)]
    template: PathBuf,

    /// Logical id of the API resource under `Resources` in the template.
    #[clap(long, default_value = DEFAULT_API_RESOURCE)]
    api_resource: String,

    /// Log pipeline diagnostics to stderr.
    #[clap(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> AppResult<SyncConfig> {
        Ok(SyncConfig {
            root: std::path::absolute(&self.repo_root)?,
            contract: self.contract.clone(),
            template: self.template.clone(),
            api_resource: self.api_resource.clone(),
        })
    }
}

fn run(cli: &Cli) -> AppResult<SyncReport> {
    let config = cli.config()?;
    tracing::debug!(?config, "resolved configuration");
    verify(&config)
}

/// Where an outcome line is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// What the process prints and how it exits.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Outcome {
    status: u8,
    stream: Stream,
    message: String,
}

/// Maps a verification result onto the exit status and output contract:
/// in sync on stdout with `0`, anything else on stderr with `1`.
fn render(result: AppResult<SyncReport>) -> Outcome {
    match result {
        Ok(report) if report.is_in_sync() => Outcome {
            status: 0,
            stream: Stream::Stdout,
            message: format!("✅ {}", report),
        },
        Ok(report) => Outcome {
            status: 1,
            stream: Stream::Stderr,
            message: format!("❌ OpenAPI mismatch detected:\n{}", report),
        },
        Err(e) => Outcome {
            status: 1,
            stream: Stream::Stderr,
            message: format!("❌ {}", e),
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let outcome = render(run(&cli));
    match outcome.stream {
        Stream::Stdout => println!("{}", outcome.message),
        Stream::Stderr => eprintln!("{}", outcome.message),
    }
    ExitCode::from(outcome.status)
}
