//! Resume tailoring CLI: collect a profile once, then tailor it to a job
//! description through a generative-text API and write one resume document.

pub mod collect;
pub mod config;
pub mod console;
pub mod errors;
pub mod generate;
pub mod llm_client;
pub mod models;
pub mod render;
pub mod store;
pub mod tailoring;

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::AppError;

/// Structured logging to stderr so it never interleaves with the prompts
/// on stdout. `RUST_LOG` wins over the configured level.
pub fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Reports the outcome of a flow to the user and picks the exit code.
/// Cancellation is reported as a notice and exits 0.
pub fn finish<T>(result: Result<T, AppError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) if !e.is_failure() => {
            println!("\n{e}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("\nError [{}]: {e}", e.code());
            if let Some(hint) = e.hint() {
                eprintln!("{hint}");
            }
            ExitCode::FAILURE
        }
    }
}
