//! Gemini Web Gateway
//!
//! Serves Gemini requests for `http://` and `https://` URLs by fetching the
//! page and, for HTML, rewriting it as gemtext.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────────┐
//!                     │                    GATEWAY                        │
//!   Gemini client     │  ┌─────────┐   ┌─────────┐   ┌───────────────┐   │
//!   ──────────────────┼─▶│   net   │──▶│ gemini  │──▶│ proxy handler │   │
//!                     │  │listener │   │ request │   │ scheme check  │   │
//!                     │  │  + TLS  │   └─────────┘   └───────┬───────┘   │
//!                     │  └─────────┘                         ▼           │
//!                     │                              ┌───────────────┐   │   HTTP(S)
//!                     │                              │    fetcher    │◀──┼──── origin
//!                     │                              └───────┬───────┘   │
//!                     │                                      ▼           │
//!   ◀─────────────────┼──┌─────────┐   ┌─────────┐   ┌───────────────┐   │
//!                     │  │ gemini  │◀──│ mapper  │◀──│  transform +  │   │
//!                     │  │response │   └─────────┘   │   convert     │   │
//!                     │  └─────────┘                 └───────────────┘   │
//!                     └───────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;

use gemini_web_gateway::cli::Cli;
use gemini_web_gateway::lifecycle;
use gemini_web_gateway::observability::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("Error: failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!("gemini-web-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    match lifecycle::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            ExitCode::FAILURE
        }
    }
}
