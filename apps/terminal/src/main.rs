//! # Lanche Terminal Entry Point
//!
//! Boots the terminal: tracing, configuration from `LANCHE_*`, database and
//! state restore. The setup lives in `lib.rs` for testability.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match lanche_terminal::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Terminal failed to start");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
