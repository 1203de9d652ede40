//! fwait - wait for a file to be created.
//!
//! Usage: `fwait <path> <timeout-ms>`
//!
//! Exit codes: 0 = file appeared, 1 = timeout, 2 = usage or a missing
//! parent directory.
//!
//! # Environment Variables
//!
//! - `FWAIT_LOG=debug` - Set log filter (error, warn, info, debug, trace)

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use fwait::wait_for_file_creation;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("FWAIT_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let (path, timeout_ms) = match (args.next(), args.next(), args.next()) {
        (Some(path), Some(ms), None) => match ms.parse::<u64>() {
            Ok(ms) => (PathBuf::from(path), ms),
            Err(_) => return usage(),
        },
        _ => return usage(),
    };

    match wait_for_file_creation(&path, Duration::from_millis(timeout_ms)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!("fwait: {} was not created within {timeout_ms}ms", path.display());
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("fwait: {e}");
            ExitCode::from(2)
        }
    }
}

fn usage() -> ExitCode {
    eprintln!("usage: fwait <path> <timeout-ms>");
    ExitCode::from(2)
}
