// src/bin/cmd.rs

use log::{Level, LevelFilter};
use shcmd::{
    models::Status,
    system::executor::ExecutionError,
    t,
};
use std::env;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Exit code of a process terminated by `SIGINT`.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// The main entry point of `cmd`.
/// It sets up logging and interrupt handling, resolves the arguments and performs
/// centralized error handling.
fn main() {
    init_logger();

    let cancellation_token = Arc::new(AtomicBool::new(false));
    let handler_token = Arc::clone(&cancellation_token);
    // A first Ctrl+C asks the running command to stop; a second one exits at once.
    if let Err(e) = ctrlc::set_handler(move || {
        if handler_token.swap(true, Ordering::SeqCst) {
            log::error!("{}", t!("main.error.interrupted"));
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    }) {
        log::debug!("Could not install the Ctrl+C handler: {}", e);
    }

    let args: Vec<String> = env::args().collect();
    match shcmd::cli::dispatcher::run(args, cancellation_token) {
        Ok(Status::Success) => {}
        Ok(status) => std::process::exit(status.code()),
        Err(e) => {
            // --- Centralized Error Handling ---
            if let Some(exec_err) = e.downcast_ref::<ExecutionError>() {
                match exec_err {
                    ExecutionError::Cancelled => {
                        log::error!("{}", t!("main.error.interrupted"));
                        std::process::exit(INTERRUPTED_EXIT_CODE);
                    }
                    ExecutionError::NonZeroExitStatus { command, code } => {
                        log::debug!("'{}' exited with {:?}", command, code);
                        std::process::exit(code.unwrap_or(1));
                    }
                    _ => {}
                }
            }
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Plain messages for `info`, `level: message` for everything else. The filter
/// lets every level through so `log::set_max_level` alone decides, unless
/// `RUST_LOG` says otherwise.
fn init_logger() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Trace)
        .parse_default_env()
        .format(|buf, record| {
            if record.level() == Level::Info {
                writeln!(buf, "{}", record.args())
            } else {
                writeln!(
                    buf,
                    "{}: {}",
                    record.level().as_str().to_lowercase(),
                    record.args()
                )
            }
        })
        .init();
    log::set_max_level(LevelFilter::Info);
}
