//! Needful CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use needful::cli::{Cli, CommandDispatcher};
use needful::deps::TRACE_TARGET;
use needful::ui::{TerminalUI, UserInterface};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO, plus the trace records of groups in debug mode
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("needful=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("needful=info,{}=debug", TRACE_TARGET))
        })
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(debug).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("Needful starting with args: {:?}", cli);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let project_root = cli
        .project
        .as_ref()
        .cloned()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let mut ui = TerminalUI::new();

    let dispatcher = CommandDispatcher::new(project_root)
        .with_plan(cli.plan.clone())
        .with_debug(cli.debug);

    match dispatcher.dispatch(&cli, &mut ui) {
        Ok(result) => ExitCode::from(result.exit_status()),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(2)
        }
    }
}
