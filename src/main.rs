use chipin::args::{Args, Command};
use chipin::{commands, CellError, Config, LedgerError, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            // Ledger failures print on one line.
            if e.downcast_ref::<LedgerError>().is_some() || e.downcast_ref::<CellError>().is_some()
            {
                error!("{e:#}");
            } else {
                error!("Exiting with error: {e:?}");
            }
            ExitCode::FAILURE
        }
    }
}

pub fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let config = Config::load(args.common().home().path())?;

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(
            &config,
            init_args.project(),
            init_args.contributors(),
            init_args.goal(),
        )?
        .print(),

        Command::Add(add_args) => commands::add(
            &config,
            add_args.project(),
            add_args.description(),
            add_args.contributions(),
            add_args.date(),
        )?
        .print(),

        Command::Join(join_args) => {
            commands::join(&config, join_args.project(), join_args.contributors())?.print()
        }

        Command::View(view_args) => commands::view(&config, view_args.project())?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => {
            // The library and the binary share a crate name.
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_level(false)
        .init();
}
