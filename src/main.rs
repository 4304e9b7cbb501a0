use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use trip_ledger::args::{Args, Command, ExpenseSubcommand, PersonSubcommand, TripSubcommand};
use trip_ledger::{commands, Config, Result};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().trip_home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Trip(trip_args) => {
            let config = Config::load(home).await?;
            match trip_args.action() {
                TripSubcommand::Add(args) => {
                    commands::trip_add(config, args.clone()).await?.print()
                }
                TripSubcommand::List => commands::trip_list(config).await?.print(),
                TripSubcommand::Select(args) => {
                    commands::trip_select(config, args.clone()).await?.print()
                }
                TripSubcommand::Rename(args) => {
                    commands::trip_rename(config, args.clone()).await?.print()
                }
                TripSubcommand::Delete(args) => {
                    commands::trip_delete(config, args.clone()).await?.print()
                }
                TripSubcommand::Reset(args) => {
                    commands::trip_reset(config, args.clone()).await?.print()
                }
            }
        }

        Command::Person(person_args) => {
            let config = Config::load(home).await?;
            match person_args.action() {
                PersonSubcommand::Add(args) => {
                    commands::person_add(config, args.clone()).await?.print()
                }
                PersonSubcommand::List(args) => {
                    commands::person_list(config, args.clone()).await?.print()
                }
                PersonSubcommand::Rename(args) => {
                    commands::person_rename(config, args.clone())
                        .await?
                        .print()
                }
                PersonSubcommand::Weight(args) => {
                    commands::person_weight(config, args.clone())
                        .await?
                        .print()
                }
                PersonSubcommand::Remove(args) => {
                    commands::person_remove(config, args.clone())
                        .await?
                        .print()
                }
            }
        }

        Command::Expense(expense_args) => {
            let config = Config::load(home).await?;
            match expense_args.action() {
                ExpenseSubcommand::Add(args) => {
                    commands::expense_add(config, *args.clone()).await?.print()
                }
                ExpenseSubcommand::List(args) => {
                    commands::expense_list(config, args.clone()).await?.print()
                }
                ExpenseSubcommand::Delete(args) => {
                    commands::expense_delete(config, args.clone())
                        .await?
                        .print()
                }
            }
        }

        Command::Balances(report_args) => {
            let config = Config::load(home).await?;
            commands::balances(config, report_args.clone()).await?.print()
        }

        Command::Settle(report_args) => {
            let config = Config::load(home).await?;
            commands::settle(config, report_args.clone()).await?.print()
        }

        Command::Clear => commands::clear(Config::load(home).await?).await?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for the library and binary only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
