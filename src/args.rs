//! These structs provide the CLI interface for the trip CLI.

use crate::model::{Amount, SplitMode};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// trip: A command-line tool for splitting shared trip expenses.
///
/// Record the people on a trip and what each of them paid for. The program works out how much
/// everyone is owed or owes, and the list of payments that settles the trip.
///
/// All data is kept in a JSON file inside the trip-ledger home directory. Run `trip init` once to
/// create it.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and initialize the configuration file.
    ///
    /// This is the first command you should run. By default the home directory is
    /// $HOME/trip-ledger. If you want it somewhere else then pass --trip-home or set
    /// TRIP_LEDGER_HOME.
    Init,
    /// Create, list, select, rename, delete or reset trips.
    Trip(TripArgs),
    /// Add, list, rename, reweight or remove the people on a trip.
    Person(PersonArgs),
    /// Record, list or delete expenses.
    Expense(ExpenseArgs),
    /// Show how much each person is owed (positive) or owes (negative).
    Balances(TripScopeArgs),
    /// Show the payments that settle the trip.
    Settle(TripScopeArgs),
    /// Delete every trip. A backup is taken first.
    Clear,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where trip data and configuration is held. Defaults to ~/trip-ledger
    #[arg(long, env = "TRIP_LEDGER_HOME", default_value_t = default_trip_home())]
    trip_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, trip_home: PathBuf) -> Self {
        Self {
            log_level,
            trip_home: trip_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn trip_home(&self) -> &DisplayPath {
        &self.trip_home
    }
}

/// Selects which trip a command applies to. When `--trip` is omitted the active trip is used.
#[derive(Debug, Default, Parser, Clone)]
pub struct TripScopeArgs {
    /// The id or name of the trip. Defaults to the active trip.
    #[arg(long)]
    trip: Option<String>,
}

impl TripScopeArgs {
    pub fn new(trip: Option<String>) -> Self {
        Self { trip }
    }

    pub fn trip(&self) -> Option<&str> {
        self.trip.as_deref()
    }
}

/// (Not shown): Args for the `trip trip` command.
#[derive(Debug, Parser, Clone)]
pub struct TripArgs {
    #[command(subcommand)]
    action: TripSubcommand,
}

impl TripArgs {
    pub fn new(action: TripSubcommand) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &TripSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum TripSubcommand {
    /// Create a trip and make it the active trip.
    Add(NameArgs),
    /// List all trips. The active trip is marked with '*'.
    List,
    /// Make a trip the active trip.
    Select(TripRefArgs),
    /// Rename a trip.
    Rename(TripRenameArgs),
    /// Delete a trip and everything in it. A backup is taken first.
    Delete(TripRefArgs),
    /// Delete every expense in a trip but keep its people. A backup is taken first.
    Reset(TripScopeArgs),
}

/// (Not shown): A single name argument.
#[derive(Debug, Parser, Clone)]
pub struct NameArgs {
    /// The name.
    name: String,
}

impl NameArgs {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// (Not shown): Refers to one trip by id or name.
#[derive(Debug, Parser, Clone)]
pub struct TripRefArgs {
    /// The id or name of the trip.
    trip: String,
}

impl TripRefArgs {
    pub fn new(trip: impl Into<String>) -> Self {
        Self { trip: trip.into() }
    }

    pub fn trip(&self) -> &str {
        &self.trip
    }
}

/// (Not shown): Args for the `trip trip rename` command.
#[derive(Debug, Parser, Clone)]
pub struct TripRenameArgs {
    /// The id or current name of the trip.
    trip: String,

    /// The new name.
    name: String,
}

impl TripRenameArgs {
    pub fn new(trip: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            trip: trip.into(),
            name: name.into(),
        }
    }

    pub fn trip(&self) -> &str {
        &self.trip
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// (Not shown): Args for the `trip person` command.
#[derive(Debug, Parser, Clone)]
pub struct PersonArgs {
    #[command(subcommand)]
    action: PersonSubcommand,
}

impl PersonArgs {
    pub fn new(action: PersonSubcommand) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &PersonSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum PersonSubcommand {
    /// Add a person to a trip.
    Add(PersonAddArgs),
    /// List the people on a trip.
    List(TripScopeArgs),
    /// Rename a person.
    Rename(PersonRenameArgs),
    /// Change a person's weight for weighted splits.
    Weight(PersonWeightArgs),
    /// Remove a person. Expenses they paid for are deleted and they are taken out of every other
    /// expense.
    Remove(PersonRefArgs),
}

/// (Not shown): Args for the `trip person add` command.
#[derive(Debug, Parser, Clone)]
pub struct PersonAddArgs {
    /// The person's name.
    name: String,

    /// The person's weight for weighted splits, e.g. 2 for someone who counts double. Zero,
    /// negative and non-numeric weights are treated as 1.
    #[arg(long)]
    weight: Option<f64>,

    #[clap(flatten)]
    scope: TripScopeArgs,
}

impl PersonAddArgs {
    pub fn new(name: impl Into<String>, weight: Option<f64>, trip: Option<String>) -> Self {
        Self {
            name: name.into(),
            weight,
            scope: TripScopeArgs::new(trip),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub fn trip(&self) -> Option<&str> {
        self.scope.trip()
    }
}

/// (Not shown): Refers to one person by id or name.
#[derive(Debug, Parser, Clone)]
pub struct PersonRefArgs {
    /// The id or name of the person.
    person: String,

    #[clap(flatten)]
    scope: TripScopeArgs,
}

impl PersonRefArgs {
    pub fn new(person: impl Into<String>, trip: Option<String>) -> Self {
        Self {
            person: person.into(),
            scope: TripScopeArgs::new(trip),
        }
    }

    pub fn person(&self) -> &str {
        &self.person
    }

    pub fn trip(&self) -> Option<&str> {
        self.scope.trip()
    }
}

/// (Not shown): Args for the `trip person rename` command.
#[derive(Debug, Parser, Clone)]
pub struct PersonRenameArgs {
    /// The id or current name of the person.
    person: String,

    /// The new name.
    name: String,

    #[clap(flatten)]
    scope: TripScopeArgs,
}

impl PersonRenameArgs {
    pub fn new(person: impl Into<String>, name: impl Into<String>, trip: Option<String>) -> Self {
        Self {
            person: person.into(),
            name: name.into(),
            scope: TripScopeArgs::new(trip),
        }
    }

    pub fn person(&self) -> &str {
        &self.person
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trip(&self) -> Option<&str> {
        self.scope.trip()
    }
}

/// (Not shown): Args for the `trip person weight` command.
#[derive(Debug, Parser, Clone)]
pub struct PersonWeightArgs {
    /// The id or name of the person.
    person: String,

    /// The new weight.
    weight: f64,

    #[clap(flatten)]
    scope: TripScopeArgs,
}

impl PersonWeightArgs {
    pub fn new(person: impl Into<String>, weight: f64, trip: Option<String>) -> Self {
        Self {
            person: person.into(),
            weight,
            scope: TripScopeArgs::new(trip),
        }
    }

    pub fn person(&self) -> &str {
        &self.person
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn trip(&self) -> Option<&str> {
        self.scope.trip()
    }
}

/// (Not shown): Args for the `trip expense` command.
#[derive(Debug, Parser, Clone)]
pub struct ExpenseArgs {
    #[command(subcommand)]
    action: ExpenseSubcommand,
}

impl ExpenseArgs {
    pub fn new(action: ExpenseSubcommand) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &ExpenseSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ExpenseSubcommand {
    /// Record an expense.
    Add(Box<ExpenseAddArgs>),
    /// List the expenses of a trip.
    List(TripScopeArgs),
    /// Delete an expense.
    Delete(ExpenseRefArgs),
}

/// (Not shown): Args for the `trip expense add` command.
#[derive(Debug, Parser, Clone)]
pub struct ExpenseAddArgs {
    /// What the money was spent on, e.g. "Dinner".
    #[arg(long)]
    name: String,

    /// The id or name of the person who paid.
    #[arg(long)]
    payer: String,

    /// The amount paid, e.g. 45.50 or $1,200.00. Must be positive.
    #[arg(long)]
    amount: Amount,

    /// How to split the amount between the participants.
    #[arg(long, value_enum, default_value_t = SplitMode::Equal)]
    mode: SplitMode,

    /// A person who shares the expense. Repeat for each participant. When omitted, everyone on
    /// the trip participates.
    #[arg(long = "participant")]
    participants: Vec<String>,

    #[clap(flatten)]
    scope: TripScopeArgs,
}

impl ExpenseAddArgs {
    pub fn new(
        name: impl Into<String>,
        payer: impl Into<String>,
        amount: Amount,
        mode: SplitMode,
        participants: Vec<String>,
        trip: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            payer: payer.into(),
            amount,
            mode,
            participants,
            scope: TripScopeArgs::new(trip),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payer(&self) -> &str {
        &self.payer
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn mode(&self) -> SplitMode {
        self.mode
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn trip(&self) -> Option<&str> {
        self.scope.trip()
    }
}

/// (Not shown): Refers to one expense by id or name.
#[derive(Debug, Parser, Clone)]
pub struct ExpenseRefArgs {
    /// The id or name of the expense.
    expense: String,

    #[clap(flatten)]
    scope: TripScopeArgs,
}

impl ExpenseRefArgs {
    pub fn new(expense: impl Into<String>, trip: Option<String>) -> Self {
        Self {
            expense: expense.into(),
            scope: TripScopeArgs::new(trip),
        }
    }

    pub fn expense(&self) -> &str {
        &self.expense
    }

    pub fn trip(&self) -> Option<&str> {
        self.scope.trip()
    }
}

fn default_trip_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("trip-ledger"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --trip-home or TRIP_LEDGER_HOME instead of relying on the \
                default home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("trip-ledger")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
