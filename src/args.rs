//! These structs provide the CLI interface for the chipin CLI.

use crate::model::{contributor_name, Amount};
use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// chipin: Keep track of who chipped in how much towards a shared goal.
///
/// Each project is a CSV file in the data directory. The first two columns hold a description and
/// a date for each contribution, and every other column belongs to one contributor. When a
/// project is created with a goal, the goal is kept in the file name, e.g. `trip_(1500).csv`.
#[derive(Debug, Parser, Clone)]
#[command(name = "chipin")]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a new project with its initial contributors.
    #[command(visible_alias = "i")]
    Init(InitArgs),
    /// Record a contribution from one or more contributors.
    #[command(visible_alias = "a")]
    Add(AddArgs),
    /// Add contributors to an existing project.
    #[command(visible_alias = "j")]
    Join(JoinArgs),
    /// Show the contributions and totals of a project.
    #[command(visible_alias = "v")]
    View(ViewArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where chipin data and configuration is held. Defaults to ~/chipin
    #[arg(long, env = "CHIPIN_HOME", default_value_t = default_chipin_home())]
    home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `chipin init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The name of the project.
    project: String,

    /// The total the contributors want to reach.
    #[arg(long)]
    goal: Option<Amount>,

    /// The contributors, in the order their columns should appear.
    #[arg(required = true)]
    contributors: Vec<String>,
}

impl InitArgs {
    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn goal(&self) -> Option<Amount> {
        self.goal
    }

    pub fn contributors(&self) -> &[String] {
        &self.contributors
    }
}

/// Args for the `chipin add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The name of the project.
    project: String,

    /// The date of the contribution as YYYY-MM-DD. Defaults to today.
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// What the contribution was for.
    #[arg(short = 'm', long, default_value = "")]
    description: String,

    /// One or more `name:amount` pairs, e.g. `Alice:25.50`.
    #[arg(required = true)]
    contributions: Vec<Contribution>,
}

impl AddArgs {
    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn contributions(&self) -> &[Contribution] {
        &self.contributions
    }
}

/// Args for the `chipin join` command.
#[derive(Debug, Parser, Clone)]
pub struct JoinArgs {
    /// The name of the project.
    project: String,

    /// The contributors to add.
    #[arg(required = true)]
    contributors: Vec<String>,
}

impl JoinArgs {
    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn contributors(&self) -> &[String] {
        &self.contributors
    }
}

/// Args for the `chipin view` command.
#[derive(Debug, Parser, Clone)]
pub struct ViewArgs {
    /// The name of the project.
    project: String,
}

impl ViewArgs {
    pub fn project(&self) -> &str {
        &self.project
    }
}

/// A `name:amount` pair given on the command line. The pair is split on the last `:` so that
/// names may contain colons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    name: String,
    amount: Amount,
}

impl Contribution {
    pub fn new(name: impl Into<String>, amount: Amount) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

impl FromStr for Contribution {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, amount) = s
            .rsplit_once(':')
            .ok_or_else(|| anyhow!("Expected name:amount, got '{s}'"))?;
        let name = contributor_name(name).with_context(|| format!("Invalid contribution '{s}'"))?;
        if amount.trim().is_empty() {
            bail!("Missing amount in '{s}'");
        }
        Ok(Self::new(name, amount.parse::<Amount>()?))
    }
}

impl Display for Contribution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.amount)
    }
}

fn default_chipin_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("chipin"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or CHIPIN_HOME instead of relying on the default \
                chipin home directory.",
            );
            PathBuf::from("chipin")
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
    pub fn path(&self) -> &Path {
        &self.0
    }
}
