//! chipin keeps shared-contribution ledgers: one CSV file per project, one column per
//! contributor, and an optional goal encoded in the file name.

pub mod args;
mod backup;
pub mod commands;
mod config;
mod error;
pub mod locator;
pub mod model;
pub mod project;
pub mod store;
mod utils;


pub use backup::Backup;
pub use config::Config;
pub use error::{CellError, Error, LedgerError, LedgerResult, Result};
pub use locator::{Location, Locator};
pub use project::Project;
