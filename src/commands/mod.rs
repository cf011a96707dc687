//! The `init`, `add`, `join` and `view` subcommands.
//!
//! Each one takes the loaded `Config`, works on a single project and hands back an `Out` for
//! the binary to print.

mod add;
mod init;
mod join;
mod view;

use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use add::add;
pub use init::init;
pub use join::join;
pub use view::{view, ContributorReport, Report};

/// What a subcommand reports back: a line (or table) for the user and, when there is one, the
/// value it produced, e.g. the appended `Record` or a `Report`.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    message: String,
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// An outcome with nothing to show beyond the message, e.g. a `join` that added no one.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Logs the message at info level. The value goes to debug level as pretty JSON, so
    /// `--log-level debug` shows exactly what was written or computed.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("{json}");
            }
        }
    }
}
