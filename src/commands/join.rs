use crate::commands::Out;
use crate::model::contributor_name;
use crate::project::Project;
use crate::{Config, Result};
use anyhow::Context;
use tracing::debug;

/// Adds contributor columns to a project. Names that already have a column are left alone.
///
/// Names are trimmed. An empty name, or `Description` or `Date`, fails the whole command and
/// the project is left untouched.
pub fn join(config: &Config, name: &str, contributors: &[String]) -> Result<Out<Vec<String>>> {
    let names = contributors
        .iter()
        .map(contributor_name)
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Invalid contributor")?;

    let mut project = Project::open(config, name)
        .with_context(|| format!("Unable to open project '{name}'"))?;

    let mut added = Vec::new();
    for c in names {
        if project.ledger_mut().add_contributor(&c)? {
            added.push(c);
        } else {
            debug!("'{c}' already has a column in project '{name}'");
        }
    }

    if added.is_empty() {
        return Ok(format!("No new contributors for project '{name}'").into());
    }

    project
        .save()
        .with_context(|| format!("Unable to save project '{name}'"))?;
    let message = format!("Added {} to project '{name}'", added.join(", "));
    Ok(Out::new(message, added))
}
