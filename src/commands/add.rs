use crate::args::Contribution;
use crate::commands::Out;
use crate::model::{format_date, Record};
use crate::project::Project;
use crate::{Config, Result};
use anyhow::Context;
use chrono::NaiveDate;

/// Appends a contribution row to a project and saves it. Contributors that are not in the
/// project yet get a column of their own.
pub fn add(
    config: &Config,
    name: &str,
    description: &str,
    contributions: &[Contribution],
    date: Option<NaiveDate>,
) -> Result<Out<Record>> {
    let mut project = Project::open(config, name)
        .with_context(|| format!("Unable to open project '{name}'"))?;

    let record = project
        .ledger_mut()
        .add_contribution(
            description,
            contributions.iter().map(|c| (c.name(), c.amount())),
            date,
        )
        .context("Invalid contribution")?
        .clone();

    project
        .save()
        .with_context(|| format!("Unable to save project '{name}'"))?;

    let message = format!(
        "Added {} contribution(s) dated {} to project '{name}'",
        contributions.len(),
        format_date(record.date())
    );
    Ok(Out::new(message, record))
}
