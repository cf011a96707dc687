use crate::commands::Out;
use crate::model::Amount;
use crate::project::Project;
use crate::{Config, Result};
use anyhow::Context;

/// Creates a new project in the data directory.
///
/// # Arguments
/// - `config` - The loaded configuration, which knows the data directory.
/// - `name` - The name of the project, e.g. `summer trip`.
/// - `contributors` - The initial contributor columns, in order.
/// - `goal` - The total the contributors want to reach, encoded in the file name.
///
/// # Errors
/// - Returns an error if a project with this name already exists or the file cannot be written.
pub fn init(
    config: &Config,
    name: &str,
    contributors: &[String],
    goal: Option<Amount>,
) -> Result<Out<Vec<String>>> {
    let project = Project::create(config, name, contributors.iter().cloned(), goal)
        .with_context(|| format!("Unable to create project '{name}'"))?;
    let message = match project.goal() {
        Some(goal) => format!(
            "Created project '{name}' with a goal of {goal} at {}",
            project.path().display()
        ),
        None => format!("Created project '{name}' at {}", project.path().display()),
    };
    Ok(Out::new(message, project.ledger().contributors().to_vec()))
}
