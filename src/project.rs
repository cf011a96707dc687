//! A named project: its backing file, its ledger and how it is saved.

use crate::backup::Backup;
use crate::error::LedgerResult;
use crate::locator::Location;
use crate::model::{contributor_name, Amount, Ledger};
use crate::{store, Config, Result};
use std::path::Path;
use tracing::{debug, warn};

/// A project loaded from, or created in, the data directory.
///
/// Changes made through `ledger_mut` stay in memory until `save` is called.
#[derive(Debug, Clone)]
pub struct Project {
    location: Location,
    ledger: Ledger,
    backup: Backup,
}

impl Project {
    /// Resolves `name` in the data directory and loads its ledger.
    pub fn open(config: &Config, name: &str) -> LedgerResult<Self> {
        let location = config.locator().resolve(name)?;
        debug!("Opening project '{name}' from {}", location.path().display());
        let ledger = store::load(&location)?;
        Ok(Self {
            location,
            ledger,
            backup: config.backup(),
        })
    }

    /// Creates the backing file of a new project with the given contributor columns.
    ///
    /// Names are trimmed and repeated contributors are only added once. Empty names and
    /// `Description` or `Date` are not contributors and are skipped with a warning.
    pub fn create<S, I>(
        config: &Config,
        name: &str,
        contributors: I,
        goal: Option<Amount>,
    ) -> LedgerResult<Self>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let mut names = Vec::new();
        for c in contributors {
            match contributor_name(c) {
                Ok(n) => names.push(n),
                Err(e) => warn!("{e}, skipping"),
            }
        }

        let ledger = Ledger::with_contributors(names, goal);
        let location = config.locator().create(name, goal, ledger.fieldnames())?;
        Ok(Self {
            location,
            ledger,
            backup: config.backup(),
        })
    }

    pub fn name(&self) -> &str {
        self.location.project()
    }

    pub fn path(&self) -> &Path {
        self.location.path()
    }

    pub fn goal(&self) -> Option<Amount> {
        self.location.goal()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    /// Backs up the current backing file, then overwrites it with the ledger.
    pub fn save(&self) -> Result<()> {
        self.backup.copy_project_file(self.path())?;
        store::save(&self.ledger, self.path())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::model::Cell;
    use crate::test::{ymd, TestEnv, PROJECT_1_CSV};

    #[test]
    fn test_create_then_open() {
        let env = TestEnv::new();
        let created =
            Project::create(&env.config(), "summer trip", ["Alice", "Bob"], None).unwrap();
        let opened = Project::open(&env.config(), "summer trip").unwrap();
        assert_eq!(opened.path(), created.path());
        assert_eq!(opened.name(), "summer trip");
        assert!(opened.ledger().is_empty());
        assert_eq!(
            opened.ledger().fieldnames().headers(),
            ["Description", "Date", "Alice", "Bob"]
        );
        assert_eq!(opened.ledger(), created.ledger());
    }

    #[test]
    fn test_create_with_goal() {
        let env = TestEnv::new();
        let goal = Some(Amount::new(1000.0).unwrap());
        let created = Project::create(&env.config(), "gift", ["Alice", "Date"], goal).unwrap();
        assert!(created.path().ends_with("gift_(1000).csv"));
        assert_eq!(created.ledger().contributors(), ["Alice"]);

        let opened = Project::open(&env.config(), "gift").unwrap();
        assert_eq!(opened.goal(), goal);
        assert_eq!(opened.ledger().goal(), goal);
    }

    #[test]
    fn test_create_skips_unusable_names() {
        let env = TestEnv::new();
        let created =
            Project::create(&env.config(), "gift", [" Alice ", "", "  ", "Alice", "Bob"], None)
                .unwrap();
        assert_eq!(created.ledger().contributors(), ["Alice", "Bob"]);
        assert_eq!(
            std::fs::read_to_string(created.path()).unwrap(),
            "Description,Date,Alice,Bob\n"
        );
    }

    #[test]
    fn test_create_duplicate() {
        let env = TestEnv::new();
        Project::create(&env.config(), "gift", ["Alice"], None).unwrap();
        let err = Project::create(&env.config(), "gift", ["Bob"], None).unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate { .. }));
    }

    #[test]
    fn test_open_not_found() {
        let env = TestEnv::new();
        let err = Project::open(&env.config(), "gift").unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
    }

    #[test]
    fn test_open_corrupted() {
        let env = TestEnv::new();
        env.write_project("gift.csv", "Foo,Bar\n");
        let err = Project::open(&env.config(), "gift").unwrap_err();
        assert!(matches!(err, LedgerError::Corrupted { .. }));
    }

    #[test]
    fn test_mutate_and_save() {
        let env = TestEnv::new();
        env.write_project("test_(100).csv", PROJECT_1_CSV);

        let mut project = Project::open(&env.config(), "test").unwrap();
        project
            .ledger_mut()
            .add_contribution("test", [("Alice", 30)], Some(ymd(2016, 1, 22)))
            .unwrap();
        project.ledger_mut().add_contributor("Carol").unwrap();
        project.save().unwrap();

        let reopened = Project::open(&env.config(), "test").unwrap();
        assert_eq!(reopened.ledger(), project.ledger());
        let totals = reopened.ledger().total_per_contributor();
        assert_eq!(totals.get("Alice"), Some(Amount::new(40.0).unwrap()));
        assert_eq!(totals.get("Bob"), Some(Amount::new(5.0).unwrap()));
        assert_eq!(totals.get("Carol"), Some(Amount::ZERO));
        assert_eq!(reopened.ledger().progress(), Some(0.45));
        assert_eq!(
            reopened.ledger().rows()[2].get("Description"),
            Some(Cell::Text("test".into()))
        );

        let backups = std::fs::read_dir(env.config().backups()).unwrap().count();
        assert_eq!(backups, 1);
    }

    #[test]
    fn test_unsaved_changes_are_not_durable() {
        let env = TestEnv::new();
        env.write_project("test.csv", PROJECT_1_CSV);
        let mut project = Project::open(&env.config(), "test").unwrap();
        project.ledger_mut().add_contributor("Carol").unwrap();
        let reopened = Project::open(&env.config(), "test").unwrap();
        assert_eq!(reopened.ledger().contributors(), ["Alice", "Bob"]);
    }
}
