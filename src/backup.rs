//! Backup management for project files that are about to be overwritten.

use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::debug;

const BACKUP_EXTENSION: &str = "csv";

/// Manages backup file creation and rotation.
///
/// The `Backup` struct is immutable and owns copies of the paths and settings it needs.
/// Create a new instance via `Config::backup()` or `Backup::new()`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
}

impl Backup {
    /// Creates a new `Backup` instance from a `Config`.
    pub fn new(config: &Config) -> Self {
        Self {
            backups_dir: config.backups().to_path_buf(),
            backup_copies: config.backup_copies(),
        }
    }

    /// Copies the project file at `path` into the backups directory.
    ///
    /// The filename format is `{file_stem}.YYYY-MM-DD-NNN.csv` where NNN is a sequence number.
    /// Automatically rotates old backups, keeping only `backup_copies` files per project file.
    ///
    /// Returns the path to the created backup file, or `None` if backups are disabled or there
    /// is nothing to back up yet.
    pub fn copy_project_file(&self, path: &Path) -> Result<Option<PathBuf>> {
        if self.backup_copies == 0 || !path.is_file() {
            return Ok(None);
        }
        let prefix = path
            .file_stem()
            .with_context(|| format!("No file name in {}", path.display()))?
            .to_string_lossy()
            .to_string();

        let date = today();
        let seq = self.next_sequence_number(&prefix, date)?;
        let filename = format!("{prefix}.{}-{seq:03}.{BACKUP_EXTENSION}", date.format("%Y-%m-%d"));
        let backup_path = self.backups_dir.join(&filename);

        utils::copy(path, &backup_path)?;
        debug!("Backed up {} to {}", path.display(), backup_path.display());

        self.rotate(&prefix)?;

        Ok(Some(backup_path))
    }

    /// Scans the backups directory for existing files with the given prefix and date,
    /// and returns the next sequence number.
    fn next_sequence_number(&self, prefix: &str, date: NaiveDate) -> Result<u32> {
        let max_seq = self
            .list(prefix)?
            .into_iter()
            .filter(|(_, d, _)| *d == date)
            .map(|(_, _, seq)| seq)
            .max()
            .unwrap_or(0);
        Ok(max_seq + 1)
    }

    /// Rotates old backup files, keeping only `backup_copies` files with the given prefix.
    fn rotate(&self, prefix: &str) -> Result<()> {
        let mut files = self.list(prefix)?;

        // Oldest first
        files.sort_by(|a, b| (a.1, a.2).cmp(&(b.1, b.2)));

        let to_delete = files.len().saturating_sub(self.backup_copies as usize);
        for (path, _, _) in files.into_iter().take(to_delete) {
            utils::remove(&path)?;
        }

        Ok(())
    }

    /// All backups of `prefix` with their date and sequence number.
    fn list(&self, prefix: &str) -> Result<Vec<(PathBuf, NaiveDate, u32)>> {
        let mut files = Vec::new();
        for entry in utils::read_dir(&self.backups_dir)? {
            let entry = entry.context("Failed to read directory entry")?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some((date, seq)) = parse_backup_name(&name, prefix) {
                files.push((entry.path(), date, seq));
            }
        }
        Ok(files)
    }
}

/// Returns today's date.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses the date and sequence number from a backup filename.
/// Returns None if the filename doesn't match `{prefix}.YYYY-MM-DD-NNN.csv`.
fn parse_backup_name(filename: &str, prefix: &str) -> Option<(NaiveDate, u32)> {
    let remainder = filename
        .strip_prefix(prefix)?
        .strip_prefix('.')?
        .strip_suffix(BACKUP_EXTENSION)?
        .strip_suffix('.')?;
    let (date, seq) = remainder.rsplit_once('-')?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some((date, seq.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_parse_backup_name() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 14).unwrap();
        assert_eq!(
            parse_backup_name("trip.2025-12-14-001.csv", "trip"),
            Some((date, 1))
        );
        assert_eq!(
            parse_backup_name("trip_(100).2025-12-14-042.csv", "trip_(100)"),
            Some((date, 42))
        );
        // Wrong prefix
        assert_eq!(parse_backup_name("trip.v2.2025-12-14-001.csv", "trip"), None);
        assert_eq!(parse_backup_name("other.2025-12-14-001.csv", "trip"), None);
        // Wrong extension
        assert_eq!(parse_backup_name("trip.2025-12-14-001.json", "trip"), None);
        // Not a backup
        assert_eq!(parse_backup_name("trip.csv", "trip"), None);
    }

    #[test]
    fn test_copy_project_file() {
        let env = TestEnv::new();
        let path = env.write_project("trip.csv", "Description,Date\n");
        let backup = env.config().backup();

        let first = backup.copy_project_file(&path).unwrap().unwrap();
        let second = backup.copy_project_file(&path).unwrap().unwrap();
        assert_ne!(first, second);
        assert!(first.to_string_lossy().ends_with("-001.csv"));
        assert!(second.to_string_lossy().ends_with("-002.csv"));
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "Description,Date\n");
    }

    #[test]
    fn test_copy_project_file_rotates() {
        let env = TestEnv::new();
        let path = env.write_project("trip.csv", "Description,Date\n");
        let other = env.write_project("trip.v2.csv", "Description,Date\n");
        let backup = env.config().backup();

        backup.copy_project_file(&other).unwrap();
        for _ in 0..7 {
            backup.copy_project_file(&path).unwrap();
        }

        let trip = backup.list("trip").unwrap();
        assert_eq!(trip.len(), 5);
        let oldest = trip.iter().map(|(_, _, seq)| *seq).min().unwrap();
        assert_eq!(oldest, 3);
        assert_eq!(backup.list("trip.v2").unwrap().len(), 1);
    }

    #[test]
    fn test_copy_project_file_nothing_to_do() {
        let env = TestEnv::new();
        let backup = env.config().backup();
        let missing = env.config().data_dir().join("missing.csv");
        assert_eq!(backup.copy_project_file(&missing).unwrap(), None);

        let path = env.write_project("trip.csv", "Description,Date\n");
        let disabled = Backup {
            backups_dir: env.config().backups().to_path_buf(),
            backup_copies: 0,
        };
        assert_eq!(disabled.copy_project_file(&path).unwrap(), None);
    }
}
