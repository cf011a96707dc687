//! Maps project names to their backing files in the data directory.
//!
//! A project named `name` is stored either as `<base_key>.csv` or, when it has a goal, as
//! `<base_key>_(<goal>).csv`, where `base_key` is `name` made safe for use as a file name.

use crate::error::{LedgerError, LedgerResult};
use crate::model::{Amount, Fieldnames};
use std::fs::OpenOptions;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::debug;

const CSV_SUFFIX: &str = ".csv";
const GOAL_OPEN: &str = "_(";
const GOAL_CLOSE: &str = ").csv";

/// Where a project's ledger lives and the goal encoded in its file name.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    project: String,
    path: PathBuf,
    goal: Option<Amount>,
}

impl Location {
    pub(crate) fn new(
        project: impl Into<String>,
        path: impl Into<PathBuf>,
        goal: Option<Amount>,
    ) -> Self {
        Self {
            project: project.into(),
            path: path.into(),
            goal,
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn goal(&self) -> Option<Amount> {
        self.goal
    }
}

/// Resolves and creates project files within a single data directory.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Locator {
    data_dir: PathBuf,
}

impl Locator {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Finds the one backing file of project `name`.
    ///
    /// # Errors
    /// - `NotFound` if neither the plain nor a goal-encoded file exists.
    /// - `Duplicate` if more than one file matches.
    /// - `MalformedGoal` if the goal segment of the only match is not a non-negative number.
    pub fn resolve(&self, name: &str) -> LedgerResult<Location> {
        let key = base_key(name);
        let plain = self.data_dir.join(plain_file_name(&key));
        let matches = self.goal_encoded(&key)?;
        debug!(
            "Resolving project '{name}' as '{key}' in {} ({} goal-encoded matches)",
            self.data_dir.display(),
            matches.len()
        );

        if plain.is_file() {
            if !matches.is_empty() {
                return Err(duplicate(name, Some(plain), matches));
            }
            return Ok(Location::new(name, plain, None));
        }

        match matches.len() {
            0 => Err(LedgerError::NotFound {
                project: name.to_string(),
                path: Some(plain),
            }),
            1 => {
                let (path, segment) = matches.into_iter().next().ok_or_else(|| {
                    LedgerError::NotFound {
                        project: name.to_string(),
                        path: None,
                    }
                })?;
                let goal = parse_goal(&path, &segment)?;
                Ok(Location::new(name, path, Some(goal)))
            }
            _ => Err(duplicate(name, None, matches)),
        }
    }

    /// Creates the backing file of a new project containing only the header row of
    /// `fieldnames`. The file is named with the goal when there is one.
    ///
    /// # Errors
    /// - `Duplicate` if any file of project `name` already exists.
    /// - `MalformedGoal` if `goal` is negative.
    /// - `Unwritable` if the data directory or the file cannot be created.
    pub fn create(
        &self,
        name: &str,
        goal: Option<Amount>,
        fieldnames: &Fieldnames,
    ) -> LedgerResult<Location> {
        let key = base_key(name);
        let plain = self.data_dir.join(plain_file_name(&key));
        let matches = self.goal_encoded(&key)?;
        if plain.is_file() || !matches.is_empty() {
            let plain = plain.is_file().then_some(plain);
            return Err(duplicate(name, plain, matches));
        }

        let path = match goal {
            Some(goal) => {
                let path = self.data_dir.join(goal_file_name(&key, goal));
                if goal.is_negative() {
                    return Err(LedgerError::MalformedGoal {
                        path,
                        segment: goal.to_string(),
                    });
                }
                path
            }
            None => plain,
        };

        std::fs::create_dir_all(&self.data_dir)
            .map_err(|e| LedgerError::unwritable(&self.data_dir, e))?;
        write_header(&path, fieldnames).map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => duplicate(name, Some(path.clone()), Vec::new()),
            _ => LedgerError::unwritable(&path, e),
        })?;
        debug!("Created project file {}", path.display());

        Ok(Location::new(name, path, goal))
    }

    /// Lists the `<key>_(*).csv` files of the data directory with their goal segments, sorted
    /// by path. A missing data directory has no matches.
    fn goal_encoded(&self, key: &str) -> LedgerResult<Vec<(PathBuf, String)>> {
        let entries = match std::fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(LedgerError::Unreadable {
                    path: self.data_dir.clone(),
                    source: e,
                })
            }
        };

        let mut matches = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| LedgerError::Unreadable {
                path: self.data_dir.clone(),
                source: e,
            })?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(segment) = goal_segment(file_name, key) {
                matches.push((entry.path(), segment.to_string()));
            }
        }
        matches.sort();
        Ok(matches)
    }
}

/// Makes a project name safe for use as a file name.
pub fn base_key(name: &str) -> String {
    name.replace('/', "-").replace(' ', "_")
}

fn plain_file_name(key: &str) -> String {
    format!("{key}{CSV_SUFFIX}")
}

fn goal_file_name(key: &str, goal: Amount) -> String {
    format!("{key}{GOAL_OPEN}{goal}{GOAL_CLOSE}")
}

/// Returns the text between the parentheses if `file_name` is `<key>_(<segment>).csv`.
fn goal_segment<'a>(file_name: &'a str, key: &str) -> Option<&'a str> {
    file_name
        .strip_prefix(key)?
        .strip_prefix(GOAL_OPEN)?
        .strip_suffix(GOAL_CLOSE)
}

/// Parses the goal segment of a file name. Only finite, non-negative numbers are goals.
pub(crate) fn parse_goal(path: &Path, segment: &str) -> LedgerResult<Amount> {
    let malformed = || LedgerError::MalformedGoal {
        path: path.to_path_buf(),
        segment: segment.to_string(),
    };
    let value = segment.parse::<f64>().map_err(|_| malformed())?;
    if value < 0.0 {
        return Err(malformed());
    }
    Amount::new(value).map_err(|_| malformed())
}

fn duplicate(name: &str, plain: Option<PathBuf>, matches: Vec<(PathBuf, String)>) -> LedgerError {
    let paths = plain
        .into_iter()
        .chain(matches.into_iter().map(|(path, _)| path))
        .collect();
    LedgerError::Duplicate {
        project: name.to_string(),
        paths,
    }
}

fn write_header(path: &Path, fieldnames: &Fieldnames) -> io::Result<()> {
    let file = OpenOptions::new().write(true).create_new(true).open(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(fieldnames.headers())?;
    writer.flush()
}
