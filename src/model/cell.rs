use crate::error::CellError;
use crate::model::Amount;
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The on-disk date format of the `Date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) const DESCRIPTION_STR: &str = "Description";
pub(crate) const DATE_STR: &str = "Date";

/// The columns every ledger starts with. Every other column belongs to a contributor.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum ReservedColumn {
    Description,
    Date,
}

serde_plain::derive_display_from_serialize!(ReservedColumn);
serde_plain::derive_fromstr_from_deserialize!(ReservedColumn);

impl ReservedColumn {
    /// The reserved columns in the order they must appear in a header.
    pub const ALL: [ReservedColumn; 2] = [ReservedColumn::Description, ReservedColumn::Date];

    pub fn from_header(header: impl AsRef<str>) -> Option<ReservedColumn> {
        match header.as_ref() {
            DESCRIPTION_STR => Some(ReservedColumn::Description),
            DATE_STR => Some(ReservedColumn::Date),
            _ => None,
        }
    }

    pub fn as_header_str(&self) -> &'static str {
        match self {
            ReservedColumn::Description => DESCRIPTION_STR,
            ReservedColumn::Date => DATE_STR,
        }
    }

    pub fn is_reserved(header: impl AsRef<str>) -> bool {
        Self::from_header(header).is_some()
    }
}

/// Trims a contributor name and checks that it can be used as a column.
///
/// # Errors
/// - `CellError::EmptyName` if nothing is left after trimming.
/// - `CellError::ReservedColumn` for `Description` and `Date`.
pub fn contributor_name(name: impl AsRef<str>) -> Result<String, CellError> {
    let name = name.as_ref().trim();
    if name.is_empty() {
        return Err(CellError::EmptyName);
    }
    if ReservedColumn::is_reserved(name) {
        return Err(CellError::ReservedColumn(name.to_string()));
    }
    Ok(name.to_string())
}

/// A typed ledger cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Date(NaiveDate),
    Amount(Amount),
}

impl fmt::Display for Cell {
    /// The on-disk representation of the cell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Date(d) => write!(f, "{}", format_date(*d)),
            Cell::Amount(a) => write!(f, "{a}"),
        }
    }
}

/// Parses a `Date` cell. Only `YYYY-MM-DD` is accepted.
pub fn parse_date(s: &str) -> Result<NaiveDate, CellError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| CellError::Date(s.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Truncates a moment to its calendar day.
pub fn day_of(moment: NaiveDateTime) -> NaiveDate {
    moment.date()
}

/// The local calendar day, used when a contribution is added without a date.
pub fn today() -> NaiveDate {
    day_of(Local::now().naive_local())
}
