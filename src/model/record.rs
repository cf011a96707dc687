use crate::model::cell::{Cell, ReservedColumn};
use crate::model::Amount;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of a ledger: what the contribution was for, when it happened and how much each
/// contributor gave.
///
/// The set of contributor keys is kept identical to the ledger's contributor columns by
/// `Ledger`; the column order itself lives in `Fieldnames`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    description: String,
    date: NaiveDate,
    amounts: BTreeMap<String, Amount>,
}

impl Record {
    /// Creates a row with a zero amount for each of `contributors`.
    pub(crate) fn new<S>(
        description: impl Into<String>,
        date: NaiveDate,
        contributors: &[S],
    ) -> Self
    where
        S: AsRef<str>,
    {
        Self {
            description: description.into(),
            date,
            amounts: contributors
                .iter()
                .map(|c| (c.as_ref().to_string(), Amount::ZERO))
                .collect(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The amount given by `contributor` in this row, `None` if there is no such column.
    pub fn amount(&self, contributor: impl AsRef<str>) -> Option<Amount> {
        self.amounts.get(contributor.as_ref()).copied()
    }

    /// The typed value of any column.
    pub fn get(&self, column: impl AsRef<str>) -> Option<Cell> {
        let column = column.as_ref();
        match ReservedColumn::from_header(column) {
            Some(ReservedColumn::Description) => Some(Cell::Text(self.description.clone())),
            Some(ReservedColumn::Date) => Some(Cell::Date(self.date)),
            None => self.amount(column).map(Cell::Amount),
        }
    }

    pub(crate) fn set_amount(&mut self, contributor: impl Into<String>, amount: Amount) {
        self.amounts.insert(contributor.into(), amount);
    }

    /// Inserts a zero amount unless the contributor already has a value.
    pub(crate) fn backfill(&mut self, contributor: impl Into<String>) {
        self.amounts.entry(contributor.into()).or_insert(Amount::ZERO);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 1, 21).unwrap()
    }

    #[test]
    fn test_new_is_zeroed() {
        let r = Record::new("x", date(), &["Alice", "Bob"]);
        assert_eq!(r.amount("Alice"), Some(Amount::ZERO));
        assert_eq!(r.amount("Bob"), Some(Amount::ZERO));
        assert_eq!(r.amount("Carol"), None);
    }

    #[test]
    fn test_get() {
        let mut r = Record::new("First contribution", date(), &["Alice"]);
        r.set_amount("Alice", Amount::new(10.0).unwrap());
        assert_eq!(
            r.get("Description"),
            Some(Cell::Text("First contribution".into()))
        );
        assert_eq!(r.get("Date"), Some(Cell::Date(date())));
        assert_eq!(r.get("Alice"), Some(Cell::Amount(Amount::new(10.0).unwrap())));
        assert_eq!(r.get("Nobody"), None);
    }

    #[test]
    fn test_backfill_keeps_existing() {
        let mut r = Record::new("x", date(), &["Alice"]);
        r.set_amount("Alice", Amount::new(3.0).unwrap());
        r.backfill("Alice");
        r.backfill("Bob");
        assert_eq!(r.amount("Alice").unwrap().value(), 3.0);
        assert_eq!(r.amount("Bob"), Some(Amount::ZERO));
    }
}
