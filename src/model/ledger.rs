use crate::error::CellError;
use crate::model::cell::{contributor_name, today};
use crate::model::{Amount, Fieldnames, IntoAmount, Record};
use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::trace;

/// The in-memory table of contributions for one project.
///
/// Every row holds an amount for every contributor column. Operations keep that true by
/// construction: a new contributor is backfilled with zero on every existing row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ledger {
    fieldnames: Fieldnames,
    rows: Vec<Record>,
    goal: Option<Amount>,
}

impl Ledger {
    /// An empty ledger with only the `Description` and `Date` columns.
    pub fn new(goal: Option<Amount>) -> Self {
        Self {
            fieldnames: Fieldnames::default(),
            rows: Vec::new(),
            goal,
        }
    }

    /// An empty ledger with the given initial contributor columns. Names are trimmed; duplicates,
    /// empty names and reserved column names are skipped.
    pub fn with_contributors<S, I>(contributors: I, goal: Option<Amount>) -> Self
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let mut ledger = Self::new(goal);
        for c in contributors {
            if let Err(e) = ledger.add_contributor(c) {
                trace!("Skipping contributor: {e}");
            }
        }
        ledger
    }

    pub(crate) fn from_parts(
        fieldnames: Fieldnames,
        rows: Vec<Record>,
        goal: Option<Amount>,
    ) -> Self {
        Self {
            fieldnames,
            rows,
            goal,
        }
    }

    pub fn fieldnames(&self) -> &Fieldnames {
        &self.fieldnames
    }

    pub fn contributors(&self) -> &[String] {
        self.fieldnames.contributors()
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn goal(&self) -> Option<Amount> {
        self.goal
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Adds a contributor column, named after the trimmed `name`, and backfills every existing
    /// row with zero. Returns `false`, and changes nothing, if the column already exists.
    ///
    /// # Errors
    /// - `CellError::ReservedColumn` or `CellError::EmptyName` for an unusable name.
    pub fn add_contributor(&mut self, name: impl AsRef<str>) -> Result<bool, CellError> {
        let name = contributor_name(name)?;
        Ok(self.push_column(name))
    }

    fn push_column(&mut self, name: String) -> bool {
        if !self.fieldnames.push(name.clone()) {
            return false;
        }
        trace!("Adding contributor column '{name}' to {} rows", self.rows.len());
        for row in &mut self.rows {
            row.backfill(name.clone());
        }
        true
    }

    /// Appends a contribution row.
    ///
    /// Contributors that are not yet in the ledger are added first. When `date` is `None` the
    /// row is dated today. All amounts are coerced before anything changes, so on error the
    /// ledger is left as it was.
    ///
    /// # Errors
    /// - `CellError::Amount` if an amount cannot be coerced.
    /// - `CellError::ReservedColumn` or `CellError::EmptyName` for an unusable contributor name.
    pub fn add_contribution<N, V, I>(
        &mut self,
        description: impl Into<String>,
        amounts: I,
        date: Option<NaiveDate>,
    ) -> Result<&Record, CellError>
    where
        N: Into<String>,
        V: IntoAmount,
        I: IntoIterator<Item = (N, V)>,
    {
        let amounts = amounts
            .into_iter()
            .map(|(name, value)| {
                let name: String = name.into();
                Ok((contributor_name(name)?, value.into_amount()?))
            })
            .collect::<Result<Vec<(String, Amount)>, CellError>>()?;

        let date = date.unwrap_or_else(today);
        let mut row = Record::new(description, date, self.contributors());
        for (name, amount) in amounts {
            self.push_column(name.clone());
            row.set_amount(name, amount);
        }
        self.rows.push(row);
        Ok(&self.rows[self.rows.len() - 1])
    }

    /// The sum of each contributor's column, in column order.
    pub fn total_per_contributor(&self) -> Totals {
        let totals = self
            .contributors()
            .iter()
            .map(|name| {
                let sum: Amount = self
                    .rows
                    .iter()
                    .map(|row| row.amount(name).unwrap_or_default())
                    .sum();
                (name.clone(), sum)
            })
            .collect();
        Totals(totals)
    }

    /// The share of the target reached by one contributor's total. The target is the goal when
    /// there is one, otherwise everything contributed so far.
    ///
    /// Returns `None` when the target is zero, e.g. before any contribution was made.
    pub fn completion_ratio(&self, contributor_total: Amount) -> Option<f64> {
        let target = match self.goal {
            Some(goal) => goal,
            None => self.total_per_contributor().grand_total(),
        };
        ratio(contributor_total, target)
    }

    /// The share of the goal reached by all contributors together, `None` without a goal.
    pub fn progress(&self) -> Option<f64> {
        let goal = self.goal?;
        ratio(self.total_per_contributor().grand_total(), goal)
    }
}

fn ratio(part: Amount, whole: Amount) -> Option<f64> {
    if whole.is_zero() {
        None
    } else {
        Some(part.value() / whole.value())
    }
}

/// Per-contributor sums in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals(Vec<(String, Amount)>);

impl Totals {
    pub fn get(&self, contributor: impl AsRef<str>) -> Option<Amount> {
        let contributor = contributor.as_ref();
        self.0
            .iter()
            .find(|(name, _)| name == contributor)
            .map(|(_, amount)| *amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Amount)> {
        self.0.iter().map(|(name, amount)| (name.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn grand_total(&self) -> Amount {
        self.0.iter().map(|(_, amount)| *amount).sum()
    }
}

impl Serialize for Totals {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, amount) in &self.0 {
            map.serialize_entry(name, amount)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{ledger_1, ymd};

    fn amount(v: f64) -> Amount {
        Amount::new(v).unwrap()
    }

    #[test]
    fn test_new_ledger() {
        let ledger =
            Ledger::with_contributors(["Alice", "Bob", " Alice ", "Date", "", "  "], None);
        assert_eq!(ledger.fieldnames().headers(), ["Description", "Date", "Alice", "Bob"]);
        assert!(ledger.is_empty());
        assert_eq!(ledger.goal(), None);
    }

    #[test]
    fn test_add_contributor() {
        let mut ledger = ledger_1();
        assert_eq!(ledger.add_contributor("Régis"), Ok(true));
        assert_eq!(ledger.fieldnames().len(), 5);
        assert!(ledger.contributors().contains(&String::from("Régis")));
        for row in ledger.rows() {
            assert_eq!(row.amount("Régis"), Some(Amount::ZERO));
        }

        assert_eq!(
            ledger.add_contributor("Date"),
            Err(CellError::ReservedColumn("Date".into()))
        );
        assert_eq!(ledger.add_contributor(""), Err(CellError::EmptyName));
        assert_eq!(ledger.add_contributor(" \t"), Err(CellError::EmptyName));
        assert_eq!(ledger.fieldnames().len(), 5);
    }

    #[test]
    fn test_add_contributor_trims() {
        let mut ledger = ledger_1();
        assert_eq!(ledger.add_contributor(" Alice "), Ok(false));
        assert_eq!(ledger.add_contributor(" Carol"), Ok(true));
        ledger
            .add_contribution("test", [("Carol ", 2.0)], Some(ymd(2016, 1, 23)))
            .unwrap();
        assert_eq!(ledger.contributors(), ["Alice", "Bob", "Carol"]);
        assert_eq!(ledger.rows()[2].amount("Carol"), Some(amount(2.0)));
    }

    #[test]
    fn test_add_contributor_twice() {
        let mut once = ledger_1();
        once.add_contributor("Carol").unwrap();
        let mut twice = ledger_1();
        twice.add_contributor("Carol").unwrap();
        assert_eq!(twice.add_contributor("Carol"), Ok(false));
        assert_eq!(once, twice);
        assert_eq!(twice.rows()[0].amount("Alice"), Some(amount(10.0)));
        assert_eq!(twice.rows()[1].amount("Bob"), Some(amount(5.0)));
    }

    #[test]
    fn test_add_contribution() {
        let mut ledger = ledger_1();
        let row = ledger
            .add_contribution("test", [("Alice", 30)], Some(ymd(2016, 1, 22)))
            .unwrap()
            .clone();
        assert_eq!(ledger.len(), 3);
        assert_eq!(row.description(), "test");
        assert_eq!(row.date(), ymd(2016, 1, 22));
        assert_eq!(row.amount("Alice"), Some(amount(30.0)));
        assert_eq!(row.amount("Bob"), Some(Amount::ZERO));

        let totals = ledger.total_per_contributor();
        assert_eq!(totals.get("Alice"), Some(amount(40.0)));
        assert_eq!(totals.get("Bob"), Some(amount(5.0)));
    }

    #[test]
    fn test_add_contribution_today() {
        let mut ledger = ledger_1();
        let row = ledger.add_contribution("test", [("Alice", 30)], None).unwrap();
        assert_eq!(row.date(), today());
    }

    #[test]
    fn test_add_contribution_new_contributor() {
        let mut ledger = ledger_1();
        ledger
            .add_contribution("test", [("John Doe", 1.0)], None)
            .unwrap();
        assert_eq!(ledger.contributors(), ["Alice", "Bob", "John Doe"]);
        assert_eq!(ledger.rows()[2].amount("John Doe"), Some(amount(1.0)));
        assert_eq!(ledger.rows()[0].amount("John Doe"), Some(Amount::ZERO));
        assert_eq!(ledger.rows()[1].amount("John Doe"), Some(Amount::ZERO));
    }

    #[test]
    fn test_add_contribution_multiple_contributors() {
        let mut ledger = ledger_1();
        ledger
            .add_contribution("test", [("John Doe", "1"), ("Alice", "20.1")], None)
            .unwrap();
        let row = &ledger.rows()[2];
        assert_eq!(row.amount("John Doe"), Some(amount(1.0)));
        assert_eq!(row.amount("Alice"), Some(amount(20.1)));
        assert_eq!(row.amount("Bob"), Some(Amount::ZERO));
    }

    #[test]
    fn test_add_contribution_same_name_overwrites() {
        let mut ledger = ledger_1();
        ledger
            .add_contribution("test", [("Alice", 1), ("Alice", 2)], None)
            .unwrap();
        assert_eq!(ledger.rows()[2].amount("Alice"), Some(amount(2.0)));
    }

    #[test]
    fn test_add_contribution_negative_correction() {
        let mut ledger = ledger_1();
        ledger
            .add_contribution("refund", [("Alice", -4.0)], None)
            .unwrap();
        assert_eq!(
            ledger.total_per_contributor().get("Alice"),
            Some(amount(6.0))
        );
    }

    #[test]
    fn test_add_contribution_invalid_input_changes_nothing() {
        let mut ledger = ledger_1();
        let before = ledger.clone();

        let err = ledger
            .add_contribution("test", [("Carol", "1"), ("Alice", "lots")], None)
            .unwrap_err();
        assert_eq!(err, CellError::Amount(String::from("lots")));

        let err = ledger
            .add_contribution("test", [("Date", "1")], None)
            .unwrap_err();
        assert_eq!(err, CellError::ReservedColumn(String::from("Date")));

        let err = ledger.add_contribution("test", [("", "1")], None).unwrap_err();
        assert_eq!(err, CellError::EmptyName);

        assert_eq!(ledger, before);
    }

    #[test]
    fn test_total_per_contributor_order() {
        let ledger = ledger_1();
        let totals = ledger.total_per_contributor();
        let names: Vec<&str> = totals.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Alice", "Bob"]);
        assert_eq!(totals.grand_total(), amount(15.0));
        assert_eq!(
            serde_json::to_string(&totals).unwrap(),
            r#"{"Alice":10.0,"Bob":5.0}"#
        );
    }

    #[test]
    fn test_total_per_contributor_ignores_row_order() {
        let mut ledger = ledger_1();
        ledger
            .add_contribution("c", [("Bob", 2.5), ("Carol", 7.0)], None)
            .unwrap();
        let expected = ledger.total_per_contributor();
        ledger.rows.reverse();
        assert_eq!(ledger.total_per_contributor(), expected);
        ledger.rows.rotate_left(1);
        assert_eq!(ledger.total_per_contributor(), expected);
    }

    #[test]
    fn test_completion_ratio_without_goal() {
        let ledger = ledger_1();
        let totals = ledger.total_per_contributor();
        let alice = ledger.completion_ratio(totals.get("Alice").unwrap()).unwrap();
        assert!((alice - 10.0 / 15.0).abs() < 1e-12);
        assert_eq!(ledger.progress(), None);
    }

    #[test]
    fn test_completion_ratio_with_goal() {
        let ledger = Ledger::from_parts(
            ledger_1().fieldnames.clone(),
            ledger_1().rows.clone(),
            Some(amount(100.0)),
        );
        assert_eq!(ledger.completion_ratio(amount(10.0)), Some(0.1));
        assert_eq!(ledger.progress(), Some(0.15));
    }

    #[test]
    fn test_completion_ratio_undefined() {
        let ledger = Ledger::with_contributors(["Alice"], None);
        assert_eq!(ledger.completion_ratio(Amount::ZERO), None);

        let ledger = Ledger::with_contributors(["Alice"], Some(Amount::ZERO));
        assert_eq!(ledger.completion_ratio(Amount::ZERO), None);
        assert_eq!(ledger.progress(), None);
    }
}
