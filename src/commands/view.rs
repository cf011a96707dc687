use crate::commands::Out;
use crate::model::{format_date, Amount, Cell, Ledger};
use crate::project::Project;
use crate::{Config, Result};
use anyhow::Context;
use serde::Serialize;

const TOTAL: &str = "Total";
const COMPLETION: &str = "Completion";
const UNDEFINED: &str = "n/a";

/// The totals of a project as returned by `view`.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub project: String,
    pub goal: Option<Amount>,
    pub rows: usize,
    pub contributors: Vec<ContributorReport>,
    pub total: Amount,
    /// The share of the goal reached so far, `None` without a goal.
    pub progress: Option<f64>,
}

/// One contributor's total and their share of the goal, or of everything contributed when there
/// is no goal. The share is `None` when it is undefined.
#[derive(Debug, Clone, Serialize)]
pub struct ContributorReport {
    pub name: String,
    pub total: Amount,
    pub completion: Option<f64>,
}

/// Renders a project's contributions as a table followed by per-contributor totals.
pub fn view(config: &Config, name: &str) -> Result<Out<Report>> {
    let project = Project::open(config, name)
        .with_context(|| format!("Unable to open project '{name}'"))?;
    let ledger = project.ledger();
    let totals = ledger.total_per_contributor();

    let report = Report {
        project: project.name().to_string(),
        goal: ledger.goal(),
        rows: ledger.len(),
        contributors: totals
            .iter()
            .map(|(name, total)| ContributorReport {
                name: name.to_string(),
                total,
                completion: ledger.completion_ratio(total),
            })
            .collect(),
        total: totals.grand_total(),
        progress: ledger.progress(),
    };

    Ok(Out::new(render(ledger, &report), report))
}

fn render(ledger: &Ledger, report: &Report) -> String {
    let headers = ledger.fieldnames().headers();

    let mut table: Vec<Vec<String>> = vec![headers.to_vec()];
    for row in ledger.rows() {
        table.push(
            headers
                .iter()
                .map(|column| row.get(column).map(|c| display_cell(&c)).unwrap_or_default())
                .collect(),
        );
    }
    let body_end = table.len();

    let mut total_row = vec![TOTAL.to_string(), String::new()];
    let mut completion_row = vec![COMPLETION.to_string(), String::new()];
    for c in &report.contributors {
        total_row.push(display_amount(c.total));
        completion_row.push(display_ratio(c.completion));
    }
    table.push(total_row);
    table.push(completion_row);

    let widths: Vec<usize> = (0..headers.len())
        .map(|ix| {
            table
                .iter()
                .map(|row| row[ix].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = vec![format!("Project '{}'", report.project)];
    for (row_ix, row) in table.iter().enumerate() {
        if row_ix == 1 || row_ix == body_end {
            lines.push(separator(&widths));
        }
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(ix, (cell, width))| {
                if ix < 2 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .collect();
        lines.push(cells.join(" | ").trim_end().to_string());
    }

    lines.push(match report.goal {
        Some(goal) => format!(
            "Goal: {} ({} reached)",
            display_amount(goal),
            display_ratio(report.progress)
        ),
        None => format!("Contributed so far: {}", display_amount(report.total)),
    });
    lines.join("\n")
}

fn separator(widths: &[usize]) -> String {
    widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-")
}

/// The display text of a typed cell. Zero amounts are left blank.
pub(crate) fn display_cell(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.clone(),
        Cell::Date(d) => format_date(*d),
        Cell::Amount(a) if a.is_zero() => String::new(),
        Cell::Amount(a) => display_amount(*a),
    }
}

/// Two decimals with thousands separators, e.g. `-1,234.50`.
fn display_amount(amount: Amount) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    format!(
        "{sign}{}",
        format_num::format_num!(",.2", amount.value().abs())
    )
}

fn display_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.1}%", r * 100.0),
        None => String::from(UNDEFINED),
    }
}
