//! Reads and writes the CSV backing file of a ledger.
//!
//! The file is UTF-8, comma-delimited, with a mandatory header row `Description,Date,<name>...`.
//! Dates are `YYYY-MM-DD`; contributor cells are plain decimal numbers and an empty cell is zero.

use crate::error::{LedgerError, LedgerResult};
use crate::locator::Location;
use crate::model::{parse_date, Amount, Fieldnames, Ledger, Record};
use std::fs::File;
use std::io::{self, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

const TMP_SUFFIX: &str = "tmp";

/// Reads the ledger stored at `location`. The ledger's goal is the one encoded in the
/// location's file name.
///
/// # Errors
/// - `NotFound` if the file does not exist (anymore).
/// - `Unreadable` if it cannot be opened or read.
/// - `Corrupted` if the header lacks `Description` or `Date`, a row is longer than the header,
///   or a cell cannot be coerced.
pub fn load(location: &Location) -> LedgerResult<Ledger> {
    let path = location.path();
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LedgerError::NotFound {
            project: location.project().to_string(),
            path: Some(path.to_path_buf()),
        },
        _ => LedgerError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers = reader.headers().map_err(|e| read_error(path, e))?;
    let fieldnames = Fieldnames::new(headers.iter())
        .map_err(|e| LedgerError::corrupted(path, e.to_string()))?;

    let mut rows = Vec::new();
    for (ix, result) in reader.records().enumerate() {
        let record = result.map_err(|e| read_error(path, e))?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(ix as u64 + 2);
        rows.push(parse_row(path, line, &fieldnames, &record)?);
    }

    debug!(
        "Loaded {} rows and {} contributors from {}",
        rows.len(),
        fieldnames.contributors().len(),
        path.display()
    );
    Ok(Ledger::from_parts(fieldnames, rows, location.goal()))
}

fn parse_row(
    path: &Path,
    line: u64,
    fieldnames: &Fieldnames,
    record: &csv::StringRecord,
) -> LedgerResult<Record> {
    if record.len() > fieldnames.len() {
        return Err(LedgerError::corrupted(
            path,
            format!(
                "line {line} has {} cells but the header has {}",
                record.len(),
                fieldnames.len()
            ),
        ));
    }

    let description = record.get(0).unwrap_or_default();
    let date = record
        .get(1)
        .ok_or_else(|| LedgerError::corrupted(path, format!("line {line} has no Date")))?;
    let date = parse_date(date)
        .map_err(|e| LedgerError::corrupted(path, format!("line {line}, column 'Date': {e}")))?;

    let contributors = fieldnames.contributors();
    let mut row = Record::new(description, date, contributors);
    for (ix, name) in contributors.iter().enumerate() {
        let Some(cell) = record.get(ix + 2) else {
            break;
        };
        let amount = Amount::from_str(cell).map_err(|e| {
            LedgerError::corrupted(path, format!("line {line}, column '{name}': {e}"))
        })?;
        row.set_amount(name.clone(), amount);
    }
    Ok(row)
}

fn read_error(path: &Path, e: csv::Error) -> LedgerError {
    let reason = e.to_string();
    match e.into_kind() {
        csv::ErrorKind::Io(source) => LedgerError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
        _ => LedgerError::corrupted(path, reason),
    }
}

/// Overwrites `path` with the ledger.
///
/// The table is first written to a hidden sibling file which is then renamed over `path`, so
/// a reader sees either the old or the new file, never a partial one.
///
/// # Errors
/// - `Unwritable` if the temporary file cannot be written or renamed.
pub fn save(ledger: &Ledger, path: &Path) -> LedgerResult<()> {
    let tmp = tmp_path(path);
    let result = write_table(ledger, &tmp).and_then(|_| std::fs::rename(&tmp, path));
    if let Err(e) = result {
        let _ = std::fs::remove_file(&tmp);
        return Err(LedgerError::unwritable(path, e));
    }
    debug!("Saved {} rows to {}", ledger.len(), path.display());
    Ok(())
}

fn write_table(ledger: &Ledger, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    let headers = ledger.fieldnames().headers();
    writer.write_record(headers)?;
    for row in ledger.rows() {
        writer.write_record(headers.iter().map(|column| {
            row.get(column)
                .map(|cell| cell.to_string())
                .unwrap_or_default()
        }))?;
    }
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

/// `dir/name.csv` -> `dir/.name.csv.tmp`
fn tmp_path(path: &Path) -> PathBuf {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!(".{name}.{TMP_SUFFIX}"))
}
