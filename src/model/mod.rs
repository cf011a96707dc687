//! Types that represent the core data model: the `Ledger`, its rows and the typed cells they
//! hold.
mod amount;
mod cell;
mod fieldnames;
mod ledger;
mod record;

pub use amount::{Amount, IntoAmount};
pub use cell::{
    contributor_name, day_of, format_date, parse_date, today, Cell, ReservedColumn, DATE_FORMAT,
};
pub use fieldnames::{Fieldnames, HeaderError};
pub use ledger::{Ledger, Totals};
pub use record::Record;
