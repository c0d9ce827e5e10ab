//! Household income/expense ledger: a flat list of dated entries with
//! free-text and month filtering, categorized running totals, a
//! trailing-12-month trend series, and full-list persistence after
//! every mutation.

mod book;
mod series;
mod view;

pub use book::{EntryDraft, Flow, Ledger, LedgerError, Result};
pub use series::{monthly_series, ModeSplit, MonthBucket, MonthlySeries};
pub use view::{filter_entries, totals, LedgerTotals, LedgerView};

/// Round to two decimals for display totals.
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
