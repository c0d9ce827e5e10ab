use chrono::{Datelike, Months, NaiveDate};
use models::{LedgerEntry, Member, PayMode};

use crate::round2;

/// One calendar month of the trend series.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    /// `YYYY-MM` key of the month.
    pub key: String,
    /// Chart label, e.g. `Oct 23`.
    pub label: String,
    pub income: f64,
    pub expenditure: f64,
}

/// Expenditure split by payment mode, irrespective of month. Feeds the
/// two-slice proportion chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeSplit {
    pub cash: f64,
    pub card: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    /// Exactly 12 buckets, oldest first, one per trailing calendar
    /// month ending at the reference month. Months with no entries
    /// report zero.
    pub months: Vec<MonthBucket>,
    pub modes: ModeSplit,
}

/// Build the trailing-12-month aggregate series ending at `today`'s
/// month. Only the member filter applies here: the table's search and
/// month filters never narrow the chart data. The cash/card split
/// accumulates expenditure from every matching entry, including those
/// outside the 12-month window.
pub fn monthly_series(entries: &[LedgerEntry], member: Member, today: NaiveDate) -> MonthlySeries {
    // Day 1 exists in every month, so with_day cannot fail here.
    let current = today.with_day(1).unwrap_or(today);
    let mut months: Vec<MonthBucket> = (0..12)
        .rev()
        .map(|back| {
            let m = current - Months::new(back);
            MonthBucket {
                key: m.format("%Y-%m").to_string(),
                label: m.format("%b %y").to_string(),
                income: 0.0,
                expenditure: 0.0,
            }
        })
        .collect();

    let mut cash = 0.0;
    let mut card = 0.0;

    for entry in entries {
        if member != Member::Family && entry.member != member {
            continue;
        }

        if entry.expenditure > 0.0 {
            if entry.category == PayMode::Card {
                card += entry.expenditure;
            } else {
                cash += entry.expenditure;
            }
        }

        let key = entry.month_key();
        if let Some(bucket) = months.iter_mut().find(|b| b.key == key) {
            bucket.income += entry.income;
            bucket.expenditure += entry.expenditure;
        }
    }

    for bucket in months.iter_mut() {
        bucket.income = round2(bucket.income);
        bucket.expenditure = round2(bucket.expenditure);
    }

    MonthlySeries {
        months,
        modes: ModeSplit {
            cash: round2(cash),
            card: round2(card),
        },
    }
}
