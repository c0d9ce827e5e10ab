//! Fixed-deposit portfolio: a flat list of FD account records with
//! column totals, CSV export and full-list persistence after every
//! mutation. Records are addressed by a stable identifier assigned at
//! creation; list positions are display-only.

mod book;
mod export;

pub use book::{FdDraft, Portfolio, PortfolioError, Result};
pub use export::{export_csv, EXPORT_FILENAME};

use models::{parse_amount, FdRecord};

/// Column totals across all records. Numeric fields are parsed
/// leniently: un-parseable or missing values count as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FdTotals {
    pub amount: f64,
    pub interest: f64,
    pub tax: f64,
}

pub fn totals(records: &[FdRecord]) -> FdTotals {
    let mut sums = FdTotals {
        amount: 0.0,
        interest: 0.0,
        tax: 0.0,
    };
    for r in records {
        sums.amount += parse_amount(&r.amount);
        sums.interest += parse_amount(&r.interest);
        sums.tax += parse_amount(&r.tax);
    }
    sums
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(amount: &str, interest: &str, tax: &str) -> FdRecord {
        FdRecord {
            id: 0,
            depositor: "Madu FD".to_string(),
            bank: "BOC".to_string(),
            acc_no: "001".to_string(),
            amount: amount.to_string(),
            rate: "12.5".to_string(),
            period: "03 M".to_string(),
            interest: interest.to_string(),
            maturity: "01-01-2025".to_string(),
            tax: tax.to_string(),
        }
    }

    #[test]
    fn test_totals_sum_all_records() {
        let records = vec![
            record("100000", "3125", "156.25"),
            record("50000.50", "1200", "60"),
        ];
        let t = totals(&records);
        assert_eq!(t.amount, 150000.50);
        assert_eq!(t.interest, 4325.0);
        assert_eq!(t.tax, 216.25);
    }

    #[test]
    fn test_unparseable_fields_count_as_zero() {
        let records = vec![record("abc", "", "5")];
        let t = totals(&records);
        assert_eq!(t.amount, 0.0);
        assert_eq!(t.interest, 0.0);
        assert_eq!(t.tax, 5.0);
    }

    #[test]
    fn test_totals_of_empty_portfolio_are_zero() {
        let t = totals(&[]);
        assert_eq!(
            t,
            FdTotals {
                amount: 0.0,
                interest: 0.0,
                tax: 0.0
            }
        );
    }
}
