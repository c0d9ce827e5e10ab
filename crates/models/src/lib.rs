use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Household member owning a ledger entry. `Family` is the aggregate
/// value: it owns nothing itself but, used as a filter, matches every
/// entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Member {
    Family,
    Dad,
    Mom,
    Kids,
}

impl Member {
    pub const ALL: [Member; 4] = [Member::Family, Member::Dad, Member::Mom, Member::Kids];

    pub fn as_str(&self) -> &'static str {
        match self {
            Member::Family => "Family",
            Member::Dad => "Dad",
            Member::Mom => "Mom",
            Member::Kids => "Kids",
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Member {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "family" => Ok(Member::Family),
            "dad" => Ok(Member::Dad),
            "mom" => Ok(Member::Mom),
            "kids" => Ok(Member::Kids),
            _ => Err(format!(
                "unknown member '{}' (expected Family, Dad, Mom or Kids)",
                s
            )),
        }
    }
}

/// Payment mode of an expenditure entry. Income entries carry the `"-"`
/// sentinel, serialized as such for compatibility with the stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayMode {
    Cash,
    Card,
    #[serde(rename = "-")]
    None,
}

impl PayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayMode::Cash => "Cash",
            PayMode::Card => "Card",
            PayMode::None => "-",
        }
    }
}

impl fmt::Display for PayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cash" => Ok(PayMode::Cash),
            "card" => Ok(PayMode::Card),
            "-" | "none" => Ok(PayMode::None),
            _ => Err(format!(
                "unknown payment mode '{}' (expected Cash, Card or -)",
                s
            )),
        }
    }
}

/// One dated income-or-expenditure record. Amounts are non-negative
/// with two-decimal display precision; normally exactly one of
/// `income`/`expenditure` is nonzero, but that is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: u64,
    pub date: NaiveDate,
    pub income: f64,
    pub expenditure: f64,
    pub category: PayMode,
    pub desc: String,
    pub rem: String,
    pub member: Member,
}

impl LedgerEntry {
    /// ISO `YYYY-MM-DD` form of the entry date, the string the
    /// free-text search matches against.
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// `YYYY-MM` prefix of the entry date, used by the month filter and
    /// the monthly series bucketing.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

/// One fixed-deposit account snapshot. All descriptive and numeric
/// fields are kept as the raw strings the user entered: numeric ones
/// are parsed (zero on failure) only when totals are computed, and the
/// CSV export must reproduce them byte for byte. `maturity` is free
/// text, not validated as a calendar date.
///
/// The `id` is assigned at creation and is the only way mutations
/// address a record; list positions shift on insert/delete and are
/// never used as handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FdRecord {
    pub id: u64,
    pub depositor: String,
    pub bank: String,
    pub acc_no: String,
    pub amount: String,
    pub rate: String,
    pub period: String,
    pub interest: String,
    pub maturity: String,
    pub tax: String,
}

/// Parse a user-entered numeric field, treating missing or
/// un-parseable text as zero. Shared lenient-coercion rule for FD
/// amount/interest/tax columns: the longest leading float prefix
/// counts, so `"100 abc"` coerces to 100 and `"abc"` to 0.
pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.trim();
    // Restrict the scan to float syntax so word prefixes like "inf"
    // never sneak in.
    let span = s
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(s.len());
    let s = &s[..span];

    let mut parsed = 0.0;
    for end in 1..=s.len() {
        if let Ok(v) = s[..end].parse::<f64>() {
            parsed = v;
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_round_trip() {
        for m in Member::ALL {
            assert_eq!(m.as_str().parse::<Member>().unwrap(), m);
        }
        assert!("neighbour".parse::<Member>().is_err());
    }

    #[test]
    fn test_pay_mode_sentinel_serialization() {
        let json = serde_json::to_string(&PayMode::None).unwrap();
        assert_eq!(json, "\"-\"");
        let back: PayMode = serde_json::from_str("\"-\"").unwrap();
        assert_eq!(back, PayMode::None);
    }

    #[test]
    fn test_ledger_entry_date_strings() {
        let entry = LedgerEntry {
            id: 1,
            date: NaiveDate::from_ymd_opt(2023, 10, 24).unwrap(),
            income: 5000.0,
            expenditure: 0.0,
            category: PayMode::None,
            desc: "Salary Advance".to_string(),
            rem: "Dad".to_string(),
            member: Member::Dad,
        };
        assert_eq!(entry.date_string(), "2023-10-24");
        assert_eq!(entry.month_key(), "2023-10");
    }

    #[test]
    fn test_parse_amount_lenient() {
        assert_eq!(parse_amount("1250.50"), 1250.50);
        assert_eq!(parse_amount(" 450 "), 450.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("n/a"), 0.0);
    }

    #[test]
    fn test_parse_amount_takes_leading_float_prefix() {
        assert_eq!(parse_amount("100 abc"), 100.0);
        assert_eq!(parse_amount("12.5%"), 12.5);
        assert_eq!(parse_amount("1e3 rest"), 1000.0);
        assert_eq!(parse_amount("-42.5x"), -42.5);
        assert_eq!(parse_amount("abc100"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
    }
}
