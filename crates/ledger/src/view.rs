use models::{LedgerEntry, Member, PayMode};

use crate::round2;

/// Explicit view state for the entry table: which member is selected,
/// the free-text search string and the optional `YYYY-MM` month
/// filter. The filter and totals functions are pure over
/// `(&[LedgerEntry], &LedgerView)` and carry no UI state of their own.
#[derive(Debug, Clone)]
pub struct LedgerView {
    pub member: Member,
    pub search: String,
    pub month: Option<String>,
}

impl Default for LedgerView {
    fn default() -> Self {
        Self {
            member: Member::Family,
            search: String::new(),
            month: None,
        }
    }
}

impl LedgerView {
    fn matches(&self, entry: &LedgerEntry) -> bool {
        if self.member != Member::Family && entry.member != self.member {
            return false;
        }

        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let hit = [
                entry.desc.to_lowercase(),
                entry.rem.to_lowercase(),
                entry.date_string(),
            ]
            .iter()
            .any(|hay| hay.contains(&needle));
            if !hit {
                return false;
            }
        }

        match &self.month {
            Some(month) => entry.month_key() == *month,
            None => true,
        }
    }
}

/// Select the entries visible under `view`, ordered by date descending.
/// The sort is stable: entries sharing a date keep their original list
/// order.
pub fn filter_entries<'a>(entries: &'a [LedgerEntry], view: &LedgerView) -> Vec<&'a LedgerEntry> {
    let mut visible: Vec<&LedgerEntry> = entries.iter().filter(|e| view.matches(e)).collect();
    visible.sort_by(|a, b| b.date.cmp(&a.date));
    visible
}

/// Running totals over a filtered entry set. Expenditure is split by
/// payment mode into `card` and `cash`, where `cash` collects every
/// non-Card category. Values are rounded to two decimals for display.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerTotals {
    pub income: f64,
    pub expenditure: f64,
    pub cash: f64,
    pub card: f64,
}

impl LedgerTotals {
    pub fn net(&self) -> f64 {
        round2(self.income - self.expenditure)
    }
}

pub fn totals(filtered: &[&LedgerEntry]) -> LedgerTotals {
    let mut income = 0.0;
    let mut expenditure = 0.0;
    let mut cash = 0.0;
    let mut card = 0.0;

    for entry in filtered {
        income += entry.income;
        expenditure += entry.expenditure;
        if entry.expenditure > 0.0 {
            if entry.category == PayMode::Card {
                card += entry.expenditure;
            } else {
                cash += entry.expenditure;
            }
        }
    }

    LedgerTotals {
        income: round2(income),
        expenditure: round2(expenditure),
        cash: round2(cash),
        card: round2(card),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(
        id: u64,
        date: &str,
        income: f64,
        expenditure: f64,
        category: PayMode,
        desc: &str,
        rem: &str,
        member: Member,
    ) -> LedgerEntry {
        LedgerEntry {
            id,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            income,
            expenditure,
            category,
            desc: desc.to_string(),
            rem: rem.to_string(),
            member,
        }
    }

    fn sample() -> Vec<LedgerEntry> {
        vec![
            entry(1, "2023-10-24", 5000.0, 0.0, PayMode::None, "Salary Advance", "Dad", Member::Dad),
            entry(2, "2023-10-25", 0.0, 1250.50, PayMode::Card, "Supermarket Grocery", "Weekly supplies", Member::Mom),
            entry(3, "2023-10-26", 0.0, 450.0, PayMode::Cash, "Fuel", "Full tank", Member::Dad),
            entry(4, "2023-09-15", 0.0, 3200.0, PayMode::Card, "School Fees", "Term 3", Member::Mom),
        ]
    }

    #[test]
    fn test_default_view_returns_all_sorted_by_date_descending() {
        let entries = sample();
        let visible = filter_entries(&entries, &LedgerView::default());
        let ids: Vec<u64> = visible.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2, 1, 4]);
    }

    #[test]
    fn test_sort_ties_keep_insertion_order() {
        let entries = vec![
            entry(10, "2023-10-24", 0.0, 10.0, PayMode::Cash, "first", "", Member::Dad),
            entry(11, "2023-10-24", 0.0, 20.0, PayMode::Cash, "second", "", Member::Dad),
            entry(12, "2023-10-24", 0.0, 30.0, PayMode::Cash, "third", "", Member::Dad),
        ];
        let visible = filter_entries(&entries, &LedgerView::default());
        let ids: Vec<u64> = visible.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }

    #[test]
    fn test_member_filter_narrows_entries() {
        let entries = sample();
        let view = LedgerView {
            member: Member::Mom,
            ..LedgerView::default()
        };
        let visible = filter_entries(&entries, &view);
        assert!(visible.iter().all(|e| e.member == Member::Mom));
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn test_search_matches_desc_rem_and_date_case_insensitively() {
        let entries = sample();

        let by_desc = LedgerView {
            search: "grocery".to_string(),
            ..LedgerView::default()
        };
        assert_eq!(filter_entries(&entries, &by_desc)[0].id, 2);

        let by_rem = LedgerView {
            search: "FULL TANK".to_string(),
            ..LedgerView::default()
        };
        assert_eq!(filter_entries(&entries, &by_rem)[0].id, 3);

        let by_date = LedgerView {
            search: "2023-09".to_string(),
            ..LedgerView::default()
        };
        assert_eq!(filter_entries(&entries, &by_date)[0].id, 4);
    }

    #[test]
    fn test_month_filter_matches_year_month_prefix() {
        let entries = sample();
        let view = LedgerView {
            month: Some("2023-09".to_string()),
            ..LedgerView::default()
        };
        let visible = filter_entries(&entries, &view);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 4);
    }

    #[test]
    fn test_totals_worked_example() {
        let entries = vec![
            entry(1, "2023-10-24", 5000.0, 0.0, PayMode::None, "Salary", "", Member::Dad),
            entry(2, "2023-10-25", 0.0, 1250.50, PayMode::Card, "Grocery", "", Member::Mom),
        ];
        let visible = filter_entries(&entries, &LedgerView::default());
        let t = totals(&visible);
        assert_eq!(t.income, 5000.0);
        assert_eq!(t.expenditure, 1250.50);
        assert_eq!(t.net(), 3749.50);
    }

    #[test]
    fn test_totals_split_card_against_everything_else() {
        let entries = sample();
        let visible = filter_entries(&entries, &LedgerView::default());
        let t = totals(&visible);
        assert_eq!(t.card, 4450.50);
        assert_eq!(t.cash, 450.0);
        assert_eq!(t.net(), round2(5000.0 - 4900.50));
    }

    #[test]
    fn test_totals_of_empty_set_are_zero() {
        let t = totals(&[]);
        assert_eq!(t.income, 0.0);
        assert_eq!(t.expenditure, 0.0);
        assert_eq!(t.net(), 0.0);
    }
}
