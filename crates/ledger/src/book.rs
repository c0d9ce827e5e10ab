use chrono::{NaiveDate, Utc};
use models::{LedgerEntry, Member, PayMode};
use store::{Collection, StoreError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("no ledger entry with id {0}")]
    NotFound(u64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Direction of a new or edited entry. An income entry always carries
/// the `"-"` category sentinel; an expense carries its payment mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    Income(f64),
    Expense(f64, PayMode),
}

/// User-supplied fields of an entry, before an identifier is assigned.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub date: NaiveDate,
    pub flow: Flow,
    pub desc: String,
    pub rem: String,
    pub member: Member,
}

impl EntryDraft {
    fn into_entry(self, id: u64) -> LedgerEntry {
        let (income, expenditure, category) = match self.flow {
            Flow::Income(amount) => (amount, 0.0, PayMode::None),
            Flow::Expense(amount, mode) => (0.0, amount, mode),
        };
        LedgerEntry {
            id,
            date: self.date,
            income,
            expenditure,
            category,
            desc: self.desc,
            rem: self.rem,
            member: self.member,
        }
    }
}

/// The in-memory entry list plus its backing collection. Every
/// mutation rewrites the full stored list; the in-memory list is
/// replaced only after the save succeeds, so a persistence failure
/// leaves the previous state intact.
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    collection: Collection<LedgerEntry>,
}

impl Ledger {
    /// Open the ledger, loading the stored entries. A missing or
    /// malformed file falls back to the sample seed data.
    pub fn open(collection: Collection<LedgerEntry>) -> Self {
        let entries = collection.load_or(seed_entries());
        Self {
            entries,
            collection,
        }
    }

    /// Open over an explicit fallback instead of the sample seed.
    pub fn open_with_seed(collection: Collection<LedgerEntry>, seed: Vec<LedgerEntry>) -> Self {
        let entries = collection.load_or(seed);
        Self {
            entries,
            collection,
        }
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Add a new entry at the head of the list and persist. Returns the
    /// assigned identifier.
    pub fn add(&mut self, draft: EntryDraft) -> Result<u64> {
        let id = self.next_id();
        let entry = draft.into_entry(id);

        let mut updated = Vec::with_capacity(self.entries.len() + 1);
        updated.push(entry);
        updated.extend(self.entries.iter().cloned());

        self.commit(updated)?;
        tracing::debug!(id, "ledger entry added");
        Ok(id)
    }

    /// Replace the entry with `id` in place, preserving its position.
    pub fn update(&mut self, id: u64, draft: EntryDraft) -> Result<()> {
        if !self.entries.iter().any(|e| e.id == id) {
            return Err(LedgerError::NotFound(id));
        }

        let updated: Vec<LedgerEntry> = self
            .entries
            .iter()
            .map(|e| {
                if e.id == id {
                    draft.clone().into_entry(id)
                } else {
                    e.clone()
                }
            })
            .collect();

        self.commit(updated)?;
        tracing::debug!(id, "ledger entry updated");
        Ok(())
    }

    /// Remove the entry with `id`. The confirmation callback sees the
    /// doomed entry and must return `true` before anything changes;
    /// declining leaves the list and the stored file untouched. Returns
    /// whether the entry was removed.
    pub fn delete<F>(&mut self, id: u64, confirm: F) -> Result<bool>
    where
        F: FnOnce(&LedgerEntry) -> bool,
    {
        let entry = self
            .entries
            .iter()
            .find(|e| e.id == id)
            .ok_or(LedgerError::NotFound(id))?;

        if !confirm(entry) {
            return Ok(false);
        }

        let updated: Vec<LedgerEntry> = self
            .entries
            .iter()
            .filter(|e| e.id != id)
            .cloned()
            .collect();

        self.commit(updated)?;
        tracing::debug!(id, "ledger entry deleted");
        Ok(true)
    }

    /// Reset the ledger to an empty list, confirmation-gated like
    /// delete. Returns whether the reset happened.
    pub fn clear<F>(&mut self, confirm: F) -> Result<bool>
    where
        F: FnOnce(usize) -> bool,
    {
        if !confirm(self.entries.len()) {
            return Ok(false);
        }
        self.commit(Vec::new())?;
        tracing::debug!("ledger cleared");
        Ok(true)
    }

    /// Persist `updated` and only then make it the in-memory list.
    fn commit(&mut self, updated: Vec<LedgerEntry>) -> Result<()> {
        self.collection.save(&updated)?;
        self.entries = updated;
        Ok(())
    }

    /// Fresh time-derived identifier: milliseconds since epoch, bumped
    /// above the current maximum so ids stay monotonic even when the
    /// clock has not advanced between two adds.
    fn next_id(&self) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let max_existing = self.entries.iter().map(|e| e.id).max().unwrap_or(0);
        now.max(max_existing + 1)
    }
}

/// The sample entries seeded on first run, matching the records a new
/// install starts with.
pub(crate) fn seed_entries() -> Vec<LedgerEntry> {
    let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
    vec![
        LedgerEntry {
            id: 1,
            date: d("2023-10-24"),
            income: 5000.0,
            expenditure: 0.0,
            category: PayMode::Cash,
            desc: "Salary Advance".to_string(),
            rem: "Dad".to_string(),
            member: Member::Dad,
        },
        LedgerEntry {
            id: 2,
            date: d("2023-10-25"),
            income: 0.0,
            expenditure: 1250.50,
            category: PayMode::Card,
            desc: "Supermarket Grocery".to_string(),
            rem: "Weekly supplies".to_string(),
            member: Member::Mom,
        },
        LedgerEntry {
            id: 3,
            date: d("2023-10-26"),
            income: 0.0,
            expenditure: 450.0,
            category: PayMode::Cash,
            desc: "Fuel".to_string(),
            rem: "Full tank".to_string(),
            member: Member::Dad,
        },
        LedgerEntry {
            id: 4,
            date: d("2023-09-15"),
            income: 0.0,
            expenditure: 3200.0,
            category: PayMode::Card,
            desc: "School Fees".to_string(),
            rem: "Term 3".to_string(),
            member: Member::Mom,
        },
    ]
}
