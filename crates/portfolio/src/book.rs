use chrono::Utc;
use models::FdRecord;
use store::{Collection, StoreError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PortfolioError>;

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("no FD record with id {0}")]
    NotFound(u64),

    #[error("no data to export")]
    NothingToExport,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// User-supplied fields of an FD record, before an identifier is
/// assigned. All fields are raw strings; empty numeric fields default
/// to `"0"` and the bank to `"BOC"`, matching the entry form defaults.
#[derive(Debug, Clone, Default)]
pub struct FdDraft {
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

impl FdDraft {
    fn into_record(self, id: u64) -> FdRecord {
        let or = |v: String, fallback: &str| if v.is_empty() { fallback.to_string() } else { v };
        FdRecord {
            id,
            depositor: self.depositor,
            bank: or(self.bank, "BOC"),
            acc_no: self.acc_no,
            amount: or(self.amount, "0"),
            rate: or(self.rate, "0"),
            period: self.period,
            interest: or(self.interest, "0"),
            maturity: self.maturity,
            tax: or(self.tax, "0"),
        }
    }
}

/// The in-memory FD record list plus its backing collection. Same
/// persistence contract as the ledger: the full list is rewritten on
/// every mutation and committed to memory only after the save
/// succeeds.
pub struct Portfolio {
    records: Vec<FdRecord>,
    collection: Collection<FdRecord>,
}

impl Portfolio {
    /// Open the portfolio; a missing or malformed file starts empty.
    pub fn open(collection: Collection<FdRecord>) -> Self {
        let records = collection.load_or(Vec::new());
        Self {
            records,
            collection,
        }
    }

    pub fn records(&self) -> &[FdRecord] {
        &self.records
    }

    /// Append a new record at the end of the list and persist. Returns
    /// the assigned identifier.
    pub fn add(&mut self, draft: FdDraft) -> Result<u64> {
        let id = self.next_id();
        let mut updated = self.records.clone();
        updated.push(draft.into_record(id));
        self.commit(updated)?;
        tracing::debug!(id, "fd record added");
        Ok(id)
    }

    /// Replace the record with `id` in place, preserving its position
    /// and leaving every other record untouched.
    pub fn update(&mut self, id: u64, draft: FdDraft) -> Result<()> {
        if !self.records.iter().any(|r| r.id == id) {
            return Err(PortfolioError::NotFound(id));
        }

        let updated: Vec<FdRecord> = self
            .records
            .iter()
            .map(|r| {
                if r.id == id {
                    draft.clone().into_record(id)
                } else {
                    r.clone()
                }
            })
            .collect();

        self.commit(updated)?;
        tracing::debug!(id, "fd record updated");
        Ok(())
    }

    /// Remove the record with `id`, gated by the confirmation callback.
    /// Returns whether the record was removed.
    pub fn delete<F>(&mut self, id: u64, confirm: F) -> Result<bool>
    where
        F: FnOnce(&FdRecord) -> bool,
    {
        let record = self
            .records
            .iter()
            .find(|r| r.id == id)
            .ok_or(PortfolioError::NotFound(id))?;

        if !confirm(record) {
            return Ok(false);
        }

        let updated: Vec<FdRecord> = self
            .records
            .iter()
            .filter(|r| r.id != id)
            .cloned()
            .collect();

        self.commit(updated)?;
        tracing::debug!(id, "fd record deleted");
        Ok(true)
    }

    /// The export bytes for the current list; an empty portfolio is
    /// rejected rather than producing a header-only file.
    pub fn export(&self) -> Result<String> {
        if self.records.is_empty() {
            return Err(PortfolioError::NothingToExport);
        }
        Ok(crate::export_csv(&self.records))
    }

    fn commit(&mut self, updated: Vec<FdRecord>) -> Result<()> {
        self.collection.save(&updated)?;
        self.records = updated;
        Ok(())
    }

    fn next_id(&self) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let max_existing = self.records.iter().map(|r| r.id).max().unwrap_or(0);
        now.max(max_existing + 1)
    }
}
