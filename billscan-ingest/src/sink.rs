//! Persistence collaborators.

use crate::error::Result;
use crate::types::TransactionRecord;

/// Destination for extracted records, tagged with the owning user.
pub trait TransactionSink {
    /// Store `records` in order; returns how many were stored.
    fn insert_many(&mut self, owner: &str, records: &[TransactionRecord]) -> Result<usize>;
}

/// Keeps records in memory, grouped by insertion call.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub batches: Vec<(String, Vec<TransactionRecord>)>,
}

impl MemorySink {
    pub fn records_for<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a TransactionRecord> {
        self.batches
            .iter()
            .filter(move |(o, _)| o == owner)
            .flat_map(|(_, recs)| recs.iter())
    }
}

impl TransactionSink for MemorySink {
    fn insert_many(&mut self, owner: &str, records: &[TransactionRecord]) -> Result<usize> {
        self.batches.push((owner.to_string(), records.to_vec()));
        Ok(records.len())
    }
}
