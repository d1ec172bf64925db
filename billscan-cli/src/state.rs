use anyhow::{Context, Result};
use billscan_ingest::error::{ExtractError, Result as SinkResult};
use billscan_ingest::{TransactionRecord, TransactionSink};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

pub fn billscan_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".billscan"))
}

pub fn ensure_billscan_home() -> Result<PathBuf> {
    let dir = billscan_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn transactions_path() -> Result<PathBuf> {
    Ok(ensure_billscan_home()?.join("transactions.jsonl"))
}

#[derive(Serialize)]
struct StoredRecord<'a> {
    owner: &'a str,
    #[serde(flatten)]
    record: &'a TransactionRecord,
}

/// Appends one JSON object per record to a local file.
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl TransactionSink for JsonlStore {
    fn insert_many(&mut self, owner: &str, records: &[TransactionRecord]) -> SinkResult<usize> {
        let sink_err = |e: std::io::Error| ExtractError::Sink(format!("{}: {e}", self.path.display()));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(sink_err)?;
        let mut w = BufWriter::new(file);

        for record in records {
            let line = serde_json::to_string(&StoredRecord { owner, record })
                .map_err(|e| ExtractError::Sink(e.to_string()))?;
            writeln!(w, "{line}").map_err(sink_err)?;
        }
        w.flush().map_err(sink_err)?;

        Ok(records.len())
    }
}
