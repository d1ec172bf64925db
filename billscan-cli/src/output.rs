use anyhow::{Context, Result};
use billscan_ingest::{ImportSummary, TransactionRecord, TxnType};
use std::io::Write;

use crate::config::OutputFormat;

pub fn render<W: Write>(
    mut w: W,
    summary: &ImportSummary,
    format: OutputFormat,
    pretty: bool,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            if pretty {
                serde_json::to_writer_pretty(&mut w, summary)?;
            } else {
                serde_json::to_writer(&mut w, summary)?;
            }
            writeln!(w)?;
        }
        OutputFormat::Csv => write_csv(&mut w, &summary.transactions)?,
        OutputFormat::Table => write_table(&mut w, summary)?,
    }
    Ok(())
}

fn write_csv<W: Write>(w: W, records: &[TransactionRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    for r in records {
        wtr.serialize(r).context("write csv row")?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_table<W: Write>(mut w: W, summary: &ImportSummary) -> Result<()> {
    writeln!(w, "{}\n", summary.message)?;
    for t in &summary.transactions {
        let kind = match t.kind {
            TxnType::Expense => "expense",
            TxnType::Income => "income",
        };
        writeln!(
            w,
            "{} | {:<7} | {:>12} | {} | {}",
            t.date,
            kind,
            t.amount.to_string(),
            t.category,
            t.description
        )?;
    }
    Ok(())
}
