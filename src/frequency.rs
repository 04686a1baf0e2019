// src/frequency.rs

use ahash::AHashMap;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::types::FrequencyRow;

pub const FREQUENCY_HEADER: [&str; 3] = ["genus", "read_count", "relative_abundance_%"];

/// Count reads per genus and turn the counts into percentages of the total.
///
/// Reads without a genus are left out of both the counts and the total.
/// Rows come back by read count, highest first; equal counts are ordered by
/// genus name. No reads means no rows.
pub fn summarize_genera<'a, I>(genera: I) -> Vec<FrequencyRow>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: AHashMap<&str, u64> = AHashMap::new();
    for genus in genera.into_iter().flatten() {
        *counts.entry(genus).or_insert(0) += 1;
    }

    let total_reads: u64 = counts.values().sum();
    if total_reads == 0 {
        return Vec::new();
    }

    let mut rows: Vec<FrequencyRow> = counts
        .into_iter()
        .map(|(genus, read_count)| FrequencyRow {
            genus: genus.to_string(),
            read_count,
            pct: 100.0 * (read_count as f64) / (total_reads as f64),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.read_count
            .cmp(&a.read_count)
            .then_with(|| a.genus.cmp(&b.genus))
    });
    rows
}

pub fn write_frequency<W: Write>(writer: W, rows: &[FrequencyRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(FREQUENCY_HEADER)?;
    for row in rows {
        wtr.write_record([
            row.genus.clone(),
            row.read_count.to_string(),
            format!("{:.2}", row.pct),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_frequency_csv<P: AsRef<Path>>(path: P, rows: &[FrequencyRow]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_frequency(std::io::BufWriter::new(file), rows)
}
