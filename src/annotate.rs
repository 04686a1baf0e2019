use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::taxdb::GenusLookup;
use crate::types::AlignmentRecord;

/// Sets `genus` on every record from its `subject_id`. Unknown subjects and
/// subjects without a genus label get `None`. No record is dropped.
pub fn annotate_records(records: &mut [AlignmentRecord], lookup: &GenusLookup) {
    for record in records.iter_mut() {
        record.genus = lookup
            .get(&record.subject_id)
            .and_then(|labels| labels.genus.clone());
    }
}

/// Writes annotated records as CSV with a header row. A missing genus is an
/// empty field.
pub fn write_annotated<W: Write>(writer: W, records: &[AlignmentRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if records.is_empty() {
        // serde only emits the header alongside the first record
        wtr.write_record(ANNOTATED_HEADER)?;
    }
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_annotated_csv<P: AsRef<Path>>(path: P, records: &[AlignmentRecord]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_annotated(std::io::BufWriter::new(file), records)
}

pub const ANNOTATED_HEADER: [&str; 13] = [
    "query_id",
    "subject_id",
    "genus",
    "%identity",
    "alignment_length",
    "mismatches",
    "gap_opens",
    "q_start",
    "q_end",
    "s_start",
    "s_end",
    "evalue",
    "bit_score",
];
