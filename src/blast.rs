use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::error::{GenusError, Result};
use crate::fasta::open_maybe_gz;
use crate::types::AlignmentRecord;

/// Column count of BLAST `-outfmt 6` without custom fields.
pub const BLAST_TABULAR_COLUMNS: usize = 12;

/// Reads a headerless, tab-separated BLAST tabular file (`-outfmt 6`):
/// ```text
/// qseqid sseqid pident length mismatch gapopen qstart qend sstart send evalue bitscore
/// ```
/// Any row with the wrong column count or an unparseable number aborts the read.
pub fn read_blast_tabular<P: AsRef<Path>>(path: P) -> Result<Vec<AlignmentRecord>> {
    let path = path.as_ref();
    parse_blast_tabular(open_maybe_gz(path)?, path)
}

pub fn parse_blast_tabular<R: Read>(reader: R, source: &Path) -> Result<Vec<AlignmentRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut row = csv::StringRecord::new();
    while rdr.read_record(&mut row)? {
        if is_outfmt7_comment(&row) {
            continue;
        }
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        records.push(parse_row(&row, line, source)?);
    }
    Ok(records)
}

/// `-outfmt 7` comment lines start with `"# "`. Sequence ids never contain
/// a space, so a hit whose id merely starts with `#` is still data.
fn is_outfmt7_comment(row: &csv::StringRecord) -> bool {
    row.get(0).is_some_and(|first| first.starts_with("# ") || first == "#")
}

fn parse_row(row: &csv::StringRecord, line: u64, source: &Path) -> Result<AlignmentRecord> {
    if row.len() != BLAST_TABULAR_COLUMNS {
        return Err(GenusError::InputFormat {
            path: source.to_path_buf(),
            line,
            message: format!(
                "expected {} tab-separated columns, found {}",
                BLAST_TABULAR_COLUMNS,
                row.len()
            ),
        });
    }

    fn num<T: FromStr>(row: &csv::StringRecord, idx: usize, name: &str, line: u64, source: &Path) -> Result<T> {
        let raw = row[idx].trim();
        raw.parse::<T>().map_err(|_| GenusError::InputFormat {
            path: source.to_path_buf(),
            line,
            message: format!("cannot parse {} value '{}'", name, raw),
        })
    }

    Ok(AlignmentRecord {
        query_id: row[0].trim().to_string(),
        subject_id: row[1].trim().to_string(),
        genus: None,
        identity: num(row, 2, "%identity", line, source)?,
        alignment_length: num(row, 3, "alignment_length", line, source)?,
        mismatches: num(row, 4, "mismatches", line, source)?,
        gap_opens: num(row, 5, "gap_opens", line, source)?,
        q_start: num(row, 6, "q_start", line, source)?,
        q_end: num(row, 7, "q_end", line, source)?,
        s_start: num(row, 8, "s_start", line, source)?,
        s_end: num(row, 9, "s_end", line, source)?,
        evalue: num(row, 10, "evalue", line, source)?,
        bit_score: num(row, 11, "bit_score", line, source)?,
    })
}
