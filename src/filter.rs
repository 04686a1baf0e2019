use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{GenusError, Result};

pub const IDENTITY_COLUMN: &str = "%identity";
pub const EVALUE_COLUMN: &str = "evalue";
pub const LENGTH_COLUMN: &str = "alignment_length";
pub const GENUS_COLUMN: &str = "genus";

/// Alignment-quality cutoffs. A hit must satisfy all three.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityThresholds {
    /// Minimum percent identity (inclusive).
    pub min_identity: f64,
    /// Maximum e-value (inclusive).
    pub max_evalue: f64,
    /// Minimum alignment length in bp (inclusive).
    pub min_alignment_length: u64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_identity: 97.0,
            max_evalue: 1e-10,
            min_alignment_length: 240,
        }
    }
}

impl QualityThresholds {
    pub fn passes(&self, identity: f64, evalue: f64, alignment_length: u64) -> bool {
        identity >= self.min_identity
            && evalue <= self.max_evalue
            && alignment_length >= self.min_alignment_length
    }
}

/// The rows of an annotated table that passed the thresholds, kept as the
/// original cell text so writing them back reproduces the input columns.
#[derive(Debug, Clone)]
pub struct FilteredTable {
    pub headers: csv::StringRecord,
    pub rows: Vec<csv::StringRecord>,
    /// Row count before filtering.
    pub input_rows: usize,
    genus_idx: usize,
}

impl FilteredTable {
    /// Genus of each passing row in order; empty cells are `None`.
    pub fn genera(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows.iter().map(move |row| {
            row.get(self.genus_idx)
                .map(str::trim)
                .filter(|g| !g.is_empty())
        })
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write(std::io::BufWriter::new(file))
    }
}

fn column_index(headers: &csv::StringRecord, name: &str, source: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| GenusError::MissingColumn {
            path: source.to_path_buf(),
            column: name.to_string(),
        })
}

/// Reads an annotated CSV and keeps the rows that pass `thresholds`, in
/// their original order. An unparseable threshold cell aborts the run.
pub fn filter_annotated<R: Read>(
    reader: R,
    source: &Path,
    thresholds: &QualityThresholds,
) -> Result<FilteredTable> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
    let headers = rdr.headers()?.clone();

    let identity_idx = column_index(&headers, IDENTITY_COLUMN, source)?;
    let evalue_idx = column_index(&headers, EVALUE_COLUMN, source)?;
    let length_idx = column_index(&headers, LENGTH_COLUMN, source)?;
    let genus_idx = column_index(&headers, GENUS_COLUMN, source)?;

    let bad_cell = |line: u64, column: &str, raw: &str| GenusError::InputFormat {
        path: PathBuf::from(source),
        line,
        message: format!("cannot parse {} value '{}'", column, raw),
    };

    let mut rows = Vec::new();
    let mut input_rows = 0usize;
    for result in rdr.records() {
        let row = result?;
        input_rows += 1;
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let raw_identity = row.get(identity_idx).unwrap_or("").trim();
        let raw_evalue = row.get(evalue_idx).unwrap_or("").trim();
        let raw_length = row.get(length_idx).unwrap_or("").trim();

        let identity: f64 = raw_identity
            .parse()
            .map_err(|_| bad_cell(line, IDENTITY_COLUMN, raw_identity))?;
        let evalue: f64 = raw_evalue
            .parse()
            .map_err(|_| bad_cell(line, EVALUE_COLUMN, raw_evalue))?;
        let alignment_length = parse_length(raw_length)
            .ok_or_else(|| bad_cell(line, LENGTH_COLUMN, raw_length))?;

        if thresholds.passes(identity, evalue, alignment_length) {
            rows.push(row);
        }
    }

    Ok(FilteredTable {
        headers,
        rows,
        input_rows,
        genus_idx,
    })
}

pub fn filter_annotated_csv<P: AsRef<Path>>(
    path: P,
    thresholds: &QualityThresholds,
) -> Result<FilteredTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    filter_annotated(std::io::BufReader::new(file), path, thresholds)
}

/// Accepts `250` as well as `250.0`, which spreadsheet round-trips produce.
fn parse_length(raw: &str) -> Option<u64> {
    if let Ok(v) = raw.parse::<u64>() {
        return Some(v);
    }
    let v: f64 = raw.parse().ok()?;
    (v >= 0.0 && v.fract() == 0.0).then_some(v as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "query_id,subject_id,genus,%identity,alignment_length,mismatches,gap_opens,q_start,q_end,s_start,s_end,evalue,bit_score\n";

    fn run(body: &str) -> Result<FilteredTable> {
        let text = format!("{HEADER}{body}");
        filter_annotated(text.as_bytes(), Path::new("annotated.csv"), &QualityThresholds::default())
    }

    #[test]
    fn test_threshold_boundaries_are_inclusive() {
        let t = QualityThresholds::default();
        assert!(t.passes(97.0, 1e-10, 240));
        assert!(!t.passes(96.99, 1e-10, 240));
        assert!(!t.passes(97.0, 1.1e-10, 240));
        assert!(!t.passes(97.0, 1e-10, 239));
    }

    #[test]
    fn test_passing_row_kept() {
        let table = run("q1,s1,Lactobacillus,98.5,250,1,0,1,250,1,250,1e-15,450.0\n").unwrap();
        assert_eq!(table.input_rows, 1);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.genera().collect::<Vec<_>>(), vec![Some("Lactobacillus")]);
    }

    #[test]
    fn test_short_alignment_dropped() {
        let table = run("q1,s1,Lactobacillus,98.5,200,1,0,1,200,1,200,1e-15,450.0\n").unwrap();
        assert_eq!(table.input_rows, 1);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_order_and_cells_preserved() {
        let body = "q1,s1,Weissella,99,300,0,0,1,300,1,300,1e-50,500.0\n\
                    q2,s2,Lactobacillus,90,300,0,0,1,300,1,300,1e-50,500.0\n\
                    q3,s3,,97.0,240.0,0,0,1,240,1,240,1e-10,400.0\n";
        let table = run(body).unwrap();
        assert!(table.rows.len() <= table.input_rows);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(&table.rows[0][0], "q1");
        assert_eq!(&table.rows[1][0], "q3");
        assert_eq!(table.genera().collect::<Vec<_>>(), vec![Some("Weissella"), None]);

        let mut buf = Vec::new();
        table.write(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            format!(
                "{HEADER}q1,s1,Weissella,99,300,0,0,1,300,1,300,1e-50,500.0\n\
                 q3,s3,,97.0,240.0,0,0,1,240,1,240,1e-10,400.0\n"
            )
        );
    }

    #[test]
    fn test_extra_columns_survive() {
        let text = "genus,%identity,alignment_length,evalue,note\nPediococcus,99,250,1e-20,keep me\n";
        let table =
            filter_annotated(text.as_bytes(), Path::new("x.csv"), &QualityThresholds::default()).unwrap();
        assert_eq!(table.headers.len(), 5);
        assert_eq!(&table.rows[0][4], "keep me");
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let text = "genus,%identity,evalue\nPediococcus,99,1e-20\n";
        let err = filter_annotated(text.as_bytes(), Path::new("x.csv"), &QualityThresholds::default())
            .unwrap_err();
        match err {
            GenusError::MissingColumn { column, .. } => assert_eq!(column, LENGTH_COLUMN),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_evalue_aborts() {
        let err = run("q1,s1,Lactobacillus,98.5,250,1,0,1,250,1,250,tiny,450.0\n").unwrap_err();
        assert!(matches!(err, GenusError::InputFormat { line: 2, .. }));
    }

    #[test]
    fn test_ragged_row_aborts() {
        let err = run("q1,s1,Lactobacillus,98.5,250,1,0,1,250,1,250,1e-15,450.0\n\
                       q2,s2,Weissella,99,300,0,0\n")
            .unwrap_err();
        assert!(matches!(err, GenusError::Csv(_)), "{:?}", err);
    }

    #[test]
    fn test_header_only_input() {
        let table = run("").unwrap();
        assert_eq!(table.input_rows, 0);
        assert!(table.rows.is_empty());
    }
}
