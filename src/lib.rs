// src/lib.rs
pub mod types;
pub mod error;
pub mod fasta;
pub mod taxdb;
pub mod blast;
pub mod annotate;
pub mod filter;
pub mod frequency;
pub mod genera;
pub mod combine;
pub mod progress;

use std::path::Path;

use crate::annotate::{annotate_records, write_annotated_csv};
use crate::blast::read_blast_tabular;
use crate::combine::{build_matrix, discover_frequency_files, load_sample, write_combined_csv};
use crate::error::Result;
use crate::filter::{filter_annotated_csv, FilteredTable, QualityThresholds};
use crate::frequency::{summarize_genera, write_frequency_csv};
use crate::genera::FIXED_GENERA;
use crate::taxdb::parse_reference_db;
use crate::types::{AlignmentRecord, CombinedMatrix, FrequencyRow, SampleLoad};

/// BLAST hits with their genus filled in.
pub struct AnnotationResults {
    pub records: Vec<AlignmentRecord>,
    /// Hits whose subject resolved to a genus.
    pub labelled: usize,
}

impl AnnotationResults {
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_annotated_csv(path, &self.records)
    }
}

/// Read the BLAST table and the reference database, then attach a genus to
/// every hit. The lookup is built once and only read afterwards.
pub fn annotate_blast_hits<P: AsRef<Path>, Q: AsRef<Path>>(
    blast_path: P,
    reference_path: Q,
) -> Result<AnnotationResults> {
    let mut records = read_blast_tabular(&blast_path)?;
    log::info!("Read {} BLAST hits", records.len());

    let lookup = parse_reference_db(&reference_path)?;
    annotate_records(&mut records, &lookup);

    let labelled = records.iter().filter(|r| r.genus.is_some()).count();
    if labelled < records.len() {
        log::warn!(
            "{} of {} hits have no genus in the reference database",
            records.len() - labelled,
            records.len()
        );
    }
    Ok(AnnotationResults { records, labelled })
}

/// Passing rows plus the per-genus summary built from them.
pub struct FilterResults {
    pub filtered: FilteredTable,
    pub frequency_rows: Vec<FrequencyRow>,
}

impl FilterResults {
    pub fn write_filtered_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.filtered.write_csv(path)
    }

    pub fn write_frequency_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_frequency_csv(path, &self.frequency_rows)
    }
}

pub fn filter_and_summarize<P: AsRef<Path>>(
    annotated_path: P,
    thresholds: &QualityThresholds,
) -> Result<FilterResults> {
    let filtered = filter_annotated_csv(annotated_path, thresholds)?;
    log::info!("Initial record count: {}", filtered.input_rows);
    log::info!("Record count after filtering: {}", filtered.rows.len());

    let frequency_rows = summarize_genera(filtered.genera());
    if frequency_rows.is_empty() {
        log::warn!("No reads with a genus passed the filter; frequency table is empty");
    }
    Ok(FilterResults {
        filtered,
        frequency_rows,
    })
}

pub struct CombineResults {
    pub matrix: CombinedMatrix,
    pub skipped: Vec<(String, String)>,
}

impl CombineResults {
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_combined_csv(path, &self.matrix)
    }
}

/// Merge every `*_frequency.csv` in `dir` into one table indexed by
/// [`FIXED_GENERA`]. Fails only when there is nothing to merge.
pub fn combine_sample_frequencies<P: AsRef<Path>>(dir: P) -> Result<CombineResults> {
    let files = discover_frequency_files(dir)?;

    let mut loads = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();
    for path in &files {
        let load = load_sample(path);
        match &load {
            SampleLoad::Loaded { sample, .. } => {
                log::info!("Processing sample: {} from file: {}", sample, path.display());
            }
            SampleLoad::Skipped { file, reason } => skipped.push((file.clone(), reason.clone())),
        }
        loads.push(load);
    }

    let matrix = build_matrix(&FIXED_GENERA, loads);
    Ok(CombineResults { matrix, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const BLAST_ROW: &str = "q1\ts1\t98.5\t250\t1\t0\t1\t250\t1\t250\t1e-15\t450\n";
    const REFERENCE: &str = ">s1 d__Bacteria;f__Lactobacillaceae;g__Lactobacillus;s__x\nACGT\n\
                             >s2 d__Bacteria;f__Lactobacillaceae;g__Weissella\nACGT\n";

    #[test]
    fn test_full_pipeline_single_hit() {
        let dir = tempfile::tempdir().unwrap();
        let blast = dir.path().join("hits.tsv");
        let reference = dir.path().join("ref.fna");
        fs::write(&blast, BLAST_ROW).unwrap();
        fs::write(&reference, REFERENCE).unwrap();

        let annotated = annotate_blast_hits(&blast, &reference).unwrap();
        assert_eq!(annotated.labelled, 1);
        assert_eq!(annotated.records[0].genus.as_deref(), Some("Lactobacillus"));
        let annotated_csv = dir.path().join("annotated.csv");
        annotated.write_csv(&annotated_csv).unwrap();

        let filtered = filter_and_summarize(&annotated_csv, &QualityThresholds::default()).unwrap();
        assert_eq!(filtered.filtered.rows.len(), 1);
        let freq_csv = dir.path().join("sampleA_genus_frequency.csv");
        filtered.write_filtered_csv(dir.path().join("filtered.csv")).unwrap();
        filtered.write_frequency_csv(&freq_csv).unwrap();
        assert_eq!(
            fs::read_to_string(&freq_csv).unwrap(),
            "genus,read_count,relative_abundance_%\nLactobacillus,1,100.00\n"
        );

        let combined = combine_sample_frequencies(dir.path()).unwrap();
        assert!(combined.skipped.is_empty());
        let out = dir.path().join("combined.csv");
        combined.write_csv(&out).unwrap();

        let text = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), FIXED_GENERA.len() + 1);
        assert_eq!(lines[0], ",sampleA");
        assert_eq!(lines[1], "Lactobacillus,100.00");
        assert!(lines[2..].iter().all(|l| l.ends_with(",0.00")));
    }

    #[test]
    fn test_short_alignment_gives_empty_tables() {
        let dir = tempfile::tempdir().unwrap();
        let blast = dir.path().join("hits.tsv");
        let reference = dir.path().join("ref.fna");
        fs::write(&blast, BLAST_ROW.replace("\t250\t1\t0", "\t200\t1\t0")).unwrap();
        fs::write(&reference, REFERENCE).unwrap();

        let annotated = annotate_blast_hits(&blast, &reference).unwrap();
        assert_eq!(annotated.records[0].alignment_length, 200);
        let annotated_csv = dir.path().join("annotated.csv");
        annotated.write_csv(&annotated_csv).unwrap();

        let results = filter_and_summarize(&annotated_csv, &QualityThresholds::default()).unwrap();
        assert_eq!(results.filtered.input_rows, 1);
        assert!(results.filtered.rows.is_empty());
        assert!(results.frequency_rows.is_empty());
    }

    #[test]
    fn test_annotation_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let blast = dir.path().join("hits.tsv");
        let reference = dir.path().join("ref.fna");
        fs::write(&blast, format!("{BLAST_ROW}q2\ts2\t99\t300\t0\t0\t1\t300\t1\t300\t0\t560\n")).unwrap();
        fs::write(&reference, REFERENCE).unwrap();

        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        annotate_blast_hits(&blast, &reference).unwrap().write_csv(&a).unwrap();
        annotate_blast_hits(&blast, &reference).unwrap().write_csv(&b).unwrap();
        assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
    }

    #[test]
    fn test_combine_skips_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("good_frequency.csv"),
            "genus,read_count,relative_abundance_%\nWeissella,3,100.00\n",
        )
        .unwrap();
        fs::write(dir.path().join("bad_frequency.csv"), "genus\n").unwrap();

        let results = combine_sample_frequencies(dir.path()).unwrap();
        assert_eq!(results.skipped.len(), 1);
        assert_eq!(results.matrix.samples, vec!["good".to_string()]);
        assert_eq!(results.matrix.value("Weissella", "good"), Some(100.0));
    }
}
