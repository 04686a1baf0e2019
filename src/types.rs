//src/types.rs

use serde::Serialize;

/// One BLAST hit, annotated with the genus of its subject sequence.
/// Field order is the output column order:
///  query_id  subject_id  genus  %identity  alignment_length  mismatches  gap_opens
///  q_start  q_end  s_start  s_end  evalue  bit_score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentRecord {
    pub query_id: String,
    pub subject_id: String,
    pub genus: Option<String>, // None until annotated, or when the subject has no g__ token
    #[serde(rename = "%identity")]
    pub identity: f64,
    pub alignment_length: u64,
    pub mismatches: u64,
    pub gap_opens: u64,
    pub q_start: u64,
    pub q_end: u64,
    pub s_start: u64,
    pub s_end: u64,
    pub evalue: f64,
    pub bit_score: f64,
}

/// Taxonomic labels pulled out of a reference sequence description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonLabels {
    pub genus: Option<String>,
    /// Extracted but not written anywhere yet.
    pub family: Option<String>,
}

/// A structured representation of one row in a per-sample frequency table:
///  genus  read_count  relative_abundance_%
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyRow {
    pub genus: String,
    pub read_count: u64,
    pub pct: f64,
}

/// Outcome of loading one sample's frequency file.
#[derive(Debug, Clone)]
pub enum SampleLoad {
    Loaded {
        sample: String,
        abundances: ahash::AHashMap<String, f64>,
    },
    Skipped {
        file: String,
        reason: String,
    },
}

/// Genera x samples table of relative abundances.
#[derive(Debug, Clone, Default)]
pub struct CombinedMatrix {
    /// Row labels, in output order.
    pub genera: Vec<String>,
    /// Column labels, sorted.
    pub samples: Vec<String>,
    /// `values[row][col]`
    pub values: Vec<Vec<f64>>,
}

impl CombinedMatrix {
    pub fn value(&self, genus: &str, sample: &str) -> Option<f64> {
        let row = self.genera.iter().position(|g| g == genus)?;
        let col = self.samples.iter().position(|s| s == sample)?;
        Some(self.values[row][col])
    }
}
