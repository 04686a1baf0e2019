//src/taxdb.rs

use ahash::AHashMap;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use crate::fasta::{read_fasta_records, FastaRecord};
use crate::types::TaxonLabels;

/// Reference sequence id -> taxonomic labels.
pub type GenusLookup = AHashMap<String, TaxonLabels>;

lazy_static! {
    static ref GENUS_TOKEN: Regex = Regex::new(r"g__([\w\-]+)").unwrap();
    static ref FAMILY_TOKEN: Regex = Regex::new(r"f__([\w\-]+)").unwrap();
}

/// Pulls the first `g__<token>` and `f__<token>` out of a description.
/// A description without a token yields `None` for that rank.
pub fn extract_labels(description: &str) -> TaxonLabels {
    let capture = |re: &Regex| {
        re.captures(description)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    };
    TaxonLabels {
        genus: capture(&GENUS_TOKEN),
        family: capture(&FAMILY_TOKEN),
    }
}

/// Builds the lookup from already-parsed records. Later duplicates of an id
/// replace earlier ones.
pub fn build_lookup(records: &[FastaRecord]) -> GenusLookup {
    let mut lookup: GenusLookup = AHashMap::with_capacity(records.len());
    for record in records {
        let labels = extract_labels(&record.description);
        if lookup.insert(record.id.clone(), labels).is_some() {
            log::debug!("duplicate reference id {}, keeping the last record", record.id);
        }
    }
    lookup
}

/// Parses a reference FASTA (optionally gzipped) whose headers look like:
/// ```text
/// >seq_id d__Bacteria;...;f__Lactobacillaceae;g__Lactobacillus;s__...
/// ```
pub fn parse_reference_db<P: AsRef<Path>>(filepath: P) -> std::io::Result<GenusLookup> {
    let records = read_fasta_records(&filepath)?;
    let lookup = build_lookup(&records);
    let with_genus = lookup.values().filter(|l| l.genus.is_some()).count();
    log::info!(
        "Loaded {} reference sequences ({} with a genus label) from {}",
        lookup.len(),
        with_genus,
        filepath.as_ref().display()
    );
    Ok(lookup)
}
