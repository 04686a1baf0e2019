// src/combine.rs

use ahash::AHashMap;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{GenusError, Result};
use crate::filter::GENUS_COLUMN;
use crate::types::{CombinedMatrix, SampleLoad};

/// File name ending that marks a per-sample frequency table.
pub const FREQUENCY_SUFFIX: &str = "_frequency.csv";
pub const ABUNDANCE_COLUMN: &str = "relative_abundance_%";

/// Lists the frequency tables in `dir`, sorted by file name so that later
/// processing order does not depend on the filesystem.
pub fn discover_frequency_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let filename = path.file_name()?.to_string_lossy().into_owned();
            if filename.ends_with(FREQUENCY_SUFFIX) && path.is_file() {
                Some(path)
            } else {
                None
            }
        })
        .collect();

    if files.is_empty() {
        return Err(GenusError::NoFrequencyFiles(dir.to_path_buf()));
    }
    files.sort();
    Ok(files)
}

/// `sampleA_blastn_genus_frequency.csv` -> `sampleA`
pub fn sample_name_from_file(path: &Path) -> String {
    let filename = path
        .file_name()
        .map(|f| f.to_string_lossy())
        .unwrap_or_default();
    filename.split('_').next().unwrap_or_default().to_string()
}

/// Reads `genus` -> `relative_abundance_%` from a frequency table.
/// Abundance cells that are empty, not numbers or not finite count as 0.0;
/// rows with an empty genus are ignored.
pub fn parse_abundances<R: Read>(reader: R, source: &Path) -> Result<AHashMap<String, f64>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| GenusError::MissingColumn {
                path: source.to_path_buf(),
                column: name.to_string(),
            })
    };
    let genus_idx = find(GENUS_COLUMN)?;
    let abundance_idx = find(ABUNDANCE_COLUMN)?;

    let mut abundances = AHashMap::new();
    for result in rdr.records() {
        let row = result?;
        let genus = row.get(genus_idx).unwrap_or("").trim();
        if genus.is_empty() {
            continue;
        }
        let pct = row
            .get(abundance_idx)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
        abundances.insert(genus.to_string(), pct);
    }
    Ok(abundances)
}

/// Loads one sample. Any read or parse failure turns into `Skipped` rather
/// than an error, so one bad file does not sink the whole table.
pub fn load_sample(path: &Path) -> SampleLoad {
    let sample = sample_name_from_file(path);
    let parsed = std::fs::File::open(path)
        .map_err(GenusError::from)
        .and_then(|f| parse_abundances(std::io::BufReader::new(f), path));

    match parsed {
        Ok(abundances) => SampleLoad::Loaded { sample, abundances },
        Err(e) => SampleLoad::Skipped {
            file: path.display().to_string(),
            reason: e.to_string(),
        },
    }
}

/// Projects each loaded sample onto `genera`. Genera a sample lacks are 0.0,
/// genera outside the index are dropped. Columns are sorted by sample name;
/// a repeated sample name replaces the earlier column.
pub fn build_matrix(genera: &[&str], samples: Vec<SampleLoad>) -> CombinedMatrix {
    let mut columns: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for load in samples {
        match load {
            SampleLoad::Loaded { sample, abundances } => {
                let column: Vec<f64> = genera
                    .iter()
                    .map(|g| abundances.get(*g).copied().unwrap_or(0.0))
                    .collect();
                if columns.insert(sample.clone(), column).is_some() {
                    log::warn!(
                        "Sample name {} appears more than once; keeping the last file",
                        sample
                    );
                }
            }
            SampleLoad::Skipped { file, reason } => {
                log::warn!("Error reading file {}: {}", file, reason);
            }
        }
    }

    let samples: Vec<String> = columns.keys().cloned().collect();
    let values = (0..genera.len())
        .map(|row| columns.values().map(|col| col[row]).collect())
        .collect();

    CombinedMatrix {
        genera: genera.iter().map(|g| g.to_string()).collect(),
        samples,
        values,
    }
}

/// Writes the matrix with an unlabelled first column holding the genus and
/// every value as `%.2f`.
pub fn write_combined<W: Write>(writer: W, matrix: &CombinedMatrix) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![String::new()];
    header.extend(matrix.samples.iter().cloned());
    wtr.write_record(&header)?;

    for (genus, values) in matrix.genera.iter().zip(&matrix.values) {
        let mut record = Vec::with_capacity(values.len() + 1);
        record.push(genus.clone());
        record.extend(values.iter().map(|v| format!("{:.2}", v)));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_combined_csv<P: AsRef<Path>>(path: P, matrix: &CombinedMatrix) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_combined(std::io::BufWriter::new(file), matrix)
}
