use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

/// A reference record: the identifier (first word of the header) and the full
/// header text after `>`. Sequence lines are not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub description: String,
}

/// Opens `path` for buffered reading, decompressing if it ends in `.gz`.
pub fn open_maybe_gz<P: AsRef<Path>>(path: P) -> std::io::Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let f = File::open(path)?;

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    Ok(if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    })
}

/// Minimal FASTA header reader that also supports .gz
pub fn read_fasta_records<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<FastaRecord>> {
    let reader = open_maybe_gz(path)?;
    parse_fasta_headers(reader)
}

pub fn parse_fasta_headers<R: BufRead>(mut reader: R) -> std::io::Result<Vec<FastaRecord>> {
    let mut records = Vec::new();
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break; // EOF
        }
        // sequence lines and anything before the first header
        let Some(header) = line.trim_end().strip_prefix('>') else {
            continue;
        };
        let description = header.trim_start();

        let id = description
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();

        records.push(FastaRecord {
            id,
            description: description.to_string(),
        });
    }

    Ok(records)
}
