use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use blastgenus_rs::annotate_blast_hits;
use blastgenus_rs::progress::{init_logging, spinner};

/// Attach the genus of each subject sequence to BLAST tabular hits.
#[derive(Parser, Debug)]
#[command(name = "blastgenus-annotate", version)]
struct Args {
    /// BLAST output (-outfmt 6, 12 columns, tab-separated, no header)
    blast_output: PathBuf,
    /// Reference FASTA whose headers carry g__/f__ labels (.gz accepted)
    reference_fasta: PathBuf,
    /// Annotated CSV to write
    output_csv: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let bar = spinner("blue", "Annotating BLAST hits...");
    let results = match annotate_blast_hits(&args.blast_output, &args.reference_fasta) {
        Ok(r) => r,
        Err(e) => {
            bar.abandon_with_message("Annotation failed");
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    bar.finish_with_message(format!(
        "Annotated {} hits ({} with a genus).",
        results.records.len(),
        results.labelled
    ));

    if let Err(e) = results.write_csv(&args.output_csv) {
        eprintln!("Error: could not write {}: {}", args.output_csv.display(), e);
        return ExitCode::FAILURE;
    }
    println!(
        "Processed BLAST output with genus column has been saved to {}",
        args.output_csv.display()
    );
    ExitCode::SUCCESS
}
