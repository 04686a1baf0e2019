use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use blastgenus_rs::filter::QualityThresholds;
use blastgenus_rs::filter_and_summarize;
use blastgenus_rs::progress::{init_logging, spinner};

/// Keep hits with %identity >= 97, evalue <= 1e-10 and alignment_length >= 240,
/// then summarize relative abundance per genus.
#[derive(Parser, Debug)]
#[command(name = "blastgenus-filter", version)]
struct Args {
    /// Annotated CSV from blastgenus-annotate
    input_csv: PathBuf,
    /// Where to write the passing rows
    filtered_output_csv: PathBuf,
    /// Where to write genus,read_count,relative_abundance_%
    frequency_output_csv: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let bar = spinner("green", "Filtering hits...");
    let results = match filter_and_summarize(&args.input_csv, &QualityThresholds::default()) {
        Ok(r) => r,
        Err(e) => {
            bar.abandon_with_message("Filtering failed");
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    bar.finish_with_message(format!(
        "{} of {} records passed.",
        results.filtered.rows.len(),
        results.filtered.input_rows
    ));

    if let Err(e) = results.write_filtered_csv(&args.filtered_output_csv) {
        eprintln!("Error: could not write {}: {}", args.filtered_output_csv.display(), e);
        return ExitCode::FAILURE;
    }
    println!("Filtered results saved to: {}", args.filtered_output_csv.display());

    if let Err(e) = results.write_frequency_csv(&args.frequency_output_csv) {
        eprintln!("Error: could not write {}: {}", args.frequency_output_csv.display(), e);
        return ExitCode::FAILURE;
    }
    println!(
        "Genus frequency summary (relative abundance in %) saved to: {}",
        args.frequency_output_csv.display()
    );
    ExitCode::SUCCESS
}
