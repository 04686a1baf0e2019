use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use blastgenus_rs::combine_sample_frequencies;
use blastgenus_rs::progress::{init_logging, spinner};

/// Merge every *_frequency.csv in a folder into one genus x sample table.
#[derive(Parser, Debug)]
#[command(name = "blastgenus-combine", version)]
struct Args {
    /// Folder holding <sample>_..._frequency.csv files
    input_folder: PathBuf,
    /// Combined CSV to write
    output_csv: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let bar = spinner("yellow", "Combining sample frequencies...");
    let results = match combine_sample_frequencies(&args.input_folder) {
        Ok(r) => r,
        Err(e) => {
            bar.abandon_with_message("Nothing combined");
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    bar.finish_with_message(format!(
        "Combined {} sample(s), skipped {} file(s).",
        results.matrix.samples.len(),
        results.skipped.len()
    ));

    if let Err(e) = results.write_csv(&args.output_csv) {
        eprintln!("Error: could not write {}: {}", args.output_csv.display(), e);
        return ExitCode::FAILURE;
    }
    println!(
        "Combined genera frequency table saved to: {}",
        args.output_csv.display()
    );
    ExitCode::SUCCESS
}
