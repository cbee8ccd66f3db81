use crate::cli::MatrixArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use rmsdpp::engine::calculator::RmsdCalculator;
use rmsdpp::engine::progress::ProgressReporter;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::info;

pub fn run(args: MatrixArgs) -> Result<()> {
    let mut set = super::load_coordinates(&args.compute)?;
    let mut calculator = RmsdCalculator::new(&mut set, &args.compute.backend)?;
    super::configure(&mut calculator, &args.compute)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!(backend = calculator.backend_id(), "Starting matrix computation.");
    let matrix = calculator.pairwise_matrix_with_progress(&reporter)?;
    progress_handler.clear();

    if args.stats {
        println!("conformations: {}", matrix.row_length());
        println!("pairs: {}", matrix.len());
        println!("mean: {:.6}", matrix.mean());
        println!("std_dev: {:.6}", matrix.std_dev());
        println!("min: {:.6}", matrix.min());
        println!("max: {:.6}", matrix.max());
    }

    match &args.output {
        Some(path) => {
            info!("Writing {} matrix values to {:?}", matrix.len(), path);
            let mut writer = BufWriter::new(File::create(path)?);
            for value in matrix.iter() {
                writeln!(writer, "{value:.6}")?;
            }
            writer.flush()?;
            println!("✓ {} values written to: {}", matrix.len(), path.display());
        }
        // Condensed row-major values, one per line.
        None if !args.stats => {
            for value in matrix.iter() {
                println!("{value:.6}");
            }
        }
        None => {}
    }

    Ok(())
}
