pub mod matrix;
pub mod pair;
pub mod reference;

use crate::cli::ComputeArgs;
use crate::error::{CliError, Result};
use rmsdpp::core::io::pdb;
use rmsdpp::core::models::coordinates::CoordinateSet;
use rmsdpp::engine::calculator::RmsdCalculator;
use tracing::info;

/// Reads the trajectory named by the shared compute arguments.
pub(crate) fn load_coordinates(args: &ComputeArgs) -> Result<CoordinateSet> {
    info!("Loading trajectory from {:?}", &args.input);
    let set = pdb::read_coordinate_set_from_path(&args.input, args.atoms.as_deref()).map_err(
        |e| CliError::FileParsing {
            path: args.input.clone(),
            source: e.into(),
        },
    )?;
    info!(
        conformations = set.conformation_count(),
        atoms = set.atoms_per_conformation(),
        "Trajectory loaded."
    );
    Ok(set)
}

/// Applies the backend tunables named on the command line.
///
/// Tunables a backend does not support surface as calculator errors, so
/// `--threads` against the serial backend fails here rather than being
/// silently ignored.
pub(crate) fn configure(calculator: &mut RmsdCalculator<'_>, args: &ComputeArgs) -> Result<()> {
    if let Some(threads) = args.threads {
        calculator.set_thread_count(threads)?;
    }
    if args.threads_per_block.is_some() || args.blocks_per_grid.is_some() {
        let tunables = calculator.tunables();
        let threads_per_block = args.threads_per_block.unwrap_or(tunables.threads_per_block);
        let blocks_per_grid = args.blocks_per_grid.unwrap_or(tunables.blocks_per_grid);
        if threads_per_block == 0 || blocks_per_grid == 0 {
            return Err(CliError::Argument(
                "kernel launch dimensions must be positive".to_string(),
            ));
        }
        calculator.set_kernel_launch(threads_per_block, blocks_per_grid)?;
    }
    Ok(())
}
