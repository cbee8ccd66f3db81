use crate::cli::PairArgs;
use crate::error::Result;
use rmsdpp::engine::calculator::RmsdCalculator;
use tracing::info;

pub fn run(args: PairArgs) -> Result<()> {
    let mut set = super::load_coordinates(&args.compute)?;
    let mut calculator = RmsdCalculator::new(&mut set, &args.compute.backend)?;
    super::configure(&mut calculator, &args.compute)?;

    info!(
        first = args.first,
        second = args.second,
        backend = calculator.backend_id(),
        "Computing pairwise RMSD."
    );
    let rmsd = calculator.pairwise(args.first, args.second)?;
    println!("{rmsd:.6}");
    Ok(())
}
