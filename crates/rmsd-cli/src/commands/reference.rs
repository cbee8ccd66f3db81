use crate::cli::ReferenceArgs;
use crate::error::Result;
use rmsdpp::engine::calculator::RmsdCalculator;
use tracing::info;

pub fn run(args: ReferenceArgs) -> Result<()> {
    let mut set = super::load_coordinates(&args.compute)?;
    let mut calculator = RmsdCalculator::new(&mut set, &args.compute.backend)?;
    super::configure(&mut calculator, &args.compute)?;

    let rmsds = if args.following {
        info!(
            reference = args.reference,
            backend = calculator.backend_id(),
            "Computing RMSD against following conformations."
        );
        calculator.one_vs_following(args.reference)?
    } else {
        info!(
            subject = args.reference,
            backend = calculator.backend_id(),
            "Computing RMSD against all other conformations."
        );
        calculator.one_vs_the_others(args.reference)?
    };

    // One value per partner conformation, in ascending partner order.
    for rmsd in &rmsds {
        println!("{rmsd:.6}");
    }
    Ok(())
}
