use crate::core::align::kabsch::KabschAligner;
use crate::engine::backend::{AlignmentBackend, BackendError, BackendTunables};
use nalgebra::Point3;

/// The sequential reference backend.
///
/// One aligner per reference conformation, one superposition per mobile
/// conformation, in index order. Accelerated backends are tested against
/// this implementation's RMSD values and buffer mutations.
#[derive(Debug, Default)]
pub struct SerialKabschBackend;

impl AlignmentBackend for SerialKabschBackend {
    fn one_vs_following(
        &self,
        points: &mut [Point3<f64>],
        atoms_per_conformation: usize,
        reference: usize,
        _tunables: &BackendTunables,
    ) -> Result<Vec<f64>, BackendError> {
        let (head, tail) = points.split_at_mut((reference + 1) * atoms_per_conformation);
        let aligner = KabschAligner::new(&head[reference * atoms_per_conformation..])?;

        let mut rmsds = Vec::with_capacity(tail.len() / atoms_per_conformation);
        for mobile in tail.chunks_exact_mut(atoms_per_conformation) {
            rmsds.push(aligner.superpose(mobile)?);
        }
        Ok(rmsds)
    }
}
