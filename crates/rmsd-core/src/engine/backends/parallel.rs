use crate::core::align::kabsch::{AlignmentError, KabschAligner};
use crate::engine::backend::{AlignmentBackend, BackendError, BackendTunables};
use nalgebra::Point3;
use rayon::prelude::*;

/// Worker-thread backend.
///
/// Superpositions against a fixed reference are independent, so the
/// mobile suffix is split into per-conformation chunks and distributed
/// across a rayon pool. Each chunk runs the same arithmetic as the serial
/// backend, which keeps results identical and write targets disjoint.
///
/// With an explicit thread count a dedicated pool of that size is built
/// for the call; otherwise work runs on the global pool.
#[derive(Debug, Default)]
pub struct ParallelKabschBackend;

impl AlignmentBackend for ParallelKabschBackend {
    fn one_vs_following(
        &self,
        points: &mut [Point3<f64>],
        atoms_per_conformation: usize,
        reference: usize,
        tunables: &BackendTunables,
    ) -> Result<Vec<f64>, BackendError> {
        let (head, tail) = points.split_at_mut((reference + 1) * atoms_per_conformation);
        let aligner = KabschAligner::new(&head[reference * atoms_per_conformation..])?;

        let mut superpose_all = || -> Result<Vec<f64>, AlignmentError> {
            tail.par_chunks_exact_mut(atoms_per_conformation)
                .map(|mobile| aligner.superpose(mobile))
                .collect()
        };

        let rmsds = match tunables.thread_count {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(superpose_all),
            None => superpose_all(),
        }?;
        Ok(rmsds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::backends::serial::SerialKabschBackend;
    use crate::engine::progress::ProgressReporter;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const TOLERANCE: f64 = 1e-12;

    fn create_random_ensemble(
        conformations: usize,
        atoms: usize,
        seed: u64,
    ) -> Vec<Point3<f64>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..conformations * atoms)
            .map(|_| {
                Point3::new(
                    rng.random_range(-8.0..8.0),
                    rng.random_range(-8.0..8.0),
                    rng.random_range(-8.0..8.0),
                )
            })
            .collect()
    }

    fn assert_buffers_close(actual: &[Point3<f64>], expected: &[Point3<f64>]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).norm() < TOLERANCE, "{a:?} differs from {e:?}");
        }
    }

    #[test]
    fn matches_the_serial_backend_exactly() {
        let atoms = 5;
        let mut parallel_points = create_random_ensemble(7, atoms, 42);
        let mut serial_points = parallel_points.clone();
        let tunables = BackendTunables::default();

        let parallel_rmsds = ParallelKabschBackend
            .one_vs_following(&mut parallel_points, atoms, 2, &tunables)
            .unwrap();
        let serial_rmsds = SerialKabschBackend
            .one_vs_following(&mut serial_points, atoms, 2, &tunables)
            .unwrap();

        assert_eq!(parallel_rmsds.len(), serial_rmsds.len());
        for (p, s) in parallel_rmsds.iter().zip(&serial_rmsds) {
            assert!((p - s).abs() < TOLERANCE);
        }
        assert_buffers_close(&parallel_points, &serial_points);
    }

    #[test]
    fn pinned_thread_count_changes_nothing_but_the_pool() {
        let atoms = 4;
        let mut default_points = create_random_ensemble(6, atoms, 7);
        let mut pinned_points = default_points.clone();
        let pinned = BackendTunables {
            thread_count: Some(2),
            ..BackendTunables::default()
        };

        let default_rmsds = ParallelKabschBackend
            .one_vs_following(&mut default_points, atoms, 0, &BackendTunables::default())
            .unwrap();
        let pinned_rmsds = ParallelKabschBackend
            .one_vs_following(&mut pinned_points, atoms, 0, &pinned)
            .unwrap();

        for (d, p) in default_rmsds.iter().zip(&pinned_rmsds) {
            assert!((d - p).abs() < TOLERANCE);
        }
        assert_buffers_close(&default_points, &pinned_points);
    }

    #[test]
    fn condensed_matrix_matches_the_serial_reduction() {
        let atoms = 3;
        let mut parallel_points = create_random_ensemble(5, atoms, 99);
        let mut serial_points = parallel_points.clone();
        let tunables = BackendTunables::default();
        let reporter = ProgressReporter::new();

        let parallel_values = ParallelKabschBackend
            .condensed_matrix(&mut parallel_points, atoms, &tunables, &reporter)
            .unwrap();
        let serial_values = SerialKabschBackend
            .condensed_matrix(&mut serial_points, atoms, &tunables, &reporter)
            .unwrap();

        assert_eq!(parallel_values.len(), 10);
        for (p, s) in parallel_values.iter().zip(&serial_values) {
            assert!((p - s).abs() < TOLERANCE);
        }
        assert_buffers_close(&parallel_points, &serial_points);
    }
}
