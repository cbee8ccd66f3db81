use super::progress::{Progress, ProgressReporter};
use crate::core::align::kabsch::AlignmentError;
use nalgebra::Point3;
use thiserror::Error;

/// The closed set of calculator backend kinds.
///
/// Tunable applicability is decided by the capability predicates below,
/// never by inspecting identifier strings: a kind either supports a tunable
/// or the setter fails with a configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// The sequential in-process reference path.
    ReferenceSequential,
    /// Worker-thread parallelism on the CPU.
    CpuParallel,
    /// GPU kernel execution.
    Gpu,
}

impl BackendKind {
    /// Whether dispatchers bound to this kind accept a thread count.
    pub fn supports_thread_count(self) -> bool {
        matches!(self, BackendKind::CpuParallel)
    }

    /// Whether dispatchers bound to this kind accept kernel launch
    /// dimensions.
    pub fn supports_kernel_launch(self) -> bool {
        matches!(self, BackendKind::Gpu)
    }

    /// Whether this build of the crate can instantiate the kind.
    pub fn is_available(self) -> bool {
        match self {
            BackendKind::ReferenceSequential | BackendKind::CpuParallel => true,
            BackendKind::Gpu => cfg!(feature = "cuda"),
        }
    }
}

/// Backend-specific execution parameters carried by a dispatcher.
///
/// Every field has a meaning only for its matching [`BackendKind`]; the
/// dispatcher's setters enforce that, so an instance always reflects
/// values the bound backend will actually honor. `thread_count` of `None`
/// uses the global worker pool sized to the available cores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendTunables {
    pub thread_count: Option<usize>,
    pub threads_per_block: u32,
    pub blocks_per_grid: u32,
}

impl Default for BackendTunables {
    fn default() -> Self {
        Self {
            thread_count: None,
            threads_per_block: 32,
            blocks_per_grid: 8,
        }
    }
}

/// Failures inside an accelerated backend, distinct from validation errors.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to build worker thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("kernel alignment failed: {0}")]
    Alignment(#[from] AlignmentError),

    #[error("GPU support was not compiled into this build")]
    GpuSupportDisabled,

    #[cfg(feature = "cuda")]
    #[error("CUDA driver error: {0}")]
    Cuda(#[from] cudarc::driver::DriverError),

    #[cfg(feature = "cuda")]
    #[error("CUDA kernel compilation failed: {0}")]
    KernelCompilation(#[from] cudarc::nvrtc::CompileError),
}

/// The contract every calculator backend satisfies.
///
/// Backends operate on the flattened conformation-major point buffer of a
/// validated coordinate set (`points.len()` is a multiple of
/// `atoms_per_conformation`, with at least two conformations). They must
/// write superposed coordinates back into the buffer and return RMSD
/// values in input-index order, exactly as the reference path would.
/// Internal parallelism must not reorder output or change which
/// conformations get mutated.
pub trait AlignmentBackend: Send + Sync {
    /// Superposes every conformation after `reference` onto it, in place,
    /// returning their RMSDs in increasing index order.
    fn one_vs_following(
        &self,
        points: &mut [Point3<f64>],
        atoms_per_conformation: usize,
        reference: usize,
        tunables: &BackendTunables,
    ) -> Result<Vec<f64>, BackendError>;

    /// Computes the condensed pairwise matrix over the whole buffer,
    /// row-major, superposing each row's suffix onto its reference as it
    /// goes.
    ///
    /// The default reduction runs [`one_vs_following`](Self::one_vs_following)
    /// over the shrinking conformation suffix, reporting one progress step
    /// per row; backends with a cheaper whole-matrix path may override it
    /// as long as mutation and ordering semantics stay identical.
    fn condensed_matrix(
        &self,
        points: &mut [Point3<f64>],
        atoms_per_conformation: usize,
        tunables: &BackendTunables,
        reporter: &ProgressReporter,
    ) -> Result<Vec<f64>, BackendError> {
        let conformations = points.len() / atoms_per_conformation;
        let mut values = Vec::with_capacity(conformations * (conformations - 1) / 2);
        reporter.report(Progress::TaskStart {
            total_steps: (conformations - 1) as u64,
        });
        for reference in 0..conformations - 1 {
            let suffix = &mut points[reference * atoms_per_conformation..];
            values.extend(self.one_vs_following(suffix, atoms_per_conformation, 0, tunables)?);
            reporter.report(Progress::TaskIncrement);
        }
        reporter.report(Progress::TaskFinish);
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_matrix_is_kind_exclusive() {
        assert!(!BackendKind::ReferenceSequential.supports_thread_count());
        assert!(!BackendKind::ReferenceSequential.supports_kernel_launch());

        assert!(BackendKind::CpuParallel.supports_thread_count());
        assert!(!BackendKind::CpuParallel.supports_kernel_launch());

        assert!(!BackendKind::Gpu.supports_thread_count());
        assert!(BackendKind::Gpu.supports_kernel_launch());
    }

    #[test]
    fn availability_tracks_compiled_features() {
        assert!(BackendKind::ReferenceSequential.is_available());
        assert!(BackendKind::CpuParallel.is_available());
        assert_eq!(BackendKind::Gpu.is_available(), cfg!(feature = "cuda"));
    }

    #[test]
    fn default_tunables_match_the_documented_values() {
        let tunables = BackendTunables::default();
        assert_eq!(tunables.thread_count, None);
        assert_eq!(tunables.threads_per_block, 32);
        assert_eq!(tunables.blocks_per_grid, 8);
    }
}
