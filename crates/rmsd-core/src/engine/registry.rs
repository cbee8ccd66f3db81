use super::backend::{AlignmentBackend, BackendError, BackendKind};
use super::backends::parallel::ParallelKabschBackend;
use super::backends::serial::SerialKabschBackend;
use super::error::CalculatorError;
use phf::{Map, phf_map};
use std::sync::Arc;

/// Every backend identifier this crate knows about, compiled into an
/// immutable table.
///
/// Builds without the `cuda` feature still know the GPU identifier; they
/// just refuse to resolve it, so the not-found error can name exactly the
/// backends this binary offers.
static KNOWN_BACKENDS: Map<&'static str, BackendKind> = phf_map! {
    "KABSCH_SERIAL" => BackendKind::ReferenceSequential,
    "KABSCH_PARALLEL" => BackendKind::CpuParallel,
    "KABSCH_CUDA" => BackendKind::Gpu,
};

/// Identifiers of every backend this build can instantiate, sorted.
pub fn available_backends() -> Vec<&'static str> {
    let mut identifiers: Vec<&'static str> = KNOWN_BACKENDS
        .entries()
        .filter(|(_, kind)| kind.is_available())
        .map(|(identifier, _)| *identifier)
        .collect();
    identifiers.sort_unstable();
    identifiers
}

/// Looks up the kind registered under `identifier`, whether or not this
/// build can instantiate it.
pub fn registered_kind(identifier: &str) -> Option<BackendKind> {
    KNOWN_BACKENDS.get(identifier).copied()
}

/// Resolves an identifier to its canonical entry, restricted to kinds
/// this build can instantiate.
pub(crate) fn lookup(identifier: &str) -> Result<(&'static str, BackendKind), CalculatorError> {
    match KNOWN_BACKENDS.get_entry(identifier) {
        Some((canonical, kind)) if kind.is_available() => Ok((*canonical, *kind)),
        _ => Err(CalculatorError::UnknownBackend {
            requested: identifier.to_string(),
            available: available_backends(),
        }),
    }
}

/// Builds the shared backend instance for a resolved kind.
pub(crate) fn instantiate(kind: BackendKind) -> Result<Arc<dyn AlignmentBackend>, BackendError> {
    match kind {
        BackendKind::ReferenceSequential => Ok(Arc::new(SerialKabschBackend)),
        BackendKind::CpuParallel => Ok(Arc::new(ParallelKabschBackend)),
        #[cfg(feature = "cuda")]
        BackendKind::Gpu => Ok(Arc::new(super::backends::cuda::CudaKabschBackend::new()?)),
        #[cfg(not(feature = "cuda"))]
        BackendKind::Gpu => Err(BackendError::GpuSupportDisabled),
    }
}
