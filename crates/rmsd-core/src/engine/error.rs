use thiserror::Error;

use super::backend::{BackendError, BackendKind};
use crate::core::align::kabsch::AlignmentError;
use crate::core::models::coordinates::ShapeError;

#[derive(Debug, Error)]
pub enum CalculatorError {
    #[error("unknown backend identifier '{requested}' (available: {})", available.join(", "))]
    UnknownBackend {
        requested: String,
        available: Vec<&'static str>,
    },

    #[error("backend '{backend}' ({kind:?}) does not accept {parameter}")]
    UnsupportedTunable {
        backend: &'static str,
        kind: BackendKind,
        parameter: &'static str,
    },

    #[error("conformation index {index} out of range (set holds {count})")]
    ConformationOutOfRange { index: usize, count: usize },

    #[error("invalid coordinate data: {source}")]
    Shape {
        #[from]
        source: ShapeError,
    },

    #[error("alignment failed: {source}")]
    Alignment {
        #[from]
        source: AlignmentError,
    },

    #[error("backend execution failed: {source}")]
    Backend {
        #[from]
        source: BackendError,
    },
}
