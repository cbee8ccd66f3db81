//! # Calculator Backends
//!
//! Concrete implementations of the
//! [`AlignmentBackend`](super::backend::AlignmentBackend) contract. The
//! serial backend defines reference semantics; the parallel and CUDA
//! backends reproduce them on worker pools and GPU hardware.

#[cfg(feature = "cuda")]
pub mod cuda;
pub mod parallel;
pub mod serial;
