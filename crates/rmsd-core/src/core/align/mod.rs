//! # Alignment Module
//!
//! The reference implementation of optimal rigid-body superposition.
//!
//! [`kabsch`] holds the sequential Kabsch (SVD) aligner every backend's
//! results are defined against: centroid centering, cross-covariance,
//! SVD-derived rotation with reflection correction, in-place application,
//! RMSD. Accelerated backends may compute the same quantities however they
//! like, but this module is the semantic ground truth.
pub mod kabsch;
