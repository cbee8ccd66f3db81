//! # Core Module
//!
//! This module provides the fundamental building blocks for conformation
//! comparison: the ensemble data model, the reference superposition
//! algorithm, and trajectory ingestion.
//!
//! ## Overview
//!
//! Everything in `core` is backend-agnostic and purely sequential. The
//! engine layer orchestrates these pieces and decides where the heavy
//! lifting runs; `core` defines what the answers are.
//!
//! ## Architecture
//!
//! - **Ensemble Representation** ([`models`]) - Flat-stored conformation
//!   sets with shape validation, plus the condensed pairwise result matrix
//! - **Optimal Superposition** ([`align`]) - The Kabsch SVD aligner with
//!   reflection correction; the semantic ground truth for every backend
//! - **File I/O** ([`io`]) - Multi-model PDB trajectory reading with
//!   atom-name selection
//!
//! ## Scientific Foundation
//!
//! Pairwise similarity is measured as RMSD after optimal rigid-body
//! superposition: the rotation minimizing the summed squared deviation is
//! recovered from the SVD of the 3×3 cross-covariance between centered
//! point sets, with the SVD's sign ambiguity corrected so the result is
//! always a proper rotation rather than a reflection.

pub mod align;
pub mod io;
pub mod models;
