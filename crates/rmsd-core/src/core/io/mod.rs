//! # Input/Output Module
//!
//! Trajectory ingestion for the coordinate layer.
//!
//! The engine itself consumes only validated
//! [`CoordinateSet`](crate::core::models::coordinates::CoordinateSet)s;
//! this module supplies them from disk formats. [`pdb`] reads multi-model
//! PDB files (one conformation per `MODEL` block) with an optional
//! atom-name selection, reporting malformed records with their line
//! numbers.
pub mod pdb;
