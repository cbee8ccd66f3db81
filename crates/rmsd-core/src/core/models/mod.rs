//! # Core Models Module
//!
//! This module contains the fundamental data structures used to represent
//! conformation ensembles and their pairwise comparison results.
//!
//! ## Overview
//!
//! Two shapes of data flow through the library, and both live here:
//!
//! - **Coordinate data** - An ensemble of N conformations, each an ordered
//!   sequence of M 3D points, stored flat so computational backends can
//!   consume it without reshaping.
//! - **Result data** - The condensed upper triangle of the symmetric
//!   pairwise RMSD matrix, plus per-pair scalars.
//!
//! ## Key Components
//!
//! - [`coordinates`] - The [`coordinates::CoordinateSet`] ensemble holder
//!   and its shape-validation errors
//! - [`matrix`] - The [`matrix::CondensedMatrix`] pairwise result type with
//!   symmetric access and summary statistics
pub mod coordinates;
pub mod matrix;
