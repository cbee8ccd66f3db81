//! # Engine Module
//!
//! This module implements the calculation engine for pairwise RMSD over
//! conformation ensembles, binding coordinate data to interchangeable
//! superposition backends.
//!
//! ## Overview
//!
//! The engine wraps the core alignment machinery in an operational
//! surface: a calculator dispatches single-pair, one-versus-many, and
//! whole-matrix computations to whichever backend it was constructed
//! with, enforcing index validation, capability-checked configuration,
//! and the documented mutation contracts along the way.
//!
//! ## Architecture
//!
//! - **Dispatch** ([`calculator`]) - The calculator binding an ensemble
//!   to a backend and exposing every RMSD operation
//! - **Backend Contract** ([`backend`]) - The backend trait, the closed
//!   set of backend kinds, and their execution parameters
//! - **Registry** ([`registry`]) - The immutable identifier table and
//!   per-build availability filtering
//! - **Progress Monitoring** ([`progress`]) - Progress reporting for
//!   long-running matrix computations
//! - **Error Handling** ([`error`]) - Calculator-level error types and
//!   error propagation

pub mod backend;
pub(crate) mod backends;
pub mod calculator;
pub mod error;
pub mod progress;
pub mod registry;
