//! # RMSD++ Core Library
//!
//! A modernized, high-performance library for optimal rigid-body superposition and
//! pairwise RMSD computation over conformation ensembles, built on the Kabsch method.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict two-layer architecture to ensure a clear separation
//! of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models (`CoordinateSet`,
//!   `CondensedMatrix`), the pure alignment mathematics (`KabschAligner`), and I/O utilities
//!   for reading conformation ensembles.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer binds an ensemble to a calculation
//!   backend. It includes the `RmsdCalculator` dispatcher with its documented mutation
//!   contracts, the immutable backend registry, and the sequential, worker-thread, and GPU
//!   execution paths behind a common backend trait.

pub mod core;
pub mod engine;
