//! # RMSD Calculator
//!
//! ## Overview
//!
//! The calculator binds a validated coordinate set to one backend and
//! dispatches every pairwise-RMSD operation through it. Construction
//! resolves a backend identifier against the compiled registry, so a
//! calculator that exists is always runnable; tunable setters are
//! checked against the backend kind's capabilities and never leave a
//! half-applied configuration behind.
//!
//! ## Mutation Contracts
//!
//! Superposition overwrites mobile coordinates. Which buffer gets
//! overwritten is part of each operation's contract and is reflected in
//! its receiver:
//!
//! - [`one_vs_following`](RmsdCalculator::one_vs_following) and
//!   [`pairwise_matrix`](RmsdCalculator::pairwise_matrix) take `&mut
//!   self` and superpose the bound set itself.
//! - [`pairwise`](RmsdCalculator::pairwise),
//!   [`one_vs_the_others`](RmsdCalculator::one_vs_the_others), and
//!   [`pairwise_matrix_preserving`](RmsdCalculator::pairwise_matrix_preserving)
//!   take `&self` and work on copies, leaving the bound set untouched.

use super::backend::{AlignmentBackend, BackendKind, BackendTunables};
use super::error::CalculatorError;
use super::progress::{Progress, ProgressReporter};
use super::registry;
use crate::core::models::coordinates::CoordinateSet;
use crate::core::models::matrix::CondensedMatrix;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Pairwise-RMSD dispatcher over a conformation ensemble.
///
/// Holds the ensemble exclusively for its lifetime; the borrow checker
/// rules out concurrent readers observing half-superposed coordinates.
pub struct RmsdCalculator<'a> {
    coordinates: &'a mut CoordinateSet,
    backend_id: &'static str,
    kind: BackendKind,
    backend: Arc<dyn AlignmentBackend>,
    tunables: BackendTunables,
}

impl std::fmt::Debug for RmsdCalculator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RmsdCalculator")
            .field("coordinates", &self.coordinates)
            .field("backend_id", &self.backend_id)
            .field("kind", &self.kind)
            .field("backend", &self.backend_id)
            .field("tunables", &self.tunables)
            .finish()
    }
}

impl<'a> RmsdCalculator<'a> {
    /// Binds `coordinates` to the backend registered under `backend`.
    ///
    /// # Arguments
    ///
    /// * `coordinates` - The ensemble to compute over.
    /// * `backend` - A registered backend identifier, e.g.
    ///   `"KABSCH_SERIAL"`.
    ///
    /// # Errors
    ///
    /// [`CalculatorError::UnknownBackend`] when the identifier is not
    /// registered or not compiled into this build;
    /// [`CalculatorError::Backend`] when the backend fails to
    /// initialize.
    pub fn new(
        coordinates: &'a mut CoordinateSet,
        backend: &str,
    ) -> Result<Self, CalculatorError> {
        let (backend_id, kind) = registry::lookup(backend)?;
        let backend = registry::instantiate(kind)?;
        debug!(
            backend = backend_id,
            conformations = coordinates.conformation_count(),
            atoms = coordinates.atoms_per_conformation(),
            "calculator bound"
        );
        Ok(Self {
            coordinates,
            backend_id,
            kind,
            backend,
            tunables: BackendTunables::default(),
        })
    }

    /// The canonical identifier of the bound backend.
    pub fn backend_id(&self) -> &'static str {
        self.backend_id
    }

    /// The kind of the bound backend.
    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    /// The execution parameters currently in force.
    pub fn tunables(&self) -> &BackendTunables {
        &self.tunables
    }

    /// Number of conformations in the bound set.
    pub fn conformation_count(&self) -> usize {
        self.coordinates.conformation_count()
    }

    /// Number of atoms per conformation in the bound set.
    pub fn atoms_per_conformation(&self) -> usize {
        self.coordinates.atoms_per_conformation()
    }

    /// Read access to the bound coordinates, superposed or not.
    pub fn coordinates(&self) -> &CoordinateSet {
        self.coordinates
    }

    /// Sets the worker thread count for CPU-parallel execution.
    ///
    /// A count of zero lets the pool pick the core count. Fails without
    /// touching the configuration when the bound backend does not run on
    /// worker threads.
    pub fn set_thread_count(&mut self, threads: usize) -> Result<(), CalculatorError> {
        if !self.kind.supports_thread_count() {
            return Err(CalculatorError::UnsupportedTunable {
                backend: self.backend_id,
                kind: self.kind,
                parameter: "a thread count",
            });
        }
        self.tunables.thread_count = Some(threads);
        Ok(())
    }

    /// Sets the kernel launch dimensions for GPU execution.
    ///
    /// Fails without touching the configuration when the bound backend
    /// does not launch kernels.
    pub fn set_kernel_launch(
        &mut self,
        threads_per_block: u32,
        blocks_per_grid: u32,
    ) -> Result<(), CalculatorError> {
        if !self.kind.supports_kernel_launch() {
            return Err(CalculatorError::UnsupportedTunable {
                backend: self.backend_id,
                kind: self.kind,
                parameter: "kernel launch dimensions",
            });
        }
        self.tunables.threads_per_block = threads_per_block;
        self.tunables.blocks_per_grid = blocks_per_grid;
        Ok(())
    }

    /// RMSD between two conformations after optimal superposition.
    ///
    /// Works on a two-conformation copy; the bound set keeps its
    /// coordinates. Symmetric in its arguments up to floating-point
    /// round-off, and `pairwise(i, i)` is a valid request that returns a
    /// value indistinguishable from zero.
    pub fn pairwise(&self, first: usize, second: usize) -> Result<f64, CalculatorError> {
        let count = self.coordinates.conformation_count();
        let mut pair = self.coordinates.pair(first, second).ok_or(
            CalculatorError::ConformationOutOfRange {
                index: if first >= count { first } else { second },
                count,
            },
        )?;
        let rmsds = self.backend.one_vs_following(
            pair.points_mut(),
            self.coordinates.atoms_per_conformation(),
            0,
            &self.tunables,
        )?;
        Ok(rmsds[0])
    }

    /// Superposes every conformation after `reference` onto it, in
    /// place, and returns their RMSDs in index order.
    ///
    /// Returns `count - 1 - reference` values; asking about the last
    /// conformation yields an empty result rather than an error. On
    /// return, conformations `reference + 1..` hold their superposed
    /// coordinates and everything up to and including the reference is
    /// untouched.
    pub fn one_vs_following(&mut self, reference: usize) -> Result<Vec<f64>, CalculatorError> {
        let count = self.coordinates.conformation_count();
        if reference >= count {
            return Err(CalculatorError::ConformationOutOfRange {
                index: reference,
                count,
            });
        }
        let atoms = self.coordinates.atoms_per_conformation();
        let rmsds = self.backend.one_vs_following(
            self.coordinates.points_mut(),
            atoms,
            reference,
            &self.tunables,
        )?;
        Ok(rmsds)
    }

    /// RMSD of `subject` against every other conformation, computed on a
    /// reordered copy.
    ///
    /// The copy puts the subject first, then the subject's predecessors
    /// in their original order, then its successors, and the returned
    /// values follow that reordering: RMSDs against conformations
    /// `0..subject` first, then against `subject + 1..`. Callers pairing
    /// values with conformation indices must account for this. The bound
    /// set keeps its coordinates.
    pub fn one_vs_the_others(&self, subject: usize) -> Result<Vec<f64>, CalculatorError> {
        let count = self.coordinates.conformation_count();
        let mut reordered = self.coordinates.with_reference_first(subject).ok_or(
            CalculatorError::ConformationOutOfRange {
                index: subject,
                count,
            },
        )?;
        let rmsds = self.backend.one_vs_following(
            reordered.points_mut(),
            self.coordinates.atoms_per_conformation(),
            0,
            &self.tunables,
        )?;
        Ok(rmsds)
    }

    /// Computes the full pairwise matrix, superposing the bound set in
    /// place as it goes.
    ///
    /// Row `i` is computed after rows `0..i` have already superposed the
    /// set, so the multiset of values decomposes into the independent
    /// [`pairwise`](Self::pairwise) results only up to floating-point
    /// tolerance, not bitwise. Use
    /// [`pairwise_matrix_preserving`](Self::pairwise_matrix_preserving)
    /// when the original coordinates must survive.
    pub fn pairwise_matrix(&mut self) -> Result<CondensedMatrix, CalculatorError> {
        self.pairwise_matrix_with_progress(&ProgressReporter::new())
    }

    /// Like [`pairwise_matrix`](Self::pairwise_matrix), reporting one
    /// progress step per matrix row.
    #[instrument(skip_all, name = "pairwise_matrix")]
    pub fn pairwise_matrix_with_progress(
        &mut self,
        reporter: &ProgressReporter,
    ) -> Result<CondensedMatrix, CalculatorError> {
        let row_length = self.coordinates.conformation_count();
        let atoms = self.coordinates.atoms_per_conformation();
        info!(
            backend = self.backend_id,
            conformations = row_length,
            atoms,
            "Computing condensed pairwise matrix."
        );

        reporter.report(Progress::PhaseStart {
            name: "pairwise matrix".to_string(),
        });
        let values = self.backend.condensed_matrix(
            self.coordinates.points_mut(),
            atoms,
            &self.tunables,
            reporter,
        )?;
        reporter.report(Progress::PhaseFinish);

        let matrix = CondensedMatrix::with_row_length(values, row_length)?;
        info!(entries = matrix.len(), "Pairwise matrix complete.");
        Ok(matrix)
    }

    /// Computes the full pairwise matrix on a copy, leaving the bound
    /// set untouched.
    #[instrument(skip_all, name = "pairwise_matrix_preserving")]
    pub fn pairwise_matrix_preserving(&self) -> Result<CondensedMatrix, CalculatorError> {
        let row_length = self.coordinates.conformation_count();
        let atoms = self.coordinates.atoms_per_conformation();
        let mut scratch = self.coordinates.clone();
        let values = self.backend.condensed_matrix(
            scratch.points_mut(),
            atoms,
            &self.tunables,
            &ProgressReporter::new(),
        )?;
        Ok(CondensedMatrix::with_row_length(values, row_length)?)
    }
}
