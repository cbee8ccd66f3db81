use nalgebra::Point3;
use thiserror::Error;

/// Errors raised when coordinate data does not satisfy the ensemble shape
/// contract (N conformations × M atoms, uniform M).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("a coordinate set requires at least 2 conformations (got {0})")]
    TooFewConformations(usize),
    #[error("conformations must contain at least one atom")]
    EmptyConformation,
    #[error("conformation {index} has {atoms} atoms, expected {expected}")]
    RaggedConformation {
        index: usize,
        atoms: usize,
        expected: usize,
    },
    #[error(
        "flat buffer of {points} points cannot be split into conformations of {atoms_per_conformation} atoms"
    )]
    MisalignedBuffer {
        points: usize,
        atoms_per_conformation: usize,
    },
    #[error("{len} values do not form a condensed upper triangle (expected n*(n-1)/2)")]
    NotCondensed { len: usize },
}

/// An ordered ensemble of conformations sharing a common atom count.
///
/// Coordinates are stored flat in conformation-major order: the points of
/// conformation `i` occupy `[i * m, (i + 1) * m)` of the underlying buffer,
/// where `m` is the per-conformation atom count. This is the exact layout
/// accelerated backends consume, so dispatching never reshapes data.
///
/// A set always holds at least two conformations of at least one atom each;
/// both bounds are validated at construction and hold for the lifetime of
/// the value. Alignment operations overwrite conformation coordinates in
/// place through the mutable accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSet {
    /// Flat conformation-major point storage, length `n * m`.
    points: Vec<Point3<f64>>,
    /// Atoms per conformation (`m`), uniform across the set.
    atoms_per_conformation: usize,
}

impl CoordinateSet {
    /// Builds a coordinate set from per-conformation point vectors.
    ///
    /// # Arguments
    ///
    /// * `conformations` - One vector of points per conformation, in order.
    ///
    /// # Return
    ///
    /// The validated set, or a [`ShapeError`] if fewer than two
    /// conformations are supplied, any conformation is empty, or the atom
    /// counts are ragged.
    pub fn new(conformations: Vec<Vec<Point3<f64>>>) -> Result<Self, ShapeError> {
        if conformations.len() < 2 {
            return Err(ShapeError::TooFewConformations(conformations.len()));
        }
        let expected = conformations[0].len();
        if expected == 0 {
            return Err(ShapeError::EmptyConformation);
        }
        for (index, conformation) in conformations.iter().enumerate() {
            if conformation.len() != expected {
                return Err(ShapeError::RaggedConformation {
                    index,
                    atoms: conformation.len(),
                    expected,
                });
            }
        }

        let mut points = Vec::with_capacity(conformations.len() * expected);
        for conformation in conformations {
            points.extend(conformation);
        }
        Ok(Self {
            points,
            atoms_per_conformation: expected,
        })
    }

    /// Builds a coordinate set from an already-flattened point buffer.
    ///
    /// # Arguments
    ///
    /// * `points` - Conformation-major points, length `n * m`.
    /// * `atoms_per_conformation` - The per-conformation atom count `m`.
    ///
    /// # Return
    ///
    /// The validated set, or a [`ShapeError`] if `m` is zero, the buffer
    /// length is not a multiple of `m`, or fewer than two conformations
    /// result.
    pub fn from_flat(
        points: Vec<Point3<f64>>,
        atoms_per_conformation: usize,
    ) -> Result<Self, ShapeError> {
        if atoms_per_conformation == 0 {
            return Err(ShapeError::EmptyConformation);
        }
        if points.len() % atoms_per_conformation != 0 {
            return Err(ShapeError::MisalignedBuffer {
                points: points.len(),
                atoms_per_conformation,
            });
        }
        let conformations = points.len() / atoms_per_conformation;
        if conformations < 2 {
            return Err(ShapeError::TooFewConformations(conformations));
        }
        Ok(Self {
            points,
            atoms_per_conformation,
        })
    }

    /// Returns the number of conformations `n` in the set.
    pub fn conformation_count(&self) -> usize {
        self.points.len() / self.atoms_per_conformation
    }

    /// Returns the uniform per-conformation atom count `m`.
    pub fn atoms_per_conformation(&self) -> usize {
        self.atoms_per_conformation
    }

    /// Retrieves the points of one conformation.
    ///
    /// # Arguments
    ///
    /// * `index` - The conformation index.
    ///
    /// # Return
    ///
    /// Returns `Some(&[Point3<f64>])` of length `m` if the index is in
    /// range, otherwise `None`.
    pub fn conformation(&self, index: usize) -> Option<&[Point3<f64>]> {
        let m = self.atoms_per_conformation;
        self.points.get(index * m..(index + 1) * m)
    }

    /// Retrieves the points of one conformation mutably.
    ///
    /// # Arguments
    ///
    /// * `index` - The conformation index.
    ///
    /// # Return
    ///
    /// Returns `Some(&mut [Point3<f64>])` of length `m` if the index is in
    /// range, otherwise `None`.
    pub fn conformation_mut(&mut self, index: usize) -> Option<&mut [Point3<f64>]> {
        let m = self.atoms_per_conformation;
        self.points.get_mut(index * m..(index + 1) * m)
    }

    /// Returns an iterator over conformations as point slices, in order.
    pub fn conformations(&self) -> impl Iterator<Item = &[Point3<f64>]> {
        self.points.chunks_exact(self.atoms_per_conformation)
    }

    /// Returns the flat conformation-major point buffer.
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Returns the flat conformation-major point buffer mutably.
    ///
    /// This is the serialization surface handed to backends; writes through
    /// it are writes to the conformations themselves.
    pub fn points_mut(&mut self) -> &mut [Point3<f64>] {
        &mut self.points
    }

    /// Copies conformations `first` and `second` into a fresh 2-conformation
    /// set, leaving `self` untouched.
    ///
    /// # Return
    ///
    /// The pair set, or `None` if either index is out of range.
    pub fn pair(&self, first: usize, second: usize) -> Option<Self> {
        let mut points = Vec::with_capacity(2 * self.atoms_per_conformation);
        points.extend_from_slice(self.conformation(first)?);
        points.extend_from_slice(self.conformation(second)?);
        Some(Self {
            points,
            atoms_per_conformation: self.atoms_per_conformation,
        })
    }

    /// Builds a reordered copy in which conformation `index` comes first,
    /// followed by its former predecessors and then its former successors,
    /// each group in original relative order.
    ///
    /// This is the canonical-form permutation behind one-vs-the-others:
    /// the copy reduces that operation to one-vs-following from index 0.
    ///
    /// # Return
    ///
    /// The reordered copy, or `None` if `index` is out of range.
    pub fn with_reference_first(&self, index: usize) -> Option<Self> {
        let m = self.atoms_per_conformation;
        let mut points = Vec::with_capacity(self.points.len());
        points.extend_from_slice(self.conformation(index)?);
        points.extend_from_slice(&self.points[..index * m]);
        points.extend_from_slice(&self.points[(index + 1) * m..]);
        Some(Self {
            points,
            atoms_per_conformation: m,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f64, y: f64, z: f64) -> Point3<f64> {
        Point3::new(x, y, z)
    }

    fn create_test_set() -> CoordinateSet {
        // Three conformations of two atoms with recognizable x values.
        CoordinateSet::new(vec![
            vec![point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0)],
            vec![point(10.0, 0.0, 0.0), point(11.0, 0.0, 0.0)],
            vec![point(20.0, 0.0, 0.0), point(21.0, 0.0, 0.0)],
        ])
        .unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn accepts_uniform_conformations() {
            let set = create_test_set();
            assert_eq!(set.conformation_count(), 3);
            assert_eq!(set.atoms_per_conformation(), 2);
            assert_eq!(set.points().len(), 6);
        }

        #[test]
        fn rejects_fewer_than_two_conformations() {
            let result = CoordinateSet::new(vec![vec![point(0.0, 0.0, 0.0)]]);
            assert_eq!(result.unwrap_err(), ShapeError::TooFewConformations(1));

            let result = CoordinateSet::new(vec![]);
            assert_eq!(result.unwrap_err(), ShapeError::TooFewConformations(0));
        }

        #[test]
        fn rejects_empty_conformations() {
            let result = CoordinateSet::new(vec![vec![], vec![]]);
            assert_eq!(result.unwrap_err(), ShapeError::EmptyConformation);
        }

        #[test]
        fn rejects_ragged_conformations() {
            let result = CoordinateSet::new(vec![
                vec![point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0)],
                vec![point(2.0, 0.0, 0.0)],
            ]);
            assert_eq!(
                result.unwrap_err(),
                ShapeError::RaggedConformation {
                    index: 1,
                    atoms: 1,
                    expected: 2,
                }
            );
        }

        #[test]
        fn from_flat_validates_divisibility() {
            let points = vec![point(0.0, 0.0, 0.0); 5];
            let result = CoordinateSet::from_flat(points, 2);
            assert_eq!(
                result.unwrap_err(),
                ShapeError::MisalignedBuffer {
                    points: 5,
                    atoms_per_conformation: 2,
                }
            );
        }

        #[test]
        fn from_flat_rejects_single_conformation() {
            let points = vec![point(0.0, 0.0, 0.0); 4];
            let result = CoordinateSet::from_flat(points, 4);
            assert_eq!(result.unwrap_err(), ShapeError::TooFewConformations(1));
        }

        #[test]
        fn from_flat_matches_nested_construction() {
            let nested = create_test_set();
            let flat = CoordinateSet::from_flat(nested.points().to_vec(), 2).unwrap();
            assert_eq!(nested, flat);
        }
    }

    mod access {
        use super::*;

        #[test]
        fn conformation_views_the_expected_points() {
            let set = create_test_set();
            let second = set.conformation(1).unwrap();
            assert_eq!(second.len(), 2);
            assert_eq!(second[0].x, 10.0);
            assert_eq!(second[1].x, 11.0);
            assert!(set.conformation(3).is_none());
        }

        #[test]
        fn conformation_mut_writes_through_to_the_buffer() {
            let mut set = create_test_set();
            set.conformation_mut(2).unwrap()[0] = point(-5.0, 0.0, 0.0);
            assert_eq!(set.points()[4].x, -5.0);
        }

        #[test]
        fn conformations_iterates_in_order() {
            let set = create_test_set();
            let first_atoms: Vec<f64> = set.conformations().map(|c| c[0].x).collect();
            assert_eq!(first_atoms, vec![0.0, 10.0, 20.0]);
        }
    }

    mod permutations {
        use super::*;

        #[test]
        fn pair_copies_the_requested_conformations() {
            let set = create_test_set();
            let pair = set.pair(2, 0).unwrap();
            assert_eq!(pair.conformation_count(), 2);
            assert_eq!(pair.conformation(0).unwrap()[0].x, 20.0);
            assert_eq!(pair.conformation(1).unwrap()[0].x, 0.0);
            assert!(set.pair(0, 3).is_none());
        }

        #[test]
        fn pair_of_equal_indices_duplicates_a_conformation() {
            let set = create_test_set();
            let pair = set.pair(1, 1).unwrap();
            assert_eq!(pair.conformation(0), pair.conformation(1));
        }

        #[test]
        fn with_reference_first_keeps_relative_order() {
            let set = create_test_set();
            let reordered = set.with_reference_first(1).unwrap();
            let first_atoms: Vec<f64> = reordered.conformations().map(|c| c[0].x).collect();
            assert_eq!(first_atoms, vec![10.0, 0.0, 20.0]);
            // The original set is untouched.
            assert_eq!(set.conformation(0).unwrap()[0].x, 0.0);
        }

        #[test]
        fn with_reference_first_of_zero_is_the_identity_permutation() {
            let set = create_test_set();
            let reordered = set.with_reference_first(0).unwrap();
            assert_eq!(reordered, set);
            assert!(set.with_reference_first(9).is_none());
        }
    }
}
