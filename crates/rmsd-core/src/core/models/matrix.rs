use super::coordinates::ShapeError;

/// The upper triangle (excluding the diagonal) of a symmetric N×N pairwise
/// RMSD matrix, stored as a flat row-major sequence.
///
/// The entry for pair `(i, j)` with `i < j` sits at offset
/// `i * n - i * (i + 3) / 2 + j - 1`; the full matrix and its zero diagonal
/// are never materialized. Length is always `n * (n - 1) / 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct CondensedMatrix {
    values: Vec<f64>,
    row_length: usize,
}

impl CondensedMatrix {
    /// Builds a condensed matrix from a flat row-major value sequence.
    ///
    /// The row length `n` is recovered from the triangular number
    /// `len = n * (n - 1) / 2`.
    ///
    /// # Return
    ///
    /// The matrix, or [`ShapeError::NotCondensed`] if `len` is not a
    /// positive triangular number.
    pub fn from_values(values: Vec<f64>) -> Result<Self, ShapeError> {
        let len = values.len();
        let estimate = ((1.0 + (1.0 + 8.0 * len as f64).sqrt()) / 2.0) as usize;
        // The float estimate can land one off for large triangles.
        for row_length in estimate.saturating_sub(1)..=estimate + 1 {
            if row_length >= 2 && row_length * (row_length - 1) / 2 == len {
                return Ok(Self { values, row_length });
            }
        }
        Err(ShapeError::NotCondensed { len })
    }

    pub(crate) fn with_row_length(values: Vec<f64>, row_length: usize) -> Result<Self, ShapeError> {
        if row_length < 2 || values.len() != row_length * (row_length - 1) / 2 {
            return Err(ShapeError::NotCondensed { len: values.len() });
        }
        Ok(Self { values, row_length })
    }

    /// Returns `n`, the dimension of the symmetric matrix this condenses.
    pub fn row_length(&self) -> usize {
        self.row_length
    }

    /// Returns the number of stored off-diagonal entries, `n * (n - 1) / 2`.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Looks up the RMSD for a conformation pair.
    ///
    /// Access is symmetric (`get(i, j) == get(j, i)`) and the diagonal
    /// reads as exactly `0.0` without being stored.
    ///
    /// # Return
    ///
    /// Returns `Some(value)` if both indices are within `row_length`,
    /// otherwise `None`.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.row_length || j >= self.row_length {
            return None;
        }
        if i == j {
            return Some(0.0);
        }
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        Some(self.values[i * self.row_length - i * (i + 3) / 2 + j - 1])
    }

    /// Returns the flat row-major value sequence.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consumes the matrix, returning the flat row-major value sequence.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    /// Mean of the off-diagonal RMSD values.
    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Population standard deviation of the off-diagonal RMSD values.
    pub fn std_dev(&self) -> f64 {
        let mean = self.mean();
        let variance = self
            .values
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / self.values.len() as f64;
        variance.sqrt()
    }

    /// Smallest off-diagonal RMSD value.
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest off-diagonal RMSD value.
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}
