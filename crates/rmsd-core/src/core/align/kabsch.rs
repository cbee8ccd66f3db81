use nalgebra::{Matrix3, Point3, Vector3};
use thiserror::Error;

/// Errors raised when conformations cannot be superposed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("reference conformation is empty")]
    EmptyReference,
    #[error("mobile conformation has {mobile} atoms, reference has {reference}")]
    LengthMismatch { reference: usize, mobile: usize },
}

/// The optimal rigid transform found by one superposition, together with
/// the deviation that remains after applying it.
///
/// `rotation` is always a proper rotation (orthogonal, determinant +1);
/// `translation` completes the map `p -> rotation * p + translation` that
/// carries original mobile coordinates onto their superposed positions.
#[derive(Debug, Clone, Copy)]
pub struct Superposition {
    pub rmsd: f64,
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

/// Optimal rigid-body superposition of mobile conformations onto one fixed
/// reference, using the Kabsch (SVD) method.
///
/// The aligner centers the reference once at construction, so aligning many
/// mobile conformations against the same reference pays the centering cost
/// a single time. Each [`superpose`](Self::superpose) call:
///
/// 1. centers the mobile conformation on its centroid,
/// 2. accumulates the 3×3 cross-covariance with the centered reference,
/// 3. takes its SVD and forms the rotation, correcting the SVD's sign
///    ambiguity so a reflection is never returned,
/// 4. **overwrites the mobile coordinates in place** with their rotated
///    positions translated onto the reference centroid, and
/// 5. returns the RMSD of the superposed pair.
///
/// Step 4 is a deliberate, load-bearing contract: callers must not assume
/// the mobile conformation retains its pre-call coordinates. Compute over a
/// clone when the originals matter.
///
/// Near-singular cross-covariance (collinear or planar point sets) is not
/// an error; the correction in step 3 still yields a valid proper rotation.
#[derive(Debug, Clone)]
pub struct KabschAligner {
    /// Centroid of the reference conformation.
    centroid: Vector3<f64>,
    /// Reference points relative to their centroid.
    centered: Vec<Vector3<f64>>,
}

impl KabschAligner {
    /// Prepares an aligner for a fixed reference conformation.
    ///
    /// # Arguments
    ///
    /// * `reference` - The reference points; must be non-empty.
    ///
    /// # Return
    ///
    /// The aligner, or [`AlignmentError::EmptyReference`].
    pub fn new(reference: &[Point3<f64>]) -> Result<Self, AlignmentError> {
        if reference.is_empty() {
            return Err(AlignmentError::EmptyReference);
        }
        let centroid =
            reference.iter().map(|p| p.coords).sum::<Vector3<f64>>() / reference.len() as f64;
        let centered = reference.iter().map(|p| p.coords - centroid).collect();
        Ok(Self { centroid, centered })
    }

    /// Number of atoms in the reference conformation.
    pub fn atom_count(&self) -> usize {
        self.centered.len()
    }

    /// Superposes a mobile conformation onto the reference, mutating it in
    /// place, and returns the resulting RMSD.
    ///
    /// # Arguments
    ///
    /// * `mobile` - The mobile points; same length as the reference. On
    ///   return they hold the superposed coordinates.
    ///
    /// # Return
    ///
    /// The RMSD after superposition, or
    /// [`AlignmentError::LengthMismatch`].
    pub fn superpose(&self, mobile: &mut [Point3<f64>]) -> Result<f64, AlignmentError> {
        self.superpose_full(mobile).map(|s| s.rmsd)
    }

    /// Like [`superpose`](Self::superpose), additionally returning the
    /// rigid transform that was applied.
    pub fn superpose_full(
        &self,
        mobile: &mut [Point3<f64>],
    ) -> Result<Superposition, AlignmentError> {
        if mobile.len() != self.centered.len() {
            return Err(AlignmentError::LengthMismatch {
                reference: self.centered.len(),
                mobile: mobile.len(),
            });
        }

        let mobile_centroid =
            mobile.iter().map(|p| p.coords).sum::<Vector3<f64>>() / mobile.len() as f64;

        let mut covariance = Matrix3::zeros();
        for (point, reference) in mobile.iter().zip(&self.centered) {
            covariance += (point.coords - mobile_centroid) * reference.transpose();
        }

        let rotation = optimal_rotation(&covariance);

        let mut squared_sum = 0.0;
        for (point, reference) in mobile.iter_mut().zip(&self.centered) {
            let rotated = rotation * (point.coords - mobile_centroid);
            squared_sum += (rotated - reference).norm_squared();
            *point = Point3::from(rotated + self.centroid);
        }

        Ok(Superposition {
            rmsd: (squared_sum / self.centered.len() as f64).sqrt(),
            rotation,
            translation: self.centroid - rotation * mobile_centroid,
        })
    }
}

/// Proper rotation maximizing the trace of the rotated cross-covariance.
///
/// Equivalent to `V * diag(1, 1, sign(det)) * U^T`: when the raw SVD
/// product comes out as a reflection, the singular direction with the
/// smallest contribution (last row of `V^T`) is negated and the product
/// recomputed. Unlike taking `sign(det)` of the covariance itself, this
/// stays well-defined when the covariance is exactly singular.
fn optimal_rotation(covariance: &Matrix3<f64>) -> Matrix3<f64> {
    let svd = covariance.svd(true, true);
    match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => {
            let rotation = v_t.transpose() * u.transpose();
            if rotation.determinant() < 0.0 {
                let mut v_t = v_t;
                v_t.row_mut(2).neg_mut();
                v_t.transpose() * u.transpose()
            } else {
                rotation
            }
        }
        // Factors were requested, so this arm is never taken; translating
        // onto the reference centroid is still meaningful without rotation.
        _ => Matrix3::identity(),
    }
}
