//! Six-parameter (affine) plane transformation and its least-squares
//! estimation from ground control point pairs.
//!
//! The model maps source plane coordinates `(y, x)` onto target plane
//! coordinates:
//!
//! ```text
//! Y' = a*y + b*x + c
//! X' = d*y + e*x + f
//! ```
//!
//! Each control point pair contributes two observation equations, the
//! parameters come out of the normal equations `(A^T A)^-1 A^T L`, and
//! the adjustment reports per-point residuals together with the
//! a-posteriori standard deviation of unit weight `m0`. Normal equations
//! are numerically adequate at terrestrial coordinate scales; an
//! orthogonal decomposition (QR or SVD) is the upgrade path for badly
//! conditioned systems.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use datumfit_linalg::matrix::{Mat, MatError};

use crate::point::PlanePoint;

/// Number of parameters in the affine model.
const NUM_PARAMS: usize = 6;

/// Minimum number of control point pairs for a fit.
///
/// Four pairs give eight observation equations for six parameters, the
/// smallest system with the redundancy the `m0` estimate needs.
pub const MIN_CORRESPONDENCES: usize = 4;

/// Error types for the affine estimator.
#[derive(Debug, Error)]
pub enum AffineFitError {
    /// Source and target lists have different lengths.
    #[error("mismatched correspondence lists: {left_name} ({left_len}) != {right_name} ({right_len})")]
    MismatchedLengths {
        /// Label for the left-hand slice.
        left_name: &'static str,
        /// Length of the left-hand slice.
        left_len: usize,
        /// Label for the right-hand slice.
        right_name: &'static str,
        /// Length of the right-hand slice.
        right_len: usize,
    },

    /// Too few control point pairs for a redundant least-squares fit.
    #[error("affine fit requires at least {required} control point pairs, got {actual}")]
    InsufficientCorrespondences {
        /// Minimum number of pairs required.
        required: usize,
        /// Actual number of pairs provided.
        actual: usize,
    },

    /// An underlying matrix operation failed, typically a singular normal
    /// matrix from coincident or collinear source points.
    #[error("linear algebra error: {0}")]
    Linalg(#[from] MatError),
}

/// Parameters of a 2D affine transformation between two plane systems.
///
/// `a`, `b`, `d` and `e` carry scale and rotation, `c` and `f` the
/// translation. For transformations close to identity, `a` and `e` stay
/// near one while `b` and `d` stay near zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineParams {
    /// Coefficient of the source easting in the easting equation.
    pub a: f64,
    /// Coefficient of the source northing in the easting equation.
    pub b: f64,
    /// Easting translation in meters.
    pub c: f64,
    /// Coefficient of the source easting in the northing equation.
    pub d: f64,
    /// Coefficient of the source northing in the northing equation.
    pub e: f64,
    /// Northing translation in meters.
    pub f: f64,
}

impl AffineParams {
    /// The identity transformation.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
        e: 1.0,
        f: 0.0,
    };

    /// Applies the transformation to an `(easting, northing)` pair.
    pub fn apply(&self, y: f64, x: f64) -> (f64, f64) {
        (
            self.a * y + self.b * x + self.c,
            self.d * y + self.e * x + self.f,
        )
    }

    /// Applies the transformation to a point, keeping its identifier.
    pub fn apply_point(&self, point: &PlanePoint) -> PlanePoint {
        let (y, x) = self.apply(point.y, point.x);
        PlanePoint {
            id: point.id.clone(),
            y,
            x,
        }
    }
}

/// Result of a least-squares affine fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffineFitResult {
    /// Estimated transformation parameters.
    pub params: AffineParams,
    /// Per-point residuals `[vy, vx]` in meters, computed minus observed,
    /// in input order.
    pub residuals: Vec<[f64; 2]>,
    /// A-posteriori standard deviation of unit weight in meters.
    pub m0: f64,
}

impl AffineFitResult {
    /// Whether `m0` stays below the given tolerance in meters.
    pub fn is_within(&self, tolerance_m: f64) -> bool {
        self.m0 < tolerance_m
    }
}

/// Estimates the affine transformation mapping `source` onto `target` by
/// least squares.
///
/// Control points pair by position: `source[i]` corresponds to
/// `target[i]`. Point identifiers play no role in the adjustment.
///
/// # Arguments
///
/// * `source` - Points in the source plane system.
/// * `target` - Corresponding points in the target plane system.
///
/// # Returns
///
/// The fitted parameters together with per-point residuals and the
/// a-posteriori standard deviation of unit weight.
///
/// # Errors
///
/// Fails when the slices differ in length, when fewer than
/// [`MIN_CORRESPONDENCES`] pairs are given, or when the source geometry
/// is degenerate (coincident or collinear points) and the normal matrix
/// is singular. A failed fit produces no partial output.
pub fn fit_affine(
    source: &[PlanePoint],
    target: &[PlanePoint],
) -> Result<AffineFitResult, AffineFitError> {
    if source.len() != target.len() {
        return Err(AffineFitError::MismatchedLengths {
            left_name: "source",
            left_len: source.len(),
            right_name: "target",
            right_len: target.len(),
        });
    }
    let num_points = source.len();
    if num_points < MIN_CORRESPONDENCES {
        return Err(AffineFitError::InsufficientCorrespondences {
            required: MIN_CORRESPONDENCES,
            actual: num_points,
        });
    }

    // build the design matrix and observation vector, two rows per point:
    //   [y x 1 0 0 0] -> Y'
    //   [0 0 0 y x 1] -> X'
    let mut mat_a = Mat::zeros(2 * num_points, NUM_PARAMS)?;
    let mut vec_l = Mat::zeros(2 * num_points, 1)?;
    for (i, (src, dst)) in source.iter().zip(target.iter()).enumerate() {
        mat_a[(2 * i, 0)] = src.y;
        mat_a[(2 * i, 1)] = src.x;
        mat_a[(2 * i, 2)] = 1.0;
        mat_a[(2 * i + 1, 3)] = src.y;
        mat_a[(2 * i + 1, 4)] = src.x;
        mat_a[(2 * i + 1, 5)] = 1.0;
        vec_l[(2 * i, 0)] = dst.y;
        vec_l[(2 * i + 1, 0)] = dst.x;
    }

    // normal equations: params = ((A^T A)^-1 A^T) L, with the
    // pseudo-inverse formed before anything touches L; folding A^T into
    // L ahead of the inverse costs meters of accuracy at raw
    // plane-coordinate magnitudes
    let mat_at = mat_a.transpose();
    let mat_ata = mat_at.matmul(&mat_a)?;
    let vec_params = mat_ata.inverse()?.matmul(&mat_at)?.matmul(&vec_l)?;

    let params = AffineParams {
        a: vec_params[(0, 0)],
        b: vec_params[(1, 0)],
        c: vec_params[(2, 0)],
        d: vec_params[(3, 0)],
        e: vec_params[(4, 0)],
        f: vec_params[(5, 0)],
    };

    // residuals as computed minus observed, then the a-posteriori
    // standard deviation of unit weight over 2N - 6 degrees of freedom
    let mut residuals = Vec::with_capacity(num_points);
    let mut vtv = 0.0;
    for (src, dst) in source.iter().zip(target.iter()) {
        let (calc_y, calc_x) = params.apply(src.y, src.x);
        let vy = calc_y - dst.y;
        let vx = calc_x - dst.x;
        vtv += vy * vy + vx * vx;
        residuals.push([vy, vx]);
    }
    let dof = (2 * num_points - NUM_PARAMS) as f64;
    let m0 = (vtv / dof).sqrt();

    log::debug!(
        "affine fit over {} pairs: a={} b={} c={} d={} e={} f={}, m0={:.6} m",
        num_points,
        params.a,
        params.b,
        params.c,
        params.d,
        params.e,
        params.f,
        m0
    );

    Ok(AffineFitResult {
        params,
        residuals,
        m0,
    })
}
