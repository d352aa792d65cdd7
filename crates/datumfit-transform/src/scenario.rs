//! Synthetic end-to-end estimation scenario.
//!
//! Mirrors how the estimator is validated in the field: take a list of
//! raw control point records, move them with a known transformation, then
//! fit the transformation back out of the point pairs and judge the
//! adjustment by its `m0`.

use serde::{Deserialize, Serialize};

use crate::affine::{fit_affine, AffineFitError, AffineFitResult, AffineParams, MIN_CORRESPONDENCES};
use crate::point::{parse_point_list, PlanePoint};

/// Acceptance threshold on `m0` for a usable fit, in meters.
pub const DEFAULT_TOLERANCE_M: f64 = 0.1;

/// Outcome of a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Source points parsed from the raw records.
    pub source: Vec<PlanePoint>,
    /// Synthetic target points produced by the truth transformation.
    pub target: Vec<PlanePoint>,
    /// Least-squares fit between the two point sets.
    pub fit: AffineFitResult,
}

impl SimulationReport {
    /// Whether the fit meets [`DEFAULT_TOLERANCE_M`].
    pub fn accepted(&self) -> bool {
        self.fit.is_within(DEFAULT_TOLERANCE_M)
    }
}

/// Runs the estimation pipeline against synthetic targets.
///
/// Parses `raw_records` (one `ID VALUE1 VALUE2` record per line, `#`
/// comments and malformed lines skipped), applies `truth` to every parsed
/// point to produce the target set, then fits the transformation back out
/// of the point pairs.
///
/// # Arguments
///
/// * `raw_records` - Control point records, one per line.
/// * `truth` - Transformation used to synthesize the target points.
///
/// # Errors
///
/// Fails when fewer than [`MIN_CORRESPONDENCES`] records survive parsing,
/// or when the fit itself fails.
pub fn run_simulation(
    raw_records: &str,
    truth: &AffineParams,
) -> Result<SimulationReport, AffineFitError> {
    let source = parse_point_list(raw_records);
    log::debug!("parsed {} source points", source.len());

    if source.len() < MIN_CORRESPONDENCES {
        return Err(AffineFitError::InsufficientCorrespondences {
            required: MIN_CORRESPONDENCES,
            actual: source.len(),
        });
    }

    let target: Vec<PlanePoint> = source.iter().map(|p| truth.apply_point(p)).collect();

    let fit = fit_affine(&source, &target)?;
    log::debug!(
        "simulation m0 = {:.6} m, accepted = {}",
        fit.m0,
        fit.is_within(DEFAULT_TOLERANCE_M)
    );

    Ok(SimulationReport {
        source,
        target,
        fit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDS: &str = "
        # id  easting     northing
        P1    500100.00   4000100.00
        P2    500200.00   4000200.00
        P3    500150.00   4000300.00
        P4    500300.00   4000150.00
    ";

    fn truth() -> AffineParams {
        AffineParams {
            a: 1.00005,
            b: 0.0,
            c: 100.0,
            d: 0.0,
            e: 1.00005,
            f: 50.0,
        }
    }

    #[test]
    fn test_simulation_accepts_clean_fit() -> Result<(), AffineFitError> {
        let report = run_simulation(RECORDS, &truth())?;

        assert_eq!(report.source.len(), 4);
        assert_eq!(report.target.len(), 4);
        assert_eq!(report.source[0].id, "P1");

        // targets come from the truth transformation applied in order
        let expected = truth().apply_point(&report.source[2]);
        assert_eq!(report.target[2], expected);

        // noise-free targets still leave a small m0 from rounding at
        // these coordinate magnitudes; it stays inside the acceptance band
        assert!(report.accepted());
        assert!(report.fit.m0 < 5e-2);
        Ok(())
    }

    #[test]
    fn test_simulation_fitted_params_reproduce_targets() -> Result<(), AffineFitError> {
        let report = run_simulation(RECORDS, &truth())?;
        for (src, dst) in report.source.iter().zip(report.target.iter()) {
            let (calc_y, calc_x) = report.fit.params.apply(src.y, src.x);
            assert!((calc_y - dst.y).abs() < 5e-2);
            assert!((calc_x - dst.x).abs() < 5e-2);
        }
        Ok(())
    }

    #[test]
    fn test_simulation_rejects_too_few_records() {
        let records = "
            P1 500100.00 4000100.00
            P2 500200.00 4000200.00
            P3 500150.00 4000300.00
        ";
        let result = run_simulation(records, &truth());
        assert!(matches!(
            result,
            Err(AffineFitError::InsufficientCorrespondences {
                required: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_report_serde_roundtrip() -> Result<(), AffineFitError> {
        let report = run_simulation(RECORDS, &truth())?;
        let json = serde_json::to_string(&report).unwrap();
        let back: SimulationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.source, report.source);
        assert_eq!(back.fit.params, report.fit.params);
        Ok(())
    }
}
