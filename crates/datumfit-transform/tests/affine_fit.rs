use approx::assert_relative_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};

use datumfit_transform::affine::{fit_affine, AffineParams};
use datumfit_transform::point::{parse_point_list, PlanePoint};
use datumfit_transform::scenario::run_simulation;

fn grid_points(side: usize, step: f64) -> Vec<PlanePoint> {
    let mut points = Vec::with_capacity(side * side);
    for i in 0..side {
        for j in 0..side {
            points.push(PlanePoint::new(
                format!("G{}_{}", i, j),
                step * j as f64,
                step * i as f64,
            ));
        }
    }
    points
}

#[test]
fn round_trip_through_parsing_and_fit() {
    // raw records in both column orders end up in one consistent frame
    let records = "
        # mixed-order control point list
        N1 4000100.00 500100.00
        N2 500200.00  4000200.00
        N3 4000300.00 500150.00
        N4 500300.00  4000150.00
    ";
    let source = parse_point_list(records);
    assert_eq!(source.len(), 4);
    for point in &source {
        assert!(point.y < 1_000_000.0);
        assert!(point.x > 3_000_000.0);
    }

    let truth = AffineParams {
        a: 1.00005,
        b: 0.0,
        c: 100.0,
        d: 0.0,
        e: 1.00005,
        f: 50.0,
    };
    let target: Vec<PlanePoint> = source.iter().map(|p| truth.apply_point(p)).collect();

    let fit = fit_affine(&source, &target).expect("fit should succeed");
    assert!(fit.m0 < 5e-2);
    for (src, dst) in source.iter().zip(target.iter()) {
        let (calc_y, calc_x) = fit.params.apply(src.y, src.x);
        assert_relative_eq!(calc_y, dst.y, epsilon = 5e-2);
        assert_relative_eq!(calc_x, dst.x, epsilon = 5e-2);
    }
}

#[test]
fn simulation_pipeline_accepts_datum_shift() {
    let records = "
        P1 500100.00 4000100.00
        P2 500200.00 4000200.00
        P3 500150.00 4000300.00
        P4 500300.00 4000150.00
    ";
    let truth = AffineParams {
        a: 1.00005,
        b: 0.0,
        c: 100.0,
        d: 0.0,
        e: 1.00005,
        f: 50.0,
    };

    let report = run_simulation(records, &truth).expect("simulation should succeed");
    assert!(report.accepted());
    assert_eq!(report.fit.residuals.len(), 4);
}

#[test]
fn m0_scales_linearly_with_target_noise() {
    let source = grid_points(5, 100.0);
    let truth = AffineParams {
        a: 1.0001,
        b: 0.00002,
        c: 10.0,
        d: -0.00002,
        e: 1.0001,
        f: -5.0,
    };
    let clean: Vec<PlanePoint> = source.iter().map(|p| truth.apply_point(p)).collect();

    // one fixed noise pattern applied at two amplitudes, so the residual
    // vector and with it m0 scale exactly linearly
    let mut rng = StdRng::seed_from_u64(42);
    let noise: Vec<[f64; 2]> = clean
        .iter()
        .map(|_| [rng.random_range(-0.5..0.5), rng.random_range(-0.5..0.5)])
        .collect();
    let noisy = |amplitude: f64| -> Vec<PlanePoint> {
        clean
            .iter()
            .zip(noise.iter())
            .map(|(p, n)| {
                PlanePoint::new(p.id.clone(), p.y + amplitude * n[0], p.x + amplitude * n[1])
            })
            .collect()
    };

    let fit_small = fit_affine(&source, &noisy(0.05)).expect("fit should succeed");
    let fit_large = fit_affine(&source, &noisy(0.10)).expect("fit should succeed");

    assert!(fit_small.m0 > 0.0);
    assert_relative_eq!(fit_large.m0 / fit_small.m0, 2.0, epsilon = 1e-6);
}
