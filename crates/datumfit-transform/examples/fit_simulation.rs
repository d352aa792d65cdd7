use datumfit_transform::affine::AffineParams;
use datumfit_transform::scenario::{run_simulation, DEFAULT_TOLERANCE_M};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // four scattered control points with ED50-style eastings/northings
    let records = "
        # id  easting     northing
        P1    500100.00   4000100.00
        P2    500200.00   4000200.00
        P3    500150.00   4000300.00
        P4    500300.00   4000150.00
    ";

    // a small scale change plus a shift, the kind a datum difference produces
    let truth = AffineParams {
        a: 1.00005,
        b: 0.0,
        c: 100.0,
        d: 0.0,
        e: 1.00005,
        f: 50.0,
    };

    let report = run_simulation(records, &truth)?;

    let p = &report.fit.params;
    println!("fitted parameters:");
    println!("  a = {:.9}  b = {:.9}  c = {:.3}", p.a, p.b, p.c);
    println!("  d = {:.9}  e = {:.9}  f = {:.3}", p.d, p.e, p.f);

    println!("residuals [vy, vx] (m):");
    for (point, v) in report.source.iter().zip(report.fit.residuals.iter()) {
        println!("  {}: [{:+.6}, {:+.6}]", point.id, v[0], v[1]);
    }

    println!(
        "m0 = {:.6} m (tolerance {} m), accepted: {}",
        report.fit.m0,
        DEFAULT_TOLERANCE_M,
        report.accepted()
    );

    Ok(())
}
