use orbit_sim::orbital::{self, OrbitElements};
use orbit_sim::physics::gravity::{EARTH_MU, R_EARTH};
use orbit_sim::OrbitResult;

fn main() -> OrbitResult<()> {
    println!("=== Hohmann Transfer: LEO → GEO ===\n");

    let r_leo = R_EARTH + 200.0; // 200 km LEO
    let r_geo = 42_164.0;        // GEO radius (~35,786 km altitude)

    let transfer = orbital::hohmann(r_leo, r_geo, EARTH_MU)?;

    println!("LEO altitude: {:.0} km", r_leo - R_EARTH);
    println!("GEO altitude: {:.0} km", r_geo - R_EARTH);
    println!();
    println!("Delta-v 1 (raise apoapsis): {:.1} m/s", transfer.dv1 * 1000.0);
    println!("Delta-v 2 (circularize):    {:.1} m/s", transfer.dv2 * 1000.0);
    println!("Total delta-v:              {:.1} m/s", transfer.total_dv * 1000.0);
    println!("Transfer time:              {:.2} hours", transfer.transfer_time / 3600.0);
    println!();

    // Fly the transfer with two impulsive burns
    println!("=== Flying the transfer ===\n");

    let leo = OrbitElements::circular(r_leo, 28.5_f64.to_radians(), EARTH_MU)?;
    let ellipse = orbital::apply_prograde_burn(&leo, 0.0, transfer.dv1)?;
    let geo = orbital::apply_prograde_burn(&ellipse, transfer.transfer_time, transfer.dv2)?;

    for (name, orbit) in [("LEO", &leo), ("Transfer", &ellipse), ("GEO", &geo)] {
        println!(
            "  {:<9} a={:>9.1} km  e={:.6}  inc={:.3} deg  period={:.2} h",
            name,
            orbit.sma,
            orbit.ecc,
            orbit.inc.to_degrees(),
            orbit.period().unwrap_or(f64::NAN) / 3600.0,
        );
    }
    println!();

    // Sample the transfer arc
    let arc = orbital::propagate_orbit(&ellipse, 0.0, 1800.0, transfer.transfer_time)?;
    println!("Transfer arc ({} samples):", arc.len());
    for s in &arc {
        println!(
            "  t={:>6.0} s  alt={:>8.1} km  v={:.3} km/s",
            s.time,
            s.radius() - R_EARTH,
            s.speed()
        );
    }

    Ok(())
}
