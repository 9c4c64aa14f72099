use std::error::Error;
use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use orbit_sim::angle::{to_degree, to_radian};
use orbit_sim::io::{csv, json};
use orbit_sim::orbital::{self, OrbitElements};
use orbit_sim::physics::gravity::{AU, EARTH_MU, R_EARTH, SUN_MU};
use orbit_sim::sim::event;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // -----------------------------------------------------------------------
    // Heliocentric: Earth and Mars on circular orbits
    // -----------------------------------------------------------------------
    let earth = OrbitElements::new(149_598_023.0, 0.0, SUN_MU)?
        .with_true_anomaly(to_radian(356.952_122_561_937_5))?;
    let mars = OrbitElements::new(227_939_366.0, 0.0, SUN_MU)?
        .with_true_anomaly(to_radian(0.338_803_314))?;

    let angle = orbital::transfer_angle(&earth, &mars)?;
    let time = orbital::transfer_time(&earth, &mars)?;
    let phase = orbital::hohmann_phase_angle(earth.sma, mars.sma);
    let plan = orbital::hohmann(earth.sma, mars.sma, SUN_MU)?;

    // -----------------------------------------------------------------------
    // Geocentric: Molniya-like eccentric orbit
    // -----------------------------------------------------------------------
    let molniya = OrbitElements::new(26_600.0, 0.74, EARTH_MU)?
        .with_orientation(to_radian(63.4), to_radian(40.0), to_radian(270.0))?;
    let period = molniya.period().unwrap_or(0.0);
    let trajectory = orbital::propagate_orbit(&molniya, 0.0, 60.0, period)?;
    let events = event::detect_events(&trajectory, &mut event::default_detectors());

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  ORBIT SIMULATION REPORT");
    println!("====================================================================");
    println!();
    println!("  Earth → Mars (circular, coplanar)");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Earth a:       {:>12.4} AU   Mars a:       {:>12.4} AU",
        earth.sma / AU,
        mars.sma / AU
    );
    println!(
        "  Transfer time: {:>12.1} d    Transfer angle: {:>9.3} deg",
        time / 86_400.0,
        to_degree(angle)
    );
    println!(
        "  Phase angle:   {:>12.2} deg  Hohmann dv:   {:>12.3} km/s",
        to_degree(phase),
        plan.total_dv
    );
    println!();

    println!("  Eccentric Orbit");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  a = {:.0} km   e = {:.2}   i = {:.1} deg   period = {:.1} h",
        molniya.sma,
        molniya.ecc,
        to_degree(molniya.inc),
        period / 3600.0
    );
    println!(
        "  Perigee alt:   {:>8.0} km    Apogee alt:   {:>8.0} km",
        molniya.periapsis() - R_EARTH,
        molniya.apoapsis().unwrap_or(f64::INFINITY) - R_EARTH
    );
    println!();

    println!("  Orbit Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for e in &events {
        println!(
            "  {:<16} t={:>8.0}s   r={:>9.1}km   v={:>6.3}km/s",
            format!("{:?}", e.kind),
            e.time,
            e.state.radius(),
            e.state.speed()
        );
    }
    println!();

    println!("  Ephemeris");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>8}  {:>9}  {:>10}  {:>9}  {:>9}",
        "t (s)", "nu (deg)", "r (km)", "v (km/s)", "z (km)"
    );
    println!("  {}", "─".repeat(54));

    let sample_interval = (trajectory.len() / 24).max(1);
    for (i, s) in trajectory.iter().enumerate() {
        if i % sample_interval != 0 && i != trajectory.len() - 1 {
            continue;
        }
        println!(
            "  {:>8.0}  {:>9.2}  {:>10.1}  {:>9.4}  {:>9.1}",
            s.time,
            to_degree(s.true_anom),
            s.radius(),
            s.speed(),
            s.pos.z
        );
    }

    println!();
    println!("  Samples: {}, dt=60 s", trajectory.len());
    println!("====================================================================");
    println!();

    // Optional output directory for the ephemeris and summary files
    if let Some(dir) = std::env::args().nth(1) {
        let dir = Path::new(&dir);
        let csv_path = dir.join("ephemeris.csv");
        let json_path = dir.join("summary.json");
        csv::write_ephemeris_file(&csv_path.to_string_lossy(), &trajectory)?;
        json::write_summary_file(&json_path.to_string_lossy(), "molniya", &molniya)?;
        info!(csv = %csv_path.display(), json = %json_path.display(), "output written");
    }

    Ok(())
}
