use std::io::{self, Write};

use crate::orbital::propagator::OrbitalState;

/// Write an ephemeris to CSV format.
///
/// Columns: time, true_anom_deg, pos_x, pos_y, pos_z, vel_x, vel_y, vel_z
/// (s, deg, km, km/s)
pub fn write_ephemeris<W: Write>(writer: &mut W, trajectory: &[OrbitalState]) -> io::Result<()> {
    writeln!(writer, "time,true_anom_deg,pos_x,pos_y,pos_z,vel_x,vel_y,vel_z")?;

    for s in trajectory {
        writeln!(
            writer,
            "{:.3},{:.6},{:.4},{:.4},{:.4},{:.7},{:.7},{:.7}",
            s.time,
            s.true_anom.to_degrees(),
            s.pos.x, s.pos.y, s.pos.z,
            s.vel.x, s.vel.y, s.vel.z,
        )?;
    }

    Ok(())
}

/// Write an ephemeris to a CSV file at the given path.
pub fn write_ephemeris_file(path: &str, trajectory: &[OrbitalState]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_ephemeris(&mut file, trajectory)
}
