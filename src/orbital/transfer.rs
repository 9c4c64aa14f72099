use std::f64::consts::PI;

use super::elements::OrbitElements;
use super::state_vector::to_state_vector;
use crate::error::{ensure_gm, ensure_radius, OrbitError, OrbitResult};

/// Result of a Hohmann transfer calculation.
#[derive(Debug, Clone, Copy)]
pub struct HohmannTransfer {
    pub dv1: f64,           // first burn (raise/lower the far apsis)
    pub dv2: f64,           // second burn (circularize)
    pub total_dv: f64,
    pub transfer_time: f64, // s, half the transfer orbit period
    pub r1: f64,            // initial orbit radius
    pub r2: f64,            // final orbit radius
}

/// Compute a Hohmann transfer between two circular orbits of radius `r1`
/// and `r2` around a primary of `gm`.
pub fn hohmann(r1: f64, r2: f64, gm: f64) -> OrbitResult<HohmannTransfer> {
    let v_circ1 = circular_velocity(r1, gm)?;
    let v_circ2 = circular_velocity(r2, gm)?;
    let a_transfer = (r1 + r2) / 2.0;

    let v_transfer_1 = (gm * (2.0 / r1 - 1.0 / a_transfer)).sqrt();
    let v_transfer_2 = (gm * (2.0 / r2 - 1.0 / a_transfer)).sqrt();

    let dv1 = (v_transfer_1 - v_circ1).abs();
    let dv2 = (v_circ2 - v_transfer_2).abs();

    Ok(HohmannTransfer {
        dv1,
        dv2,
        total_dv: dv1 + dv2,
        transfer_time: PI * (a_transfer.powi(3) / gm).sqrt(),
        r1,
        r2,
    })
}

/// Circular orbit velocity at radius `r`.
pub fn circular_velocity(r: f64, gm: f64) -> OrbitResult<f64> {
    let r = ensure_radius(r)?;
    let gm = ensure_gm(gm)?;
    Ok((gm / r).sqrt())
}

/// How far the target must lead the departing body at the first burn so
/// both arrive at the far apsis together, rad.
pub fn hohmann_phase_angle(r1: f64, r2: f64) -> f64 {
    PI * (1.0 - ((r1 + r2) / (2.0 * r2)).powf(1.5))
}

fn check_same_primary(from: &OrbitElements, to: &OrbitElements) -> OrbitResult<f64> {
    from.validate()?;
    to.validate()?;
    let gm = from.gm;
    if (from.gm - to.gm).abs() > 1e-9 * from.gm.max(to.gm) {
        return Err(OrbitError::MismatchedPrimary(from.gm, to.gm));
    }
    Ok(gm)
}

/// Signed angle from the current position of `from` to the current position
/// of `to`, both projected onto the orbit plane of `from`.
///
/// Positive along the direction of motion of `from`, in (-π, π].
pub fn transfer_angle(from: &OrbitElements, to: &OrbitElements) -> OrbitResult<f64> {
    check_same_primary(from, to)?;
    let a = to_state_vector(from)?;
    let b = to_state_vector(to)?;

    let normal = a.pos.cross(&a.vel).normalize();
    let pa = a.pos - normal * normal.dot(&a.pos);
    let pb = b.pos - normal * normal.dot(&b.pos);
    if pb.norm() <= 1e-12 * b.pos.norm() {
        return Err(OrbitError::DegenerateState("target lies on the departure orbit normal"));
    }
    Ok(normal.dot(&pa.cross(&pb)).atan2(pa.dot(&pb)))
}

/// Half-ellipse transfer time between the current radii of two orbits, s.
///
/// A planning estimate: the transfer ellipse spans the two current radii,
/// ignoring phasing, plane change and the real shape of either orbit.
pub fn transfer_time(from: &OrbitElements, to: &OrbitElements) -> OrbitResult<f64> {
    let gm = check_same_primary(from, to)?;
    Ok(hohmann(from.current_radius(), to.current_radius(), gm)?.transfer_time)
}
