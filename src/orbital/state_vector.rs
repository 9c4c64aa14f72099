use nalgebra::{Rotation3, Vector3};
use tracing::debug;

use super::elements::{OrbitElements, OrbitKind};
use super::kepler::{asymptote_angle, eccentric_to_mean, hyperbolic_to_mean, true_to_eccentric, true_to_hyperbolic};
use crate::angle::{angle_between, normalize_angle};
use crate::error::{ensure_finite, ensure_gm, OrbitError, OrbitResult};

/// Below this the eccentricity vector (or the node vector, relative to |h|)
/// is treated as zero and the matching angle is fixed to 0.
const DEGENERATE_TOL: f64 = 1e-10;

/// Eccentricities this close to 1 are rejected as parabolic.
const PARABOLIC_TOL: f64 = 1e-10;

/// Position and velocity in the inertial frame of the primary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub pos: Vector3<f64>,
    pub vel: Vector3<f64>,
}

/// Rotation from the perifocal frame (x to periapsis, z along the orbit
/// normal) into the inertial frame: `Rz(Ω) Rx(i) Rz(w)`.
pub fn perifocal_to_inertial(inc: f64, lan: f64, argp: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), lan)
        * Rotation3::from_axis_angle(&Vector3::x_axis(), inc)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), argp)
}

/// Convert elements to a state vector at their current true anomaly.
pub fn to_state_vector(elements: &OrbitElements) -> OrbitResult<StateVector> {
    to_state_vector_at(elements, elements.true_anom())
}

/// Convert elements to a state vector at the given true anomaly.
pub fn to_state_vector_at(elements: &OrbitElements, true_anom: f64) -> OrbitResult<StateVector> {
    let kind = elements.validate()?;
    ensure_finite(true_anom, "true anomaly")?;
    let ecc = elements.ecc;

    if kind == OrbitKind::Hyperbolic {
        let limit = asymptote_angle(ecc);
        if angle_between(0.0, true_anom).abs() >= limit {
            return Err(OrbitError::BeyondAsymptote { true_anom, limit });
        }
    }

    let p = elements.semi_latus_rectum(); // positive for both branches
    let (sin_v, cos_v) = true_anom.sin_cos();
    let r = p / (1.0 + ecc * cos_v);

    // Perifocal frame
    let r_pqw = Vector3::new(r * cos_v, r * sin_v, 0.0);
    let sqrt_mu_p = (elements.gm / p).sqrt();
    let v_pqw = Vector3::new(-sqrt_mu_p * sin_v, sqrt_mu_p * (ecc + cos_v), 0.0);

    let rot = perifocal_to_inertial(elements.inc, elements.lan, elements.argp);
    Ok(StateVector {
        pos: rot * r_pqw,
        vel: rot * v_pqw,
    })
}

/// Angle from `from` to `to` about `normal`, in (-π, π].
fn angle_in_plane(from: &Vector3<f64>, to: &Vector3<f64>, normal: &Vector3<f64>) -> f64 {
    normal.dot(&from.cross(to)).atan2(from.dot(to))
}

/// Determine the orbit that passes through `pos` with velocity `vel` at `epoch`.
///
/// Circular orbits get `argp = 0` with the true anomaly measured from the
/// ascending node; equatorial orbits get `lan = 0` with the node line taken
/// along the inertial x axis.
pub fn from_state_vector(
    pos: &Vector3<f64>,
    vel: &Vector3<f64>,
    gm: f64,
    epoch: f64,
) -> OrbitResult<OrbitElements> {
    ensure_gm(gm)?;
    ensure_finite(epoch, "epoch")?;
    if !pos.iter().chain(vel.iter()).all(|c| c.is_finite()) {
        return Err(OrbitError::NonFinite("state vector"));
    }

    let r = pos.norm();
    if r == 0.0 {
        return Err(OrbitError::DegenerateState("position at the centre of the primary"));
    }
    let v = vel.norm();

    // Angular momentum
    let h = pos.cross(vel);
    let h_mag = h.norm();
    if h_mag <= DEGENERATE_TOL * r * v || h_mag == 0.0 {
        return Err(OrbitError::DegenerateState("radial trajectory has no orbital plane"));
    }
    let h_hat = h / h_mag;

    // Eccentricity vector
    let e_vec = vel.cross(&h) / gm - pos / r;
    let ecc = e_vec.norm();

    // Semi-major axis from vis-viva
    let inv_sma = 2.0 / r - v * v / gm;
    if (ecc - 1.0).abs() < PARABOLIC_TOL || inv_sma == 0.0 {
        return Err(OrbitError::ParabolicOrbit);
    }
    let sma = 1.0 / inv_sma;

    // Node vector z × h; |n| = |h| sin(i)
    let node = Vector3::new(-h.y, h.x, 0.0);
    let node_mag = node.norm();
    // acos(h_z / |h|), in a form that keeps precision near 0 and π
    let inc = node_mag.atan2(h.z);
    let equatorial = node_mag < DEGENERATE_TOL * h_mag;
    let (lan, node_dir) = if equatorial {
        debug!(inc, "equatorial orbit, fixing ascending node to the x axis");
        (0.0, Vector3::x())
    } else {
        (normalize_angle(node.y.atan2(node.x)), node / node_mag)
    };

    let circular = ecc < DEGENERATE_TOL;
    let (argp, periapsis_dir) = if circular {
        debug!(ecc, "circular orbit, fixing periapsis to the ascending node");
        (0.0, node_dir)
    } else {
        let e_hat = e_vec / ecc;
        (normalize_angle(angle_in_plane(&node_dir, &e_hat, &h_hat)), e_hat)
    };

    // In (-π, π]; the sign follows r·v
    let true_anom = angle_in_plane(&periapsis_dir, &(pos / r), &h_hat);

    let (true_anom, m0) = if ecc < 1.0 {
        let nu = normalize_angle(true_anom);
        (nu, eccentric_to_mean(true_to_eccentric(nu, ecc), ecc))
    } else {
        (true_anom, hyperbolic_to_mean(true_to_hyperbolic(true_anom, ecc)?, ecc))
    };
    debug!(sma, ecc, inc, lan, argp, true_anom, "orbit determined from state vector");

    OrbitElements::new(sma, ecc, gm)?
        .with_orientation(inc, lan, argp)?
        .with_mean_anomaly(m0, epoch)
}
