use nalgebra::Vector3;

use super::elements::{mean_motion_of, AnomalyState, OrbitElements, OrbitKind};
use super::kepler::{
    eccentric_to_true, hyperbolic_to_true, solve_elliptic_with, solve_hyperbolic_with, SolverConfig,
};
use super::state_vector::to_state_vector_at;
use crate::error::{ensure_finite, OrbitError, OrbitResult};

/// Upper bound on the number of states one `propagate_orbit` call returns.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Position and velocity of an orbiting body at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalState {
    pub time: f64,          // s
    pub true_anom: f64,     // rad, unwrapped
    pub pos: Vector3<f64>,  // inertial frame of the primary
    pub vel: Vector3<f64>,
}

impl OrbitalState {
    pub fn radius(&self) -> f64 {
        self.pos.norm()
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    /// Rate of change of the radius, positive while climbing to apoapsis.
    pub fn radial_velocity(&self) -> f64 {
        self.pos.dot(&self.vel) / self.pos.norm()
    }
}

/// Anomalies of `elements` at absolute time `time` (s).
///
/// `M(t) = M0 + n (t - epoch)` is left unwrapped. Pure: the same inputs always
/// give the same output, and `elements` is not touched.
pub fn propagate(elements: &OrbitElements, time: f64) -> OrbitResult<AnomalyState> {
    propagate_with(elements, time, &SolverConfig::default())
}

pub fn propagate_with(
    elements: &OrbitElements,
    time: f64,
    config: &SolverConfig,
) -> OrbitResult<AnomalyState> {
    ensure_finite(time, "time")?;
    let kind = elements.validate()?;
    let n = mean_motion_of(elements.sma, elements.gm);
    let mean_anom = elements.m0 + n * (time - elements.epoch);

    let (ecc_anom, true_anom) = match kind {
        OrbitKind::Elliptic => {
            let ea = solve_elliptic_with(mean_anom, elements.ecc, config)?.anomaly;
            (ea, eccentric_to_true(ea, elements.ecc))
        }
        OrbitKind::Hyperbolic => {
            let ha = solve_hyperbolic_with(mean_anom, elements.ecc, config)?.anomaly;
            (ha, hyperbolic_to_true(ha, elements.ecc))
        }
    };

    Ok(AnomalyState {
        time,
        mean_anom,
        ecc_anom,
        true_anom,
    })
}

/// Advance the derived anomaly state of `elements` to `time`.
pub fn update_orbit(elements: &mut OrbitElements, time: f64) -> OrbitResult<()> {
    let anomaly = propagate(elements, time)?;
    elements.set_anomaly(anomaly);
    Ok(())
}

/// Cartesian state of `elements` at `time`.
pub fn state_at(elements: &OrbitElements, time: f64) -> OrbitResult<OrbitalState> {
    let anomaly = propagate(elements, time)?;
    let sv = to_state_vector_at(elements, anomaly.true_anom)?;
    Ok(OrbitalState {
        time,
        true_anom: anomaly.true_anom,
        pos: sv.pos,
        vel: sv.vel,
    })
}

/// Sample an orbit every `dt` seconds for `duration` seconds from `start`.
///
/// Analytic, so the samples carry no integration error. Fails with
/// `TooManySamples` when `duration / dt` would exceed [`MAX_SAMPLES`].
pub fn propagate_orbit(
    elements: &OrbitElements,
    start: f64,
    dt: f64,
    duration: f64,
) -> OrbitResult<Vec<OrbitalState>> {
    ensure_finite(dt, "time step")?;
    ensure_finite(duration, "duration")?;
    if dt <= 0.0 || duration < 0.0 {
        return Ok(vec![state_at(elements, start)?]);
    }

    let steps = (duration / dt).floor();
    if steps >= MAX_SAMPLES as f64 {
        return Err(OrbitError::TooManySamples { requested: steps + 1.0, limit: MAX_SAMPLES });
    }
    let n_steps = steps as usize;
    let mut trajectory = Vec::with_capacity(n_steps + 1);
    for i in 0..=n_steps {
        trajectory.push(state_at(elements, start + i as f64 * dt)?);
    }
    Ok(trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::gravity::{EARTH_MU, SUN_MU};
    use approx::assert_relative_eq;
    use std::f64::consts::{PI, TAU};

    fn eccentric_orbit() -> OrbitElements {
        OrbitElements::new(26_600.0, 0.74, EARTH_MU)
            .unwrap()
            .with_orientation(63.4_f64.to_radians(), 0.5, 270_f64.to_radians())
            .unwrap()
            .with_mean_anomaly(0.3, 1_000.0)
            .unwrap()
    }

    #[test]
    fn at_epoch_matches_m0() {
        let orbit = eccentric_orbit();
        let state = propagate(&orbit, 1_000.0).unwrap();
        assert_eq!(state.mean_anom, 0.3);
        let residual = state.ecc_anom - orbit.ecc * state.ecc_anom.sin() - 0.3;
        assert!(residual.abs() < 1e-9);
    }

    #[test]
    fn mean_anomaly_is_unwrapped() {
        let orbit = eccentric_orbit();
        let period = orbit.period().unwrap();
        let later = propagate(&orbit, 1_000.0 + 5.0 * period).unwrap();
        assert_relative_eq!(later.mean_anom, 0.3 + 5.0 * TAU, epsilon = 1e-9);
        assert!(later.true_anom > 5.0 * TAU);

        let earlier = propagate(&orbit, 1_000.0 - 2.0 * period).unwrap();
        assert!(earlier.mean_anom < -2.0 * TAU + 0.31);
    }

    #[test]
    fn propagation_is_pure() {
        let orbit = eccentric_orbit();
        let a = propagate(&orbit, 12_345.0).unwrap();
        let b = propagate(&orbit, 12_345.0).unwrap();
        assert_eq!(a, b);
        // the caller's elements are untouched
        assert_eq!(orbit.anomaly().time, 1_000.0);
    }

    #[test]
    fn update_stores_anomaly() {
        let mut orbit = eccentric_orbit();
        update_orbit(&mut orbit, 5_000.0).unwrap();
        assert_eq!(orbit.anomaly().time, 5_000.0);
        assert_eq!(*orbit.anomaly(), propagate(&orbit, 5_000.0).unwrap());
        // recompute keeps the update time
        orbit.recompute().unwrap();
        assert_eq!(orbit.anomaly().time, 5_000.0);
    }

    #[test]
    fn full_period_returns_to_start() {
        let orbit = eccentric_orbit();
        let period = orbit.period().unwrap();
        let s0 = state_at(&orbit, 1_000.0).unwrap();
        let s1 = state_at(&orbit, 1_000.0 + period).unwrap();
        let err = (s1.pos - s0.pos).norm() / s0.radius();
        assert!(err < 1e-9, "relative position error after one period: {err:e}");
    }

    #[test]
    fn half_period_reaches_apoapsis() {
        let orbit = OrbitElements::new(10_000.0, 0.5, EARTH_MU).unwrap();
        let half = orbit.period().unwrap() / 2.0;
        let state = propagate(&orbit, half).unwrap();
        assert_relative_eq!(state.true_anom, PI, epsilon = 1e-9);
        let s = state_at(&orbit, half).unwrap();
        assert_relative_eq!(s.radius(), 15_000.0, max_relative = 1e-9);
    }

    #[test]
    fn hyperbolic_flyby_is_symmetric() {
        let orbit = OrbitElements::new(-30_000.0, 1.4, EARTH_MU).unwrap();
        let before = propagate(&orbit, -3_600.0).unwrap();
        let after = propagate(&orbit, 3_600.0).unwrap();
        assert_relative_eq!(before.true_anom, -after.true_anom, epsilon = 1e-9);
        let s = state_at(&orbit, 3_600.0).unwrap();
        assert!(s.radial_velocity() > 0.0, "receding after periapsis");
    }

    #[test]
    fn angular_momentum_conserved_along_samples() {
        let orbit = eccentric_orbit();
        let traj = propagate_orbit(&orbit, 0.0, 600.0, orbit.period().unwrap()).unwrap();
        let h0 = traj[0].pos.cross(&traj[0].vel);
        for s in &traj {
            let h = s.pos.cross(&s.vel);
            assert!((h - h0).norm() / h0.norm() < 1e-9);
            let energy = s.speed().powi(2) / 2.0 - EARTH_MU / s.radius();
            assert_relative_eq!(energy, orbit.specific_energy(), max_relative = 1e-9);
        }
    }

    #[test]
    fn velocity_change_matches_gravity() {
        let orbit = eccentric_orbit();
        let dt = 0.01;
        let s0 = state_at(&orbit, 2_000.0 - dt).unwrap();
        let s1 = state_at(&orbit, 2_000.0 + dt).unwrap();
        let mid = state_at(&orbit, 2_000.0).unwrap();
        let accel = (s1.vel - s0.vel) / (2.0 * dt);
        let r = mid.radius();
        let expected = -EARTH_MU / (r * r * r) * mid.pos;
        assert!((accel - expected).norm() / expected.norm() < 1e-4);
    }

    #[test]
    fn sample_count() {
        let orbit = OrbitElements::new(149_598_023.0, 0.0167, SUN_MU).unwrap();
        let traj = propagate_orbit(&orbit, 0.0, 86_400.0, 10.0 * 86_400.0).unwrap();
        assert_eq!(traj.len(), 11);
        assert_eq!(traj[10].time, 10.0 * 86_400.0);
        assert_eq!(propagate_orbit(&orbit, 0.0, 0.0, 100.0).unwrap().len(), 1);
    }

    #[test]
    fn tiny_step_rejected() {
        let orbit = eccentric_orbit();
        assert!(matches!(
            propagate_orbit(&orbit, 0.0, 1e-300, 1e10),
            Err(OrbitError::TooManySamples { limit: MAX_SAMPLES, .. })
        ));
        assert_eq!(propagate_orbit(&orbit, 0.0, 1.0, 9.5).unwrap().len(), 10);
    }

    #[test]
    fn invalid_time_rejected() {
        let orbit = eccentric_orbit();
        assert!(propagate(&orbit, f64::NAN).is_err());
    }
}
