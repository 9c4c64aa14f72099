use std::f64::consts::{PI, TAU};

use tracing::warn;

use crate::angle::angle_between;
use crate::error::{ensure_finite, OrbitError, OrbitResult};

/// Newton-Raphson settings for Kepler's equation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    pub tolerance: f64,        // rad, stop once |ΔE| drops below this
    pub max_iterations: usize, // hard cap, the last estimate is returned
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

/// Anomaly found by the solver, with convergence diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    pub anomaly: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Solve `M = E - e*sin(E)` for the eccentric anomaly `E`.
///
/// `mean_anom` may be any real value; the returned `E` lies in the same
/// revolution.
pub fn solve_kepler_elliptic(mean_anom: f64, ecc: f64) -> OrbitResult<f64> {
    solve_elliptic_with(mean_anom, ecc, &SolverConfig::default()).map(|s| s.anomaly)
}

/// Solve `M = e*sinh(H) - H` for the hyperbolic anomaly `H`.
pub fn solve_kepler_hyperbolic(mean_anom: f64, ecc: f64) -> OrbitResult<f64> {
    solve_hyperbolic_with(mean_anom, ecc, &SolverConfig::default()).map(|s| s.anomaly)
}

pub fn solve_elliptic_with(
    mean_anom: f64,
    ecc: f64,
    config: &SolverConfig,
) -> OrbitResult<KeplerSolution> {
    ensure_finite(mean_anom, "mean anomaly")?;
    check_elliptic(ecc)?;

    // Near e = 1 Newton from E = M can bounce around the inflection point, so
    // start from the apoapsis of the revolution holding M instead. Between the
    // seed and the root f keeps one sign of curvature, so the iterates move
    // monotonically toward the root without overshoot.
    let seed = if ecc < 0.8 {
        mean_anom
    } else {
        (mean_anom / TAU).floor() * TAU + PI
    };

    let solution = newton(seed, config, |ea| {
        (ea - ecc * ea.sin() - mean_anom, 1.0 - ecc * ea.cos())
    });
    if !solution.converged {
        warn!(mean_anom, ecc, estimate = solution.anomaly, "elliptic Kepler solver hit iteration cap");
    }
    Ok(solution)
}

pub fn solve_hyperbolic_with(
    mean_anom: f64,
    ecc: f64,
    config: &SolverConfig,
) -> OrbitResult<KeplerSolution> {
    ensure_finite(mean_anom, "mean anomaly")?;
    check_hyperbolic(ecc)?;

    let seed = if mean_anom.abs() > 6.0 {
        mean_anom.signum() * (2.0 * mean_anom.abs() / ecc + 1.8).ln()
    } else {
        mean_anom
    };

    let solution = newton(seed, config, |ha| {
        (ecc * ha.sinh() - ha - mean_anom, ecc * ha.cosh() - 1.0)
    });
    if !solution.converged {
        warn!(mean_anom, ecc, estimate = solution.anomaly, "hyperbolic Kepler solver hit iteration cap");
    }
    Ok(solution)
}

/// Bounded Newton-Raphson loop. `f` returns (value, derivative).
fn newton(seed: f64, config: &SolverConfig, f: impl Fn(f64) -> (f64, f64)) -> KeplerSolution {
    let mut x = seed;
    for i in 1..=config.max_iterations {
        let (value, slope) = f(x);
        let delta = value / slope;
        x -= delta;
        if delta.abs() < config.tolerance {
            return KeplerSolution {
                anomaly: x,
                iterations: i,
                converged: true,
            };
        }
    }
    KeplerSolution {
        anomaly: x,
        iterations: config.max_iterations,
        converged: false,
    }
}

pub(crate) fn check_elliptic(ecc: f64) -> OrbitResult<()> {
    ensure_finite(ecc, "eccentricity")?;
    if ecc == 1.0 {
        Err(OrbitError::ParabolicOrbit)
    } else if (0.0..1.0).contains(&ecc) {
        Ok(())
    } else {
        Err(OrbitError::InvalidEccentricity { ecc, expected: "0 <= e < 1" })
    }
}

pub(crate) fn check_hyperbolic(ecc: f64) -> OrbitResult<()> {
    ensure_finite(ecc, "eccentricity")?;
    if ecc == 1.0 {
        Err(OrbitError::ParabolicOrbit)
    } else if ecc > 1.0 {
        Ok(())
    } else {
        Err(OrbitError::InvalidEccentricity { ecc, expected: "e > 1" })
    }
}

// ---------------------------------------------------------------------------
// Anomaly conversions
// ---------------------------------------------------------------------------

/// Split an unwrapped angle into whole revolutions and a remainder in [-π, π].
fn split_revolutions(angle: f64) -> (f64, f64) {
    let revs = (angle / TAU).round();
    (revs * TAU, angle - revs * TAU)
}

/// True anomaly from eccentric anomaly, keeping the revolution count of `ea`.
pub fn eccentric_to_true(ea: f64, ecc: f64) -> f64 {
    // tan(v/2) = sqrt((1+e)/(1-e)) * tan(E/2)
    let (offset, rem) = split_revolutions(ea);
    let half = ((1.0 + ecc).sqrt() * (rem / 2.0).sin()).atan2((1.0 - ecc).sqrt() * (rem / 2.0).cos());
    offset + 2.0 * half
}

/// Eccentric anomaly from true anomaly, keeping the revolution count of `true_anom`.
pub fn true_to_eccentric(true_anom: f64, ecc: f64) -> f64 {
    let (offset, rem) = split_revolutions(true_anom);
    let half = ((1.0 - ecc).sqrt() * (rem / 2.0).sin()).atan2((1.0 + ecc).sqrt() * (rem / 2.0).cos());
    offset + 2.0 * half
}

pub fn eccentric_to_mean(ea: f64, ecc: f64) -> f64 {
    ea - ecc * ea.sin()
}

/// True anomaly from hyperbolic anomaly, in (-v∞, v∞).
pub fn hyperbolic_to_true(ha: f64, ecc: f64) -> f64 {
    2.0 * (((ecc + 1.0) / (ecc - 1.0)).sqrt() * (ha / 2.0).tanh()).atan()
}

/// Hyperbolic anomaly from true anomaly. Fails past the asymptote.
pub fn true_to_hyperbolic(true_anom: f64, ecc: f64) -> OrbitResult<f64> {
    let v = angle_between(0.0, true_anom);
    let limit = asymptote_angle(ecc);
    if v.abs() >= limit {
        return Err(OrbitError::BeyondAsymptote { true_anom, limit });
    }
    Ok(2.0 * (((ecc - 1.0) / (ecc + 1.0)).sqrt() * (v / 2.0).tan()).atanh())
}

pub fn hyperbolic_to_mean(ha: f64, ecc: f64) -> f64 {
    ecc * ha.sinh() - ha
}

/// True anomaly of the asymptotes of a hyperbola, `acos(-1/e)`.
pub fn asymptote_angle(ecc: f64) -> f64 {
    (-1.0 / ecc).acos()
}
