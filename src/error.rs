//! Error types for orbit construction and conversion

use thiserror::Error;

/// Result type for orbital operations
pub type OrbitResult<T> = Result<T, OrbitError>;

/// Invalid-parameter conditions reported at the boundary of public operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitError {
    #[error("Invalid eccentricity {ecc}, expected {expected}")]
    InvalidEccentricity { ecc: f64, expected: &'static str },

    #[error("Parabolic orbits (e = 1) are not supported")]
    ParabolicOrbit,

    #[error("Semi-major axis {sma} is inconsistent with eccentricity {ecc}")]
    InvalidSemiMajorAxis { sma: f64, ecc: f64 },

    #[error("Gravitational parameter must be positive, got {0}")]
    InvalidGravitationalParameter(f64),

    #[error("Non-finite value for {0}")]
    NonFinite(&'static str),

    #[error("Degenerate state vector: {0}")]
    DegenerateState(&'static str),

    #[error("True anomaly {true_anom} rad lies beyond the hyperbolic asymptote ({limit} rad)")]
    BeyondAsymptote { true_anom: f64, limit: f64 },

    #[error("Orbits do not share a primary: GM {0} vs {1}")]
    MismatchedPrimary(f64, f64),

    #[error("Orbit radius must be positive, got {0}")]
    InvalidRadius(f64),

    #[error("Sampling would produce {requested:e} states, limit is {limit}")]
    TooManySamples { requested: f64, limit: usize },
}

/// Reject NaN/Inf inputs before they reach the math.
pub(crate) fn ensure_finite(value: f64, what: &'static str) -> OrbitResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OrbitError::NonFinite(what))
    }
}

/// Radii must be strictly positive and finite.
pub(crate) fn ensure_radius(r: f64) -> OrbitResult<f64> {
    if r.is_finite() && r > 0.0 {
        Ok(r)
    } else {
        Err(OrbitError::InvalidRadius(r))
    }
}

/// `GM` must be strictly positive and finite.
pub(crate) fn ensure_gm(gm: f64) -> OrbitResult<f64> {
    if gm.is_finite() && gm > 0.0 {
        Ok(gm)
    } else {
        Err(OrbitError::InvalidGravitationalParameter(gm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_check() {
        assert_eq!(ensure_finite(1.0, "x"), Ok(1.0));
        assert_eq!(ensure_finite(f64::NAN, "x"), Err(OrbitError::NonFinite("x")));
        assert!(ensure_finite(f64::INFINITY, "x").is_err());
    }

    #[test]
    fn gm_must_be_positive() {
        assert!(ensure_gm(3.986e5).is_ok());
        assert_eq!(ensure_gm(0.0), Err(OrbitError::InvalidGravitationalParameter(0.0)));
        assert!(ensure_gm(-1.0).is_err());
        assert!(ensure_gm(f64::NAN).is_err());
    }

    #[test]
    fn radius_must_be_positive() {
        assert_eq!(ensure_radius(7_000.0), Ok(7_000.0));
        assert_eq!(ensure_radius(-1.0), Err(OrbitError::InvalidRadius(-1.0)));
        assert!(ensure_radius(0.0).is_err());
        assert!(ensure_radius(f64::INFINITY).is_err());
    }

    #[test]
    fn messages_name_the_problem() {
        let err = OrbitError::InvalidEccentricity { ecc: 1.5, expected: "0 <= e < 1" };
        assert_eq!(err.to_string(), "Invalid eccentricity 1.5, expected 0 <= e < 1");
        assert!(OrbitError::ParabolicOrbit.to_string().contains("Parabolic"));
    }
}
