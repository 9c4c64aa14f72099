use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use super::kepler::{
    eccentric_to_mean, hyperbolic_to_mean, true_to_eccentric, true_to_hyperbolic, SolverConfig,
};
use super::propagator::propagate_with;
use crate::error::{ensure_finite, ensure_gm, OrbitError, OrbitResult};
use crate::physics::gravity::vis_viva_speed;

/// Opaque id of the body an orbit is referenced to. Never dereferenced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitKind {
    Elliptic,
    Hyperbolic,
}

/// Anomalies of an orbit at one instant.
///
/// `ecc_anom` holds the eccentric anomaly for elliptic orbits and the
/// hyperbolic anomaly for hyperbolic ones. All angles are unwrapped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnomalyState {
    pub time: f64,      // s
    pub mean_anom: f64, // rad
    pub ecc_anom: f64,  // rad
    pub true_anom: f64, // rad
}

/// Classical Keplerian orbital elements.
///
/// The public fields are the primary elements. Mean motion, period and the
/// current anomalies are derived and only valid after [`recompute`]; any
/// change to a primary field needs another `recompute` before they are read.
///
/// [`recompute`]: OrbitElements::recompute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitElements {
    pub sma: f64,   // semi-major axis, negative for hyperbolic orbits
    pub ecc: f64,   // eccentricity
    pub inc: f64,   // inclination, rad
    pub lan: f64,   // longitude of ascending node, rad
    pub argp: f64,  // argument of periapsis, rad
    pub m0: f64,    // mean anomaly at epoch, rad
    pub epoch: f64, // s
    pub gm: f64,    // gravitational parameter of the primary
    #[serde(default)]
    pub reference_body: Option<BodyId>,

    #[serde(skip)]
    mean_motion: f64,
    #[serde(skip)]
    period: Option<f64>,
    #[serde(skip)]
    anomaly: AnomalyState,
}

pub(crate) fn mean_motion_of(sma: f64, gm: f64) -> f64 {
    (gm / sma.abs().powi(3)).sqrt()
}

impl OrbitElements {
    /// Orbit with the given shape around a primary of `gm`, zero orientation
    /// angles, and periapsis passage at epoch 0.
    pub fn new(sma: f64, ecc: f64, gm: f64) -> OrbitResult<Self> {
        let mut elements = OrbitElements {
            sma,
            ecc,
            inc: 0.0,
            lan: 0.0,
            argp: 0.0,
            m0: 0.0,
            epoch: 0.0,
            gm,
            reference_body: None,
            mean_motion: 0.0,
            period: None,
            anomaly: AnomalyState::default(),
        };
        elements.recompute()?;
        Ok(elements)
    }

    /// Circular orbit of the given radius and inclination.
    pub fn circular(radius: f64, inc: f64, gm: f64) -> OrbitResult<Self> {
        Self::new(radius, 0.0, gm)?.with_orientation(inc, 0.0, 0.0)
    }

    pub fn with_orientation(mut self, inc: f64, lan: f64, argp: f64) -> OrbitResult<Self> {
        self.inc = inc;
        self.lan = lan;
        self.argp = argp;
        self.recompute()?;
        Ok(self)
    }

    /// Set the mean anomaly `m0` held at `epoch`, and move the derived
    /// anomaly state to the epoch.
    pub fn with_mean_anomaly(mut self, m0: f64, epoch: f64) -> OrbitResult<Self> {
        self.m0 = m0;
        self.epoch = ensure_finite(epoch, "epoch")?;
        self.anomaly.time = epoch;
        self.recompute()?;
        Ok(self)
    }

    /// Place the body at true anomaly `true_anom` at the current epoch.
    ///
    /// The true anomaly is converted to the matching mean anomaly; `m0` is
    /// never assigned a true anomaly directly.
    pub fn with_true_anomaly(mut self, true_anom: f64) -> OrbitResult<Self> {
        ensure_finite(true_anom, "true anomaly")?;
        self.m0 = match self.validate()? {
            OrbitKind::Elliptic => eccentric_to_mean(true_to_eccentric(true_anom, self.ecc), self.ecc),
            OrbitKind::Hyperbolic => {
                hyperbolic_to_mean(true_to_hyperbolic(true_anom, self.ecc)?, self.ecc)
            }
        };
        self.anomaly.time = self.epoch;
        self.recompute()?;
        Ok(self)
    }

    pub fn with_reference_body(mut self, body: BodyId) -> Self {
        self.reference_body = Some(body);
        self
    }

    /// Check the primary elements for consistency.
    pub fn validate(&self) -> OrbitResult<OrbitKind> {
        ensure_gm(self.gm)?;
        ensure_finite(self.sma, "semi-major axis")?;
        ensure_finite(self.ecc, "eccentricity")?;
        ensure_finite(self.inc, "inclination")?;
        ensure_finite(self.lan, "longitude of ascending node")?;
        ensure_finite(self.argp, "argument of periapsis")?;
        ensure_finite(self.m0, "mean anomaly at epoch")?;
        ensure_finite(self.epoch, "epoch")?;

        if self.ecc < 0.0 {
            return Err(OrbitError::InvalidEccentricity { ecc: self.ecc, expected: "e >= 0" });
        }
        if self.ecc == 1.0 {
            return Err(OrbitError::ParabolicOrbit);
        }
        let kind = if self.ecc < 1.0 { OrbitKind::Elliptic } else { OrbitKind::Hyperbolic };
        let sma_ok = match kind {
            OrbitKind::Elliptic => self.sma > 0.0,
            OrbitKind::Hyperbolic => self.sma < 0.0,
        };
        if !sma_ok {
            return Err(OrbitError::InvalidSemiMajorAxis { sma: self.sma, ecc: self.ecc });
        }
        Ok(kind)
    }

    /// Rebuild the derived fields from the primary ones, keeping the time of
    /// the last anomaly update.
    pub fn recompute(&mut self) -> OrbitResult<()> {
        self.recompute_with(&SolverConfig::default())
    }

    pub fn recompute_with(&mut self, config: &SolverConfig) -> OrbitResult<()> {
        let kind = self.validate()?;
        let n = mean_motion_of(self.sma, self.gm);
        let anomaly = propagate_with(self, self.anomaly.time, config)?;
        self.mean_motion = n;
        self.period = match kind {
            OrbitKind::Elliptic => Some(TAU / n),
            OrbitKind::Hyperbolic => None,
        };
        self.anomaly = anomaly;
        Ok(())
    }

    pub(crate) fn set_anomaly(&mut self, anomaly: AnomalyState) {
        self.anomaly = anomaly;
    }

    pub fn kind(&self) -> OrbitKind {
        if self.ecc < 1.0 { OrbitKind::Elliptic } else { OrbitKind::Hyperbolic }
    }

    /// Mean motion, rad/s.
    pub fn mean_motion(&self) -> f64 {
        self.mean_motion
    }

    /// Orbital period, `None` for hyperbolic orbits.
    pub fn period(&self) -> Option<f64> {
        self.period
    }

    pub fn anomaly(&self) -> &AnomalyState {
        &self.anomaly
    }

    pub fn true_anom(&self) -> f64 {
        self.anomaly.true_anom
    }

    pub fn semi_latus_rectum(&self) -> f64 {
        self.sma * (1.0 - self.ecc * self.ecc)
    }

    pub fn periapsis(&self) -> f64 {
        self.sma * (1.0 - self.ecc)
    }

    /// Apoapsis radius, `None` for hyperbolic orbits.
    pub fn apoapsis(&self) -> Option<f64> {
        match self.kind() {
            OrbitKind::Elliptic => Some(self.sma * (1.0 + self.ecc)),
            OrbitKind::Hyperbolic => None,
        }
    }

    /// Specific orbital energy.
    pub fn specific_energy(&self) -> f64 {
        -self.gm / (2.0 * self.sma)
    }

    /// Magnitude of the specific angular momentum.
    pub fn angular_momentum(&self) -> f64 {
        (self.gm * self.semi_latus_rectum()).sqrt()
    }

    /// Distance from the primary at true anomaly `true_anom`.
    pub fn orbiting_radius(&self, true_anom: f64) -> f64 {
        self.semi_latus_rectum() / (1.0 + self.ecc * true_anom.cos())
    }

    /// Distance from the primary at the current anomaly.
    pub fn current_radius(&self) -> f64 {
        self.orbiting_radius(self.anomaly.true_anom)
    }

    /// Speed at true anomaly `true_anom`, from vis-viva.
    pub fn speed_at(&self, true_anom: f64) -> f64 {
        vis_viva_speed(self.orbiting_radius(true_anom), self.sma, self.gm)
    }

    /// Circumference over period, an approximation for eccentric orbits.
    pub fn avg_orbital_velocity(&self) -> Option<f64> {
        self.period.map(|t| 2.0 * PI * self.sma / t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::gravity::{EARTH_MU, SUN_MU};
    use approx::assert_relative_eq;

    #[test]
    fn earth_year() {
        let earth = OrbitElements::new(149_598_023.0, 0.0167, SUN_MU).unwrap();
        let days = earth.period().unwrap() / 86_400.0;
        assert!((days - 365.256).abs() < 0.05, "Earth year should be ~365.26 days, got {days:.3}");
    }

    #[test]
    fn leo_period() {
        let orbit = OrbitElements::circular(6_778.0, 51.6_f64.to_radians(), EARTH_MU).unwrap();
        let period = orbit.period().unwrap();
        // ISS period ~92 min
        assert!(period > 5400.0 && period < 5700.0, "LEO period should be ~92 min, got {period:.0} s");
        assert_relative_eq!(orbit.mean_motion(), TAU / period, max_relative = 1e-12);
    }

    #[test]
    fn hyperbolic_has_no_period() {
        let orbit = OrbitElements::new(-20_000.0, 1.3, EARTH_MU).unwrap();
        assert_eq!(orbit.kind(), OrbitKind::Hyperbolic);
        assert!(orbit.period().is_none());
        assert!(orbit.apoapsis().is_none());
        assert!(orbit.specific_energy() > 0.0);
        assert_relative_eq!(orbit.periapsis(), 6_000.0, epsilon = 1e-9);
    }

    #[test]
    fn invalid_elements_rejected() {
        assert_eq!(OrbitElements::new(7000.0, 1.0, EARTH_MU), Err(OrbitError::ParabolicOrbit));
        assert!(matches!(
            OrbitElements::new(-7000.0, 0.5, EARTH_MU),
            Err(OrbitError::InvalidSemiMajorAxis { .. })
        ));
        assert!(matches!(
            OrbitElements::new(7000.0, 1.5, EARTH_MU),
            Err(OrbitError::InvalidSemiMajorAxis { .. })
        ));
        assert!(matches!(
            OrbitElements::new(7000.0, -0.1, EARTH_MU),
            Err(OrbitError::InvalidEccentricity { .. })
        ));
        assert_eq!(
            OrbitElements::new(7000.0, 0.1, 0.0),
            Err(OrbitError::InvalidGravitationalParameter(0.0))
        );
        assert!(OrbitElements::new(f64::NAN, 0.1, EARTH_MU).is_err());
    }

    #[test]
    fn mutation_requires_recompute() {
        let mut orbit = OrbitElements::new(7000.0, 0.1, EARTH_MU).unwrap();
        let before = orbit.period().unwrap();
        orbit.sma = 14_000.0;
        assert_eq!(orbit.period().unwrap(), before);
        orbit.recompute().unwrap();
        assert_relative_eq!(orbit.period().unwrap(), before * 8f64.sqrt(), max_relative = 1e-12);

        orbit.ecc = 1.0;
        assert_eq!(orbit.recompute(), Err(OrbitError::ParabolicOrbit));
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut orbit = OrbitElements::new(57.91e7, 0.9, SUN_MU)
            .unwrap()
            .with_orientation(3.14, 0.29, 0.68)
            .unwrap()
            .with_mean_anomaly(2.8, 0.0)
            .unwrap();
        orbit.recompute().unwrap();
        let first = orbit;
        orbit.recompute().unwrap();
        assert_eq!(orbit, first);
        assert_eq!(orbit.anomaly(), first.anomaly());
    }

    #[test]
    fn periapsis_at_epoch() {
        let orbit = OrbitElements::new(57.91e7, 0.6, SUN_MU).unwrap();
        assert_eq!(orbit.anomaly().mean_anom, 0.0);
        assert_eq!(orbit.anomaly().ecc_anom, 0.0);
        assert_eq!(orbit.true_anom(), 0.0);
        assert_relative_eq!(orbit.current_radius(), orbit.periapsis(), max_relative = 1e-12);
    }

    #[test]
    fn true_anomaly_converted_to_mean() {
        let v = 100_f64.to_radians();
        let orbit = OrbitElements::new(10_000.0, 0.4, EARTH_MU)
            .unwrap()
            .with_true_anomaly(v)
            .unwrap();
        assert!(orbit.m0 < v, "mean anomaly trails true anomaly after periapsis");
        assert_relative_eq!(orbit.true_anom(), v, epsilon = 1e-9);

        let circular = OrbitElements::new(10_000.0, 0.0, EARTH_MU)
            .unwrap()
            .with_true_anomaly(1.2)
            .unwrap();
        assert_relative_eq!(circular.m0, 1.2, epsilon = 1e-12);
    }

    #[test]
    fn hyperbolic_true_anomaly_beyond_asymptote() {
        let orbit = OrbitElements::new(-20_000.0, 1.3, EARTH_MU).unwrap();
        assert!(matches!(
            orbit.with_true_anomaly(170_f64.to_radians()),
            Err(OrbitError::BeyondAsymptote { .. })
        ));
        assert!(orbit.with_true_anomaly(-0.5).is_ok());
    }

    #[test]
    fn vis_viva_speeds() {
        let orbit = OrbitElements::new(10_000.0, 0.3, EARTH_MU).unwrap();
        let p = orbit.semi_latus_rectum();
        // periapsis speed from angular momentum
        let v_peri = orbit.angular_momentum() / orbit.periapsis();
        assert_relative_eq!(orbit.speed_at(0.0), v_peri, max_relative = 1e-12);
        assert_relative_eq!(orbit.orbiting_radius(PI / 2.0), p, max_relative = 1e-12);
        assert_relative_eq!(orbit.apoapsis().unwrap(), 13_000.0, max_relative = 1e-12);
    }

    #[test]
    fn circular_average_velocity() {
        let orbit = OrbitElements::circular(57.91e7, 0.0, SUN_MU).unwrap();
        let v_circ = (SUN_MU / 57.91e7).sqrt();
        assert_relative_eq!(orbit.avg_orbital_velocity().unwrap(), v_circ, max_relative = 1e-12);
    }

    #[test]
    fn serde_skips_derived_fields() {
        let orbit = OrbitElements::new(10_000.0, 0.3, EARTH_MU)
            .unwrap()
            .with_reference_body(BodyId(3));
        let json = serde_json::to_string(&orbit).unwrap();
        assert!(!json.contains("mean_motion"));
        let mut back: OrbitElements = serde_json::from_str(&json).unwrap();
        assert_eq!(back.reference_body, Some(BodyId(3)));
        assert_eq!(back.mean_motion(), 0.0);
        back.recompute().unwrap();
        assert_eq!(back.mean_motion(), orbit.mean_motion());
    }
}
