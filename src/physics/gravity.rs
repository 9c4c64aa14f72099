// ---------------------------------------------------------------------------
// Gravitational parameters (km^3/s^2) and radii (km)
// ---------------------------------------------------------------------------

pub const SUN_MU: f64 = 1.327_124_400_18e11;
pub const EARTH_MU: f64 = 3.986_004_418e5;
pub const R_EARTH: f64 = 6_378.137; // equatorial radius
pub const AU: f64 = 149_597_870.7;

/// Orbital speed at radius `r` on an orbit of semi-major axis `sma`
/// (vis-viva). `sma` is negative for hyperbolic orbits.
pub fn vis_viva_speed(r: f64, sma: f64, gm: f64) -> f64 {
    (gm * (2.0 / r - 1.0 / sma)).sqrt()
}
