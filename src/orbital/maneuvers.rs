use nalgebra::Vector3;
use tracing::debug;

use super::elements::OrbitElements;
use super::propagator::state_at;
use super::state_vector::from_state_vector;
use crate::error::{OrbitError, OrbitResult};

/// Apply an impulsive velocity change `dv` (inertial frame) at `time`.
///
/// Returns the new element set, with its epoch at the burn. The input orbit
/// is left as it was.
pub fn apply_impulse(elements: &OrbitElements, time: f64, dv: &Vector3<f64>) -> OrbitResult<OrbitElements> {
    if !dv.iter().all(|c| c.is_finite()) {
        return Err(OrbitError::NonFinite("delta-v"));
    }
    let state = state_at(elements, time)?;
    let mut next = from_state_vector(&state.pos, &(state.vel + dv), elements.gm, time)?;
    next.reference_body = elements.reference_body;
    debug!(time, dv = dv.norm(), sma = next.sma, ecc = next.ecc, "impulsive burn applied");
    Ok(next)
}

/// Burn of magnitude `dv` along the velocity vector (negative to retrograde).
pub fn apply_prograde_burn(elements: &OrbitElements, time: f64, dv: f64) -> OrbitResult<OrbitElements> {
    let state = state_at(elements, time)?;
    let dir = state.vel.normalize();
    apply_impulse(elements, time, &(dir * dv))
}
