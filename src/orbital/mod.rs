pub mod elements;
pub mod kepler;
pub mod maneuvers;
pub mod propagator;
pub mod state_vector;
pub mod transfer;

pub use elements::{AnomalyState, BodyId, OrbitElements, OrbitKind};
pub use kepler::{solve_kepler_elliptic, solve_kepler_hyperbolic, KeplerSolution, SolverConfig};
pub use maneuvers::{apply_impulse, apply_prograde_burn};
pub use propagator::{propagate, propagate_orbit, propagate_with, state_at, update_orbit, OrbitalState, MAX_SAMPLES};
pub use state_vector::{from_state_vector, to_state_vector, to_state_vector_at, StateVector};
pub use transfer::{hohmann, hohmann_phase_angle, transfer_angle, transfer_time, HohmannTransfer};
