pub mod angle;
pub mod error;
pub mod io;
pub mod orbital;
pub mod physics;
pub mod sim;

pub use error::{OrbitError, OrbitResult};
