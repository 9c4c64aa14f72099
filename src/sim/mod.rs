pub mod event;

pub use event::{detect_events, EventDetector, EventKind, SimEvent};
