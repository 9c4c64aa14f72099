use crate::orbital::propagator::OrbitalState;

// ---------------------------------------------------------------------------
// Orbit events
// ---------------------------------------------------------------------------

/// Kinds of orbit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Periapsis,
    Apoapsis,
    AscendingNode,
    DescendingNode,
}

/// A discrete event found along a sampled trajectory.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub state: OrbitalState,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive states and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &OrbitalState, current: &OrbitalState) -> Option<EventKind>;
}

/// Detects periapsis passage (radius going from decreasing to increasing).
pub struct PeriapsisDetector;

impl EventDetector for PeriapsisDetector {
    fn check(&mut self, prev: &OrbitalState, current: &OrbitalState) -> Option<EventKind> {
        if prev.radial_velocity() < 0.0 && current.radial_velocity() >= 0.0 {
            Some(EventKind::Periapsis)
        } else {
            None
        }
    }
}

/// Detects apoapsis passage (radius going from increasing to decreasing).
pub struct ApoapsisDetector;

impl EventDetector for ApoapsisDetector {
    fn check(&mut self, prev: &OrbitalState, current: &OrbitalState) -> Option<EventKind> {
        if prev.radial_velocity() > 0.0 && current.radial_velocity() <= 0.0 {
            Some(EventKind::Apoapsis)
        } else {
            None
        }
    }
}

/// Detects crossings of the reference plane (z = 0).
pub struct NodeDetector {
    pub ascending: bool,
}

impl NodeDetector {
    pub fn ascending() -> Self {
        Self { ascending: true }
    }

    pub fn descending() -> Self {
        Self { ascending: false }
    }
}

impl EventDetector for NodeDetector {
    fn check(&mut self, prev: &OrbitalState, current: &OrbitalState) -> Option<EventKind> {
        if self.ascending && prev.pos.z < 0.0 && current.pos.z >= 0.0 {
            Some(EventKind::AscendingNode)
        } else if !self.ascending && prev.pos.z > 0.0 && current.pos.z <= 0.0 {
            Some(EventKind::DescendingNode)
        } else {
            None
        }
    }
}

/// Run every detector over each consecutive pair of samples.
///
/// Events are reported at the later sample of the pair, in time order.
pub fn detect_events(
    trajectory: &[OrbitalState],
    detectors: &mut [Box<dyn EventDetector>],
) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for pair in trajectory.windows(2) {
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&pair[0], &pair[1]) {
                events.push(SimEvent {
                    time: pair[1].time,
                    kind,
                    state: pair[1].clone(),
                });
            }
        }
    }
    events
}

/// Detectors for apsides and both nodes.
pub fn default_detectors() -> Vec<Box<dyn EventDetector>> {
    vec![
        Box::new(PeriapsisDetector),
        Box::new(ApoapsisDetector),
        Box::new(NodeDetector::ascending()),
        Box::new(NodeDetector::descending()),
    ]
}
