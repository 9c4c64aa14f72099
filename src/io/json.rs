use std::io::{self, Write};

use serde::Serialize;

use crate::orbital::elements::{BodyId, OrbitElements, OrbitKind};

/// Derived quantities of an orbit, for reports.
#[derive(Debug, Clone, Serialize)]
pub struct OrbitSummary {
    pub kind: &'static str,
    pub sma_km: f64,
    pub ecc: f64,
    pub inc_deg: f64,
    pub lan_deg: f64,
    pub argp_deg: f64,
    pub periapsis_km: f64,
    pub apoapsis_km: Option<f64>,
    pub period_s: Option<f64>,
    pub specific_energy: f64,
    pub angular_momentum: f64,
    pub reference_body: Option<BodyId>,
}

impl OrbitSummary {
    pub fn from_elements(elements: &OrbitElements) -> Self {
        let kind = match elements.kind() {
            OrbitKind::Elliptic => "elliptic",
            OrbitKind::Hyperbolic => "hyperbolic",
        };
        OrbitSummary {
            kind,
            sma_km: elements.sma,
            ecc: elements.ecc,
            inc_deg: elements.inc.to_degrees(),
            lan_deg: elements.lan.to_degrees(),
            argp_deg: elements.argp.to_degrees(),
            periapsis_km: elements.periapsis(),
            apoapsis_km: elements.apoapsis(),
            period_s: elements.period(),
            specific_energy: elements.specific_energy(),
            angular_momentum: elements.angular_momentum(),
            reference_body: elements.reference_body,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    name: &'a str,
    elements: &'a OrbitElements,
    summary: &'a OrbitSummary,
}

/// Write the element set and its summary as pretty JSON.
pub fn write_summary<W: Write>(
    writer: &mut W,
    name: &str,
    elements: &OrbitElements,
) -> io::Result<()> {
    let summary = OrbitSummary::from_elements(elements);
    let report = Report { name, elements, summary: &summary };
    serde_json::to_writer_pretty(&mut *writer, &report).map_err(io::Error::from)?;
    writeln!(writer)
}

/// Write orbit summary JSON to a file.
pub fn write_summary_file(path: &str, name: &str, elements: &OrbitElements) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, name, elements)
}
