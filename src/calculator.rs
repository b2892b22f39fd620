//! Frame and sash cut dimensions derived from window openings

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Subtracted from the opening width to get the frame width (cm)
pub const FRAME_WIDTH_CLEARANCE: f64 = 2.6;

/// Subtracted from the opening length to get the sash length (cm)
pub const SASH_LENGTH_CLEARANCE: f64 = 6.0;

/// Number of sash panels the frame width is split across
pub const SASH_PANELS: f64 = 2.0;

/// Raw window opening as entered by the user, in centimeters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawWindowSpec {
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub width: f64,
}

impl RawWindowSpec {
    pub fn new(length: f64, width: f64) -> Self {
        Self { length, width }
    }
}

/// Cut dimensions for one window, in centimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedWindow {
    /// 1-based position of the window in the input
    pub index: usize,
    pub frame_length: f64,
    pub frame_width: f64,
    pub sash_length: f64,
    pub sash_width: f64,
}

impl CalculatedWindow {
    /// Derive the cut dimensions for a single opening.
    ///
    /// Results are not clamped: an opening narrower than
    /// [`FRAME_WIDTH_CLEARANCE`] yields negative frame and sash widths.
    pub fn from_spec(index: usize, spec: &RawWindowSpec) -> Self {
        let frame_width = spec.width - FRAME_WIDTH_CLEARANCE;
        Self {
            index,
            frame_length: spec.length,
            frame_width,
            sash_length: spec.length - SASH_LENGTH_CLEARANCE,
            sash_width: frame_width / SASH_PANELS,
        }
    }

    /// All four measurements in column order
    pub fn measurements(&self) -> [f64; 4] {
        [
            self.frame_length,
            self.frame_width,
            self.sash_length,
            self.sash_width,
        ]
    }

    /// Whether any derived dimension came out negative
    pub fn has_negative_dimension(&self) -> bool {
        self.measurements().iter().any(|v| *v < 0.0)
    }
}

/// Calculate cut dimensions for every window, preserving input order
pub fn calculate(specs: &[RawWindowSpec]) -> Vec<CalculatedWindow> {
    debug!("Calculating cut dimensions for {} windows", specs.len());

    specs
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let window = CalculatedWindow::from_spec(i + 1, spec);
            trace!("Window {}: {:?} -> {:?}", window.index, spec, window);
            window
        })
        .collect()
}
