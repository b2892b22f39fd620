//! In-memory form state feeding the calculator

use crate::calculator::{self, CalculatedWindow, RawWindowSpec};
use tracing::{debug, trace, warn};

/// Largest window count a form holds; larger requests are capped
pub const MAX_WINDOW_COUNT: usize = 1000;

/// Which dimension of a window is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Length,
    Width,
}

/// Window count plus per-window inputs and the last calculated results.
///
/// There is always at least one window. Results are hidden whenever the
/// window count changes and regenerated wholesale by [`WindowForm::calculate`].
#[derive(Debug, Clone)]
pub struct WindowForm {
    specs: Vec<RawWindowSpec>,
    results: Option<Vec<CalculatedWindow>>,
}

impl WindowForm {
    /// A form with a single empty window
    pub fn new() -> Self {
        Self {
            specs: vec![RawWindowSpec::default()],
            results: None,
        }
    }

    /// Build a form from already-known openings (at least one window is kept)
    pub fn from_specs(specs: Vec<RawWindowSpec>) -> Self {
        let mut form = Self::new();
        form.set_window_count(specs.len() as i64);
        for (i, spec) in specs.into_iter().enumerate() {
            form.set_dimension(i, Field::Length, spec.length);
            form.set_dimension(i, Field::Width, spec.width);
        }
        form
    }

    pub fn window_count(&self) -> usize {
        self.specs.len()
    }

    pub fn specs(&self) -> &[RawWindowSpec] {
        &self.specs
    }

    /// Resize the form to `count` windows, clamped to `1..=MAX_WINDOW_COUNT`.
    ///
    /// Existing entries up to the new count are kept, new slots start at
    /// `(0, 0)`. Any previously calculated results are discarded.
    pub fn set_window_count(&mut self, count: i64) {
        if count > MAX_WINDOW_COUNT as i64 {
            warn!("Window count {} capped at {}", count, MAX_WINDOW_COUNT);
        }
        let count = clamp_window_count(count);
        debug!(
            "Resizing form from {} to {} windows",
            self.specs.len(),
            count
        );
        self.specs.resize(count, RawWindowSpec::default());
        self.results = None;
    }

    /// Set one dimension of the window at `index` (0-based).
    ///
    /// Negative and non-finite values are stored as 0. Returns `false` when
    /// `index` is past the current window count.
    pub fn set_dimension(&mut self, index: usize, field: Field, value: f64) -> bool {
        let Some(spec) = self.specs.get_mut(index) else {
            trace!("Ignoring edit for missing window {}", index);
            return false;
        };

        let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
        match field {
            Field::Length => spec.length = value,
            Field::Width => spec.width = value,
        }
        true
    }

    /// Set one dimension from raw text, see [`parse_dimension`]
    pub fn set_dimension_text(&mut self, index: usize, field: Field, text: &str) -> bool {
        self.set_dimension(index, field, parse_dimension(text))
    }

    /// Recompute every window from the current inputs
    pub fn calculate(&mut self) -> &[CalculatedWindow] {
        self.results.insert(calculator::calculate(&self.specs))
    }

    /// Results of the last calculation, if still current
    pub fn results(&self) -> Option<&[CalculatedWindow]> {
        self.results.as_deref()
    }
}

impl Default for WindowForm {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_window_count(count: i64) -> usize {
    count.clamp(1, MAX_WINDOW_COUNT as i64) as usize
}

/// Longest leading run of `text` that reads as a number.
///
/// Always accepts an optional sign and integer digits. With `real`, a
/// decimal point, fraction digits and an exponent are taken as well, the
/// exponent only when digits follow it.
fn numeric_prefix(text: &str, real: bool) -> &str {
    let bytes = text.as_bytes();
    let digits = |from: usize| {
        bytes
            .get(from..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits(end);
    end += int_digits;
    if !real {
        return &text[..end];
    }

    let mut mantissa_digits = int_digits;
    if bytes.get(end) == Some(&b'.') {
        let fraction_digits = digits(end + 1);
        mantissa_digits += fraction_digits;
        if mantissa_digits > 0 {
            end += 1 + fraction_digits;
        }
    }
    if mantissa_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }
    &text[..end]
}

/// Parse a window count from its leading integer digits, so `"3.9"` and
/// `"3 windows"` both give 3. No digits, or a count below 1, gives 1.
/// Counts past [`MAX_WINDOW_COUNT`] are capped.
pub fn parse_window_count(text: &str) -> usize {
    let prefix = numeric_prefix(text.trim(), false);
    if !prefix.bytes().any(|b| b.is_ascii_digit()) {
        return 1;
    }

    let saturated = if prefix.starts_with('-') { i64::MIN } else { i64::MAX };
    clamp_window_count(prefix.parse().unwrap_or(saturated))
}

/// Parse a dimension in centimeters from the leading number in `text`,
/// so `"12.5cm"` gives 12.5. Falls back to 0 when there is no number or
/// it is not finite.
pub fn parse_dimension(text: &str) -> f64 {
    numeric_prefix(text.trim(), true)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
