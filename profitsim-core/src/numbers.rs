//! Numeric conversion helpers centralizing the casts between counts and floats.

use num_traits::cast::cast;

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(f64::MAX)
}

/// Floor a f64 into an index.
///
/// NaN and non-positive values map to 0; `+inf` saturates to `usize::MAX`.
#[must_use]
pub fn floor_to_index(value: f64) -> usize {
    if value == f64::INFINITY {
        return usize::MAX;
    }
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    cast::<f64, usize>(value.floor()).unwrap_or(usize::MAX)
}

/// Floor a f64 into an index and clamp it to `[0, len - 1]`.
///
/// Callers must pass a non-zero `len`.
#[must_use]
pub fn clamped_index(value: f64, len: usize) -> usize {
    floor_to_index(value).min(len.saturating_sub(1))
}
