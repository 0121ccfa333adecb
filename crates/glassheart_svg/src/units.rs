//! Numeric input sanitising shared by every stage of the pipeline

/// Clamp a length or scale to a finite, non-negative value
///
/// NaN and infinities become `0.0`, and `-0.0` is collapsed to `0.0` so it
/// formats (and keys) the same as zero.
pub fn sanitize_length(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0) + 0.0
    } else {
        0.0
    }
}
