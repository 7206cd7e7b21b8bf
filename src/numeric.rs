//! Scalar helpers for rate-based smoothing and angle bookkeeping.
//!
//! Every per-tick interpolation in the crate converts a "speed" and a time
//! step into a blend factor through these helpers so the clamping rules stay
//! in one place.

/// Converts a smoothing rate and time step into a blend factor in `[0, 1]`.
///
/// Non-finite products collapse to `0.0` so a corrupt rate never moves state.
///
/// # Examples
/// ```
/// use limpet::numeric::step_fraction;
/// assert!((step_fraction(10.0, 0.05) - 0.5).abs() < 1e-6);
/// assert_eq!(step_fraction(10.0, 1.0), 1.0);
/// assert_eq!(step_fraction(-1.0, 1.0), 0.0);
/// ```
#[must_use]
pub fn step_fraction(rate: f32, dt: f32) -> f32 {
    let raw = rate * dt;
    if raw.is_finite() {
        raw.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Frame-rate independent blend factor for exponential smoothing.
///
/// Returns `1 - e^(-rate * dt)`, which approaches the target at the same
/// speed regardless of how the elapsed time is split into steps.
///
/// # Examples
/// ```
/// use limpet::numeric::exponential_fraction;
/// let once = exponential_fraction(4.0, 0.5);
/// let half = exponential_fraction(4.0, 0.25);
/// // Two half-steps leave the same remainder as one full step.
/// assert!(((1.0 - half) * (1.0 - half) - (1.0 - once)).abs() < 1e-6);
/// ```
#[must_use]
pub fn exponential_fraction(rate: f32, dt: f32) -> f32 {
    let raw = 1.0 - (-rate * dt).exp();
    if raw.is_finite() {
        raw.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Wraps an angle in degrees into `[-180, 180]`.
///
/// # Examples
/// ```
/// use limpet::numeric::wrap_degrees;
/// assert!((wrap_degrees(190.0) + 170.0).abs() < 1e-4);
/// assert!((wrap_degrees(-540.0) - 180.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn wrap_degrees(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        180.0
    } else {
        wrapped
    }
}
