//! Mathematical utility functions for DSP.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Level Conversions
//!
//! - [`linear_to_db`] - Peak readouts in dB
//!
//! # Waveshaping
//!
//! - [`wave_fold`] - Triangular reflection around ±threshold
//!
//! # Utilities
//!
//! - [`flush_denormal`] - Keep feedback loops out of the subnormal range
//! - [`wet_dry_mix`] - Linear crossfade

use libm::{ceilf, copysignf, logf};

/// Convert linear gain to decibels.
///
/// Inputs at or below 1e-10 read as -200 dB.
///
/// # Example
/// ```rust
/// use sencillo_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Wave folding.
///
/// Reflects the magnitude of `sample` back and forth between 0 and
/// `threshold`, keeping the sign. The transfer curve is a triangle wave
/// with period `2 × threshold`: continuous, odd-symmetric, and bounded by
/// `threshold`.
///
/// With `i` the number of whole threshold lengths strictly below `|sample|`
/// and `left = |sample| − i × threshold`, the output magnitude is `left` for
/// even `i` and `threshold − left` for odd `i`. A magnitude of exactly
/// `k × threshold` resolves as if it were infinitesimally smaller, so
/// `wave_fold(t, t) == t` and `wave_fold(2t, t) == 0`.
///
/// `threshold` must be positive. Non-finite samples fold to 0.
///
/// # Example
/// ```rust
/// use sencillo_core::wave_fold;
///
/// assert_eq!(wave_fold(0.5, 1.0), 0.5);
/// assert!((wave_fold(1.2, 1.0) - 0.8).abs() < 1e-6);
/// assert!((wave_fold(-1.5, 1.0) + 0.5).abs() < 1e-6);
/// ```
#[inline]
pub fn wave_fold(sample: f32, threshold: f32) -> f32 {
    debug_assert!(threshold > 0.0, "fold threshold must be > 0, got {threshold}");

    let magnitude = sample.abs();
    if magnitude <= threshold {
        return sample;
    }
    if !magnitude.is_finite() {
        return 0.0;
    }

    let segments = ceilf(magnitude / threshold) - 1.0;
    let left = (magnitude - segments * threshold).clamp(0.0, threshold);
    let folded = if segments % 2.0 == 0.0 {
        left
    } else {
        threshold - left
    };

    copysignf(folded, sample)
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Values below 1e-20 become zero, well before the IEEE 754 subnormal range
/// where many CPUs slow down sharply. Use in feedback loops that can decay
/// indefinitely toward zero.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Crossfade between dry and wet signals.
///
/// `dry * (1 - mix) + wet * mix`, computed as `dry + (wet - dry) * mix`.
/// `mix` 0.0 = all dry, 1.0 = all wet.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}
