//! State Variable Filter implementation.
//!
//! # Topology
//!
//! Topology-Preserving Transform (TPT) SVF after Zavalishin, "The Art of VA
//! Filter Design" (2012). The trapezoidal integrators keep the analog
//! prototype's response and stay stable when cutoff moves between blocks.
//!
//! The filter computes lowpass, highpass and bandpass at once;
//! [`process`](StateVariableFilter::process) returns the lowpass output,
//! which is what the filter stage uses.
//!
//! # Reference
//!
//! Zavalishin, "The Art of VA Filter Design", rev. 2.1.2 (2018), Chapter 3.

use core::f32::consts::PI;
use libm::tanf;

use crate::flush_denormal;

/// Smallest resonance the filter will compute coefficients with.
///
/// `k = 1/Q`, so Q must stay strictly positive.
pub const MIN_RESONANCE: f32 = 1e-3;

const MIN_CUTOFF: f32 = 20.0;
const NYQUIST_MARGIN: f32 = 0.49;

fn floor_resonance(q: f32) -> f32 {
    // NaN.max(x) is x
    q.max(MIN_RESONANCE)
}

/// State Variable Filter (2-pole, 12 dB/oct).
///
/// ## Parameters
///
/// - `cutoff`: Hz, clamped to 20.0 ..= sr×0.49 (default 1000.0); below
///   about 41 Hz sample rate the range collapses to sr×0.49
/// - `resonance`: Q factor, any positive value (default 0.707)
///
/// # Example
///
/// ```rust
/// use sencillo_core::StateVariableFilter;
///
/// let mut svf = StateVariableFilter::new(48000.0);
/// svf.set_cutoff(500.0);
/// svf.set_resonance(2.5);
///
/// let output = svf.process(0.5);
/// assert!(output.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct StateVariableFilter {
    band_state: f32,
    low_state: f32,

    g: f32,
    k: f32,

    sample_rate: f32,
    cutoff: f32,
    resonance: f32,
}

impl Default for StateVariableFilter {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl StateVariableFilter {
    /// Create a new SVF at the given sample rate, cutoff 1 kHz, Q 0.707.
    pub fn new(sample_rate: f32) -> Self {
        let mut svf = Self {
            band_state: 0.0,
            low_state: 0.0,
            g: 0.0,
            k: 0.0,
            sample_rate,
            cutoff: 1000.0,
            resonance: 0.707,
        };
        svf.update_coefficients();
        svf
    }

    /// Set cutoff frequency in Hz.
    ///
    /// Clamped to `20.0 ..= sample_rate × 0.49`.
    pub fn set_cutoff(&mut self, freq: f32) {
        self.cutoff = self.limit_cutoff(freq);
        self.update_coefficients();
    }

    /// Current cutoff frequency in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Set resonance (Q factor).
    ///
    /// Not range-limited beyond [`MIN_RESONANCE`]; high Q rings hard.
    pub fn set_resonance(&mut self, q: f32) {
        self.resonance = floor_resonance(q);
        self.update_coefficients();
    }

    /// Current resonance (Q factor).
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Set cutoff and resonance together, recomputing coefficients once.
    pub fn set_params(&mut self, cutoff: f32, q: f32) {
        self.cutoff = self.limit_cutoff(cutoff);
        self.resonance = floor_resonance(q);
        self.update_coefficients();
    }

    /// Change the sample rate and recompute coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.cutoff = self.limit_cutoff(self.cutoff);
        self.update_coefficients();
    }

    /// Very low sample rates put `0.49·fs` under 20 Hz; the Nyquist bound wins.
    fn limit_cutoff(&self, freq: f32) -> f32 {
        let upper = self.sample_rate * NYQUIST_MARGIN;
        freq.clamp(MIN_CUTOFF.min(upper), upper)
    }

    fn update_coefficients(&mut self) {
        self.g = tanf(PI * self.cutoff / self.sample_rate);
        self.k = 1.0 / self.resonance;
    }

    /// Process one sample, returning `(lowpass, highpass, bandpass)`.
    pub fn process_all(&mut self, input: f32) -> (f32, f32, f32) {
        let g = self.g;
        let bp = (g * (input - self.low_state) + self.band_state) / (1.0 + g * (g + self.k));
        let lp = self.low_state + g * bp;
        let hp = input - self.k * bp - lp;

        self.band_state = flush_denormal(2.0 * bp - self.band_state);
        self.low_state = flush_denormal(2.0 * lp - self.low_state);

        (lp, hp, bp)
    }

    /// Process one sample through the lowpass output.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.process_all(input).0
    }

    /// Clear integrator state. Coefficients are kept.
    pub fn reset(&mut self) {
        self.band_state = 0.0;
        self.low_state = 0.0;
    }
}
