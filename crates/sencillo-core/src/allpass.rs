//! Series diffuser used after the reverb comb bank.
//!
//! This is the Freeverb flavour of the Schroeder allpass: the direct path is
//! `-input` (not `-g·input`), so the response is only approximately flat.
//! Its job is to thicken echo density, not to be a textbook allpass.

use crate::CircularDelay;
use crate::EngineError;
use crate::flush_denormal;

/// Fixed-length diffusion stage.
///
/// For an impulse into a stage of length `N` with coefficient `g`, the
/// output is `-1` at `n = 0` and `g^(k-1)` at `n = k·N` for `k >= 1`.
///
/// ```rust
/// use sencillo_core::AllpassFilter;
///
/// let mut diffuser = AllpassFilter::new(4);
/// assert_eq!(diffuser.process(1.0), -1.0);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    line: CircularDelay,
    coefficient: f32,
}

const DEFAULT_COEFFICIENT: f32 = 0.5;

impl AllpassFilter {
    /// Stage with a line of `len` samples. Panics if `len` is 0.
    pub fn new(len: usize) -> Self {
        Self {
            line: CircularDelay::new(len),
            coefficient: DEFAULT_COEFFICIENT,
        }
    }

    /// Fallible counterpart of [`new`](Self::new) for use in `prepare`.
    pub fn try_new(len: usize) -> Result<Self, EngineError> {
        let line = CircularDelay::try_new(len)?;
        Ok(Self {
            line,
            coefficient: DEFAULT_COEFFICIENT,
        })
    }

    /// Sets the recirculation coefficient, limited to `[-0.99, 0.99]`.
    #[inline]
    pub fn set_feedback(&mut self, coefficient: f32) {
        self.coefficient = coefficient.clamp(-0.99, 0.99);
    }

    #[inline]
    pub fn feedback(&self) -> f32 {
        self.coefficient
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let tap = self.line.read_at(0);
        self.line.write(flush_denormal(input + tap * self.coefficient));
        tap - input
    }

    pub fn clear(&mut self) {
        self.line.clear();
    }

    /// Line length in samples.
    pub fn capacity(&self) -> usize {
        self.line.capacity()
    }
}
