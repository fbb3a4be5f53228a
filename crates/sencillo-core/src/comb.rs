//! Lowpass-feedback comb, the building block of the reverb tank.

use crate::CircularDelay;
use crate::EngineError;
use crate::flush_denormal;

/// Recirculating delay line whose feedback passes through a one-pole lowpass.
///
/// Each call returns the sample written exactly `capacity()` calls earlier.
/// That tap is smoothed by `lp = tap·(1 − damp) + lp·damp` and
/// `input + lp·feedback` goes back into the line.
///
/// ```text
/// in ──(+)──▶ [ N samples ] ──┬──▶ out
///       ▲                     │
///       └── fb · lowpass ◀────┘
/// ```
///
/// ```rust
/// use sencillo_core::CombFilter;
///
/// let mut comb = CombFilter::new(3);
/// let out: Vec<f32> = [1.0, 0.0, 0.0, 0.0].map(|x| comb.process(x)).to_vec();
/// assert_eq!(out, [0.0, 0.0, 0.0, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct CombFilter {
    line: CircularDelay,
    feedback: f32,
    damp: f32,
    lowpass: f32,
}

impl CombFilter {
    /// Comb with a line of `len` samples, feedback 0.5 and damping 0.5.
    pub fn new(len: usize) -> Self {
        Self::with_line(CircularDelay::new(len))
    }

    /// Fallible counterpart of [`new`](Self::new) for use in `prepare`.
    pub fn try_new(len: usize) -> Result<Self, EngineError> {
        CircularDelay::try_new(len).map(Self::with_line)
    }

    fn with_line(line: CircularDelay) -> Self {
        Self {
            line,
            feedback: 0.5,
            damp: 0.5,
            lowpass: 0.0,
        }
    }

    /// Sets the loop gain in `[0, 1]`. Unity holds the contents forever.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 1.0);
    }

    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Sets the lowpass pole in `[0, 1]`; 0 leaves the loop unfiltered.
    #[inline]
    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    #[inline]
    pub fn damp(&self) -> f32 {
        self.damp
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let tap = self.line.read_at(0);
        self.lowpass = flush_denormal(tap * (1.0 - self.damp) + self.lowpass * self.damp);
        self.line.write(input + self.lowpass * self.feedback);
        tap
    }

    pub fn clear(&mut self) {
        self.line.clear();
        self.lowpass = 0.0;
    }

    pub fn capacity(&self) -> usize {
        self.line.capacity()
    }
}
