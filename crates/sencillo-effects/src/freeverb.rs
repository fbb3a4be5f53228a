//! Freeverb-style stereo reverb tank.
//!
//! Eight parallel damped combs feed four series allpasses on each side. The
//! right side's delay lines are 23 samples longer (at 44.1 kHz) than the
//! left's, which decorrelates the two outputs; `width` then cross-mixes
//! them.
//!
//! # Parameter Mapping
//!
//! | Control | Internal |
//! |---------|----------|
//! | room size `s` | comb feedback `s × 0.28 + 0.7` |
//! | damping `d` | comb damping `d × 0.4` |
//! | dry `y` | dry gain `y × 2` |
//! | wet `w`, width `x` | `wet1 = 1.5w(1 + x)`, `wet2 = 1.5w(1 − x)` |
//! | freeze ≥ 0.5 | input gain 0, feedback 1, damping 0 |
//!
//! Reference: Jezar at Dreampoint, "Freeverb" (public domain, 2000).

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use sencillo_core::{AllpassFilter, CombFilter, EngineError};

/// Comb delay lengths at 44.1 kHz.
const COMB_TUNINGS_44K: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Allpass delay lengths at 44.1 kHz.
const ALLPASS_TUNINGS_44K: [usize; 4] = [556, 441, 341, 225];

/// Extra delay on the right side, at 44.1 kHz.
const STEREO_SPREAD: usize = 23;

/// Rate the tunings were chosen for.
const REFERENCE_RATE: f32 = 44100.0;

const FIXED_GAIN: f32 = 0.015;
const SCALE_WET: f32 = 3.0;
const SCALE_DRY: f32 = 2.0;
const SCALE_DAMP: f32 = 0.4;
const SCALE_ROOM: f32 = 0.28;
const OFFSET_ROOM: f32 = 0.7;
const FREEZE_THRESHOLD: f32 = 0.5;

/// Scale a delay length from the reference rate to `target_rate`.
fn scale_to_rate(samples: usize, target_rate: f32) -> usize {
    (libm::roundf(samples as f32 * target_rate / REFERENCE_RATE) as usize).max(1)
}

/// User-facing reverb controls, each nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeverbParams {
    /// Room size; longer tail as it grows.
    pub room_size: f32,
    /// High-frequency absorption in the tank.
    pub damping: f32,
    /// Reverb level.
    pub wet: f32,
    /// Direct signal level.
    pub dry: f32,
    /// Stereo width of the reverb output.
    pub width: f32,
    /// Freeze when ≥ 0.5: the tank holds its contents and takes no input.
    pub freeze: f32,
}

impl Default for FreeverbParams {
    fn default() -> Self {
        Self {
            room_size: 0.5,
            damping: 0.5,
            wet: 0.33,
            dry: 0.4,
            width: 1.0,
            freeze: 0.0,
        }
    }
}

/// One side of the tank.
#[derive(Debug, Clone)]
struct Tank {
    combs: Vec<CombFilter>,
    allpasses: Vec<AllpassFilter>,
}

/// Empty vector with room for `len` items, or `EngineError::Allocation`.
fn reserved<T>(len: usize) -> Result<Vec<T>, EngineError> {
    let mut items = Vec::new();
    items
        .try_reserve_exact(len)
        .map_err(|_| EngineError::Allocation { samples: len })?;
    Ok(items)
}

impl Tank {
    fn new(sample_rate: f32, spread: usize) -> Result<Self, EngineError> {
        let mut combs = reserved(COMB_TUNINGS_44K.len())?;
        for &tuning in &COMB_TUNINGS_44K {
            combs.push(CombFilter::try_new(scale_to_rate(tuning + spread, sample_rate))?);
        }

        let mut allpasses = reserved(ALLPASS_TUNINGS_44K.len())?;
        for &tuning in &ALLPASS_TUNINGS_44K {
            let mut ap = AllpassFilter::try_new(scale_to_rate(tuning + spread, sample_rate))?;
            ap.set_feedback(0.5);
            allpasses.push(ap);
        }

        Ok(Self { combs, allpasses })
    }

    fn set_comb_params(&mut self, feedback: f32, damp: f32) {
        for comb in &mut self.combs {
            comb.set_feedback(feedback);
            comb.set_damp(damp);
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let mut out = 0.0;
        for comb in &mut self.combs {
            out += comb.process(input);
        }
        for allpass in &mut self.allpasses {
            out = allpass.process(out);
        }
        out
    }

    fn clear(&mut self) {
        self.combs.iter_mut().for_each(CombFilter::clear);
        self.allpasses.iter_mut().for_each(AllpassFilter::clear);
    }
}

/// Stereo Freeverb tank.
///
/// Allocates its delay lines in [`prepare`](Self::prepare); processing an
/// unprepared tank passes audio through untouched.
///
/// # Example
///
/// ```rust
/// use sencillo_effects::freeverb::{Freeverb, FreeverbParams};
///
/// let mut reverb = Freeverb::new();
/// reverb.prepare(48000.0).unwrap();
/// reverb.set_parameters(&FreeverbParams { wet: 1.0, dry: 0.0, ..FreeverbParams::default() });
///
/// let mut left = [0.0_f32; 4096];
/// let mut right = [0.0_f32; 4096];
/// left[0] = 1.0;
/// reverb.process_stereo(&mut left, &mut right);
/// assert!(left[1..].iter().any(|&s| s != 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct Freeverb {
    left: Option<Tank>,
    right: Option<Tank>,
    params: FreeverbParams,
    gain: f32,
    feedback: f32,
    damp: f32,
    wet1: f32,
    wet2: f32,
    dry: f32,
}

impl Default for Freeverb {
    fn default() -> Self {
        Self::new()
    }
}

impl Freeverb {
    /// Create an unprepared tank with default parameters.
    pub fn new() -> Self {
        let mut reverb = Self {
            left: None,
            right: None,
            params: FreeverbParams::default(),
            gain: 0.0,
            feedback: 0.0,
            damp: 0.0,
            wet1: 0.0,
            wet2: 0.0,
            dry: 0.0,
        };
        reverb.update();
        reverb
    }

    /// Allocate both sides of the tank for `sample_rate`.
    pub fn prepare(&mut self, sample_rate: f32) -> Result<(), EngineError> {
        let mut left = Tank::new(sample_rate, 0)?;
        let mut right = Tank::new(sample_rate, STEREO_SPREAD)?;
        left.set_comb_params(self.feedback, self.damp);
        right.set_comb_params(self.feedback, self.damp);
        self.left = Some(left);
        self.right = Some(right);
        Ok(())
    }

    /// Free the delay lines.
    pub fn release(&mut self) {
        self.left = None;
        self.right = None;
    }

    /// Whether [`prepare`](Self::prepare) has run since the last release.
    pub fn is_prepared(&self) -> bool {
        self.left.is_some()
    }

    /// Apply a new set of controls.
    pub fn set_parameters(&mut self, params: &FreeverbParams) {
        if *params != self.params {
            self.params = *params;
            self.update();
        }
    }

    /// Current controls.
    pub fn parameters(&self) -> &FreeverbParams {
        &self.params
    }

    /// Whether the tank is frozen.
    pub fn is_frozen(&self) -> bool {
        self.params.freeze >= FREEZE_THRESHOLD
    }

    fn update(&mut self) {
        let p = self.params;
        let wet = p.wet * SCALE_WET;
        self.dry = p.dry * SCALE_DRY;
        self.wet1 = 0.5 * wet * (1.0 + p.width);
        self.wet2 = 0.5 * wet * (1.0 - p.width);

        if self.is_frozen() {
            self.gain = 0.0;
            self.feedback = 1.0;
            self.damp = 0.0;
        } else {
            self.gain = FIXED_GAIN;
            self.feedback = p.room_size * SCALE_ROOM + OFFSET_ROOM;
            self.damp = p.damping * SCALE_DAMP;
        }

        let (feedback, damp) = (self.feedback, self.damp);
        for tank in self.left.iter_mut().chain(self.right.iter_mut()) {
            tank.set_comb_params(feedback, damp);
        }
    }

    /// Process a stereo pair in place. Both tanks are fed the summed input.
    pub fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        let (Some(tank_l), Some(tank_r)) = (self.left.as_mut(), self.right.as_mut()) else {
            return;
        };

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let input = (*l + *r) * self.gain;
            let out_l = tank_l.process(input);
            let out_r = tank_r.process(input);

            *l = out_l * self.wet1 + out_r * self.wet2 + *l * self.dry;
            *r = out_r * self.wet1 + out_l * self.wet2 + *r * self.dry;
        }
    }

    /// Process a mono channel in place using the left tank only.
    pub fn process_mono(&mut self, samples: &mut [f32]) {
        let Some(tank) = self.left.as_mut() else {
            return;
        };

        for s in samples.iter_mut() {
            let out = tank.process(*s * self.gain);
            *s = out * self.wet1 + *s * self.dry;
        }
    }

    /// Clear the tank without freeing it.
    pub fn reset(&mut self) {
        for tank in self.left.iter_mut().chain(self.right.iter_mut()) {
            tank.clear();
        }
    }
}
