//! Time-divided left/right channel swapper.
//!
//! A sample counter walks through three states: FLIPPED (left and right
//! swapped) while `counter < p × fs`, NORMAL (pass through) while
//! `counter < 2p × fs`, and a single RESET sample that passes through and
//! returns the counter to 0. One cycle is therefore `2p × fs + 1` samples
//! when `p × fs` is whole. State changes land on exact sample positions,
//! mid-block if need be.

use sencillo_core::{
    Engine, EngineError, ParamDescriptor, ParamId, ParamUnit, ProcessSpec, validate_block,
};

const DEFAULT_PERIOD: f32 = 0.25;

const FLIP_PERIOD: ParamDescriptor = ParamDescriptor::new(
    "Flip Period",
    "Period",
    ParamUnit::Seconds,
    0.01,
    2.5,
    DEFAULT_PERIOD,
)
.with_id(ParamId(400), "sf_flip_period")
.with_step(0.01);

/// Stereo flipper engine.
///
/// Needs at least two channels; channels beyond the first two are left
/// untouched.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Flip Period | 0.01–2.5 s | 0.25 |
///
/// # Example
///
/// ```rust
/// use sencillo_core::{Engine, ProcessSpec};
/// use sencillo_effects::StereoFlipper;
///
/// let mut flipper = StereoFlipper::new();
/// flipper.set_flip_period(0.01).unwrap();
/// flipper.prepare(&ProcessSpec::new(100.0, 4, 2)).unwrap();
///
/// let mut left = [1.0_f32; 4];
/// let mut right = [2.0_f32; 4];
/// flipper.process(&mut [&mut left[..], &mut right[..]]).unwrap();
/// assert_eq!(left, [2.0, 1.0, 1.0, 2.0]);
/// ```
#[derive(Debug, Clone)]
pub struct StereoFlipper {
    period: f32,
    counter: u64,
    spec: Option<ProcessSpec>,
}

impl Default for StereoFlipper {
    fn default() -> Self {
        Self::new()
    }
}

impl StereoFlipper {
    /// Create a flipper with a 0.25 s half-period.
    pub fn new() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            counter: 0,
            spec: None,
        }
    }

    /// Set how long each state lasts, in seconds.
    ///
    /// Zero, negative and non-finite periods are rejected.
    pub fn set_flip_period(&mut self, seconds: f32) -> Result<(), EngineError> {
        if seconds.is_finite() && seconds > 0.0 {
            self.period = seconds;
            Ok(())
        } else {
            Err(EngineError::InvalidParameter {
                name: "flip period",
                value: seconds,
            })
        }
    }

    /// Current half-period in seconds.
    pub fn flip_period(&self) -> f32 {
        self.period
    }

    /// Samples elapsed in the current cycle.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Whether the next sample will be swapped.
    pub fn is_flipped(&self) -> bool {
        self.spec
            .as_ref()
            .is_some_and(|spec| (self.counter as f64) < self.half_period(spec.sample_rate))
    }

    /// Half-period in samples. Computed in `f32` so that e.g. 0.01 s at
    /// 100 Hz is exactly one sample.
    fn half_period(&self, sample_rate: f32) -> f64 {
        f64::from(self.period * sample_rate)
    }

    /// Process with an explicit period for this block.
    pub fn process_with_period(
        &mut self,
        block: &mut [&mut [f32]],
        seconds: f32,
    ) -> Result<(), EngineError> {
        validate_block(block, self.spec.as_ref(), 2)?;
        self.set_flip_period(seconds)?;
        self.process(block)
    }
}

impl Engine for StereoFlipper {
    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), EngineError> {
        spec.validate()?;
        self.spec = Some(*spec);
        self.counter = 0;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = spec.sample_rate,
            period = self.period,
            "stereo flipper prepared"
        );

        Ok(())
    }

    fn process(&mut self, block: &mut [&mut [f32]]) -> Result<(), EngineError> {
        validate_block(block, self.spec.as_ref(), 2)?;
        let Some(spec) = self.spec.as_ref() else {
            return Err(EngineError::NotPrepared);
        };

        let half = self.half_period(spec.sample_rate);
        let full = 2.0 * half;
        let [left, right, ..] = block else {
            return Ok(());
        };

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let position = self.counter as f64;
            if position < half {
                core::mem::swap(l, r);
                self.counter += 1;
            } else if position < full {
                self.counter += 1;
            } else {
                self.counter = 0;
            }
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.counter = 0;
    }

    fn release(&mut self) {
        self.spec = None;
        self.counter = 0;
    }

    fn min_channels(&self) -> usize {
        2
    }
}

sencillo_core::impl_params! {
    StereoFlipper, this {
        [0] FLIP_PERIOD,
            get: this.period,
            set: |v| this.period = FLIP_PERIOD.clamp(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sencillo_core::ParameterInfo;

    fn prepared(period: f32, sample_rate: f32, block: usize) -> StereoFlipper {
        let mut flipper = StereoFlipper::new();
        flipper.set_flip_period(period).unwrap();
        flipper
            .prepare(&ProcessSpec::new(sample_rate, block, 2))
            .unwrap();
        flipper
    }

    #[test]
    fn one_sample_half_period() {
        let mut flipper = prepared(0.01, 100.0, 1);
        let mut l = [1.0_f32];
        let mut r = [2.0_f32];

        flipper.process(&mut [&mut l[..], &mut r[..]]).unwrap();
        assert_eq!((l[0], r[0]), (2.0, 1.0));
        assert_eq!(flipper.counter(), 1);

        let (mut l, mut r) = ([1.0_f32], [2.0_f32]);
        flipper.process(&mut [&mut l[..], &mut r[..]]).unwrap();
        assert_eq!((l[0], r[0]), (1.0, 2.0));
        assert_eq!(flipper.counter(), 2);

        // The wrap sample passes through and only then does FLIPPED resume
        let (mut l, mut r) = ([1.0_f32], [2.0_f32]);
        flipper.process(&mut [&mut l[..], &mut r[..]]).unwrap();
        assert_eq!((l[0], r[0]), (1.0, 2.0));
        assert_eq!(flipper.counter(), 0);
        assert!(flipper.is_flipped());
    }

    #[test]
    fn reset_sample_passes_through() {
        let mut flipper = prepared(0.01, 100.0, 6);
        let mut l = [1.0_f32; 6];
        let mut r = [2.0_f32; 6];
        flipper.process(&mut [&mut l[..], &mut r[..]]).unwrap();
        assert_eq!(l, [2.0, 1.0, 1.0, 2.0, 1.0, 1.0]);
        assert_eq!(r, [1.0, 2.0, 2.0, 1.0, 2.0, 2.0]);
    }

    #[test]
    fn square_wave_pattern() {
        // Half-period of 3 samples: 3 flipped, 3 normal, 1 wrap
        let mut flipper = prepared(0.03, 100.0, 12);
        let mut l = [1.0_f32; 12];
        let mut r = [-1.0_f32; 12];
        flipper.process(&mut [&mut l[..], &mut r[..]]).unwrap();
        assert_eq!(
            l,
            [-1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, 1.0, 1.0]
        );
    }

    #[test]
    fn state_carries_across_blocks() {
        let mut flipper = prepared(0.02, 100.0, 3);
        let mut flipped = Vec::new();
        for _ in 0..4 {
            let mut l = [1.0_f32; 3];
            let mut r = [0.0_f32; 3];
            flipper.process(&mut [&mut l[..], &mut r[..]]).unwrap();
            flipped.extend(l.iter().map(|&s| s == 0.0));
        }
        assert_eq!(
            flipped,
            [
                true, true, false, false, false, true, true, false, false, false, true, true
            ]
        );
    }

    #[test]
    fn mono_block_rejected() {
        let mut flipper = prepared(0.25, 48000.0, 8);
        let mut data = [0.5_f32; 8];
        assert_eq!(
            flipper.process(&mut [&mut data[..]]),
            Err(EngineError::ChannelCount {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(flipper.counter(), 0);
    }

    #[test]
    fn extra_channels_untouched() {
        let mut flipper = StereoFlipper::new();
        flipper.set_flip_period(0.01).unwrap();
        flipper.prepare(&ProcessSpec::new(100.0, 2, 3)).unwrap();
        let mut l = [1.0_f32; 2];
        let mut r = [2.0_f32; 2];
        let mut c = [3.0_f32; 2];
        flipper
            .process(&mut [&mut l[..], &mut r[..], &mut c[..]])
            .unwrap();
        assert_eq!(c, [3.0; 2]);
        assert_eq!(l, [2.0, 1.0]);
    }

    #[test]
    fn invalid_period_rejected() {
        let mut flipper = StereoFlipper::new();
        assert!(flipper.set_flip_period(0.0).is_err());
        assert!(flipper.set_flip_period(-1.0).is_err());
        assert!(flipper.set_flip_period(f32::NAN).is_err());
        assert_eq!(flipper.flip_period(), DEFAULT_PERIOD);
    }

    #[test]
    fn shorter_period_wraps_on_next_sample() {
        let mut flipper = prepared(0.05, 100.0, 8);
        let mut l = [0.0_f32; 8];
        let mut r = [0.0_f32; 8];
        flipper.process(&mut [&mut l[..], &mut r[..]]).unwrap();
        assert_eq!(flipper.counter(), 8);

        let mut l = [1.0_f32; 2];
        let mut r = [0.0_f32; 2];
        flipper
            .process_with_period(&mut [&mut l[..], &mut r[..]], 0.01)
            .unwrap();
        assert_eq!(l, [1.0, 0.0]);
        assert_eq!(flipper.counter(), 1);
    }

    #[test]
    fn reset_restarts_flipped() {
        let mut flipper = prepared(0.01, 100.0, 1);
        let (mut l, mut r) = ([0.0_f32], [0.0_f32]);
        flipper.process(&mut [&mut l[..], &mut r[..]]).unwrap();
        assert!(!flipper.is_flipped());
        flipper.reset();
        assert!(flipper.is_flipped());
    }

    #[test]
    fn host_range_clamps() {
        let mut flipper = StereoFlipper::new();
        flipper.set_param(0, 0.0);
        assert_eq!(flipper.get_param(0), 0.01);
        flipper.set_param(0, 10.0);
        assert_eq!(flipper.get_param(0), 2.5);
        assert_eq!(flipper.find_param_by_name("flip period"), Some(0));
    }

    #[test]
    fn unprepared_is_error() {
        let mut flipper = StereoFlipper::new();
        let (mut l, mut r) = ([0.0_f32], [0.0_f32]);
        assert_eq!(
            flipper.process(&mut [&mut l[..], &mut r[..]]),
            Err(EngineError::NotPrepared)
        );
    }
}
