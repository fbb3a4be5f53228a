//! Feedback comb delay followed by a Freeverb tank.
//!
//! Each block goes through two passes. The comb pass runs a per-channel
//! circular delay with feedback:
//!
//! ```text
//! fb  = feedback × ring[write_head − delay]
//! out = input + mix × fb
//! ring[write_head] = out
//! ```
//!
//! The reverb pass then runs the whole block through [`Freeverb`]. Mono
//! blocks use the left tank; with two or more channels the first two share
//! the stereo tank and any further channels keep the comb pass alone.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use sencillo_core::{
    CircularDelay, Engine, EngineError, ParamDescriptor, ParamId, ParamUnit, ProcessSpec,
    flush_denormal, validate_block, wet_dry_mix,
};

use crate::freeverb::{Freeverb, FreeverbParams};

/// Default longest delay the rings are sized for, in seconds.
pub const DEFAULT_MAX_DELAY: f32 = 0.1;

const DEFAULT_DELAY_TIME: f32 = 0.05;

/// Full control set for [`DelayReverbEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayReverbParams {
    /// Reverb dry level.
    pub dry: f32,
    /// Reverb wet level.
    pub wet: f32,
    /// Reverb room size.
    pub size: f32,
    /// Reverb damping.
    pub damping: f32,
    /// Reverb stereo width.
    pub width: f32,
    /// Reverb freeze (on at ≥ 0.5).
    pub freeze: f32,
    /// Comb wet/dry mix.
    pub mix: f32,
    /// Comb delay in seconds.
    pub delay_time: f32,
    /// Comb feedback gain. Values ≥ 1 are accepted and grow the signal.
    pub feedback: f32,
}

impl Default for DelayReverbParams {
    fn default() -> Self {
        Self {
            dry: 0.75,
            wet: 0.25,
            size: 0.5,
            damping: 0.5,
            width: 0.75,
            freeze: 0.0,
            mix: 1.0,
            delay_time: DEFAULT_DELAY_TIME,
            feedback: 0.5,
        }
    }
}

impl DelayReverbParams {
    fn reverb(&self) -> FreeverbParams {
        FreeverbParams {
            room_size: self.size,
            damping: self.damping,
            wet: self.wet,
            dry: self.dry,
            width: self.width,
            freeze: self.freeze,
        }
    }
}

/// Delay-line comb plus algorithmic reverb.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Dry | 0.0–1.0 | 0.75 |
/// | 1 | Wet | 0.0–1.0 | 0.25 |
/// | 2 | Size | 0.0–1.0 | 0.5 |
/// | 3 | Damping | 0.0–1.0 | 0.5 |
/// | 4 | Width | 0.0–1.0 | 0.75 |
/// | 5 | Freeze | 0.0–1.0 | 0.0 |
/// | 6 | Mix | 0.0–1.0 | 1.0 |
/// | 7 | Delay Time | 0.0–max delay s | 0.05 |
/// | 8 | Feedback | 0.0–1.0 | 0.5 |
///
/// # Example
///
/// ```rust
/// use sencillo_core::{Engine, ProcessSpec};
/// use sencillo_effects::DelayReverbEngine;
///
/// let mut engine = DelayReverbEngine::new();
/// engine.prepare(&ProcessSpec::new(48000.0, 512, 2)).unwrap();
///
/// let mut left = [0.0_f32; 512];
/// let mut right = [0.0_f32; 512];
/// left[0] = 1.0;
/// engine.process(&mut [&mut left[..], &mut right[..]]).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DelayReverbEngine {
    params: DelayReverbParams,
    max_delay: f32,
    rings: Vec<CircularDelay>,
    reverb: Freeverb,
    spec: Option<ProcessSpec>,
}

impl Default for DelayReverbEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayReverbEngine {
    /// Create an unprepared engine with a 0.1 s maximum delay.
    pub fn new() -> Self {
        let params = DelayReverbParams::default();
        let mut reverb = Freeverb::new();
        reverb.set_parameters(&params.reverb());
        Self {
            params,
            max_delay: DEFAULT_MAX_DELAY,
            rings: Vec::new(),
            reverb,
            spec: None,
        }
    }

    /// Create an engine whose rings hold up to `seconds` of delay.
    ///
    /// The default delay time is lowered to `seconds` if it would not fit.
    pub fn with_max_delay(seconds: f32) -> Result<Self, EngineError> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(EngineError::InvalidParameter {
                name: "max delay",
                value: seconds,
            });
        }
        let mut engine = Self::new();
        engine.max_delay = seconds;
        engine.params.delay_time = engine.params.delay_time.min(seconds);
        Ok(engine)
    }

    /// Longest delay the rings are sized for, in seconds.
    pub fn max_delay(&self) -> f32 {
        self.max_delay
    }

    /// Current control set.
    pub fn params(&self) -> &DelayReverbParams {
        &self.params
    }

    /// Replace the whole control set.
    ///
    /// Fails without changing anything if the delay time is negative or not
    /// finite. Other values are taken as given.
    pub fn set_params(&mut self, params: &DelayReverbParams) -> Result<(), EngineError> {
        check_delay_time(params.delay_time)?;
        self.params = *params;
        self.reverb.set_parameters(&params.reverb());
        Ok(())
    }

    /// Set the comb delay in seconds.
    ///
    /// Times longer than the ring are clamped when processing.
    pub fn set_delay_time(&mut self, seconds: f32) -> Result<(), EngineError> {
        check_delay_time(seconds)?;
        self.params.delay_time = seconds;
        Ok(())
    }

    /// Set the comb feedback gain. Values ≥ 1 are accepted.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.params.feedback = feedback;
    }

    /// Set the comb wet/dry mix.
    pub fn set_mix(&mut self, mix: f32) {
        self.params.mix = mix;
    }

    /// Access the reverb tank.
    pub fn reverb(&self) -> &Freeverb {
        &self.reverb
    }

    /// Comb delay in whole samples at the prepared rate, clamped to the ring.
    pub fn delay_samples(&self) -> usize {
        let (Some(spec), Some(ring)) = (self.spec.as_ref(), self.rings.first()) else {
            return 0;
        };
        ((self.params.delay_time * spec.sample_rate) as usize).min(ring.capacity() - 1)
    }

    /// Apply `params`, then process `block`.
    pub fn process_with_params(
        &mut self,
        block: &mut [&mut [f32]],
        params: &DelayReverbParams,
    ) -> Result<(), EngineError> {
        validate_block(block, self.spec.as_ref(), 1)?;
        self.set_params(params)?;
        self.process(block)
    }

    fn set_reverb_field(&mut self, apply: impl FnOnce(&mut DelayReverbParams)) {
        apply(&mut self.params);
        self.reverb.set_parameters(&self.params.reverb());
    }

    fn comb_pass(&mut self, block: &mut [&mut [f32]]) {
        let delay = self.delay_samples();
        let feedback = self.params.feedback;
        let mix = self.params.mix;

        for (channel, ring) in block.iter_mut().zip(self.rings.iter_mut()) {
            for sample in channel.iter_mut() {
                let input = *sample;
                let fb = feedback * ring.read_at(delay);
                let out = wet_dry_mix(input, input + fb, mix);
                ring.write(flush_denormal(out));
                *sample = out;
            }
        }
    }

    fn reverb_pass(&mut self, block: &mut [&mut [f32]]) {
        match block {
            [mono] => self.reverb.process_mono(mono),
            [left, right, ..] => self.reverb.process_stereo(left, right),
            [] => {}
        }
    }
}

fn check_delay_time(seconds: f32) -> Result<(), EngineError> {
    if seconds.is_finite() && seconds >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidParameter {
            name: "delay time",
            value: seconds,
        })
    }
}

impl Engine for DelayReverbEngine {
    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), EngineError> {
        spec.validate()?;

        let mut rings = Vec::new();
        rings
            .try_reserve_exact(spec.channels)
            .map_err(|_| EngineError::Allocation {
                samples: spec.channels,
            })?;
        for _ in 0..spec.channels {
            rings.push(CircularDelay::for_max_delay(
                spec.sample_rate,
                self.max_delay,
            )?);
        }
        self.reverb.prepare(spec.sample_rate)?;
        self.rings = rings;
        self.spec = Some(*spec);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = spec.sample_rate,
            channels = spec.channels,
            ring_capacity = self.rings.first().map_or(0, CircularDelay::capacity),
            "delay-reverb prepared"
        );

        Ok(())
    }

    fn process(&mut self, block: &mut [&mut [f32]]) -> Result<(), EngineError> {
        validate_block(block, self.spec.as_ref(), 1)?;
        self.comb_pass(block);
        self.reverb_pass(block);
        Ok(())
    }

    fn reset(&mut self) {
        for ring in &mut self.rings {
            ring.clear();
        }
        self.reverb.reset();
    }

    fn release(&mut self) {
        self.rings = Vec::new();
        self.reverb.release();
        self.spec = None;

        #[cfg(feature = "tracing")]
        tracing::debug!("delay-reverb released");
    }
}

const DRY: ParamDescriptor =
    ParamDescriptor::unit_interval("Dry", "Dry", 0.75).with_id(ParamId(300), "dr_dry");
const WET: ParamDescriptor =
    ParamDescriptor::unit_interval("Wet", "Wet", 0.25).with_id(ParamId(301), "dr_wet");
const SIZE: ParamDescriptor =
    ParamDescriptor::unit_interval("Size", "Size", 0.5).with_id(ParamId(302), "dr_size");
const DAMPING: ParamDescriptor =
    ParamDescriptor::unit_interval("Damping", "Damp", 0.5).with_id(ParamId(303), "dr_damping");
const WIDTH: ParamDescriptor =
    ParamDescriptor::unit_interval("Width", "Width", 0.75).with_id(ParamId(304), "dr_width");
const FREEZE: ParamDescriptor =
    ParamDescriptor::unit_interval("Freeze", "Freeze", 0.0).with_id(ParamId(305), "dr_freeze");
const MIX: ParamDescriptor =
    ParamDescriptor::unit_interval("Mix", "Mix", 1.0).with_id(ParamId(306), "dr_mix");
const FEEDBACK: ParamDescriptor = ParamDescriptor::unit_interval("Feedback", "Fdbk", 0.5)
    .with_id(ParamId(308), "dr_feedback");

/// Delay Time depends on the configured maximum, so it is built per engine.
fn delay_time_descriptor(max_delay: f32) -> ParamDescriptor {
    ParamDescriptor::new(
        "Delay Time",
        "Time",
        ParamUnit::Seconds,
        0.0,
        max_delay,
        DEFAULT_DELAY_TIME.min(max_delay),
    )
    .with_id(ParamId(307), "dr_delay_time")
    .with_step(0.001)
}

sencillo_core::impl_params! {
    DelayReverbEngine, this {
        [0] DRY,
            get: this.params.dry,
            set: |v| this.set_reverb_field(|p| p.dry = DRY.clamp(v));

        [1] WET,
            get: this.params.wet,
            set: |v| this.set_reverb_field(|p| p.wet = WET.clamp(v));

        [2] SIZE,
            get: this.params.size,
            set: |v| this.set_reverb_field(|p| p.size = SIZE.clamp(v));

        [3] DAMPING,
            get: this.params.damping,
            set: |v| this.set_reverb_field(|p| p.damping = DAMPING.clamp(v));

        [4] WIDTH,
            get: this.params.width,
            set: |v| this.set_reverb_field(|p| p.width = WIDTH.clamp(v));

        [5] FREEZE,
            get: this.params.freeze,
            set: |v| this.set_reverb_field(|p| p.freeze = FREEZE.clamp(v));

        [6] MIX,
            get: this.params.mix,
            set: |v| this.params.mix = MIX.clamp(v);

        [7] delay_time_descriptor(this.max_delay),
            get: this.params.delay_time,
            set: |v| this.params.delay_time = delay_time_descriptor(this.max_delay).clamp(v);

        [8] FEEDBACK,
            get: this.params.feedback,
            set: |v| this.params.feedback = FEEDBACK.clamp(v);
    }
}
