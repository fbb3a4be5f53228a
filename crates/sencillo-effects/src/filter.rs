//! Resonant low-pass filter stage.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use sencillo_core::{
    Engine, EngineError, ParamDescriptor, ParamId, ParamScale, ParamUnit, ProcessSpec,
    StateVariableFilter, validate_block,
};

/// Low-pass filter stage: one state-variable filter per channel.
///
/// Cutoff and resonance are latched at the top of each block, so a change
/// made between blocks takes effect on the next block boundary.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Cutoff | 20.0–20000.0 Hz (log) | 500.0 |
/// | 1 | Resonance | 1.0–10.0 | 2.5 |
///
/// # Example
///
/// ```rust
/// use sencillo_core::{Engine, ProcessSpec};
/// use sencillo_effects::FilterStage;
///
/// let mut filter = FilterStage::new();
/// filter.prepare(&ProcessSpec::new(44100.0, 256, 2)).unwrap();
/// filter.set_parameters(1000.0, 0.707);
///
/// let mut left = [1.0_f32; 256];
/// let mut right = [1.0_f32; 256];
/// filter.process(&mut [&mut left[..], &mut right[..]]).unwrap();
/// assert!(left[255] > 0.9);
/// ```
#[derive(Debug, Clone)]
pub struct FilterStage {
    filters: Vec<StateVariableFilter>,
    cutoff: f32,
    resonance: f32,
    spec: Option<ProcessSpec>,
}

impl Default for FilterStage {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterStage {
    /// Create an unprepared filter stage (cutoff 500 Hz, resonance 2.5).
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            cutoff: 500.0,
            resonance: 2.5,
            spec: None,
        }
    }

    /// Set cutoff (Hz) and resonance (Q) for the next block.
    ///
    /// Cutoff is clamped below Nyquist when applied. Resonance outside
    /// 1–10 is accepted as given.
    pub fn set_parameters(&mut self, cutoff_hz: f32, resonance: f32) {
        self.cutoff = cutoff_hz;
        self.resonance = resonance;
    }

    /// Set cutoff in Hz.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff = cutoff_hz;
    }

    /// Current cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Set resonance (Q).
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance;
    }

    /// Current resonance (Q).
    pub fn resonance(&self) -> f32 {
        self.resonance
    }
}

impl Engine for FilterStage {
    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), EngineError> {
        spec.validate()?;

        let mut filters = Vec::new();
        filters
            .try_reserve_exact(spec.channels)
            .map_err(|_| EngineError::Allocation {
                samples: spec.channels,
            })?;
        for _ in 0..spec.channels {
            let mut svf = StateVariableFilter::new(spec.sample_rate);
            svf.set_params(self.cutoff, self.resonance);
            filters.push(svf);
        }
        self.filters = filters;
        self.spec = Some(*spec);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = spec.sample_rate,
            channels = spec.channels,
            "filter stage prepared"
        );

        Ok(())
    }

    fn process(&mut self, block: &mut [&mut [f32]]) -> Result<(), EngineError> {
        validate_block(block, self.spec.as_ref(), 1)?;

        for (channel, filter) in block.iter_mut().zip(self.filters.iter_mut()) {
            filter.set_params(self.cutoff, self.resonance);
            for sample in channel.iter_mut() {
                *sample = filter.process(*sample);
            }
        }
        Ok(())
    }

    fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
    }

    fn release(&mut self) {
        self.filters = Vec::new();
        self.spec = None;
    }
}

const CUTOFF: ParamDescriptor =
    ParamDescriptor::new("Cutoff", "Cutoff", ParamUnit::Hertz, 20.0, 20000.0, 500.0)
        .with_id(ParamId(200), "flt_cutoff")
        .with_scale(ParamScale::Logarithmic)
        .with_step(1.0);

const RESONANCE: ParamDescriptor =
    ParamDescriptor::new("Resonance", "Reso", ParamUnit::None, 1.0, 10.0, 2.5)
        .with_id(ParamId(201), "flt_resonance");

sencillo_core::impl_params! {
    FilterStage, this {
        [0] CUTOFF,
            get: this.cutoff,
            set: |v| this.cutoff = CUTOFF.clamp(v);

        [1] RESONANCE,
            get: this.resonance,
            set: |v| this.resonance = RESONANCE.clamp(v);
    }
}
