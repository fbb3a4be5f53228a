//! Wave-folding distortion.
//!
//! Every sample of every channel goes through [`wave_fold`]: whenever the
//! magnitude crosses the threshold it is reflected back toward zero, so a
//! hot sine turns into a bright, ringing triangle-like wave instead of
//! clipping flat.

use sencillo_core::{
    Engine, EngineError, ParamDescriptor, ParamId, ParamUnit, ProcessSpec, validate_block,
    wave_fold,
};

/// Smallest threshold reachable through [`ParameterInfo`](sencillo_core::ParameterInfo).
///
/// The control range starts at 0, but a zero threshold has no fold, so host
/// values below this are raised to it.
pub const MIN_THRESHOLD: f32 = 1e-3;

/// Wave folder engine.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Threshold | 0.0–1.0 | 1.0 |
///
/// # Example
///
/// ```rust
/// use sencillo_core::{Engine, ProcessSpec};
/// use sencillo_effects::WaveFolder;
///
/// let mut folder = WaveFolder::new();
/// folder.set_threshold(1.0).unwrap();
/// folder.prepare(&ProcessSpec::new(48000.0, 4, 1)).unwrap();
///
/// let mut data = [0.5_f32, 1.2, -1.5, 2.0];
/// folder.process(&mut [&mut data[..]]).unwrap();
/// assert_eq!(data[0], 0.5);
/// assert!((data[1] - 0.8).abs() < 1e-6);
/// assert!((data[2] + 0.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct WaveFolder {
    threshold: f32,
    spec: Option<ProcessSpec>,
}

impl Default for WaveFolder {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveFolder {
    /// Create a wave folder with threshold 1.0.
    pub fn new() -> Self {
        Self {
            threshold: 1.0,
            spec: None,
        }
    }

    /// Set the fold threshold.
    ///
    /// Any positive finite value is accepted. Zero, negative and non-finite
    /// thresholds are rejected and the previous value is kept.
    pub fn set_threshold(&mut self, threshold: f32) -> Result<(), EngineError> {
        if threshold.is_finite() && threshold > 0.0 {
            self.threshold = threshold;
            Ok(())
        } else {
            Err(EngineError::InvalidParameter {
                name: "threshold",
                value: threshold,
            })
        }
    }

    /// Current fold threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Fold one sample with the current threshold.
    #[inline]
    pub fn fold(&self, sample: f32) -> f32 {
        wave_fold(sample, self.threshold)
    }
}

impl Engine for WaveFolder {
    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), EngineError> {
        spec.validate()?;
        self.spec = Some(*spec);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = spec.sample_rate,
            channels = spec.channels,
            "wave folder prepared"
        );

        Ok(())
    }

    fn process(&mut self, block: &mut [&mut [f32]]) -> Result<(), EngineError> {
        validate_block(block, self.spec.as_ref(), 1)?;

        let threshold = self.threshold;
        for channel in block.iter_mut() {
            for sample in channel.iter_mut() {
                *sample = wave_fold(*sample, threshold);
            }
        }
        Ok(())
    }

    fn reset(&mut self) {}

    fn release(&mut self) {
        self.spec = None;
    }
}

sencillo_core::impl_params! {
    WaveFolder, this {
        [0] ParamDescriptor::new("Threshold", "Thresh", ParamUnit::None, 0.0, 1.0, 1.0)
                .with_id(ParamId(100), "wf_threshold"),
            get: this.threshold,
            set: |v| this.threshold = if v.is_nan() { 1.0 } else { v.clamp(MIN_THRESHOLD, 1.0) };
    }
}
