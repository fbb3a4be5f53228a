//! Stereo gain stage with peak metering.

use sencillo_core::{
    Engine, EngineError, ParamDescriptor, ParamId, ParamUnit, PeakMeter, PeakReader,
    ProcessSpec, validate_block,
};

const LEFT_GAIN: ParamDescriptor =
    ParamDescriptor::new("Left Gain", "L Gain", ParamUnit::Gain, 0.0, 2.0, 1.0)
        .with_id(ParamId(500), "gm_left_gain");
const RIGHT_GAIN: ParamDescriptor =
    ParamDescriptor::new("Right Gain", "R Gain", ParamUnit::Gain, 0.0, 2.0, 1.0)
        .with_id(ParamId(501), "gm_right_gain");
const MAIN_GAIN: ParamDescriptor =
    ParamDescriptor::new("Main Gain", "Main", ParamUnit::Gain, 0.0, 2.0, 1.0)
        .with_id(ParamId(502), "gm_main_gain");

/// Per-channel gain times a main gain, with a running peak per channel.
///
/// Peaks are published through a [`PeakMeter`]; the display side holds a
/// [`PeakReader`] from [`peak_reader`](Self::peak_reader) and decides when
/// to decay or reset them. The audio thread only ever raises a peak.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Left Gain | 0.0–2.0 | 1.0 |
/// | 1 | Right Gain | 0.0–2.0 | 1.0 |
/// | 2 | Main Gain | 0.0–2.0 | 1.0 |
///
/// # Example
///
/// ```rust
/// use sencillo_core::{Engine, ProcessSpec};
/// use sencillo_effects::GainMeterStage;
///
/// let mut stage = GainMeterStage::new();
/// let meter = stage.peak_reader();
/// stage.prepare(&ProcessSpec::new(48000.0, 4, 2)).unwrap();
///
/// let mut left = [0.5_f32, -0.8, 0.1, 0.0];
/// let mut right = [0.25_f32; 4];
/// stage.process_stereo(&mut left, &mut right, 1.0, 2.0, 0.5).unwrap();
///
/// assert!((meter.left() - 0.4).abs() < 1e-6);
/// assert!((meter.right() - 0.25).abs() < 1e-6);
/// ```
#[derive(Debug)]
pub struct GainMeterStage {
    left_gain: f32,
    right_gain: f32,
    main_gain: f32,
    meter: PeakMeter,
    spec: Option<ProcessSpec>,
}

impl Default for GainMeterStage {
    fn default() -> Self {
        Self::new()
    }
}

impl GainMeterStage {
    /// Create a unity-gain stage with zeroed peaks.
    pub fn new() -> Self {
        Self {
            left_gain: 1.0,
            right_gain: 1.0,
            main_gain: 1.0,
            meter: PeakMeter::new(2),
            spec: None,
        }
    }

    /// Set all three gains.
    pub fn set_gains(&mut self, left: f32, right: f32, main: f32) {
        self.left_gain = left;
        self.right_gain = right;
        self.main_gain = main;
    }

    /// Current `(left, right, main)` gains.
    pub fn gains(&self) -> (f32, f32, f32) {
        (self.left_gain, self.right_gain, self.main_gain)
    }

    /// Display-side handle onto the peaks. Can be taken before `prepare`.
    pub fn peak_reader(&self) -> PeakReader {
        self.meter.reader()
    }

    /// Apply explicit gains to a stereo pair and update the peaks.
    ///
    /// Peaks are tracked locally and published once per channel per call.
    pub fn process_stereo(
        &mut self,
        left: &mut [f32],
        right: &mut [f32],
        left_gain: f32,
        right_gain: f32,
        main_gain: f32,
    ) -> Result<(), EngineError> {
        let mut block = [left, right];
        validate_block(&block, self.spec.as_ref(), 2)?;
        self.set_gains(left_gain, right_gain, main_gain);
        let [left, right] = &mut block;
        self.apply(left, right);
        Ok(())
    }

    fn apply(&self, left: &mut [f32], right: &mut [f32]) {
        let gains = [self.left_gain * self.main_gain, self.right_gain * self.main_gain];
        for (channel, (samples, gain)) in [left, right].into_iter().zip(gains).enumerate() {
            for s in samples.iter_mut() {
                *s *= gain;
            }
            self.meter.record_block(channel, samples);
        }
    }
}

impl Engine for GainMeterStage {
    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), EngineError> {
        spec.validate()?;
        self.spec = Some(*spec);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = spec.sample_rate,
            channels = spec.channels,
            "gain meter prepared"
        );

        Ok(())
    }

    fn process(&mut self, block: &mut [&mut [f32]]) -> Result<(), EngineError> {
        validate_block(block, self.spec.as_ref(), 2)?;
        if let [left, right, ..] = block {
            self.apply(left, right);
        }
        Ok(())
    }

    /// Peaks belong to the display side and survive a reset.
    fn reset(&mut self) {}

    fn release(&mut self) {
        self.spec = None;
    }

    fn min_channels(&self) -> usize {
        2
    }
}

sencillo_core::impl_params! {
    GainMeterStage, this {
        [0] LEFT_GAIN,
            get: this.left_gain,
            set: |v| this.left_gain = LEFT_GAIN.clamp(v);

        [1] RIGHT_GAIN,
            get: this.right_gain,
            set: |v| this.right_gain = RIGHT_GAIN.clamp(v);

        [2] MAIN_GAIN,
            get: this.main_gain,
            set: |v| this.main_gain = MAIN_GAIN.clamp(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sencillo_core::ParameterInfo;

    fn prepared(channels: usize) -> GainMeterStage {
        let mut stage = GainMeterStage::new();
        stage
            .prepare(&ProcessSpec::new(48000.0, 64, channels))
            .unwrap();
        stage
    }

    #[test]
    fn zero_gain_silences() {
        let mut stage = prepared(2);
        let meter = stage.peak_reader();
        let mut l = [0.9_f32; 16];
        let mut r = [-0.9_f32; 16];
        stage.process_stereo(&mut l, &mut r, 1.0, 1.0, 0.0).unwrap();
        assert!(l.iter().chain(r.iter()).all(|&s| s == 0.0));
        assert_eq!(meter.take(), (0.0, 0.0));
    }

    #[test]
    fn unity_gain_is_identity() {
        let mut stage = prepared(2);
        let input = [0.1_f32, -0.7, 0.3, 0.0];
        let (mut l, mut r) = (input, input);
        stage.process(&mut [&mut l[..], &mut r[..]]).unwrap();
        assert_eq!(l, input);
        assert_eq!(r, input);
        assert!((stage.peak_reader().left() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn peaks_hold_until_taken() {
        let mut stage = prepared(2);
        let meter = stage.peak_reader();

        let (mut l, mut r) = ([0.8_f32; 4], [0.2_f32; 4]);
        stage.process(&mut [&mut l[..], &mut r[..]]).unwrap();
        let (mut l, mut r) = ([0.1_f32; 4], [0.1_f32; 4]);
        stage.process(&mut [&mut l[..], &mut r[..]]).unwrap();
        assert!((meter.left() - 0.8).abs() < 1e-6);

        let taken = meter.take();
        assert!((taken.1 - 0.2).abs() < 1e-6);
        assert_eq!(meter.left(), 0.0);
    }

    #[test]
    fn peak_is_post_gain_magnitude() {
        let mut stage = prepared(2);
        let meter = stage.peak_reader();
        let mut l = [0.2_f32, -0.5, 0.4];
        let mut r = [0.1_f32, 0.3, -0.25];
        stage.process_stereo(&mut l, &mut r, 2.0, 0.5, 0.5).unwrap();
        assert_eq!(l, [0.2, -0.5, 0.4]);
        assert_eq!(meter.left(), 0.5);
        assert_eq!(meter.right(), 0.075);
    }

    #[test]
    fn extra_channels_untouched() {
        let mut stage = prepared(3);
        stage.set_gains(0.5, 0.5, 0.5);
        let mut l = [1.0_f32; 4];
        let mut r = [1.0_f32; 4];
        let mut c = [1.0_f32; 4];
        stage
            .process(&mut [&mut l[..], &mut r[..], &mut c[..]])
            .unwrap();
        assert_eq!(l, [0.25; 4]);
        assert_eq!(c, [1.0; 4]);
    }

    #[test]
    fn mono_rejected() {
        let mut stage = prepared(2);
        let mut data = [1.0_f32; 4];
        assert_eq!(
            stage.process(&mut [&mut data[..]]),
            Err(EngineError::ChannelCount {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(data, [1.0; 4]);
    }

    #[test]
    fn reset_keeps_peaks() {
        let mut stage = prepared(2);
        let (mut l, mut r) = ([0.5_f32; 2], [0.5_f32; 2]);
        stage.process(&mut [&mut l[..], &mut r[..]]).unwrap();
        stage.reset();
        assert!((stage.peak_reader().right() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn host_params() {
        let mut stage = GainMeterStage::new();
        stage.set_param(2, 3.0);
        assert_eq!(stage.get_param(2), 2.0);
        stage.set_param(0, -1.0);
        assert_eq!(stage.gains().0, 0.0);
        assert_eq!(stage.find_param_by_name("main gain"), Some(2));
    }
}
