//! WAV file I/O as planar `f32` channels.

use std::path::Path;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

/// Decoded audio: one `Vec` per channel, all the same length.
#[derive(Debug, Clone)]
pub struct Audio {
    /// Planar samples.
    pub channels: Vec<Vec<f32>>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Audio {
    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Largest absolute sample across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flatten()
            .fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }
}

/// Read a WAV file (integer or float, any channel count).
pub fn read_wav(path: &Path) -> Result<Audio> {
    let reader =
        WavReader::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();
    let channel_count = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .with_context(|| format!("failed to decode {}", path.display()))?,
        SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .with_context(|| format!("failed to decode {}", path.display()))?
        }
    };

    let frames = interleaved.len() / channel_count;
    let mut channels = vec![Vec::with_capacity(frames); channel_count];
    for frame in interleaved.chunks_exact(channel_count) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    Ok(Audio {
        channels,
        sample_rate: spec.sample_rate,
    })
}

/// Write planar channels as a WAV file. `bits` is 16 or 24 (integer) or
/// 32 (float).
pub fn write_wav(path: &Path, audio: &Audio, bits: u16) -> Result<()> {
    let spec = WavSpec {
        channels: u16::try_from(audio.channels.len()).context("too many channels for WAV")?,
        sample_rate: audio.sample_rate,
        bits_per_sample: bits,
        sample_format: if bits == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };
    let mut writer =
        WavWriter::create(path, spec).with_context(|| format!("failed to create {}", path.display()))?;

    let max = (1_i64 << (bits - 1)) as f32;
    for frame in 0..audio.frames() {
        for channel in &audio.channels {
            let sample = channel[frame];
            if bits == 32 {
                writer.write_sample(sample)?;
            } else {
                writer.write_sample((sample * max).clamp(-max, max - 1.0) as i32)?;
            }
        }
    }

    writer
        .finalize()
        .with_context(|| format!("failed to finish {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio() -> Audio {
        Audio {
            channels: vec![vec![0.0, 0.5, -0.5, 0.25], vec![0.1, -0.1, 0.2, -0.2]],
            sample_rate: 44100,
        }
    }

    #[test]
    fn float_roundtrip_keeps_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f32.wav");
        write_wav(&path, &audio(), 32).unwrap();

        let back = read_wav(&path).unwrap();
        assert_eq!(back.sample_rate, 44100);
        assert_eq!(back.channels, audio().channels);
    }

    #[test]
    fn int16_roundtrip_is_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("i16.wav");
        write_wav(&path, &audio(), 16).unwrap();

        let back = read_wav(&path).unwrap();
        for (a, b) in back.channels.iter().flatten().zip(audio().channels.iter().flatten()) {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn peak_spans_channels() {
        assert_eq!(audio().peak(), 0.5);
        assert_eq!(audio().frames(), 4);
    }
}
