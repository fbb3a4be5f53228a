//! Lock-free peak metering from the audio thread to a display thread.
//!
//! [`PeakMeter`] is the audio-side writer; [`PeakReader`] is a cloneable
//! handle for any number of readers. Both point at the same per-channel
//! cells, each an `f32` peak stored in an `AtomicU32`.
//!
//! Writers use `fetch_max` on the raw bit pattern. For non-negative
//! IEEE-754 floats the bit patterns order the same way as the values, so the
//! update is a single atomic instruction with no retry loop. Readers may see
//! one channel updated before another; each channel is independent.
//!
//! Peaks only grow until a reader calls [`PeakReader::take`],
//! [`PeakReader::reset`] or [`PeakReader::decay`].

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};

fn cells(channels: usize) -> Arc<[AtomicU32]> {
    (0..channels)
        .map(|_| AtomicU32::new(0))
        .collect::<Vec<_>>()
        .into()
}

/// Audio-thread side of a peak meter.
///
/// # Example
///
/// ```rust
/// use sencillo_core::PeakMeter;
///
/// let meter = PeakMeter::new(2);
/// let reader = meter.reader();
///
/// meter.record(0, -0.8);
/// meter.record(0, 0.3);
/// meter.record(1, 0.5);
///
/// assert_eq!(reader.left(), 0.8);
/// assert_eq!(reader.right(), 0.5);
/// ```
#[derive(Debug)]
pub struct PeakMeter {
    cells: Arc<[AtomicU32]>,
}

impl PeakMeter {
    /// Create a meter with `channels` cells, all at 0. Allocates.
    pub fn new(channels: usize) -> Self {
        Self {
            cells: cells(channels),
        }
    }

    /// Number of metered channels.
    pub fn channels(&self) -> usize {
        self.cells.len()
    }

    /// Raise the peak of `channel` to `|sample|` if larger.
    ///
    /// NaN and out-of-range channels are ignored.
    #[inline]
    pub fn record(&self, channel: usize, sample: f32) {
        let magnitude = sample.abs();
        if magnitude.is_nan() {
            return;
        }
        if let Some(cell) = self.cells.get(channel) {
            cell.fetch_max(magnitude.to_bits(), Ordering::AcqRel);
        }
    }

    /// Record the largest magnitude in `block` for `channel`.
    ///
    /// One atomic operation per call, regardless of block length.
    #[inline]
    pub fn record_block(&self, channel: usize, block: &[f32]) {
        let peak = block
            .iter()
            .fold(0.0_f32, |acc, &s| if s.abs() > acc { s.abs() } else { acc });
        self.record(channel, peak);
    }

    /// A reader handle sharing this meter's cells.
    pub fn reader(&self) -> PeakReader {
        PeakReader {
            cells: Arc::clone(&self.cells),
        }
    }
}

/// Display-thread side of a peak meter. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PeakReader {
    cells: Arc<[AtomicU32]>,
}

impl PeakReader {
    /// Peak of `channel`, or 0.0 if the channel does not exist.
    pub fn peak(&self, channel: usize) -> f32 {
        self.cells
            .get(channel)
            .map_or(0.0, |c| f32::from_bits(c.load(Ordering::Acquire)))
    }

    /// Peak of channel 0.
    pub fn left(&self) -> f32 {
        self.peak(0)
    }

    /// Peak of channel 1.
    pub fn right(&self) -> f32 {
        self.peak(1)
    }

    /// Read and reset channel `channel`.
    pub fn take_channel(&self, channel: usize) -> f32 {
        self.cells
            .get(channel)
            .map_or(0.0, |c| f32::from_bits(c.swap(0, Ordering::AcqRel)))
    }

    /// Read and reset both stereo peaks, returning `(left, right)`.
    pub fn take(&self) -> (f32, f32) {
        (self.take_channel(0), self.take_channel(1))
    }

    /// Reset every channel to 0.
    pub fn reset(&self) {
        for cell in self.cells.iter() {
            cell.store(0, Ordering::Release);
        }
    }

    /// Multiply every peak by `factor` (clamped to `[0, 1]`), for meter ballistics.
    ///
    /// A concurrent larger `record` always wins.
    pub fn decay(&self, factor: f32) {
        let factor = if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) };
        for cell in self.cells.iter() {
            // Display thread only; a retry here never blocks the writer
            let _ = cell.fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some((f32::from_bits(bits) * factor).to_bits())
            });
        }
    }

    /// Number of metered channels.
    pub fn channels(&self) -> usize {
        self.cells.len()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn peaks_start_at_zero() {
        let meter = PeakMeter::new(2);
        let reader = meter.reader();
        assert_eq!(reader.left(), 0.0);
        assert_eq!(reader.right(), 0.0);
        assert_eq!(reader.channels(), 2);
    }

    #[test]
    fn peak_is_non_decreasing() {
        let meter = PeakMeter::new(1);
        let reader = meter.reader();
        let mut last = 0.0;
        for s in [0.1_f32, -0.4, 0.2, 0.39, -0.9, 0.0, 0.5] {
            meter.record(0, s);
            let now = reader.left();
            assert!(now >= last);
            last = now;
        }
        assert_eq!(last, 0.9);
    }

    #[test]
    fn nan_and_bad_channel_ignored() {
        let meter = PeakMeter::new(1);
        let reader = meter.reader();
        meter.record(0, 0.25);
        meter.record(0, f32::NAN);
        meter.record(7, 1.0);
        assert_eq!(reader.left(), 0.25);
        assert_eq!(reader.peak(7), 0.0);
    }

    #[test]
    fn take_resets() {
        let meter = PeakMeter::new(2);
        let reader = meter.reader();
        meter.record(0, 0.7);
        meter.record(1, -0.2);
        assert_eq!(reader.take(), (0.7, 0.2));
        assert_eq!(reader.take(), (0.0, 0.0));
    }

    #[test]
    fn decay_scales_peaks() {
        let meter = PeakMeter::new(2);
        let reader = meter.reader();
        meter.record(0, 0.8);
        meter.record(1, 0.4);
        reader.decay(0.5);
        assert_eq!(reader.left(), 0.4);
        assert_eq!(reader.right(), 0.2);
        reader.decay(-3.0);
        assert_eq!(reader.left(), 0.0);
    }

    #[test]
    fn record_block_uses_max_magnitude() {
        let meter = PeakMeter::new(1);
        meter.record_block(0, &[0.1, -0.6, 0.5]);
        assert_eq!(meter.reader().left(), 0.6);
    }

    #[test]
    fn readers_share_cells() {
        let meter = PeakMeter::new(2);
        let a = meter.reader();
        let b = a.clone();
        meter.record(1, 0.3);
        assert_eq!(a.right(), 0.3);
        b.reset();
        assert_eq!(a.right(), 0.0);
    }

    #[test]
    fn concurrent_writer_and_reader() {
        let meter = PeakMeter::new(1);
        let reader = meter.reader();
        let writer = std::thread::spawn(move || {
            for i in 0..=1000 {
                meter.record(0, i as f32 / 1000.0);
            }
        });
        let mut last = 0.0;
        while !writer.is_finished() {
            let now = reader.left();
            assert!(now >= last);
            last = now;
        }
        writer.join().unwrap();
        assert_eq!(reader.left(), 1.0);
    }
}
