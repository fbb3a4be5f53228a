//! Circular delay buffer for feedback effects.
//!
//! [`CircularDelay`] keeps all the read/write-head arithmetic in one place so
//! call sites never do their own `mod` math.
//!
//! # Invariants
//!
//! - `write_head` is always the index of the *next* sample to be written.
//! - [`read_at`](CircularDelay::read_at) is meant to be called *before*
//!   [`write`](CircularDelay::write) in a sample iteration, so a read never
//!   aliases the sample written in the same iteration.
//! - `read_at(d)` returns the sample written `d` writes ago, for
//!   `1 <= d < capacity`. `read_at(0)` returns the oldest sample in the ring
//!   (the one about to be overwritten).
//!
//! # Sizing
//!
//! | Use | Capacity |
//! |-----|----------|
//! | Feedback comb, max delay `T` | `⌈2 × T × fs⌉` ([`CircularDelay::for_max_delay`]) |
//! | Fixed tuning (reverb combs) | exact tuning length ([`CircularDelay::new`]) |

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;
use libm::ceilf;

use crate::EngineError;

/// Fixed-capacity ring of samples with a single write head.
///
/// The buffer is allocated once at construction and never reallocates, so
/// reads and writes are safe on the audio thread.
///
/// # Example
///
/// ```rust
/// use sencillo_core::CircularDelay;
///
/// let mut ring = CircularDelay::new(8);
/// let mut out = Vec::new();
/// for x in 1..=6 {
///     out.push(ring.read_at(3));
///     ring.write(x as f32);
/// }
/// assert_eq!(out, [0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
/// ```
#[derive(Debug, Clone)]
pub struct CircularDelay {
    buffer: Vec<f32>,
    write_head: usize,
}

impl CircularDelay {
    /// Creates a ring holding `capacity` samples, all zero.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Delay capacity must be > 0");

        Self {
            buffer: vec![0.0; capacity],
            write_head: 0,
        }
    }

    /// Creates a ring, reporting allocation failure instead of aborting.
    ///
    /// Used by engines in `prepare`, where an allocation failure must reach
    /// the host before streaming starts.
    pub fn try_new(capacity: usize) -> Result<Self, EngineError> {
        let capacity = capacity.max(1);
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|_| EngineError::Allocation { samples: capacity })?;
        buffer.resize(capacity, 0.0);

        Ok(Self {
            buffer,
            write_head: 0,
        })
    }

    /// Capacity needed so a delay of `max_seconds` keeps a full buffer of
    /// headroom between read and write heads: `⌈2 × max_seconds × sample_rate⌉`.
    pub fn capacity_for(sample_rate: f32, max_seconds: f32) -> usize {
        (ceilf(2.0 * max_seconds.max(0.0) * sample_rate) as usize).max(1)
    }

    /// Creates a ring sized by [`capacity_for`](Self::capacity_for).
    pub fn for_max_delay(sample_rate: f32, max_seconds: f32) -> Result<Self, EngineError> {
        Self::try_new(Self::capacity_for(sample_rate, max_seconds))
    }

    /// Reads the sample written `offset` writes ago.
    ///
    /// `offset` is clamped to `capacity - 1`. The index is
    /// `(write_head − offset) mod capacity`.
    #[inline]
    pub fn read_at(&self, offset: usize) -> f32 {
        let len = self.buffer.len();
        let offset = offset.min(len - 1);
        self.buffer[(self.write_head + len - offset) % len]
    }

    /// Writes a sample at the write head and advances it.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_head] = sample;
        self.write_head += 1;
        if self.write_head == self.buffer.len() {
            self.write_head = 0;
        }
    }

    /// Zeroes the ring and rewinds the write head. Keeps the allocation.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_head = 0;
    }

    /// Number of samples the ring holds.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Index of the next sample to be written.
    pub fn write_head(&self) -> usize {
        self.write_head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_before_write_scenario() {
        // capacity 8, delay 3, feeding 1, 2, 3, ...
        let mut ring = CircularDelay::new(8);
        let mut outputs = [0.0_f32; 8];
        for (step, out) in outputs.iter_mut().enumerate() {
            *out = ring.read_at(3);
            ring.write((step + 1) as f32);
        }
        assert_eq!(outputs, [0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(outputs[3], 1.0);
    }

    #[test]
    fn test_wrap_boundary() {
        let mut ring = CircularDelay::new(4);

        for i in 1..=5 {
            ring.write(i as f32);
        }

        // write_head wrapped to 1; last written = 5, before that 4, 3
        assert_eq!(ring.write_head(), 1);
        assert_eq!(ring.read_at(1), 5.0);
        assert_eq!(ring.read_at(2), 4.0);
        assert_eq!(ring.read_at(3), 3.0);
    }

    #[test]
    fn test_offset_clamped_to_capacity() {
        let mut ring = CircularDelay::new(4);
        for i in 1..=4 {
            ring.write(i as f32);
        }
        // offset 100 behaves like offset 3
        assert_eq!(ring.read_at(100), ring.read_at(3));
    }

    #[test]
    fn test_zero_offset_reads_oldest() {
        let mut ring = CircularDelay::new(4);
        for i in 1..=4 {
            ring.write(i as f32);
        }
        // Slot at the write head holds the sample written `capacity` writes ago
        assert_eq!(ring.read_at(0), 1.0);
    }

    #[test]
    fn test_clear() {
        let mut ring = CircularDelay::new(4);
        for i in 1..=3 {
            ring.write(i as f32);
        }
        ring.clear();
        assert_eq!(ring.write_head(), 0);
        for offset in 0..4 {
            assert_eq!(ring.read_at(offset), 0.0);
        }
        assert_eq!(ring.capacity(), 4);
    }

    #[test]
    fn test_capacity_for_max_delay() {
        assert_eq!(CircularDelay::capacity_for(48000.0, 0.1), 9600);
        assert_eq!(CircularDelay::capacity_for(44100.0, 0.5), 44100);
        assert_eq!(CircularDelay::capacity_for(48000.0, 0.0), 1);

        let ring = CircularDelay::for_max_delay(1000.0, 0.25).unwrap();
        assert_eq!(ring.capacity(), 500);
    }

    #[test]
    #[should_panic]
    fn test_zero_capacity_panics() {
        let _ring = CircularDelay::new(0);
    }
}
