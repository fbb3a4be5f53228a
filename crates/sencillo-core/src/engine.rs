//! Core [`Engine`] trait and block validation.
//!
//! Every effect in sencillo is a leaf component driven by a thin host
//! adapter through the same narrow lifecycle:
//!
//! 1. [`Engine::prepare`] with a [`ProcessSpec`], off the audio thread. This is
//!    the only place an engine may allocate.
//! 2. [`Engine::process`] once per block on the audio thread. No allocation,
//!    no locks, bounded time.
//! 3. [`Engine::reset`] on transport discontinuities.
//! 4. [`Engine::release`] when the stream stops.
//!
//! ## Design Decisions
//!
//! - **Composition**: engines don't inherit from a host base class. The host
//!   adapter owns an engine and calls into it.
//!
//! - **Planar blocks**: a block is `&mut [&mut [f32]]`, one slice per channel,
//!   all of equal length, processed in place.
//!
//! - **Object-safe**: `Box<dyn Engine>` works, which is how the registry hands
//!   engines out.

use crate::EngineError;

/// Stream configuration passed to [`Engine::prepare`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Largest block the host will pass to `process`.
    pub max_block_size: usize,
    /// Number of channels in every block.
    pub channels: usize,
}

impl ProcessSpec {
    /// Create a new spec.
    pub const fn new(sample_rate: f32, max_block_size: usize, channels: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
            channels,
        }
    }

    /// Check that the sample rate is usable.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.sample_rate.is_finite() && self.sample_rate > 0.0 {
            Ok(())
        } else {
            Err(EngineError::InvalidSampleRate(self.sample_rate))
        }
    }
}

impl Default for ProcessSpec {
    fn default() -> Self {
        Self::new(48000.0, 512, 2)
    }
}

/// Narrow processing interface implemented by every engine.
///
/// # Example
///
/// ```rust
/// use sencillo_core::{Engine, EngineError, ProcessSpec, validate_block};
///
/// struct Invert {
///     spec: Option<ProcessSpec>,
/// }
///
/// impl Engine for Invert {
///     fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), EngineError> {
///         spec.validate()?;
///         self.spec = Some(*spec);
///         Ok(())
///     }
///
///     fn process(&mut self, block: &mut [&mut [f32]]) -> Result<(), EngineError> {
///         validate_block(block, self.spec.as_ref(), 1)?;
///         for channel in block.iter_mut() {
///             for sample in channel.iter_mut() {
///                 *sample = -*sample;
///             }
///         }
///         Ok(())
///     }
///
///     fn reset(&mut self) {}
/// }
///
/// let mut invert = Invert { spec: None };
/// invert.prepare(&ProcessSpec::new(48000.0, 4, 1)).unwrap();
/// let mut data = [0.5_f32, -0.25];
/// invert.process(&mut [&mut data[..]]).unwrap();
/// assert_eq!(data, [-0.5, 0.25]);
/// ```
pub trait Engine {
    /// Allocate buffers and derive sample-rate-dependent state.
    ///
    /// May be called again to re-prepare for a new configuration; any
    /// previous state is discarded.
    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), EngineError>;

    /// Process one block in place.
    ///
    /// Must be preceded by a successful [`prepare`](Self::prepare).
    fn process(&mut self, block: &mut [&mut [f32]]) -> Result<(), EngineError>;

    /// Clear internal history without deallocating.
    fn reset(&mut self);

    /// Free buffers allocated in `prepare`.
    ///
    /// Idempotent. Default does nothing, for engines that own no buffers.
    fn release(&mut self) {}

    /// Minimum number of channels a block must carry.
    fn min_channels(&self) -> usize {
        1
    }
}

/// Validate a block against the prepared spec.
///
/// Returns the block length (samples per channel) on success.
///
/// Checks, in order: the engine is prepared, the block has at least
/// `min_channels` and at most `spec.channels` channels, every channel has
/// the same length, and that length fits within `spec.max_block_size`.
pub fn validate_block(
    block: &[&mut [f32]],
    spec: Option<&ProcessSpec>,
    min_channels: usize,
) -> Result<usize, EngineError> {
    let spec = spec.ok_or(EngineError::NotPrepared)?;

    if block.len() < min_channels {
        return Err(EngineError::ChannelCount {
            expected: min_channels,
            actual: block.len(),
        });
    }
    if block.len() > spec.channels {
        return Err(EngineError::TooManyChannels {
            prepared: spec.channels,
            actual: block.len(),
        });
    }

    let len = block.first().map_or(0, |c| c.len());
    for (channel, data) in block.iter().enumerate().skip(1) {
        if data.len() != len {
            return Err(EngineError::RaggedBlock {
                channel,
                expected: len,
                actual: data.len(),
            });
        }
    }

    if len > spec.max_block_size {
        return Err(EngineError::BlockTooLarge {
            max: spec.max_block_size,
            actual: len,
        });
    }

    Ok(len)
}
