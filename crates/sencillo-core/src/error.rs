//! Error type shared by every engine.
//!
//! Engines report configuration mistakes through [`EngineError`] instead of
//! coercing them into "safe" behavior: a wrong channel count or a call to
//! `process` before `prepare` would otherwise corrupt audio silently.
//!
//! Parameter-range anomalies (feedback ≥ 1, resonance outside its recommended
//! range) are *not* errors. They are accepted and processed as given.

use thiserror::Error;

/// Errors returned by engine lifecycle and processing calls.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EngineError {
    /// `process` was called before `prepare`, or after `release`.
    #[error("engine must be prepared before processing")]
    NotPrepared,

    /// The block does not carry the channel count this engine requires.
    #[error("expected at least {expected} channel(s), got {actual}")]
    ChannelCount {
        /// Minimum number of channels the engine needs.
        expected: usize,
        /// Number of channels in the block.
        actual: usize,
    },

    /// The block has more channels than the engine was prepared for.
    #[error("block has {actual} channel(s) but engine was prepared for {prepared}")]
    TooManyChannels {
        /// Channel count passed to `prepare`.
        prepared: usize,
        /// Number of channels in the block.
        actual: usize,
    },

    /// Channels in one block differ in length.
    #[error("channel {channel} holds {actual} samples, expected {expected}")]
    RaggedBlock {
        /// Index of the offending channel.
        channel: usize,
        /// Length of channel 0.
        expected: usize,
        /// Length of the offending channel.
        actual: usize,
    },

    /// The block is longer than the maximum block size given to `prepare`.
    #[error("block of {actual} samples exceeds prepared maximum of {max}")]
    BlockTooLarge {
        /// Maximum block size passed to `prepare`.
        max: usize,
        /// Length of the block.
        actual: usize,
    },

    /// Sample rate is zero, negative or not finite.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f32),

    /// A parameter value the algorithm cannot run with (e.g. a zero fold threshold).
    #[error("invalid value {value} for parameter '{name}'")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },

    /// Buffer allocation failed while preparing.
    #[error("failed to allocate {samples} samples of delay memory")]
    Allocation {
        /// Number of samples that could not be reserved.
        samples: usize,
    },
}
