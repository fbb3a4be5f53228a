//! Sencillo Core - real-time DSP primitives for the sencillo engines
//!
//! Building blocks shared by every engine in `sencillo-effects`, designed
//! for block-based processing with zero allocation on the audio path.
//!
//! # Core Abstractions
//!
//! ## Engine Lifecycle
//!
//! - [`Engine`] - Object-safe `prepare` / `process` / `reset` / `release` trait
//! - [`ProcessSpec`] - Sample rate, maximum block size and channel count
//! - [`EngineError`] - Configuration and allocation errors
//! - [`validate_block`] - Shared block checks every engine runs first
//!
//! ## Delay and Reverb Building Blocks
//!
//! - [`CircularDelay`] - Fixed-capacity ring with one write head
//! - [`CombFilter`] - Damped feedback comb for reverb tanks
//! - [`AllpassFilter`] - Schroeder allpass for diffusion
//!
//! ## Filters
//!
//! - [`StateVariableFilter`] - TPT state-variable filter (lowpass output)
//!
//! ## Parameters and Metering
//!
//! - [`ParameterInfo`] / [`ParamDescriptor`] - Index-based parameter introspection
//! - [`EngineWithParams`] - Both of the above behind one trait object
//! - [`impl_params!`] - Table-driven `ParameterInfo` impls
//! - [`ParamBank`] / [`AtomicParam`] - Lock-free control-to-audio parameters
//! - [`PeakMeter`] / [`PeakReader`] - Lock-free audio-to-display peaks
//!
//! ## Utilities
//!
//! - Math functions: [`wave_fold`], [`linear_to_db`],
//!   [`flush_denormal`], [`wet_dry_mix`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! sencillo-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: allocation happens in `prepare` only
//! - **Fail loudly**: misuse returns an [`EngineError`] instead of producing
//!   plausible-looking audio
//! - **`libm` for math**: identical results with and without `std`

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod comb;
pub mod delay;
pub mod engine;
pub mod engine_with_params;
mod macros;
pub mod error;
pub mod math;
pub mod meter;
pub mod param;
pub mod param_info;
pub mod svf;

pub use allpass::AllpassFilter;
pub use comb::CombFilter;
pub use delay::CircularDelay;
pub use engine::{Engine, ProcessSpec, validate_block};
pub use engine_with_params::EngineWithParams;
pub use error::EngineError;
pub use math::{flush_denormal, linear_to_db, wave_fold, wet_dry_mix};
pub use meter::{PeakMeter, PeakReader};
pub use param::{AtomicParam, ParamBank};
pub use param_info::{ParamDescriptor, ParamId, ParamScale, ParamUnit, ParameterInfo};
pub use svf::{MIN_RESONANCE, StateVariableFilter};
