//! Sencillo Effects - real-time audio engines
//!
//! Five block-processing engines built on `sencillo-core`:
//!
//! - [`WaveFolder`] - Triangular wave folding above a threshold
//! - [`FilterStage`] - Resonant state-variable low-pass, one filter per channel
//! - [`DelayReverbEngine`] - Feedback comb delay followed by a Freeverb tank
//! - [`StereoFlipper`] - Square-wave left/right swapping
//! - [`GainMeterStage`] - Left/right/main gain with lock-free peak metering
//!
//! [`EngineRegistry`] creates any of them by id.
//!
//! ## Example
//!
//! ```rust
//! use sencillo_core::{Engine, ParameterInfo, ProcessSpec};
//! use sencillo_effects::{FilterStage, WaveFolder};
//!
//! let spec = ProcessSpec::new(48000.0, 128, 2);
//!
//! let mut folder = WaveFolder::new();
//! folder.set_threshold(0.5).unwrap();
//! folder.prepare(&spec).unwrap();
//!
//! let mut filter = FilterStage::new();
//! filter.set_param(0, 2000.0);
//! filter.prepare(&spec).unwrap();
//!
//! let mut left = [0.9_f32; 128];
//! let mut right = [-0.9_f32; 128];
//! let mut block = [&mut left[..], &mut right[..]];
//! folder.process(&mut block).unwrap();
//! filter.process(&mut block).unwrap();
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod delay_reverb;
pub mod filter;
pub mod freeverb;
pub mod gain_meter;
pub mod registry;
pub mod stereo_flipper;
pub mod wave_folder;

pub use delay_reverb::{DelayReverbEngine, DelayReverbParams};
pub use filter::FilterStage;
pub use freeverb::{Freeverb, FreeverbParams};
pub use gain_meter::GainMeterStage;
pub use registry::{EngineCategory, EngineDescriptor, EngineRegistry};
pub use stereo_flipper::StereoFlipper;
pub use wave_folder::WaveFolder;
