//! Lock-free parameter exchange between a control thread and the audio thread.
//!
//! Each control is an independent [`AtomicParam`]: an `f32` bit-cast into an
//! `AtomicU32`, stored with `Release` and loaded with `Acquire`. There is no
//! cross-parameter consistency; the audio thread reads a fresh value at the
//! top of each block, so a change can be up to one block late.
//!
//! [`ParamBank`] holds one cell per [`ParamDescriptor`] of an engine and is
//! shared through an `Arc`:
//!
//! ```rust
//! use sencillo_core::{ParamBank, ParamDescriptor, ParameterInfo};
//!
//! # struct Level { value: f32 }
//! # impl ParameterInfo for Level {
//! #     fn param_count(&self) -> usize { 1 }
//! #     fn param_info(&self, i: usize) -> Option<ParamDescriptor> {
//! #         (i == 0).then(|| ParamDescriptor::unit_interval("Level", "Level", 0.5))
//! #     }
//! #     fn get_param(&self, _: usize) -> f32 { self.value }
//! #     fn set_param(&mut self, _: usize, v: f32) { self.value = v.clamp(0.0, 1.0) }
//! # }
//! let mut engine = Level { value: 0.5 };
//! let bank = ParamBank::shared(&engine);
//!
//! // control thread
//! bank.set_by_name("level", 0.9);
//!
//! // audio thread, top of block
//! bank.apply_to(&mut engine);
//! assert_eq!(engine.value, 0.9);
//! ```

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::{ParamDescriptor, ParameterInfo};

/// A single `f32` control readable and writable from any thread.
#[derive(Debug)]
pub struct AtomicParam {
    value: AtomicU32,
    descriptor: ParamDescriptor,
}

impl AtomicParam {
    /// Create a cell holding the descriptor's default.
    pub fn new(descriptor: ParamDescriptor) -> Self {
        Self {
            value: AtomicU32::new(descriptor.default.to_bits()),
            descriptor,
        }
    }

    /// Store a value, clamped to the descriptor's range.
    #[inline]
    pub fn set(&self, v: f32) {
        let clamped = self.descriptor.clamp(v);
        self.value.store(clamped.to_bits(), Ordering::Release);
    }

    /// Load the current value.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.value.load(Ordering::Acquire))
    }

    /// Restore the default value.
    pub fn reset(&self) {
        self.set(self.descriptor.default);
    }

    /// Range and naming metadata.
    pub fn descriptor(&self) -> &ParamDescriptor {
        &self.descriptor
    }
}

impl Clone for AtomicParam {
    fn clone(&self) -> Self {
        Self {
            value: AtomicU32::new(self.value.load(Ordering::Acquire)),
            descriptor: self.descriptor,
        }
    }
}

/// One [`AtomicParam`] per parameter of an engine, indexed like
/// [`ParameterInfo`].
#[derive(Debug, Clone)]
pub struct ParamBank {
    params: Vec<AtomicParam>,
}

impl ParamBank {
    /// Build a bank mirroring `engine`'s parameters, seeded with its current values.
    pub fn from_engine<P: ParameterInfo + ?Sized>(engine: &P) -> Self {
        let params: Vec<AtomicParam> = (0..engine.param_count())
            .filter_map(|i| {
                engine.param_info(i).map(|desc| {
                    let cell = AtomicParam::new(desc);
                    cell.set(engine.get_param(i));
                    cell
                })
            })
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(params = params.len(), "parameter bank created");

        Self { params }
    }

    /// [`from_engine`](Self::from_engine), wrapped for sharing across threads.
    pub fn shared<P: ParameterInfo + ?Sized>(engine: &P) -> Arc<Self> {
        Arc::new(Self::from_engine(engine))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the bank holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Current value at `index`.
    pub fn get(&self, index: usize) -> Option<f32> {
        self.params.get(index).map(AtomicParam::get)
    }

    /// Set the value at `index` (clamped). Returns `false` for a bad index.
    pub fn set(&self, index: usize, value: f32) -> bool {
        match self.params.get(index) {
            Some(p) => {
                p.set(value);
                true
            }
            None => false,
        }
    }

    /// Index of the parameter matching `name` (name, short name or string id).
    pub fn find(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.descriptor().matches(name))
    }

    /// Set a parameter by name. Returns `false` if nothing matches.
    pub fn set_by_name(&self, name: &str, value: f32) -> bool {
        self.find(name).is_some_and(|i| self.set(i, value))
    }

    /// Descriptor at `index`.
    pub fn descriptor(&self, index: usize) -> Option<&ParamDescriptor> {
        self.params.get(index).map(AtomicParam::descriptor)
    }

    /// Iterate over the cells in index order.
    pub fn iter(&self) -> impl Iterator<Item = &AtomicParam> {
        self.params.iter()
    }

    /// Restore every parameter to its default.
    pub fn reset(&self) {
        for p in &self.params {
            p.reset();
        }
    }

    /// Push the current snapshot into `engine`.
    ///
    /// Real-time safe: one atomic load and one `set_param` per parameter.
    pub fn apply_to<P: ParameterInfo + ?Sized>(&self, engine: &mut P) {
        for (i, p) in self.params.iter().enumerate() {
            engine.set_param(i, p.get());
        }
    }
}
