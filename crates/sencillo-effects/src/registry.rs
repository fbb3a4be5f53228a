//! Engine registry and factory.
//!
//! Hosts discover the built-in engines through [`EngineRegistry`] and create
//! them by id, getting back a `Box<dyn EngineWithParams + Send>` that can be
//! prepared, processed and parameterised without knowing the concrete type.
//!
//! ```rust
//! use sencillo_core::{Engine, ProcessSpec};
//! use sencillo_effects::EngineRegistry;
//!
//! let registry = EngineRegistry::new();
//! for engine in registry.all_engines() {
//!     println!("{}: {}", engine.id, engine.description);
//! }
//!
//! let mut folder = registry.create("wave-folder").unwrap();
//! folder.prepare(&ProcessSpec::new(48000.0, 64, 1)).unwrap();
//! ```

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use sencillo_core::EngineWithParams;

use crate::{DelayReverbEngine, FilterStage, GainMeterStage, StereoFlipper, WaveFolder};

/// Broad grouping of engines for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineCategory {
    /// Nonlinear waveshaping.
    Distortion,
    /// Frequency-selective processing.
    Filter,
    /// Delay and reverb.
    TimeBased,
    /// Channel routing.
    Spatial,
    /// Gain staging and metering.
    Utility,
}

impl EngineCategory {
    /// Human-readable category name.
    pub const fn name(&self) -> &'static str {
        match self {
            EngineCategory::Distortion => "Distortion",
            EngineCategory::Filter => "Filter",
            EngineCategory::TimeBased => "Time-Based",
            EngineCategory::Spatial => "Spatial",
            EngineCategory::Utility => "Utility",
        }
    }
}

/// Metadata for one registered engine.
#[derive(Debug, Clone)]
pub struct EngineDescriptor {
    /// Unique id (lowercase, hyphenated).
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Listing category.
    pub category: EngineCategory,
    /// Number of parameters the engine exposes.
    pub param_count: usize,
}

type EngineFactory = fn() -> Box<dyn EngineWithParams + Send>;

struct RegistryEntry {
    descriptor: EngineDescriptor,
    factory: EngineFactory,
}

/// Registry of the built-in engines.
pub struct EngineRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineRegistry {
    /// Create a registry holding every built-in engine.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(5),
        };
        registry.register_builtin();

        #[cfg(feature = "tracing")]
        tracing::debug!(engines = registry.len(), "engine registry built");

        registry
    }

    fn register_builtin(&mut self) {
        self.register(
            EngineDescriptor {
                id: "wave-folder",
                name: "Wave Folder",
                description: "Reflects the signal back into range above a threshold",
                category: EngineCategory::Distortion,
                param_count: 1,
            },
            || Box::new(WaveFolder::new()),
        );

        self.register(
            EngineDescriptor {
                id: "filter",
                name: "Filter",
                description: "Resonant state-variable low-pass filter",
                category: EngineCategory::Filter,
                param_count: 2,
            },
            || Box::new(FilterStage::new()),
        );

        self.register(
            EngineDescriptor {
                id: "delay-reverb",
                name: "Delay Reverb",
                description: "Feedback comb delay into a Freeverb tank",
                category: EngineCategory::TimeBased,
                param_count: 9,
            },
            || Box::new(DelayReverbEngine::new()),
        );

        self.register(
            EngineDescriptor {
                id: "stereo-flipper",
                name: "Stereo Flipper",
                description: "Swaps left and right on a square-wave timer",
                category: EngineCategory::Spatial,
                param_count: 1,
            },
            || Box::new(StereoFlipper::new()),
        );

        self.register(
            EngineDescriptor {
                id: "gain-meter",
                name: "Gain Meter",
                description: "Per-channel and main gain with peak metering",
                category: EngineCategory::Utility,
                param_count: 3,
            },
            || Box::new(GainMeterStage::new()),
        );
    }

    fn register(&mut self, descriptor: EngineDescriptor, factory: EngineFactory) {
        self.entries.push(RegistryEntry {
            descriptor,
            factory,
        });
    }

    /// Descriptors of every registered engine, in registration order.
    pub fn all_engines(&self) -> Vec<&EngineDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Descriptors in one category.
    pub fn engines_in_category(&self, category: EngineCategory) -> Vec<&EngineDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.category == category)
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Descriptor by id.
    pub fn get(&self, id: &str) -> Option<&EngineDescriptor> {
        self.entries
            .iter()
            .find(|e| e.descriptor.id == id)
            .map(|e| &e.descriptor)
    }

    /// Create an unprepared engine by id.
    pub fn create(&self, id: &str) -> Option<Box<dyn EngineWithParams + Send>> {
        let entry = self.entries.iter().find(|e| e.descriptor.id == id)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(engine = id, "creating engine");

        Some((entry.factory)())
    }

    /// Index of a parameter of engine `engine_id` by name, short name or
    /// string id (case-insensitive).
    pub fn param_index_by_name(&self, engine_id: &str, param_name: &str) -> Option<usize> {
        self.create(engine_id)?.engine_find_param(param_name)
    }

    /// Number of registered engines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
