//! Combined [`Engine`] + [`ParameterInfo`] trait for boxed engines.
//!
//! `Box<dyn Engine>` loses the [`ParameterInfo`] methods, and a trait object
//! cannot name two unrelated traits. [`EngineWithParams`] re-exposes the
//! parameter methods under prefixed names so the registry and hosts can work
//! with a single `Box<dyn EngineWithParams + Send>`. A blanket impl covers
//! every type implementing both traits.

use crate::engine::Engine;
use crate::param_info::{ParamDescriptor, ParameterInfo};

/// An [`Engine`] whose parameters are reachable through a trait object.
pub trait EngineWithParams: Engine {
    /// Number of parameters.
    fn engine_param_count(&self) -> usize;

    /// Descriptor by index.
    fn engine_param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value by index.
    fn engine_get_param(&self, index: usize) -> f32;

    /// Set a value by index (clamped by the engine).
    fn engine_set_param(&mut self, index: usize, value: f32);

    /// Index of the parameter matching `name`, short name or string id.
    fn engine_find_param(&self, name: &str) -> Option<usize>;
}

impl<T: Engine + ParameterInfo> EngineWithParams for T {
    fn engine_param_count(&self) -> usize {
        self.param_count()
    }

    fn engine_param_info(&self, index: usize) -> Option<ParamDescriptor> {
        self.param_info(index)
    }

    fn engine_get_param(&self, index: usize) -> f32 {
        self.get_param(index)
    }

    fn engine_set_param(&mut self, index: usize, value: f32) {
        self.set_param(index, value);
    }

    fn engine_find_param(&self, name: &str) -> Option<usize> {
        self.find_param_by_name(name)
    }
}

/// Lets a boxed engine be driven by code generic over [`ParameterInfo`],
/// such as [`ParamBank::apply_to`](crate::ParamBank::apply_to).
impl ParameterInfo for dyn EngineWithParams + Send {
    fn param_count(&self) -> usize {
        self.engine_param_count()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        self.engine_param_info(index)
    }

    fn get_param(&self, index: usize) -> f32 {
        self.engine_get_param(index)
    }

    fn set_param(&mut self, index: usize, value: f32) {
        self.engine_set_param(index, value);
    }
}
