//! Parameter introspection for engine controls.
//!
//! Every engine exposes its float controls through [`ParameterInfo`]:
//! index-based access plus a [`ParamDescriptor`] per index carrying name,
//! range, default, unit, normalization curve and stable ids. Hosts (the
//! parameter bank, the CLI, a plugin wrapper) discover controls through this
//! trait instead of knowing each engine's setter names.
//!
//! # Example
//!
//! ```rust
//! use sencillo_core::{ParameterInfo, ParamDescriptor, ParamUnit, ParamId};
//!
//! struct Trim {
//!     gain: f32,
//! }
//!
//! impl ParameterInfo for Trim {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::new("Gain", "Gain", ParamUnit::Gain, 0.0, 2.0, 1.0)
//!                 .with_id(ParamId(900), "trim_gain")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.gain,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if let Some(desc) = self.param_info(index) {
//!             self.gain = desc.clamp(value);
//!         }
//!     }
//! }
//!
//! let mut trim = Trim { gain: 1.0 };
//! let idx = trim.find_param_by_name("trim_gain").unwrap();
//! trim.set_param(idx, 5.0);
//! assert_eq!(trim.get_param(idx), 2.0);
//! ```

/// How a control's range is meant to be swept by a host or a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamScale {
    /// Equal resolution across the range.
    #[default]
    Linear,
    /// More resolution at low values. Used for cutoff frequency.
    Logarithmic,
}

/// Stable parameter identifier that survives reordering.
///
/// Each engine gets a base id and numbers its parameters from there:
/// wave folder 100, filter 200, delay-reverb 300, stereo flipper 400,
/// gain meter 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParamId(pub u32);

/// Unit type for parameter display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Hertz, for cutoff frequency.
    Hertz,
    /// Seconds, for delay time and flip period.
    Seconds,
    /// Linear gain factor.
    Gain,
    /// Dimensionless (resonance, mix amounts, threshold).
    None,
}

impl ParamUnit {
    /// Unit suffix for display.
    ///
    /// ```rust
    /// use sencillo_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Hertz => " Hz",
            ParamUnit::Seconds => " s",
            ParamUnit::Gain => "x",
            ParamUnit::None => "",
        }
    }
}

/// Metadata for a single float control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full display name (e.g. "Delay Time").
    pub name: &'static str,
    /// Short name for narrow displays, at most 8 characters.
    pub short_name: &'static str,
    /// Display unit.
    pub unit: ParamUnit,
    /// Minimum value.
    pub min: f32,
    /// Maximum value.
    pub max: f32,
    /// Value after construction.
    pub default: f32,
    /// Suggested increment for stepped controls.
    pub step: f32,
    /// Stable numeric id. `ParamId(0)` means unassigned.
    pub id: ParamId,
    /// Stable string id, `"engine_param"` (e.g. `"dr_feedback"`).
    pub string_id: &'static str,
    /// Normalization curve.
    pub scale: ParamScale,
}

impl ParamDescriptor {
    /// Descriptor with linear scale, step 0.01 and no ids.
    pub const fn new(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            min,
            max,
            default,
            step: 0.01,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
        }
    }

    /// Dimensionless control on `[0, 1]`.
    pub const fn unit_interval(name: &'static str, short_name: &'static str, default: f32) -> Self {
        Self::new(name, short_name, ParamUnit::None, 0.0, 1.0, default)
    }

    /// Sets the stable ids.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the normalization curve.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the step size.
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Whether `name` matches the full name, short name or string id,
    /// ignoring ASCII case.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.short_name.eq_ignore_ascii_case(name)
            || (!self.string_id.is_empty() && self.string_id.eq_ignore_ascii_case(name))
    }

    /// Clamps a value to `[min, max]`. NaN maps to the default.
    ///
    /// ```rust
    /// use sencillo_core::{ParamDescriptor, ParamUnit};
    ///
    /// let desc = ParamDescriptor::new("Gain", "Gain", ParamUnit::Gain, 0.0, 2.0, 1.0);
    /// assert_eq!(desc.clamp(-1.0), 0.0);
    /// assert_eq!(desc.clamp(3.0), 2.0);
    /// assert_eq!(desc.clamp(f32::NAN), 1.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Whether `value` lies inside `[min, max]`.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Index-based access to an engine's float controls.
///
/// Indices are stable for the lifetime of an instance. `set_param` clamps to
/// the descriptor's range and ignores out-of-range indices; `get_param`
/// returns 0.0 for them.
pub trait ParameterInfo {
    /// Number of parameters. Valid indices are `0..param_count()`.
    fn param_count(&self) -> usize;

    /// Descriptor for `index`, or `None` past the end.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of the parameter at `index`.
    fn get_param(&self, index: usize) -> f32;

    /// Set the parameter at `index`, clamped to its range.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter by name, short name or string id (case-insensitive).
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.matches(name)))
    }

    /// Stable id of the parameter at `index`.
    fn param_id(&self, index: usize) -> Option<ParamId> {
        self.param_info(index).map(|d| d.id)
    }

    /// Index of the parameter with the given stable id. O(n), setup paths only.
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}
