//! Declarative [`ParameterInfo`](crate::ParameterInfo) implementations.

/// Implement [`ParameterInfo`](crate::ParameterInfo) from a table of
/// descriptor, getter and setter per index.
///
/// The identifier after the type names the receiver inside every
/// expression (`&Self` in descriptors and getters, `&mut Self` in setters).
///
/// ```rust
/// use sencillo_core::{ParamDescriptor, ParamId, ParameterInfo};
///
/// struct Mixer {
///     dry: f32,
///     wet: f32,
/// }
///
/// sencillo_core::impl_params! {
///     Mixer, this {
///         [0] ParamDescriptor::unit_interval("Dry", "Dry", 1.0)
///                 .with_id(ParamId(1), "mx_dry"),
///             get: this.dry,
///             set: |v| this.dry = v.clamp(0.0, 1.0);
///
///         [1] ParamDescriptor::unit_interval("Wet", "Wet", 0.0)
///                 .with_id(ParamId(2), "mx_wet"),
///             get: this.wet,
///             set: |v| this.wet = v.clamp(0.0, 1.0);
///     }
/// }
///
/// let mut m = Mixer { dry: 1.0, wet: 0.0 };
/// assert_eq!(m.param_count(), 2);
/// m.set_param(1, 3.0);
/// assert_eq!(m.get_param(1), 1.0);
/// ```
#[macro_export]
macro_rules! impl_params {
    (
        $ty:ty, $this:ident {
            $(
                [$idx:literal] $desc:expr,
                    get: $get:expr,
                    set: |$v:ident| $set:expr;
            )+
        }
    ) => {
        impl $crate::ParameterInfo for $ty {
            fn param_count(&self) -> usize {
                [$($idx),+].len()
            }

            #[allow(unused_variables)]
            fn param_info(&self, index: usize) -> ::core::option::Option<$crate::ParamDescriptor> {
                let $this = self;
                match index {
                    $( $idx => ::core::option::Option::Some($desc), )+
                    _ => ::core::option::Option::None,
                }
            }

            fn get_param(&self, index: usize) -> f32 {
                let $this = self;
                match index {
                    $( $idx => $get, )+
                    _ => 0.0,
                }
            }

            fn set_param(&mut self, index: usize, value: f32) {
                let $this = self;
                match index {
                    $(
                        $idx => {
                            let $v = value;
                            $set;
                        }
                    )+
                    _ => {}
                }
            }
        }
    };
}
