//! Template objects and import sources
//!
//! A template is a structure whose named fields become input parameters at
//! bind time. Every field carries its host type, so the emission plan cached
//! for a template shape is typed through the registry and never from a
//! particular value.
//!
//! Structures opt in with [`param_template!`](crate::param_template):
//!
//! ```rust
//! param_bag::param_template! {
//!     pub struct OrderFilter {
//!         pub region: String,
//!         pub min_total: i64,
//!         pub note: Option<String>,
//!     }
//! }
//! ```
//!
//! String-keyed maps are templates too. Their key set may differ per value;
//! keys outside the cached plan are typed from the map's value type.

use crate::bag::ParameterBag;
use cache_system::{TemplateField, TemplateShape};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use type_mapping::DbValue;

pub trait ParamTemplate: Send + Sync {
    fn shape(&self) -> TemplateShape;

    /// Current field values with their host types
    fn fields(&self) -> Vec<TemplateField>;
}

/// Implement [`ParamTemplate`] for a structure.
///
/// Either wrap the structure definition, or name an existing structure and
/// the fields it contributes:
///
/// ```rust
/// pub struct UserFilter {
///     pub user_id: i32,
///     pub name: String,
/// }
///
/// param_bag::param_template!(impl UserFilter { user_id, name });
/// ```
///
/// Each field type must be `Clone + Into<DbValue>`.
#[macro_export]
macro_rules! param_template {
    (impl $name:ident { $($field:ident),* $(,)? }) => {
        impl $crate::ParamTemplate for $name {
            fn shape(&self) -> $crate::TemplateShape {
                $crate::TemplateShape::of::<Self>()
            }

            fn fields(&self) -> ::std::vec::Vec<$crate::TemplateField> {
                ::std::vec![
                    $($crate::TemplateField::new(::std::stringify!($field), &self.$field)),*
                ]
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        $crate::param_template!(impl $name { $($field),* });
    };
}

macro_rules! impl_map_template {
    ($($map:ident),* $(,)?) => {
        $(
            impl<V> ParamTemplate for $map<String, V>
            where
                V: Clone + Into<DbValue> + Send + Sync + 'static,
            {
                fn shape(&self) -> TemplateShape {
                    TemplateShape::of::<Self>()
                }

                fn fields(&self) -> Vec<TemplateField> {
                    self.iter()
                        .map(|(name, value)| TemplateField::new(name.as_str(), value))
                        .collect()
                }
            }
        )*
    };
}

impl_map_template!(HashMap, BTreeMap, IndexMap);

/// Anything a bag can import parameters from
pub enum ParamSource {
    Bag(ParameterBag),
    Values(Vec<(String, DbValue)>),
    Template(Arc<dyn ParamTemplate>),
}

impl ParamSource {
    pub fn template<T: ParamTemplate + 'static>(template: T) -> Self {
        ParamSource::Template(Arc::new(template))
    }
}

impl From<ParameterBag> for ParamSource {
    fn from(bag: ParameterBag) -> Self {
        ParamSource::Bag(bag)
    }
}

impl From<Vec<(String, DbValue)>> for ParamSource {
    fn from(values: Vec<(String, DbValue)>) -> Self {
        ParamSource::Values(values)
    }
}

impl From<IndexMap<String, DbValue>> for ParamSource {
    fn from(values: IndexMap<String, DbValue>) -> Self {
        ParamSource::Values(values.into_iter().collect())
    }
}

impl From<BTreeMap<String, DbValue>> for ParamSource {
    fn from(values: BTreeMap<String, DbValue>) -> Self {
        ParamSource::Values(values.into_iter().collect())
    }
}

impl From<HashMap<String, DbValue>> for ParamSource {
    fn from(values: HashMap<String, DbValue>) -> Self {
        ParamSource::Values(values.into_iter().collect())
    }
}

impl From<Arc<dyn ParamTemplate>> for ParamSource {
    fn from(template: Arc<dyn ParamTemplate>) -> Self {
        ParamSource::Template(template)
    }
}
