//! Typed shortcuts over [`PropertyContainer`].

use pfc_types::{ClassType, safe_downcast};

use super::{DynamicProperty, PropertyContainer};
use crate::error::PropertyError;
use crate::property::{
	Property, PropertyBool, PropertyBoolList, PropertyFloat, PropertyFloatList, PropertyInteger,
	PropertyIntegerList, PropertyString, PropertyStringList,
};
use crate::value::{FromPropertyValue, PropertyValue, ValueKind};

/// Generic typed reads.
pub trait PropertyContainerExt: PropertyContainer {
	/// Reads the named property's value as `T`.
	fn property_value_as<T: FromPropertyValue>(&self, name: &str) -> Result<T, PropertyError> {
		let prop = self
			.get_property_by_name(name)
			.ok_or_else(|| PropertyError::NotFound(name.to_string()))?;
		let value = prop.value();
		let got = value.kind();
		T::from_value(value).ok_or_else(|| PropertyError::TypeMismatch {
			name: name.to_string(),
			expected: T::value_kind(),
			got,
		})
	}

	/// The named property as its concrete class, `None` when missing or of another class.
	fn property_as<P: Property + ClassType>(&self, name: &str) -> Option<&P> {
		safe_downcast::<P>(self.get_property_by_name(name)?)
	}
}

impl<C: PropertyContainer + ?Sized> PropertyContainerExt for C {}

fn kind_mismatch<C: PropertyContainer + ?Sized>(
	container: &C,
	name: &str,
	expected: ValueKind,
) -> PropertyError {
	match container.get_property_by_name(name) {
		Some(prop) => PropertyError::TypeMismatch {
			name: name.to_string(),
			expected,
			got: prop.value_kind(),
		},
		None => PropertyError::NotFound(name.to_string()),
	}
}

macro_rules! typed_properties {
	($($kind:ident: $class:ident, $rust:ty, $variant:ident;)*) => {
		paste::paste! {
			/// Per-kind add, lookup, read and write helpers.
			///
			/// For each kind, `add_property_<kind>` adds a dynamic property,
			/// `ensure_property_<kind>` adds it only when missing, `property_<kind>` returns
			/// the concrete property, and `property_<kind>_value` and
			/// `set_property_<kind>_value` read and write its value.
			pub trait TypedProperties: PropertyContainer {
				$(
					fn [<add_property_ $kind>](&mut self, name: &str) -> Result<&$class, PropertyError> {
						let prop = self.add_dynamic_property_of_type(
							<$class as ClassType>::class_type(),
							DynamicProperty::named(name),
						)?;
						let got = prop.value_kind();
						safe_downcast::<$class>(prop).ok_or_else(|| PropertyError::TypeMismatch {
							name: name.to_string(),
							expected: ValueKind::$variant,
							got,
						})
					}

					fn [<ensure_property_ $kind>](&mut self, name: &str) -> Result<&$class, PropertyError> {
						if self.get_property_by_name(name).is_none() {
							self.[<add_property_ $kind>](name)?;
						}
						self.[<property_ $kind>](name)
							.ok_or_else(|| kind_mismatch(self, name, ValueKind::$variant))
					}

					fn [<property_ $kind>](&self, name: &str) -> Option<&$class> {
						safe_downcast::<$class>(self.get_property_by_name(name)?)
					}

					fn [<property_ $kind _value>](&self, name: &str) -> Result<$rust, PropertyError> {
						self.property_value_as::<$rust>(name)
					}

					fn [<property_ $kind _value_or>](&self, name: &str, default: $rust) -> $rust {
						self.[<property_ $kind _value>](name).unwrap_or(default)
					}

					fn [<set_property_ $kind _value>](&mut self, name: &str, value: $rust) -> Result<(), PropertyError> {
						self.set_property_value(name, PropertyValue::$variant(value))
					}
				)*
			}
		}
	};
}

typed_properties! {
	string: PropertyString, String, String;
	integer: PropertyInteger, i64, Integer;
	float: PropertyFloat, f64, Float;
	bool: PropertyBool, bool, Bool;
	string_list: PropertyStringList, Vec<String>, StringList;
	integer_list: PropertyIntegerList, Vec<i64>, IntegerList;
	float_list: PropertyFloatList, Vec<f64>, FloatList;
	bool_list: PropertyBoolList, Vec<bool>, BoolList;
}

impl<C: PropertyContainer + ?Sized> TypedProperties for C {}
