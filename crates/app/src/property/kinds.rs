use pfc_types::ClassType;

use super::factory::{PropertyFactoryReg, create_boxed};
use super::private::Token;
use super::{Property, PropertyMeta, property_lists_type, property_type};
use crate::error::PropertyError;
use crate::value::{PropertyValue, ValueKind};

macro_rules! scalar_property {
	($(#[$attr:meta])* $ty:ident => $name:literal, $variant:ident($rust:ty)) => {
		$(#[$attr])*
		#[derive(Debug, Clone, Default)]
		pub struct $ty {
			meta: PropertyMeta,
			value: $rust,
		}

		pfc_types::typesystem!($ty => $name, parent_type = property_type(), create = <$ty>::default());

		impl $ty {
			pub fn new(value: $rust) -> Self {
				Self {
					meta: PropertyMeta::default(),
					value,
				}
			}

			pub fn get(&self) -> &$rust {
				&self.value
			}
		}

		impl Property for $ty {
			fn meta(&self) -> &PropertyMeta {
				&self.meta
			}

			fn meta_mut(&mut self) -> &mut PropertyMeta {
				&mut self.meta
			}

			fn value_kind(&self) -> ValueKind {
				ValueKind::$variant
			}

			fn value(&self) -> PropertyValue {
				PropertyValue::$variant(self.value.clone())
			}

			fn assign(&mut self, value: PropertyValue, _token: Token) -> Result<(), PropertyError> {
				match value {
					PropertyValue::$variant(value) => {
						self.value = value;
						self.meta.touch();
						Ok(())
					}
					other => Err(PropertyError::TypeMismatch {
						name: self.meta.display_name().to_string(),
						expected: ValueKind::$variant,
						got: other.kind(),
					}),
				}
			}

			fn clone_box(&self) -> Box<dyn Property> {
				Box::new(self.clone())
			}
		}

		inventory::submit! {
			PropertyFactoryReg {
				class_type: <$ty as ClassType>::class_type,
				create: create_boxed::<$ty>,
			}
		}
	};
}

macro_rules! list_property {
	($(#[$attr:meta])* $ty:ident => $name:literal, $variant:ident(Vec<$elem:ty>), element = $elem_variant:ident) => {
		$(#[$attr])*
		#[derive(Debug, Clone, Default)]
		pub struct $ty {
			meta: PropertyMeta,
			values: Vec<$elem>,
			touched: Vec<usize>,
		}

		pfc_types::typesystem!($ty => $name, parent_type = property_lists_type(), create = <$ty>::default());

		impl $ty {
			pub fn new(values: Vec<$elem>) -> Self {
				Self {
					meta: PropertyMeta::default(),
					values,
					touched: Vec::new(),
				}
			}

			pub fn get(&self) -> &Vec<$elem> {
				&self.values
			}

			pub fn len(&self) -> usize {
				self.values.len()
			}

			pub fn is_empty(&self) -> bool {
				self.values.is_empty()
			}

			/// Indices edited one at a time since the last whole-list assignment.
			pub fn touched_indices(&self) -> &[usize] {
				&self.touched
			}
		}

		impl Property for $ty {
			fn meta(&self) -> &PropertyMeta {
				&self.meta
			}

			fn meta_mut(&mut self) -> &mut PropertyMeta {
				&mut self.meta
			}

			fn value_kind(&self) -> ValueKind {
				ValueKind::$variant
			}

			fn value(&self) -> PropertyValue {
				PropertyValue::$variant(self.values.clone())
			}

			fn assign(&mut self, value: PropertyValue, _token: Token) -> Result<(), PropertyError> {
				match value {
					PropertyValue::$variant(values) => {
						self.values = values;
						self.touched.clear();
						self.meta.touch();
						Ok(())
					}
					other => Err(PropertyError::TypeMismatch {
						name: self.meta.display_name().to_string(),
						expected: ValueKind::$variant,
						got: other.kind(),
					}),
				}
			}

			fn assign_element(
				&mut self,
				index: usize,
				value: PropertyValue,
				_token: Token,
			) -> Result<(), PropertyError> {
				let got = value.kind();
				let PropertyValue::$elem_variant(value) = value else {
					return Err(PropertyError::TypeMismatch {
						name: self.meta.display_name().to_string(),
						expected: ValueKind::$elem_variant,
						got,
					});
				};
				match index.cmp(&self.values.len()) {
					std::cmp::Ordering::Less => self.values[index] = value,
					std::cmp::Ordering::Equal => self.values.push(value),
					std::cmp::Ordering::Greater => {
						return Err(PropertyError::IndexOutOfRange {
							name: self.meta.display_name().to_string(),
							index,
							len: self.values.len(),
						});
					}
				}
				if !self.touched.contains(&index) {
					self.touched.push(index);
				}
				self.meta.touch();
				Ok(())
			}

			fn clone_box(&self) -> Box<dyn Property> {
				Box::new(self.clone())
			}
		}

		inventory::submit! {
			PropertyFactoryReg {
				class_type: <$ty as ClassType>::class_type,
				create: create_boxed::<$ty>,
			}
		}
	};
}

scalar_property!(
	/// UTF-8 text.
	PropertyString => "app::PropertyString", String(String)
);
scalar_property!(PropertyInteger => "app::PropertyInteger", Integer(i64));
scalar_property!(
	/// Double precision unless the `Single` status bit is set.
	PropertyFloat => "app::PropertyFloat", Float(f64)
);
scalar_property!(PropertyBool => "app::PropertyBool", Bool(bool));

list_property!(PropertyStringList => "app::PropertyStringList", StringList(Vec<String>), element = String);
list_property!(PropertyIntegerList => "app::PropertyIntegerList", IntegerList(Vec<i64>), element = Integer);
list_property!(PropertyFloatList => "app::PropertyFloatList", FloatList(Vec<f64>), element = Float);
list_property!(PropertyBoolList => "app::PropertyBoolList", BoolList(Vec<bool>), element = Bool);
