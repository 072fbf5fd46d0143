//! Typed, named value cells.
//!
//! A property only becomes named when it is attached to a container, either as a declared
//! static field or through the dynamic table. Values are replaced only by the container
//! ([`Property::assign`] requires a token private to this crate), so every change passes
//! through the container hooks.

mod factory;
mod kinds;

use std::sync::atomic::{AtomicU64, Ordering};

use pfc_types::{BaseClass, Type};

pub use self::factory::{create_property, resolve_property_type};
pub use self::kinds::{
	PropertyBool, PropertyBoolList, PropertyFloat, PropertyFloatList, PropertyInteger,
	PropertyIntegerList, PropertyString, PropertyStringList,
};
use crate::error::PropertyError;
use crate::flags::PropertyFlags;
use crate::status::{Status, StatusBit};
use crate::value::{PropertyValue, ValueKind};

pfc_types::abstract_type!(
	/// Class every property derives from.
	pub fn property_type() => "app::Property", parent = Type::root()
);

pfc_types::abstract_type!(
	/// Class every list property derives from.
	pub fn property_lists_type() => "app::PropertyLists", parent = property_type()
);

pub(crate) mod private {
	/// Proof that a value change was issued by the owning container.
	pub struct Token(());

	impl Token {
		pub(crate) fn new() -> Self {
			Self(())
		}
	}
}

use self::private::Token;

/// Process-unique property identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl PropertyId {
	fn next() -> Self {
		Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
	}

	pub fn get(self) -> u64 {
		self.0
	}
}

/// Name, status and identity shared by all property kinds.
///
/// Cloning yields a new identity: a clone is a detached snapshot, not the same property.
#[derive(Debug)]
pub struct PropertyMeta {
	name: Option<Box<str>>,
	status: Status,
	id: PropertyId,
}

impl Default for PropertyMeta {
	fn default() -> Self {
		Self {
			name: None,
			status: Status::empty(),
			id: PropertyId::next(),
		}
	}
}

impl Clone for PropertyMeta {
	fn clone(&self) -> Self {
		Self {
			name: self.name.clone(),
			status: self.status,
			id: PropertyId::next(),
		}
	}
}

impl PropertyMeta {
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn status(&self) -> Status {
		self.status
	}

	pub fn id(&self) -> PropertyId {
		self.id
	}

	pub(crate) fn display_name(&self) -> &str {
		self.name().unwrap_or("<unnamed>")
	}

	/// Names the property and writes the static status bits for `flags`.
	pub(crate) fn attach(&mut self, name: &str, flags: PropertyFlags) {
		self.name = Some(name.into());
		self.status.attach_flags(flags);
	}

	pub(crate) fn set_status(&mut self, bit: StatusBit, on: bool) {
		self.status.set(bit, on);
	}

	pub(crate) fn touch(&mut self) {
		self.status.set(StatusBit::Touched, true);
	}
}

/// A single typed value cell.
pub trait Property: BaseClass {
	fn meta(&self) -> &PropertyMeta;

	fn meta_mut(&mut self) -> &mut PropertyMeta;

	fn value_kind(&self) -> ValueKind;

	fn value(&self) -> PropertyValue;

	/// Replaces the whole value and marks the property touched.
	#[doc(hidden)]
	fn assign(&mut self, value: PropertyValue, token: Token) -> Result<(), PropertyError>;

	/// Replaces one list element; `index == len` appends.
	#[doc(hidden)]
	fn assign_element(
		&mut self,
		_index: usize,
		value: PropertyValue,
		_token: Token,
	) -> Result<(), PropertyError> {
		Err(PropertyError::TypeMismatch {
			name: self.meta().display_name().to_string(),
			expected: self.value_kind(),
			got: value.kind(),
		})
	}

	/// Detached copy used as an undo snapshot.
	fn clone_box(&self) -> Box<dyn Property>;

	/// Editor widget hint; empty when the property has no dedicated editor.
	fn editor_type_name(&self) -> &'static str {
		""
	}

	fn estimated_size(&self) -> usize {
		size_of::<PropertyMeta>() + self.value().estimated_size()
	}

	fn name(&self) -> Option<&str> {
		self.meta().name()
	}

	fn id(&self) -> PropertyId {
		self.meta().id()
	}

	fn status(&self) -> Status {
		self.meta().status()
	}

	fn test_status(&self, bit: StatusBit) -> bool {
		self.status().test(bit)
	}

	fn is_touched(&self) -> bool {
		self.test_status(StatusBit::Touched)
	}

	fn is_read_only(&self) -> bool {
		self.test_status(StatusBit::ReadOnly) || self.test_status(StatusBit::PropertyReadOnly)
	}

	fn is_hidden(&self) -> bool {
		self.test_status(StatusBit::Hidden) || self.test_status(StatusBit::PropertyHidden)
	}

	fn is_dynamic(&self) -> bool {
		self.test_status(StatusBit::PropertyDynamic)
	}

	/// Same class and equal value.
	fn is_same(&self, other: &dyn Property) -> bool {
		self.class_type_polymorphic() == other.class_type_polymorphic()
			&& self.value().same_as(&other.value())
	}
}

impl std::fmt::Debug for dyn Property {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct(self.class_name_polymorphic())
			.field("name", &self.name())
			.field("value", &self.value())
			.finish()
	}
}

#[cfg(test)]
mod tests;
