//! Merged view over an object's static and dynamic properties.
//!
//! Lookups consult the instance's dynamic table first and then the class's static table.
//! The two namespaces are kept disjoint when dynamic properties are added, so the order
//! only matters for callers that bypass the container.

mod hooks;
mod macros;
mod persist;
mod typed;

use std::collections::BTreeMap;
use std::sync::Arc;

use pfc_types::{BaseClass, Element, PersistenceError, PropertyReader, PropertyWriter, Type};

pub use self::hooks::{PropertyHooks, StaticProperties};
#[doc(hidden)]
pub use self::macros::{
	DynamicTableSource, add_static_or_abort, finish_static_table, override_static_or_abort,
};
pub use self::typed::{PropertyContainerExt, TypedProperties};
use crate::config::{NameCollisionPolicy, PropertyConfig};
use crate::error::PropertyError;
use crate::flags::PropertyFlags;
use crate::property::private::Token;
use crate::property::{Property, create_property, resolve_property_type};
use crate::status::{Status, StatusBit};
use crate::table::{DynamicPropertyTable, StaticPropertyTable};
use crate::value::PropertyValue;

pfc_types::abstract_type!(
	/// Class every property container derives from.
	pub fn property_container_type() => "app::PropertyContainer", parent = Type::root()
);

/// Declaration of a property added at run time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamicProperty {
	/// Requested name; `None` or empty picks a free `Property###` style name.
	pub name: Option<String>,
	pub group: String,
	pub description: String,
	pub flags: PropertyFlags,
}

impl DynamicProperty {
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: Some(name.into()),
			..Self::default()
		}
	}

	pub fn unnamed() -> Self {
		Self::default()
	}

	pub fn with_group(mut self, group: impl Into<String>) -> Self {
		self.group = group.into();
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	pub fn with_flags(mut self, flags: PropertyFlags) -> Self {
		self.flags = flags;
		self
	}

	pub fn read_only(mut self, on: bool) -> Self {
		self.flags.set(PropertyFlags::READ_ONLY, on);
		self
	}

	pub fn hidden(mut self, on: bool) -> Self {
		self.flags.set(PropertyFlags::HIDDEN, on);
		self
	}
}

/// An object owning named properties.
///
/// Implemented by [`property_container!`](crate::property_container); the required methods
/// wire the class's tables and forward to its [`PropertyHooks`]. Everything else is
/// provided.
pub trait PropertyContainer: BaseClass {
	fn static_property_table_polymorphic(&self) -> &'static StaticPropertyTable;

	fn dynamic_properties(&self) -> &DynamicPropertyTable;

	fn dynamic_properties_mut(&mut self) -> &mut DynamicPropertyTable;

	#[doc(hidden)]
	fn hook_before_value_change(&self, prop: &dyn Property);

	#[doc(hidden)]
	fn hook_changed(&self, prop: &dyn Property);

	#[doc(hidden)]
	fn hook_status_changed(&self, prop: &dyn Property, old: Status);

	#[doc(hidden)]
	fn hook_before_store(&self);

	#[doc(hidden)]
	fn hook_changed_name(&mut self, element: &Element, version: u32) -> bool;

	#[doc(hidden)]
	fn hook_changed_type(&mut self, element: &Element, version: u32) -> bool;

	#[doc(hidden)]
	fn hook_config(&self) -> Arc<PropertyConfig>;

	/// Finds a property by name, dynamic table first.
	fn get_property_by_name(&self, name: &str) -> Option<&dyn Property> {
		if let Some(prop) = self.dynamic_properties().get(name) {
			return Some(prop);
		}
		self.static_property_table_polymorphic().property(self, name)
	}

	fn get_dynamic_property_by_name(&self, name: &str) -> Option<&dyn Property> {
		self.dynamic_properties().get(name)
	}

	fn has_dynamic_property(&self, name: &str) -> bool {
		self.dynamic_properties().contains(name)
	}

	fn has_static_property(&self, name: &str) -> bool {
		self.static_property_table_polymorphic().contains(name)
	}

	/// Dynamic property names in insertion order.
	fn dynamic_property_names(&self) -> Vec<&str> {
		self.dynamic_properties().names().collect()
	}

	/// Name under which `prop` lives in this container, by identity.
	fn property_name(&self, prop: &dyn Property) -> Option<&str> {
		if let Some(name) = self.dynamic_properties().name_of(prop) {
			return Some(name);
		}
		self.static_property_table_polymorphic()
			.spec_of(self, prop)
			.map(|spec| spec.name)
	}

	fn is_dynamic_property(&self, prop: &dyn Property) -> bool {
		self.dynamic_properties().name_of(prop).is_some()
	}

	/// All properties with their names: static ones root class first, then dynamic ones
	/// in insertion order.
	fn property_named_list(&self) -> Vec<(&str, &dyn Property)> {
		let mut list = Vec::new();
		for spec in self.static_property_table_polymorphic().specs() {
			if let Some(prop) = spec.resolve(self) {
				list.push((spec.name, prop));
			}
		}
		list.extend(
			self.dynamic_properties()
				.iter()
				.map(|(name, data)| (name, data.property())),
		);
		list
	}

	fn property_list(&self) -> Vec<&dyn Property> {
		self.property_named_list()
			.into_iter()
			.map(|(_, prop)| prop)
			.collect()
	}

	/// Properties keyed by name.
	fn property_map(&self) -> BTreeMap<&str, &dyn Property> {
		let mut map = BTreeMap::new();
		for (name, data) in self.dynamic_properties().iter() {
			map.insert(name, data.property());
		}
		for spec in self.static_property_table_polymorphic().specs() {
			if let Some(prop) = spec.resolve(self) {
				map.insert(spec.name, prop);
			}
		}
		map
	}

	/// Calls `visitor` for every property in [`PropertyContainer::property_named_list`] order.
	fn visit_properties(&self, visitor: &mut dyn FnMut(&str, &dyn Property)) {
		for (name, prop) in self.property_named_list() {
			visitor(name, prop);
		}
	}

	fn property_count(&self) -> usize {
		self.static_property_table_polymorphic().len() + self.dynamic_properties().len()
	}

	/// Declared flags of the named property.
	fn property_flags(&self, name: &str) -> Option<PropertyFlags> {
		if let Some(data) = self.dynamic_properties().data(name) {
			return Some(data.flags);
		}
		self.static_property_table_polymorphic()
			.find(name)
			.map(|spec| spec.flags)
	}

	fn property_group(&self, name: &str) -> Option<&str> {
		if let Some(data) = self.dynamic_properties().data(name) {
			return Some(&data.group);
		}
		self.static_property_table_polymorphic()
			.find(name)
			.map(|spec| spec.group)
	}

	fn property_description(&self, name: &str) -> Option<&str> {
		if let Some(data) = self.dynamic_properties().data(name) {
			return Some(&data.description);
		}
		self.static_property_table_polymorphic()
			.find(name)
			.map(|spec| spec.description)
	}

	fn property_flags_of(&self, prop: &dyn Property) -> Option<PropertyFlags> {
		self.property_flags(self.property_name(prop)?)
	}

	fn property_group_of(&self, prop: &dyn Property) -> Option<&str> {
		self.property_group(self.property_name(prop)?)
	}

	fn property_description_of(&self, prop: &dyn Property) -> Option<&str> {
		self.property_description(self.property_name(prop)?)
	}

	/// Declared read-only, or read-only by status. False for unknown names.
	fn is_read_only(&self, name: &str) -> bool {
		self.get_property_by_name(name)
			.is_some_and(|prop| self.is_read_only_of(prop))
	}

	fn is_read_only_of(&self, prop: &dyn Property) -> bool {
		prop.is_read_only()
			|| self
				.property_flags_of(prop)
				.is_some_and(|flags| flags.contains(PropertyFlags::READ_ONLY))
	}

	fn is_hidden(&self, name: &str) -> bool {
		self.get_property_by_name(name)
			.is_some_and(|prop| self.is_hidden_of(prop))
	}

	fn is_hidden_of(&self, prop: &dyn Property) -> bool {
		prop.is_hidden()
			|| self
				.property_flags_of(prop)
				.is_some_and(|flags| flags.contains(PropertyFlags::HIDDEN))
	}

	/// Replaces the value of the named property.
	///
	/// Fires the before-change hook, assigns, then fires the changed hook. Nothing fires
	/// when the property is missing, immutable, or holds another kind.
	fn set_property_value(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
		let prop = self
			.get_property_by_name(name)
			.ok_or_else(|| PropertyError::NotFound(name.to_string()))?;
		if prop.test_status(StatusBit::Immutable) {
			return Err(PropertyError::Immutable(name.to_string()));
		}
		change_value(self, name, value)
	}

	/// Replaces one element of a list property; `index == len` appends.
	fn set_property_list_element(
		&mut self,
		name: &str,
		index: usize,
		value: PropertyValue,
	) -> Result<(), PropertyError> {
		let prop = self
			.get_property_by_name(name)
			.ok_or_else(|| PropertyError::NotFound(name.to_string()))?;
		if prop.test_status(StatusBit::Immutable) {
			return Err(PropertyError::Immutable(name.to_string()));
		}
		let expected = prop.value_kind().element_kind().unwrap_or(prop.value_kind());
		if !prop.value_kind().is_list() || expected != value.kind() {
			return Err(PropertyError::TypeMismatch {
				name: name.to_string(),
				expected,
				got: value.kind(),
			});
		}
		let len = prop.value().list_len().unwrap_or_default();
		if index > len {
			return Err(PropertyError::IndexOutOfRange {
				name: name.to_string(),
				index,
				len,
			});
		}

		self.hook_before_value_change(prop);
		lookup_mut(self, name)
			.ok_or_else(|| PropertyError::NotFound(name.to_string()))?
			.assign_element(index, value, Token::new())?;
		notify_changed(self, name);
		Ok(())
	}

	/// Restores the named property from a snapshot taken with [`Property::clone_box`].
	fn paste_property(&mut self, name: &str, snapshot: &dyn Property) -> Result<(), PropertyError> {
		let prop = self
			.get_property_by_name(name)
			.ok_or_else(|| PropertyError::NotFound(name.to_string()))?;
		if prop.class_type_polymorphic() != snapshot.class_type_polymorphic() {
			return Err(PropertyError::TypeMismatch {
				name: name.to_string(),
				expected: prop.value_kind(),
				got: snapshot.value_kind(),
			});
		}
		self.set_property_value(name, snapshot.value())
	}

	/// Sets or clears a runtime status bit on one property.
	///
	/// Returns whether the bit changed. On change the status hook fires with the old
	/// status, followed by the changed hook.
	fn set_property_status_bit(
		&mut self,
		name: &str,
		bit: StatusBit,
		on: bool,
	) -> Result<bool, PropertyError> {
		if bit.is_static() {
			return Err(PropertyError::StaticStatusBit(bit));
		}
		let prop =
			lookup_mut(self, name).ok_or_else(|| PropertyError::NotFound(name.to_string()))?;
		let old = prop.status();
		if old.test(bit) == on {
			return Ok(false);
		}
		prop.meta_mut().set_status(bit, on);

		if let Some(prop) = self.get_property_by_name(name) {
			self.hook_status_changed(prop, old);
			self.hook_changed(prop);
		}
		Ok(true)
	}

	/// Sets or clears `bit` on every property, returning how many changed.
	///
	/// Immutable properties are skipped unless `bit` is [`StatusBit::Immutable`] itself.
	fn set_property_status(&mut self, bit: StatusBit, on: bool) -> Result<usize, PropertyError> {
		if bit.is_static() {
			return Err(PropertyError::StaticStatusBit(bit));
		}
		let names: Vec<String> = self
			.property_named_list()
			.into_iter()
			.filter(|(_, prop)| bit == StatusBit::Immutable || !prop.test_status(StatusBit::Immutable))
			.map(|(name, _)| name.to_string())
			.collect();

		let mut changed = 0;
		for name in names {
			if self.set_property_status_bit(&name, bit, on)? {
				changed += 1;
			}
		}
		Ok(changed)
	}

	/// Clears the touched bit everywhere without notifying.
	fn purge_touched(&mut self) {
		let names: Vec<String> = self
			.property_named_list()
			.into_iter()
			.filter(|(_, prop)| prop.is_touched())
			.map(|(name, _)| name.to_string())
			.collect();
		for name in names {
			if let Some(prop) = lookup_mut(self, &name) {
				prop.meta_mut().set_status(StatusBit::Touched, false);
			}
		}
	}

	/// Creates a property of class `class_name` and adds it to the dynamic table.
	///
	/// Bare class names are looked up in the `app` namespace.
	fn add_dynamic_property(
		&mut self,
		class_name: &str,
		decl: DynamicProperty,
	) -> Result<&dyn Property, PropertyError> {
		let ty = resolve_property_type(class_name)?;
		self.add_dynamic_property_of_type(ty, decl)
	}

	fn add_dynamic_property_of_type(
		&mut self,
		ty: Type,
		decl: DynamicProperty,
	) -> Result<&dyn Property, PropertyError> {
		let property = create_property(ty)?;
		let config = self.hook_config();
		let name = choose_dynamic_name(self, decl.name.as_deref(), &config)?;
		self.dynamic_properties_mut().insert(
			&name,
			property,
			decl.group,
			decl.description,
			decl.flags,
		)?;
		tracing::debug!(
			domain = "properties",
			class = self.class_name_polymorphic(),
			name = %name,
			property_type = ty.name(),
			"added dynamic property"
		);

		let prop = self
			.dynamic_properties()
			.get(&name)
			.ok_or_else(|| PropertyError::NotFound(name.clone()))?;
		self.hook_changed(prop);
		Ok(prop)
	}

	/// Removes a dynamic property, returning false when no dynamic property has the name.
	///
	/// Static properties cannot be removed.
	fn remove_dynamic_property(&mut self, name: &str) -> bool {
		let Some(prop) = self.dynamic_properties().get(name) else {
			return false;
		};
		self.hook_before_value_change(prop);
		let removed = self.dynamic_properties_mut().remove(name).is_some();
		tracing::debug!(
			domain = "properties",
			class = self.class_name_polymorphic(),
			name,
			"removed dynamic property"
		);
		removed
	}

	/// Names every static property and writes its declared flags into its status.
	fn attach_static_properties(&mut self) {
		let table = self.static_property_table_polymorphic();
		for spec in table.specs() {
			match spec.resolve_mut(self) {
				Some(prop) => prop.meta_mut().attach(spec.name, spec.flags),
				None => tracing::warn!(
					domain = "properties",
					class = table.class().name(),
					name = spec.name,
					"static property slot is unreachable"
				),
			}
		}
	}

	fn properties_estimated_size(&self) -> usize {
		let statics: usize = self
			.property_named_list()
			.into_iter()
			.filter(|(name, _)| !self.has_dynamic_property(name))
			.map(|(_, prop)| prop.estimated_size())
			.sum();
		statics + self.dynamic_properties().estimated_size()
	}

	/// Writes every persistable property to `writer`.
	fn store_properties(
		&self,
		writer: &mut dyn PropertyWriter,
		version: u32,
	) -> Result<(), PersistenceError> {
		persist::store(self, writer, version)
	}

	/// Reads properties back from `reader`, recreating dynamic ones.
	fn restore_properties(
		&mut self,
		reader: &mut dyn PropertyReader,
		version: u32,
	) -> Result<(), PersistenceError> {
		persist::restore(self, reader, version)
	}
}

/// Mutable access to the named property, dynamic table first.
fn lookup_mut<'a, C: PropertyContainer + ?Sized>(
	container: &'a mut C,
	name: &str,
) -> Option<&'a mut dyn Property> {
	if container.dynamic_properties().contains(name) {
		return container.dynamic_properties_mut().get_mut(name);
	}
	let table = container.static_property_table_polymorphic();
	table.property_mut(container, name)
}

fn notify_changed<C: PropertyContainer + ?Sized>(container: &C, name: &str) {
	if let Some(prop) = container.get_property_by_name(name) {
		container.hook_changed(prop);
	}
}

/// Kind-checked assignment wrapped in the change hooks. Ignores the immutable bit.
pub(crate) fn change_value<C: PropertyContainer + ?Sized>(
	container: &mut C,
	name: &str,
	value: PropertyValue,
) -> Result<(), PropertyError> {
	let prop = container
		.get_property_by_name(name)
		.ok_or_else(|| PropertyError::NotFound(name.to_string()))?;
	if prop.value_kind() != value.kind() {
		return Err(PropertyError::TypeMismatch {
			name: name.to_string(),
			expected: prop.value_kind(),
			got: value.kind(),
		});
	}

	container.hook_before_value_change(prop);
	lookup_mut(container, name)
		.ok_or_else(|| PropertyError::NotFound(name.to_string()))?
		.assign(value, Token::new())?;
	notify_changed(container, name);
	Ok(())
}

fn choose_dynamic_name<C: PropertyContainer + ?Sized>(
	container: &C,
	requested: Option<&str>,
	config: &PropertyConfig,
) -> Result<String, PropertyError> {
	let table = container.static_property_table_polymorphic();
	let dynamic = container.dynamic_properties();
	let Some(name) = requested.filter(|name| !name.is_empty()) else {
		return Ok(dynamic.unique_name(&config.auto_name_prefix, |name| table.contains(name)));
	};

	let collision = if table.contains(name) {
		PropertyError::StaticNameCollision(name.to_string())
	} else if dynamic.contains(name) {
		PropertyError::DuplicateName(name.to_string())
	} else {
		return Ok(name.to_string());
	};
	match config.name_collision {
		NameCollisionPolicy::Reject => Err(collision),
		NameCollisionPolicy::Rename => {
			let renamed = dynamic.unique_name(name, |name| table.contains(name));
			tracing::warn!(
				domain = "properties",
				class = container.class_name_polymorphic(),
				requested = name,
				renamed = %renamed,
				reason = %collision,
				"renamed colliding dynamic property"
			);
			Ok(renamed)
		}
	}
}
