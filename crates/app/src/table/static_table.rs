//! Per-class table of declared properties.
//!
//! One table exists per container class, built on first use and shared by every instance.
//! Each table points at its parent class's table; lookups walk that chain. Properties are
//! reached through accessor functions on the declaring class's sub-object, never through
//! raw offsets.

use std::any::Any;
use std::sync::LazyLock;

use indexmap::IndexMap;
use pfc_types::{BaseClass, Type};
use rustc_hash::FxHashSet;

use crate::container::property_container_type;
use crate::error::PropertyError;
use crate::flags::PropertyFlags;
use crate::property::Property;

/// Reaches a declared property inside the sub-object of its declaring class.
#[derive(Clone, Copy)]
pub struct PropertyAccessor {
	pub get: for<'a> fn(&'a (dyn Any + 'static)) -> Option<&'a dyn Property>,
	pub get_mut: for<'a> fn(&'a mut (dyn Any + 'static)) -> Option<&'a mut dyn Property>,
}

impl std::fmt::Debug for PropertyAccessor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("PropertyAccessor(..)")
	}
}

/// Declaration of one static property.
#[derive(Debug, Clone)]
pub struct PropertySpec {
	pub name: &'static str,
	pub group: &'static str,
	pub description: &'static str,
	pub flags: PropertyFlags,
	/// Class whose struct holds the field.
	pub owner: Type,
	/// Class of the property itself.
	pub property_type: Type,
	pub accessor: PropertyAccessor,
}

impl PropertySpec {
	pub fn new(
		name: &'static str,
		owner: Type,
		property_type: Type,
		accessor: PropertyAccessor,
	) -> Self {
		Self {
			name,
			group: "",
			description: "",
			flags: PropertyFlags::empty(),
			owner,
			property_type,
			accessor,
		}
	}

	pub fn group(mut self, group: &'static str) -> Self {
		self.group = group;
		self
	}

	pub fn description(mut self, description: &'static str) -> Self {
		self.description = description;
		self
	}

	pub fn flags(mut self, flags: PropertyFlags) -> Self {
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

	/// Resolves the declared property on `obj`.
	pub fn resolve<'a>(&self, obj: &'a (impl BaseClass + ?Sized)) -> Option<&'a dyn Property> {
		(self.accessor.get)(obj.upcast_ref(self.owner)?)
	}

	pub fn resolve_mut<'a>(
		&self,
		obj: &'a mut (impl BaseClass + ?Sized),
	) -> Option<&'a mut dyn Property> {
		(self.accessor.get_mut)(obj.upcast_mut(self.owner)?)
	}
}

#[derive(Debug)]
pub struct StaticPropertyTable {
	class: Type,
	parent: Option<&'static StaticPropertyTable>,
	pub(super) specs: IndexMap<&'static str, PropertySpec>,
}

static ROOT: LazyLock<StaticPropertyTable> =
	LazyLock::new(|| StaticPropertyTable::new(property_container_type(), None));

impl StaticPropertyTable {
	pub fn new(class: Type, parent: Option<&'static StaticPropertyTable>) -> Self {
		Self {
			class,
			parent,
			specs: IndexMap::new(),
		}
	}

	/// Empty table of the abstract container class, ancestor of every other table.
	pub fn root() -> &'static StaticPropertyTable {
		&ROOT
	}

	pub fn class(&self) -> Type {
		self.class
	}

	pub fn parent(&self) -> Option<&'static StaticPropertyTable> {
		self.parent
	}

	/// Declares a property on this class.
	///
	/// Names are unique across the whole class chain. Use
	/// [`StaticPropertyTable::override_metadata`] to change an inherited declaration.
	pub fn add_property(&mut self, spec: PropertySpec) -> Result<(), PropertyError> {
		if self.parent.and_then(|parent| parent.find(spec.name)).is_some() {
			return Err(self.duplicate(spec.name));
		}
		self.insert(spec)
	}

	fn insert(&mut self, spec: PropertySpec) -> Result<(), PropertyError> {
		if self.specs.contains_key(spec.name) {
			return Err(self.duplicate(spec.name));
		}
		self.specs.insert(spec.name, spec);
		Ok(())
	}

	fn duplicate(&self, name: &str) -> PropertyError {
		PropertyError::DuplicateStatic {
			name: name.to_string(),
			class: self.class.name(),
		}
	}

	/// Overrides the metadata of a property declared by an ancestor.
	///
	/// The ancestor's slot is kept; only group, description and flags change.
	pub fn override_metadata(
		&mut self,
		name: &'static str,
		group: &'static str,
		description: &'static str,
		flags: PropertyFlags,
	) -> Result<(), PropertyError> {
		let inherited = self
			.parent
			.and_then(|parent| parent.find(name))
			.ok_or_else(|| PropertyError::UnknownStatic(name.to_string()))?;
		let spec = inherited
			.clone()
			.group(group)
			.description(description)
			.flags(flags);
		self.insert(spec)
	}

	/// Finds `name` on this class or the nearest ancestor declaring it.
	pub fn find(&self, name: &str) -> Option<&PropertySpec> {
		match self.specs.get(name) {
			Some(spec) => Some(spec),
			None => self.parent?.find(name),
		}
	}

	pub fn contains(&self, name: &str) -> bool {
		self.find(name).is_some()
	}

	/// Visible declarations, root class first, in declaration order.
	///
	/// Each name appears once. A shadowed name keeps the position of its first declaration
	/// and reports the most derived metadata.
	pub fn specs(&self) -> Vec<&PropertySpec> {
		let mut chain = vec![self];
		while let Some(parent) = chain.last().and_then(|table| table.parent) {
			chain.push(parent);
		}

		let mut seen = FxHashSet::default();
		let mut specs = Vec::new();
		for table in chain.iter().rev() {
			for name in table.specs.keys() {
				if seen.insert(*name)
					&& let Some(spec) = self.find(name)
				{
					specs.push(spec);
				}
			}
		}
		specs
	}

	/// Visits [`StaticPropertyTable::specs`] without collecting at the call site.
	pub fn visit_specs(&self, visitor: &mut dyn FnMut(&PropertySpec)) {
		for spec in self.specs() {
			visitor(spec);
		}
	}

	pub fn len(&self) -> usize {
		self.specs().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn property<'a>(
		&self,
		obj: &'a (impl BaseClass + ?Sized),
		name: &str,
	) -> Option<&'a dyn Property> {
		self.find(name)?.resolve(obj)
	}

	pub fn property_mut<'a>(
		&self,
		obj: &'a mut (impl BaseClass + ?Sized),
		name: &str,
	) -> Option<&'a mut dyn Property> {
		self.find(name)?.resolve_mut(obj)
	}

	/// Returns the declaration whose slot on `obj` is `prop`.
	pub fn spec_of(
		&self,
		obj: &(impl BaseClass + ?Sized),
		prop: &dyn Property,
	) -> Option<&PropertySpec> {
		self.specs().into_iter().find(|spec| {
			spec.resolve(obj)
				.is_some_and(|slot| std::ptr::addr_eq(slot, prop))
		})
	}

	/// Logs every visible declaration at debug level.
	pub fn debug_dump(&self) {
		for spec in self.specs() {
			tracing::debug!(
				domain = "properties",
				class = self.class.name(),
				name = spec.name,
				owner = spec.owner.name(),
				property_type = spec.property_type.name(),
				group = spec.group,
				flags = ?spec.flags,
				"static property"
			);
		}
	}
}
