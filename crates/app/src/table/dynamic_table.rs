//! Per-instance table of properties added at run time.

use indexmap::IndexMap;

use crate::error::PropertyError;
use crate::flags::PropertyFlags;
use crate::property::Property;

/// An owned dynamic property with its declaration metadata.
#[derive(Debug)]
pub struct DynamicPropertyData {
	property: Box<dyn Property>,
	pub group: String,
	pub description: String,
	/// Declared flags; always contains [`PropertyFlags::DYNAMIC`].
	pub flags: PropertyFlags,
}

impl DynamicPropertyData {
	pub fn property(&self) -> &dyn Property {
		&*self.property
	}
}

/// Insertion-ordered map from name to owned property.
///
/// Removal preserves the relative order of the remaining entries, so enumeration and
/// store order stay deterministic.
#[derive(Debug, Default)]
pub struct DynamicPropertyTable {
	props: IndexMap<Box<str>, DynamicPropertyData>,
}

impl DynamicPropertyTable {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.props.len()
	}

	pub fn is_empty(&self) -> bool {
		self.props.is_empty()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.props.contains_key(name)
	}

	/// Names in insertion order.
	pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
		self.props.keys().map(|name| &**name)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &DynamicPropertyData)> + '_ {
		self.props.iter().map(|(name, data)| (&**name, data))
	}

	pub fn get(&self, name: &str) -> Option<&dyn Property> {
		let data = self.props.get(name)?;
		Some(&*data.property)
	}

	pub fn data(&self, name: &str) -> Option<&DynamicPropertyData> {
		self.props.get(name)
	}

	/// Name under which `prop` is stored, by identity.
	pub fn name_of(&self, prop: &dyn Property) -> Option<&str> {
		self.props
			.iter()
			.find(|(_, data)| std::ptr::addr_eq(&*data.property, prop))
			.map(|(name, _)| &**name)
	}

	/// Returns `base` if free, otherwise `base` with the smallest free three-digit suffix.
	pub fn unique_name(&self, base: &str, reserved: impl Fn(&str) -> bool) -> String {
		let taken = |name: &str| self.contains(name) || reserved(name);
		if !base.is_empty() && !taken(base) {
			return base.to_string();
		}
		(1..)
			.map(|n| format!("{base}{n:03}"))
			.find(|name| !taken(name))
			.unwrap_or_default()
	}

	pub fn estimated_size(&self) -> usize {
		self.props
			.iter()
			.map(|(name, data)| {
				name.len()
					+ data.group.capacity()
					+ data.description.capacity()
					+ size_of::<DynamicPropertyData>()
					+ data.property.estimated_size()
			})
			.sum()
	}

	pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut dyn Property> {
		let data = self.props.get_mut(name)?;
		Some(&mut *data.property)
	}

	/// Attaches and stores `property` under `name`.
	pub(crate) fn insert(
		&mut self,
		name: &str,
		mut property: Box<dyn Property>,
		group: String,
		description: String,
		flags: PropertyFlags,
	) -> Result<&dyn Property, PropertyError> {
		if self.props.contains_key(name) {
			return Err(PropertyError::DuplicateName(name.to_string()));
		}
		let flags = flags | PropertyFlags::DYNAMIC;
		property.meta_mut().attach(name, flags);
		let (index, _) = self.props.insert_full(
			name.into(),
			DynamicPropertyData {
				property,
				group,
				description,
				flags,
			},
		);
		Ok(&*self.props[index].property)
	}

	pub(crate) fn remove(&mut self, name: &str) -> Option<Box<dyn Property>> {
		self.props.shift_remove(name).map(|data| data.property)
	}
}
