//! Process-wide class table.
//!
//! Each class is identified by a [`Type`], a dense index into a table of names, parents and
//! factories. Index 0 is the bad type and index 1 is the root [`ROOT_TYPE_NAME`]. Entries are
//! only ever appended, so a `Type` stays valid for the lifetime of the process.

use std::sync::{LazyLock, Once};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::class::BaseClass;
use crate::error::TypeError;

/// Factory producing a default instance of a registered class.
pub type CreateInstanceFn = fn() -> Box<dyn BaseClass>;

/// Name of the class every other class derives from.
pub const ROOT_TYPE_NAME: &str = "base::BaseClass";

const BAD_TYPE_NAME: &str = "BadType";
const NAMESPACE_SEPARATOR: &str = "::";

/// Runtime descriptor of a registered class.
///
/// Cheap to copy and compare. The bad type never compares as derived from anything, so a
/// failed lookup poisons every later hierarchy check instead of silently matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Type(u32);

struct TypeInfo {
	name: &'static str,
	parent: Type,
	create: Option<CreateInstanceFn>,
}

struct TypeTable {
	infos: Vec<TypeInfo>,
	by_name: FxHashMap<&'static str, Type>,
}

impl TypeTable {
	fn new() -> Self {
		let mut by_name = FxHashMap::default();
		by_name.insert(ROOT_TYPE_NAME, Type::ROOT);
		Self {
			infos: vec![
				TypeInfo {
					name: BAD_TYPE_NAME,
					parent: Type::BAD,
					create: None,
				},
				TypeInfo {
					name: ROOT_TYPE_NAME,
					parent: Type::BAD,
					create: None,
				},
			],
			by_name,
		}
	}

	fn info(&self, ty: Type) -> Option<&TypeInfo> {
		if ty.is_bad() {
			return None;
		}
		self.infos.get(ty.0 as usize)
	}
}

static TYPES: LazyLock<RwLock<TypeTable>> = LazyLock::new(|| RwLock::new(TypeTable::new()));

/// Link-time registration of a class.
///
/// Submitted by [`typesystem!`](crate::typesystem) so name-based queries see every linked
/// class, even one that has never been instantiated.
pub struct TypeReg(pub fn() -> Type);
inventory::collect!(TypeReg);

static LINKED: Once = Once::new();

fn ensure_linked() {
	LINKED.call_once(|| {
		let mut linked = 0usize;
		for reg in inventory::iter::<TypeReg> {
			(reg.0)();
			linked += 1;
		}
		tracing::debug!(domain = "types", linked, "linked class registrations");
	});
}

impl Type {
	const BAD: Type = Type(0);
	const ROOT: Type = Type(1);

	/// Returns the sentinel used for unknown or malformed classes.
	pub const fn bad() -> Self {
		Self::BAD
	}

	/// Returns the root class type.
	pub const fn root() -> Self {
		Self::ROOT
	}

	pub const fn is_bad(self) -> bool {
		self.0 == Self::BAD.0
	}

	pub const fn index(self) -> u32 {
		self.0
	}

	/// Returns the type stored at `index`, or the bad type when out of range.
	pub fn from_index(index: u32) -> Self {
		if (index as usize) < TYPES.read().infos.len() {
			Type(index)
		} else {
			Self::BAD
		}
	}

	/// Looks a class up by its fully qualified name.
	pub fn from_name(name: &str) -> Self {
		ensure_linked();
		TYPES.read().by_name.get(name).copied().unwrap_or(Self::BAD)
	}

	pub fn name(self) -> &'static str {
		TYPES.read().infos.get(self.0 as usize).map_or(BAD_TYPE_NAME, |info| info.name)
	}

	/// Returns the direct parent. The root and the bad type have a bad parent.
	pub fn parent(self) -> Type {
		TYPES.read().info(self).map_or(Self::BAD, |info| info.parent)
	}

	/// Walks the parent chain from `self` looking for `ancestor`.
	///
	/// Reflexive for every valid type, always false when either side is bad.
	pub fn is_derived_from(self, ancestor: Type) -> bool {
		if self.is_bad() || ancestor.is_bad() {
			return false;
		}
		let table = TYPES.read();
		let mut current = self;
		while let Some(info) = table.info(current) {
			if current == ancestor {
				return true;
			}
			current = info.parent;
		}
		false
	}

	pub fn is_derived_from_name(self, ancestor: &str) -> bool {
		self.is_derived_from(Type::from_name(ancestor))
	}

	/// Returns true when the class has no factory.
	pub fn is_abstract(self) -> bool {
		TYPES.read().info(self).is_none_or(|info| info.create.is_none())
	}

	/// Returns every registered type deriving from `self`, including `self`, in
	/// registration order.
	pub fn all_sub_types(self) -> Vec<Type> {
		ensure_linked();
		let count = TYPES.read().infos.len() as u32;
		(Self::ROOT.0..count)
			.map(Type)
			.filter(|ty| ty.is_derived_from(self))
			.collect()
	}

	/// Returns true when at least one other class derives from `self`.
	pub fn has_sub_types(self) -> bool {
		ensure_linked();
		let table = TYPES.read();
		!self.is_bad() && table.infos.iter().any(|info| info.parent == self)
	}

	/// Resolves `name` and checks it derives from `self`.
	///
	/// Returns the bad type when the name is unknown or names an unrelated class.
	pub fn sub_type_from_name(self, name: &str) -> Type {
		let ty = Type::from_name(name);
		if ty.is_derived_from(self) { ty } else { Self::BAD }
	}

	/// Number of table slots, the bad type included.
	pub fn count() -> usize {
		ensure_linked();
		TYPES.read().infos.len()
	}

	/// Builds a default instance through the class factory.
	pub fn create_instance(self) -> Option<Box<dyn BaseClass>> {
		let create = TYPES.read().info(self).and_then(|info| info.create)?;
		Some(create())
	}

	pub fn create_instance_by_name(name: &str) -> Option<Box<dyn BaseClass>> {
		Type::from_name(name).create_instance()
	}

	/// Registers a class, or returns the existing descriptor for an identical registration.
	///
	/// # Errors
	///
	/// Fails when the name is empty or lacks a `::` separator, when `parent` is not a
	/// registered type, or when the name is already registered under a different parent.
	pub fn register(
		name: &str,
		parent: Type,
		create: Option<CreateInstanceFn>,
	) -> Result<Type, TypeError> {
		if name.is_empty() {
			return Err(TypeError::EmptyName);
		}
		if !name.contains(NAMESPACE_SEPARATOR) {
			return Err(TypeError::MissingNamespace(name.to_string()));
		}

		let mut table = TYPES.write();
		if table.info(parent).is_none() {
			return Err(TypeError::BadParent(name.to_string()));
		}
		if let Some(&existing) = table.by_name.get(name) {
			let registered = table.info(existing).map_or(Self::BAD, |info| info.parent);
			if registered != parent {
				return Err(TypeError::IncompatibleDuplicate {
					name: name.to_string(),
					registered: table.infos[registered.0 as usize].name,
					requested: table.infos[parent.0 as usize].name,
				});
			}
			return Ok(existing);
		}

		let index = u32::try_from(table.infos.len()).map_err(|_| TypeError::TableFull)?;
		let ty = Type(index);
		let name: &'static str = Box::leak(name.to_owned().into_boxed_str());
		table.infos.push(TypeInfo {
			name,
			parent,
			create,
		});
		table.by_name.insert(name, ty);
		let parent_name = table.infos[parent.0 as usize].name;
		drop(table);

		tracing::debug!(
			domain = "types",
			name,
			parent = parent_name,
			index,
			"registered class type"
		);
		Ok(ty)
	}

	/// Sentinel form of [`Type::register`]: returns the bad type on failure.
	pub fn create_type(name: &str, parent: Type, create: Option<CreateInstanceFn>) -> Type {
		Type::register(name, parent, create).unwrap_or_else(|err| {
			tracing::warn!(domain = "types", name, error = %err, "class registration failed");
			Self::BAD
		})
	}
}

impl std::fmt::Display for Type {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

/// Registers a class for [`typesystem!`](crate::typesystem), aborting on any error.
///
/// A malformed hierarchy is a wiring defect, so the process stops with a message naming
/// the offending class.
#[doc(hidden)]
pub fn register_or_abort(
	name: &'static str,
	parent: Type,
	create: Option<CreateInstanceFn>,
) -> Type {
	match Type::register(name, parent, create) {
		Ok(ty) => ty,
		Err(err) => {
			tracing::error!(domain = "types", class = name, error = %err, "class registration failed");
			panic!("fatal class registration error for `{name}`: {err}");
		}
	}
}

#[cfg(test)]
mod tests;
