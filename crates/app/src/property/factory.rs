//! Class-name to property construction.

use std::sync::LazyLock;

use pfc_types::Type;
use rustc_hash::FxHashMap;

use super::{Property, property_type};
use crate::error::PropertyError;

/// Namespace tried for class names given without one.
const DEFAULT_NAMESPACE: &str = "app";

type CreatePropertyFn = fn() -> Box<dyn Property>;

/// Link-time registration of a concrete property class.
pub struct PropertyFactoryReg {
	pub class_type: fn() -> Type,
	pub create: CreatePropertyFn,
}
inventory::collect!(PropertyFactoryReg);

pub(super) fn create_boxed<P: Property + Default>() -> Box<dyn Property> {
	Box::new(P::default())
}

static FACTORIES: LazyLock<FxHashMap<Type, CreatePropertyFn>> = LazyLock::new(|| {
	inventory::iter::<PropertyFactoryReg>
		.into_iter()
		.map(|reg| ((reg.class_type)(), reg.create))
		.collect()
});

/// Resolves a property class name, trying the `app` namespace for bare names.
///
/// # Errors
///
/// [`PropertyError::NoSuchObject`] when no class has the name and
/// [`PropertyError::NotAPropertyType`] when the class is not a property.
pub fn resolve_property_type(class_name: &str) -> Result<Type, PropertyError> {
	let mut ty = Type::from_name(class_name);
	if ty.is_bad() && !class_name.contains("::") {
		ty = Type::from_name(&format!("{DEFAULT_NAMESPACE}::{class_name}"));
	}
	if ty.is_bad() {
		return Err(PropertyError::NoSuchObject(class_name.to_string()));
	}
	if !ty.is_derived_from(property_type()) {
		return Err(PropertyError::NotAPropertyType(ty.name().to_string()));
	}
	Ok(ty)
}

/// Builds a default, unattached property of class `ty`.
pub fn create_property(ty: Type) -> Result<Box<dyn Property>, PropertyError> {
	if !ty.is_derived_from(property_type()) {
		return Err(PropertyError::NotAPropertyType(ty.name().to_string()));
	}
	let create = FACTORIES
		.get(&ty)
		.ok_or_else(|| PropertyError::AbstractType(ty.name().to_string()))?;
	Ok(create())
}
