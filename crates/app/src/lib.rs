//! Property reflection for application objects.
//!
//! A [`PropertyContainer`] exposes one merged view over two tables: the class-wide
//! [`StaticPropertyTable`], built once per class from fields declared with
//! [`property_container!`], and the per-instance [`DynamicPropertyTable`] filled at run
//! time through [`PropertyContainer::add_dynamic_property`]. Every mutation goes through
//! the container so the [`PropertyHooks`] observe it.

pub mod config;
mod container;
mod document;
mod error;
mod flags;
mod property;
mod status;
mod table;
mod value;

pub use config::{NameCollisionPolicy, PropertyConfig, RestorePolicy};
pub use container::{
	DynamicProperty, PropertyContainer, PropertyContainerExt, PropertyHooks, StaticProperties,
	TypedProperties, property_container_type,
};
pub use document::DocumentObject;
pub use error::PropertyError;
pub use flags::PropertyFlags;
pub use property::{
	Property, PropertyBool, PropertyBoolList, PropertyFloat, PropertyFloatList, PropertyId,
	PropertyInteger, PropertyIntegerList, PropertyMeta, PropertyString, PropertyStringList,
	create_property, property_lists_type, property_type, resolve_property_type,
};
pub use status::{Status, StatusBit};
pub use table::{
	DynamicPropertyData, DynamicPropertyTable, PropertyAccessor, PropertySpec,
	StaticPropertyTable,
};
pub use value::{FromPropertyValue, PropertyValue, ValueKind};

#[doc(hidden)]
pub mod __private {
	pub use pfc_types::{
		ClassType, Element, Persistence, PersistenceError, PropertyReader, PropertyWriter,
		typesystem,
	};

	pub use crate::container::{
		DynamicTableSource, add_static_or_abort, finish_static_table, override_static_or_abort,
	};
}

#[cfg(test)]
mod tests;
