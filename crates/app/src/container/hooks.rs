use std::sync::Arc;

use pfc_types::Element;

use super::PropertyContainer;
use crate::config::{self, PropertyConfig};
use crate::property::Property;
use crate::status::Status;
use crate::table::StaticPropertyTable;

/// Notifications and restore fallbacks a container class may override.
///
/// All methods have no-op defaults. Hooks of an embedded parent class are not chained
/// automatically; an override that wants them calls the parent's hook on the parent field.
pub trait PropertyHooks: PropertyContainer {
	/// Fires before a value is replaced and before a dynamic property is removed.
	fn on_before_property_value_changing(&self, _prop: &dyn Property) {}

	/// Fires after a value is replaced, a dynamic property is added, or a status bit changes.
	fn on_property_changed(&self, _prop: &dyn Property) {}

	/// Fires after a status bit changes, with the status before the change.
	fn on_property_status_changed(&self, _prop: &dyn Property, _old: Status) {}

	/// Fires once at the start of a store.
	fn before_store(&self) {}

	/// Restore found an element whose name matches no property.
	///
	/// Return true when the element was handled, for example by mapping a renamed property.
	fn handle_changed_property_name(&mut self, _element: &Element, _version: u32) -> bool {
		false
	}

	/// Restore found an element whose recorded class differs from the property's class.
	///
	/// Return true when the element was handled. Otherwise the value is decoded with the
	/// property's current kind.
	fn handle_changed_property_type(&mut self, _element: &Element, _version: u32) -> bool {
		false
	}

	/// Settings used for this object; the process-wide configuration by default.
	fn property_config(&self) -> Arc<PropertyConfig> {
		config::current()
	}
}

/// Class-wide access to the static table, without an instance.
pub trait StaticProperties {
	fn static_property_table() -> &'static StaticPropertyTable;
}
