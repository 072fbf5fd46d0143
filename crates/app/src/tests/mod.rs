//! End-to-end container tests over small stand-in classes.

use std::cell::RefCell;
use std::sync::Arc;

use pfc_types::Element;

use crate::{
	DynamicPropertyTable, Property, PropertyConfig, PropertyContainer, PropertyFlags,
	PropertyFloat, PropertyHooks, PropertyString, PropertyStringList, PropertyValue, ValueKind,
	property_container,
};

mod persistence;

/// Root class without declared properties.
#[derive(Debug, Default)]
pub(crate) struct Base {
	dynamic: DynamicPropertyTable,
}

property_container! {
	Base => "scenario::Base", dynamic = dynamic {}
}

impl PropertyHooks for Base {}

#[derive(Debug, Default)]
pub(crate) struct Derived {
	base: Base,
	label: PropertyString,
}

property_container! {
	Derived => "scenario::Derived", parent = Base, via = base {
		label: PropertyString => "Label" { group: "Base", description: "User name" },
	}
}

impl PropertyHooks for Derived {}

/// A class outside the container hierarchy.
#[derive(Debug, Default)]
pub(crate) struct Unrelated;

pfc_types::typesystem!(Unrelated => "scenario::Unrelated", create = Unrelated);

/// One observed hook call with the value the property held at that moment.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Event {
	pub hook: &'static str,
	pub name: String,
	pub value: PropertyValue,
}

/// Container that records every hook call.
#[derive(Default)]
pub(crate) struct Recorder {
	dynamic: DynamicPropertyTable,
	length: PropertyFloat,
	tags: PropertyStringList,
	cache: PropertyString,
	scratch: PropertyString,
	pub events: RefCell<Vec<Event>>,
	pub stores: RefCell<usize>,
	pub config: Arc<PropertyConfig>,
}

property_container! {
	Recorder => "scenario::Recorder", dynamic = dynamic {
		length: PropertyFloat => "Length" { group: "Geometry" },
		tags: PropertyStringList => "Tags",
		cache: PropertyString => "Cache" { flags: PropertyFlags::TRANSIENT },
		scratch: PropertyString => "Scratch" { flags: PropertyFlags::NO_PERSIST | PropertyFlags::HIDDEN },
	}
}

impl Recorder {
	fn record(&self, hook: &'static str, prop: &dyn Property) {
		self.events.borrow_mut().push(Event {
			hook,
			name: prop.name().unwrap_or_default().to_string(),
			value: prop.value(),
		});
	}

	pub fn take_events(&self) -> Vec<Event> {
		self.events.take()
	}

	pub fn with_config(config: PropertyConfig) -> Self {
		let mut recorder = Self::create();
		recorder.config = Arc::new(config);
		recorder
	}
}

impl PropertyHooks for Recorder {
	fn on_before_property_value_changing(&self, prop: &dyn Property) {
		self.record("before", prop);
	}

	fn on_property_changed(&self, prop: &dyn Property) {
		self.record("changed", prop);
	}

	fn before_store(&self) {
		*self.stores.borrow_mut() += 1;
	}

	/// `OldLength` was renamed to `Length`.
	fn handle_changed_property_name(&mut self, element: &Element, _version: u32) -> bool {
		if element.name != "OldLength" {
			return false;
		}
		let Ok(value) = PropertyValue::decode(ValueKind::Float, &element.value) else {
			return false;
		};
		self.set_property_value("Length", value).is_ok()
	}

	/// `Length` used to be stored as an integer.
	fn handle_changed_property_type(&mut self, element: &Element, _version: u32) -> bool {
		if element.name != "Length" || element.type_tag != "app::PropertyInteger" {
			return false;
		}
		let Ok(PropertyValue::Integer(length)) =
			PropertyValue::decode(ValueKind::Integer, &element.value)
		else {
			return false;
		};
		self.set_property_value("Length", PropertyValue::Float(length as f64))
			.is_ok()
	}

	fn property_config(&self) -> Arc<PropertyConfig> {
		self.config.clone()
	}
}
