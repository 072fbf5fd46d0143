//! Base class of objects stored in a document.

use crate::flags::PropertyFlags;
use crate::property::{PropertyBool, PropertyString};
use crate::table::DynamicPropertyTable;
use crate::{PropertyHooks, property_container};

/// A document object: a user label, a visibility switch, and any dynamic properties.
///
/// Concrete objects embed it and declare it as their parent.
#[derive(Debug)]
pub struct DocumentObject {
	dynamic: DynamicPropertyTable,
	label: PropertyString,
	visibility: PropertyBool,
}

impl Default for DocumentObject {
	fn default() -> Self {
		Self {
			dynamic: DynamicPropertyTable::new(),
			label: PropertyString::default(),
			visibility: PropertyBool::new(true),
		}
	}
}

property_container! {
	DocumentObject => "app::DocumentObject", dynamic = dynamic {
		label: PropertyString => "Label" {
			group: "Base",
			description: "User name of the object (UTF8)",
		},
		visibility: PropertyBool => "Visibility" {
			group: "Base",
			flags: PropertyFlags::HIDDEN,
		},
	}
}

impl PropertyHooks for DocumentObject {}

impl DocumentObject {
	pub fn label(&self) -> &str {
		self.label.get()
	}

	pub fn is_visible(&self) -> bool {
		*self.visibility.get()
	}
}
