//! Storing and restoring a container's properties as [`Element`]s.

use pfc_types::{DynamicElement, Element, PersistenceError, PropertyReader, PropertyWriter};

use super::{DynamicProperty, PropertyContainer, change_value};
use crate::config::RestorePolicy;
use crate::error::PropertyError;
use crate::flags::PropertyFlags;
use crate::status::StatusBit;
use crate::value::PropertyValue;

pub(super) fn store<C: PropertyContainer + ?Sized>(
	container: &C,
	writer: &mut dyn PropertyWriter,
	version: u32,
) -> Result<(), PersistenceError> {
	container.hook_before_store();

	let mut written = 0usize;
	for (name, prop) in container.property_named_list() {
		let flags = container.property_flags(name).unwrap_or_default();
		if !flags.is_persistable() || prop.test_status(StatusBit::Transient) {
			continue;
		}
		let value = prop.value().encode().map_err(|err| PropertyError::Encode {
			name: name.to_string(),
			reason: err.to_string(),
		})?;

		let mut element = Element::new(name, prop.class_name_polymorphic(), value);
		if let Some(data) = container.dynamic_properties().data(name) {
			element = element.with_dynamic(DynamicElement {
				group: data.group.clone(),
				description: data.description.clone(),
				flags: data.flags.bits(),
			});
		}
		writer.write_element(element)?;
		written += 1;
	}

	tracing::debug!(
		domain = "properties",
		class = container.class_name_polymorphic(),
		version,
		written,
		"stored properties"
	);
	Ok(())
}

pub(super) fn restore<C: PropertyContainer + ?Sized>(
	container: &mut C,
	reader: &mut dyn PropertyReader,
	version: u32,
) -> Result<(), PersistenceError> {
	let policy = container.hook_config().restore;

	let mut restored = 0usize;
	let mut skipped = 0usize;
	while let Some(element) = reader.read_element()? {
		if restore_element(container, &element, version, policy)? {
			restored += 1;
		} else {
			skipped += 1;
		}
	}

	tracing::debug!(
		domain = "properties",
		class = container.class_name_polymorphic(),
		version,
		restored,
		skipped,
		"restored properties"
	);
	Ok(())
}

/// Returns false when the element was skipped under the best-effort policy.
fn restore_element<C: PropertyContainer + ?Sized>(
	container: &mut C,
	element: &Element,
	version: u32,
	policy: RestorePolicy,
) -> Result<bool, PersistenceError> {
	let mut created = false;
	if container.get_property_by_name(&element.name).is_none() {
		match &element.dynamic {
			Some(dynamic) => {
				let decl = DynamicProperty {
					name: Some(element.name.clone()),
					group: dynamic.group.clone(),
					description: dynamic.description.clone(),
					flags: PropertyFlags::from_bits_truncate(dynamic.flags),
				};
				if let Err(err) = container.add_dynamic_property(&element.type_tag, decl) {
					return skip(policy, element, err.to_string());
				}
				created = true;
			}
			None if container.hook_changed_name(element, version) => return Ok(true),
			None => return skip(policy, element, "no property has this name".to_string()),
		}
	}

	let result = assign_element(container, element, version, policy);
	if created && result.is_err() {
		// Strict restore leaves no half-restored dynamic property behind.
		container.remove_dynamic_property(&element.name);
	}
	result
}

fn assign_element<C: PropertyContainer + ?Sized>(
	container: &mut C,
	element: &Element,
	version: u32,
	policy: RestorePolicy,
) -> Result<bool, PersistenceError> {
	let Some(prop) = container.get_property_by_name(&element.name) else {
		return skip(policy, element, "no property has this name".to_string());
	};
	let kind = prop.value_kind();
	let same_class = prop.class_name_polymorphic() == element.type_tag;
	if !same_class && container.hook_changed_type(element, version) {
		return Ok(true);
	}

	let value = match PropertyValue::decode(kind, &element.value) {
		Ok(value) => value,
		Err(err) => return skip(policy, element, err.to_string()),
	};
	match change_value(container, &element.name, value) {
		Ok(()) => Ok(true),
		Err(err) => skip(policy, element, err.to_string()),
	}
}

fn skip(policy: RestorePolicy, element: &Element, reason: String) -> Result<bool, PersistenceError> {
	match policy {
		RestorePolicy::Strict => Err(PersistenceError::Rejected {
			name: element.name.clone(),
			reason,
		}),
		RestorePolicy::BestEffort => {
			tracing::warn!(
				domain = "properties",
				name = %element.name,
				type_tag = %element.type_tag,
				reason = %reason,
				"skipped property on restore, keeping current value"
			);
			Ok(false)
		}
	}
}
