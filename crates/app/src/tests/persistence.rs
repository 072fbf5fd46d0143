use pfc_types::{ElementStream, Persistence, PersistenceError, PropertyWriter};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::{DynamicProperty, RestorePolicy, StatusBit, TypedProperties};

fn stored(recorder: &Recorder) -> ElementStream {
	let mut stream = ElementStream::new(3);
	recorder.store(&mut stream, 3).unwrap();
	stream
}

fn element_names(stream: &ElementStream) -> Vec<&str> {
	stream
		.elements()
		.iter()
		.map(|element| element.name.as_str())
		.collect()
}

fn strict() -> PropertyConfig {
	PropertyConfig {
		restore: RestorePolicy::Strict,
		..PropertyConfig::default()
	}
}

#[test]
fn test_store_skips_transient_and_unpersisted() {
	let mut recorder = Recorder::create();
	recorder.set_property_string_value("Cache", "warm".into()).unwrap();
	recorder.set_property_string_value("Scratch", "tmp".into()).unwrap();
	recorder.add_property_string("Note").unwrap();

	let stream = stored(&recorder);
	assert_eq!(element_names(&stream), ["Length", "Tags", "Note"]);
	assert_eq!(*recorder.stores.borrow(), 1);

	let length = &stream.elements()[0];
	assert_eq!(length.type_tag, "app::PropertyFloat");
	assert_eq!(length.value, "0.0");
	assert!(!length.is_dynamic());
	assert!(stream.elements()[2].is_dynamic());
}

#[test]
fn test_transient_status_bit_skips_store() {
	let mut recorder = Recorder::create();
	recorder
		.set_property_status_bit("Tags", StatusBit::Transient, true)
		.unwrap();
	assert_eq!(element_names(&stored(&recorder)), ["Length"]);
}

/// Values and dynamic declarations survive a trip through bytes.
#[test]
fn test_round_trip() {
	let mut original = Recorder::create();
	original.set_property_float_value("Length", 12.5).unwrap();
	original
		.set_property_string_list_value("Tags", vec!["a".into(), "b \"quoted\"".into()])
		.unwrap();
	original
		.add_dynamic_property(
			"PropertyIntegerList",
			DynamicProperty::named("Holes")
				.with_group("Drill")
				.with_description("hole ids")
				.hidden(true),
		)
		.unwrap();
	original
		.set_property_integer_list_value("Holes", vec![3, 1, 4])
		.unwrap();
	original.add_property_bool("Flag").unwrap();

	let bytes = stored(&original).to_bytes().unwrap();
	let mut stream = ElementStream::from_bytes(&bytes).unwrap();
	assert_eq!(stream.version(), 3);

	let mut restored = Recorder::create();
	restored.restore(&mut stream, 3).unwrap();

	assert_eq!(restored.property_float_value("Length").unwrap(), 12.5);
	assert_eq!(
		restored.property_string_list_value("Tags").unwrap(),
		["a", "b \"quoted\""]
	);
	assert_eq!(restored.dynamic_property_names(), ["Holes", "Flag"]);
	assert_eq!(restored.property_integer_list_value("Holes").unwrap(), [3, 1, 4]);
	assert_eq!(restored.property_group("Holes"), Some("Drill"));
	assert_eq!(restored.property_description("Holes"), Some("hole ids"));
	assert!(restored.is_hidden("Holes"));
	assert!(restored.get_property_by_name("Holes").unwrap().is_dynamic());

	for (name, prop) in original.property_named_list() {
		let other = restored.get_property_by_name(name).unwrap();
		assert_eq!(other.class_type_polymorphic(), prop.class_type_polymorphic());
		if name != "Cache" && name != "Scratch" {
			assert!(other.is_same(prop), "{name} differs");
		}
	}
}

/// Restoring into an object that already has the dynamic property reuses it.
#[test]
fn test_restore_twice() {
	let mut original = Recorder::create();
	original.add_property_float("Weight").unwrap();
	original.set_property_float_value("Weight", 1.5).unwrap();
	let mut stream = stored(&original);

	let mut restored = Recorder::create();
	restored.restore(&mut stream, 3).unwrap();
	stream.rewind();
	restored.restore(&mut stream, 3).unwrap();
	assert_eq!(restored.dynamic_property_names(), ["Weight"]);
	assert_eq!(restored.property_float_value("Weight").unwrap(), 1.5);
}

#[test]
fn test_restore_notifies() {
	let mut original = Recorder::create();
	original.set_property_float_value("Length", 2.0).unwrap();
	let mut stream = stored(&original);

	let mut restored = Recorder::create();
	restored.restore(&mut stream, 3).unwrap();
	let hooks: Vec<_> = restored
		.take_events()
		.into_iter()
		.map(|event| (event.hook, event.name))
		.collect();
	assert_eq!(
		hooks[..2],
		[("before", "Length".to_string()), ("changed", "Length".to_string())]
	);
}

#[rstest]
#[case::malformed_value(Element::new("Length", "app::PropertyFloat", "twelve"))]
#[case::wrong_kind(Element::new("Length", "app::PropertyFloat", "\"12\""))]
#[case::unknown_name(Element::new("Ghost", "app::PropertyFloat", "1.0"))]
#[case::unknown_dynamic_class(
	Element::new("Extra", "app::PropertyNope", "1").with_dynamic(pfc_types::DynamicElement {
		group: String::new(),
		description: String::new(),
		flags: 0,
	})
)]
fn test_best_effort_keeps_current_values(#[case] bad: Element) {
	let mut stream = ElementStream::new(3);
	stream.write_element(bad).unwrap();
	stream
		.write_element(Element::new("Tags", "app::PropertyStringList", "[\"kept\"]"))
		.unwrap();

	let mut recorder = Recorder::create();
	recorder.set_property_float_value("Length", 7.0).unwrap();
	recorder.restore(&mut stream, 3).unwrap();

	assert_eq!(recorder.property_float_value("Length").unwrap(), 7.0);
	assert_eq!(recorder.property_string_list_value("Tags").unwrap(), ["kept"]);
	assert!(recorder.get_property_by_name("Ghost").is_none());
	assert!(recorder.get_property_by_name("Extra").is_none());
}

#[rstest]
#[case(Element::new("Length", "app::PropertyFloat", "twelve"), "Length")]
#[case(Element::new("Ghost", "app::PropertyFloat", "1.0"), "Ghost")]
fn test_strict_rejects(#[case] bad: Element, #[case] name: &str) {
	let mut stream = ElementStream::new(3);
	stream.write_element(bad).unwrap();

	let mut recorder = Recorder::with_config(strict());
	let err = recorder.restore(&mut stream, 3).unwrap_err();
	assert!(
		matches!(&err, PersistenceError::Rejected { name: rejected, .. } if rejected == name),
		"{err}"
	);
}

#[test]
fn test_renamed_property_hook() {
	let mut stream = ElementStream::new(2);
	stream
		.write_element(Element::new("OldLength", "app::PropertyFloat", "9.5"))
		.unwrap();

	let mut recorder = Recorder::with_config(strict());
	recorder.restore(&mut stream, 2).unwrap();
	assert_eq!(recorder.property_float_value("Length").unwrap(), 9.5);
	assert!(recorder.get_property_by_name("OldLength").is_none());
}

#[test]
fn test_changed_type_hook() {
	let mut stream = ElementStream::new(1);
	stream
		.write_element(Element::new("Length", "app::PropertyInteger", "4"))
		.unwrap();

	let mut recorder = Recorder::with_config(strict());
	recorder.restore(&mut stream, 1).unwrap();
	assert_eq!(recorder.property_float_value("Length").unwrap(), 4.0);
}

/// Without a type hook the value is decoded with the property's current kind.
#[test]
fn test_changed_type_without_hook_decodes_current_kind() {
	let mut stream = ElementStream::new(1);
	stream
		.write_element(Element::new("Tags", "app::PropertyString", "[\"x\"]"))
		.unwrap();

	let mut recorder = Recorder::with_config(strict());
	recorder.restore(&mut stream, 1).unwrap();
	assert_eq!(recorder.property_string_list_value("Tags").unwrap(), ["x"]);
}

#[test]
fn test_restore_ignores_immutable() {
	let mut original = Recorder::create();
	original.set_property_float_value("Length", 3.0).unwrap();
	let mut stream = stored(&original);

	let mut restored = Recorder::create();
	restored
		.set_property_status_bit("Length", StatusBit::Immutable, true)
		.unwrap();
	restored.restore(&mut stream, 3).unwrap();
	assert_eq!(restored.property_float_value("Length").unwrap(), 3.0);
}

#[test]
fn test_estimated_size_grows() {
	let mut recorder = Recorder::create();
	let before = recorder.estimated_size();
	recorder.add_property_string("Note").unwrap();
	recorder
		.set_property_string_value("Note", "x".repeat(256))
		.unwrap();
	assert!(recorder.estimated_size() >= before + 256);
}

#[rstest]
#[case(f64::INFINITY)]
#[case(f64::NEG_INFINITY)]
#[case(f64::NAN)]
#[case(f64::MIN_POSITIVE)]
fn test_non_finite_float_round_trip(#[case] length: f64) {
	let mut original = Recorder::create();
	original.set_property_float_value("Length", length).unwrap();
	original.add_property_float_list("Samples").unwrap();
	original
		.set_property_float_list_value("Samples", vec![length, 1.0])
		.unwrap();

	let mut stream = stored(&original);
	let mut restored = Recorder::with_config(strict());
	restored.restore(&mut stream, 3).unwrap();

	for name in ["Length", "Samples"] {
		let prop = restored.get_property_by_name(name).unwrap();
		assert!(prop.is_same(original.get_property_by_name(name).unwrap()), "{name}: {prop:?}");
	}
}

/// A strict restore that fails after creating a dynamic property leaves no trace of it.
#[test]
fn test_strict_failure_removes_created_property() {
	let mut stream = ElementStream::new(3);
	stream
		.write_element(
			Element::new("Extra", "app::PropertyFloat", "\"oops\"").with_dynamic(
				pfc_types::DynamicElement {
					group: "Misc".into(),
					description: String::new(),
					flags: 0,
				},
			),
		)
		.unwrap();

	let mut recorder = Recorder::with_config(strict());
	let err = recorder.restore(&mut stream, 3).unwrap_err();
	assert!(matches!(&err, PersistenceError::Rejected { name, .. } if name == "Extra"));
	assert!(recorder.get_property_by_name("Extra").is_none());
	assert!(recorder.dynamic_property_names().is_empty());
	assert_eq!(recorder.property_count(), 4);
}

#[derive(Debug, Clone)]
struct Values {
	length: f64,
	tags: Vec<String>,
	text: String,
	integer: i64,
	flag: bool,
	integers: Vec<i64>,
	floats: Vec<f64>,
	flags: Vec<bool>,
}

fn values() -> impl Strategy<Value = Values> {
	(
		any::<f64>(),
		prop::collection::vec(any::<String>(), 0..4),
		any::<String>(),
		any::<i64>(),
		any::<bool>(),
		prop::collection::vec(any::<i64>(), 0..4),
		prop::collection::vec(any::<f64>(), 0..4),
		prop::collection::vec(any::<bool>(), 0..4),
	)
		.prop_map(
			|(length, tags, text, integer, flag, integers, floats, flags)| Values {
				length,
				tags,
				text,
				integer,
				flag,
				integers,
				floats,
				flags,
			},
		)
}

fn populated(values: Values) -> Recorder {
	let mut recorder = Recorder::create();
	recorder.set_property_float_value("Length", values.length).unwrap();
	recorder.set_property_string_list_value("Tags", values.tags).unwrap();
	recorder.add_property_string("Text").unwrap();
	recorder.set_property_string_value("Text", values.text).unwrap();
	recorder.add_property_integer("Integer").unwrap();
	recorder.set_property_integer_value("Integer", values.integer).unwrap();
	recorder.add_property_bool("Flag").unwrap();
	recorder.set_property_bool_value("Flag", values.flag).unwrap();
	recorder.add_property_integer_list("Integers").unwrap();
	recorder
		.set_property_integer_list_value("Integers", values.integers)
		.unwrap();
	recorder.add_property_float_list("Floats").unwrap();
	recorder.set_property_float_list_value("Floats", values.floats).unwrap();
	recorder.add_property_bool_list("Flags").unwrap();
	recorder.set_property_bool_list_value("Flags", values.flags).unwrap();
	recorder
}

proptest! {
	/// Every persistable property of every kind survives store, bytes and restore.
	#[test]
	fn test_round_trip_any_values(values in values()) {
		let original = populated(values);
		let bytes = stored(&original).to_bytes().unwrap();
		let mut stream = ElementStream::from_bytes(&bytes).unwrap();

		let mut restored = Recorder::with_config(strict());
		restored.restore(&mut stream, 3).unwrap();

		prop_assert_eq!(restored.dynamic_property_names(), original.dynamic_property_names());
		for (name, prop) in original.property_named_list() {
			if name == "Cache" || name == "Scratch" {
				continue;
			}
			let other = restored.get_property_by_name(name).unwrap();
			prop_assert!(other.is_same(prop), "{}: {:?} != {:?}", name, other, prop);
		}
	}
}
