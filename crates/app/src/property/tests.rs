use pfc_types::{BaseClass, ClassType, Type, safe_downcast};
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::private::Token;
use super::*;

#[rstest]
#[case("app::PropertyFloat", "app::PropertyFloat")]
#[case("PropertyFloat", "app::PropertyFloat")]
#[case("PropertyStringList", "app::PropertyStringList")]
fn test_resolve_property_type(#[case] requested: &str, #[case] resolved: &str) {
	assert_eq!(resolve_property_type(requested).unwrap().name(), resolved);
}

#[rstest]
#[case("NoSuchPropertyType", PropertyError::NoSuchObject("NoSuchPropertyType".into()))]
#[case("app::Nope", PropertyError::NoSuchObject("app::Nope".into()))]
#[case("base::BaseClass", PropertyError::NotAPropertyType("base::BaseClass".into()))]
fn test_resolve_rejects(#[case] requested: &str, #[case] expected: PropertyError) {
	let err = resolve_property_type(requested).unwrap_err();
	assert!(err.is_configuration_error());
	assert_eq!(err, expected);
}

#[test]
fn test_abstract_classes_have_no_factory() {
	assert_eq!(
		create_property(property_lists_type()).unwrap_err(),
		PropertyError::AbstractType("app::PropertyLists".into())
	);
	assert!(matches!(
		create_property(Type::root()),
		Err(PropertyError::NotAPropertyType(_))
	));
}

#[test]
fn test_hierarchy() {
	assert!(PropertyFloat::class_type().is_derived_from(property_type()));
	assert!(!PropertyFloat::class_type().is_derived_from(property_lists_type()));
	assert!(PropertyBoolList::class_type().is_derived_from(property_lists_type()));
	assert!(PropertyBoolList::class_type().is_derived_from(property_type()));
}

/// Factory-built properties are unnamed defaults of the requested class.
#[test]
fn test_create_property_defaults() {
	let prop = create_property(PropertyFloat::class_type()).unwrap();
	assert_eq!(prop.name(), None);
	assert_eq!(prop.value(), PropertyValue::Float(0.0));
	assert_eq!(prop.class_name_polymorphic(), "app::PropertyFloat");
	assert!(safe_downcast::<PropertyFloat>(&*prop).is_some());
	assert!(safe_downcast::<PropertyInteger>(&*prop).is_none());

	let base: &dyn BaseClass = &*prop;
	assert!(base.is_derived_from(property_type()));
}

#[test]
fn test_assign_checks_kind() {
	let mut prop = PropertyInteger::new(3);
	assert!(!prop.is_touched());

	let err = prop.assign(PropertyValue::Float(1.0), Token::new()).unwrap_err();
	assert!(matches!(err, PropertyError::TypeMismatch { .. }));
	assert!(!prop.is_touched());

	prop.assign(PropertyValue::Integer(9), Token::new()).unwrap();
	assert_eq!(*prop.get(), 9);
	assert!(prop.is_touched());
}

#[test]
fn test_list_element_assignment() {
	let mut prop = PropertyStringList::new(vec!["a".into(), "b".into()]);
	prop.assign_element(1, "B".into(), Token::new()).unwrap();
	prop.assign_element(2, "c".into(), Token::new()).unwrap();
	assert_eq!(prop.get(), &vec!["a".to_string(), "B".into(), "c".into()]);
	assert_eq!(prop.touched_indices(), &[1, 2]);

	assert_eq!(
		prop.assign_element(7, "x".into(), Token::new()).unwrap_err(),
		PropertyError::IndexOutOfRange {
			name: "<unnamed>".into(),
			index: 7,
			len: 3,
		}
	);
	assert!(prop.assign_element(0, PropertyValue::Bool(true), Token::new()).is_err());

	prop.assign(PropertyValue::StringList(Vec::new()), Token::new()).unwrap();
	assert!(prop.is_empty());
	assert!(prop.touched_indices().is_empty());
}

#[test]
fn test_scalar_rejects_element_assignment() {
	let mut prop = PropertyBool::default();
	assert!(prop.assign_element(0, PropertyValue::Bool(true), Token::new()).is_err());
}

/// A clone is a detached snapshot: same value, new identity.
#[test]
fn test_clone_box_is_detached() {
	let mut prop = PropertyString::new("label".into());
	prop.meta_mut().attach("Label", crate::PropertyFlags::HIDDEN);

	let snapshot = prop.clone_box();
	assert_ne!(snapshot.id(), prop.id());
	assert_eq!(snapshot.name(), Some("Label"));
	assert!(snapshot.is_hidden());
	assert!(snapshot.is_same(&prop));

	prop.assign("changed".into(), Token::new()).unwrap();
	assert!(!snapshot.is_same(&prop));
	assert_eq!(snapshot.value(), PropertyValue::String("label".into()));
}

#[test]
fn test_is_same_requires_same_class() {
	let a = PropertyIntegerList::new(Vec::new());
	let b = PropertyFloatList::new(Vec::new());
	assert!(!a.is_same(&b));
	assert!(a.is_same(&PropertyIntegerList::default()));
}

#[test]
fn test_ids_are_unique() {
	let a = PropertyBool::default();
	let b = PropertyBool::default();
	assert_ne!(a.id(), b.id());
	assert!(a.estimated_size() >= size_of::<PropertyMeta>());
}
