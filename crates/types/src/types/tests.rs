use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::{BaseClass, ClassType, Type, TypeError, safe_downcast, safe_downcast_mut};

#[derive(Debug, Default)]
struct Shape {
	sides: u32,
}
crate::typesystem!(Shape => "test::Shape", create = Shape::default());

#[derive(Debug, Default)]
struct Polygon {
	shape: Shape,
	regular: bool,
}
crate::typesystem!(Polygon => "test::Polygon", parent = Shape, via = shape, create = Polygon::default());

#[derive(Debug, Default)]
struct Square {
	polygon: Polygon,
}
crate::typesystem!(Square => "test::Square", parent = Polygon, via = polygon, create = Square::default());

#[derive(Debug, Default)]
struct Sketch;
crate::typesystem!(Sketch => "test::Sketch");

crate::abstract_type!(fn feature_type() => "test::Feature", parent = Type::root());

#[derive(Debug, Default)]
struct Pad;
crate::typesystem!(Pad => "test::Pad", parent_type = feature_type(), create = Pad);

#[rstest]
#[case::reflexive(Square::class_type(), Square::class_type(), true)]
#[case::parent(Square::class_type(), Polygon::class_type(), true)]
#[case::grandparent(Square::class_type(), Shape::class_type(), true)]
#[case::root(Square::class_type(), Type::root(), true)]
#[case::reversed(Shape::class_type(), Square::class_type(), false)]
#[case::unrelated(Sketch::class_type(), Shape::class_type(), false)]
#[case::abstract_parent(Pad::class_type(), feature_type(), true)]
#[case::bad_candidate(Type::bad(), Type::root(), false)]
#[case::bad_ancestor(Square::class_type(), Type::bad(), false)]
#[case::bad_both(Type::bad(), Type::bad(), false)]
fn test_is_derived_from(#[case] candidate: Type, #[case] ancestor: Type, #[case] expected: bool) {
	assert_eq!(candidate.is_derived_from(ancestor), expected);
}

#[test]
fn test_parent_chain() {
	assert_eq!(Square::class_type().parent(), Polygon::class_type());
	assert_eq!(Polygon::class_type().parent(), Shape::class_type());
	assert_eq!(Shape::class_type().parent(), Type::root());
	assert!(Type::root().parent().is_bad());
	assert_eq!(Type::root().name(), crate::ROOT_TYPE_NAME);
}

/// Name lookups see linked classes without any prior `class_type()` call.
#[test]
fn test_from_name_sees_linked_classes() {
	let ty = Type::from_name("test::Square");
	assert!(!ty.is_bad());
	assert_eq!(ty.name(), "test::Square");
	assert_eq!(ty, Square::class_type());
	assert!(Type::from_name("test::Missing").is_bad());
	assert!(ty.is_derived_from_name("test::Shape"));
}

#[test]
fn test_from_index_round_trips() {
	let ty = Polygon::class_type();
	assert_eq!(Type::from_index(ty.index()), ty);
	assert!(Type::from_index(u32::MAX).is_bad());
}

/// Re-registering with the same parent is idempotent; a different parent is rejected.
#[test]
fn test_duplicate_registration() {
	let again = Type::register("test::Polygon", Shape::class_type(), None).unwrap();
	assert_eq!(again, Polygon::class_type());

	let err = Type::register("test::Polygon", Sketch::class_type(), None).unwrap_err();
	assert_eq!(
		err,
		TypeError::IncompatibleDuplicate {
			name: "test::Polygon".into(),
			registered: "test::Shape",
			requested: "test::Sketch",
		}
	);
}

#[rstest]
#[case::empty("", TypeError::EmptyName)]
#[case::no_namespace("Widget", TypeError::MissingNamespace("Widget".into()))]
fn test_malformed_names(#[case] name: &str, #[case] expected: TypeError) {
	assert_eq!(Type::register(name, Type::root(), None).unwrap_err(), expected);
	assert!(Type::create_type(name, Type::root(), None).is_bad());
}

#[test]
fn test_bad_parent_is_rejected() {
	assert_eq!(
		Type::register("test::Orphan", Type::bad(), None).unwrap_err(),
		TypeError::BadParent("test::Orphan".into())
	);
	assert!(Type::from_name("test::Orphan").is_bad());
}

#[test]
fn test_sub_types() {
	let subs = Shape::class_type().all_sub_types();
	assert_eq!(subs.first(), Some(&Shape::class_type()));
	assert!(subs.contains(&Polygon::class_type()));
	assert!(subs.contains(&Square::class_type()));
	assert!(!subs.contains(&Sketch::class_type()));

	assert!(Shape::class_type().has_sub_types());
	assert!(!Square::class_type().has_sub_types());

	assert_eq!(Shape::class_type().sub_type_from_name("test::Square"), Square::class_type());
	assert!(Shape::class_type().sub_type_from_name("test::Sketch").is_bad());
	assert!(Type::count() > Square::class_type().index() as usize);
}

#[test]
fn test_create_instance() {
	let obj = Type::create_instance_by_name("test::Square").unwrap();
	assert_eq!(obj.class_type_polymorphic(), Square::class_type());
	assert_eq!(obj.class_name_polymorphic(), "test::Square");

	assert!(Sketch::class_type().is_abstract());
	assert!(Sketch::class_type().create_instance().is_none());
	assert!(feature_type().create_instance().is_none());
	assert!(Type::bad().create_instance().is_none());
}

/// Downcasts resolve the embedded ancestor sub-object and refuse unrelated classes.
#[test]
fn test_safe_downcast_through_ancestors() {
	let mut square = Square::default();
	square.polygon.shape.sides = 4;
	square.polygon.regular = true;

	let obj: &dyn BaseClass = &square;
	assert_eq!(safe_downcast::<Shape>(obj).map(|s| s.sides), Some(4));
	assert_eq!(safe_downcast::<Polygon>(obj).map(|p| p.regular), Some(true));
	assert!(safe_downcast::<Square>(obj).is_some());
	assert!(safe_downcast::<Sketch>(obj).is_none());

	let polygon = Polygon::default();
	assert!(safe_downcast::<Square>(&polygon).is_none());

	let obj: &mut dyn BaseClass = &mut square;
	safe_downcast_mut::<Shape>(obj).unwrap().sides = 5;
	assert_eq!(square.polygon.shape.sides, 5);
}
