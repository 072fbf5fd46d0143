/// Registers a struct as a class and implements [`BaseClass`](crate::BaseClass) and
/// [`ClassType`](crate::ClassType) for it.
///
/// ```ignore
/// typesystem!(Shape => "part::Shape", create = Shape::default());
/// typesystem!(Circle => "part::Circle", parent = Shape, via = shape, create = Circle::default());
/// typesystem!(Marker => "part::Marker", parent_type = part_feature_type());
/// ```
///
/// `via` names the field holding the parent sub-object; upcasts to any ancestor go through
/// it. `parent_type` attaches the class under an abstract type that has no struct. Omitting
/// `create` registers the class without a factory.
///
/// The descriptor is registered on first use of `class_type()` and at link time through
/// [`TypeReg`](crate::TypeReg). Registration errors abort the process.
#[macro_export]
macro_rules! typesystem {
	(@class_type $ty:ty, $name:literal, $parent:expr, [$($create:expr)?]) => {
		impl $crate::ClassType for $ty {
			fn class_type() -> $crate::Type {
				static TYPE: ::std::sync::OnceLock<$crate::Type> = ::std::sync::OnceLock::new();
				*TYPE.get_or_init(|| {
					$crate::__private::register_or_abort(
						$name,
						$parent,
						$crate::typesystem!(@create [$($create)?]),
					)
				})
			}
		}

		$crate::__private::inventory::submit! {
			$crate::TypeReg(<$ty as $crate::ClassType>::class_type)
		}
	};

	(@create []) => {
		::std::option::Option::None
	};

	(@create [$create:expr]) => {{
		fn create() -> ::std::boxed::Box<dyn $crate::BaseClass> {
			::std::boxed::Box::new($create)
		}
		::std::option::Option::Some(create as $crate::CreateInstanceFn)
	}};

	($ty:ty => $name:literal $(, create = $create:expr)? $(,)?) => {
		$crate::typesystem!($ty => $name, parent_type = $crate::Type::root() $(, create = $create)?);
	};

	($ty:ty => $name:literal, parent_type = $parent:expr $(, create = $create:expr)? $(,)?) => {
		$crate::typesystem!(@class_type $ty, $name, $parent, [$($create)?]);

		impl $crate::BaseClass for $ty {
			fn class_type_polymorphic(&self) -> $crate::Type {
				<$ty as $crate::ClassType>::class_type()
			}

			fn upcast_ref(&self, target: $crate::Type) -> ::std::option::Option<&(dyn ::std::any::Any + 'static)> {
				if target == <$ty as $crate::ClassType>::class_type() {
					::std::option::Option::Some(self as &(dyn ::std::any::Any + 'static))
				} else {
					::std::option::Option::None
				}
			}

			fn upcast_mut(
				&mut self,
				target: $crate::Type,
			) -> ::std::option::Option<&mut (dyn ::std::any::Any + 'static)> {
				if target == <$ty as $crate::ClassType>::class_type() {
					::std::option::Option::Some(self as &mut (dyn ::std::any::Any + 'static))
				} else {
					::std::option::Option::None
				}
			}
		}
	};

	($ty:ty => $name:literal, parent = $parent:ty, via = $field:ident $(, create = $create:expr)? $(,)?) => {
		$crate::typesystem!(
			@class_type $ty,
			$name,
			<$parent as $crate::ClassType>::class_type(),
			[$($create)?]
		);

		impl $crate::BaseClass for $ty {
			fn class_type_polymorphic(&self) -> $crate::Type {
				<$ty as $crate::ClassType>::class_type()
			}

			fn upcast_ref(&self, target: $crate::Type) -> ::std::option::Option<&(dyn ::std::any::Any + 'static)> {
				if target == <$ty as $crate::ClassType>::class_type() {
					::std::option::Option::Some(self as &(dyn ::std::any::Any + 'static))
				} else {
					$crate::BaseClass::upcast_ref(&self.$field, target)
				}
			}

			fn upcast_mut(
				&mut self,
				target: $crate::Type,
			) -> ::std::option::Option<&mut (dyn ::std::any::Any + 'static)> {
				if target == <$ty as $crate::ClassType>::class_type() {
					::std::option::Option::Some(self as &mut (dyn ::std::any::Any + 'static))
				} else {
					$crate::BaseClass::upcast_mut(&mut self.$field, target)
				}
			}
		}
	};
}

/// Declares a function returning the [`Type`](crate::Type) of an abstract class.
///
/// Abstract classes have no struct and no factory; they exist so concrete classes can share
/// an ancestor for [`Type::is_derived_from`](crate::Type::is_derived_from) queries.
#[macro_export]
macro_rules! abstract_type {
	($(#[$meta:meta])* $vis:vis fn $fn_name:ident() => $name:literal, parent = $parent:expr $(,)?) => {
		$(#[$meta])*
		$vis fn $fn_name() -> $crate::Type {
			static TYPE: ::std::sync::OnceLock<$crate::Type> = ::std::sync::OnceLock::new();
			*TYPE.get_or_init(|| $crate::__private::register_or_abort($name, $parent, ::std::option::Option::None))
		}

		$crate::__private::inventory::submit! {
			$crate::TypeReg($fn_name)
		}
	};
}
