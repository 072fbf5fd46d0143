use std::any::Any;

use crate::types::Type;

/// Capability shared by every registered class: a runtime type and checked downcasts.
///
/// Derived classes embed their parent as a field. [`BaseClass::upcast_ref`] resolves the
/// sub-object belonging to an ancestor class by walking those fields, which is what makes
/// [`safe_downcast`] work across the hierarchy. Implementations are generated by
/// [`typesystem!`](crate::typesystem).
pub trait BaseClass: Any {
	/// Returns the runtime class of `self`, not the declared type of the reference.
	fn class_type_polymorphic(&self) -> Type;

	/// Returns the sub-object of class `target`, if `self` is or embeds one.
	fn upcast_ref(&self, target: Type) -> Option<&(dyn Any + 'static)>;

	fn upcast_mut(&mut self, target: Type) -> Option<&mut (dyn Any + 'static)>;

	fn class_name_polymorphic(&self) -> &'static str {
		self.class_type_polymorphic().name()
	}

	fn is_derived_from(&self, ancestor: Type) -> bool {
		self.class_type_polymorphic().is_derived_from(ancestor)
	}
}

/// Static access to a class descriptor.
pub trait ClassType: BaseClass + Sized {
	fn class_type() -> Type;
}

/// Checked downcast from any registered object to class `T` or one of its ancestors.
///
/// The registry is consulted first, so an unrelated class returns `None` without touching
/// the object.
pub fn safe_downcast<T: ClassType>(obj: &(impl BaseClass + ?Sized)) -> Option<&T> {
	let target = T::class_type();
	if !obj.is_derived_from(target) {
		return None;
	}
	obj.upcast_ref(target)?.downcast_ref::<T>()
}

pub fn safe_downcast_mut<T: ClassType>(obj: &mut (impl BaseClass + ?Sized)) -> Option<&mut T> {
	let target = T::class_type();
	if !obj.is_derived_from(target) {
		return None;
	}
	obj.upcast_mut(target)?.downcast_mut::<T>()
}

pub fn base_class_type() -> Type {
	Type::root()
}
