//! Runtime class registry for the pfc object model.
//!
//! Every registered class owns one [`Type`], discovered at run time through
//! [`BaseClass::class_type_polymorphic`]. [`safe_downcast`] is the only supported way to go
//! from a trait object back to a concrete class. The [`persistence`] module defines the
//! boundary used by containers to store and restore their state.

mod class;
mod error;
mod macros;
pub mod persistence;
mod types;

pub use class::{BaseClass, ClassType, base_class_type, safe_downcast, safe_downcast_mut};
pub use error::{PersistenceError, TypeError};
pub use persistence::{
	DynamicElement, Element, ElementStream, Persistence, PropertyReader, PropertyWriter,
};
pub use types::{CreateInstanceFn, ROOT_TYPE_NAME, Type, TypeReg};

#[doc(hidden)]
pub mod __private {
	pub use inventory;

	pub use crate::types::register_or_abort;
}
