use pfc_types::PersistenceError;

use crate::status::StatusBit;
use crate::value::ValueKind;

/// Failures of container operations.
///
/// Lookups never produce these; a missing property is `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertyError {
	#[error("no class named `{0}` is registered")]
	NoSuchObject(String),
	#[error("class `{0}` is not a property class")]
	NotAPropertyType(String),
	#[error("property class `{0}` is abstract")]
	AbstractType(String),
	#[error("property `{name}` holds {expected}, not {got}")]
	TypeMismatch {
		name: String,
		expected: ValueKind,
		got: ValueKind,
	},
	#[error("property `{0}` already exists")]
	DuplicateName(String),
	#[error("`{0}` is a static property name")]
	StaticNameCollision(String),
	#[error("static property `{name}` is declared twice on `{class}`")]
	DuplicateStatic { name: String, class: &'static str },
	#[error("static property `{0}` is not declared by any ancestor")]
	UnknownStatic(String),
	#[error("property `{0}` not found")]
	NotFound(String),
	#[error("property `{0}` is immutable")]
	Immutable(String),
	#[error("status bit {0:?} mirrors declared flags and cannot be changed")]
	StaticStatusBit(StatusBit),
	#[error("index {index} out of range for `{name}` of length {len}")]
	IndexOutOfRange {
		name: String,
		index: usize,
		len: usize,
	},
	#[error("cannot encode `{name}`: {reason}")]
	Encode { name: String, reason: String },
}

impl PropertyError {
	/// Returns true for wiring defects that callers should surface instead of retrying.
	pub fn is_configuration_error(&self) -> bool {
		matches!(
			self,
			Self::NoSuchObject(_)
				| Self::NotAPropertyType(_)
				| Self::AbstractType(_)
				| Self::DuplicateStatic { .. }
				| Self::UnknownStatic(_)
		)
	}
}

impl From<PropertyError> for PersistenceError {
	fn from(err: PropertyError) -> Self {
		PersistenceError::Property(err.to_string())
	}
}
