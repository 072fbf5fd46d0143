//! Property values and their text encoding.
//!
//! Every variant is encoded as JSON text, so all property kinds share one decode path and
//! one failure behaviour on restore. JSON has no infinities or NaN, so non-finite floats are
//! written as the strings `"inf"`, `"-inf"` and `"nan"`.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Value kind held by a property class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	String,
	Integer,
	Float,
	Bool,
	StringList,
	IntegerList,
	FloatList,
	BoolList,
}

impl ValueKind {
	pub fn name(self) -> &'static str {
		match self {
			ValueKind::String => "string",
			ValueKind::Integer => "integer",
			ValueKind::Float => "float",
			ValueKind::Bool => "bool",
			ValueKind::StringList => "string list",
			ValueKind::IntegerList => "integer list",
			ValueKind::FloatList => "float list",
			ValueKind::BoolList => "bool list",
		}
	}

	/// Element kind of a list kind, `None` for scalars.
	pub fn element_kind(self) -> Option<ValueKind> {
		match self {
			ValueKind::StringList => Some(ValueKind::String),
			ValueKind::IntegerList => Some(ValueKind::Integer),
			ValueKind::FloatList => Some(ValueKind::Float),
			ValueKind::BoolList => Some(ValueKind::Bool),
			_ => None,
		}
	}

	pub fn is_list(self) -> bool {
		self.element_kind().is_some()
	}
}

impl fmt::Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Snapshot of a property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
	String(String),
	Integer(i64),
	Float(f64),
	Bool(bool),
	StringList(Vec<String>),
	IntegerList(Vec<i64>),
	FloatList(Vec<f64>),
	BoolList(Vec<bool>),
}

impl PropertyValue {
	pub fn kind(&self) -> ValueKind {
		match self {
			PropertyValue::String(_) => ValueKind::String,
			PropertyValue::Integer(_) => ValueKind::Integer,
			PropertyValue::Float(_) => ValueKind::Float,
			PropertyValue::Bool(_) => ValueKind::Bool,
			PropertyValue::StringList(_) => ValueKind::StringList,
			PropertyValue::IntegerList(_) => ValueKind::IntegerList,
			PropertyValue::FloatList(_) => ValueKind::FloatList,
			PropertyValue::BoolList(_) => ValueKind::BoolList,
		}
	}

	/// Default value of a freshly constructed property of `kind`.
	pub fn default_for(kind: ValueKind) -> Self {
		match kind {
			ValueKind::String => PropertyValue::String(String::new()),
			ValueKind::Integer => PropertyValue::Integer(0),
			ValueKind::Float => PropertyValue::Float(0.0),
			ValueKind::Bool => PropertyValue::Bool(false),
			ValueKind::StringList => PropertyValue::StringList(Vec::new()),
			ValueKind::IntegerList => PropertyValue::IntegerList(Vec::new()),
			ValueKind::FloatList => PropertyValue::FloatList(Vec::new()),
			ValueKind::BoolList => PropertyValue::BoolList(Vec::new()),
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			PropertyValue::String(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_integer(&self) -> Option<i64> {
		match self {
			PropertyValue::Integer(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f64> {
		match self {
			PropertyValue::Float(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			PropertyValue::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Number of elements of a list value.
	pub fn list_len(&self) -> Option<usize> {
		match self {
			PropertyValue::StringList(v) => Some(v.len()),
			PropertyValue::IntegerList(v) => Some(v.len()),
			PropertyValue::FloatList(v) => Some(v.len()),
			PropertyValue::BoolList(v) => Some(v.len()),
			_ => None,
		}
	}

	/// Encodes the value as JSON text.
	pub fn encode(&self) -> Result<String, serde_json::Error> {
		match self {
			PropertyValue::String(v) => serde_json::to_string(v),
			PropertyValue::Integer(v) => serde_json::to_string(v),
			PropertyValue::Float(v) => serde_json::to_string(&JsonFloat(*v)),
			PropertyValue::Bool(v) => serde_json::to_string(v),
			PropertyValue::StringList(v) => serde_json::to_string(v),
			PropertyValue::IntegerList(v) => serde_json::to_string(v),
			PropertyValue::FloatList(v) => {
				serde_json::to_string(&v.iter().copied().map(JsonFloat).collect::<Vec<_>>())
			}
			PropertyValue::BoolList(v) => serde_json::to_string(v),
		}
	}

	/// Decodes JSON text as a value of `kind`.
	///
	/// Integer text decodes as a float, which keeps integer-to-float type migrations
	/// lossless without a hook.
	pub fn decode(kind: ValueKind, text: &str) -> Result<Self, serde_json::Error> {
		Ok(match kind {
			ValueKind::String => PropertyValue::String(serde_json::from_str(text)?),
			ValueKind::Integer => PropertyValue::Integer(serde_json::from_str(text)?),
			ValueKind::Float => PropertyValue::Float(serde_json::from_str::<JsonFloat>(text)?.0),
			ValueKind::Bool => PropertyValue::Bool(serde_json::from_str(text)?),
			ValueKind::StringList => PropertyValue::StringList(serde_json::from_str(text)?),
			ValueKind::IntegerList => PropertyValue::IntegerList(serde_json::from_str(text)?),
			ValueKind::FloatList => PropertyValue::FloatList(
				serde_json::from_str::<Vec<JsonFloat>>(text)?
					.into_iter()
					.map(|JsonFloat(v)| v)
					.collect(),
			),
			ValueKind::BoolList => PropertyValue::BoolList(serde_json::from_str(text)?),
		})
	}

	/// Value equality where NaN equals NaN.
	pub fn same_as(&self, other: &PropertyValue) -> bool {
		fn float_eq(a: f64, b: f64) -> bool {
			a == b || (a.is_nan() && b.is_nan())
		}
		match (self, other) {
			(PropertyValue::Float(a), PropertyValue::Float(b)) => float_eq(*a, *b),
			(PropertyValue::FloatList(a), PropertyValue::FloatList(b)) => {
				a.len() == b.len() && a.iter().zip(b).all(|(a, b)| float_eq(*a, *b))
			}
			_ => self == other,
		}
	}

	/// Approximate heap plus inline footprint.
	pub fn estimated_size(&self) -> usize {
		let heap = match self {
			PropertyValue::String(v) => v.capacity(),
			PropertyValue::StringList(v) => v
				.iter()
				.map(|s| size_of::<String>() + s.capacity())
				.sum(),
			PropertyValue::IntegerList(v) => v.len() * size_of::<i64>(),
			PropertyValue::FloatList(v) => v.len() * size_of::<f64>(),
			PropertyValue::BoolList(v) => v.len(),
			PropertyValue::Integer(_) | PropertyValue::Float(_) | PropertyValue::Bool(_) => 0,
		};
		size_of::<Self>() + heap
	}
}

/// Float that survives JSON: finite values as numbers, the rest as named strings.
struct JsonFloat(f64);

impl Serialize for JsonFloat {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self.0 {
			v if v.is_finite() => serializer.serialize_f64(v),
			v if v.is_nan() => serializer.serialize_str("nan"),
			v if v > 0.0 => serializer.serialize_str("inf"),
			_ => serializer.serialize_str("-inf"),
		}
	}
}

impl<'de> Deserialize<'de> for JsonFloat {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Repr {
			Number(f64),
			Named(String),
		}

		match Repr::deserialize(deserializer)? {
			Repr::Number(v) => Ok(JsonFloat(v)),
			Repr::Named(name) => match name.as_str() {
				"inf" => Ok(JsonFloat(f64::INFINITY)),
				"-inf" => Ok(JsonFloat(f64::NEG_INFINITY)),
				"nan" => Ok(JsonFloat(f64::NAN)),
				_ => Err(de::Error::invalid_value(
					de::Unexpected::Str(&name),
					&"a number, \"inf\", \"-inf\" or \"nan\"",
				)),
			},
		}
	}
}

macro_rules! impl_from {
	($($rust:ty => $variant:ident),* $(,)?) => {
		$(
			impl From<$rust> for PropertyValue {
				fn from(v: $rust) -> Self {
					PropertyValue::$variant(v)
				}
			}
		)*
	};
}

impl_from! {
	String => String,
	i64 => Integer,
	f64 => Float,
	bool => Bool,
	Vec<String> => StringList,
	Vec<i64> => IntegerList,
	Vec<f64> => FloatList,
	Vec<bool> => BoolList,
}

impl From<&str> for PropertyValue {
	fn from(v: &str) -> Self {
		PropertyValue::String(v.to_string())
	}
}

mod sealed {
	pub trait Sealed {}
	impl Sealed for String {}
	impl Sealed for i64 {}
	impl Sealed for f64 {}
	impl Sealed for bool {}
	impl Sealed for Vec<String> {}
	impl Sealed for Vec<i64> {}
	impl Sealed for Vec<f64> {}
	impl Sealed for Vec<bool> {}
}

/// Rust types a [`PropertyValue`] can be read back as.
pub trait FromPropertyValue: sealed::Sealed + Sized {
	/// Extracts the value, returning `None` when the kind doesn't match.
	fn from_value(value: PropertyValue) -> Option<Self>;

	fn value_kind() -> ValueKind;
}

macro_rules! impl_from_property_value {
	($($rust:ty => $variant:ident),* $(,)?) => {
		$(
			impl FromPropertyValue for $rust {
				fn from_value(value: PropertyValue) -> Option<Self> {
					match value {
						PropertyValue::$variant(v) => Some(v),
						_ => None,
					}
				}

				fn value_kind() -> ValueKind {
					ValueKind::$variant
				}
			}
		)*
	};
}

impl_from_property_value! {
	String => String,
	i64 => Integer,
	f64 => Float,
	bool => Bool,
	Vec<String> => StringList,
	Vec<i64> => IntegerList,
	Vec<f64> => FloatList,
	Vec<bool> => BoolList,
}
