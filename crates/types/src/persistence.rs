//! Persistence boundary.
//!
//! A container writes one [`Element`] per persistable property, in enumeration order, and
//! reads them back in the same order. The wire format is owned by the writer. Version
//! numbers are passed through untouched; the container only uses them to decide whether a
//! migration hook applies.

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

/// One stored property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
	pub name: String,
	/// Class name of the property, e.g. `app::PropertyFloat`.
	pub type_tag: String,
	/// Encoded value text.
	pub value: String,
	/// Present for dynamic properties, so they can be recreated on restore.
	pub dynamic: Option<DynamicElement>,
}

/// Metadata needed to recreate a dynamic property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicElement {
	pub group: String,
	pub description: String,
	pub flags: u32,
}

impl Element {
	pub fn new(
		name: impl Into<String>,
		type_tag: impl Into<String>,
		value: impl Into<String>,
	) -> Self {
		Self {
			name: name.into(),
			type_tag: type_tag.into(),
			value: value.into(),
			dynamic: None,
		}
	}

	pub fn with_dynamic(mut self, dynamic: DynamicElement) -> Self {
		self.dynamic = Some(dynamic);
		self
	}

	pub fn is_dynamic(&self) -> bool {
		self.dynamic.is_some()
	}
}

pub trait PropertyWriter {
	fn write_element(&mut self, element: Element) -> Result<(), PersistenceError>;
}

pub trait PropertyReader {
	/// Returns the next element, or `None` once the input is exhausted.
	fn read_element(&mut self) -> Result<Option<Element>, PersistenceError>;
}

/// Store/restore contract implemented by every property container.
pub trait Persistence {
	/// Approximate heap footprint, for diagnostics only.
	fn estimated_size(&self) -> usize;

	fn store(&self, writer: &mut dyn PropertyWriter, version: u32) -> Result<(), PersistenceError>;

	fn restore(
		&mut self,
		reader: &mut dyn PropertyReader,
		version: u32,
	) -> Result<(), PersistenceError>;
}

/// In-memory element sequence, encodable with postcard.
///
/// Writing appends; reading consumes from an internal cursor that [`ElementStream::rewind`]
/// resets. The cursor is not part of the encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementStream {
	version: u32,
	elements: Vec<Element>,
	#[serde(skip)]
	cursor: usize,
}

impl ElementStream {
	pub fn new(version: u32) -> Self {
		Self {
			version,
			..Self::default()
		}
	}

	pub fn version(&self) -> u32 {
		self.version
	}

	pub fn elements(&self) -> &[Element] {
		&self.elements
	}

	pub fn elements_mut(&mut self) -> &mut Vec<Element> {
		&mut self.elements
	}

	pub fn len(&self) -> usize {
		self.elements.len()
	}

	pub fn is_empty(&self) -> bool {
		self.elements.is_empty()
	}

	pub fn rewind(&mut self) {
		self.cursor = 0;
	}

	pub fn to_bytes(&self) -> Result<Vec<u8>, PersistenceError> {
		Ok(postcard::to_stdvec(self)?)
	}

	pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistenceError> {
		Ok(postcard::from_bytes(bytes)?)
	}
}

impl PropertyWriter for ElementStream {
	fn write_element(&mut self, element: Element) -> Result<(), PersistenceError> {
		self.elements.push(element);
		Ok(())
	}
}

impl PropertyReader for ElementStream {
	fn read_element(&mut self) -> Result<Option<Element>, PersistenceError> {
		let element = self.elements.get(self.cursor).cloned();
		if element.is_some() {
			self.cursor += 1;
		}
		Ok(element)
	}
}
