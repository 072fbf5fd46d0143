//! Per-property status bits.
//!
//! Bits below [`StatusBit::PropertyDynamic`] are runtime state. The range
//! `PropertyDynamic..=PropertyOutput` mirrors the declared [`PropertyFlags`] and is written
//! once when the property is attached; the container refuses to change it afterwards.

use crate::flags::PropertyFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StatusBit {
	/// Value changed since the owner last purged it.
	Touched = 0,
	/// Value may not be changed.
	Immutable = 1,
	ReadOnly = 2,
	Hidden = 3,
	Transient = 4,
	Output = 7,
	/// Changes do not mark the owning document modified.
	NoModify = 9,
	NoRecompute = 11,
	/// Floats are stored with single precision.
	Single = 12,
	/// Element order matters to the owner (lists).
	Ordered = 13,
	Busy = 15,
	/// Editors offer a custom edit action.
	UserEdit = 17,
	PropertyDynamic = 21,
	PropertyNoPersist = 22,
	PropertyNoRecompute = 23,
	PropertyReadOnly = 24,
	PropertyTransient = 25,
	PropertyHidden = 26,
	PropertyOutput = 27,
	User1 = 28,
	User2 = 29,
	User3 = 30,
	User4 = 31,
}

const STATIC_BEGIN: u8 = StatusBit::PropertyDynamic as u8;
const STATIC_END: u8 = StatusBit::User1 as u8;

impl StatusBit {
	pub const fn mask(self) -> u32 {
		1 << self as u8
	}

	/// Returns true for bits that mirror declared flags.
	pub const fn is_static(self) -> bool {
		let bit = self as u8;
		bit >= STATIC_BEGIN && bit < STATIC_END
	}
}

/// Packed status bits of one property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Status(u32);

impl Status {
	pub const fn empty() -> Self {
		Self(0)
	}

	pub const fn from_bits(bits: u32) -> Self {
		Self(bits)
	}

	pub const fn bits(self) -> u32 {
		self.0
	}

	pub const fn test(self, bit: StatusBit) -> bool {
		self.0 & bit.mask() != 0
	}

	pub const fn with(self, bit: StatusBit, on: bool) -> Self {
		if on {
			Self(self.0 | bit.mask())
		} else {
			Self(self.0 & !bit.mask())
		}
	}

	pub(crate) fn set(&mut self, bit: StatusBit, on: bool) {
		*self = self.with(bit, on);
	}

	/// Static bits corresponding to `flags`.
	pub fn from_flags(flags: PropertyFlags) -> Self {
		[
			(PropertyFlags::DYNAMIC, StatusBit::PropertyDynamic),
			(PropertyFlags::NO_PERSIST, StatusBit::PropertyNoPersist),
			(PropertyFlags::NO_RECOMPUTE, StatusBit::PropertyNoRecompute),
			(PropertyFlags::READ_ONLY, StatusBit::PropertyReadOnly),
			(PropertyFlags::TRANSIENT, StatusBit::PropertyTransient),
			(PropertyFlags::HIDDEN, StatusBit::PropertyHidden),
			(PropertyFlags::OUTPUT, StatusBit::PropertyOutput),
		]
		.into_iter()
		.fold(Self::empty(), |status, (flag, bit)| {
			status.with(bit, flags.contains(flag))
		})
	}

	/// Replaces the static range with the bits for `flags`, keeping runtime bits.
	pub(crate) fn attach_flags(&mut self, flags: PropertyFlags) {
		let static_mask = (STATIC_BEGIN..STATIC_END).fold(0u32, |mask, bit| mask | 1 << bit);
		self.0 = (self.0 & !static_mask) | Self::from_flags(flags).0;
	}
}
