bitflags::bitflags! {
	/// Declared metadata of a property, fixed once the property is attached.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct PropertyFlags: u32 {
		/// Not editable from property editors.
		const READ_ONLY = 1 << 0;
		/// Not saved; the value is rebuilt at run time.
		const TRANSIENT = 1 << 1;
		/// Not shown in property editors.
		const HIDDEN = 1 << 2;
		/// Changes do not touch the owner.
		const OUTPUT = 1 << 3;
		/// Changes do not trigger a recompute of the owner.
		const NO_RECOMPUTE = 1 << 4;
		/// Neither the value nor the declaration is saved.
		const NO_PERSIST = 1 << 5;
		/// Added at run time to one instance.
		const DYNAMIC = 1 << 6;
		/// The declared default is meaningful to editors.
		const HAS_DEFAULT = 1 << 7;
	}
}

impl PropertyFlags {
	/// Returns true when the property takes part in store/restore.
	pub fn is_persistable(self) -> bool {
		!self.intersects(Self::TRANSIENT | Self::NO_PERSIST)
	}
}
