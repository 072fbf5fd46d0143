use super::PropertyContainer;
use crate::error::PropertyError;
use crate::table::{DynamicPropertyTable, PropertySpec, StaticPropertyTable};

/// Declares a property container class.
///
/// ```ignore
/// #[derive(Debug, Default)]
/// struct Part {
///     dynamic: DynamicPropertyTable,
///     label: PropertyString,
///     placement: PropertyString,
/// }
///
/// property_container! {
///     Part => "part::Part", dynamic = dynamic {
///         label: PropertyString => "Label" { group: "Base", description: "User name" },
///         placement: PropertyString => "Placement",
///     }
/// }
///
/// #[derive(Debug, Default)]
/// struct Pad {
///     part: Part,
///     length: PropertyFloat,
/// }
///
/// property_container! {
///     Pad => "part::Pad", parent = Part, via = part {
///         length: PropertyFloat => "Length" { flags: PropertyFlags::OUTPUT },
///     }
/// }
///
/// impl PropertyHooks for Part {}
/// impl PropertyHooks for Pad {}
/// ```
///
/// A root class owns the [`DynamicPropertyTable`] field named by `dynamic`. A derived class
/// embeds its parent in the field named by `via` and shares the parent's dynamic table.
/// Each declared property accepts the [`PropertySpec`] builder keys `group`,
/// `description`, `flags`, `read_only` and `hidden`.
///
/// A derived class may follow its declarations with an `override` block that changes the
/// metadata of inherited properties. Keys start from the inherited values:
///
/// ```ignore
/// property_container! {
///     Sketch => "part::Sketch", parent = Part, via = part {}
///     override {
///         "Placement" { group: "Attachment", read_only: true },
///     }
/// }
/// ```
///
/// The type must implement `Default` and [`PropertyHooks`](crate::PropertyHooks). The macro
/// adds an inherent `create()` that returns a default instance with its static properties
/// attached; the class factory uses it.
#[macro_export]
macro_rules! property_container {
	(
		@impl $ty:ty, parent_table = $parent_table:expr, dynamic = $dynamic:ident {
			$( $pfield:ident : $pkind:ty => $pname:literal $({ $($key:ident : $val:expr),* $(,)? })? ),* $(,)?
		} overrides {
			$( $oname:literal { $($okey:ident : $oval:expr),* $(,)? } ),* $(,)?
		}
	) => {
		impl $ty {
			/// Returns a default instance with its static properties attached.
			pub fn create() -> Self {
				let mut obj = <Self as ::std::default::Default>::default();
				$crate::PropertyContainer::attach_static_properties(&mut obj);
				obj
			}
		}

		impl $crate::StaticProperties for $ty {
			fn static_property_table() -> &'static $crate::StaticPropertyTable {
				static TABLE: ::std::sync::OnceLock<$crate::StaticPropertyTable> = ::std::sync::OnceLock::new();
				TABLE.get_or_init(|| {
					let class = <$ty as $crate::__private::ClassType>::class_type();
					#[allow(unused_mut)]
					let mut table = $crate::StaticPropertyTable::new(class, ::std::option::Option::Some($parent_table));
					$(
						let spec = $crate::PropertySpec::new(
							$pname,
							class,
							<$pkind as $crate::__private::ClassType>::class_type(),
							$crate::PropertyAccessor {
								get: {
									fn get<'a>(owner: &'a (dyn ::std::any::Any + 'static)) -> ::std::option::Option<&'a dyn $crate::Property> {
										let owner = owner.downcast_ref::<$ty>()?;
										::std::option::Option::Some(&owner.$pfield)
									}
									get
								},
								get_mut: {
									fn get_mut<'a>(owner: &'a mut (dyn ::std::any::Any + 'static)) -> ::std::option::Option<&'a mut dyn $crate::Property> {
										let owner = owner.downcast_mut::<$ty>()?;
										::std::option::Option::Some(&mut owner.$pfield)
									}
									get_mut
								},
							},
						);
						$($( let spec = spec.$key($val); )*)?
						$crate::__private::add_static_or_abort(&mut table, spec);
					)*
					$(
						$crate::__private::override_static_or_abort(&mut table, $oname, |spec: $crate::PropertySpec| {
							$( let spec = spec.$okey($oval); )*
							spec
						});
					)*
					$crate::__private::finish_static_table(table)
				})
			}
		}

		impl $crate::PropertyContainer for $ty {
			fn static_property_table_polymorphic(&self) -> &'static $crate::StaticPropertyTable {
				<$ty as $crate::StaticProperties>::static_property_table()
			}

			fn dynamic_properties(&self) -> &$crate::DynamicPropertyTable {
				$crate::__private::DynamicTableSource::dynamic_table(&self.$dynamic)
			}

			fn dynamic_properties_mut(&mut self) -> &mut $crate::DynamicPropertyTable {
				$crate::__private::DynamicTableSource::dynamic_table_mut(&mut self.$dynamic)
			}

			fn hook_before_value_change(&self, prop: &dyn $crate::Property) {
				<$ty as $crate::PropertyHooks>::on_before_property_value_changing(self, prop)
			}

			fn hook_changed(&self, prop: &dyn $crate::Property) {
				<$ty as $crate::PropertyHooks>::on_property_changed(self, prop)
			}

			fn hook_status_changed(&self, prop: &dyn $crate::Property, old: $crate::Status) {
				<$ty as $crate::PropertyHooks>::on_property_status_changed(self, prop, old)
			}

			fn hook_before_store(&self) {
				<$ty as $crate::PropertyHooks>::before_store(self)
			}

			fn hook_changed_name(&mut self, element: &$crate::__private::Element, version: u32) -> bool {
				<$ty as $crate::PropertyHooks>::handle_changed_property_name(self, element, version)
			}

			fn hook_changed_type(&mut self, element: &$crate::__private::Element, version: u32) -> bool {
				<$ty as $crate::PropertyHooks>::handle_changed_property_type(self, element, version)
			}

			fn hook_config(&self) -> ::std::sync::Arc<$crate::PropertyConfig> {
				<$ty as $crate::PropertyHooks>::property_config(self)
			}
		}

		impl $crate::__private::Persistence for $ty {
			fn estimated_size(&self) -> usize {
				$crate::PropertyContainer::properties_estimated_size(self)
			}

			fn store(
				&self,
				writer: &mut dyn $crate::__private::PropertyWriter,
				version: u32,
			) -> ::std::result::Result<(), $crate::__private::PersistenceError> {
				$crate::PropertyContainer::store_properties(self, writer, version)
			}

			fn restore(
				&mut self,
				reader: &mut dyn $crate::__private::PropertyReader,
				version: u32,
			) -> ::std::result::Result<(), $crate::__private::PersistenceError> {
				$crate::PropertyContainer::restore_properties(self, reader, version)
			}
		}
	};

	($ty:ty => $name:literal, dynamic = $dynamic:ident { $($body:tt)* }) => {
		$crate::__private::typesystem!(
			$ty => $name,
			parent_type = $crate::property_container_type(),
			create = <$ty>::create()
		);
		$crate::property_container!(
			@impl $ty,
			parent_table = $crate::StaticPropertyTable::root(),
			dynamic = $dynamic { $($body)* } overrides {}
		);
	};

	(
		$ty:ty => $name:literal, parent = $parent:ty, via = $via:ident { $($body:tt)* }
		$(override { $($over:tt)* })?
	) => {
		$crate::__private::typesystem!($ty => $name, parent = $parent, via = $via, create = <$ty>::create());
		$crate::property_container!(
			@impl $ty,
			parent_table = <$parent as $crate::StaticProperties>::static_property_table(),
			dynamic = $via { $($body)* } overrides { $($($over)*)? }
		);
	};
}

/// Where a container's dynamic table lives: directly in a field, or in the embedded parent.
#[doc(hidden)]
pub trait DynamicTableSource {
	fn dynamic_table(&self) -> &DynamicPropertyTable;

	fn dynamic_table_mut(&mut self) -> &mut DynamicPropertyTable;
}

impl DynamicTableSource for DynamicPropertyTable {
	fn dynamic_table(&self) -> &DynamicPropertyTable {
		self
	}

	fn dynamic_table_mut(&mut self) -> &mut DynamicPropertyTable {
		self
	}
}

impl<T: PropertyContainer> DynamicTableSource for T {
	fn dynamic_table(&self) -> &DynamicPropertyTable {
		self.dynamic_properties()
	}

	fn dynamic_table_mut(&mut self) -> &mut DynamicPropertyTable {
		self.dynamic_properties_mut()
	}
}

#[doc(hidden)]
pub fn add_static_or_abort(table: &mut StaticPropertyTable, spec: PropertySpec) {
	let name = spec.name;
	if let Err(err) = table.add_property(spec) {
		abort_declaration(table, name, err);
	}
}

#[doc(hidden)]
pub fn override_static_or_abort(
	table: &mut StaticPropertyTable,
	name: &'static str,
	apply: impl FnOnce(PropertySpec) -> PropertySpec,
) {
	let result = match table.parent().and_then(|parent| parent.find(name)) {
		Some(inherited) => {
			let spec = apply(inherited.clone());
			table.override_metadata(name, spec.group, spec.description, spec.flags)
		}
		None => Err(PropertyError::UnknownStatic(name.to_string())),
	};
	if let Err(err) = result {
		abort_declaration(table, name, err);
	}
}

fn abort_declaration(table: &StaticPropertyTable, name: &str, err: PropertyError) -> ! {
	tracing::error!(
		domain = "properties",
		class = table.class().name(),
		name,
		error = %err,
		"invalid static property declaration"
	);
	panic!("invalid static property declaration on `{}`: {err}", table.class().name());
}

#[doc(hidden)]
pub fn finish_static_table(table: StaticPropertyTable) -> StaticPropertyTable {
	tracing::debug!(
		domain = "properties",
		class = table.class().name(),
		declared = table.len(),
		"built static property table"
	);
	table.debug_dump();
	table
}
