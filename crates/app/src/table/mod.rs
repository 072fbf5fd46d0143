mod dynamic_table;
mod static_table;

pub use dynamic_table::{DynamicPropertyData, DynamicPropertyTable};
pub use static_table::{PropertyAccessor, PropertySpec, StaticPropertyTable};
