//! Read-only game definitions consumed by the loader and the simulation

pub mod field_type;

pub use field_type::{FieldKind, FieldType, FieldTypeTable, ProductionParams};
