//! Schema context consumed by the binder.

mod registry;

pub use registry::{PropertyDef, PropertyType, SchemaProvider, SchemaRegistry, TypeSchema};
