//! Inspector metadata, registry and the decorator write path

pub mod decorator;
pub mod descriptor;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use decorator::NodeDecorator;
pub use descriptor::{InspectorDescriptor, TargetKind};
pub use registry::{BoxedInspector, InspectorRegistry, RegistryBuilder};
