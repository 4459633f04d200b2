//! Domain layer: artifacts and collaborator ports

pub mod models;
pub mod ports;

pub use models::{
    ComplexityLevel, FromProperty, Node, NodeError, NodeKind, NodeStateHash, PropertyValue,
};
pub use ports::{Inspector, NodeStore, SharedNode};
