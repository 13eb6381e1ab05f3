//! Arbor Core Types
//!
//! This crate provides the foundational types used throughout Arbor:
//! - Identity types (NodeId, EdgeId)
//! - Type identifiers (TypeId, EdgeTypeId)
//! - Value types (the Value enum stored in node and edge properties)
//! - Entity structures (Node, Edge)
//! - Common error types

mod entity;
mod error;
mod id;
mod value;

pub use entity::*;
pub use error::*;
pub use id::*;
pub use value::*;
