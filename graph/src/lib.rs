//! Arbor Graph Storage
//!
//! This crate provides the in-memory graph store that backs document trees:
//! - Node and edge storage keyed by stable identifiers
//! - Type index: Find nodes by type
//! - Attribute index: Find nodes by type and property value
//! - Adjacency index: Find typed edges from/to a node in creation order

mod graph;
mod index;

pub use graph::*;
