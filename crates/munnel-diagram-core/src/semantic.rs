//! Semantic diagram model types.
//!
//! These types describe a diagram purely in terms of what is drawn: labeled
//! nodes, clusters grouping them, and directed edges between them.
//!
//! # Pipeline Position
//!
//! ```text
//! DiagramContext (scoped declarations)
//!     ↓ finish
//! Semantic Model (these types)
//!     ↓ structure
//! DiagramGraph (resolved references)
//!     ↓ export
//! DOT source
//!     ↓ graphviz
//! Image
//! ```
//!
//! # Organization
//!
//! - [`diagram`] - [`Diagram`], [`Scope`], [`Direction`], [`CurveStyle`]
//! - [`element`] - [`Element`], [`Node`], [`Cluster`], [`Edge`]

pub mod diagram;
pub mod element;

pub use diagram::*;
pub use element::*;
