//! Munnel Diagram Core Types
//!
//! This crate provides the presentational model behind the Munnel
//! connectivity diagram. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: CSS color parsing with Graphviz output ([`color::Color`])
//! - **Semantic**: Nodes, clusters, edges and the diagram root ([`semantic`] module)

pub mod color;
pub mod identifier;
pub mod semantic;
