//! Builder and validator for OpenGraph documents.
//!
//! An OpenGraph document is a flat list of nodes and edges, plus optional
//! graph-wide metadata, meant for ingestion by an external graph-analysis
//! tool. This crate builds such a document incrementally, enforces the schema
//! as data is added, resolves symbolic edge endpoints, and emits JSON.
//! It is the library behind the `opengraph` CLI.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | Data model: [`Node`], [`Edge`], [`NodeReference`], [`MatchBy`], [`Attribution`] |
//! | [`validation`] | Property and kind checks via [`validate_properties`] |
//! | [`registry`] | Node identity, insertion order, and merge-on-duplicate |
//! | [`resolve`] | Edge endpoint resolution by id or name, with kind filters |
//! | [`graph`] | The [`GraphBuilder`] façade |
//! | [`document`] | The serialisable document shape |
//! | [`error`] | [`GraphError`], [`PersistError`] |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use opengraph::{GraphBuilder, NodeReference, Properties};
//!
//! let mut graph = GraphBuilder::with_source_kind("Corp");
//! graph.create_node("u1", ["User"], Properties::new())?;
//! graph.create_node("srv", ["Computer"], Properties::new())?;
//! graph.create_edge("u1", NodeReference::by_id("srv").with_kind("Computer"), "AdminTo", Properties::new())?;
//!
//! graph.validate()?;
//! let json = graph.to_json(Some(2))?;
//! ```

pub mod document;
pub mod error;
pub mod graph;
pub mod registry;
pub mod resolve;
pub mod types;
pub mod validation;

pub use document::{EdgeDoc, GraphBody, GraphDocument, MetadataDoc, NodeDoc};
pub use error::{Endpoint, ErrorKind, GraphError, PersistError, Side};
pub use graph::GraphBuilder;
pub use registry::MergePolicy;
pub use resolve::ReferenceResolver;
pub use types::{
    Attribution, Edge, GraphMetadata, MatchBy, Node, NodeReference, Properties, MAX_KINDS,
};
pub use validation::{strip_nulls, validate_kinds, validate_properties, SchemaViolation};
