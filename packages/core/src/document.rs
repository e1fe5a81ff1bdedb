//! The serialisable document shape handed to the JSON encoder.
//!
//! ```json
//! {
//!   "metadata": { "source_kind": "..." },
//!   "graph": {
//!     "nodes": [ { "id": "...", "kinds": [...], "properties": { ... } } ],
//!     "edges": [ { "start": { ... }, "end": { ... }, "kind": "...", "properties": { ... } } ]
//!   }
//! }
//! ```
//!
//! `metadata` and every `properties` member are omitted when empty. The types
//! also deserialise, so callers can read a document back and replay it
//! through a [`GraphBuilder`](crate::GraphBuilder).

use serde::{Deserialize, Serialize};

use crate::types::{Edge, GraphMetadata, Node, NodeReference, Properties};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataDoc>,
    pub graph: GraphBody,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphBody {
    #[serde(default)]
    pub nodes: Vec<NodeDoc>,
    #[serde(default)]
    pub edges: Vec<EdgeDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataDoc {
    pub source_kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDoc {
    pub id: String,
    #[serde(default)]
    pub kinds: Vec<String>,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeDoc {
    pub start: NodeReference,
    pub end: NodeReference,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

impl MetadataDoc {
    /// `None` unless the metadata carries a non-empty source kind.
    pub fn from_metadata(metadata: &GraphMetadata) -> Option<Self> {
        metadata
            .source_kind
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| Self {
                source_kind: s.to_string(),
            })
    }
}

impl From<&Node> for NodeDoc {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id().to_string(),
            kinds: node.kinds().to_vec(),
            properties: node.properties().clone(),
        }
    }
}

impl From<&Edge> for EdgeDoc {
    fn from(edge: &Edge) -> Self {
        Self {
            start: edge.start().clone(),
            end: edge.end().clone(),
            kind: edge.kind().to_string(),
            properties: edge.properties().clone(),
        }
    }
}

// --- tests -------------------------------------------------------------------
