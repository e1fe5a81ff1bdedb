use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;

use crate::document::{EdgeDoc, GraphBody, GraphDocument, MetadataDoc, NodeDoc};
use crate::error::{Endpoint, GraphError, PersistError, Side};
use crate::registry::{MergePolicy, NodeRegistry};
use crate::resolve::ReferenceResolver;
use crate::types::{Attribution, Edge, GraphMetadata, Node, NodeReference, Properties};

/// Incremental builder for one OpenGraph document.
///
/// Nodes are unique by id and kept in insertion order; re-adding an id either
/// merges into the existing node or fails, depending on the [`MergePolicy`].
/// Edges are appended as-is and only resolved against the node set when
/// [`validate`](GraphBuilder::validate) runs.
///
/// The builder assumes a single writer. Wrap the whole instance in a lock if
/// several threads must mutate it.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: NodeRegistry,
    edges: Vec<Edge>,
    metadata: Option<GraphMetadata>,
}

impl GraphBuilder {
    /// An empty, unattributed graph: every node needs at least one kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty graph attributed to `source_kind`. An empty string is the
    /// same as no source kind.
    pub fn with_source_kind(source_kind: impl Into<String>) -> Self {
        Self {
            metadata: GraphMetadata::for_source_kind(source_kind),
            ..Self::default()
        }
    }

    pub fn metadata(&self) -> Option<&GraphMetadata> {
        self.metadata.as_ref()
    }

    pub fn source_kind(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.source_kind.as_deref())
    }

    /// The attribution given to nodes entering this graph.
    pub fn attribution(&self) -> Attribution {
        self.metadata
            .as_ref()
            .map_or(Attribution::Unattributed, GraphMetadata::attribution)
    }

    /// Build a node and add it, merging into an existing node with the same id.
    pub fn create_node<I, S>(
        &mut self,
        id: impl Into<String>,
        kinds: I,
        properties: Properties,
    ) -> Result<&Node, GraphError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.create_node_with_policy(id, kinds, properties, MergePolicy::Merge)
    }

    /// Build a node and add it, handling a duplicate id per `policy`.
    ///
    /// Under [`MergePolicy::Reject`] a repeated id fails before the incoming
    /// node is built. Otherwise the node is validated in full before it is
    /// merged.
    pub fn create_node_with_policy<I, S>(
        &mut self,
        id: impl Into<String>,
        kinds: I,
        properties: Properties,
        policy: MergePolicy,
    ) -> Result<&Node, GraphError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        if policy == MergePolicy::Reject && self.nodes.contains(&id) {
            return Err(GraphError::DuplicateIdentity(id));
        }
        let node = Node::new(id, kinds, properties, self.attribution())?;
        self.nodes.upsert(node, policy)
    }

    /// Add a pre-built node, merging into an existing node with the same id.
    pub fn add_node(&mut self, node: Node) -> Result<&Node, GraphError> {
        self.add_node_with_policy(node, MergePolicy::Merge)
    }

    /// Add a pre-built node, handling a duplicate id per `policy`.
    ///
    /// A node entering the graph for the first time takes the graph's
    /// attribution, whatever it was built with, and its kinds are re-checked
    /// against it.
    pub fn add_node_with_policy(
        &mut self,
        mut node: Node,
        policy: MergePolicy,
    ) -> Result<&Node, GraphError> {
        if !self.nodes.contains(node.id()) {
            node.set_attribution(self.attribution());
            node.validate()?;
        }
        self.nodes.upsert(node, policy)
    }

    /// Build an edge between two references and append it.
    ///
    /// Plain strings convert to by-id references.
    pub fn create_edge(
        &mut self,
        start: impl Into<NodeReference>,
        end: impl Into<NodeReference>,
        kind: impl Into<String>,
        properties: Properties,
    ) -> Result<&Edge, GraphError> {
        let edge = Edge::new(start.into(), end.into(), kind, properties)?;
        self.add_edge(edge);
        Ok(&self.edges[self.edges.len() - 1])
    }

    /// Append an edge. Its endpoints are not checked until [`validate`](Self::validate).
    pub fn add_edge(&mut self, edge: Edge) -> &mut Self {
        tracing::debug!(
            kind = edge.kind(),
            start = %edge.start().value,
            end = %edge.end().value,
            "edge added"
        );
        self.edges.push(edge);
        self
    }

    /// Check the whole graph: ids are unique and every edge endpoint resolves
    /// to exactly one node.
    ///
    /// Edges are checked in insertion order, start before end; the first
    /// failure is returned.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        if let Some(dup) = self.nodes.iter().find(|n| !seen.insert(n.id())) {
            return Err(GraphError::DuplicateIdentity(dup.id().to_string()));
        }

        let resolver = ReferenceResolver::new(self.nodes.as_slice());
        for (i, edge) in self.edges.iter().enumerate() {
            resolver.resolve(edge.start(), Endpoint { edge: i, side: Side::Start })?;
            resolver.resolve(edge.end(), Endpoint { edge: i, side: Side::End })?;
        }

        tracing::debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "graph validated"
        );
        Ok(())
    }

    /// Drop all nodes and edges. Metadata is kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        self.nodes.as_slice()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The document form of the graph, ready for a JSON encoder.
    ///
    /// Does not validate.
    pub fn to_structured(&self) -> GraphDocument {
        GraphDocument {
            metadata: self.metadata.as_ref().and_then(MetadataDoc::from_metadata),
            graph: GraphBody {
                nodes: self.nodes.iter().map(NodeDoc::from).collect(),
                edges: self.edges.iter().map(EdgeDoc::from).collect(),
            },
        }
    }

    /// Encode the graph as JSON: compact when `indent` is `None`, otherwise
    /// pretty-printed with `indent` spaces per level.
    pub fn to_json(&self, indent: Option<usize>) -> Result<String, PersistError> {
        let buf = self.encode(indent)?;
        String::from_utf8(buf).map_err(|e| {
            serde_json::Error::io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)).into()
        })
    }

    /// Write the JSON encoding of the graph to `path`, replacing any existing file.
    pub fn save_to_file(
        &self,
        path: impl AsRef<Path>,
        indent: Option<usize>,
    ) -> Result<(), PersistError> {
        let path = path.as_ref();
        let mut buf = self.encode(indent)?;
        buf.push(b'\n');
        std::fs::write(path, &buf).map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = buf.len(), "graph written");
        Ok(())
    }

    fn encode(&self, indent: Option<usize>) -> Result<Vec<u8>, PersistError> {
        let doc = self.to_structured();
        let Some(width) = indent else {
            return Ok(serde_json::to_vec(&doc)?);
        };
        let pad = vec![b' '; width];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&pad);
        let mut ser = serde_json::Serializer::with_formatter(Vec::new(), formatter);
        doc.serialize(&mut ser)?;
        Ok(ser.into_inner())
    }
}

// --- tests -------------------------------------------------------------------
