//! Load a document from disk or stdin and rebuild a [`GraphBuilder`] from it.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use opengraph::{GraphBuilder, GraphDocument, GraphError, MergePolicy};
use thiserror::Error;

/// Why an input document could not be turned into a valid graph.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("failed to parse input as an OpenGraph document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl LoadError {
    /// 1 when the document breaks a graph rule, 2 when it cannot be read or parsed.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::Graph(_) => 1,
            _ => 2,
        }
    }

    /// The line printed to stderr before exiting.
    pub fn report(&self) -> String {
        match self {
            LoadError::Graph(e) => format!("error ({}): {e}", e.kind()),
            other => format!("opengraph: {other}"),
        }
    }
}

/// Read the full contents of a file, or stdin when the path is `"-"`.
pub fn read_input(path: &Path) -> Result<String, LoadError> {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(LoadError::Stdin)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Parse `json`, replay it under `policy`, and validate the result.
pub fn load_str(json: &str, policy: MergePolicy) -> Result<GraphBuilder, LoadError> {
    let doc: GraphDocument = serde_json::from_str(json)?;
    let graph = replay(doc, policy)?;
    graph.validate()?;
    Ok(graph)
}

/// Feed every node and edge of `doc` through a fresh builder, in document order.
///
/// The builder is attributed to `metadata.source_kind` when present. The first
/// node or edge that breaks the schema (or repeats an id under
/// [`MergePolicy::Reject`]) aborts the replay.
pub fn replay(doc: GraphDocument, policy: MergePolicy) -> Result<GraphBuilder, GraphError> {
    let mut builder = match doc.metadata {
        Some(m) => GraphBuilder::with_source_kind(m.source_kind),
        None => GraphBuilder::new(),
    };
    for node in doc.graph.nodes {
        builder.create_node_with_policy(node.id, node.kinds, node.properties, policy)?;
    }
    for edge in doc.graph.edges {
        builder.create_edge(edge.start, edge.end, edge.kind, edge.properties)?;
    }
    tracing::debug!(
        nodes = builder.node_count(),
        edges = builder.edge_count(),
        "document replayed"
    );
    Ok(builder)
}

// --- tests -------------------------------------------------------------------
