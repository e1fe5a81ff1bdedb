//! Error types for graph construction, validation, and persistence.
//!
//! Every failure is local and synchronous: it aborts the operation that
//! raised it and leaves the graph as it was before the call.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::MatchBy;
use crate::validation::SchemaViolation;

/// Which side of an edge a reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Start,
    End,
}

/// The location of a reference within the graph: an edge index and a side.
///
/// Formats as `edge 3 start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub edge: usize,
    pub side: Side,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let side = match self.side {
            Side::Start => "start",
            Side::End => "end",
        };
        write!(f, "edge {} {}", self.edge, side)
    }
}

/// The five failure categories of the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SchemaViolation,
    DuplicateIdentity,
    UnresolvedReference,
    KindMismatch,
    AmbiguousReference,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::SchemaViolation => "schema violation",
            ErrorKind::DuplicateIdentity => "duplicate identity",
            ErrorKind::UnresolvedReference => "unresolved reference",
            ErrorKind::KindMismatch => "kind mismatch",
            ErrorKind::AmbiguousReference => "ambiguous reference",
        };
        f.write_str(s)
    }
}

/// Errors raised while building or validating a graph.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    #[error("node with id {0:?} already exists")]
    DuplicateIdentity(String),

    #[error("node referenced by {endpoint} with {match_by} {value:?} does not exist")]
    UnresolvedReference {
        endpoint: Endpoint,
        match_by: MatchBy,
        value: String,
    },

    #[error(
        "no node with name {value:?} and kind {kind:?} found for {endpoint}; \
         available kinds for nodes with this name: {available:?}"
    )]
    NoCandidateWithKind {
        endpoint: Endpoint,
        value: String,
        kind: String,
        available: Vec<String>,
    },

    #[error(
        "node referenced by {endpoint} with {match_by} {value:?} does not have \
         required kind {kind:?}; node kinds: {node_kinds:?}"
    )]
    KindMismatch {
        endpoint: Endpoint,
        match_by: MatchBy,
        value: String,
        kind: String,
        node_kinds: Vec<String>,
    },

    #[error(
        "multiple nodes found with name {value:?} for {endpoint}; a kind filter \
         is required for disambiguation; available kinds: {available:?}"
    )]
    AmbiguousName {
        endpoint: Endpoint,
        value: String,
        available: Vec<String>,
    },

    #[error(
        "multiple nodes with name {value:?} and kind {kind:?} found for {endpoint} \
         (ids {ids:?}); node references must resolve to exactly one node"
    )]
    AmbiguousKind {
        endpoint: Endpoint,
        value: String,
        kind: String,
        ids: Vec<String>,
    },
}

impl GraphError {
    /// The taxonomy category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::Schema(_) => ErrorKind::SchemaViolation,
            GraphError::DuplicateIdentity(_) => ErrorKind::DuplicateIdentity,
            GraphError::UnresolvedReference { .. } | GraphError::NoCandidateWithKind { .. } => {
                ErrorKind::UnresolvedReference
            }
            GraphError::KindMismatch { .. } => ErrorKind::KindMismatch,
            GraphError::AmbiguousName { .. } | GraphError::AmbiguousKind { .. } => {
                ErrorKind::AmbiguousReference
            }
        }
    }
}

/// Errors raised at the JSON emission boundary.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to encode graph as JSON: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_display() {
        let e = Endpoint {
            edge: 3,
            side: Side::End,
        };
        assert_eq!(e.to_string(), "edge 3 end");
    }

    #[test]
    fn categories() {
        let endpoint = Endpoint {
            edge: 0,
            side: Side::Start,
        };
        assert_eq!(
            GraphError::from(SchemaViolation::EmptyEdgeKind).kind(),
            ErrorKind::SchemaViolation
        );
        assert_eq!(
            GraphError::NoCandidateWithKind {
                endpoint,
                value: "alice".into(),
                kind: "Admin".into(),
                available: vec![],
            }
            .kind(),
            ErrorKind::UnresolvedReference
        );
        assert_eq!(
            GraphError::AmbiguousKind {
                endpoint,
                value: "alice".into(),
                kind: "User".into(),
                ids: vec!["a".into(), "b".into()],
            }
            .kind(),
            ErrorKind::AmbiguousReference
        );
    }

    #[test]
    fn messages_name_the_offender() {
        let err = GraphError::UnresolvedReference {
            endpoint: Endpoint {
                edge: 0,
                side: Side::End,
            },
            match_by: MatchBy::Id,
            value: "nonexistent".into(),
        };
        assert_eq!(
            err.to_string(),
            "node referenced by edge 0 end with id \"nonexistent\" does not exist"
        );
        assert_eq!(
            GraphError::DuplicateIdentity("user123".into()).to_string(),
            "node with id \"user123\" already exists"
        );
    }
}
