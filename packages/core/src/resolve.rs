//! Resolution of symbolic edge endpoints to concrete nodes.

use std::collections::HashMap;

use crate::error::{Endpoint, GraphError};
use crate::types::{MatchBy, Node, NodeReference};

/// Lookup tables over a node set, rebuilt for every validation pass.
///
/// Names index only nodes whose `name` property is a string. Several nodes
/// may share a name; each name maps to its candidates in insertion order.
pub struct ReferenceResolver<'a> {
    by_id: HashMap<&'a str, &'a Node>,
    by_name: HashMap<&'a str, Vec<&'a Node>>,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        let mut by_id = HashMap::with_capacity(nodes.len());
        let mut by_name: HashMap<&str, Vec<&Node>> = HashMap::new();
        for node in nodes {
            by_id.entry(node.id()).or_insert(node);
            if let Some(name) = node.name() {
                by_name.entry(name).or_default().push(node);
            }
        }
        Self { by_id, by_name }
    }

    /// Resolve `reference` to exactly one node.
    ///
    /// `endpoint` only labels the error.
    pub fn resolve(
        &self,
        reference: &NodeReference,
        endpoint: Endpoint,
    ) -> Result<&'a Node, GraphError> {
        match reference.match_by {
            MatchBy::Id => self.resolve_id(reference, endpoint),
            MatchBy::Name => self.resolve_name(reference, endpoint),
        }
    }

    fn resolve_id(&self, r: &NodeReference, endpoint: Endpoint) -> Result<&'a Node, GraphError> {
        let node = self
            .by_id
            .get(r.value.as_str())
            .copied()
            .ok_or_else(|| unresolved(r, endpoint))?;
        check_kind(node, r, endpoint)
    }

    fn resolve_name(&self, r: &NodeReference, endpoint: Endpoint) -> Result<&'a Node, GraphError> {
        let candidates = self
            .by_name
            .get(r.value.as_str())
            .ok_or_else(|| unresolved(r, endpoint))?;

        if let [only] = candidates.as_slice() {
            return check_kind(*only, r, endpoint);
        }

        let Some(kind) = r.kind_filter() else {
            return Err(GraphError::AmbiguousName {
                endpoint,
                value: r.value.clone(),
                available: kinds_of(candidates),
            });
        };

        let matching: Vec<&Node> = candidates
            .iter()
            .copied()
            .filter(|n| n.has_kind(kind))
            .collect();
        match matching.as_slice() {
            [] => Err(GraphError::NoCandidateWithKind {
                endpoint,
                value: r.value.clone(),
                kind: kind.to_string(),
                available: kinds_of(candidates),
            }),
            [node] => Ok(*node),
            many => Err(GraphError::AmbiguousKind {
                endpoint,
                value: r.value.clone(),
                kind: kind.to_string(),
                ids: many.iter().map(|n| n.id().to_string()).collect(),
            }),
        }
    }
}

fn check_kind<'a>(
    node: &'a Node,
    r: &NodeReference,
    endpoint: Endpoint,
) -> Result<&'a Node, GraphError> {
    match r.kind_filter() {
        Some(kind) if !node.has_kind(kind) => Err(GraphError::KindMismatch {
            endpoint,
            match_by: r.match_by,
            value: r.value.clone(),
            kind: kind.to_string(),
            node_kinds: node.kinds().to_vec(),
        }),
        _ => Ok(node),
    }
}

fn unresolved(r: &NodeReference, endpoint: Endpoint) -> GraphError {
    GraphError::UnresolvedReference {
        endpoint,
        match_by: r.match_by,
        value: r.value.clone(),
    }
}

/// Kinds across `nodes`, deduplicated in first-seen order.
fn kinds_of(nodes: &[&Node]) -> Vec<String> {
    let mut kinds: Vec<String> = Vec::new();
    for kind in nodes.iter().flat_map(|n| n.kinds()) {
        if !kinds.contains(kind) {
            kinds.push(kind.clone());
        }
    }
    kinds
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, Side};
    use crate::types::{Attribution, Properties};
    use serde_json::json;

    const START: Endpoint = Endpoint {
        edge: 0,
        side: Side::Start,
    };

    fn named(id: &str, kinds: &[&str], name: &str) -> Node {
        let properties: Properties = json!({ "name": name }).as_object().cloned().unwrap();
        Node::new(id, kinds.iter().copied(), properties, Attribution::Unattributed).unwrap()
    }

    fn plain(id: &str, kinds: &[&str]) -> Node {
        Node::new(id, kinds.iter().copied(), Properties::new(), Attribution::Unattributed).unwrap()
    }

    fn alices() -> Vec<Node> {
        vec![
            named("u1", &["User"], "alice"),
            named("c1", &["Computer"], "alice"),
        ]
    }

    #[test]
    fn by_id_resolves_and_checks_kind() {
        let nodes = vec![plain("a", &["User"])];
        let r = ReferenceResolver::new(&nodes);
        assert_eq!(r.resolve(&NodeReference::by_id("a"), START).unwrap().id(), "a");
        assert_eq!(
            r.resolve(&NodeReference::by_id("a").with_kind("User"), START).unwrap().id(),
            "a"
        );
        let err = r
            .resolve(&NodeReference::by_id("a").with_kind("Computer"), START)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KindMismatch);
        assert!(err.to_string().contains("\"Computer\""));
        let err = r.resolve(&NodeReference::by_id("zzz"), START).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvedReference);
    }

    #[test]
    fn id_reference_does_not_match_names() {
        let nodes = vec![named("u1", &["User"], "alice")];
        let r = ReferenceResolver::new(&nodes);
        let err = r.resolve(&NodeReference::by_id("alice"), START).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvedReference);
    }

    #[test]
    fn single_name_match() {
        let nodes = vec![named("u1", &["User"], "bob")];
        let r = ReferenceResolver::new(&nodes);
        assert_eq!(r.resolve(&NodeReference::by_name("bob"), START).unwrap().id(), "u1");
        let err = r
            .resolve(&NodeReference::by_name("bob").with_kind("Admin"), START)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KindMismatch);
    }

    #[test]
    fn shared_name_needs_kind_filter() {
        let nodes = alices();
        let r = ReferenceResolver::new(&nodes);

        let err = r.resolve(&NodeReference::by_name("alice"), START).unwrap_err();
        assert_eq!(
            err,
            GraphError::AmbiguousName {
                endpoint: START,
                value: "alice".into(),
                available: vec!["User".into(), "Computer".into()],
            }
        );

        let hit = r
            .resolve(&NodeReference::by_name("alice").with_kind("User"), START)
            .unwrap();
        assert_eq!(hit.id(), "u1");

        let err = r
            .resolve(&NodeReference::by_name("alice").with_kind("Admin"), START)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvedReference);
    }

    #[test]
    fn shared_name_and_kind_is_ambiguous() {
        let nodes = vec![
            named("u1", &["User"], "alice"),
            named("u2", &["User", "Admin"], "alice"),
        ];
        let r = ReferenceResolver::new(&nodes);
        let err = r
            .resolve(&NodeReference::by_name("alice").with_kind("User"), START)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousReference);
        assert_eq!(
            r.resolve(&NodeReference::by_name("alice").with_kind("Admin"), START)
                .unwrap()
                .id(),
            "u2"
        );
    }

    #[test]
    fn non_string_names_are_not_indexed() {
        let properties: Properties = json!({ "name": 42 }).as_object().cloned().unwrap();
        let nodes = vec![Node::new("n", ["User"], properties, Attribution::Unattributed).unwrap()];
        let r = ReferenceResolver::new(&nodes);
        let err = r.resolve(&NodeReference::by_name("42"), START).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvedReference);
    }
}
