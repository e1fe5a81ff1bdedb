//! Node storage with identity, insertion order, and merge-on-duplicate.
//!
//! Nodes live in an arena addressed by slot; the id index maps each id to its
//! slot. Nodes are never removed one at a time, so a slot stays valid until
//! the whole registry is cleared, and a merge only rewrites the value in place.

use std::collections::HashMap;

use crate::error::GraphError;
use crate::types::{Node, Properties, MAX_KINDS};
use crate::validation::{validate_kinds, validate_properties, SchemaViolation};

/// What to do when a node arrives with an id that is already registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Union the kinds and overlay the properties onto the existing node. Default.
    #[default]
    Merge,
    /// Fail with [`GraphError::DuplicateIdentity`].
    Reject,
}

impl MergePolicy {
    pub fn from_flag(merge_properties: bool) -> Self {
        if merge_properties {
            MergePolicy::Merge
        } else {
            MergePolicy::Reject
        }
    }
}

#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&slot| &self.nodes[slot])
    }

    /// Nodes in insertion order.
    pub fn as_slice(&self) -> &[Node] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Register `node`, or fold it into the node already holding its id.
    ///
    /// Returns the stored node: the new one on first insertion, the merged
    /// existing one otherwise. On error nothing changes.
    pub fn upsert(&mut self, node: Node, policy: MergePolicy) -> Result<&Node, GraphError> {
        let Some(&slot) = self.index.get(node.id()) else {
            return Ok(self.push(node));
        };
        if policy == MergePolicy::Reject {
            return Err(GraphError::DuplicateIdentity(node.id().to_string()));
        }
        self.merge_into(slot, &node)?;
        Ok(&self.nodes[slot])
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
    }

    fn push(&mut self, node: Node) -> &Node {
        let slot = self.nodes.len();
        tracing::debug!(id = node.id(), kinds = ?node.kinds(), "node added");
        self.index.insert(node.id().to_string(), slot);
        self.nodes.push(node);
        &self.nodes[slot]
    }

    // All-or-nothing: the merged state is built and checked before the slot is touched.
    fn merge_into(&mut self, slot: usize, incoming: &Node) -> Result<(), GraphError> {
        let existing = &self.nodes[slot];

        let kinds = union_kinds(existing.kinds(), incoming.kinds());
        if kinds.len() > MAX_KINDS {
            return Err(SchemaViolation::MergeKindOverflow {
                id: existing.id().to_string(),
                existing: existing.kinds().to_vec(),
                incoming: incoming.kinds().to_vec(),
            }
            .into());
        }

        let properties = overlay(existing.properties(), incoming.properties());
        validate_kinds(existing.id(), &kinds, existing.attribution())?;
        validate_properties(&properties)?;

        tracing::debug!(id = existing.id(), kinds = ?kinds, "node merged");
        self.nodes[slot].replace_contents(kinds, properties);
        Ok(())
    }
}

/// Existing kinds in order, followed by incoming kinds not already present.
fn union_kinds(existing: &[String], incoming: &[String]) -> Vec<String> {
    let mut kinds = existing.to_vec();
    for kind in incoming {
        if !kinds.contains(kind) {
            kinds.push(kind.clone());
        }
    }
    kinds
}

/// Existing properties with every incoming key set on top; incoming wins.
fn overlay(existing: &Properties, incoming: &Properties) -> Properties {
    if existing.is_empty() {
        return incoming.clone();
    }
    let mut merged = existing.clone();
    for (key, value) in incoming {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

// --- tests -------------------------------------------------------------------
