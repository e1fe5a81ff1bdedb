//! Core data types for OpenGraph documents.
//!
//! This module defines the in-memory model the builder works on: [`Node`],
//! [`Edge`], [`NodeReference`], [`MatchBy`], [`Attribution`], and
//! [`GraphMetadata`]. Nodes and edges validate themselves on construction, so
//! a value of either type always satisfies the property and kind rules.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{strip_nulls, validate_kinds, validate_properties, SchemaViolation};

/// A flat property map: string keys to primitives or arrays of one primitive type.
///
/// Keys keep insertion order so emitted documents read the way they were built.
pub type Properties = serde_json::Map<String, Value>;

/// Upper bound on the number of kinds a node may carry.
pub const MAX_KINDS: usize = 3;

/// How an edge endpoint is matched against the node set.
///
/// Serialises as a lowercase string (`"id"` or `"name"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchBy {
    /// Match the node whose `id` equals the reference value. Default.
    #[default]
    Id,
    /// Match nodes whose string `name` property equals the reference value.
    Name,
}

/// Formats the strategy as its lowercase wire-format string.
impl std::fmt::Display for MatchBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchBy::Id => write!(f, "id"),
            MatchBy::Name => write!(f, "name"),
        }
    }
}

/// Parses a [`MatchBy`] from its lowercase wire-format string.
impl std::str::FromStr for MatchBy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(MatchBy::Id),
            "name" => Ok(MatchBy::Name),
            _ => Err(format!("unknown match strategy {:?}; expected one of: id, name", s)),
        }
    }
}

/// A symbolic pointer from an edge to a node, resolved at validation time.
///
/// Serialises as `{ "value": "...", "match_by": "id" | "name", "kind"?: "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeReference {
    /// The node id or name to match.
    pub value: String,
    /// Whether `value` is compared against ids or names.
    #[serde(default)]
    pub match_by: MatchBy,
    /// Kind the referenced node must carry. Required to disambiguate names
    /// shared by several nodes.
    #[serde(default, skip_serializing_if = "no_kind_filter")]
    pub kind: Option<String>,
}

impl NodeReference {
    /// Reference a node by its id.
    pub fn by_id(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            match_by: MatchBy::Id,
            kind: None,
        }
    }

    /// Reference a node by its `name` property.
    pub fn by_name(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            match_by: MatchBy::Name,
            kind: None,
        }
    }

    /// Require the referenced node to carry `kind`. An empty string clears the filter.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        self.kind = if kind.is_empty() { None } else { Some(kind) };
        self
    }

    /// The kind filter, ignoring an empty string set directly on the field.
    pub fn kind_filter(&self) -> Option<&str> {
        self.kind.as_deref().filter(|k| !k.is_empty())
    }
}

fn no_kind_filter(kind: &Option<String>) -> bool {
    kind.as_deref().unwrap_or_default().is_empty()
}

impl From<&str> for NodeReference {
    fn from(value: &str) -> Self {
        NodeReference::by_id(value)
    }
}

impl From<String> for NodeReference {
    fn from(value: String) -> Self {
        NodeReference::by_id(value)
    }
}

/// Whether the graph a node belongs to declares a source kind.
///
/// Nodes in an attributed graph inherit a kind from the source, so they may
/// carry zero kinds of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Attribution {
    /// No source kind: every node needs at least one kind. Default.
    #[default]
    Unattributed,
    /// A source kind is set graph-wide.
    SourceKind,
}

impl Attribution {
    pub fn allows_empty_kinds(self) -> bool {
        matches!(self, Attribution::SourceKind)
    }
}

/// A uniquely identified vertex with up to three kinds and a flat property map.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: String,
    kinds: Vec<String>,
    properties: Properties,
    attribution: Attribution,
}

impl Node {
    /// Build a node, dropping null properties and enforcing the kind-count
    /// and property rules.
    pub fn new<I, S>(
        id: impl Into<String>,
        kinds: I,
        properties: Properties,
        attribution: Attribution,
    ) -> Result<Self, SchemaViolation>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let node = Self {
            id: id.into(),
            kinds: kinds.into_iter().map(Into::into).collect(),
            properties: strip_nulls(properties),
            attribution,
        };
        node.validate()?;
        Ok(node)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kinds(&self) -> &[String] {
        &self.kinds
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn attribution(&self) -> Attribution {
        self.attribution
    }

    pub fn source_kind_available(&self) -> bool {
        self.attribution.allows_empty_kinds()
    }

    /// The `name` property, when it is a string.
    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(Value::as_str)
    }

    pub fn has_kind(&self, kind: &str) -> bool {
        self.kinds.iter().any(|k| k == kind)
    }

    /// Check kind count and property schema.
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        validate_kinds(&self.id, &self.kinds, self.attribution)?;
        validate_properties(&self.properties)
    }

    pub(crate) fn set_attribution(&mut self, attribution: Attribution) {
        self.attribution = attribution;
    }

    pub(crate) fn replace_contents(&mut self, kinds: Vec<String>, properties: Properties) {
        self.kinds = kinds;
        self.properties = properties;
    }
}

/// A directed relationship between two node references.
///
/// Edges carry no identity: duplicates are kept as distinct entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    start: NodeReference,
    end: NodeReference,
    kind: String,
    properties: Properties,
}

impl Edge {
    /// Build an edge. The kind must be non-empty; null properties are dropped.
    pub fn new(
        start: NodeReference,
        end: NodeReference,
        kind: impl Into<String>,
        properties: Properties,
    ) -> Result<Self, SchemaViolation> {
        let kind = kind.into();
        if kind.is_empty() {
            return Err(SchemaViolation::EmptyEdgeKind);
        }
        let properties = strip_nulls(properties);
        validate_properties(&properties)?;
        Ok(Self {
            start,
            end,
            kind,
            properties,
        })
    }

    pub fn start(&self) -> &NodeReference {
        &self.start
    }

    pub fn end(&self) -> &NodeReference {
        &self.end
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

/// Graph-wide metadata. Only the source kind is defined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphMetadata {
    /// Tag attributing every node in the graph to a source.
    pub source_kind: Option<String>,
}

impl GraphMetadata {
    /// Metadata for `source_kind`, or `None` when it is empty.
    pub fn for_source_kind(source_kind: impl Into<String>) -> Option<Self> {
        let source_kind = source_kind.into();
        if source_kind.is_empty() {
            None
        } else {
            Some(Self {
                source_kind: Some(source_kind),
            })
        }
    }

    pub fn attribution(&self) -> Attribution {
        match self.source_kind.as_deref() {
            Some(s) if !s.is_empty() => Attribution::SourceKind,
            _ => Attribution::Unattributed,
        }
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Properties {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn node_minimal() {
        let n = Node::new("test123", ["User"], Properties::new(), Attribution::Unattributed)
            .unwrap();
        assert_eq!(n.id(), "test123");
        assert_eq!(n.kinds(), ["User"]);
        assert!(n.properties().is_empty());
        assert!(!n.source_kind_available());
    }

    #[test]
    fn node_strips_null_properties() {
        let n = Node::new(
            "n",
            ["User"],
            props(json!({ "email": "a@b.c", "manager": null })),
            Attribution::Unattributed,
        )
        .unwrap();
        assert_eq!(n.properties(), &props(json!({ "email": "a@b.c" })));
    }

    #[test]
    fn node_empty_kinds_depend_on_attribution() {
        let err = Node::new("n", Vec::<String>::new(), Properties::new(), Attribution::Unattributed)
            .unwrap_err();
        assert_eq!(err, SchemaViolation::MissingKinds("n".into()));

        let n = Node::new("n", Vec::<String>::new(), Properties::new(), Attribution::SourceKind)
            .unwrap();
        assert!(n.kinds().is_empty());
        assert!(n.source_kind_available());
    }

    #[test]
    fn node_too_many_kinds() {
        let err = Node::new(
            "n",
            ["Kind1", "Kind2", "Kind3", "Kind4"],
            Properties::new(),
            Attribution::SourceKind,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaViolation::TooManyKinds { .. }));
        assert!(err.to_string().contains("more than 3 kinds"));
    }

    #[test]
    fn node_rejects_object_property() {
        let err = Node::new(
            "n",
            ["User"],
            props(json!({ "nested": { "key": "value" } })),
            Attribution::Unattributed,
        )
        .unwrap_err();
        assert!(err.to_string().contains("cannot be an object"));
    }

    #[test]
    fn node_name_only_for_strings() {
        let named = Node::new("a", ["User"], props(json!({ "name": "alice" })), Attribution::Unattributed)
            .unwrap();
        let numbered = Node::new("b", ["User"], props(json!({ "name": 7 })), Attribution::Unattributed)
            .unwrap();
        assert_eq!(named.name(), Some("alice"));
        assert_eq!(numbered.name(), None);
    }

    #[test]
    fn edge_requires_kind() {
        let err = Edge::new("a".into(), "b".into(), "", Properties::new()).unwrap_err();
        assert_eq!(err, SchemaViolation::EmptyEdgeKind);
    }

    #[test]
    fn edge_validates_properties() {
        let err = Edge::new(
            "a".into(),
            "b".into(),
            "ConnectedTo",
            props(json!({ "mixed": [1, "string", true] })),
        )
        .unwrap_err();
        assert!(err.to_string().contains("array must be homogeneous"));

        let e = Edge::new(
            "a".into(),
            "b".into(),
            "ConnectedTo",
            props(json!({ "weight": 1.5, "gone": null })),
        )
        .unwrap();
        assert_eq!(e.properties(), &props(json!({ "weight": 1.5 })));
    }

    #[test]
    fn reference_defaults_and_kind_filter() {
        let r = NodeReference::from("test123");
        assert_eq!(r.match_by, MatchBy::Id);
        assert_eq!(r.kind, None);

        let r = NodeReference::by_name("alice").with_kind("Person");
        assert_eq!(r.match_by, MatchBy::Name);
        assert_eq!(r.kind_filter(), Some("Person"));

        assert_eq!(NodeReference::by_id("x").with_kind("").kind, None);
    }

    #[test]
    fn reference_wire_format() {
        let r = NodeReference::by_id("test123");
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({ "value": "test123", "match_by": "id" })
        );
        let r = NodeReference::by_name("testuser").with_kind("Person");
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({ "value": "testuser", "match_by": "name", "kind": "Person" })
        );
    }

    #[test]
    fn empty_kind_field_is_omitted() {
        let r = NodeReference {
            value: "a".into(),
            match_by: MatchBy::Id,
            kind: Some(String::new()),
        };
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({ "value": "a", "match_by": "id" })
        );

        let parsed: NodeReference =
            serde_json::from_value(json!({ "value": "a", "kind": "" })).unwrap();
        assert_eq!(parsed.kind_filter(), None);
        assert_eq!(
            serde_json::to_string(&parsed).unwrap(),
            r#"{"value":"a","match_by":"id"}"#
        );
    }

    #[test]
    fn match_by_parse() {
        assert_eq!("name".parse::<MatchBy>(), Ok(MatchBy::Name));
        assert!("uuid".parse::<MatchBy>().is_err());
        assert_eq!(MatchBy::Id.to_string(), "id");
    }

    #[test]
    fn empty_source_kind_is_no_metadata() {
        assert_eq!(GraphMetadata::for_source_kind(""), None);
        let m = GraphMetadata::for_source_kind("S").unwrap();
        assert_eq!(m.attribution(), Attribution::SourceKind);
    }
}
