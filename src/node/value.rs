/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The owned data model produced by parsing a YAML document
//! (§3).
//!
//! A [`Node`] is always fully owned: no borrowed content, no
//! shared subtrees. An alias is materialized as a deep copy
//! of whatever its anchor resolved to, so two [`Node`]s that
//! came from the same anchor are equal in value but never
//! the same allocation -- see [`Node::eq`].

use std::fmt;

/// A single node in a parsed YAML document: a scalar, a
/// sequence, or a mapping, plus whatever tag and anchor name
/// were attached to it in the source.
#[derive(Debug, Clone)]
pub struct Node
{
    value:    NodeValue,
    tag:      Option<String>,
    anchor:   Option<String>,
    is_alias: bool,
}

/// The content of a [`Node`], per the core schema (§4.6) plus
/// the two collection kinds (§3).
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue
{
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Node>),
    Mapping(Vec<(Node, Node)>),
}

impl Node
{
    pub(crate) fn new(value: NodeValue, tag: Option<String>, anchor: Option<String>) -> Self
    {
        Self {
            value,
            tag,
            anchor,
            is_alias: false,
        }
    }

    /// Mark this node as having originated from an alias
    /// reference (`*name`) rather than a fresh construction
    /// (§3). Used by the node builder when materializing an
    /// `Alias` event as a deep copy of its anchor target.
    pub(crate) fn into_alias(mut self) -> Self
    {
        self.is_alias = true;
        self
    }

    /// `true` if this node was produced by resolving an alias
    /// rather than being built directly from the source.
    pub fn is_alias(&self) -> bool
    {
        self.is_alias
    }

    /// The resolved tag URI attached to this node, if the
    /// source gave it one explicitly (e.g `!!str`, `!<tag:
    /// example.com,2000:app/Foo>`).
    ///
    /// Nodes whose type was inferred from a plain scalar's
    /// content, rather than an explicit tag, return `None`
    /// here even though they do have a [`NodeValue`].
    pub fn tag(&self) -> Option<&str>
    {
        self.tag.as_deref()
    }

    /// The anchor name attached to this node in the source,
    /// if any (`&name`).
    pub fn anchor(&self) -> Option<&str>
    {
        self.anchor.as_deref()
    }

    /// Borrow this node's value.
    pub fn value(&self) -> &NodeValue
    {
        &self.value
    }

    /// Consume this node, returning its value.
    pub fn into_value(self) -> NodeValue
    {
        self.value
    }

    pub fn is_null(&self) -> bool
    {
        matches!(self.value, NodeValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool>
    {
        match self.value
        {
            NodeValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64>
    {
        match self.value
        {
            NodeValue::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64>
    {
        match self.value
        {
            NodeValue::Float(f) => Some(f),
            NodeValue::Int(i) => Some(i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str>
    {
        match &self.value
        {
            NodeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]>
    {
        match &self.value
        {
            NodeValue::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(Node, Node)]>
    {
        match &self.value
        {
            NodeValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a mapping entry by a string key, in document
    /// order, first match wins.
    ///
    /// Returns `None` if this node is not a mapping, or the
    /// key is not present.
    pub fn get(&self, key: &str) -> Option<&Node>
    {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }
}

/// Structural equality (§8): two nodes compare equal if their
/// values match, ignoring tag and anchor. This is what makes
/// a deep-copied alias equal to its anchor's node.
impl PartialEq for Node
{
    fn eq(&self, other: &Self) -> bool
    {
        self.value == other.value
    }
}

impl fmt::Display for NodeValue
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self
        {
            NodeValue::Null => write!(f, "null"),
            NodeValue::Bool(b) => write!(f, "{}", b),
            NodeValue::Int(i) => write!(f, "{}", i),
            NodeValue::Float(v) => write!(f, "{}", v),
            NodeValue::String(s) => write!(f, "{}", s),
            NodeValue::Sequence(_) => write!(f, "[sequence]"),
            NodeValue::Mapping(_) => write!(f, "{{mapping}}"),
        }
    }
}
