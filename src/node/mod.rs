/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Materializes a parsed [`Event`] stream into the owned
//! [`Node`] tree (§3).
//!
//! Rather than build a shared graph kept alive by `Rc`/arena
//! indices, every alias is resolved here by deep-copying
//! whatever its anchor already built -- callers only ever
//! observe equal structural value (§8), never identity, so
//! this sidesteps cycle bookkeeping entirely.

pub mod value;

use std::collections::HashMap;

use crate::{
    error::{type_error, Error, Result},
    parser::{
        error::ParseError,
        types::{Alias, Event, EventData, ScalarLike, TagDirectives},
        EventStream,
    },
    reader::Read,
    resolver::{self, ResolvedTag, TagClass},
    scanner::{
        flag::Flags as ScannerFlags,
        scalar_type::{self, ScalarType},
    },
    token::ScalarStyle,
};
use value::{Node, NodeValue};

/// Parse every document out of `read`, in stream order.
pub(crate) fn build_all<'de, T>(read: &'de T, flags: ScannerFlags) -> Result<Vec<Node>>
where
    T: Read,
{
    let mut events = EventStream::new(read, flags);
    let mut builder = Builder::new();
    let mut documents = Vec::new();
    let mut cursor = 0usize;

    loop
    {
        match events.next()
        {
            None => break,
            Some(Err(e)) => return Err(contextualize(read, cursor, e.into())),
            Some(Ok(event)) =>
            {
                cursor = event.start();

                match builder.feed(event)
                {
                    Ok(Some(node)) => documents.push(node),
                    Ok(None) => {},
                    Err(e) => return Err(contextualize(read, cursor, e)),
                }
            },
        }
    }

    Ok(documents)
}

/// Stamp `(line, column, at)` context onto `err` using
/// `read`'s decoded text and the byte offset of the last
/// event the builder successfully consumed before `err`
/// aborted the parse.
fn contextualize<T>(read: &T, cursor: usize, err: Error) -> Error
where
    T: Read,
{
    match read.source()
    {
        Some(text) => err.with_offset(text, cursor),
        None => err,
    }
}

/// Parse exactly the first document out of `read`.
pub(crate) fn build_one<'de, T>(read: &'de T, flags: ScannerFlags) -> Result<Node>
where
    T: Read,
{
    build_all(read, flags)?
        .into_iter()
        .next()
        .ok_or_else(|| type_error("a YAML document"))
}

/// Drives the container stack and anchor table while walking
/// an [`Event`] stream.
struct Builder
{
    stack:   Vec<Frame>,
    anchors: HashMap<String, Node>,
    tags:    TagDirectives<'static>,
}

enum Frame
{
    Sequence
    {
        items: Vec<Node>, tag: Option<String>, anchor: Option<String>
    },
    Mapping
    {
        pairs: Vec<(Node, Node)>,
        pending_key: Option<Node>,
        tag: Option<String>,
        anchor: Option<String>,
    },
}

impl Builder
{
    fn new() -> Self
    {
        Self {
            stack:   Vec::new(),
            anchors: HashMap::new(),
            tags:    TagDirectives::new(),
        }
    }

    /// Feed the next [`Event`] into the builder. Returns
    /// `Some(node)` exactly when a full document has just been
    /// completed.
    fn feed<'de>(&mut self, event: Event<'de>) -> Result<Option<Node>>
    {
        match event.into_data()
        {
            EventData::StreamStart(_) | EventData::StreamEnd => Ok(None),
            EventData::DocumentStart(doc) =>
            {
                self.tags = owned_tags(doc.directives.tags);
                Ok(None)
            },
            EventData::DocumentEnd(_) =>
            {
                self.anchors.clear();
                Ok(None)
            },
            EventData::Alias(alias) => self.push_alias(alias),
            EventData::Scalar(node) => self.push_scalar(node),
            EventData::SequenceStart(node) => self.push_sequence(node),
            EventData::MappingStart(node) => self.push_mapping(node),
            EventData::SequenceEnd => self.pop_sequence(),
            EventData::MappingEnd => self.pop_mapping(),
        }
    }

    fn push_scalar<'de>(
        &mut self,
        node: crate::parser::types::Node<'de, ScalarLike<'de>>,
    ) -> Result<Option<Node>>
    {
        let crate::parser::types::Node {
            anchor,
            tag,
            content,
            ..
        } = node;

        let scalar = content.evaluate()?;
        let style = scalar.style();
        let text: &str = scalar.as_ref();

        let resolved = self.resolve_tag(tag)?;
        let value = scalar_value(resolved.as_ref(), style, text)?;
        let built = Node::new(value, tag_uri(resolved), anchor.map(Into::into));

        self.complete(built)
    }

    fn push_sequence<'de>(
        &mut self,
        node: crate::parser::types::Node<'de, crate::parser::types::Sequence>,
    ) -> Result<Option<Node>>
    {
        let anchor = node.anchor.map(Into::into);
        let resolved = self.resolve_tag(node.tag)?;
        check_container_tag(resolved.as_ref(), TagClass::Seq)?;

        self.stack.push(Frame::Sequence {
            items: Vec::new(),
            tag: tag_uri(resolved),
            anchor,
        });

        Ok(None)
    }

    fn push_mapping<'de>(
        &mut self,
        node: crate::parser::types::Node<'de, crate::parser::types::Mapping>,
    ) -> Result<Option<Node>>
    {
        let anchor = node.anchor.map(Into::into);
        let resolved = self.resolve_tag(node.tag)?;
        check_container_tag(resolved.as_ref(), TagClass::Map)?;

        self.stack.push(Frame::Mapping {
            pairs: Vec::new(),
            pending_key: None,
            tag: tag_uri(resolved),
            anchor,
        });

        Ok(None)
    }

    fn pop_sequence(&mut self) -> Result<Option<Node>>
    {
        match self.stack.pop()
        {
            Some(Frame::Sequence { items, tag, anchor }) =>
            {
                self.complete(Node::new(NodeValue::Sequence(items), tag, anchor))
            },
            _ => Err(type_error("sequence")),
        }
    }

    fn pop_mapping(&mut self) -> Result<Option<Node>>
    {
        match self.stack.pop()
        {
            Some(Frame::Mapping {
                pairs,
                pending_key: None,
                tag,
                anchor,
            }) => self.complete(Node::new(NodeValue::Mapping(pairs), tag, anchor)),
            Some(Frame::Mapping { .. }) => Err(type_error("mapping value")),
            _ => Err(type_error("mapping")),
        }
    }

    fn push_alias<'de>(&mut self, alias: Alias<'de>) -> Result<Option<Node>>
    {
        let node = self
            .anchors
            .get(alias.name.as_ref())
            .cloned()
            .ok_or(ParseError::UndefinedAlias)?
            .into_alias();

        self.complete(node)
    }

    fn resolve_tag<'de>(
        &self,
        tag: Option<(crate::parser::types::Slice<'de>, crate::parser::types::Slice<'de>)>,
    ) -> Result<Option<ResolvedTag>>
    {
        match tag
        {
            Some((handle, suffix)) => Ok(Some(resolver::resolve(&self.tags, &handle, &suffix)?)),
            None => Ok(None),
        }
    }

    /// Register `node`'s anchor (if any), then either hand it
    /// up to the enclosing container or, if the stack is
    /// empty, return it as the finished document.
    fn complete(&mut self, node: Node) -> Result<Option<Node>>
    {
        if let Some(name) = node.anchor()
        {
            self.anchors.insert(name.to_owned(), node.clone());
        }

        match self.stack.last_mut()
        {
            Some(Frame::Sequence { items, .. }) =>
            {
                items.push(node);
                Ok(None)
            },
            Some(Frame::Mapping {
                pairs,
                pending_key,
                ..
            }) => match pending_key.take()
            {
                Some(key) =>
                {
                    if pairs.iter().any(|(existing, _)| existing == &key)
                    {
                        return Err(ParseError::DuplicateKey.into());
                    }

                    pairs.push((key, node));
                    Ok(None)
                },
                None =>
                {
                    *pending_key = Some(node);
                    Ok(None)
                },
            },
            None => Ok(Some(node)),
        }
    }
}

fn owned_tags(tags: TagDirectives<'_>) -> TagDirectives<'static>
{
    tags.into_iter()
        .map(|(handle, prefix)| (handle.into_owned().into(), prefix.into_owned().into()))
        .collect()
}

fn tag_uri(resolved: Option<ResolvedTag>) -> Option<String>
{
    resolved
        .filter(|tag| tag.class != TagClass::NonSpecific)
        .map(|tag| tag.uri)
}

fn check_container_tag(tag: Option<&ResolvedTag>, expected: TagClass) -> Result<()>
{
    match tag.map(|t| t.class)
    {
        None | Some(TagClass::NonSpecific) | Some(TagClass::Custom) => Ok(()),
        Some(class) if class == expected =>
        {
            Ok(())
        },
        Some(_) => Err(type_error(match expected
        {
            TagClass::Seq => "sequence",
            _ => "mapping",
        })),
    }
}

fn scalar_value(resolved: Option<&ResolvedTag>, style: ScalarStyle, text: &str) -> Result<NodeValue>
{
    match resolved.map(|tag| tag.class)
    {
        Some(TagClass::Null) => Ok(NodeValue::Null),
        Some(TagClass::Bool) => parse_bool(text),
        Some(TagClass::Int) => parse_int(text),
        Some(TagClass::Float) => parse_float(text),
        Some(TagClass::String) | Some(TagClass::Custom) => Ok(NodeValue::String(text.to_owned())),
        Some(TagClass::Seq) | Some(TagClass::Map) => Err(type_error("scalar")),
        Some(TagClass::NonSpecific) | None => Ok(infer_plain(style, text)),
    }
}

fn parse_bool(text: &str) -> Result<NodeValue>
{
    match text
    {
        "true" | "True" | "TRUE" => Ok(NodeValue::Bool(true)),
        "false" | "False" | "FALSE" => Ok(NodeValue::Bool(false)),
        _ => Err(type_error("bool")),
    }
}

fn parse_int(text: &str) -> Result<NodeValue>
{
    match scalar_type::classify(ScalarStyle::Plain, text)
    {
        ScalarType::Int(i) => Ok(NodeValue::Int(i)),
        _ => Err(type_error("int")),
    }
}

fn parse_float(text: &str) -> Result<NodeValue>
{
    match scalar_type::classify(ScalarStyle::Plain, text)
    {
        ScalarType::Float(f) => Ok(NodeValue::Float(f)),
        ScalarType::Int(i) => Ok(NodeValue::Float(i as f64)),
        _ => Err(type_error("float")),
    }
}

fn infer_plain(style: ScalarStyle, text: &str) -> NodeValue
{
    match scalar_type::classify(style, text)
    {
        ScalarType::Null => NodeValue::Null,
        ScalarType::Bool(b) => NodeValue::Bool(b),
        ScalarType::Int(i) => NodeValue::Int(i),
        ScalarType::Float(f) => NodeValue::Float(f),
        ScalarType::String => NodeValue::String(text.to_owned()),
    }
}

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{deserialize, deserialize_all, error::Category, reader::from_utf8};

    fn parse(yaml: &str) -> Node
    {
        let reader = from_utf8(yaml);

        deserialize(&reader).unwrap()
    }

    #[test]
    fn flow_mapping_of_scalars()
    {
        let node = parse("foo: bar");

        assert_eq!(node.get("foo").and_then(Node::as_str), Some("bar"));
    }

    #[test]
    fn block_sequence_of_ints()
    {
        let node = parse("- 1\n- 2\n- 3\n");

        let items: Vec<_> = node.as_sequence().unwrap().iter().map(Node::as_int).collect();

        assert_eq!(items, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn boundary_null_forms_are_equivalent()
    {
        let reader = from_utf8("");
        let empty = deserialize(&reader).unwrap();

        assert!(empty.is_null());
        assert!(parse("null").is_null());
        assert!(parse("~").is_null());
    }

    #[test]
    fn explicit_tag_drives_retyping()
    {
        let node = parse("!!int \"42\"");

        assert_eq!(node.as_int(), Some(42));
    }

    #[test]
    fn duplicate_mapping_key_is_rejected_with_line_number()
    {
        let reader = from_utf8("a: 1\na: 2\n");
        let err = deserialize(&reader).unwrap_err();

        assert_eq!(err.classify(), Category::ParseError);
        assert!(err.has_context());
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn alias_resolves_to_an_equal_value_and_is_flagged()
    {
        let node = parse("- &a 42\n- *a\n");
        let items = node.as_sequence().unwrap();

        assert!(!items[0].is_alias());
        assert!(items[1].is_alias());
        assert_eq!(items[0], items[1]);
        assert_eq!(items[1].as_int(), Some(42));
    }

    #[test]
    fn undefined_alias_is_a_parse_error()
    {
        let reader = from_utf8("key: *missing\n");
        let err = deserialize(&reader).unwrap_err();

        assert_eq!(err.classify(), Category::ParseError);
    }

    #[test]
    fn multi_document_stream_preserves_order()
    {
        let reader = from_utf8("---\na: 1\n...\n---\na: 2\n...\n");
        let docs = deserialize_all(&reader).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].get("a").and_then(Node::as_int), Some(1));
        assert_eq!(docs[1].get("a").and_then(Node::as_int), Some(2));
    }

    #[test]
    fn explicit_key_mapping_with_composite_key()
    {
        let node = parse("? [1,2]\n: ok\n");
        let pairs = node.as_mapping().unwrap();

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].1.as_str(), Some("ok"));
    }

    #[test]
    fn control_character_in_plain_scalar_is_rejected()
    {
        let reader = from_utf8("foo: bar\u{1}baz\n");
        let err = deserialize(&reader).unwrap_err();

        assert_eq!(err.classify(), Category::ParseError);
    }
}
