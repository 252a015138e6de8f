/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Block-style tree walker that renders a [`Node`] back to
//! text (§6.3).

use crate::{
    node::value::{Node, NodeValue},
    scanner::scalar_type::{self, ScalarType},
    token::ScalarStyle,
};

const INDENT_STEP: usize = 2;

/// Accumulates rendered documents, separated by `...`
/// between successive entries.
///
/// Directives aren't retained on a parsed [`Node`] (see
/// [`crate::node`]), so a leading `---` is never emitted --
/// only the inter-document separator §6.3 requires.
pub(crate) struct Emitter
{
    buf: String,
}

impl Emitter
{
    pub fn new() -> Self
    {
        Self { buf: String::new() }
    }

    pub fn push_document(&mut self, node: &Node)
    {
        if !self.buf.is_empty()
        {
            self.buf.push_str("...\n");
        }

        write_node(&mut self.buf, node, 0);
        self.buf.push('\n');
    }

    pub fn finish(self) -> String
    {
        self.buf
    }
}

/// Write `node` at the current cursor position, which the
/// caller must already have placed either at column `indent`
/// on a fresh line, or immediately after a `- ` or `key: `
/// continuation marker.
fn write_node(out: &mut String, node: &Node, indent: usize)
{
    // An alias carries the same anchor name as the node it
    // was resolved from (§3), but re-emitting the value it
    // copied would silently turn a round-tripped alias into a
    // second anchor declaration with the same name. Emit the
    // shorthand instead (§6.3).
    if node.is_alias()
    {
        if let Some(anchor) = node.anchor()
        {
            out.push('*');
            out.push_str(anchor);
            return;
        }
    }

    if let Some(anchor) = node.anchor()
    {
        out.push('&');
        out.push_str(anchor);
        out.push(' ');
    }

    if let Some(tag) = node.tag()
    {
        out.push_str("!<");
        out.push_str(tag);
        out.push_str("> ");
    }

    match node.value()
    {
        NodeValue::Sequence(items) => write_sequence(out, items, indent),
        NodeValue::Mapping(pairs) => write_mapping(out, pairs, indent),
        scalar => write_scalar(out, scalar),
    }
}

fn is_collection(value: &NodeValue) -> bool
{
    matches!(value, NodeValue::Sequence(_) | NodeValue::Mapping(_))
}

fn is_empty_collection(value: &NodeValue) -> bool
{
    matches!(value, NodeValue::Sequence(items) if items.is_empty())
        || matches!(value, NodeValue::Mapping(pairs) if pairs.is_empty())
}

fn write_sequence(out: &mut String, items: &[Node], indent: usize)
{
    if items.is_empty()
    {
        out.push_str("[]");
        return;
    }

    for (i, item) in items.iter().enumerate()
    {
        if i > 0
        {
            out.push('\n');
            out.push_str(&" ".repeat(indent));
        }

        out.push_str("- ");

        // A nested collection may glue its own opening marker right
        // after ours (`- - 1` / `- key: 1` are both valid block
        // forms), so this recurses without a line break.
        write_node(out, item, indent + INDENT_STEP);
    }
}

fn write_mapping(out: &mut String, pairs: &[(Node, Node)], indent: usize)
{
    if pairs.is_empty()
    {
        out.push_str("{}");
        return;
    }

    for (i, (key, value)) in pairs.iter().enumerate()
    {
        if i > 0
        {
            out.push('\n');
            out.push_str(&" ".repeat(indent));
        }

        if is_collection(key.value()) && !is_empty_collection(key.value())
        {
            out.push_str("? ");
            write_node(out, key, indent + INDENT_STEP);
            out.push('\n');
            out.push_str(&" ".repeat(indent));
            out.push(':');
        }
        else
        {
            write_node(out, key, indent);
            out.push(':');
        }

        out.push(' ');
        write_mapping_value(out, value, indent);
    }
}

/// Unlike a sequence item, a mapping value can't glue a nested
/// collection onto the `key: ` line -- block mappings and
/// sequences as values always start on their own indented line.
fn write_mapping_value(out: &mut String, value: &Node, indent: usize)
{
    if is_collection(value.value()) && !is_empty_collection(value.value())
    {
        out.push('\n');
        out.push_str(&" ".repeat(indent + INDENT_STEP));
    }

    write_node(out, value, indent + INDENT_STEP);
}

fn write_scalar(out: &mut String, value: &NodeValue)
{
    match value
    {
        NodeValue::Null => out.push_str("null"),
        NodeValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        NodeValue::Int(i) => out.push_str(&i.to_string()),
        NodeValue::Float(f) => out.push_str(&format_float(*f)),
        NodeValue::String(s) =>
        {
            if is_plain_safe(s)
            {
                out.push_str(s);
            }
            else
            {
                write_double_quoted(out, s);
            }
        },
        NodeValue::Sequence(_) | NodeValue::Mapping(_) =>
        {
            unreachable!("write_scalar called on a collection")
        },
    }
}

fn format_float(f: f64) -> String
{
    if f.is_nan()
    {
        return ".nan".to_owned();
    }

    if f.is_infinite()
    {
        return if f > 0.0 { ".inf".to_owned() } else { "-.inf".to_owned() };
    }

    let mut text = f.to_string();

    if !text.contains('.') && !text.contains('e') && !text.contains('E')
    {
        text.push_str(".0");
    }

    text
}

/// Whether `s` can be emitted as a plain (unquoted) scalar and
/// still round-trip: it must not collide with a core schema
/// literal (`null`, `true`, a number, ...), and must avoid the
/// handful of byte sequences that are only legal inside a
/// quoted scalar.
fn is_plain_safe(s: &str) -> bool
{
    if s.is_empty()
    {
        return false;
    }

    if scalar_type::classify(ScalarStyle::Plain, s) != ScalarType::String
    {
        return false;
    }

    if s.starts_with(' ') || s.ends_with(' ') || s.contains('\n')
    {
        return false;
    }

    let first = s.as_bytes()[0];

    if matches!(
        first,
        b'!' | b'&' | b'*' | b'?' | b'|' | b'>' | b'%' | b'@' | b'`' | b'"' | b'\'' | b'#' | b',' | b'[' | b']' | b'{' | b'}'
    )
    {
        return false;
    }

    if matches!(first, b'-' | b':') && s.as_bytes().get(1).map_or(true, |b| *b == b' ')
    {
        return false;
    }

    if s.contains(": ") || s.ends_with(':') || s.contains(" #")
    {
        return false;
    }

    !s.chars().any(|c| c.is_control())
}

fn write_double_quoted(out: &mut String, s: &str)
{
    out.push('"');

    for c in s.chars()
    {
        match c
        {
            '\0' => out.push_str("\\0"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\x0B' => out.push_str("\\v"),
            '\x0C' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\x1B' => out.push_str("\\e"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{85}' => out.push_str("\\N"),
            '\u{A0}' => out.push_str("\\_"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if (c as u32) < 0x20 || (c as u32) == 0x7F => out.push_str(&format!("\\x{:02X}", c as u32)),
            c => out.push(c),
        }
    }

    out.push('"');
}

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;

    fn scalar(value: NodeValue) -> Node
    {
        Node::new(value, None, None)
    }

    fn render(node: &Node) -> String
    {
        let mut out = String::new();

        write_node(&mut out, node, 0);

        out
    }

    #[test]
    fn plain_scalars_render_unquoted()
    {
        assert_eq!(render(&scalar(NodeValue::Null)), "null");
        assert_eq!(render(&scalar(NodeValue::Bool(true))), "true");
        assert_eq!(render(&scalar(NodeValue::Int(-42))), "-42");
        assert_eq!(render(&scalar(NodeValue::String("hello".into()))), "hello");
    }

    #[test]
    fn float_keeps_a_decimal_point()
    {
        assert_eq!(render(&scalar(NodeValue::Float(1.0))), "1.0");
        assert_eq!(render(&scalar(NodeValue::Float(f64::INFINITY))), ".inf");
        assert_eq!(render(&scalar(NodeValue::Float(f64::NAN))), ".nan");
    }

    #[test]
    fn string_colliding_with_a_core_schema_literal_is_quoted()
    {
        assert_eq!(render(&scalar(NodeValue::String("null".into()))), "\"null\"");
        assert_eq!(render(&scalar(NodeValue::String("123".into()))), "\"123\"");
    }

    #[test]
    fn string_with_control_character_is_escaped()
    {
        assert_eq!(
            render(&scalar(NodeValue::String("a\tb".into()))),
            "\"a\\tb\""
        );
    }

    #[test]
    fn block_sequence_of_scalars()
    {
        let node = scalar(NodeValue::Sequence(vec![
            scalar(NodeValue::Int(1)),
            scalar(NodeValue::Int(2)),
        ]));

        assert_eq!(render(&node), "- 1\n- 2");
    }

    #[test]
    fn block_mapping_with_nested_sequence_value()
    {
        let node = scalar(NodeValue::Mapping(vec![(
            scalar(NodeValue::String("items".into())),
            scalar(NodeValue::Sequence(vec![scalar(NodeValue::Int(1))])),
        )]));

        assert_eq!(render(&node), "items:\n  - 1");
    }

    #[test]
    fn sequence_of_mappings_glues_first_key()
    {
        let node = scalar(NodeValue::Sequence(vec![scalar(NodeValue::Mapping(vec![(
            scalar(NodeValue::String("a".into())),
            scalar(NodeValue::Int(1)),
        )]))]));

        assert_eq!(render(&node), "- a: 1");
    }

    #[test]
    fn anchor_and_tag_precede_the_value()
    {
        let node = Node::new(
            NodeValue::Int(1),
            Some("tag:yaml.org,2002:int".into()),
            Some("x".into()),
        );

        assert_eq!(render(&node), "&x !<tag:yaml.org,2002:int> 1");
    }

    #[test]
    fn alias_node_renders_as_shorthand()
    {
        let anchored = Node::new(NodeValue::Int(42), None, Some("a".into()));
        let alias = anchored.clone().into_alias();

        let node = Node::new(
            NodeValue::Sequence(vec![anchored, alias]),
            None,
            None,
        );

        assert_eq!(render(&node), "- &a 42\n- *a");
    }

    #[test]
    fn empty_collections_render_flow_empty()
    {
        assert_eq!(render(&scalar(NodeValue::Sequence(vec![]))), "[]");
        assert_eq!(render(&scalar(NodeValue::Mapping(vec![]))), "{}");
    }
}
