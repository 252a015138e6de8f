/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Serializes the owned [`Node`](crate::node::value::Node) tree
//! back to YAML 1.2 text (§6.3).
//!
//! Every alias is deep-copied into a plain value at parse time
//! (see [`crate::node`]'s module docs) rather than kept as a
//! shared reference, but each copy still carries the anchor
//! name it was resolved from plus its `is_alias` flag, so the
//! `*name` shorthand round-trips: the first occurrence of an
//! anchored value is written as `&name value`, later aliases to
//! it as bare `*name`.

mod emit;

use crate::node::value::Node;

/// Render a single document as a block-style YAML string.
pub fn serialize(node: &Node) -> String
{
    let mut emitter = emit::Emitter::new();

    emitter.push_document(node);
    emitter.finish()
}

/// Render a stream of documents, separated by `...` markers
/// (§6.3).
pub fn serialize_all<'a, I>(nodes: I) -> String
where
    I: IntoIterator<Item = &'a Node>,
{
    let mut emitter = emit::Emitter::new();

    for node in nodes
    {
        emitter.push_document(node);
    }

    emitter.finish()
}
