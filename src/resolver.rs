/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Tag resolution: prefix expansion and classification against the
//! core schema (§4.5, §4.7).
//!
//! The scanner only ever lexes a tag into its raw `(handle, suffix)`
//! shape (see [`scanner::tag`](crate::scanner::tag)); this module picks
//! that apart, expands it against the document's `%TAG` directives,
//! and classifies the result so the node builder knows how to
//! represent it.

use crate::{
    error::{empty_tag, invalid_tag_uri, unknown_tag_handle, Result},
    parser::types::TagDirectives,
};

const SCHEMA_PREFIX: &str = "tag:yaml.org,2002:";

/// Which core schema type (if any) a resolved tag corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagClass
{
    /// No tag was given, or a bare, non-resolving `!` was -- the
    /// node's own kind decides how it is represented.
    NonSpecific,
    Seq,
    Map,
    Null,
    Bool,
    Int,
    Float,
    String,
    /// Any tag outside the core schema's six well-known types.
    Custom,
}

/// A tag after prefix expansion, paired with its resolved class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedTag
{
    pub class: TagClass,
    pub uri:   String,
}

impl ResolvedTag
{
    fn new(class: TagClass, uri: String) -> Self
    {
        Self { class, uri }
    }
}

/// Resolve a node's lexed `(handle, suffix)` tag into a
/// [`ResolvedTag`], expanding `handle` against `tags`.
///
/// `handle == ""` denotes a verbatim tag (`!<...>`), whose `suffix` is
/// already the tag's full URI. `handle == "!"` with an empty `suffix`
/// denotes a bare, non-resolving `!`.
pub(crate) fn resolve(tags: &TagDirectives, handle: &str, suffix: &str) -> Result<ResolvedTag>
{
    if handle.is_empty()
    {
        return resolve_verbatim(suffix);
    }

    if handle == "!" && suffix.is_empty()
    {
        return Ok(ResolvedTag::new(TagClass::NonSpecific, String::new()));
    }

    let prefix = tags.get(handle).ok_or_else(|| unknown_tag_handle(handle))?;

    if suffix.is_empty()
    {
        return Err(empty_tag());
    }

    let uri = format!("{}{}", prefix, suffix);

    Ok(ResolvedTag::new(classify(&uri), uri))
}

fn resolve_verbatim(uri: &str) -> Result<ResolvedTag>
{
    if uri.is_empty()
    {
        return Err(invalid_tag_uri(uri));
    }

    // A verbatim local tag ('!foo') is never classified against the
    // core schema, even if its suffix happens to read like one of the
    // well-known tag names.
    if uri.starts_with('!')
    {
        return Ok(ResolvedTag::new(TagClass::Custom, uri.to_owned()));
    }

    Ok(ResolvedTag::new(classify(uri), uri.to_owned()))
}

/// Classify a fully expanded tag URI against the core schema's six
/// well-known tags.
fn classify(uri: &str) -> TagClass
{
    match uri.strip_prefix(SCHEMA_PREFIX)
    {
        Some("seq") => TagClass::Seq,
        Some("map") => TagClass::Map,
        Some("null") => TagClass::Null,
        Some("bool") => TagClass::Bool,
        Some("int") => TagClass::Int,
        Some("float") => TagClass::Float,
        Some("str") => TagClass::String,
        _ => TagClass::Custom,
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn tags() -> TagDirectives<'static>
    {
        let mut tags = TagDirectives::new();

        tags.insert("!".into(), "!".into());
        tags.insert("!!".into(), SCHEMA_PREFIX.into());
        tags.insert("!e!".into(), "tag:example.com,2000:app/".into());

        tags
    }

    #[test]
    fn resolves_well_known_str()
    {
        let resolved = resolve(&tags(), "!!", "str").unwrap();

        assert_eq!(resolved.class, TagClass::String);
        assert_eq!(resolved.uri, "tag:yaml.org,2002:str");
    }

    #[test]
    fn resolves_custom_named_handle()
    {
        let resolved = resolve(&tags(), "!e!", "foo").unwrap();

        assert_eq!(resolved.class, TagClass::Custom);
        assert_eq!(resolved.uri, "tag:example.com,2000:app/foo");
    }

    #[test]
    fn non_resolving_bang_is_non_specific()
    {
        let resolved = resolve(&tags(), "!", "").unwrap();

        assert_eq!(resolved.class, TagClass::NonSpecific);
    }

    #[test]
    fn local_tag_resolves_via_primary_handle()
    {
        let resolved = resolve(&tags(), "!", "mine").unwrap();

        assert_eq!(resolved.class, TagClass::Custom);
        assert_eq!(resolved.uri, "!mine");
    }

    #[test]
    fn verbatim_global_tag_is_classified()
    {
        let resolved = resolve(&tags(), "", "tag:yaml.org,2002:int").unwrap();

        assert_eq!(resolved.class, TagClass::Int);
    }

    #[test]
    fn verbatim_local_tag_is_never_classified()
    {
        let resolved = resolve(&tags(), "", "!str").unwrap();

        assert_eq!(resolved.class, TagClass::Custom);
    }

    #[test]
    fn unknown_handle_errors()
    {
        let err = resolve(&tags(), "!unknown!", "foo").unwrap_err();

        assert_eq!(err.classify(), crate::error::Category::InvalidTag);
    }

    #[test]
    fn empty_verbatim_uri_errors()
    {
        let err = resolve_verbatim("").unwrap_err();

        assert_eq!(err.classify(), crate::error::Category::InvalidTag);
    }
}
