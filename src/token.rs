/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

pub type Slice<'a> = std::borrow::Cow<'a, str>;

/// Tokens emitted by the scanner, in document order.
#[derive(Debug, PartialEq)]
pub enum Token<'a>
{
    /// The stream's start, with the detected byte encoding {virtual}
    StreamStart(StreamEncoding),
    /// The stream's end {virtual}
    StreamEnd,
    /// The %YAML directive, (major, minor)
    VersionDirective(u8, u8),
    /// The %TAG directive, (handle, prefix)
    TagDirective(Slice<'a>, Slice<'a>),
    /// A ---
    DocumentStart,
    /// A ...
    DocumentEnd,
    /// Indentation increase for a block sequence
    BlockSequenceStart,
    /// Indentation increase for a block mapping
    BlockMappingStart,
    /// Indentation decrease for a block collection
    BlockEnd,
    /// A '['
    FlowSequenceStart,
    /// A ']'
    FlowSequenceEnd,
    /// A '{'
    FlowMappingStart,
    /// A '}'
    FlowMappingEnd,
    /// A '-'
    BlockEntry,
    /// A ','
    FlowEntry,
    /// Either a '?' or nothing
    Key,
    /// A ':'
    Value,
    /// An alias (*anchor)
    Alias(Slice<'a>),
    /// An anchor (&anchor)
    Anchor(Slice<'a>),
    /// A tag (!handle, !suffix) — unresolved, as lexed
    Tag(Slice<'a>, Slice<'a>),
    /// A scalar (value, style) — not yet typed
    Scalar(Slice<'a>, ScalarStyle),
}

impl<'a> Token<'a>
{
    pub fn into_owned(self) -> Token<'static>
    {
        match self
        {
            Token::StreamStart(encoding) => Token::StreamStart(encoding),
            Token::StreamEnd => Token::StreamEnd,
            Token::VersionDirective(major, minor) => Token::VersionDirective(major, minor),
            Token::TagDirective(handle, prefix) => Token::TagDirective(
                Slice::Owned(handle.into_owned()),
                Slice::Owned(prefix.into_owned()),
            ),
            Token::DocumentStart => Token::DocumentStart,
            Token::DocumentEnd => Token::DocumentEnd,
            Token::BlockSequenceStart => Token::BlockSequenceStart,
            Token::BlockMappingStart => Token::BlockMappingStart,
            Token::BlockEnd => Token::BlockEnd,
            Token::FlowSequenceStart => Token::FlowSequenceStart,
            Token::FlowSequenceEnd => Token::FlowSequenceEnd,
            Token::FlowMappingStart => Token::FlowMappingStart,
            Token::FlowMappingEnd => Token::FlowMappingEnd,
            Token::BlockEntry => Token::BlockEntry,
            Token::FlowEntry => Token::FlowEntry,
            Token::Key => Token::Key,
            Token::Value => Token::Value,
            Token::Alias(alias) => Token::Alias(Slice::Owned(alias.into_owned())),
            Token::Anchor(anchor) => Token::Anchor(Slice::Owned(anchor.into_owned())),
            Token::Tag(handle, suffix) => Token::Tag(
                Slice::Owned(handle.into_owned()),
                Slice::Owned(suffix.into_owned()),
            ),
            Token::Scalar(contents, kind) =>
            {
                Token::Scalar(Slice::Owned(contents.into_owned()), kind)
            },
        }
    }
}

/// A [`Token`] with its contents erased, used to talk about
/// "the kind of token" without borrowing it, e.g in lookahead
/// checks against the simple key queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker
{
    StreamStart,
    StreamEnd,
    VersionDirective,
    TagDirective,
    DocumentStart,
    DocumentEnd,
    BlockSequenceStart,
    BlockMappingStart,
    BlockEnd,
    FlowSequenceStart,
    FlowSequenceEnd,
    FlowMappingStart,
    FlowMappingEnd,
    BlockEntry,
    FlowEntry,
    Key,
    Value,
    Alias,
    Anchor,
    Tag,
    Scalar,
}

impl Marker
{
    fn from_token(t: &Token<'_>) -> Self
    {
        use Token::*;

        match t
        {
            StreamStart(_) => Self::StreamStart,
            StreamEnd => Self::StreamEnd,
            VersionDirective(_, _) => Self::VersionDirective,
            TagDirective(_, _) => Self::TagDirective,
            DocumentStart => Self::DocumentStart,
            DocumentEnd => Self::DocumentEnd,
            BlockSequenceStart => Self::BlockSequenceStart,
            BlockMappingStart => Self::BlockMappingStart,
            BlockEnd => Self::BlockEnd,
            FlowSequenceStart => Self::FlowSequenceStart,
            FlowSequenceEnd => Self::FlowSequenceEnd,
            FlowMappingStart => Self::FlowMappingStart,
            FlowMappingEnd => Self::FlowMappingEnd,
            BlockEntry => Self::BlockEntry,
            FlowEntry => Self::FlowEntry,
            Key => Self::Key,
            Value => Self::Value,
            Alias(_) => Self::Alias,
            Anchor(_) => Self::Anchor,
            Tag(_, _) => Self::Tag,
            Scalar(_, _) => Self::Scalar,
        }
    }
}

impl Default for Marker
{
    fn default() -> Self
    {
        Self::StreamStart
    }
}

impl From<&'_ Token<'_>> for Marker
{
    fn from(t: &'_ Token<'_>) -> Self
    {
        Self::from_token(t)
    }
}

impl PartialEq<Token<'_>> for Marker
{
    fn eq(&self, other: &Token<'_>) -> bool
    {
        self == &Self::from(other)
    }
}

/// Byte encoding detected by the input adapter (§4.1). Always
/// `UTF8` by the time it reaches the scanner — transcoding
/// happens upstream in `reader::encoding` — but the original
/// detected form is preserved here for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEncoding
{
    Utf8,
    Utf16LE,
    Utf16BE,
    Utf32LE,
    Utf32BE,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle
{
    Plain,
    SingleQuote,
    DoubleQuote,
    Literal,
    Folded,
}
