/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The public error type surfaced across every API boundary
//! in this crate (§6.4, §7 of the design).
//!
//! Internally every subsystem (reader, scanner, resolver,
//! parser) has its own lightweight error enum; all of them
//! convert into this crate's [`Error`] at the point they
//! cross back out to a caller, gaining `(line, column, byte
//! offset)` context along the way where it is available.

use std::{error::Error as StdError, fmt};

use crate::{parser::error::ParseError, reader::error::ReaderError, scanner::error::ScanError};

/// Result typedef used throughout this library's public API
pub type Result<T> = std::result::Result<T, Error>;

/// Opaque type representing all possible errors which can
/// occur during library usage.
pub struct Error
{
    inner: Box<internal::Error>,
}

impl Error
{
    /// The line at which the error occurred, 1-indexed.
    ///
    /// Meaningless (always 0) unless [`has_context`](Self::has_context)
    /// returns `true`.
    pub fn line(&self) -> u64
    {
        self.inner.line
    }

    /// The column into the line where the error occurred,
    /// 1-indexed.
    pub fn column(&self) -> u64
    {
        self.inner.column
    }

    /// The byte offset into the stream at which the error
    /// occurred.
    pub fn at(&self) -> u64
    {
        self.inner.at
    }

    /// Categorize the error into one of the taxonomy buckets
    /// from §7: input, syntactic or semantic, further broken
    /// down by [`Category`].
    pub fn classify(&self) -> Category
    {
        self.inner.classify()
    }

    /// Checks whether this error carries `(line, column, at)`
    /// context.
    pub fn has_context(&self) -> bool
    {
        self.inner.has_context()
    }

    pub(crate) fn new(err: internal::Error) -> Self
    {
        Self {
            inner: Box::new(err),
        }
    }

    /// Attach `(line, column, at)` context derived from `text`
    /// and the byte offset the failing event/token started
    /// at, unless this error already carries context from
    /// somewhere deeper in the stack.
    ///
    /// This is how most errors gain a position: rather than
    /// threading a byte offset through every internal error
    /// variant, the builder remembers the offset of the last
    /// event it successfully consumed and stamps it onto
    /// whatever error aborts the parse (§4.7: "Lexical defects
    /// abort ... at the cursor position").
    pub(crate) fn with_offset(mut self, text: &str, offset: usize) -> Self
    {
        if !self.has_context()
        {
            let (line, column) = crate::position::line_col(text, offset);

            self.inner.at = offset as u64;
            self.inner.line = line;
            self.inner.column = column;
        }

        self
    }
}

/// Rough category of an [`Error`], corresponding to the
/// shapes callers observe across the API boundary (§6.4):
/// `invalidEncoding`, `parseError`, `invalidTag`, `typeError`,
/// `outOfRange`, and a generic base error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category
{
    /// `invalidEncoding`: malformed byte stream, BOM/UTF
    /// transcoding failure, or a disallowed control
    /// character.
    InvalidEncoding,

    /// `parseError`: lexical or syntactic defect — bad
    /// indentation, unterminated quotes, invalid escapes,
    /// duplicate mapping keys, misplaced directives, missing
    /// anchors.
    ParseError,

    /// `invalidTag`: unknown tag handle, invalid verbatim tag
    /// URI, or an empty tag.
    InvalidTag,

    /// `typeError`: a value was retrieved as the wrong core
    /// schema type.
    TypeError,

    /// `outOfRange`: indexed access fell outside a
    /// sequence/mapping's bounds.
    OutOfRange,
}

pub(crate) mod internal
{
    use std::{error::Error as StdError, fmt};

    use super::Category;
    use crate::{parser::error::ParseError, reader::error::ReaderError, scanner::error::ScanError};

    /// Internal error representation used throughout the
    /// library. Carries enough position metadata that it can
    /// be contextualized once it escapes the component that
    /// raised it.
    pub(crate) struct Error
    {
        pub kind:   ErrorKind,
        pub at:     u64,
        pub line:   u64,
        pub column: u64,
    }

    impl Error
    {
        pub fn new<T>(err: T) -> Self
        where
            T: Into<ErrorKind>,
        {
            Self::with_context(err, 0, 0, 0)
        }

        pub fn with_context<T>(err: T, at: u64, line: u64, column: u64) -> Self
        where
            T: Into<ErrorKind>,
        {
            Self {
                kind: err.into(),
                at,
                line,
                column,
            }
        }

        pub fn has_context(&self) -> bool
        {
            self.line != 0
        }

        pub fn classify(&self) -> Category
        {
            self.kind.classify()
        }
    }

    #[derive(Debug)]
    pub(crate) enum ErrorKind
    {
        Reader(ReaderError),
        Scan(ScanError),
        Parse(ParseError),
        Tag(TagErrorKind),
        Type(&'static str),
        Range
        {
            len: usize, index: usize
        },
    }

    /// Tag-resolution specific defects (§4.5, §4.7).
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum TagErrorKind
    {
        UnknownHandle(String),
        InvalidUri(String),
        Empty,
    }

    impl fmt::Display for TagErrorKind
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
        {
            match self
            {
                Self::UnknownHandle(h) => write!(f, "undefined tag handle '{}'", h),
                Self::InvalidUri(u) => write!(f, "invalid verbatim tag URI '{}'", u),
                Self::Empty => f.write_str("empty tag"),
            }
        }
    }

    impl ErrorKind
    {
        pub fn classify(&self) -> Category
        {
            match self
            {
                Self::Reader(_) => Category::InvalidEncoding,
                Self::Scan(_) | Self::Parse(_) => Category::ParseError,
                Self::Tag(_) => Category::InvalidTag,
                Self::Type(_) => Category::TypeError,
                Self::Range { .. } => Category::OutOfRange,
            }
        }
    }

    impl fmt::Display for Error
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
        {
            if self.has_context()
            {
                write!(
                    f,
                    "{}, on line {}, column {}, at byte {}",
                    self.kind, self.line, self.column, self.at
                )
            }
            else
            {
                fmt::Display::fmt(&self.kind, f)
            }
        }
    }

    impl fmt::Debug for Error
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
        {
            let mut this = f.debug_struct("Error");

            this.field("kind", &self.kind);

            if self.has_context()
            {
                this.field("line", &self.line)
                    .field("column", &self.column)
                    .field("at", &self.at);
            }

            this.finish()
        }
    }

    impl fmt::Display for ErrorKind
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
        {
            match self
            {
                Self::Reader(e) => fmt::Display::fmt(e, f),
                Self::Scan(e) => fmt::Display::fmt(e, f),
                Self::Parse(e) => fmt::Display::fmt(e, f),
                Self::Tag(e) => fmt::Display::fmt(e, f),
                Self::Type(expected) => write!(f, "expected a {} value", expected),
                Self::Range { len, index } =>
                {
                    write!(f, "index {} out of range for length {}", index, len)
                },
            }
        }
    }

    impl StdError for Error
    {
        fn source(&self) -> Option<&(dyn StdError + 'static)>
        {
            None
        }
    }

    impl StdError for ErrorKind {}

    impl From<ReaderError> for ErrorKind
    {
        fn from(e: ReaderError) -> Self
        {
            Self::Reader(e)
        }
    }

    impl From<ScanError> for ErrorKind
    {
        fn from(e: ScanError) -> Self
        {
            Self::Scan(e)
        }
    }

    impl From<ParseError> for ErrorKind
    {
        fn from(e: ParseError) -> Self
        {
            Self::Parse(e)
        }
    }

    impl From<TagErrorKind> for ErrorKind
    {
        fn from(e: TagErrorKind) -> Self
        {
            Self::Tag(e)
        }
    }
}

impl fmt::Debug for Error
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for Error
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl StdError for Error
{
    fn source(&self) -> Option<&(dyn StdError + 'static)>
    {
        StdError::source(&*self.inner)
    }
}

impl From<ReaderError> for Error
{
    fn from(e: ReaderError) -> Self
    {
        Self::new(internal::Error::new(e))
    }
}

impl From<ScanError> for Error
{
    fn from(e: ScanError) -> Self
    {
        Self::new(internal::Error::new(e))
    }
}

impl From<ParseError> for Error
{
    fn from(e: ParseError) -> Self
    {
        Self::new(internal::Error::new(e))
    }
}

/// Construct a `typeError` for a value retrieved as the
/// wrong core schema type.
pub(crate) fn type_error(expected: &'static str) -> Error
{
    Error::new(internal::Error::new(internal::ErrorKind::Type(expected)))
}

/// Construct an `outOfRange` error for indexed access.
pub(crate) fn out_of_range(len: usize, index: usize) -> Error
{
    Error::new(internal::Error::new(internal::ErrorKind::Range { len, index }))
}

/// Construct an `invalidTag` error for an unknown named
/// handle.
pub(crate) fn unknown_tag_handle(handle: impl Into<String>) -> Error
{
    Error::new(internal::Error::new(internal::ErrorKind::Tag(
        internal::TagErrorKind::UnknownHandle(handle.into()),
    )))
}

/// Construct an `invalidTag` error for a malformed verbatim
/// tag URI.
pub(crate) fn invalid_tag_uri(uri: impl Into<String>) -> Error
{
    Error::new(internal::Error::new(internal::ErrorKind::Tag(
        internal::TagErrorKind::InvalidUri(uri.into()),
    )))
}

/// Construct an `invalidTag` error for an empty tag.
pub(crate) fn empty_tag() -> Error
{
    Error::new(internal::Error::new(internal::ErrorKind::Tag(
        internal::TagErrorKind::Empty,
    )))
}
