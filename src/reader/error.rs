/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Error types returned from the [`yary::reader`](super)
//! module.

use std::{error::Error as StdError, fmt, io, str::Utf8Error};

use crate::scanner::error::ScanError;

/// Type alias of the `Result`s returned from this module
pub type ReaderResult<T> = std::result::Result<T, ReaderError>;

/// Alias used by [`Read`](super::Read) implementations, whose
/// method signatures were written against this name.
pub type ReadError = ReaderError;

/// Possible errors that can occur while reading from YAML
/// byte streams
#[derive(Debug)]
pub enum ReaderError
{
    /// Encountered invalid an UTF8 sequence
    UTF8(Utf8Error),
    /// Catch all wrapper for any underlying IO errors
    /// reported to us
    IO(io::Error),
    Scanner(ScanError),
    /// The input adapter's BOM sniff, transcode, or RFC 3629
    /// validation pass (§4.1) rejected the byte stream.
    InvalidEncoding(String),
}

impl fmt::Display for ReaderError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::Debug::fmt(&self, f)
    }
}

impl StdError for ReaderError
{
    fn source(&self) -> Option<&(dyn StdError + 'static)>
    {
        match self
        {
            ReaderError::UTF8(ref e) => Some(e),
            ReaderError::IO(ref e) => Some(e),
            ReaderError::Scanner(ref e) => Some(e),
            ReaderError::InvalidEncoding(_) => None,
        }
    }
}

impl From<Utf8Error> for ReaderError
{
    fn from(e: Utf8Error) -> Self
    {
        Self::UTF8(e)
    }
}

impl From<io::Error> for ReaderError
{
    fn from(e: io::Error) -> Self
    {
        Self::IO(e)
    }
}

impl From<ScanError> for ReaderError
{
    fn from(e: ScanError) -> Self
    {
        Self::Scanner(e)
    }
}
