/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use std::{cell::UnsafeCell, fmt, io};

use super::{
    encoding,
    error::{ReadError, ReaderResult},
    private::Sealed,
    Read, ReadContext, Reader,
};
use crate::scanner::flag::Flags;

#[derive(Debug)]
pub struct OwnedReader
{
    inner: ReadHolder,
}

impl OwnedReader
{
    pub fn new<T>(src: T) -> Self
    where
        T: io::Read + 'static,
    {
        let inner = ReadHolder::new(src);

        Self { inner }
    }

    /// Wrap an already-decoded string directly, skipping the
    /// `io::Read` drain -- used by [`try_from_bytes`](super::try_from_bytes)
    /// once the input adapter (§4.1) has sniffed, transcoded
    /// and normalized the raw bytes.
    pub(crate) fn from_decoded(data: String) -> Self
    {
        Self {
            inner: ReadHolder::ready(data),
        }
    }

    pub(crate) fn new_reader(&self, opts: Flags) -> Reader<'_, Self>
    {
        Reader::new(self, opts)
    }
}

impl Read for OwnedReader
{
    fn drive<'de>(&'de self, cxt: ReadContext<'_, '_, 'de>) -> Result<(), ReadError>
    {
        let data = self.inner.data()?;

        cxt.scanner.scan_tokens(cxt.flags, data, cxt.queue)?;

        Ok(())
    }

    fn source(&self) -> Option<&str>
    {
        self.inner.data().ok()
    }

    unsafe fn consume(&self, _bound: usize) -> Result<(), ReadError>
    {
        Ok(())
    }
}

impl Sealed for OwnedReader {}

/// Holds the underlying `io::Read` source until the first
/// call to [`data`](Self::data), which drains it completely
/// into an owned, never-reallocated buffer.
///
/// The scanner always wants a single, fully buffered `&str`
/// (see [`scanner::flag`](crate::scanner::flag)), so there is
/// no incremental re-fill to support here -- just a one-time,
/// lazy `read_to_end`.
#[derive(Debug)]
struct ReadHolder
{
    inner: UnsafeCell<Impl>,
}

impl ReadHolder
{
    pub fn new<T>(src: T) -> Self
    where
        T: io::Read + 'static,
    {
        Self {
            inner: Impl::Pending(Box::new(src)).into(),
        }
    }

    pub fn ready(data: String) -> Self
    {
        Self {
            inner: Impl::Ready(data).into(),
        }
    }

    /// Drain the underlying source into an owned buffer the
    /// first time this is called; every call returns a borrow
    /// of that same buffer.
    pub fn data(&self) -> ReaderResult<&str>
    {
        // SAFETY:
        //
        // Once `Impl` transitions to `Ready`, the `String` it
        // holds is never mutated or dropped before `self` is,
        // so handing out a borrow derived through this raw
        // pointer for the lifetime of `&self` cannot dangle.
        let inner: &mut Impl = unsafe { &mut *self.inner.get() };

        inner.fill()
    }
}

enum Impl
{
    Pending(Box<dyn io::Read>),
    Ready(String),
}

impl Impl
{
    fn fill(&mut self) -> ReaderResult<&str>
    {
        if let Impl::Pending(source) = self
        {
            let mut buf = Vec::new();

            source.read_to_end(&mut buf)?;

            let (_encoding, data) = encoding::decode(&buf)?;

            *self = Impl::Ready(data);
        }

        match self
        {
            Impl::Ready(data) => Ok(data),
            Impl::Pending(_) => unreachable!(),
        }
    }
}

impl fmt::Debug for Impl
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self
        {
            Impl::Pending(_) => f.debug_tuple("Pending").field(&"dyn <std::io::Read>").finish(),
            Impl::Ready(data) => f.debug_tuple("Ready").field(data).finish(),
        }
    }
}
