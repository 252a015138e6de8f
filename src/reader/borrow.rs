/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Contains an implementation of [`Read`](super::Read) for
//! borrowed UTF8 slices (`&str`s).

use super::{error::ReadError, private, Read, ReadContext, Reader};
use crate::scanner::flag::Flags;

/// A [`Read`](super::Read) implementor for borrows.
#[derive(Debug, Clone)]
pub struct BorrowReader<'de>
{
    data: &'de str,
}

impl<'de> BorrowReader<'de>
{
    /// Instantiate a new [`BorrowReader`] from the given
    /// UTF8 slice
    pub fn new(data: &'de str) -> Self
    {
        Self { data }
    }

    pub(crate) fn new_reader(&'de self, opts: Flags) -> Reader<'de, Self>
    {
        Reader::new(self, opts)
    }
}

impl<'a> Read for BorrowReader<'a>
{
    fn drive<'de>(&'de self, cxt: ReadContext<'_, '_, 'de>) -> Result<(), ReadError>
    {
        cxt.scanner.scan_tokens(cxt.flags, self.data, cxt.queue)?;

        Ok(())
    }

    fn source(&self) -> Option<&str>
    {
        Some(self.data)
    }

    unsafe fn consume(&self, _bound: usize) -> Result<(), ReadError>
    {
        Ok(())
    }
}

impl private::Sealed for BorrowReader<'_> {}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::reader::test_util::test_reader;

    test_reader! {BorrowReader::new}
}
