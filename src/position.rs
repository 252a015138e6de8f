/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Turns a byte offset into a decoded document back into the
//! 1-indexed `(line, column)` pair callers see on an error
//! (§4.2, §6.4).
//!
//! The scanner tracks its own running [`MStats`](crate::scanner::stats::MStats)
//! while it advances, but that is only ever the *current*
//! position; once an error has unwound back up to the public
//! API boundary all that is left is the byte offset the
//! failing event/token started at, plus the original decoded
//! text. This module recomputes line/column from those two
//! things, which is run once per error rather than kept
//! up to date on every token.

/// Resolve `offset` (a byte index into `text`) to a 1-indexed
/// `(line, column)` pair.
///
/// `offset` is clamped to `text.len()` so a position at or
/// past end-of-input still resolves instead of panicking.
pub(crate) fn line_col(text: &str, offset: usize) -> (u64, u64)
{
    let offset = offset.min(text.len());
    let head = &text[..offset];

    let line = head.bytes().filter(|&b| b == b'\n').count() as u64 + 1;
    let column = match head.rfind('\n')
    {
        Some(nl) => head[nl + 1..].chars().count() as u64 + 1,
        None => head.chars().count() as u64 + 1,
    };

    (line, column)
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn first_line_first_column()
    {
        assert_eq!(line_col("abc", 0), (1, 1));
    }

    #[test]
    fn second_line_is_counted()
    {
        let text = "a: 1\na: 2\n";

        // offset of the second 'a' key
        let offset = text.find("\na").unwrap() + 1;

        assert_eq!(line_col(text, offset), (2, 1));
    }

    #[test]
    fn column_counts_from_last_newline()
    {
        let text = "key: value\n";
        let offset = text.find("value").unwrap();

        assert_eq!(line_col(text, offset), (1, 6));
    }

    #[test]
    fn offset_past_end_clamps()
    {
        let text = "abc";

        assert_eq!(line_col(text, 999), (1, 4));
    }
}
