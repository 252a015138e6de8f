/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! This module contains the functions responsible for
//! scanning single and double quoted flow scalars into
//! Tokens.
//!
//! scan_flow_scalar is the top level interface, dispatching
//! to scan_flow_scalar_single_quote or
//! scan_flow_scalar_double_quote based on which quote style
//! opened the scalar.

use crate::{
    scanner::{
        error::{ScanError, ScanResult as Result},
        flag::Flags,
        scalar::escape::flow_unescape,
        stats::MStats,
    },
    token::{ScalarStyle, Token},
};

const SINGLE: u8 = b'\'';
const DOUBLE: u8 = b'"';
const SPACE: u8 = b' ';
const NEWLINE: u8 = b'\n';

/// Scans a single or double quoted flow scalar, returning a
/// Token and the amount read from .base.
///
/// See:
///     YAML 1.2: Section 7.3.1, 7.3.2
///     yaml.org/spec/1.2/spec.html#id2786942
///     yaml.org/spec/1.2/spec.html#id2785586
pub(in crate::scanner) fn scan_flow_scalar<'de>(
    _opts: Flags,
    base: &'de str,
    stats: &mut MStats,
    single: bool,
) -> Result<(Token<'de>, usize)>
{
    match single
    {
        true => scan_flow_scalar_single_quote(base, stats),
        false => scan_flow_scalar_double_quote(base, stats),
    }
}

/// Scans a single quoted flow scalar.
///
/// See:
///     YAML 1.2: Section 7.3.1
///     yaml.org/spec/1.2/spec.html#id2788756
fn scan_flow_scalar_single_quote<'de>(
    base: &'de str,
    stats: &mut MStats,
) -> Result<(Token<'de>, usize)>
{
    let mut buffer = base;
    let mut scratch = Vec::new();
    let mut local_stats = stats.clone();
    let mut can_borrow = true;

    // Eat left quote
    advance!(buffer, :local_stats, 1);

    'scalar: loop
    {
        // A document indicator may not start a line inside a flow
        // scalar
        if isDocumentIndicator!(~buffer, :local_stats)
        {
            return Err(ScanError::InvalidFlowScalar);
        }

        // EOF without a ' is an error
        if buffer.is_empty()
        {
            return Err(ScanError::UnexpectedEOF);
        }

        // Consume non whitespace characters
        while !isBlankZ!(~buffer)
        {
            // if we encounter an escaped quote we can no longer borrow
            // from .base, we must unescape the quote into .scratch
            if check!(~buffer => [SINGLE, SINGLE, ..])
            {
                set_no_borrow(&mut can_borrow, base, buffer, &mut scratch);

                scratch.push(SINGLE);
                advance!(buffer, :local_stats, 2);

                continue;
            }

            // We're done, we hit the right quote
            if check!(~buffer => [SINGLE, ..])
            {
                break 'scalar;
            }

            // Its a non blank character, add it
            if !can_borrow
            {
                // Safety: isBlankZ guarantees the slice is not empty
                scratch.push(buffer.as_bytes()[0])
            }
            advance!(buffer, :local_stats, 1);
        }

        // Consume and fold any interior whitespace
        consume_quoted_whitespace(base, &mut buffer, &mut local_stats, &mut can_borrow, &mut scratch);
    }

    // Retrieve the token slice, either from the .base slice, or
    // if we couldn't borrow, the .scratch space
    let slice = match can_borrow
    {
        // Safety: we must be on a code point boundary, as the only
        // way can get to this section is:
        //
        // 1. .base->0 must be a quote
        // 2. .base->.buffer.len() - 1 must be a quote
        // 3. .base must be valid UTF8 (its a str)
        true => cow!(base.get(1..base.len() - buffer.len()).unwrap()),
        false => cow!(String::from_utf8(scratch).unwrap()),
    };

    let token = Token::Scalar(slice, ScalarStyle::SingleQuote);

    // Eat the right quote
    advance!(buffer, :local_stats, 1);

    let advance = base.len() - buffer.len();
    *stats = local_stats;

    Ok((token, advance))
}

/// Scans a double quoted flow scalar.
///
/// See:
///     YAML 1.2: Section 7.3.2
///     yaml.org/spec/1.2/spec.html#id2787109
fn scan_flow_scalar_double_quote<'de>(
    base: &'de str,
    stats: &mut MStats,
) -> Result<(Token<'de>, usize)>
{
    let mut buffer = base;
    let mut scratch = Vec::new();
    let mut local_stats = stats.clone();
    let mut can_borrow = true;

    // Eat left quote
    advance!(buffer, :local_stats, 1);

    'scalar: loop
    {
        if isDocumentIndicator!(~buffer, :local_stats)
        {
            return Err(ScanError::InvalidFlowScalar);
        }

        if buffer.is_empty()
        {
            return Err(ScanError::UnexpectedEOF);
        }

        // Consume non whitespace characters
        while !isBlankZ!(~buffer)
        {
            // We're done, we hit the right quote
            if check!(~buffer => [DOUBLE, ..])
            {
                break 'scalar;
            }

            // An escape sequence
            if check!(~buffer => [b'\\', ..])
            {
                set_no_borrow(&mut can_borrow, base, buffer, &mut scratch);

                // An escaped line break joins the two lines with no
                // inserted whitespace, and any leading indentation on
                // the continuation line is discarded, unlike every
                // other escape sequence
                if isBreak!(~buffer, 1)
                {
                    advance!(buffer, :local_stats, 1);
                    advance!(buffer, :local_stats, @line);

                    while isBlank!(~buffer)
                    {
                        advance!(buffer, :local_stats, 1);
                    }

                    continue;
                }

                let amt = flow_unescape(buffer, &mut scratch)?;
                advance!(buffer, :local_stats, amt);

                continue;
            }

            if !can_borrow
            {
                scratch.push(buffer.as_bytes()[0])
            }
            advance!(buffer, :local_stats, 1);
        }

        if check!(~buffer => [DOUBLE, ..])
        {
            break 'scalar;
        }

        // Consume and fold any interior whitespace
        consume_quoted_whitespace(base, &mut buffer, &mut local_stats, &mut can_borrow, &mut scratch);
    }

    let slice = match can_borrow
    {
        true => cow!(base.get(1..base.len() - buffer.len()).unwrap()),
        false => cow!(String::from_utf8(scratch).unwrap()),
    };

    let token = Token::Scalar(slice, ScalarStyle::DoubleQuote);

    // Eat the right quote
    advance!(buffer, :local_stats, 1);

    let advance = base.len() - buffer.len();
    *stats = local_stats;

    Ok((token, advance))
}

/// Consume the blank/break whitespace that follows a run of
/// non blank characters inside a quoted flow scalar, folding
/// it per the same rule plain and block scalars use: a
/// single line break becomes a space, more than one becomes
/// (n - 1) literal newlines, and no line break at all leaves
/// the whitespace untouched.
fn consume_quoted_whitespace(
    base: &str,
    buffer: &mut &str,
    stats: &mut MStats,
    can_borrow: &mut bool,
    scratch: &mut Vec<u8>,
)
{
    let mut whitespace = 0;
    let mut lines = 0;

    loop
    {
        match (isBlank!(~*buffer), isBreak!(~*buffer))
        {
            (false, false) => break,
            (true, _) =>
            {
                if !*can_borrow
                {
                    scratch.push(buffer.as_bytes()[0])
                }
                whitespace += 1;
                advance!(*buffer, :stats, 1);
            },
            (false, _) =>
            {
                set_no_borrow(can_borrow, base, buffer, scratch);

                lines += 1;
                advance!(*buffer, :stats, @line);
            },
        }
    }

    match lines
    {
        0 =>
        {},
        1 =>
        {
            scratch.truncate(scratch.len() - whitespace);
            scratch.push(SPACE);
        },
        n =>
        {
            scratch.truncate(scratch.len() - whitespace);

            // Safety: we can only reach this branch if n > 1
            for _ in 0..n - 1
            {
                scratch.push(NEWLINE)
            }
        },
    }
}

/// Handles the trap door from borrowing to copying
fn set_no_borrow(can_borrow: &mut bool, base: &str, buffer: &str, scratch: &mut Vec<u8>)
{
    if *can_borrow
    {
        scratch.extend_from_slice(base[1..base.len() - buffer.len()].as_bytes());
    }

    *can_borrow = false
}

#[cfg(test)]
mod tests
{
    use anyhow::bail;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::scanner::scalar::test_utils::TestResult;

    #[test]
    fn flow_single_empty() -> TestResult
    {
        let data = "''";
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!(""), ScalarStyle::SingleQuote);

        let (token, read) = scan_flow_scalar_single_quote(data, &mut stats)?;

        assert_eq!(read, 2);
        assert_eq!(token, expected);

        Ok(())
    }

    #[test]
    fn flow_single_simple() -> TestResult
    {
        let data = "'hello world'";
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!("hello world"), ScalarStyle::SingleQuote);

        let (token, read) = scan_flow_scalar_single_quote(data, &mut stats)?;

        assert_eq!(read, 13);
        assert_eq!(token, expected);

        Ok(())
    }

    #[test]
    fn flow_single_escaped_quote() -> TestResult
    {
        let data = "'it''s'";
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!("it's"), ScalarStyle::SingleQuote);

        let (token, read) = scan_flow_scalar_single_quote(data, &mut stats)?;

        assert_eq!(read, data.len());
        assert_eq!(token, expected);

        Ok(())
    }

    #[test]
    fn flow_single_line_join() -> TestResult
    {
        let data = "'a\n   b\n\n   c'";
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!("a b\nc"), ScalarStyle::SingleQuote);

        let (token, read) = scan_flow_scalar_single_quote(data, &mut stats)?;

        assert_eq!(read, data.len());
        assert_eq!(token, expected);

        Ok(())
    }

    #[test]
    fn flow_single_reject_document()
    {
        let data = ["'\n--- '", "'\n...\n'"];
        let mut stats = MStats::new();
        let expected = ScanError::InvalidFlowScalar;

        for (i, &t) in (&data).into_iter().enumerate()
        {
            match scan_flow_scalar_single_quote(t, &mut stats)
            {
                Err(e) => assert_eq!(
                    e, expected,
                    "on iteration {}, expected error {}, got {}",
                    i, expected, e
                ),
                Ok((unexpected, _)) => panic!(
                    "on iteration {}, expected error {}, got unexpected value {:?}",
                    i, expected, unexpected
                ),
            }
        }
    }

    #[test]
    fn flow_single_reject_eof()
    {
        let data = ["'end space ", "'", "'end word"];
        let mut stats = MStats::new();
        let expected = ScanError::UnexpectedEOF;

        for (i, &t) in (&data).into_iter().enumerate()
        {
            match scan_flow_scalar_single_quote(t, &mut stats)
            {
                Err(e) => assert_eq!(
                    e, expected,
                    "on iteration {}, expected error {}, got {}",
                    i, expected, e
                ),
                Ok((unexpected, _)) => panic!(
                    "on iteration {}, expected error {}, got unexpected value {:?}",
                    i, expected, unexpected
                ),
            }
        }
    }

    #[test]
    fn flow_double_empty() -> TestResult
    {
        let data = "\"\"";
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!(""), ScalarStyle::DoubleQuote);

        let (token, read) = scan_flow_scalar_double_quote(data, &mut stats)?;

        assert_eq!(read, 2);
        assert_eq!(token, expected);

        Ok(())
    }

    #[test]
    fn flow_double_simple() -> TestResult
    {
        let data = r#""hello world""#;
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!("hello world"), ScalarStyle::DoubleQuote);

        let (token, read) = scan_flow_scalar_double_quote(data, &mut stats)?;

        assert_eq!(read, data.len());
        assert_eq!(token, expected);

        Ok(())
    }

    #[test]
    fn flow_double_escape() -> TestResult
    {
        let data = r#""tab\tnewline\nquote\"""#;
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!("tab\tnewline\nquote\""), ScalarStyle::DoubleQuote);

        let (token, read) = scan_flow_scalar_double_quote(data, &mut stats)?;

        assert_eq!(read, data.len());
        assert_eq!(token, expected);

        Ok(())
    }

    #[test]
    fn flow_double_escaped_line_continuation() -> TestResult
    {
        let data = "\"a\\\n   b\"";
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!("ab"), ScalarStyle::DoubleQuote);

        let (token, read) = scan_flow_scalar_double_quote(data, &mut stats)?;

        assert_eq!(read, data.len());
        assert_eq!(token, expected);

        Ok(())
    }

    #[test]
    fn flow_double_line_join() -> TestResult
    {
        let data = "\"a\n   b\n\n   c\"";
        let mut stats = MStats::new();
        let expected = Token::Scalar(cow!("a b\nc"), ScalarStyle::DoubleQuote);

        let (token, read) = scan_flow_scalar_double_quote(data, &mut stats)?;

        assert_eq!(read, data.len());
        assert_eq!(token, expected);

        Ok(())
    }

    #[test]
    fn flow_double_reject_eof()
    {
        let data = ["\"end space ", "\"", "\"end word"];
        let mut stats = MStats::new();
        let expected = ScanError::UnexpectedEOF;

        for (i, &t) in (&data).into_iter().enumerate()
        {
            match scan_flow_scalar_double_quote(t, &mut stats)
            {
                Err(e) => assert_eq!(
                    e, expected,
                    "on iteration {}, expected error {}, got {}",
                    i, expected, e
                ),
                Ok((unexpected, _)) => bail!(
                    "on iteration {}, expected error {}, got unexpected value {:?}",
                    i,
                    expected,
                    unexpected
                ),
            }
        }
    }
}
