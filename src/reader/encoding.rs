/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Input adapter (§4.1): sniffs the byte encoding of a raw
//! buffer, transcodes UTF-16/32 to UTF-8, and normalizes line
//! endings ahead of scanning.
//!
//! The scanner only ever sees a single, already-transcoded
//! UTF-8 `&str` (see [`scanner::flag`](crate::scanner::flag)),
//! so everything in this module runs once, eagerly, over a
//! fully buffered byte slice -- there is no streaming sniff.

use super::error::{ReaderError, ReaderResult};
use crate::token::StreamEncoding;

const BOM_UTF32LE: [u8; 4] = [0xFF, 0xFE, 0x00, 0x00];
const BOM_UTF32BE: [u8; 4] = [0x00, 0x00, 0xFE, 0xFF];
const BOM_UTF8: [u8; 3] = [0xEF, 0xBB, 0xBF];
const BOM_UTF16LE: [u8; 2] = [0xFF, 0xFE];
const BOM_UTF16BE: [u8; 2] = [0xFE, 0xFF];

/// Sniff `bytes` for a BOM or the "ASCII + null" pattern,
/// transcode to UTF-8 if needed, and collapse `\r`/`\r\n` line
/// endings to `\n`.
///
/// ## Errors
///
/// Returns `InvalidEncoding` on an unpaired UTF-16 surrogate,
/// a UTF-32 code unit outside the Unicode scalar value range,
/// or a UTF-8 sequence that fails RFC 3629 validation.
pub fn decode(bytes: &[u8]) -> ReaderResult<(StreamEncoding, String)>
{
    let (encoding, body) = sniff(bytes);

    let text = match encoding
    {
        StreamEncoding::Utf8 => std::str::from_utf8(body)?.to_owned(),
        StreamEncoding::Utf16LE => transcode_utf16(body, u16::from_le_bytes)?,
        StreamEncoding::Utf16BE => transcode_utf16(body, u16::from_be_bytes)?,
        StreamEncoding::Utf32LE => transcode_utf32(body, u32::from_le_bytes)?,
        StreamEncoding::Utf32BE => transcode_utf32(body, u32::from_be_bytes)?,
    };

    Ok((encoding, normalize_line_endings(&text)))
}

/// Detect the byte encoding of `bytes`, consuming a BOM if one
/// is present.
///
/// Without a BOM, falls back to the pattern of the first four
/// octets: a UTF-8/ASCII document starts with a non-null byte,
/// while UTF-16/32 text encoding ASCII content places null
/// bytes at fixed positions depending on width and endianness.
fn sniff(bytes: &[u8]) -> (StreamEncoding, &[u8])
{
    if bytes.starts_with(&BOM_UTF32LE)
    {
        return (StreamEncoding::Utf32LE, &bytes[4..]);
    }
    if bytes.starts_with(&BOM_UTF32BE)
    {
        return (StreamEncoding::Utf32BE, &bytes[4..]);
    }
    if bytes.starts_with(&BOM_UTF8)
    {
        return (StreamEncoding::Utf8, &bytes[3..]);
    }
    if bytes.starts_with(&BOM_UTF16LE)
    {
        return (StreamEncoding::Utf16LE, &bytes[2..]);
    }
    if bytes.starts_with(&BOM_UTF16BE)
    {
        return (StreamEncoding::Utf16BE, &bytes[2..]);
    }

    if bytes.len() >= 4
    {
        let guess = match [bytes[0], bytes[1], bytes[2], bytes[3]]
        {
            [0, 0, 0, _] => Some(StreamEncoding::Utf32BE),
            [_, 0, 0, 0] => Some(StreamEncoding::Utf32LE),
            [0, _, 0, _] => Some(StreamEncoding::Utf16BE),
            [_, 0, _, 0] => Some(StreamEncoding::Utf16LE),
            _ => None,
        };

        if let Some(encoding) = guess
        {
            return (encoding, bytes);
        }
    }

    (StreamEncoding::Utf8, bytes)
}

fn transcode_utf16(bytes: &[u8], from_bytes: fn([u8; 2]) -> u16) -> ReaderResult<String>
{
    if bytes.len() % 2 != 0
    {
        return Err(ReaderError::InvalidEncoding(
            "incomplete UTF-16 code unit".to_owned(),
        ));
    }

    let mut units = bytes.chunks_exact(2).map(|c| from_bytes([c[0], c[1]]));
    let mut out = String::with_capacity(bytes.len() / 2);

    while let Some(unit) = units.next()
    {
        let scalar = match unit
        {
            0xD800..=0xDBFF =>
            {
                let low = units.next().ok_or_else(|| {
                    ReaderError::InvalidEncoding("unpaired high surrogate".to_owned())
                })?;

                if !(0xDC00..=0xDFFF).contains(&low)
                {
                    return Err(ReaderError::InvalidEncoding(
                        "expected a low surrogate".to_owned(),
                    ));
                }

                0x10000 + (((unit as u32 - 0xD800) << 10) | (low as u32 - 0xDC00))
            },
            0xDC00..=0xDFFF =>
            {
                return Err(ReaderError::InvalidEncoding(
                    "unpaired low surrogate".to_owned(),
                ))
            },
            _ => unit as u32,
        };

        let ch = char::from_u32(scalar).ok_or_else(|| {
            ReaderError::InvalidEncoding("invalid Unicode scalar value".to_owned())
        })?;

        out.push(ch);
    }

    Ok(out)
}

fn transcode_utf32(bytes: &[u8], from_bytes: fn([u8; 4]) -> u32) -> ReaderResult<String>
{
    if bytes.len() % 4 != 0
    {
        return Err(ReaderError::InvalidEncoding(
            "incomplete UTF-32 code unit".to_owned(),
        ));
    }

    let mut out = String::with_capacity(bytes.len() / 4);

    for chunk in bytes.chunks_exact(4)
    {
        let scalar = from_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        let ch = char::from_u32(scalar).ok_or_else(|| {
            ReaderError::InvalidEncoding("invalid Unicode scalar value".to_owned())
        })?;

        out.push(ch);
    }

    Ok(out)
}

fn normalize_line_endings(text: &str) -> String
{
    if !text.contains('\r')
    {
        return text.to_owned();
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next()
    {
        if c == '\r'
        {
            if chars.peek() == Some(&'\n')
            {
                chars.next();
            }

            out.push('\n');
        }
        else
        {
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn plain_utf8_roundtrips()
    {
        let (encoding, text) = decode(b"key: value").unwrap();

        assert_eq!(encoding, StreamEncoding::Utf8);
        assert_eq!(text, "key: value");
    }

    #[test]
    fn utf8_bom_is_consumed()
    {
        let mut bytes = BOM_UTF8.to_vec();
        bytes.extend_from_slice(b"a: 1");

        let (encoding, text) = decode(&bytes).unwrap();

        assert_eq!(encoding, StreamEncoding::Utf8);
        assert_eq!(text, "a: 1");
    }

    #[test]
    fn utf16le_bom_transcodes()
    {
        let mut bytes = BOM_UTF16LE.to_vec();

        for unit in "a: 1".encode_utf16()
        {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }

        let (encoding, text) = decode(&bytes).unwrap();

        assert_eq!(encoding, StreamEncoding::Utf16LE);
        assert_eq!(text, "a: 1");
    }

    #[test]
    fn utf32be_bom_transcodes()
    {
        let mut bytes = BOM_UTF32BE.to_vec();

        for ch in "a: 1".chars()
        {
            bytes.extend_from_slice(&(ch as u32).to_be_bytes());
        }

        let (encoding, text) = decode(&bytes).unwrap();

        assert_eq!(encoding, StreamEncoding::Utf32BE);
        assert_eq!(text, "a: 1");
    }

    #[test]
    fn crlf_and_bare_cr_collapse_to_lf()
    {
        let (_, text) = decode(b"a\r\nb\rc").unwrap();

        assert_eq!(text, "a\nb\nc");
    }

    #[test]
    fn unpaired_surrogate_is_invalid_encoding()
    {
        let mut bytes = BOM_UTF16LE.to_vec();
        bytes.extend_from_slice(&0xD800u16.to_le_bytes());
        bytes.extend_from_slice(&0x0041u16.to_le_bytes());

        let err = decode(&bytes).unwrap_err();

        assert!(matches!(err, ReaderError::InvalidEncoding(_)));
    }

    #[test]
    fn out_of_range_utf32_scalar_is_invalid_encoding()
    {
        let mut bytes = BOM_UTF32LE.to_vec();
        bytes.extend_from_slice(&0x0011_0000u32.to_le_bytes());

        let err = decode(&bytes).unwrap_err();

        assert!(matches!(err, ReaderError::InvalidEncoding(_)));
    }

    #[test]
    fn ascii_without_bom_is_detected_as_utf8()
    {
        let (encoding, _) = decode(b"a").unwrap();

        assert_eq!(encoding, StreamEncoding::Utf8);
    }
}
