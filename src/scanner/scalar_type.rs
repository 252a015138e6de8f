/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Plain scalar type inference against the core schema (§4.6).
//!
//! Quoted and block scalars are always strings; only plain scalars
//! without an explicit tag are run through this grammar.

use crate::token::ScalarStyle;

/// The core schema type a scalar's content resolves to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScalarType
{
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String,
}

/// Infer the type of an untagged scalar from its content and style.
///
/// Only `ScalarStyle::Plain` content is run through the core schema's
/// resolution grammar; every other style resolves to a string.
pub(crate) fn classify(style: ScalarStyle, content: &str) -> ScalarType
{
    match style
    {
        ScalarStyle::Plain => classify_plain(content),
        _ => ScalarType::String,
    }
}

fn classify_plain(s: &str) -> ScalarType
{
    match s
    {
        "" | "~" | "null" | "Null" | "NULL" => return ScalarType::Null,
        "true" | "True" | "TRUE" => return ScalarType::Bool(true),
        "false" | "False" | "FALSE" => return ScalarType::Bool(false),
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" =>
        {
            return ScalarType::Float(f64::INFINITY)
        },
        "-.inf" | "-.Inf" | "-.INF" => return ScalarType::Float(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return ScalarType::Float(f64::NAN),
        _ =>
        {},
    }

    if let Some(i) = classify_int(s)
    {
        return ScalarType::Int(i);
    }

    if is_float_literal(s)
    {
        if let Ok(f) = s.parse::<f64>()
        {
            return ScalarType::Float(f);
        }
    }

    ScalarType::String
}

/// Parses `s` against the core schema's `!!int` grammar:
///
/// ```text
/// [-+]? ( 0 | 0x [0-9a-fA-F]+ | 0o [0-7]+ | [1-9][0-9]* )
/// ```
///
/// Leading zeroes are only permitted to introduce a `0x`/`0o` base
/// prefix, or as the literal value zero.
fn classify_int(s: &str) -> Option<i64>
{
    let (negative, digits) = match s.strip_prefix('-')
    {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    if digits.is_empty()
    {
        return None;
    }

    let magnitude = if let Some(hex) = digits.strip_prefix("0x")
    {
        parse_radix(hex, 16, u8::is_ascii_hexdigit)?
    }
    else if let Some(oct) = digits.strip_prefix("0o")
    {
        parse_radix(oct, 8, |b| (b'0'..=b'7').contains(b))?
    }
    else if digits == "0"
    {
        0
    }
    else if digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    else
    {
        atoi::atoi::<i64>(digits.as_bytes())?
    };

    Some(if negative { -magnitude } else { magnitude })
}

fn parse_radix(digits: &str, radix: u32, valid: impl Fn(&u8) -> bool) -> Option<i64>
{
    if digits.is_empty() || !digits.bytes().all(|b| valid(&b))
    {
        return None;
    }

    i64::from_str_radix(digits, radix).ok()
}

/// Character-class pre-check for the core schema's `!!float` grammar:
///
/// ```text
/// [-+]? ( \. [0-9]+ | [0-9]+ (\. [0-9]*)? ) ( [eE] [-+]? [0-9]+ )?
/// ```
///
/// Run before handing the content to [`f64::from_str`], which alone
/// would also accept forms (bare `inf`, `nan`, no digits at all) that
/// the core schema doesn't.
fn is_float_literal(s: &str) -> bool
{
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.get(i), Some(b'+') | Some(b'-'))
    {
        i += 1;
    }

    let mut saw_digit = false;

    while matches!(bytes.get(i), Some(b) if b.is_ascii_digit())
    {
        i += 1;
        saw_digit = true;
    }

    if bytes.get(i) == Some(&b'.')
    {
        i += 1;

        while matches!(bytes.get(i), Some(b) if b.is_ascii_digit())
        {
            i += 1;
            saw_digit = true;
        }
    }

    if !saw_digit
    {
        return false;
    }

    if matches!(bytes.get(i), Some(b'e') | Some(b'E'))
    {
        i += 1;

        if matches!(bytes.get(i), Some(b'+') | Some(b'-'))
        {
            i += 1;
        }

        let exponent_start = i;

        while matches!(bytes.get(i), Some(b) if b.is_ascii_digit())
        {
            i += 1;
        }

        if i == exponent_start
        {
            return false;
        }
    }

    i == bytes.len()
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn nulls()
    {
        for s in ["", "~", "null", "Null", "NULL"]
        {
            assert_eq!(classify_plain(s), ScalarType::Null, "{}", s);
        }
    }

    #[test]
    fn bools()
    {
        assert_eq!(classify_plain("true"), ScalarType::Bool(true));
        assert_eq!(classify_plain("False"), ScalarType::Bool(false));
    }

    #[test]
    fn decimal_ints()
    {
        assert_eq!(classify_plain("0"), ScalarType::Int(0));
        assert_eq!(classify_plain("-42"), ScalarType::Int(-42));
        assert_eq!(classify_plain("+7"), ScalarType::Int(7));
    }

    #[test]
    fn leading_zero_decimal_is_string()
    {
        assert_eq!(classify_plain("007"), ScalarType::String);
    }

    #[test]
    fn hex_and_octal_ints()
    {
        assert_eq!(classify_plain("0x1A"), ScalarType::Int(26));
        assert_eq!(classify_plain("0o17"), ScalarType::Int(15));
        assert_eq!(classify_plain("-0x10"), ScalarType::Int(-16));
    }

    #[test]
    fn floats()
    {
        assert_eq!(classify_plain("3.14"), ScalarType::Float(3.14));
        assert_eq!(classify_plain("-0.5"), ScalarType::Float(-0.5));
        assert_eq!(classify_plain("6.02e23"), ScalarType::Float(6.02e23));
        assert_eq!(classify_plain(".5"), ScalarType::Float(0.5));
    }

    #[test]
    fn special_floats()
    {
        assert_eq!(classify_plain(".inf"), ScalarType::Float(f64::INFINITY));
        assert_eq!(classify_plain("-.inf"), ScalarType::Float(f64::NEG_INFINITY));
        assert!(matches!(classify_plain(".nan"), ScalarType::Float(f) if f.is_nan()));
    }

    #[test]
    fn strings_fall_through()
    {
        assert_eq!(classify_plain("hello world"), ScalarType::String);
        assert_eq!(classify_plain("1.2.3"), ScalarType::String);
        assert_eq!(classify_plain("1e"), ScalarType::String);
    }

    #[test]
    fn only_plain_style_is_resolved()
    {
        assert_eq!(classify(ScalarStyle::SingleQuote, "true"), ScalarType::String);
        assert_eq!(classify(ScalarStyle::Plain, "true"), ScalarType::Bool(true));
    }
}
