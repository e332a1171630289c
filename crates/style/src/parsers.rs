//! Low-level nom parser functions for CSS-like values.
//!
//! This module provides composable parser functions for the handful of value
//! shapes the TOC deals with: numbers, lengths and custom-property names.

use crate::length::{Length, LengthUnit};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{map, map_res, opt, recognize, value},
    sequence::{delimited, pair, preceded},
};
use thiserror::Error;

/// Errors that can occur during style parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unresolved custom property: {0}")]
    UnresolvedVar(String),
}

// --- Helper Parsers ---

pub(crate) fn ws<'a, F, O>(inner: F) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

fn sign(input: &str) -> IResult<&str, Option<char>> {
    opt(alt((char('+'), char('-')))).parse(input)
}

pub(crate) fn parse_f32(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize((
            sign,
            alt((
                recognize((digit1, opt(pair(char('.'), digit1)))),
                recognize(pair(char('.'), digit1)),
            )),
        )),
        |s: &str| s.parse::<f32>(),
    )
    .parse(input)
}

fn parse_unit(input: &str) -> IResult<&str, LengthUnit> {
    alt((
        value(LengthUnit::Px, tag_no_case("px")),
        value(LengthUnit::Pt, tag_no_case("pt")),
        value(LengthUnit::Rem, tag_no_case("rem")),
        value(LengthUnit::Em, tag_no_case("em")),
        value(LengthUnit::In, tag_no_case("in")),
        value(LengthUnit::Cm, tag_no_case("cm")),
        value(LengthUnit::Mm, tag_no_case("mm")),
    ))
    .parse(input)
}

/// Parses a length with an optional unit (e.g. "80px", "4.5rem", "0").
pub fn parse_length(input: &str) -> IResult<&str, Length> {
    map(pair(parse_f32, opt(parse_unit)), |(value, unit)| Length {
        value,
        unit: unit.unwrap_or(LengthUnit::Px),
    })
    .parse(input)
}

/// Parses a custom property name such as `--header-height`.
pub fn parse_custom_property_name(input: &str) -> IResult<&str, &str> {
    recognize(preceded(
        tag("--"),
        take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_'),
    ))
    .parse(input)
}

fn int_prefix(input: &str) -> IResult<&str, i64> {
    map_res(
        preceded(
            take_while(char::is_whitespace),
            recognize(pair(sign, digit1)),
        ),
        |s: &str| s.parse::<i64>(),
    )
    .parse(input)
}

/// Reads the leading integer of `input` the way JavaScript's `parseInt(s, 10)`
/// does: leading whitespace and a sign are accepted, parsing stops at the first
/// non-digit, and `None` means no digits were found.
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    int_prefix(input).ok().map(|(_, n)| n)
}

/// Parses a complete length value, rejecting trailing garbage.
pub fn parse_length_value(input: &str) -> Result<Length, StyleParseError> {
    match ws(parse_length).parse(input) {
        Ok(("", length)) => Ok(length),
        Ok((rest, _)) => Err(StyleParseError::Parse(format!(
            "Unexpected trailing input '{}' in length '{}'",
            rest, input
        ))),
        Err(e) => Err(StyleParseError::Parse(format!(
            "Failed to parse length '{}': {}",
            input, e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_prefix_like_parse_int() {
        assert_eq!(parse_int_prefix("200px"), Some(200));
        assert_eq!(parse_int_prefix("  42"), Some(42));
        assert_eq!(parse_int_prefix("-15px"), Some(-15));
        assert_eq!(parse_int_prefix("+7"), Some(7));
        assert_eq!(parse_int_prefix("12.9px"), Some(12));
        assert_eq!(parse_int_prefix("px200"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("abc"), None);
    }

    #[test]
    fn test_parse_length_units() {
        assert_eq!(
            parse_length_value("80px").unwrap(),
            Length::new(80.0, LengthUnit::Px)
        );
        assert_eq!(
            parse_length_value(" 4.5rem ").unwrap(),
            Length::new(4.5, LengthUnit::Rem)
        );
        assert_eq!(
            parse_length_value("12").unwrap(),
            Length::new(12.0, LengthUnit::Px)
        );
        assert!(parse_length_value("12 px").is_err());
        assert!(parse_length_value("auto").is_err());
    }

    #[test]
    fn test_custom_property_name() {
        assert_eq!(
            parse_custom_property_name("--header-height)"),
            Ok((")", "--header-height"))
        );
        assert!(parse_custom_property_name("-header").is_err());
    }
}
