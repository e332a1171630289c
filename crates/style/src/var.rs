//! `var(--name, fallback)` references and their substitution.
use crate::parsers::{StyleParseError, parse_custom_property_name, ws};
use nom::{
    IResult, Parser,
    bytes::complete::tag,
    character::complete::char,
    combinator::{map, opt},
    error::{Error, ErrorKind},
    sequence::{delimited, pair, preceded},
};

/// Custom properties may reference each other; past this depth the chain is
/// treated as a cycle.
const MAX_SUBSTITUTION_DEPTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarReference {
    pub name: String,
    pub fallback: Option<String>,
}

impl VarReference {
    pub fn parse(input: &str) -> Result<Self, StyleParseError> {
        match ws(var_reference).parse(input) {
            Ok(("", reference)) => Ok(reference),
            Ok((rest, _)) => Err(StyleParseError::Parse(format!(
                "Unexpected trailing input '{}' after var()",
                rest
            ))),
            Err(e) => Err(StyleParseError::Parse(format!(
                "Failed to parse var() reference '{}': {}",
                input, e
            ))),
        }
    }
}

/// True when the value defers to a custom property and therefore can only be
/// resolved against live styles.
pub fn contains_var(value: &str) -> bool {
    value.contains("var(")
}

/// Takes everything up to the `)` that closes the enclosing function.
fn balanced(input: &str) -> IResult<&str, &str> {
    let mut depth = 0usize;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Ok((&input[i..], &input[..i])),
            ')' => depth -= 1,
            _ => {}
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::TakeUntil)))
}

fn var_reference(input: &str) -> IResult<&str, VarReference> {
    map(
        delimited(
            tag("var("),
            pair(
                ws(parse_custom_property_name),
                opt(preceded(char(','), balanced)),
            ),
            char(')'),
        ),
        |(name, fallback): (&str, Option<&str>)| VarReference {
            name: name.to_string(),
            fallback: fallback.map(|f| f.trim().to_string()),
        },
    )
    .parse(input)
}

/// Replaces every `var()` in `value` using `lookup` for custom property values.
///
/// Values returned by `lookup` are substituted recursively. A reference with no
/// value and no fallback makes the whole value invalid.
pub fn substitute_vars<F>(value: &str, lookup: F) -> Result<String, StyleParseError>
where
    F: Fn(&str) -> Option<String>,
{
    substitute(value, &lookup, 0)
}

fn substitute(
    value: &str,
    lookup: &dyn Fn(&str) -> Option<String>,
    depth: usize,
) -> Result<String, StyleParseError> {
    if depth > MAX_SUBSTITUTION_DEPTH {
        return Err(StyleParseError::Parse(format!(
            "Custom property cycle while resolving '{}'",
            value
        )));
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("var(") {
        out.push_str(&rest[..start]);
        let (remaining, reference) = var_reference(&rest[start..]).map_err(|e| {
            StyleParseError::Parse(format!("Malformed var() in '{}': {}", value, e))
        })?;

        let resolved = match (lookup(&reference.name), &reference.fallback) {
            (Some(v), _) => substitute(v.trim(), lookup, depth + 1)?,
            (None, Some(fallback)) => substitute(fallback, lookup, depth + 1)?,
            (None, None) => return Err(StyleParseError::UnresolvedVar(reference.name)),
        };
        out.push_str(&resolved);
        rest = remaining;
    }
    out.push_str(rest);
    Ok(out)
}
