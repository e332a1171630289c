//! A small CSS selector engine.
//!
//! Supports what heading and container selectors use in practice: type
//! selectors, `*`, `.class`, `#id`, `[attr]`, `[attr="value"]`, the descendant
//! and child combinators, and comma-separated lists.

use crate::error::DomError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{is_not, tag, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{map, opt, value},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded},
};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrTest {
    Exists,
    Equals(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSelector {
    pub name: String,
    pub test: AttrTest,
}

/// One compound selector, e.g. `a.table-of-contents-item[href="#x"]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Compound {
    /// `None` for `*` or an omitted type selector.
    pub tag: Option<String>,
    pub ids: Vec<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrSelector>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

/// A complex selector stored right-to-left: the subject, then each ancestor
/// requirement together with the combinator linking it to the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complex {
    pub subject: Compound,
    pub ancestors: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Complex>,
    source: String,
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self, DomError> {
        match selector_list(input.trim()) {
            Ok(("", selectors)) => Ok(Self {
                selectors,
                source: input.to_string(),
            }),
            Ok((rest, _)) => Err(DomError::Selector(
                input.to_string(),
                format!("unexpected input '{}'", rest),
            )),
            Err(e) => Err(DomError::Selector(input.to_string(), e.to_string())),
        }
    }

    pub fn selectors(&self) -> &[Complex] {
        &self.selectors
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

// --- Parser ---

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn ident(input: &str) -> IResult<&str, &str> {
    take_while1(is_ident_char).parse(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), map(opt(is_not("\"")), |s| s.unwrap_or("")), char('"')),
        delimited(char('\''), map(opt(is_not("'")), |s| s.unwrap_or("")), char('\'')),
    ))
    .parse(input)
}

fn attr_selector(input: &str) -> IResult<&str, AttrSelector> {
    map(
        delimited(
            char('['),
            pair(
                delimited(multispace0, ident, multispace0),
                opt(preceded(
                    char('='),
                    delimited(multispace0, alt((quoted, ident)), multispace0),
                )),
            ),
            char(']'),
        ),
        |(name, val): (&str, Option<&str>)| AttrSelector {
            name: name.to_ascii_lowercase(),
            test: match val {
                Some(v) => AttrTest::Equals(v.to_string()),
                None => AttrTest::Exists,
            },
        },
    )
    .parse(input)
}

enum SimplePart {
    Id(String),
    Class(String),
    Attr(AttrSelector),
}

fn simple_part(input: &str) -> IResult<&str, SimplePart> {
    alt((
        map(preceded(char('#'), ident), |s: &str| SimplePart::Id(s.to_string())),
        map(preceded(char('.'), ident), |s: &str| {
            SimplePart::Class(s.to_string())
        }),
        map(attr_selector, SimplePart::Attr),
    ))
    .parse(input)
}

fn compound(input: &str) -> IResult<&str, Compound> {
    let (input, tag_name) = opt(alt((map(tag("*"), |_| None), map(ident, Some)))).parse(input)?;
    let (input, parts) = many0(simple_part).parse(input)?;

    if tag_name.is_none() && parts.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::TakeWhile1,
        )));
    }

    let mut out = Compound {
        tag: tag_name.flatten().map(|t| t.to_ascii_lowercase()),
        ..Compound::default()
    };
    for part in parts {
        match part {
            SimplePart::Id(id) => out.ids.push(id),
            SimplePart::Class(class) => out.classes.push(class),
            SimplePart::Attr(attr) => out.attrs.push(attr),
        }
    }
    Ok((input, out))
}

fn combinator(input: &str) -> IResult<&str, Combinator> {
    alt((
        value(
            Combinator::Child,
            delimited(multispace0, char('>'), multispace0),
        ),
        value(Combinator::Descendant, multispace1),
    ))
    .parse(input)
}

fn complex(input: &str) -> IResult<&str, Complex> {
    let (input, first) = compound(input)?;
    let (input, rest) = many0(pair(combinator, compound)).parse(input)?;

    // Re-link right-to-left: the last compound is the subject.
    let mut compounds = vec![first];
    let mut combinators = Vec::with_capacity(rest.len());
    for (comb, comp) in rest {
        combinators.push(comb);
        compounds.push(comp);
    }
    let subject = compounds.pop().unwrap_or_default();
    let ancestors = combinators
        .into_iter()
        .rev()
        .zip(compounds.into_iter().rev())
        .collect();

    Ok((input, Complex { subject, ancestors }))
}

fn selector_list(input: &str) -> IResult<&str, Vec<Complex>> {
    separated_list1(delimited(multispace0, char(','), multispace0), complex).parse(input)
}
