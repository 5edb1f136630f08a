//! BibTeX parser implementation using nom
//!
//! Handles:
//! - `@string` macros, expanded in later values (names are case-insensitive)
//! - `@preamble` and `@comment` blocks
//! - Braced values with nesting, quoted values, bare numbers, macro references
//! - `#` concatenation
//! - `{...}` and `(...)` entry delimiters
//! - `%` line comments and free text between entries
//!
//! Field keys are lower-cased. An entry whose type marker is empty (`@{key, ...}`)
//! is returned with `entry_type: None` so the caller can decide what to do with it.

use std::collections::HashMap;

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{map, opt},
    error::ErrorKind,
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
    IResult,
};

use super::entry::BibTeXEntry;

type Macros = HashMap<String, String>;

/// Parse error information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXParseError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// Result of parsing a BibTeX file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BibTeXParseResult {
    pub entries: Vec<BibTeXEntry>,
    pub preambles: Vec<String>,
    pub strings: HashMap<String, String>,
    pub errors: Vec<BibTeXParseError>,
}

impl BibTeXParseResult {
    /// Whether any block failed to parse
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Error type for parsing failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid syntax at line {line}: {message}")]
    InvalidSyntax { line: u32, message: String },
    #[error("No entry found")]
    NoEntry,
}

impl From<BibTeXParseError> for ParseError {
    fn from(err: BibTeXParseError) -> Self {
        ParseError::InvalidSyntax {
            line: err.line,
            message: err.message,
        }
    }
}

/// Parse a BibTeX string
///
/// Malformed blocks do not stop the parse; they are collected in
/// [`BibTeXParseResult::errors`] and parsing resumes at the next `@`.
pub fn parse(input: &str) -> BibTeXParseResult {
    let mut result = BibTeXParseResult::default();
    let mut offset = 0;

    while let Some(at) = next_block_start(input, offset) {
        match block(&input[at..], &result.strings) {
            Ok((rest, parsed)) => {
                match parsed {
                    Block::Entry(entry) => result.entries.push(entry),
                    Block::Macro(name, value) => {
                        result.strings.insert(name, value);
                    }
                    Block::Preamble(text) => result.preambles.push(text),
                    Block::Comment => {}
                }
                offset = input.len() - rest.len();
            }
            Err(_) if !opens_block(&input[at..]) => offset = at + 1,
            Err(_) => {
                let (line, column) = position(input, at);
                result.errors.push(BibTeXParseError {
                    line,
                    column,
                    message: format!("Failed to parse entry: {}", first_line(&input[at..])),
                });
                offset = at + 1;
            }
        }
    }

    result
}

/// Parse a single BibTeX entry
pub fn parse_entry(input: &str) -> Result<BibTeXEntry, ParseError> {
    let mut result = parse(input);
    if result.has_errors() {
        return Err(result.errors.swap_remove(0).into());
    }
    result.entries.into_iter().next().ok_or(ParseError::NoEntry)
}

/// A top-level `@` block
enum Block {
    Entry(BibTeXEntry),
    Macro(String, String),
    Preamble(String),
    Comment,
}

/// Byte offset of the next `@` at or after `from`, ignoring `%` comment lines
fn next_block_start(input: &str, from: usize) -> Option<usize> {
    let mut in_comment = false;
    for (i, c) in input[from..].char_indices() {
        match c {
            '%' => in_comment = true,
            '\n' => in_comment = false,
            '@' if !in_comment => return Some(from + i),
            _ => {}
        }
    }
    None
}

/// 1-based line and column of a byte offset
fn position(input: &str, offset: usize) -> (u32, u32) {
    let before = &input[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line as u32, column as u32)
}

fn first_line(input: &str) -> &str {
    input.lines().next().unwrap_or("").trim()
}

fn failure(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::Error::new(input, ErrorKind::Char))
}

/// Wrap a parser so it skips surrounding whitespace
fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_-:.+".contains(c)
}

fn is_cite_key_char(c: char) -> bool {
    !c.is_whitespace() && !",{}()=\"#%".contains(c)
}

/// Opening delimiter of a block and the matching closing one
fn open_delimiter(input: &str) -> IResult<&str, char> {
    let (rest, open) = ws(alt((char('{'), char('('))))(input)?;
    Ok((rest, if open == '(' { ')' } else { '}' }))
}

/// `@type` followed by the block body
fn block<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, Block> {
    let (rest, kind) = preceded(
        tuple((char('@'), multispace0)),
        take_while(|c: char| c.is_ascii_alphanumeric()),
    )(input)?;

    match kind.to_ascii_lowercase().as_str() {
        "comment" => {
            let (rest, _) = comment_body(rest)?;
            Ok((rest, Block::Comment))
        }
        "string" => {
            let (rest, (name, value)) = delimited_body(rest, |i| macro_definition(i, macros))?;
            Ok((rest, Block::Macro(name, value)))
        }
        "preamble" => {
            let (rest, text) = delimited_body(rest, |i| value(i, macros))?;
            Ok((rest, Block::Preamble(text)))
        }
        _ => {
            let (rest, (cite_key, fields)) =
                delimited_body(rest, |i| entry_contents(i, macros))?;
            let entry_type = (!kind.is_empty()).then(|| kind.to_string());
            let mut entry = BibTeXEntry::new(cite_key, entry_type);
            for (key, value) in fields {
                entry.add_field(key, value);
            }
            Ok((rest, Block::Entry(entry)))
        }
    }
}

/// Whether the text at `@` opens a block: an optional type word, then a delimiter
///
/// Anything else (an email address in a free-text line, say) is ordinary
/// comment text between entries.
fn opens_block(input: &str) -> bool {
    let after_at = input.strip_prefix('@').unwrap_or(input).trim_start();
    let after_kind = after_at.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    after_kind.trim_start().starts_with(|c: char| c == '{' || c == '(')
}

/// Run `inner` between `{...}` or `(...)`
fn delimited_body<'a, O, F>(input: &'a str, mut inner: F) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    let (rest, close) = open_delimiter(input)?;
    let (rest, output) = inner(rest)?;
    let (rest, _) = ws(char(close))(rest)?;
    Ok((rest, output))
}

/// `@comment` is either a braced group or the rest of the line
fn comment_body(input: &str) -> IResult<&str, ()> {
    let input = input.trim_start_matches(|c: char| c == ' ' || c == '\t');
    if input.starts_with('{') {
        let (rest, _) = braced(input)?;
        Ok((rest, ()))
    } else {
        let end = input.find('\n').unwrap_or(input.len());
        Ok((&input[end..], ()))
    }
}

/// `name = value` inside `@string`
fn macro_definition<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, (String, String)> {
    let (rest, (name, _, value)) =
        tuple((ws(take_while1(is_name_char)), char('='), |i| value(i, macros)))(input)?;
    Ok((rest, (name.to_lowercase(), value)))
}

/// Cite key, then a comma-separated field list
fn entry_contents<'a>(
    input: &'a str,
    macros: &Macros,
) -> IResult<&'a str, (String, Vec<(String, String)>)> {
    let (rest, cite_key) = ws(take_while1(is_cite_key_char))(input)?;
    let (mut rest, comma) = opt(char(','))(rest)?;

    let mut fields = Vec::new();
    if comma.is_some() {
        loop {
            match field(rest, macros) {
                Ok((after, pair)) => {
                    fields.push(pair);
                    let (after, comma) = ws(opt(char(',')))(after)?;
                    rest = after;
                    if comma.is_none() {
                        break;
                    }
                }
                Err(nom::Err::Error(_)) => break,
                Err(e) => return Err(e),
            }
        }
    }

    Ok((rest, (cite_key.to_string(), fields)))
}

/// A single `key = value` field; the key is lower-cased
fn field<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, (String, String)> {
    let (rest, (key, _, value)) =
        tuple((ws(take_while1(is_name_char)), char('='), |i| value(i, macros)))(input)?;
    Ok((rest, (key.to_lowercase(), value)))
}

/// One or more value parts joined by `#`
fn value<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, String> {
    map(
        separated_list1(char('#'), ws(|i| value_part(i, macros))),
        |parts| parts.concat(),
    )(input)
}

fn value_part<'a>(input: &'a str, macros: &Macros) -> IResult<&'a str, String> {
    alt((
        map(braced, |group: &str| group[1..group.len() - 1].to_string()),
        quoted,
        map(digit1, String::from),
        map(take_while1(is_name_char), |name: &str| {
            macros
                .get(&name.to_lowercase())
                .cloned()
                .unwrap_or_else(|| name.to_string())
        }),
    ))(input)
}

/// A `{...}` group with balanced nesting, outer braces included
fn braced(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return Err(failure(input));
    }

    let mut depth = 0usize;
    let mut escaped = false;
    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[i + 1..], &input[..=i]));
                }
            }
            _ => {}
        }
    }

    Err(failure(input))
}

/// A `"..."` value; quotes inside braces do not terminate it
fn quoted(input: &str) -> IResult<&str, String> {
    if !input.starts_with('"') {
        return Err(failure(input));
    }

    let mut result = String::new();
    let mut depth = 0usize;
    let mut chars = input.char_indices().skip(1);

    while let Some((i, c)) = chars.next() {
        match c {
            '"' if depth == 0 => return Ok((&input[i + 1..], result)),
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '\\' => {
                // Keep escape sequences verbatim
                result.push(c);
                if let Some((_, escaped)) = chars.next() {
                    result.push(escaped);
                }
                continue;
            }
            _ => {}
        }
        result.push(c);
    }

    Err(failure(input))
}
