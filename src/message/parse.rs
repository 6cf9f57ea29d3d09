//! Nom-based protocol line parser.
//!
//! Splits a single inbound line into its four segments with one
//! left-to-right pass and no backtracking:
//!
//! ```text
//! [@tags] [:source] <command> [:parameters]
//! ```
//!
//! The command segment runs to the first `:` found after the optional
//! prefixes; everything after that colon is free-text parameters. The
//! colon scan is purely positional and does not understand parameter
//! grammar, so a colon inside a middle parameter starts the parameters
//! segment. Twitch traffic never relies on colons in middle parameters,
//! and keeping the scan positional keeps boundary behavior predictable.

use std::collections::HashMap;

use nom::{
    branch::alt,
    bytes::complete::take_until,
    character::complete::char,
    combinator::rest,
    sequence::{preceded, terminated},
    IResult,
};

use crate::error::MessageParseError;

use super::tags::split_tags;

/// The command segment, tokenized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandInfo<'a> {
    /// First whitespace-delimited token of the command segment.
    pub name: &'a str,
    /// Remaining tokens of the command segment (e.g. the target channel).
    pub rest: Option<&'a str>,
}

/// A parsed inbound line, borrowing from the input.
///
/// Created once per inbound line and dropped after dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct Message<'a> {
    /// Tag key/value pairs from the `@` prefix; empty when absent.
    /// Values are unescaped, keys are unique.
    pub tags: HashMap<&'a str, String>,
    /// Sender from the `:` prefix, if present.
    pub source: Option<&'a str>,
    /// The command segment.
    pub command: CommandInfo<'a>,
    /// Free-text payload after the parameter-introducing colon.
    pub parameters: Option<&'a str>,
}

/// Tags segment: from `@` to the first space, space consumed.
fn tags_segment(input: &str) -> IResult<&str, &str> {
    terminated(preceded(char('@'), take_until(" ")), char(' '))(input)
}

/// Source segment: from `:` to the next space, space consumed.
fn source_segment(input: &str) -> IResult<&str, &str> {
    terminated(preceded(char(':'), take_until(" ")), char(' '))(input)
}

/// Command segment up to the first `:` (or end of line), then the
/// parameters segment after that colon, if any.
fn command_and_params(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    let (rem, seg) = alt((terminated(take_until(":"), char(':')), rest))(input)?;
    // Lengths only differ when the colon was consumed; everything after
    // it is the parameters segment, even when empty.
    let had_colon = seg.len() + rem.len() < input.len();
    Ok(("", (seg, had_colon.then_some(rem))))
}

impl<'a> Message<'a> {
    /// Parse a single line (terminator optional) into a [`Message`].
    pub fn parse(line: &'a str) -> Result<Message<'a>, MessageParseError> {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        let (remaining, raw_tags) = if trimmed.starts_with('@') {
            match tags_segment(trimmed) {
                Ok((rem, seg)) => (rem, Some(seg)),
                Err(_) => return Err(MessageParseError::TruncatedSegment { segment: "tags" }),
            }
        } else {
            (trimmed, None)
        };

        let (remaining, source) = if remaining.starts_with(':') {
            match source_segment(remaining) {
                Ok((rem, seg)) => (rem, Some(seg)),
                Err(_) => return Err(MessageParseError::TruncatedSegment { segment: "source" }),
            }
        } else {
            (remaining, None)
        };

        let (_, (command_seg, parameters)) =
            command_and_params(remaining).map_err(|_| MessageParseError::MissingCommand)?;

        let name = command_seg
            .split_whitespace()
            .next()
            .ok_or(MessageParseError::MissingCommand)?;
        let after_name = &command_seg[command_seg.find(name).unwrap_or(0) + name.len()..];
        let rest_tokens = after_name.trim();
        let rest_tokens = (!rest_tokens.is_empty()).then_some(rest_tokens);

        Ok(Message {
            tags: raw_tags.map(split_tags).unwrap_or_default(),
            source,
            command: CommandInfo {
                name,
                rest: rest_tokens,
            },
            parameters,
        })
    }
}
