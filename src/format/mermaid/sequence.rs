// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::{Activation, ArrowToken, Message, ParsedDiagram, Participant};

/// Diagram-start marker.
pub const HEADER: &str = "sequenceDiagram";

/// Indentation used for lines the editor writes itself.
pub const DEFAULT_INDENT: &str = "    ";

const PARTICIPANT_KEYWORD: &str = "participant";

/// Entity recognized on a single source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEntity {
    Participant(Participant),
    Message(Message),
}

/// Splits source text into the line sequence every other component indexes into.
///
/// Empty text has no lines; otherwise `lines.join("\n")` restores the input exactly.
pub fn split_source_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

pub fn is_header_line(raw_line: &str) -> bool {
    raw_line.trim().starts_with(HEADER)
}

fn participant_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^participant\s+(\S+)(?:\s+as\s+(.+?))?\s*$").expect("valid participant regex")
    })
}

fn leading_whitespace(raw_line: &str) -> &str {
    let trimmed = raw_line.trim_start();
    &raw_line[..raw_line.len() - trimmed.len()]
}

fn is_token(candidate: &str) -> bool {
    !candidate.is_empty() && !candidate.chars().any(char::is_whitespace)
}

/// Earliest arrow in `haystack`, preferring the longest token when two start at the same byte.
fn find_arrow(haystack: &str) -> Option<(usize, ArrowToken)> {
    let mut best: Option<(usize, ArrowToken)> = None;
    for needle in ArrowToken::ALL {
        if let Some(idx) = haystack.find(needle.as_str()) {
            let take = match best {
                None => true,
                Some((best_idx, best_needle)) => {
                    idx < best_idx
                        || (idx == best_idx && needle.as_str().len() > best_needle.as_str().len())
                }
            };
            if take {
                best = Some((idx, needle));
            }
        }
    }
    best
}

fn trimmed_range(line: &str, range: Range<usize>) -> Range<usize> {
    let slice = &line[range.clone()];
    let start = range.start + (slice.len() - slice.trim_start().len());
    let end = range.end - (slice.len() - slice.trim_end().len());
    start..end.max(start)
}

fn is_activation_marker(c: char) -> bool {
    Activation::from_marker(c).is_some()
}

/// Byte ranges into a raw message line.
struct MessageParts {
    from: Range<usize>,
    arrow: ArrowToken,
    activation: Option<Activation>,
    to: Range<usize>,
    text: Range<usize>,
}

fn message_parts(raw_line: &str) -> Option<MessageParts> {
    let (arrow_at, arrow) = find_arrow(raw_line)?;
    let after_arrow = arrow_at + arrow.as_str().len();
    let colon = after_arrow + raw_line[after_arrow..].find(':')?;

    let from = trimmed_range(raw_line, 0..arrow_at);
    let mut to = trimmed_range(raw_line, after_arrow..colon);
    let activation = raw_line[to.clone()].chars().next().and_then(Activation::from_marker);
    if activation.is_some() {
        to.start += 1;
    }

    let from_id = &raw_line[from.clone()];
    let to_id = &raw_line[to.clone()];
    if !is_token(from_id) || !is_token(to_id) {
        return None;
    }
    if from_id.starts_with(is_activation_marker) || to_id.starts_with(is_activation_marker) {
        return None;
    }

    let text = trimmed_range(raw_line, colon + 1..raw_line.len());
    Some(MessageParts { from, arrow, activation, to, text })
}

/// Byte ranges of the sender and receiver ids on a message line.
///
/// The receiver range excludes an activation marker. Callers splice ids in place with these so
/// spacing, label text and line endings survive untouched.
pub fn message_endpoint_ranges(raw_line: &str) -> Option<(Range<usize>, Range<usize>)> {
    message_parts(raw_line).map(|parts| (parts.from, parts.to))
}

fn parse_participant(trimmed: &str, line_index: usize, indent: &str) -> Option<Participant> {
    let captures = participant_regex().captures(trimmed)?;
    let id = captures.get(1)?.as_str();
    let alias = captures.get(2).map(|alias| alias.as_str().to_owned());
    Some(Participant::new(id, alias, line_index, indent))
}

fn parse_message(raw_line: &str, line_index: usize, indent: &str) -> Option<Message> {
    let parts = message_parts(raw_line)?;
    let message = Message::new(
        &raw_line[parts.from],
        parts.arrow,
        &raw_line[parts.to],
        &raw_line[parts.text],
        line_index,
        indent,
    );
    Some(message.with_activation(parts.activation))
}

/// Recognizes the entity on one raw source line, if any.
///
/// Lines whose first word is `participant` are only ever declarations; everything else is
/// tried as a message. Anything unrecognized yields `None`.
pub fn parse_line(raw_line: &str, line_index: usize) -> Option<LineEntity> {
    let trimmed = raw_line.trim();
    if trimmed.is_empty() || trimmed.starts_with("%%") {
        return None;
    }
    let indent = leading_whitespace(raw_line);

    if trimmed.split_whitespace().next() == Some(PARTICIPANT_KEYWORD) {
        return parse_participant(trimmed, line_index, indent).map(LineEntity::Participant);
    }

    parse_message(raw_line, line_index, indent).map(LineEntity::Message)
}

/// Extracts participants and messages, with their origin lines, from sequence diagram markup.
///
/// Parsing is total: comments, directives, blocks, notes and malformed lines are skipped
/// rather than reported. Entities come back in source order.
pub fn parse_sequence_lines(input: &str) -> ParsedDiagram {
    let mut has_header = false;
    let mut participants = Vec::new();
    let mut messages = Vec::new();

    for (line_index, raw_line) in split_source_lines(input).into_iter().enumerate() {
        if !has_header && is_header_line(raw_line) {
            has_header = true;
            continue;
        }
        match parse_line(raw_line, line_index) {
            Some(LineEntity::Participant(participant)) => participants.push(participant),
            Some(LineEntity::Message(message)) => messages.push(message),
            None => {}
        }
    }

    ParsedDiagram::new(has_header, participants, messages)
}

/// Canonical participant declaration.
pub fn participant_line(indent: &str, id: &str, alias: Option<&str>) -> String {
    match alias {
        Some(alias) => format!("{indent}{PARTICIPANT_KEYWORD} {id} as {alias}"),
        None => format!("{indent}{PARTICIPANT_KEYWORD} {id}"),
    }
}

/// Canonical message line.
pub fn message_line(
    indent: &str,
    from: &str,
    arrow: ArrowToken,
    activation: Option<Activation>,
    to: &str,
    text: &str,
) -> String {
    let marker = activation.map_or("", Activation::as_str);
    if text.is_empty() {
        format!("{indent}{from}{arrow}{marker}{to}:")
    } else {
        format!("{indent}{from}{arrow}{marker}{to}: {text}")
    }
}
