// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// The closed set of directed message arrows the editor understands.
///
/// Variants are listed longest token first; [`ArrowToken::ALL`] keeps that order so callers that
/// scan for a token never settle for a shorter prefix of a longer arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ArrowToken {
    /// `-->>`: dashed line, filled head.
    #[serde(rename = "-->>")]
    DottedArrow,
    /// `->>`: solid line, filled head.
    #[serde(rename = "->>")]
    SolidArrow,
    /// `-->`: dashed line, open head.
    #[serde(rename = "-->")]
    Dotted,
    /// `->`: solid line, open head.
    #[serde(rename = "->")]
    Solid,
}

impl ArrowToken {
    pub const ALL: [ArrowToken; 4] =
        [ArrowToken::DottedArrow, ArrowToken::SolidArrow, ArrowToken::Dotted, ArrowToken::Solid];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DottedArrow => "-->>",
            Self::SolidArrow => "->>",
            Self::Dotted => "-->",
            Self::Solid => "->",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|arrow| arrow.as_str() == token)
    }

    pub fn is_dashed(self) -> bool {
        matches!(self, Self::DottedArrow | Self::Dotted)
    }

    pub fn has_filled_head(self) -> bool {
        matches!(self, Self::DottedArrow | Self::SolidArrow)
    }
}

/// Lifeline activation marker written in front of the receiver (`A->>+B`, `B-->>-A`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Activate,
    Deactivate,
}

impl Activation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activate => "+",
            Self::Deactivate => "-",
        }
    }

    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '+' => Some(Self::Activate),
            '-' => Some(Self::Deactivate),
            _ => None,
        }
    }
}

impl fmt::Display for ArrowToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownArrowToken {
    token: String,
}

impl UnknownArrowToken {
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Display for UnknownArrowToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown arrow token {:?} (expected one of ->>, -->>, ->, -->)", self.token)
    }
}

impl std::error::Error for UnknownArrowToken {}

impl FromStr for ArrowToken {
    type Err = UnknownArrowToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s.trim()).ok_or_else(|| UnknownArrowToken { token: s.to_owned() })
    }
}

/// A `participant <id> [as <name>]` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    id: String,
    alias: Option<String>,
    origin_line: usize,
    #[serde(skip)]
    indent: String,
}

impl Participant {
    pub fn new(
        id: impl Into<String>,
        alias: Option<String>,
        origin_line: usize,
        indent: impl Into<String>,
    ) -> Self {
        Self { id: id.into(), alias, origin_line, indent: indent.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The explicit `as <name>` clause, if the declaration had one.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The label a renderer draws for this participant.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.id)
    }

    pub fn origin_line(&self) -> usize {
        self.origin_line
    }

    pub fn indent(&self) -> &str {
        &self.indent
    }

    /// True when `label` is what a renderer could print for this participant.
    pub fn is_labelled(&self, label: &str) -> bool {
        label == self.display_name() || label == self.id
    }
}

/// A `<from><arrow><to>: <text>` message line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    from_id: String,
    to_id: String,
    arrow: ArrowToken,
    #[serde(skip_serializing_if = "Option::is_none")]
    activation: Option<Activation>,
    text: String,
    origin_line: usize,
    #[serde(skip)]
    indent: String,
}

impl Message {
    pub fn new(
        from_id: impl Into<String>,
        arrow: ArrowToken,
        to_id: impl Into<String>,
        text: impl Into<String>,
        origin_line: usize,
        indent: impl Into<String>,
    ) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            arrow,
            activation: None,
            text: text.into(),
            origin_line,
            indent: indent.into(),
        }
    }

    pub fn from_id(&self) -> &str {
        &self.from_id
    }

    pub fn to_id(&self) -> &str {
        &self.to_id
    }

    pub fn with_activation(mut self, activation: Option<Activation>) -> Self {
        self.activation = activation;
        self
    }

    pub fn arrow(&self) -> ArrowToken {
        self.arrow
    }

    /// Marker glued to the receiver; it is not part of `to_id`.
    pub fn activation(&self) -> Option<Activation> {
        self.activation
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn origin_line(&self) -> usize {
        self.origin_line
    }

    pub fn indent(&self) -> &str {
        &self.indent
    }

    pub fn references(&self, participant_id: &str) -> bool {
        self.from_id == participant_id || self.to_id == participant_id
    }
}

/// Positional handle for an entity: the only identity that survives a re-parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum EntityRef {
    Participant(usize),
    Message(usize),
}

impl EntityRef {
    pub fn index(self) -> usize {
        match self {
            Self::Participant(index) | Self::Message(index) => index,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Participant(index) => write!(f, "participant#{index}"),
            Self::Message(index) => write!(f, "message#{index}"),
        }
    }
}

/// Borrowed view of an entity, handed to edit callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity<'a> {
    Participant(&'a Participant),
    Message(&'a Message),
}

impl Entity<'_> {
    pub fn origin_line(&self) -> usize {
        match self {
            Self::Participant(participant) => participant.origin_line(),
            Self::Message(message) => message.origin_line(),
        }
    }
}
