// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Source text mutations.
//!
//! Text is the only source of truth: every op reads the current text, writes the affected lines
//! and returns the full new text plus a line-level delta. Callers re-parse afterwards; entities
//! are never patched in place.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::format::mermaid::{
    is_header_line, is_single_line, message_endpoint_ranges, message_line, parse_line,
    participant_line, split_source_lines, validate_mermaid_ident, LineEntity, MermaidIdentError,
    DEFAULT_INDENT, HEADER,
};
use crate::model::{ArrowToken, Message, Participant};

pub mod form;

pub use form::{MessageForm, ParticipantForm, ValidationError};

/// Where a new participant declaration goes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InsertPosition {
    /// Directly after the `sequenceDiagram` line.
    First,
    /// Directly after the last participant declaration.
    #[default]
    Last,
    /// Directly before the declaration of the given id.
    Before(String),
    /// Directly after the declaration of the given id.
    After(String),
}

impl fmt::Display for InsertPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::Last => f.write_str("last"),
            Self::Before(id) => write!(f, "before-{id}"),
            Self::After(id) => write!(f, "after-{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseInsertPositionError {
    raw: String,
}

impl fmt::Display for ParseInsertPositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid insert position {:?} (expected first, last, before-<id> or after-<id>)",
            self.raw
        )
    }
}

impl std::error::Error for ParseInsertPositionError {}

impl FromStr for InsertPosition {
    type Err = ParseInsertPositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || ParseInsertPositionError { raw: s.to_owned() };
        match raw {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            _ => {
                if let Some(id) = raw.strip_prefix("before-") {
                    (!id.is_empty()).then(|| Self::Before(id.to_owned())).ok_or_else(invalid)
                } else if let Some(id) = raw.strip_prefix("after-") {
                    (!id.is_empty()).then(|| Self::After(id.to_owned())).ok_or_else(invalid)
                } else {
                    Err(invalid())
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOp {
    InsertParticipant {
        id: String,
        display_name: Option<String>,
        position: InsertPosition,
    },
    InsertMessage {
        from: String,
        to: String,
        arrow: ArrowToken,
        text: String,
    },
    RenameParticipant {
        target: Participant,
        new_id: String,
        new_display_name: Option<String>,
    },
    DeleteParticipant {
        target: Participant,
    },
    UpdateMessage {
        target: Message,
        from: String,
        to: String,
        arrow: ArrowToken,
        text: String,
    },
    DeleteMessage {
        target: Message,
    },
}

impl SourceOp {
    /// Short human-readable summary, used for status messages.
    pub fn describe(&self) -> String {
        match self {
            Self::InsertParticipant { id, display_name, .. } => {
                let name = display_name.as_deref().filter(|name| !name.is_empty()).unwrap_or(id);
                format!("added participant \"{name}\"")
            }
            Self::InsertMessage { text, .. } => format!("added message \"{text}\""),
            Self::RenameParticipant { target, new_id, .. } => {
                format!("updated participant \"{}\" -> \"{new_id}\"", target.id())
            }
            Self::DeleteParticipant { target } => {
                format!("deleted participant \"{}\"", target.display_name())
            }
            Self::UpdateMessage { text, .. } => format!("updated message \"{text}\""),
            Self::DeleteMessage { target } => format!("deleted message \"{}\"", target.text()),
        }
    }
}

/// Line-level description of what an op changed.
///
/// `removed` and `rewritten` index the text before the op, `inserted` indexes the text after it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineDelta {
    pub inserted: Vec<usize>,
    pub removed: Vec<usize>,
    pub rewritten: Vec<usize>,
}

impl LineDelta {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty() && self.rewritten.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    inserted: BTreeSet<usize>,
    removed: BTreeSet<usize>,
    rewritten: BTreeSet<usize>,
}

impl DeltaBuilder {
    fn record_inserted(&mut self, new_index: usize) {
        self.inserted.insert(new_index);
    }

    fn record_removed(&mut self, old_index: usize) {
        self.rewritten.remove(&old_index);
        self.removed.insert(old_index);
    }

    fn record_rewritten(&mut self, old_index: usize) {
        if self.removed.contains(&old_index) {
            return;
        }
        self.rewritten.insert(old_index);
    }

    fn finish(self) -> LineDelta {
        LineDelta {
            inserted: self.inserted.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            rewritten: self.rewritten.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditResult {
    pub text: String,
    pub delta: LineDelta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Participant,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    InvalidIdent { field: &'static str, value: String, reason: MermaidIdentError },
    MultiLineText { field: &'static str },
    StaleEntity { kind: EntityKind, origin_line: usize },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdent { field, value, reason } => {
                write!(f, "invalid {field} '{value}': {reason}")
            }
            Self::MultiLineText { field } => write!(f, "{field} must be a single line"),
            Self::StaleEntity { kind, origin_line } => write!(
                f,
                "source changed: line {} no longer holds the selected {kind:?}",
                origin_line + 1
            ),
        }
    }
}

impl std::error::Error for EditError {}

/// Applies one op to `text`.
///
/// On error the text is left as it was; nothing is partially applied.
pub fn apply_op(text: &str, op: &SourceOp) -> Result<EditResult, EditError> {
    let mut lines = split_source_lines(text).into_iter().map(ToOwned::to_owned).collect::<Vec<_>>();
    let mut delta = DeltaBuilder::default();

    match op {
        SourceOp::InsertParticipant { id, display_name, position } => {
            insert_participant(&mut lines, id, display_name.as_deref(), position, &mut delta)?
        }
        SourceOp::InsertMessage { from, to, arrow, text } => {
            insert_message(&mut lines, from, to, *arrow, text, &mut delta)?
        }
        SourceOp::RenameParticipant { target, new_id, new_display_name } => {
            rename_participant(&mut lines, target, new_id, new_display_name.as_deref(), &mut delta)?
        }
        SourceOp::DeleteParticipant { target } => {
            delete_participant(&mut lines, target, &mut delta)?
        }
        SourceOp::UpdateMessage { target, from, to, arrow, text } => {
            update_message(&mut lines, target, from, to, *arrow, text, &mut delta)?
        }
        SourceOp::DeleteMessage { target } => delete_message(&mut lines, target, &mut delta)?,
    }

    let delta = delta.finish();
    log::debug!("applied {op:?}: {delta:?}");
    Ok(EditResult { text: lines.join("\n"), delta })
}

// Line-level implementations of the ops above.
include!("ops_impl.rs");
