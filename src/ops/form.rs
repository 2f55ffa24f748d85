// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Edit-form input as typed by a user, validated into ops before anything touches the text.

use std::fmt;

use super::{InsertPosition, ParseInsertPositionError, SourceOp};
use crate::model::{ArrowToken, Message, Participant, UnknownArrowToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingField { field: &'static str },
    InvalidArrow(UnknownArrowToken),
    InvalidPosition(ParseInsertPositionError),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "{field} is required"),
            Self::InvalidArrow(err) => write!(f, "{err}"),
            Self::InvalidPosition(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ValidationError {}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    match value.trim() {
        "" => Err(ValidationError::MissingField { field }),
        trimmed => Ok(trimmed),
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Participant dialog: id is required, the display name defaults to the id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantForm {
    pub id: String,
    pub display_name: String,
    pub position: String,
}

impl ParticipantForm {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self { id: id.into(), display_name: display_name.into(), position: String::new() }
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = position.into();
        self
    }

    fn position(&self) -> Result<InsertPosition, ValidationError> {
        match self.position.trim() {
            "" => Ok(InsertPosition::default()),
            raw => raw.parse().map_err(ValidationError::InvalidPosition),
        }
    }

    pub fn into_insert(self) -> Result<SourceOp, ValidationError> {
        let id = required("participant id", &self.id)?.to_owned();
        let position = self.position()?;
        Ok(SourceOp::InsertParticipant { id, display_name: optional(&self.display_name), position })
    }

    pub fn into_rename(self, target: Participant) -> Result<SourceOp, ValidationError> {
        let new_id = required("participant id", &self.id)?.to_owned();
        Ok(SourceOp::RenameParticipant {
            target,
            new_id,
            new_display_name: optional(&self.display_name),
        })
    }
}

/// Message dialog: sender, receiver and text are all required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageForm {
    pub from: String,
    pub to: String,
    pub arrow: String,
    pub text: String,
}

impl MessageForm {
    pub fn new(
        from: impl Into<String>,
        arrow: impl Into<String>,
        to: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self { from: from.into(), to: to.into(), arrow: arrow.into(), text: text.into() }
    }

    fn fields(&self) -> Result<(String, String, ArrowToken, String), ValidationError> {
        let from = required("sender", &self.from)?.to_owned();
        let to = required("receiver", &self.to)?.to_owned();
        let text = required("message text", &self.text)?.to_owned();
        let arrow = match self.arrow.trim() {
            "" => ArrowToken::SolidArrow,
            raw => raw.parse().map_err(ValidationError::InvalidArrow)?,
        };
        Ok((from, to, arrow, text))
    }

    pub fn into_insert(self) -> Result<SourceOp, ValidationError> {
        let (from, to, arrow, text) = self.fields()?;
        Ok(SourceOp::InsertMessage { from, to, arrow, text })
    }

    pub fn into_update(self, target: Message) -> Result<SourceOp, ValidationError> {
        let (from, to, arrow, text) = self.fields()?;
        Ok(SourceOp::UpdateMessage { target, from, to, arrow, text })
    }
}
