// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MermaidIdentError {
    Empty,
    ContainsWhitespace,
    InvalidChar { ch: char },
    Reserved,
}

impl fmt::Display for MermaidIdentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("must not be empty"),
            Self::ContainsWhitespace => f.write_str("must not contain whitespace"),
            Self::InvalidChar { ch } => write!(f, "contains invalid character: '{ch}'"),
            Self::Reserved => f.write_str("is a reserved keyword"),
        }
    }
}

impl std::error::Error for MermaidIdentError {}

/// Characters that would make a message line ambiguous (arrows, label separator, comments).
const FORBIDDEN_CHARS: &[char] = &[':', ';', ',', '#', '%', '<', '>', '-', '+', '"'];

const RESERVED: &[&str] = &["participant", "actor", "as", "end", "sequenceDiagram"];

/// Validates a participant id for writing into source text.
///
/// Unicode letters are allowed (ids like `参加者` are common); anything that could be read as
/// part of an arrow or the `:` label separator is not.
pub fn validate_mermaid_ident(ident: &str) -> Result<(), MermaidIdentError> {
    if ident.is_empty() {
        return Err(MermaidIdentError::Empty);
    }
    if ident.chars().any(char::is_whitespace) {
        return Err(MermaidIdentError::ContainsWhitespace);
    }
    if let Some(ch) = ident.chars().find(|c| FORBIDDEN_CHARS.contains(c) || c.is_control()) {
        return Err(MermaidIdentError::InvalidChar { ch });
    }
    if RESERVED.contains(&ident) {
        return Err(MermaidIdentError::Reserved);
    }
    Ok(())
}

/// Free text (display names, message labels) must stay on one line.
pub fn is_single_line(text: &str) -> bool {
    !text.contains('\n') && !text.contains('\r')
}
