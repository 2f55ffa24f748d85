// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! User-facing status channel.
//!
//! Every recoverable failure and every completed action ends up here as one transient message.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    severity: Severity,
    text: String,
}

impl StatusMessage {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self { severity, text: text.into() }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Severity::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(Severity::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Severity::Error, text)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity.as_str(), self.text)
    }
}

/// Latest status plus a revision counter, so observers can tell a repeated message from a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    rev: u64,
    current: Option<StatusMessage>,
}

impl StatusLine {
    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }

    pub fn post(&mut self, message: StatusMessage) {
        match message.severity() {
            Severity::Error => log::warn!("{}", message.text()),
            Severity::Info | Severity::Success => log::info!("{}", message.text()),
        }
        self.current = Some(message);
        self.rev = self.rev.wrapping_add(1);
    }

    pub fn clear(&mut self) {
        if self.current.take().is_some() {
            self.rev = self.rev.wrapping_add(1);
        }
    }
}
