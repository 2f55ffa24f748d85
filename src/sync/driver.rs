// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Command loop in front of a [`SyncSession`].
//!
//! Commands that arrive while a render is in flight queue up in the channel. When the render
//! finishes, the loop drains everything queued, applies the edits in arrival order, and renders
//! once for the whole batch. Renders never overlap and never apply out of order.

use tokio::sync::mpsc;

use super::{Renderer, SyncSession, SyncState};
use crate::ops::{EditError, SourceOp};
use crate::ui::StatusMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncCommand {
    SetSource(String),
    Apply(SourceOp),
    Render,
}

/// What one drained batch did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub commands: usize,
    pub rejected: usize,
    pub rendered: bool,
}

/// Runs until every sender is dropped, then hands the session back.
pub async fn run<R: Renderer>(
    mut session: SyncSession<R>,
    mut commands: mpsc::Receiver<SyncCommand>,
) -> SyncSession<R> {
    while let Some(first) = commands.recv().await {
        let mut batch = vec![first];
        while let Ok(next) = commands.try_recv() {
            batch.push(next);
        }
        let report = run_batch(&mut session, batch).await;
        log::debug!("driver batch: {report:?}");
    }
    session
}

async fn run_batch<R: Renderer>(
    session: &mut SyncSession<R>,
    batch: Vec<SyncCommand>,
) -> BatchReport {
    let mut report = BatchReport { commands: batch.len(), ..BatchReport::default() };
    let mut dirty = false;
    let mut last_rejection: Option<EditError> = None;

    for command in batch {
        match command {
            SyncCommand::SetSource(text) => {
                session.set_source(text);
                dirty = true;
            }
            SyncCommand::Apply(op) => match session.edit(&op) {
                Ok(_) => dirty = true,
                Err(err) => {
                    report.rejected += 1;
                    last_rejection = Some(err);
                }
            },
            SyncCommand::Render => dirty = true,
        }
    }

    if dirty {
        let state = session.render().await;
        report.rendered = true;
        // A successful render must not hide an edit the batch dropped.
        if let (SyncState::Rendered, Some(err)) = (state, last_rejection) {
            session.report(StatusMessage::error(err.to_string()));
        }
    }
    report
}
