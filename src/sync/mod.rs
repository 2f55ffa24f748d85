// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Render cycle orchestration.
//!
//! One cycle is: render the text (external, async), re-parse it, match entities onto the new
//! tree, bind clicks, re-apply the derived selection. A failed render keeps the previous cycle on
//! display as stale and touches nothing else.

use std::fmt;
use std::io;
use std::time::Duration;

use crate::binder::{Bindings, ClickOutcome};
use crate::format::mermaid::parse_sequence_lines;
use crate::matcher::{match_entities, EntityMapping};
use crate::model::{Entity, EntityRef, ParsedDiagram};
use crate::ops::{apply_op, EditError, LineDelta, SourceOp};
use crate::ui::{StatusLine, StatusMessage};
use crate::visual::svg::SvgError;
use crate::visual::{Markers, NodeId, VisualDocument};

pub mod command;
pub mod driver;

pub use command::CommandRenderer;
pub use driver::SyncCommand;

pub const DEFAULT_ELEMENT_ID: &str = "seqsync-diagram";
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum RenderError {
    /// The renderer rejected the markup.
    Markup { message: String },
    Spawn { program: String, source: io::Error },
    Io { program: String, source: io::Error },
    Exited { program: String, code: Option<i32>, stderr: String },
    InvalidUtf8 { program: String },
    Svg(SvgError),
    Timeout { after: Duration },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markup { message } => write!(f, "renderer rejected the diagram: {message}"),
            Self::Spawn { program, source } => write!(f, "cannot start renderer {program:?}: {source}"),
            Self::Io { program, source } => write!(f, "renderer {program:?} i/o failed: {source}"),
            Self::Exited { program, code, stderr } => {
                match code {
                    Some(code) => write!(f, "renderer {program:?} exited with status {code}")?,
                    None => write!(f, "renderer {program:?} was terminated by a signal")?,
                }
                if !stderr.is_empty() {
                    write!(f, ": {stderr}")?;
                }
                Ok(())
            }
            Self::InvalidUtf8 { program } => write!(f, "renderer {program:?} produced non-UTF-8 output"),
            Self::Svg(err) => write!(f, "{err}"),
            Self::Timeout { after } => write!(f, "render timed out after {after:?}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } | Self::Io { source, .. } => Some(source),
            Self::Svg(err) => Some(err),
            Self::Markup { .. }
            | Self::Exited { .. }
            | Self::InvalidUtf8 { .. }
            | Self::Timeout { .. } => None,
        }
    }
}

impl From<SvgError> for RenderError {
    fn from(err: SvgError) -> Self {
        Self::Svg(err)
    }
}

/// Turns markup into a visual tree. Implementations may suspend; they are awaited one at a time.
#[allow(async_fn_in_trait)]
pub trait Renderer {
    async fn render(&self, source: &str, element_id: &str) -> Result<VisualDocument, RenderError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    /// Identifier handed to the renderer for the output root.
    pub element_id: String,
    pub render_timeout: Duration,
    pub markers: Markers,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            element_id: DEFAULT_ELEMENT_ID.to_owned(),
            render_timeout: DEFAULT_RENDER_TIMEOUT,
            markers: Markers::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Rendering,
    Rendered,
    RenderFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    /// Nothing has ever rendered.
    Empty,
    /// The displayed cycle reflects the current text.
    Fresh,
    /// The last render failed; the displayed cycle is from an older text.
    Stale,
}

/// Everything one successful render produced. This is the "last good" state kept on failure.
#[derive(Debug, Clone)]
pub struct RenderCycle {
    source: String,
    diagram: ParsedDiagram,
    tree: VisualDocument,
    mapping: EntityMapping<NodeId>,
    bindings: Bindings<NodeId>,
}

impl RenderCycle {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn diagram(&self) -> &ParsedDiagram {
        &self.diagram
    }

    pub fn tree(&self) -> &VisualDocument {
        &self.tree
    }

    pub fn mapping(&self) -> &EntityMapping<NodeId> {
        &self.mapping
    }

    pub fn bindings(&self) -> &Bindings<NodeId> {
        &self.bindings
    }
}

pub struct SyncSession<R> {
    renderer: R,
    config: SyncConfig,
    source: String,
    state: SyncState,
    displayed: Option<RenderCycle>,
    display_state: DisplayState,
    selection: Option<EntityRef>,
    status: StatusLine,
}

impl<R: Renderer> SyncSession<R> {
    pub fn new(renderer: R, config: SyncConfig) -> Self {
        Self {
            renderer,
            config,
            source: String::new(),
            state: SyncState::Idle,
            displayed: None,
            display_state: DisplayState::Empty,
            selection: None,
            status: StatusLine::default(),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replaces the text without rendering.
    pub fn set_source(&mut self, text: impl Into<String>) {
        self.source = text.into();
    }

    /// A fresh parse of the current text, for building ops.
    pub fn parse(&self) -> ParsedDiagram {
        parse_sequence_lines(&self.source)
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn displayed(&self) -> Option<&RenderCycle> {
        self.displayed.as_ref()
    }

    pub fn display_state(&self) -> DisplayState {
        self.display_state
    }

    pub fn selection(&self) -> Option<EntityRef> {
        self.selection
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.current()
    }

    pub fn status_line(&self) -> &StatusLine {
        &self.status
    }

    pub fn report(&mut self, message: StatusMessage) {
        self.status.post(message);
    }

    /// Renders the current text and, on success, replaces the displayed cycle.
    pub async fn render(&mut self) -> SyncState {
        let markup = self.source.trim();
        if markup.is_empty() {
            self.status.post(StatusMessage::error("enter diagram markup before rendering"));
            return self.state;
        }

        self.state = SyncState::Rendering;
        log::debug!("rendering {} bytes into #{}", markup.len(), self.config.element_id);
        let rendered = tokio::time::timeout(
            self.config.render_timeout,
            self.renderer.render(markup, &self.config.element_id),
        )
        .await
        .unwrap_or(Err(RenderError::Timeout { after: self.config.render_timeout }));

        match rendered {
            Ok(tree) => {
                self.install_cycle(tree);
                self.state = SyncState::Rendered;
                self.status.post(StatusMessage::success("diagram rendered"));
            }
            Err(err) => {
                self.state = SyncState::RenderFailed;
                self.display_state = if self.displayed.is_some() {
                    DisplayState::Stale
                } else {
                    DisplayState::Empty
                };
                self.status.post(StatusMessage::error(format!("render failed: {err}")));
            }
        }
        self.state
    }

    fn install_cycle(&mut self, mut tree: VisualDocument) {
        let diagram = parse_sequence_lines(&self.source);
        let mapping = match_entities(&diagram, &tree, &self.config.markers);
        let bindings =
            Bindings::bind(&mapping).with_selected_class(self.config.markers.selected_class.clone());

        self.selection = self.selection.filter(|entity| diagram.entity(*entity).is_some());
        if let Some(entity) = self.selection {
            bindings.highlight(&mut tree, entity);
        }

        log::info!(
            "rendered {} participants and {} messages; {} bound",
            diagram.participants().len(),
            diagram.messages().len(),
            bindings.len(),
        );
        self.displayed =
            Some(RenderCycle { source: self.source.clone(), diagram, tree, mapping, bindings });
        self.display_state = DisplayState::Fresh;
    }

    /// Applies `op` to the text without rendering. Errors leave the text untouched.
    pub fn edit(&mut self, op: &SourceOp) -> Result<LineDelta, EditError> {
        match apply_op(&self.source, op) {
            Ok(result) => {
                self.source = result.text;
                // Edits that keep the target in place keep it selected.
                if !matches!(
                    op,
                    SourceOp::RenameParticipant { .. } | SourceOp::UpdateMessage { .. }
                ) {
                    self.selection = None;
                }
                Ok(result.delta)
            }
            Err(err) => {
                self.status.post(StatusMessage::error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Edit, then render.
    pub async fn apply(&mut self, op: &SourceOp) -> Result<LineDelta, EditError> {
        let delta = self.edit(op)?;
        if self.render().await == SyncState::Rendered {
            self.status.post(StatusMessage::success(op.describe()));
        }
        Ok(delta)
    }

    /// Routes a click on the displayed tree; a handled click becomes the derived selection.
    pub fn click<F>(&mut self, node: NodeId, on_activate: F) -> ClickOutcome
    where
        F: FnOnce(EntityRef, Entity<'_>),
    {
        let Some(RenderCycle { diagram, tree, bindings, .. }) = self.displayed.as_mut() else {
            return ClickOutcome::Unbound;
        };
        let outcome = bindings.click(tree, node, diagram, on_activate);
        if let ClickOutcome::Handled(entity) = outcome {
            self.selection = Some(entity);
        }
        outcome
    }

    /// Sets or clears the selection and updates the displayed highlight.
    pub fn select(&mut self, entity: Option<EntityRef>) -> bool {
        self.selection = entity;
        let Some(RenderCycle { tree, bindings, .. }) = self.displayed.as_mut() else {
            return false;
        };
        match entity {
            Some(entity) => bindings.highlight(tree, entity),
            None => {
                bindings.clear_highlight(tree);
                false
            }
        }
    }
}
