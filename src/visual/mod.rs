// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Renderer output as an opaque tree of visual nodes.
//!
//! The renderer's structure is not a stable contract, so everything downstream talks to the
//! [`VisualTree`] trait only: query by marker, query descendants, read text, walk to the
//! parent, and toggle a highlight class. [`VisualDocument`] is the in-crate implementation,
//! loadable from JSON ([`VisualElement`]) or SVG ([`svg::parse_svg`]).

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod svg;
pub mod tree;

pub use tree::{NodeId, VisualDocument, VisualElement};

/// Minimal node query: `tag`, `.class` or `tag.class`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Selector {
    tag: Option<String>,
    class: Option<String>,
}

impl Selector {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self { tag: Some(tag.into()), class: None }
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self { tag: None, class: Some(class.into()) }
    }

    pub fn tag_and_class(tag: impl Into<String>, class: impl Into<String>) -> Self {
        Self { tag: Some(tag.into()), class: Some(class.into()) }
    }

    pub fn matches(&self, tag: &str, classes: &[String]) -> bool {
        self.tag.as_deref().map_or(true, |wanted| wanted == tag)
            && self.class.as_deref().map_or(true, |wanted| classes.iter().any(|c| c == wanted))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSelectorError {
    raw: String,
}

impl fmt::Display for ParseSelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid selector {:?} (expected tag, .class or tag.class)", self.raw)
    }
}

impl std::error::Error for ParseSelectorError {}

impl FromStr for Selector {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || ParseSelectorError { raw: s.to_owned() };
        let valid_part = |part: &str| {
            !part.is_empty() && part.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        };

        let (tag, class) = match raw.split_once('.') {
            Some((tag, class)) => ((!tag.is_empty()).then_some(tag), Some(class)),
            None => (Some(raw), None),
        };
        if tag.is_some_and(|tag| !valid_part(tag)) || class.is_some_and(|class| !valid_part(class))
        {
            return Err(invalid());
        }
        if tag.is_none() && class.is_none() {
            return Err(invalid());
        }

        Ok(Self { tag: tag.map(ToOwned::to_owned), class: class.map(ToOwned::to_owned) })
    }
}

impl TryFrom<String> for Selector {
    type Error = ParseSelectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.to_string()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            f.write_str(tag)?;
        }
        if let Some(class) = &self.class {
            write!(f, ".{class}")?;
        }
        Ok(())
    }
}

/// Well-known structural markers in renderer output.
///
/// The defaults describe Mermaid's SVG for sequence diagrams; a different renderer (or Mermaid
/// version) can be accommodated by loading another set from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Nodes that wrap one participant box.
    pub actor_group: Vec<Selector>,
    /// The participant box shape, whose parent wraps the participant.
    pub actor_shape: Vec<Selector>,
    /// Message connector lines.
    pub message_line: Vec<Selector>,
    /// Line-like drawing primitives.
    pub connector: Vec<Selector>,
    /// Grouping nodes.
    pub group: Vec<Selector>,
    /// Nodes whose text content is a rendered label.
    pub text: Vec<Selector>,
    /// Class toggled on the selected node.
    pub selected_class: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            actor_group: vec![Selector::tag_and_class("g", "actor")],
            actor_shape: vec![Selector::tag_and_class("rect", "actor")],
            message_line: vec![Selector::class("messageLine0"), Selector::class("messageLine1")],
            connector: vec![Selector::tag("line"), Selector::tag("path")],
            group: vec![Selector::tag("g")],
            text: vec![Selector::tag("text")],
            selected_class: "seqsync-selected".to_owned(),
        }
    }
}

impl Markers {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Read access to a renderer's node tree plus a single mutable highlight class.
///
/// Every query returns nodes in document order.
pub trait VisualTree {
    type Node: Copy + Eq + Ord + Hash + fmt::Debug;

    fn root(&self) -> Self::Node;

    /// All nodes matching any of `selectors`.
    fn query(&self, selectors: &[Selector]) -> Vec<Self::Node>;

    /// Strict descendants of `node` matching any of `selectors`.
    fn query_descendants(&self, node: Self::Node, selectors: &[Selector]) -> Vec<Self::Node>;

    fn matches(&self, node: Self::Node, selectors: &[Selector]) -> bool;

    /// Concatenated text of `node` and its descendants.
    fn text_content(&self, node: Self::Node) -> String;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    fn has_class(&self, node: Self::Node, class: &str) -> bool;

    fn add_class(&mut self, node: Self::Node, class: &str);

    fn remove_class(&mut self, node: Self::Node, class: &str);

    /// Ancestors of `node`, nearest first.
    fn ancestors(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut current = self.parent(node);
        while let Some(ancestor) = current {
            out.push(ancestor);
            current = self.parent(ancestor);
        }
        out
    }
}
