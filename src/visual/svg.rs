// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! SVG markup to [`VisualDocument`].

use std::fmt;

use roxmltree::{Document, Node};

use super::{VisualDocument, VisualElement};

#[derive(Debug)]
pub enum SvgError {
    Xml(roxmltree::Error),
    NotSvg { root: String },
}

impl fmt::Display for SvgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml(err) => write!(f, "invalid SVG markup: {err}"),
            Self::NotSvg { root } => write!(f, "expected an <svg> root element, found <{root}>"),
        }
    }
}

impl std::error::Error for SvgError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Xml(err) => Some(err),
            Self::NotSvg { .. } => None,
        }
    }
}

impl From<roxmltree::Error> for SvgError {
    fn from(err: roxmltree::Error) -> Self {
        Self::Xml(err)
    }
}

/// Parses renderer SVG output.
///
/// Every element becomes a node (namespace prefixes dropped), `class` splits into classes, and
/// an element's own non-blank text children become its text.
pub fn parse_svg(markup: &str) -> Result<VisualDocument, SvgError> {
    let document = Document::parse(markup)?;
    let root = document.root_element();
    if root.tag_name().name() != "svg" {
        return Err(SvgError::NotSvg { root: root.tag_name().name().to_owned() });
    }
    Ok(VisualDocument::from_element(element(root)))
}

fn element(node: Node<'_, '_>) -> VisualElement {
    let mut out = VisualElement::new(node.tag_name().name());
    for attribute in node.attributes() {
        if attribute.name() == "class" {
            out.classes = attribute.value().split_whitespace().map(ToOwned::to_owned).collect();
        } else {
            out.attributes.insert(attribute.name().to_owned(), attribute.value().to_owned());
        }
    }

    let own_text = node
        .children()
        .filter(Node::is_text)
        .filter_map(|child| child.text())
        .collect::<String>();
    if !own_text.trim().is_empty() {
        out.text = Some(own_text);
    }

    out.children = node.children().filter(Node::is_element).map(element).collect();
    out
}
