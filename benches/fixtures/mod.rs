// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Deterministic diagram sources and rendered trees for benches (no RNG).

use std::fmt::Write as _;

use seqsync::model::ParsedDiagram;
use seqsync::visual::{VisualDocument, VisualElement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    pub participants: usize,
    pub messages: usize,
    pub long_text: bool,
}

impl Params {
    pub const fn new(participants: usize, messages: usize, long_text: bool) -> Self {
        Self { participants, messages, long_text }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Small,
    Medium,
    LargeLongText,
}

impl Case {
    pub const ALL: [Case; 3] = [Case::Small, Case::Medium, Case::LargeLongText];

    pub const fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::LargeLongText => "large_long_text",
        }
    }

    pub const fn params(self) -> Params {
        match self {
            Self::Small => Params::new(6, 30, false),
            Self::Medium => Params::new(20, 200, false),
            Self::LargeLongText => Params::new(40, 800, true),
        }
    }
}

const ARROWS: [&str; 4] = ["->>", "-->>", "->", "-->"];

fn participant_id(idx: usize) -> String {
    format!("P{idx:03}")
}

fn message_text(idx: usize, long_text: bool) -> String {
    let mut text = format!("call {idx:05}");
    if long_text {
        while text.len() < 120 {
            text.push_str(" payload");
        }
    }
    text
}

/// Markup with every participant declared (half of them aliased), then the messages.
pub fn source(params: Params) -> String {
    assert!(params.participants >= 2, "participants must be >= 2");

    let mut out = String::from("sequenceDiagram\n");
    for idx in 0..params.participants {
        let id = participant_id(idx);
        if idx % 2 == 0 {
            let _ = writeln!(out, "    participant {id} as Service {idx}");
        } else {
            let _ = writeln!(out, "    participant {id}");
        }
    }
    for idx in 0..params.messages {
        let from = participant_id(idx % params.participants);
        let to = participant_id((idx + 1) % params.participants);
        let arrow = ARROWS[idx % ARROWS.len()];
        let _ = writeln!(out, "    {from}{arrow}{to}: {}", message_text(idx, params.long_text));
    }
    out
}

pub fn fixture(case: Case) -> String {
    source(case.params())
}

/// Tree shaped like Mermaid's sequence SVG: actor groups first, then flat message text and lines.
pub fn rendered_tree(diagram: &ParsedDiagram) -> VisualDocument {
    let mut root = VisualElement::new("svg").with_attribute("id", "seqsync-diagram");
    for participant in diagram.participants() {
        root = root.with_child(
            VisualElement::new("g").with_class("actor").with_child(
                VisualElement::new("rect").with_class("actor").with_child(
                    VisualElement::new("text")
                        .with_class("actor")
                        .with_text(participant.display_name()),
                ),
            ),
        );
    }
    for (idx, message) in diagram.messages().iter().enumerate() {
        let line_class = if message.arrow().is_dashed() { "messageLine1" } else { "messageLine0" };
        root = root.with_child(
            VisualElement::new("g")
                .with_attribute("id", format!("m{idx}"))
                .with_child(
                    VisualElement::new("text").with_class("messageText").with_text(message.text()),
                )
                .with_child(VisualElement::new("line").with_class(line_class)),
        );
    }
    VisualDocument::from_element(root)
}

pub fn checksum(diagram: &ParsedDiagram) -> u64 {
    let mut acc = 0u64;
    for participant in diagram.participants() {
        acc = acc.wrapping_mul(131).wrapping_add(participant.id().len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(participant.display_name().len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(participant.origin_line() as u64);
    }
    for message in diagram.messages() {
        acc = acc.wrapping_mul(131).wrapping_add(message.from_id().len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(message.to_id().len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(message.arrow() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(message.text().len() as u64);
    }
    acc
}

fn write_markup(out: &mut String, element: &VisualElement) {
    let _ = write!(out, "<{}", element.tag);
    if !element.classes.is_empty() {
        let _ = write!(out, " class=\"{}\"", element.classes.join(" "));
    }
    for (key, value) in &element.attributes {
        let _ = write!(out, " {key}=\"{}\"", html_escape::encode_double_quoted_attribute(value));
    }
    out.push('>');
    if let Some(text) = &element.text {
        out.push_str(&html_escape::encode_text(text));
    }
    for child in &element.children {
        write_markup(out, child);
    }
    let _ = write!(out, "</{}>", element.tag);
}

/// SVG markup for a tree, so benches can time the loader on realistic input.
pub fn svg_markup(tree: &VisualDocument) -> String {
    let mut out = String::new();
    write_markup(&mut out, &tree.to_element());
    out
}
