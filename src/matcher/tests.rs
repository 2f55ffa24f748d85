// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use crate::format::mermaid::parse_sequence_lines;
use crate::model::{EntityRef, ParsedDiagram};
use crate::visual::{Markers, NodeId, VisualDocument, VisualElement};

use super::{
    actor_shape_parent, connector_parent, match_entities, message_line_marker, message_text,
};

const SOURCE: &str =
    "sequenceDiagram\n    participant A as Alice\n    participant B as Bob\n    A->>B: Hello\n    B-->>A: Hi";

#[fixture]
fn diagram() -> ParsedDiagram {
    parse_sequence_lines(SOURCE)
}

fn group(id: &str) -> VisualElement {
    VisualElement::new("g").with_attribute("id", id)
}

fn text(label: &str) -> VisualElement {
    VisualElement::new("text").with_text(label)
}

fn line() -> VisualElement {
    VisualElement::new("line")
}

fn svg(children: impl IntoIterator<Item = VisualElement>) -> VisualDocument {
    let root = children.into_iter().fold(VisualElement::new("svg"), VisualElement::with_child);
    VisualDocument::from_element(root)
}

fn node(doc: &VisualDocument, id: &str) -> NodeId {
    doc.find_by_id(id).expect("node with id")
}

#[rstest]
fn structural_markers_win_for_participants(diagram: ParsedDiagram) {
    let actor = |id: &str, label: &str| {
        group(id)
            .with_class("actor")
            .with_child(VisualElement::new("rect").with_class("actor"))
            .with_child(text(label))
    };
    let doc = svg([
        actor("alice", "Alice"),
        actor("bob", "Bob"),
        group("m1").with_child(line().with_class("messageLine0")).with_child(text("Hello")),
        group("m2").with_child(line().with_class("messageLine1")).with_child(text("Hi")),
    ]);

    let mapping = match_entities(&diagram, &doc, &Markers::default());

    assert_eq!(mapping.participant_strategy, Some("actor-group"));
    assert_eq!(mapping.participants, vec![Some(node(&doc, "alice")), Some(node(&doc, "bob"))]);
    assert_eq!(mapping.message_strategy, Some("message-text"));
    assert_eq!(mapping.messages, vec![Some(node(&doc, "m1")), Some(node(&doc, "m2"))]);
    assert_eq!(mapping.matched_count(), 4);
    assert_eq!(mapping.node(EntityRef::Message(1)), Some(node(&doc, "m2")));
}

#[rstest]
fn text_nodes_alone_produce_a_full_mapping(diagram: ParsedDiagram) {
    let doc = svg([
        group("bob").with_child(text(" Bob ")),
        group("alice").with_child(text("Alice")),
        group("hi").with_child(VisualElement::new("path")).with_child(text("Hi")),
        group("hello").with_child(line()).with_child(text("Hello")),
    ]);

    let mapping = match_entities(&diagram, &doc, &Markers::default());

    assert_eq!(mapping.participant_strategy, Some("actor-text"));
    assert_eq!(mapping.participants, vec![Some(node(&doc, "alice")), Some(node(&doc, "bob"))]);
    assert_eq!(mapping.message_strategy, Some("message-text"));
    assert_eq!(mapping.messages, vec![Some(node(&doc, "hello")), Some(node(&doc, "hi"))]);
}

#[test]
fn actor_text_matches_ids_too() {
    let diagram = parse_sequence_lines("sequenceDiagram\n    participant A as Alice");
    let doc = svg([group("a").with_child(text("A"))]);
    let mapping = match_entities(&diagram, &doc, &Markers::default());
    assert_eq!(mapping.participants, vec![Some(node(&doc, "a"))]);
}

#[rstest]
fn shape_parents_are_deduplicated(diagram: ParsedDiagram) {
    let shape = || VisualElement::new("rect").with_class("actor");
    let doc = svg([
        group("alice").with_child(shape()).with_child(shape()),
        group("bob").with_child(shape()),
    ]);

    let nodes = actor_shape_parent(&diagram, &doc, &Markers::default());
    assert_eq!(nodes, vec![Some(node(&doc, "alice")), Some(node(&doc, "bob"))]);
    assert_eq!(
        match_entities(&diagram, &doc, &Markers::default()).participant_strategy,
        Some("actor-shape-parent")
    );
}

#[test]
fn repeated_labels_are_consumed_in_document_order() {
    let diagram = parse_sequence_lines("sequenceDiagram\n    A->>B: ok\n    B->>A: ok\n    A->>B: ok");
    let doc = svg([
        group("first").with_child(line()).with_child(text("ok")),
        group("second").with_child(line()).with_child(text("ok")),
    ]);

    let nodes = message_text(&diagram, &doc, &Markers::default());
    assert_eq!(nodes, vec![Some(node(&doc, "first")), Some(node(&doc, "second")), None]);
}

#[test]
fn message_labels_equal_to_participant_labels_are_skipped() {
    let diagram = parse_sequence_lines(
        "sequenceDiagram\n    participant A as Alice\n    A->>A: Alice\n    A->>A: later",
    );
    let doc = svg([
        group("actor").with_child(text("Alice")),
        group("later").with_child(line()).with_child(text("later")),
    ]);

    let mapping = match_entities(&diagram, &doc, &Markers::default());
    assert_eq!(mapping.messages, vec![None, Some(node(&doc, "later"))]);
    assert_eq!(mapping.message_strategy, Some("message-text"));
}

#[test]
fn connector_search_is_bounded_then_falls_back_to_nearest_group() {
    let diagram = parse_sequence_lines("sequenceDiagram\n    A->>B: deep");
    let deep = group("outer").with_child(line()).with_child(
        group("g1").with_child(group("g2").with_child(group("g3").with_child(text("deep")))),
    );
    let doc = svg([deep]);

    let nodes = message_text(&diagram, &doc, &Markers::default());
    assert_eq!(nodes, vec![Some(node(&doc, "g3"))]);
}

#[test]
fn connector_search_reaches_the_third_ancestor() {
    let diagram = parse_sequence_lines("sequenceDiagram\n    A->>B: near");
    let near = group("outer")
        .with_child(line())
        .with_child(group("g1").with_child(group("g2").with_child(text("near"))));
    let doc = svg([near]);

    let nodes = message_text(&diagram, &doc, &Markers::default());
    assert_eq!(nodes, vec![Some(node(&doc, "outer"))]);
}

#[test]
fn grandparent_is_the_last_resort() {
    let diagram = parse_sequence_lines("sequenceDiagram\n    A->>B: bare");
    let markers = Markers { group: Vec::new(), ..Markers::default() };
    let doc = svg([VisualElement::new("a")
        .with_attribute("id", "grand")
        .with_child(VisualElement::new("b").with_child(text("bare")))]);

    let nodes = message_text(&diagram, &doc, &markers);
    assert_eq!(nodes, vec![Some(node(&doc, "grand"))]);
}

#[rstest]
fn message_line_markers_pair_positionally(diagram: ParsedDiagram) {
    let doc = svg([
        line().with_class("messageLine0").with_attribute("id", "l1"),
        line().with_class("messageLine1").with_attribute("id", "l2"),
    ]);

    let mapping = match_entities(&diagram, &doc, &Markers::default());
    assert_eq!(mapping.message_strategy, Some("message-line-marker"));
    assert_eq!(mapping.messages, vec![Some(node(&doc, "l1")), Some(node(&doc, "l2"))]);
    assert_eq!(message_line_marker(&diagram, &doc, &Markers::default()), mapping.messages);
}

#[rstest]
fn connector_parents_are_the_last_message_strategy(diagram: ParsedDiagram) {
    let doc = svg([
        group("m1").with_child(VisualElement::new("path")).with_child(line()),
        group("m2").with_child(VisualElement::new("path")),
    ]);

    let mapping = match_entities(&diagram, &doc, &Markers::default());
    assert_eq!(mapping.message_strategy, Some("connector-parent"));
    assert_eq!(mapping.messages, vec![Some(node(&doc, "m1")), Some(node(&doc, "m2"))]);
    assert_eq!(connector_parent(&diagram, &doc, &Markers::default()), mapping.messages);
}

#[rstest]
fn nothing_to_match_is_not_an_error(diagram: ParsedDiagram) {
    let doc = svg([VisualElement::new("rect")]);
    let mapping = match_entities(&diagram, &doc, &Markers::default());

    assert_eq!(mapping.participants, vec![None, None]);
    assert_eq!(mapping.messages, vec![None, None]);
    assert_eq!(mapping.participant_strategy, None);
    assert_eq!(mapping.message_strategy, None);
    assert_eq!(mapping.matched_count(), 0);
}

#[test]
fn surplus_participants_stay_unmatched() {
    let diagram =
        parse_sequence_lines("sequenceDiagram\n    participant A\n    participant B\n    participant C");
    let doc = svg([group("a").with_class("actor"), group("b").with_class("actor")]);

    let mapping = match_entities(&diagram, &doc, &Markers::default());
    assert_eq!(mapping.participants, vec![Some(node(&doc, "a")), Some(node(&doc, "b")), None]);
}
