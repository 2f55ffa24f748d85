// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Click routing from visual nodes back to entities, plus the single selection highlight.

use std::collections::BTreeMap;

use crate::matcher::EntityMapping;
use crate::model::{Entity, EntityRef, ParsedDiagram};
use crate::visual::{Selector, VisualTree};

pub const DEFAULT_SELECTED_CLASS: &str = "seqsync-selected";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A bound node was hit; propagation stops there.
    Handled(EntityRef),
    Unbound,
}

/// Node to entity bindings for one render cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings<N> {
    by_node: BTreeMap<N, EntityRef>,
    selected_class: String,
}

impl<N: Copy + Ord> Bindings<N> {
    pub fn bind(mapping: &EntityMapping<N>) -> Self {
        let mut by_node = BTreeMap::new();
        for (entity, node) in mapping.matched() {
            if let Some(existing) = by_node.get(&node) {
                log::debug!("{entity} shares its node with {existing}; keeping {existing}");
                continue;
            }
            by_node.insert(node, entity);
        }
        Self { by_node, selected_class: DEFAULT_SELECTED_CLASS.to_owned() }
    }

    pub fn with_selected_class(mut self, class: impl Into<String>) -> Self {
        self.selected_class = class.into();
        self
    }

    pub fn selected_class(&self) -> &str {
        &self.selected_class
    }

    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }

    pub fn node_for(&self, entity: EntityRef) -> Option<N> {
        self.by_node.iter().find(|(_, bound)| **bound == entity).map(|(node, _)| *node)
    }

    /// The bound node at or above `node`, nearest first.
    pub fn resolve<T>(&self, tree: &T, node: N) -> Option<(N, EntityRef)>
    where
        T: VisualTree<Node = N>,
    {
        std::iter::once(node)
            .chain(tree.ancestors(node))
            .find_map(|candidate| self.by_node.get(&candidate).map(|entity| (candidate, *entity)))
    }

    /// Routes a click on `node`: selects the bound node and hands its entity to `on_activate`.
    pub fn click<T, F>(
        &self,
        tree: &mut T,
        node: N,
        diagram: &ParsedDiagram,
        on_activate: F,
    ) -> ClickOutcome
    where
        T: VisualTree<Node = N>,
        F: FnOnce(EntityRef, Entity<'_>),
    {
        let Some((bound_node, entity_ref)) = self.resolve(tree, node) else {
            return ClickOutcome::Unbound;
        };
        let Some(entity) = diagram.entity(entity_ref) else {
            log::warn!("{entity_ref} is bound but missing from the current diagram");
            return ClickOutcome::Unbound;
        };

        self.select(tree, bound_node);
        on_activate(entity_ref, entity);
        ClickOutcome::Handled(entity_ref)
    }

    /// Re-applies the highlight to whatever node `entity` is bound to in this cycle.
    ///
    /// Returns `false` (and leaves nothing highlighted) when the entity has no node.
    pub fn highlight<T>(&self, tree: &mut T, entity: EntityRef) -> bool
    where
        T: VisualTree<Node = N>,
    {
        match self.node_for(entity) {
            Some(node) => {
                self.select(tree, node);
                true
            }
            None => {
                self.clear_highlight(tree);
                false
            }
        }
    }

    pub fn clear_highlight<T>(&self, tree: &mut T)
    where
        T: VisualTree<Node = N>,
    {
        for node in tree.query(&[Selector::class(self.selected_class.as_str())]) {
            tree.remove_class(node, &self.selected_class);
        }
    }

    fn select<T>(&self, tree: &mut T, node: N)
    where
        T: VisualTree<Node = N>,
    {
        self.clear_highlight(tree);
        tree.add_class(node, &self.selected_class);
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{Bindings, ClickOutcome, DEFAULT_SELECTED_CLASS};
    use crate::format::mermaid::parse_sequence_lines;
    use crate::matcher::match_entities;
    use crate::model::{Entity, EntityRef, ParsedDiagram};
    use crate::visual::{Markers, NodeId, Selector, VisualDocument, VisualElement, VisualTree};

    struct Scene {
        diagram: ParsedDiagram,
        doc: VisualDocument,
        bindings: Bindings<NodeId>,
    }

    impl Scene {
        fn node(&self, id: &str) -> NodeId {
            self.doc.find_by_id(id).expect("node with id")
        }

        fn highlighted(&self) -> Vec<NodeId> {
            self.doc.query(&[Selector::class(DEFAULT_SELECTED_CLASS)])
        }
    }

    #[fixture]
    fn scene() -> Scene {
        let diagram = parse_sequence_lines(
            "sequenceDiagram\n    participant A as Alice\n    participant B as Bob\n    A->>B: Hello",
        );
        let group = |id: &str| VisualElement::new("g").with_attribute("id", id);
        let label = |id: &str, text: &str| {
            let span = VisualElement::new("tspan").with_attribute("id", format!("{id}-span"));
            VisualElement::new("text").with_attribute("id", id).with_child(span.with_text(text))
        };
        let doc = VisualDocument::from_element(
            VisualElement::new("svg")
                .with_attribute("id", "root")
                .with_child(group("alice").with_child(label("alice-text", "Alice")))
                .with_child(group("bob").with_child(label("bob-text", "Bob")))
                .with_child(
                    group("hello")
                        .with_child(VisualElement::new("line"))
                        .with_child(label("hello-text", "Hello")),
                ),
        );
        let mapping = match_entities(&diagram, &doc, &Markers::default());
        let bindings = Bindings::bind(&mapping);
        Scene { diagram, doc, bindings }
    }

    #[rstest]
    fn click_bubbles_to_the_nearest_bound_node(mut scene: Scene) {
        let target = scene.node("hello-text-span");
        let mut seen = None;

        let outcome =
            scene.bindings.click(&mut scene.doc, target, &scene.diagram, |entity_ref, entity| {
                if let Entity::Message(message) = entity {
                    seen = Some((entity_ref, message.text().to_owned()));
                }
            });

        assert_eq!(outcome, ClickOutcome::Handled(EntityRef::Message(0)));
        assert_eq!(seen, Some((EntityRef::Message(0), "Hello".to_owned())));
        assert_eq!(scene.highlighted(), vec![scene.node("hello")]);
    }

    #[rstest]
    fn selecting_again_moves_the_single_highlight(mut scene: Scene) {
        let alice = scene.node("alice-text");
        let bob = scene.node("bob");
        scene.bindings.click(&mut scene.doc, alice, &scene.diagram, |_, _| {});
        scene.bindings.click(&mut scene.doc, bob, &scene.diagram, |_, _| {});

        assert_eq!(scene.highlighted(), vec![scene.node("bob")]);
    }

    #[rstest]
    fn clicks_outside_bound_nodes_change_nothing(mut scene: Scene) {
        let root = scene.node("root");
        assert!(scene.bindings.highlight(&mut scene.doc, EntityRef::Participant(0)));

        let mut called = false;
        let outcome = scene.bindings.click(&mut scene.doc, root, &scene.diagram, |_, _| called = true);

        assert_eq!(outcome, ClickOutcome::Unbound);
        assert!(!called);
        assert_eq!(scene.highlighted(), vec![scene.node("alice")]);
    }

    #[rstest]
    fn highlight_of_an_unbound_entity_clears_the_selection(mut scene: Scene) {
        assert!(scene.bindings.highlight(&mut scene.doc, EntityRef::Participant(1)));
        assert!(!scene.bindings.highlight(&mut scene.doc, EntityRef::Message(7)));
        assert!(scene.highlighted().is_empty());
    }

    #[rstest]
    fn custom_selected_class_is_used(scene: Scene) {
        let Scene { diagram, mut doc, bindings } = scene;
        let bindings = bindings.with_selected_class("picked");
        let bob = doc.find_by_id("bob").expect("bob");

        bindings.click(&mut doc, bob, &diagram, |_, _| {});
        assert!(doc.has_class(bob, "picked"));
        assert!(!doc.has_class(bob, DEFAULT_SELECTED_CLASS));
    }

    #[rstest]
    fn every_matched_entity_is_bound_once(scene: Scene) {
        assert_eq!(scene.bindings.len(), 3);
        assert_eq!(scene.bindings.node_for(EntityRef::Participant(1)), Some(scene.node("bob")));
    }
}
