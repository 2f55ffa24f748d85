// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Maps parsed entities onto nodes of a rendered visual tree.
//!
//! Participants and messages each run an ordered cascade of strategies; a strategy runs only
//! when every earlier one matched nothing. Matching never fails: an entity without a node just
//! gets no interaction for the current cycle.

use crate::model::{EntityRef, ParsedDiagram};
use crate::visual::{Markers, VisualTree};

mod messages;
mod participants;

pub(crate) use messages::{connector_parent, message_line_marker, message_text};
pub(crate) use participants::{actor_group, actor_shape_parent, actor_text};

/// How far `message-text` walks up from a label looking for a connector-bearing group.
pub const MAX_CONNECTOR_ANCESTOR_STEPS: usize = 3;

/// One matching stage: one optional node per entity, in entity order.
pub(crate) type StrategyFn<T> =
    fn(&ParsedDiagram, &T, &Markers) -> Vec<Option<<T as VisualTree>::Node>>;

pub(crate) fn participant_strategies<T: VisualTree>() -> [(&'static str, StrategyFn<T>); 3] {
    [
        ("actor-group", actor_group::<T>),
        ("actor-shape-parent", actor_shape_parent::<T>),
        ("actor-text", actor_text::<T>),
    ]
}

pub(crate) fn message_strategies<T: VisualTree>() -> [(&'static str, StrategyFn<T>); 3] {
    [
        ("message-text", message_text::<T>),
        ("message-line-marker", message_line_marker::<T>),
        ("connector-parent", connector_parent::<T>),
    ]
}

/// Entity to node mapping for one render cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMapping<N> {
    pub participants: Vec<Option<N>>,
    pub messages: Vec<Option<N>>,
    /// Name of the participant strategy that produced the mapping, if any matched.
    pub participant_strategy: Option<&'static str>,
    pub message_strategy: Option<&'static str>,
}

impl<N: Copy> EntityMapping<N> {
    pub fn node(&self, entity: EntityRef) -> Option<N> {
        match entity {
            EntityRef::Participant(index) => self.participants.get(index).copied().flatten(),
            EntityRef::Message(index) => self.messages.get(index).copied().flatten(),
        }
    }

    /// Every matched entity with its node; participants first, then messages.
    pub fn matched(&self) -> impl Iterator<Item = (EntityRef, N)> + '_ {
        let participants = self
            .participants
            .iter()
            .enumerate()
            .filter_map(|(index, node)| node.map(|node| (EntityRef::Participant(index), node)));
        let messages = self
            .messages
            .iter()
            .enumerate()
            .filter_map(|(index, node)| node.map(|node| (EntityRef::Message(index), node)));
        participants.chain(messages)
    }

    pub fn matched_count(&self) -> usize {
        self.matched().count()
    }
}

pub fn match_entities<T: VisualTree>(
    diagram: &ParsedDiagram,
    tree: &T,
    markers: &Markers,
) -> EntityMapping<T::Node> {
    let (participants, participant_strategy) = cascade(
        diagram,
        tree,
        markers,
        diagram.participants().len(),
        &participant_strategies::<T>(),
    );
    let (messages, message_strategy) =
        cascade(diagram, tree, markers, diagram.messages().len(), &message_strategies::<T>());

    log::debug!(
        "matched participants via {}, messages via {}",
        participant_strategy.unwrap_or("none"),
        message_strategy.unwrap_or("none"),
    );

    EntityMapping { participants, messages, participant_strategy, message_strategy }
}

fn cascade<T: VisualTree>(
    diagram: &ParsedDiagram,
    tree: &T,
    markers: &Markers,
    count: usize,
    strategies: &[(&'static str, StrategyFn<T>)],
) -> (Vec<Option<T::Node>>, Option<&'static str>) {
    if count == 0 {
        return (Vec::new(), None);
    }
    for (name, strategy) in strategies {
        let nodes = strategy(diagram, tree, markers);
        if nodes.iter().any(Option::is_some) {
            return (nodes, Some(*name));
        }
    }
    (vec![None; count], None)
}

/// Pairs the i-th node with the i-th entity; surplus on either side stays unmatched.
fn pair_positionally<N: Copy>(nodes: &[N], count: usize) -> Vec<Option<N>> {
    (0..count).map(|index| nodes.get(index).copied()).collect()
}

/// Parents of `nodes`, deduplicated, in first-seen order.
fn unique_parents<T: VisualTree>(tree: &T, nodes: &[T::Node]) -> Vec<T::Node> {
    let mut parents: Vec<T::Node> = Vec::new();
    for parent in nodes.iter().filter_map(|&node| tree.parent(node)) {
        if !parents.contains(&parent) {
            parents.push(parent);
        }
    }
    parents
}

fn nearest_group<T: VisualTree>(tree: &T, node: T::Node, markers: &Markers) -> Option<T::Node> {
    tree.ancestors(node).into_iter().find(|&ancestor| tree.matches(ancestor, &markers.group))
}

#[cfg(test)]
mod tests;
