// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;

use super::{nearest_group, pair_positionally, unique_parents, MAX_CONNECTOR_ANCESTOR_STEPS};
use crate::model::ParsedDiagram;
use crate::visual::{Markers, VisualTree};

/// Text nodes reading exactly a message label, lifted to the group that draws the arrow.
///
/// Participant labels are skipped first. Repeated labels are consumed in order: the n-th text
/// node reading "ok" belongs to the n-th message labelled "ok".
pub(crate) fn message_text<T: VisualTree>(
    diagram: &ParsedDiagram,
    tree: &T,
    markers: &Markers,
) -> Vec<Option<T::Node>> {
    let participant_labels = diagram.participant_labels().collect::<HashSet<_>>();
    let messages = diagram.messages();
    let mut out = vec![None; messages.len()];

    for text_node in tree.query(&markers.text) {
        let content = tree.text_content(text_node);
        let label = content.trim();
        if participant_labels.contains(label) {
            continue;
        }
        let hit = messages
            .iter()
            .enumerate()
            .position(|(index, message)| out[index].is_none() && message.text() == label);
        if let Some(index) = hit {
            out[index] = Some(message_group(tree, text_node, markers));
        }
    }

    out
}

/// Connector-bearing ancestor within reach, else the nearest group, else the grandparent.
fn message_group<T: VisualTree>(tree: &T, text_node: T::Node, markers: &Markers) -> T::Node {
    let ancestors = tree.ancestors(text_node);
    ancestors
        .iter()
        .take(MAX_CONNECTOR_ANCESTOR_STEPS)
        .copied()
        .find(|&ancestor| !tree.query_descendants(ancestor, &markers.connector).is_empty())
        .or_else(|| nearest_group(tree, text_node, markers))
        .or_else(|| ancestors.get(1).copied())
        .unwrap_or(text_node)
}

pub(crate) fn message_line_marker<T: VisualTree>(
    diagram: &ParsedDiagram,
    tree: &T,
    markers: &Markers,
) -> Vec<Option<T::Node>> {
    pair_positionally(&tree.query(&markers.message_line), diagram.messages().len())
}

pub(crate) fn connector_parent<T: VisualTree>(
    diagram: &ParsedDiagram,
    tree: &T,
    markers: &Markers,
) -> Vec<Option<T::Node>> {
    let connectors = tree.query(&markers.connector);
    pair_positionally(&unique_parents(tree, &connectors), diagram.messages().len())
}
