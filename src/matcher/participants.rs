// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{nearest_group, pair_positionally, unique_parents};
use crate::model::ParsedDiagram;
use crate::visual::{Markers, VisualTree};

pub(crate) fn actor_group<T: VisualTree>(
    diagram: &ParsedDiagram,
    tree: &T,
    markers: &Markers,
) -> Vec<Option<T::Node>> {
    pair_positionally(&tree.query(&markers.actor_group), diagram.participants().len())
}

pub(crate) fn actor_shape_parent<T: VisualTree>(
    diagram: &ParsedDiagram,
    tree: &T,
    markers: &Markers,
) -> Vec<Option<T::Node>> {
    let shapes = tree.query(&markers.actor_shape);
    pair_positionally(&unique_parents(tree, &shapes), diagram.participants().len())
}

/// Text nodes reading exactly a participant's display name or id, lifted to their group.
///
/// Each participant takes the first hit in document order.
pub(crate) fn actor_text<T: VisualTree>(
    diagram: &ParsedDiagram,
    tree: &T,
    markers: &Markers,
) -> Vec<Option<T::Node>> {
    let participants = diagram.participants();
    let mut out = vec![None; participants.len()];

    for text_node in tree.query(&markers.text) {
        let content = tree.text_content(text_node);
        let label = content.trim();
        let hit = participants.iter().enumerate().position(|(index, participant)| {
            out[index].is_none() && participant.is_labelled(label)
        });
        let Some(index) = hit else {
            continue;
        };
        out[index] = Some(
            nearest_group(tree, text_node, markers)
                .or_else(|| tree.parent(text_node))
                .unwrap_or(text_node),
        );
    }

    out
}
