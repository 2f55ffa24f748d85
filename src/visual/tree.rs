// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Seqsync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Selector, VisualTree};

/// Serializable nested form of a visual tree, as exchanged with renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualElement {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<VisualElement>,
}

impl VisualElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), ..Self::default() }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: VisualElement) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeData {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    parent: Option<NodeId>,
    // Exclusive end of this node's subtree in `nodes`.
    end: usize,
}

/// Flattened visual tree.
///
/// Nodes are stored in pre-order, so `NodeId` order is document order and every subtree is a
/// contiguous range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualDocument {
    nodes: Vec<NodeData>,
}

impl VisualDocument {
    pub fn from_element(root: VisualElement) -> Self {
        let mut nodes = Vec::new();
        flatten(&mut nodes, root, None);
        Self { nodes }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<VisualElement>(json).map(Self::from_element)
    }

    pub fn to_element(&self) -> VisualElement {
        self.element_at(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        &self.nodes[node.0].classes
    }

    pub fn attribute(&self, node: NodeId, key: &str) -> Option<&str> {
        self.nodes[node.0].attributes.get(key).map(String::as_str)
    }

    /// First node whose `id` attribute equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.attributes.get("id").is_some_and(|value| value == id))
            .map(NodeId)
    }

    fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let end = self.nodes[node.0].end;
        let mut next = node.0 + 1;
        std::iter::from_fn(move || {
            if next >= end {
                return None;
            }
            let child = next;
            next = self.nodes[child].end;
            Some(NodeId(child))
        })
    }

    fn element_at(&self, index: usize) -> VisualElement {
        let data = &self.nodes[index];
        VisualElement {
            tag: data.tag.clone(),
            classes: data.classes.clone(),
            attributes: data.attributes.clone(),
            text: data.text.clone(),
            children: self.children(NodeId(index)).map(|child| self.element_at(child.0)).collect(),
        }
    }

    fn selected(&self, range: std::ops::Range<usize>, selectors: &[Selector]) -> Vec<NodeId> {
        range.map(NodeId).filter(|&node| self.matches(node, selectors)).collect()
    }
}

fn flatten(nodes: &mut Vec<NodeData>, element: VisualElement, parent: Option<NodeId>) {
    let index = nodes.len();
    nodes.push(NodeData {
        tag: element.tag,
        classes: element.classes,
        attributes: element.attributes,
        text: element.text,
        parent,
        end: index + 1,
    });
    for child in element.children {
        flatten(nodes, child, Some(NodeId(index)));
    }
    nodes[index].end = nodes.len();
}

impl VisualTree for VisualDocument {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn query(&self, selectors: &[Selector]) -> Vec<NodeId> {
        self.selected(0..self.nodes.len(), selectors)
    }

    fn query_descendants(&self, node: NodeId, selectors: &[Selector]) -> Vec<NodeId> {
        self.selected(node.0 + 1..self.nodes[node.0].end, selectors)
    }

    fn matches(&self, node: NodeId, selectors: &[Selector]) -> bool {
        let data = &self.nodes[node.0];
        selectors.iter().any(|selector| selector.matches(&data.tag, &data.classes))
    }

    fn text_content(&self, node: NodeId) -> String {
        self.nodes[node.0..self.nodes[node.0].end]
            .iter()
            .filter_map(|data| data.text.as_deref())
            .collect()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0].classes.iter().any(|c| c == class)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.nodes[node.0].classes.push(class.to_owned());
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node.0].classes.retain(|c| c != class);
    }
}
