// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use super::ids::NodeId;

/// Flow direction of a flowchart, from the diagram header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowDirection {
    #[default]
    TopDown,
    LeftRight,
}

impl fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopDown => f.write_str("TD"),
            Self::LeftRight => f.write_str("LR"),
        }
    }
}

/// Node shape as declared by the wrapper delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeShape {
    #[default]
    Rect,
    Diamond,
    Round,
}

/// Parsed flowchart.
///
/// Nodes keep their source declaration order (layout tie-breaking and label
/// lookups are deterministic because of it); `index` maps a node id to its
/// position. Re-declaring an id updates the existing node in place; the
/// last declaration wins, matching how lenient flowchart renderers treat
/// duplicate ids.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlowchartAst {
    direction: FlowDirection,
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
    index: BTreeMap<NodeId, usize>,
}

impl FlowchartAst {
    pub fn new(direction: FlowDirection) -> Self {
        Self {
            direction,
            nodes: Vec::new(),
            edges: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    pub fn direction(&self) -> FlowDirection {
        self.direction
    }

    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&FlowNode> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn node_position(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Inserts or updates a node declaration. The last declaration wins.
    pub fn declare_node(&mut self, node: FlowNode) {
        match self.index.get(node.id()) {
            Some(&idx) => {
                self.nodes[idx] = node;
            }
            None => {
                self.index.insert(node.id().clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    /// Makes sure an edge endpoint exists, creating an implicit rectangle
    /// labeled with its own id when it does not (dangling references render
    /// as plain nodes rather than failing).
    pub fn ensure_node(&mut self, id: &NodeId) {
        if self.index.contains_key(id) {
            return;
        }
        let implicit = FlowNode::new_with(id.clone(), id.as_str(), NodeShape::Rect);
        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(implicit);
    }

    pub fn push_edge(&mut self, edge: FlowEdge) {
        self.ensure_node(&edge.from);
        self.ensure_node(&edge.to);
        self.edges.push(edge);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowNode {
    id: NodeId,
    label: String,
    shape: NodeShape,
}

impl FlowNode {
    pub fn new_with(id: NodeId, label: impl Into<String>, shape: NodeShape) -> Self {
        Self {
            id,
            label: label.into(),
            shape,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn shape(&self) -> NodeShape {
        self.shape
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_shape(&mut self, shape: NodeShape) {
        self.shape = shape;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowEdge {
    from: NodeId,
    to: NodeId,
    label: Option<String>,
}

impl FlowEdge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self {
            from,
            to,
            label: None,
        }
    }

    pub fn new_with(from: NodeId, to: NodeId, label: Option<String>) -> Self {
        Self { from, to, label }
    }

    pub fn from_node_id(&self) -> &NodeId {
        &self.from
    }

    pub fn to_node_id(&self) -> &NodeId {
        &self.to
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label<T: Into<String>>(&mut self, label: Option<T>) {
        self.label = label.map(Into::into);
    }
}
