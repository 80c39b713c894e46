// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use crate::layout::FlowchartLayout;
use crate::model::flow_ast::{FlowchartAst, NodeShape};
use crate::model::ids::NodeId;

use super::{
    canvas_to_string_trimmed, text_len, truncate_with_ellipsis, Canvas, CanvasError, LabelIndex,
    LabelSpan, UNICODE_BOX_BOTTOM_LEFT, UNICODE_BOX_BOTTOM_RIGHT, UNICODE_BOX_TOP_LEFT,
    UNICODE_BOX_TOP_RIGHT,
};

const BOX_HEIGHT: usize = 3;
const ROW_GAP: usize = 3;
const COL_GAP: usize = 3;
const CHANNEL_GAP: usize = 3;
const MAX_NODE_LABEL_WIDTH: usize = 40;
pub(super) const MAX_EDGE_LABEL_WIDTH: usize = 24;
const ARROW_DOWN: char = '▼';
const LOOP_MARK: char = '↺';

/// Rendered text plus the per-node label cells used for click handling.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextDiagram {
    pub text: String,
    pub labels: LabelIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct NodeRender {
    pub(super) box_x0: usize,
    pub(super) box_x1: usize,
    pub(super) box_y0: usize,
    pub(super) box_y1: usize,
    pub(super) shape: NodeShape,
}

impl NodeRender {
    pub(super) fn center_x(self) -> usize {
        (self.box_x0 + self.box_x1) / 2
    }

    pub(super) fn mid_y(self) -> usize {
        self.box_y0 + 1
    }

    fn width(self) -> usize {
        self.box_x1 - self.box_x0 + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum EdgeRoute {
    /// `from == to`; drawn as a loop marker beside the box.
    SelfLoop,
    /// Target sits exactly one layer below; drawn through the gap band.
    Direct,
    /// Everything else (long, same-layer, backward); routed through a
    /// dedicated column right of the content.
    Channel { slot: usize },
}

#[derive(Debug, Clone)]
pub(super) struct FlowchartRenderPlan {
    pub(super) node_renders: BTreeMap<NodeId, NodeRender>,
    pub(super) display_labels: BTreeMap<NodeId, String>,
    pub(super) edge_routes: Vec<EdgeRoute>,
    pub(super) content_width: usize,
    pub(super) width: usize,
    pub(super) height: usize,
}

impl FlowchartRenderPlan {
    pub(super) fn build(
        ast: &FlowchartAst,
        layout: &FlowchartLayout,
    ) -> Result<Self, FlowchartRenderError> {
        let mut display_labels = BTreeMap::<NodeId, String>::new();
        let mut box_widths = BTreeMap::<NodeId, usize>::new();
        for node in ast.nodes() {
            let display = truncate_with_ellipsis(node.label(), MAX_NODE_LABEL_WIDTH);
            let label_len = text_len(&display);
            let width = match node.shape() {
                NodeShape::Diamond => (label_len + 2).max(4),
                NodeShape::Rect | NodeShape::Round => label_len + 4,
            };
            box_widths.insert(node.id().clone(), width);
            display_labels.insert(node.id().clone(), display);
        }

        let last_layer = layout.layers().len().saturating_sub(1);
        let mut edge_routes = Vec::<EdgeRoute>::with_capacity(ast.edges().len());
        let mut channel_count = 0usize;
        let mut channel_targets_first_layer = false;
        let mut channel_exits_last_layer = false;
        for edge in ast.edges() {
            let from = layout.placement(edge.from_node_id()).ok_or_else(|| {
                FlowchartRenderError::MissingPlacement { node_id: edge.from_node_id().clone() }
            })?;
            let to = layout.placement(edge.to_node_id()).ok_or_else(|| {
                FlowchartRenderError::MissingPlacement { node_id: edge.to_node_id().clone() }
            })?;

            let route = if edge.from_node_id() == edge.to_node_id() {
                EdgeRoute::SelfLoop
            } else if to.layer() == from.layer() + 1 {
                EdgeRoute::Direct
            } else {
                let slot = channel_count;
                channel_count += 1;
                if to.layer() == 0 {
                    channel_targets_first_layer = true;
                }
                if from.layer() == last_layer {
                    channel_exits_last_layer = true;
                }
                EdgeRoute::Channel { slot }
            };
            edge_routes.push(route);
        }

        // Channel entries into the first layer approach from above.
        let margin_top = if channel_targets_first_layer { 2 } else { 0 };

        let mut row_widths = Vec::<usize>::with_capacity(layout.layers().len());
        for layer in layout.layers() {
            let mut width = 0usize;
            for (idx, node_id) in layer.iter().enumerate() {
                if idx > 0 {
                    width += COL_GAP;
                }
                width += box_widths.get(node_id).copied().unwrap_or(4);
            }
            row_widths.push(width);
        }
        let content_width = row_widths.iter().copied().max().unwrap_or(0).max(1);

        let mut node_renders = BTreeMap::<NodeId, NodeRender>::new();
        for (layer_idx, layer) in layout.layers().iter().enumerate() {
            let box_y0 = margin_top + layer_idx * (BOX_HEIGHT + ROW_GAP);
            let row_width = row_widths.get(layer_idx).copied().unwrap_or(0);
            let mut x = (content_width.saturating_sub(row_width)) / 2;
            for node_id in layer {
                let width = box_widths.get(node_id).copied().unwrap_or(4);
                let shape = ast.node(node_id).map(|node| node.shape()).unwrap_or_default();
                node_renders.insert(
                    node_id.clone(),
                    NodeRender {
                        box_x0: x,
                        box_x1: x + width - 1,
                        box_y0,
                        box_y1: box_y0 + BOX_HEIGHT - 1,
                        shape,
                    },
                );
                x += width + COL_GAP;
            }
        }

        // Widen the canvas for channels, loop markers, and label overhang.
        let mut width = content_width;
        for (edge, route) in ast.edges().iter().zip(&edge_routes) {
            let label_len = edge
                .label()
                .filter(|label| !label.is_empty())
                .map(|label| text_len(&truncate_with_ellipsis(label, MAX_EDGE_LABEL_WIDTH)))
                .unwrap_or(0);

            match route {
                EdgeRoute::SelfLoop => {
                    let render = node_renders.get(edge.from_node_id()).ok_or_else(|| {
                        FlowchartRenderError::MissingPlacement {
                            node_id: edge.from_node_id().clone(),
                        }
                    })?;
                    let mut need = render.box_x1 + 3;
                    if label_len > 0 {
                        need = render.box_x1 + 4 + label_len;
                    }
                    width = width.max(need);
                }
                EdgeRoute::Direct => {
                    if label_len > 0 {
                        let from = node_renders.get(edge.from_node_id()).ok_or_else(|| {
                            FlowchartRenderError::MissingPlacement {
                                node_id: edge.from_node_id().clone(),
                            }
                        })?;
                        let to = node_renders.get(edge.to_node_id()).ok_or_else(|| {
                            FlowchartRenderError::MissingPlacement {
                                node_id: edge.to_node_id().clone(),
                            }
                        })?;
                        let min_x = from.center_x().min(to.center_x());
                        width = width.max(min_x + 2 + label_len);
                    }
                }
                EdgeRoute::Channel { slot } => {
                    let ch_x = channel_x(content_width, *slot);
                    let mut need = ch_x + 1;
                    if label_len > 0 {
                        need = ch_x + 2 + label_len;
                    }
                    width = width.max(need);
                }
            }
        }

        let rows = layout.layers().len();
        let mut height =
            margin_top + rows * BOX_HEIGHT + rows.saturating_sub(1) * ROW_GAP;
        if channel_exits_last_layer {
            height += 2;
        }

        Ok(Self {
            node_renders,
            display_labels,
            edge_routes,
            content_width,
            width,
            height: height.max(1),
        })
    }

    fn render(&self, ast: &FlowchartAst) -> Result<TextDiagram, FlowchartRenderError> {
        let mut canvas = Canvas::new(self.width, self.height)?;
        let mut labels = LabelIndex::new();

        for node in ast.nodes() {
            let render = self.node_renders.get(node.id()).copied().ok_or_else(|| {
                FlowchartRenderError::MissingPlacement { node_id: node.id().clone() }
            })?;
            let display = self
                .display_labels
                .get(node.id())
                .map(String::as_str)
                .unwrap_or_default();
            if let Some(span) = draw_node(&mut canvas, render, display)? {
                labels.insert(node.id().clone(), span);
            }
        }

        for (edge, route) in ast.edges().iter().zip(&self.edge_routes) {
            let from = self.node_renders.get(edge.from_node_id()).copied().ok_or_else(|| {
                FlowchartRenderError::MissingPlacement { node_id: edge.from_node_id().clone() }
            })?;
            let to = self.node_renders.get(edge.to_node_id()).copied().ok_or_else(|| {
                FlowchartRenderError::MissingPlacement { node_id: edge.to_node_id().clone() }
            })?;
            let label = edge
                .label()
                .filter(|label| !label.is_empty())
                .map(|label| truncate_with_ellipsis(label, MAX_EDGE_LABEL_WIDTH));

            match route {
                EdgeRoute::SelfLoop => draw_self_loop(&mut canvas, from, label.as_deref())?,
                EdgeRoute::Direct => draw_direct_edge(&mut canvas, from, to, label.as_deref())?,
                EdgeRoute::Channel { slot } => draw_channel_edge(
                    &mut canvas,
                    from,
                    to,
                    channel_x(self.content_width, *slot),
                    label.as_deref(),
                )?,
            }
        }

        Ok(TextDiagram { text: canvas_to_string_trimmed(&canvas), labels })
    }
}

pub(super) fn channel_x(content_width: usize, slot: usize) -> usize {
    content_width + 1 + CHANNEL_GAP * slot
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowchartRenderError {
    Canvas(CanvasError),
    MissingPlacement { node_id: NodeId },
}

impl fmt::Display for FlowchartRenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canvas(err) => write!(f, "canvas error: {err}"),
            Self::MissingPlacement { node_id } => write!(f, "missing placement for node {node_id}"),
        }
    }
}

impl std::error::Error for FlowchartRenderError {}

impl From<CanvasError> for FlowchartRenderError {
    fn from(value: CanvasError) -> Self {
        Self::Canvas(value)
    }
}

/// Deterministic top-down Unicode renderer for a flowchart.
///
/// Consumes layered coordinates from `FlowchartLayout`; the AST supplies
/// labels and shapes. Every edge ends in a `▼` entering the top of its target
/// box. Adjacent-layer edges run through the gap band between the two layers;
/// long, same-layer, and backward edges take a numbered channel column right
/// of the content; self-loops become a `↺` marker beside the box.
///
/// Limitations (baseline):
/// - Connectors share gap rows, so dense graphs can produce junction-heavy
///   rows where unrelated edges cross.
/// - Edge labels overwrite whatever connector cells they land on.
pub fn render_flowchart_text(
    ast: &FlowchartAst,
    layout: &FlowchartLayout,
) -> Result<TextDiagram, FlowchartRenderError> {
    if ast.nodes().is_empty() {
        return Ok(TextDiagram::default());
    }

    let plan = FlowchartRenderPlan::build(ast, layout)?;
    plan.render(ast)
}

// Extracted node and connector drawing internals.
include!("flowchart/helpers.rs");
