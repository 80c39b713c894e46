// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Standalone SVG rendering for flowcharts.
//!
//! Shares the cell-grid plan with the text renderer and scales it to pixels,
//! so the exported image and the on-screen diagram route edges identically.
//! The output is a self-contained document: explicit size, background, arrow
//! marker, no external references. It feeds both the `.svg` export and the
//! PNG rasterizer.

use crate::layout::FlowchartLayout;
use crate::model::flow_ast::{FlowchartAst, NodeShape};

use super::flowchart::{
    channel_x, EdgeRoute, FlowchartRenderError, FlowchartRenderPlan, NodeRender,
    MAX_EDGE_LABEL_WIDTH,
};
use super::truncate_with_ellipsis;

const CELL_W: f32 = 9.0;
const CELL_H: f32 = 18.0;
const MARGIN: f32 = 24.0;
const FONT_SIZE: f32 = 14.0;
const FONT_FAMILY: &str = "monospace";
const BACKGROUND: &str = "#ffffff";
const NODE_FILL: &str = "#f4f4f5";
const NODE_STROKE: &str = "#52525b";
const LINE_COLOR: &str = "#52525b";
const TEXT_COLOR: &str = "#18181b";

/// Renders a flowchart as a self-contained SVG document.
///
/// Geometry mirrors `render_flowchart_text`: same layers, same edge routes,
/// scaled from character cells to pixels. All user-sourced text is escaped.
pub fn render_flowchart_svg(
    ast: &FlowchartAst,
    layout: &FlowchartLayout,
) -> Result<String, FlowchartRenderError> {
    if ast.nodes().is_empty() {
        let size = MARGIN * 2.0;
        let mut svg = document_open(size, size);
        svg.push_str("</svg>");
        return Ok(svg);
    }

    let plan = FlowchartRenderPlan::build(ast, layout)?;
    let doc_width = MARGIN * 2.0 + plan.width as f32 * CELL_W;
    let doc_height = MARGIN * 2.0 + plan.height as f32 * CELL_H;

    let mut svg = document_open(doc_width, doc_height);

    for (edge, route) in ast.edges().iter().zip(&plan.edge_routes) {
        let from = plan.node_renders.get(edge.from_node_id()).copied().ok_or_else(|| {
            FlowchartRenderError::MissingPlacement { node_id: edge.from_node_id().clone() }
        })?;
        let to = plan.node_renders.get(edge.to_node_id()).copied().ok_or_else(|| {
            FlowchartRenderError::MissingPlacement { node_id: edge.to_node_id().clone() }
        })?;
        let label = edge
            .label()
            .filter(|label| !label.is_empty())
            .map(|label| truncate_with_ellipsis(label, MAX_EDGE_LABEL_WIDTH));

        match route {
            EdgeRoute::SelfLoop => push_self_loop(&mut svg, from, label.as_deref()),
            EdgeRoute::Direct => push_direct_edge(&mut svg, from, to, label.as_deref()),
            EdgeRoute::Channel { slot } => push_channel_edge(
                &mut svg,
                from,
                to,
                channel_x(plan.content_width, *slot),
                label.as_deref(),
            ),
        }
    }

    for node in ast.nodes() {
        let render = plan.node_renders.get(node.id()).copied().ok_or_else(|| {
            FlowchartRenderError::MissingPlacement { node_id: node.id().clone() }
        })?;
        let display = plan
            .display_labels
            .get(node.id())
            .map(String::as_str)
            .unwrap_or_default();
        push_node(&mut svg, render, display);
    }

    svg.push_str("</svg>");
    Ok(svg)
}

fn document_open(width: f32, height: f32) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{BACKGROUND}\"/>"
    ));
    svg.push_str(&format!(
        "<defs><marker id=\"arrow\" markerWidth=\"10\" markerHeight=\"7\" refX=\"10\" refY=\"3.5\" orient=\"auto\"><polygon points=\"0 0, 10 3.5, 0 7\" fill=\"{LINE_COLOR}\"/></marker></defs>"
    ));
    svg
}

fn col_center(cell: usize) -> f32 {
    MARGIN + (cell as f32 + 0.5) * CELL_W
}

fn row_center(cell: usize) -> f32 {
    MARGIN + (cell as f32 + 0.5) * CELL_H
}

/// Left edge in pixels of `render`'s bounding box.
fn box_left(render: NodeRender) -> f32 {
    MARGIN + render.box_x0 as f32 * CELL_W
}

fn box_right(render: NodeRender) -> f32 {
    MARGIN + (render.box_x1 + 1) as f32 * CELL_W
}

fn box_top(render: NodeRender) -> f32 {
    MARGIN + render.box_y0 as f32 * CELL_H
}

fn box_bottom(render: NodeRender) -> f32 {
    MARGIN + (render.box_y1 + 1) as f32 * CELL_H
}

fn push_node(svg: &mut String, render: NodeRender, display: &str) {
    let left = box_left(render);
    let right = box_right(render);
    let top = box_top(render);
    let bottom = box_bottom(render);
    let center_x = (left + right) / 2.0;
    let center_y = (top + bottom) / 2.0;

    match render.shape {
        NodeShape::Rect => {
            svg.push_str(&format!(
                "<rect x=\"{left}\" y=\"{top}\" width=\"{}\" height=\"{}\" fill=\"{NODE_FILL}\" stroke=\"{NODE_STROKE}\"/>",
                right - left,
                bottom - top,
            ));
        }
        NodeShape::Round => {
            svg.push_str(&format!(
                "<rect x=\"{left}\" y=\"{top}\" width=\"{}\" height=\"{}\" rx=\"10\" fill=\"{NODE_FILL}\" stroke=\"{NODE_STROKE}\"/>",
                right - left,
                bottom - top,
            ));
        }
        NodeShape::Diamond => {
            svg.push_str(&format!(
                "<polygon points=\"{center_x},{top} {right},{center_y} {center_x},{bottom} {left},{center_y}\" fill=\"{NODE_FILL}\" stroke=\"{NODE_STROKE}\"/>",
            ));
        }
    }

    if !display.is_empty() {
        svg.push_str(&format!(
            "<text x=\"{center_x}\" y=\"{center_y}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{FONT_FAMILY}\" font-size=\"{FONT_SIZE}\" fill=\"{TEXT_COLOR}\">{}</text>",
            escape_xml(display),
        ));
    }
}

fn push_self_loop(svg: &mut String, from: NodeRender, label: Option<&str>) {
    let right = box_right(from);
    let mid_y = row_center(from.mid_y());
    let reach = right + CELL_W * 1.5;
    push_polyline(
        svg,
        &[(right, mid_y - 5.0), (reach, mid_y - 5.0), (reach, mid_y + 5.0), (right, mid_y + 5.0)],
    );
    if let Some(label) = label {
        push_edge_label(svg, MARGIN + (from.box_x1 + 4) as f32 * CELL_W, mid_y, "start", label);
    }
}

fn push_direct_edge(svg: &mut String, from: NodeRender, to: NodeRender, label: Option<&str>) {
    let from_x = col_center(from.center_x());
    let to_x = col_center(to.center_x());
    let start_y = box_bottom(from);
    let end_y = box_top(to);
    let jog_y = row_center(from.box_y1 + 2);

    if from.center_x() == to.center_x() {
        push_polyline(svg, &[(from_x, start_y), (to_x, end_y)]);
        if let Some(label) = label {
            push_edge_label(svg, from_x + CELL_W, jog_y, "start", label);
        }
    } else {
        push_polyline(
            svg,
            &[(from_x, start_y), (from_x, jog_y), (to_x, jog_y), (to_x, end_y)],
        );
        if let Some(label) = label {
            push_edge_label(svg, (from_x + to_x) / 2.0, jog_y - 6.0, "middle", label);
        }
    }
}

fn push_channel_edge(
    svg: &mut String,
    from: NodeRender,
    to: NodeRender,
    channel: usize,
    label: Option<&str>,
) {
    let from_x = col_center(from.center_x());
    let to_x = col_center(to.center_x());
    let channel_px = col_center(channel);
    let jog_y = row_center(from.box_y1 + 2);
    let entry_jog_y = row_center(to.box_y0.saturating_sub(2));

    push_polyline(
        svg,
        &[
            (from_x, box_bottom(from)),
            (from_x, jog_y),
            (channel_px, jog_y),
            (channel_px, entry_jog_y),
            (to_x, entry_jog_y),
            (to_x, box_top(to)),
        ],
    );
    if let Some(label) = label {
        push_edge_label(svg, channel_px + CELL_W, (jog_y + entry_jog_y) / 2.0, "start", label);
    }
}

fn push_polyline(svg: &mut String, points: &[(f32, f32)]) {
    let mut path = String::new();
    for (idx, (x, y)) in points.iter().enumerate() {
        let op = if idx == 0 { 'M' } else { 'L' };
        path.push_str(&format!("{op} {x} {y} "));
    }
    svg.push_str(&format!(
        "<path d=\"{}\" fill=\"none\" stroke=\"{LINE_COLOR}\" stroke-width=\"1.4\" marker-end=\"url(#arrow)\"/>",
        path.trim_end(),
    ));
}

fn push_edge_label(svg: &mut String, x: f32, y: f32, anchor: &str, label: &str) {
    svg.push_str(&format!(
        "<text x=\"{x}\" y=\"{y}\" text-anchor=\"{anchor}\" dominant-baseline=\"middle\" font-family=\"{FONT_FAMILY}\" font-size=\"{}\" fill=\"{TEXT_COLOR}\">{}</text>",
        FONT_SIZE - 2.0,
        escape_xml(label),
    ));
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::mermaid::parse_flowchart;
    use crate::layout::layout_flowchart;

    fn render(text: &str) -> String {
        let ast = parse_flowchart(text).expect("test input parses");
        let layout = layout_flowchart(&ast);
        render_flowchart_svg(&ast, &layout).expect("renders")
    }

    #[test]
    fn sample_flow_produces_a_complete_document() {
        let svg = render(
            "graph TD\n  A[User clicks]\n  B{Is logged in?}\n  C[Show dashboard]\n  D[Redirect to login]\n  A --> B\n  B -->|Yes| C\n  B -->|No| D\n",
        );

        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("<marker id=\"arrow\""));
        assert!(svg.contains(">User clicks</text>"));
        assert!(svg.contains(">Is logged in?</text>"));
        assert!(svg.contains(">Yes</text>"));
        assert!(svg.contains(">No</text>"));
        // One marker polygon plus the decision diamond.
        assert_eq!(svg.matches("<polygon").count(), 2);
        assert_eq!(svg.matches("marker-end=\"url(#arrow)\"").count(), 3);
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let svg = render("graph TD\n  A[\"a < b & \\\"c\\\"\"]\n");
        assert!(svg.contains("a &lt; b &amp; &quot;c&quot;"));
        assert!(!svg.contains("a < b"));
    }

    #[test]
    fn round_nodes_use_rounded_rects() {
        let svg = render("graph TD\n  A(Start)\n");
        assert!(svg.contains("rx=\"10\""));
    }

    #[test]
    fn empty_flowchart_is_a_bare_document() {
        let svg = render("graph TD\n");
        assert!(svg.starts_with("<svg xmlns="));
        assert!(!svg.contains("marker-end"));
        assert!(!svg.contains("<text"));
    }

    #[test]
    fn document_size_matches_the_cell_grid() {
        let svg = render(
            "graph TD\n  A[User clicks]\n  B{Is logged in?}\n  C[Show dashboard]\n  D[Redirect to login]\n  A --> B\n  B -->|Yes| C\n  B -->|No| D\n",
        );
        // 42 cells wide by 15 tall, plus a 24px margin on each side.
        assert!(svg.contains("width=\"426\" height=\"318\""));
        assert!(svg.contains("viewBox=\"0 0 426 318\""));
    }
}
