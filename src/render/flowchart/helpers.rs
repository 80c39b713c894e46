// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Node and connector drawing internals for the flowchart text renderer.

fn draw_node(
    canvas: &mut Canvas,
    render: NodeRender,
    display: &str,
) -> Result<Option<LabelSpan>, CanvasError> {
    let label_len = text_len(display);

    match render.shape {
        NodeShape::Diamond => {
            let width = render.width();
            let point_x = render.box_x0 + (width / 2).saturating_sub(1);
            canvas.write_str(point_x, render.box_y0, "/\\")?;
            canvas.write_str(point_x, render.box_y1, "\\/")?;

            let mid_x0 = render.box_x0 + (width.saturating_sub(label_len + 2)) / 2;
            canvas.write_str(mid_x0, render.mid_y(), &format!("<{display}>"))?;

            Ok((label_len > 0).then_some(LabelSpan {
                y: render.mid_y(),
                x0: mid_x0 + 1,
                x1: mid_x0 + label_len,
            }))
        }
        NodeShape::Rect | NodeShape::Round => {
            canvas.draw_box(render.box_x0, render.box_y0, render.box_x1, render.box_y1)?;
            if render.shape == NodeShape::Round {
                canvas.set(render.box_x0, render.box_y0, '╭')?;
                canvas.set(render.box_x1, render.box_y0, '╮')?;
                canvas.set(render.box_x0, render.box_y1, '╰')?;
                canvas.set(render.box_x1, render.box_y1, '╯')?;
            }

            let inner_width = render.width().saturating_sub(2);
            let left_pad = inner_width.saturating_sub(label_len) / 2;
            let label_x = render.box_x0 + 1 + left_pad;
            canvas.write_str(label_x, render.mid_y(), display)?;

            Ok((label_len > 0).then_some(LabelSpan {
                y: render.mid_y(),
                x0: label_x,
                x1: label_x + label_len - 1,
            }))
        }
    }
}

fn draw_self_loop(
    canvas: &mut Canvas,
    node: NodeRender,
    label: Option<&str>,
) -> Result<(), CanvasError> {
    let x = node.box_x1 + 2;
    canvas.set(x, node.mid_y(), LOOP_MARK)?;
    if let Some(label) = label {
        canvas.write_str(x + 2, node.mid_y(), label)?;
    }
    Ok(())
}

/// One-layer-down connector through the shared gap band.
///
/// Straight when the centers align; otherwise a Z with explicit corners on
/// the jog row. Corners from sibling edges union into `┴`/`┬` junctions.
fn draw_direct_edge(
    canvas: &mut Canvas,
    from: NodeRender,
    to: NodeRender,
    label: Option<&str>,
) -> Result<(), CanvasError> {
    let from_x = from.center_x();
    let to_x = to.center_x();
    let exit_y = from.box_y1 + 1;
    let jog_y = from.box_y1 + 2;
    let arrow_y = to.box_y0.saturating_sub(1);

    if from_x == to_x {
        canvas.draw_vline(from_x, exit_y, jog_y)?;
        canvas.set(to_x, arrow_y, ARROW_DOWN)?;
        if let Some(label) = label {
            canvas.write_str(from_x + 2, jog_y, label)?;
        }
        return Ok(());
    }

    canvas.draw_vline(from_x, exit_y, exit_y)?;
    let (from_corner, to_corner) = if to_x > from_x {
        (UNICODE_BOX_BOTTOM_LEFT, UNICODE_BOX_TOP_RIGHT)
    } else {
        (UNICODE_BOX_BOTTOM_RIGHT, UNICODE_BOX_TOP_LEFT)
    };
    canvas.set(from_x, jog_y, from_corner)?;
    canvas.set(to_x, jog_y, to_corner)?;

    let (run_x0, run_x1) = if from_x < to_x { (from_x, to_x) } else { (to_x, from_x) };
    if run_x1 > run_x0 + 1 {
        canvas.draw_hline(run_x0 + 1, run_x1 - 1, jog_y)?;
    }
    canvas.set(to_x, arrow_y, ARROW_DOWN)?;

    if let Some(label) = label {
        let len = text_len(label);
        let mid = (run_x0 + run_x1) / 2;
        let x = mid.saturating_sub(len / 2).max(run_x0 + 1);
        canvas.write_str(x, jog_y, label)?;
    }

    Ok(())
}

/// Connector routed through a channel column right of the content.
///
/// Exits the source downward, runs across the source's jog row to the
/// channel, travels the channel vertically, and enters the target from
/// above. The label sits beside the channel at its vertical midpoint.
fn draw_channel_edge(
    canvas: &mut Canvas,
    from: NodeRender,
    to: NodeRender,
    channel_x: usize,
    label: Option<&str>,
) -> Result<(), CanvasError> {
    let from_x = from.center_x();
    let to_x = to.center_x();
    let exit_y = from.box_y1 + 1;
    let jog_y = from.box_y1 + 2;
    let entry_jog_y = to.box_y0.saturating_sub(2);
    let arrow_y = to.box_y0.saturating_sub(1);

    canvas.draw_vline(from_x, exit_y, exit_y)?;
    canvas.set(from_x, jog_y, UNICODE_BOX_BOTTOM_LEFT)?;
    if channel_x > from_x + 1 {
        canvas.draw_hline(from_x + 1, channel_x - 1, jog_y)?;
    }

    if entry_jog_y > jog_y {
        canvas.set(channel_x, jog_y, UNICODE_BOX_TOP_RIGHT)?;
        if entry_jog_y > jog_y + 1 {
            canvas.draw_vline(channel_x, jog_y + 1, entry_jog_y - 1)?;
        }
        canvas.set(channel_x, entry_jog_y, UNICODE_BOX_BOTTOM_RIGHT)?;
    } else {
        canvas.set(channel_x, jog_y, UNICODE_BOX_BOTTOM_RIGHT)?;
        if jog_y > entry_jog_y + 1 {
            canvas.draw_vline(channel_x, entry_jog_y + 1, jog_y - 1)?;
        }
        canvas.set(channel_x, entry_jog_y, UNICODE_BOX_TOP_RIGHT)?;
    }

    if channel_x > to_x + 1 {
        canvas.draw_hline(to_x + 1, channel_x - 1, entry_jog_y)?;
    }
    canvas.set(to_x, entry_jog_y, UNICODE_BOX_TOP_LEFT)?;
    canvas.set(to_x, arrow_y, ARROW_DOWN)?;

    if let Some(label) = label {
        let mid_y = (jog_y + entry_jog_y) / 2;
        canvas.write_str(channel_x + 2, mid_y, label)?;
    }

    Ok(())
}
