// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::flow_ast::FlowchartAst;
use crate::model::ids::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowchartLayout {
    layers: Vec<Vec<NodeId>>,
    node_placements: BTreeMap<NodeId, FlowNodePlacement>,
}

impl FlowchartLayout {
    pub fn layers(&self) -> &[Vec<NodeId>] {
        &self.layers
    }

    pub fn node_placements(&self) -> &BTreeMap<NodeId, FlowNodePlacement> {
        &self.node_placements
    }

    pub fn placement(&self, node_id: &NodeId) -> Option<&FlowNodePlacement> {
        self.node_placements.get(node_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowNodePlacement {
    layer: usize,
    index_in_layer: usize,
}

impl FlowNodePlacement {
    pub fn layer(&self) -> usize {
        self.layer
    }

    pub fn index_in_layer(&self) -> usize {
        self.index_in_layer
    }
}

/// Distinct forward graph used for layering.
///
/// Self-loops never participate. Back edges (found by a depth-first walk in
/// declared order) are dropped so that layering always succeeds; the renderer
/// still draws them, routed against the layer direction.
struct ForwardGraph {
    outgoing: BTreeMap<NodeId, Vec<NodeId>>,
    predecessors: BTreeMap<NodeId, Vec<NodeId>>,
}

fn forward_graph(ast: &FlowchartAst) -> ForwardGraph {
    let mut pairs = BTreeSet::<(NodeId, NodeId)>::new();
    for edge in ast.edges() {
        if edge.from_node_id() == edge.to_node_id() {
            continue;
        }
        pairs.insert((edge.from_node_id().clone(), edge.to_node_id().clone()));
    }

    let back_pairs = mark_back_pairs(ast, &pairs);

    let mut outgoing = BTreeMap::<NodeId, Vec<NodeId>>::new();
    let mut predecessors = BTreeMap::<NodeId, Vec<NodeId>>::new();
    for node in ast.nodes() {
        outgoing.insert(node.id().clone(), Vec::new());
        predecessors.insert(node.id().clone(), Vec::new());
    }
    for (from, to) in &pairs {
        if back_pairs.contains(&(from.clone(), to.clone())) {
            continue;
        }
        outgoing.get_mut(from).expect("node exists (ensured)").push(to.clone());
        predecessors.get_mut(to).expect("node exists (ensured)").push(from.clone());
    }

    ForwardGraph { outgoing, predecessors }
}

/// Iterative depth-first walk that collects back edges.
///
/// Roots and children are visited in declared order so the same input always
/// breaks the same edges.
fn mark_back_pairs(
    ast: &FlowchartAst,
    pairs: &BTreeSet<(NodeId, NodeId)>,
) -> BTreeSet<(NodeId, NodeId)> {
    let declared_order = ast
        .nodes()
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id().clone(), idx))
        .collect::<BTreeMap<_, _>>();

    let mut children = BTreeMap::<NodeId, Vec<NodeId>>::new();
    for node in ast.nodes() {
        children.insert(node.id().clone(), Vec::new());
    }
    for (from, to) in pairs {
        children.get_mut(from).expect("node exists (ensured)").push(to.clone());
    }
    for tos in children.values_mut() {
        tos.sort_by_key(|to| declared_order.get(to).copied().unwrap_or(usize::MAX));
    }

    const WHITE: u8 = 0;
    const GRAY: u8 = 1;
    const BLACK: u8 = 2;

    let mut color = BTreeMap::<NodeId, u8>::new();
    for node in ast.nodes() {
        color.insert(node.id().clone(), WHITE);
    }

    let mut back_pairs = BTreeSet::new();
    for root in ast.nodes() {
        if color.get(root.id()).copied().unwrap_or(WHITE) != WHITE {
            continue;
        }

        let mut stack: Vec<(NodeId, usize)> = vec![(root.id().clone(), 0)];
        color.insert(root.id().clone(), GRAY);
        while let Some((node_id, child_idx)) = stack.pop() {
            let tos = children.get(&node_id).map(|v| v.as_slice()).unwrap_or(&[]);
            if child_idx >= tos.len() {
                color.insert(node_id, BLACK);
                continue;
            }
            let child = tos[child_idx].clone();
            stack.push((node_id.clone(), child_idx + 1));
            match color.get(&child).copied().unwrap_or(WHITE) {
                WHITE => {
                    color.insert(child.clone(), GRAY);
                    stack.push((child, 0));
                }
                GRAY => {
                    back_pairs.insert((node_id, child));
                }
                _ => {}
            }
        }
    }

    back_pairs
}

fn topo_sort_nodes(ast: &FlowchartAst, graph: &ForwardGraph) -> Vec<NodeId> {
    let mut indegree = BTreeMap::<NodeId, usize>::new();
    for node in ast.nodes() {
        indegree.insert(node.id().clone(), 0);
    }
    for tos in graph.outgoing.values() {
        for to in tos {
            *indegree.get_mut(to).expect("node exists (ensured)") += 1;
        }
    }

    let declared_order = ast
        .nodes()
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id().clone(), idx))
        .collect::<BTreeMap<_, _>>();
    let position = |node_id: &NodeId| declared_order.get(node_id).copied().unwrap_or(usize::MAX);

    let mut ready = BTreeSet::<(usize, NodeId)>::new();
    for (node_id, degree) in &indegree {
        if *degree == 0 {
            ready.insert((position(node_id), node_id.clone()));
        }
    }

    let mut topo = Vec::<NodeId>::with_capacity(indegree.len());
    while let Some(entry) = ready.iter().next().cloned() {
        ready.remove(&entry);
        let (_, next) = entry;
        topo.push(next.clone());
        let tos = graph.outgoing.get(&next).map(|v| v.as_slice()).unwrap_or(&[]);
        for to in tos {
            let degree = indegree.get_mut(to).expect("node exists (ensured)");
            *degree = degree.saturating_sub(1);
            if *degree == 0 {
                ready.insert((position(to), to.clone()));
            }
        }
    }

    // Back edges were removed, so the forward graph is acyclic and the walk
    // always drains every node.
    topo
}

fn assign_layers(
    topo: &[NodeId],
    outgoing: &BTreeMap<NodeId, Vec<NodeId>>,
) -> BTreeMap<NodeId, usize> {
    let mut layers = BTreeMap::<NodeId, usize>::new();
    for node_id in topo {
        layers.insert(node_id.clone(), 0);
    }

    for from in topo {
        let from_layer = *layers.get(from).expect("node exists (ensured)");
        let tos = outgoing.get(from).map(|v| v.as_slice()).unwrap_or(&[]);
        for to in tos {
            let to_layer = layers.get(to).copied().unwrap_or(0);
            layers.insert(to.clone(), to_layer.max(from_layer + 1));
        }
    }

    layers
}

fn sort_layer_by_barycenter(
    layer_nodes: &mut [NodeId],
    prev_positions: &BTreeMap<NodeId, usize>,
    predecessors: &BTreeMap<NodeId, Vec<NodeId>>,
    declared_order: &BTreeMap<NodeId, usize>,
) {
    let position = |node_id: &NodeId| declared_order.get(node_id).copied().unwrap_or(usize::MAX);

    layer_nodes.sort_by(|a, b| {
        let bary = |node_id: &NodeId| {
            predecessors
                .get(node_id)
                .map(|preds| {
                    preds
                        .iter()
                        .filter_map(|p| prev_positions.get(p).copied())
                        .fold((0usize, 0usize), |(sum, count), pos| (sum + pos, count + 1))
                })
                .and_then(|(sum, count)| (count > 0).then_some((sum, count)))
        };

        match (bary(a), bary(b)) {
            (None, None) => position(a).cmp(&position(b)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (Some((sum_a, count_a)), Some((sum_b, count_b))) => {
                // Compare sum_a/count_a vs sum_b/count_b without floats.
                let left = (sum_a as u128) * (count_b as u128);
                let right = (sum_b as u128) * (count_a as u128);
                left.cmp(&right).then_with(|| position(a).cmp(&position(b)))
            }
        }
    });
}

/// Deterministic layered layout for flowcharts.
///
/// - Self-loops and back edges are excluded from layering, so any input lays
///   out (cyclic documents included).
/// - Node layers come from longest-path layering over a deterministic
///   topological order.
/// - Within a layer, nodes start in declared order and get one downward
///   barycenter sweep for readability.
pub fn layout_flowchart(ast: &FlowchartAst) -> FlowchartLayout {
    let graph = forward_graph(ast);
    let topo = topo_sort_nodes(ast, &graph);
    let node_layers = assign_layers(&topo, &graph.outgoing);

    let declared_order = ast
        .nodes()
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id().clone(), idx))
        .collect::<BTreeMap<_, _>>();

    let max_layer = node_layers.values().copied().max().unwrap_or(0);
    let mut layers = vec![Vec::<NodeId>::new(); max_layer + 1];
    for node in ast.nodes() {
        let layer = *node_layers.get(node.id()).unwrap_or(&0);
        layers[layer].push(node.id().clone());
    }

    for layer_idx in 1..layers.len() {
        let prev_positions = layers[layer_idx - 1]
            .iter()
            .enumerate()
            .map(|(idx, node_id)| (node_id.clone(), idx))
            .collect::<BTreeMap<_, _>>();

        sort_layer_by_barycenter(
            &mut layers[layer_idx],
            &prev_positions,
            &graph.predecessors,
            &declared_order,
        );
    }

    let mut node_placements = BTreeMap::<NodeId, FlowNodePlacement>::new();
    for (layer, nodes) in layers.iter().enumerate() {
        for (index_in_layer, node_id) in nodes.iter().enumerate() {
            node_placements.insert(node_id.clone(), FlowNodePlacement { layer, index_in_layer });
        }
    }

    FlowchartLayout { layers, node_placements }
}

#[cfg(test)]
mod tests {
    use super::layout_flowchart;
    use crate::format::mermaid::parse_flowchart;
    use crate::model::flow_ast::FlowchartAst;
    use crate::model::ids::NodeId;

    fn ast(text: &str) -> FlowchartAst {
        parse_flowchart(text).expect("test input parses")
    }

    fn node_id(value: &str) -> NodeId {
        NodeId::new(value).expect("valid id")
    }

    fn layer_names(layout: &super::FlowchartLayout) -> Vec<Vec<String>> {
        layout
            .layers()
            .iter()
            .map(|layer| layer.iter().map(|id| id.as_str().to_owned()).collect())
            .collect()
    }

    #[test]
    fn seed_shape_layers_as_expected() {
        let ast = ast(
            "graph TD\n  A[User clicks]\n  B{Is logged in?}\n  C[Show dashboard]\n  D[Redirect to login]\n  A --> B\n  B -->|Yes| C\n  B -->|No| D\n",
        );
        let layout = layout_flowchart(&ast);
        assert_eq!(
            layer_names(&layout),
            vec![vec!["A".to_owned()], vec!["B".to_owned()], vec!["C".to_owned(), "D".to_owned()]]
        );
        let placement = layout.placement(&node_id("D")).expect("placed");
        assert_eq!(placement.layer(), 2);
        assert_eq!(placement.index_in_layer(), 1);
    }

    #[test]
    fn longest_path_pushes_shared_target_down() {
        let layout = layout_flowchart(&ast("graph TD\n  A --> B\n  B --> C\n  A --> C\n"));
        let c = layout.placement(&node_id("C")).expect("placed");
        assert_eq!(c.layer(), 2);
    }

    #[test]
    fn cycles_lay_out_instead_of_failing() {
        let layout = layout_flowchart(&ast("graph TD\n  A --> B\n  B --> C\n  C --> A\n"));
        assert_eq!(
            layer_names(&layout),
            vec![vec!["A".to_owned()], vec!["B".to_owned()], vec!["C".to_owned()]]
        );
    }

    #[test]
    fn self_loop_does_not_affect_layering() {
        let layout = layout_flowchart(&ast("graph TD\n  A --> A\n  A --> B\n"));
        assert_eq!(layout.placement(&node_id("A")).map(|p| p.layer()), Some(0));
        assert_eq!(layout.placement(&node_id("B")).map(|p| p.layer()), Some(1));
    }

    #[test]
    fn disconnected_nodes_share_the_root_layer() {
        let layout = layout_flowchart(&ast("graph TD\n  A[a]\n  B[b]\n  C[c]\n"));
        assert_eq!(
            layer_names(&layout),
            vec![vec!["A".to_owned(), "B".to_owned(), "C".to_owned()]]
        );
    }

    #[test]
    fn barycenter_orders_children_under_their_parents() {
        // P and Q sit side by side; their children should not cross.
        let layout = layout_flowchart(&ast(
            "graph TD\n  P[p]\n  Q[q]\n  Q --> X\n  P --> Y\n",
        ));
        let layers = layer_names(&layout);
        assert_eq!(layers[0], vec!["P".to_owned(), "Q".to_owned()]);
        assert_eq!(layers[1], vec!["Y".to_owned(), "X".to_owned()]);
    }

    #[test]
    fn layout_is_deterministic() {
        let ast = ast("graph TD\n  A --> B\n  A --> C\n  B --> D\n  C --> D\n  D --> A\n");
        assert_eq!(layout_flowchart(&ast), layout_flowchart(&ast));
    }
}
