// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use proteus::model::{Document, FlowchartAst};

fn ascii_repeat_to_len(prefix: &str, fill: char, target_len: usize) -> String {
    if prefix.len() >= target_len {
        return prefix[..target_len].to_owned();
    }

    let mut out = String::with_capacity(target_len);
    out.push_str(prefix);
    while out.len() < target_len {
        out.push(fill);
    }
    out
}

pub fn checksum_flowchart(ast: &FlowchartAst) -> u64 {
    let mut acc = 0u64;
    for node in ast.nodes() {
        acc = acc.wrapping_mul(131).wrapping_add(node.id().as_str().len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(node.label().len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(node.shape() as u64);
    }
    for edge in ast.edges() {
        acc = acc.wrapping_mul(131).wrapping_add(edge.from_node_id().as_str().len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(edge.to_node_id().as_str().len() as u64);
        if let Some(label) = edge.label() {
            acc = acc.wrapping_mul(131).wrapping_add(label.len() as u64);
        }
    }
    acc
}

pub fn checksum_document(document: &Document) -> u64 {
    let mut acc = 0u64;
    for node in &document.nodes {
        acc = acc.wrapping_mul(131).wrapping_add(node.id.len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(node.text.len() as u64);
    }
    for edge in &document.edges {
        acc = acc.wrapping_mul(131).wrapping_add(edge.from.len() as u64);
        acc = acc.wrapping_mul(131).wrapping_add(edge.to.len() as u64);
        if let Some(label) = &edge.label {
            acc = acc.wrapping_mul(131).wrapping_add(label.len() as u64);
        }
    }
    acc
}

pub mod flow {
    use super::ascii_repeat_to_len;
    use proteus::model::{Document, DocumentEdge, DocumentNode};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DagParams {
        pub layers: usize,
        pub nodes_per_layer: usize,
        pub fanout: usize,
        pub cross_edges_per_node: usize,
        pub text_len: usize,
    }

    impl DagParams {
        pub const fn new(
            layers: usize,
            nodes_per_layer: usize,
            fanout: usize,
            cross_edges_per_node: usize,
            text_len: usize,
        ) -> Self {
            Self {
                layers,
                nodes_per_layer,
                fanout,
                cross_edges_per_node,
                text_len,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Case {
        Small,
        MediumDense,
        LargeLongLabels,
    }

    impl Case {
        pub const fn id(self) -> &'static str {
            match self {
                Self::Small => "small",
                Self::MediumDense => "medium_dense",
                Self::LargeLongLabels => "large_long_labels",
            }
        }

        pub const fn params(self) -> DagParams {
            match self {
                Self::Small => DagParams::new(6, 10, 2, 0, 12),
                Self::MediumDense => DagParams::new(12, 20, 4, 1, 12),
                Self::LargeLongLabels => DagParams::new(24, 35, 4, 2, 64),
            }
        }
    }

    fn node_ident(layer: usize, idx: usize) -> String {
        format!("l{layer:02}n{idx:04}")
    }

    // Every seventh node is a decision: its text ends in `?` (diamond shape)
    // and its fanout edges carry Yes/No labels.
    fn is_decision(layer: usize, idx: usize) -> bool {
        (layer * 31 + idx) % 7 == 0
    }

    fn node_text(layer: usize, idx: usize, text_len: usize) -> String {
        let base = format!("Step {layer:02}x{idx:04}");
        if is_decision(layer, idx) {
            let mut text = ascii_repeat_to_len(&base, 'x', text_len.saturating_sub(1));
            text.push('?');
            text
        } else {
            ascii_repeat_to_len(&base, 'x', text_len)
        }
    }

    /// Deterministic layered DAG generator, in document form.
    ///
    /// - All edges go from lower → higher layers (acyclic by construction).
    /// - Node ids fit the diagram identifier grammar, so translation never
    ///   has to sanitize them.
    pub fn dag(params: DagParams) -> Document {
        assert!(params.layers >= 2, "layers must be >= 2");
        assert!(params.nodes_per_layer >= 1, "nodes_per_layer must be >= 1");
        assert!(params.fanout >= 1, "fanout must be >= 1");

        let mut nodes = Vec::with_capacity(params.layers * params.nodes_per_layer);
        for layer in 0..params.layers {
            for idx in 0..params.nodes_per_layer {
                nodes.push(DocumentNode {
                    id: node_ident(layer, idx),
                    text: node_text(layer, idx, params.text_len),
                    image: None,
                    preview: None,
                });
            }
        }

        let mut edges = Vec::new();
        let fanout = params.fanout.min(params.nodes_per_layer);

        for layer in 0..params.layers.saturating_sub(1) {
            for idx in 0..params.nodes_per_layer {
                let from = node_ident(layer, idx);
                let decision = is_decision(layer, idx);

                for k in 0..fanout {
                    let to_idx = (idx + k) % params.nodes_per_layer;
                    let label = if decision {
                        Some(if k % 2 == 0 { "Yes" } else { "No" }.to_owned())
                    } else {
                        None
                    };
                    edges.push(DocumentEdge {
                        from: from.clone(),
                        to: node_ident(layer + 1, to_idx),
                        label,
                    });
                }

                if layer + 2 >= params.layers {
                    continue;
                }
                let max_target_layers = params.layers - (layer + 2);
                for k in 0..params.cross_edges_per_node {
                    let target_layer = layer + 2 + (k % max_target_layers);
                    let to_idx = (idx + 1 + k.saturating_mul(3)) % params.nodes_per_layer;
                    edges.push(DocumentEdge {
                        from: from.clone(),
                        to: node_ident(target_layer, to_idx),
                        label: None,
                    });
                }
            }
        }

        Document { nodes, edges }
    }

    pub fn fixture(case: Case) -> Document {
        dag(case.params())
    }
}
