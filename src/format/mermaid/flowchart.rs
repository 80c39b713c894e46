// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::ident::{sanitize_diagram_ident, validate_diagram_ident};
pub use super::ident::DiagramIdentError;

use crate::model::document::Document;
use crate::model::flow_ast::{FlowDirection, FlowEdge, FlowNode, FlowchartAst, NodeShape};
use crate::model::ids::NodeId;

/// Translates a document into flowchart text.
///
/// Deterministic and pure: one header line (`graph TD`), one line per node in
/// declared order (`{...}` when the display text contains `?`, `[...]`
/// otherwise), one line per edge in declared order with an optional `|label|`
/// segment. User text that touches the grammar's reserved characters is
/// emitted in quoted form; document ids are mapped onto the identifier
/// grammar (see `ident`), with collisions deduplicated in declared order.
pub fn document_to_mermaid(document: &Document) -> String {
    let mut taken = BTreeSet::new();
    let mut id_map: BTreeMap<String, String> = BTreeMap::new();

    let mut out = String::from("graph TD\n");
    for node in &document.nodes {
        let ident = mapped_ident(&mut id_map, &mut taken, &node.id);
        let (open, close) = if node.text.contains('?') {
            ('{', '}')
        } else {
            ('[', ']')
        };
        out.push_str("  ");
        out.push_str(&ident);
        out.push(open);
        out.push_str(&encode_label(&node.text));
        out.push(close);
        out.push('\n');
    }
    for edge in &document.edges {
        let from = mapped_ident(&mut id_map, &mut taken, &edge.from);
        let to = mapped_ident(&mut id_map, &mut taken, &edge.to);
        out.push_str("  ");
        out.push_str(&from);
        out.push_str(" -->");
        // An empty label is treated as absent, like the original tool did.
        if let Some(label) = edge.label.as_deref().filter(|label| !label.is_empty()) {
            out.push('|');
            out.push_str(&encode_label(label));
            out.push('|');
        }
        out.push(' ');
        out.push_str(&to);
        out.push('\n');
    }
    out
}

fn mapped_ident(
    id_map: &mut BTreeMap<String, String>,
    taken: &mut BTreeSet<String>,
    raw: &str,
) -> String {
    if let Some(existing) = id_map.get(raw) {
        return existing.clone();
    }
    let fresh = sanitize_diagram_ident(raw, taken);
    id_map.insert(raw.to_owned(), fresh.clone());
    fresh
}

fn needs_quoting(text: &str) -> bool {
    text.is_empty()
        || text != text.trim()
        || text.contains("-->")
        || text.chars().any(|ch| {
            matches!(
                ch,
                '[' | ']' | '(' | ')' | '{' | '}' | '|' | '"' | '\\'
            ) || ch.is_control()
        })
}

fn encode_label(text: &str) -> String {
    if !needs_quoting(text) {
        return text.to_owned();
    }

    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MermaidFlowchartParseError {
    MissingHeader,
    InvalidDirection {
        line_no: usize,
        direction: String,
    },
    UnsupportedSyntax {
        line_no: usize,
        line: String,
    },
    InvalidNodeId {
        line_no: usize,
        name: String,
        reason: DiagramIdentError,
    },
    InvalidNodeLabelSyntax {
        line_no: usize,
        token: String,
    },
    EmptyNodeLabel {
        line_no: usize,
        token: String,
    },
    UnterminatedQuote {
        line_no: usize,
        token: String,
    },
    EmptyEdgeLabel {
        line_no: usize,
        line: String,
    },
    MalformedEdge {
        line_no: usize,
        line: String,
    },
}

impl fmt::Display for MermaidFlowchartParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => {
                f.write_str("expected 'graph' or 'flowchart' as the first non-empty line")
            }
            Self::InvalidDirection { line_no, direction } => write!(
                f,
                "invalid flowchart direction on line {line_no}: {direction} (expected TD/TB/LR)"
            ),
            Self::UnsupportedSyntax { line_no, line } => {
                write!(f, "unsupported flowchart syntax on line {line_no}: {line}")
            }
            Self::InvalidNodeId {
                line_no,
                name,
                reason,
            } => write!(f, "invalid node id on line {line_no}: {name} ({reason})"),
            Self::InvalidNodeLabelSyntax { line_no, token } => write!(
                f,
                "invalid node label syntax on line {line_no}: {token} (expected '<id>[<label>]', '<id>(<label>)', or '<id>{{<label>}}')"
            ),
            Self::EmptyNodeLabel { line_no, token } => {
                write!(f, "empty node label on line {line_no}: {token}")
            }
            Self::UnterminatedQuote { line_no, token } => {
                write!(f, "unterminated quoted label on line {line_no}: {token}")
            }
            Self::EmptyEdgeLabel { line_no, line } => {
                write!(f, "empty edge label on line {line_no}: {line}")
            }
            Self::MalformedEdge { line_no, line } => {
                write!(f, "malformed edge on line {line_no}: {line}")
            }
        }
    }
}

impl std::error::Error for MermaidFlowchartParseError {}

/// Parse the flowchart subset the translator emits.
///
/// Supported:
/// - `graph`/`flowchart` header with optional direction (`TD`, `TB`, `LR`)
/// - comment lines starting with `%%`
/// - node declarations: `<id>`, `<id>[<label>]`, `<id>(<label>)`, `<id>{<label>}`,
///   with labels either bare or quoted (`"..."` with `\"`, `\\`, `\n` escapes)
/// - single edges per line: `<from> --> <to>` with an optional `|<label>|`
///   segment after the arrow
///
/// Edge endpoints that were never declared become implicit rectangle nodes
/// labeled with their own id. Re-declaring an id updates it in place.
/// Everything outside the subset is rejected with an actionable error.
pub fn parse_flowchart(input: &str) -> Result<FlowchartAst, MermaidFlowchartParseError> {
    let mut ast: Option<FlowchartAst> = None;

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with("%%") {
            continue;
        }

        let Some(ast) = ast.as_mut() else {
            ast = Some(parse_header(trimmed, line_no)?);
            continue;
        };

        if let Some((op_start, op_end)) = find_edge_arrow(trimmed) {
            parse_edge_line(ast, trimmed, op_start, op_end, line_no)?;
            continue;
        }

        let spec = parse_node_spec(trimmed, line_no)?;
        apply_node_spec(ast, spec);
    }

    ast.ok_or(MermaidFlowchartParseError::MissingHeader)
}

fn parse_header(
    trimmed: &str,
    line_no: usize,
) -> Result<FlowchartAst, MermaidFlowchartParseError> {
    let mut parts = trimmed.split_whitespace();
    let keyword = parts.next().unwrap_or_default();
    if keyword != "graph" && keyword != "flowchart" {
        return Err(MermaidFlowchartParseError::MissingHeader);
    }

    let direction = match parts.next() {
        None => FlowDirection::TopDown,
        Some("TD" | "TB") => FlowDirection::TopDown,
        Some("LR") => FlowDirection::LeftRight,
        Some(other) => {
            return Err(MermaidFlowchartParseError::InvalidDirection {
                line_no,
                direction: other.to_owned(),
            });
        }
    };
    if parts.next().is_some() {
        return Err(MermaidFlowchartParseError::UnsupportedSyntax {
            line_no,
            line: trimmed.to_owned(),
        });
    }

    Ok(FlowchartAst::new(direction))
}

fn parse_edge_line(
    ast: &mut FlowchartAst,
    trimmed: &str,
    op_start: usize,
    op_end: usize,
    line_no: usize,
) -> Result<(), MermaidFlowchartParseError> {
    let lhs_raw = &trimmed[..op_start];
    let rest = &trimmed[op_end..];
    if lhs_raw.trim().is_empty() {
        return Err(MermaidFlowchartParseError::MalformedEdge {
            line_no,
            line: trimmed.to_owned(),
        });
    }
    // One edge per line; chains are outside the subset.
    if find_edge_arrow(rest).is_some() {
        return Err(MermaidFlowchartParseError::UnsupportedSyntax {
            line_no,
            line: trimmed.to_owned(),
        });
    }

    let rest = rest.trim_start();
    let (label, rhs_raw) = match rest.strip_prefix('|') {
        Some(after_pipe) => {
            let close =
                find_unquoted_pipe(after_pipe).ok_or(MermaidFlowchartParseError::MalformedEdge {
                    line_no,
                    line: trimmed.to_owned(),
                })?;
            let segment = &after_pipe[..close];
            let rhs = &after_pipe[close + 1..];
            let label = decode_edge_label(segment, trimmed, line_no)?;
            (Some(label), rhs)
        }
        None => (None, rest),
    };

    if rhs_raw.trim().is_empty() {
        return Err(MermaidFlowchartParseError::MalformedEdge {
            line_no,
            line: trimmed.to_owned(),
        });
    }

    let lhs_spec = parse_node_spec(lhs_raw, line_no)?;
    let rhs_spec = parse_node_spec(rhs_raw, line_no)?;
    let from = lhs_spec.id.clone();
    let to = rhs_spec.id.clone();
    apply_node_spec(ast, lhs_spec);
    apply_node_spec(ast, rhs_spec);

    ast.push_edge(FlowEdge::new_with(from, to, label));
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeSpec {
    id: NodeId,
    label: Option<String>,
    shape: Option<NodeShape>,
}

fn apply_node_spec(ast: &mut FlowchartAst, spec: NodeSpec) {
    let NodeSpec { id, label, shape } = spec;
    if label.is_none() && shape.is_none() {
        ast.ensure_node(&id);
        return;
    }
    let label = label.unwrap_or_else(|| id.as_str().to_owned());
    ast.declare_node(FlowNode::new_with(id, label, shape.unwrap_or_default()));
}

fn parse_node_spec(token: &str, line_no: usize) -> Result<NodeSpec, MermaidFlowchartParseError> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(MermaidFlowchartParseError::MalformedEdge {
            line_no,
            line: token.to_owned(),
        });
    }

    let open_delim = trimmed
        .char_indices()
        .find(|(_, ch)| matches!(ch, '[' | '(' | '{'));

    let Some((open_idx, open_ch)) = open_delim else {
        let id = node_id_from_ident(trimmed, line_no)?;
        return Ok(NodeSpec {
            id,
            label: None,
            shape: None,
        });
    };

    let (close_ch, shape) = match open_ch {
        '[' => (']', NodeShape::Rect),
        '(' => (')', NodeShape::Round),
        _ => ('}', NodeShape::Diamond),
    };

    let id = node_id_from_ident(trimmed[..open_idx].trim(), line_no)?;

    let after_open = &trimmed[open_idx + open_ch.len_utf8()..];
    let close_idx = find_matching_close(after_open, close_ch).ok_or_else(|| {
        MermaidFlowchartParseError::InvalidNodeLabelSyntax {
            line_no,
            token: trimmed.to_owned(),
        }
    })?;
    if close_idx + close_ch.len_utf8() != after_open.len() {
        return Err(MermaidFlowchartParseError::InvalidNodeLabelSyntax {
            line_no,
            token: trimmed.to_owned(),
        });
    }

    let label = decode_node_label(&after_open[..close_idx], trimmed, line_no)?;
    Ok(NodeSpec {
        id,
        label: Some(label),
        shape: Some(shape),
    })
}

fn node_id_from_ident(raw: &str, line_no: usize) -> Result<NodeId, MermaidFlowchartParseError> {
    validate_diagram_ident(raw).map_err(|reason| MermaidFlowchartParseError::InvalidNodeId {
        line_no,
        name: raw.to_owned(),
        reason,
    })?;
    // The ident grammar is a subset of the id token grammar.
    NodeId::new(raw).map_err(|_| MermaidFlowchartParseError::InvalidNodeId {
        line_no,
        name: raw.to_owned(),
        reason: DiagramIdentError::Empty,
    })
}

fn decode_node_label(
    inner: &str,
    token: &str,
    line_no: usize,
) -> Result<String, MermaidFlowchartParseError> {
    let trimmed = inner.trim();
    if trimmed.starts_with('"') {
        return parse_quoted_label(trimmed).map_err(|kind| match kind {
            QuoteScanError::Unterminated => MermaidFlowchartParseError::UnterminatedQuote {
                line_no,
                token: token.to_owned(),
            },
            QuoteScanError::TrailingJunk => MermaidFlowchartParseError::InvalidNodeLabelSyntax {
                line_no,
                token: token.to_owned(),
            },
        });
    }
    if trimmed.is_empty() {
        return Err(MermaidFlowchartParseError::EmptyNodeLabel {
            line_no,
            token: token.to_owned(),
        });
    }
    Ok(trimmed.to_owned())
}

fn decode_edge_label(
    segment: &str,
    line: &str,
    line_no: usize,
) -> Result<String, MermaidFlowchartParseError> {
    let trimmed = segment.trim();
    if trimmed.starts_with('"') {
        return parse_quoted_label(trimmed).map_err(|kind| match kind {
            QuoteScanError::Unterminated => MermaidFlowchartParseError::UnterminatedQuote {
                line_no,
                token: line.to_owned(),
            },
            QuoteScanError::TrailingJunk => MermaidFlowchartParseError::MalformedEdge {
                line_no,
                line: line.to_owned(),
            },
        });
    }
    if trimmed.is_empty() {
        return Err(MermaidFlowchartParseError::EmptyEdgeLabel {
            line_no,
            line: line.to_owned(),
        });
    }
    Ok(trimmed.to_owned())
}

enum QuoteScanError {
    Unterminated,
    TrailingJunk,
}

fn parse_quoted_label(token: &str) -> Result<String, QuoteScanError> {
    let mut out = String::new();
    let mut escaped = false;
    let mut closed_at: Option<usize> = None;
    for (idx, ch) in token.char_indices().skip(1) {
        if escaped {
            match ch {
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                other => out.push(other),
            }
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' => {
                closed_at = Some(idx);
                break;
            }
            other => out.push(other),
        }
    }
    match closed_at {
        Some(idx) if idx + 1 == token.len() => Ok(out),
        Some(_) => Err(QuoteScanError::TrailingJunk),
        None => Err(QuoteScanError::Unterminated),
    }
}

/// Finds the first `-->` outside bracket wrappers and quoted labels.
fn find_edge_arrow(line: &str) -> Option<(usize, usize)> {
    let mut in_bracket: Option<char> = None;
    let mut in_quote = false;
    let mut escaped = false;
    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if in_quote {
            match ch {
                '\\' => escaped = true,
                '"' => in_quote = false,
                _ => {}
            }
            continue;
        }
        if let Some(close) = in_bracket {
            match ch {
                '"' => in_quote = true,
                c if c == close => in_bracket = None,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_quote = true,
            '[' => in_bracket = Some(']'),
            '(' => in_bracket = Some(')'),
            '{' => in_bracket = Some('}'),
            '-' if line[idx..].starts_with("-->") => return Some((idx, idx + 3)),
            _ => {}
        }
    }
    None
}

fn find_unquoted_pipe(segment: &str) -> Option<usize> {
    let mut in_quote = false;
    let mut escaped = false;
    for (idx, ch) in segment.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quote => escaped = true,
            '"' => in_quote = !in_quote,
            '|' if !in_quote => return Some(idx),
            _ => {}
        }
    }
    None
}

fn find_matching_close(segment: &str, close: char) -> Option<usize> {
    let mut in_quote = false;
    let mut escaped = false;
    for (idx, ch) in segment.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if in_quote {
            match ch {
                '\\' => escaped = true,
                '"' => in_quote = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_quote = true,
            c if c == close => return Some(idx),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{document_to_mermaid, parse_flowchart, MermaidFlowchartParseError};
    use crate::model::document::{Document, DocumentEdge, DocumentNode};
    use crate::model::flow_ast::{FlowDirection, FlowchartAst, NodeShape};

    fn doc_node(id: &str, text: &str) -> DocumentNode {
        DocumentNode {
            id: id.to_owned(),
            text: text.to_owned(),
            image: None,
            preview: None,
        }
    }

    fn doc_edge(from: &str, to: &str, label: Option<&str>) -> DocumentEdge {
        DocumentEdge {
            from: from.to_owned(),
            to: to.to_owned(),
            label: label.map(str::to_owned),
        }
    }

    fn node_view(ast: &FlowchartAst) -> BTreeMap<String, (String, NodeShape)> {
        ast.nodes()
            .iter()
            .map(|node| {
                (
                    node.id().as_str().to_owned(),
                    (node.label().to_owned(), node.shape()),
                )
            })
            .collect()
    }

    fn edge_view(ast: &FlowchartAst) -> Vec<(String, String, Option<String>)> {
        ast.edges()
            .iter()
            .map(|edge| {
                (
                    edge.from_node_id().as_str().to_owned(),
                    edge.to_node_id().as_str().to_owned(),
                    edge.label().map(str::to_owned),
                )
            })
            .collect()
    }

    #[test]
    fn sample_document_translates_to_expected_text() {
        let text = document_to_mermaid(&Document::sample());
        assert_eq!(
            text,
            "graph TD\n  A[User clicks]\n  B{Is logged in?}\n  C[Show dashboard]\n  D[Redirect to login]\n  A --> B\n  B -->|Yes| C\n  B -->|No| D\n"
        );
    }

    #[test]
    fn translation_is_deterministic() {
        let document = Document::sample();
        assert_eq!(document_to_mermaid(&document), document_to_mermaid(&document));
    }

    #[test]
    fn question_mark_selects_diamond_wrapper() {
        let document = Document {
            nodes: vec![doc_node("A", "Plain"), doc_node("B", "Really?")],
            edges: vec![],
        };
        let text = document_to_mermaid(&document);
        assert!(text.contains("  A[Plain]\n"));
        assert!(text.contains("  B{Really?}\n"));
    }

    #[test]
    fn empty_edge_label_is_omitted() {
        let document = Document {
            nodes: vec![doc_node("A", "a"), doc_node("B", "b")],
            edges: vec![doc_edge("A", "B", Some(""))],
        };
        let text = document_to_mermaid(&document);
        assert!(text.contains("  A --> B\n"));
        assert!(!text.contains('|'));
    }

    #[test]
    fn reserved_characters_are_quoted_and_round_trip() {
        let tricky = r#"He said "hi" [sic] | twice"#;
        let document = Document {
            nodes: vec![doc_node("A", tricky), doc_node("B", "  padded  ")],
            edges: vec![doc_edge("A", "B", Some("a|b"))],
        };
        let text = document_to_mermaid(&document);
        let ast = parse_flowchart(&text).expect("quoted output parses");

        let nodes = node_view(&ast);
        assert_eq!(nodes["A"].0, tricky);
        assert_eq!(nodes["B"].0, "  padded  ");
        assert_eq!(edge_view(&ast), vec![("A".to_owned(), "B".to_owned(), Some("a|b".to_owned()))]);
    }

    #[test]
    fn arrow_text_inside_labels_round_trips() {
        let document = Document {
            nodes: vec![doc_node("A", "a"), doc_node("B", "b")],
            edges: vec![doc_edge("A", "B", Some("go --> there"))],
        };
        let text = document_to_mermaid(&document);
        let ast = parse_flowchart(&text).expect("quoted arrow parses");
        assert_eq!(
            edge_view(&ast),
            vec![("A".to_owned(), "B".to_owned(), Some("go --> there".to_owned()))]
        );
    }

    #[test]
    fn document_ids_are_sanitized_with_stable_dedup() {
        let document = Document {
            nodes: vec![doc_node("user input!", "one"), doc_node("user input?", "two?")],
            edges: vec![doc_edge("user input!", "user input?", None)],
        };
        let text = document_to_mermaid(&document);
        assert!(text.contains("  user_input_[one]\n"));
        assert!(text.contains("  user_input__2{two?}\n"));
        assert!(text.contains("  user_input_ --> user_input__2\n"));
    }

    #[test]
    fn seed_text_parses_into_expected_ast() {
        let text = document_to_mermaid(&Document::sample());
        let ast = parse_flowchart(&text).expect("seed parses");

        assert_eq!(ast.direction(), FlowDirection::TopDown);
        let nodes = node_view(&ast);
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes["A"], ("User clicks".to_owned(), NodeShape::Rect));
        assert_eq!(nodes["B"], ("Is logged in?".to_owned(), NodeShape::Diamond));
        assert_eq!(
            edge_view(&ast),
            vec![
                ("A".to_owned(), "B".to_owned(), None),
                ("B".to_owned(), "C".to_owned(), Some("Yes".to_owned())),
                ("B".to_owned(), "D".to_owned(), Some("No".to_owned())),
            ]
        );
    }

    #[test]
    fn header_variants_and_directions() {
        assert!(parse_flowchart("graph\n  A[x]\n").is_ok());
        assert!(parse_flowchart("flowchart TB\n  A[x]\n").is_ok());
        let lr = parse_flowchart("graph LR\n  A[x]\n").expect("LR parses");
        assert_eq!(lr.direction(), FlowDirection::LeftRight);

        assert_eq!(
            parse_flowchart("sequenceDiagram\n"),
            Err(MermaidFlowchartParseError::MissingHeader)
        );
        assert_eq!(parse_flowchart(""), Err(MermaidFlowchartParseError::MissingHeader));
        assert!(matches!(
            parse_flowchart("graph RL\n"),
            Err(MermaidFlowchartParseError::InvalidDirection { .. })
        ));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let ast = parse_flowchart("%% leading comment\n\ngraph TD\n  %% inner\n  A[x]\n")
            .expect("comments are fine");
        assert_eq!(ast.nodes().len(), 1);
    }

    #[test]
    fn dangling_edge_endpoints_become_implicit_nodes() {
        let ast = parse_flowchart("graph TD\n  A[Start]\n  A --> Ghost\n").expect("parses");
        let nodes = node_view(&ast);
        assert_eq!(nodes["Ghost"], ("Ghost".to_owned(), NodeShape::Rect));
    }

    #[test]
    fn redeclaring_a_node_keeps_the_last_declaration() {
        let ast = parse_flowchart("graph TD\n  A[First]\n  A{Second?}\n").expect("parses");
        let nodes = node_view(&ast);
        assert_eq!(nodes["A"], ("Second?".to_owned(), NodeShape::Diamond));
        assert_eq!(ast.nodes().len(), 1);
    }

    #[test]
    fn round_shape_is_accepted() {
        let ast = parse_flowchart("graph TD\n  A(Round)\n").expect("parses");
        assert_eq!(node_view(&ast)["A"], ("Round".to_owned(), NodeShape::Round));
    }

    #[test]
    fn quoted_empty_label_is_allowed_but_bare_empty_is_not() {
        let ast = parse_flowchart("graph TD\n  A[\"\"]\n").expect("quoted empty parses");
        assert_eq!(node_view(&ast)["A"].0, "");

        assert!(matches!(
            parse_flowchart("graph TD\n  A[  ]\n"),
            Err(MermaidFlowchartParseError::EmptyNodeLabel { .. })
        ));
    }

    #[test]
    fn quoted_label_escapes_are_decoded() {
        let ast = parse_flowchart("graph TD\n  A[\"line\\nbreak \\\"q\\\" \\\\\"]\n")
            .expect("escapes parse");
        assert_eq!(node_view(&ast)["A"].0, "line\nbreak \"q\" \\");
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert!(matches!(
            parse_flowchart("graph TD\n  A[\"oops]\n"),
            Err(MermaidFlowchartParseError::UnterminatedQuote { .. })
        ));
    }

    #[test]
    fn edge_label_with_quoted_pipe_round_trips() {
        let ast = parse_flowchart("graph TD\n  A -->|\"a|b\"| B\n").expect("parses");
        assert_eq!(
            edge_view(&ast),
            vec![("A".to_owned(), "B".to_owned(), Some("a|b".to_owned()))]
        );
    }

    #[test]
    fn edge_chains_are_rejected() {
        assert!(matches!(
            parse_flowchart("graph TD\n  A --> B --> C\n"),
            Err(MermaidFlowchartParseError::UnsupportedSyntax { .. })
        ));
    }

    #[test]
    fn malformed_edges_are_rejected() {
        assert!(matches!(
            parse_flowchart("graph TD\n  --> B\n"),
            Err(MermaidFlowchartParseError::MalformedEdge { .. })
        ));
        assert!(matches!(
            parse_flowchart("graph TD\n  A -->\n"),
            Err(MermaidFlowchartParseError::MalformedEdge { .. })
        ));
        assert!(matches!(
            parse_flowchart("graph TD\n  A -->|Yes B\n"),
            Err(MermaidFlowchartParseError::MalformedEdge { .. })
        ));
        assert!(matches!(
            parse_flowchart("graph TD\n  A -->|| B\n"),
            Err(MermaidFlowchartParseError::EmptyEdgeLabel { .. })
        ));
    }

    #[test]
    fn invalid_node_ids_are_rejected() {
        assert!(matches!(
            parse_flowchart("graph TD\n  a-b[x]\n"),
            Err(MermaidFlowchartParseError::InvalidNodeId { .. })
        ));
    }

    #[test]
    fn trailing_junk_after_label_close_is_rejected() {
        assert!(matches!(
            parse_flowchart("graph TD\n  A[x]y\n"),
            Err(MermaidFlowchartParseError::InvalidNodeLabelSyntax { .. })
        ));
    }
}
