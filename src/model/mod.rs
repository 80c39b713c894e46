// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: the editable JSON document and the flowchart AST it
//! renders through.

pub mod document;
pub mod flow_ast;
pub mod ids;

pub use document::{pretty_json_value, Document, DocumentEdge, DocumentNode, DocumentParseError};
pub use flow_ast::{FlowDirection, FlowEdge, FlowNode, FlowchartAst, NodeShape};
pub use ids::{Id, IdError, NodeId};
