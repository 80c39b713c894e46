// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mermaid-ish flowchart translation and parsing.

pub mod flowchart;
mod ident;

pub use flowchart::{
    document_to_mermaid, parse_flowchart, DiagramIdentError, MermaidFlowchartParseError,
};
