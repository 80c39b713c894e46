// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The editable flow document: the JSON value the user types.
//!
//! This is a wire-shape type (public fields, serde derives). It is re-parsed
//! from the editor buffer on every render cycle and never mutated in place.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub nodes: Vec<DocumentNode>,
    pub edges: Vec<DocumentEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEdge {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Document {
    pub fn from_json(text: &str) -> Result<Self, DocumentParseError> {
        serde_json::from_str(text).map_err(|source| DocumentParseError { source })
    }

    pub fn to_pretty_json(&self) -> String {
        // Serializing plain data types cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// The document the editor starts with.
    pub fn sample() -> Self {
        Self {
            nodes: vec![
                DocumentNode {
                    id: "A".to_owned(),
                    text: "User clicks".to_owned(),
                    image: None,
                    preview: None,
                },
                DocumentNode {
                    id: "B".to_owned(),
                    text: "Is logged in?".to_owned(),
                    image: None,
                    preview: None,
                },
                DocumentNode {
                    id: "C".to_owned(),
                    text: "Show dashboard".to_owned(),
                    image: None,
                    preview: None,
                },
                DocumentNode {
                    id: "D".to_owned(),
                    text: "Redirect to login".to_owned(),
                    image: None,
                    preview: None,
                },
            ],
            edges: vec![
                DocumentEdge {
                    from: "A".to_owned(),
                    to: "B".to_owned(),
                    label: None,
                },
                DocumentEdge {
                    from: "B".to_owned(),
                    to: "C".to_owned(),
                    label: Some("Yes".to_owned()),
                },
                DocumentEdge {
                    from: "B".to_owned(),
                    to: "D".to_owned(),
                    label: Some("No".to_owned()),
                },
            ],
        }
    }
}

/// Pretty-prints arbitrary JSON (two-space indent), for URL loads where the
/// fetched body need not be a valid [`Document`].
pub fn pretty_json_value(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[derive(Debug)]
pub struct DocumentParseError {
    source: serde_json::Error,
}

impl DocumentParseError {
    pub fn line(&self) -> usize {
        self.source.line()
    }

    pub fn column(&self) -> usize {
        self.source.column()
    }
}

impl fmt::Display for DocumentParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid document JSON: {}", self.source)
    }
}

impl std::error::Error for DocumentParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
