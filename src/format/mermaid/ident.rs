// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramIdentError {
    Empty,
    InvalidChar { ch: char },
}

impl fmt::Display for DiagramIdentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("must not be empty"),
            Self::InvalidChar { ch } => write!(f, "contains invalid character: '{ch}'"),
        }
    }
}

/// Diagram identifiers are `[A-Za-z0-9_]+`. Emission and parsing share this
/// grammar; anything else never appears on the wire.
pub(super) fn validate_diagram_ident(ident: &str) -> Result<(), DiagramIdentError> {
    if ident.is_empty() {
        return Err(DiagramIdentError::Empty);
    }
    if let Some(ch) = ident.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
        return Err(DiagramIdentError::InvalidChar { ch });
    }
    Ok(())
}

/// Maps an arbitrary document id onto the identifier grammar: invalid
/// characters become `_`, an empty result becomes `n`, and collisions with
/// already-taken identifiers get numeric suffixes in encounter order.
pub(super) fn sanitize_diagram_ident(raw: &str, taken: &mut BTreeSet<String>) -> String {
    let mut base: String = raw
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if base.is_empty() {
        base.push('n');
    }

    let candidate = if taken.contains(&base) {
        let mut suffix = 2usize;
        loop {
            let numbered = format!("{base}_{suffix}");
            if !taken.contains(&numbered) {
                break numbered;
            }
            suffix += 1;
        }
    } else {
        base
    };

    taken.insert(candidate.clone());
    candidate
}
