// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Proteus: terminal flow-document editor with live diagram rendering.
//!
//! A flow document is plain JSON (`nodes` + `edges`). The TUI renders it live
//! as a Unicode diagram and exports JSON, SVG and PNG snapshots of it.

pub mod export;
pub mod format;
pub mod layout;
pub mod logging;
pub mod model;
pub mod render;
pub mod tui;
