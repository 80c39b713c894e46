// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout for flowcharts.
//!
//! Computes layered node placement; edge geometry is derived from the
//! placements by the renderers.

pub mod flowchart;

pub use flowchart::{layout_flowchart, FlowNodePlacement, FlowchartLayout};
