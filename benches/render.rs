// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use proteus::format::mermaid::{document_to_mermaid, parse_flowchart};
use proteus::layout::flowchart::layout_flowchart;
use proteus::model::FlowchartAst;
use proteus::render::flowchart::render_flowchart_text;
use proteus::render::svg::render_flowchart_svg;

mod fixtures;
mod profiler;

fn fixture_ast(case: fixtures::flow::Case) -> FlowchartAst {
    let document = fixtures::flow::fixture(case);
    parse_flowchart(&document_to_mermaid(&document)).expect("parse_flowchart")
}

// Benchmark identity (keep stable):
// - Group names in this file: `render.layout`, `render.text`, `render.svg`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time (e.g. `small`, `medium_dense`, `large_long_labels`).
// - If implementations move/deduplicate, update the wiring but do not rename
//   group or case IDs.
fn benches_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render.layout");
    for case in [
        fixtures::flow::Case::Small,
        fixtures::flow::Case::MediumDense,
        fixtures::flow::Case::LargeLongLabels,
    ] {
        let ast = fixture_ast(case);
        group.bench_function(case.id(), move |b| {
            b.iter(|| {
                let layout = layout_flowchart(black_box(&ast));
                black_box(layout.layers().len().wrapping_add(layout.node_placements().len()))
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("render.text");
    for case in [
        fixtures::flow::Case::Small,
        fixtures::flow::Case::MediumDense,
        fixtures::flow::Case::LargeLongLabels,
    ] {
        let ast = fixture_ast(case);
        group.bench_function(case.id(), move |b| {
            b.iter(|| {
                let layout = layout_flowchart(black_box(&ast));
                let rendered = render_flowchart_text(black_box(&ast), black_box(&layout))
                    .expect("render_flowchart_text");
                black_box(rendered.text.len().wrapping_add(rendered.labels.len()))
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("render.svg");
    for case in [
        fixtures::flow::Case::Small,
        fixtures::flow::Case::MediumDense,
        fixtures::flow::Case::LargeLongLabels,
    ] {
        let ast = fixture_ast(case);
        group.bench_function(case.id(), move |b| {
            b.iter(|| {
                let layout = layout_flowchart(black_box(&ast));
                let svg = render_flowchart_svg(black_box(&ast), black_box(&layout))
                    .expect("render_flowchart_svg");
                black_box(svg.len())
            })
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_render
}
criterion_main!(benches);
