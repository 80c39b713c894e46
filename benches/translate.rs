// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use proteus::format::mermaid::document_to_mermaid;

mod fixtures;
mod profiler;

// Benchmark identity (keep stable):
// - Group names in this file: `format.document_to_mermaid`, `format.pretty_json`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time (e.g. `small`, `medium_dense`, `large_long_labels`).
// - If implementations move/deduplicate, update the wiring but do not rename
//   group or case IDs.
fn benches_translate(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("format.document_to_mermaid");

        for case in [
            fixtures::flow::Case::Small,
            fixtures::flow::Case::MediumDense,
            fixtures::flow::Case::LargeLongLabels,
        ] {
            let document = fixtures::flow::fixture(case);
            let elements = (document.nodes.len() + document.edges.len()) as u64;
            group.throughput(Throughput::Elements(elements));
            group.bench_function(case.id(), move |b| {
                b.iter(|| {
                    let mermaid = document_to_mermaid(black_box(&document));
                    black_box(mermaid.len())
                })
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("format.pretty_json");

        for case in [
            fixtures::flow::Case::Small,
            fixtures::flow::Case::MediumDense,
            fixtures::flow::Case::LargeLongLabels,
        ] {
            let document = fixtures::flow::fixture(case);
            let elements = (document.nodes.len() + document.edges.len()) as u64;
            group.throughput(Throughput::Elements(elements));
            group.bench_function(case.id(), move |b| {
                b.iter(|| {
                    let json = black_box(&document).to_pretty_json();
                    black_box(json.len())
                })
            });
        }

        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_translate
}
criterion_main!(benches);
