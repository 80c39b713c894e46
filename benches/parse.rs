// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use proteus::format::mermaid::{document_to_mermaid, parse_flowchart};
use proteus::model::Document;

mod fixtures;
mod profiler;

// Benchmark identity (keep stable):
// - Group names in this file: `format.parse_document`, `format.parse_flowchart`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time (e.g. `small`, `medium_dense`, `large_long_labels`).
// - If implementations move/deduplicate, update the wiring but do not rename
//   group or case IDs.
fn benches_parse(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("format.parse_document");

        for case in [
            fixtures::flow::Case::Small,
            fixtures::flow::Case::MediumDense,
            fixtures::flow::Case::LargeLongLabels,
        ] {
            let document = fixtures::flow::fixture(case);
            let json = document.to_pretty_json();
            let edges = document.edges.len() as u64;
            group.throughput(Throughput::Elements(edges));
            group.bench_function(case.id(), move |b| {
                b.iter(|| {
                    let parsed = Document::from_json(black_box(&json)).expect("parse document");
                    black_box(fixtures::checksum_document(black_box(&parsed)))
                })
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("format.parse_flowchart");

        for case in [
            fixtures::flow::Case::Small,
            fixtures::flow::Case::MediumDense,
            fixtures::flow::Case::LargeLongLabels,
        ] {
            let document = fixtures::flow::fixture(case);
            let mmd = document_to_mermaid(&document);
            let edges = document.edges.len() as u64;
            group.throughput(Throughput::Elements(edges));
            group.bench_function(case.id(), move |b| {
                b.iter(|| {
                    let parsed = parse_flowchart(black_box(&mmd)).expect("parse_flowchart");
                    black_box(fixtures::checksum_flowchart(black_box(&parsed)))
                })
            });
        }

        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_parse
}
criterion_main!(benches);
