// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write as _;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use tidewalk::config::TidewalkConfig;
use tidewalk::dom::Document;
use tidewalk::handle::RenderedDiagram;
use tidewalk::model::{DiagramType, TargetDescriptor};
use tidewalk::resolve::TargetResolver;
use tidewalk::strategy::StrategyRegistry;

/// Mindmap-shaped markup: `n` label groups, every tenth one repeating an earlier label.
fn label_svg(n: usize) -> String {
    let mut svg = String::from(r#"<svg xmlns="http://www.w3.org/2000/svg"><g class="mindmap-nodes">"#);
    for i in 0..n {
        let label = if i % 10 == 9 { format!("Topic {}", i - 9) } else { format!("Topic {i}") };
        let _ = write!(
            svg,
            r#"<g class="mindmap-node section-{s}" transform="translate({x}, {y})"><rect width="80" height="30"/><g class="label"><text>{label}</text></g></g>"#,
            s = i % 8,
            x = (i % 40) * 90,
            y = (i / 40) * 40,
        );
    }
    svg.push_str("</g></svg>");
    svg
}

/// Flowchart-shaped markup: `n` nodes chained by `n - 1` links.
fn flowchart_svg(n: usize) -> String {
    let mut svg = String::from(r#"<svg xmlns="http://www.w3.org/2000/svg"><g class="root"><g class="edgePaths">"#);
    for i in 1..n {
        let _ = write!(
            svg,
            r#"<path id="L_N{a}_N{b}_0" class="flowchart-link" d="M{x1},20L{x2},20"/>"#,
            a = i - 1,
            b = i,
            x1 = (i - 1) * 100 + 80,
            x2 = i * 100,
        );
    }
    svg.push_str(r#"</g><g class="nodes">"#);
    for i in 0..n {
        let _ = write!(
            svg,
            r#"<g class="node default" id="flowchart-N{i}-{i}" transform="translate({x}, 20)"><rect x="-40" y="-20" width="80" height="40"/><g class="label"><text>N{i}</text></g></g>"#,
            x = i * 100 + 40,
        );
    }
    svg.push_str("</g></g></svg>");
    svg
}

// Benchmark identity (keep stable):
// - Group names in this file: `extract.label`, `extract.structured`, `resolve.node`
// - Case IDs: `small`, `large`.
fn benches_extract(c: &mut Criterion) {
    let config = TidewalkConfig::default();
    let registry = StrategyRegistry::with_builtin_strategies(&config);

    {
        let mut group = c.benchmark_group("extract.label");
        let strategy = registry.get_or_default(DiagramType::Mindmap).expect("mindmap strategy");

        for (case_id, n) in [("small", 50), ("large", 450)] {
            let doc = Document::parse(&label_svg(n)).expect("label fixture");
            group.throughput(Throughput::Elements(n as u64));
            let strategy = Arc::clone(&strategy);
            group.bench_function(case_id, move |b| {
                b.iter(|| black_box(strategy.extract_node_ids(black_box(&doc)).len()))
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("extract.structured");
        let strategy = registry.get_or_default(DiagramType::Flowchart).expect("flowchart strategy");

        for (case_id, n) in [("small", 50), ("large", 1000)] {
            let doc = Document::parse(&flowchart_svg(n)).expect("flowchart fixture");
            group.throughput(Throughput::Elements(n as u64));
            let strategy = Arc::clone(&strategy);
            group.bench_function(case_id, move |b| {
                b.iter(|| black_box(strategy.extract_node_ids(black_box(&doc)).len()))
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("resolve.node");
        let resolver = TargetResolver::new(Arc::new(registry.clone()));

        for (case_id, n) in [("small", 50), ("large", 1000)] {
            let diagram = RenderedDiagram::new("flowchart LR", &flowchart_svg(n)).expect("diagram");
            let target = TargetDescriptor::node(format!("N{}", n - 1)).expect("target");
            let resolver = resolver.clone();
            group.bench_function(case_id, move |b| {
                b.iter(|| {
                    let resolution = resolver.resolve(&diagram, black_box(&target)).expect("resolve");
                    black_box(resolution.elements().len())
                })
            });
        }

        group.finish();
    }
}

criterion_group!(benches, benches_extract);
criterion_main!(benches);
