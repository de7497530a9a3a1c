// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Graph Cache Benchmark
//!
//! Measures ingest of unchanged and changed advertisements and the cost of
//! the aggregate queries over a populated cache.

#![allow(clippy::uninlined_format_args)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dps_graph::{EndpointDescriptor, EndpointKind, GraphCache, Identity, NodeRecord};

const NODES: usize = 100;
const TOPICS_PER_NODE: usize = 10;

fn populated() -> (GraphCache, Vec<(Identity, NodeRecord)>) {
    let cache = GraphCache::new();
    let mut entries = Vec::with_capacity(NODES);
    for n in 0..NODES {
        let mut record = NodeRecord::new(format!("node_{}", n), "/");
        for t in 0..TOPICS_PER_NODE {
            record = record.with_endpoint(
                EndpointKind::Publisher,
                EndpointDescriptor::new(format!("/topic_{}", t), ["T"]),
            );
        }
        let identity = Identity::random();
        cache.ingest(identity, record.clone());
        entries.push((identity, record));
    }
    (cache, entries)
}

fn bench_ingest(c: &mut Criterion) {
    let (cache, entries) = populated();
    let (identity, record) = entries[NODES / 2].clone();

    c.bench_function("graph_ingest_unchanged", |b| {
        b.iter(|| black_box(cache.ingest(identity, record.clone())));
    });

    let changed = record
        .clone()
        .with_endpoint(EndpointKind::Subscriber, EndpointDescriptor::new("/extra", ["X"]));
    let mut flip = false;
    c.bench_function("graph_ingest_changed", |b| {
        b.iter(|| {
            flip = !flip;
            let next = if flip { &changed } else { &record };
            black_box(cache.ingest(identity, next.clone()))
        });
    });
}

fn bench_queries(c: &mut Criterion) {
    let (cache, _) = populated();

    c.bench_function("graph_count_publishers", |b| {
        b.iter(|| black_box(cache.count_publishers(black_box("/topic_5"))));
    });
    c.bench_function("graph_topic_names_and_types", |b| {
        b.iter(|| black_box(cache.topic_names_and_types()));
    });
    c.bench_function("graph_endpoints_by_node", |b| {
        b.iter(|| {
            black_box(cache.endpoints_by_node(EndpointKind::Publisher, "node_50", "/"))
        });
    });
}

criterion_group!(benches, bench_ingest, bench_queries);
criterion_main!(benches);
