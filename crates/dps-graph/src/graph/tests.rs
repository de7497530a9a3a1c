// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use std::sync::Arc;
use std::thread;

fn id(seed: u8) -> Identity {
    let mut bytes = [0u8; 16];
    bytes[15] = seed;
    Identity::from_bytes(bytes)
}

fn publisher_node(name: &str, topic: &str, types: &[&str]) -> NodeRecord {
    NodeRecord::new(name, "/").with_endpoint(
        EndpointKind::Publisher,
        EndpointDescriptor::new(topic, types.iter().copied()),
    )
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn first_ingest_of_new_identity_changes_graph() {
    let cache = GraphCache::new();
    let outcome = cache.ingest(id(1), publisher_node("talker", "/chatter", &["T"]));

    assert_eq!(
        outcome,
        IngestOutcome {
            changed: true,
            newly_discovered: true,
        }
    );
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.version(), 1);
}

#[test]
fn default_record_for_new_identity_is_not_a_change() {
    let cache = GraphCache::new();
    let outcome = cache.ingest(id(1), NodeRecord::default());

    assert!(outcome.newly_discovered);
    assert!(!outcome.changed);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.version(), 0);
}

#[test]
fn ingest_is_idempotent() {
    let cache = GraphCache::new();
    let record = publisher_node("talker", "/chatter", &["T"]);

    assert!(cache.ingest(id(1), record.clone()).changed);
    let before = cache.snapshot();

    let outcome = cache.ingest(id(1), record);
    assert!(!outcome.changed);
    assert!(!outcome.newly_discovered);
    assert_eq!(cache.snapshot(), before);
    assert_eq!(cache.version(), 1);
}

#[test]
fn different_record_for_same_identity_is_a_change() {
    let cache = GraphCache::new();
    let r1 = publisher_node("talker", "/chatter", &["T"]);
    let r2 = publisher_node("talker", "/chatter", &["T", "U"]);

    cache.ingest(id(1), r1);
    let outcome = cache.ingest(id(1), r2.clone());

    assert!(outcome.changed);
    assert!(!outcome.newly_discovered);
    assert_eq!(cache.get(&id(1)), Some(r2));
}

#[test]
fn other_identities_do_not_affect_change_detection() {
    let cache = GraphCache::new();
    let r1 = publisher_node("talker", "/chatter", &["T"]);
    let other = publisher_node("other", "/other", &["O"]);

    cache.ingest(id(1), r1.clone());
    assert!(cache.ingest(id(2), other).changed);
    assert!(!cache.ingest(id(1), r1).changed);
}

#[test]
fn record_is_replaced_wholesale() {
    let cache = GraphCache::new();
    let full = publisher_node("talker", "/chatter", &["T"]).with_endpoint(
        EndpointKind::Subscriber,
        EndpointDescriptor::new("/input", ["I"]),
    );
    let reduced = NodeRecord::new("talker", "/");

    cache.ingest(id(1), full);
    assert!(cache.ingest(id(1), reduced.clone()).changed);
    assert_eq!(cache.snapshot(), vec![reduced]);
    assert_eq!(cache.count_subscribers("/input"), 0);
}

#[test]
fn count_aggregates_across_nodes() {
    let cache = GraphCache::new();
    cache.ingest(id(1), publisher_node("a1", "a", &[]));
    cache.ingest(id(2), publisher_node("a2", "a", &[]));
    cache.ingest(id(3), publisher_node("b1", "b", &[]));

    assert_eq!(cache.count_endpoints(EndpointKind::Publisher, "a"), 2);
    assert_eq!(cache.count_endpoints(EndpointKind::Publisher, "b"), 1);
    assert_eq!(cache.count_publishers("c"), 0);
    assert_eq!(cache.count_subscribers("a"), 0);
}

#[test]
fn count_includes_duplicates_within_one_node() {
    let cache = GraphCache::new();
    let record = NodeRecord::new("n", "/")
        .with_endpoint(EndpointKind::Service, EndpointDescriptor::new("/srv", ["S"]))
        .with_endpoint(EndpointKind::Service, EndpointDescriptor::new("/srv", ["S"]));
    cache.ingest(id(1), record);

    assert_eq!(cache.count_services("/srv"), 2);
}

#[test]
fn topic_types_are_unioned_across_nodes() {
    let cache = GraphCache::new();
    cache.ingest(id(1), publisher_node("n1", "x", &["T1"]));
    cache.ingest(id(2), publisher_node("n2", "x", &["T2"]));

    let names_and_types = cache.topic_names_and_types();
    assert_eq!(names_and_types.get("x"), Some(&set(&["T1", "T2"])));
}

#[test]
fn topic_names_and_types_covers_every_category() {
    let cache = GraphCache::new();
    let record = NodeRecord::new("n", "/")
        .with_endpoint(EndpointKind::Subscriber, EndpointDescriptor::new("/sub", ["S"]))
        .with_endpoint(EndpointKind::Publisher, EndpointDescriptor::new("/pub", ["P"]))
        .with_endpoint(EndpointKind::Service, EndpointDescriptor::new("/srv", ["V"]));
    cache.ingest(id(1), record);

    let names_and_types = cache.topic_names_and_types();
    assert_eq!(names_and_types.len(), 3);
    assert_eq!(names_and_types["/sub"], set(&["S"]));
    assert_eq!(names_and_types["/pub"], set(&["P"]));
    assert_eq!(names_and_types["/srv"], set(&["V"]));

    let services = cache.service_names_and_types();
    assert_eq!(services.len(), 1);
    assert_eq!(services["/srv"], set(&["V"]));
}

#[test]
fn endpoints_by_node_merges_repeated_topics() {
    let cache = GraphCache::new();
    let record = NodeRecord::new("talker", "/robot")
        .with_endpoint(EndpointKind::Publisher, EndpointDescriptor::new("/chatter", ["A"]))
        .with_endpoint(EndpointKind::Publisher, EndpointDescriptor::new("/chatter", ["B"]))
        .with_endpoint(EndpointKind::Publisher, EndpointDescriptor::new("/status", Vec::<String>::new()))
        .with_endpoint(EndpointKind::Subscriber, EndpointDescriptor::new("/cmd", ["C"]));
    cache.ingest(id(1), record);

    let publishers = cache.endpoints_by_node(EndpointKind::Publisher, "talker", "/robot");
    assert_eq!(publishers.len(), 2);
    assert_eq!(publishers["/chatter"], set(&["A", "B"]));
    assert!(publishers["/status"].is_empty());

    let subscribers = cache.endpoints_by_node(EndpointKind::Subscriber, "talker", "/robot");
    assert_eq!(subscribers.len(), 1);

    assert!(cache
        .endpoints_by_node(EndpointKind::Publisher, "talker", "/elsewhere")
        .is_empty());
    assert!(cache
        .endpoints_by_node(EndpointKind::Service, "talker", "/robot")
        .is_empty());
}

#[test]
fn endpoints_by_node_uses_first_match_in_identity_order() {
    let cache = GraphCache::new();
    // Inserted out of order on purpose: lookup follows identity order.
    cache.ingest(id(9), publisher_node("dup", "/late", &["Late"]));
    cache.ingest(id(2), publisher_node("dup", "/early", &["Early"]));

    let publishers = cache.endpoints_by_node(EndpointKind::Publisher, "dup", "/");
    assert_eq!(publishers.len(), 1);
    assert_eq!(publishers["/early"], set(&["Early"]));
}

#[test]
fn node_names_lists_every_record() {
    let cache = GraphCache::new();
    cache.ingest(id(2), NodeRecord::new("listener", "/ns"));
    cache.ingest(id(1), NodeRecord::new("talker", "/"));

    assert_eq!(
        cache.node_names(),
        vec![
            ("talker".to_string(), "/".to_string()),
            ("listener".to_string(), "/ns".to_string()),
        ]
    );
}

#[test]
fn empty_cache_answers_queries() {
    let cache = GraphCache::default();
    assert!(cache.is_empty());
    assert!(cache.snapshot().is_empty());
    assert!(cache.topic_names_and_types().is_empty());
    assert_eq!(cache.count_publishers("/x"), 0);
    assert_eq!(cache.get(&id(1)), None);
}

#[test]
fn concurrent_ingest_then_snapshot() {
    const WRITERS: usize = 8;
    const PER_WRITER: usize = 32;
    const READERS: usize = 8;

    let cache = Arc::new(GraphCache::new());

    let writers: Vec<_> = (0..WRITERS)
        .map(|w| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..PER_WRITER {
                    let record = publisher_node(&format!("node_{w}_{i}"), "/shared", &["T"]);
                    cache.ingest(Identity::random(), record);
                    // Readers racing with writers must never observe a torn map.
                    let _ = cache.count_publishers("/shared");
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().expect("writer thread");
    }

    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.snapshot().len())
        })
        .collect();
    for reader in readers {
        assert_eq!(reader.join().expect("reader thread"), WRITERS * PER_WRITER);
    }

    assert_eq!(cache.count_publishers("/shared"), WRITERS * PER_WRITER);
}
