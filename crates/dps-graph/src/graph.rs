// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Graph cache fed by discovery advertisements.
//!
//! One record per participant identity, replaced wholesale each time that
//! participant advertises. Entries are never evicted: the advertisement
//! protocol has no departure message and no lease.

use crate::identity::Identity;
use crate::record::{EndpointDescriptor, EndpointKind, NodeRecord};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

/// Topic name -> every type name advertised for it.
pub type NamesAndTypes = BTreeMap<String, BTreeSet<String>>;

/// Result of [`GraphCache::ingest`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IngestOutcome {
    /// The stored record differs from the one it replaced.
    pub changed: bool,
    /// No record existed for this identity before the call.
    pub newly_discovered: bool,
}

#[derive(Default)]
struct GraphState {
    version: u64,
    nodes: BTreeMap<Identity, NodeRecord>,
}

impl GraphState {
    fn find_node(&self, name: &str, namespace: &str) -> Option<&NodeRecord> {
        self.nodes
            .values()
            .find(|node| node.name == name && node.namespace == namespace)
    }
}

/// Tracks discovered participants to power graph queries (nodes/topics/types).
///
/// A single reader-writer lock guards the whole map. Ingest takes it
/// exclusively, every query takes it shared for its full duration. Nothing
/// running under the lock performs I/O or calls back into the caller.
pub struct GraphCache {
    state: RwLock<GraphState>,
}

impl GraphCache {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(GraphState::default()),
        }
    }

    /// Store `record` as the current state of `identity`.
    ///
    /// The previous record (an empty default one for unknown identities) is
    /// compared structurally with the new one; the new record replaces it
    /// regardless. Last writer wins, there is no version tie-break.
    pub fn ingest(&self, identity: Identity, record: NodeRecord) -> IngestOutcome {
        let mut guard = self.state.write();

        let changed = guard.nodes.get(&identity).map_or_else(
            || record != NodeRecord::default(),
            |previous| *previous != record,
        );
        if changed {
            guard.version += 1;
            log::debug!(
                "[graph] node {} '{}' in '{}' updated, version={}",
                identity,
                record.name,
                record.namespace,
                guard.version
            );
        }

        let newly_discovered = guard.nodes.insert(identity, record).is_none();

        IngestOutcome {
            changed,
            newly_discovered,
        }
    }

    /// Point-in-time copy of every cached record, in identity order.
    pub fn snapshot(&self) -> Vec<NodeRecord> {
        let guard = self.state.read();
        guard.nodes.values().cloned().collect()
    }

    /// Current record for a single identity.
    pub fn get(&self, identity: &Identity) -> Option<NodeRecord> {
        self.state.read().nodes.get(identity).cloned()
    }

    /// Number of times an ingest changed the graph.
    pub fn version(&self) -> u64 {
        self.state.read().version
    }

    pub fn len(&self) -> usize {
        self.state.read().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().nodes.is_empty()
    }

    /// `(name, namespace)` of every cached node, in identity order.
    pub fn node_names(&self) -> Vec<(String, String)> {
        let guard = self.state.read();
        guard
            .nodes
            .values()
            .map(|node| (node.name.clone(), node.namespace.clone()))
            .collect()
    }

    /// Count endpoints of `kind` whose topic name equals `topic_name`, across
    /// all cached nodes.
    pub fn count_endpoints(&self, kind: EndpointKind, topic_name: &str) -> usize {
        let guard = self.state.read();
        guard
            .nodes
            .values()
            .map(|node| {
                node.endpoints(kind)
                    .iter()
                    .filter(|endpoint| endpoint.topic_name == topic_name)
                    .count()
            })
            .sum()
    }

    pub fn count_subscribers(&self, topic_name: &str) -> usize {
        self.count_endpoints(EndpointKind::Subscriber, topic_name)
    }

    pub fn count_publishers(&self, topic_name: &str) -> usize {
        self.count_endpoints(EndpointKind::Publisher, topic_name)
    }

    pub fn count_services(&self, topic_name: &str) -> usize {
        self.count_endpoints(EndpointKind::Service, topic_name)
    }

    /// Topics and types of one node's endpoints of `kind`.
    ///
    /// Nothing prevents two participants from advertising the same
    /// `(name, namespace)`; the first one in identity order is used. An
    /// unknown node yields an empty map.
    pub fn endpoints_by_node(
        &self,
        kind: EndpointKind,
        name: &str,
        namespace: &str,
    ) -> NamesAndTypes {
        let guard = self.state.read();
        let mut names_and_types = NamesAndTypes::new();
        if let Some(node) = guard.find_node(name, namespace) {
            fold_endpoints(&mut names_and_types, node.endpoints(kind));
        }
        names_and_types
    }

    /// Every known topic (all categories, all nodes) with the union of the
    /// types advertised for it.
    pub fn topic_names_and_types(&self) -> NamesAndTypes {
        let guard = self.state.read();
        let mut names_and_types = NamesAndTypes::new();
        for node in guard.nodes.values() {
            for kind in EndpointKind::ALL {
                fold_endpoints(&mut names_and_types, node.endpoints(kind));
            }
        }
        names_and_types
    }

    /// Same fold as [`topic_names_and_types`](Self::topic_names_and_types)
    /// restricted to services.
    pub fn service_names_and_types(&self) -> NamesAndTypes {
        let guard = self.state.read();
        let mut names_and_types = NamesAndTypes::new();
        for node in guard.nodes.values() {
            fold_endpoints(&mut names_and_types, &node.services);
        }
        names_and_types
    }
}

impl Default for GraphCache {
    fn default() -> Self {
        Self::new()
    }
}

fn fold_endpoints(names_and_types: &mut NamesAndTypes, endpoints: &[EndpointDescriptor]) {
    for endpoint in endpoints {
        names_and_types
            .entry(endpoint.topic_name.clone())
            .or_default()
            .extend(endpoint.type_names.iter().cloned());
    }
}

#[cfg(test)]
mod tests;
