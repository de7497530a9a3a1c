// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Discovery participant.
//!
//! [`DiscoveryNode`] wires the pieces of the discovery layer for one local
//! node: the graph cache, the graph guard condition, the advertiser and the
//! listener subscribed to the discovery topic.

use crate::advertiser::Advertiser;
use crate::codec::{PrefixCodec, TopicCodec};
use crate::condition::{ChangeNotifier, GuardCondition};
use crate::config::DiscoveryConfig;
use crate::error::{Error, Result};
use crate::graph::{GraphCache, NamesAndTypes};
use crate::identity::Identity;
use crate::listener::NodeListener;
use crate::record::{EndpointKind, NodeRecord};
use crate::transport::{Substrate, SubscriptionId};
use std::sync::Arc;
use std::time::Duration;

/// A local node taking part in discovery.
///
/// Creating one subscribes to the discovery topic and publishes the initial
/// advertisement; dropping it removes the subscription. Peers keep the last
/// advertised record, there is no departure message.
pub struct DiscoveryNode {
    cache: Arc<GraphCache>,
    guard: Arc<GuardCondition>,
    advertiser: Arc<Advertiser>,
    substrate: Arc<dyn Substrate>,
    subscription: SubscriptionId,
}

impl DiscoveryNode {
    /// Join discovery with the `$ROS/...` prefix codec.
    pub fn new(
        name: &str,
        namespace: &str,
        substrate: Arc<dyn Substrate>,
        config: &DiscoveryConfig,
    ) -> Result<Self> {
        Self::with_codec(
            name,
            namespace,
            substrate,
            config,
            Arc::new(PrefixCodec::new()),
        )
    }

    pub fn with_codec(
        name: &str,
        namespace: &str,
        substrate: Arc<dyn Substrate>,
        config: &DiscoveryConfig,
        codec: Arc<dyn TopicCodec>,
    ) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::InvalidArgument("node name must not be empty".into()));
        }
        if !namespace.starts_with('/') {
            return Err(Error::InvalidArgument(format!(
                "namespace '{}' must start with '/'",
                namespace
            )));
        }
        config.validate()?;

        let discovery_topic = config.discovery_topic();
        let cache = Arc::new(GraphCache::new());
        let guard = Arc::new(GuardCondition::new());
        let notifier: Arc<dyn ChangeNotifier> = guard.clone();
        let advertiser = Arc::new(Advertiser::new(
            Identity::random(),
            NodeRecord::new(name, namespace),
            discovery_topic.as_str(),
            Arc::clone(&substrate),
            Arc::clone(&codec),
        ));
        let listener = Arc::new(
            NodeListener::new(
                Arc::clone(&cache),
                notifier,
                codec,
                &advertiser,
            )
            .with_announce_on_discovery(config.announce_on_discovery),
        );

        let subscription = substrate.subscribe(&discovery_topic, listener.into_handler())?;
        let node = Self {
            cache,
            guard,
            advertiser,
            substrate,
            subscription,
        };

        log::info!(
            "[node] {} '{}' in '{}' joined discovery on '{}'",
            node.identity(),
            name,
            namespace,
            discovery_topic
        );
        node.advertiser.advertise()?;
        Ok(node)
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        self.advertiser.identity()
    }

    /// Record currently advertised for this node.
    #[must_use]
    pub fn record(&self) -> NodeRecord {
        self.advertiser.record()
    }

    #[must_use]
    pub fn discovery_topic(&self) -> &str {
        self.advertiser.discovery_topic()
    }

    /// Republish the local advertisement.
    pub fn advertise(&self) -> Result<()> {
        self.advertiser.advertise()
    }

    // -- local endpoints ---------------------------------------------------

    pub fn add_endpoint<I, S>(
        &self,
        kind: EndpointKind,
        topic_name: &str,
        type_names: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.advertiser.add_endpoint(kind, topic_name, type_names)
    }

    pub fn remove_endpoint(&self, kind: EndpointKind, topic_name: &str) -> Result<()> {
        self.advertiser.remove_endpoint(kind, topic_name)
    }

    pub fn add_publisher(&self, topic_name: &str, type_name: &str) -> Result<()> {
        self.add_endpoint(EndpointKind::Publisher, topic_name, [type_name])
    }

    pub fn add_subscriber(&self, topic_name: &str, type_name: &str) -> Result<()> {
        self.add_endpoint(EndpointKind::Subscriber, topic_name, [type_name])
    }

    pub fn add_service(&self, service_name: &str, type_name: &str) -> Result<()> {
        self.add_endpoint(EndpointKind::Service, service_name, [type_name])
    }

    // -- graph queries -----------------------------------------------------

    /// Shared graph cache, for queries not forwarded below.
    #[must_use]
    pub fn graph(&self) -> &Arc<GraphCache> {
        &self.cache
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<NodeRecord> {
        self.cache.snapshot()
    }

    #[must_use]
    pub fn node_names(&self) -> Vec<(String, String)> {
        self.cache.node_names()
    }

    #[must_use]
    pub fn count_publishers(&self, topic_name: &str) -> usize {
        self.cache.count_publishers(topic_name)
    }

    #[must_use]
    pub fn count_subscribers(&self, topic_name: &str) -> usize {
        self.cache.count_subscribers(topic_name)
    }

    #[must_use]
    pub fn count_services(&self, service_name: &str) -> usize {
        self.cache.count_services(service_name)
    }

    #[must_use]
    pub fn topic_names_and_types(&self) -> NamesAndTypes {
        self.cache.topic_names_and_types()
    }

    #[must_use]
    pub fn service_names_and_types(&self) -> NamesAndTypes {
        self.cache.service_names_and_types()
    }

    #[must_use]
    pub fn endpoints_by_node(
        &self,
        kind: EndpointKind,
        name: &str,
        namespace: &str,
    ) -> NamesAndTypes {
        self.cache.endpoints_by_node(kind, name, namespace)
    }

    // -- change notification -----------------------------------------------

    /// Guard condition triggered on every graph change.
    #[must_use]
    pub fn graph_guard(&self) -> Arc<GuardCondition> {
        Arc::clone(&self.guard)
    }

    /// Block until the graph changes or `timeout` elapses, consuming the
    /// trigger. Returns `true` if a change was observed.
    pub fn wait_for_graph_change(&self, timeout: Option<Duration>) -> bool {
        self.guard.wait(timeout) && self.guard.take_trigger()
    }
}

impl Drop for DiscoveryNode {
    fn drop(&mut self) {
        if let Err(err) = self.substrate.unsubscribe(self.subscription) {
            log::warn!(
                "[node] {} failed to leave discovery: {}",
                self.identity(),
                err
            );
        }
    }
}

impl std::fmt::Debug for DiscoveryNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryNode")
            .field("identity", &self.identity())
            .field("subscription", &self.subscription)
            .field("known_nodes", &self.cache.len())
            .finish_non_exhaustive()
    }
}
