// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Discovery ingest: decode incoming advertisements into the graph cache.

use crate::advertiser::Advertiser;
use crate::codec::TopicCodec;
use crate::condition::ChangeNotifier;
use crate::graph::{GraphCache, IngestOutcome};
use crate::identity::Identity;
use crate::transport::{Publication, PublicationHandler};
use std::sync::{Arc, Weak};

/// Handles every publication received on the discovery topic.
///
/// Safe to call from several delivery threads at once; all shared state
/// lives in the [`GraphCache`].
pub struct NodeListener {
    cache: Arc<GraphCache>,
    notifier: Arc<dyn ChangeNotifier>,
    codec: Arc<dyn TopicCodec>,
    advertiser: Weak<Advertiser>,
    own_publication: Identity,
    announce_on_discovery: bool,
}

impl NodeListener {
    pub fn new(
        cache: Arc<GraphCache>,
        notifier: Arc<dyn ChangeNotifier>,
        codec: Arc<dyn TopicCodec>,
        advertiser: &Arc<Advertiser>,
    ) -> Self {
        Self {
            cache,
            notifier,
            codec,
            own_publication: advertiser.publication_id(),
            advertiser: Arc::downgrade(advertiser),
            announce_on_discovery: true,
        }
    }

    /// Answer newly discovered peers with our own advertisement (default on).
    #[must_use]
    pub fn with_announce_on_discovery(mut self, enabled: bool) -> Self {
        self.announce_on_discovery = enabled;
        self
    }

    /// Ingest one advertisement.
    ///
    /// Returns `None` when the publication could not be decoded and was
    /// dropped.
    pub fn on_publication(&self, publication: &Publication) -> Option<IngestOutcome> {
        let Some((identity, record)) = self.codec.decode(&publication.topics) else {
            log::debug!(
                "[listener] dropping undecodable advertisement from publication {}",
                publication.id
            );
            return None;
        };

        let outcome = self.cache.ingest(identity, record);

        if outcome.newly_discovered
            && self.announce_on_discovery
            && publication.id != self.own_publication
        {
            self.announce(identity);
        }

        if outcome.changed {
            if let Err(err) = self.notifier.trigger() {
                log::error!("[listener] graph change notification failed: {}", err);
            }
        }

        Some(outcome)
    }

    /// Wrap this listener as a substrate subscription callback.
    pub fn into_handler(self: Arc<Self>) -> PublicationHandler {
        Arc::new(move |publication: &Publication| {
            let _ = self.on_publication(publication);
        })
    }

    fn announce(&self, peer: Identity) {
        let Some(advertiser) = self.advertiser.upgrade() else {
            return;
        };
        log::debug!(
            "[listener] discovered {}, announcing {}",
            peer,
            advertiser.identity()
        );
        if let Err(err) = advertiser.advertise() {
            log::error!("[listener] announcement to {} failed: {}", peer, err);
        }
    }
}
