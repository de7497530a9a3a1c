// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pub/sub substrate boundary.
//!
//! Discovery only needs three primitives from the transport: publish a
//! message under a set of topics, subscribe a callback to a topic, and tell
//! publications apart by identity. [`Substrate`] captures exactly that.
//! [`LoopbackBus`] is an intra-process implementation used to run several
//! participants inside one process.

use crate::error::{Error, Result};
use crate::identity::Identity;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A message as seen by subscribers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Publication {
    /// Identity of the publication object that sent the message. Stable
    /// across re-publishes of the same publication.
    pub id: Identity,
    pub topics: Vec<String>,
    pub payload: Vec<u8>,
}

impl Publication {
    pub fn new(id: Identity, topics: Vec<String>) -> Self {
        Self {
            id,
            topics,
            payload: Vec::new(),
        }
    }
}

/// Callback invoked by the substrate for every matching publication.
///
/// May run on any thread, possibly concurrently with itself.
pub type PublicationHandler = Arc<dyn Fn(&Publication) + Send + Sync>;

/// Identifier returned by [`Substrate::subscribe`].
pub type SubscriptionId = u64;

/// Minimal pub/sub transport consumed by the discovery layer.
pub trait Substrate: Send + Sync {
    fn publish(&self, publication: &Publication) -> Result<()>;

    /// Deliver every publication carrying `topic` to `handler`.
    fn subscribe(&self, topic: &str, handler: PublicationHandler) -> Result<SubscriptionId>;

    fn unsubscribe(&self, id: SubscriptionId) -> Result<()>;
}

struct Subscription {
    topic: String,
    handler: PublicationHandler,
}

/// Intra-process substrate.
///
/// Publications are delivered synchronously on the publishing thread to every
/// subscription whose topic is one of the publication's topics. Handlers are
/// collected first and invoked after the subscription table lock is released,
/// so a handler may publish or subscribe re-entrantly.
#[derive(Default)]
pub struct LoopbackBus {
    subscriptions: RwLock<BTreeMap<SubscriptionId, Subscription>>,
    next_id: AtomicU64,
}

impl LoopbackBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }
}

impl Substrate for LoopbackBus {
    fn publish(&self, publication: &Publication) -> Result<()> {
        let handlers: Vec<PublicationHandler> = {
            let subscriptions = self.subscriptions.read();
            subscriptions
                .values()
                .filter(|sub| publication.topics.iter().any(|t| *t == sub.topic))
                .map(|sub| Arc::clone(&sub.handler))
                .collect()
        };

        log::trace!(
            "[loopback] publication {} -> {} subscriber(s)",
            publication.id,
            handlers.len()
        );

        for handler in handlers {
            handler(publication);
        }
        Ok(())
    }

    fn subscribe(&self, topic: &str, handler: PublicationHandler) -> Result<SubscriptionId> {
        if topic.is_empty() {
            return Err(Error::InvalidArgument("empty subscription topic".into()));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscriptions.write().insert(
            id,
            Subscription {
                topic: topic.to_string(),
                handler,
            },
        );
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        self.subscriptions
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::NotFound)
    }
}
