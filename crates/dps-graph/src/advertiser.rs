// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Local node advertisement.
//!
//! The advertiser keeps the local node's record and republishes it, encoded
//! into topic names, every time it changes or a new peer needs to learn
//! about us.

use crate::codec::TopicCodec;
use crate::error::{Error, Result};
use crate::identity::Identity;
use crate::record::{EndpointDescriptor, EndpointKind, NodeRecord};
use crate::transport::{Publication, Substrate};
use parking_lot::Mutex;
use std::sync::Arc;

/// Publishes the local node's advertisement on the discovery topic.
pub struct Advertiser {
    identity: Identity,
    /// Stable id of the advertisement publication; the listener compares
    /// incoming publications against it to recognise our own echo.
    publication_id: Identity,
    discovery_topic: String,
    state: Mutex<LocalState>,
    substrate: Arc<dyn Substrate>,
    codec: Arc<dyn TopicCodec>,
}

struct LocalState {
    record: NodeRecord,
    /// Bumped on every mutation of `record`.
    generation: u64,
}

impl Advertiser {
    pub fn new(
        identity: Identity,
        record: NodeRecord,
        discovery_topic: impl Into<String>,
        substrate: Arc<dyn Substrate>,
        codec: Arc<dyn TopicCodec>,
    ) -> Self {
        Self {
            identity,
            publication_id: Identity::random(),
            discovery_topic: discovery_topic.into(),
            state: Mutex::new(LocalState {
                record,
                generation: 0,
            }),
            substrate,
            codec,
        }
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        self.identity
    }

    #[must_use]
    pub fn publication_id(&self) -> Identity {
        self.publication_id
    }

    #[must_use]
    pub fn discovery_topic(&self) -> &str {
        &self.discovery_topic
    }

    /// Copy of the record currently advertised.
    #[must_use]
    pub fn record(&self) -> NodeRecord {
        self.state.lock().record.clone()
    }

    /// Number of local record mutations so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Publish the current record.
    ///
    /// No lock is held while publishing: delivery may re-enter this
    /// advertiser (a peer answering with its own advertisement). When the
    /// record was mutated while a snapshot was in flight, the current record
    /// is published again, so the last publication of every concurrent
    /// caller is never older than the last mutation it observed.
    pub fn advertise(&self) -> Result<()> {
        loop {
            let (publication, generation) = {
                let state = self.state.lock();
                let mut topics = self.codec.encode(&self.identity, &state.record);
                topics.push(self.discovery_topic.clone());
                (
                    Publication::new(self.publication_id, topics),
                    state.generation,
                )
            };

            log::debug!(
                "[advertiser] {} advertising {} topic(s) on '{}' (generation {})",
                self.identity,
                publication.topics.len(),
                self.discovery_topic,
                generation
            );
            self.substrate.publish(&publication)?;

            if self.state.lock().generation == generation {
                return Ok(());
            }
            log::trace!(
                "[advertiser] {} record moved during publish, republishing",
                self.identity
            );
        }
    }

    /// Register one local endpoint and re-advertise.
    ///
    /// Every registration adds its own descriptor, so two publishers on the
    /// same topic count as two.
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
        validate_topic_name(topic_name)?;

        self.mutate(|record| {
            record
                .endpoints_mut(kind)
                .push(EndpointDescriptor::new(topic_name, type_names));
        });
        log::debug!("[advertiser] added {} '{}'", kind, topic_name);
        self.advertise()
    }

    /// Remove one local endpoint of `kind` on `topic_name` and re-advertise.
    pub fn remove_endpoint(&self, kind: EndpointKind, topic_name: &str) -> Result<()> {
        let removed = {
            let mut state = self.state.lock();
            let endpoints = state.record.endpoints_mut(kind);
            match endpoints.iter().position(|ep| ep.topic_name == topic_name) {
                Some(index) => {
                    endpoints.remove(index);
                    state.generation += 1;
                    true
                }
                None => false,
            }
        };

        if !removed {
            return Err(Error::NotFound);
        }
        log::debug!("[advertiser] removed {} '{}'", kind, topic_name);
        self.advertise()
    }

    fn mutate(&self, apply: impl FnOnce(&mut NodeRecord)) {
        let mut state = self.state.lock();
        apply(&mut state.record);
        state.generation += 1;
    }
}

/// Topic names are absolute: the codec strips the leading '/' on encode and
/// restores it on decode.
fn validate_topic_name(topic_name: &str) -> Result<()> {
    if topic_name.len() < 2 || !topic_name.starts_with('/') {
        return Err(Error::InvalidArgument(format!(
            "topic name '{}' must start with '/' and not be empty",
            topic_name
        )));
    }
    Ok(())
}

impl std::fmt::Debug for Advertiser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Advertiser")
            .field("identity", &self.identity)
            .field("publication_id", &self.publication_id)
            .field("discovery_topic", &self.discovery_topic)
            .finish_non_exhaustive()
    }
}
