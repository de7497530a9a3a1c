// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Topic-encoded peer discovery and graph cache.
//!
//! Each participant announces itself by publishing one message on the
//! discovery topic. Its identity, node name, namespace and endpoints are not
//! carried in the payload but encoded into the message's topic list
//! ([`codec`]). Every participant decodes the advertisements it receives
//! into a [`GraphCache`] that answers graph queries (topic counts, names and
//! types, per-node endpoints) and triggers a [`GuardCondition`] whenever the
//! graph changes.
//!
//! # Quick Start
//!
//! ```
//! use dps_graph::{DiscoveryConfig, DiscoveryNode, LoopbackBus};
//! use std::sync::Arc;
//!
//! let bus = Arc::new(LoopbackBus::new());
//! let config = DiscoveryConfig::default();
//!
//! let talker = DiscoveryNode::new("talker", "/", bus.clone(), &config)?;
//! let listener = DiscoveryNode::new("listener", "/", bus.clone(), &config)?;
//!
//! talker.add_publisher("/chatter", "std_msgs::msg::dds_::String_")?;
//! assert_eq!(listener.count_publishers("/chatter"), 1);
//! # Ok::<(), dps_graph::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`codec`]: topic-name encoding of advertisements
//! - [`graph`]: the cache and its queries
//! - [`listener`] / [`advertiser`]: ingest and emission
//! - [`transport`]: the pub/sub boundary and an in-process bus
//! - [`node`]: a ready-wired participant
//! - [`config`] / [`logging`]: runtime configuration and log setup

pub mod advertiser;
pub mod codec;
pub mod condition;
pub mod config;
mod error;
pub mod graph;
pub mod identity;
pub mod listener;
pub mod logging;
pub mod node;
pub mod record;
pub mod transport;

pub use advertiser::Advertiser;
pub use codec::{PrefixCodec, TopicCodec};
pub use condition::{ChangeNotifier, GuardCondition};
pub use config::DiscoveryConfig;
pub use error::{Error, Result};
pub use graph::{GraphCache, IngestOutcome, NamesAndTypes};
pub use identity::Identity;
pub use listener::NodeListener;
pub use node::DiscoveryNode;
pub use record::{EndpointDescriptor, EndpointKind, NodeRecord};
pub use transport::{LoopbackBus, Publication, PublicationHandler, Substrate, SubscriptionId};
