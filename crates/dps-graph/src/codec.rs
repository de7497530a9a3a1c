// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Topic-name encoding of discovery advertisements.
//!
//! A participant advertises itself by publishing a single message whose
//! *topic list* carries its identity, name, namespace and endpoints. Each
//! piece of metadata becomes one topic string:
//!
//! ```text
//! $ROS/uuid:67e55044-10b1-426f-9247-bb680e5fe0c8
//! $ROS/namespace:robot1              ("/robot1", leading '/' stripped)
//! $ROS/name:talker
//! $ROS/publisher:chatter&types=std_msgs::msg::dds_::String_
//! $ROS/subscriber:parameter_events&types=A,B
//! $ROS/service:talker/get_parameters
//! ```
//!
//! The format is fixed and versionless: no escaping, no length prefixes.
//! Decoding matches prefixes anywhere in a topic string and ignores topics
//! it does not recognise so newer categories do not break older peers.

use crate::identity::Identity;
use crate::record::{EndpointDescriptor, EndpointKind, NodeRecord};

pub const IDENTITY_PREFIX: &str = "$ROS/uuid:";
pub const NAMESPACE_PREFIX: &str = "$ROS/namespace:";
pub const NAME_PREFIX: &str = "$ROS/name:";
pub const SUBSCRIBER_PREFIX: &str = "$ROS/subscriber:";
pub const PUBLISHER_PREFIX: &str = "$ROS/publisher:";
pub const SERVICE_PREFIX: &str = "$ROS/service:";

/// Separator between an endpoint's topic name and its type list.
pub const TYPES_MARKER: &str = "&types=";
/// Separator between type names.
pub const TYPE_SEPARATOR: char = ',';

/// Maps a node's identity and record to and from a set of topic strings.
pub trait TopicCodec: Send + Sync {
    /// Produce the advertisement topics for `record`.
    fn encode(&self, identity: &Identity, record: &NodeRecord) -> Vec<String>;

    /// Rebuild the advertised record. `None` when no usable identity topic
    /// is present; such an advertisement cannot be attributed to a peer.
    fn decode(&self, topics: &[String]) -> Option<(Identity, NodeRecord)>;
}

/// Codec prefix for an endpoint category.
#[must_use]
pub fn endpoint_prefix(kind: EndpointKind) -> &'static str {
    match kind {
        EndpointKind::Subscriber => SUBSCRIBER_PREFIX,
        EndpointKind::Publisher => PUBLISHER_PREFIX,
        EndpointKind::Service => SERVICE_PREFIX,
    }
}

/// The `$ROS/...` prefix format shared by every participant on the network.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrefixCodec;

impl PrefixCodec {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn encode_endpoint(kind: EndpointKind, endpoint: &EndpointDescriptor) -> String {
        let mut topic = String::from(endpoint_prefix(kind));
        topic.push_str(strip_root(&endpoint.topic_name));
        if !endpoint.type_names.is_empty() {
            topic.push_str(TYPES_MARKER);
            topic.push_str(&endpoint.type_names.join(","));
        }
        topic
    }

    /// Parse the remainder of an endpoint topic (text after the prefix).
    fn decode_endpoint(remainder: &str) -> EndpointDescriptor {
        let (name, types) = match remainder.find(TYPES_MARKER) {
            Some(end) => (
                &remainder[..end],
                Some(&remainder[end + TYPES_MARKER.len()..]),
            ),
            None => (remainder, None),
        };

        // A trailing separator yields an empty trailing type; peers rely on
        // the list being taken verbatim.
        let type_names = types
            .map(|list| list.split(TYPE_SEPARATOR).map(String::from).collect())
            .unwrap_or_default();

        EndpointDescriptor {
            topic_name: with_root(name),
            type_names,
        }
    }
}

impl TopicCodec for PrefixCodec {
    fn encode(&self, identity: &Identity, record: &NodeRecord) -> Vec<String> {
        let endpoint_count = record.all_endpoints().count();
        let mut topics = Vec::with_capacity(3 + endpoint_count);

        topics.push(format!("{IDENTITY_PREFIX}{identity}"));
        topics.push(format!("{NAMESPACE_PREFIX}{}", strip_root(&record.namespace)));
        topics.push(format!("{NAME_PREFIX}{}", record.name));

        for kind in EndpointKind::ALL {
            for endpoint in record.endpoints(kind) {
                topics.push(Self::encode_endpoint(kind, endpoint));
            }
        }

        topics
    }

    fn decode(&self, topics: &[String]) -> Option<(Identity, NodeRecord)> {
        let mut identity_text: Option<&str> = None;
        let mut record = NodeRecord::default();

        'topics: for topic in topics {
            if let Some(rest) = after_prefix(topic, IDENTITY_PREFIX) {
                identity_text = Some(rest);
                continue;
            }
            if let Some(rest) = after_prefix(topic, NAMESPACE_PREFIX) {
                record.namespace = with_root(rest);
                continue;
            }
            if let Some(rest) = after_prefix(topic, NAME_PREFIX) {
                record.name = rest.to_string();
                continue;
            }
            for kind in EndpointKind::ALL {
                if let Some(rest) = after_prefix(topic, endpoint_prefix(kind)) {
                    record
                        .endpoints_mut(kind)
                        .push(Self::decode_endpoint(rest));
                    continue 'topics;
                }
            }
            log::trace!("[codec] ignoring unrecognised topic '{}'", topic);
        }

        let Some(text) = identity_text else {
            log::debug!("[codec] advertisement without identity topic");
            return None;
        };

        match text.parse::<Identity>() {
            Ok(identity) => Some((identity, record)),
            Err(err) => {
                log::debug!("[codec] unparsable identity '{}': {}", text, err);
                None
            }
        }
    }
}

/// Text following the first occurrence of `prefix`, wherever it appears.
fn after_prefix<'a>(topic: &'a str, prefix: &str) -> Option<&'a str> {
    topic
        .find(prefix)
        .map(|pos| &topic[pos + prefix.len()..])
}

fn strip_root(name: &str) -> &str {
    name.strip_prefix('/').unwrap_or(name)
}

fn with_root(name: &str) -> String {
    let mut rooted = String::with_capacity(name.len() + 1);
    rooted.push('/');
    rooted.push_str(name);
    rooted
}
