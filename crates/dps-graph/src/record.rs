// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Node records as carried by discovery advertisements.

use std::fmt;

/// Namespace assumed when an advertisement carries none.
pub const DEFAULT_NAMESPACE: &str = "/";

/// Endpoint category of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EndpointKind {
    Subscriber,
    Publisher,
    Service,
}

impl EndpointKind {
    /// All categories, in advertisement order.
    pub const ALL: [EndpointKind; 3] = [
        EndpointKind::Subscriber,
        EndpointKind::Publisher,
        EndpointKind::Service,
    ];
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EndpointKind::Subscriber => "subscriber",
            EndpointKind::Publisher => "publisher",
            EndpointKind::Service => "service",
        };
        f.write_str(label)
    }
}

/// A single endpoint: topic name plus the type names advertised for it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EndpointDescriptor {
    pub topic_name: String,
    pub type_names: Vec<String>,
}

impl EndpointDescriptor {
    pub fn new<I, S>(topic_name: impl Into<String>, type_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topic_name: topic_name.into(),
            type_names: type_names.into_iter().map(Into::into).collect(),
        }
    }
}

/// Complete advertised state of one participant.
///
/// Equality is structural and order-sensitive for the endpoint lists, which
/// is what the graph cache relies on to detect changes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NodeRecord {
    pub name: String,
    pub namespace: String,
    pub subscribers: Vec<EndpointDescriptor>,
    pub publishers: Vec<EndpointDescriptor>,
    pub services: Vec<EndpointDescriptor>,
}

impl NodeRecord {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Endpoint list for a category.
    #[must_use]
    pub fn endpoints(&self, kind: EndpointKind) -> &[EndpointDescriptor] {
        match kind {
            EndpointKind::Subscriber => &self.subscribers,
            EndpointKind::Publisher => &self.publishers,
            EndpointKind::Service => &self.services,
        }
    }

    pub fn endpoints_mut(&mut self, kind: EndpointKind) -> &mut Vec<EndpointDescriptor> {
        match kind {
            EndpointKind::Subscriber => &mut self.subscribers,
            EndpointKind::Publisher => &mut self.publishers,
            EndpointKind::Service => &mut self.services,
        }
    }

    /// Builder-style helper, mostly for tests.
    #[must_use]
    pub fn with_endpoint(mut self, kind: EndpointKind, endpoint: EndpointDescriptor) -> Self {
        self.endpoints_mut(kind).push(endpoint);
        self
    }

    /// Iterate over every endpoint of every category.
    pub fn all_endpoints(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.subscribers
            .iter()
            .chain(self.publishers.iter())
            .chain(self.services.iter())
    }
}

impl Default for NodeRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            subscribers: Vec::new(),
            publishers: Vec::new(),
            services: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_namespace_is_root() {
        let record = NodeRecord::default();
        assert_eq!(record.namespace, "/");
        assert!(record.name.is_empty());
        assert_eq!(record.all_endpoints().count(), 0);
    }

    #[test]
    fn equality_is_order_sensitive() {
        let a = EndpointDescriptor::new("/a", ["T"]);
        let b = EndpointDescriptor::new("/b", ["T"]);

        let first = NodeRecord::new("n", "/")
            .with_endpoint(EndpointKind::Publisher, a.clone())
            .with_endpoint(EndpointKind::Publisher, b.clone());
        let second = NodeRecord::new("n", "/")
            .with_endpoint(EndpointKind::Publisher, b)
            .with_endpoint(EndpointKind::Publisher, a);

        assert_ne!(first, second);
    }

    #[test]
    fn type_order_matters_for_descriptors() {
        assert_ne!(
            EndpointDescriptor::new("/x", ["A", "B"]),
            EndpointDescriptor::new("/x", ["B", "A"])
        );
    }

    #[test]
    fn endpoints_selects_category() {
        let record = NodeRecord::new("n", "/ns")
            .with_endpoint(EndpointKind::Service, EndpointDescriptor::new("/srv", ["S"]));
        assert!(record.endpoints(EndpointKind::Publisher).is_empty());
        assert_eq!(record.endpoints(EndpointKind::Service).len(), 1);
    }
}
