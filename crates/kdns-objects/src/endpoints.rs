//! Endpoints objects.
//!
//! A logical service may be backed by several endpoints objects (slices).
//! Every slice records the service it belongs to; [`Endpoints::index`] is the
//! shared `namespace/service` key the slices are grouped under.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::object_key;
use crate::service::ServicePort;

/// Port served by a set of endpoint addresses.
pub type EndpointPort = ServicePort;

/// A single backing address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointAddress {
    /// Address of the backend.
    pub ip: IpAddr,
    /// Stable hostname, set for pods with `spec.hostname` behind a headless service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Name of the pod backing this address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_ref_name: Option<String>,
    /// Node the backend runs on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
}

impl EndpointAddress {
    /// Creates an address with no hostname, pod or node.
    #[must_use]
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            hostname: None,
            target_ref_name: None,
            node_name: None,
        }
    }

    /// Sets the hostname.
    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Sets the backing pod name.
    #[must_use]
    pub fn with_pod_name(mut self, pod: impl Into<String>) -> Self {
        self.target_ref_name = Some(pod.into());
        self
    }

    /// Sets the node name.
    #[must_use]
    pub fn with_node_name(mut self, node: impl Into<String>) -> Self {
        self.node_name = Some(node.into());
        self
    }

    /// Returns the hostname if it is set and non-empty.
    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref().filter(|h| !h.is_empty())
    }

    /// Returns the pod name if it is set and non-empty.
    #[must_use]
    pub fn pod_name(&self) -> Option<&str> {
        self.target_ref_name.as_deref().filter(|p| !p.is_empty())
    }
}

/// Addresses sharing one set of ports.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EndpointSubset {
    /// Ready addresses.
    #[serde(default)]
    pub addresses: Vec<EndpointAddress>,
    /// Ports available on every address.
    #[serde(default)]
    pub ports: Vec<EndpointPort>,
}

impl EndpointSubset {
    /// Creates an empty subset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an address.
    #[must_use]
    pub fn address(mut self, address: EndpointAddress) -> Self {
        self.addresses.push(address);
        self
    }

    /// Adds a port.
    #[must_use]
    pub fn port(mut self, port: EndpointPort) -> Self {
        self.ports.push(port);
        self
    }
}

/// One endpoints object (or slice) of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    /// Object name, e.g. `svc1-slice1`.
    pub name: String,
    /// Namespace of the object.
    pub namespace: String,
    /// Name of the service this object backs.
    pub service_name: String,
    /// Address/port subsets in stored order.
    #[serde(default)]
    pub subsets: Vec<EndpointSubset>,
}

impl Endpoints {
    /// Creates a builder for a slice named `name` backing `service_name`.
    #[must_use]
    pub fn builder(name: impl Into<String>, service_name: impl Into<String>) -> EndpointsBuilder {
        EndpointsBuilder::new(name, service_name)
    }

    /// Returns the `namespace/service` key grouping every slice of the service.
    #[must_use]
    pub fn index(&self) -> String {
        object_key(&self.namespace, &self.service_name)
    }

    /// Iterates over every address in stored subset order.
    pub fn addresses(&self) -> impl Iterator<Item = &EndpointAddress> {
        self.subsets.iter().flat_map(|s| s.addresses.iter())
    }
}

/// Builder for endpoints objects.
#[derive(Debug)]
pub struct EndpointsBuilder {
    name: String,
    namespace: String,
    service_name: String,
    subsets: Vec<EndpointSubset>,
}

impl EndpointsBuilder {
    /// Creates a builder.
    #[must_use]
    pub fn new(name: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: "default".to_string(),
            service_name: service_name.into(),
            subsets: Vec::new(),
        }
    }

    /// Sets the namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Adds a subset.
    #[must_use]
    pub fn subset(mut self, subset: EndpointSubset) -> Self {
        self.subsets.push(subset);
        self
    }

    /// Builds the endpoints object.
    #[must_use]
    pub fn build(self) -> Endpoints {
        Endpoints {
            name: self.name,
            namespace: self.namespace,
            service_name: self.service_name,
            subsets: self.subsets,
        }
    }
}
