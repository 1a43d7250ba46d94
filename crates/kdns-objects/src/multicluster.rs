//! Multi-cluster services (MCS) objects.

use serde::{Deserialize, Serialize};

use crate::endpoints::Endpoints;
use crate::object_key;
use crate::service::ServicePort;

/// How a service import is exposed across the cluster set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ServiceImportType {
    /// Cluster-set virtual IP.
    #[default]
    #[serde(rename = "ClusterSetIP")]
    ClusterSetIp,
    /// No virtual IP; endpoints of every member cluster are addressed directly.
    Headless,
}

/// A service imported into the cluster set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceImport {
    /// Service name.
    pub name: String,
    /// Namespace of the import.
    pub namespace: String,
    /// Import type.
    #[serde(rename = "type", default)]
    pub import_type: ServiceImportType,
    /// Cluster-set IPs in family order.
    #[serde(rename = "clusterIPs", alias = "ips", default)]
    pub cluster_ips: Vec<String>,
    /// Exposed ports.
    #[serde(default)]
    pub ports: Vec<ServicePort>,
}

impl ServiceImport {
    /// Creates a new service import builder.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ServiceImportBuilder {
        ServiceImportBuilder::new(name)
    }

    /// Returns the `namespace/name` index key.
    #[must_use]
    pub fn key(&self) -> String {
        object_key(&self.namespace, &self.name)
    }
}

/// Builder for service imports.
#[derive(Debug)]
pub struct ServiceImportBuilder {
    name: String,
    namespace: String,
    import_type: ServiceImportType,
    cluster_ips: Vec<String>,
    ports: Vec<ServicePort>,
}

impl ServiceImportBuilder {
    /// Creates a builder with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: "default".to_string(),
            import_type: ServiceImportType::ClusterSetIp,
            cluster_ips: Vec::new(),
            ports: Vec::new(),
        }
    }

    /// Sets the namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Appends a cluster-set IP.
    #[must_use]
    pub fn cluster_ip(mut self, ip: impl Into<String>) -> Self {
        self.cluster_ips.push(ip.into());
        self
    }

    /// Marks the import headless.
    #[must_use]
    pub fn headless(mut self) -> Self {
        self.import_type = ServiceImportType::Headless;
        self.cluster_ips.clear();
        self
    }

    /// Adds a port.
    #[must_use]
    pub fn port(mut self, port: ServicePort) -> Self {
        self.ports.push(port);
        self
    }

    /// Builds the service import.
    #[must_use]
    pub fn build(self) -> ServiceImport {
        ServiceImport {
            name: self.name,
            namespace: self.namespace,
            import_type: self.import_type,
            cluster_ips: self.cluster_ips,
            ports: self.ports,
        }
    }
}

/// Endpoints contributed to a service import by one member cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiClusterEndpoints {
    /// The endpoints themselves.
    #[serde(flatten)]
    pub endpoints: Endpoints,
    /// Member cluster the endpoints come from.
    pub cluster_id: String,
}

impl MultiClusterEndpoints {
    /// Tags `endpoints` with the member cluster `cluster_id`.
    #[must_use]
    pub fn new(cluster_id: impl Into<String>, endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            cluster_id: cluster_id.into(),
        }
    }

    /// Returns the `namespace/service` grouping key.
    #[must_use]
    pub fn index(&self) -> String {
        self.endpoints.index()
    }
}
