//! Capabilities shared by single-cluster and multi-cluster objects.
//!
//! Lookup code is generic over these traits so that services and service
//! imports (and endpoints and multi-cluster endpoints) go through the same
//! resolution path.

use crate::endpoints::{EndpointSubset, Endpoints};
use crate::multicluster::{MultiClusterEndpoints, ServiceImport, ServiceImportType};
use crate::service::{Service, ServicePort};

/// How a service-like object answers for its own name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind<'a> {
    /// Answers with its cluster (or cluster-set) IPs.
    ClusterIp,
    /// Answers with its endpoint addresses.
    Headless,
    /// Answers with an alias to the given name.
    ExternalName(&'a str),
}

/// Read access to a service or service import.
pub trait ServiceLike {
    /// Service name.
    fn name(&self) -> &str;

    /// Namespace.
    fn namespace(&self) -> &str;

    /// How the service answers.
    fn kind(&self) -> ServiceKind<'_>;

    /// Cluster IP literals in stored order.
    fn cluster_ips(&self) -> &[String];

    /// Exposed ports.
    fn ports(&self) -> &[ServicePort];
}

/// Read access to an endpoints object or multi-cluster endpoints object.
pub trait EndpointsLike {
    /// Name of the service the object backs.
    fn service_name(&self) -> &str;

    /// Namespace.
    fn namespace(&self) -> &str;

    /// Address/port subsets in stored order.
    fn subsets(&self) -> &[EndpointSubset];

    /// Member cluster, for multi-cluster endpoints.
    fn cluster_id(&self) -> Option<&str>;

    /// Returns true if the object backs `service` in `namespace`.
    fn backs(&self, namespace: &str, service: &str) -> bool {
        self.namespace() == namespace && self.service_name() == service
    }
}

impl ServiceLike for Service {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn kind(&self) -> ServiceKind<'_> {
        if self.is_external() {
            ServiceKind::ExternalName(self.external_name.as_deref().unwrap_or_default())
        } else if self.is_headless() {
            ServiceKind::Headless
        } else {
            ServiceKind::ClusterIp
        }
    }

    fn cluster_ips(&self) -> &[String] {
        &self.cluster_ips
    }

    fn ports(&self) -> &[ServicePort] {
        &self.ports
    }
}

impl ServiceLike for ServiceImport {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn kind(&self) -> ServiceKind<'_> {
        match self.import_type {
            ServiceImportType::ClusterSetIp => ServiceKind::ClusterIp,
            ServiceImportType::Headless => ServiceKind::Headless,
        }
    }

    fn cluster_ips(&self) -> &[String] {
        &self.cluster_ips
    }

    fn ports(&self) -> &[ServicePort] {
        &self.ports
    }
}

impl EndpointsLike for Endpoints {
    fn service_name(&self) -> &str {
        &self.service_name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn subsets(&self) -> &[EndpointSubset] {
        &self.subsets
    }

    fn cluster_id(&self) -> Option<&str> {
        None
    }
}

impl EndpointsLike for MultiClusterEndpoints {
    fn service_name(&self) -> &str {
        &self.endpoints.service_name
    }

    fn namespace(&self) -> &str {
        &self.endpoints.namespace
    }

    fn subsets(&self) -> &[EndpointSubset] {
        &self.endpoints.subsets
    }

    fn cluster_id(&self) -> Option<&str> {
        Some(&self.cluster_id)
    }
}
