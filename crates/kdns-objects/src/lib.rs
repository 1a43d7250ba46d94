//! # kdns-objects
//!
//! Immutable snapshots of the Kubernetes objects the kdns lookup engine reads.
//!
//! The objects here are the projection of the API server state that a DNS
//! engine cares about, nothing more:
//!
//! - **Services** - ClusterIP, headless and ExternalName services
//! - **Endpoints** - one or more slices per service, grouped by `namespace/service`
//! - **Service imports** - the multi-cluster (MCS) analogue of a service
//! - **Multi-cluster endpoints** - endpoints tagged with the member cluster they came from
//! - **Namespaces, nodes, pods** - minimal identity records
//!
//! Single-cluster and multi-cluster kinds share the [`ServiceLike`] and
//! [`EndpointsLike`] capability traits so lookup logic is written once.
//!
//! ```rust
//! use kdns_objects::{EndpointAddress, EndpointSubset, Endpoints, Service, ServicePort};
//!
//! let service = Service::builder("svc1")
//!     .namespace("testns")
//!     .cluster_ip("10.0.0.1")
//!     .port(ServicePort::tcp(80).with_name("http"))
//!     .build();
//! assert_eq!(service.key(), "testns/svc1");
//!
//! let endpoints = Endpoints::builder("svc1-slice1", "svc1")
//!     .namespace("testns")
//!     .subset(
//!         EndpointSubset::new()
//!             .address(EndpointAddress::new("172.0.0.1".parse().expect("valid IP address")).with_hostname("ep1a"))
//!             .port(ServicePort::tcp(80).with_name("http")),
//!     )
//!     .build();
//! assert_eq!(endpoints.index(), "testns/svc1");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod capability;
pub mod cluster;
pub mod endpoints;
pub mod error;
pub mod multicluster;
pub mod protocol;
pub mod service;

pub use capability::{EndpointsLike, ServiceKind, ServiceLike};
pub use cluster::{Namespace, Node, Pod};
pub use endpoints::{EndpointAddress, EndpointPort, EndpointSubset, Endpoints, EndpointsBuilder};
pub use error::{ObjectError, Result};
pub use multicluster::{
    MultiClusterEndpoints, ServiceImport, ServiceImportBuilder, ServiceImportType,
};
pub use protocol::Protocol;
pub use service::{CLUSTER_IP_NONE, Service, ServiceBuilder, ServicePort, ServiceType};

/// Builds the `namespace/name` key used to index services and group endpoints.
#[must_use]
pub fn object_key(namespace: &str, name: &str) -> String {
    format!("{namespace}/{name}")
}
