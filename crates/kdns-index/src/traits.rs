//! The read interface the lookup engine consumes.

use std::net::IpAddr;

use kdns_objects::{
    Endpoints, MultiClusterEndpoints, Namespace, Node, Pod, Service, ServiceImport,
};

use crate::error::Result;

/// Indexed, read-only view of cluster state.
///
/// Every lookup is a synchronous in-memory read. Implementations must be safe
/// to call from many threads while a background writer applies updates, and
/// must never expose a partially applied object. Lookups that find nothing
/// return an empty result; errors are reserved for the store being unable to
/// serve the read at all.
pub trait ClusterIndex: Send + Sync {
    /// Returns true once the initial sync with the API server has completed.
    fn has_synced(&self) -> bool;

    /// Services named `name` in `namespace`.
    fn services_by_namespace_name(&self, namespace: &str, name: &str) -> Result<Vec<Service>>;

    /// Every endpoints object backing `name` in `namespace`, in stored order.
    fn endpoints_by_index(&self, namespace: &str, name: &str) -> Result<Vec<Endpoints>>;

    /// Service imports named `name` in `namespace`.
    fn service_imports_by_namespace_name(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Vec<ServiceImport>>;

    /// Every multi-cluster endpoints object backing `name` in `namespace`,
    /// in member cluster order.
    fn multicluster_endpoints_by_index(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Vec<MultiClusterEndpoints>>;

    /// Services with `ip` among their cluster IPs.
    fn services_by_ip(&self, ip: IpAddr) -> Result<Vec<Service>>;

    /// Endpoints objects with an address equal to `ip`.
    fn endpoints_by_ip(&self, ip: IpAddr) -> Result<Vec<Endpoints>>;

    /// Pods with pod IP `ip`.
    fn pods_by_ip(&self, ip: IpAddr) -> Result<Vec<Pod>>;

    /// Looks up a namespace.
    fn namespace_by_name(&self, name: &str) -> Result<Option<Namespace>>;

    /// Looks up a node.
    fn node_by_name(&self, name: &str) -> Result<Option<Node>>;
}
