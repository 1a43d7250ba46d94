//! In-memory cluster state.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};

use kdns_objects::{
    Endpoints, MultiClusterEndpoints, Namespace, Node, Pod, Service, ServiceImport, object_key,
};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{IndexError, Result};
use crate::snapshot::Snapshot;
use crate::traits::ClusterIndex;

/// Thread-safe in-memory cluster state.
///
/// Each object kind sits behind its own lock; every upsert or removal takes
/// that write lock exactly once, so readers observe an object either before or
/// after a change. Endpoints (and multi-cluster endpoints) are grouped by their
/// `namespace/service` index and kept in insertion order within a group.
#[derive(Debug, Default)]
pub struct ClusterState {
    /// Services indexed by `namespace/name`.
    services: RwLock<HashMap<String, Service>>,
    /// Endpoints slices grouped by `namespace/service`.
    endpoints: RwLock<HashMap<String, Vec<Endpoints>>>,
    /// Service imports indexed by `namespace/name`.
    service_imports: RwLock<HashMap<String, ServiceImport>>,
    /// Multi-cluster endpoints grouped by `namespace/service`.
    multicluster_endpoints: RwLock<HashMap<String, Vec<MultiClusterEndpoints>>>,
    namespaces: RwLock<HashMap<String, Namespace>>,
    nodes: RwLock<HashMap<String, Node>>,
    /// Pods indexed by `namespace/name`.
    pods: RwLock<HashMap<String, Pod>>,
    synced: AtomicBool,
}

impl ClusterState {
    /// Creates an empty, unsynced state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a synced state from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if any object in the snapshot has an invalid name.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let state = Self::new();

        for namespace in snapshot.namespaces {
            state.upsert_namespace(namespace);
        }
        for node in snapshot.nodes {
            state.upsert_node(node);
        }
        for service in snapshot.services {
            state.upsert_service(service)?;
        }
        for endpoints in snapshot.endpoints {
            state.upsert_endpoints(endpoints)?;
        }
        for import in snapshot.service_imports {
            state.upsert_service_import(import)?;
        }
        for mcep in snapshot.multicluster_endpoints {
            state.upsert_multicluster_endpoints(mcep)?;
        }
        for pod in snapshot.pods {
            state.upsert_pod(pod)?;
        }

        state.mark_synced();
        Ok(state)
    }

    /// Marks the initial sync as complete.
    pub fn mark_synced(&self) {
        self.synced.store(true, Ordering::Release);
    }

    // ==================== Services ====================

    /// Inserts or replaces a service.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or namespace is invalid.
    pub fn upsert_service(&self, service: Service) -> Result<()> {
        validate_name("service", &service.name)?;
        validate_name("namespace", &service.namespace)?;

        info!(
            service = %service.name,
            namespace = %service.namespace,
            kind = %service.service_type,
            "Upserted service"
        );

        self.services.write().insert(service.key(), service);
        Ok(())
    }

    /// Removes a service, returning it if it was present.
    pub fn remove_service(&self, namespace: &str, name: &str) -> Option<Service> {
        let removed = self.services.write().remove(&object_key(namespace, name));
        if removed.is_some() {
            info!(service = %name, namespace = %namespace, "Removed service");
        }
        removed
    }

    // ==================== Endpoints ====================

    /// Inserts or replaces an endpoints slice, keeping its position in the group.
    ///
    /// # Errors
    ///
    /// Returns an error if the name, service name or namespace is invalid.
    pub fn upsert_endpoints(&self, endpoints: Endpoints) -> Result<()> {
        validate_name("endpoints", &endpoints.name)?;
        validate_name("service", &endpoints.service_name)?;
        validate_name("namespace", &endpoints.namespace)?;

        debug!(
            endpoints = %endpoints.name,
            index = %endpoints.index(),
            addresses = endpoints.addresses().count(),
            "Upserted endpoints"
        );

        let mut groups = self.endpoints.write();
        let group = groups.entry(endpoints.index()).or_default();
        match group.iter_mut().find(|e| e.name == endpoints.name) {
            Some(existing) => *existing = endpoints,
            None => group.push(endpoints),
        }
        Ok(())
    }

    /// Removes an endpoints slice by namespace and object name.
    pub fn remove_endpoints(&self, namespace: &str, name: &str) -> Option<Endpoints> {
        let mut groups = self.endpoints.write();
        let removed = remove_from_groups(&mut groups, |e: &Endpoints| {
            e.namespace == namespace && e.name == name
        });
        if removed.is_some() {
            debug!(endpoints = %name, namespace = %namespace, "Removed endpoints");
        }
        removed
    }

    // ==================== Multi-cluster ====================

    /// Inserts or replaces a service import.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or namespace is invalid.
    pub fn upsert_service_import(&self, import: ServiceImport) -> Result<()> {
        validate_name("service import", &import.name)?;
        validate_name("namespace", &import.namespace)?;

        info!(
            service_import = %import.name,
            namespace = %import.namespace,
            "Upserted service import"
        );

        self.service_imports.write().insert(import.key(), import);
        Ok(())
    }

    /// Removes a service import.
    pub fn remove_service_import(&self, namespace: &str, name: &str) -> Option<ServiceImport> {
        self.service_imports
            .write()
            .remove(&object_key(namespace, name))
    }

    /// Inserts or replaces the endpoints one member cluster contributes.
    ///
    /// A slice is identified by its cluster and object name.
    ///
    /// # Errors
    ///
    /// Returns an error if any name or the cluster id is invalid.
    pub fn upsert_multicluster_endpoints(&self, mcep: MultiClusterEndpoints) -> Result<()> {
        validate_name("endpoints", &mcep.endpoints.name)?;
        validate_name("service", &mcep.endpoints.service_name)?;
        validate_name("namespace", &mcep.endpoints.namespace)?;
        validate_name("cluster", &mcep.cluster_id)?;

        debug!(
            endpoints = %mcep.endpoints.name,
            cluster = %mcep.cluster_id,
            index = %mcep.index(),
            "Upserted multi-cluster endpoints"
        );

        let mut groups = self.multicluster_endpoints.write();
        let group = groups.entry(mcep.index()).or_default();
        match group
            .iter_mut()
            .find(|e| e.cluster_id == mcep.cluster_id && e.endpoints.name == mcep.endpoints.name)
        {
            Some(existing) => *existing = mcep,
            None => group.push(mcep),
        }
        Ok(())
    }

    /// Removes the slice `name` contributed by `cluster_id`.
    pub fn remove_multicluster_endpoints(
        &self,
        cluster_id: &str,
        namespace: &str,
        name: &str,
    ) -> Option<MultiClusterEndpoints> {
        let mut groups = self.multicluster_endpoints.write();
        remove_from_groups(&mut groups, |e: &MultiClusterEndpoints| {
            e.cluster_id == cluster_id && e.endpoints.namespace == namespace && e.endpoints.name == name
        })
    }

    // ==================== Namespaces, nodes, pods ====================

    /// Inserts or replaces a namespace.
    pub fn upsert_namespace(&self, namespace: Namespace) {
        self.namespaces
            .write()
            .insert(namespace.name.clone(), namespace);
    }

    /// Removes a namespace.
    pub fn remove_namespace(&self, name: &str) -> Option<Namespace> {
        self.namespaces.write().remove(name)
    }

    /// Inserts or replaces a node.
    pub fn upsert_node(&self, node: Node) {
        self.nodes.write().insert(node.name.clone(), node);
    }

    /// Inserts or replaces a pod.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or namespace is invalid.
    pub fn upsert_pod(&self, pod: Pod) -> Result<()> {
        validate_name("pod", &pod.name)?;
        validate_name("namespace", &pod.namespace)?;

        self.pods
            .write()
            .insert(object_key(&pod.namespace, &pod.name), pod);
        Ok(())
    }

    /// Removes a pod.
    pub fn remove_pod(&self, namespace: &str, name: &str) -> Option<Pod> {
        self.pods.write().remove(&object_key(namespace, name))
    }

    // ==================== Export ====================

    /// Exports the current state as a snapshot.
    ///
    /// Objects are sorted by key so the export is stable; endpoints keep
    /// their order within a group.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            services: sorted_values(&self.services.read()),
            endpoints: sorted_groups(&self.endpoints.read()),
            service_imports: sorted_values(&self.service_imports.read()),
            multicluster_endpoints: sorted_groups(&self.multicluster_endpoints.read()),
            namespaces: sorted_values(&self.namespaces.read()),
            nodes: sorted_values(&self.nodes.read()),
            pods: sorted_values(&self.pods.read()),
        }
    }

    /// Gets index statistics.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            service_count: self.services.read().len(),
            endpoints_count: self.endpoints.read().values().map(Vec::len).sum(),
            service_import_count: self.service_imports.read().len(),
            multicluster_endpoints_count: self
                .multicluster_endpoints
                .read()
                .values()
                .map(Vec::len)
                .sum(),
            namespace_count: self.namespaces.read().len(),
            node_count: self.nodes.read().len(),
            pod_count: self.pods.read().len(),
        }
    }
}

impl ClusterIndex for ClusterState {
    fn has_synced(&self) -> bool {
        self.synced.load(Ordering::Acquire)
    }

    fn services_by_namespace_name(&self, namespace: &str, name: &str) -> Result<Vec<Service>> {
        let services = self.services.read();
        Ok(services
            .get(&object_key(namespace, name))
            .cloned()
            .into_iter()
            .collect())
    }

    fn endpoints_by_index(&self, namespace: &str, name: &str) -> Result<Vec<Endpoints>> {
        let groups = self.endpoints.read();
        Ok(groups
            .get(&object_key(namespace, name))
            .cloned()
            .unwrap_or_default())
    }

    fn service_imports_by_namespace_name(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Vec<ServiceImport>> {
        let imports = self.service_imports.read();
        Ok(imports
            .get(&object_key(namespace, name))
            .cloned()
            .into_iter()
            .collect())
    }

    fn multicluster_endpoints_by_index(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Vec<MultiClusterEndpoints>> {
        let groups = self.multicluster_endpoints.read();
        Ok(groups
            .get(&object_key(namespace, name))
            .cloned()
            .unwrap_or_default())
    }

    fn services_by_ip(&self, ip: IpAddr) -> Result<Vec<Service>> {
        let services = self.services.read();
        let mut matches: Vec<Service> = services
            .values()
            .filter(|s| {
                s.cluster_ips
                    .iter()
                    .any(|literal| literal.parse::<IpAddr>().is_ok_and(|parsed| parsed == ip))
            })
            .cloned()
            .collect();
        matches.sort_by_key(Service::key);
        Ok(matches)
    }

    fn endpoints_by_ip(&self, ip: IpAddr) -> Result<Vec<Endpoints>> {
        let groups = self.endpoints.read();
        let mut matches: Vec<Endpoints> = groups
            .values()
            .flatten()
            .filter(|e| e.addresses().any(|a| a.ip == ip))
            .cloned()
            .collect();
        matches.sort_by(|a, b| (a.index(), &a.name).cmp(&(b.index(), &b.name)));
        Ok(matches)
    }

    fn pods_by_ip(&self, ip: IpAddr) -> Result<Vec<Pod>> {
        let pods = self.pods.read();
        let mut matches: Vec<Pod> = pods.values().filter(|p| p.pod_ip == ip).cloned().collect();
        matches.sort_by(|a, b| (&a.namespace, &a.name).cmp(&(&b.namespace, &b.name)));
        Ok(matches)
    }

    fn namespace_by_name(&self, name: &str) -> Result<Option<Namespace>> {
        Ok(self.namespaces.read().get(name).cloned())
    }

    fn node_by_name(&self, name: &str) -> Result<Option<Node>> {
        Ok(self.nodes.read().get(name).cloned())
    }
}

/// Statistics about the cluster state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of services.
    pub service_count: usize,
    /// Number of endpoints objects across all groups.
    pub endpoints_count: usize,
    /// Number of service imports.
    pub service_import_count: usize,
    /// Number of multi-cluster endpoints objects.
    pub multicluster_endpoints_count: usize,
    /// Number of namespaces.
    pub namespace_count: usize,
    /// Number of nodes.
    pub node_count: usize,
    /// Number of pods.
    pub pod_count: usize,
}

fn remove_from_groups<T>(
    groups: &mut HashMap<String, Vec<T>>,
    matches: impl Fn(&T) -> bool,
) -> Option<T> {
    let (key, position) = groups
        .iter()
        .find_map(|(key, group)| group.iter().position(&matches).map(|pos| (key.clone(), pos)))?;

    let group = groups.get_mut(&key)?;
    let removed = group.remove(position);
    if group.is_empty() {
        groups.remove(&key);
    }
    Some(removed)
}

fn sorted_values<T: Clone>(map: &HashMap<String, T>) -> Vec<T> {
    let mut entries: Vec<(&String, &T)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries.into_iter().map(|(_, v)| v.clone()).collect()
}

fn sorted_groups<T: Clone>(map: &HashMap<String, Vec<T>>) -> Vec<T> {
    let mut entries: Vec<(&String, &Vec<T>)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
        .into_iter()
        .flat_map(|(_, group)| group.iter().cloned())
        .collect()
}

/// Validates an object name.
fn validate_name(kind: &'static str, name: &str) -> Result<()> {
    let invalid = |reason| IndexError::InvalidObject {
        kind,
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }

    if name.len() > 253 {
        return Err(invalid("name cannot exceed 253 characters"));
    }

    // Must start with alphanumeric
    if !name.chars().next().is_some_and(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid("name must start with an alphanumeric character"));
    }

    // Must contain only alphanumeric, hyphens, dots
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    {
        return Err(invalid(
            "name can only contain alphanumeric characters, hyphens, and dots",
        ));
    }

    Ok(())
}
