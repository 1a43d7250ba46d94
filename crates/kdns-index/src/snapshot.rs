//! JSON snapshots of cluster state.
//!
//! A snapshot is a plain dump of every object kind the index stores. It seeds
//! a [`ClusterState`](crate::ClusterState) for offline resolution and tests:
//!
//! ```json
//! {
//!   "namespaces": [{"name": "testns"}],
//!   "services": [{"name": "svc1", "namespace": "testns", "clusterIPs": ["10.0.0.1"]}],
//!   "endpoints": []
//! }
//! ```

use std::path::Path;

use kdns_objects::{
    Endpoints, MultiClusterEndpoints, Namespace, Node, Pod, Service, ServiceImport,
};
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};

/// Every object the index knows about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    /// Services.
    pub services: Vec<Service>,
    /// Endpoints objects, grouped under their service when loaded.
    pub endpoints: Vec<Endpoints>,
    /// Service imports.
    pub service_imports: Vec<ServiceImport>,
    /// Endpoints contributed by member clusters.
    pub multicluster_endpoints: Vec<MultiClusterEndpoints>,
    /// Namespaces.
    pub namespaces: Vec<Namespace>,
    /// Nodes.
    pub nodes: Vec<Node>,
    /// Pods.
    pub pods: Vec<Pod>,
}

impl Snapshot {
    /// Parses a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Serializes the snapshot to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
