//! Minimal identity records for namespaces, nodes and pods.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// A namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    /// Namespace name.
    pub name: String,
}

impl Namespace {
    /// Creates a namespace record.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node name.
    pub name: String,
}

impl Node {
    /// Creates a node record.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A pod, as far as pod A records care.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    /// Pod name.
    pub name: String,
    /// Namespace of the pod.
    pub namespace: String,
    /// Pod IP.
    pub pod_ip: IpAddr,
    /// Set once the pod has a deletion timestamp.
    #[serde(default)]
    pub deleting: bool,
}

impl Pod {
    /// Creates a running pod record.
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, pod_ip: IpAddr) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            pod_ip,
            deleting: false,
        }
    }
}
