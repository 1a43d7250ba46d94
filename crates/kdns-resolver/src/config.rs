//! Resolver configuration.
//!
//! Loaded from JSON:
//!
//! ```json
//! {
//!   "zones": ["cluster.local.", "clusterset.local."],
//!   "multicluster_zones": ["clusterset.local."],
//!   "endpoint_pod_names": false,
//!   "pods": "verified",
//!   "namespaces": [],
//!   "local_ips": ["10.96.0.10"]
//! }
//! ```

use std::net::IpAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::key::DEFAULT_ROOT;
use crate::pod::PodMode;
use crate::segment::normalize;

fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

/// Per-call resolution options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Zones answered with the multi-cluster shapes and cluster fan-out.
    #[serde(default)]
    pub multicluster_zones: Vec<String>,
    /// Accept pod names as endpoint labels.
    #[serde(default)]
    pub endpoint_name_mode: bool,
}

impl ResolveOptions {
    /// Returns true if `zone` is a multi-cluster zone.
    #[must_use]
    pub fn is_multicluster(&self, zone: &str) -> bool {
        let zone = normalize(zone);
        self.multicluster_zones.iter().any(|z| normalize(z) == zone)
    }
}

/// Configuration of a [`Resolver`](crate::Resolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// First segment of every record key.
    #[serde(default = "default_root")]
    pub root: String,
    /// Zones this resolver is authoritative for.
    pub zones: Vec<String>,
    /// Subset of `zones` using multi-cluster shapes.
    #[serde(default)]
    pub multicluster_zones: Vec<String>,
    /// Accept pod names as endpoint labels.
    #[serde(default)]
    pub endpoint_pod_names: bool,
    /// Pod record mode.
    #[serde(default)]
    pub pods: PodMode,
    /// Namespaces exposed; empty exposes every namespace.
    #[serde(default)]
    pub namespaces: Vec<String>,
    /// Addresses advertised for the authority records.
    #[serde(default)]
    pub local_ips: Vec<IpAddr>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            zones: vec!["cluster.local.".to_string()],
            multicluster_zones: Vec::new(),
            endpoint_pod_names: false,
            pods: PodMode::Disabled,
            namespaces: Vec::new(),
            local_ips: Vec::new(),
        }
    }
}

impl ResolverConfig {
    /// Creates a configuration for the given zones with default settings.
    #[must_use]
    pub fn new<I, S>(zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            zones: zones.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
        .normalized()
    }

    /// Marks zones as multi-cluster.
    #[must_use]
    pub fn with_multicluster_zones<I, S>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.multicluster_zones = zones.into_iter().map(Into::into).collect();
        self.normalized()
    }

    /// Sets the addresses advertised for authority records.
    #[must_use]
    pub fn with_local_ips(mut self, ips: impl IntoIterator<Item = IpAddr>) -> Self {
        self.local_ips = ips.into_iter().collect();
        self
    }

    /// Sets the pod record mode.
    #[must_use]
    pub fn with_pod_mode(mut self, mode: PodMode) -> Self {
        self.pods = mode;
        self
    }

    /// Enables or disables pod names as endpoint labels.
    #[must_use]
    pub fn with_endpoint_pod_names(mut self, enabled: bool) -> Self {
        self.endpoint_pod_names = enabled;
        self
    }

    /// Restricts answers to the given namespaces.
    #[must_use]
    pub fn with_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&content)
    }

    /// Parses configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or fails validation.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        let config = config.normalized();

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root.is_empty() {
            return Err(ConfigError::Invalid("root cannot be empty".to_string()));
        }

        if self.root.contains('/') {
            return Err(ConfigError::Invalid(
                "root cannot contain '/'".to_string(),
            ));
        }

        if self.zones.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one zone is required".to_string(),
            ));
        }

        for zone in &self.multicluster_zones {
            if !self.zones.iter().any(|z| normalize(z) == normalize(zone)) {
                return Err(ConfigError::Invalid(format!(
                    "multi-cluster zone '{zone}' is not a configured zone"
                )));
            }
        }

        Ok(())
    }

    /// Returns the most specific configured zone containing `qname`.
    #[must_use]
    pub fn match_zone(&self, qname: &str) -> Option<&str> {
        let name = normalize(qname);
        self.zones
            .iter()
            .filter(|zone| {
                let zone = normalize(zone);
                zone.is_empty()
                    || name == zone
                    || name.strip_suffix(zone.as_str()).is_some_and(|rest| rest.ends_with('.'))
            })
            .max_by_key(|zone| normalize(zone).len())
            .map(String::as_str)
    }

    /// Returns the per-call options this configuration implies.
    #[must_use]
    pub fn options(&self) -> ResolveOptions {
        ResolveOptions {
            multicluster_zones: self.multicluster_zones.clone(),
            endpoint_name_mode: self.endpoint_pod_names,
        }
    }

    /// Lowercases zones and gives them a trailing dot.
    fn normalized(mut self) -> Self {
        let fqdn = |zone: &String| format!("{}.", normalize(zone));
        self.zones = self.zones.iter().map(fqdn).collect();
        self.multicluster_zones = self.multicluster_zones.iter().map(fqdn).collect();
        self
    }
}
