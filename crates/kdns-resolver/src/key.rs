//! Record keys.
//!
//! Every answer carries a slash-delimited key built from what was selected:
//!
//! ```text
//! /<root>/<zone, reversed>/svc/<namespace>/<service>[/<cluster>][/<endpoint>]
//! /<root>/<zone, reversed>/dns/ns
//! /<root>/<zone, reversed>/pod/<namespace>/<label>
//! /<root>/<zone, reversed>/dns-version
//! ```
//!
//! Keys never depend on the resolved host, so two records pointing at the
//! same address from different endpoints or clusters keep distinct keys.

use crate::parse::{DNS_LABEL, DNS_VERSION_LABEL, POD_LABEL, SERVICE_LABEL};
use crate::segment::normalize;

/// Default key root.
pub const DEFAULT_ROOT: &str = "coredns";

/// Converts a zone into its key path, e.g. `interwebs.test.` to `test/interwebs`.
#[must_use]
pub fn zone_path(zone: &str) -> String {
    let zone = normalize(zone);
    zone.rsplit('.')
        .filter(|label| !label.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Builds keys for the records of one zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBuilder {
    prefix: String,
}

impl KeyBuilder {
    /// Creates a builder for `zone` under `root`.
    #[must_use]
    pub fn new(root: &str, zone: &str) -> Self {
        let path = zone_path(zone);
        let prefix = if path.is_empty() {
            format!("/{root}")
        } else {
            format!("/{root}/{path}")
        };
        Self { prefix }
    }

    /// Key of a service-level record.
    #[must_use]
    pub fn service(&self, namespace: &str, service: &str) -> String {
        format!("{}/{SERVICE_LABEL}/{namespace}/{service}", self.prefix)
    }

    /// Key of a record for one endpoint, optionally in a member cluster.
    #[must_use]
    pub fn endpoint(
        &self,
        namespace: &str,
        service: &str,
        cluster: Option<&str>,
        endpoint: &str,
    ) -> String {
        let service_key = self.service(namespace, service);
        match cluster {
            Some(cluster) => format!("{service_key}/{cluster}/{endpoint}"),
            None => format!("{service_key}/{endpoint}"),
        }
    }

    /// Key of the authority records.
    #[must_use]
    pub fn authority(&self) -> String {
        format!("{}/{DNS_LABEL}/ns", self.prefix)
    }

    /// Key of a pod record.
    #[must_use]
    pub fn pod(&self, namespace: &str, label: &str) -> String {
        format!("{}/{POD_LABEL}/{namespace}/{label}", self.prefix)
    }

    /// Key of the schema version record.
    #[must_use]
    pub fn dns_version(&self) -> String {
        format!("{}/{DNS_VERSION_LABEL}", self.prefix)
    }
}
