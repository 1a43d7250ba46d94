//! The Services lookup engine.
//!
//! ```text
//! qname ──► segment ──► parse ──► Selector ──┬─► authority / dns-version (local)
//!                                             ├─► pod records (PodsByIp)
//!                                             └─► services / service imports
//!                                                    │
//!                                                    ├─ ExternalName ──► CNAME
//!                                                    ├─ ClusterIP ─────► cluster IPs
//!                                                    └─ Headless or endpoint label
//!                                                          └─► endpoints (per cluster)
//! ```
//!
//! Resolution is a pure read of the [`ClusterIndex`]. Names that fit no shape,
//! or select nothing, produce an empty answer set; only index failures are
//! errors.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use kdns_index::{ClusterIndex, IndexError};
use kdns_objects::{EndpointsLike, ServiceKind, ServiceLike};
use tracing::{debug, error, trace, warn};

use crate::authority::authority_answers;
use crate::config::{ResolveOptions, ResolverConfig};
use crate::error::{ResolveError, Result};
use crate::key::KeyBuilder;
use crate::label::endpoint_hostname;
use crate::parse::{Selector, ServiceSelector, parse};
use crate::pod::pod_answers;
use crate::record::{AnswerRecord, QueryType};
use crate::segment::segment;

/// Kubernetes DNS schema version served at `dns-version.<zone>`.
pub const DNS_SCHEMA_VERSION: &str = "1.1.0";

/// Resolves query names against cluster state.
///
/// Cheap to share: every call is a read of the index and the resolver holds
/// no mutable state.
pub struct Resolver {
    /// Cluster state to answer from.
    index: Arc<dyn ClusterIndex>,
    /// Configuration.
    config: ResolverConfig,
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .field("synced", &self.index.has_synced())
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Creates a resolver over `index`.
    pub fn new(index: Arc<dyn ClusterIndex>, config: ResolverConfig) -> Self {
        Self { index, config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Parses `qname` relative to `zone` using the configured options.
    #[must_use]
    pub fn parse(&self, qname: &str, zone: &str) -> Option<Selector> {
        self.parse_with(qname, zone, &self.config.options())
    }

    /// Parses `qname` relative to `zone`.
    #[must_use]
    pub fn parse_with(&self, qname: &str, zone: &str, options: &ResolveOptions) -> Option<Selector> {
        let labels = segment(qname, zone)?;
        parse(&labels, options.is_multicluster(zone))
    }

    /// Resolves a question using the configured options.
    ///
    /// `zone` is the configured zone the name was matched against.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Dependency`] if a name that needs cluster state
    /// arrives before the index has synced, or if the index cannot serve a
    /// lookup.
    pub fn resolve(&self, qname: &str, qtype: QueryType, zone: &str) -> Result<Vec<AnswerRecord>> {
        self.resolve_with(qname, qtype, zone, &self.config.options())
    }

    /// Resolves a question with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Dependency`] if a name that needs cluster state
    /// arrives before the index has synced, or if the index cannot serve a
    /// lookup.
    pub fn resolve_with(
        &self,
        qname: &str,
        qtype: QueryType,
        zone: &str,
        options: &ResolveOptions,
    ) -> Result<Vec<AnswerRecord>> {
        debug!(qname = %qname, qtype = %qtype, zone = %zone, "Resolving query");

        let Some(selector) = self.parse_with(qname, zone, options) else {
            trace!(qname = %qname, "Name matches no shape");
            return Ok(Vec::new());
        };

        // Authority and dns-version records are answered locally.
        if reads_index(&selector) && !self.index.has_synced() {
            warn!(qname = %qname, "Cluster index has not synced");
            return Err(IndexError::NotSynced.into());
        }

        let keys = KeyBuilder::new(&self.config.root, zone);
        let answers = self
            .answer(&selector, qtype, &keys, options.is_multicluster(zone), options)
            .inspect_err(|err| {
                warn!(qname = %qname, selector = %selector, error = %err, "Resolution failed");
            })?;

        trace!(
            qname = %qname,
            selector = %selector,
            answers = answers.len(),
            "Resolution complete"
        );
        Ok(answers)
    }

    fn answer(
        &self,
        selector: &Selector,
        qtype: QueryType,
        keys: &KeyBuilder,
        multicluster: bool,
        options: &ResolveOptions,
    ) -> Result<Vec<AnswerRecord>> {
        match selector {
            Selector::Apex if qtype == QueryType::Ns => {
                Ok(authority_answers(&self.config.local_ips, qtype, keys))
            }
            Selector::Authority => Ok(authority_answers(&self.config.local_ips, qtype, keys)),
            Selector::DnsVersion if qtype == QueryType::Txt => Ok(vec![AnswerRecord::txt(
                DNS_SCHEMA_VERSION,
                keys.dns_version(),
            )]),
            Selector::Apex | Selector::DnsVersion | Selector::Namespace { .. } => Ok(Vec::new()),
            Selector::Pod(pod) => {
                if !self.namespace_exposed(&pod.namespace)? {
                    return Ok(Vec::new());
                }
                pod_answers(self.index.as_ref(), pod, self.config.pods, qtype, keys)
            }
            Selector::Service(service) => {
                if !self.namespace_exposed(&service.namespace)? {
                    trace!(namespace = %service.namespace, "Namespace not exposed");
                    return Ok(Vec::new());
                }
                let lookup = Lookup {
                    selector: service,
                    qtype,
                    keys,
                    endpoint_name_mode: options.endpoint_name_mode,
                };
                self.find_services(&lookup, multicluster)
            }
        }
    }

    fn find_services(&self, lookup: &Lookup<'_>, multicluster: bool) -> Result<Vec<AnswerRecord>> {
        let namespace = lookup.selector.namespace.as_str();
        let name = lookup.selector.service.as_str();

        if multicluster {
            let imports = self
                .index
                .service_imports_by_namespace_name(namespace, name)?;
            return lookup.find(&imports, || {
                self.index.multicluster_endpoints_by_index(namespace, name)
            });
        }

        if lookup.selector.cluster.is_some() {
            error!(selector = ?lookup.selector, "Cluster label outside a multi-cluster zone");
            return Err(ResolveError::MalformedSelector(format!(
                "cluster label in single-cluster lookup of {namespace}/{name}"
            )));
        }

        let services = self.index.services_by_namespace_name(namespace, name)?;
        lookup.find(&services, || self.index.endpoints_by_index(namespace, name))
    }

    /// A namespace is exposed when it passes the configured filter and exists.
    fn namespace_exposed(&self, namespace: &str) -> Result<bool> {
        let allowed = &self.config.namespaces;
        if !allowed.is_empty() && !allowed.iter().any(|n| n.eq_ignore_ascii_case(namespace)) {
            return Ok(false);
        }
        Ok(self.index.namespace_by_name(namespace)?.is_some())
    }
}

/// One service lookup, generic over single- and multi-cluster objects.
struct Lookup<'a> {
    selector: &'a ServiceSelector,
    qtype: QueryType,
    keys: &'a KeyBuilder,
    endpoint_name_mode: bool,
}

impl Lookup<'_> {
    fn find<S, E, F>(&self, services: &[S], fetch_endpoints: F) -> Result<Vec<AnswerRecord>>
    where
        S: ServiceLike,
        E: EndpointsLike,
        F: FnOnce() -> kdns_index::Result<Vec<E>>,
    {
        let endpoint_label = self.selector.endpoint.is_some();
        let needs_endpoints = services.iter().any(|service| match service.kind() {
            ServiceKind::ExternalName(_) => false,
            ServiceKind::Headless => true,
            ServiceKind::ClusterIp => endpoint_label,
        });
        let endpoints = if needs_endpoints {
            fetch_endpoints()?
        } else {
            Vec::new()
        };

        let mut answers = Vec::new();
        for service in services {
            match service.kind() {
                // External names have no endpoints to address
                ServiceKind::ExternalName(target) => {
                    if !endpoint_label && !target.is_empty() {
                        let key = self.keys.service(service.namespace(), service.name());
                        push_unique(&mut answers, AnswerRecord::cname(target, key));
                    }
                }
                ServiceKind::ClusterIp if !endpoint_label => {
                    self.cluster_ip_answers(service, &mut answers);
                }
                ServiceKind::ClusterIp | ServiceKind::Headless => {
                    self.endpoint_answers(service, &endpoints, &mut answers);
                }
            }
        }
        Ok(answers)
    }

    fn cluster_ip_answers<S: ServiceLike>(&self, service: &S, answers: &mut Vec<AnswerRecord>) {
        let key = self.keys.service(service.namespace(), service.name());
        // Skips the headless sentinel and anything else that is not an address.
        let ips: Vec<IpAddr> = service
            .cluster_ips()
            .iter()
            .filter_map(|literal| literal.parse().ok())
            .collect();

        match &self.selector.port {
            Some(wanted) if self.qtype == QueryType::Srv => {
                for port in service
                    .ports()
                    .iter()
                    .filter(|p| wanted.matches(&p.name, p.protocol))
                {
                    for ip in &ips {
                        push_unique(answers, AnswerRecord::srv(ip.to_string(), port.port, key.clone()));
                    }
                }
            }
            Some(wanted) if self.qtype.is_address() => {
                if service.ports().iter().any(|p| wanted.matches(&p.name, p.protocol)) {
                    self.push_addresses(&ips, &key, answers);
                }
            }
            None if self.qtype.is_address() => self.push_addresses(&ips, &key, answers),
            _ => {}
        }
    }

    fn push_addresses(&self, ips: &[IpAddr], key: &str, answers: &mut Vec<AnswerRecord>) {
        for ip in ips.iter().filter(|ip| self.qtype.accepts(**ip)) {
            push_unique(answers, AnswerRecord::address(*ip, key));
        }
    }

    fn endpoint_answers<S: ServiceLike, E: EndpointsLike>(
        &self,
        service: &S,
        endpoints: &[E],
        answers: &mut Vec<AnswerRecord>,
    ) {
        let namespace = service.namespace();
        let name = service.name();

        for object in endpoints.iter().filter(|e| e.backs(namespace, name)) {
            let cluster = object.cluster_id();
            if let Some(wanted) = &self.selector.cluster {
                if cluster != Some(wanted.as_str()) {
                    continue;
                }
            }

            for subset in object.subsets() {
                let ports: Vec<_> = match &self.selector.port {
                    Some(wanted) => subset
                        .ports
                        .iter()
                        .filter(|p| wanted.matches(&p.name, p.protocol))
                        .collect(),
                    None => subset.ports.iter().collect(),
                };
                if self.selector.port.is_some() && ports.is_empty() {
                    continue;
                }

                for address in &subset.addresses {
                    let hostname = endpoint_hostname(address, self.endpoint_name_mode);
                    if let Some(wanted) = &self.selector.endpoint {
                        if !wanted.eq_ignore_ascii_case(&hostname) {
                            continue;
                        }
                    }

                    let key = self.keys.endpoint(namespace, name, cluster, &hostname);
                    match self.qtype {
                        QueryType::Srv if self.selector.port.is_some() => {
                            for port in &ports {
                                push_unique(
                                    answers,
                                    AnswerRecord::srv(address.ip.to_string(), port.port, key.clone()),
                                );
                            }
                        }
                        qtype if qtype.is_address() && qtype.accepts(address.ip) => {
                            push_unique(answers, AnswerRecord::address(address.ip, key));
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}

/// Returns true for selectors answered from cluster state.
fn reads_index(selector: &Selector) -> bool {
    matches!(selector, Selector::Service(_) | Selector::Pod(_))
}

/// Appends `record` unless an identical record is already present.
///
/// Repeated ports and addresses shared by several slices would otherwise
/// produce duplicate answers.
fn push_unique(answers: &mut Vec<AnswerRecord>, record: AnswerRecord) {
    if !answers.contains(&record) {
        answers.push(record);
    }
}
