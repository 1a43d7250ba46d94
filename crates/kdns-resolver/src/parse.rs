//! Query-name parser.
//!
//! Classifies the labels below a zone into one of the recognized shapes,
//! most specific first:
//!
//! ```text
//! _<port>._<proto>.<endpoint>.<cluster>.<service>.<namespace>.svc   multi-cluster SRV with endpoint
//! <endpoint>.<cluster>.<service>.<namespace>.svc                    multi-cluster endpoint
//! _<port>._<proto>.<service>.<namespace>.svc                        SRV
//! <endpoint>.<service>.<namespace>.svc                              endpoint (single-cluster)
//! <service>.<namespace>.svc                                         service
//! [<namespace>.]svc                                                 namespace
//! <dashed-ip>.<namespace>.pod                                       pod
//! ns.dns                                                            authority
//! dns-version                                                       schema version
//! (empty)                                                           zone apex
//! ```
//!
//! Each shape is a matcher returning `Option<Selector>`; the first match wins
//! and a name fitting no shape is simply not answered.

use std::fmt;

use kdns_objects::Protocol;
use serde::Serialize;

/// Label marking service names.
pub const SERVICE_LABEL: &str = "svc";

/// Label marking pod names.
pub const POD_LABEL: &str = "pod";

/// Label marking authority names.
pub const DNS_LABEL: &str = "dns";

/// Name of the schema version record.
pub const DNS_VERSION_LABEL: &str = "dns-version";

/// Port and protocol requested by an SRV-shaped name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortSelector {
    /// Port name without its leading underscore.
    pub name: String,
    /// Transport protocol.
    pub protocol: Protocol,
}

impl PortSelector {
    /// Returns true if a port named `name` speaking `protocol` qualifies.
    #[must_use]
    pub fn matches(&self, name: &str, protocol: Protocol) -> bool {
        self.protocol == protocol && self.name.eq_ignore_ascii_case(name)
    }
}

/// A service (or service import) and the optional parts narrowing it down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSelector {
    /// Namespace label.
    pub namespace: String,
    /// Service label.
    pub service: String,
    /// Endpoint label, for per-endpoint names.
    pub endpoint: Option<String>,
    /// Member cluster label, multi-cluster zones only.
    pub cluster: Option<String>,
    /// Port and protocol, for SRV names.
    pub port: Option<PortSelector>,
}

impl ServiceSelector {
    fn new(service: &str, namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            service: service.to_string(),
            endpoint: None,
            cluster: None,
            port: None,
        }
    }
}

/// A pod addressed by its dashed IP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodSelector {
    /// Namespace label.
    pub namespace: String,
    /// Dashed IP label.
    pub label: String,
}

/// Parsed form of a query name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Selector {
    /// The zone apex itself.
    Apex,
    /// `<namespace>.svc` or bare `svc`; exists but carries no records.
    Namespace {
        /// Namespace label, absent for bare `svc`.
        namespace: Option<String>,
    },
    /// `ns.dns`, the server's own addresses.
    Authority,
    /// `dns-version`, the schema version record.
    DnsVersion,
    /// A service-shaped name.
    Service(ServiceSelector),
    /// A pod-shaped name.
    Pod(PodSelector),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apex => write!(f, "apex"),
            Self::Namespace { namespace: None } => write!(f, "namespace(*)"),
            Self::Namespace { namespace: Some(ns) } => write!(f, "namespace({ns})"),
            Self::Authority => write!(f, "authority"),
            Self::DnsVersion => write!(f, "dns-version"),
            Self::Service(s) => {
                write!(f, "service({}/{}", s.namespace, s.service)?;
                if let Some(cluster) = &s.cluster {
                    write!(f, " cluster={cluster}")?;
                }
                if let Some(endpoint) = &s.endpoint {
                    write!(f, " endpoint={endpoint}")?;
                }
                if let Some(port) = &s.port {
                    write!(f, " port={}/{}", port.name, port.protocol.label())?;
                }
                write!(f, ")")
            }
            Self::Pod(p) => write!(f, "pod({}/{})", p.namespace, p.label),
        }
    }
}

type Matcher = fn(&[&str], bool) -> Option<Selector>;

/// Shape matchers, most specific first.
const MATCHERS: &[Matcher] = &[
    match_multicluster_srv_endpoint,
    match_multicluster_endpoint,
    match_srv,
    match_endpoint,
    match_service,
    match_namespace,
    match_pod,
    match_authority,
    match_dns_version,
    match_apex,
];

/// Parses the labels below a zone, as produced by [`segment`](crate::segment::segment).
///
/// `multicluster` enables the cluster-qualified shapes and disables the
/// single-cluster endpoint shape.
#[must_use]
pub fn parse<S: AsRef<str>>(labels: &[S], multicluster: bool) -> Option<Selector> {
    let labels: Vec<&str> = labels.iter().map(AsRef::as_ref).collect();
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(&labels, multicluster))
}

/// Parses `_<port>` and `_<proto>` tokens.
fn port_selector(port: &str, protocol: &str) -> Option<PortSelector> {
    let name = port.strip_prefix('_').filter(|n| !n.is_empty())?;
    let protocol = protocol.strip_prefix('_')?.parse::<Protocol>().ok()?;
    Some(PortSelector {
        name: name.to_string(),
        protocol,
    })
}

fn is_srv_pair(port: &str, protocol: &str) -> bool {
    port.starts_with('_') && protocol.starts_with('_')
}

fn match_multicluster_srv_endpoint(labels: &[&str], multicluster: bool) -> Option<Selector> {
    let [port, protocol, endpoint, cluster, service, namespace, SERVICE_LABEL] = labels else {
        return None;
    };
    if !multicluster {
        return None;
    }
    Some(Selector::Service(ServiceSelector {
        endpoint: Some((*endpoint).to_string()),
        cluster: Some((*cluster).to_string()),
        port: Some(port_selector(port, protocol)?),
        ..ServiceSelector::new(service, namespace)
    }))
}

fn match_multicluster_endpoint(labels: &[&str], multicluster: bool) -> Option<Selector> {
    let [endpoint, cluster, service, namespace, SERVICE_LABEL] = labels else {
        return None;
    };
    if !multicluster || is_srv_pair(endpoint, cluster) {
        return None;
    }
    Some(Selector::Service(ServiceSelector {
        endpoint: Some((*endpoint).to_string()),
        cluster: Some((*cluster).to_string()),
        ..ServiceSelector::new(service, namespace)
    }))
}

fn match_srv(labels: &[&str], _multicluster: bool) -> Option<Selector> {
    let [port, protocol, service, namespace, SERVICE_LABEL] = labels else {
        return None;
    };
    Some(Selector::Service(ServiceSelector {
        port: Some(port_selector(port, protocol)?),
        ..ServiceSelector::new(service, namespace)
    }))
}

fn match_endpoint(labels: &[&str], multicluster: bool) -> Option<Selector> {
    let [endpoint, service, namespace, SERVICE_LABEL] = labels else {
        return None;
    };
    if multicluster {
        return None;
    }
    Some(Selector::Service(ServiceSelector {
        endpoint: Some((*endpoint).to_string()),
        ..ServiceSelector::new(service, namespace)
    }))
}

fn match_service(labels: &[&str], _multicluster: bool) -> Option<Selector> {
    let [service, namespace, SERVICE_LABEL] = labels else {
        return None;
    };
    Some(Selector::Service(ServiceSelector::new(service, namespace)))
}

fn match_namespace(labels: &[&str], _multicluster: bool) -> Option<Selector> {
    match labels {
        [SERVICE_LABEL] => Some(Selector::Namespace { namespace: None }),
        [namespace, SERVICE_LABEL] => Some(Selector::Namespace {
            namespace: Some((*namespace).to_string()),
        }),
        _ => None,
    }
}

fn match_pod(labels: &[&str], _multicluster: bool) -> Option<Selector> {
    let [label, namespace, POD_LABEL] = labels else {
        return None;
    };
    Some(Selector::Pod(PodSelector {
        namespace: (*namespace).to_string(),
        label: (*label).to_string(),
    }))
}

fn match_authority(labels: &[&str], _multicluster: bool) -> Option<Selector> {
    matches!(labels, ["ns", DNS_LABEL]).then_some(Selector::Authority)
}

fn match_dns_version(labels: &[&str], _multicluster: bool) -> Option<Selector> {
    matches!(labels, [DNS_VERSION_LABEL]).then_some(Selector::DnsVersion)
}

fn match_apex(labels: &[&str], _multicluster: bool) -> Option<Selector> {
    labels.is_empty().then_some(Selector::Apex)
}
