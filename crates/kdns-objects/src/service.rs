//! Service objects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ObjectError;
use crate::object_key;
use crate::protocol::Protocol;

/// Cluster IP value marking a service as headless.
pub const CLUSTER_IP_NONE: &str = "None";

/// How a service is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ServiceType {
    /// Virtual IP load-balanced over the endpoints.
    #[default]
    #[serde(rename = "ClusterIP")]
    ClusterIp,
    /// No virtual IP; endpoints are addressed directly.
    Headless,
    /// DNS alias to a name outside the cluster.
    ExternalName,
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClusterIp => write!(f, "ClusterIP"),
            Self::Headless => write!(f, "Headless"),
            Self::ExternalName => write!(f, "ExternalName"),
        }
    }
}

impl FromStr for ServiceType {
    type Err = ObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ClusterIP" => Ok(Self::ClusterIp),
            "Headless" => Ok(Self::Headless),
            "ExternalName" => Ok(Self::ExternalName),
            other => Err(ObjectError::UnknownServiceType(other.to_string())),
        }
    }
}

/// A named port on a service or endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePort {
    /// Port name, empty for unnamed single-port services.
    #[serde(default)]
    pub name: String,
    /// Transport protocol.
    #[serde(default)]
    pub protocol: Protocol,
    /// Port number.
    pub port: u16,
}

impl ServicePort {
    /// Creates an unnamed TCP port.
    #[must_use]
    pub fn tcp(port: u16) -> Self {
        Self {
            name: String::new(),
            protocol: Protocol::Tcp,
            port,
        }
    }

    /// Creates an unnamed UDP port.
    #[must_use]
    pub fn udp(port: u16) -> Self {
        Self {
            name: String::new(),
            protocol: Protocol::Udp,
            port,
        }
    }

    /// Creates an unnamed SCTP port.
    #[must_use]
    pub fn sctp(port: u16) -> Self {
        Self {
            name: String::new(),
            protocol: Protocol::Sctp,
            port,
        }
    }

    /// Sets the port name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// A Kubernetes service as seen by the DNS engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Service name.
    pub name: String,
    /// Namespace of the service.
    pub namespace: String,
    /// Service type.
    #[serde(rename = "type", default)]
    pub service_type: ServiceType,
    /// Assigned cluster IPs in family order; [`CLUSTER_IP_NONE`] marks a headless service.
    #[serde(rename = "clusterIPs", default)]
    pub cluster_ips: Vec<String>,
    /// Alias target of an ExternalName service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_name: Option<String>,
    /// Exposed ports.
    #[serde(default)]
    pub ports: Vec<ServicePort>,
}

impl Service {
    /// Creates a new service builder.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ServiceBuilder {
        ServiceBuilder::new(name)
    }

    /// Returns the `namespace/name` index key.
    #[must_use]
    pub fn key(&self) -> String {
        object_key(&self.namespace, &self.name)
    }

    /// Returns true if the service has no cluster IP.
    #[must_use]
    pub fn is_headless(&self) -> bool {
        self.service_type == ServiceType::Headless
            || self.cluster_ips.iter().any(|ip| ip == CLUSTER_IP_NONE)
    }

    /// Returns true for ExternalName services.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.service_type == ServiceType::ExternalName
    }
}

/// Builder for services.
#[derive(Debug)]
pub struct ServiceBuilder {
    name: String,
    namespace: String,
    service_type: ServiceType,
    cluster_ips: Vec<String>,
    external_name: Option<String>,
    ports: Vec<ServicePort>,
}

impl ServiceBuilder {
    /// Creates a new service builder with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: "default".to_string(),
            service_type: ServiceType::ClusterIp,
            cluster_ips: Vec::new(),
            external_name: None,
            ports: Vec::new(),
        }
    }

    /// Sets the namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Appends a cluster IP. Call twice for dual-stack services.
    #[must_use]
    pub fn cluster_ip(mut self, ip: impl Into<String>) -> Self {
        self.cluster_ips.push(ip.into());
        self
    }

    /// Marks the service headless.
    #[must_use]
    pub fn headless(mut self) -> Self {
        self.service_type = ServiceType::Headless;
        self.cluster_ips = vec![CLUSTER_IP_NONE.to_string()];
        self
    }

    /// Turns the service into an alias for `name`.
    #[must_use]
    pub fn external_name(mut self, name: impl Into<String>) -> Self {
        self.service_type = ServiceType::ExternalName;
        self.external_name = Some(name.into());
        self
    }

    /// Adds a port to the service.
    #[must_use]
    pub fn port(mut self, port: ServicePort) -> Self {
        self.ports.push(port);
        self
    }

    /// Builds the service.
    #[must_use]
    pub fn build(self) -> Service {
        Service {
            name: self.name,
            namespace: self.namespace,
            service_type: self.service_type,
            cluster_ips: self.cluster_ips,
            external_name: self.external_name,
            ports: self.ports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_builder_defaults() {
        let service = Service::builder("api").build();

        assert_eq!(service.namespace, "default");
        assert_eq!(service.service_type, ServiceType::ClusterIp);
        assert!(service.cluster_ips.is_empty());
        assert!(!service.is_headless());
        assert!(!service.is_external());
    }

    #[test]
    fn test_dual_stack_keeps_order() {
        let service = Service::builder("svc-dual-stack")
            .namespace("testns")
            .cluster_ip("10.0.0.2")
            .cluster_ip("10::2")
            .build();

        assert_eq!(service.cluster_ips, vec!["10.0.0.2", "10::2"]);
    }

    #[test]
    fn test_headless_via_builder() {
        let service = Service::builder("hdls1").namespace("testns").headless().build();

        assert!(service.is_headless());
        assert_eq!(service.cluster_ips, vec![CLUSTER_IP_NONE]);
    }

    #[test]
    fn test_headless_via_sentinel_only() {
        let service = Service::builder("hdls1")
            .cluster_ip(CLUSTER_IP_NONE)
            .build();

        assert_eq!(service.service_type, ServiceType::ClusterIp);
        assert!(service.is_headless());
    }

    #[test]
    fn test_external_name() {
        let service = Service::builder("external")
            .namespace("testns")
            .external_name("coredns.io")
            .port(ServicePort::tcp(80).with_name("http"))
            .build();

        assert!(service.is_external());
        assert_eq!(service.external_name.as_deref(), Some("coredns.io"));
    }

    #[test_case("ClusterIP", ServiceType::ClusterIp ; "cluster ip")]
    #[test_case("Headless", ServiceType::Headless ; "headless")]
    #[test_case("ExternalName", ServiceType::ExternalName ; "external name")]
    fn test_service_type_round_trips_display(input: &str, expected: ServiceType) {
        assert_eq!(input.parse::<ServiceType>(), Ok(expected));
        assert_eq!(expected.to_string(), input);
    }

    #[test]
    fn test_deserialize_kubernetes_style_json() {
        let json = r#"{
            "name": "svc1",
            "namespace": "testns",
            "clusterIPs": ["10.0.0.1"],
            "ports": [{"name": "http", "protocol": "tcp", "port": 80}]
        }"#;

        let service: Service = serde_json::from_str(json).expect("should parse JSON");

        assert_eq!(service.service_type, ServiceType::ClusterIp);
        assert_eq!(service.cluster_ips, vec!["10.0.0.1"]);
        assert_eq!(service.ports, vec![ServicePort::tcp(80).with_name("http")]);
    }

    #[test]
    fn test_deserialize_external_name() {
        let json = r#"{
            "name": "external",
            "namespace": "testns",
            "type": "ExternalName",
            "externalName": "coredns.io"
        }"#;

        let service: Service = serde_json::from_str(json).expect("should parse JSON");

        assert!(service.is_external());
        assert_eq!(service.external_name.as_deref(), Some("coredns.io"));
    }
}
