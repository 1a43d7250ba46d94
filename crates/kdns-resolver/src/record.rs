//! Query types and the answer records the engine emits.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownQueryType;

/// DNS query type of an incoming question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryType {
    /// IPv4 address.
    A,
    /// IPv6 address.
    Aaaa,
    /// Canonical name.
    Cname,
    /// Service locator.
    Srv,
    /// Name server.
    Ns,
    /// Text.
    Txt,
    /// Reverse pointer.
    Ptr,
    /// Start of authority.
    Soa,
}

impl QueryType {
    /// Returns true if an address answer for `ip` fits this query type.
    ///
    /// A and AAAA filter by address family. NS accepts any address, since
    /// name server glue carries both families.
    #[must_use]
    pub fn accepts(self, ip: IpAddr) -> bool {
        match self {
            Self::A => ip.is_ipv4(),
            Self::Aaaa => ip.is_ipv6(),
            Self::Ns => true,
            _ => false,
        }
    }

    /// Returns true for A and AAAA.
    #[must_use]
    pub fn is_address(self) -> bool {
        matches!(self, Self::A | Self::Aaaa)
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Srv => "SRV",
            Self::Ns => "NS",
            Self::Txt => "TXT",
            Self::Ptr => "PTR",
            Self::Soa => "SOA",
        };
        f.write_str(name)
    }
}

impl FromStr for QueryType {
    type Err = UnknownQueryType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "CNAME" => Ok(Self::Cname),
            "SRV" => Ok(Self::Srv),
            "NS" => Ok(Self::Ns),
            "TXT" => Ok(Self::Txt),
            "PTR" => Ok(Self::Ptr),
            "SOA" => Ok(Self::Soa),
            _ => Err(UnknownQueryType(s.to_string())),
        }
    }
}

/// Kind of an emitted answer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordKind {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Alias to another name.
    Cname,
    /// Service locator with a port.
    Srv,
    /// Text record.
    Txt,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Srv => "SRV",
            Self::Txt => "TXT",
        };
        f.write_str(name)
    }
}

/// One synthetic answer produced for a query.
///
/// `host` is an IP literal for address and SRV records and a domain name for
/// CNAME records. `key` identifies the record for downstream caching and is
/// derived from what was selected, never from `host`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Record kind.
    pub kind: RecordKind,
    /// Target host.
    pub host: String,
    /// Stable record key.
    pub key: String,
    /// Port, SRV records only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Text payload, TXT records only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl AnswerRecord {
    /// Creates an A or AAAA record, depending on the address family.
    #[must_use]
    pub fn address(ip: IpAddr, key: impl Into<String>) -> Self {
        let kind = if ip.is_ipv4() { RecordKind::A } else { RecordKind::Aaaa };
        Self {
            kind,
            host: ip.to_string(),
            key: key.into(),
            port: None,
            text: None,
        }
    }

    /// Creates a CNAME record pointing at `target`.
    #[must_use]
    pub fn cname(target: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            kind: RecordKind::Cname,
            host: target.into(),
            key: key.into(),
            port: None,
            text: None,
        }
    }

    /// Creates an SRV record for `host:port`.
    #[must_use]
    pub fn srv(host: impl Into<String>, port: u16, key: impl Into<String>) -> Self {
        Self {
            kind: RecordKind::Srv,
            host: host.into(),
            key: key.into(),
            port: Some(port),
            text: None,
        }
    }

    /// Creates a TXT record.
    #[must_use]
    pub fn txt(text: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            kind: RecordKind::Txt,
            host: String::new(),
            key: key.into(),
            port: None,
            text: Some(text.into()),
        }
    }
}
