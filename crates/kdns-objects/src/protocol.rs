//! Transport protocols carried by service and endpoint ports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ObjectError;

/// Transport protocol of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    /// TCP protocol.
    #[default]
    #[serde(alias = "tcp", alias = "Tcp")]
    Tcp,
    /// UDP protocol.
    #[serde(alias = "udp", alias = "Udp")]
    Udp,
    /// SCTP protocol.
    #[serde(alias = "sctp", alias = "Sctp")]
    Sctp,
}

impl Protocol {
    /// Returns the lowercase label used in SRV names (`tcp`, `udp`, `sctp`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::Sctp => "sctp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
            Self::Sctp => write!(f, "SCTP"),
        }
    }
}

impl FromStr for Protocol {
    type Err = ObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("tcp") {
            Ok(Self::Tcp)
        } else if s.eq_ignore_ascii_case("udp") {
            Ok(Self::Udp)
        } else if s.eq_ignore_ascii_case("sctp") {
            Ok(Self::Sctp)
        } else {
            Err(ObjectError::UnknownProtocol(s.to_string()))
        }
    }
}
