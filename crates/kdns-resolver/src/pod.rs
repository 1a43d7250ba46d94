//! Pod records: `<dashed-ip>.<namespace>.pod.<zone>`.

use std::fmt;
use std::str::FromStr;

use kdns_index::ClusterIndex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ConfigError, Result};
use crate::key::KeyBuilder;
use crate::label::decode_dashed_ip;
use crate::parse::PodSelector;
use crate::record::{AnswerRecord, QueryType};

/// How pod names are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PodMode {
    /// Pod names are not answered.
    #[default]
    Disabled,
    /// Any well-formed dashed IP is echoed back without checking the cluster.
    Insecure,
    /// Only IPs belonging to a live pod in the named namespace are answered.
    Verified,
}

impl fmt::Display for PodMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::Insecure => write!(f, "insecure"),
            Self::Verified => write!(f, "verified"),
        }
    }
}

impl FromStr for PodMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disabled" => Ok(Self::Disabled),
            "insecure" => Ok(Self::Insecure),
            "verified" => Ok(Self::Verified),
            other => Err(ConfigError::Invalid(format!("unknown pod mode: {other}"))),
        }
    }
}

/// Answers a pod-shaped name under `mode`.
///
/// The caller has already checked that the namespace is exposed.
pub(crate) fn pod_answers(
    index: &dyn ClusterIndex,
    selector: &PodSelector,
    mode: PodMode,
    qtype: QueryType,
    keys: &KeyBuilder,
) -> Result<Vec<AnswerRecord>> {
    if mode == PodMode::Disabled || !qtype.is_address() {
        return Ok(Vec::new());
    }

    let Some(ip) = decode_dashed_ip(&selector.label) else {
        trace!(label = %selector.label, "Pod label is not an address");
        return Ok(Vec::new());
    };

    if !qtype.accepts(ip) {
        return Ok(Vec::new());
    }

    if mode == PodMode::Verified {
        let live = index
            .pods_by_ip(ip)?
            .iter()
            .any(|pod| pod.namespace == selector.namespace && !pod.deleting);
        if !live {
            trace!(ip = %ip, namespace = %selector.namespace, "No live pod with address");
            return Ok(Vec::new());
        }
    }

    Ok(vec![AnswerRecord::address(
        ip,
        keys.pod(&selector.namespace, &selector.label),
    )])
}
