//! Authority records: the server's own addresses.

use std::net::IpAddr;

use crate::key::KeyBuilder;
use crate::record::{AnswerRecord, QueryType};

/// Answers an `ns.dns.<zone>` question (or NS at the apex) from the local addresses.
///
/// A picks the IPv4 addresses, AAAA the IPv6 ones and NS all of them. No
/// cluster state is consulted.
#[must_use]
pub fn authority_answers(
    local_ips: &[IpAddr],
    qtype: QueryType,
    keys: &KeyBuilder,
) -> Vec<AnswerRecord> {
    let key = keys.authority();
    local_ips
        .iter()
        .filter(|ip| qtype.accepts(**ip))
        .map(|ip| AnswerRecord::address(*ip, key.clone()))
        .collect()
}
