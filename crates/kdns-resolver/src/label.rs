//! DNS labels derived from endpoint and pod addresses.
//!
//! An address without a usable name is addressed by its IP literal with the
//! separators swapped for dashes:
//!
//! ```text
//! 10.11.12.13    <->  10-11-12-13
//! 1:2::3:4       <->  1-2--3-4
//! fd00::         <->  fd00--0
//! ```

use std::net::IpAddr;

use kdns_objects::EndpointAddress;

/// Returns the label an endpoint address answers to.
///
/// The hostname wins when set. With `endpoint_name_mode` on, the backing pod
/// name comes next. Otherwise the label is the dashed IP literal.
#[must_use]
pub fn endpoint_hostname(address: &EndpointAddress, endpoint_name_mode: bool) -> String {
    if let Some(hostname) = address.hostname() {
        return hostname.to_string();
    }

    if endpoint_name_mode {
        if let Some(pod) = address.pod_name() {
            return pod.to_string();
        }
    }

    dashed_ip(address.ip)
}

/// Renders an IP literal as a single DNS label.
#[must_use]
pub fn dashed_ip(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => v4.to_string().replace('.', "-"),
        IpAddr::V6(v6) => {
            let label = v6.to_string().replace(':', "-");
            // A trailing "::" would leave the label ending in a dash.
            if label.ends_with('-') {
                format!("{label}0")
            } else {
                label
            }
        }
    }
}

/// Decodes a dashed IP label back into an address.
///
/// Exactly three single dashes read as IPv4; anything else is read as IPv6.
#[must_use]
pub fn decode_dashed_ip(label: &str) -> Option<IpAddr> {
    let literal = if label.matches('-').count() == 3 && !label.contains("--") {
        label.replace('-', ".")
    } else {
        label.replace('-', ":")
    };
    literal.parse().ok()
}
