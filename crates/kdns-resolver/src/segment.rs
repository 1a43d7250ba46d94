//! Splits a query name into the labels below its zone.

/// Lowercases a domain name and strips its trailing dot.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Returns the labels of `qname` that precede `zone`, in query order.
///
/// Both names are compared case-insensitively, with or without a trailing
/// dot, and the zone must match on a label boundary. The zone apex yields an
/// empty sequence. Returns `None` when `qname` is not inside `zone` or
/// contains an empty label.
#[must_use]
pub fn segment(qname: &str, zone: &str) -> Option<Vec<String>> {
    let name = normalize(qname);
    let zone = normalize(zone);

    let remainder = if zone.is_empty() {
        name.as_str()
    } else if name == zone {
        ""
    } else {
        name.strip_suffix(zone.as_str())?.strip_suffix('.')?
    };

    if remainder.is_empty() {
        return Some(Vec::new());
    }

    let labels: Vec<String> = remainder.split('.').map(str::to_string).collect();
    if labels.iter().any(String::is_empty) {
        return None;
    }
    Some(labels)
}
