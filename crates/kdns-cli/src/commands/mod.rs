//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`resolve`] - Resolve a name against a cluster snapshot
//! - [`parse`] - Show how a name is classified
//! - [`check_config`] - Validate a resolver configuration

pub mod check_config;
pub mod parse;
pub mod resolve;

pub use check_config::CheckConfigCommand;
pub use parse::ParseCommand;
pub use resolve::ResolveCommand;

use kdns_resolver::ResolverConfig;

use crate::error::CliError;

/// Picks the zone a name is answered in.
///
/// An explicit zone wins; otherwise the most specific configured zone
/// containing the name is used.
pub(crate) fn select_zone(
    config: &ResolverConfig,
    name: &str,
    zone: Option<&str>,
) -> Result<String, CliError> {
    match zone {
        Some(zone) => Ok(zone.to_string()),
        None => config
            .match_zone(name)
            .map(ToString::to_string)
            .ok_or_else(|| CliError::NoZone(name.to_string())),
    }
}
