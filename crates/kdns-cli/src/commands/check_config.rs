//! Check-config command implementation.

use std::io::Write;

use kdns_resolver::ResolverConfig;

use crate::cli::ConfigArgs;
use crate::error::CliError;
use crate::output::{ConfigSummary, OutputFormat};

/// Check-config command executor.
pub struct CheckConfigCommand {
    args: ConfigArgs,
}

impl CheckConfigCommand {
    /// Create a new check-config command.
    #[must_use]
    pub const fn new(args: ConfigArgs) -> Self {
        Self { args }
    }

    /// Execute the check-config command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or is invalid.
    pub fn execute<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let config = ResolverConfig::from_file(&self.args.config)?;
        format.write(writer, &summarize(&config))
    }
}

fn summarize(config: &ResolverConfig) -> ConfigSummary {
    ConfigSummary {
        root: config.root.clone(),
        zones: config.zones.clone(),
        multicluster_zones: config.multicluster_zones.clone(),
        pods: config.pods,
        endpoint_pod_names: config.endpoint_pod_names,
        namespaces: config.namespaces.clone(),
        local_ips: config.local_ips.iter().map(ToString::to_string).collect(),
    }
}
