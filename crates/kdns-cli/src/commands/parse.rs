//! Parse command implementation.

use std::io::Write;

use kdns_resolver::{ResolverConfig, parse, segment};
use tracing::debug;

use crate::cli::ParseArgs;
use crate::commands::select_zone;
use crate::error::CliError;
use crate::output::{OutputFormat, ParseOutput};

/// Parse command executor.
pub struct ParseCommand {
    args: ParseArgs,
}

impl ParseCommand {
    /// Create a new parse command.
    #[must_use]
    pub const fn new(args: ParseArgs) -> Self {
        Self { args }
    }

    /// Execute the parse command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the name
    /// lies outside every zone.
    pub fn execute<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let output = self.run()?;
        format.write(writer, &output)
    }

    /// Classify the name without touching cluster state.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the name
    /// lies outside every zone.
    pub fn run(&self) -> Result<ParseOutput, CliError> {
        let config = ResolverConfig::from_file(&self.args.config)?;
        let zone = select_zone(&config, &self.args.name, self.args.zone.as_deref())?;
        let multicluster = config.options().is_multicluster(&zone);

        let labels = segment(&self.args.name, &zone)
            .ok_or_else(|| CliError::NoZone(self.args.name.clone()))?;
        debug!(name = %self.args.name, zone = %zone, labels = ?labels, "segmented");

        Ok(ParseOutput {
            name: self.args.name.clone(),
            zone,
            multicluster,
            selector: parse(&labels, multicluster),
        })
    }
}
