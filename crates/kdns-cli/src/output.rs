//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use kdns_resolver::{AnswerRecord, PodMode, QueryType, Selector};
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// Answers to one question.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveOutput {
    /// Query name.
    pub name: String,
    /// Query type.
    pub qtype: QueryType,
    /// Zone the name was resolved in.
    pub zone: String,
    /// Answers in emission order.
    pub answers: Vec<AnswerRecord>,
}

impl TableDisplay for ResolveOutput {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.answers.is_empty() {
            writeln!(writer, "No answers for {} {}", self.name, self.qtype)?;
            return Ok(());
        }

        // Header
        writeln!(writer, "{:<6}  {:<40}  {:>5}  KEY", "KIND", "HOST", "PORT")?;
        writeln!(writer, "{}", "─".repeat(96))?;

        // Rows
        for answer in &self.answers {
            let host = answer.text.as_deref().unwrap_or(&answer.host);
            let port = answer.port.map_or_else(|| "-".to_string(), |p| p.to_string());
            writeln!(
                writer,
                "{:<6}  {:<40}  {:>5}  {}",
                answer.kind.to_string(),
                host,
                port,
                answer.key
            )?;
        }

        writeln!(writer)?;
        writeln!(writer, "Total: {} answer(s) in {}", self.answers.len(), self.zone)?;
        Ok(())
    }
}

/// How a name was parsed.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutput {
    /// Query name.
    pub name: String,
    /// Zone the name was parsed in.
    pub zone: String,
    /// Whether the zone uses the multi-cluster shapes.
    pub multicluster: bool,
    /// Parsed selector, absent when no shape matched.
    pub selector: Option<Selector>,
}

impl TableDisplay for ParseOutput {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Name:          {}", self.name)?;
        writeln!(writer, "Zone:          {}", self.zone)?;
        writeln!(writer, "Multi-cluster: {}", self.multicluster)?;
        match &self.selector {
            Some(selector) => writeln!(writer, "Selector:      {selector}")?,
            None => writeln!(writer, "Selector:      (no match)")?,
        }
        Ok(())
    }
}

/// Summary of a validated configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    /// Key root.
    pub root: String,
    /// Configured zones.
    pub zones: Vec<String>,
    /// Multi-cluster zones.
    pub multicluster_zones: Vec<String>,
    /// Pod record mode.
    pub pods: PodMode,
    /// Pod names as endpoint labels.
    pub endpoint_pod_names: bool,
    /// Exposed namespaces; empty means all.
    pub namespaces: Vec<String>,
    /// Authority addresses.
    pub local_ips: Vec<String>,
}

impl TableDisplay for ConfigSummary {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Configuration OK")?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "Root:               {}", self.root)?;
        writeln!(writer, "Zones:              {}", self.zones.join(", "))?;
        writeln!(writer, "Multi-cluster:      {}", join_or_none(&self.multicluster_zones))?;
        writeln!(writer, "Pods:               {}", self.pods)?;
        writeln!(writer, "Endpoint pod names: {}", self.endpoint_pod_names)?;
        if self.namespaces.is_empty() {
            writeln!(writer, "Namespaces:         (all)")?;
        } else {
            writeln!(writer, "Namespaces:         {}", self.namespaces.join(", "))?;
        }
        writeln!(writer, "Local IPs:          {}", join_or_none(&self.local_ips))?;
        Ok(())
    }
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}
