//! Resolve command implementation.

use std::io::Write;
use std::sync::Arc;

use kdns_index::{ClusterState, Snapshot};
use kdns_resolver::{Resolver, ResolverConfig};
use tracing::{debug, info};

use crate::cli::ResolveArgs;
use crate::commands::select_zone;
use crate::error::CliError;
use crate::output::{OutputFormat, ResolveOutput};

/// Resolve command executor.
pub struct ResolveCommand {
    args: ResolveArgs,
}

impl ResolveCommand {
    /// Create a new resolve command.
    #[must_use]
    pub const fn new(args: ResolveArgs) -> Self {
        Self { args }
    }

    /// Execute the resolve command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or snapshot cannot be loaded,
    /// the name lies outside every zone, or resolution fails.
    pub fn execute<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let output = self.run()?;
        format.write(writer, &output)
    }

    /// Load the snapshot and resolve the question.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails.
    pub fn run(&self) -> Result<ResolveOutput, CliError> {
        let config = ResolverConfig::from_file(&self.args.config)?;
        let zone = select_zone(&config, &self.args.name, self.args.zone.as_deref())?;

        let snapshot = Snapshot::from_file(&self.args.snapshot)?;
        let state = ClusterState::from_snapshot(snapshot)?;
        debug!(stats = ?state.stats(), "loaded cluster snapshot");

        let resolver = Resolver::new(Arc::new(state), config);
        let answers = resolver.resolve(&self.args.name, self.args.qtype, &zone)?;
        info!(
            name = %self.args.name,
            qtype = %self.args.qtype,
            zone = %zone,
            answers = answers.len(),
            "resolved"
        );

        Ok(ResolveOutput {
            name: self.args.name.clone(),
            qtype: self.args.qtype,
            zone,
            answers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::path::PathBuf;

    use kdns_resolver::QueryType;
    use tempfile::NamedTempFile;

    fn temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("failed to create temp file");
        file.write_all(content.as_bytes()).expect("failed to write temp file");
        file
    }

    const SNAPSHOT: &str = r#"{
        "namespaces": [{"name": "testns"}],
        "services": [{
            "name": "svc1",
            "namespace": "testns",
            "type": "ClusterIP",
            "clusterIPs": ["10.0.0.1"],
            "ports": [{"name": "http", "protocol": "TCP", "port": 80}]
        }]
    }"#;

    fn args(config: PathBuf, snapshot: PathBuf, qtype: QueryType, name: &str) -> ResolveArgs {
        ResolveArgs {
            config,
            snapshot,
            qtype,
            zone: None,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_resolve_from_files() {
        let config = temp_file(r#"{"zones": ["cluster.local."]}"#);
        let snapshot = temp_file(SNAPSHOT);

        let cmd = ResolveCommand::new(args(
            config.path().to_path_buf(),
            snapshot.path().to_path_buf(),
            QueryType::A,
            "svc1.testns.svc.cluster.local.",
        ));
        let output = cmd.run().expect("resolve should succeed");

        assert_eq!(output.zone, "cluster.local.");
        assert_eq!(output.answers.len(), 1);
        assert_eq!(output.answers[0].host, "10.0.0.1");
        assert_eq!(output.answers[0].key, "/coredns/local/cluster/svc/testns/svc1");
    }

    #[test]
    fn test_resolve_missing_snapshot() {
        let config = temp_file(r#"{"zones": ["cluster.local."]}"#);

        let cmd = ResolveCommand::new(args(
            config.path().to_path_buf(),
            PathBuf::from("/nonexistent/cluster.json"),
            QueryType::A,
            "svc1.testns.svc.cluster.local.",
        ));
        assert!(matches!(cmd.run(), Err(CliError::Snapshot(_))));
    }

    #[test]
    fn test_resolve_writes_table() {
        let config = temp_file(r#"{"zones": ["cluster.local."]}"#);
        let snapshot = temp_file(SNAPSHOT);

        let cmd = ResolveCommand::new(args(
            config.path().to_path_buf(),
            snapshot.path().to_path_buf(),
            QueryType::Srv,
            "_http._tcp.svc1.testns.svc.cluster.local.",
        ));
        let mut buf = Vec::new();
        cmd.execute(&mut buf, &OutputFormat::default())
            .expect("resolve should succeed");

        let text = String::from_utf8(buf).expect("utf-8 output");
        assert!(text.contains("SRV"));
        assert!(text.contains("80"));
    }
}
