//! # kdns-cli
//!
//! Command-line front end for the kdns lookup engine.
//!
//! Provides commands for:
//! - Resolving a name against a JSON cluster snapshot
//! - Showing how a name is classified below its zone
//! - Validating a resolver configuration
//!
//! # Architecture
//!
//! Every command is a one-shot, offline run: the configuration and snapshot
//! are loaded from disk, a [`kdns_index::ClusterState`] is built from the
//! snapshot and the [`kdns_resolver::Resolver`] answers a single question.
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌──────────┐
//! │ snapshot.json│──►│ ClusterState  │──►│ Resolver │──► answers
//! └──────────────┘   └───────────────┘   └──────────┘
//!                                             ▲
//!                    ┌───────────────┐        │
//!                    │  kdns.json    │────────┘
//!                    └───────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, ConfigArgs, Format, ParseArgs, ResolveArgs};
pub use error::CliError;
pub use output::OutputFormat;
