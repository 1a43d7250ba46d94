//! # kdns-resolver
//!
//! The Services lookup engine of a Kubernetes DNS server.
//!
//! Given a query name, a query type and the zone the name was matched
//! against, the [`Resolver`] decides which synthetic records answer it:
//!
//! - **Segmenting**: the zone is stripped and the remaining labels split out
//! - **Parsing**: the labels are classified into a [`Selector`]
//! - **Resolution**: the selector is resolved against a [`ClusterIndex`]
//! - **Keys**: every answer carries a stable key from the [`KeyBuilder`]
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use kdns_index::ClusterState;
//! use kdns_objects::{Namespace, Service};
//! use kdns_resolver::{QueryType, Resolver, ResolverConfig};
//!
//! let state = ClusterState::new();
//! state.upsert_namespace(Namespace::new("testns"));
//! state
//!     .upsert_service(Service::builder("svc1").namespace("testns").cluster_ip("10.0.0.1").build())
//!     .expect("valid service");
//! state.mark_synced();
//!
//! let resolver = Resolver::new(Arc::new(state), ResolverConfig::new(["interwebs.test."]));
//! let answers = resolver
//!     .resolve("svc1.testns.svc.interwebs.test.", QueryType::A, "interwebs.test.")
//!     .expect("index available");
//!
//! assert_eq!(answers[0].host, "10.0.0.1");
//! assert_eq!(answers[0].key, "/coredns/test/interwebs/svc/testns/svc1");
//! ```
//!
//! [`ClusterIndex`]: kdns_index::ClusterIndex

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod authority;
pub mod config;
pub mod engine;
pub mod error;
pub mod key;
pub mod label;
pub mod parse;
pub mod pod;
pub mod record;
pub mod segment;

pub use config::{ResolveOptions, ResolverConfig};
pub use engine::{DNS_SCHEMA_VERSION, Resolver};
pub use error::{ConfigError, ResolveError, Result, UnknownQueryType};
pub use key::{DEFAULT_ROOT, KeyBuilder, zone_path};
pub use label::{dashed_ip, decode_dashed_ip, endpoint_hostname};
pub use parse::{PortSelector, PodSelector, Selector, ServiceSelector, parse};
pub use pod::PodMode;
pub use record::{AnswerRecord, QueryType, RecordKind};
pub use segment::segment;
