//! # kdns-index
//!
//! The cluster state index the kdns lookup engine reads from.
//!
//! [`ClusterIndex`] is the read interface the engine consumes. The watch
//! machinery that keeps it fresh lives elsewhere; this crate ships
//! [`ClusterState`], a thread-safe in-memory implementation that can be fed
//! by a watcher, by tests, or from a JSON [`Snapshot`].
//!
//! ```rust
//! use kdns_index::{ClusterIndex, ClusterState};
//! use kdns_objects::{Namespace, Service};
//!
//! let state = ClusterState::new();
//! state.upsert_namespace(Namespace::new("testns"));
//! state
//!     .upsert_service(Service::builder("svc1").namespace("testns").cluster_ip("10.0.0.1").build())
//!     .expect("valid service");
//! state.mark_synced();
//!
//! let services = state.services_by_namespace_name("testns", "svc1").expect("lookup");
//! assert_eq!(services.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod snapshot;
pub mod state;
pub mod traits;

pub use error::{IndexError, Result};
pub use snapshot::Snapshot;
pub use state::{ClusterState, IndexStats};
pub use traits::ClusterIndex;
