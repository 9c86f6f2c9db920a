//! Courier Offline - Client-Side Resilience Stack
//!
//! The offline-first half of Courier: lets a client keep accepting
//! submissions while disconnected and reconcile them with the queue engine
//! once connectivity returns.
//!
//! - [`ConnectivityMonitor`] decides reachability from a cached platform
//!   flag plus an active short-timeout probe
//! - [`SubmissionRouter`] delivers directly when online and diverts to the
//!   [`OfflineStore`] otherwise, answering with a uniform acknowledgment
//! - [`ReconciliationDriver`] drains the store on any of its trigger
//!   signals, with at-most-one resubmission in flight per record
//! - [`ClientEvent`] notifies consumers of stored/synced/failed records
//!
//! A stored record is delivered to the engine exactly enough times to
//! succeed once, despite connectivity flaps, duplicate triggers, and
//! process restarts (when backed by the durable [`JsonFileStore`]).

pub mod config;
pub mod connectivity;
pub mod error;
pub mod events;
pub mod intake;
pub mod record;
pub mod router;
pub mod store;
pub mod sync;

pub use config::OfflineConfig;
pub use connectivity::ConnectivityMonitor;
pub use error::{OfflineError, OfflineResult};
pub use events::ClientEvent;
pub use intake::{HttpIntake, JobIntake};
pub use record::{OfflineRecord, OfflineStatus};
pub use router::{JobSnapshot, SubmissionAck, SubmissionRouter};
pub use store::{JsonFileStore, MemoryOfflineStore, OfflineStore};
pub use sync::{DrainReport, ReconciliationDriver, SyncTrigger};
