//! Scheduled post publication.
//!
//! ```text
//! runner (timer, every period) ─┐
//!                               ├─► Publisher::publish_due_posts ─► PostStore
//! GET /trigger-scheduler ───────┘        find_due / publish (CAS)
//! ```

pub mod memory;
pub mod publisher;
pub mod runner;
pub mod store;

pub use memory::MemoryPostStore;
pub use publisher::{Publisher, SweepReport};
pub use runner::SchedulerHandle;
pub use store::{PgPostStore, PostStore, StoreError};
