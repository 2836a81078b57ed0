//! Command implementations.

pub mod ask;
pub mod ingest;
pub mod session;

pub use self::ask::{execute_ask, execute_batch};
pub use self::ingest::{build_ingest_task, execute_ingest};
pub use self::session::{build_completion_provider, open_session};
