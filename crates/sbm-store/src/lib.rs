//! Persistence for Super Beatmaker runs.
//!
//! Two ports sit here. [`RunStore`] keeps the one live snapshot between
//! sessions (last write wins). [`export_run`] and [`import_run`] move a run
//! in and out as a readable JSON document.

pub mod error;
pub mod store;
pub mod transfer;

pub use error::{StoreError, StoreResult};
pub use store::{FileStore, MemoryStore, RunStore};
pub use transfer::{export_run, import_run};
