//! # Pagesmith project store
//!
//! Saves whole projects into a capacity-bounded key-value backend.
//!
//! ```text
//! ProjectRecord ──strip──► JSON ──zstd──► KvBackend (memory | files)
//!                                             │
//!            evict least-recently-updated ◄───┤ over budget / record cap
//!            clear all other projects    ◄────┘ backend quota hit
//! ```
//!
//! Backups leave through [`Exporter`], which tries each [`ExportSink`] in
//! turn, and come back through [`import_project`].

pub mod backend;
pub mod codec;
mod error;
pub mod export;
mod record;
mod store;

pub use backend::{FileBackend, KvBackend, MemoryBackend};
pub use error::{BackendError, StoreError, StoreResult};
pub use export::{
    import_project, to_data_uri, Base64Sink, Delivery, ExportSink, ExportedProject, Exporter,
    FileSink, WriterSink, EXPORT_VERSION,
};
pub use record::{new_project_id, ProjectRecord};
pub use store::{Clock, ProjectStore, StoreConfig, StoreStats, SystemClock};
