//! Infrastructure layer - snapshot files in, result file out

pub mod result_writer;
pub mod snapshot_loader;

pub use result_writer::ResultWriter;
pub use snapshot_loader::SnapshotLoader;
