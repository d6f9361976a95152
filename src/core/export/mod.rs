//! Export orchestration
//!
//! The stage machine, progress reporting, filename computation, run
//! summary, and the pipeline driver that ties the stages together.

pub mod filename;
pub mod pipeline;
pub mod progress;
pub mod summary;

pub use filename::{export_filename, sanitize, USERNAMES_IN_FILENAME};
pub use pipeline::{ExportArtifact, ExportOptions, ExportOutcome, ExportPipeline};
pub use progress::{ExportStage, NoopProgress, ProgressObserver, ProgressUpdate, StageMachine};
pub use summary::ExportSummary;
