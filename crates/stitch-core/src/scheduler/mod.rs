//! Run scheduling: admission-limited segment fetches, progress tracking and
//! reporting, and the end-to-end manifest pipeline
//! (manifest -> coordinator -> reassembler).

mod coordinator;
mod progress;
mod reporter;
mod run;

pub use coordinator::Coordinator;
pub use progress::{ProgressCounters, ProgressStats, ProgressTracker};
pub use reporter::ProgressReporter;
pub use run::{load_manifest, run_manifest, run_segments, RunOptions, RunReport};
