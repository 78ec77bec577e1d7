pub mod clone;
pub mod diff;
pub mod highlight;
pub mod probe;

pub use clone::{CloneOutcome, CloneRequest, CloneWorker};
pub use diff::{DiffRequest, DiffResult, DiffWorker};
pub use highlight::{HighlightRequest, HighlightResult, HighlightWorker};
pub use probe::{PathProbe, ProbeRequest, ProbeResult};
