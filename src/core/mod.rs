// Core pipeline exports
pub mod filters;
pub mod gate;
pub mod orchestrator;

pub use filters::{evaluate, matches_filters};
pub use gate::{ClassifierGate, GateOutcome};
pub use orchestrator::{QueryOrchestrator, SearchOutcome, SubmissionError};
