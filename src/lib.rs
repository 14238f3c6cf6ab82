//! Car query service
//!
//! Validates free-text car searches with a fail-open classifier gate, records
//! history for signed-in users and filters a candidate inventory.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{evaluate, matches_filters, ClassifierGate, QueryOrchestrator, SearchOutcome, SubmissionError};
pub use models::{VehicleListing, FilterSet, VehicleQuery, ClassificationResult, HistoryRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let result = evaluate(Vec::new(), &FilterSet::default());
        assert!(result.is_empty());
    }
}
