use crate::core::{filters::evaluate, gate::ClassifierGate};
use crate::models::{HistoryRecord, VehicleListing, VehicleQuery};
use crate::services::{HistoryStore, InventorySource};
use std::sync::Arc;
use thiserror::Error;

/// The only failures a caller ever sees from a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Tell us what kind of car you're looking for, or pick at least one filter.")]
    EmptySubmission,

    #[error("That doesn't look like a car search. Try describing the vehicle you want, e.g. 'family SUV under $35,000'.")]
    OutOfDomain,
}

impl SubmissionError {
    pub fn code(&self) -> &'static str {
        match self {
            SubmissionError::EmptySubmission => "empty_submission",
            SubmissionError::OutOfDomain => "out_of_domain",
        }
    }
}

/// Result of a completed submission
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub query: VehicleQuery,
    pub matches: Vec<VehicleListing>,
    pub total_candidates: usize,
    pub results_path: String,
}

/// Runs a submission through the pipeline
///
/// # Pipeline Stages
/// 1. Reject empty submissions
/// 2. Classifier gate (only for non-blank text)
/// 3. Best-effort history write (only for signed-in users)
/// 4. Filter the candidate set
#[derive(Clone)]
pub struct QueryOrchestrator {
    gate: ClassifierGate,
    history: Option<Arc<dyn HistoryStore>>,
    inventory: Arc<dyn InventorySource>,
}

impl QueryOrchestrator {
    pub fn new(
        gate: ClassifierGate,
        history: Option<Arc<dyn HistoryStore>>,
        inventory: Arc<dyn InventorySource>,
    ) -> Self {
        Self {
            gate,
            history,
            inventory,
        }
    }

    pub fn gate(&self) -> &ClassifierGate {
        &self.gate
    }

    pub fn history(&self) -> Option<&Arc<dyn HistoryStore>> {
        self.history.as_ref()
    }

    /// Submit a search
    ///
    /// # Arguments
    /// * `query` - Free text and filters as submitted
    /// * `actor` - Signed-in user id, if any
    pub async fn submit(
        &self,
        query: VehicleQuery,
        actor: Option<&str>,
    ) -> Result<SearchOutcome, SubmissionError> {
        let query = VehicleQuery::new(query.text.trim(), query.filters);
        let has_text = !query.text.is_empty();

        if !has_text && query.filters.is_identity() {
            return Err(SubmissionError::EmptySubmission);
        }

        if has_text && !self.gate.classify(&query.text).await.is_in_domain {
            tracing::info!("Rejected out-of-domain query: {:?}", query.text);
            return Err(SubmissionError::OutOfDomain);
        }

        if let (Some(user_id), Some(history)) = (actor.filter(|id| !id.trim().is_empty()), &self.history) {
            let record = HistoryRecord::new(user_id, &query);
            if let Err(e) = history.record(&record).await {
                tracing::warn!("Failed to record search history for {}: {}", user_id, e);
            }
        }

        Ok(self.browse(query).await)
    }

    /// Filter the candidate set without classification or history
    pub async fn browse(&self, query: VehicleQuery) -> SearchOutcome {
        let candidates = self.load_candidates().await;
        let total_candidates = candidates.len();
        let matches = evaluate(candidates, &query.filters);

        tracing::debug!("{} of {} candidates matched", matches.len(), total_candidates);

        SearchOutcome {
            results_path: query.results_path(),
            query,
            matches,
            total_candidates,
        }
    }

    async fn load_candidates(&self) -> Vec<VehicleListing> {
        match self.inventory.listings().await {
            Ok(listings) => listings,
            Err(e) => {
                tracing::error!("Failed to load inventory, returning no candidates: {}", e);
                Vec::new()
            }
        }
    }
}
