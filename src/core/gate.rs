use crate::models::{ClassificationResult, Verdict};
use crate::services::classifier::{ClassifierError, QueryClassifier};
use std::sync::Arc;

/// What happened when the gate looked at a query
#[derive(Debug)]
pub enum GateOutcome {
    /// Blank text, nothing was sent
    Skipped,
    Answered(Verdict),
    Failed(ClassifierError),
}

impl GateOutcome {
    /// Fail-open: only an explicit negative answer rejects
    pub fn result(&self) -> ClassificationResult {
        match self {
            GateOutcome::Answered(Verdict::OutOfDomain) => ClassificationResult::reject(),
            _ => ClassificationResult::allow(),
        }
    }
}

/// Decides whether free text is a car search before any search work is done
///
/// The classification dependency is advisory. A degraded backend must never
/// block a search, so every failure resolves to "in domain".
#[derive(Clone)]
pub struct ClassifierGate {
    classifier: Arc<dyn QueryClassifier>,
}

impl ClassifierGate {
    pub fn new(classifier: Arc<dyn QueryClassifier>) -> Self {
        Self { classifier }
    }

    /// Classify the text, single attempt, never fails
    pub async fn classify(&self, text: &str) -> ClassificationResult {
        self.inspect(text).await.result()
    }

    /// Same as [`classify`](Self::classify) but keeps the underlying cause
    pub async fn inspect(&self, text: &str) -> GateOutcome {
        let text = text.trim();
        if text.is_empty() {
            return GateOutcome::Skipped;
        }

        let outcome = match self.classifier.classify(text).await {
            Ok(verdict) => GateOutcome::Answered(verdict),
            Err(e) => GateOutcome::Failed(e),
        };

        match &outcome {
            GateOutcome::Answered(Verdict::Indeterminate(raw)) => {
                tracing::warn!(
                    "Classifier {} gave an indeterminate answer {:?}, allowing query",
                    self.classifier.name(),
                    raw
                );
            }
            GateOutcome::Failed(ClassifierError::RateLimited(msg)) => {
                tracing::warn!("Classifier {} rate limited ({}), allowing query", self.classifier.name(), msg);
            }
            GateOutcome::Failed(ClassifierError::PaymentRequired(msg)) => {
                tracing::warn!("Classifier {} requires payment ({}), allowing query", self.classifier.name(), msg);
            }
            GateOutcome::Failed(e) => {
                tracing::warn!("Classifier {} failed ({}), allowing query", self.classifier.name(), e);
            }
            GateOutcome::Answered(verdict) => {
                tracing::debug!("Classifier {} verdict: {:?}", self.classifier.name(), verdict);
            }
            GateOutcome::Skipped => {}
        }

        outcome
    }
}
