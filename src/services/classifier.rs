use crate::models::Verdict;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// The single answer accepted as "car-related"
pub const POSITIVE_TOKEN: &str = "yes";
/// The single answer accepted as "not car-related"
pub const NEGATIVE_TOKEN: &str = "no";

pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-lite";

const SYSTEM_PROMPT: &str = "You are a classifier that determines if a user query is related to cars, vehicles, or automotive topics.

A query is car-related if it mentions:
- Car brands, models, types (sedan, SUV, truck, etc.)
- Car features (fuel economy, horsepower, seats, cargo space, etc.)
- Car buying, selling, or recommendations
- Driving, commuting, road trips
- Vehicle maintenance, parts, or accessories
- Price ranges or budgets for vehicles
- Any automotive-related preferences

Respond with ONLY \"yes\" if car-related, or \"no\" if not car-related. Nothing else.";

/// Errors that can occur when asking a backend to classify a query
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Rate limited by classifier: {0}")]
    RateLimited(String),

    #[error("Payment required by classifier: {0}")]
    PaymentRequired(String),

    #[error("Classifier returned status {0}: {1}")]
    Status(u16, String),

    #[error("Invalid response format: {0}")]
    MalformedResponse(String),

    #[error("Classifier API key is not configured")]
    MissingApiKey,
}

/// A backend able to label free text as car-related or not
#[async_trait]
pub trait QueryClassifier: Send + Sync {
    /// Backend name, for logs
    fn name(&self) -> &str;

    /// Classify non-empty query text
    async fn classify(&self, text: &str) -> Result<Verdict, ClassifierError>;
}

/// Map a textual model answer onto a verdict
///
/// Only the exact tokens (ignoring case and surrounding whitespace) are
/// definitive; everything else is indeterminate.
pub fn resolve_answer(answer: &str) -> Verdict {
    let normalized = answer.trim().to_lowercase();
    if normalized == POSITIVE_TOKEN {
        Verdict::InDomain
    } else if normalized == NEGATIVE_TOKEN {
        Verdict::OutOfDomain
    } else {
        Verdict::Indeterminate(answer.to_string())
    }
}

fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build classifier HTTP client ({}), using defaults", e);
            Client::new()
        })
}

/// Turn 429/402/non-2xx responses into typed errors
async fn check_status(response: Response) -> Result<Response, ClassifierError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(body);

    Err(match status {
        StatusCode::TOO_MANY_REQUESTS => ClassifierError::RateLimited(message),
        StatusCode::PAYMENT_REQUIRED => ClassifierError::PaymentRequired(message),
        other => ClassifierError::Status(other.as_u16(), message),
    })
}

async fn read_json(response: Response) -> Result<Value, ClassifierError> {
    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| ClassifierError::MalformedResponse(format!("body is not JSON: {}", e)))
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

/// Classifier backed by an OpenAI-compatible chat-completions gateway
pub struct ChatCompletionsClassifier {
    endpoint: String,
    api_key: Option<String>,
    model: String,
    client: Client,
}

impl ChatCompletionsClassifier {
    pub fn new(endpoint: String, api_key: Option<String>, model: String, timeout_secs: u64) -> Self {
        Self {
            endpoint,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model,
            client: build_client(timeout_secs),
        }
    }
}

#[async_trait]
impl QueryClassifier for ChatCompletionsClassifier {
    fn name(&self) -> &str {
        "chat-completions"
    }

    async fn classify(&self, text: &str) -> Result<Verdict, ClassifierError> {
        let api_key = self.api_key.as_deref().ok_or(ClassifierError::MissingApiKey)?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: text },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let json = read_json(check_status(response).await?).await?;

        let answer = json
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| ClassifierError::MalformedResponse("missing choices[0].message.content".into()))?;

        tracing::debug!("Classifier answered {:?} for query {:?}", answer, text);

        Ok(resolve_answer(answer))
    }
}

/// Classifier backed by a remote validation function speaking
/// `{ "query": .. }` -> `{ "isCarRelated": bool }`
pub struct ValidationServiceClient {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl ValidationServiceClient {
    pub fn new(endpoint: String, api_key: Option<String>, timeout_secs: u64) -> Self {
        Self {
            endpoint,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client: build_client(timeout_secs),
        }
    }
}

#[async_trait]
impl QueryClassifier for ValidationServiceClient {
    fn name(&self) -> &str {
        "validation-service"
    }

    async fn classify(&self, text: &str) -> Result<Verdict, ClassifierError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "query": text }));

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let json = read_json(check_status(response).await?).await?;

        match json.get("isCarRelated").and_then(Value::as_bool) {
            Some(true) => Ok(Verdict::InDomain),
            Some(false) => Ok(Verdict::OutOfDomain),
            None => Err(ClassifierError::MalformedResponse("missing boolean isCarRelated".into())),
        }
    }
}
