//! Coaching service client - HTTP implementation of the collaborator ports.
//!
//! One client covers the recovery planner, the coaching advisor and the
//! progress ledger, which all live behind the same coaching service.
//!
//! # Configuration
//!
//! ```ignore
//! let config = CoachingClientConfig::new("https://coach.example.com")
//!     .with_api_key(api_key)
//!     .with_timeout(Duration::from_secs(5));
//!
//! let client = CoachingServiceClient::new(config)?;
//! ```
//!
//! # Endpoints
//!
//! | Port | Request |
//! |------|---------|
//! | `RecoveryPlanner::request_plan` | `POST /v1/recovery-plans` |
//! | `CoachingAdvisor::propose_next_level` | `POST /v1/progressions` |
//! | `CoachingAdvisor::request_pattern_analysis` | `POST /v1/analyses` |
//! | `ProgressLedger::award` | `POST /v1/ledger/awards` |

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::domain::foundation::UserId;
use crate::domain::habit::{DifficultyTier, HabitContext, SetbackEvent};
use crate::ports::{CoachingAdvisor, CollaboratorError, ProgressLedger, RecoveryPlanner};

/// Configuration for the coaching service client.
#[derive(Debug, Clone)]
pub struct CoachingClientConfig {
    /// Base URL without trailing slash.
    pub base_url: String,
    /// Bearer token, if the service requires one.
    api_key: Option<Secret<String>>,
    /// Request timeout.
    pub timeout: Duration,
}

impl CoachingClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret().as_str())
    }
}

#[derive(Debug, Serialize)]
struct RecoveryPlanRequest<'a> {
    owner_id: &'a UserId,
    setback: &'a SetbackEvent,
    habit: &'a HabitContext,
}

#[derive(Debug, Serialize)]
struct ProgressionRequest<'a> {
    owner_id: &'a UserId,
    habit: &'a HabitContext,
    next_tier: DifficultyTier,
}

#[derive(Debug, Serialize)]
struct AnalysisRequest<'a> {
    owner_id: &'a UserId,
    habit: &'a HabitContext,
}

#[derive(Debug, Serialize)]
struct AwardRequest<'a> {
    owner_id: &'a UserId,
    event_type: &'a str,
    xp: u32,
}

/// HTTP client for the coaching service.
pub struct CoachingServiceClient {
    config: CoachingClientConfig,
    client: Client,
}

impl CoachingServiceClient {
    /// # Errors
    ///
    /// - `Unavailable` if the HTTP client cannot be built
    pub fn new(config: CoachingClientConfig) -> Result<Self, CollaboratorError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CollaboratorError::unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Posts a JSON body and maps transport and status failures.
    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<(), CollaboratorError> {
        let url = self.url(path);
        let mut request = self.client.post(&url).json(body);
        if let Some(key) = self.config.api_key() {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                CollaboratorError::Timeout {
                    timeout_secs: self.config.timeout.as_secs(),
                }
            } else if e.is_connect() {
                CollaboratorError::network(format!("Connection failed: {}", e))
            } else if e.is_builder() || e.is_body() {
                CollaboratorError::Serialization(e.to_string())
            } else {
                CollaboratorError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(url = %url, status = status.as_u16(), "Coaching service accepted request");
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(CollaboratorError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl RecoveryPlanner for CoachingServiceClient {
    async fn request_plan(
        &self,
        owner_id: &UserId,
        setback: &SetbackEvent,
        habit: &HabitContext,
    ) -> Result<(), CollaboratorError> {
        let body = RecoveryPlanRequest {
            owner_id,
            setback,
            habit,
        };
        self.post("/v1/recovery-plans", &body).await
    }
}

#[async_trait]
impl CoachingAdvisor for CoachingServiceClient {
    async fn propose_next_level(
        &self,
        owner_id: &UserId,
        habit: &HabitContext,
        next_tier: DifficultyTier,
    ) -> Result<(), CollaboratorError> {
        let body = ProgressionRequest {
            owner_id,
            habit,
            next_tier,
        };
        self.post("/v1/progressions", &body).await
    }

    async fn request_pattern_analysis(
        &self,
        owner_id: &UserId,
        habit: &HabitContext,
    ) -> Result<(), CollaboratorError> {
        self.post("/v1/analyses", &AnalysisRequest { owner_id, habit }).await
    }
}

#[async_trait]
impl ProgressLedger for CoachingServiceClient {
    async fn award(&self, owner_id: &UserId, event_type: &str, xp: u32) -> Result<(), CollaboratorError> {
        let body = AwardRequest {
            owner_id,
            event_type,
            xp,
        };
        self.post("/v1/ledger/awards", &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::habit::{Cadence, Habit, HabitDefinition};

    #[test]
    fn config_builder_works() {
        let config = CoachingClientConfig::new("https://coach.example.com/")
            .with_api_key("test-key")
            .with_timeout(Duration::from_secs(3));

        assert_eq!(config.base_url, "https://coach.example.com");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.api_key(), Some("test-key"));
    }

    #[test]
    fn api_key_is_not_in_debug_output() {
        let config = CoachingClientConfig::new("http://localhost").with_api_key("super-secret");
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    #[test]
    fn urls_are_joined_to_base() {
        let client = CoachingServiceClient::new(CoachingClientConfig::new("http://coach:8080")).unwrap();
        assert_eq!(client.url("/v1/analyses"), "http://coach:8080/v1/analyses");
    }

    #[test]
    fn award_body_shape() {
        let owner = UserId::new("u-1").unwrap();
        let body = AwardRequest {
            owner_id: &owner,
            event_type: "habit_completion",
            xp: 30,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"owner_id": "u-1", "event_type": "habit_completion", "xp": 30}));
    }

    #[test]
    fn progression_body_carries_next_tier() {
        let owner = UserId::new("u-1").unwrap();
        let habit = Habit::new(owner.clone(), HabitDefinition::new("Read", Cadence::Daily), Timestamp::now())
            .unwrap()
            .context();
        let body = ProgressionRequest {
            owner_id: &owner,
            habit: &habit,
            next_tier: DifficultyTier::Small,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["next_tier"], "small");
        assert_eq!(json["habit"]["title"], "Read");
    }

    #[tokio::test]
    async fn unreachable_service_is_a_network_or_timeout_error() {
        let config = CoachingClientConfig::new("http://127.0.0.1:1").with_timeout(Duration::from_secs(2));
        let client = CoachingServiceClient::new(config).unwrap();
        let owner = UserId::new("u-1").unwrap();

        let err = client.award(&owner, "habit_completion", 5).await.unwrap_err();
        assert!(matches!(
            err,
            CollaboratorError::Network(_) | CollaboratorError::Timeout { .. }
        ));
    }
}
