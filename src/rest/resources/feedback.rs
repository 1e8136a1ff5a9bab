//! Post-meeting feedback and trust scores.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::auth::TrustGrade;
use crate::clients::{ApiClient, HttpMethod, HttpRequest};
use crate::rest::{ApiResult, ErrorMessages, Message};

const NETWORK: &str = "A network error occurred.";

const CREATE: ErrorMessages =
    ErrorMessages::new(Message::ServerOr("Could not submit feedback.")).network(NETWORK);

const LIST: ErrorMessages =
    ErrorMessages::new(Message::ServerOr("Could not load feedback.")).network(NETWORK);

const SCORE: ErrorMessages =
    ErrorMessages::new(Message::ServerOr("Could not load the trust score.")).network(NETWORK);

/// Whether a member was a good partner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackType {
    /// Raises the receiver's trust score.
    Positive,
    /// Lowers the receiver's trust score.
    Negative,
}

/// Which side of the feedback to list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FeedbackDirection {
    /// Feedback the user received.
    #[default]
    Received,
    /// Feedback the user gave.
    Given,
}

impl FeedbackDirection {
    /// Returns the backend name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "RECEIVED",
            Self::Given => "GIVEN",
        }
    }
}

impl fmt::Display for FeedbackDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a feedback submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedback {
    /// Meeting the feedback is about.
    pub meeting_id: i64,
    /// User giving the feedback.
    pub giver_id: i64,
    /// User receiving the feedback.
    pub receiver_id: i64,
    /// Positive or negative.
    pub feedback_type: FeedbackType,
}

/// The user who gave a piece of feedback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackGiver {
    /// Backend user ID.
    pub user_id: i64,
    /// Display name.
    pub nickname: String,
}

/// A piece of feedback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    /// Feedback ID.
    pub feedback_id: i64,
    /// Who gave it.
    pub giver_user: FeedbackGiver,
    /// Positive or negative.
    pub feedback_type: FeedbackType,
    /// When it was given (backend local time).
    pub created_at: NaiveDateTime,
}

/// A user's trust score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackScore {
    /// Backend user ID.
    pub user_id: i64,
    /// Trust score.
    pub score: i32,
    /// Trust tier for the score.
    #[serde(default)]
    pub trust_grade: Option<TrustGrade>,
}

/// Feedback endpoints.
#[derive(Clone, Copy, Debug)]
pub struct FeedbackApi<'a> {
    client: &'a ApiClient,
}

impl<'a> FeedbackApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /feedbacks`
    ///
    /// Returns the receiver's updated score.
    pub async fn create(&self, feedback: &NewFeedback) -> ApiResult<FeedbackScore> {
        let outcome = match serde_json::to_value(feedback) {
            Ok(json) => {
                tracing::debug!(
                    meeting_id = feedback.meeting_id,
                    receiver_id = feedback.receiver_id,
                    "submitting feedback"
                );
                let request = HttpRequest::builder(HttpMethod::Post, "/feedbacks").json(json);
                self.client
                    .fetch_envelope(request)
                    .await
                    .map(|envelope| CREATE.accept(envelope))
            }
            Err(e) => Err(e.into()),
        };
        CREATE.settle("feedback.create", outcome)
    }

    /// `GET /feedbacks/users/{id}?type=RECEIVED|GIVEN`
    pub async fn for_user(&self, user_id: i64, direction: FeedbackDirection) -> ApiResult<Vec<Feedback>> {
        let request = HttpRequest::builder(HttpMethod::Get, format!("/feedbacks/users/{user_id}"))
            .query_param("type", direction.as_str());
        let outcome = self
            .client
            .fetch_envelope(request)
            .await
            .map(|envelope| LIST.accept(envelope));
        LIST.settle("feedback.for_user", outcome)
    }

    /// `GET /feedbacks/users/{id}/score`
    pub async fn score(&self, user_id: i64) -> ApiResult<FeedbackScore> {
        let request =
            HttpRequest::builder(HttpMethod::Get, format!("/feedbacks/users/{user_id}/score"));
        let outcome = self
            .client
            .fetch_envelope(request)
            .await
            .map(|envelope| SCORE.accept(envelope));
        SCORE.settle("feedback.score", outcome)
    }
}
