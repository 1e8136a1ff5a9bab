//! The meeting-search assistant.
//!
//! The assistant answers free-text questions and may suggest meetings.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::clients::{ApiClient, HttpMethod, HttpRequest};
use crate::rest::{ApiResult, ErrorMessages, Message, LOGIN_REQUIRED};

const MESSAGE: ErrorMessages =
    ErrorMessages::new(Message::ServerOr("A temporary error occurred. Please try again shortly."))
        .on(&[
            (400, Message::Fixed("Invalid request. Check your message.")),
            (401, LOGIN_REQUIRED),
            (429, Message::Fixed("Too many requests. Please try again shortly.")),
            (500, Message::Fixed("The AI service is having a temporary problem.")),
        ])
        .network("Check your network connection.")
        .rejected(Message::ServerOr("Could not process the reply."));

const HISTORY: ErrorMessages =
    ErrorMessages::new(Message::Fixed("Could not load the conversation history."));

/// What the assistant understood the question to be about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentType {
    /// Looking for a meeting.
    MeetingSearch,
    /// Asking how the service works.
    ServiceGuide,
    /// Anything else.
    General,
}

/// A meeting suggested in a reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedMeeting {
    /// Meeting ID.
    pub meeting_id: i64,
    /// Title.
    pub title: String,
    /// Mart display name.
    #[serde(default)]
    pub mart_name: Option<String>,
    /// When the meeting takes place (backend local time).
    #[serde(default)]
    pub meeting_date: Option<NaiveDateTime>,
    /// Why the assistant picked it.
    #[serde(default)]
    pub suggestion_reason: Option<String>,
    /// Seats taken.
    #[serde(default)]
    pub current_participants: Option<u32>,
    /// Seat limit.
    #[serde(default)]
    pub max_participants: Option<u32>,
    /// Lifecycle state as reported by the assistant.
    #[serde(default)]
    pub status: Option<String>,
    /// Mart address.
    #[serde(default)]
    pub mart_address: Option<String>,
}

/// The assistant's reply to a message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    /// Reply text.
    pub response: String,
    /// Meetings suggested with the reply.
    #[serde(default)]
    pub suggested_meetings: Vec<SuggestedMeeting>,
    /// Detected intent.
    pub intent_type: IntentType,
    /// ID of the stored conversation turn.
    #[serde(default)]
    pub conversation_id: Option<i64>,
}

/// A suggestion recorded in the conversation history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRef {
    /// Meeting ID.
    pub meeting_id: i64,
    /// Title.
    pub title: String,
    /// Why the assistant picked it.
    #[serde(default)]
    pub suggestion_reason: Option<String>,
}

/// One past exchange with the assistant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    /// Turn ID.
    pub conversation_id: i64,
    /// What the user asked.
    pub user_message: String,
    /// What the assistant answered.
    pub bot_response: String,
    /// Detected intent.
    pub intent_type: IntentType,
    /// When the exchange happened (backend local time).
    pub created_at: NaiveDateTime,
    /// Meetings suggested in the answer.
    #[serde(default)]
    pub suggested_meetings: Vec<SuggestionRef>,
}

/// Assistant endpoints.
#[derive(Clone, Copy, Debug)]
pub struct ChatbotApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ChatbotApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /chatbot/message`
    pub async fn send_message(&self, message: &str) -> ApiResult<ChatReply> {
        let request = HttpRequest::builder(HttpMethod::Post, "/chatbot/message")
            .json(serde_json::json!({ "message": message }));
        let outcome = self
            .client
            .fetch_envelope(request)
            .await
            .map(|envelope| MESSAGE.accept(envelope));
        MESSAGE.settle("chatbot.send_message", outcome)
    }

    /// `GET /chatbot/history`
    ///
    /// A failed result still carries an empty history.
    pub async fn history(&self) -> ApiResult<Vec<ConversationTurn>> {
        let request = HttpRequest::builder(HttpMethod::Get, "/chatbot/history");
        let outcome = self
            .client
            .fetch_envelope(request)
            .await
            .map(|envelope| HISTORY.accept(envelope));
        HISTORY.settle("chatbot.history", outcome).or_data(Vec::new())
    }
}
