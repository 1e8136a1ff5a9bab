//! Host-side participant management.

use serde::{Deserialize, Serialize};

use crate::clients::{ApiClient, HttpMethod, HttpRequest};
use crate::rest::{ApiResult, ErrorMessages, Message, LOGIN_REQUIRED};

const LIST: ErrorMessages =
    ErrorMessages::new(Message::Fixed("Error while loading participants."))
        .on(&[
            (403, Message::Fixed("You do not have permission to view participants.")),
            (401, LOGIN_REQUIRED),
        ])
        .rejected(Message::ServerOr("Could not load participants."));

const APPROVE: ErrorMessages =
    ErrorMessages::new(Message::Fixed("Error while approving the participant."))
        .on(&[
            (403, Message::Fixed("Only the host can approve participants.")),
            (401, LOGIN_REQUIRED),
        ])
        .rejected(Message::ServerOr("Could not approve the participant."))
        .accepted("Participant approved.");

const REJECT: ErrorMessages =
    ErrorMessages::new(Message::ServerOr("Error while rejecting the participant."))
        .on(&[
            (403, Message::Fixed("Only the host can reject participants.")),
            (401, LOGIN_REQUIRED),
        ])
        .rejected(Message::ServerOr("Could not reject the participant."))
        .accepted("Participant rejected.");

/// Review state of an application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    /// Awaiting the host's decision.
    Pending,
    /// Accepted by the host.
    Approved,
    /// Declined by the host.
    Rejected,
}

/// An applicant or approved member, as seen by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Backend user ID.
    pub user_id: i64,
    /// Display name.
    pub nickname: String,
    /// Profile image URL.
    #[serde(default)]
    pub profile_image_url: Option<String>,
    /// The applicant's trust score.
    #[serde(rename = "trusterScore")]
    pub trust_score: i32,
    /// Number of missed meetings.
    pub no_show_count: i32,
    /// Review state.
    pub application_status: ApplicationStatus,
}

/// Participants of a meeting, split by review state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantList {
    /// Approved members.
    #[serde(default)]
    pub approved: Vec<Participant>,
    /// Applications awaiting review.
    #[serde(default)]
    pub pending: Vec<Participant>,
}

/// Host-side participant endpoints.
#[derive(Clone, Copy, Debug)]
pub struct ParticipantsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ParticipantsApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /meetings/{id}/participants`
    ///
    /// A failed result still carries empty `approved` and `pending` lists.
    pub async fn list(&self, meeting_id: i64) -> ApiResult<ParticipantList> {
        let request =
            HttpRequest::builder(HttpMethod::Get, format!("/meetings/{meeting_id}/participants"));
        let outcome = self
            .client
            .fetch_envelope(request)
            .await
            .map(|envelope| LIST.accept(envelope));
        LIST.settle("participants.list", outcome)
            .or_data(ParticipantList::default())
    }

    /// `POST /meetings/{id}/participants/{participant}/approve` (host only)
    pub async fn approve(&self, meeting_id: i64, participant_id: i64) -> ApiResult<serde_json::Value> {
        let request = HttpRequest::builder(
            HttpMethod::Post,
            format!("/meetings/{meeting_id}/participants/{participant_id}/approve"),
        );
        let outcome = self
            .client
            .fetch_envelope(request)
            .await
            .map(|envelope| APPROVE.accept(envelope));
        APPROVE.settle("participants.approve", outcome)
    }

    /// `DELETE /meetings/{id}/participants/{participant}/reject` (host only)
    pub async fn reject(&self, meeting_id: i64, participant_id: i64) -> ApiResult<serde_json::Value> {
        let request = HttpRequest::builder(
            HttpMethod::Delete,
            format!("/meetings/{meeting_id}/participants/{participant_id}/reject"),
        );
        let outcome = self
            .client
            .fetch_envelope(request)
            .await
            .map(|envelope| REJECT.accept(envelope));
        REJECT.settle("participants.reject", outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_participant_list_deserializes() {
        let list: ParticipantList = serde_json::from_value(json!({
            "approved": [{
                "userId": 1,
                "nickname": "host",
                "profileImageUrl": null,
                "trusterScore": 510,
                "noShowCount": 0,
                "applicationStatus": "APPROVED"
            }],
            "pending": [{
                "userId": 2,
                "nickname": "newbie",
                "trusterScore": 300,
                "noShowCount": 1,
                "applicationStatus": "PENDING"
            }]
        }))
        .unwrap();

        assert_eq!(list.approved[0].trust_score, 510);
        assert_eq!(list.pending[0].application_status, ApplicationStatus::Pending);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let list: ParticipantList = serde_json::from_value(json!({})).unwrap();
        assert_eq!(list, ParticipantList::default());
    }

    #[test]
    fn test_list_messages() {
        assert_eq!(
            LIST.for_status(403, Some("no")),
            "You do not have permission to view participants."
        );
        assert_eq!(LIST.for_status(401, None), "Login required.");
    }
}
