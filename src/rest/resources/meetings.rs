//! Meeting endpoints.
//!
//! Covers search, detail, the host lifecycle (create, update, close
//! recruitment, complete, delete) and membership (join, leave), plus the
//! paged lists shown on a user's profile.
//!
//! # Example
//!
//! ```rust,ignore
//! use banthing_client::rest::resources::{ImageUpload, NewMeeting};
//! use chrono::NaiveDate;
//!
//! let meeting = NewMeeting {
//!     mart_id: 1,
//!     title: "Costco bulk rice".to_string(),
//!     description: "Splitting a 20kg bag".to_string(),
//!     meeting_date: NaiveDate::from_ymd_opt(2025, 10, 3)
//!         .unwrap()
//!         .and_hms_opt(14, 0, 0)
//!         .unwrap(),
//!     max_participants: 4,
//!     thumbnail_image_url: None,
//! };
//!
//! let image = ImageUpload::new("rice.jpg", "image/jpeg", std::fs::read("rice.jpg")?);
//! let created = client.meetings().create(&meeting, Some(image)).await;
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::clients::{ApiClient, HttpMethod, HttpRequest, HttpRequestBuilder, MultipartBody};
use crate::rest::{ApiResult, ErrorMessages, Message, ResourceError, LOGIN_REQUIRED};

const SERVER_ERROR: Message = Message::Fixed("Server communication error.");

const SEARCH: ErrorMessages = ErrorMessages::new(SERVER_ERROR)
    .rejected(Message::Fixed("Could not load meetings."));

const DETAIL: ErrorMessages = ErrorMessages::new(SERVER_ERROR)
    .on(&[
        (404, Message::Fixed("Meeting does not exist.")),
        (401, LOGIN_REQUIRED),
    ])
    .rejected(Message::ServerOr("Could not load the meeting."));

const CREATE: ErrorMessages = ErrorMessages::new(SERVER_ERROR)
    .rejected(Message::ServerOr("Could not create the meeting."));

const UPDATE: ErrorMessages = ErrorMessages::new(Message::Fixed("Error while editing the meeting."))
    .on(&[
        (403, Message::Fixed("Only the host can edit the meeting.")),
        (401, LOGIN_REQUIRED),
        (400, Message::ServerOr("Check the meeting details.")),
    ])
    .rejected(Message::ServerOr("Could not edit the meeting."))
    .accepted("Meeting updated.");

const DELETE: ErrorMessages = ErrorMessages::new(Message::Fixed("Error while deleting the meeting."))
    .on(&[
        (403, Message::Fixed("Only the host can delete the meeting.")),
        (401, LOGIN_REQUIRED),
    ])
    .rejected(Message::ServerOr("Could not delete the meeting."))
    .accepted("Meeting deleted.");

const JOIN: ErrorMessages = ErrorMessages::new(Message::Fixed("Error while applying."))
    .on(&[
        (400, Message::ServerOr("Cannot apply to this meeting.")),
        (
            403,
            Message::ServerOr("Your application was rejected. Try another meeting."),
        ),
        (409, Message::Fixed("Already joined or applied to this meeting.")),
        (401, LOGIN_REQUIRED),
    ])
    .rejected(Message::ServerOr("Application failed."))
    .accepted("Application submitted.");

const LEAVE: ErrorMessages = ErrorMessages::new(Message::Fixed("Error while leaving the meeting."))
    .on(&[
        (400, Message::ServerOr("Cannot leave this meeting.")),
        (401, LOGIN_REQUIRED),
    ])
    .rejected(Message::ServerOr("Could not leave the meeting."))
    .accepted("Left the meeting.");

const CLOSE: ErrorMessages = ErrorMessages::new(Message::Fixed("Error while closing recruitment."))
    .on(&[
        (403, Message::Fixed("Only the host can close recruitment.")),
        (401, LOGIN_REQUIRED),
    ])
    .rejected(Message::ServerOr("Could not close recruitment."))
    .accepted("Recruitment closed.");

const COMPLETE: ErrorMessages =
    ErrorMessages::new(Message::Fixed("Error while completing the meeting."))
        .on(&[
            (403, Message::Fixed("Only the host can complete the meeting.")),
            (401, LOGIN_REQUIRED),
        ])
        .rejected(Message::ServerOr("Could not complete the meeting."))
        .accepted("Meeting completed.");

const PROFILE_LIST: ErrorMessages = ErrorMessages::new(SERVER_ERROR)
    .on(&[(401, LOGIN_REQUIRED)])
    .rejected(Message::Fixed("Could not load meetings."));

/// Page size of the profile meeting lists.
pub const PROFILE_PAGE_SIZE: u32 = 4;

/// Lifecycle state of a meeting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeetingStatus {
    /// Accepting applications.
    Recruiting,
    /// All seats taken.
    Full,
    /// Recruitment closed; the meeting is under way.
    Ongoing,
    /// Finished; feedback can be given.
    Completed,
    /// Cancelled by the host.
    Cancelled,
}

/// Role of a member in a meeting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantType {
    /// The meeting's creator.
    Host,
    /// An approved participant.
    Participant,
}

/// A meeting as shown in search results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingSummary {
    /// Meeting ID.
    pub meeting_id: i64,
    /// Mart the meeting takes place at.
    pub mart_id: i64,
    /// Title.
    pub title: String,
    /// Mart display name.
    pub mart_name: String,
    /// When the meeting takes place (backend local time).
    pub meeting_date: NaiveDateTime,
    /// Seats taken, host included.
    pub current_participants: u32,
    /// Seat limit.
    pub max_participants: u32,
    /// Lifecycle state.
    pub status: MeetingStatus,
    /// Thumbnail URL.
    #[serde(default)]
    pub thumbnail_image_url: Option<String>,
    /// Mart latitude.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Mart longitude.
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl MeetingSummary {
    /// Returns `true` while seats are left and recruitment is open.
    #[must_use]
    pub fn has_open_seats(&self) -> bool {
        self.status == MeetingStatus::Recruiting
            && self.current_participants < self.max_participants
    }
}

/// The host of a meeting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostInfo {
    /// Display name.
    pub nickname: String,
    /// Profile image URL.
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// A member listed on the meeting detail page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingMember {
    /// Display name.
    pub nickname: String,
    /// Profile image URL.
    #[serde(default)]
    pub profile_image_url: Option<String>,
    /// Host or participant.
    pub participant_type: ParticipantType,
}

/// Full meeting detail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDetail {
    /// Meeting ID.
    pub meeting_id: i64,
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Mart display name.
    pub mart_name: String,
    /// When the meeting takes place (backend local time).
    pub meeting_date: NaiveDateTime,
    /// Seats taken, host included.
    pub current_participants: u32,
    /// Seat limit.
    pub max_participants: u32,
    /// Lifecycle state.
    pub status: MeetingStatus,
    /// Thumbnail URL.
    #[serde(default)]
    pub thumbnail_image_url: Option<String>,
    /// The host.
    pub host_info: HostInfo,
    /// Approved members, host included.
    #[serde(default)]
    pub participants: Vec<MeetingMember>,
}

/// Body of a meeting creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeeting {
    /// Mart the meeting takes place at.
    pub mart_id: i64,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// When the meeting takes place (backend local time).
    pub meeting_date: NaiveDateTime,
    /// Seat limit, host included.
    pub max_participants: u32,
    /// Thumbnail URL, when not uploading an image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_image_url: Option<String>,
}

/// Body of a meeting update. The seat limit cannot change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingChanges {
    /// Mart the meeting takes place at.
    pub mart_id: i64,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// When the meeting takes place (backend local time).
    pub meeting_date: NaiveDateTime,
    /// Thumbnail URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_image_url: Option<String>,
}

/// Result of a meeting creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedMeeting {
    /// ID of the new meeting.
    pub meeting_id: i64,
}

/// Result of a meeting update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedMeeting {
    /// ID of the updated meeting.
    pub updated_meeting_id: i64,
}

/// One page of meetings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingPage {
    /// Meetings on this page.
    #[serde(default)]
    pub content: Vec<MeetingDetail>,
    /// Zero-based page index.
    pub page: u32,
    /// Page size.
    pub size: u32,
    /// Total number of meetings across all pages.
    pub total_elements: u64,
}

/// An image attached to a new meeting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type (e.g., `image/jpeg`).
    pub mime_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Creates an upload.
    #[must_use]
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// Application state filter for the profile meeting list.
///
/// Parse from the backend name with [`str::parse`]:
///
/// ```rust
/// use banthing_client::rest::resources::MeetingCondition;
///
/// let condition: MeetingCondition = "PENDING".parse().unwrap();
/// assert_eq!(condition, MeetingCondition::Pending);
/// assert!("REJECTED".parse::<MeetingCondition>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeetingCondition {
    /// Meetings the user was approved for.
    Approved,
    /// Meetings the user applied to and awaits approval for.
    Pending,
}

impl MeetingCondition {
    /// Returns the backend name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Pending => "PENDING",
        }
    }
}

impl fmt::Display for MeetingCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeetingCondition {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPROVED" => Ok(Self::Approved),
            "PENDING" => Ok(Self::Pending),
            other => Err(ResourceError::InvalidArgument {
                name: "condition",
                reason: format!("expected APPROVED or PENDING, got '{other}'"),
            }),
        }
    }
}

/// Meeting endpoints.
#[derive(Clone, Copy, Debug)]
pub struct MeetingsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MeetingsApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /meetings/search[?keyword=]`
    ///
    /// A blank keyword lists every meeting.
    pub async fn search(&self, keyword: Option<&str>) -> ApiResult<Vec<MeetingSummary>> {
        let mut request = HttpRequest::builder(HttpMethod::Get, "/meetings/search");
        if let Some(keyword) = keyword.map(str::trim).filter(|k| !k.is_empty()) {
            request = request.query_param("keyword", keyword);
        }
        let outcome = self
            .client
            .fetch_envelope(request)
            .await
            .map(|envelope| SEARCH.accept(envelope));
        SEARCH.settle("meetings.search", outcome)
    }

    /// `GET /meetings/search/{id}`
    pub async fn detail(&self, meeting_id: i64) -> ApiResult<MeetingDetail> {
        let request = HttpRequest::builder(HttpMethod::Get, format!("/meetings/search/{meeting_id}"));
        let outcome = self
            .client
            .fetch_envelope(request)
            .await
            .map(|envelope| DETAIL.accept(envelope));
        DETAIL.settle("meetings.detail", outcome)
    }

    /// `POST /meetings` as `multipart/form-data`.
    ///
    /// The meeting is sent as a JSON `request` part; `image`, when given, as
    /// the `imageFile` part.
    pub async fn create(
        &self,
        meeting: &NewMeeting,
        image: Option<ImageUpload>,
    ) -> ApiResult<CreatedMeeting> {
        let outcome = match serde_json::to_value(meeting) {
            Ok(json) => {
                let mut body = MultipartBody::new().json("request", json);
                if let Some(image) = image {
                    body = body.file("imageFile", image.file_name, image.mime_type, image.bytes);
                }
                let request = HttpRequest::builder(HttpMethod::Post, "/meetings").multipart(body);
                self.client
                    .fetch_envelope(request)
                    .await
                    .map(|envelope| CREATE.accept(envelope))
            }
            Err(e) => Err(e.into()),
        };
        CREATE.settle("meetings.create", outcome)
    }

    /// `PUT /meetings/update/{id}` (host only)
    pub async fn update(&self, meeting_id: i64, changes: &MeetingChanges) -> ApiResult<UpdatedMeeting> {
        let outcome = match serde_json::to_value(changes) {
            Ok(json) => {
                let request =
                    HttpRequest::builder(HttpMethod::Put, format!("/meetings/update/{meeting_id}"))
                        .json(json);
                self.client
                    .fetch_envelope(request)
                    .await
                    .map(|envelope| UPDATE.accept(envelope))
            }
            Err(e) => Err(e.into()),
        };
        UPDATE.settle("meetings.update", outcome)
    }

    /// `DELETE /meetings/delete/{id}` (host only)
    pub async fn delete(&self, meeting_id: i64) -> ApiResult<serde_json::Value> {
        let request = HttpRequest::builder(HttpMethod::Delete, format!("/meetings/delete/{meeting_id}"));
        self.action("meetings.delete", request, &DELETE).await
    }

    /// `POST /meetings/{id}/join`
    pub async fn join(&self, meeting_id: i64) -> ApiResult<serde_json::Value> {
        let request = HttpRequest::builder(HttpMethod::Post, format!("/meetings/{meeting_id}/join"));
        self.action("meetings.join", request, &JOIN).await
    }

    /// `POST /meetings/{id}/leave`
    pub async fn leave(&self, meeting_id: i64) -> ApiResult<serde_json::Value> {
        let request = HttpRequest::builder(HttpMethod::Post, format!("/meetings/{meeting_id}/leave"));
        self.action("meetings.leave", request, &LEAVE).await
    }

    /// `POST /meetings/{id}/close-recruitment` (host only)
    pub async fn close_recruitment(&self, meeting_id: i64) -> ApiResult<serde_json::Value> {
        let request = HttpRequest::builder(
            HttpMethod::Post,
            format!("/meetings/{meeting_id}/close-recruitment"),
        );
        self.action("meetings.close_recruitment", request, &CLOSE).await
    }

    /// `POST /meetings/{id}/complete` (host only)
    pub async fn complete(&self, meeting_id: i64) -> ApiResult<serde_json::Value> {
        let request =
            HttpRequest::builder(HttpMethod::Post, format!("/meetings/{meeting_id}/complete"));
        self.action("meetings.complete", request, &COMPLETE).await
    }

    /// `GET /meetings/condition?page=&size=4&status=`
    ///
    /// Meetings the signed-in user was approved for or is waiting on.
    pub async fn by_condition(&self, page: u32, condition: MeetingCondition) -> ApiResult<MeetingPage> {
        let request = HttpRequest::builder(HttpMethod::Get, "/meetings/condition")
            .query_param("page", page.to_string())
            .query_param("size", PROFILE_PAGE_SIZE.to_string())
            .query_param("status", condition.as_str());
        let outcome = self
            .client
            .fetch_envelope(request)
            .await
            .map(|envelope| PROFILE_LIST.accept(envelope));
        PROFILE_LIST.settle("meetings.by_condition", outcome)
    }

    /// `GET /meetings/participated?page=&size=`
    pub async fn participated(&self, page: u32, size: u32) -> ApiResult<MeetingPage> {
        let request = HttpRequest::builder(HttpMethod::Get, "/meetings/participated")
            .query_param("page", page.to_string())
            .query_param("size", size.to_string());
        let outcome = self
            .client
            .fetch_envelope(request)
            .await
            .map(|envelope| PROFILE_LIST.accept(envelope));
        PROFILE_LIST.settle("meetings.participated", outcome)
    }

    async fn action(
        &self,
        operation: &'static str,
        request: HttpRequestBuilder,
        messages: &ErrorMessages,
    ) -> ApiResult<serde_json::Value> {
        let outcome = self
            .client
            .fetch_envelope(request)
            .await
            .map(|envelope| messages.accept(envelope));
        messages.settle(operation, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 20)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_meeting_summary_deserializes_backend_json() {
        let summary: MeetingSummary = serde_json::from_value(json!({
            "meetingId": 5,
            "martId": 2,
            "title": "Traders eggs",
            "martName": "Traders Wolgye",
            "meetingDate": "2025-09-20T12:00:00",
            "currentParticipants": 2,
            "maxParticipants": 4,
            "status": "RECRUITING",
            "thumbnailImageUrl": null,
            "latitude": 37.62,
            "longitude": 127.06
        }))
        .unwrap();

        assert_eq!(summary.meeting_id, 5);
        assert_eq!(summary.meeting_date, noon());
        assert_eq!(summary.status, MeetingStatus::Recruiting);
        assert!(summary.has_open_seats());
    }

    #[test]
    fn test_meeting_detail_with_members() {
        let detail: MeetingDetail = serde_json::from_value(json!({
            "meetingId": 9,
            "title": "Costco meat",
            "description": "Split a pack of ribs",
            "martName": "Costco Yangjae",
            "meetingDate": "2025-09-20T12:00:00",
            "currentParticipants": 2,
            "maxParticipants": 3,
            "status": "FULL",
            "hostInfo": {"nickname": "host", "profileImageUrl": null},
            "participants": [
                {"nickname": "host", "participantType": "HOST"},
                {"nickname": "guest", "profileImageUrl": "x.png", "participantType": "PARTICIPANT"}
            ]
        }))
        .unwrap();

        assert_eq!(detail.host_info.nickname, "host");
        assert_eq!(detail.participants.len(), 2);
        assert_eq!(detail.participants[1].participant_type, ParticipantType::Participant);
        assert_eq!(detail.status, MeetingStatus::Full);
    }

    #[test]
    fn test_new_meeting_serializes_camel_case() {
        let meeting = NewMeeting {
            mart_id: 1,
            title: "Rice".to_string(),
            description: "20kg".to_string(),
            meeting_date: noon(),
            max_participants: 4,
            thumbnail_image_url: None,
        };

        let value = serde_json::to_value(&meeting).unwrap();
        assert_eq!(value["martId"], 1);
        assert_eq!(value["maxParticipants"], 4);
        assert_eq!(value["meetingDate"], "2025-09-20T12:00:00");
        assert!(value.get("thumbnailImageUrl").is_none());
    }

    #[test]
    fn test_meeting_changes_omit_seat_limit() {
        let changes = MeetingChanges {
            mart_id: 1,
            title: "Rice".to_string(),
            description: "10kg".to_string(),
            meeting_date: noon(),
            thumbnail_image_url: Some("t.png".to_string()),
        };

        let value = serde_json::to_value(&changes).unwrap();
        assert!(value.get("maxParticipants").is_none());
        assert_eq!(value["thumbnailImageUrl"], "t.png");
    }

    #[test]
    fn test_meeting_condition_parsing() {
        assert_eq!("APPROVED".parse::<MeetingCondition>().unwrap(), MeetingCondition::Approved);
        assert_eq!(MeetingCondition::Pending.to_string(), "PENDING");
        assert!(matches!(
            "approved".parse::<MeetingCondition>(),
            Err(ResourceError::InvalidArgument { name: "condition", .. })
        ));
    }

    #[test]
    fn test_join_messages() {
        assert_eq!(JOIN.for_status(409, Some("dup")), "Already joined or applied to this meeting.");
        assert_eq!(JOIN.for_status(403, Some("rejected before")), "rejected before");
        assert_eq!(
            JOIN.for_status(403, None),
            "Your application was rejected. Try another meeting."
        );
        assert_eq!(JOIN.for_status(401, None), "Login required.");
        assert_eq!(JOIN.for_status(500, Some("boom")), "Error while applying.");
    }

    #[test]
    fn test_update_messages() {
        assert_eq!(UPDATE.for_status(400, None), "Check the meeting details.");
        assert_eq!(UPDATE.for_status(403, Some("x")), "Only the host can edit the meeting.");
    }
}
