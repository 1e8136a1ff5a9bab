//! Resource APIs, one per backend resource.
//!
//! Each API is a thin borrow of the [`ApiClient`], obtained through an accessor:
//!
//! | Accessor                     | API                 | Paths                                  |
//! |------------------------------|---------------------|----------------------------------------|
//! | [`ApiClient::auth`]          | [`AuthApi`]         | `/users/me`, `/auth/*`                 |
//! | [`ApiClient::meetings`]      | [`MeetingsApi`]     | `/meetings/*`                          |
//! | [`ApiClient::participants`]  | [`ParticipantsApi`] | `/meetings/{id}/participants/*`        |
//! | [`ApiClient::comments`]      | [`CommentsApi`]     | `/meetings/{id}/comments/*`            |
//! | [`ApiClient::feedback`]      | [`FeedbackApi`]     | `/feedbacks/*`                         |
//! | [`ApiClient::chatbot`]       | [`ChatbotApi`]      | `/chatbot/*`                           |
//! | [`ApiClient::marts`]         | [`MartsApi`]        | `/marts`                               |
//!
//! # Example
//!
//! ```rust,ignore
//! use banthing_client::rest::resources::MeetingCondition;
//!
//! let page = client.meetings().by_condition(0, MeetingCondition::Approved).await;
//! for meeting in page.data.map(|p| p.content).unwrap_or_default() {
//!     println!("{} at {}", meeting.title, meeting.mart_name);
//! }
//! ```

mod auth;
mod chatbot;
mod comments;
mod feedback;
mod marts;
mod meetings;
mod participants;

pub use auth::{AuthApi, UserSummary};
pub use chatbot::{
    ChatReply, ChatbotApi, ConversationTurn, IntentType, SuggestedMeeting, SuggestionRef,
};
pub use comments::{Comment, CommentList, CommentsApi};
pub use feedback::{
    Feedback, FeedbackApi, FeedbackDirection, FeedbackGiver, FeedbackScore, FeedbackType,
    NewFeedback,
};
pub use marts::{Mart, MartBrand, MartsApi};
pub use meetings::{
    CreatedMeeting, HostInfo, ImageUpload, MeetingChanges, MeetingCondition, MeetingDetail,
    MeetingMember, MeetingPage, MeetingStatus, MeetingSummary, MeetingsApi, NewMeeting,
    ParticipantType, UpdatedMeeting, PROFILE_PAGE_SIZE,
};
pub use participants::{ApplicationStatus, Participant, ParticipantList, ParticipantsApi};

use crate::clients::ApiClient;

impl ApiClient {
    /// Session and account endpoints.
    #[must_use]
    pub const fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Meeting search, lifecycle and membership endpoints.
    #[must_use]
    pub const fn meetings(&self) -> MeetingsApi<'_> {
        MeetingsApi::new(self)
    }

    /// Host-side participant management.
    #[must_use]
    pub const fn participants(&self) -> ParticipantsApi<'_> {
        ParticipantsApi::new(self)
    }

    /// Meeting comments.
    #[must_use]
    pub const fn comments(&self) -> CommentsApi<'_> {
        CommentsApi::new(self)
    }

    /// Post-meeting feedback and trust scores.
    #[must_use]
    pub const fn feedback(&self) -> FeedbackApi<'_> {
        FeedbackApi::new(self)
    }

    /// The meeting-search assistant.
    #[must_use]
    pub const fn chatbot(&self) -> ChatbotApi<'_> {
        ChatbotApi::new(self)
    }

    /// Partner marts.
    #[must_use]
    pub const fn marts(&self) -> MartsApi<'_> {
        MartsApi::new(self)
    }
}
