//! Meeting comments.
//!
//! Unlike the other endpoints, comments are not wrapped in the common
//! envelope: the list is `{comments, totalCount}`, create and update return
//! the comment itself, and delete returns `204 No Content`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::clients::{ApiClient, HttpMethod, HttpRequest};
use crate::rest::{ApiResult, ErrorMessages, Message, LOGIN_REQUIRED};

const LIST: ErrorMessages = ErrorMessages::new(Message::Fixed("Server communication error."))
    .on(&[
        (404, Message::Fixed("Comments not found.")),
        (401, LOGIN_REQUIRED),
    ]);

const CREATE: ErrorMessages = ErrorMessages::new(Message::Fixed("Error while posting the comment."))
    .on(&[
        (400, Message::ServerOr("Could not post the comment.")),
        (401, LOGIN_REQUIRED),
    ]);

const UPDATE: ErrorMessages = ErrorMessages::new(Message::Fixed("Error while editing the comment."))
    .on(&[
        (400, Message::ServerOr("Could not edit the comment.")),
        (401, LOGIN_REQUIRED),
    ]);

const DELETE: ErrorMessages =
    ErrorMessages::new(Message::ServerOr("Error while deleting the comment."))
        .on(&[
            (403, Message::Fixed("Only the author can delete the comment.")),
            (404, Message::Fixed("Comment not found.")),
            (401, LOGIN_REQUIRED),
        ]);

/// A comment on a meeting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment ID.
    pub comment_id: i64,
    /// Author's user ID.
    pub user_id: i64,
    /// Author's display name.
    pub nickname: String,
    /// Author's profile image URL.
    #[serde(default)]
    pub profile_image_url: Option<String>,
    /// Comment text.
    pub content: String,
    /// When the comment was written (backend local time).
    pub created_at: NaiveDateTime,
}

/// All comments of a meeting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentList {
    /// Comments, oldest first.
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Number of comments.
    #[serde(default)]
    pub total_count: u64,
}

/// Comment endpoints.
#[derive(Clone, Copy, Debug)]
pub struct CommentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CommentsApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /meetings/{id}/comments`
    pub async fn list(&self, meeting_id: i64) -> ApiResult<CommentList> {
        let request =
            HttpRequest::builder(HttpMethod::Get, format!("/meetings/{meeting_id}/comments"));
        let outcome = self
            .client
            .fetch_bare(request)
            .await
            .map(|list| ApiResult::ok(Some(list), None));
        LIST.settle("comments.list", outcome)
    }

    /// `POST /meetings/{id}/comments`
    pub async fn create(&self, meeting_id: i64, content: &str) -> ApiResult<Comment> {
        let request =
            HttpRequest::builder(HttpMethod::Post, format!("/meetings/{meeting_id}/comments"))
                .json(serde_json::json!({ "content": content }));
        let outcome = self
            .client
            .fetch_bare(request)
            .await
            .map(|comment| ApiResult::ok(Some(comment), None));
        CREATE.settle("comments.create", outcome)
    }

    /// `PUT /meetings/{id}/comments/{comment}`
    pub async fn update(&self, meeting_id: i64, comment_id: i64, content: &str) -> ApiResult<Comment> {
        let request = HttpRequest::builder(
            HttpMethod::Put,
            format!("/meetings/{meeting_id}/comments/{comment_id}"),
        )
        .json(serde_json::json!({ "content": content }));
        let outcome = self
            .client
            .fetch_bare(request)
            .await
            .map(|comment| ApiResult::ok(Some(comment), None));
        UPDATE.settle("comments.update", outcome)
    }

    /// `DELETE /meetings/{id}/comments/{comment}`
    pub async fn delete(&self, meeting_id: i64, comment_id: i64) -> ApiResult<()> {
        let request = HttpRequest::builder(
            HttpMethod::Delete,
            format!("/meetings/{meeting_id}/comments/{comment_id}"),
        );
        let outcome = self
            .client
            .fetch(request)
            .await
            .map(|_| ApiResult::ok(None, None));
        DELETE.settle("comments.delete", outcome)
    }
}
