//! The signed-in user's profile.
//!
//! # Example
//!
//! ```rust
//! use banthing_client::auth::{TrustGrade, UserProfile};
//!
//! let json = r#"{
//!     "userId": 42,
//!     "nickname": "bulkbuyer",
//!     "provider": "kakao",
//!     "trustScore": 320,
//!     "trustGrade": "BASIC",
//!     "noShowCount": 0,
//!     "agree": true
//! }"#;
//!
//! let user: UserProfile = serde_json::from_str(json).unwrap();
//! assert_eq!(user.user_id, 42);
//! assert_eq!(user.trust_grade, Some(TrustGrade::Basic));
//! ```

use serde::{Deserialize, Serialize};

/// Trust tier derived from a user's feedback score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrustGrade {
    /// 500 points and above.
    Good,
    /// 101 to 499 points.
    Basic,
    /// 100 points and below.
    Warning,
}

/// Profile of the signed-in user, as returned by `GET /users/me`.
///
/// The same shape is persisted by the session store, so it serializes back to
/// the backend's camelCase field names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Backend user ID.
    pub user_id: i64,

    /// Display name.
    pub nickname: String,

    /// Profile image URL.
    #[serde(default)]
    pub profile_image_url: Option<String>,

    /// Free-form self introduction.
    #[serde(default)]
    pub self_introduction: Option<String>,

    /// OAuth provider the account was created with (e.g., `kakao`, `google`).
    #[serde(default)]
    pub provider: Option<String>,

    /// Accumulated trust score.
    #[serde(default)]
    pub trust_score: Option<i32>,

    /// Trust tier.
    #[serde(default)]
    pub trust_grade: Option<TrustGrade>,

    /// Number of meetings the user failed to show up for.
    #[serde(default)]
    pub no_show_count: Option<i32>,

    /// Whether the user accepted the terms of service.
    #[serde(default)]
    pub agree: Option<bool>,
}

impl UserProfile {
    /// Returns `true` once the user has accepted the terms of service.
    #[must_use]
    pub fn has_agreed(&self) -> bool {
        self.agree.unwrap_or(false)
    }
}

// Verify UserProfile is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<UserProfile>();
};
