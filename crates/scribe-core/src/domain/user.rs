use chrono::{DateTime, Utc};

/// User entity - a registered account and its credential record.
///
/// Not `Serialize`: the password hash never reaches a client. Handlers map
/// it onto a client-safe view.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub bio: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial profile edit. Empty fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
}

impl User {
    /// Apply the non-empty fields of a profile edit.
    pub fn apply(&mut self, changes: ProfileChanges) {
        fn non_empty(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        if let Some(username) = non_empty(changes.username) {
            self.username = username;
        }
        if let Some(email) = non_empty(changes.email) {
            self.email = email;
        }
        if let Some(bio) = non_empty(changes.bio) {
            self.bio = bio;
        }
        self.updated_at = Utc::now();
    }
}

/// Username/email pair listed by the user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub username: String,
    pub email: String,
}
