//! Per-resource ownership enforcement.

use crate::domain::{Bookmark, Comment, Post, Reaction, User};
use crate::error::DomainError;

/// A resource that belongs to exactly one user.
pub trait Owned {
    fn owner_id(&self) -> i64;

    /// Resource name used in error messages.
    fn kind() -> &'static str
    where
        Self: Sized;
}

pub fn is_owner<R: Owned>(resource: &R, subject_id: i64) -> bool {
    resource.owner_id() == subject_id
}

/// Fails with `Forbidden` unless `subject_id` owns the resource.
///
/// Call before touching any part of the update payload.
pub fn ensure_owner<R: Owned>(resource: &R, subject_id: i64) -> Result<(), DomainError> {
    if is_owner(resource, subject_id) {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!(
            "you do not own this {}",
            R::kind()
        )))
    }
}

macro_rules! owned_by {
    ($ty:ty, $field:ident, $kind:literal) => {
        impl Owned for $ty {
            fn owner_id(&self) -> i64 {
                self.$field
            }

            fn kind() -> &'static str {
                $kind
            }
        }
    };
}

owned_by!(User, id, "profile");
owned_by!(Post, user_id, "post");
owned_by!(Comment, user_id, "comment");
owned_by!(Reaction, user_id, "reaction");
owned_by!(Bookmark, user_id, "bookmark");

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn bookmark(user_id: i64) -> Bookmark {
        Bookmark {
            id: 1,
            post_id: 10,
            user_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_passes() {
        assert!(is_owner(&bookmark(3), 3));
        assert!(ensure_owner(&bookmark(3), 3).is_ok());
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let err = ensure_owner(&bookmark(1), 2).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(msg) if msg.contains("bookmark")));
    }
}
