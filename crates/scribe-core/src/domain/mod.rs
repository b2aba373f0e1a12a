//! Domain entities - the core business objects.

mod album;
mod bookmark;
mod comment;
mod contact;
pub mod media;
mod post;
mod reaction;
mod user;

pub use album::{Album, AlbumDraft};
pub use bookmark::{Bookmark, BookmarkToggle};
pub use comment::{Comment, CommentThread, MAX_THREAD_DEPTH, NewComment, build_threads};
pub use contact::{ContactMessage, NewContactMessage};
pub use post::{NewPost, Post, PostChanges, PostStatus, numbered_slug, parse_tags, slugify};
pub use reaction::{Reaction, ReactionChange, ReactionCounts, ReactionKind};
pub use user::{DirectoryEntry, NewUser, ProfileChanges, User};
