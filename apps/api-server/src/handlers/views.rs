//! Domain entities mapped onto their wire representations.

use scribe_core::domain::{Album, Bookmark, CommentThread, ContactMessage, Post, Reaction, User};
use scribe_shared::dto::{
    AlbumResponse, AuthorSummary, BookmarkResponse, CommentResponse, ContactResponse,
    PostResponse, ReactionResponse, UserResponse,
};

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        bio: user.bio,
        avatar_url: user.avatar_url,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

pub fn users(users: Vec<User>) -> Vec<UserResponse> {
    users.into_iter().map(user).collect()
}

fn author(user: &User) -> AuthorSummary {
    AuthorSummary {
        id: user.id,
        username: user.username.clone(),
        avatar_url: user.avatar_url.clone(),
    }
}

pub fn post(post: Post, by: Option<&User>) -> PostResponse {
    PostResponse {
        id: post.id,
        user_id: post.user_id,
        title: post.title,
        slug: post.slug,
        description: post.description,
        category: post.category,
        tags: post.tags,
        content: post.content,
        featured_image: post.featured_image,
        featured_image_url: post.featured_image_url,
        view_count: post.view_count,
        status: post.status.to_string(),
        created_at: post.created_at,
        updated_at: post.updated_at,
        author: by.map(author),
    }
}

pub fn comment_thread(thread: CommentThread) -> CommentResponse {
    let c = thread.comment;
    CommentResponse {
        id: c.id,
        post_id: c.post_id,
        user_id: c.user_id,
        username: c.username,
        parent_id: c.parent_id,
        content: c.content,
        created_at: c.created_at,
        updated_at: c.updated_at,
        replies: thread.replies.into_iter().map(comment_thread).collect(),
    }
}

pub fn reaction(reaction: &Reaction) -> ReactionResponse {
    ReactionResponse {
        id: reaction.id,
        post_id: reaction.post_id,
        user_id: reaction.user_id,
        kind: reaction.kind.to_string(),
        created_at: reaction.created_at,
        updated_at: reaction.updated_at,
    }
}

pub fn bookmark(bookmark: Bookmark) -> BookmarkResponse {
    BookmarkResponse {
        id: bookmark.id,
        post_id: bookmark.post_id,
        user_id: bookmark.user_id,
        created_at: bookmark.created_at,
    }
}

pub fn album(album: Album) -> AlbumResponse {
    AlbumResponse {
        id: album.id,
        title: album.title,
        artist: album.artist,
        price: album.price,
    }
}

pub fn contact(message: ContactMessage) -> ContactResponse {
    ContactResponse {
        id: message.id,
        name: message.name,
        email: message.email,
        subject: message.subject,
        message: message.message,
        created_at: message.created_at,
    }
}
