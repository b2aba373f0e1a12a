use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity - a top-level comment on a post or a reply to another comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    /// Author's display name at the time of writing.
    pub username: String,
    pub parent_id: Option<i64>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i64,
    pub user_id: i64,
    pub username: String,
    pub parent_id: Option<i64>,
    pub content: String,
}

/// A comment together with its nested replies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<CommentThread>,
}

/// Replies nested deeper than this are listed flat under their ancestor at this depth.
pub const MAX_THREAD_DEPTH: usize = 32;

fn by_creation(a: &Comment, b: &Comment) -> Ordering {
    a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))
}

/// Assemble a flat list of a post's comments into reply trees.
///
/// Roots are comments without a parent, plus orphans whose parent is not in
/// the list. Siblings are ordered by creation time, then id. Nesting stops at
/// [`MAX_THREAD_DEPTH`]; deeper replies keep their `parent_id` but are listed
/// under the ancestor at that depth.
pub fn build_threads(mut comments: Vec<Comment>) -> Vec<CommentThread> {
    comments.sort_by(by_creation);

    let index: HashMap<i64, usize> = comments
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id, i))
        .collect();
    let mut children: HashMap<i64, Vec<usize>> = HashMap::new();
    let mut roots = Vec::new();
    for (i, comment) in comments.iter().enumerate() {
        match comment.parent_id {
            Some(parent) if parent != comment.id && index.contains_key(&parent) => {
                children.entry(parent).or_default().push(i)
            }
            _ => roots.push(i),
        }
    }

    // Breadth-first walk deciding which thread each comment is listed under.
    // Comments caught in a parent cycle are picked up as extra roots.
    let mut listed_under: Vec<Option<usize>> = vec![None; comments.len()];
    let mut visited = vec![false; comments.len()];
    let mut order = Vec::with_capacity(comments.len());
    let mut tops = Vec::new();
    let mut queue = VecDeque::new();

    for seed in roots.into_iter().chain(0..comments.len()) {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        tops.push(seed);
        queue.push_back((seed, 0usize, None::<usize>));

        while let Some((i, depth, anchor)) = queue.pop_front() {
            order.push(i);
            let holder = anchor.unwrap_or(i);
            let child_anchor = anchor.or((depth >= MAX_THREAD_DEPTH).then_some(i));

            for &child in children.get(&comments[i].id).into_iter().flatten() {
                if visited[child] {
                    continue;
                }
                visited[child] = true;
                listed_under[child] = Some(holder);
                queue.push_back((child, depth + 1, child_anchor));
            }
        }
    }

    // Children come after their holder in `order`, so walking it backwards
    // finishes every reply list before its owner is built.
    let mut slots: Vec<Option<Comment>> = comments.into_iter().map(Some).collect();
    let mut replies: HashMap<usize, Vec<CommentThread>> = HashMap::new();
    let mut finished: HashMap<usize, CommentThread> = HashMap::new();

    for &i in order.iter().rev() {
        let Some(comment) = slots[i].take() else {
            continue;
        };
        let mut own = replies.remove(&i).unwrap_or_default();
        own.sort_by(|a, b| by_creation(&a.comment, &b.comment));

        let thread = CommentThread {
            comment,
            replies: own,
        };
        match listed_under[i] {
            Some(holder) => replies.entry(holder).or_default().push(thread),
            None => {
                finished.insert(i, thread);
            }
        }
    }

    tops.into_iter()
        .filter_map(|i| finished.remove(&i))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn comment(id: i64, parent_id: Option<i64>, offset_secs: i64) -> Comment {
        let at = DateTime::<Utc>::from_timestamp(1_700_000_000 + offset_secs, 0).unwrap();
        Comment {
            id,
            post_id: 1,
            user_id: 1,
            username: "alice".to_string(),
            parent_id,
            content: format!("comment {id}"),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_build_threads_nests_replies() {
        let threads = build_threads(vec![
            comment(3, Some(1), 30),
            comment(1, None, 10),
            comment(2, None, 20),
            comment(4, Some(3), 40),
        ]);

        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].comment.id, 1);
        assert_eq!(threads[0].replies[0].comment.id, 3);
        assert_eq!(threads[0].replies[0].replies[0].comment.id, 4);
        assert!(threads[1].replies.is_empty());
    }

    #[test]
    fn test_build_threads_nests_below_depth_cap() {
        let mut comments = vec![comment(1, None, 0)];
        for id in 2..=8 {
            comments.push(comment(id, Some(id - 1), id));
        }

        let threads = build_threads(comments);

        let mut depth = 0;
        let mut node = &threads[0];
        while let Some(next) = node.replies.first() {
            depth += 1;
            node = next;
        }
        assert_eq!(depth, 7);
    }

    fn depth_of(thread: &CommentThread) -> usize {
        let mut depth = 0;
        let mut node = thread;
        while let Some(next) = node.replies.first() {
            depth += 1;
            node = next;
        }
        depth
    }

    fn count(threads: &[CommentThread]) -> usize {
        let mut stack: Vec<&CommentThread> = threads.iter().collect();
        let mut total = 0;
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.replies.iter());
        }
        total
    }

    #[test]
    fn test_long_reply_chain_is_flattened_past_cap() {
        let mut comments = vec![comment(1, None, 0)];
        for id in 2..=5001 {
            comments.push(comment(id, Some(id - 1), id));
        }

        let threads = build_threads(comments);

        assert_eq!(threads.len(), 1);
        assert_eq!(count(&threads), 5001);
        assert_eq!(depth_of(&threads[0]), MAX_THREAD_DEPTH + 1);

        let mut anchor = &threads[0];
        for _ in 0..MAX_THREAD_DEPTH {
            anchor = &anchor.replies[0];
        }
        assert_eq!(anchor.comment.id, MAX_THREAD_DEPTH as i64 + 1);
        assert_eq!(anchor.replies.len(), 5001 - MAX_THREAD_DEPTH - 1);
        assert!(anchor.replies.iter().all(|r| r.replies.is_empty()));
        assert!(
            anchor
                .replies
                .windows(2)
                .all(|w| w[0].comment.created_at <= w[1].comment.created_at)
        );

        let json = serde_json::to_string(&threads).unwrap();
        assert!(json.contains("\"content\":\"comment 5001\""));
    }

    #[test]
    fn test_parent_cycle_is_not_dropped() {
        let threads = build_threads(vec![comment(1, Some(2), 0), comment(2, Some(1), 1)]);
        assert_eq!(count(&threads), 2);
    }

    #[test]
    fn test_orphans_become_roots() {
        let threads = build_threads(vec![comment(5, Some(99), 0)]);
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].comment.id, 5);
    }

    #[test]
    fn test_siblings_ordered_by_creation() {
        let mut late = comment(2, None, 0);
        late.created_at += TimeDelta::seconds(100);
        let threads = build_threads(vec![late, comment(9, None, 1)]);
        assert_eq!(threads[0].comment.id, 9);
    }
}
