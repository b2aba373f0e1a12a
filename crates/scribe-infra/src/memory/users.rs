use async_trait::async_trait;
use chrono::Utc;

use scribe_core::domain::{DirectoryEntry, NewUser, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{BaseRepository, UserRepository};

use super::{InMemoryDatabase, Tables};

pub struct InMemoryUserRepository {
    db: InMemoryDatabase,
}

impl InMemoryUserRepository {
    pub(super) fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

/// Unique username and email, ignoring the row being updated.
fn check_unique(tables: &Tables, id: i64, username: &str, email: &str) -> Result<(), RepoError> {
    if tables
        .users
        .any(|u| u.id != id && u.username == username)
    {
        return Err(RepoError::Duplicate("users_username_key".to_string()));
    }
    if tables.users.any(|u| u.id != id && u.email == email) {
        return Err(RepoError::Duplicate("users_email_key".to_string()));
    }
    Ok(())
}

fn users_by_ids(tables: &Tables, ids: impl Iterator<Item = i64>) -> Vec<User> {
    ids.filter_map(|id| tables.users.get(id)).collect()
}

#[async_trait]
impl BaseRepository<User, i64> for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.db.tables.read().await.users.get(id))
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.db.tables.write().await;
        check_unique(&tables, user.id, &user.username, &user.email)?;
        tables.users.replace(user.id, user)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.db.tables.write().await;
        tables.users.remove(id)?;
        tables.follows.retain(|&(a, b)| a != id && b != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, new: NewUser) -> Result<User, RepoError> {
        let mut tables = self.db.tables.write().await;
        check_unique(&tables, 0, &new.username, &new.email)?;

        let now = Utc::now();
        Ok(tables.users.insert_with(|id| User {
            id,
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            bio: String::new(),
            avatar_url: String::new(),
            created_at: now,
            updated_at: now,
        }))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .db
            .tables
            .read()
            .await
            .users
            .find(|u| u.username == username))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.db.tables.read().await.users.find(|u| u.email == email))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables.users.filter(|u| ids.contains(&u.id)))
    }

    async fn directory(&self) -> Result<Vec<DirectoryEntry>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .users
            .rows
            .values()
            .map(|u| DirectoryEntry {
                username: u.username.clone(),
                email: u.email.clone(),
            })
            .collect())
    }

    async fn follow(&self, follower_id: i64, following_id: i64) -> Result<(), RepoError> {
        let mut tables = self.db.tables.write().await;
        if tables.users.get(follower_id).is_none() || tables.users.get(following_id).is_none() {
            return Err(RepoError::ForeignKey("user_follows_user_fkey".to_string()));
        }
        tables.follows.insert((follower_id, following_id));
        Ok(())
    }

    async fn unfollow(&self, follower_id: i64, following_id: i64) -> Result<(), RepoError> {
        self.db
            .tables
            .write()
            .await
            .follows
            .remove(&(follower_id, following_id));
        Ok(())
    }

    async fn followers(&self, user_id: i64) -> Result<Vec<User>, RepoError> {
        let tables = self.db.tables.read().await;
        let ids = tables
            .follows
            .iter()
            .filter(|&&(_, following)| following == user_id)
            .map(|&(follower, _)| follower);
        Ok(users_by_ids(&tables, ids))
    }

    async fn following(&self, user_id: i64) -> Result<Vec<User>, RepoError> {
        let tables = self.db.tables.read().await;
        let ids = tables
            .follows
            .iter()
            .filter(|&&(follower, _)| follower == user_id)
            .map(|&(_, following)| following);
        Ok(users_by_ids(&tables, ids))
    }
}
