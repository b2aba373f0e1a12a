use async_trait::async_trait;
use chrono::Utc;

use scribe_core::domain::{Album, AlbumDraft, ContactMessage, NewContactMessage};
use scribe_core::error::RepoError;
use scribe_core::ports::{AlbumRepository, BaseRepository, ContactRepository};

use super::InMemoryDatabase;

pub struct InMemoryAlbumRepository {
    db: InMemoryDatabase,
}

impl InMemoryAlbumRepository {
    pub(super) fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Album, i64> for InMemoryAlbumRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Album>, RepoError> {
        Ok(self.db.tables.read().await.albums.get(id))
    }

    async fn update(&self, album: Album) -> Result<Album, RepoError> {
        let mut tables = self.db.tables.write().await;
        tables.albums.replace(album.id, album)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.db.tables.write().await.albums.remove(id).map(|_| ())
    }
}

#[async_trait]
impl AlbumRepository for InMemoryAlbumRepository {
    async fn insert(&self, draft: AlbumDraft) -> Result<Album, RepoError> {
        let mut tables = self.db.tables.write().await;
        Ok(tables.albums.insert_with(|id| Album {
            id,
            title: draft.title,
            artist: draft.artist,
            price: draft.price,
        }))
    }

    async fn list(&self) -> Result<Vec<Album>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables.albums.rows.values().cloned().collect())
    }
}

pub struct InMemoryContactRepository {
    db: InMemoryDatabase,
}

impl InMemoryContactRepository {
    pub(super) fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn insert(&self, new: NewContactMessage) -> Result<ContactMessage, RepoError> {
        let mut tables = self.db.tables.write().await;
        Ok(tables.contacts.insert_with(|id| ContactMessage {
            id,
            name: new.name,
            email: new.email,
            subject: new.subject,
            message: new.message,
            created_at: Utc::now(),
        }))
    }
}
