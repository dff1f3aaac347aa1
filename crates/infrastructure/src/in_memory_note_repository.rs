//! In-memory note repository implementation.
//!
//! Mirrors the Postgres adapter's constraint behavior: a duplicate title
//! on create or save is a `Conflict`, the same signal the unique
//! constraint produces.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use notewell_application::{NewNote, NoteRecord, NoteRepository};
use notewell_core::{AppError, AppResult};
use notewell_domain::{NoteId, UserId};

/// In-memory note repository backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryNoteRepository {
    notes: RwLock<HashMap<NoteId, NoteRecord>>,
}

impl InMemoryNoteRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            notes: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn find_all(&self) -> AppResult<Vec<NoteRecord>> {
        let notes = self.notes.read().await;

        let mut records: Vec<NoteRecord> = notes.values().cloned().collect();
        records.sort_by(|left, right| {
            left.created_at
                .cmp(&right.created_at)
                .then_with(|| left.title.cmp(&right.title))
        });

        Ok(records)
    }

    async fn find_by_id(&self, note_id: NoteId) -> AppResult<Option<NoteRecord>> {
        Ok(self.notes.read().await.get(&note_id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> AppResult<Option<NoteRecord>> {
        let notes = self.notes.read().await;

        Ok(notes
            .values()
            .find(|record| record.title == title)
            .cloned())
    }

    async fn exists_for_user(&self, user_id: UserId) -> AppResult<bool> {
        let notes = self.notes.read().await;

        Ok(notes.values().any(|record| record.user_id == user_id))
    }

    async fn create(&self, new_note: NewNote) -> AppResult<NoteId> {
        let mut notes = self.notes.write().await;

        if notes.values().any(|record| record.title == new_note.title) {
            return Err(AppError::Conflict("duplicate note title".to_owned()));
        }

        let now = chrono::Utc::now();
        let record = NoteRecord {
            id: NoteId::new(),
            user_id: new_note.user_id,
            title: new_note.title,
            text: new_note.text,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        let note_id = record.id;
        notes.insert(note_id, record);

        Ok(note_id)
    }

    async fn save(&self, record: &NoteRecord) -> AppResult<()> {
        let mut notes = self.notes.write().await;

        if notes
            .values()
            .any(|stored| stored.id != record.id && stored.title == record.title)
        {
            return Err(AppError::Conflict("duplicate note title".to_owned()));
        }

        let mut updated = record.clone();
        updated.updated_at = chrono::Utc::now();
        notes.insert(updated.id, updated);

        Ok(())
    }

    async fn delete(&self, note_id: NoteId) -> AppResult<()> {
        self.notes.write().await.remove(&note_id);
        Ok(())
    }
}
