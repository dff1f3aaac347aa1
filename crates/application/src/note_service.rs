//! Note management port and application service.
//!
//! Notes carry a back-reference to their author. Listing enriches each note
//! with the author's username; a dangling reference degrades to an absent
//! username instead of failing the whole call.

use std::sync::Arc;

use async_trait::async_trait;

use notewell_core::{AppError, AppResult, NonEmptyString};
use notewell_domain::{NoteId, UserId};

use crate::user_service::UserRepository;

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// Note record returned by repository queries.
#[derive(Debug, Clone)]
pub struct NoteRecord {
    /// Unique note identifier, assigned by the store.
    pub id: NoteId,
    /// Back-reference to the authoring user.
    pub user_id: UserId,
    /// Note title, unique across all notes.
    pub title: String,
    /// Note body.
    pub text: String,
    /// Completion flag.
    pub completed: bool,
    /// Creation time, assigned by the store.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last modification time, maintained by the store.
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Fields for a new note record. The store assigns id, timestamps, and the
/// `completed` default of `false`.
#[derive(Debug, Clone)]
pub struct NewNote {
    /// Authoring user; validated to exist at creation time.
    pub user_id: UserId,
    /// Validated unique title.
    pub title: String,
    /// Validated non-empty body.
    pub text: String,
}

/// Repository port for note persistence.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Returns every note record.
    async fn find_all(&self) -> AppResult<Vec<NoteRecord>>;

    /// Finds a note by its unique identifier.
    async fn find_by_id(&self, note_id: NoteId) -> AppResult<Option<NoteRecord>>;

    /// Finds a note by exact title.
    async fn find_by_title(&self, title: &str) -> AppResult<Option<NoteRecord>>;

    /// Reports whether any note references the given user.
    async fn exists_for_user(&self, user_id: UserId) -> AppResult<bool>;

    /// Creates a new note record. Returns the assigned note ID.
    async fn create(&self, new_note: NewNote) -> AppResult<NoteId>;

    /// Persists the mutable fields of an existing record.
    async fn save(&self, record: &NoteRecord) -> AppResult<()>;

    /// Deletes a note record.
    async fn delete(&self, note_id: NoteId) -> AppResult<()>;
}

// ---------------------------------------------------------------------------
// Request and response types
// ---------------------------------------------------------------------------

/// Parameters for note creation.
#[derive(Debug, Clone)]
pub struct CreateNoteParams {
    /// Authoring user; must reference an existing user.
    pub user_id: UserId,
    /// Requested title; must be unique.
    pub title: String,
    /// Note body.
    pub text: String,
}

/// Parameters for a full-record note update.
#[derive(Debug, Clone)]
pub struct UpdateNoteParams {
    /// Identifier of the note to update.
    pub id: NoteId,
    /// Replacement author reference. Not re-validated against the user
    /// collection after creation.
    pub user_id: UserId,
    /// Replacement title; must not collide with a different note.
    pub title: String,
    /// Replacement body.
    pub text: String,
    /// Replacement completion flag.
    pub completed: bool,
}

/// Note as exposed to callers, enriched with the author's username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteView {
    /// Unique note identifier.
    pub id: NoteId,
    /// Back-reference to the authoring user.
    pub user_id: UserId,
    /// Note title.
    pub title: String,
    /// Note body.
    pub text: String,
    /// Completion flag.
    pub completed: bool,
    /// Author's username, or `None` when the reference no longer resolves.
    pub username: Option<String>,
    /// Creation time.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last modification time.
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Identifying confirmation for a deleted note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedNote {
    /// Identifier the deleted record held.
    pub id: NoteId,
    /// Title the deleted record held.
    pub title: String,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for note CRUD operations.
#[derive(Clone)]
pub struct NoteService {
    note_repository: Arc<dyn NoteRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl NoteService {
    /// Creates a new note service.
    #[must_use]
    pub fn new(
        note_repository: Arc<dyn NoteRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            note_repository,
            user_repository,
        }
    }

    /// Lists all notes, each enriched with the author's username.
    ///
    /// Enrichment lookups are independent per note: a note whose author
    /// record is gone is returned with `username: None`. An empty
    /// collection is reported as `NotFound`.
    pub async fn list(&self) -> AppResult<Vec<NoteView>> {
        let notes = self.note_repository.find_all().await?;

        if notes.is_empty() {
            return Err(AppError::NotFound(
                "there are no notes at this time".to_owned(),
            ));
        }

        let mut views = Vec::with_capacity(notes.len());
        for note in notes {
            let username = self
                .user_repository
                .find_by_id(note.user_id)
                .await?
                .map(|user| user.username);

            views.push(NoteView {
                id: note.id,
                user_id: note.user_id,
                title: note.title,
                text: note.text,
                completed: note.completed,
                username,
                created_at: note.created_at,
                updated_at: note.updated_at,
            });
        }

        Ok(views)
    }

    /// Creates a new note for an existing user.
    pub async fn create(&self, params: CreateNoteParams) -> AppResult<NoteId> {
        let title = NonEmptyString::new(params.title)
            .map_err(|_| AppError::Validation("note title must not be empty".to_owned()))?;
        let text = NonEmptyString::new(params.text)
            .map_err(|_| AppError::Validation("note text must not be empty".to_owned()))?;

        // The back-reference must resolve at creation time.
        if self
            .user_repository
            .find_by_id(params.user_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("note author not found".to_owned()));
        }

        let duplicate = self.note_repository.find_by_title(title.as_str()).await?;
        if duplicate.is_some() {
            return Err(AppError::Conflict("duplicate note title".to_owned()));
        }

        self.note_repository
            .create(NewNote {
                user_id: params.user_id,
                title: title.into(),
                text: text.into(),
            })
            .await
    }

    /// Applies a full-record update to an existing note.
    ///
    /// All fields are replaced unconditionally. Returns the updated title.
    pub async fn update(&self, params: UpdateNoteParams) -> AppResult<String> {
        let title = NonEmptyString::new(params.title)
            .map_err(|_| AppError::Validation("note title must not be empty".to_owned()))?;
        let text = NonEmptyString::new(params.text)
            .map_err(|_| AppError::Validation("note text must not be empty".to_owned()))?;

        let Some(mut note) = self.note_repository.find_by_id(params.id).await? else {
            return Err(AppError::NotFound("note not found".to_owned()));
        };

        // Renaming a note to its own current title is allowed.
        let duplicate = self.note_repository.find_by_title(title.as_str()).await?;
        if let Some(duplicate) = duplicate
            && duplicate.id != params.id
        {
            return Err(AppError::Conflict("duplicate note title".to_owned()));
        }

        note.user_id = params.user_id;
        note.title = title.into();
        note.text = text.into();
        note.completed = params.completed;

        self.note_repository.save(&note).await?;

        Ok(note.title)
    }

    /// Deletes a note. Returns the deleted note's title and id for the
    /// confirmation message.
    pub async fn delete(&self, note_id: NoteId) -> AppResult<DeletedNote> {
        let Some(note) = self.note_repository.find_by_id(note_id).await? else {
            return Err(AppError::NotFound("note not found".to_owned()));
        };

        self.note_repository.delete(note_id).await?;

        Ok(DeletedNote {
            id: note.id,
            title: note.title,
        })
    }
}
