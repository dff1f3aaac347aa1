//! PostgreSQL-backed note repository.

use async_trait::async_trait;
use sqlx::PgPool;

use notewell_application::{NewNote, NoteRecord, NoteRepository};
use notewell_core::{AppError, AppResult};
use notewell_domain::{NoteId, UserId};

/// PostgreSQL implementation of the note repository port.
///
/// Title uniqueness is backed by a unique constraint; violations surface
/// as `Conflict`, making the store the authoritative enforcement point
/// behind the service-level pre-check.
#[derive(Clone)]
pub struct PostgresNoteRepository {
    pool: PgPool,
}

impl PostgresNoteRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct NoteRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    title: String,
    text: String,
    completed: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<NoteRow> for NoteRecord {
    fn from(row: NoteRow) -> Self {
        Self {
            id: NoteId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            title: row.title,
            text: row.text,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl NoteRepository for PostgresNoteRepository {
    async fn find_all(&self) -> AppResult<Vec<NoteRecord>> {
        let rows = sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT id, user_id, title, text, completed, created_at, updated_at
            FROM notes
            ORDER BY created_at, title
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list notes: {error}")))?;

        Ok(rows.into_iter().map(NoteRecord::from).collect())
    }

    async fn find_by_id(&self, note_id: NoteId) -> AppResult<Option<NoteRecord>> {
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT id, user_id, title, text, completed, created_at, updated_at
            FROM notes
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(note_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find note by id: {error}")))?;

        Ok(row.map(NoteRecord::from))
    }

    async fn find_by_title(&self, title: &str) -> AppResult<Option<NoteRecord>> {
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT id, user_id, title, text, completed, created_at, updated_at
            FROM notes
            WHERE title = $1
            LIMIT 1
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find note by title: {error}")))?;

        Ok(row.map(NoteRecord::from))
    }

    async fn exists_for_user(&self, user_id: UserId) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM notes WHERE user_id = $1)",
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to check notes for user: {error}"))
        })?;

        Ok(exists)
    }

    async fn create(&self, new_note: NewNote) -> AppResult<NoteId> {
        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO notes (user_id, title, text)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(new_note.user_id.as_uuid())
        .bind(new_note.title)
        .bind(new_note.text)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| title_conflict_or_internal(error, "create note"))?;

        Ok(NoteId::from_uuid(id))
    }

    async fn save(&self, record: &NoteRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE notes
            SET user_id = $2, title = $3, text = $4, completed = $5, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.user_id.as_uuid())
        .bind(record.title.as_str())
        .bind(record.text.as_str())
        .bind(record.completed)
        .execute(&self.pool)
        .await
        .map_err(|error| title_conflict_or_internal(error, "update note"))?;

        Ok(())
    }

    async fn delete(&self, note_id: NoteId) -> AppResult<()> {
        sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(note_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete note: {error}")))?;

        Ok(())
    }
}

fn title_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("duplicate note title".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
