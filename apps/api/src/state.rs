use notewell_application::{NoteService, UserService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub note_service: NoteService,
    pub postgres_pool: sqlx::PgPool,
}
