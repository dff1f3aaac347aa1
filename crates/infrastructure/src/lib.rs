//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_note_repository;
mod in_memory_user_repository;
mod postgres_note_repository;
mod postgres_user_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_note_repository::InMemoryNoteRepository;
pub use in_memory_user_repository::InMemoryUserRepository;
pub use postgres_note_repository::PostgresNoteRepository;
pub use postgres_user_repository::PostgresUserRepository;
