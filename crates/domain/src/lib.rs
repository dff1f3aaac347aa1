//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod note;
mod user;

pub use note::NoteId;
pub use user::{USERNAME_MAX_LENGTH, UserId, Username, validate_roles};
