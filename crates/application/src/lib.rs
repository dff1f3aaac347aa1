//! Application services and ports for Notewell.
//!
//! Services hold all CRUD and validation logic; persistence and password
//! hashing sit behind async ports implemented in the infrastructure crate.

#![forbid(unsafe_code)]

mod note_service;
mod user_service;

pub use note_service::{
    CreateNoteParams, DeletedNote, NewNote, NoteRecord, NoteRepository, NoteService, NoteView,
    UpdateNoteParams,
};
pub use user_service::{
    CreateUserParams, CreatedUser, DeletedUser, NewUser, PasswordHasher, UpdateUserParams,
    UserRecord, UserRepository, UserService, UserView,
};
