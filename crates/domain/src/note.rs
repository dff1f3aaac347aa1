//! Note domain types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a note record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Creates a new random note identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a note identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::NoteId;

    #[test]
    fn note_id_formats_as_uuid() {
        let note_id = NoteId::new();
        assert_eq!(note_id.to_string().len(), 36);
    }

    #[test]
    fn distinct_ids_are_generated() {
        assert_ne!(NoteId::new(), NoteId::new());
    }
}
