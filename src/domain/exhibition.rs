//! Ordered, bounded list of the books shown in an exhibition.
//!
//! Every operation returns a new list and leaves its input untouched, so a
//! caller can keep the last persisted list around and fall back to it when
//! saving fails. `display_order` is always `1..=len` in list order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Maximum number of books in one exhibition
pub const MAX_BOOKS: usize = 12;

/// A book's slot in an exhibition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExhibitionBookEntry {
    pub book_id: String,
    pub display_order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExhibitionBooks {
    entries: Vec<ExhibitionBookEntry>,
    capacity: usize,
}

impl Default for ExhibitionBooks {
    fn default() -> Self {
        Self::with_capacity(MAX_BOOKS)
    }
}

impl ExhibitionBooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty list holding at most `capacity` books, never more than
    /// [`MAX_BOOKS`]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.min(MAX_BOOKS),
        }
    }

    /// Build a list from rows as the backend returns them.
    ///
    /// Rows are ordered by their `display_order` (ties keep their position)
    /// and renumbered, so gaps or repeated orders left by the backend disappear.
    pub fn from_backend(
        rows: impl IntoIterator<Item = ExhibitionBookEntry>,
        capacity: usize,
    ) -> Result<Self, DomainError> {
        let capacity = capacity.min(MAX_BOOKS);
        let mut rows: Vec<ExhibitionBookEntry> = rows.into_iter().collect();
        if rows.len() > capacity {
            return Err(DomainError::CapacityExceeded);
        }
        rows.sort_by_key(|row| row.display_order);

        let mut seen = HashSet::new();
        if !rows.iter().all(|row| seen.insert(row.book_id.as_str())) {
            return Err(DomainError::DuplicateBook);
        }

        Ok(Self::renumbered(rows.into_iter().map(|row| row.book_id), capacity))
    }

    fn renumbered(ids: impl IntoIterator<Item = String>, capacity: usize) -> Self {
        let entries = ids
            .into_iter()
            .enumerate()
            .map(|(index, book_id)| ExhibitionBookEntry {
                book_id,
                display_order: index as u32 + 1,
            })
            .collect();
        Self { entries, capacity }
    }

    pub fn entries(&self) -> &[ExhibitionBookEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, book_id: &str) -> bool {
        self.position(book_id).is_some()
    }

    pub fn position(&self, book_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.book_id == book_id)
    }

    pub fn book_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.book_id.as_str())
    }

    /// Append a book at the end
    pub fn add(&self, book_id: &str) -> Result<Self, DomainError> {
        if self.is_full() {
            return Err(DomainError::CapacityExceeded);
        }
        if self.contains(book_id) {
            return Err(DomainError::DuplicateBook);
        }
        let mut next = self.clone();
        next.entries.push(ExhibitionBookEntry {
            book_id: book_id.to_string(),
            display_order: self.entries.len() as u32 + 1,
        });
        Ok(next)
    }

    /// Drop a book and close the gap. Unknown ids leave the list as is.
    pub fn remove(&self, book_id: &str) -> Self {
        Self::renumbered(
            self.book_ids()
                .filter(|id| *id != book_id)
                .map(str::to_string),
            self.capacity,
        )
    }

    /// Reassign the order from a full permutation of the current ids
    pub fn reorder<S: AsRef<str>>(&self, sequence: &[S]) -> Result<Self, DomainError> {
        if sequence.len() != self.entries.len() {
            return Err(DomainError::SequenceMismatch);
        }
        let current: HashSet<&str> = self.book_ids().collect();
        let mut seen = HashSet::with_capacity(sequence.len());
        for id in sequence {
            let id = id.as_ref();
            if !current.contains(id) || !seen.insert(id) {
                return Err(DomainError::SequenceMismatch);
            }
        }
        Ok(Self::renumbered(
            sequence.iter().map(|id| id.as_ref().to_string()),
            self.capacity,
        ))
    }

    /// Move one book to a 0-based position, shifting the others.
    /// Positions past the end move the book last.
    pub fn move_to(&self, book_id: &str, index: usize) -> Result<Self, DomainError> {
        let from = self.position(book_id).ok_or(DomainError::SequenceMismatch)?;
        let mut ids: Vec<&str> = self.book_ids().collect();
        let moved = ids.remove(from);
        ids.insert(index.min(ids.len()), moved);
        self.reorder(ids.as_slice())
    }

    /// Rows to send to the backend, ascending by `display_order`
    pub fn to_persist_payload(&self) -> Vec<ExhibitionBookEntry> {
        let mut payload = self.entries.clone();
        payload.sort_by_key(|e| e.display_order);
        payload
    }
}
