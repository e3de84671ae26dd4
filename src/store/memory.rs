//! In-memory book store
//!
//! An ordered `Vec` behind a `parking_lot::RwLock` plus an atomic id counter.
//! The catalog is small enough that linear lookup is fine; insertion order is
//! exactly the order `list` reports.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;

use super::{Book, BookDraft, BookStore, StoreError};

/// In-memory catalog storage.
pub struct InMemoryBookStore {
    books: RwLock<Vec<Book>>,
    /// Next id handed to an id-less create.
    next_id: AtomicU32,
}

impl InMemoryBookStore {
    /// Empty store; assigned ids start at 1.
    pub fn empty() -> Self {
        Self {
            books: RwLock::new(Vec::new()),
            next_id: AtomicU32::new(1),
        }
    }

    /// Store pre-loaded with the three fixed catalog entries (ids 1-3).
    /// The id counter starts above the seed, so the first created book
    /// gets id 4.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let seed = vec![
            Book { id: 1, name: "Harry Potter".to_string(), published: now },
            Book { id: 2, name: "Lord of the Rings".to_string(), published: now },
            Book { id: 3, name: "Song of Ice and Fire".to_string(), published: now },
        ];

        Self {
            books: RwLock::new(seed),
            next_id: AtomicU32::new(4),
        }
    }
}

impl BookStore for InMemoryBookStore {
    fn list(&self) -> Vec<Book> {
        self.books.read().clone()
    }

    fn get(&self, id: u32) -> Result<Book, StoreError> {
        self.books
            .read()
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn create(&self, draft: BookDraft) -> Result<Book, StoreError> {
        // Id assignment happens under the write lock so an explicit id can
        // never race with a counter-assigned one.
        let mut books = self.books.write();

        let id = match draft.id {
            Some(id) => {
                if books.iter().any(|b| b.id == id) {
                    return Err(StoreError::Conflict(id));
                }
                // Keep the counter ahead of explicit ids so later
                // assignments don't collide with this one.
                self.next_id.fetch_max(id + 1, Ordering::Relaxed);
                id
            }
            None => self.next_id.fetch_add(1, Ordering::Relaxed),
        };

        let book = Book {
            id,
            name: draft.name,
            published: draft.published.unwrap_or_else(Utc::now),
        };

        debug!("Stored book {} ({})", book.id, book.name);
        books.push(book.clone());
        Ok(book)
    }

    fn update(&self, id: u32, name: &str) -> Result<Book, StoreError> {
        let mut books = self.books.write();
        let book = books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(StoreError::NotFound(id))?;

        book.name = name.to_string();
        debug!("Updated book {} ({})", book.id, book.name);
        Ok(book.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn draft(name: &str) -> BookDraft {
        BookDraft { name: name.to_string(), ..Default::default() }
    }

    #[test]
    fn seeded_store_has_three_books_in_insertion_order() {
        let store = InMemoryBookStore::seeded();
        let books = store.list();

        assert_eq!(books.len(), 3);
        assert_eq!(books.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn first_assigned_id_is_above_the_seed() {
        let store = InMemoryBookStore::seeded();
        let book = store.create(draft("Dune")).unwrap();

        assert_eq!(book.id, 4);
        assert_eq!(store.get(4).unwrap().name, "Dune");
    }

    #[test]
    fn get_returns_not_found_for_absent_id() {
        let store = InMemoryBookStore::seeded();
        assert_eq!(store.get(999), Err(StoreError::NotFound(999)));
    }

    #[test]
    fn get_returns_the_latest_write() {
        let store = InMemoryBookStore::seeded();
        store.update(1, "Harry Potter (revised)").unwrap();

        assert_eq!(store.get(1).unwrap().name, "Harry Potter (revised)");
    }

    #[test]
    fn explicit_duplicate_id_is_rejected() {
        let store = InMemoryBookStore::seeded();
        let dup = BookDraft { id: Some(2), ..draft("Shadow Copy") };

        assert_eq!(store.create(dup), Err(StoreError::Conflict(2)));
        assert_eq!(store.list().len(), 3);
    }

    #[test]
    fn counter_skips_past_explicit_ids() {
        let store = InMemoryBookStore::seeded();
        let explicit = BookDraft { id: Some(10), ..draft("Leapfrog") };
        store.create(explicit).unwrap();

        let next = store.create(draft("After the Gap")).unwrap();
        assert_eq!(next.id, 11);
    }

    #[test]
    fn update_of_absent_id_mutates_nothing() {
        let store = InMemoryBookStore::seeded();
        let before = store.list();

        assert_eq!(store.update(999, "Ghost"), Err(StoreError::NotFound(999)));
        assert_eq!(store.list(), before);
    }

    #[test]
    fn update_keeps_id_and_published_timestamp() {
        let store = InMemoryBookStore::seeded();
        let original = store.get(2).unwrap();

        let updated = store.update(2, "The Lord of the Rings").unwrap();
        assert_eq!(updated.id, 2);
        assert_eq!(updated.published, original.published);
        assert_eq!(updated.name, "The Lord of the Rings");
    }

    #[test]
    fn concurrent_creates_never_collide() {
        let store = Arc::new(InMemoryBookStore::seeded());
        let mut handles = Vec::new();

        for t in 0..8 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                (0..25)
                    .map(|i| store.create(BookDraft {
                        name: format!("book-{}-{}", t, i),
                        ..Default::default()
                    }).unwrap().id)
                    .collect::<Vec<_>>()
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(ids.insert(id), "id {} assigned twice", id);
            }
        }

        assert_eq!(ids.len(), 200);
        assert_eq!(store.list().len(), 203);
    }
}
