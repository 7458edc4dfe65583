//! Exhibition management service
//!
//! Book edits are applied to the session first, then saved with one request.
//! When the save fails the session goes back to the last saved list. Edits to
//! the same exhibition run one at a time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use validator::Validate;

use crate::{
    client::{BookQuery, LibraryBackend},
    domain::exhibition::ExhibitionBooks,
    error::{AppError, AppResult},
    models::{
        exhibition::{AddExhibitionBook, BookOrderUpdate},
        ApiMessage, Book, Exhibition, ExhibitionForm,
    },
};

/// An exhibition opened for editing
#[derive(Debug, Clone)]
pub struct ExhibitionSession {
    pub exhibition: Exhibition,
    books: HashMap<String, Book>,
    order: ExhibitionBooks,
}

impl ExhibitionSession {
    pub fn id(&self) -> i64 {
        self.exhibition.id
    }

    pub fn order(&self) -> &ExhibitionBooks {
        &self.order
    }

    /// Books in display order
    pub fn books(&self) -> Vec<&Book> {
        self.order
            .book_ids()
            .filter_map(|id| self.books.get(id))
            .collect()
    }
}

#[derive(Clone)]
pub struct ExhibitionsService {
    backend: Arc<dyn LibraryBackend>,
    max_books: usize,
    locks: Arc<Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>>,
}

impl ExhibitionsService {
    pub fn new(backend: Arc<dyn LibraryBackend>, max_books: usize) -> Self {
        Self {
            backend,
            max_books,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock_for(&self, id: i64) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(id).or_default().clone()
    }

    pub async fn list(&self) -> AppResult<Vec<Exhibition>> {
        self.backend.list_exhibitions().await
    }

    /// Exhibitions open to visitors on `today`
    pub async fn running(&self, today: NaiveDate) -> AppResult<Vec<Exhibition>> {
        let mut exhibitions = self.backend.list_exhibitions().await?;
        exhibitions.retain(|e| e.is_running(today));
        Ok(exhibitions)
    }

    /// Load an exhibition and its books
    pub async fn open(&self, id: i64) -> AppResult<ExhibitionSession> {
        let details = self.backend.get_exhibition(id).await?;
        let order = ExhibitionBooks::from_backend(details.order_rows(), self.max_books)?;
        let books = details
            .books
            .into_iter()
            .map(|b| (b.book.id.clone(), b.book))
            .collect();

        Ok(ExhibitionSession {
            exhibition: details.exhibition,
            books,
            order,
        })
    }

    pub async fn create(&self, form: &ExhibitionForm) -> AppResult<Option<i64>> {
        form.validate()?;
        let result = self.backend.create_exhibition(form).await?;
        tracing::info!("Created exhibition {:?}", result.exhibition_id);
        Ok(result.exhibition_id)
    }

    pub async fn update(&self, id: i64, form: &ExhibitionForm) -> AppResult<ApiMessage> {
        form.validate()?;
        self.backend.update_exhibition(id, form).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<ApiMessage> {
        let result = self.backend.delete_exhibition(id).await?;
        tracing::info!("Deleted exhibition {}", id);
        Ok(result)
    }

    pub async fn toggle(&self, id: i64) -> AppResult<ApiMessage> {
        self.backend.toggle_exhibition(id).await
    }

    /// Catalog search results that are not in the exhibition yet
    pub async fn search_candidates(&self, session: &ExhibitionSession, term: &str) -> AppResult<Vec<Book>> {
        let mut books = self
            .backend
            .list_books(&BookQuery {
                search: Some(term.to_string()),
                available_only: false,
            })
            .await?;
        books.retain(|b| !session.order.contains(&b.id));
        Ok(books)
    }

    pub async fn add_book(&self, session: &mut ExhibitionSession, book: Book) -> AppResult<()> {
        let lock = self.lock_for(session.id());
        let _guard = lock.lock().await;

        let next = session.order.add(&book.id)?;
        // The backend may still hold gaps left by removals; it appends
        // after its own highest order.
        let request = AddExhibitionBook {
            book_id: book.id.clone(),
            display_order: None,
        };
        let book_id = book.id.clone();
        session.books.insert(book.id.clone(), book);

        let saved = self
            .apply(session, next, |backend, id| async move {
                backend.add_exhibition_book(id, &request).await
            })
            .await;
        if let Err(e) = saved {
            session.books.remove(&book_id);
            return Err(e);
        }

        tracing::info!("Added book {} to exhibition {}", book_id, session.id());
        Ok(())
    }

    pub async fn remove_book(&self, session: &mut ExhibitionSession, book_id: &str) -> AppResult<()> {
        let lock = self.lock_for(session.id());
        let _guard = lock.lock().await;

        if !session.order.contains(book_id) {
            return Err(AppError::NotFound(format!(
                "Book {} is not part of exhibition {}",
                book_id,
                session.id()
            )));
        }

        let next = session.order.remove(book_id);
        let target = book_id.to_string();
        self.apply(session, next, |backend, id| async move {
            backend.remove_exhibition_book(id, &target).await
        })
        .await?;

        session.books.remove(book_id);
        tracing::info!("Removed book {} from exhibition {}", book_id, session.id());
        Ok(())
    }

    /// Save a new order given as the full sequence of book ids
    pub async fn reorder<S: AsRef<str>>(&self, session: &mut ExhibitionSession, sequence: &[S]) -> AppResult<()> {
        let lock = self.lock_for(session.id());
        let _guard = lock.lock().await;

        let next = session.order.reorder(sequence)?;
        self.save_order(session, next).await
    }

    /// Drag-and-drop: move one book to a 0-based position
    pub async fn move_book(&self, session: &mut ExhibitionSession, book_id: &str, index: usize) -> AppResult<()> {
        let lock = self.lock_for(session.id());
        let _guard = lock.lock().await;

        let next = session.order.move_to(book_id, index)?;
        self.save_order(session, next).await
    }

    async fn save_order(&self, session: &mut ExhibitionSession, next: ExhibitionBooks) -> AppResult<()> {
        let update = BookOrderUpdate {
            book_orders: next.to_persist_payload(),
        };
        self.apply(session, next, |backend, id| async move {
            backend.save_book_order(id, &update).await
        })
        .await?;
        tracing::info!("Saved book order of exhibition {}", session.id());
        Ok(())
    }

    /// Show `next` right away and persist it; put the previous list back
    /// when the request fails
    async fn apply<F, Fut>(&self, session: &mut ExhibitionSession, next: ExhibitionBooks, persist: F) -> AppResult<()>
    where
        F: FnOnce(Arc<dyn LibraryBackend>, i64) -> Fut,
        Fut: std::future::Future<Output = AppResult<ApiMessage>>,
    {
        let previous = std::mem::replace(&mut session.order, next);
        match persist(self.backend.clone(), session.id()).await {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::warn!(
                    "Saving exhibition {} failed, restoring last saved books: {}",
                    session.id(),
                    e
                );
                session.order = previous;
                Err(e)
            }
        }
    }
}
