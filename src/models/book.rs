//! Book model and the author representations the backend mixes

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Reference to a catalog author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: i64,
    pub full_name: String,
}

/// Authors of a book.
///
/// Older rows carry a free-text `author` column, newer ones a list of
/// catalog authors. The choice is made once when a row is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BookAuthors {
    #[default]
    Unspecified,
    Legacy(String),
    Structured(Vec<AuthorRef>),
}

impl BookAuthors {
    fn from_wire(author: Option<String>, authors: Option<Vec<AuthorRef>>) -> Self {
        match (authors, author) {
            (Some(list), _) if !list.is_empty() => BookAuthors::Structured(list),
            (_, Some(text)) if !text.trim().is_empty() => BookAuthors::Legacy(text.trim().to_string()),
            _ => BookAuthors::Unspecified,
        }
    }

    /// Name line shown next to the title
    pub fn display_name(&self) -> Option<String> {
        match self {
            BookAuthors::Unspecified => None,
            BookAuthors::Legacy(text) => Some(text.clone()),
            BookAuthors::Structured(list) => Some(
                list.iter()
                    .map(|a| a.full_name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        }
    }
}

/// Book as the backend stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BookRow", into = "BookRow")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub authors: BookAuthors,
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub total_copies: u32,
    pub available_copies: u32,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookRow {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    authors: Option<Vec<AuthorRef>>,
    #[serde(default)]
    isbn: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cover_image: Option<String>,
    #[serde(default = "one")]
    total_copies: u32,
    #[serde(default)]
    available_copies: Option<u32>,
}

fn one() -> u32 {
    1
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            authors: BookAuthors::from_wire(row.author, row.authors),
            available_copies: row.available_copies.unwrap_or(row.total_copies),
            id: row.id,
            title: row.title,
            isbn: row.isbn,
            category: row.category,
            description: row.description,
            cover_image: row.cover_image,
            total_copies: row.total_copies,
        }
    }
}

impl From<Book> for BookRow {
    fn from(book: Book) -> Self {
        // The legacy column stays filled so older readers keep a name to show
        let author = book.authors.display_name();
        let authors = match book.authors {
            BookAuthors::Structured(list) => Some(list),
            _ => None,
        };
        Self {
            id: book.id,
            title: book.title,
            author,
            authors,
            isbn: book.isbn,
            category: book.category,
            description: book.description,
            cover_image: book.cover_image,
            total_copies: book.total_copies,
            available_copies: Some(book.available_copies),
        }
    }
}

/// Book list payload: the backend answers either with a bare array or
/// with a paginated object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BookList {
    Bare(Vec<Book>),
    Page { books: Vec<Book> },
}

impl BookList {
    pub fn into_books(self) -> Vec<Book> {
        match self {
            BookList::Bare(books) | BookList::Page { books } => books,
        }
    }
}

/// Create or update book request
#[derive(Debug, Clone, Serialize, Validate)]
#[validate(schema(function = "validate_copies"))]
pub struct BookForm {
    #[validate(length(min = 1, message = "Book ID is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "Book title is required"))]
    pub title: String,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 1, message = "A book needs at least one copy"))]
    pub total_copies: u32,
    pub available_copies: Option<u32>,
}

fn validate_copies(form: &BookForm) -> Result<(), validator::ValidationError> {
    match form.available_copies {
        Some(available) if available > form.total_copies => {
            let mut err = validator::ValidationError::new("available_copies");
            err.message = Some("Available copies cannot exceed total copies".into());
            Err(err)
        }
        _ => Ok(()),
    }
}
