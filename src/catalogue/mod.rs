//! The in-memory book catalogue.
//!
//! The catalogue is read once at startup from a JSON document shaped
//! `{ "books": [ ... ] }` and never changes afterwards. Transports share it
//! through an `Arc<Catalogue>`.
//!
//! Loading never fails from the caller's point of view: a missing or broken
//! data file is logged and produces an empty catalogue, so the server still
//! starts and simply reports no books.

mod book;

pub use book::{Book, BookListing, BookSummary};

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use crate::error::CatalogueError;

/// On-disk shape of the data file.
#[derive(Debug, Deserialize)]
struct CatalogueDocument {
    books: Vec<Book>,
}

/// An ordered, immutable collection of books.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogue {
    books: Vec<Book>,
}

impl Catalogue {
    /// Creates a catalogue from records already in memory.
    #[must_use]
    pub const fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// Loads the catalogue from `path`, falling back to an empty catalogue.
    ///
    /// Success is logged at info level with the record count; failure is
    /// logged at error level.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(catalogue) => {
                info!(
                    books = catalogue.len(),
                    path = %path.display(),
                    "Loaded book catalogue"
                );
                catalogue
            }
            Err(e) => {
                error!(error = %e, cause = ?std::error::Error::source(&e), "Failed to load books");
                Self::default()
            }
        }
    }

    /// Reads and parses the data file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a
    /// `{ "books": [...] }` document.
    pub fn try_load(path: &Path) -> Result<Self, CatalogueError> {
        let contents = std::fs::read_to_string(path).map_err(|e| CatalogueError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_json(&contents).map_err(|e| CatalogueError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Parses a catalogue document held in memory.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the text is not a valid document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let document: CatalogueDocument = serde_json::from_str(json)?;
        Ok(Self::new(document.books))
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Returns `true` if no books are catalogued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// All records in catalogue order.
    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Finds the first book with the given identifier.
    #[must_use]
    pub fn find(&self, book_id: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.book_id == book_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_document() {
        let catalogue = Catalogue::from_json(
            r#"{"books": [{"book_id": "a", "title": "First"}, {"book_id": "b"}]}"#,
        )
        .unwrap();
        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.books()[0].title, "First");
    }

    #[test]
    fn missing_books_field_is_an_error() {
        assert!(Catalogue::from_json(r#"{"items": []}"#).is_err());
    }

    #[test]
    fn books_must_be_an_array() {
        assert!(Catalogue::from_json(r#"{"books": {"book_id": "a"}}"#).is_err());
    }

    #[test]
    fn find_returns_first_match() {
        let mut first = Book::new("dup");
        first.title = "First".to_string();
        let mut second = Book::new("dup");
        second.title = "Second".to_string();

        let catalogue = Catalogue::new(vec![first, second]);
        assert_eq!(catalogue.find("dup").unwrap().title, "First");
        assert!(catalogue.find("other").is_none());
    }

    #[test]
    fn empty_catalogue() {
        let catalogue = Catalogue::default();
        assert!(catalogue.is_empty());
        assert_eq!(catalogue.len(), 0);
        assert!(catalogue.find("anything").is_none());
    }
}
