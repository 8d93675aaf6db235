//! Book records and the reduced views served by the tools.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single catalogued book.
///
/// Only `book_id` is required in the data file. Fields the file omits or
/// sets to `null` take their defaults, and a number in a text field keeps
/// its JSON text. Fields this type does not know about are kept in
/// [`Book::extra`] so the full record can be returned unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Unique key within the catalogue.
    pub book_id: String,
    #[serde(default, deserialize_with = "text_or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "text_or_default")]
    pub author: String,
    #[serde(default, deserialize_with = "text_or_default")]
    pub category: String,
    #[serde(default, deserialize_with = "text_or_default")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "text_or_default")]
    pub summary: String,
    /// Free-form reading length, e.g. "15 min".
    #[serde(default, deserialize_with = "text_or_default")]
    pub length: String,
    #[serde(default, deserialize_with = "text_or_default")]
    pub release_date: String,
    /// Subscription tier the book belongs to.
    #[serde(default, deserialize_with = "text_or_default")]
    pub tier: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_summary: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_chapter_summaries: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_table_of_contents: bool,
    /// Chapter label to chapter description, in document order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_of_contents: Option<IndexMap<String, String>>,
    /// Chapter number (as a string key) to chapter summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_summaries: Option<IndexMap<String, String>>,
    /// Fields present in the data file but not modelled above.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Book {
    /// Creates a book with the given identifier and every other field empty.
    #[must_use]
    pub fn new(book_id: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            title: String::new(),
            author: String::new(),
            category: String::new(),
            subtitle: String::new(),
            summary: String::new(),
            length: String::new(),
            release_date: String::new(),
            tier: String::new(),
            has_summary: false,
            has_chapter_summaries: false,
            has_table_of_contents: false,
            table_of_contents: None,
            chapter_summaries: None,
            extra: IndexMap::new(),
        }
    }

    /// Returns the summary text for a chapter key, if one is recorded.
    ///
    /// An empty summary counts as absent.
    #[must_use]
    pub fn chapter_summary(&self, chapter: &str) -> Option<&str> {
        self.chapter_summaries
            .as_ref()?
            .get(chapter)
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }

    /// Iterates the table of contents; empty when the book has none.
    pub fn chapters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.table_of_contents
            .iter()
            .flatten()
            .map(|(label, description)| (label.as_str(), description.as_str()))
    }

    /// Projection used by `list_books`.
    #[must_use]
    pub fn listing(&self) -> BookListing<'_> {
        BookListing {
            book_id: &self.book_id,
            title: &self.title,
            author: &self.author,
            category: &self.category,
            subtitle: &self.subtitle,
            summary: &self.summary,
            length: &self.length,
            release_date: &self.release_date,
            tier: &self.tier,
            has_summary: self.has_summary,
            has_chapter_summaries: self.has_chapter_summaries,
            has_table_of_contents: self.has_table_of_contents,
        }
    }

    /// Projection used by `get_book_summary`.
    #[must_use]
    pub fn summary_view(&self) -> BookSummary<'_> {
        BookSummary {
            book_id: &self.book_id,
            title: &self.title,
            author: &self.author,
            summary: &self.summary,
        }
    }
}

/// The catalogue-listing view of a book: descriptive fields and flags,
/// never the chapter maps.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BookListing<'a> {
    pub book_id: &'a str,
    pub title: &'a str,
    pub author: &'a str,
    pub category: &'a str,
    pub subtitle: &'a str,
    pub summary: &'a str,
    pub length: &'a str,
    pub release_date: &'a str,
    pub tier: &'a str,
    pub has_summary: bool,
    pub has_chapter_summaries: bool,
    pub has_table_of_contents: bool,
}

/// The short view of a book returned by `get_book_summary`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BookSummary<'a> {
    pub book_id: &'a str,
    pub title: &'a str,
    pub author: &'a str,
    pub summary: &'a str,
}

/// Reads a text field, accepting any scalar; `null` becomes empty.
fn text_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
