//! Catalogue-backed tool handlers.

use std::sync::Arc;

use serde_json::Value;

use super::{tool_definitions, Dispatch, ToolCallResult, ToolDefinition};
use crate::catalogue::{Book, Catalogue};
use crate::error::DispatchError;

/// Answers the book tools from a shared, read-only catalogue.
#[derive(Debug, Clone)]
pub struct BookTools {
    catalogue: Arc<Catalogue>,
}

impl BookTools {
    /// Creates a dispatcher over the given catalogue.
    #[must_use]
    pub const fn new(catalogue: Arc<Catalogue>) -> Self {
        Self { catalogue }
    }

    /// The catalogue this dispatcher reads from.
    #[must_use]
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    // ==================== Tool Handlers ====================

    /// One compact JSON object per line, in catalogue order.
    fn call_list_books(&self) -> Result<ToolCallResult, DispatchError> {
        let lines = self
            .catalogue
            .books()
            .iter()
            .map(|book| serde_json::to_string(&book.listing()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ToolCallResult::text(lines.join("\n")))
    }

    fn call_get_book_summary(&self, arguments: &Value) -> Result<ToolCallResult, DispatchError> {
        let book = self.lookup(arguments)?;
        ToolCallResult::json(&book.summary_view())
    }

    fn call_get_book_details(&self, arguments: &Value) -> Result<ToolCallResult, DispatchError> {
        let book = self.lookup(arguments)?;
        ToolCallResult::json(book)
    }

    fn call_get_table_of_contents(
        &self,
        arguments: &Value,
    ) -> Result<ToolCallResult, DispatchError> {
        let book = self.lookup(arguments)?;
        Ok(ToolCallResult::text(format_table_of_contents(book)))
    }

    /// Both arguments are checked before the lookup, so a missing
    /// `chapter_number` is reported even when the book does not exist.
    fn call_get_chapter_summary(&self, arguments: &Value) -> Result<ToolCallResult, DispatchError> {
        let book_id = required_book_id(arguments)?;
        let chapter = required(arguments, "chapter_number").map(chapter_key)?;

        let book = self.find(book_id)?;
        let summary = book
            .chapter_summary(&chapter)
            .ok_or_else(|| DispatchError::ChapterNotFound {
                chapter,
                book_id: book_id.to_string(),
            })?;

        Ok(ToolCallResult::text(summary))
    }

    // ==================== Argument Helpers ====================

    /// Resolves the `book_id` argument to a catalogued book.
    fn lookup(&self, arguments: &Value) -> Result<&Book, DispatchError> {
        let book_id = required_book_id(arguments)?;
        self.find(book_id)
    }

    fn find(&self, book_id: &str) -> Result<&Book, DispatchError> {
        self.catalogue
            .find(book_id)
            .ok_or_else(|| DispatchError::BookNotFound {
                book_id: book_id.to_string(),
            })
    }
}

impl Dispatch for BookTools {
    fn definitions(&self) -> Vec<ToolDefinition> {
        tool_definitions()
    }

    fn dispatch(&self, name: &str, arguments: &Value) -> Result<ToolCallResult, DispatchError> {
        tracing::debug!(tool = name, "Dispatching tool call");

        match name {
            "list_books" => self.call_list_books(),
            "get_book_summary" => self.call_get_book_summary(arguments),
            "get_book_details" => self.call_get_book_details(arguments),
            "get_table_of_contents" => self.call_get_table_of_contents(arguments),
            "get_chapter_summary" => self.call_get_chapter_summary(arguments),
            _ => Err(DispatchError::UnknownTool {
                name: name.to_string(),
            }),
        }
    }
}

/// Returns a present, non-null argument.
fn required<'a>(arguments: &'a Value, argument: &'static str) -> Result<&'a Value, DispatchError> {
    arguments
        .get(argument)
        .filter(|value| !value.is_null())
        .ok_or(DispatchError::MissingArgument { argument })
}

fn required_book_id(arguments: &Value) -> Result<&str, DispatchError> {
    required(arguments, "book_id")?
        .as_str()
        .ok_or(DispatchError::InvalidArgument {
            argument: "book_id",
            expected: "a string",
        })
}

/// Renders a chapter number as the key used in `chapter_summaries`.
///
/// `3`, `3.0` and `"3"` all map to `"3"`.
#[allow(clippy::float_cmp)]
fn chapter_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.trunc() == f => format!("{f:.0}"),
                    _ => n.to_string(),
                }
            }
        }
        other => other.to_string(),
    }
}

/// Renders `## label` heading lines, each followed by its description,
/// with a blank line between entries.
fn format_table_of_contents(book: &Book) -> String {
    book.chapters()
        .map(|(label, description)| format!("## {label}\n{description}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}
