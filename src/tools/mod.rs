//! Tool dispatch.
//!
//! A tool is a named operation with a description and a JSON Schema for
//! its arguments. Transports never look inside a tool: they hand the name
//! and arguments to a [`Dispatch`] implementation and serialise whatever
//! comes back.
//!
//! The only implementation is [`BookTools`], which answers from the
//! catalogue.

mod books;
mod definitions;

pub use books::BookTools;
pub use definitions::tool_definitions;

use serde::Serialize;
use serde_json::Value;

use crate::error::DispatchError;

/// A tool definition for the tools/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// The envelope returned by a successful tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
}

impl ToolCallResult {
    /// Creates a result holding a single text item.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
        }
    }

    /// Creates a text result from a serialisable payload.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Serialisation`] if the payload cannot be
    /// turned into JSON.
    pub fn json<T: Serialize>(payload: &T) -> Result<Self, DispatchError> {
        Ok(Self::text(serde_json::to_string(payload)?))
    }

    /// Returns the text of the first content item, if any.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|item| match item {
            ToolContent::Text { text } => text.as_str(),
        })
    }
}

/// The capability both transports consume.
pub trait Dispatch: Send + Sync {
    /// Lists every tool this dispatcher answers.
    fn definitions(&self) -> Vec<ToolDefinition>;

    /// Runs the named tool.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] if the tool is unknown, an argument is
    /// missing or malformed, or a requested record does not exist.
    fn dispatch(&self, name: &str, arguments: &Value) -> Result<ToolCallResult, DispatchError>;
}
