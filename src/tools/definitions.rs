//! Static tool definitions advertised through tools/list.

use serde_json::{json, Value};

use super::ToolDefinition;

/// Schema fragment for the `book_id` argument shared by most tools.
fn book_id_property() -> Value {
    json!({
        "type": "string",
        "description": "The unique identifier for the book"
    })
}

/// Schema for tools whose only argument is `book_id`.
fn book_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "book_id": book_id_property()
        },
        "required": ["book_id"]
    })
}

/// Returns the list of available tools, in the order clients see them.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "list_books".to_string(),
            description: Some("List all available books with their basic information".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDefinition {
            name: "get_book_summary".to_string(),
            description: Some("Get the main summary for a book".to_string()),
            input_schema: book_id_schema(),
        },
        ToolDefinition {
            name: "get_book_details".to_string(),
            description: Some("Get detailed information about a specific book".to_string()),
            input_schema: book_id_schema(),
        },
        ToolDefinition {
            name: "get_table_of_contents".to_string(),
            description: Some(
                "Get the table of contents for a book with chapter descriptions".to_string(),
            ),
            input_schema: book_id_schema(),
        },
        ToolDefinition {
            name: "get_chapter_summary".to_string(),
            description: Some("Get the summary for a specific chapter of a book".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "book_id": book_id_property(),
                    "chapter_number": {
                        "type": "integer",
                        "description": "The chapter number to get summary for"
                    }
                },
                "required": ["book_id", "chapter_number"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_definitions_valid() {
        let tools = tool_definitions();
        assert_eq!(tools.len(), 5);

        for tool in &tools {
            assert!(!tool.name.is_empty());
            assert!(tool.description.is_some());
            assert!(tool.input_schema.is_object());
            assert_eq!(tool.input_schema["type"], "object");
        }
    }

    #[test]
    fn chapter_summary_requires_both_arguments() {
        let tools = tool_definitions();
        let tool = tools
            .iter()
            .find(|t| t.name == "get_chapter_summary")
            .unwrap();
        assert_eq!(
            tool.input_schema["required"],
            json!(["book_id", "chapter_number"])
        );
    }

    #[test]
    fn definitions_serialise_with_camel_case_schema_key() {
        let value = serde_json::to_value(&tool_definitions()[0]).unwrap();
        assert!(value.get("inputSchema").is_some());
        assert!(value.get("input_schema").is_none());
    }
}
