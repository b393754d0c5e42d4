//! Cache index MCP tools.
//!
//! Each tool is a thin wrapper over one registry operation.

pub mod add;
pub mod entries;
pub mod has;
pub mod known;

pub use add::{IndexAddParams, add_impl};
pub use entries::{IndexEntriesParams, entries_impl};
pub use has::{IndexHasParams, has_impl};
pub use known::{IndexKnownParams, known_impl};

use cindex_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Render a tool output as pretty JSON text content.
fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
