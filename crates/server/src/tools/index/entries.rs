//! index_entries tool implementation.
//!
//! Returns the full entry sequence in insertion order.

use cindex_core::{Backend, CacheEntry, CacheIndex, Clock};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Parameters for the index_entries tool (none).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct IndexEntriesParams {}

/// Output from the index_entries tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IndexEntriesOutput {
    pub entries: Vec<CacheEntry>,
}

/// Implementation of the index_entries tool.
pub async fn entries_impl<C: Clock>(
    index: &CacheIndex<Backend, C>, _params: IndexEntriesParams,
) -> Result<CallToolResult, McpError> {
    let entries = index.entries().await?;
    json_result(&IndexEntriesOutput { entries })
}
