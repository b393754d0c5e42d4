//! index_known tool implementation.
//!
//! Lists every distinct identifier in the index.

use cindex_core::{Backend, CacheIndex, Clock};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Parameters for the index_known tool (none).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct IndexKnownParams {}

/// Output from the index_known tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IndexKnownOutput {
    /// Distinct identifiers, sorted.
    pub identifiers: Vec<String>,
}

/// Implementation of the index_known tool.
pub async fn known_impl<C: Clock>(
    index: &CacheIndex<Backend, C>, _params: IndexKnownParams,
) -> Result<CallToolResult, McpError> {
    let identifiers = index.known().await?.into_iter().collect();
    json_result(&IndexKnownOutput { identifiers })
}
