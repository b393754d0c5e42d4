//! index_has tool implementation.
//!
//! Reports whether an identifier has been registered.

use cindex_core::{Backend, CacheIndex, Clock, Error};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Parameters for the index_has tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IndexHasParams {
    /// The identifier to look up.
    pub identifier: String,
}

/// Output from the index_has tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IndexHasOutput {
    pub identifier: String,
    /// Whether at least one entry carries the identifier.
    pub present: bool,
}

/// Implementation of the index_has tool.
pub async fn has_impl<C: Clock>(
    index: &CacheIndex<Backend, C>, params: IndexHasParams,
) -> Result<CallToolResult, McpError> {
    if params.identifier.is_empty() {
        return Err(Error::InvalidInput("identifier cannot be empty".into()).into());
    }

    let present = index.has(&params.identifier).await?;
    json_result(&IndexHasOutput { identifier: params.identifier, present })
}
