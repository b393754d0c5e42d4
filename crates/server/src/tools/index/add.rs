//! index_add tool implementation.
//!
//! Registers an identifier, or the content hash of a text payload.

use cindex_core::{Backend, CacheIndex, Clock, Error, index::hash::content_identifier};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Parameters for the index_add tool.
///
/// Exactly one of `identifier` or `content` must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct IndexAddParams {
    /// Identifier to register as-is.
    #[serde(default)]
    pub identifier: Option<String>,

    /// Content to register by its SHA-256 hex digest.
    #[serde(default)]
    pub content: Option<String>,
}

/// Output from the index_add tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IndexAddOutput {
    /// The identifier that was registered.
    pub identifier: String,
    /// Registration time, `YYYY-MM-DD:HH:MM:SS`.
    pub timestamp: String,
}

/// Implementation of the index_add tool.
pub async fn add_impl<C: Clock>(
    index: &mut CacheIndex<Backend, C>, params: IndexAddParams,
) -> Result<CallToolResult, McpError> {
    let identifier = match (params.identifier, params.content) {
        (Some(identifier), None) if !identifier.is_empty() => identifier,
        (Some(_), None) => return Err(Error::InvalidInput("identifier cannot be empty".into()).into()),
        (None, Some(content)) => content_identifier(content.as_bytes()),
        (Some(_), Some(_)) => {
            return Err(Error::InvalidInput("Specify only one of identifier or content".into()).into());
        }
        (None, None) => return Err(Error::InvalidInput("One of identifier or content must be specified".into()).into()),
    };

    let entry = index.add(identifier).await?;
    tracing::info!(identifier = %entry.identifier, "registered index entry");

    json_result(&IndexAddOutput { timestamp: entry.formatted_timestamp(), identifier: entry.identifier })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::index::test_support::{memory_index, parse_output};

    #[tokio::test]
    async fn test_add_impl_identifier() {
        let mut index = memory_index().await;
        let params = IndexAddParams { identifier: Some("file1".into()), content: None };

        let result = add_impl(&mut index, params).await.unwrap();
        let output: IndexAddOutput = parse_output(&result);
        assert_eq!(output.identifier, "file1");
        assert_eq!(output.timestamp, "2024-04-01:08:00:00");
        assert!(index.has("file1").await.unwrap());
    }

    #[tokio::test]
    async fn test_add_impl_content_is_hashed() {
        let mut index = memory_index().await;
        let params = IndexAddParams { identifier: None, content: Some("hello".into()) };

        let result = add_impl(&mut index, params).await.unwrap();
        let output: IndexAddOutput = parse_output(&result);
        assert_eq!(output.identifier, content_identifier(b"hello"));
        assert!(index.has(&output.identifier).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_impl_rejects_ambiguous_params() {
        let mut index = memory_index().await;

        let both = IndexAddParams { identifier: Some("a".into()), content: Some("b".into()) };
        assert!(add_impl(&mut index, both).await.is_err());

        let neither = IndexAddParams::default();
        assert!(add_impl(&mut index, neither).await.is_err());

        let empty = IndexAddParams { identifier: Some(String::new()), content: None };
        assert!(add_impl(&mut index, empty).await.is_err());

        assert!(index.entries().await.unwrap().is_empty());
    }
}
