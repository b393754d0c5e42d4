//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the registry operations.
use std::sync::Arc;

use cindex_core::{Backend, CacheIndex};
use tokio::sync::Mutex;

use crate::tools::index::{
    IndexAddParams, IndexEntriesParams, IndexHasParams, IndexKnownParams, add_impl, entries_impl, has_impl,
    known_impl,
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for cindex.
///
/// Tool calls share one registry; the mutex serializes each
/// load-modify-save cycle within this process.
#[derive(Clone)]
pub struct IndexServer {
    index: Arc<Mutex<CacheIndex<Backend>>>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl IndexServer {
    /// Create a new server handler around an opened registry.
    pub fn new(index: CacheIndex<Backend>) -> Self {
        Self { index: Arc::new(Mutex::new(index)), tool_router: Self::tool_router() }
    }

    #[tool(description = "Check whether an identifier is registered in the cache index.")]
    async fn index_has(&self, params: Parameters<IndexHasParams>) -> Result<CallToolResult, McpError> {
        let index = self.index.lock().await;
        has_impl(&*index, params.0).await
    }

    #[tool(description = "List every distinct identifier registered in the cache index.")]
    async fn index_known(&self, params: Parameters<IndexKnownParams>) -> Result<CallToolResult, McpError> {
        let index = self.index.lock().await;
        known_impl(&*index, params.0).await
    }

    /// Register an identifier.
    ///
    /// Repeated registrations append new entries rather than replacing old ones.
    #[tool(
        description = "Register an identifier (or the SHA-256 of given content) in the cache index with the current time."
    )]
    async fn index_add(&self, params: Parameters<IndexAddParams>) -> Result<CallToolResult, McpError> {
        let mut index = self.index.lock().await;
        add_impl(&mut *index, params.0).await
    }

    #[tool(description = "Return all cache index entries in insertion order, including duplicates.")]
    async fn index_entries(&self, params: Parameters<IndexEntriesParams>) -> Result<CallToolResult, McpError> {
        let index = self.index.lock().await;
        entries_impl(&*index, params.0).await
    }
}

impl ServerHandler for IndexServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "cindex".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cindex_core::BackendKind;

    #[tokio::test]
    async fn test_router_lists_index_tools() {
        let index = CacheIndex::open(Backend::new(BackendKind::Memory), None).await.unwrap();
        let server = IndexServer::new(index);

        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["index_add", "index_entries", "index_has", "index_known"]);
    }

    #[tokio::test]
    async fn test_tools_share_one_registry() {
        let index = CacheIndex::open(Backend::new(BackendKind::Memory), None).await.unwrap();
        let server = IndexServer::new(index);

        let params = IndexAddParams { identifier: Some("file1".into()), content: None };
        server.index_add(Parameters(params)).await.unwrap();

        let clone = server.clone();
        assert!(clone.index.lock().await.has("file1").await.unwrap());
    }
}
