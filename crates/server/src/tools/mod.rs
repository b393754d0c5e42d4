//! MCP tool implementations.
//!
//! This module contains all tools exposed by the cindex server.

pub mod index;
