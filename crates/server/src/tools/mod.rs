//! MCP tool implementations.
//!
//! This module contains all tools exposed by the doniyor server.

pub mod web_search;
