//! MCP server exposing the Steam Web API as agent tools.
//!
//! The server speaks the Model Context Protocol over stdio and offers nine
//! tools: fuzzy app search over the cached Steam catalog, storefront
//! details, player counts, news, owned/recent games, player summaries,
//! friend lists, and achievements.

pub mod config;
pub mod error;
pub mod mcp;
pub mod search;
pub mod steam;
