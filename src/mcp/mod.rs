//! Model Context Protocol server: protocol types, tool registry, stdio
//! transport, and the Steam tool implementations.

pub mod context;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod tools;

pub use context::ToolContext;
pub use registry::{McpRegistry, ToolBuilder};
pub use server::{run_stdio, McpConnection};
