//! Tool implementations exposed over the MCP protocol
//!
//! Provides the registry of callable tools and the invocation gates
//! (lookup, argument validation, execution, response assembly).

pub mod tools;
