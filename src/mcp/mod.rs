//! MCP service layer
//!
//! Wires the analysis, risk, and recommendation tools into an MCP server.

pub mod server;

pub use server::DdaService;
