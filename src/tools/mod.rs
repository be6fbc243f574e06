//! DDA Tools module
//!
//! Tool implementations behind the MCP service layer.

pub mod analysis;
pub mod history;
pub mod recommend;
pub mod risk;
pub mod status;

use serde::Serialize;

/// Structured error payload rendered instead of a raw error
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
