//! Optional hosted language-model collaborator.
//!
//! Every failure here is recoverable: callers log the error and fall through
//! to the local rule engine. Nothing in this module is ever surfaced to the
//! end user.

pub mod client;
pub mod parser;
pub mod prompt;
pub mod remote;

pub use client::*;
pub use parser::*;
pub use prompt::*;
pub use remote::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Upstream unreachable at {0}")]
    Connection(String),

    #[error("Upstream request timed out after {0}s")]
    Timeout(u64),

    #[error("Upstream returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Completion contained no choices")]
    EmptyCompletion,

    #[error("No JSON object found in completion")]
    NoJsonObject,

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Result violates output contract: {0}")]
    InvalidResult(String),
}
