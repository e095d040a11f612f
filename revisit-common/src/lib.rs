//! # Revisit Common Library
//!
//! Shared code for the revisit demo services including:
//! - Error taxonomy (provider / transport / validation failures)
//! - Identity and visitor record types
//! - API request/response types shared by server and client
//! - Soft-signal composition from environment attributes
//! - Reusable fixed-delay retry policy

pub mod api;
pub mod error;
pub mod retry;
pub mod signals;
pub mod types;

pub use error::{Error, Result};
pub use retry::RetryPolicy;
pub use types::{IdentitySignals, MatchKind, RecognizedVisitor};
