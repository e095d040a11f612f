//! revisit-client library - visitor re-identification client
//!
//! Orchestrates the identification flow: acquire the strong identity from the
//! provider adapter, compose the soft signal, reconcile both against the
//! remembered-name store with bounded retries, and drive the screen state
//! machine from backend-confirmed identity only.

pub mod cache;
pub mod gateway;
pub mod matching;
pub mod provider;
pub mod session;

pub use cache::DisplayCache;
pub use gateway::{HttpGateway, RecognitionGateway};
pub use matching::MatchingClient;
pub use provider::{FileIdentityProvider, IdentityProvider};
pub use session::{Screen, Session, SessionConfig, View};
