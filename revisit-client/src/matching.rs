//! Matching client
//!
//! Runs the identity lookup under the session's retry policy. The central
//! correctness property: an empty-but-successful lookup ends the loop at
//! once, while an exhausted run of transport failures propagates the last
//! error — it is never silently converted into "no match".

use std::sync::Arc;

use revisit_common::{Error, IdentitySignals, RecognizedVisitor, Result, RetryPolicy};

use crate::gateway::RecognitionGateway;

/// Lookup orchestrator: gateway plus retry policy.
pub struct MatchingClient {
    gateway: Arc<dyn RecognitionGateway>,
    policy: RetryPolicy,
}

impl MatchingClient {
    pub fn new(gateway: Arc<dyn RecognitionGateway>, policy: RetryPolicy) -> Self {
        Self { gateway, policy }
    }

    /// Identify the visitor behind `signals`.
    ///
    /// Retries transport failures up to the policy's attempt cap with its
    /// fixed delay. `Ok(None)` means the backend confirmed there is no
    /// record; `Err(Transport)` means we could not get an answer at all.
    pub async fn identify(&self, signals: &IdentitySignals) -> Result<Option<RecognizedVisitor>> {
        self.policy
            .run("lookup", Error::is_transport, || {
                self.gateway.lookup(signals)
            })
            .await
    }
}
