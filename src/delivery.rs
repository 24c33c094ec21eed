//! Outbound delivery of finished composites
//!
//! The transport (chat gateway, mailer, ...) lives behind [`Delivery`].
//! Failures are reported to the caller, which logs them; they never change
//! session state.

use thiserror::Error;

use crate::artifact::CompositeResult;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Delivery to {recipient} failed: {reason}")]
    Failed { recipient: String, reason: String },
}

#[async_trait::async_trait]
pub trait Delivery: Send + Sync {
    /// Hand a composite to `recipient`
    async fn send(&self, result: &CompositeResult, recipient: &str) -> Result<(), DeliveryError>;
}

/// Delivers a download link built from the public base URL
#[derive(Debug, Clone)]
pub struct LinkDelivery {
    base_url: String,
}

impl LinkDelivery {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn link_for(&self, id: &str) -> String {
        format!("{}/download/{}", self.base_url, id)
    }
}

#[async_trait::async_trait]
impl Delivery for LinkDelivery {
    async fn send(&self, result: &CompositeResult, recipient: &str) -> Result<(), DeliveryError> {
        tracing::info!(
            recipient = %recipient,
            artifact_id = %result.id,
            link = %self.link_for(&result.id),
            size = result.size(),
            "Composite ready for delivery"
        );
        Ok(())
    }
}
