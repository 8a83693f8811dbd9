use crate::actors::types::{ActorRun, RunInput};
use crate::error::CaptureError;
use async_trait::async_trait;
use serde_json::Value;

/// Hosted platform that runs scraper actors and stores their output
#[async_trait]
pub trait ActorPlatform: Send + Sync {
    /// Start the actor and block until its run reaches a terminal status
    async fn call_actor(&self, actor_id: &str, input: &RunInput) -> Result<ActorRun, CaptureError>;

    /// All items stored in a dataset, in insertion order
    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<Value>, CaptureError>;

    /// Get the name of the platform
    fn platform_name(&self) -> &'static str;
}
