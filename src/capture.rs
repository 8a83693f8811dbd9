use crate::actors::types::{RunInput, RunStatus};
use crate::actors::ActorPlatform;
use crate::error::CaptureError;
use crate::models::{Capture, FilterSelection, Lead};
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

/// Runs one capture against an actor platform
pub struct LeadCapture<P> {
    platform: P,
    actor_id: String,
    max_items: u32,
}

impl<P: ActorPlatform> LeadCapture<P> {
    pub fn new(platform: P, actor_id: impl Into<String>, max_items: u32) -> Self {
        Self {
            platform,
            actor_id: actor_id.into(),
            max_items,
        }
    }

    /// Start the actor for `filters`, wait for it and collect its leads.
    ///
    /// The dataset is only read when the run succeeded. An empty dataset is
    /// reported as [`CaptureError::JobEmpty`].
    pub async fn capture(&self, filters: &FilterSelection) -> Result<Capture, CaptureError> {
        let input = RunInput::from_filters(filters, self.max_items);
        info!(
            "🔍 Buscando leads na OLX via {}: {}",
            self.platform.platform_name(),
            filters.search_url()
        );

        let run = self.platform.call_actor(&self.actor_id, &input).await?;
        if run.status != RunStatus::Succeeded {
            warn!("Actor run {} ended with {}", run.id, run.status);
            return Err(CaptureError::JobFailed { status: run.status });
        }

        let items = self.platform.dataset_items(&run.default_dataset_id).await?;
        if items.is_empty() {
            warn!("Dataset {} is empty", run.default_dataset_id);
            return Err(CaptureError::JobEmpty);
        }

        let leads = into_leads(items)?;
        info!("Collected {} leads from dataset {}", leads.len(), run.default_dataset_id);

        Ok(Capture {
            filters: filters.clone(),
            run_id: run.id,
            dataset_id: run.default_dataset_id,
            leads,
            captured_at: Utc::now(),
        })
    }
}

fn into_leads(items: Vec<Value>) -> Result<Vec<Lead>, CaptureError> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(fields) => Ok(Lead { fields }),
            other => Err(CaptureError::MalformedRecord(format!(
                "item {} não é um objeto: {}",
                i, other
            ))),
        })
        .collect()
}
