use crate::actors::traits::ActorPlatform;
use crate::actors::types::{ActorRun, Envelope, RunInput};
use crate::error::CaptureError;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.apify.com";

/// Longest server-side wait the platform allows per poll
const WAIT_FOR_FINISH_SECS: u64 = 60;

const DATASET_PAGE_LIMIT: usize = 1000;

/// Apify REST client
pub struct ApifyClient {
    client: Client,
    base_url: String,
    token: String,
    page_limit: usize,
}

impl ApifyClient {
    /// Create a client against an API host, usually [`DEFAULT_BASE_URL`]
    pub fn with_base_url(
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, CaptureError> {
        let client = Client::builder()
            .user_agent(concat!("lead-capture/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            page_limit: DATASET_PAGE_LIMIT,
        })
    }

    /// Number of dataset items requested per page
    #[cfg(test)]
    pub fn page_limit(mut self, limit: usize) -> Self {
        self.page_limit = limit.max(1);
        self
    }

    /// Actor ids are `user/name` but the URL form is `user~name`
    fn actor_path(actor_id: &str) -> String {
        actor_id.replace('/', "~")
    }

    async fn start_run(&self, actor_id: &str, input: &RunInput) -> Result<ActorRun, CaptureError> {
        let url = format!("{}/v2/acts/{}/runs", self.base_url, Self::actor_path(actor_id));
        debug!("Starting actor run: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let envelope: Envelope<ActorRun> = Self::read_json(response).await?;
        Ok(envelope.data)
    }

    async fn wait_for_finish(&self, mut run: ActorRun) -> Result<ActorRun, CaptureError> {
        while !run.status.is_terminal() {
            debug!("Run {} is {}, waiting up to {}s", run.id, run.status, WAIT_FOR_FINISH_SECS);

            let url = format!("{}/v2/actor-runs/{}", self.base_url, run.id);
            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .query(&[("waitForFinish", WAIT_FOR_FINISH_SECS)])
                .send()
                .await?;

            let envelope: Envelope<ActorRun> = Self::read_json(response).await?;
            run = envelope.data;
        }

        Ok(run)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, CaptureError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Apify returned status: {}", status);
            return Err(CaptureError::Network(format!(
                "Apify API error: {} - {}",
                status, body
            )));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            warn!("Apify returned an unexpected body: {}", e);
            CaptureError::MalformedRecord(format!("resposta inesperada da Apify: {}", e))
        })
    }
}

#[async_trait]
impl ActorPlatform for ApifyClient {
    async fn call_actor(&self, actor_id: &str, input: &RunInput) -> Result<ActorRun, CaptureError> {
        let run = self.start_run(actor_id, input).await?;
        info!("Actor run {} started ({})", run.id, run.status);

        let run = self.wait_for_finish(run).await?;
        if let (Some(started), Some(finished)) = (run.started_at, run.finished_at) {
            info!(
                "Actor run {} finished with {} after {}s",
                run.id,
                run.status,
                (finished - started).num_seconds()
            );
        } else {
            info!("Actor run {} finished with {}", run.id, run.status);
        }

        Ok(run)
    }

    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<Value>, CaptureError> {
        let url = format!("{}/v2/datasets/{}/items", self.base_url, dataset_id);
        let limit = self.page_limit.to_string();
        let mut items = Vec::new();
        let mut offset = 0usize;

        loop {
            let offset_param = offset.to_string();
            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .query(&[
                    ("clean", "true"),
                    ("format", "json"),
                    ("offset", offset_param.as_str()),
                    ("limit", limit.as_str()),
                ])
                .send()
                .await?;

            let page: Vec<Value> = Self::read_json(response).await?;
            let fetched = page.len();
            debug!("Dataset {}: fetched {} items at offset {}", dataset_id, fetched, offset);

            items.extend(page);
            if fetched < self.page_limit {
                break;
            }
            offset += fetched;
        }

        Ok(items)
    }

    fn platform_name(&self) -> &'static str {
        "Apify"
    }
}
