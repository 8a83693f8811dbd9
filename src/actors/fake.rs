use crate::actors::traits::ActorPlatform;
use crate::actors::types::{ActorRun, RunInput, RunStatus};
use crate::error::CaptureError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;

/// In-memory platform that finishes every run with a fixed status
pub struct FakePlatform {
    pub status: RunStatus,
    pub items: Vec<Value>,
    pub calls: Mutex<Vec<(String, RunInput)>>,
    pub fetched: Mutex<Vec<String>>,
}

impl FakePlatform {
    pub fn new(status: RunStatus, items: Vec<Value>) -> Self {
        Self {
            status,
            items,
            calls: Mutex::new(Vec::new()),
            fetched: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ActorPlatform for FakePlatform {
    async fn call_actor(&self, actor_id: &str, input: &RunInput) -> Result<ActorRun, CaptureError> {
        self.calls
            .lock()
            .unwrap()
            .push((actor_id.to_string(), input.clone()));
        Ok(ActorRun {
            id: "run-1".to_string(),
            status: self.status,
            default_dataset_id: "dataset-1".to_string(),
            started_at: None,
            finished_at: None,
        })
    }

    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<Value>, CaptureError> {
        self.fetched.lock().unwrap().push(dataset_id.to_string());
        Ok(self.items.clone())
    }

    fn platform_name(&self) -> &'static str {
        "Fake"
    }
}

/// A complete listing as the OLX actor returns it
pub fn listing(id: u32) -> Value {
    json!({
        "id": id,
        "title": format!("Casa {id}"),
        "price": 400000 + id,
        "rooms": 3,
        "area": 120,
        "contact": "(71) 98888-7777",
        "url": format!("https://ba.olx.com.br/{id}")
    })
}
