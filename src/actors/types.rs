use crate::models::FilterSelection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Listings requested from the actor when nothing else is configured
pub const DEFAULT_MAX_ITEMS: u32 = 50;

/// Input sent verbatim to the scraper actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunInput {
    pub start_urls: Vec<StartUrl>,
    pub max_items: u32,
    /// Include listings from agencies and brokers
    #[serde(rename = "is_professional")]
    pub is_professional: bool,
    pub min_price: u64,
    pub min_rooms: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartUrl {
    pub url: String,
}

impl RunInput {
    pub fn from_filters(filters: &FilterSelection, max_items: u32) -> Self {
        Self {
            start_urls: vec![StartUrl {
                url: filters.search_url(),
            }],
            max_items,
            is_professional: !filters.owner_only,
            min_price: filters.min_price,
            min_rooms: filters.min_rooms,
        }
    }
}

/// Lifecycle state of an actor run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum RunStatus {
    Ready,
    Running,
    Succeeded,
    Failed,
    TimingOut,
    TimedOut,
    Aborting,
    Aborted,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Whether the run will not change state anymore
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Succeeded | RunStatus::Failed | RunStatus::TimedOut | RunStatus::Aborted
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Ready => "READY",
            RunStatus::Running => "RUNNING",
            RunStatus::Succeeded => "SUCCEEDED",
            RunStatus::Failed => "FAILED",
            RunStatus::TimingOut => "TIMING-OUT",
            RunStatus::TimedOut => "TIMED-OUT",
            RunStatus::Aborting => "ABORTING",
            RunStatus::Aborted => "ABORTED",
            RunStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job descriptor returned by the platform
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRun {
    pub id: String,
    pub status: RunStatus,
    pub default_dataset_id: String,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Every platform response wraps its payload in `data`
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}
