//! Wire types for the DataForSEO live SERP endpoints.
//!
//! Both endpoints share the envelope shape: a top-level status pair and a
//! `tasks` array, each task carrying its own status pair and a `result`
//! array whose first entry holds the SERP `items`.

use serde::Deserialize;

use ranktrack_core::models::{MapsResult, OrganicResult};

/// DataForSEO's success status code, used at both envelope and task level.
pub const STATUS_OK: u64 = 20_000;

#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub status_code: u64,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
pub struct Task {
    pub status_code: u64,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub result: Option<Vec<TaskResult>>,
}

#[derive(Debug, Deserialize)]
pub struct TaskResult {
    #[serde(default)]
    pub items: Option<Vec<SerpItem>>,
}

/// One SERP item. The live endpoints mix item types in a single list;
/// callers filter by `item_type` and ignore fields the type doesn't carry.
#[derive(Debug, Deserialize)]
pub struct SerpItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub rank_group: Option<u32>,
    pub rank_absolute: Option<u32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub domain: Option<String>,
    pub breadcrumb: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub rating: Option<Rating>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Rating {
    pub rating_value: Option<f64>,
    pub votes_count: Option<u64>,
}

impl SerpItem {
    /// Rank position: `rank_group` with `rank_absolute` as fallback.
    #[must_use]
    pub fn position(&self) -> Option<u32> {
        self.rank_group.or(self.rank_absolute)
    }

    #[must_use]
    pub fn into_organic(self) -> Option<OrganicResult> {
        let position = self.position()?;
        Some(OrganicResult {
            position,
            title: self.title,
            description: self.description,
            url: self.url,
            domain: self.domain,
            breadcrumb: self.breadcrumb,
        })
    }

    #[must_use]
    pub fn into_maps(self) -> Option<MapsResult> {
        let position = self.position()?;
        let (rating, reviews_count) = match self.rating {
            Some(r) => (r.rating_value, r.votes_count),
            None => (None, None),
        };
        Some(MapsResult {
            position,
            title: self.title,
            address: self.address,
            phone: self.phone,
            website: self.url,
            rating,
            reviews_count,
            category: self.category,
        })
    }
}
