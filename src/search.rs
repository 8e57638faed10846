//! # Restaurant Search Module
//!
//! Client for the Yelp Fusion business search, plus the rating filter and the
//! text block each recommendation is rendered as.
//!
//! The dialog only depends on the [`RestaurantSearch`] trait, so handlers can
//! be exercised without network access.

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::localization::t_args;

/// Businesses rated below this are never recommended
pub const RATING_THRESHOLD: f64 = 3.5;

const SEARCH_PATH: &str = "v3/businesses/search";

/// Free-text search parameters collected by one dialog
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub term: String,
    pub location: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct BusinessLocation {
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
}

/// One business record from the search response
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Business {
    pub name: String,
    #[serde(default)]
    pub location: BusinessLocation,
    pub rating: f64,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub display_phone: Option<String>,
}

impl Business {
    pub fn is_recommendable(&self) -> bool {
        self.rating >= RATING_THRESHOLD
    }

    /// Render the multi-line recommendation block sent back to the user
    pub fn format_recommendation(&self) -> String {
        let rating = self.rating.to_string();
        t_args(
            "food-recommendation",
            &[
                ("name", &self.name),
                ("address1", self.location.address1.as_deref().unwrap_or("")),
                ("address2", self.location.address2.as_deref().unwrap_or("")),
                ("rating", &rating),
                ("price", self.price.as_deref().unwrap_or("")),
                ("phone", self.display_phone.as_deref().unwrap_or("")),
            ],
        )
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    businesses: Vec<Business>,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Keep only the businesses worth recommending, in response order
pub fn recommendable(businesses: &[Business]) -> impl Iterator<Item = &Business> {
    businesses.iter().filter(|business| business.is_recommendable())
}

#[async_trait]
pub trait RestaurantSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Business>, SearchError>;
}

/// Yelp Fusion search client
#[derive(Clone)]
pub struct YelpClient {
    client: reqwest::Client,
    api_key: String,
    base_url: Url,
}

impl YelpClient {
    pub fn new(api_key: impl Into<String>, base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url,
        }
    }

    fn search_url(&self) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), SEARCH_PATH)
    }
}

#[async_trait]
impl RestaurantSearch for YelpClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Business>, SearchError> {
        debug!(term = %query.term, location = %query.location, "Searching businesses");

        let response = self
            .client
            .get(self.search_url())
            .bearer_auth(&self.api_key)
            .query(&[("term", &query.term), ("location", &query.location)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let data: SearchResponse = response.json().await?;
        debug!(count = data.businesses.len(), "Search returned businesses");
        Ok(data.businesses)
    }
}
