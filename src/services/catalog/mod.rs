use std::collections::BTreeSet;

use crate::{
    error::AppResult,
    models::{OffersByCountry, Title},
};

mod justwatch;

pub use justwatch::JustWatchClient;

/// Catalog access boundary.
///
/// Everything the search pipeline needs from the catalog goes through this
/// trait, so orchestration logic can be exercised against a scripted
/// implementation without any network.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Searches the catalog for titles matching `query`.
    ///
    /// `country` scopes the catalog's popularity ranking and localized
    /// content; it does not constrain which countries offers are later
    /// fetched for. Returned titles carry no offers yet.
    async fn search_titles(&self, query: &str, country: &str, limit: u32) -> AppResult<Vec<Title>>;

    /// Lists the locale tags under which a title's catalog page is published
    async fn fetch_locales(&self, full_path: &str) -> AppResult<Vec<String>>;

    /// Fetches a title's offers for every country in `countries`, keyed by
    /// uppercase country code. Countries without offers are absent from the
    /// result.
    async fn fetch_offers(
        &self,
        node_id: &str,
        countries: &BTreeSet<String>,
    ) -> AppResult<OffersByCountry>;
}
