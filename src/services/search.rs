use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    filter::OfferFilter,
    models::{OffersByCountry, Title},
    services::{catalog::CatalogClient, locales},
};

/// Countries probed when locale discovery yields nothing usable
pub const DEFAULT_COUNTRIES: [&str; 8] = ["US", "GB", "DE", "FR", "ES", "IT", "CA", "AU"];

/// Orchestrates catalog searches and per-title offer filtering.
pub struct SearchService {
    client: Arc<dyn CatalogClient>,
}

impl SearchService {
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        Self { client }
    }

    /// Runs a search and, when a filter is given, reduces every title's
    /// offers to the matching subset.
    ///
    /// Search failures are fatal. Offer fetches are not: each title's fetch
    /// runs in its own task, and a failed fetch leaves that title with no
    /// offers, which under a filter drops it from the results. Result order
    /// follows the catalog's search ranking throughout.
    pub async fn search(
        &self,
        query: &str,
        country: &str,
        max_results: u32,
        filter: Option<&OfferFilter>,
    ) -> AppResult<Vec<Title>> {
        if query.trim().is_empty() {
            return Err(AppError::Query("Search query cannot be empty".to_string()));
        }

        let titles = self
            .client
            .search_titles(query, country, max_results)
            .await?;

        tracing::info!(
            query = %query,
            country = %country,
            results = titles.len(),
            "Search completed"
        );

        let filter = match filter {
            Some(filter) => filter,
            None => return Ok(titles),
        };
        if titles.is_empty() {
            return Ok(titles);
        }

        // Fetch offers for all titles in parallel, slotting each result back
        // by index so ranking survives task completion order.
        let mut tasks = Vec::new();
        for (index, title) in titles.iter().enumerate() {
            let client = Arc::clone(&self.client);
            let node_id = title.node_id.clone();
            let full_path = title.full_path.clone();
            tasks.push(tokio::spawn(async move {
                let offers =
                    offers_for_title(client.as_ref(), &node_id, full_path.as_deref()).await;
                (index, offers)
            }));
        }

        let mut fetched: Vec<OffersByCountry> = vec![OffersByCountry::new(); titles.len()];
        let mut error_count = 0usize;
        for task in tasks {
            match task.await {
                Ok((index, Ok(offers))) => fetched[index] = offers,
                Ok((index, Err(error))) => {
                    error_count += 1;
                    tracing::error!(title_index = index, error = %error, "Offer fetch failed");
                }
                Err(error) => {
                    error_count += 1;
                    tracing::error!(error = %error, "Task join error");
                }
            }
        }

        if error_count > 0 {
            tracing::warn!(
                success_count = titles.len() - error_count,
                error_count,
                "Partial offer fetch failure"
            );
        }

        let mut matched = Vec::new();
        for (mut title, offers) in titles.into_iter().zip(fetched) {
            let kept = filter.apply(&offers);
            if kept.is_empty() {
                continue;
            }
            title.offers = kept;
            matched.push(title);
        }

        tracing::info!(matched = matched.len(), "Offer filtering completed");

        Ok(matched)
    }

    /// Fetches the full, unfiltered offer mapping for one title
    pub async fn fetch_all_offers(&self, title: &Title) -> AppResult<OffersByCountry> {
        offers_for_title(
            self.client.as_ref(),
            &title.node_id,
            title.full_path.as_deref(),
        )
        .await
    }
}

/// Resolves which countries to probe for a title, then fetches its offers.
///
/// Falls back to `DEFAULT_COUNTRIES` when locale discovery comes back empty.
async fn offers_for_title(
    client: &dyn CatalogClient,
    node_id: &str,
    full_path: Option<&str>,
) -> AppResult<OffersByCountry> {
    let mut countries = locales::resolve_countries(client, full_path).await;
    if countries.is_empty() {
        countries = DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect();
    }

    client.fetch_offers(node_id, &countries).await
}
