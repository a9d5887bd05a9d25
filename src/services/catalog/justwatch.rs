/// JustWatch catalog client
///
/// Talks to JustWatch's public GraphQL endpoint for title search and offer
/// lookups, and to its locale-discovery endpoint for the list of countries a
/// title's page is published in.
///
/// API flow:
/// 1. Title search: POST /graphql (GetSearchTitles) → title nodes with IDs
/// 2. Locales: GET /content/urls?path={fullPath} → href_lang_tags
/// 3. Offers: POST /graphql (GetTitleOffers) → per-country offer lists,
///    one aliased field per requested country
use std::collections::BTreeSet;

use serde_json::{json, Value};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Offer, OffersByCountry, RawLocalesResponse, RawOfferRecord, RawTitleRecord, Title},
    services::catalog::CatalogClient,
};

const GRAPHQL_PATH: &str = "/graphql";
const LOCALES_PATH: &str = "/content/urls";

const SEARCH_QUERY: &str = r#"
query GetSearchTitles($country: Country!, $language: Language!, $first: Int!, $filter: TitleFilter) {
  popularTitles(country: $country, filter: $filter, first: $first, sortBy: POPULAR) {
    edges {
      node {
        id
        objectId
        objectType
        content(country: $country, language: $language) {
          title
          fullPath
          originalReleaseYear
          productionCountries
          runtime
          shortDescription
          genres {
            shortName
          }
          externalIds {
            imdbId
            tmdbId
          }
        }
      }
    }
  }
}
"#;

const OFFER_FRAGMENT: &str = r#"
fragment TitleOffer on Offer {
  monetizationType
  presentationType
  retailPrice(language: $language)
  currency
  package {
    packageId
    clearName
  }
  standardWebURL
  audioLanguages
  subtitleLanguages
  audioTechnology
  videoTechnology
}
"#;

/// Builds the offers query with one aliased `offers` field per country.
///
/// The schema has no way to ask for several countries in one field, so each
/// country becomes its own alias (the lowercase country code) over the same
/// fragment.
fn build_offers_query(countries: &BTreeSet<String>) -> String {
    let mut fields = String::new();
    for country in countries {
        fields.push_str(&format!(
            "      {}: offers(country: {}, platform: $platform) {{ ...TitleOffer }}\n",
            country.to_ascii_lowercase(),
            country.to_ascii_uppercase(),
        ));
    }

    let mut query = String::from(
        "query GetTitleOffers($nodeId: ID!, $language: Language!, $platform: Platform!) {\n",
    );
    query.push_str("  node(id: $nodeId) {\n");
    query.push_str("    ... on MovieOrShowOrSeasonOrEpisode {\n");
    query.push_str(&fields);
    query.push_str("    }\n  }\n}\n");
    query.push_str(OFFER_FRAGMENT);
    query
}

#[derive(Clone)]
pub struct JustWatchClient {
    http_client: reqwest::Client,
    base_url: String,
    proxy_url: Option<String>,
    language: String,
}

impl JustWatchClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: config.catalog_api_url.clone(),
            proxy_url: config.proxy_url.clone(),
            language: config.content_language.clone(),
        }
    }

    /// Resolves an endpoint path to a full URL, routing through the proxy
    /// prefix when one is configured.
    fn endpoint_url(&self, path: &str) -> String {
        match &self.proxy_url {
            Some(proxy) => format!("{}{}{}", proxy, self.base_url, path),
            None => format!("{}{}", self.base_url, path),
        }
    }

    /// Executes one GraphQL operation and returns the response body.
    ///
    /// Both transport-level failures and in-body `errors` payloads are
    /// surfaced as errors; a returned body always has a usable `data` key.
    async fn graphql(
        &self,
        query: String,
        variables: Value,
        operation_name: &str,
    ) -> AppResult<Value> {
        let response = self
            .http_client
            .post(self.endpoint_url(GRAPHQL_PATH))
            .json(&json!({
                "query": query,
                "variables": variables,
                "operationName": operation_name,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Query(format!(
                "{} returned status {}: {}",
                operation_name, status, body
            )));
        }

        let body: Value = response.json().await?;

        if let Some(errors) = body.get("errors") {
            return Err(AppError::Query(format!(
                "{} rejected: {}",
                operation_name, errors
            )));
        }

        Ok(body)
    }
}

#[async_trait::async_trait]
impl CatalogClient for JustWatchClient {
    async fn search_titles(&self, query: &str, country: &str, limit: u32) -> AppResult<Vec<Title>> {
        let variables = json!({
            "country": country.to_ascii_uppercase(),
            "language": self.language,
            "first": limit,
            "filter": { "searchQuery": query },
        });

        let body = self
            .graphql(SEARCH_QUERY.to_string(), variables, "GetSearchTitles")
            .await?;

        let edges = body["data"]["popularTitles"]["edges"]
            .as_array()
            .ok_or_else(|| {
                AppError::Query("GetSearchTitles response missing popularTitles edges".to_string())
            })?;

        // Nodes without the required fields (most importantly the node ID
        // that offer lookups key on) are skipped rather than failing the
        // whole search.
        let titles: Vec<Title> = edges
            .iter()
            .filter_map(|edge| {
                serde_json::from_value::<RawTitleRecord>(edge["node"].clone())
                    .map(Title::from)
                    .ok()
            })
            .collect();

        tracing::info!(
            query = %query,
            country = %country,
            results = titles.len(),
            "Title search completed"
        );

        Ok(titles)
    }

    async fn fetch_locales(&self, full_path: &str) -> AppResult<Vec<String>> {
        let response = self
            .http_client
            .get(self.endpoint_url(LOCALES_PATH))
            .query(&[("path", full_path)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Query(format!(
                "Locale discovery returned status {}: {}",
                status, body
            )));
        }

        let parsed: RawLocalesResponse = response.json().await?;
        let locales: Vec<String> = parsed
            .href_lang_tags
            .into_iter()
            .filter_map(|tag| tag.locale)
            .collect();

        tracing::debug!(path = %full_path, locales = locales.len(), "Locales fetched");

        Ok(locales)
    }

    async fn fetch_offers(
        &self,
        node_id: &str,
        countries: &BTreeSet<String>,
    ) -> AppResult<OffersByCountry> {
        let query = build_offers_query(countries);
        let variables = json!({
            "nodeId": node_id,
            "language": self.language,
            "platform": "WEB",
        });

        let body = self.graphql(query, variables, "GetTitleOffers").await?;

        let node = &body["data"]["node"];
        if node.is_null() {
            return Err(AppError::NotFound(format!(
                "No catalog node with id {}",
                node_id
            )));
        }

        let mut offers = OffersByCountry::new();
        for country in countries {
            let alias = country.to_ascii_lowercase();
            let records = match node[alias.as_str()].as_array() {
                Some(records) => records,
                None => continue,
            };

            let country_offers: Vec<Offer> = records
                .iter()
                .filter_map(|record| {
                    serde_json::from_value::<RawOfferRecord>(record.clone()).ok()
                })
                .map(|record| Offer::from_raw(country, record))
                .collect();

            if !country_offers.is_empty() {
                offers.insert(country.to_ascii_uppercase(), country_offers);
            }
        }

        tracing::debug!(
            node_id = %node_id,
            requested = countries.len(),
            with_offers = offers.len(),
            "Offers fetched"
        );

        Ok(offers)
    }
}
