use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use streamlens::error::{AppError, AppResult};
use streamlens::filter::{FilterSpec, OfferFilter};
use streamlens::models::{MonetizationKind, ObjectKind, Offer, OffersByCountry, Title};
use streamlens::services::catalog::CatalogClient;
use streamlens::services::search::{SearchService, DEFAULT_COUNTRIES};

/// Scripted catalog: fixed search results, per-path locales, per-node offers.
#[derive(Default)]
struct StubCatalog {
    titles: Vec<Title>,
    locales: BTreeMap<String, Vec<String>>,
    offers: BTreeMap<String, OffersByCountry>,
    failing_nodes: BTreeSet<String>,
    offer_calls: AtomicUsize,
    requested_countries: Mutex<Vec<BTreeSet<String>>>,
}

#[async_trait]
impl CatalogClient for StubCatalog {
    async fn search_titles(
        &self,
        _query: &str,
        _country: &str,
        limit: u32,
    ) -> AppResult<Vec<Title>> {
        Ok(self.titles.iter().take(limit as usize).cloned().collect())
    }

    async fn fetch_locales(&self, full_path: &str) -> AppResult<Vec<String>> {
        self.locales
            .get(full_path)
            .cloned()
            .ok_or_else(|| AppError::NotFound(full_path.to_string()))
    }

    async fn fetch_offers(
        &self,
        node_id: &str,
        countries: &BTreeSet<String>,
    ) -> AppResult<OffersByCountry> {
        self.offer_calls.fetch_add(1, Ordering::SeqCst);
        self.requested_countries
            .lock()
            .unwrap()
            .push(countries.clone());

        if self.failing_nodes.contains(node_id) {
            return Err(AppError::Query(format!("offer lookup failed for {}", node_id)));
        }

        let all = self.offers.get(node_id).cloned().unwrap_or_default();
        Ok(all
            .into_iter()
            .filter(|(country, _)| countries.contains(country))
            .collect())
    }
}

fn title(name: &str, node_id: &str, full_path: Option<&str>) -> Title {
    Title {
        name: name.to_string(),
        object_id: 1,
        node_id: node_id.to_string(),
        kind: ObjectKind::Movie,
        release_year: Some(2010),
        imdb_id: None,
        tmdb_id: None,
        runtime: None,
        description: None,
        genres: Vec::new(),
        production_countries: Vec::new(),
        full_path: full_path.map(|p| p.to_string()),
        offers: OffersByCountry::new(),
    }
}

fn offer(country: &str, service: &str, monetization: MonetizationKind) -> Offer {
    Offer {
        country: country.to_string(),
        service_name: service.to_string(),
        service_id: 0,
        monetization,
        presentation: "HD".to_string(),
        price: None,
        currency: None,
        audio_languages: vec!["en".to_string()],
        subtitle_languages: vec!["en".to_string()],
        audio_technologies: Vec::new(),
        video_technologies: Vec::new(),
        url: None,
    }
}

fn offers_map(entries: &[(&str, Vec<Offer>)]) -> OffersByCountry {
    entries
        .iter()
        .map(|(country, offers)| (country.to_string(), offers.clone()))
        .collect()
}

fn flatrate_filter() -> OfferFilter {
    OfferFilter::new(&FilterSpec {
        monetization: Some("flatrate".to_string()),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_filtered_search_keeps_only_titles_with_matching_offers() {
    let mut catalog = StubCatalog::default();
    catalog.titles = vec![
        title("Inception", "tm1", None),
        title("Tenet", "tm2", None),
    ];
    catalog.offers.insert(
        "tm1".to_string(),
        offers_map(&[(
            "US",
            vec![
                offer("US", "Netflix", MonetizationKind::Flatrate),
                offer("US", "Apple TV", MonetizationKind::Buy),
            ],
        )]),
    );
    catalog.offers.insert(
        "tm2".to_string(),
        offers_map(&[("US", vec![offer("US", "Apple TV", MonetizationKind::Buy)])]),
    );

    let service = SearchService::new(Arc::new(catalog));
    let filter = flatrate_filter();
    let results = service
        .search("nolan", "US", 10, Some(&filter))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Inception");

    // The surviving title carries only its matching offers
    let us_offers = &results[0].offers["US"];
    assert_eq!(us_offers.len(), 1);
    assert_eq!(us_offers[0].service_name, "Netflix");
    assert_eq!(us_offers[0].monetization, MonetizationKind::Flatrate);
}

#[tokio::test]
async fn test_unfiltered_search_never_fetches_offers() {
    let mut catalog = StubCatalog::default();
    catalog.titles = vec![title("Inception", "tm1", None)];

    let catalog = Arc::new(catalog);
    let service = SearchService::new(catalog.clone());
    let results = service.search("inception", "US", 10, None).await.unwrap();

    assert_eq!(results.len(), 1);
    assert!(results[0].offers.is_empty());
    assert_eq!(catalog.offer_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_offer_fetch_failure_drops_only_that_title() {
    let mut catalog = StubCatalog::default();
    catalog.titles = vec![
        title("Inception", "tm1", None),
        title("Tenet", "tm2", None),
        title("Dunkirk", "tm3", None),
    ];
    catalog.failing_nodes.insert("tm2".to_string());
    for node in ["tm1", "tm3"] {
        catalog.offers.insert(
            node.to_string(),
            offers_map(&[("US", vec![offer("US", "Netflix", MonetizationKind::Flatrate)])]),
        );
    }

    let service = SearchService::new(Arc::new(catalog));
    let filter = flatrate_filter();
    let results = service
        .search("nolan", "US", 10, Some(&filter))
        .await
        .unwrap();

    let names: Vec<&str> = results.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Inception", "Dunkirk"]);
}

#[tokio::test]
async fn test_result_order_matches_search_ranking() {
    let mut catalog = StubCatalog::default();
    catalog.titles = vec![
        title("Zulu", "tm1", None),
        title("Alpha", "tm2", None),
        title("Mike", "tm3", None),
    ];
    for node in ["tm1", "tm2", "tm3"] {
        catalog.offers.insert(
            node.to_string(),
            offers_map(&[("US", vec![offer("US", "Netflix", MonetizationKind::Flatrate)])]),
        );
    }

    let service = SearchService::new(Arc::new(catalog));
    let filter = flatrate_filter();
    let results = service
        .search("anything", "US", 10, Some(&filter))
        .await
        .unwrap();

    // Ranking is the catalog's, not alphabetical and not completion order
    let names: Vec<&str> = results.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Zulu", "Alpha", "Mike"]);
}

#[tokio::test]
async fn test_titles_without_locales_probe_default_countries() {
    let mut catalog = StubCatalog::default();
    catalog.titles = vec![title("Inception", "tm1", None)];
    catalog.offers.insert(
        "tm1".to_string(),
        offers_map(&[("US", vec![offer("US", "Netflix", MonetizationKind::Flatrate)])]),
    );

    let catalog = Arc::new(catalog);
    let service = SearchService::new(catalog.clone());
    let filter = flatrate_filter();
    service
        .search("inception", "US", 10, Some(&filter))
        .await
        .unwrap();

    let requested = catalog.requested_countries.lock().unwrap();
    let expected: BTreeSet<String> = DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect();
    assert_eq!(requested.as_slice(), &[expected]);
}

#[tokio::test]
async fn test_locale_discovery_scopes_offer_countries() {
    let mut catalog = StubCatalog::default();
    catalog.titles = vec![title("Dark", "ts1", Some("/de/serie/dark"))];
    catalog.locales.insert(
        "/de/serie/dark".to_string(),
        vec!["de_DE".to_string(), "en_US".to_string()],
    );
    catalog.offers.insert(
        "ts1".to_string(),
        offers_map(&[
            ("DE", vec![offer("DE", "Netflix", MonetizationKind::Flatrate)]),
            ("US", vec![offer("US", "Netflix", MonetizationKind::Flatrate)]),
            ("BR", vec![offer("BR", "Netflix", MonetizationKind::Flatrate)]),
        ]),
    );

    let catalog = Arc::new(catalog);
    let service = SearchService::new(catalog.clone());
    let filter = flatrate_filter();
    let results = service
        .search("dark", "US", 10, Some(&filter))
        .await
        .unwrap();

    // BR never appears because the title's page is only published for DE and
    // US locales.
    let countries: Vec<&str> = results[0].offers.keys().map(String::as_str).collect();
    assert_eq!(countries, vec!["DE", "US"]);

    let requested = catalog.requested_countries.lock().unwrap();
    let expected: BTreeSet<String> = ["DE", "US"].iter().map(|c| c.to_string()).collect();
    assert_eq!(requested.as_slice(), &[expected]);
}

#[tokio::test]
async fn test_fetch_all_offers_returns_unfiltered_mapping() {
    let mut catalog = StubCatalog::default();
    let subject = title("Inception", "tm1", None);
    catalog.offers.insert(
        "tm1".to_string(),
        offers_map(&[(
            "US",
            vec![
                offer("US", "Netflix", MonetizationKind::Flatrate),
                offer("US", "Apple TV", MonetizationKind::Buy),
            ],
        )]),
    );

    let service = SearchService::new(Arc::new(catalog));
    let offers = service.fetch_all_offers(&subject).await.unwrap();

    assert_eq!(offers["US"].len(), 2);
}

#[tokio::test]
async fn test_max_results_caps_search() {
    let mut catalog = StubCatalog::default();
    catalog.titles = (0..20)
        .map(|i| title(&format!("Title {}", i), &format!("tm{}", i), None))
        .collect();

    let service = SearchService::new(Arc::new(catalog));
    let results = service.search("title", "US", 5, None).await.unwrap();

    assert_eq!(results.len(), 5);
}
