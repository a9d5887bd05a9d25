use std::collections::BTreeSet;

use crate::services::catalog::CatalogClient;

/// Derives the set of countries a title is published in from its locale tags.
///
/// Locale discovery is best effort: a missing path, a failed request, or tags
/// without a country half all reduce to an empty set, which callers interpret
/// as "use the default country list" rather than aborting the search.
pub async fn resolve_countries(
    client: &dyn CatalogClient,
    full_path: Option<&str>,
) -> BTreeSet<String> {
    let path = match full_path {
        Some(path) if !path.is_empty() => path,
        _ => return BTreeSet::new(),
    };

    let tags = match client.fetch_locales(path).await {
        Ok(tags) => tags,
        Err(error) => {
            tracing::warn!(path = %path, error = %error, "Locale discovery failed");
            return BTreeSet::new();
        }
    };

    tags.iter().filter_map(|tag| country_of(tag)).collect()
}

/// Extracts the country half of a `language_COUNTRY` locale tag.
///
/// Tags without an underscore (bare language codes, "x-default" and friends)
/// carry no country and yield `None`.
fn country_of(tag: &str) -> Option<String> {
    let (_, country) = tag.rsplit_once('_')?;
    if country.is_empty() {
        return None;
    }
    Some(country.to_ascii_uppercase())
}
