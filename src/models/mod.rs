use serde::Deserialize;

mod offer;
mod title;

pub use offer::{MonetizationKind, Offer, OffersByCountry};
pub use title::{ObjectKind, Title};

// ============================================================================
// Raw catalog record types
// ============================================================================
//
// The catalog's GraphQL responses are parsed into these records at the client
// boundary. Every optional field is an explicit `Option` (or defaulted list)
// so downstream code never has to guess whether "absent" collapsed into an
// empty string or zero.

/// One search-result node from the catalog's search query
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTitleRecord {
    /// Opaque node identifier, required to fetch offers
    pub id: String,
    pub object_id: u64,
    pub object_type: String,
    #[serde(default)]
    pub content: Option<RawTitleContent>,
}

/// Localized content block of a search-result node
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawTitleContent {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub full_path: Option<String>,
    #[serde(default)]
    pub original_release_year: Option<i32>,
    #[serde(default)]
    pub production_countries: Vec<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub genres: Vec<RawGenre>,
    #[serde(default)]
    pub external_ids: Option<RawExternalIds>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGenre {
    #[serde(default)]
    pub short_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExternalIds {
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub tmdb_id: Option<String>,
}

impl From<RawTitleRecord> for Title {
    fn from(record: RawTitleRecord) -> Self {
        let content = record.content.unwrap_or_default();
        let external_ids = content.external_ids.unwrap_or(RawExternalIds {
            imdb_id: None,
            tmdb_id: None,
        });

        Title {
            name: content.title.unwrap_or_else(|| "Unknown".to_string()),
            object_id: record.object_id,
            node_id: record.id,
            kind: ObjectKind::parse(&record.object_type),
            release_year: content.original_release_year,
            imdb_id: external_ids.imdb_id,
            tmdb_id: external_ids.tmdb_id,
            runtime: content.runtime,
            description: content.short_description,
            genres: content
                .genres
                .into_iter()
                .filter_map(|g| g.short_name)
                .collect(),
            production_countries: content.production_countries,
            full_path: content.full_path,
            offers: OffersByCountry::new(),
        }
    }
}

/// One offer record from the catalog's per-country offers query
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOfferRecord {
    #[serde(default)]
    pub monetization_type: Option<String>,
    #[serde(default)]
    pub presentation_type: Option<String>,
    #[serde(default)]
    pub retail_price: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub package: Option<RawPackage>,
    #[serde(default, rename = "standardWebURL")]
    pub standard_web_url: Option<String>,
    #[serde(default)]
    pub audio_languages: Vec<String>,
    #[serde(default)]
    pub subtitle_languages: Vec<String>,
    #[serde(default)]
    pub audio_technology: Vec<String>,
    #[serde(default)]
    pub video_technology: Vec<String>,
}

/// Streaming service ("package") block of an offer record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPackage {
    #[serde(default)]
    pub package_id: u64,
    #[serde(default)]
    pub clear_name: Option<String>,
}

impl Offer {
    /// Builds an offer from one raw record, keyed under `country`.
    ///
    /// The presentation label falls back to "SD" when the catalog omits it;
    /// observed catalog convention, not a semantic default.
    pub fn from_raw(country: &str, record: RawOfferRecord) -> Self {
        let (service_name, service_id) = match record.package {
            Some(package) => (
                package
                    .clear_name
                    .unwrap_or_else(|| "Unknown".to_string()),
                package.package_id,
            ),
            None => ("Unknown".to_string(), 0),
        };

        Offer {
            country: country.to_ascii_uppercase(),
            service_name,
            service_id,
            monetization: record
                .monetization_type
                .as_deref()
                .map(MonetizationKind::parse)
                .unwrap_or(MonetizationKind::Unknown),
            presentation: record
                .presentation_type
                .unwrap_or_else(|| "SD".to_string()),
            price: record.retail_price,
            currency: record.currency,
            audio_languages: record.audio_languages,
            subtitle_languages: record.subtitle_languages,
            audio_technologies: record.audio_technology,
            video_technologies: record.video_technology,
            url: record.standard_web_url,
        }
    }
}

/// Response of the catalog's locale-discovery endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RawLocalesResponse {
    #[serde(default)]
    pub href_lang_tags: Vec<RawLocaleTag>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLocaleTag {
    #[serde(default)]
    pub locale: Option<String>,
}
