use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Per-title mapping from country code to its offers.
///
/// A `BTreeMap` keeps country iteration deterministic; the filter engine only
/// removes entries, so iteration order survives filtering unchanged.
pub type OffersByCountry = BTreeMap<String, Vec<Offer>>;

/// How an offer is obtained
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MonetizationKind {
    /// Included in a subscription
    Flatrate,
    Buy,
    Rent,
    Free,
    Ads,
    /// Vocabulary the catalog added after this client was written
    Unknown,
}

impl MonetizationKind {
    /// Parses the catalog's `monetizationType` token, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "flatrate" => MonetizationKind::Flatrate,
            "buy" => MonetizationKind::Buy,
            "rent" => MonetizationKind::Rent,
            "free" => MonetizationKind::Free,
            "ads" => MonetizationKind::Ads,
            _ => MonetizationKind::Unknown,
        }
    }

    /// The catalog's own lowercase token, which is also what monetization
    /// filter patterns match against.
    pub fn as_str(&self) -> &'static str {
        match self {
            MonetizationKind::Flatrate => "flatrate",
            MonetizationKind::Buy => "buy",
            MonetizationKind::Rent => "rent",
            MonetizationKind::Free => "free",
            MonetizationKind::Ads => "ads",
            MonetizationKind::Unknown => "unknown",
        }
    }
}

impl Display for MonetizationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One way to obtain a title in one country.
///
/// Immutable after construction. `country` always equals the key under which
/// the offer is stored in a title's offer mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Offer {
    /// ISO-3166 alpha-2 country code, uppercase
    pub country: String,
    pub service_name: String,
    pub service_id: u64,
    pub monetization: MonetizationKind,
    /// Free-form quality label such as "SD", "HD", "4K"
    pub presentation: String,
    /// Present only for buy/rent offers
    pub price: Option<String>,
    pub currency: Option<String>,
    pub audio_languages: Vec<String>,
    pub subtitle_languages: Vec<String>,
    pub audio_technologies: Vec<String>,
    pub video_technologies: Vec<String>,
    pub url: Option<String>,
}

impl Display for Offer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} ({})",
            self.country, self.service_name, self.monetization
        )?;
        if let Some(price) = &self.price {
            write!(f, " - {} {}", price, self.currency.as_deref().unwrap_or(""))?;
        }
        write!(f, " [{}]", self.presentation)?;
        if !self.audio_languages.is_empty() {
            write!(f, "\n  Audio: {}", self.audio_languages.join(", "))?;
        }
        if !self.subtitle_languages.is_empty() {
            write!(f, "\n  Subtitles: {}", self.subtitle_languages.join(", "))?;
        }
        if !self.audio_technologies.is_empty() {
            write!(f, "\n  Audio Tech: {}", self.audio_technologies.join(", "))?;
        }
        if !self.video_technologies.is_empty() {
            write!(f, "\n  Video Tech: {}", self.video_technologies.join(", "))?;
        }
        Ok(())
    }
}
