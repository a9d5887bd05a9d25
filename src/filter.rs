use regex::{Regex, RegexBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{Offer, OffersByCountry},
};

/// Six optional regex patterns, one per offer facet.
///
/// An absent pattern means "no constraint on that facet". All matching is
/// case-insensitive substring search; callers who want exact matching must
/// anchor their own patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub country: Option<String>,
    pub service: Option<String>,
    pub audio: Option<String>,
    pub subtitle: Option<String>,
    pub monetization: Option<String>,
    pub presentation: Option<String>,
}

impl FilterSpec {
    /// True when no facet is constrained
    pub fn is_empty(&self) -> bool {
        self.country.is_none()
            && self.service.is_none()
            && self.audio.is_none()
            && self.subtitle.is_none()
            && self.monetization.is_none()
            && self.presentation.is_none()
    }
}

/// Compiled facet filter applied to a title's per-country offer mapping.
///
/// Construction compiles every supplied pattern up front, so an invalid
/// pattern surfaces as `AppError::FilterSpec` before any filtering happens.
#[derive(Debug, Clone)]
pub struct OfferFilter {
    country: Option<Regex>,
    service: Option<Regex>,
    audio: Option<Regex>,
    subtitle: Option<Regex>,
    monetization: Option<Regex>,
    presentation: Option<Regex>,
}

fn compile(facet: &'static str, pattern: Option<&str>) -> AppResult<Option<Regex>> {
    pattern
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .map_err(|source| AppError::FilterSpec { facet, source })
        })
        .transpose()
}

impl OfferFilter {
    pub fn new(spec: &FilterSpec) -> AppResult<Self> {
        Ok(Self {
            country: compile("country", spec.country.as_deref())?,
            service: compile("service", spec.service.as_deref())?,
            audio: compile("audio", spec.audio.as_deref())?,
            subtitle: compile("subtitle", spec.subtitle.as_deref())?,
            monetization: compile("monetization", spec.monetization.as_deref())?,
            presentation: compile("presentation", spec.presentation.as_deref())?,
        })
    }

    /// Reduces `offers` to the countries and offers that pass every
    /// constrained facet. Countries whose offer list empties out are omitted
    /// entirely. Selection only: ordering is preserved as received.
    pub fn apply(&self, offers: &OffersByCountry) -> OffersByCountry {
        let mut filtered = OffersByCountry::new();
        for (country, country_offers) in offers {
            if let Some(pattern) = &self.country {
                if !pattern.is_match(country) {
                    continue;
                }
            }
            let kept: Vec<Offer> = country_offers
                .iter()
                .filter(|offer| self.matches_offer(offer))
                .cloned()
                .collect();
            if !kept.is_empty() {
                filtered.insert(country.clone(), kept);
            }
        }
        filtered
    }

    fn matches_offer(&self, offer: &Offer) -> bool {
        if let Some(pattern) = &self.service {
            if !pattern.is_match(&offer.service_name) {
                return false;
            }
        }
        if let Some(pattern) = &self.monetization {
            if !pattern.is_match(offer.monetization.as_str()) {
                return false;
            }
        }
        if let Some(pattern) = &self.presentation {
            if !pattern.is_match(&offer.presentation) {
                return false;
            }
        }
        // List facets pass when at least one element matches; an empty list
        // under a constrained facet always fails.
        if let Some(pattern) = &self.audio {
            if !offer.audio_languages.iter().any(|lang| pattern.is_match(lang)) {
                return false;
            }
        }
        if let Some(pattern) = &self.subtitle {
            if !offer
                .subtitle_languages
                .iter()
                .any(|lang| pattern.is_match(lang))
            {
                return false;
            }
        }
        true
    }
}
