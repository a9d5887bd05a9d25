use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::models::OffersByCountry;

/// Kind of catalog object
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Movie,
    Show,
    Season,
    Episode,
    /// Vocabulary the catalog added after this client was written
    Unknown,
}

impl ObjectKind {
    /// Parses the catalog's `objectType` token, case-insensitively.
    ///
    /// Unrecognized tokens map to `Unknown` rather than failing, since the
    /// catalog's vocabulary may grow.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "movie" => ObjectKind::Movie,
            "show" => ObjectKind::Show,
            "show_season" | "season" => ObjectKind::Season,
            "show_episode" | "episode" => ObjectKind::Episode,
            _ => ObjectKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Movie => "movie",
            ObjectKind::Show => "show",
            ObjectKind::Season => "season",
            ObjectKind::Episode => "episode",
            ObjectKind::Unknown => "unknown",
        }
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a movie or TV series returned by a catalog search.
///
/// `node_id` is the sole key used to fetch offers; it is guaranteed non-empty
/// for every title constructed from a search result (records without one are
/// skipped at parse time). The `offers` map starts empty and is written once
/// by the search orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Title {
    pub name: String,
    pub object_id: u64,
    pub node_id: String,
    pub kind: ObjectKind,
    pub release_year: Option<i32>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<String>,
    /// Runtime in minutes
    pub runtime: Option<u32>,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub production_countries: Vec<String>,
    /// Canonical catalog path, used to discover locales
    pub full_path: Option<String>,
    #[serde(default)]
    pub offers: OffersByCountry,
}

impl Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(year) = self.release_year {
            write!(f, " ({})", year)?;
        }
        write!(f, " - {}", self.kind)?;
        if let Some(imdb_id) = &self.imdb_id {
            write!(f, " [IMDB: {}]", imdb_id)?;
        }
        if !self.genres.is_empty() {
            write!(f, "\n  Genres: {}", self.genres.join(", "))?;
        }
        if let Some(description) = &self.description {
            write!(f, "\n  {}", description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_kind_parse_known() {
        assert_eq!(ObjectKind::parse("MOVIE"), ObjectKind::Movie);
        assert_eq!(ObjectKind::parse("show"), ObjectKind::Show);
        assert_eq!(ObjectKind::parse("SHOW_SEASON"), ObjectKind::Season);
        assert_eq!(ObjectKind::parse("SHOW_EPISODE"), ObjectKind::Episode);
    }

    #[test]
    fn test_object_kind_parse_unknown() {
        assert_eq!(ObjectKind::parse("SPORTS_EVENT"), ObjectKind::Unknown);
        assert_eq!(ObjectKind::parse(""), ObjectKind::Unknown);
    }

    #[test]
    fn test_title_display() {
        let title = Title {
            name: "Inception".to_string(),
            object_id: 27205,
            node_id: "tm92641".to_string(),
            kind: ObjectKind::Movie,
            release_year: Some(2010),
            imdb_id: Some("tt1375666".to_string()),
            tmdb_id: None,
            runtime: Some(148),
            description: None,
            genres: vec!["act".to_string(), "scf".to_string()],
            production_countries: vec!["US".to_string(), "GB".to_string()],
            full_path: Some("/us/movie/inception".to_string()),
            offers: OffersByCountry::new(),
        };

        let rendered = format!("{}", title);
        assert!(rendered.starts_with("Inception (2010) - movie [IMDB: tt1375666]"));
        assert!(rendered.contains("Genres: act, scf"));
    }

    #[test]
    fn test_title_display_without_optionals() {
        let title = Title {
            name: "Obscure Short".to_string(),
            object_id: 1,
            node_id: "tm1".to_string(),
            kind: ObjectKind::Unknown,
            release_year: None,
            imdb_id: None,
            tmdb_id: None,
            runtime: None,
            description: None,
            genres: Vec::new(),
            production_countries: Vec::new(),
            full_path: None,
            offers: OffersByCountry::new(),
        };

        assert_eq!(format!("{}", title), "Obscure Short - unknown");
    }
}
