use std::sync::Arc;

use clap::Parser;
use dialoguer::Select;

use crate::{
    config::Config,
    filter::{FilterSpec, OfferFilter},
    models::{ObjectKind, OffersByCountry, Title},
    services::{catalog::JustWatchClient, search::SearchService},
};

/// Search streaming catalogs and filter where a title can be watched
#[derive(Debug, Parser)]
#[command(name = "streamlens", version, about)]
pub struct Cli {
    /// Title to search for
    #[arg(short = 's', long = "search")]
    pub search: String,

    /// Country whose catalog ranking scopes the search
    #[arg(short = 'c', long = "country", default_value = "US")]
    pub country: String,

    /// Maximum number of search results
    #[arg(short = 'n', long = "max-results", default_value_t = 10)]
    pub max_results: u32,

    /// Interactively pick a result and print its offers
    #[arg(long = "show-offers")]
    pub show_offers: bool,

    /// Proxy prefix; requests go to {proxy}{api url}{endpoint}
    #[arg(long = "proxy-url")]
    pub proxy_url: Option<String>,

    /// Keep only offers from countries matching this pattern
    #[arg(short = 'C', long = "filter-country")]
    pub filter_country: Option<String>,

    /// Keep only offers whose service name matches this pattern
    #[arg(short = 'S', long = "filter-service")]
    pub filter_service: Option<String>,

    /// Keep only offers with an audio language matching this pattern
    #[arg(short = 'A', long = "filter-audio")]
    pub filter_audio: Option<String>,

    /// Keep only offers with a subtitle language matching this pattern
    #[arg(short = 'T', long = "filter-subtitle")]
    pub filter_subtitle: Option<String>,

    /// Keep only offers obtained this way (flatrate, buy, rent, free, ads)
    #[arg(short = 'M', long = "filter-monetization")]
    pub filter_monetization: Option<String>,

    /// Keep only offers in this presentation quality (SD, HD, 4K)
    #[arg(short = 'P', long = "filter-presentation")]
    pub filter_presentation: Option<String>,
}

impl Cli {
    /// Collects the six filter flags into one spec
    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec {
            country: self.filter_country.clone(),
            service: self.filter_service.clone(),
            audio: self.filter_audio.clone(),
            subtitle: self.filter_subtitle.clone(),
            monetization: self.filter_monetization.clone(),
            presentation: self.filter_presentation.clone(),
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if cli.proxy_url.is_some() {
        config.proxy_url = cli.proxy_url.clone();
    }

    // Compile the filter before anything touches the network, so a bad
    // pattern fails immediately.
    let spec = cli.filter_spec();
    let filter = match spec.is_empty() {
        true => None,
        false => Some(OfferFilter::new(&spec)?),
    };

    let client = Arc::new(JustWatchClient::new(&config));
    let service = SearchService::new(client);

    let titles = service
        .search(&cli.search, &cli.country, cli.max_results, filter.as_ref())
        .await?;

    if titles.is_empty() {
        println!("No results found for \"{}\"", cli.search);
        return Ok(());
    }

    print_titles(&titles);

    if cli.show_offers {
        show_offers(&service, &titles, filter.as_ref()).await?;
    }

    Ok(())
}

fn print_titles(titles: &[Title]) {
    println!("Found {} results:\n", titles.len());
    for (index, title) in titles.iter().enumerate() {
        println!("{}. {}", index + 1, title);
        for link in links(title) {
            println!("   {}", link);
        }
        if !title.offers.is_empty() {
            let offer_count: usize = title.offers.values().map(Vec::len).sum();
            println!(
                "   Matching offers: {} in {} countries",
                offer_count,
                title.offers.len()
            );
        }
        println!();
    }
}

fn links(title: &Title) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(imdb_id) = &title.imdb_id {
        lines.push(format!("IMDB: https://www.imdb.com/title/{}", imdb_id));
    }
    if let Some(tmdb_id) = &title.tmdb_id {
        let segment = match title.kind {
            ObjectKind::Show => "tv",
            _ => "movie",
        };
        lines.push(format!(
            "TMDB: https://www.themoviedb.org/{}/{}",
            segment, tmdb_id
        ));
    }
    if let Some(full_path) = &title.full_path {
        lines.push(format!("JustWatch: https://www.justwatch.com{}", full_path));
    }
    lines
}

/// Prompts for a title and prints its offers, country by country.
///
/// A filtered search already carries each title's matching offers; reuse
/// those instead of re-fetching. An unfiltered search left the offer maps
/// empty, so fetch on demand for the picked title only.
async fn show_offers(
    service: &SearchService,
    titles: &[Title],
    filter: Option<&OfferFilter>,
) -> anyhow::Result<()> {
    let labels: Vec<String> = titles
        .iter()
        .map(|title| match title.release_year {
            Some(year) => format!("{} ({})", title.name, year),
            None => title.name.clone(),
        })
        .collect();

    let selection = Select::new()
        .with_prompt("Show offers for")
        .items(&labels)
        .default(0)
        .interact()?;

    let title = &titles[selection];
    let offers = if title.offers.is_empty() {
        let fetched = service.fetch_all_offers(title).await?;
        match filter {
            Some(filter) => filter.apply(&fetched),
            None => fetched,
        }
    } else {
        title.offers.clone()
    };

    print_offers(&title.name, &offers);

    Ok(())
}

fn print_offers(title_name: &str, offers: &OffersByCountry) {
    if offers.is_empty() {
        println!("\nNo offers found for {}", title_name);
        return;
    }

    let offer_count: usize = offers.values().map(Vec::len).sum();
    println!(
        "\nFound {} offers in {} countries for {}:\n",
        offer_count,
        offers.len(),
        title_name
    );

    for country_offers in offers.values() {
        for offer in country_offers {
            println!("{}\n", offer);
        }
    }
}
