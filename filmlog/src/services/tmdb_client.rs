//! TMDB API client
//!
//! Best-match film search (search → details → videos) and the random
//! popular-film pick used by the inspect-random flow. A failed videos
//! request degrades to "no trailer" rather than failing the lookup.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Film, Tag};

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
const USER_AGENT: &str = "filmlog/0.1.0 (+https://github.com/filmlog/filmlog)";

/// TMDB paginates discover results; pages past 500 are rejected by the API
const DISCOVER_MAX_PAGE: u32 = 500;

/// TMDB client errors
#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<MovieSummary>,
}

/// One entry of a search or discover result page
#[derive(Debug, Clone, Deserialize)]
struct MovieSummary {
    id: u64,
    title: Option<String>,
    overview: Option<String>,
    vote_average: Option<f64>,
    release_date: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MovieDetails {
    title: Option<String>,
    release_date: Option<String>,
    #[serde(default)]
    genres: Vec<GenreEntry>,
    vote_average: Option<f64>,
    overview: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenreEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    results: Vec<VideoEntry>,
}

#[derive(Debug, Deserialize)]
struct VideoEntry {
    #[serde(rename = "type")]
    kind: String,
    site: String,
    key: String,
}

/// Externally-sourced film metadata, ready to merge into a [`Film`]
#[derive(Debug, Clone, PartialEq)]
pub struct TmdbFilm {
    pub title: String,
    pub year: i64,
    pub genre: String,
    pub rating: f64,
    pub description: String,
    pub poster_url: Option<String>,
    pub trailer: Option<String>,
}

impl TmdbFilm {
    /// Build a local record from the external fields plus a final tag
    pub fn into_film(self, tag: Option<Tag>) -> Film {
        Film {
            name: self.title,
            rating: self.rating,
            year: self.year,
            genre: self.genre,
            description: self.description,
            tag,
            review: None,
            poster_url: self.poster_url,
            trailer: self.trailer,
        }
    }
}

/// TMDB API client
pub struct TmdbClient {
    http_client: reqwest::Client,
    api_key: String,
}

impl TmdbClient {
    pub fn new(api_key: String) -> Result<Self, TmdbError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TmdbError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
        })
    }

    /// Search for the best-matching film by title
    ///
    /// `language` is a TMDB locale code such as "en-US". Returns `Ok(None)`
    /// when no result matched.
    pub async fn search_film(
        &self,
        title: &str,
        language: &str,
    ) -> Result<Option<TmdbFilm>, TmdbError> {
        tracing::debug!(title = %title, language = %language, "Searching TMDB");

        let search: SearchResponse = self
            .get_json(
                &format!("{}/search/movie", TMDB_BASE_URL),
                &[("query", title), ("language", language)],
            )
            .await?;

        let Some(first) = search.results.first() else {
            return Ok(None);
        };
        let film_id = first.id;

        let details: MovieDetails = self
            .get_json(
                &format!("{}/movie/{}", TMDB_BASE_URL, film_id),
                &[("language", language)],
            )
            .await?;

        // Trailer metadata is best in English; failure only loses the link
        let trailer = match self
            .get_json::<VideosResponse>(
                &format!("{}/movie/{}/videos", TMDB_BASE_URL, film_id),
                &[("language", "en-US")],
            )
            .await
        {
            Ok(videos) => videos
                .results
                .iter()
                .find(|v| v.kind == "Trailer" && v.site == "YouTube")
                .map(|v| format!("https://www.youtube.com/watch?v={}", v.key)),
            Err(e) => {
                tracing::warn!(film_id, error = %e, "Failed to fetch videos, continuing without trailer");
                None
            }
        };

        let genre = details
            .genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Some(TmdbFilm {
            title: details.title.unwrap_or_else(|| "No name".to_string()),
            year: release_year(details.release_date.as_deref()),
            genre,
            rating: round_rating(details.vote_average.unwrap_or(0.0)),
            description: details
                .overview
                .unwrap_or_else(|| "No description.".to_string()),
            poster_url: details
                .poster_path
                .map(|path| format!("{}{}", IMAGE_BASE_URL, path)),
            trailer,
        }))
    }

    /// Pick a uniformly random film from one of the most-popular pages
    pub async fn random_popular(&self) -> Result<Option<TmdbFilm>, TmdbError> {
        let page = rand::thread_rng().gen_range(1..=DISCOVER_MAX_PAGE);

        let discover: SearchResponse = self
            .get_json(
                &format!("{}/discover/movie", TMDB_BASE_URL),
                &[
                    ("sort_by", "popularity.desc"),
                    ("page", &page.to_string()),
                ],
            )
            .await?;

        let Some(entry) = discover.results.choose(&mut rand::thread_rng()).cloned() else {
            return Ok(None);
        };

        Ok(Some(TmdbFilm {
            title: entry.title.unwrap_or_else(|| "No name".to_string()),
            year: release_year(entry.release_date.as_deref()),
            // The discover page carries genre ids only, not names
            genre: "Unknown".to_string(),
            rating: round_rating(entry.vote_average.unwrap_or(0.0)),
            description: entry
                .overview
                .unwrap_or_else(|| "No description".to_string()),
            poster_url: entry
                .poster_path
                .map(|path| format!("{}{}", IMAGE_BASE_URL, path)),
            trailer: None,
        }))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, TmdbError> {
        let response = self
            .http_client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| TmdbError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TmdbError::Api(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))
    }
}

/// Year from a "YYYY-MM-DD" release date, 0 when absent or malformed
fn release_year(release_date: Option<&str>) -> i64 {
    release_date
        .and_then(|d| d.get(..4))
        .and_then(|y| y.parse().ok())
        .unwrap_or(0)
}

/// TMDB ratings are shown rounded to one decimal
fn round_rating(vote_average: f64) -> f64 {
    (vote_average * 10.0).round() / 10.0
}
