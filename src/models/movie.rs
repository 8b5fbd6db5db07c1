use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// The first year a motion picture is known to have been recorded.
pub const EARLIEST_FILM_YEAR: i32 = 1888;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
    Episode,
}

impl MediaType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            "episode" => Ok(Self::Episode),
            other => Err(RecordError::UnsupportedType(other.to_string())),
        }
    }
}

/// Which upstream provider produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Omdb,
    Tmdb,
}

impl Source {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Omdb => "omdb",
            Self::Tmdb => "tmdb",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Invalid year format: {0}")]
    InvalidYear(String),

    #[error("Year must be between 1888 and {max}, got {year}")]
    YearOutOfRange { year: i32, max: i32 },

    #[error("At least one actor must be provided")]
    NoActors,

    #[error("At least one genre must be provided")]
    NoGenres,

    #[error("Unsupported media type: {0}")]
    UnsupportedType(String),
}

/// Raw field values for a [`MovieRecord`] before validation.
#[derive(Debug, Clone)]
pub struct NewMovieRecord {
    pub title: String,
    pub year: String,
    pub media_type: MediaType,
    pub poster: Option<Url>,
    pub plot: Option<String>,
    pub actors: Vec<String>,
    pub genre: Vec<String>,
    pub source: Source,
}

/// A normalized movie entry. Fields are only reachable through accessors so a
/// record cannot change after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieRecord {
    title: String,
    year: String,
    #[serde(rename = "type")]
    media_type: MediaType,
    poster: Option<Url>,
    plot: Option<String>,
    actors: Vec<String>,
    genre: Vec<String>,
    source: Source,
}

impl MovieRecord {
    pub fn new(fields: NewMovieRecord) -> Result<Self, RecordError> {
        let title = fields.title.trim().to_string();
        if title.is_empty() {
            return Err(RecordError::EmptyTitle);
        }

        validate_year(&fields.year)?;

        let actors = non_blank(fields.actors);
        if actors.is_empty() {
            return Err(RecordError::NoActors);
        }

        let genre = non_blank(fields.genre);
        if genre.is_empty() {
            return Err(RecordError::NoGenres);
        }

        Ok(Self {
            title,
            year: fields.year,
            media_type: fields.media_type,
            poster: fields.poster,
            plot: fields.plot.filter(|p| !p.trim().is_empty()),
            actors,
            genre,
            source: fields.source,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn year(&self) -> &str {
        &self.year
    }

    #[must_use]
    pub const fn media_type(&self) -> MediaType {
        self.media_type
    }

    #[must_use]
    pub const fn poster(&self) -> Option<&Url> {
        self.poster.as_ref()
    }

    #[must_use]
    pub fn plot(&self) -> Option<&str> {
        self.plot.as_deref()
    }

    #[must_use]
    pub fn actors(&self) -> &[String] {
        &self.actors
    }

    #[must_use]
    pub fn genre(&self) -> &[String] {
        &self.genre
    }

    #[must_use]
    pub const fn source(&self) -> Source {
        self.source
    }
}

fn non_blank(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

pub fn validate_year(year: &str) -> Result<i32, RecordError> {
    let parsed: i32 = year
        .trim()
        .parse()
        .map_err(|_| RecordError::InvalidYear(year.to_string()))?;

    let max = chrono::Utc::now().year() + 1;
    if !(EARLIEST_FILM_YEAR..=max).contains(&parsed) {
        return Err(RecordError::YearOutOfRange { year: parsed, max });
    }

    Ok(parsed)
}
