//! Film record and its enum-typed fields
//!
//! A film is keyed by `(user_id, name)` in storage; `user_id` lives outside
//! the struct because every store operation is already scoped to one user.

use serde::{Deserialize, Serialize};

/// Viewing tag for a film
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tag {
    #[serde(rename = "viewed")]
    Viewed,
    #[serde(rename = "not viewed")]
    NotViewed,
}

impl Tag {
    /// Text form as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Viewed => "viewed",
            Tag::NotViewed => "not viewed",
        }
    }

    /// Parse user input, case-insensitively
    pub fn parse(input: &str) -> Option<Tag> {
        match input.trim().to_lowercase().as_str() {
            "viewed" => Some(Tag::Viewed),
            "not viewed" => Some(Tag::NotViewed),
            _ => None,
        }
    }
}

/// Thumbs-up / thumbs-down review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Review {
    Like,
    Dislike,
}

impl Review {
    pub fn as_str(&self) -> &'static str {
        match self {
            Review::Like => "like",
            Review::Dislike => "dislike",
        }
    }

    /// Parse user input; exact match on the lowercase keywords
    pub fn parse(input: &str) -> Option<Review> {
        match input.trim() {
            "like" => Some(Review::Like),
            "dislike" => Some(Review::Dislike),
            _ => None,
        }
    }
}

/// One film in a user's collection
///
/// Required fields are always present once a record reaches storage; the
/// optional ones may be skipped during the add flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub name: String,
    pub rating: f64,
    pub year: i64,
    pub genre: String,
    pub description: String,
    /// Absent when the film was added through the inspect-by-name escalation
    pub tag: Option<Tag>,
    pub review: Option<Review>,
    pub poster_url: Option<String>,
    pub trailer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_parse_is_case_insensitive() {
        assert_eq!(Tag::parse("Viewed"), Some(Tag::Viewed));
        assert_eq!(Tag::parse("NOT VIEWED"), Some(Tag::NotViewed));
        assert_eq!(Tag::parse("not viewed"), Some(Tag::NotViewed));
        assert_eq!(Tag::parse("watched"), None);
    }

    #[test]
    fn tag_round_trips_through_text() {
        for tag in [Tag::Viewed, Tag::NotViewed] {
            assert_eq!(Tag::parse(tag.as_str()), Some(tag));
        }
    }

    #[test]
    fn review_parse_is_exact() {
        assert_eq!(Review::parse("like"), Some(Review::Like));
        assert_eq!(Review::parse("dislike"), Some(Review::Dislike));
        assert_eq!(Review::parse("Like"), None);
        assert_eq!(Review::parse("meh"), None);
    }
}
