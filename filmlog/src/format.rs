//! Presentation formatting for film records
//!
//! Renders the HTML-flavored chat card used by every inspect and
//! confirmation message. User-supplied text is always escaped.

use crate::models::{Film, Review};

/// Escape text for embedding in an HTML-formatted chat message
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render a film as its display card
pub fn format_film_info(film: &Film) -> String {
    let mut text = format!(
        "🎬 <b>{}</b> ({})\n🎭 Genre: {}\n⭐ Rating: {}/10\n📝 Description: {}\n🏷️ Tag: {}",
        escape_html(&film.name),
        film.year,
        escape_html(&film.genre),
        film.rating,
        escape_html(&film.description),
        film.tag.map(|t| t.as_str()).unwrap_or("Not set"),
    );

    match film.review {
        Some(Review::Like) => text.push_str("\n🗒️ Review: 👍"),
        Some(Review::Dislike) => text.push_str("\n🗒️ Review: 👎"),
        None => {}
    }

    if let Some(url) = &film.poster_url {
        text.push_str(&format!("\n<a href=\"{}\">Poster</a>", escape_html(url)));
    }
    if let Some(url) = &film.trailer {
        text.push_str(&format!("\n<a href=\"{}\">Trailer</a>", escape_html(url)));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tag;

    fn sample_film() -> Film {
        Film {
            name: "Alien".to_string(),
            rating: 8.5,
            year: 1979,
            genre: "Horror, Science Fiction".to_string(),
            description: "The crew of a commercial spacecraft encounters a deadly lifeform."
                .to_string(),
            tag: Some(Tag::Viewed),
            review: Some(Review::Like),
            poster_url: Some("https://image.tmdb.org/t/p/w500/alien.jpg".to_string()),
            trailer: None,
        }
    }

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(escape_html("a & b <c>"), "a &amp; b &lt;c&gt;");
        assert_eq!(escape_html("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn card_contains_all_present_fields() {
        let card = format_film_info(&sample_film());
        assert!(card.contains("<b>Alien</b> (1979)"));
        assert!(card.contains("Genre: Horror, Science Fiction"));
        assert!(card.contains("Rating: 8.5/10"));
        assert!(card.contains("Tag: viewed"));
        assert!(card.contains("Review: 👍"));
        assert!(card.contains("<a href=\"https://image.tmdb.org/t/p/w500/alien.jpg\">Poster</a>"));
        assert!(!card.contains("Trailer"));
    }

    #[test]
    fn missing_tag_renders_as_not_set() {
        let mut film = sample_film();
        film.tag = None;
        film.review = None;
        let card = format_film_info(&film);
        assert!(card.contains("Tag: Not set"));
        assert!(!card.contains("Review:"));
    }

    #[test]
    fn film_name_is_escaped() {
        let mut film = sample_film();
        film.name = "Fast & Furious".to_string();
        let card = format_film_info(&film);
        assert!(card.contains("Fast &amp; Furious"));
    }
}
