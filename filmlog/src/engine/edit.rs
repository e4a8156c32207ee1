//! Edit flow
//!
//! Name lookup, then a field-selection loop: each successful update persists
//! the full record immediately and returns to field selection, so several
//! fields can be edited in one session.

use crate::db::films::{delete_film, load_films, save_film};
use crate::engine::flow::{EditState, Flow};
use crate::engine::{ConversationEngine, Keyboard, Reply};
use crate::format::escape_html;
use crate::models::{Film, Review, Tag};
use crate::validate::{
    normalize_url, validate_text, DESCRIPTION_MAX_LEN, GENRE_MAX_LEN, MIN_YEAR, NAME_MAX_LEN,
};

/// An editable field: knows how to name itself, prompt for a new value,
/// and validate-and-set that value on a film.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Name,
    Rating,
    Year,
    Genre,
    Description,
    Poster,
    Trailer,
    Review,
    Tag,
}

impl EditField {
    /// Parse a field choice, case-insensitively
    pub fn parse(input: &str) -> Option<EditField> {
        match input.trim().to_lowercase().as_str() {
            "name" => Some(EditField::Name),
            "rating" => Some(EditField::Rating),
            "year" => Some(EditField::Year),
            "genre" => Some(EditField::Genre),
            "description" => Some(EditField::Description),
            "poster" => Some(EditField::Poster),
            "trailer" => Some(EditField::Trailer),
            "review" => Some(EditField::Review),
            "tag" => Some(EditField::Tag),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EditField::Name => "Name",
            EditField::Rating => "Rating",
            EditField::Year => "Year",
            EditField::Genre => "Genre",
            EditField::Description => "Description",
            EditField::Poster => "Poster",
            EditField::Trailer => "Trailer",
            EditField::Review => "Review",
            EditField::Tag => "Tag",
        }
    }

    /// Question asked once this field is selected
    pub fn prompt(&self) -> String {
        match self {
            EditField::Poster => "Enter a direct URL to the new poster:".to_string(),
            EditField::Trailer => "Enter a direct URL to the new trailer:".to_string(),
            field => format!("Enter a new value for {}:", field.label()),
        }
    }

    /// Validate `input` under this field's rule and set it on `film`;
    /// the error string is the re-prompt sent to the user.
    pub fn apply(&self, film: &mut Film, input: &str) -> Result<(), String> {
        let input = input.trim();
        match self {
            EditField::Name => {
                let name = validate_text(input, NAME_MAX_LEN)
                    .map_err(|reason| format!("Invalid name: {}. Try again.", reason))?;
                film.name = name;
                Ok(())
            }
            EditField::Rating => match input.replace(',', ".").parse::<f64>() {
                Ok(rating) if (1.0..=10.0).contains(&rating) => {
                    film.rating = rating;
                    Ok(())
                }
                Ok(_) => Err("Rating must be from 1 to 10. Try again:".to_string()),
                Err(_) => {
                    Err("Please enter a valid number between 1 and 10. Try again:".to_string())
                }
            },
            EditField::Year => match input.parse::<i64>() {
                Ok(year) if (MIN_YEAR..=crate::validate::max_year()).contains(&year) => {
                    film.year = year;
                    Ok(())
                }
                Ok(_) => Err(format!(
                    "Year must be between {} and {}. Try again:",
                    MIN_YEAR,
                    crate::validate::max_year()
                )),
                Err(_) => Err("Please enter a valid numerical year. Try again:".to_string()),
            },
            EditField::Genre => {
                let genre = validate_text(input, GENRE_MAX_LEN)
                    .map_err(|reason| format!("Invalid genre: {} Try again:", reason))?;
                film.genre = genre;
                Ok(())
            }
            EditField::Description => {
                let description = validate_text(input, DESCRIPTION_MAX_LEN)
                    .map_err(|reason| format!("Invalid description: {} Try again:", reason))?;
                film.description = description;
                Ok(())
            }
            EditField::Poster => match normalize_url(input) {
                Some(url) => {
                    film.poster_url = Some(url);
                    Ok(())
                }
                None => Err("Invalid URL. Please send a valid link to an image.".to_string()),
            },
            EditField::Trailer => match normalize_url(input) {
                Some(url) => {
                    film.trailer = Some(url);
                    Ok(())
                }
                None => Err("Invalid URL. Please send a valid link to a trailer.".to_string()),
            },
            EditField::Review => match Review::parse(input) {
                Some(review) => {
                    film.review = Some(review);
                    Ok(())
                }
                None => {
                    Err("Invalid review. Please write valid review (like or dislike).".to_string())
                }
            },
            EditField::Tag => match Tag::parse(input) {
                Some(tag) => {
                    film.tag = Some(tag);
                    Ok(())
                }
                None => Err("Invalid tag. Please write valid tag (viewed or not viewed).".to_string()),
            },
        }
    }
}

impl ConversationEngine {
    pub(super) async fn handle_edit(&self, user_id: i64, text: &str, state: EditState) -> Reply {
        match state {
            EditState::Name => {
                let name = text.to_string();
                let films = load_films(&self.db, user_id).await;
                if !films.iter().any(|f| f.name == name) {
                    return Reply::main("Movie not found.");
                }
                let prompt = format!(
                    "Editing movie: <b>{}</b>\nSelect field to edit:",
                    escape_html(&name)
                );
                self.continue_with(
                    user_id,
                    Flow::Edit(EditState::ChooseField { name }),
                    Reply::with(prompt, Keyboard::Edit),
                )
                .await
            }

            EditState::ChooseField { name } => match EditField::parse(text) {
                Some(field) => {
                    let prompt = field.prompt();
                    self.continue_with(
                        user_id,
                        Flow::Edit(EditState::NewValue { name, field }),
                        Reply::plain(prompt),
                    )
                    .await
                }
                None => {
                    self.continue_with(
                        user_id,
                        Flow::Edit(EditState::ChooseField { name }),
                        Reply::plain("Invalid field. Please select from the keyboard"),
                    )
                    .await
                }
            },

            EditState::NewValue { name, field } => {
                let films = load_films(&self.db, user_id).await;
                let Some(film) = films.iter().find(|f| f.name == name) else {
                    return Reply::main("Movie not found in database. Cancelling edit.");
                };
                let mut film = film.clone();

                if let Err(reason) = field.apply(&mut film, text) {
                    return self
                        .continue_with(
                            user_id,
                            Flow::Edit(EditState::NewValue { name, field }),
                            Reply::plain(reason),
                        )
                        .await;
                }

                // A rename moves the row: the old key is dropped before the
                // record is written under the new name
                if field == EditField::Name && film.name != name {
                    if let Err(e) = delete_film(&self.db, user_id, &name).await {
                        tracing::error!(user_id, name = %name, error = %e, "Failed to rename film");
                        return Reply::main("Error saving changes.");
                    }
                }

                if save_film(&self.db, user_id, &film).await {
                    let text = format!(
                        "Field <b>{}</b> updated successfully\n\nSelect another field to edit or 'Back to main menu'",
                        field.label()
                    );
                    self.continue_with(
                        user_id,
                        Flow::Edit(EditState::ChooseField {
                            name: film.name.clone(),
                        }),
                        Reply::with(text, Keyboard::Edit),
                    )
                    .await
                } else {
                    Reply::main("Error saving changes.")
                }
            }
        }
    }
}
