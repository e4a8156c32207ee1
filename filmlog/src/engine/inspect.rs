//! Inspect queries
//!
//! Read-only views over the user's collection, plus two escalations that
//! may reach TMDB: inspect-by-name offers to add an external match after a
//! local miss, and inspect-random can pick from the remote popular pages.

use std::cmp::Ordering;

use crate::db::films::{load_films, save_film};
use crate::engine::flow::{Flow, InspectState};
use crate::engine::{ConversationEngine, Keyboard, Reply};
use crate::format::{escape_html, format_film_info};
use crate::models::Film;
use crate::services::language::tmdb_language;
use crate::similarity::rank_by_description;

fn join_cards<'a>(films: impl IntoIterator<Item = &'a Film>) -> String {
    films
        .into_iter()
        .map(format_film_info)
        .collect::<Vec<_>>()
        .join("\n\n")
}

impl ConversationEngine {
    /// All films, best-rated first. Ties keep storage order; that order is
    /// not a guarantee of the store.
    pub(super) async fn inspect_all(&self, user_id: i64) -> Reply {
        let mut films = load_films(&self.db, user_id).await;
        if films.is_empty() {
            return Reply::main("No movies.");
        }

        films.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
        Reply::main(format!("<b>Movie rating:</b>\n\n{}", join_cards(&films)))
    }

    pub(super) async fn handle_inspect(
        &self,
        user_id: i64,
        text: &str,
        state: InspectState,
    ) -> Reply {
        match state {
            InspectState::Name => {
                let name = text.trim();
                let films = load_films(&self.db, user_id).await;

                if let Some(film) = films.iter().find(|f| f.name == name) {
                    return Reply::main(format_film_info(film));
                }

                // Local miss: offer the best external match instead
                let Some(tmdb) = &self.tmdb else {
                    return Reply::main("Film not found.");
                };
                match tmdb.search_film(name, tmdb_language(name)).await {
                    Ok(Some(found)) => {
                        let film = found.into_film(None);
                        let card = format_film_info(&film);
                        self.continue_with(
                            user_id,
                            Flow::Inspect(InspectState::ConfirmAdd(film)),
                            Reply::with(
                                format!(
                                    "Film not found. Film from TMDb:\n{}\n\nWould you like to add this movie to the database? (y/n):",
                                    card
                                ),
                                Keyboard::YesNo,
                            ),
                        )
                        .await
                    }
                    Ok(None) => Reply::main("Film not found."),
                    Err(e) => {
                        tracing::error!(user_id, error = %e, "TMDB lookup failed");
                        Reply::main("Film not found.")
                    }
                }
            }

            InspectState::ConfirmAdd(film) => match text.to_lowercase().as_str() {
                "y" | "yes" => {
                    let films = load_films(&self.db, user_id).await;
                    if films.iter().any(|f| f.name == film.name) {
                        return Reply::main(
                            "A film with this name already exists in your collection. Not added.",
                        );
                    }
                    if save_film(&self.db, user_id, &film).await {
                        Reply::main("Movie successfully added to your collection.")
                    } else {
                        Reply::main("Could not save the movie. It may already exist.")
                    }
                }
                "n" | "no" => Reply::main("Not added to the collection."),
                _ => {
                    self.continue_with(
                        user_id,
                        Flow::Inspect(InspectState::ConfirmAdd(film)),
                        Reply::plain("Please use menu."),
                    )
                    .await
                }
            },

            InspectState::Rating => {
                let films = load_films(&self.db, user_id).await;
                if films.is_empty() {
                    return Reply::main("No films added.");
                }
                let rating: f64 = match text.trim().parse() {
                    Ok(rating) => rating,
                    Err(_) => {
                        return self
                            .continue_with(
                                user_id,
                                Flow::Inspect(InspectState::Rating),
                                Reply::plain("Please enter a valid number. Try again:"),
                            )
                            .await;
                    }
                };

                let matched: Vec<&Film> =
                    films.iter().filter(|f| f.rating == rating).collect();
                if matched.is_empty() {
                    Reply::main("No movies found in this rating")
                } else {
                    Reply::main(format!(
                        "<b>Movies in rating '{}':</b> \n\n{}",
                        escape_html(text),
                        join_cards(matched),
                    ))
                }
            }

            InspectState::Year => {
                let films = load_films(&self.db, user_id).await;
                if films.is_empty() {
                    return Reply::main("No films added.");
                }
                let year: i64 = match text.trim().parse() {
                    Ok(year) => year,
                    Err(_) => {
                        return self
                            .continue_with(
                                user_id,
                                Flow::Inspect(InspectState::Year),
                                Reply::plain("Please enter a valid numerical year. Try again:"),
                            )
                            .await;
                    }
                };

                let matched: Vec<&Film> = films.iter().filter(|f| f.year == year).collect();
                if matched.is_empty() {
                    Reply::main("No movies found in this year")
                } else {
                    Reply::main(format!(
                        "<b>Movies in year '{}':</b> \n\n{}",
                        escape_html(text),
                        join_cards(matched),
                    ))
                }
            }

            InspectState::Genre => {
                let films = load_films(&self.db, user_id).await;
                if films.is_empty() {
                    return Reply::main("No films added.");
                }
                let genre = text.trim().to_lowercase();
                let matched: Vec<&Film> = films
                    .iter()
                    .filter(|f| f.genre.to_lowercase().contains(&genre))
                    .collect();
                if matched.is_empty() {
                    Reply::main("No movies found in this genre.")
                } else {
                    Reply::main(format!(
                        "<b>Movies in genre '{}':</b>\n\n{}",
                        escape_html(text),
                        join_cards(matched),
                    ))
                }
            }

            InspectState::Tag => {
                let films = load_films(&self.db, user_id).await;
                if films.is_empty() {
                    return Reply::main("No films added.");
                }
                let wanted = text.trim().to_lowercase();
                let matched: Vec<&Film> = films
                    .iter()
                    .filter(|f| f.tag.map(|t| t.as_str()) == Some(wanted.as_str()))
                    .collect();
                if matched.is_empty() {
                    Reply::main("No movies found with this tag")
                } else {
                    Reply::main(format!(
                        "<b>Movies with tag '{}':</b>\n\n{}",
                        escape_html(text),
                        join_cards(matched),
                    ))
                }
            }

            InspectState::Description => {
                let films = load_films(&self.db, user_id).await;
                if films.is_empty() {
                    return Reply::main("No films added.");
                }

                let ranked = rank_by_description(text, &films);
                if ranked.is_empty() {
                    return Reply::main("No movies with this description.");
                }

                let result = ranked
                    .iter()
                    .map(|(similarity, film)| {
                        format!(
                            "{}\n📊 Similarity: {}%",
                            format_film_info(film),
                            (similarity * 100.0).round() as i64
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n\n");
                Reply::main(format!("<b>Most similar descriptions:</b>\n\n{}", result))
            }

            InspectState::Random => match text.trim().to_lowercase().as_str() {
                "from own collection" => {
                    let films = load_films(&self.db, user_id).await;
                    if films.is_empty() {
                        return Reply::main("No movies found.");
                    }
                    let film = {
                        use rand::seq::SliceRandom;
                        films.choose(&mut rand::thread_rng())
                    };
                    match film {
                        Some(film) => Reply::main(format!(
                            "<b>Random film:</b>\n\n{}",
                            format_film_info(film)
                        )),
                        None => Reply::main("No movies found."),
                    }
                }
                "via tmdb" => {
                    let Some(tmdb) = &self.tmdb else {
                        return Reply::main("Could not fetch films from TMDb.");
                    };
                    match tmdb.random_popular().await {
                        Ok(Some(found)) => {
                            // Display only; nothing is written
                            let film = found.into_film(None);
                            Reply::main(format!(
                                "<b>Random TMDb film:</b>\n\n{}",
                                format_film_info(&film)
                            ))
                        }
                        Ok(None) => Reply::main("Could not fetch films from TMDb."),
                        Err(e) => {
                            tracing::error!(user_id, error = %e, "TMDB discover failed");
                            Reply::main("Could not fetch films from TMDb.")
                        }
                    }
                }
                _ => {
                    self.continue_with(
                        user_id,
                        Flow::Inspect(InspectState::Random),
                        Reply::plain("Use keyboard buttons"),
                    )
                    .await
                }
            },
        }
    }
}
