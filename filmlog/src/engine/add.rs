//! Add flow
//!
//! Two branches after method selection: a manual question sequence that
//! fills the draft field by field, and an external branch that looks the
//! title up, asks for confirmation, then only needs a tag. A record is
//! written once, when the branch completes.

use crate::db::films::{load_films, save_film};
use crate::engine::flow::{AddFlow, AddState, Flow};
use crate::engine::{ConversationEngine, Keyboard, Reply};
use crate::format::{escape_html, format_film_info};
use crate::models::{Review, Tag};
use crate::services::language::tmdb_language;
use crate::validate::{
    normalize_url, parse_rating, parse_year, validate_text, DESCRIPTION_MAX_LEN, GENRE_MAX_LEN,
    NAME_MAX_LEN, TAG_MAX_LEN,
};

impl ConversationEngine {
    pub(super) async fn handle_add(&self, user_id: i64, text: &str, flow: AddFlow) -> Reply {
        let AddFlow { state, mut draft } = flow;

        match state {
            AddState::ChooseMethod => match text {
                "Enter data manually" => {
                    self.continue_with(
                        user_id,
                        Flow::Add(AddFlow {
                            state: AddState::Name,
                            draft,
                        }),
                        Reply::with("Enter a movie title:", Keyboard::Hide),
                    )
                    .await
                }
                "Search via TMDb" => {
                    self.continue_with(
                        user_id,
                        Flow::Add(AddFlow {
                            state: AddState::TmdbTitle,
                            draft,
                        }),
                        Reply::with("Enter a movie title:", Keyboard::Hide),
                    )
                    .await
                }
                _ => {
                    self.continue_with(
                        user_id,
                        Flow::Add(AddFlow {
                            state: AddState::ChooseMethod,
                            draft,
                        }),
                        Reply::with("Select a method to add a movie:", Keyboard::AddMethod),
                    )
                    .await
                }
            },

            AddState::Name => {
                let name = match validate_text(text, NAME_MAX_LEN) {
                    Ok(name) => name,
                    Err(reason) => {
                        return self
                            .continue_with(
                                user_id,
                                Flow::Add(AddFlow {
                                    state: AddState::Name,
                                    draft,
                                }),
                                Reply::plain(format!("Invalid movie title: {} Try again:", reason)),
                            )
                            .await;
                    }
                };

                let films = load_films(&self.db, user_id).await;
                if films.iter().any(|f| f.name == name) {
                    // Same as the duplicate reply of the original bot: the
                    // user may try another title without restarting
                    return self
                        .continue_with(
                            user_id,
                            Flow::Add(AddFlow {
                                state: AddState::Name,
                                draft,
                            }),
                            Reply::main("Film with this name already in database!"),
                        )
                        .await;
                }

                draft.name = Some(name);
                self.continue_with(
                    user_id,
                    Flow::Add(AddFlow {
                        state: AddState::Rating,
                        draft,
                    }),
                    Reply::plain("Enter movie rating (1 to 10):"),
                )
                .await
            }

            AddState::Rating => match parse_rating(text) {
                Ok(rating) => {
                    draft.rating = Some(rating);
                    self.continue_with(
                        user_id,
                        Flow::Add(AddFlow {
                            state: AddState::Year,
                            draft,
                        }),
                        Reply::plain("Enter the year the movie was released:"),
                    )
                    .await
                }
                Err(reason) => {
                    self.continue_with(
                        user_id,
                        Flow::Add(AddFlow {
                            state: AddState::Rating,
                            draft,
                        }),
                        Reply::plain(reason),
                    )
                    .await
                }
            },

            AddState::Year => match parse_year(text) {
                Ok(year) => {
                    draft.year = Some(year);
                    self.continue_with(
                        user_id,
                        Flow::Add(AddFlow {
                            state: AddState::Genre,
                            draft,
                        }),
                        Reply::plain("Enter the movie genre:"),
                    )
                    .await
                }
                Err(reason) => {
                    self.continue_with(
                        user_id,
                        Flow::Add(AddFlow {
                            state: AddState::Year,
                            draft,
                        }),
                        Reply::plain(reason),
                    )
                    .await
                }
            },

            AddState::Genre => match validate_text(text, GENRE_MAX_LEN) {
                Ok(genre) => {
                    draft.genre = Some(genre);
                    self.continue_with(
                        user_id,
                        Flow::Add(AddFlow {
                            state: AddState::Description,
                            draft,
                        }),
                        Reply::plain("Enter a description of the movie:"),
                    )
                    .await
                }
                Err(reason) => {
                    self.continue_with(
                        user_id,
                        Flow::Add(AddFlow {
                            state: AddState::Genre,
                            draft,
                        }),
                        Reply::plain(format!("Invalid genre: {} Try again:", reason)),
                    )
                    .await
                }
            },

            AddState::Description => match validate_text(text, DESCRIPTION_MAX_LEN) {
                Ok(description) => {
                    draft.description = Some(description);
                    self.continue_with(
                        user_id,
                        Flow::Add(AddFlow {
                            state: AddState::Tag,
                            draft,
                        }),
                        Reply::with(
                            "Write tag for film (viewed, not viewed):",
                            Keyboard::ViewedOrNot,
                        ),
                    )
                    .await
                }
                Err(reason) => {
                    self.continue_with(
                        user_id,
                        Flow::Add(AddFlow {
                            state: AddState::Description,
                            draft,
                        }),
                        Reply::plain(format!("Invalid description: {} Try again:", reason)),
                    )
                    .await
                }
            },

            AddState::Tag => {
                let answer = match validate_text(text, TAG_MAX_LEN) {
                    Ok(answer) => answer.to_lowercase(),
                    Err(reason) => {
                        return self
                            .continue_with(
                                user_id,
                                Flow::Add(AddFlow {
                                    state: AddState::Tag,
                                    draft,
                                }),
                                Reply::plain(format!("Invalid tag: {} Try again:", reason)),
                            )
                            .await;
                    }
                };
                match Tag::parse(&answer) {
                    Some(tag) => {
                        draft.tag = Some(tag);
                        self.continue_with(
                            user_id,
                            Flow::Add(AddFlow {
                                state: AddState::Review,
                                draft,
                            }),
                            Reply::with(
                                "Optional: write you review(like or dislike) (or type 'skip'):",
                                Keyboard::Hide,
                            ),
                        )
                        .await
                    }
                    None => {
                        self.continue_with(
                            user_id,
                            Flow::Add(AddFlow {
                                state: AddState::Tag,
                                draft,
                            }),
                            Reply::plain(format!("Invalid tag: {} Try again:", answer)),
                        )
                        .await
                    }
                }
            }

            AddState::Review => {
                let answer = text.trim();
                if answer == "skip" {
                    draft.review = None;
                } else {
                    match Review::parse(answer) {
                        Some(review) => draft.review = Some(review),
                        None => {
                            return self
                                .continue_with(
                                    user_id,
                                    Flow::Add(AddFlow {
                                        state: AddState::Review,
                                        draft,
                                    }),
                                    Reply::plain(format!("Invalid review: {} Try again:", answer)),
                                )
                                .await;
                        }
                    }
                }
                self.continue_with(
                    user_id,
                    Flow::Add(AddFlow {
                        state: AddState::Trailer,
                        draft,
                    }),
                    Reply::plain("Optional: send a link to the movie trailer (or type 'skip'):"),
                )
                .await
            }

            AddState::Trailer => {
                draft.trailer = normalize_url(text);
                self.continue_with(
                    user_id,
                    Flow::Add(AddFlow {
                        state: AddState::Poster,
                        draft,
                    }),
                    Reply::plain("Optional: send a link to the movie poster (or type 'skip'):"),
                )
                .await
            }

            AddState::Poster => {
                draft.poster_url = normalize_url(text);
                let Some(film) = draft.build() else {
                    // Unreachable: every required field was gathered on the
                    // way here
                    tracing::error!(user_id, "Add flow reached commit with incomplete draft");
                    return Reply::main("Error saving movie");
                };

                if save_film(&self.db, user_id, &film).await {
                    let mut text =
                        format!("Movie '<b>{}</b>' saved successfully!", escape_html(&film.name));
                    if let Some(url) = &film.poster_url {
                        text.push_str(&format!("\n <a href=\"{}\">Poster link</a>", url));
                    }
                    if let Some(url) = &film.trailer {
                        text.push_str(&format!("\n <a href=\"{}\">Trailer link</a>", url));
                    }
                    Reply::main(text)
                } else {
                    Reply::main("Error saving movie")
                }
            }

            AddState::TmdbTitle => {
                let Some(tmdb) = &self.tmdb else {
                    return Reply::main("Film search is not configured.");
                };
                let language = tmdb_language(text);
                match tmdb.search_film(text, language).await {
                    Ok(Some(found)) => {
                        let film = found.into_film(None);
                        let card = format_film_info(&film);
                        self.continue_with(
                            user_id,
                            Flow::Add(AddFlow {
                                state: AddState::TmdbConfirm(film),
                                draft,
                            }),
                            Reply::with(format!("This film? (y/n)\n\n{}", card), Keyboard::YesNo),
                        )
                        .await
                    }
                    Ok(None) => Reply::main("Film not found. Try again."),
                    Err(e) => {
                        tracing::error!(user_id, error = %e, "TMDB search failed");
                        Reply::main("Error: failed to fetch data from TMDB.")
                    }
                }
            }

            AddState::TmdbConfirm(film) => match text.to_lowercase().as_str() {
                "y" | "yes" => {
                    self.continue_with(
                        user_id,
                        Flow::Add(AddFlow {
                            state: AddState::TmdbTag(film),
                            draft,
                        }),
                        Reply::with(
                            "Write tag for film (viewed / not viewed):",
                            Keyboard::ViewedOrNot,
                        ),
                    )
                    .await
                }
                "n" | "no" => Reply::main("Not added to the collection."),
                _ => {
                    self.continue_with(
                        user_id,
                        Flow::Add(AddFlow {
                            state: AddState::TmdbConfirm(film),
                            draft,
                        }),
                        Reply::plain("Please reply with y/n"),
                    )
                    .await
                }
            },

            AddState::TmdbTag(mut film) => {
                let answer = text.trim().to_lowercase();
                let Some(tag) = Tag::parse(&answer) else {
                    return self
                        .continue_with(
                            user_id,
                            Flow::Add(AddFlow {
                                state: AddState::TmdbTag(film),
                                draft,
                            }),
                            Reply::plain(format!("Invalid tag: {} Try again:", answer)),
                        )
                        .await;
                };

                let films = load_films(&self.db, user_id).await;
                if films.iter().any(|f| f.name == film.name) {
                    return Reply::main(
                        "A film with this name already exists in your collection. Not added.",
                    );
                }

                film.tag = Some(tag);
                if save_film(&self.db, user_id, &film).await {
                    Reply::main("Movie successfully added to your collection.")
                } else {
                    Reply::main("Could not save the movie. It may already exist.")
                }
            }
        }
    }
}
