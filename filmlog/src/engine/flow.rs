//! Conversation flow states
//!
//! One `Flow` value per user, held in the engine's session map. A flow is
//! created when a menu button starts it, advanced by each valid answer, and
//! dropped on completion, cancel, or switch to another flow.

use crate::engine::edit::EditField;
use crate::models::{Film, Review, Tag};

/// Active conversation flow for one user
#[derive(Debug, Clone)]
pub enum Flow {
    Add(AddFlow),
    Inspect(InspectState),
    Edit(EditState),
    /// Waiting for the name of the film to remove
    Remove,
}

/// Add flow: current state plus the draft being accumulated
#[derive(Debug, Clone)]
pub struct AddFlow {
    pub state: AddState,
    pub draft: Draft,
}

impl AddFlow {
    pub fn start() -> Self {
        Self {
            state: AddState::ChooseMethod,
            draft: Draft::default(),
        }
    }
}

/// States of the add flow
///
/// The manual branch walks the questions in order; the external branch
/// carries the looked-up film inside the state until the user confirms.
#[derive(Debug, Clone)]
pub enum AddState {
    ChooseMethod,
    Name,
    Rating,
    Year,
    Genre,
    Description,
    Tag,
    Review,
    Trailer,
    Poster,
    TmdbTitle,
    TmdbConfirm(Film),
    TmdbTag(Film),
}

/// Answers gathered so far during a manual add
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub year: Option<i64>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub tag: Option<Tag>,
    pub review: Option<Review>,
    pub trailer: Option<String>,
    pub poster_url: Option<String>,
}

impl Draft {
    /// Finish the draft; `None` until every required field is present.
    /// Nothing is persisted before this succeeds.
    pub fn build(self) -> Option<Film> {
        Some(Film {
            name: self.name?,
            rating: self.rating?,
            year: self.year?,
            genre: self.genre?,
            description: self.description?,
            tag: self.tag,
            review: self.review,
            poster_url: self.poster_url,
            trailer: self.trailer,
        })
    }
}

/// States of the inspect queries that need a follow-up answer
#[derive(Debug, Clone)]
pub enum InspectState {
    Name,
    Rating,
    Year,
    Genre,
    Description,
    Tag,
    Random,
    /// Offering to add an externally looked-up film after a local miss
    ConfirmAdd(Film),
}

/// States of the edit flow
#[derive(Debug, Clone)]
pub enum EditState {
    Name,
    ChooseField { name: String },
    NewValue { name: String, field: EditField },
}
