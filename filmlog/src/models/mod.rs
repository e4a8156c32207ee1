//! Data model for the film collection

pub mod film;

pub use film::{Film, Review, Tag};
