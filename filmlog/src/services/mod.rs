//! External collaborators: TMDB metadata lookup and language detection

pub mod language;
pub mod tmdb_client;

pub use tmdb_client::{TmdbClient, TmdbError, TmdbFilm};
