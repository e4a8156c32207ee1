//! Language hint detection for metadata lookups
//!
//! Maps the detected language of a film title to the TMDB locale used for
//! search, so that e.g. a Cyrillic title queries localized metadata.
//! Detection failure falls back to English.

/// TMDB locale code for the language `text` appears to be written in
pub fn tmdb_language(text: &str) -> &'static str {
    match whatlang::detect(text).map(|info| info.lang()) {
        Some(whatlang::Lang::Rus) => "ru-RU",
        Some(whatlang::Lang::Ukr) => "uk-UA",
        _ => "en-US",
    }
}
