//! Film record persistence
//!
//! Reads fail open: any load error is logged and an empty collection is
//! returned so inspect queries never block on storage trouble. Writes fail
//! closed: the caller learns about the failure and reports it to the user.

use crate::models::{Film, Review, Tag};
use crate::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Load all films for a user, in storage (insertion) order
///
/// Returns an empty collection on any storage failure; the failure is
/// logged, not surfaced.
pub async fn load_films(pool: &SqlitePool, user_id: i64) -> Vec<Film> {
    match fetch_films(pool, user_id).await {
        Ok(films) => films,
        Err(e) => {
            tracing::error!(user_id, error = %e, "Failed to load films, returning empty collection");
            Vec::new()
        }
    }
}

async fn fetch_films(pool: &SqlitePool, user_id: i64) -> Result<Vec<Film>> {
    let rows = sqlx::query(
        r#"
        SELECT name, rating, year, genre, description, tag, review, poster_url, trailer
        FROM films
        WHERE user_id = ?
        ORDER BY rowid
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_film).collect())
}

fn row_to_film(row: &SqliteRow) -> Film {
    let tag: Option<String> = row.get("tag");
    let review: Option<String> = row.get("review");

    Film {
        name: row.get("name"),
        rating: row.get("rating"),
        year: row.get("year"),
        genre: row.get("genre"),
        description: row.get("description"),
        tag: tag.as_deref().and_then(Tag::parse),
        review: review.as_deref().and_then(Review::parse),
        poster_url: row.get("poster_url"),
        trailer: row.get("trailer"),
    }
}

/// Insert or fully overwrite a film keyed by `(user_id, name)`
///
/// Returns `false` on failure; the error is logged here.
pub async fn save_film(pool: &SqlitePool, user_id: i64, film: &Film) -> bool {
    match upsert_film(pool, user_id, film).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(user_id, name = %film.name, error = %e, "Failed to save film");
            false
        }
    }
}

async fn upsert_film(pool: &SqlitePool, user_id: i64, film: &Film) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO films (
            user_id, name, rating, year, genre, description, tag, review, poster_url, trailer
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id, name) DO UPDATE SET
            rating = excluded.rating,
            year = excluded.year,
            genre = excluded.genre,
            description = excluded.description,
            tag = excluded.tag,
            review = excluded.review,
            poster_url = excluded.poster_url,
            trailer = excluded.trailer
        "#,
    )
    .bind(user_id)
    .bind(&film.name)
    .bind(film.rating)
    .bind(film.year)
    .bind(&film.genre)
    .bind(&film.description)
    .bind(film.tag.map(|t| t.as_str()))
    .bind(film.review.map(|r| r.as_str()))
    .bind(&film.poster_url)
    .bind(&film.trailer)
    .execute(pool)
    .await?;

    Ok(())
}

/// Remove the keyed film if present
pub async fn delete_film(pool: &SqlitePool, user_id: i64, name: &str) -> Result<()> {
    sqlx::query("DELETE FROM films WHERE user_id = ? AND name = ?")
        .bind(user_id)
        .bind(name)
        .execute(pool)
        .await?;

    Ok(())
}
