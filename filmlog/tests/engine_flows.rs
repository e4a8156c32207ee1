//! Integration tests driving full conversations through the engine
//!
//! No external lookup is configured here, so the flows under test are the
//! ones that stay local; the TMDB-backed branches degrade to their
//! not-found replies.

use filmlog::db::films::{load_films, save_film};
use filmlog::engine::{ConversationEngine, Keyboard};
use filmlog::models::{Film, Review, Tag};
use sqlx::SqlitePool;

const USER: i64 = 42;

async fn test_engine() -> (ConversationEngine, SqlitePool) {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    filmlog::db::init_tables(&pool)
        .await
        .expect("Failed to initialize schema");
    (ConversationEngine::new(pool.clone(), None), pool)
}

fn film(name: &str, rating: f64, genre: &str, description: &str, tag: Option<Tag>) -> Film {
    Film {
        name: name.to_string(),
        rating,
        year: 1999,
        genre: genre.to_string(),
        description: description.to_string(),
        tag,
        review: None,
        poster_url: None,
        trailer: None,
    }
}

#[tokio::test]
async fn start_help_and_unknown_messages() {
    let (engine, _pool) = test_engine().await;

    let reply = engine.handle_message(USER, "/start").await;
    assert!(reply.text.contains("Welcome!"));
    assert_eq!(reply.keyboard, Some(Keyboard::Main));

    let reply = engine.handle_message(USER, "/help").await;
    assert!(reply.text.contains("Allowed commands"));

    let reply = engine.handle_message(USER, "abracadabra").await;
    assert!(reply.text.contains("Unknown command"));
    assert_eq!(reply.keyboard, Some(Keyboard::Main));
}

#[tokio::test]
async fn manual_add_flow_commits_once_complete() {
    let (engine, pool) = test_engine().await;

    let reply = engine.handle_message(USER, "Add film").await;
    assert_eq!(reply.text, "Select a method to add a movie:");
    assert_eq!(reply.keyboard, Some(Keyboard::AddMethod));

    let reply = engine.handle_message(USER, "Enter data manually").await;
    assert_eq!(reply.text, "Enter a movie title:");

    let reply = engine.handle_message(USER, "The Matrix").await;
    assert_eq!(reply.text, "Enter movie rating (1 to 10):");

    // Out-of-range rating re-prompts without advancing
    let reply = engine.handle_message(USER, "11").await;
    assert_eq!(reply.text, "Enter a number from 1 to 10");
    assert!(load_films(&pool, USER).await.is_empty());

    let reply = engine.handle_message(USER, "9,5").await;
    assert_eq!(reply.text, "Enter the year the movie was released:");

    let reply = engine.handle_message(USER, "1800").await;
    assert!(reply.text.contains("valid year"));

    let reply = engine.handle_message(USER, "1999").await;
    assert_eq!(reply.text, "Enter the movie genre:");

    let reply = engine.handle_message(USER, "Sci-Fi").await;
    assert_eq!(reply.text, "Enter a description of the movie:");

    let reply = engine
        .handle_message(USER, "A hacker discovers reality is a simulation.")
        .await;
    assert!(reply.text.contains("Write tag for film"));
    assert_eq!(reply.keyboard, Some(Keyboard::ViewedOrNot));

    let reply = engine.handle_message(USER, "Viewed").await;
    assert!(reply.text.contains("review"));

    let reply = engine.handle_message(USER, "skip").await;
    assert!(reply.text.contains("trailer"));

    // Nothing persisted until the final answer
    assert!(load_films(&pool, USER).await.is_empty());

    let reply = engine
        .handle_message(USER, "https://example.com/trailer")
        .await;
    assert!(reply.text.contains("poster"));

    let reply = engine.handle_message(USER, "skip").await;
    assert!(reply.text.contains("saved successfully"));
    assert_eq!(reply.keyboard, Some(Keyboard::Main));
    assert!(engine.is_idle(USER).await);

    let films = load_films(&pool, USER).await;
    assert_eq!(films.len(), 1);
    let saved = &films[0];
    assert_eq!(saved.name, "The Matrix");
    assert_eq!(saved.rating, 9.5);
    assert_eq!(saved.year, 1999);
    assert_eq!(saved.genre, "Sci-Fi");
    assert_eq!(saved.tag, Some(Tag::Viewed));
    assert_eq!(saved.review, None);
    assert_eq!(saved.trailer, Some("https://example.com/trailer".to_string()));
    assert_eq!(saved.poster_url, None);
}

#[tokio::test]
async fn duplicate_name_is_rejected_without_writing() {
    let (engine, pool) = test_engine().await;
    assert!(save_film(&pool, USER, &film("Alien", 8.5, "Horror", "Lifeform.", None)).await);

    engine.handle_message(USER, "Add film").await;
    engine.handle_message(USER, "Enter data manually").await;
    let reply = engine.handle_message(USER, "Alien").await;
    assert!(reply.text.contains("already in database"));

    let films = load_films(&pool, USER).await;
    assert_eq!(films.len(), 1);
    assert_eq!(films[0].rating, 8.5);

    // A different title still works from the same state
    let reply = engine.handle_message(USER, "Aliens").await;
    assert_eq!(reply.text, "Enter movie rating (1 to 10):");
}

#[tokio::test]
async fn cancel_clears_any_flow_without_store_side_effects() {
    let (engine, pool) = test_engine().await;

    engine.handle_message(USER, "Add film").await;
    engine.handle_message(USER, "Enter data manually").await;
    engine.handle_message(USER, "Deep Flow").await;
    engine.handle_message(USER, "8").await;
    assert!(!engine.is_idle(USER).await);

    let reply = engine.handle_message(USER, "/cancel").await;
    assert!(reply.text.contains("Operation cancelled"));
    assert!(engine.is_idle(USER).await);
    assert!(load_films(&pool, USER).await.is_empty());

    let reply = engine.handle_message(USER, "/cancel").await;
    assert!(reply.text.contains("not in the middle"));
}

#[tokio::test]
async fn edit_flow_validates_and_persists_each_field() {
    let (engine, pool) = test_engine().await;
    assert!(save_film(&pool, USER, &film("Alien", 8.5, "Horror", "Lifeform.", None)).await);

    let reply = engine.handle_message(USER, "Edit film").await;
    assert_eq!(reply.text, "Enter a film name to edit:");

    let reply = engine.handle_message(USER, "Alien").await;
    assert!(reply.text.contains("Select field to edit"));
    assert_eq!(reply.keyboard, Some(Keyboard::Edit));

    // Unknown field does not consume the turn
    let reply = engine.handle_message(USER, "Director").await;
    assert!(reply.text.contains("Invalid field"));

    let reply = engine.handle_message(USER, "Rating").await;
    assert_eq!(reply.text, "Enter a new value for Rating:");

    let reply = engine.handle_message(USER, "11").await;
    assert!(reply.text.contains("Rating must be from 1 to 10"));
    assert_eq!(load_films(&pool, USER).await[0].rating, 8.5);

    let reply = engine.handle_message(USER, "7,5").await;
    assert!(reply.text.contains("updated successfully"));
    assert_eq!(load_films(&pool, USER).await[0].rating, 7.5);

    // Back at field selection: edit another field in the same session
    let reply = engine.handle_message(USER, "Review").await;
    assert_eq!(reply.text, "Enter a new value for Review:");
    let reply = engine.handle_message(USER, "like").await;
    assert!(reply.text.contains("updated successfully"));
    assert_eq!(load_films(&pool, USER).await[0].review, Some(Review::Like));

    let reply = engine.handle_message(USER, "Back to main menu").await;
    assert_eq!(reply.text, "Select a menu item:");
    assert!(engine.is_idle(USER).await);
}

#[tokio::test]
async fn edit_rename_moves_the_record() {
    let (engine, pool) = test_engine().await;
    assert!(save_film(&pool, USER, &film("Alein", 8.5, "Horror", "Lifeform.", None)).await);

    engine.handle_message(USER, "Edit film").await;
    engine.handle_message(USER, "Alein").await;
    engine.handle_message(USER, "Name").await;
    let reply = engine.handle_message(USER, "Alien").await;
    assert!(reply.text.contains("updated successfully"));

    let films = load_films(&pool, USER).await;
    assert_eq!(films.len(), 1);
    assert_eq!(films[0].name, "Alien");
    assert_eq!(films[0].rating, 8.5);
}

#[tokio::test]
async fn edit_unknown_name_aborts() {
    let (engine, _pool) = test_engine().await;

    engine.handle_message(USER, "Edit film").await;
    let reply = engine.handle_message(USER, "Nope").await;
    assert_eq!(reply.text, "Movie not found.");
    assert!(engine.is_idle(USER).await);
}

#[tokio::test]
async fn remove_flow_deletes_or_aborts() {
    let (engine, pool) = test_engine().await;
    assert!(save_film(&pool, USER, &film("Alien", 8.5, "Horror", "Lifeform.", None)).await);

    engine.handle_message(USER, "Remove film").await;
    let reply = engine.handle_message(USER, "Nope").await;
    assert!(reply.text.contains("Movie not found"));
    assert!(engine.is_idle(USER).await);
    assert_eq!(load_films(&pool, USER).await.len(), 1);

    engine.handle_message(USER, "Remove film").await;
    let reply = engine.handle_message(USER, "Alien").await;
    assert!(reply.text.contains("deleted"));
    assert!(load_films(&pool, USER).await.is_empty());
}

#[tokio::test]
async fn inspect_all_sorts_by_rating_descending() {
    let (engine, pool) = test_engine().await;

    let reply = engine.handle_message(USER, "Inspect all films").await;
    assert_eq!(reply.text, "No movies.");

    assert!(save_film(&pool, USER, &film("Low", 3.0, "Drama", "Quiet.", None)).await);
    assert!(save_film(&pool, USER, &film("High", 9.0, "Action", "Loud.", None)).await);

    let reply = engine.handle_message(USER, "Inspect all films").await;
    let high = reply.text.find("High").expect("High missing");
    let low = reply.text.find("Low").expect("Low missing");
    assert!(high < low, "higher-rated film should come first");
}

#[tokio::test]
async fn inspect_by_rating_reprompts_on_garbage() {
    let (engine, pool) = test_engine().await;
    assert!(save_film(&pool, USER, &film("Alien", 7.5, "Horror", "Lifeform.", None)).await);

    engine.handle_message(USER, "Inspect by rating").await;
    let reply = engine.handle_message(USER, "lots").await;
    assert!(reply.text.contains("valid number"));
    assert!(!engine.is_idle(USER).await);

    let reply = engine.handle_message(USER, "7.5").await;
    assert!(reply.text.contains("Alien"));
    assert!(engine.is_idle(USER).await);
}

#[tokio::test]
async fn inspect_by_year_genre_and_tag_filter() {
    let (engine, pool) = test_engine().await;
    assert!(
        save_film(
            &pool,
            USER,
            &film("Alien", 8.5, "Horror, Science Fiction", "Lifeform.", Some(Tag::Viewed)),
        )
        .await
    );
    assert!(
        save_film(
            &pool,
            USER,
            &film("Heat", 8.0, "Crime", "A heist.", Some(Tag::NotViewed)),
        )
        .await
    );

    engine.handle_message(USER, "Inspect by year").await;
    let reply = engine.handle_message(USER, "1999").await;
    assert!(reply.text.contains("Alien") && reply.text.contains("Heat"));

    engine.handle_message(USER, "Inspect by genre").await;
    let reply = engine.handle_message(USER, "science").await;
    assert!(reply.text.contains("Alien"));
    assert!(!reply.text.contains("Heat"));

    engine.handle_message(USER, "Inspect by tag").await;
    let reply = engine.handle_message(USER, "Not viewed").await;
    assert!(reply.text.contains("Heat"));
    assert!(!reply.text.contains("Alien"));
}

#[tokio::test]
async fn inspect_by_description_ranks_similar_films() {
    let (engine, pool) = test_engine().await;
    assert!(
        save_film(
            &pool,
            USER,
            &film("Space Battle", 8.0, "Sci-Fi", "an epic war in space", None),
        )
        .await
    );
    assert!(
        save_film(&pool, USER, &film("Ledger", 4.0, "Drama", "qqqq zzzz", None)).await
    );

    engine.handle_message(USER, "Inspect by description").await;
    let reply = engine.handle_message(USER, "a great space war epic").await;
    assert!(reply.text.contains("Most similar descriptions"));
    assert!(reply.text.contains("Space Battle"));
    assert!(reply.text.contains("Similarity:"));
    assert!(!reply.text.contains("Ledger"));
}

#[tokio::test]
async fn inspect_by_name_finds_local_films() {
    let (engine, pool) = test_engine().await;
    assert!(save_film(&pool, USER, &film("Alien", 8.5, "Horror", "Lifeform.", None)).await);

    engine.handle_message(USER, "Inspect by name").await;
    let reply = engine.handle_message(USER, "Alien").await;
    assert!(reply.text.contains("<b>Alien</b>"));
    assert!(engine.is_idle(USER).await);

    // Without a lookup client a miss is simply not found
    engine.handle_message(USER, "Inspect by name").await;
    let reply = engine.handle_message(USER, "Solaris").await;
    assert_eq!(reply.text, "Film not found.");
}

#[tokio::test]
async fn inspect_random_picks_from_own_collection() {
    let (engine, pool) = test_engine().await;
    assert!(save_film(&pool, USER, &film("Alien", 8.5, "Horror", "Lifeform.", None)).await);

    engine.handle_message(USER, "Inspect random film").await;
    let reply = engine.handle_message(USER, "banana").await;
    assert_eq!(reply.text, "Use keyboard buttons");

    let reply = engine.handle_message(USER, "From own collection").await;
    assert!(reply.text.contains("Random film"));
    assert!(reply.text.contains("Alien"));
    assert!(engine.is_idle(USER).await);
}

#[tokio::test]
async fn menu_buttons_switch_flows_discarding_drafts() {
    let (engine, pool) = test_engine().await;
    assert!(save_film(&pool, USER, &film("Alien", 8.5, "Horror", "Lifeform.", None)).await);

    engine.handle_message(USER, "Add film").await;
    engine.handle_message(USER, "Enter data manually").await;
    engine.handle_message(USER, "Half-Entered Film").await;

    // Switching to another flow drops the draft
    engine.handle_message(USER, "Remove film").await;
    let reply = engine.handle_message(USER, "Alien").await;
    assert!(reply.text.contains("deleted"));

    let films = load_films(&pool, USER).await;
    assert!(films.is_empty());
}
