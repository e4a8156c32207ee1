//! Remove flow: a single name prompt

use crate::db::films::{delete_film, load_films};
use crate::engine::{ConversationEngine, Reply};
use crate::format::escape_html;

impl ConversationEngine {
    pub(super) async fn handle_remove(&self, user_id: i64, text: &str) -> Reply {
        let name = text.trim();
        let films = load_films(&self.db, user_id).await;
        if !films.iter().any(|f| f.name == name) {
            return Reply::main("Movie not found in database. Cancelling.");
        }

        match delete_film(&self.db, user_id, name).await {
            Ok(()) => Reply::main(format!("Movie <b>{}</b> deleted.", escape_html(name))),
            Err(e) => {
                tracing::error!(user_id, name = %name, error = %e, "Failed to delete film");
                Reply::main("Error deleting movie.")
            }
        }
    }
}
