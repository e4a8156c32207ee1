//! Per-user conversation engine
//!
//! Drives the add / inspect / edit / remove flows as a finite state machine
//! keyed by user id. Each inbound message is dispatched in precedence order:
//! commands, then menu buttons (which switch flows, discarding any active
//! one), then the active flow's state handler, then the unknown-command
//! fallback.
//!
//! The session map hands a user's flow out by value for the duration of one
//! message, so no lock is held across await points and two messages for the
//! same user never interleave inside a flow.

pub mod add;
pub mod edit;
pub mod flow;
pub mod inspect;
pub mod remove;

pub use edit::EditField;
pub use flow::{AddFlow, AddState, Draft, EditState, Flow, InspectState};

use std::collections::HashMap;

use serde::Serialize;
use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::services::TmdbClient;

/// Keyboard layout hint attached to a reply
///
/// Mirrors the reply keyboards of the chat surface; `Hide` removes any
/// visible keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyboard {
    Main,
    Inspect,
    Edit,
    AddMethod,
    YesNo,
    ViewedOrNot,
    Random,
    Hide,
}

impl Keyboard {
    /// Button rows for this keyboard; empty for `Hide`
    pub fn buttons(&self) -> Vec<Vec<&'static str>> {
        match self {
            Keyboard::Main => vec![
                vec!["Add film"],
                vec!["Inspect films"],
                vec!["Edit film"],
                vec!["Remove film"],
            ],
            Keyboard::Inspect => vec![
                vec!["Inspect all films", "Inspect by name"],
                vec!["Inspect by rating", "Inspect by year", "Inspect by tag"],
                vec![
                    "Inspect by genre",
                    "Inspect by description",
                    "Inspect random film",
                ],
                vec!["Back to main menu"],
            ],
            Keyboard::Edit => vec![
                vec!["Name", "Rating"],
                vec!["Year", "Genre"],
                vec!["Description", "Poster", "Review"],
                vec!["Back to main menu"],
            ],
            Keyboard::AddMethod => vec![vec!["Enter data manually"], vec!["Search via TMDb"]],
            Keyboard::YesNo => vec![vec!["yes"], vec!["no"]],
            Keyboard::ViewedOrNot => vec![vec!["Viewed"], vec!["Not viewed"]],
            Keyboard::Random => vec![vec!["From own collection"], vec!["Via TMDb"]],
            Keyboard::Hide => vec![],
        }
    }
}

/// One outbound chat message
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    /// `None` leaves whatever keyboard is currently shown
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn with(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }

    /// Reply returning the user to the main menu
    pub fn main(text: impl Into<String>) -> Self {
        Self::with(text, Keyboard::Main)
    }

    /// Re-prompt that keeps the current keyboard
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }
}

/// Conversation engine: session store plus its collaborators
pub struct ConversationEngine {
    pub(crate) db: SqlitePool,
    pub(crate) tmdb: Option<TmdbClient>,
    sessions: RwLock<HashMap<i64, Flow>>,
}

impl ConversationEngine {
    /// Create an engine; a missing or unusable API key disables external
    /// lookup but nothing else.
    pub fn new(db: SqlitePool, tmdb_api_key: Option<String>) -> Self {
        let tmdb = tmdb_api_key.and_then(|key| {
            if key.is_empty() {
                tracing::warn!("TMDB API key is empty, film lookup disabled");
                return None;
            }
            match TmdbClient::new(key) {
                Ok(client) => {
                    tracing::info!("TMDB client initialized");
                    Some(client)
                }
                Err(e) => {
                    tracing::error!("Failed to initialize TMDB client: {}", e);
                    None
                }
            }
        });

        Self {
            db,
            tmdb,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Handle one inbound message and produce the reply
    pub async fn handle_message(&self, user_id: i64, text: &str) -> Reply {
        let text = text.trim();

        if let Some(reply) = self.handle_command(user_id, text).await {
            return reply;
        }
        if let Some(reply) = self.handle_menu(user_id, text).await {
            return reply;
        }

        let flow = self.sessions.write().await.remove(&user_id);
        match flow {
            Some(Flow::Add(flow)) => self.handle_add(user_id, text, flow).await,
            Some(Flow::Inspect(state)) => self.handle_inspect(user_id, text, state).await,
            Some(Flow::Edit(state)) => self.handle_edit(user_id, text, state).await,
            Some(Flow::Remove) => self.handle_remove(user_id, text).await,
            None => Reply::main("Unknown command. Use menu buttons."),
        }
    }

    /// True when the user has no active flow
    pub async fn is_idle(&self, user_id: i64) -> bool {
        !self.sessions.read().await.contains_key(&user_id)
    }

    /// Commands work in any state; `/cancel` clears the active flow
    /// unconditionally.
    async fn handle_command(&self, user_id: i64, text: &str) -> Option<Reply> {
        match text {
            "/start" => {
                self.clear_flow(user_id).await;
                Some(Reply::main(
                    "Welcome! type '/help' to see commands\nSelect a menu item:",
                ))
            }
            "/help" => Some(Reply::plain(
                "Allowed commands:\n\n/start - Start bot\n/help - See all commands\n/cancel - Cancelling operation",
            )),
            "/cancel" => {
                let had_flow = self.sessions.write().await.remove(&user_id).is_some();
                Some(if had_flow {
                    Reply::main("Operation cancelled. Returning to main menu")
                } else {
                    Reply::main("You are not in the middle of any action")
                })
            }
            _ => None,
        }
    }

    /// Menu buttons switch flows; any in-progress draft is discarded
    async fn handle_menu(&self, user_id: i64, text: &str) -> Option<Reply> {
        match text {
            "Add film" => Some(
                self.continue_with(
                    user_id,
                    Flow::Add(AddFlow::start()),
                    Reply::with("Select a method to add a movie:", Keyboard::AddMethod),
                )
                .await,
            ),
            "Inspect films" => {
                self.clear_flow(user_id).await;
                Some(Reply::with("Select an option:", Keyboard::Inspect))
            }
            "Inspect all films" => {
                self.clear_flow(user_id).await;
                Some(self.inspect_all(user_id).await)
            }
            "Inspect by name" => {
                Some(
                    self.continue_with(
                        user_id,
                        Flow::Inspect(InspectState::Name),
                        Reply::with("Enter the movie title:", Keyboard::Hide),
                    )
                    .await,
                )
            }
            "Inspect by rating" => {
                Some(
                    self.continue_with(
                        user_id,
                        Flow::Inspect(InspectState::Rating),
                        Reply::with("Enter the movie rating:", Keyboard::Hide),
                    )
                    .await,
                )
            }
            "Inspect by year" => {
                Some(
                    self.continue_with(
                        user_id,
                        Flow::Inspect(InspectState::Year),
                        Reply::with("Enter the movie year:", Keyboard::Hide),
                    )
                    .await,
                )
            }
            "Inspect by genre" => {
                Some(
                    self.continue_with(
                        user_id,
                        Flow::Inspect(InspectState::Genre),
                        Reply::with("Enter the movie genre:", Keyboard::Hide),
                    )
                    .await,
                )
            }
            "Inspect by description" => {
                Some(
                    self.continue_with(
                        user_id,
                        Flow::Inspect(InspectState::Description),
                        Reply::with("Enter the movie description:", Keyboard::Hide),
                    )
                    .await,
                )
            }
            "Inspect by tag" => {
                Some(
                    self.continue_with(
                        user_id,
                        Flow::Inspect(InspectState::Tag),
                        Reply::with("Enter the movie tag:", Keyboard::ViewedOrNot),
                    )
                    .await,
                )
            }
            "Inspect random film" => {
                Some(
                    self.continue_with(
                        user_id,
                        Flow::Inspect(InspectState::Random),
                        Reply::with("Select an option:", Keyboard::Random),
                    )
                    .await,
                )
            }
            "Edit film" => {
                Some(
                    self.continue_with(
                        user_id,
                        Flow::Edit(EditState::Name),
                        Reply::with("Enter a film name to edit:", Keyboard::Hide),
                    )
                    .await,
                )
            }
            "Remove film" => {
                Some(
                    self.continue_with(
                        user_id,
                        Flow::Remove,
                        Reply::with("Enter a film name to remove:", Keyboard::Hide),
                    )
                    .await,
                )
            }
            "Back to main menu" => {
                self.clear_flow(user_id).await;
                Some(Reply::main("Select a menu item:"))
            }
            _ => None,
        }
    }

    /// Store the user's next flow state and return the reply
    pub(crate) async fn continue_with(&self, user_id: i64, flow: Flow, reply: Reply) -> Reply {
        self.sessions.write().await.insert(user_id, flow);
        reply
    }

    pub(crate) async fn clear_flow(&self, user_id: i64) {
        self.sessions.write().await.remove(&user_id);
    }
}
