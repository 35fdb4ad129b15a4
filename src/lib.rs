pub mod app;
pub mod chat;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod prompt;
pub mod session;
pub mod state;
pub mod stats;
pub mod ui;

pub use app::router;
pub use chat::{ChatBackend, ChatError, HttpChatBackend};
pub use config::Config;
pub use state::AppState;
