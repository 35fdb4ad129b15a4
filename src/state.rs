use crate::chat::ChatBackend;
use crate::session::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<Mutex<SessionStore>>,
    pub chat: Arc<dyn ChatBackend>,
}

impl AppState {
    pub fn new(chat: Arc<dyn ChatBackend>, idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(SessionStore::new(idle_ttl))),
            chat,
        }
    }
}
