use crate::errors::AppError;
use crate::models::{ChatTurn, Mode, SessionView, StatLog};
use crate::prompt::{self, REFLECTION_REQUEST};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Sessions untouched for this long are discarded.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(12 * 60 * 60);

const BUSY: &str = "still waiting for the previous reply";

pub const GREETING: &str = "Tell me how your health was today. Walk me through what you ate, \
how you worked out, and how you felt. We'll go from there.";

/// One visitor's journal. Lives in memory until it sits idle past the store's TTL.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub transcript: Vec<ChatTurn>,
    pub stats: StatLog,
    pub mode: Mode,
    pub last_check_in: Option<NaiveDate>,
    pub streak: u32,
    pub reflection_pending: bool,
    awaiting_reply: bool,
}

impl Session {
    pub fn checked_in_today(&self, today: NaiveDate) -> bool {
        self.last_check_in == Some(today)
    }

    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Marks today complete. Returns false when today was already counted.
    pub fn complete_today(&mut self, today: NaiveDate) -> bool {
        if self.checked_in_today(today) {
            return false;
        }
        self.last_check_in = Some(today);
        self.streak = self.streak.saturating_add(1);
        true
    }

    /// Clears the conversation and the stat log. Streak bookkeeping is untouched.
    /// Refused while a reply is pending so the reply cannot land in the new day.
    pub fn new_day(&mut self) -> Result<(), AppError> {
        if self.awaiting_reply {
            return Err(AppError::conflict(BUSY));
        }
        self.transcript.clear();
        self.stats = StatLog::default();
        self.reflection_pending = false;
        Ok(())
    }

    /// Refused while a reply is pending: that reply answers a request assembled
    /// without the reflection addendum and must not consume the flag.
    pub fn request_reflection(&mut self) -> Result<(), AppError> {
        if self.awaiting_reply {
            return Err(AppError::conflict(BUSY));
        }
        self.reflection_pending = true;
        self.transcript.push(ChatTurn::user(REFLECTION_REQUEST));
        Ok(())
    }

    /// Records the user's message and returns the messages to send upstream.
    /// The session is then marked busy until `finish_check_in` or `abort_check_in`.
    pub fn begin_check_in(&mut self, message: &str) -> Result<Vec<ChatTurn>, AppError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::bad_request("check-in message must not be empty"));
        }
        if self.awaiting_reply {
            return Err(AppError::conflict(BUSY));
        }

        let messages = prompt::assemble(
            self.mode,
            self.reflection_pending,
            &self.stats,
            &self.transcript,
            message,
        );
        self.transcript.push(ChatTurn::user(message));
        self.awaiting_reply = true;
        Ok(messages)
    }

    pub fn finish_check_in(&mut self, reply: String) {
        self.transcript.push(ChatTurn::assistant(reply));
        self.reflection_pending = false;
        self.awaiting_reply = false;
    }

    pub fn abort_check_in(&mut self) {
        self.awaiting_reply = false;
    }

    pub fn view(&self, today: NaiveDate) -> SessionView {
        SessionView {
            date: today.to_string(),
            streak: self.streak,
            checked_in_today: self.checked_in_today(today),
            reflection_pending: self.reflection_pending,
            mode: self.mode,
            stats: self.stats.clone(),
            greeting: self.transcript.is_empty().then(|| GREETING.to_string()),
            transcript: self.transcript.clone(),
        }
    }
}

#[derive(Debug)]
struct Entry {
    session: Session,
    last_seen: Instant,
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<String, Entry>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TTL)
    }
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_ttl,
        }
    }

    /// Looks up the session for `id`, starting a fresh one when `id` is missing or
    /// unknown. Returns the id actually in use.
    pub fn ensure(&mut self, id: Option<&str>) -> (String, &mut Session) {
        self.ensure_at(id, Instant::now())
    }

    pub fn ensure_at(&mut self, id: Option<&str>, now: Instant) -> (String, &mut Session) {
        self.evict_idle(now);
        let id = match id.filter(|id| self.sessions.contains_key(*id)) {
            Some(id) => id.to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                tracing::info!(sessions = self.sessions.len() + 1, "started new session");
                id
            }
        };
        let entry = self.sessions.entry(id.clone()).or_insert_with(|| Entry {
            session: Session::default(),
            last_seen: now,
        });
        entry.last_seen = now;
        (id, &mut entry.session)
    }

    /// Existing session only; never creates one.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.get_mut(id).map(|entry| &mut entry.session)
    }

    /// Sessions with a reply in flight are kept so the reply has somewhere to land.
    fn evict_idle(&mut self, now: Instant) {
        let before = self.sessions.len();
        let ttl = self.idle_ttl;
        self.sessions.retain(|_, entry| {
            entry.session.awaiting_reply || now.saturating_duration_since(entry.last_seen) < ttl
        });
        let evicted = before - self.sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = self.sessions.len(), "discarded idle sessions");
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.sessions.len()
    }
}
