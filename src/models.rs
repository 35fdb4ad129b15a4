use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Coaching style the assistant uses for replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Beginner, Mode::Intermediate, Mode::Advanced];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Beginner => "Beginner",
            Mode::Intermediate => "Intermediate",
            Mode::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatLog {
    pub steps: Option<u32>,
    pub water_oz: Option<u32>,
    pub calories: Option<u32>,
    pub active_minutes: Option<u32>,
    pub workout: Option<String>,
    pub notes: Option<String>,
}

/// Sidebar form payload. Numbers arrive as any JSON number so negative, fractional or
/// oversized values are rejected with a message naming the field.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StatsUpdate {
    pub steps: Option<serde_json::Number>,
    pub water_oz: Option<serde_json::Number>,
    pub calories: Option<serde_json::Number>,
    pub active_minutes: Option<serde_json::Number>,
    pub workout: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub message: String,
    #[serde(default)]
    pub mode: Option<Mode>,
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: Mode,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub date: String,
    pub streak: u32,
    pub checked_in_today: bool,
    pub reflection_pending: bool,
    pub mode: Mode,
    pub stats: StatLog,
    pub greeting: Option<String>,
    pub transcript: Vec<ChatTurn>,
}
