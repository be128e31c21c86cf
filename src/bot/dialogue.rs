use crate::core::curriculum::{Language, Level};
use serde::{Deserialize, Serialize};
pub use teloxide::dispatching::dialogue::InMemStorage;

/// Where a conversation currently stands.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Idle,
    AwaitingLanguage,
    AwaitingLevel,
    AwaitingSubmission,
    Graded,
    Cancelled,
}

impl Stage {
    pub fn is_active(self) -> bool {
        matches!(
            self,
            Stage::AwaitingLanguage | Stage::AwaitingLevel | Stage::AwaitingSubmission
        )
    }
}

/// Per-chat record kept in the dialogue storage for one attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub stage: Stage,
    pub language: Option<Language>,
    pub level: Option<Level>,
    pub prompt_text: Option<String>,
    pub submitted_text: Option<String>,
}

impl Session {
    pub fn started() -> Self {
        Self {
            stage: Stage::AwaitingLanguage,
            ..Self::default()
        }
    }
}

pub type Dialogue = teloxide::dispatching::dialogue::Dialogue<Session, InMemStorage<Session>>;
