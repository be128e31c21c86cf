//! The writing-practice dialogue.
//!
//! Every input is first resolved against the transition table in [`plan`],
//! which is pure. [`DialogueMachine::handle`] then performs the transition's
//! effects (prompt lookup, grading, storage writes) and turns recoverable
//! errors into replies for the user.
//!
//! The session is read from storage, the external call is made with no
//! storage access outstanding, and only then is the new session written. A
//! failed call therefore leaves the stored session exactly as it was.

use crate::bot::dialogue::{Session, Stage};
use crate::core::curriculum::{Language, Level};
use crate::core::replies;
use crate::core::services::{with_timeout, GradingService, PromptSource, ServiceError};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use teloxide::dispatching::dialogue::{Dialogue, Storage};
use thiserror::Error;

/// Inbound message as seen by the dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Start,
    Cancel,
    Help,
    About,
    Text(String),
}

/// Outbound reply: text plus an optional list of choices to offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub choices: Option<Vec<String>>,
}

impl Reply {
    pub fn text(text: String) -> Self {
        Self { text, choices: None }
    }

    pub fn with_choices(text: String, choices: Vec<String>) -> Self {
        Self {
            text,
            choices: Some(choices),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Stage the conversation is in after this input.
    pub stage: Stage,
    pub reply: Reply,
    /// Session as it stood after the input; `None` once discarded.
    pub session: Option<Session>,
}

#[derive(Debug, Error)]
pub enum DialogueError {
    #[error("Input does not match what {0:?} expects")]
    InvalidInput(Stage),
    #[error("External service unavailable: {0}")]
    ServiceUnavailable(#[from] ServiceError),
    #[error("No active session")]
    SessionNotFound,
    #[error("Session storage failed: {0}")]
    Storage(String),
}

/// Result of looking an input up in the transition table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Begin,
    Help,
    About,
    Cancel,
    SelectLanguage(Language),
    RetryLanguage,
    SelectLevel(Level),
    RetryLevel,
    Submit(String),
    RetrySubmission,
    NoSession,
}

pub fn plan(stage: Stage, input: &Input) -> Transition {
    match (stage, input) {
        (_, Input::Start) => Transition::Begin,
        (_, Input::Help) => Transition::Help,
        (_, Input::About) => Transition::About,
        (stage, Input::Cancel) if stage.is_active() => Transition::Cancel,
        (_, Input::Cancel) => Transition::NoSession,
        (Stage::AwaitingLanguage, Input::Text(text)) => {
            Language::from_label(text).map_or(Transition::RetryLanguage, Transition::SelectLanguage)
        }
        (Stage::AwaitingLevel, Input::Text(text)) => {
            Level::from_label(text).map_or(Transition::RetryLevel, Transition::SelectLevel)
        }
        (Stage::AwaitingSubmission, Input::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Transition::RetrySubmission
            } else {
                Transition::Submit(text.to_string())
            }
        }
        (_, Input::Text(_)) => Transition::NoSession,
    }
}

pub struct DialogueMachine {
    prompts: Arc<dyn PromptSource>,
    grader: Arc<dyn GradingService>,
    service_timeout: Duration,
}

impl DialogueMachine {
    pub fn new(
        prompts: Arc<dyn PromptSource>,
        grader: Arc<dyn GradingService>,
        service_timeout: Duration,
    ) -> Self {
        Self {
            prompts,
            grader,
            service_timeout,
        }
    }

    /// Applies `input` to the chat behind `dialogue`.
    ///
    /// Only storage failures are returned as errors; everything else ends in
    /// a reply telling the user what to do next.
    pub async fn handle<S>(
        &self,
        dialogue: &Dialogue<Session, S>,
        input: Input,
        first_name: Option<&str>,
    ) -> Result<Outcome, DialogueError>
    where
        S: Storage<Session> + ?Sized + Send + Sync,
        S::Error: Display,
    {
        let chat_id = dialogue.chat_id();
        let session = dialogue.get().await.map_err(storage_error)?.unwrap_or_default();
        let transition = plan(session.stage, &input);
        log::debug!("Chat {}: {:?} at {:?}", chat_id, transition, session.stage);

        match self.apply(dialogue, session.clone(), transition, first_name).await {
            Ok(outcome) => {
                log::info!("Chat {} moved to {:?}", chat_id, outcome.stage);
                Ok(outcome)
            }
            Err(DialogueError::Storage(e)) => Err(DialogueError::Storage(e)),
            Err(e) => {
                log::warn!("Chat {} recovered from: {}", chat_id, e);
                Ok(recover(e, session))
            }
        }
    }

    async fn apply<S>(
        &self,
        dialogue: &Dialogue<Session, S>,
        session: Session,
        transition: Transition,
        first_name: Option<&str>,
    ) -> Result<Outcome, DialogueError>
    where
        S: Storage<Session> + ?Sized + Send + Sync,
        S::Error: Display,
    {
        match transition {
            Transition::Begin => {
                let fresh = Session::started();
                dialogue.update(fresh.clone()).await.map_err(storage_error)?;
                Ok(Outcome {
                    stage: fresh.stage,
                    reply: Reply::with_choices(replies::greeting(first_name), Language::labels()),
                    session: Some(fresh),
                })
            }
            Transition::Help => Ok(informational(session, replies::help())),
            Transition::About => Ok(informational(session, replies::about())),
            Transition::Cancel => {
                dialogue.exit().await.map_err(storage_error)?;
                Ok(Outcome {
                    stage: Stage::Cancelled,
                    reply: Reply::text(replies::farewell()),
                    session: None,
                })
            }
            Transition::SelectLanguage(language) => {
                let next = Session {
                    stage: Stage::AwaitingLevel,
                    language: Some(language),
                    ..session
                };
                dialogue.update(next.clone()).await.map_err(storage_error)?;
                Ok(Outcome {
                    stage: next.stage,
                    reply: Reply::with_choices(replies::choose_level(language), Level::labels()),
                    session: Some(next),
                })
            }
            Transition::SelectLevel(level) => {
                let language = session.language.ok_or(DialogueError::SessionNotFound)?;
                let prompt =
                    with_timeout(self.service_timeout, self.prompts.get_prompt(language, level))
                        .await?;
                let next = Session {
                    stage: Stage::AwaitingSubmission,
                    level: Some(level),
                    prompt_text: Some(prompt.clone()),
                    ..session
                };
                dialogue.update(next.clone()).await.map_err(storage_error)?;
                Ok(Outcome {
                    stage: next.stage,
                    reply: Reply::text(replies::present_prompt(language, level, &prompt)),
                    session: Some(next),
                })
            }
            Transition::Submit(text) => {
                let (Some(language), Some(level), Some(prompt)) =
                    (session.language, session.level, session.prompt_text.as_deref())
                else {
                    return Err(DialogueError::SessionNotFound);
                };
                let feedback = with_timeout(
                    self.service_timeout,
                    self.grader.grade(language, level, prompt, &text),
                )
                .await?;
                let graded = Session {
                    stage: Stage::Graded,
                    submitted_text: Some(text),
                    ..session
                };
                dialogue.exit().await.map_err(storage_error)?;
                Ok(Outcome {
                    stage: Stage::Graded,
                    reply: Reply::text(replies::present_feedback(&feedback)),
                    session: Some(graded),
                })
            }
            Transition::RetryLanguage => Err(DialogueError::InvalidInput(Stage::AwaitingLanguage)),
            Transition::RetryLevel => Err(DialogueError::InvalidInput(Stage::AwaitingLevel)),
            Transition::RetrySubmission => {
                Err(DialogueError::InvalidInput(Stage::AwaitingSubmission))
            }
            Transition::NoSession => Err(DialogueError::SessionNotFound),
        }
    }
}

fn informational(session: Session, text: String) -> Outcome {
    Outcome {
        stage: session.stage,
        reply: Reply::text(text),
        session: session.stage.is_active().then_some(session),
    }
}

/// Turns a recoverable error into a reply; the session stays as it was.
fn recover(error: DialogueError, session: Session) -> Outcome {
    let reply = match error {
        DialogueError::InvalidInput(Stage::AwaitingLanguage) => {
            Reply::with_choices(replies::choose_language_again(), Language::labels())
        }
        DialogueError::InvalidInput(Stage::AwaitingLevel) => {
            Reply::with_choices(replies::choose_level_again(), Level::labels())
        }
        DialogueError::InvalidInput(_) => Reply::text(replies::submission_empty()),
        DialogueError::ServiceUnavailable(_) => Reply::text(replies::service_apology()),
        DialogueError::SessionNotFound | DialogueError::Storage(_) => {
            Reply::text(replies::no_session())
        }
    };

    Outcome {
        stage: session.stage,
        reply,
        session: session.stage.is_active().then_some(session),
    }
}

fn storage_error<E: Display>(error: E) -> DialogueError {
    DialogueError::Storage(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Input {
        Input::Text(s.to_string())
    }

    #[test]
    fn start_always_begins_afresh() {
        for stage in [
            Stage::Idle,
            Stage::AwaitingLanguage,
            Stage::AwaitingLevel,
            Stage::AwaitingSubmission,
        ] {
            assert_eq!(plan(stage, &Input::Start), Transition::Begin);
        }
    }

    #[test]
    fn cancel_only_applies_to_active_sessions() {
        assert_eq!(plan(Stage::AwaitingLevel, &Input::Cancel), Transition::Cancel);
        assert_eq!(plan(Stage::AwaitingSubmission, &Input::Cancel), Transition::Cancel);
        assert_eq!(plan(Stage::Idle, &Input::Cancel), Transition::NoSession);
    }

    #[test]
    fn language_stage_matches_labels() {
        assert_eq!(
            plan(Stage::AwaitingLanguage, &text("French")),
            Transition::SelectLanguage(Language::French)
        );
        assert_eq!(plan(Stage::AwaitingLanguage, &text("German")), Transition::RetryLanguage);
        assert_eq!(plan(Stage::AwaitingLanguage, &text("")), Transition::RetryLanguage);
    }

    #[test]
    fn level_stage_rejects_languages() {
        assert_eq!(
            plan(Stage::AwaitingLevel, &text("C1")),
            Transition::SelectLevel(Level::C1)
        );
        assert_eq!(plan(Stage::AwaitingLevel, &text("Spanish")), Transition::RetryLevel);
    }

    #[test]
    fn submission_is_trimmed_and_must_not_be_blank() {
        assert_eq!(
            plan(Stage::AwaitingSubmission, &text("  Hola  ")),
            Transition::Submit("Hola".to_string())
        );
        assert_eq!(
            plan(Stage::AwaitingSubmission, &text("   ")),
            Transition::RetrySubmission
        );
    }

    #[test]
    fn text_without_session_is_reported() {
        assert_eq!(plan(Stage::Idle, &text("Spanish")), Transition::NoSession);
    }

    #[test]
    fn help_and_about_ignore_stage() {
        assert_eq!(plan(Stage::AwaitingLevel, &Input::Help), Transition::Help);
        assert_eq!(plan(Stage::Idle, &Input::About), Transition::About);
    }

    #[test]
    fn service_failure_keeps_session() {
        let session = Session {
            stage: Stage::AwaitingLevel,
            language: Some(Language::French),
            ..Session::default()
        };
        let outcome = recover(
            DialogueError::ServiceUnavailable(ServiceError::Unavailable("down".into())),
            session.clone(),
        );
        assert_eq!(outcome.stage, Stage::AwaitingLevel);
        assert_eq!(outcome.session, Some(session));
        assert_eq!(outcome.reply.text, replies::service_apology());
    }
}
