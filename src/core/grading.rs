//! Graders for learner submissions.

use crate::core::curriculum::{Language, Level};
use crate::core::lang_detect::detect_language;
use crate::core::services::{GradingService, ServiceError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Heuristic feedback used when no language model is configured.
#[derive(Debug, Default)]
pub struct OfflineGrader;

#[async_trait]
impl GradingService for OfflineGrader {
    async fn grade(
        &self,
        language: Language,
        level: Level,
        _prompt: &str,
        submission: &str,
    ) -> Result<String, ServiceError> {
        Ok(offline_feedback(language, level, submission))
    }
}

fn offline_feedback(language: Language, level: Level, submission: &str) -> String {
    let words = submission.split_whitespace().count();
    let sentences = submission
        .split(|c| matches!(c, '.' | '!' | '?'))
        .filter(|s| !s.trim().is_empty())
        .count();
    let (min, max) = level.expected_words();

    let mut lines = vec![format!(
        "📊 {words} words in {sentences} sentence(s)."
    )];

    if words < min {
        lines.push(format!(
            "✏️ At {level} aim for {min}-{max} words; try developing your ideas further."
        ));
    } else if words > max {
        lines.push(format!(
            "✂️ At {level} around {min}-{max} words is enough; try to be more concise."
        ));
    } else {
        lines.push(format!("✅ Good length for {level}."));
    }

    match detect_language(submission) {
        Some(detected) if detected == language => {}
        Some(detected) => lines.push(format!(
            "⚠️ This looks like {detected}, but you chose to practise {language}."
        )),
        None => lines.push(format!(
            "⚠️ I couldn't confirm this is written in {language}."
        )),
    }

    lines.join("\n")
}

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Grades through an OpenAI-compatible chat completions endpoint.
pub struct LlmGrader {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl LlmGrader {
    pub fn new(api_key: String, base_url: &str, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(
        &self,
        language: Language,
        level: Level,
        prompt: &str,
        submission: &str,
    ) -> ChatRequest {
        let system = format!(
            "You are Conversa, a friendly {language} writing teacher. \
             Grade the learner's text against CEFR level {level}. \
             Reply in English with: an overall assessment, the main grammar \
             and vocabulary mistakes with corrections, and one tip to improve."
        );
        let user = format!("Writing prompt: {prompt}\n\nLearner's text:\n{submission}");

        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user,
                },
            ],
        }
    }
}

#[async_trait]
impl GradingService for LlmGrader {
    async fn grade(
        &self,
        language: Language,
        level: Level,
        prompt: &str,
        submission: &str,
    ) -> Result<String, ServiceError> {
        let request = self.build_request(language, level, prompt, submission);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Unavailable(format!("grader returned {status}: {body}")));
        }

        let body: ChatResponse = response.json().await?;
        extract_feedback(body)
    }
}

fn extract_feedback(response: ChatResponse) -> Result<String, ServiceError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ServiceError::Malformed("no feedback in grader response".to_string()))
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
