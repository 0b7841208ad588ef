use async_trait::async_trait;
use reqwest::{
    Client,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};

use crate::domain::ticket::TicketDraft;
use crate::error::{AppError, AppResult};
use crate::services::LanguageModelService;

const SERVICE: &str = "OpenAI";
const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const TEMPERATURE: f32 = 0.3;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You are a helpful assistant that creates Jira ticket content from rough user input.
Given the user's rough description, generate:
- summary: A concise one-line title for the Jira ticket (max 100 chars)
- description: A clear, structured description suitable for a Jira ticket

Respond in the same language as the input.
Respond ONLY with valid JSON in this format: {\"summary\": \"...\", \"description\": \"...\"}";

pub struct OpenAiClient {
    http: Client,
    api_key: Option<String>,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, model: Option<String>) -> Self {
        Self {
            http: Client::new(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::Configuration("OpenAI API key not configured".to_string()))
    }
}

#[async_trait]
impl LanguageModelService for OpenAiClient {
    async fn draft_ticket(&self, rough_input: &str) -> AppResult<TicketDraft> {
        let api_key = self.api_key()?;
        let request_body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: rough_input,
                },
            ],
            temperature: TEMPERATURE,
        };

        tracing::debug!(model = %self.model, "requesting ticket draft");
        let response = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|err| AppError::Transport(format!("failed to call OpenAI: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| AppError::Transport(format!("failed to read OpenAI response: {err}")))?;
        if !status.is_success() {
            return Err(AppError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatResponse = serde_json::from_str(&body).map_err(|err| {
            AppError::MalformedResponse(format!("failed to parse OpenAI response: {err}"))
        })?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        parse_ticket_draft(&content)
    }
}

/// Parses the model's answer, which must be a JSON object with non-empty
/// `summary` and `description` strings.
pub fn parse_ticket_draft(content: &str) -> AppResult<TicketDraft> {
    if content.trim().is_empty() {
        return Err(AppError::MalformedResponse(
            "OpenAI returned empty response".to_string(),
        ));
    }

    let parsed: DraftPayload = serde_json::from_str(content).map_err(|err| {
        AppError::MalformedResponse(format!("OpenAI response is not valid JSON: {err}"))
    })?;

    match (parsed.summary, parsed.description) {
        (Some(summary), Some(description)) if !summary.is_empty() && !description.is_empty() => {
            Ok(TicketDraft {
                summary,
                description,
            })
        }
        _ => Err(AppError::MalformedResponse(
            "OpenAI response missing summary or description".to_string(),
        )),
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct DraftPayload {
    summary: Option<String>,
    description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_field_answer() {
        let draft = parse_ticket_draft(r#"{"summary":"S","description":"D"}"#).unwrap();
        assert_eq!(
            draft,
            TicketDraft {
                summary: "S".to_string(),
                description: "D".to_string(),
            }
        );
    }

    #[test]
    fn rejects_empty_object_as_malformed() {
        assert!(matches!(
            parse_ticket_draft("{}"),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn rejects_empty_body_as_malformed() {
        assert!(matches!(
            parse_ticket_draft(""),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn rejects_invalid_json_as_malformed() {
        assert!(matches!(
            parse_ticket_draft("Sure! Here is your ticket: summary=..."),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn rejects_blank_field() {
        assert!(matches!(
            parse_ticket_draft(r#"{"summary":"S","description":""}"#),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn request_carries_system_and_user_messages() {
        let request = ChatRequest {
            model: DEFAULT_MODEL,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: "ログイン画面にパスワードリセット",
                },
            ],
            temperature: TEMPERATURE,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["temperature"], 0.3_f32 as f64);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "ログイン画面にパスワードリセット");
    }

    #[tokio::test]
    async fn missing_api_key_is_a_configuration_error() {
        let client = OpenAiClient::new(None, None);
        let result = client.draft_ticket("add dark mode").await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
