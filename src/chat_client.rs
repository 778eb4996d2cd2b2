use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::ChatConfig;
use crate::conversation::{Message, Role};
use crate::error::ChatError;
use crate::http_client::chat_http_client;
use crate::prompt::{SEARCH_TOOL_LABEL, system_instruction};

pub const EMPTY_REPLY_FALLBACK: &str =
    "Não consegui encontrar informações sobre esses jogos no momento.";
pub const REQUEST_FAILED_FALLBACK: &str =
    "Ocorreu um erro ao tentar buscar as informações na web. Tente novamente.";

const API_KEY_HEADER: &str = "x-goog-api-key";

pub trait ChatBackend: Send + Sync {
    /// Sends `text` after `history` and returns the reply to show.
    ///
    /// `on_tool_call` fires once, before the request goes out. Only missing
    /// credentials surface as `Err`; remote failures come back as a fallback
    /// reply.
    fn send_message(
        &self,
        history: &[Message],
        text: &str,
        on_tool_call: &mut dyn FnMut(&str),
    ) -> Result<String, ChatError>;
}

/// Gemini `generateContent` with Google Search grounding.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: ChatConfig,
}

impl GeminiClient {
    pub fn new(config: ChatConfig) -> Self {
        Self { config }
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    pub fn build_request(
        &self,
        history: &[Message],
        text: &str,
        today: NaiveDate,
    ) -> GenerateContentRequest {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|m| Content {
                role: wire_role(m.role).to_string(),
                parts: vec![Part {
                    text: m.content.clone(),
                }],
            })
            .collect();
        contents.push(Content {
            role: "user".to_string(),
            parts: vec![Part {
                text: text.to_string(),
            }],
        });

        GenerateContentRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: system_instruction(today),
                }],
            },
            contents,
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        }
    }

    fn generate(&self, api_key: &str, request: &GenerateContentRequest) -> Result<String> {
        let client = chat_http_client()?;
        let resp = client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .send()
            .context("gemini request failed")?;
        let status = resp.status();
        let body = resp.text().context("failed reading gemini body")?;
        if !status.is_success() {
            let snippet = body.trim().chars().take(300).collect::<String>();
            return Err(anyhow::anyhow!("gemini http {}: {}", status, snippet));
        }
        let parsed = parse_generate_response(&body)?;
        tracing::debug!(
            sources = parsed.grounding_sources,
            chars = parsed.text.len(),
            "gemini reply received"
        );
        Ok(parsed.text)
    }
}

impl ChatBackend for GeminiClient {
    fn send_message(
        &self,
        history: &[Message],
        text: &str,
        on_tool_call: &mut dyn FnMut(&str),
    ) -> Result<String, ChatError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(ChatError::MissingApiKey);
        };

        let request = self.build_request(history, text, Local::now().date_naive());
        on_tool_call(SEARCH_TOOL_LABEL);

        match self.generate(api_key, &request) {
            Ok(reply) if reply.is_empty() => Ok(EMPTY_REPLY_FALLBACK.to_string()),
            Ok(reply) => Ok(reply),
            Err(err) => {
                tracing::error!("gemini error: {err:#}");
                Ok(REQUEST_FAILED_FALLBACK.to_string())
            }
        }
    }
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Model | Role::System => "model",
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: SystemInstruction,
    pub contents: Vec<Content>,
    pub tools: Vec<Tool>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoogleSearch {}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReply {
    pub text: String,
    pub grounding_sources: usize,
}

/// Joins the text parts of the first candidate; an absent candidate yields
/// empty text.
pub fn parse_generate_response(raw: &str) -> Result<GeneratedReply> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(raw.trim()).context("invalid gemini json")?;
    let Some(candidate) = parsed.candidates.into_iter().next() else {
        return Ok(GeneratedReply {
            text: String::new(),
            grounding_sources: 0,
        });
    };
    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    let grounding_sources = candidate
        .grounding_metadata
        .map(|m| m.grounding_chunks.len())
        .unwrap_or(0);
    Ok(GeneratedReply {
        text,
        grounding_sources,
    })
}
