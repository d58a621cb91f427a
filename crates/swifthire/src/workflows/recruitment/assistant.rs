use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AssistantConfig;

const CHAT_SYSTEM_PROMPT: &str = "You are a helpful job assistant for the SwiftHire platform.";
const DESCRIPTION_SYSTEM_PROMPT: &str = "You are an expert HR assistant. Write a compelling, professional job description. Structure it with these Markdown headings: 'About the Role', 'Key Responsibilities', and 'Requirements'. Incorporate the location and salary benefits into the text where appropriate. Keep it under 2000 characters.";
const MATCH_SYSTEM_PROMPT: &str = "You are an expert ATS. Compare the candidate profile to the job description. Return valid JSON only (no markdown) with keys: \"score\" (integer 0-100), \"reasoning\" (concise 1-sentence summary), \"missingKeywords\" (array of strings, max 3).";
const ANALYSIS_SYSTEM_PROMPT: &str = "You are a Senior Technical Recruiter. Analyze this candidate profile. Return valid JSON only (no markdown) with these keys: \"summary\" (string, 1 professional sentence about their level), \"strengths\" (array of strings, top 3 hard/soft skills), \"questions\" (array of strings, 3 tailored interview questions to ask them).";

pub const CHAT_FALLBACK: &str = "I apologize, the AI service is temporarily unavailable.";
pub const DESCRIPTION_FALLBACK: &str =
    "The job description assistant is temporarily unavailable. Please write the description manually.";
const MATCH_DESCRIPTION_LIMIT: usize = 1500;

/// One chat-completion exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("assistant is not configured")]
    NotConfigured,
    #[error("completion request timed out after {0:?}")]
    Timeout(Duration),
    #[error("completion transport failed: {0}")]
    Transport(String),
    #[error("completion response was malformed: {0}")]
    Malformed(String),
}

/// Text-in, text-out completion provider.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, AssistantError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// OpenRouter-compatible chat completions over HTTPS.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    config: AssistantConfig,
}

impl OpenRouterClient {
    pub fn new(config: AssistantConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, AssistantError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AssistantError::NotConfigured)?;

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
        };

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .header("X-Title", "SwiftHire")
            .json(&body)
            .send()
            .await
            .map_err(|err| AssistantError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::Transport(format!(
                "provider returned status {status}"
            )));
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|err| AssistantError::Malformed(err.to_string()))?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AssistantError::Malformed("no choices in response".to_string()))
    }
}

/// Client used when no provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCompletion;

#[async_trait]
impl CompletionClient for DisabledCompletion {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, AssistantError> {
        Err(AssistantError::NotConfigured)
    }
}

/// Provider picked from configuration. A missing API key selects the disabled client.
#[derive(Debug, Clone)]
pub enum ConfiguredCompletion {
    Remote(OpenRouterClient),
    Disabled(DisabledCompletion),
}

impl ConfiguredCompletion {
    pub fn from_config(config: &AssistantConfig) -> Self {
        if config.api_key.is_some() {
            Self::Remote(OpenRouterClient::new(config.clone()))
        } else {
            Self::Disabled(DisabledCompletion)
        }
    }

    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

#[async_trait]
impl CompletionClient for ConfiguredCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, AssistantError> {
        match self {
            Self::Remote(client) => client.complete(request).await,
            Self::Disabled(client) => client.complete(request).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAnalysis {
    pub score: u8,
    pub reasoning: String,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
}

impl MatchAnalysis {
    pub fn unavailable() -> Self {
        Self {
            score: 0,
            reasoning: "AI analysis unavailable.".to_string(),
            missing_keywords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateAnalysis {
    pub summary: String,
    pub strengths: Vec<String>,
    pub questions: Vec<String>,
}

impl CandidateAnalysis {
    pub fn unavailable() -> Self {
        Self {
            summary: "Analysis unavailable.".to_string(),
            strengths: vec!["N/A".to_string()],
            questions: vec!["Could not generate questions.".to_string()],
        }
    }
}

/// Inputs for a generated job description.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobDescriptionBrief {
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub salary_min: Option<u32>,
    #[serde(default)]
    pub salary_max: Option<u32>,
}

impl JobDescriptionBrief {
    fn prompt(&self) -> String {
        let mut prompt = format!(
            "Write a professional job description for a '{}' position.",
            self.title.trim()
        );
        if let Some(location) = self.location.as_deref().filter(|v| !v.trim().is_empty()) {
            prompt.push_str(&format!(" The job is located in {}.", location.trim()));
        }
        if let Some(job_type) = self.job_type.as_deref().filter(|v| !v.trim().is_empty()) {
            prompt.push_str(&format!(" It is a {} role.", job_type.trim()));
        }
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => {
                prompt.push_str(&format!(" The offered salary range is ${min} - ${max}."))
            }
            (Some(min), None) => prompt.push_str(&format!(" The offered salary range is ${min}.")),
            _ => {}
        }
        prompt
    }
}

/// Bounded-time wrapper that turns every provider failure into a fallback value.
pub struct Assistant<C> {
    client: Arc<C>,
    timeout: Duration,
}

impl<C> Assistant<C>
where
    C: CompletionClient + 'static,
{
    pub fn new(client: Arc<C>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub async fn chat(&self, message: &str) -> String {
        let request = CompletionRequest {
            system_prompt: CHAT_SYSTEM_PROMPT.to_string(),
            user_prompt: message.trim().to_string(),
        };
        self.complete(request)
            .await
            .unwrap_or_else(|| CHAT_FALLBACK.to_string())
    }

    pub async fn job_description(&self, brief: &JobDescriptionBrief) -> String {
        let request = CompletionRequest {
            system_prompt: DESCRIPTION_SYSTEM_PROMPT.to_string(),
            user_prompt: brief.prompt(),
        };
        self.complete(request)
            .await
            .unwrap_or_else(|| DESCRIPTION_FALLBACK.to_string())
    }

    pub async fn match_candidate(&self, job_description: &str, profile: &str) -> MatchAnalysis {
        let description: String = job_description.chars().take(MATCH_DESCRIPTION_LIMIT).collect();
        let request = CompletionRequest {
            system_prompt: MATCH_SYSTEM_PROMPT.to_string(),
            user_prompt: format!(
                "JOB DESCRIPTION:\n{description}\n\nCANDIDATE PROFILE:\n{profile}"
            ),
        };

        match self.complete(request).await {
            Some(reply) => parse_reply::<MatchAnalysis>(&reply)
                .map(|mut analysis| {
                    analysis.score = analysis.score.min(100);
                    analysis
                })
                .unwrap_or_else(MatchAnalysis::unavailable),
            None => MatchAnalysis::unavailable(),
        }
    }

    pub async fn analyze_candidate(&self, profile: &str) -> CandidateAnalysis {
        let request = CompletionRequest {
            system_prompt: ANALYSIS_SYSTEM_PROMPT.to_string(),
            user_prompt: format!("CANDIDATE PROFILE:\n{profile}"),
        };

        match self.complete(request).await {
            Some(reply) => {
                parse_reply::<CandidateAnalysis>(&reply).unwrap_or_else(CandidateAnalysis::unavailable)
            }
            None => CandidateAnalysis::unavailable(),
        }
    }

    async fn complete(&self, request: CompletionRequest) -> Option<String> {
        let outcome = match tokio::time::timeout(self.timeout, self.client.complete(request)).await
        {
            Ok(result) => result,
            Err(_) => Err(AssistantError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(reply) if !reply.trim().is_empty() => Some(reply),
            Ok(_) => {
                warn!("assistant returned an empty reply");
                None
            }
            Err(error) => {
                warn!(%error, "assistant call degraded to fallback");
                None
            }
        }
    }
}

/// Strips markdown code fences a model may wrap around JSON.
pub(crate) fn strip_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

fn parse_reply<T: for<'de> Deserialize<'de>>(reply: &str) -> Option<T> {
    match serde_json::from_str(strip_fences(reply)) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(%error, "assistant reply was not the expected JSON");
            None
        }
    }
}
