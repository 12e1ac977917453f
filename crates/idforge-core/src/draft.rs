//! AI drafting of IBO hierarchies and 4C activity plans.

use crate::config::AiConfig;
use crate::error::{IdError, Result};
use crate::persona::Persona;
use crate::session::Session;
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "2023-06-01";

const IBO_SYSTEM: &str = r"You are an instructional designer.
Write Intended Business Outcomes for a training session as a markdown outline.

Use exactly these line shapes:
# Business Objective 1: <objective>
## WIIFM: <what the learner gains>
### Performance Metric: <measurable change, e.g. 20% increase in ...>
- **Observable Behavior**: <what the learner visibly does>
- **Learning Objective**: <what the learner must know or be able to do>

Repeat the hierarchy for each business objective. No prose outside the outline.";

const FOUR_C_SYSTEM: &str = r"You are an instructional designer.
Plan activities for a training session using the 4C model:
Connection, Concept, Concrete Practice, Conclusion.

For each phase give a heading, then one or more activities with a title,
a duration in minutes, and a one-sentence description.";

// ---------------------------------------------------------------------------
// DraftRequest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftRequest {
    pub persona_context: String,
    pub topic: String,
    pub business_goals: String,
}

impl DraftRequest {
    /// Build a request from a session's chosen persona and topic.
    pub fn from_session(session: &Session, persona: &Persona) -> Result<Self> {
        let topic = required(&session.topic, "topic")?;
        let business_goals = required(&session.business_goals, "business_goals")?;
        Ok(Self {
            persona_context: persona.context(),
            topic,
            business_goals,
        })
    }

    fn user_message(&self) -> String {
        format!(
            "{}\n\nTopic: {}\n\nBusiness goals:\n{}",
            self.persona_context, self.topic, self.business_goals
        )
    }
}

fn required(value: &Option<String>, field: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(IdError::MissingField {
            field: field.to_string(),
            action: "draft".to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Drafter
// ---------------------------------------------------------------------------

pub trait Drafter {
    /// Draft an IBO outline in the shape the classifier recognises.
    fn draft_ibos(&self, request: &DraftRequest) -> Result<String>;

    /// Draft a 4C activity plan supporting the given IBO text.
    fn draft_four_c(&self, request: &DraftRequest, ibos: &str) -> Result<String>;
}

// ---------------------------------------------------------------------------
// AnthropicDrafter
// ---------------------------------------------------------------------------

pub struct AnthropicDrafter {
    client: reqwest::blocking::Client,
    api_key: String,
    config: AiConfig,
}

impl AnthropicDrafter {
    pub fn new(config: AiConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("idforge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Reads the API key from the environment variable named in `config`.
    pub fn from_env(config: AiConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| IdError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(config, api_key)
    }

    fn request(&self, system: &str, user_message: String) -> Result<String> {
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system,
            messages: vec![Message {
                role: "user",
                content: user_message,
            }],
        };

        tracing::info!(model = %self.config.model, "sending drafting request");
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(IdError::Ai(format!("API error ({status}): {text}")));
        }

        let parsed: MessagesResponse = response.json()?;
        let text = parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| IdError::Ai("response contained no text".to_string()))?;
        tracing::debug!(chars = text.len(), "drafting response received");
        Ok(text)
    }
}

impl Drafter for AnthropicDrafter {
    fn draft_ibos(&self, request: &DraftRequest) -> Result<String> {
        self.request(IBO_SYSTEM, request.user_message())
    }

    fn draft_four_c(&self, request: &DraftRequest, ibos: &str) -> Result<String> {
        let message = format!(
            "{}\n\nIntended business outcomes:\n{}",
            request.user_message(),
            ibos
        );
        self.request(FOUR_C_SYSTEM, message)
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
