//! Request/response wrapper around the reasoning backend

use super::fallback::fallback_reply;
use super::parse::{parse_reply, ParsedReply};
use super::{Reasoner, Reply};
use crate::config::{AffectBounds, LlmConfig};
use crate::llm::{LlmMessage, LlmRequest, LlmService};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Adapter producing a [`Reply`] for every input, whatever the backend does
pub struct ReasoningAdapter {
    llm: Arc<dyn LlmService>,
    system_prompt: String,
    timeout: Duration,
    max_tokens: u32,
    temperature: f32,
    bounds: AffectBounds,
}

impl ReasoningAdapter {
    pub fn new(llm: Arc<dyn LlmService>, config: &LlmConfig, bounds: AffectBounds) -> Self {
        Self {
            llm,
            system_prompt: system_prompt(bounds),
            timeout: config.timeout,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            bounds,
        }
    }

    fn build_request(&self, input_text: &str) -> LlmRequest {
        LlmRequest {
            messages: vec![
                LlmMessage::system(self.system_prompt.clone()),
                LlmMessage::user(input_text),
            ],
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
        }
    }
}

#[async_trait]
impl Reasoner for ReasoningAdapter {
    async fn converse(&self, input_text: &str) -> Reply {
        let request = self.build_request(input_text);

        let reply = match timeout(self.timeout, self.llm.complete(&request)).await {
            Ok(Ok(response)) => {
                let parsed = parse_reply(&response.content);
                match &parsed {
                    ParsedReply::Strict(_) => {}
                    ParsedReply::Extracted(_) => tracing::warn!(
                        content = %response.content,
                        "Reply had extra text around the JSON object; extracted it"
                    ),
                    ParsedReply::Truncated(_) => tracing::warn!(
                        content = %response.content,
                        "Reply was not a JSON object; speaking truncated raw text"
                    ),
                }
                parsed.into_reply()
            }
            Ok(Err(e)) => {
                if e.kind.is_critical() {
                    tracing::error!(error = %e, kind = e.kind.as_str(), "Reasoning backend returned an unusable body; using fallback reply");
                } else if e.kind.is_unreachable() {
                    tracing::warn!(error = %e, kind = e.kind.as_str(), "Reasoning backend unreachable; using fallback reply");
                } else {
                    tracing::warn!(error = %e, kind = e.kind.as_str(), "Reasoning backend failed; using fallback reply");
                }
                fallback_reply(input_text)
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "Reasoning backend timed out; using fallback reply"
                );
                fallback_reply(input_text)
            }
        };

        reply.clamped(self.bounds)
    }
}

fn system_prompt(bounds: AffectBounds) -> String {
    format!(
        r#"You are IRIS, a personal healthcare companion.
Your traits: Calm, robotic but caring, minimal, gentle.
Your responses must be VERY short (under 15 words).
You must output ONLY valid JSON in this format:
{{
  "response_text": "Your spoken response here",
  "delta_valence": 0.0,
  "delta_arousal": 0.0
}}
delta_valence is a float between -{v} (sad/concerned) and {v} (happy/encouraging).
delta_arousal is a float between -{a} (calm) and {a} (alert).
Do not output anything else."#,
        v = bounds.valence,
        a = bounds.arousal,
    )
}
