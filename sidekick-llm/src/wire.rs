//! Chat Completions request and response shapes.
//!
//! Both hosted providers speak this wire format, so the payload builder and
//! the response extraction live here; the per-provider clients differ only
//! in base URL and headers.

use serde::{Deserialize, Serialize};
use sidekick_common::{Result, SidekickError};
use sidekick_http::HttpError;

use crate::traits::{LlmResponse, Prompt};

pub(crate) const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
pub(crate) const MODELS_PATH: &str = "models";
pub(crate) const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

/// Message content is a plain string for text, an array of parts when an
/// image rides along.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub model: Option<String>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Usage {
    pub total_tokens: Option<u32>,
}

/// Page returned by `GET /models`, used for health probes.
#[derive(Debug, Deserialize)]
pub(crate) struct ModelsPage {
    #[serde(default)]
    pub data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelEntry {
    pub id: String,
}

/// Reasoning-family models reject sampler knobs and expect an effort hint
/// instead. Routed ids like `openai/o1-mini` count too.
pub(crate) fn is_reasoning_model(model: &str) -> bool {
    let name = model.rsplit('/').next().unwrap_or(model);
    name == "o1" || name.starts_with("o1-")
}

/// Assemble the request for a prompt, encoding any attached image.
pub(crate) async fn build_chat_request(
    model: &str,
    prompt: &Prompt,
    system_prompt: Option<&str>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
) -> Result<ChatRequest> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system_prompt {
        messages.push(ChatMessage {
            role: "system",
            content: MessageContent::Text(system.to_string()),
        });
    }

    let content = match prompt {
        Prompt::Text(text) => MessageContent::Text(text.clone()),
        Prompt::WithImage { text, image } => MessageContent::Parts(vec![
            ContentPart::Text { text: text.clone() },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: image.to_data_url().await?,
                },
            },
        ]),
    };
    messages.push(ChatMessage {
        role: "user",
        content,
    });

    let reasoning = is_reasoning_model(model);
    Ok(ChatRequest {
        model: model.to_string(),
        messages,
        temperature: if reasoning {
            None
        } else {
            Some(temperature.unwrap_or(DEFAULT_TEMPERATURE))
        },
        max_tokens,
        reasoning_effort: reasoning.then_some("low"),
        response_format: reasoning.then_some(ResponseFormat { kind: "text" }),
    })
}

/// Extract the completion, rejecting responses with no usable text.
pub(crate) fn into_llm_response(response: ChatResponse) -> Result<LlmResponse> {
    let ChatResponse {
        choices,
        model,
        usage,
    } = response;

    let text = choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(SidekickError::Provider(
            "provider returned an empty completion".into(),
        ));
    }

    Ok(LlmResponse {
        text,
        model,
        tokens_used: usage.and_then(|u| u.total_tokens),
    })
}

/// Map transport failures into the provider error surface.
pub(crate) fn http_to_provider(err: HttpError) -> SidekickError {
    SidekickError::Provider(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageSource;

    #[tokio::test]
    async fn text_prompt_serializes_content_as_a_string() {
        let request =
            build_chat_request("gpt-4o", &Prompt::text("hello"), None, Some(64), None)
                .await
                .unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hello");
        assert_eq!(value["max_tokens"], 64);
        assert_eq!(
            value["temperature"].as_f64(),
            Some(f64::from(DEFAULT_TEMPERATURE))
        );
        assert!(value.get("reasoning_effort").is_none());
        assert!(value.get("response_format").is_none());
    }

    #[tokio::test]
    async fn image_prompt_becomes_a_two_part_message() {
        let prompt = Prompt::WithImage {
            text: "what does this page show?".into(),
            image: ImageSource::Base64 {
                data: "QUJD".into(),
                media_type: "image/png".into(),
            },
        };
        let request = build_chat_request("gpt-4o", &prompt, Some("be terse"), None, None)
            .await
            .unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], "be terse");

        let parts = &value["messages"][1]["content"];
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[0]["text"], "what does this page show?");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(parts[1]["image_url"]["url"], "data:image/png;base64,QUJD");
    }

    #[tokio::test]
    async fn reasoning_models_drop_sampler_knobs() {
        let request =
            build_chat_request("o1-mini", &Prompt::text("Reply."), None, None, Some(0.9))
                .await
                .unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert!(value.get("temperature").is_none());
        assert_eq!(value["reasoning_effort"], "low");
        assert_eq!(value["response_format"]["type"], "text");
    }

    #[test]
    fn reasoning_detection_handles_routed_model_ids() {
        assert!(is_reasoning_model("o1"));
        assert!(is_reasoning_model("o1-preview"));
        assert!(is_reasoning_model("openai/o1-mini"));
        assert!(!is_reasoning_model("gpt-4o"));
        assert!(!is_reasoning_model("openai/gpt-4o"));
    }

    #[test]
    fn empty_completions_are_provider_errors() {
        let missing = ChatResponse {
            choices: vec![],
            model: Some("gpt-4o".into()),
            usage: None,
        };
        let err = into_llm_response(missing).unwrap_err();
        assert!(matches!(err, SidekickError::Provider(_)));

        let blank = ChatResponse {
            choices: vec![ChatChoice {
                message: AssistantMessage {
                    content: Some("  \n".into()),
                },
            }],
            model: None,
            usage: None,
        };
        assert!(into_llm_response(blank).is_err());
    }

    #[test]
    fn usable_completions_carry_model_and_usage() {
        let response = ChatResponse {
            choices: vec![ChatChoice {
                message: AssistantMessage {
                    content: Some("four".into()),
                },
            }],
            model: Some("gpt-4o-2024-08-06".into()),
            usage: Some(Usage {
                total_tokens: Some(17),
            }),
        };
        let out = into_llm_response(response).unwrap();
        assert_eq!(out.text, "four");
        assert_eq!(out.model.as_deref(), Some("gpt-4o-2024-08-06"));
        assert_eq!(out.tokens_used, Some(17));
    }
}
