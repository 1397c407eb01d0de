use serde::{Deserialize, Serialize};

use crate::types::{Content, FinishReason, GenerationConfig, SafetyRating, SafetySetting};
use crate::{Error, Result};

/// Request body for `generateContent` and `streamGenerateContent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The conversation so far, ending with the message to answer.
    pub contents: Vec<Content>,

    /// Developer-set system instruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,

    /// Sampling parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,

    /// Per-category blocking thresholds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetySetting>,
}

impl GenerateContentRequest {
    /// Create a new request from the given contents.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            ..Self::default()
        }
    }

    /// Sets the generation config.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    /// Sets the safety settings.
    pub fn with_safety_settings(mut self, settings: Vec<SafetySetting>) -> Self {
        self.safety_settings = settings;
        self
    }

    /// Sets the system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(Content {
            role: None,
            parts: vec![crate::types::Part::text(instruction)],
        });
        self
    }
}

/// A response candidate generated by the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content.
    #[serde(default)]
    pub content: Option<Content>,

    /// Why the model stopped generating; absent on intermediate stream chunks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,

    /// Safety ratings for this candidate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_ratings: Vec<SafetyRating>,

    /// Index of the candidate in the list of candidates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

/// Feedback about the prompt itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// If set, the prompt was blocked and no candidates are returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,

    /// Ratings for safety of the prompt.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_ratings: Vec<SafetyRating>,
}

/// Token accounting for a request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Number of tokens in the prompt.
    #[serde(default)]
    pub prompt_token_count: u32,

    /// Total number of tokens across all generated candidates.
    #[serde(default)]
    pub candidates_token_count: u32,

    /// Total token count for the request.
    #[serde(default)]
    pub total_token_count: u32,
}

/// Response from `generateContent`, or one chunk of `streamGenerateContent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate responses from the model.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// The prompt's feedback related to the content filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,

    /// Token usage; on streams usually only the last chunk carries it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,

    /// The model version used to generate the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Finish reason of the first candidate, if any.
    pub fn finish_reason(&self) -> Option<&FinishReason> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_ref())
    }

    /// Text of the first candidate.
    ///
    /// A blocked prompt, or a candidate that was withheld by a content policy
    /// without producing any text, is reported as [`Error::Blocked`].  A
    /// response without candidates yields empty text; streams end with such
    /// usage-only chunks.
    pub fn text(&self) -> Result<String> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_ref())
        {
            return Err(Error::blocked(
                "the prompt was blocked",
                Some(reason.clone()),
            ));
        }
        let Some(candidate) = self.candidates.first() else {
            return Ok(String::new());
        };
        let text = candidate
            .content
            .as_ref()
            .map(Content::text)
            .unwrap_or_default();
        if text.is_empty()
            && let Some(reason) = candidate.finish_reason.as_ref()
            && reason.is_policy_block()
        {
            return Err(Error::blocked(
                "the response was blocked",
                Some(reason.to_string()),
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn request_wire_shape() {
        let request = GenerateContentRequest::new(vec![
            Content::user("Healthcare related question: hi"),
            Content::model("Hello!"),
        ])
        .with_generation_config(GenerationConfig::default())
        .with_safety_settings(vec![SafetySetting::new(
            crate::types::HarmCategory::Harassment,
            crate::types::HarmBlockThreshold::BlockMediumAndAbove,
        )]);

        assert_eq!(
            to_value(&request).unwrap(),
            json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "Healthcare related question: hi"}]},
                    {"role": "model", "parts": [{"text": "Hello!"}]}
                ],
                "generationConfig": {
                    "temperature": 0.9,
                    "topP": 1.0,
                    "topK": 1,
                    "maxOutputTokens": 1024
                },
                "safetySettings": [
                    {"category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE"}
                ]
            })
        );
    }

    #[test]
    fn response_text_and_usage() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "No errors found."}]},
                "finishReason": "STOP",
                "index": 0,
                "safetyRatings": [
                    {"category": "HARM_CATEGORY_HARASSMENT", "probability": "NEGLIGIBLE"}
                ]
            }],
            "usageMetadata": {
                "promptTokenCount": 12,
                "candidatesTokenCount": 4,
                "totalTokenCount": 16
            },
            "modelVersion": "gemini-2.0-flash"
        }))
        .unwrap();

        assert_eq!(response.text().unwrap(), "No errors found.");
        assert_eq!(response.finish_reason(), Some(&FinishReason::Stop));
        assert_eq!(response.usage_metadata.unwrap().total_token_count, 16);
    }

    #[test]
    fn blocked_prompt_is_an_error() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        let err = response.text().unwrap_err();
        assert!(err.is_blocked());
    }

    #[test]
    fn blocked_candidate_without_text_is_an_error() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert!(response.text().unwrap_err().is_blocked());
    }

    #[test]
    fn final_stream_chunk_with_stop_and_no_text_is_empty() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": ""}]}, "finishReason": "STOP"}]
        }))
        .unwrap();
        assert_eq!(response.text().unwrap(), "");
    }

    #[test]
    fn usage_only_chunk_is_empty() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "usageMetadata": {"promptTokenCount": 3}
        }))
        .unwrap();
        assert_eq!(response.text().unwrap(), "");
    }
}
