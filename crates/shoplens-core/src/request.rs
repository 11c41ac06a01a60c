//! Chat-completion request and response bodies for the segmentation call.

use crate::asset::{ImageAsset, MediaTypePolicy};
use crate::segment::Segment;
use serde::{Deserialize, Serialize};

/// Fixed user-role instruction sent next to the image.
pub const USER_INSTRUCTION: &str =
    "Segment this retail customer by analyzing their appearance, posture, and context.";

/// System-role instruction: the closed label taxonomy plus the
/// single-label output directive.
pub fn system_instruction() -> String {
    format!(
        "You are an AI assistant for real-time customer segmentation in retail. \
         Given a customer's image, classify them as one of: {}. \
         Return only the segment label. Do not explain your reasoning. \
         Do not output anything except the label.",
        Segment::taxonomy_list()
    )
}

/// One segmentation request. Built fresh per submission, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    system: String,
    image_data_url: String,
    instruction: String,
}

impl ClassificationRequest {
    pub fn new(image: &ImageAsset, policy: MediaTypePolicy) -> Self {
        Self {
            system: system_instruction(),
            image_data_url: image.data_url(policy),
            instruction: USER_INSTRUCTION.to_string(),
        }
    }

    /// Wire body for the given model.
    pub fn to_body(&self, model: &str) -> ChatRequest {
        ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: MessageContent::Text(self.system.clone()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: MessageContent::Parts(vec![
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: self.image_data_url.clone(),
                            },
                        },
                        ContentPart::Text {
                            text: self.instruction.clone(),
                        },
                    ]),
                },
            ],
        }
    }
}

// --- Request types ---

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

/// System messages carry a plain string; user messages carry parts.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

// --- Response types ---

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    /// `choices[0].message.content`, if present and non-null.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg_asset() -> ImageAsset {
        ImageAsset::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0]).unwrap()
    }

    #[test]
    fn test_system_instruction_lists_every_segment() {
        let system = system_instruction();
        for seg in Segment::ALL {
            assert!(system.contains(seg.as_str()), "missing {seg}");
        }
        assert!(system.contains("Return only the segment label."));
    }

    #[test]
    fn test_body_shape() {
        let request = ClassificationRequest::new(&jpeg_asset(), MediaTypePolicy::Jpeg);
        let body = serde_json::to_value(request.to_body("meta-llama/llama-4-maverick:free"))
            .unwrap();

        assert_eq!(body["model"], "meta-llama/llama-4-maverick:free");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);

        assert_eq!(messages[0]["role"], "system");
        assert!(messages[0]["content"].is_string());

        assert_eq!(messages[1]["role"], "user");
        let parts = messages[1]["content"].as_array().unwrap();
        assert_eq!(parts[0]["type"], "image_url");
        let url = parts[0]["image_url"]["url"].as_str().unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(parts[1]["type"], "text");
        assert_eq!(parts[1]["text"], USER_INSTRUCTION);
    }

    #[test]
    fn test_body_has_no_extra_top_level_fields() {
        let request = ClassificationRequest::new(&jpeg_asset(), MediaTypePolicy::Jpeg);
        let body = serde_json::to_value(request.to_body("m")).unwrap();
        let mut keys: Vec<&str> = body
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["messages", "model"]);
    }

    #[test]
    fn test_parse_response_content() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"Deal Seeker"}}]}"#)
                .unwrap();
        assert_eq!(resp.first_content(), Some("Deal Seeker"));
        assert!(resp.model.is_none());
    }

    #[test]
    fn test_parse_response_null_content() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(resp.first_content(), None);
    }

    #[test]
    fn test_parse_response_empty_choices() {
        let resp: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(resp.first_content(), None);
    }

    #[test]
    fn test_parse_response_missing_choices_fails() {
        let parsed: Result<ChatResponse, _> = serde_json::from_str(r#"{"error":"x"}"#);
        assert!(parsed.is_err());
    }
}
