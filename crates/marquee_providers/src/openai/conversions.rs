//! Type conversions between Marquee and vendor chat formats.

use crate::openai::{ChatMessageDto, ChatRequest, ChatResponse};
use marquee_core::{Role, TextRequest, TextResponse};
use marquee_error::{ProviderError, ProviderErrorKind};

/// Converts a TextRequest to the vendor chat format.
pub fn to_chat_request(req: &TextRequest, model: &str) -> Result<ChatRequest, ProviderError> {
    let messages: Vec<ChatMessageDto> = req
        .messages
        .iter()
        .map(|msg| {
            let role = match msg.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            ChatMessageDto {
                role: role.to_string(),
                content: msg.content.clone(),
            }
        })
        .collect();

    let mut builder = ChatRequest::builder();
    builder
        .model(req.model.clone().unwrap_or_else(|| model.to_string()))
        .messages(messages);

    if let Some(max_tokens) = req.max_tokens {
        builder.max_tokens(max_tokens);
    }
    if let Some(temperature) = req.temperature {
        builder.temperature(temperature);
    }

    builder.build().map_err(|e| {
        ProviderError::new(
            "openai",
            ProviderErrorKind::Malformed(format!("Failed to build request: {}", e)),
        )
    })
}

/// Converts a vendor chat response to a TextResponse.
pub fn from_chat_response(response: &ChatResponse) -> Result<TextResponse, ProviderError> {
    let text = response
        .choices
        .first()
        .map(|choice| choice.message.content.clone())
        .ok_or_else(|| {
            ProviderError::new(
                "openai",
                ProviderErrorKind::MissingField("choices".to_string()),
            )
        })?;

    Ok(TextResponse { text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::ChatMessage;

    #[test]
    fn request_conversion_preserves_roles() {
        let req = TextRequest {
            messages: vec![
                ChatMessage::system("You write streaming articles."),
                ChatMessage::user("Write about new releases."),
            ],
            max_tokens: Some(900),
            temperature: Some(0.7),
            model: None,
        };
        let chat = to_chat_request(&req, "gpt-4o-mini").unwrap();
        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.messages()[0].role, "system");
        assert_eq!(chat.model(), "gpt-4o-mini");
    }

    #[test]
    fn empty_choices_is_a_missing_field() {
        let response = ChatResponse { choices: vec![] };
        let err = from_chat_response(&response).unwrap_err();
        assert!(matches!(err.kind(), ProviderErrorKind::MissingField(_)));
    }
}
