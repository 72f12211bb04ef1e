use serde_json::Value;

use crate::api::ApiError;

fn invalid(service: &'static str, message: &str) -> ApiError {
    ApiError::InvalidResponse {
        service,
        message: message.to_string(),
    }
}

/// Extract `choices[0].message.content` from a chat completion
pub fn extract_chat_content(response_json: &Value) -> Result<String, ApiError> {
    let choices = response_json
        .get("choices")
        .and_then(|c| c.as_array())
        .ok_or_else(|| invalid("OpenAI", "No choices in response"))?;

    let first_choice = choices
        .first()
        .ok_or_else(|| invalid("OpenAI", "Empty choices array"))?;

    let message = first_choice
        .get("message")
        .ok_or_else(|| invalid("OpenAI", "No message in response"))?;

    Ok(message
        .get("content")
        .and_then(|c| c.as_str())
        .unwrap_or_default()
        .to_string())
}

/// Join the text parts of the first Gemini candidate
pub fn extract_gemini_text(response_json: &Value) -> Result<String, ApiError> {
    let candidates = response_json
        .get("candidates")
        .and_then(|c| c.as_array())
        .ok_or_else(|| invalid("Gemini", "No candidates in response"))?;

    let first = candidates
        .first()
        .ok_or_else(|| invalid("Gemini", "Empty candidates array"))?;

    let parts = first
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| invalid("Gemini", "No content parts in candidate"))?;

    Ok(parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect::<Vec<_>>()
        .join(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_content_present() {
        let response = json!({
            "choices": [{ "message": { "role": "assistant", "content": "Hello, world!" } }]
        });
        assert_eq!(extract_chat_content(&response).unwrap(), "Hello, world!");
    }

    #[test]
    fn chat_content_empty_choices() {
        let response = json!({ "choices": [] });
        assert!(extract_chat_content(&response).is_err());
    }

    #[test]
    fn gemini_parts_joined() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello, " }, { "text": "Gemini" }] }
            }]
        });
        assert_eq!(extract_gemini_text(&response).unwrap(), "Hello, Gemini");
    }

    #[test]
    fn gemini_without_candidates() {
        let response = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(extract_gemini_text(&response).is_err());
    }
}
