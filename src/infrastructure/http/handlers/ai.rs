//! AI HTTP Handlers
//!
//! 聊天、摘要、闪卡、测验。尚未接入模型，全部返回演示数据

use axum::{http::StatusCode, response::Response};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::reply;
use crate::infrastructure::http::dto::Envelope;
use crate::infrastructure::http::extract::Payload;

// ============================================================================
// DTOs
// ============================================================================

/// 聊天请求：任意 JSON 都可接受，只取对象里的 `message` 字段
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct ChatRequest {
    pub message: Option<Value>,
}

impl From<Value> for ChatRequest {
    fn from(body: Value) -> Self {
        let message = match body {
            Value::Object(mut fields) => fields.remove("message"),
            _ => None,
        };
        Self { message }
    }
}

impl ChatRequest {
    /// 字符串原样输出，其它 JSON 值按序列化结果输出，缺省为空
    pub fn message_text(&self) -> String {
        match &self.message {
            None => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub session_id: &'static str,
    pub tokens: u32,
    pub suggestions: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub summary: &'static str,
    pub key_points: Vec<&'static str>,
    pub reading_time: u32,
}

#[derive(Debug, Serialize)]
pub struct Flashcard {
    pub front: &'static str,
    pub back: &'static str,
    pub difficulty: &'static str,
    pub topic: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FlashcardsResponse {
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Serialize)]
pub struct QuizQuestion {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub question: &'static str,
    pub options: Vec<&'static str>,
    pub correct: usize,
    pub explanation: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: &'static str,
    pub title: &'static str,
    pub questions: Vec<QuizQuestion>,
    pub time_limit: u32,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub quiz: Quiz,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/ai/chat
pub async fn chat(Payload(request): Payload<ChatRequest>) -> Response {
    let message = request.message_text();
    reply(
        StatusCode::OK,
        Envelope::success(ChatResponse {
            response: format!(
                "Demo AI response to: \"{}\". Connect OpenAI API key for real AI responses!",
                message
            ),
            session_id: "demo-session",
            tokens: 50,
            suggestions: vec![
                "Tell me more about this topic",
                "Can you explain that differently?",
                "What are the key points?",
            ],
        }),
        "Chat failed",
    )
}

/// POST /api/ai/summarize
pub async fn summarize() -> Response {
    reply(
        StatusCode::OK,
        Envelope::success(SummaryResponse {
            summary: "This is a demo summary. Upload documents and connect OpenAI API for real summaries!",
            key_points: vec!["Demo point 1", "Demo point 2", "Demo point 3"],
            reading_time: 5,
        }),
        "Summarization failed",
    )
}

/// POST /api/ai/flashcards
pub async fn flashcards() -> Response {
    reply(
        StatusCode::OK,
        Envelope::success(FlashcardsResponse {
            flashcards: vec![Flashcard {
                front: "What is AI?",
                back: "Artificial Intelligence - demo flashcard",
                difficulty: "beginner",
                topic: "AI basics",
            }],
        }),
        "Flashcard generation failed",
    )
}

/// POST /api/ai/quiz
pub async fn quiz() -> Response {
    reply(
        StatusCode::OK,
        Envelope::success(QuizResponse {
            quiz: Quiz {
                id: "demo-quiz",
                title: "Demo Quiz",
                questions: vec![QuizQuestion {
                    kind: "multiple-choice",
                    question: "This is a demo question?",
                    options: vec!["Option A", "Option B", "Option C", "Option D"],
                    correct: 0,
                    explanation: "Demo explanation",
                }],
                time_limit: 300,
                created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        }),
        "Quiz generation failed",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_of(body: &str) -> String {
        serde_json::from_str::<ChatRequest>(body)
            .unwrap()
            .message_text()
    }

    #[test]
    fn test_chat_message_renders_any_json() {
        assert_eq!(message_of(r#"{"message":"hi"}"#), "hi");
        assert_eq!(message_of(r#"{"message":42}"#), "42");
        assert_eq!(message_of(r#"{"message":{"a":[1,true]}}"#), r#"{"a":[1,true]}"#);
        assert_eq!(message_of(r#"{"message":null}"#), "null");
    }

    #[test]
    fn test_chat_accepts_non_object_bodies() {
        assert_eq!(message_of("[1,2]"), "");
        assert_eq!(message_of(r#""just text""#), "");
        assert_eq!(message_of("{}"), "");
    }
}
