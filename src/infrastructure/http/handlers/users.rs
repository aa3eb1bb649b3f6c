//! User HTTP Handlers
//!
//! 学习进度与成就（游戏化数据），均为演示数据

use axum::{http::StatusCode, response::Response};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::reply;
use crate::infrastructure::http::dto::Envelope;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct WeeklyGoal {
    pub target: u32,
    pub completed: u32,
    pub progress: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicProgress {
    pub topic: &'static str,
    pub mastery: u32,
    pub documents_read: u32,
    pub quizzes_taken: u32,
}

#[derive(Debug, Serialize)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub score: u32,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub total_documents: u32,
    pub documents_this_week: u32,
    pub total_quizzes: u32,
    pub quizzes_this_week: u32,
    pub average_score: f64,
    pub study_streak: u32,
    pub xp_points: u32,
    pub level: u32,
    pub weekly_goal: WeeklyGoal,
    pub topic_progress: Vec<TopicProgress>,
    pub recent_activity: Vec<Activity>,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub progress: Progress,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdateResponse {
    pub xp_gained: u32,
    pub new_level: u32,
    pub achievements: Vec<&'static str>,
    pub streak: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub unlocked_at: String,
}

#[derive(Debug, Serialize)]
pub struct AchievementsResponse {
    pub achievements: Vec<Achievement>,
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/users/progress
pub async fn get_progress() -> Response {
    reply(
        StatusCode::OK,
        Envelope::success(ProgressResponse {
            progress: Progress {
                total_documents: 5,
                documents_this_week: 2,
                total_quizzes: 10,
                quizzes_this_week: 3,
                average_score: 85.5,
                study_streak: 7,
                xp_points: 1250,
                level: 5,
                weekly_goal: WeeklyGoal {
                    target: 5,
                    completed: 3,
                    progress: 60,
                },
                topic_progress: vec![TopicProgress {
                    topic: "AI Basics",
                    mastery: 75,
                    documents_read: 3,
                    quizzes_taken: 5,
                }],
                recent_activity: vec![Activity {
                    kind: "demo_activity",
                    title: "Demo Activity",
                    score: 90,
                    timestamp: now_iso(),
                }],
            },
        }),
        "Failed to fetch progress",
    )
}

/// POST /api/users/progress
pub async fn update_progress() -> Response {
    reply(
        StatusCode::OK,
        Envelope::success(ProgressUpdateResponse {
            xp_gained: 50,
            new_level: 5,
            achievements: vec!["Demo Achievement"],
            streak: 8,
        }),
        "Failed to update progress",
    )
}

/// GET /api/users/achievements
pub async fn achievements() -> Response {
    reply(
        StatusCode::OK,
        Envelope::success(AchievementsResponse {
            achievements: vec![Achievement {
                id: "demo_achievement",
                title: "Demo Achievement",
                description: "Complete your first demo action",
                icon: "🎯",
                unlocked_at: now_iso(),
            }],
        }),
        "Failed to fetch achievements",
    )
}
