//! Document HTTP Handlers
//!
//! 文档的增删查接口，目前没有存储，只返回演示数据

use axum::{http::StatusCode, response::Response};
use serde::Serialize;

use super::reply;
use crate::infrastructure::http::dto::Envelope;
use crate::infrastructure::http::extract::ResourceId;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub pages: u32,
}

#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub id: String,
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentDetail {
    pub id: String,
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentSummary>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse<D> {
    pub document: D,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/documents
pub async fn list_documents() -> Response {
    reply(
        StatusCode::OK,
        Envelope::success(DocumentListResponse {
            documents: Vec::new(),
            pagination: Pagination {
                page: 1,
                limit: 10,
                total: 0,
                pages: 0,
            },
        }),
        "Failed to fetch documents",
    )
}

/// POST /api/documents/upload
pub async fn upload_document() -> Response {
    reply(
        StatusCode::CREATED,
        Envelope::success_with_message(
            "Document upload endpoint - coming soon!",
            DocumentResponse {
                document: DocumentSummary {
                    id: "demo".to_string(),
                    filename: "demo.pdf".to_string(),
                },
            },
        ),
        "Upload failed",
    )
}

/// GET /api/documents/:id
pub async fn get_document(ResourceId(id): ResourceId) -> Response {
    reply(
        StatusCode::OK,
        Envelope::success(DocumentResponse {
            document: DocumentDetail {
                id,
                filename: "demo.pdf".to_string(),
                content: "Demo content".to_string(),
            },
        }),
        "Failed to fetch document",
    )
}

/// DELETE /api/documents/:id
pub async fn delete_document(ResourceId(id): ResourceId) -> Response {
    tracing::debug!(document_id = %id, "Delete requested for demo document");
    reply(
        StatusCode::OK,
        Envelope::ok_message("Document deleted successfully"),
        "Failed to delete document",
    )
}
