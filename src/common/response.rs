// src/common/response.rs

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Envelope padrão de sucesso: { success, message, data }
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> (StatusCode, Json<Self>) {
        Self::with_status(StatusCode::OK, message, data)
    }

    pub fn created(message: impl Into<String>, data: T) -> (StatusCode, Json<Self>) {
        Self::with_status(StatusCode::CREATED, message, data)
    }

    fn with_status(
        status: StatusCode,
        message: impl Into<String>,
        data: T,
    ) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                success: true,
                message: message.into(),
                data: Some(data),
            }),
        )
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> (StatusCode, Json<Self>) {
        (
            StatusCode::OK,
            Json(Self {
                success: true,
                message: message.into(),
                data: None,
            }),
        )
    }
}

// --- Paginação ---

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;
pub const MAX_PAGE: i64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Normaliza page/limit vindos da query string.
    pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: i64, max_limit: i64) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1).min(MAX_PAGE);
        let limit = limit
            .filter(|l| *l >= 1)
            .unwrap_or(default_limit)
            .min(max_limit);
        Self { page, limit }
    }

    pub fn standard(page: Option<i64>, limit: Option<i64>) -> Self {
        Self::new(page, limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[schema(example = 1)]
    pub current_page: i64,
    #[schema(example = 3)]
    pub total_pages: i64,
    #[schema(example = 25)]
    pub total_items: i64,
    #[schema(example = 10)]
    pub items_per_page: i64,
}

impl Pagination {
    pub fn new(request: PageRequest, total_items: i64) -> Self {
        let total_pages = if total_items <= 0 {
            0
        } else {
            (total_items + request.limit - 1) / request.limit
        };
        Self {
            current_page: request.page,
            total_pages,
            total_items,
            items_per_page: request.limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: i64) -> Self {
        Self {
            items,
            pagination: Pagination::new(request, total_items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_applies_defaults() {
        let req = PageRequest::standard(None, None);
        assert_eq!(req, PageRequest { page: 1, limit: 10 });
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn page_request_clamps_invalid_values() {
        let req = PageRequest::new(Some(0), Some(500), 20, 100);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 100);

        let req = PageRequest::new(Some(3), Some(-4), 20, 100);
        assert_eq!(req.limit, 20);
        assert_eq!(req.offset(), 40);
    }

    #[test]
    fn huge_page_number_is_capped() {
        let req = PageRequest::standard(Some(i64::MAX), Some(10));
        assert_eq!(req.page, MAX_PAGE);
        assert_eq!(req.offset(), (MAX_PAGE - 1) * 10);
        assert!(req.offset() >= 0);
    }

    #[test]
    fn pagination_rounds_pages_up() {
        let req = PageRequest::standard(Some(2), Some(10));
        let p = Pagination::new(req, 25);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.current_page, 2);
        assert_eq!(p.items_per_page, 10);

        assert_eq!(Pagination::new(req, 0).total_pages, 0);
        assert_eq!(Pagination::new(req, 10).total_pages, 1);
    }

    #[test]
    fn pagination_serializes_camel_case() {
        let p = Pagination::new(PageRequest::standard(None, None), 1);
        let v = serde_json::to_value(p).unwrap();
        assert_eq!(v["currentPage"], 1);
        assert_eq!(v["totalItems"], 1);
        assert_eq!(v["itemsPerPage"], 10);
    }
}
