//! Pagination utilities for list endpoints

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::storage::{Page, Window};

/// `?page=&per_page=` query parameters
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PaginationParams {
    /// Page number (1-indexed)
    pub page: Option<u32>,

    pub per_page: Option<u32>,
}

impl PaginationParams {
    pub const MAX_PER_PAGE: u32 = 100;

    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(20).clamp(1, Self::MAX_PER_PAGE)
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// LIMIT/OFFSET for the storage layer
    pub fn window(&self) -> Window {
        Window {
            limit: self.per_page(),
            offset: (self.page() - 1).saturating_mul(self.per_page()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(params: &PaginationParams, total_items: u64) -> Self {
        let per_page = params.per_page();
        let page = params.page();
        let total_pages = total_items.div_ceil(per_page as u64) as u32;

        Self {
            page,
            per_page,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T: Serialize> Paginated<T> {
    pub fn from_page(page: Page<T>, params: &PaginationParams) -> Self {
        Self {
            data: page.items,
            pagination: PaginationMeta::new(params, page.total),
        }
    }
}

impl<T: Serialize> IntoResponse for Paginated<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
