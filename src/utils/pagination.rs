use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for paginated list endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    /// Get the page number, defaulting to 1 if not specified.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Get the limit, defaulting to 20 and clamping between 1 and 100.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }

    /// Calculate the offset based on page and limit.
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(params: &PaginationParams, total: i64) -> Self {
        let limit = params.limit();
        Self {
            page: params.page(),
            limit,
            total,
            total_pages: (total as f64 / limit as f64).ceil() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 20);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_pagination_clamping() {
        let params = PaginationParams {
            page: Some(-3),
            limit: Some(500),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 100);
    }

    #[test]
    fn test_pagination_offset() {
        let params = PaginationParams {
            page: Some(3),
            limit: Some(25),
        };
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn test_pagination_meta_total_pages() {
        let params = PaginationParams {
            page: Some(1),
            limit: Some(10),
        };
        let meta = PaginationMeta::new(&params, 41);
        assert_eq!(meta.total_pages, 5);
        assert_eq!(meta.total, 41);
    }
}
