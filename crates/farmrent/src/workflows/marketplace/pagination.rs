use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Page selection as it arrives on the query string. Absent or out-of-range
/// values fall back to page 1 / limit 10.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageRequest {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> usize {
        (self.page() as usize - 1) * self.limit() as usize
    }
}

/// Metadata block accompanying every admin listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// One window of records plus its pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    pub fn assemble(data: Vec<T>, total: u64, request: &PageRequest) -> Self {
        let page = request.page();
        let limit = request.limit();
        let total_pages = total.div_ceil(limit as u64);
        Self {
            data,
            pagination: PageInfo {
                page,
                limit,
                total,
                total_pages,
                has_next: (page as u64) < total_pages,
                has_prev: page > 1,
            },
        }
    }
}
