//! Paginated account listing

use serde::{Deserialize, Serialize};

use super::AdminUser;

/// One page of the admin user listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListPage {
    pub items: Vec<AdminUser>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl UserListPage {
    /// Number of pages for the current limit (`ceil(total / limit)`)
    ///
    /// A zero limit yields zero pages.
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.limit))
    }

    /// Whether a page number can be requested (1-based)
    pub fn is_page_available(&self, page: u32) -> bool {
        page >= 1 && u64::from(page) <= self.total_pages()
    }

    pub fn has_next(&self) -> bool {
        self.is_page_available(self.page.saturating_add(1))
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}
