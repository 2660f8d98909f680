use super::image::ImageRecord;

/// One page of images in creation order, with the total across all pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePage {
    pub records: Vec<ImageRecord>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

impl ImagePage {
    /// 1-based page number the offset falls on.
    pub fn page(&self) -> i64 {
        if self.limit <= 0 {
            return 1;
        }
        self.offset / self.limit + 1
    }

    pub fn page_size(&self) -> i64 {
        self.limit
    }

    /// `ceil(total / limit)`; zero when nothing is stored.
    pub fn total_pages(&self) -> i64 {
        if self.limit <= 0 {
            return 0;
        }
        (self.total + self.limit - 1) / self.limit
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
